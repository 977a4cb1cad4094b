//! Dual-pane viewer session.
//!
//! Owns the document engine, one render coordinator per pane, and the
//! navigation controller. Every input funnels through the controller, which
//! returns a render plan; the plan is then issued to both panes at once and
//! awaited until each settles on its own.

use crate::error::ViewerError;
use crate::status::PaneStatus;
use futures::future;
use pdf_engine::{default_engine, DocumentHandle, OpenSource, PdfEngine};
use std::cell::{Cell, RefCell};
use std::ops::RangeInclusive;
use std::path::Path;
use std::sync::Arc;
use twinpage_scheduler::{EngineRasterizer, Rasterizer, RenderCoordinator};
use viewer_core::{
    parse_page_input, KeyInput, NavigationController, NavigationState, PagerView, PaneId,
    PaneMap, RenderPlan, ViewerAction, ViewerConfig, WheelInput,
};

pub struct DualPaneViewer<R: Rasterizer + ?Sized = EngineRasterizer> {
    engine: Arc<dyn PdfEngine>,
    navigation: RefCell<NavigationController>,
    panes: PaneMap<RenderCoordinator<R>>,
    status: RefCell<PaneMap<PaneStatus>>,
    load_generation: PaneMap<Cell<u64>>,
}

impl DualPaneViewer<EngineRasterizer> {
    /// Viewer backed by the default engine.
    pub fn new(config: ViewerConfig) -> Self {
        Self::with_parts(config, Arc::new(default_engine()), Arc::new(EngineRasterizer))
    }
}

impl<R: Rasterizer + ?Sized> DualPaneViewer<R> {
    pub fn with_parts(config: ViewerConfig, engine: Arc<dyn PdfEngine>, rasterizer: Arc<R>) -> Self {
        if let Err(err) = config.validate() {
            tracing::warn!(
                error = %err,
                "viewer config is invalid, unusable zoom bounds fall back to defaults"
            );
        }
        let panes =
            PaneMap::from_fn(|pane| RenderCoordinator::new(pane.as_str(), Arc::clone(&rasterizer)));

        Self {
            engine,
            navigation: RefCell::new(NavigationController::new(config)),
            panes,
            status: RefCell::new(PaneMap::default()),
            load_generation: PaneMap::default(),
        }
    }

    pub fn navigation(&self) -> NavigationState {
        *self.navigation.borrow().state()
    }

    pub fn page_range(&self) -> RangeInclusive<u32> {
        self.navigation.borrow().page_range()
    }

    pub fn pane(&self, pane: PaneId) -> &RenderCoordinator<R> {
        &self.panes[pane]
    }

    /// Page on screen in `pane`, if any frame has been presented.
    pub fn displayed_page(&self, pane: PaneId) -> Option<u32> {
        self.panes[pane].surface().page()
    }

    pub fn status(&self, pane: PaneId) -> PaneStatus {
        self.status.borrow()[pane].clone()
    }

    pub fn pager(&self) -> PagerView {
        PagerView::from_navigation(&self.navigation.borrow())
    }

    /// Applies the host's device pixel ratio, clamped by configuration.
    ///
    /// Takes effect on the next render of each pane.
    pub fn set_device_scale(&self, raw: f32) {
        let scale = self.navigation.borrow().config().device_scale(raw);
        for pane in PaneId::ALL {
            self.panes[pane].set_device_scale(scale);
        }
    }

    fn set_status(&self, pane: PaneId, status: PaneStatus) {
        self.status.borrow_mut()[pane] = status;
    }

    /// Loads `bytes` into `pane` and re-renders.
    ///
    /// On failure the pane is reset and shows a failed status; the other
    /// pane keeps its document. Returns the page count.
    ///
    /// When loads on the same pane overlap, only the most recently started
    /// one takes effect; older ones return [`ViewerError::Superseded`].
    pub async fn load(&self, pane: PaneId, name: &str, bytes: Vec<u8>) -> Result<u32, ViewerError> {
        self.load_source(pane, name, OpenSource::Bytes(bytes)).await
    }

    pub async fn load_path(&self, pane: PaneId, path: &Path) -> Result<u32, ViewerError> {
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        self.load_source(pane, &name, OpenSource::from(path)).await
    }

    async fn load_source(
        &self,
        pane: PaneId,
        name: &str,
        source: OpenSource,
    ) -> Result<u32, ViewerError> {
        let generation = self.load_generation[pane].get() + 1;
        self.load_generation[pane].set(generation);
        self.set_status(pane, PaneStatus::Loading);

        let result = self.open(pane, source).await;
        if self.load_generation[pane].get() != generation {
            tracing::debug!(pane = %pane, name, "discarding superseded load");
            return Err(ViewerError::Superseded { pane });
        }
        let (plan, outcome) = match result {
            Ok(document) => {
                let pages = self.panes[pane].attach(document);
                tracing::info!(pane = %pane, name, pages, "document loaded");
                self.set_status(pane, PaneStatus::Loaded { name: name.to_owned(), pages });
                (self.navigation.borrow_mut().document_loaded(pane, pages), Ok(pages))
            }
            Err(err) => {
                tracing::warn!(pane = %pane, name, error = %err, "document failed to load");
                self.panes[pane].detach();
                self.set_status(pane, PaneStatus::Failed);
                (self.navigation.borrow_mut().document_failed(pane), Err(err))
            }
        };

        self.execute(plan).await;
        outcome
    }

    async fn open(&self, pane: PaneId, source: OpenSource) -> Result<DocumentHandle, ViewerError> {
        let engine = Arc::clone(&self.engine);

        tokio::task::spawn_blocking(move || engine.open(source))
            .await
            .map_err(|err| ViewerError::Task(err.to_string()))?
            .map_err(|source| ViewerError::Load { pane, source })
    }

    pub async fn dispatch(&self, action: ViewerAction) {
        let plan = self.navigation.borrow_mut().apply(action);
        self.execute(plan).await;
    }

    pub async fn set_page(&self, target: i64) {
        self.dispatch(ViewerAction::GoToPage(target)).await;
    }

    pub async fn next_page(&self) {
        self.dispatch(ViewerAction::NextPage).await;
    }

    pub async fn previous_page(&self) {
        self.dispatch(ViewerAction::PreviousPage).await;
    }

    pub async fn set_zoom(&self, zoom: f32) {
        self.dispatch(ViewerAction::SetZoom(zoom)).await;
    }

    pub async fn zoom_in(&self) {
        self.dispatch(ViewerAction::ZoomIn).await;
    }

    pub async fn zoom_out(&self) {
        self.dispatch(ViewerAction::ZoomOut).await;
    }

    pub async fn reset_zoom(&self) {
        self.dispatch(ViewerAction::ResetZoom).await;
    }

    pub async fn set_synchronized(&self, synchronized: bool) {
        self.dispatch(ViewerAction::SetSynchronized(synchronized)).await;
    }

    /// Marks `pane` as the keyboard target (pointer down, hover, focus).
    pub fn set_active_pane(&self, pane: PaneId) {
        self.navigation.borrow_mut().set_active_pane(pane);
    }

    /// Applies the page-number field. Returns false if the text holds no number.
    pub async fn submit_page_input(&self, text: &str) -> bool {
        match parse_page_input(text) {
            Some(page) => {
                self.set_page(page).await;
                true
            }
            None => false,
        }
    }

    /// Wheel over `pane`. Returns true when consumed, so the host suppresses scrolling.
    pub async fn on_wheel(&self, pane: PaneId, input: WheelInput) -> bool {
        let plan = self.navigation.borrow_mut().on_wheel(pane, &input);
        match plan {
            Some(plan) => {
                self.execute(plan).await;
                true
            }
            None => false,
        }
    }

    /// Keyboard shortcut. Returns true when consumed.
    pub async fn on_key(&self, input: KeyInput) -> bool {
        let plan = self.navigation.borrow_mut().on_key(&input);
        match plan {
            Some(plan) => {
                self.execute(plan).await;
                true
            }
            None => false,
        }
    }

    /// Re-renders every loaded pane at the current page and zoom.
    pub async fn render_all(&self) {
        let plan = self.navigation.borrow_mut().render_all();
        self.execute(plan).await;
    }

    async fn execute(&self, plan: RenderPlan) {
        if plan.is_empty() {
            return;
        }
        tracing::debug!(targets = plan.len(), "executing render plan");

        let render = |pane: PaneId| {
            let target = plan.for_pane(pane);
            async move {
                if let Some(target) = target {
                    self.panes[pane].request_render(target.page, target.zoom).await;
                }
            }
        };

        future::join(render(PaneId::Left), render(PaneId::Right)).await;
    }
}
