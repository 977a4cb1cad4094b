//! Single-flight render coordination for one pane.
//!
//! A pane runs at most one rasterization at a time. Requests that arrive
//! while it is busy overwrite a single pending slot; when the in-flight
//! rasterization settles the pending request (if any) runs next. Rapid input
//! therefore skips intermediate pages but always ends on the latest request.
//!
//! All state lives in `RefCell`s and is only touched between suspension
//! points, so a coordinator is meant to be driven from one thread.

use crate::rasterizer::{RasterRequest, Rasterizer};
use crate::stats::RenderStats;
use crate::surface::{Frame, PaneSurface};
use pdf_engine::DocumentHandle;
use std::cell::{Cell, Ref, RefCell};
use std::fmt;
use std::sync::Arc;

/// Page and zoom requested for a pane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageRequest {
    /// 1-based page number.
    pub page: u32,
    pub zoom: f32,
}

/// Render bookkeeping for one pane.
#[derive(Debug, Default)]
pub struct PaneState {
    pub document: Option<DocumentHandle>,
    pub page_count: u32,
    pub rendering: bool,
    pub pending: Option<PageRequest>,
}

impl PaneState {
    /// Document to rasterize `request` against, if the request is valid now.
    fn admit(&self, request: PageRequest) -> Option<DocumentHandle> {
        let document = self.document.as_ref()?;
        let page_ok = request.page >= 1 && request.page <= self.page_count;
        let zoom_ok = request.zoom.is_finite() && request.zoom > 0.0;
        (page_ok && zoom_ok).then(|| Arc::clone(document))
    }

    fn is_current(&self, document: &DocumentHandle) -> bool {
        self.document.as_ref().is_some_and(|current| Arc::ptr_eq(current, document))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderSummary {
    /// Rasterizations run before the pane went idle.
    pub passes: u32,
    pub failures: u32,
    /// Last request served.
    pub last: PageRequest,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RenderOutcome {
    /// No document, page out of range, or unusable zoom.
    Ignored,
    /// The pane was busy; the request now occupies the pending slot.
    Coalesced,
    /// This call drove the pane until it went idle.
    Settled(RenderSummary),
}

/// Returns the pane to idle even if the driving future is dropped mid-render.
///
/// A request parked behind a dropped driver has no one left to serve it, so
/// it is discarded with the busy flag; the next caller starts clean.
struct BusyGuard<'a> {
    state: &'a RefCell<PaneState>,
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        let mut state = self.state.borrow_mut();
        state.rendering = false;
        state.pending = None;
    }
}

pub struct RenderCoordinator<R: ?Sized> {
    label: &'static str,
    rasterizer: Arc<R>,
    device_scale: Cell<f32>,
    state: RefCell<PaneState>,
    surface: RefCell<PaneSurface>,
    stats: RefCell<RenderStats>,
}

impl<R: ?Sized> fmt::Debug for RenderCoordinator<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderCoordinator")
            .field("label", &self.label)
            .field("state", &self.state)
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}

impl<R: Rasterizer + ?Sized> RenderCoordinator<R> {
    pub fn new(label: &'static str, rasterizer: Arc<R>) -> Self {
        Self {
            label,
            rasterizer,
            device_scale: Cell::new(1.0),
            state: RefCell::new(PaneState::default()),
            surface: RefCell::new(PaneSurface::new()),
            stats: RefCell::new(RenderStats::default()),
        }
    }

    /// Installs a freshly loaded document and returns its page count.
    ///
    /// A pending request for the previous document is discarded. A
    /// rasterization already in flight finishes, but its frame is not shown.
    pub fn attach(&self, document: DocumentHandle) -> u32 {
        let page_count = document.page_count();
        let mut state = self.state.borrow_mut();
        state.document = Some(document);
        state.page_count = page_count;
        state.pending = None;
        page_count
    }

    /// Forgets the current document, e.g. after a failed load.
    pub fn detach(&self) {
        let mut state = self.state.borrow_mut();
        state.document = None;
        state.page_count = 0;
        state.pending = None;
    }

    pub fn is_loaded(&self) -> bool {
        self.state.borrow().document.is_some()
    }

    pub fn page_count(&self) -> u32 {
        self.state.borrow().page_count
    }

    pub fn is_rendering(&self) -> bool {
        self.state.borrow().rendering
    }

    pub fn pending(&self) -> Option<PageRequest> {
        self.state.borrow().pending
    }

    /// Do not hold the returned borrow across an await.
    pub fn surface(&self) -> Ref<'_, PaneSurface> {
        self.surface.borrow()
    }

    pub fn stats(&self) -> RenderStats {
        *self.stats.borrow()
    }

    pub fn device_scale(&self) -> f32 {
        self.device_scale.get()
    }

    pub fn set_device_scale(&self, scale: f32) {
        self.device_scale.set(scale);
    }

    /// Requests `page` at `zoom` on this pane.
    ///
    /// If the pane is idle this call rasterizes and keeps going until the
    /// pending slot is empty. If it is busy the request is parked and the
    /// call returns at once; the call already driving the pane will serve it.
    pub async fn request_render(&self, page: u32, zoom: f32) -> RenderOutcome {
        let request = PageRequest { page, zoom };

        let document = {
            let mut stats = self.stats.borrow_mut();
            let mut state = self.state.borrow_mut();
            stats.requests += 1;

            let Some(document) = state.admit(request) else {
                stats.ignored += 1;
                tracing::trace!(pane = self.label, page, zoom, "render request ignored");
                return RenderOutcome::Ignored;
            };

            if state.rendering {
                if let Some(previous) = state.pending.replace(request) {
                    tracing::debug!(
                        pane = self.label,
                        superseded = previous.page,
                        page,
                        "pending render superseded"
                    );
                }
                stats.coalesced += 1;
                return RenderOutcome::Coalesced;
            }

            state.rendering = true;
            document
        };

        let _busy = BusyGuard { state: &self.state };
        let mut summary = RenderSummary { passes: 0, failures: 0, last: request };
        let mut current = (document, request);

        loop {
            let (document, request) = current;
            let raster = RasterRequest {
                page: request.page,
                zoom: request.zoom,
                device_scale: self.device_scale.get(),
            };

            summary.passes += 1;
            summary.last = request;
            self.stats.borrow_mut().passes += 1;

            let result = self.rasterizer.rasterize(Arc::clone(&document), raster).await;

            match result {
                Ok(image) if self.state.borrow().is_current(&document) => {
                    let mut surface = self.surface.borrow_mut();
                    surface.prepare(image.width(), image.height(), raster.device_scale);
                    surface.present(Frame { page: request.page, zoom: request.zoom, image });
                }
                Ok(_) => {
                    tracing::debug!(
                        pane = self.label,
                        page = request.page,
                        "discarded frame of replaced document"
                    );
                }
                Err(err) => {
                    summary.failures += 1;
                    self.stats.borrow_mut().failures += 1;
                    tracing::warn!(pane = self.label, page = request.page, error = %err, "render failed");
                }
            }

            current = {
                let mut state = self.state.borrow_mut();
                let Some(next) = state.pending.take() else {
                    break;
                };
                match state.admit(next) {
                    Some(document) => (document, next),
                    None => {
                        self.stats.borrow_mut().dropped += 1;
                        break;
                    }
                }
            };
        }

        RenderOutcome::Settled(summary)
    }
}
