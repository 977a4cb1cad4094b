//! Navigation state machine for two panes.
//!
//! The controller owns the shared page/zoom/sync state plus per-pane page
//! bookkeeping. Every operation returns a [`RenderPlan`] naming the panes that
//! must be re-rendered; executing the plan is the caller's job.

use crate::config::ViewerConfig;
use crate::input::{map_key, wheel_step, KeyInput, ViewerAction, WheelInput};
use crate::pane::{PaneId, PaneMap};
use std::ops::RangeInclusive;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NavigationState {
    /// Shared 1-based page.
    pub current_page: u32,
    pub zoom: f32,
    pub synchronized: bool,
    /// Pane that keyboard paging targets when not synchronized.
    pub active_pane: PaneId,
}

/// Navigation-side view of one pane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PaneView {
    /// Zero when no document is loaded.
    pub page_count: u32,
    /// Page this pane was last asked to display.
    pub page: u32,
}

impl PaneView {
    pub fn is_loaded(&self) -> bool {
        self.page_count > 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderTarget {
    pub pane: PaneId,
    pub page: u32,
    pub zoom: f32,
}

/// Render work produced by a navigation operation, at most one target per pane.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderPlan {
    targets: Vec<RenderTarget>,
}

impl RenderPlan {
    pub fn empty() -> Self {
        Self::default()
    }

    fn push(&mut self, target: RenderTarget) {
        self.targets.retain(|existing| existing.pane != target.pane);
        self.targets.push(target);
    }

    pub fn targets(&self) -> &[RenderTarget] {
        &self.targets
    }

    pub fn for_pane(&self, pane: PaneId) -> Option<RenderTarget> {
        self.targets.iter().copied().find(|target| target.pane == pane)
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }
}

#[derive(Debug, Clone)]
pub struct NavigationController {
    config: ViewerConfig,
    state: NavigationState,
    panes: PaneMap<PaneView>,
}

impl Default for NavigationController {
    fn default() -> Self {
        Self::new(ViewerConfig::default())
    }
}

impl NavigationController {
    pub fn new(config: ViewerConfig) -> Self {
        let state = NavigationState {
            current_page: 1,
            zoom: config.clamp_zoom(config.default_zoom),
            synchronized: config.start_synchronized,
            active_pane: PaneId::Left,
        };

        Self { config, state, panes: PaneMap::default() }
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn state(&self) -> &NavigationState {
        &self.state
    }

    pub fn pane(&self, pane: PaneId) -> PaneView {
        self.panes[pane]
    }

    pub fn any_loaded(&self) -> bool {
        self.panes.iter().any(|(_, view)| view.is_loaded())
    }

    pub fn both_loaded(&self) -> bool {
        self.panes.iter().all(|(_, view)| view.is_loaded())
    }

    /// Largest page every loaded pane can show, or 0 when nothing is loaded.
    pub fn max_common_pages(&self) -> u32 {
        self.panes
            .iter()
            .filter(|(_, view)| view.is_loaded())
            .map(|(_, view)| view.page_count)
            .min()
            .unwrap_or(0)
    }

    /// Valid shared page range; collapses to `1..=1` when nothing is loaded.
    pub fn page_range(&self) -> RangeInclusive<u32> {
        1..=self.max_common_pages().max(1)
    }

    pub fn clamp_page(&self, target: i64) -> u32 {
        let max = self.max_common_pages();
        if max == 0 {
            return 1;
        }
        target.clamp(1, i64::from(max)) as u32
    }

    /// Moves every loaded pane to `target`, clamped into the shared range.
    pub fn set_page(&mut self, target: i64) -> RenderPlan {
        self.state.current_page = self.clamp_page(target);

        let page = self.state.current_page;
        let zoom = self.state.zoom;
        let mut plan = RenderPlan::empty();

        for pane in PaneId::ALL {
            let view = &mut self.panes[pane];
            if view.is_loaded() {
                view.page = page;
                plan.push(RenderTarget { pane, page, zoom });
            }
        }

        plan
    }

    pub fn next_page(&mut self) -> RenderPlan {
        self.set_page(i64::from(self.state.current_page) + 1)
    }

    pub fn previous_page(&mut self) -> RenderPlan {
        self.set_page(i64::from(self.state.current_page) - 1)
    }

    /// Sets the zoom, clamped into the configured bounds. Non-finite input is ignored.
    pub fn set_zoom(&mut self, target: f32) -> RenderPlan {
        if !target.is_finite() {
            return RenderPlan::empty();
        }
        self.state.zoom = self.config.clamp_zoom(target);
        self.render_all()
    }

    pub fn zoom_in(&mut self) -> RenderPlan {
        self.set_zoom(self.state.zoom * self.config.zoom_step)
    }

    pub fn zoom_out(&mut self) -> RenderPlan {
        self.set_zoom(self.state.zoom / self.config.zoom_step)
    }

    pub fn reset_zoom(&mut self) -> RenderPlan {
        self.set_zoom(self.config.default_zoom)
    }

    /// Re-renders every loaded pane at the current zoom.
    ///
    /// Synchronized panes show the shared page; independent panes keep
    /// their own page.
    pub fn render_all(&mut self) -> RenderPlan {
        let zoom = self.state.zoom;
        let shared = self.state.current_page;
        let synchronized = self.state.synchronized;
        let mut plan = RenderPlan::empty();

        for pane in PaneId::ALL {
            let view = &mut self.panes[pane];
            if !view.is_loaded() {
                continue;
            }
            if synchronized || view.page == 0 {
                view.page = shared.min(view.page_count);
            }
            plan.push(RenderTarget { pane, page: view.page, zoom });
        }

        plan
    }

    /// Pages one pane by `delta`.
    ///
    /// Synchronized, this is `set_page(current + delta)`. Otherwise only `pane`
    /// moves, within its own page count, and the shared page follows it for
    /// bookkeeping.
    pub fn step_pane(&mut self, pane: PaneId, delta: i64) -> RenderPlan {
        if self.state.synchronized {
            return self.set_page(i64::from(self.state.current_page) + delta);
        }

        let zoom = self.state.zoom;
        let shared = self.state.current_page;
        let view = &mut self.panes[pane];
        if !view.is_loaded() {
            return RenderPlan::empty();
        }

        let base = if view.page == 0 { shared } else { view.page };
        let next = (i64::from(base) + delta).clamp(1, i64::from(view.page_count)) as u32;
        view.page = next;
        self.state.current_page = next;

        let mut plan = RenderPlan::empty();
        plan.push(RenderTarget { pane, page: next, zoom });
        plan
    }

    pub fn step_active_pane(&mut self, delta: i64) -> RenderPlan {
        self.step_pane(self.state.active_pane, delta)
    }

    pub fn set_active_pane(&mut self, pane: PaneId) {
        self.state.active_pane = pane;
    }

    /// Toggles synchronized paging.
    ///
    /// Enabling adopts the active pane's page (when it has a document) and
    /// re-clamps it into the shared range for both panes.
    pub fn set_synchronized(&mut self, synchronized: bool) -> RenderPlan {
        self.state.synchronized = synchronized;

        if !synchronized {
            return self.render_all();
        }

        let active = self.panes[self.state.active_pane];
        let page = if active.is_loaded() && active.page > 0 {
            active.page
        } else {
            self.state.current_page
        };
        self.set_page(i64::from(page))
    }

    /// Records a successful load and realigns every loaded pane on the shared page.
    ///
    /// A zero page count is treated as a failed load.
    pub fn document_loaded(&mut self, pane: PaneId, page_count: u32) -> RenderPlan {
        if page_count == 0 {
            return self.document_failed(pane);
        }
        self.panes[pane] = PaneView { page_count, page: 1 };
        self.set_page(i64::from(self.state.current_page))
    }

    /// Resets a pane after a failed load; the shared page may clamp downward.
    pub fn document_failed(&mut self, pane: PaneId) -> RenderPlan {
        self.panes[pane] = PaneView::default();
        self.set_page(i64::from(self.state.current_page))
    }

    pub fn apply(&mut self, action: ViewerAction) -> RenderPlan {
        match action {
            ViewerAction::PreviousPage => self.previous_page(),
            ViewerAction::NextPage => self.next_page(),
            ViewerAction::GoToPage(page) => self.set_page(page),
            ViewerAction::StepActivePane(delta) => self.step_active_pane(delta),
            ViewerAction::StepPane { pane, delta } => self.step_pane(pane, delta),
            ViewerAction::ZoomIn => self.zoom_in(),
            ViewerAction::ZoomOut => self.zoom_out(),
            ViewerAction::ResetZoom => self.reset_zoom(),
            ViewerAction::SetZoom(zoom) => self.set_zoom(zoom),
            ViewerAction::SetSynchronized(on) => self.set_synchronized(on),
            ViewerAction::ActivatePane(pane) => {
                self.set_active_pane(pane);
                RenderPlan::empty()
            }
        }
    }

    /// Handles a wheel event over `pane`. `None` means the event was not consumed.
    pub fn on_wheel(&mut self, pane: PaneId, input: &WheelInput) -> Option<RenderPlan> {
        if !self.any_loaded() {
            return None;
        }
        let delta = wheel_step(input, self.config.wheel_threshold)?;
        Some(self.step_pane(pane, delta))
    }

    /// Handles a key press. `None` means the key was not consumed.
    pub fn on_key(&mut self, input: &KeyInput) -> Option<RenderPlan> {
        if !self.any_loaded() {
            return None;
        }
        let action = map_key(input)?;
        Some(self.apply(action))
    }
}
