//! Display projection of the navigation state for pager controls.

use crate::navigation::NavigationController;

/// What the page/zoom controls should show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PagerView {
    /// Shared page count, or an em dash when nothing is loaded.
    pub page_count_label: String,
    pub page_input: String,
    pub prev_enabled: bool,
    pub next_enabled: bool,
    pub zoom_label: String,
    /// Page field and zoom buttons.
    pub controls_enabled: bool,
}

impl PagerView {
    pub fn from_navigation(nav: &NavigationController) -> Self {
        let state = nav.state();
        let max = nav.max_common_pages();
        let any_loaded = nav.any_loaded();

        Self {
            page_count_label: if max > 0 { max.to_string() } else { "—".to_string() },
            page_input: state.current_page.to_string(),
            prev_enabled: any_loaded && state.current_page > 1,
            next_enabled: any_loaded && max > 0 && state.current_page < max,
            zoom_label: format!("{}%", (state.zoom * 100.0).round() as i64),
            controls_enabled: any_loaded,
        }
    }
}
