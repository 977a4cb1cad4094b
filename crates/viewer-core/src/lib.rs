//! Viewer Core
//!
//! Pure navigation logic for a dual-pane document viewer: pane identities,
//! the shared page/zoom/sync state machine, input mapping, configuration and
//! the pager display projection. Nothing here performs I/O or rendering;
//! operations return [`RenderPlan`]s for the caller to execute.
//!
//! # Example
//!
//! ```
//! use viewer_core::{NavigationController, PaneId, ViewerConfig};
//!
//! let mut nav = NavigationController::new(ViewerConfig::default());
//! nav.document_loaded(PaneId::Left, 5);
//! nav.document_loaded(PaneId::Right, 3);
//!
//! let plan = nav.set_page(5);
//! assert_eq!(nav.state().current_page, 3);
//! assert_eq!(plan.len(), 2);
//! ```

mod config;
mod input;
mod navigation;
mod pane;
mod pager;

pub use config::{ConfigError, ViewerConfig};
pub use input::{map_key, parse_page_input, wheel_step, Key, KeyInput, ViewerAction, WheelInput};
pub use navigation::{NavigationController, NavigationState, PaneView, RenderPlan, RenderTarget};
pub use pager::PagerView;
pub use pane::{PaneId, PaneMap};
