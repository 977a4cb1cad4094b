//! twinpage
//!
//! Core of a dual-pane document viewer: two documents load independently and
//! page together (synchronized) or separately, with a shared zoom. Decoding
//! and rasterization come from `pdf-engine`; per-pane render scheduling from
//! `twinpage-scheduler`; navigation rules from `viewer-core`.
//!
//! The host UI owns file picking, widgets and event wiring, and calls into
//! [`DualPaneViewer`] from a single thread:
//!
//! ```no_run
//! use twinpage::{DualPaneViewer, PaneId, ViewerConfig, WheelInput};
//!
//! # async fn demo(left: Vec<u8>, right: Vec<u8>) {
//! let viewer = DualPaneViewer::new(ViewerConfig::default());
//! let _ = viewer.load(PaneId::Left, "a.pdf", left).await;
//! let _ = viewer.load(PaneId::Right, "b.pdf", right).await;
//!
//! viewer.set_page(3).await;
//! viewer.set_synchronized(false).await;
//! viewer.on_wheel(PaneId::Right, WheelInput::new(120.0)).await;
//! println!("{}", viewer.pager().page_input);
//! # }
//! ```

mod error;
mod status;
mod viewer;

pub use error::ViewerError;
pub use status::PaneStatus;
pub use viewer::DualPaneViewer;

pub use viewer_core::{
    Key, KeyInput, NavigationState, PagerView, PaneId, ViewerAction, ViewerConfig, WheelInput,
};
