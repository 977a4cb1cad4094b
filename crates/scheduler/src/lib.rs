//! Render Scheduler
//!
//! Per-pane render coordination with single-flight coalescing.
//!
//! Each pane owns a [`RenderCoordinator`]. At most one rasterization runs per
//! pane; requests that arrive while it is busy replace a single pending slot
//! rather than queueing, so the pane always ends on the most recent request.
//! Two coordinators never wait on each other.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use pdf_engine::{default_engine, OpenSource, PdfEngine};
//! use twinpage_scheduler::{EngineRasterizer, RenderCoordinator, RenderOutcome};
//!
//! # async fn demo(bytes: Vec<u8>) -> Result<(), pdf_engine::PdfEngineError> {
//! let pane = RenderCoordinator::new("left", Arc::new(EngineRasterizer));
//! pane.attach(default_engine().open(OpenSource::Bytes(bytes))?);
//!
//! if let RenderOutcome::Settled(summary) = pane.request_render(1, 1.0).await {
//!     println!("rendered page {}", summary.last.page);
//! }
//! # Ok(())
//! # }
//! ```

mod coordinator;
mod rasterizer;
mod stats;
mod surface;

pub use coordinator::{PageRequest, PaneState, RenderCoordinator, RenderOutcome, RenderSummary};
pub use rasterizer::{EngineRasterizer, RasterRequest, Rasterizer, RenderError};
pub use stats::RenderStats;
pub use surface::{Frame, PaneSurface};
