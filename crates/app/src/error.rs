use pdf_engine::PdfEngineError;
use viewer_core::PaneId;

#[derive(Debug, thiserror::Error)]
pub enum ViewerError {
    #[error("failed to load {pane} document: {source}")]
    Load {
        pane: PaneId,
        #[source]
        source: PdfEngineError,
    },
    /// A newer load on the same pane finished first.
    #[error("load of {pane} document was superseded by a newer load")]
    Superseded { pane: PaneId },
    #[error("background task failed: {0}")]
    Task(String),
}
