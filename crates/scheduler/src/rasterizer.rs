//! Asynchronous rasterization seam.
//!
//! Rasterizing a page is long-running, so the coordinator awaits it instead
//! of blocking the thread that drives navigation.

use async_trait::async_trait;
use pdf_engine::{DocumentHandle, PdfEngineError, RenderRequest, RgbaImage};

/// One page rasterization.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RasterRequest {
    /// 1-based page number.
    pub page: u32,
    pub zoom: f32,
    /// Clamped device pixel ratio.
    pub device_scale: f32,
}

impl RasterRequest {
    /// Combined scale handed to the engine.
    pub fn scale(&self) -> f32 {
        self.zoom * self.device_scale
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("rasterization failed: {0}")]
    Engine(#[from] PdfEngineError),
    #[error("rasterization task did not complete: {0}")]
    Task(String),
}

#[async_trait]
pub trait Rasterizer: Send + Sync {
    async fn rasterize(
        &self,
        document: DocumentHandle,
        request: RasterRequest,
    ) -> Result<RgbaImage, RenderError>;
}

/// Rasterizes through the document's own engine on the blocking pool.
#[derive(Debug, Default, Clone, Copy)]
pub struct EngineRasterizer;

#[async_trait]
impl Rasterizer for EngineRasterizer {
    async fn rasterize(
        &self,
        document: DocumentHandle,
        request: RasterRequest,
    ) -> Result<RgbaImage, RenderError> {
        let render = RenderRequest { page_index: request.page.saturating_sub(1), scale: request.scale() };

        let image = tokio::task::spawn_blocking(move || document.render_page(render))
            .await
            .map_err(|err| RenderError::Task(err.to_string()))??;

        Ok(image)
    }
}
