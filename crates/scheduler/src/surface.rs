//! Per-pane drawing surface.

use pdf_engine::RgbaImage;

/// A rasterized page as presented on a surface.
#[derive(Debug, Clone)]
pub struct Frame {
    pub page: u32,
    pub zoom: f32,
    pub image: RgbaImage,
}

/// Backing store for one pane.
///
/// The surface is resized and cleared immediately before each new frame so
/// that nothing from a previous page or zoom shows through. A failed render
/// never touches it, leaving the last good frame visible.
#[derive(Debug, Clone, Default)]
pub struct PaneSurface {
    width_px: u32,
    height_px: u32,
    device_scale: f32,
    frame: Option<Frame>,
    presented: u64,
}

impl PaneSurface {
    pub fn new() -> Self {
        Self { device_scale: 1.0, ..Self::default() }
    }

    /// Resizes the backing store and drops the current frame.
    pub fn prepare(&mut self, width_px: u32, height_px: u32, device_scale: f32) {
        self.width_px = width_px;
        self.height_px = height_px;
        self.device_scale = device_scale;
        self.frame = None;
    }

    /// Shows `frame` on a store already sized by [`prepare`](Self::prepare).
    pub fn present(&mut self, frame: Frame) {
        self.frame = Some(frame);
        self.presented += 1;
    }

    pub fn frame(&self) -> Option<&Frame> {
        self.frame.as_ref()
    }

    /// Page of the frame on screen, if any.
    pub fn page(&self) -> Option<u32> {
        self.frame.as_ref().map(|frame| frame.page)
    }

    /// Backing store size in device pixels.
    pub fn size_px(&self) -> (u32, u32) {
        (self.width_px, self.height_px)
    }

    /// Layout size in logical pixels.
    pub fn css_size(&self) -> (f32, f32) {
        let scale = if self.device_scale > 0.0 { self.device_scale } else { 1.0 };
        (self.width_px as f32 / scale, self.height_px as f32 / scale)
    }

    /// Number of frames presented so far.
    pub fn presented(&self) -> u64 {
        self.presented
    }
}
