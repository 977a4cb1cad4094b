use image::{ImageBuffer, Rgba};
use lopdf::Document;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub type RgbaImage = ImageBuffer<Rgba<u8>, Vec<u8>>;

/// Shared reference to a decoded document.
///
/// Handles are cheap to clone and may be moved onto the blocking pool for
/// rasterization while the owning pane keeps its own copy.
pub type DocumentHandle = Arc<dyn PdfDocument>;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSize {
    pub width_pt: f32,
    pub height_pt: f32,
}

impl PageSize {
    pub const LETTER: Self = Self { width_pt: 612.0, height_pt: 792.0 };

    /// Pixel dimensions of this page at `scale` (zoom times device scale).
    ///
    /// Fractional pixels are floored and each side is at least one pixel.
    pub fn pixel_size(self, scale: f32) -> (u32, u32) {
        let scale = if scale.is_finite() && scale > 0.0 { scale } else { 1.0 };
        let width = (self.width_pt * scale).floor().max(1.0) as u32;
        let height = (self.height_pt * scale).floor().max(1.0) as u32;
        (width, height)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderRequest {
    /// Zero-based page index.
    pub page_index: u32,
    pub scale: f32,
}

impl Default for RenderRequest {
    fn default() -> Self {
        Self { page_index: 0, scale: 1.0 }
    }
}

#[derive(Debug, Clone)]
pub enum OpenSource {
    Path(PathBuf),
    Bytes(Vec<u8>),
}

impl From<PathBuf> for OpenSource {
    fn from(value: PathBuf) -> Self {
        Self::Path(value)
    }
}

impl From<&Path> for OpenSource {
    fn from(value: &Path) -> Self {
        Self::Path(value.to_path_buf())
    }
}

impl From<Vec<u8>> for OpenSource {
    fn from(value: Vec<u8>) -> Self {
        Self::Bytes(value)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PdfEngineError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("PDF parse error: {0}")]
    Parse(#[from] lopdf::Error),
    #[error("page {page} out of range (page_count={page_count})")]
    PageOutOfRange { page: u32, page_count: u32 },
    #[error("encrypted PDFs are not supported in the default backend")]
    EncryptedUnsupported,
    #[error("document has no pages")]
    NoPages,
    #[error("backend error: {0}")]
    Backend(String),
}

/// A decoded document: page count, page geometry and rasterization.
pub trait PdfDocument: Send + Sync + fmt::Debug {
    fn page_count(&self) -> u32;
    fn page_size(&self, page_index: u32) -> Result<PageSize, PdfEngineError>;
    fn render_page(&self, request: RenderRequest) -> Result<RgbaImage, PdfEngineError>;
}

/// Decodes raw input into a [`DocumentHandle`].
pub trait PdfEngine: Send + Sync {
    fn open(&self, source: OpenSource) -> Result<DocumentHandle, PdfEngineError>;
}

fn read_source(source: OpenSource) -> Result<Vec<u8>, PdfEngineError> {
    match source {
        OpenSource::Path(path) => Ok(fs::read(path)?),
        OpenSource::Bytes(bytes) => Ok(bytes),
    }
}

fn parse_sizes(bytes: &[u8]) -> Result<Vec<PageSize>, PdfEngineError> {
    if bytes.windows("/Encrypt".len()).any(|window| window == b"/Encrypt") {
        return Err(PdfEngineError::EncryptedUnsupported);
    }

    let doc = Document::load_mem(bytes)?;
    let pages = doc.get_pages();
    let mut sizes = Vec::with_capacity(pages.len());

    for (_, object_id) in pages {
        let dict = doc.get_dictionary(object_id)?;
        let size = dict
            .get(b"MediaBox")
            .ok()
            .and_then(|obj| obj.as_array().ok())
            .and_then(|array| {
                if array.len() != 4 {
                    return None;
                }
                let x0 = array[0].as_float().ok()?;
                let y0 = array[1].as_float().ok()?;
                let x1 = array[2].as_float().ok()?;
                let y1 = array[3].as_float().ok()?;
                Some(PageSize { width_pt: (x1 - x0).abs(), height_pt: (y1 - y0).abs() })
            })
            .unwrap_or(PageSize::LETTER);

        sizes.push(size);
    }

    if sizes.is_empty() {
        return Err(PdfEngineError::NoPages);
    }

    Ok(sizes)
}

#[derive(Debug, Clone)]
struct LopdfDocument {
    page_sizes: Vec<PageSize>,
}

impl PdfDocument for LopdfDocument {
    fn page_count(&self) -> u32 {
        self.page_sizes.len() as u32
    }

    fn page_size(&self, page_index: u32) -> Result<PageSize, PdfEngineError> {
        self.page_sizes.get(page_index as usize).copied().ok_or(PdfEngineError::PageOutOfRange {
            page: page_index,
            page_count: self.page_count(),
        })
    }

    /// Rasterizes a blank page with a light border at the requested scale.
    ///
    /// lopdf does not interpret content streams, so this backend only
    /// guarantees correct geometry. Enable the `pdfium` feature for content.
    fn render_page(&self, request: RenderRequest) -> Result<RgbaImage, PdfEngineError> {
        let page_size = self.page_size(request.page_index)?;
        let (width, height) = page_size.pixel_size(request.scale);

        let mut image = RgbaImage::from_pixel(width, height, Rgba([255, 255, 255, 255]));

        if width >= 4 && height >= 4 {
            for x in 0..width {
                image.put_pixel(x, 0, Rgba([220, 220, 220, 255]));
                image.put_pixel(x, height - 1, Rgba([220, 220, 220, 255]));
            }
            for y in 0..height {
                image.put_pixel(0, y, Rgba([220, 220, 220, 255]));
                image.put_pixel(width - 1, y, Rgba([220, 220, 220, 255]));
            }
        }

        Ok(image)
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct LopdfEngine;

impl LopdfEngine {
    pub fn new() -> Self {
        Self
    }
}

impl PdfEngine for LopdfEngine {
    fn open(&self, source: OpenSource) -> Result<DocumentHandle, PdfEngineError> {
        let bytes = read_source(source)?;
        let page_sizes = parse_sizes(&bytes)?;

        Ok(Arc::new(LopdfDocument { page_sizes }))
    }
}

#[cfg(feature = "pdfium")]
pub mod pdfium_backend {
    use super::*;
    use pdfium_render::prelude::{PdfRenderConfig, Pdfium};
    use std::sync::Mutex;

    // libpdfium is not reentrant; both panes may rasterize at once.
    static PDFIUM_LOCK: Mutex<()> = Mutex::new(());

    #[derive(Debug, Default, Clone, Copy)]
    pub struct PdfiumEngine;

    impl PdfiumEngine {
        pub fn from_system_library() -> Result<Self, PdfEngineError> {
            let _ = Pdfium::bind_to_system_library().map_err(|err| {
                PdfEngineError::Backend(format!("failed to bind pdfium system library: {err}"))
            })?;

            Ok(Self)
        }
    }

    struct PdfiumDocument {
        bytes: Arc<[u8]>,
        page_sizes: Vec<PageSize>,
    }

    impl fmt::Debug for PdfiumDocument {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.debug_struct("PdfiumDocument")
                .field("bytes", &self.bytes.len())
                .field("page_sizes", &self.page_sizes.len())
                .finish()
        }
    }

    fn backend_error(err: impl fmt::Display) -> PdfEngineError {
        PdfEngineError::Backend(err.to_string())
    }

    impl PdfDocument for PdfiumDocument {
        fn page_count(&self) -> u32 {
            self.page_sizes.len() as u32
        }

        fn page_size(&self, page_index: u32) -> Result<PageSize, PdfEngineError> {
            self.page_sizes.get(page_index as usize).copied().ok_or(
                PdfEngineError::PageOutOfRange { page: page_index, page_count: self.page_count() },
            )
        }

        fn render_page(&self, request: RenderRequest) -> Result<RgbaImage, PdfEngineError> {
            let (width, height) = self.page_size(request.page_index)?.pixel_size(request.scale);

            let _guard = PDFIUM_LOCK.lock().map_err(backend_error)?;
            let bindings = Pdfium::bind_to_system_library().map_err(backend_error)?;
            let pdfium = Pdfium::new(bindings);
            let document =
                pdfium.load_pdf_from_byte_slice(&self.bytes, None).map_err(backend_error)?;
            let page = document.pages().get(request.page_index as u16).map_err(backend_error)?;

            let config = PdfRenderConfig::new()
                .set_target_width(width as i32)
                .set_target_height(height as i32);
            let bitmap = page.render_with_config(&config).map_err(backend_error)?;

            let (rendered_width, rendered_height) =
                (bitmap.width().max(1) as u32, bitmap.height().max(1) as u32);

            RgbaImage::from_raw(rendered_width, rendered_height, bitmap.as_rgba_bytes())
                .ok_or_else(|| PdfEngineError::Backend("pdfium bitmap size mismatch".to_owned()))
        }
    }

    impl PdfEngine for PdfiumEngine {
        fn open(&self, source: OpenSource) -> Result<DocumentHandle, PdfEngineError> {
            let bytes = read_source(source)?;
            let page_sizes = parse_sizes(&bytes)?;

            Ok(Arc::new(PdfiumDocument { bytes: Arc::from(bytes), page_sizes }))
        }
    }
}

pub fn default_engine() -> LopdfEngine {
    LopdfEngine::new()
}
