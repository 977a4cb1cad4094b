mod support;

use pdf_engine::{DocumentHandle, LopdfEngine, OpenSource, PdfEngine, PdfEngineError};
use std::sync::{mpsc, Arc, Mutex};
use support::{blank_pdf, corrupt_pdf, init_tracing};
use twinpage::{
    DualPaneViewer, Key, KeyInput, PaneId, PaneStatus, ViewerConfig, ViewerError, WheelInput,
};
use twinpage_scheduler::EngineRasterizer;

async fn viewer_with(left: usize, right: usize) -> DualPaneViewer {
    init_tracing();
    let viewer = DualPaneViewer::new(ViewerConfig::default());
    let (left_loaded, right_loaded) = futures::future::join(
        viewer.load(PaneId::Left, "left.pdf", blank_pdf(left)),
        viewer.load(PaneId::Right, "right.pdf", blank_pdf(right)),
    )
    .await;
    assert_eq!(left_loaded.expect("left should load"), left as u32);
    assert_eq!(right_loaded.expect("right should load"), right as u32);
    viewer
}

fn displayed(viewer: &DualPaneViewer) -> (Option<u32>, Option<u32>) {
    (viewer.displayed_page(PaneId::Left), viewer.displayed_page(PaneId::Right))
}

#[tokio::test]
async fn loading_shows_first_page_on_both_panes() {
    let viewer = viewer_with(4, 6).await;

    assert_eq!(displayed(&viewer), (Some(1), Some(1)));
    assert_eq!(viewer.status(PaneId::Left).to_string(), "left.pdf • 4 pages");
    assert_eq!(viewer.status(PaneId::Right).to_string(), "right.pdf • 6 pages");
    assert_eq!(viewer.page_range(), 1..=4);
}

#[tokio::test]
async fn synchronized_set_page_renders_both_panes() {
    let viewer = viewer_with(7, 7).await;

    for page in 1..=7 {
        viewer.set_page(page).await;
        assert_eq!(displayed(&viewer), (Some(page as u32), Some(page as u32)));
    }
}

#[tokio::test]
async fn set_page_clamps_to_combined_range() {
    let viewer = viewer_with(10, 10).await;

    viewer.set_page(0).await;
    assert_eq!(viewer.navigation().current_page, 1);
    assert_eq!(displayed(&viewer), (Some(1), Some(1)));

    viewer.set_page(10_000).await;
    assert_eq!(viewer.navigation().current_page, 10);
    assert_eq!(displayed(&viewer), (Some(10), Some(10)));
}

#[tokio::test]
async fn shorter_document_bounds_the_shared_range() {
    let viewer = viewer_with(5, 3).await;
    assert_eq!(viewer.page_range(), 1..=3);

    viewer.set_page(5).await;

    assert_eq!(viewer.navigation().current_page, 3);
    assert_eq!(displayed(&viewer), (Some(3), Some(3)));
}

#[tokio::test]
async fn set_page_is_idempotent() {
    let viewer = viewer_with(6, 6).await;

    viewer.set_page(4).await;
    let first = (viewer.navigation(), displayed(&viewer));
    viewer.set_page(4).await;

    assert_eq!((viewer.navigation(), displayed(&viewer)), first);
}

#[tokio::test]
async fn zoom_is_clamped_and_applied_to_surfaces() {
    let viewer = viewer_with(2, 2).await;

    viewer.set_zoom(0.01).await;
    assert_eq!(viewer.navigation().zoom, 0.25);
    assert_eq!(viewer.pane(PaneId::Left).surface().size_px(), (153, 198));

    viewer.set_zoom(100.0).await;
    assert_eq!(viewer.navigation().zoom, 4.0);
    assert_eq!(viewer.pane(PaneId::Right).surface().size_px(), (2448, 3168));
    assert_eq!(viewer.pager().zoom_label, "400%");
}

#[tokio::test]
async fn device_scale_multiplies_backing_store() {
    let viewer = viewer_with(1, 1).await;

    viewer.set_device_scale(2.0);
    viewer.render_all().await;

    let surface = viewer.pane(PaneId::Left).surface();
    assert_eq!(surface.size_px(), (1224, 1584));
    assert_eq!(surface.css_size(), (612.0, 792.0));
}

#[tokio::test]
async fn independent_wheel_pages_only_that_pane() {
    let viewer = viewer_with(5, 3).await;
    viewer.set_page(2).await;
    viewer.set_synchronized(false).await;

    let consumed = viewer.on_wheel(PaneId::Right, WheelInput::new(240.0)).await;

    assert!(consumed);
    assert_eq!(displayed(&viewer), (Some(2), Some(3)));
    assert_eq!(viewer.navigation().current_page, 3);
}

#[tokio::test]
async fn small_or_modified_wheel_is_not_consumed() {
    let viewer = viewer_with(5, 5).await;

    assert!(!viewer.on_wheel(PaneId::Left, WheelInput::new(10.0)).await);
    let pinch = WheelInput { delta_y: 200.0, ctrl: true, meta: false };
    assert!(!viewer.on_wheel(PaneId::Left, pinch).await);
    assert_eq!(displayed(&viewer), (Some(1), Some(1)));
}

#[tokio::test]
async fn failed_load_falls_back_to_other_pane() {
    init_tracing();
    let viewer = DualPaneViewer::new(ViewerConfig::default());

    let left = viewer.load(PaneId::Left, "broken.pdf", corrupt_pdf()).await;
    let right = viewer.load(PaneId::Right, "fine.pdf", blank_pdf(4)).await;

    assert!(matches!(left, Err(ViewerError::Load { pane: PaneId::Left, .. })));
    assert_eq!(right.expect("right should load"), 4);
    assert_eq!(viewer.status(PaneId::Left), PaneStatus::Failed);
    assert_eq!(viewer.status(PaneId::Left).to_string(), "Failed to load PDF");
    assert!(viewer.status(PaneId::Right).is_loaded());
    assert_eq!(viewer.page_range(), 1..=4);

    viewer.set_page(4).await;
    assert_eq!(displayed(&viewer), (None, Some(4)));
}

#[tokio::test]
async fn replacing_with_a_broken_file_keeps_other_pane() {
    let viewer = viewer_with(8, 3).await;
    viewer.set_page(3).await;

    let result = viewer.load(PaneId::Right, "broken.pdf", corrupt_pdf()).await;

    assert!(result.is_err());
    assert!(!viewer.pane(PaneId::Right).is_loaded());
    assert_eq!(viewer.page_range(), 1..=8);
    assert_eq!(viewer.displayed_page(PaneId::Left), Some(3));

    viewer.set_page(8).await;
    assert_eq!(viewer.displayed_page(PaneId::Left), Some(8));
}

#[tokio::test]
async fn rapid_paging_settles_on_last_request() {
    let viewer = viewer_with(9, 9).await;

    futures::future::join3(viewer.set_page(3), viewer.set_page(6), viewer.set_page(8)).await;

    assert_eq!(viewer.navigation().current_page, 8);
    assert_eq!(displayed(&viewer), (Some(8), Some(8)));
    assert!(!viewer.pane(PaneId::Left).is_rendering());
    assert!(!viewer.pane(PaneId::Right).is_rendering());
}

#[tokio::test]
async fn keyboard_follows_active_pane_when_independent() {
    let viewer = viewer_with(4, 4).await;
    viewer.set_synchronized(false).await;
    viewer.set_active_pane(PaneId::Right);

    assert!(viewer.on_key(KeyInput::plain(Key::ArrowRight)).await);
    assert!(viewer.on_key(KeyInput::plain(Key::ArrowRight)).await);
    assert_eq!(displayed(&viewer), (Some(1), Some(3)));

    viewer.set_active_pane(PaneId::Left);
    assert!(viewer.on_key(KeyInput::plain(Key::ArrowLeft)).await);
    assert_eq!(displayed(&viewer), (Some(1), Some(3)));

    assert!(viewer.on_key(KeyInput::with_ctrl(Key::Char('+'))).await);
    assert!((viewer.navigation().zoom - 1.1).abs() < 1e-6);
    assert!(!viewer.on_key(KeyInput::plain(Key::Char('x'))).await);
}

#[tokio::test]
async fn resync_aligns_on_active_pane() {
    let viewer = viewer_with(6, 6).await;
    viewer.set_synchronized(false).await;
    viewer.set_active_pane(PaneId::Right);
    viewer.on_key(KeyInput::plain(Key::ArrowRight)).await;
    viewer.on_key(KeyInput::plain(Key::ArrowRight)).await;

    viewer.set_synchronized(true).await;

    assert_eq!(viewer.navigation().current_page, 3);
    assert_eq!(displayed(&viewer), (Some(3), Some(3)));
}

#[tokio::test]
async fn page_input_and_pager_view() {
    let viewer = viewer_with(5, 5).await;

    assert!(viewer.submit_page_input(" 4 ").await);
    assert!(!viewer.submit_page_input("four").await);

    let pager = viewer.pager();
    assert_eq!(pager.page_input, "4");
    assert_eq!(pager.page_count_label, "5");
    assert!(pager.prev_enabled);
    assert!(pager.next_enabled);
    assert!(pager.controls_enabled);

    viewer.next_page().await;
    assert!(!viewer.pager().next_enabled);
    viewer.previous_page().await;
    assert_eq!(displayed(&viewer), (Some(4), Some(4)));
}

#[tokio::test]
async fn empty_viewer_ignores_input() {
    init_tracing();
    let viewer = DualPaneViewer::new(ViewerConfig::default());

    assert!(!viewer.on_key(KeyInput::plain(Key::ArrowRight)).await);
    assert!(!viewer.on_wheel(PaneId::Left, WheelInput::new(500.0)).await);
    viewer.set_page(5).await;

    assert_eq!(viewer.navigation().current_page, 1);
    assert_eq!(viewer.pager().page_count_label, "—");
    assert_eq!(viewer.status(PaneId::Left), PaneStatus::Empty);
}

/// Engine that blocks opening `held` until the test signals it.
struct HeldEngine {
    inner: LopdfEngine,
    held: Vec<u8>,
    release: Mutex<Option<mpsc::Receiver<()>>>,
}

impl PdfEngine for HeldEngine {
    fn open(&self, source: OpenSource) -> Result<DocumentHandle, PdfEngineError> {
        if matches!(&source, OpenSource::Bytes(bytes) if *bytes == self.held) {
            let release = self.release.lock().expect("release lock").take();
            if let Some(release) = release {
                let _ = release.recv();
            }
        }
        self.inner.open(source)
    }
}

#[tokio::test]
async fn slower_older_load_does_not_replace_newer_document() {
    init_tracing();
    let (release, held_open) = mpsc::channel();
    let engine = Arc::new(HeldEngine {
        inner: LopdfEngine::new(),
        held: blank_pdf(8),
        release: Mutex::new(Some(held_open)),
    });
    let viewer =
        DualPaneViewer::with_parts(ViewerConfig::default(), engine, Arc::new(EngineRasterizer));

    let newer = async {
        tokio::task::yield_now().await;
        let loaded = viewer.load(PaneId::Left, "new.pdf", blank_pdf(3)).await;
        release.send(()).expect("older load is waiting");
        loaded
    };
    let (older, newer) =
        futures::future::join(viewer.load(PaneId::Left, "old.pdf", blank_pdf(8)), newer).await;

    assert!(matches!(older, Err(ViewerError::Superseded { pane: PaneId::Left })));
    assert_eq!(newer.expect("newer load should win"), 3);
    assert_eq!(viewer.status(PaneId::Left).to_string(), "new.pdf • 3 pages");
    assert_eq!(viewer.pane(PaneId::Left).page_count(), 3);
    assert_eq!(viewer.page_range(), 1..=3);
}

#[tokio::test]
async fn inverted_zoom_config_still_builds_a_viewer() {
    init_tracing();
    let config = ViewerConfig { min_zoom: 3.0, max_zoom: 0.5, ..ViewerConfig::default() };
    let viewer = DualPaneViewer::new(config);
    viewer.load(PaneId::Left, "left.pdf", blank_pdf(2)).await.expect("left should load");

    viewer.set_zoom(10.0).await;

    assert_eq!(viewer.navigation().zoom, 3.0);
    assert_eq!(viewer.pager().zoom_label, "300%");
}
