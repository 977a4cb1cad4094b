//! Mapping of raw wheel, keyboard and text input onto viewer actions.

use crate::pane::PaneId;

/// A wheel event over one pane.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WheelInput {
    pub delta_y: f64,
    pub ctrl: bool,
    pub meta: bool,
}

impl WheelInput {
    pub fn new(delta_y: f64) -> Self {
        Self { delta_y, ..Self::default() }
    }

    fn zoom_modifier(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// Page step for a wheel event, or `None` when the event should fall through.
///
/// Ctrl/meta wheel belongs to the host (browser zoom), and small deltas are
/// trackpad noise rather than an intent to page.
pub fn wheel_step(input: &WheelInput, threshold: f64) -> Option<i64> {
    if input.zoom_modifier() || !input.delta_y.is_finite() {
        return None;
    }
    if input.delta_y.abs() < threshold {
        return None;
    }
    Some(if input.delta_y > 0.0 { 1 } else { -1 })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    ArrowLeft,
    ArrowRight,
    Char(char),
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyInput {
    pub key: Key,
    pub ctrl: bool,
    pub meta: bool,
}

impl KeyInput {
    pub fn plain(key: Key) -> Self {
        Self { key, ctrl: false, meta: false }
    }

    pub fn with_ctrl(key: Key) -> Self {
        Self { key, ctrl: true, meta: false }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewerAction {
    PreviousPage,
    NextPage,
    GoToPage(i64),
    /// Page the active pane (or both, when synchronized).
    StepActivePane(i64),
    /// Page one pane (or both, when synchronized).
    StepPane { pane: PaneId, delta: i64 },
    ZoomIn,
    ZoomOut,
    ResetZoom,
    SetZoom(f32),
    SetSynchronized(bool),
    ActivatePane(PaneId),
}

/// Keyboard shortcuts: arrows page, ctrl/meta `+ = - _ 0` zoom.
pub fn map_key(input: &KeyInput) -> Option<ViewerAction> {
    let modified = input.ctrl || input.meta;

    match input.key {
        Key::ArrowLeft => Some(ViewerAction::StepActivePane(-1)),
        Key::ArrowRight => Some(ViewerAction::StepActivePane(1)),
        Key::Char('+' | '=') if modified => Some(ViewerAction::ZoomIn),
        Key::Char('-' | '_') if modified => Some(ViewerAction::ZoomOut),
        Key::Char('0') if modified => Some(ViewerAction::ResetZoom),
        _ => None,
    }
}

/// Parses the page-number field.
///
/// Reads the leading integer after optional whitespace and sign, so `"12abc"`
/// is page 12. An empty field means page 1; text without a leading integer
/// yields `None`.
pub fn parse_page_input(text: &str) -> Option<i64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Some(1);
    }

    let (negative, digits) = match trimmed.as_bytes()[0] {
        b'-' => (true, &trimmed[1..]),
        b'+' => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let mut value: i64 = 0;
    let mut seen = false;
    for byte in digits.bytes().take_while(u8::is_ascii_digit) {
        seen = true;
        value = value.saturating_mul(10).saturating_add(i64::from(byte - b'0'));
    }

    seen.then_some(if negative { -value } else { value })
}
