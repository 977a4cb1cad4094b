//! Pane-scoped status line.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PaneStatus {
    #[default]
    Empty,
    Loading,
    Loaded {
        name: String,
        pages: u32,
    },
    Failed,
}

impl PaneStatus {
    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded { .. })
    }
}

impl fmt::Display for PaneStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => Ok(()),
            Self::Loading => f.write_str("Loading…"),
            Self::Loaded { name, pages } => write!(f, "{name} • {pages} pages"),
            Self::Failed => f.write_str("Failed to load PDF"),
        }
    }
}
