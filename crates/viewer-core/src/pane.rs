//! Pane identifiers and a fixed two-slot container keyed by them.

use std::fmt;
use std::ops::{Index, IndexMut};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PaneId {
    #[default]
    Left,
    Right,
}

impl PaneId {
    pub const ALL: [PaneId; 2] = [PaneId::Left, PaneId::Right];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

impl fmt::Display for PaneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One value per pane.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PaneMap<T> {
    pub left: T,
    pub right: T,
}

impl<T> PaneMap<T> {
    pub fn from_fn(mut f: impl FnMut(PaneId) -> T) -> Self {
        Self { left: f(PaneId::Left), right: f(PaneId::Right) }
    }

    pub fn get(&self, pane: PaneId) -> &T {
        match pane {
            PaneId::Left => &self.left,
            PaneId::Right => &self.right,
        }
    }

    pub fn get_mut(&mut self, pane: PaneId) -> &mut T {
        match pane {
            PaneId::Left => &mut self.left,
            PaneId::Right => &mut self.right,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (PaneId, &T)> {
        [(PaneId::Left, &self.left), (PaneId::Right, &self.right)].into_iter()
    }
}

impl<T> Index<PaneId> for PaneMap<T> {
    type Output = T;

    fn index(&self, pane: PaneId) -> &T {
        self.get(pane)
    }
}

impl<T> IndexMut<PaneId> for PaneMap<T> {
    fn index_mut(&mut self, pane: PaneId) -> &mut T {
        self.get_mut(pane)
    }
}
