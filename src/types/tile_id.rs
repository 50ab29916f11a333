use std::{fmt, sync::Arc};

/// Stable identifier for a tile: the owning location's name plus the tile's
/// row-major index in the tiling lattice. Regenerating the same region with
/// the same maxima yields the same ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TileId {
    pub location: Arc<str>,
    pub index: usize,
}

impl TileId {
    pub fn new(location: impl Into<Arc<str>>, index: usize) -> Self {
        Self { location: location.into(), index }
    }
}

impl fmt::Display for TileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.location, self.index)
    }
}
