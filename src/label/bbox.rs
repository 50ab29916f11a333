use geo::Rect;
use rstar::{RTreeObject, AABB};

/// R-tree entry pointing back at a label polygon by bucket index.
#[derive(Debug, Clone)]
pub(super) struct PolyBound {
    idx: usize,
    envelope: AABB<[f64; 2]>,
}

impl PolyBound {
    pub(super) fn new(idx: usize, bbox: Rect<f64>) -> Self {
        let envelope = AABB::from_corners(bbox.min().into(), bbox.max().into());
        Self { idx, envelope }
    }

    pub(super) fn idx(&self) -> usize { self.idx }
}

impl RTreeObject for PolyBound {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}
