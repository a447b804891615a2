//! Subtree contours for sibling separation.
//!
//! A contour is the profile a subtree shows to one side: a set of boxes, each
//! a closed depth interval plus the outermost breadth edge reached inside it.
//! Boxes hidden behind another box of the same contour are pruned, so the
//! list stays close to the true profile instead of growing with every
//! descendant.

/// One step of a contour
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct ContourBox {
    /// Depth interval start (inclusive)
    pub lo: f64,
    /// Depth interval end (inclusive)
    pub hi: f64,
    /// Breadth edge: the minimum on a left contour, the maximum on a right one
    pub edge: f64,
}

impl ContourBox {
    fn overlaps(&self, other: &ContourBox) -> bool {
        self.lo <= other.hi && other.lo <= self.hi
    }

    fn covers(&self, other: &ContourBox) -> bool {
        self.lo <= other.lo && self.hi >= other.hi
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Side {
    Left,
    Right,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Contour {
    side: Side,
    boxes: Vec<ContourBox>,
}

impl Contour {
    /// Contour of a single node box
    pub fn single(side: Side, lo: f64, hi: f64, edge: f64) -> Self {
        Self {
            side,
            boxes: vec![ContourBox { lo, hi, edge }],
        }
    }

    #[cfg(test)]
    pub fn boxes(&self) -> &[ContourBox] {
        &self.boxes
    }

    /// Copy translated by `breadth` and `depth`
    pub fn shifted(&self, breadth: f64, depth: f64) -> Self {
        Self {
            side: self.side,
            boxes: self
                .boxes
                .iter()
                .map(|b| ContourBox {
                    lo: b.lo + depth,
                    hi: b.hi + depth,
                    edge: b.edge + breadth,
                })
                .collect(),
        }
    }

    /// Fold `other` (same side) into this contour
    pub fn merge(&mut self, other: &Contour) {
        debug_assert_eq!(self.side, other.side);
        for candidate in &other.boxes {
            self.push(*candidate);
        }
    }

    fn dominates(&self, outer: &ContourBox, inner: &ContourBox) -> bool {
        outer.covers(inner)
            && match self.side {
                Side::Left => outer.edge <= inner.edge,
                Side::Right => outer.edge >= inner.edge,
            }
    }

    fn push(&mut self, candidate: ContourBox) {
        if self.boxes.iter().any(|b| self.dominates(b, &candidate)) {
            return;
        }
        let side = self.side;
        self.boxes.retain(|b| {
            !(candidate.covers(b)
                && match side {
                    Side::Left => candidate.edge <= b.edge,
                    Side::Right => candidate.edge >= b.edge,
                })
        });
        self.boxes.push(candidate);
    }

    /// Smallest breadth shift for `left` that keeps it `gap` clear of `right`.
    ///
    /// `right` is the right contour of what is already placed, `left` the left
    /// contour of the subtree being placed at shift zero. Returns `None` when
    /// the two never share a depth.
    pub fn separation(right: &Contour, left: &Contour, gap: f64) -> Option<f64> {
        debug_assert_eq!(right.side, Side::Right);
        debug_assert_eq!(left.side, Side::Left);
        let mut needed: Option<f64> = None;
        for r in &right.boxes {
            for l in left.boxes.iter().filter(|l| r.overlaps(l)) {
                let shift = r.edge + gap - l.edge;
                needed = Some(needed.map_or(shift, |current| current.max(shift)));
            }
        }
        needed
    }
}
