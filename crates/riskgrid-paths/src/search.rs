use riskgrid_core::{OutOfBoundsError, Point, Range};

/// Sentinel value meaning "not reached" in distance queries.
pub const UNREACHABLE: i32 = i32::MAX;

// ---------------------------------------------------------------------------
// Internal node state for the priority-queue search
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub(crate) struct Node {
    pub(crate) dist: i32,
    pub(crate) parent: usize,
    pub(crate) generation: u32,
    pub(crate) open: bool,
}

impl Default for Node {
    fn default() -> Self {
        Self {
            dist: UNREACHABLE,
            parent: usize::MAX,
            generation: 0,
            open: false,
        }
    }
}

/// Reference into the node array, ordered for use in `BinaryHeap`.
#[derive(Clone, Copy, Eq, PartialEq)]
pub(crate) struct NodeRef {
    pub(crate) idx: usize,
    pub(crate) dist: i32,
}

impl Ord for NodeRef {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // Reverse so BinaryHeap (max-heap) pops the smallest distance first;
        // ties go to the smaller row-major index.
        other
            .dist
            .cmp(&self.dist)
            .then(other.idx.cmp(&self.idx))
    }
}

impl PartialOrd for NodeRef {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

// ---------------------------------------------------------------------------
// SearchRange
// ---------------------------------------------------------------------------

/// Central coordinator for shortest-path searches on a grid rectangle.
///
/// `SearchRange` owns the distance table, predecessor links and scratch
/// buffers, so repeated searches incur no allocations after the first use.
/// Run a search with [`shortest_path`](Self::shortest_path), then query its
/// results via [`distance_at`](Self::distance_at),
/// [`predecessor_at`](Self::predecessor_at) and [`path_to`](Self::path_to).
pub struct SearchRange {
    pub(crate) rng: Range,
    pub(crate) width: usize,
    pub(crate) nodes: Vec<Node>,
    pub(crate) generation: u32,
    pub(crate) nbuf: Vec<Point>,
}

impl SearchRange {
    /// Create a new `SearchRange` for the given grid rectangle.
    pub fn new(rng: Range) -> Self {
        let w = rng.width().max(0) as usize;
        Self {
            rng,
            width: w,
            nodes: vec![Node::default(); rng.len()],
            generation: 0,
            nbuf: Vec::with_capacity(4),
        }
    }

    /// Replace the underlying range, reallocating caches as needed.
    ///
    /// If the new size fits within existing capacity, the node array is
    /// preserved and only the generation counter is bumped so stale
    /// entries are ignored. Otherwise the array is reallocated.
    pub fn set_range(&mut self, rng: Range) {
        let new_len = rng.len();
        let capacity = self.nodes.len();
        self.rng = rng;
        self.width = rng.width().max(0) as usize;

        if new_len <= capacity {
            self.generation = self.generation.wrapping_add(1);
            return;
        }

        self.nodes.clear();
        self.nodes.resize(new_len, Node::default());
        self.generation = 0;
    }

    /// The grid rectangle being searched.
    #[inline]
    pub fn range(&self) -> Range {
        self.rng
    }

    /// Best known total cost to reach `p` in the last search.
    ///
    /// Returns [`UNREACHABLE`] if `p` is outside the range or was never
    /// relaxed. For finalized cells this is the true minimum; cells still
    /// on the frontier when the search stopped early hold tentative values.
    pub fn distance_at(&self, p: Point) -> i32 {
        match self.idx(p) {
            Some(i) if self.nodes[i].generation == self.generation => self.nodes[i].dist,
            _ => UNREACHABLE,
        }
    }

    /// The cell `p` was most recently relaxed from in the last search.
    ///
    /// The search start has no predecessor.
    pub fn predecessor_at(&self, p: Point) -> Option<Point> {
        let i = self.idx(p)?;
        let n = &self.nodes[i];
        if n.generation != self.generation || n.parent == usize::MAX {
            return None;
        }
        Some(self.point(n.parent))
    }

    // -----------------------------------------------------------------------
    // Coordinate helpers
    // -----------------------------------------------------------------------

    /// Convert a `Point` to a flat index. Returns `None` if out of range.
    #[inline]
    pub(crate) fn idx(&self, p: Point) -> Option<usize> {
        if !self.rng.contains(p) {
            return None;
        }
        let x = (p.x - self.rng.min.x) as usize;
        let y = (p.y - self.rng.min.y) as usize;
        Some(y * self.width + x)
    }

    /// Like [`idx`](Self::idx), but surfaces the failure as an error.
    #[inline]
    pub(crate) fn checked_idx(&self, p: Point) -> Result<usize, OutOfBoundsError> {
        self.idx(p).ok_or(OutOfBoundsError {
            pos: p,
            bounds: self.rng,
        })
    }

    /// Convert a flat index back to a `Point`.
    #[inline]
    pub(crate) fn point(&self, idx: usize) -> Point {
        let x = (idx % self.width) as i32 + self.rng.min.x;
        let y = (idx / self.width) as i32 + self.rng.min.y;
        Point::new(x, y)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for SearchRange {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.rng.serialize(serializer)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for SearchRange {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let range = Range::deserialize(deserializer)?;
        Ok(SearchRange::new(range))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_range_smaller_preserves_capacity() {
        let mut sr = SearchRange::new(Range::new(0, 0, 20, 20));
        let original_cap = sr.nodes.len(); // 400

        let small = Range::new(0, 0, 5, 5);
        sr.set_range(small);
        assert_eq!(sr.range(), small);
        assert_eq!(sr.nodes.len(), original_cap);
        assert_eq!(sr.width, 5);
        assert!(sr.generation > 0);
    }

    #[test]
    fn set_range_larger_reallocates() {
        let mut sr = SearchRange::new(Range::new(0, 0, 5, 5));
        let old_cap = sr.nodes.len(); // 25

        let big = Range::new(0, 0, 20, 20);
        sr.set_range(big);
        assert_eq!(sr.range(), big);
        assert!(sr.nodes.len() > old_cap);
        assert_eq!(sr.nodes.len(), 400);
    }

    #[test]
    fn fresh_range_reports_unreachable() {
        let sr = SearchRange::new(Range::new(0, 0, 3, 3));
        assert_eq!(sr.distance_at(Point::new(1, 1)), UNREACHABLE);
        assert_eq!(sr.distance_at(Point::new(9, 9)), UNREACHABLE);
        assert_eq!(sr.predecessor_at(Point::new(1, 1)), None);
    }
}
