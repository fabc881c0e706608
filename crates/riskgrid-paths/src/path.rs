use std::fmt;

use riskgrid_core::Point;

use crate::search::SearchRange;

/// A cycle in the predecessor links.
///
/// Signals a defect in the search engine, not a user error: a correct
/// search can never relax a cell from one of its own descendants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BrokenPathError {
    /// Cell at which the walk gave up.
    pub at: Point,
    /// Number of cells visited before giving up.
    pub steps: usize,
}

impl fmt::Display for BrokenPathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "predecessor walk cycled at {} after {} steps",
            self.at, self.steps
        )
    }
}

impl std::error::Error for BrokenPathError {}

impl SearchRange {
    /// Reconstruct the cell sequence of the route found by the last search.
    ///
    /// Walks predecessor links backward from `end` until a cell with no
    /// predecessor (the search start) and returns the sequence in
    /// start→end order, both endpoints included. Read-only; call after a
    /// successful [`shortest_path`](Self::shortest_path).
    ///
    /// Fails if the walk exceeds the range's cell count, which would mean
    /// the predecessor links contain a cycle.
    pub fn path_to(&self, end: Point) -> Result<Vec<Point>, BrokenPathError> {
        let mut path = vec![end];
        let mut cur = end;
        while let Some(prev) = self.predecessor_at(cur) {
            if path.len() > self.rng.len() {
                return Err(BrokenPathError {
                    at: cur,
                    steps: path.len(),
                });
            }
            path.push(prev);
            cur = prev;
        }
        path.reverse();
        Ok(path)
    }
}
