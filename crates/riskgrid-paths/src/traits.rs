use riskgrid_core::{Point, RiskGrid};

use crate::search::UNREACHABLE;

/// Node-weighted search surface: neighbor enumeration plus entry costs.
pub trait RiskPather {
    /// Append neighbors of `p` into `buf`. The caller clears `buf` before
    /// calling.
    fn neighbors(&self, p: Point, buf: &mut Vec<Point>);

    /// Cost charged when stepping *into* `p`. Must be > 0.
    ///
    /// Only queried for points previously yielded by
    /// [`neighbors`](Self::neighbors).
    fn entry_cost(&self, p: Point) -> i32;
}

impl RiskPather for RiskGrid {
    fn neighbors(&self, p: Point, buf: &mut Vec<Point>) {
        for n in p.neighbors_4() {
            if self.contains(n) {
                buf.push(n);
            }
        }
    }

    fn entry_cost(&self, p: Point) -> i32 {
        match self.get(p) {
            Some(cost) => i32::from(cost),
            None => UNREACHABLE,
        }
    }
}
