//! Tiled grid expansion with wrap-around cost increments.

use crate::grid::{MalformedGridError, RiskGrid};

impl RiskGrid {
    /// Return a new grid made of `down x right` copies of this one.
    ///
    /// The copy at tile `(ty, tx)` has every cost incremented by `ty + tx`,
    /// wrapping from 9 back to 1 so all costs stay in `1..=9`. The rule is
    /// the same for every tile; the base grid is left untouched.
    pub fn tiled(&self, down: u32, right: u32) -> Result<RiskGrid, MalformedGridError> {
        if down == 0 || right == 0 {
            return Err(MalformedGridError::EmptyTiling { down, right });
        }

        let w = self.width() as usize;
        let h = self.height() as usize;
        let big_w = w * right as usize;
        let big_h = h * down as usize;
        let mut costs = vec![0u8; big_w * big_h];

        for ty in 0..down as usize {
            for tx in 0..right as usize {
                let bump = (ty + tx) as u32;
                for (p, base) in self.iter() {
                    let gx = tx * w + p.x as usize;
                    let gy = ty * h + p.y as usize;
                    costs[gy * big_w + gx] = wrap_cost(u32::from(base) + bump);
                }
            }
        }

        Ok(RiskGrid::from_parts(costs, big_w as i32, big_h as i32))
    }
}

/// Map a raw incremented cost back into `1..=9` (9 wraps to 1, not 0).
#[inline]
fn wrap_cost(raw: u32) -> u8 {
    ((raw - 1) % 9 + 1) as u8
}
