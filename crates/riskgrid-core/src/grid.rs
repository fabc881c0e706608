//! The [`RiskGrid`] type — an immutable rectangular matrix of entry costs.
//!
//! Each cell holds a single-digit traversal cost in `1..=9`, the cost of
//! *entering* that cell. The grid is validated while parsing and never
//! mutated afterwards, so read-only consumers can share it freely.

use std::fmt;

use crate::geom::{Point, Range};

/// An immutable rectangular grid of per-cell entry costs in `1..=9`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RiskGrid {
    costs: Vec<u8>,
    bounds: Range,
}

impl RiskGrid {
    /// Parse a grid from rows of digit characters, top to bottom.
    ///
    /// Every row must be non-empty, all rows must have the same length, and
    /// every character must be a digit in `'1'..='9'`. `'0'` is not a valid
    /// cost and is rejected like any other stray character.
    pub fn parse<S: AsRef<str>>(lines: &[S]) -> Result<Self, MalformedGridError> {
        let mut costs = Vec::new();
        let mut width: Option<usize> = None;

        for (y, line) in lines.iter().enumerate() {
            let line = line.as_ref();
            let row_len = line.chars().count();
            if row_len == 0 {
                return Err(MalformedGridError::EmptyRow { row: y });
            }
            match width {
                None => width = Some(row_len),
                Some(w) if w != row_len => {
                    return Err(MalformedGridError::UnevenRow {
                        row: y,
                        expected: w,
                        found: row_len,
                    });
                }
                Some(_) => {}
            }
            for (x, ch) in line.chars().enumerate() {
                match ch.to_digit(10) {
                    Some(d @ 1..=9) => costs.push(d as u8),
                    _ => {
                        return Err(MalformedGridError::InvalidDigit {
                            ch,
                            pos: Point::new(x as i32, y as i32),
                        });
                    }
                }
            }
        }

        let Some(width) = width else {
            return Err(MalformedGridError::NoRows);
        };
        let height = lines.len();
        Ok(Self {
            costs,
            bounds: Range::new(0, 0, width as i32, height as i32),
        })
    }

    /// Assemble a grid from an already-validated flat cost buffer.
    pub(crate) fn from_parts(costs: Vec<u8>, width: i32, height: i32) -> Self {
        debug_assert_eq!(costs.len(), (width * height) as usize);
        Self {
            costs,
            bounds: Range::new(0, 0, width, height),
        }
    }

    /// The bounding range of the grid, anchored at the origin.
    #[inline]
    pub fn bounds(&self) -> Range {
        self.bounds
    }

    /// Size of the grid as a `Point`.
    #[inline]
    pub fn size(&self) -> Point {
        self.bounds.size()
    }

    /// Width (number of columns).
    #[inline]
    pub fn width(&self) -> i32 {
        self.bounds.width()
    }

    /// Height (number of rows).
    #[inline]
    pub fn height(&self) -> i32 {
        self.bounds.height()
    }

    /// Whether `p` is inside the grid.
    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        self.bounds.contains(p)
    }

    /// Entry cost at `p`, or `None` if `p` is outside the grid.
    #[inline]
    pub fn get(&self, p: Point) -> Option<u8> {
        if !self.bounds.contains(p) {
            return None;
        }
        let i = (p.y as usize) * (self.bounds.width() as usize) + p.x as usize;
        self.costs.get(i).copied()
    }

    /// Checked entry cost accessor.
    pub fn cost(&self, p: Point) -> Result<u8, OutOfBoundsError> {
        self.get(p).ok_or(OutOfBoundsError {
            pos: p,
            bounds: self.bounds,
        })
    }

    /// Row-major iterator over `(Point, cost)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (Point, u8)> + '_ {
        self.bounds
            .iter()
            .zip(self.costs.iter())
            .map(|(p, &c)| (p, c))
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors that can occur when building a grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MalformedGridError {
    /// The input contained no rows at all.
    NoRows,
    /// A row had zero characters.
    EmptyRow { row: usize },
    /// A row's length differs from the first row's.
    UnevenRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    /// A character outside `'1'..='9'` was found.
    InvalidDigit { ch: char, pos: Point },
    /// A tiling with zero repetitions along an axis was requested.
    EmptyTiling { down: u32, right: u32 },
}

impl fmt::Display for MalformedGridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoRows => write!(f, "grid has no rows"),
            Self::EmptyRow { row } => write!(f, "grid row {row} is empty"),
            Self::UnevenRow {
                row,
                expected,
                found,
            } => {
                write!(f, "grid row {row} has {found} cells, expected {expected}")
            }
            Self::InvalidDigit { ch, pos } => {
                write!(
                    f,
                    "grid contains invalid cost \u{201c}{ch}\u{201d} at ({}, {})",
                    pos.x, pos.y
                )
            }
            Self::EmptyTiling { down, right } => {
                write!(f, "tiling {down}x{right} would produce an empty grid")
            }
        }
    }
}

impl std::error::Error for MalformedGridError {}

/// A coordinate that lies outside the grid or search bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutOfBoundsError {
    pub pos: Point,
    pub bounds: Range,
}

impl fmt::Display for OutOfBoundsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "position {} outside bounds {}", self.pos, self.bounds)
    }
}

impl std::error::Error for OutOfBoundsError {}
