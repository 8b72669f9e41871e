//! Cube coordinates for the hex tiles of the board.
//!
//! Tiles are addressed by cube coordinates `(q, s, r)` with `q + s + r = 0`.
//! Only `q` and `r` are stored; `s` is derived, so an ill-formed triple can
//! never be constructed through [`CubeCoord::new`].

use serde::{Deserialize, Serialize};

/// Cube coordinate of a hex tile.
///
/// - `q` increases going east
/// - `r` increases going southeast
/// - `s` (not stored) satisfies `q + s + r = 0`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct CubeCoord {
    pub q: i32,
    pub r: i32,
}

impl CubeCoord {
    /// Create a coordinate from its two stored axes
    pub const fn new(q: i32, r: i32) -> Self {
        Self { q, r }
    }

    /// Create a coordinate from all three cube axes, rejecting triples that
    /// do not sum to zero
    pub const fn from_cube(q: i32, s: i32, r: i32) -> Option<Self> {
        if q + s + r == 0 {
            Some(Self { q, r })
        } else {
            None
        }
    }

    /// The implicit third coordinate (s = -q - r)
    pub const fn s(&self) -> i32 {
        -self.q - self.r
    }

    /// The six neighboring hexes in clockwise order starting from East
    pub fn neighbors(&self) -> [CubeCoord; 6] {
        [
            CubeCoord::new(self.q + 1, self.r),     // East
            CubeCoord::new(self.q + 1, self.r - 1), // NorthEast
            CubeCoord::new(self.q, self.r - 1),     // NorthWest
            CubeCoord::new(self.q - 1, self.r),     // West
            CubeCoord::new(self.q - 1, self.r + 1), // SouthWest
            CubeCoord::new(self.q, self.r + 1),     // SouthEast
        ]
    }

    /// Distance to another hex (in hex steps)
    pub fn distance_to(&self, other: &CubeCoord) -> u32 {
        let dq = (self.q - other.q).abs();
        let dr = (self.r - other.r).abs();
        let ds = (self.s() - other.s()).abs();
        ((dq + dr + ds) / 2) as u32
    }
}

impl std::fmt::Display for CubeCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {}, {})", self.q, self.s(), self.r)
    }
}
