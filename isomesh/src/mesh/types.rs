//! Strongly-typed indexes of various flavors
//!
//! Cell corners are numbered counter-clockwise around the bottom face, then
//! the top face:
//!
//! ```text
//!         7 -------- 6
//!        /|         /|      Z
//!       / |        / |      ^  _ Y
//!      4----------5  |      | /
//!      |  |       |  |      |/
//!      |  3-------|--2      ---> X
//!      | /        | /
//!      |/         |/
//!      0----------1
//! ```
//!
//! Edges 0-3 run around the bottom face (starting at corner 0), edges 4-7 run
//! around the top face, and edges 8-11 are the vertical edges above corners
//! 0-3.

/// A single axis, represented as a `u8` with one bit (between 0 and 3) set
///
/// These invariants are enforced at construction
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Axis(u8);

impl Axis {
    /// Builds a new axis
    ///
    /// # Panics
    /// If the input does not have exactly 1 set bit, or has a bit set that's
    /// not in the 0-2 range
    pub const fn new(i: u8) -> Self {
        assert!(i.count_ones() == 1);
        assert!(i.trailing_zeros() < 3);
        Self(i)
    }

    /// Converts from a bitmask to an index (0-2)
    pub const fn index(self) -> usize {
        self.0.trailing_zeros() as usize
    }
}

/// The X axis, i.e. `[1, 0, 0]`
pub const X: Axis = Axis(1);
/// The Y axis, i.e. `[0, 1, 0]`
pub const Y: Axis = Axis(2);
/// The Z axis, i.e. `[0, 0, 1]`
pub const Z: Axis = Axis(4);

/// Offsets of each corner from the cell's minimum corner
const CORNER_OFFSETS: [[u8; 3]; 8] = [
    [0, 0, 0],
    [1, 0, 0],
    [1, 1, 0],
    [0, 1, 0],
    [0, 0, 1],
    [1, 0, 1],
    [1, 1, 1],
    [0, 1, 1],
];

/// Strongly-typed cell corner, in the 0-8 range
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Corner(u8);

impl Corner {
    /// Builds a new corner
    ///
    /// # Panics
    /// If `i >= 8`, which is not a valid corner index
    pub const fn new(i: u8) -> Self {
        assert!(i < 8);
        Self(i)
    }

    /// Returns the value of this corner as an index
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Iterates over all 8 corners
    pub fn iter() -> impl Iterator<Item = Self> {
        (0..8).map(Corner)
    }

    /// Returns the `(dx, dy, dz)` offset of this corner within its cell
    pub const fn offset(self) -> [u8; 3] {
        CORNER_OFFSETS[self.0 as usize]
    }
}

/// An undirected edge within a cell, in the 0-12 range
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Edge(u8);

impl Edge {
    /// Builds a new edge
    ///
    /// # Panics
    /// If `i >= 12`, since that's an invalid edge
    pub const fn new(i: u8) -> Self {
        assert!(i < 12);
        Self(i)
    }

    /// Converts from an edge to an index
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Iterates over all 12 edges
    pub fn iter() -> impl Iterator<Item = Self> {
        (0..12).map(Edge)
    }

    /// Returns the axis along which this edge runs
    pub const fn axis(self) -> Axis {
        match self.0 {
            0 | 2 | 4 | 6 => X,
            1 | 3 | 5 | 7 => Y,
            _ => Z,
        }
    }
}

/// Bitmask of which corners in a cell are inside the surface
///
/// Bit `i` is set if corner `i` is inside.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct CellMask(u8);

impl CellMask {
    /// Builds a new `CellMask`
    pub const fn new(i: u8) -> Self {
        Self(i)
    }

    /// Returns the bitmask as an index
    ///
    /// The index has the same value as the bitmask, but is cast to a `usize`
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Checks whether every corner is on the same side of the surface
    pub const fn is_uniform(self) -> bool {
        self.0 == 0 || self.0 == u8::MAX
    }

    /// Returns the number of inside corners
    pub const fn count_ones(self) -> u32 {
        self.0.count_ones()
    }
}

impl std::ops::BitAnd<Corner> for CellMask {
    type Output = bool;
    fn bitand(self, c: Corner) -> bool {
        (self.0 & (1 << c.index())) != 0
    }
}

impl std::ops::BitOr<Corner> for CellMask {
    type Output = CellMask;
    fn bitor(self, c: Corner) -> CellMask {
        CellMask(self.0 | (1 << c.index()))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_corner_offsets_are_unique() {
        let mut seen = [false; 8];
        for c in Corner::iter() {
            let [dx, dy, dz] = c.offset();
            let i = (dx + 2 * dy + 4 * dz) as usize;
            assert!(!seen[i], "duplicate offset for {c:?}");
            seen[i] = true;
        }
    }

    #[test]
    fn test_mask() {
        let m = CellMask::new(0) | Corner::new(0) | Corner::new(7);
        assert_eq!(m.index(), 0b1000_0001);
        assert!(m & Corner::new(7));
        assert!(!(m & Corner::new(3)));
        assert!(CellMask::new(0).is_uniform());
        assert!(CellMask::new(255).is_uniform());
        assert!(!m.is_uniform());
        assert_eq!(m.count_ones(), 2);
    }

    #[test]
    fn test_axis() {
        assert_eq!(X.index(), 0);
        assert_eq!(Y.index(), 1);
        assert_eq!(Z.index(), 2);
        assert_eq!(Axis::new(4), Z);
        assert_eq!(Edge::new(3).axis(), Y);
        assert_eq!(Edge::new(10).axis(), Z);
    }
}
