//! Per-cell indexing, classification, and edge interpolation
use super::{
    table,
    types::{Axis, CellMask, Corner, Edge},
};
use crate::grid::Sample;

/// Node layout of a structured grid, independent of its sample type
#[derive(Copy, Clone, Debug)]
pub struct Lattice {
    resolution: [usize; 3],
}

impl Lattice {
    pub fn new(resolution: [usize; 3]) -> Self {
        Self { resolution }
    }

    pub fn resolution(&self) -> [usize; 3] {
        self.resolution
    }

    pub fn line_size(&self) -> usize {
        self.resolution[0]
    }

    pub fn slice_size(&self) -> usize {
        self.resolution[0] * self.resolution[1]
    }

    pub fn node_count(&self) -> usize {
        self.resolution.iter().product()
    }

    /// Number of cells along each axis
    pub fn cell_counts(&self) -> [usize; 3] {
        self.resolution.map(|n| n.saturating_sub(1))
    }

    /// Linear index of the node at `pos`
    pub fn index(&self, pos: [usize; 3]) -> usize {
        pos[0] + pos[1] * self.line_size() + pos[2] * self.slice_size()
    }

    /// Stride between adjacent nodes along the given axis
    pub fn stride(&self, axis: Axis) -> usize {
        match axis.index() {
            0 => 1,
            1 => self.line_size(),
            _ => self.slice_size(),
        }
    }

    /// Iterates over every node, with `x` varying fastest
    pub fn nodes(&self) -> impl Iterator<Item = [usize; 3]> {
        let [nx, ny, nz] = self.resolution;
        (0..nz).flat_map(move |z| {
            (0..ny).flat_map(move |y| (0..nx).map(move |x| [x, y, z]))
        })
    }

    /// Iterates over every cell, with `x` varying fastest
    pub fn cells(&self) -> impl Iterator<Item = CellIndex> {
        let [cx, cy, cz] = self.cell_counts();
        let line_size = self.line_size();
        let slice_size = self.slice_size();
        (0..cz).flat_map(move |z| {
            (0..cy).flat_map(move |y| {
                (0..cx).map(move |x| CellIndex {
                    pos: [x, y, z],
                    node: x + y * line_size + z * slice_size,
                })
            })
        })
    }
}

/// A cell within the lattice, identified by its minimum corner
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CellIndex {
    /// Integer position of corner 0
    pub pos: [usize; 3],
    /// Linear node index of corner 0
    pub node: usize,
}

impl CellIndex {
    /// Returns the integer position of the given offset from this cell
    pub fn offset(&self, d: [u8; 3]) -> [usize; 3] {
        std::array::from_fn(|i| self.pos[i] + d[i] as usize)
    }

    /// Returns the linear node index of the given corner
    pub fn corner(&self, c: Corner, lattice: &Lattice) -> usize {
        let [dx, dy, dz] = c.offset();
        self.node
            + dx as usize
            + dy as usize * lattice.line_size()
            + dz as usize * lattice.slice_size()
    }

    /// Returns the linear node indices of all 8 corners
    pub fn corners(&self, lattice: &Lattice) -> [usize; 8] {
        std::array::from_fn(|i| self.corner(Corner::new(i as u8), lattice))
    }
}

////////////////////////////////////////////////////////////////////////////////

/// Typed view of a scalar field, thresholded at an isolevel
pub struct Field<'a, T> {
    values: &'a [T],
    lattice: Lattice,
    isolevel: f64,
    range: (f64, f64),
}

impl<'a, T: Sample> Field<'a, T> {
    /// Builds a new field
    ///
    /// `range` is the `(min, max)` of the grid; samples are clamped to it
    /// before interpolation.
    pub fn new(
        values: &'a [T],
        lattice: Lattice,
        isolevel: f64,
        range: (f64, f64),
    ) -> Self {
        debug_assert_eq!(values.len(), lattice.node_count());
        Self {
            values,
            lattice,
            isolevel,
            range,
        }
    }

    pub fn lattice(&self) -> &Lattice {
        &self.lattice
    }

    /// Returns the sample at the given node, cast to `f64`
    #[inline]
    pub fn value(&self, node: usize) -> f64 {
        self.values[node].to_f64()
    }

    /// Checks whether the given node is strictly above the isolevel
    #[inline]
    pub fn is_inside(&self, node: usize) -> bool {
        self.value(node) > self.isolevel
    }

    /// Classifies the 8 corners of a cell
    pub fn mask(&self, cell: &CellIndex) -> CellMask {
        let corners = cell.corners(&self.lattice);
        Corner::iter()
            .filter(|c| self.is_inside(corners[c.index()]))
            .fold(CellMask::new(0), |m, c| m | c)
    }

    /// Checks whether the edge from `node` along `axis` crosses the surface
    ///
    /// The caller must ensure the far end of the edge is within the lattice.
    pub fn crosses(&self, node: usize, axis: Axis) -> bool {
        self.is_inside(node) != self.is_inside(node + self.lattice.stride(axis))
    }

    /// Finds the surface crossing between two lattice positions
    pub fn interpolate(
        &self,
        p0: [usize; 3],
        p1: [usize; 3],
    ) -> nalgebra::Vector3<f32> {
        let (min, max) = self.range;
        let v0 = self.value(self.lattice.index(p0));
        let v1 = self.value(self.lattice.index(p1));
        debug_assert!(
            (v0 > self.isolevel) != (v1 > self.isolevel),
            "edge {p0:?} -> {p1:?} does not cross the surface"
        );
        let v0 = v0.clamp(min, max);
        let v1 = v1.clamp(min, max);
        let ratio = ((self.isolevel - v0) / (v1 - v0)).abs();
        let lerp = |i: usize| {
            ((1.0 - ratio) * p0[i] as f64 + ratio * p1[i] as f64) as f32
        };
        nalgebra::Vector3::new(lerp(0), lerp(1), lerp(2))
    }

    /// Finds the surface crossing on one of a cell's edges
    pub fn edge_vertex(
        &self,
        cell: &CellIndex,
        edge: Edge,
    ) -> nalgebra::Vector3<f32> {
        let (a, b) = table::corner_offsets(edge);
        self.interpolate(cell.offset(a), cell.offset(b))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::mesh::types::{X, Y, Z};

    #[test]
    fn test_cell_iteration() {
        let lattice = Lattice::new([3, 2, 2]);
        let cells: Vec<_> = lattice.cells().collect();
        assert_eq!(cells.len(), 2);
        assert_eq!(cells[1].pos, [1, 0, 0]);
        assert_eq!(cells[1].node, 1);

        let corners = cells[0].corners(&lattice);
        assert_eq!(corners, [0, 1, 4, 3, 6, 7, 10, 9]);

        assert_eq!(lattice.nodes().count(), 12);
        assert_eq!(lattice.nodes().nth(4), Some([1, 1, 0]));

        assert_eq!(Lattice::new([1, 5, 5]).cells().count(), 0);
    }

    #[test]
    fn test_strides() {
        let lattice = Lattice::new([4, 5, 6]);
        assert_eq!(lattice.stride(X), 1);
        assert_eq!(lattice.stride(Y), 4);
        assert_eq!(lattice.stride(Z), 20);
        assert_eq!(lattice.index([1, 2, 3]), 1 + 8 + 60);
    }

    #[test]
    fn test_mask() {
        let lattice = Lattice::new([2, 2, 2]);
        let mut values = [0.0f32; 8];
        values[7] = 1.0; // (1, 1, 1), i.e. corner 6
        let field = Field::new(&values, lattice, 0.5, (0.0, 1.0));
        let cell = lattice.cells().next().unwrap();
        assert_eq!(field.mask(&cell).index(), 1 << 6);

        // Samples equal to the isolevel are outside
        let field = Field::new(&values, lattice, 1.0, (0.0, 1.0));
        assert_eq!(field.mask(&cell).index(), 0);
    }

    #[test]
    fn test_interpolate() {
        let lattice = Lattice::new([2, 1, 1]);
        let values = [0u8, 10];
        let field = Field::new(&values, lattice, 3.0, (0.0, 10.0));
        assert!(field.crosses(0, X));
        let p = field.interpolate([0, 0, 0], [1, 0, 0]);
        assert!((p.x - 0.3).abs() < 1e-6);
        assert_eq!(p.y, 0.0);
        assert_eq!(p.z, 0.0);

        // Falling edges interpolate from the same end
        let values = [10i16, 0];
        let field = Field::new(&values, lattice, 3.0, (0.0, 10.0));
        let p = field.interpolate([0, 0, 0], [1, 0, 0]);
        assert!((p.x - 0.7).abs() < 1e-6);
    }
}
