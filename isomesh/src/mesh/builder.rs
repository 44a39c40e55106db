use super::{
    cell::{CellIndex, Lattice},
    table,
    types::{Axis, Edge},
};

/// Container used while welding vertices on shared grid edges
///
/// Every grid edge is identified by the node at its lower end and its axis,
/// packed as `3 * node + axis`.  The map is sized for every possible edge up
/// front and released when the builder is consumed.
pub struct MeshBuilder {
    /// Map from edge keys to indexes in `vertices`
    ///
    /// `usize::MAX` is used a marker for an unmapped edge
    map: Vec<usize>,
    vertices: Vec<nalgebra::Vector3<f32>>,
    triangles: Vec<nalgebra::Vector3<u32>>,
}

impl MeshBuilder {
    /// Builds a new builder for a lattice with `node_count` nodes
    pub fn new(node_count: usize) -> Self {
        Self {
            map: vec![usize::MAX; 3 * node_count],
            vertices: vec![],
            triangles: vec![],
        }
    }

    /// Packs a grid edge into its key
    pub fn key(node: usize, axis: Axis) -> usize {
        3 * node + axis.index()
    }

    /// Returns the key of one of a cell's local edges
    pub fn edge_key(cell: &CellIndex, edge: Edge, lattice: &Lattice) -> usize {
        let (start, _) = table::corner_offsets(edge);
        Self::key(lattice.index(cell.offset(start)), edge.axis())
    }

    /// Records a new vertex for the given edge
    pub fn insert(&mut self, key: usize, pos: nalgebra::Vector3<f32>) {
        debug_assert_eq!(self.map[key], usize::MAX, "edge {key} already set");
        self.map[key] = self.vertices.len();
        self.vertices.push(pos);
    }

    /// Looks up the vertex previously recorded for the given edge
    ///
    /// # Panics
    /// If no vertex has been recorded for this edge
    pub fn get(&self, key: usize) -> u32 {
        match self.map[key] {
            usize::MAX => panic!("no vertex recorded for edge {key}"),
            v => v as u32,
        }
    }

    pub fn push(&mut self, tri: nalgebra::Vector3<u32>) {
        self.triangles.push(tri)
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Consumes the builder, returning vertices and triangles
    pub fn take(
        self,
    ) -> (Vec<nalgebra::Vector3<f32>>, Vec<nalgebra::Vector3<u32>>) {
        (self.vertices, self.triangles)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::mesh::types::{X, Y, Z};

    #[test]
    fn test_edge_keys() {
        let lattice = Lattice::new([4, 3, 2]);
        let cell = CellIndex {
            pos: [1, 1, 0],
            node: lattice.index([1, 1, 0]),
        };
        let b = 3 * cell.node;
        let line = 3 * lattice.line_size();
        let slice = 3 * lattice.slice_size();

        let key = |e| MeshBuilder::edge_key(&cell, Edge::new(e), &lattice);
        assert_eq!(key(0), b);
        assert_eq!(key(1), b + 3 + 1);
        assert_eq!(key(2), b + line);
        assert_eq!(key(3), b + 1);
        assert_eq!(key(4), b + slice);
        assert_eq!(key(5), b + 3 + 1 + slice);
        assert_eq!(key(6), b + line + slice);
        assert_eq!(key(7), b + 1 + slice);
        assert_eq!(key(8), b + 2);
        assert_eq!(key(9), b + 2 + 3);
        assert_eq!(key(10), b + 2 + 3 + line);
        assert_eq!(key(11), b + 2 + line);

        assert_eq!(MeshBuilder::key(5, X), 15);
        assert_eq!(MeshBuilder::key(5, Y), 16);
        assert_eq!(MeshBuilder::key(5, Z), 17);
    }

    #[test]
    fn test_insert_get() {
        let mut b = MeshBuilder::new(2);
        b.insert(4, nalgebra::Vector3::new(0.0, 0.5, 0.0));
        b.insert(0, nalgebra::Vector3::new(0.5, 0.0, 0.0));
        assert_eq!(b.get(4), 0);
        assert_eq!(b.get(0), 1);
        assert_eq!(b.vertex_count(), 2);
        b.push(nalgebra::Vector3::new(0, 1, 0));
        let (verts, tris) = b.take();
        assert_eq!(verts.len(), 2);
        assert_eq!(tris.len(), 1);
    }

    #[test]
    #[should_panic]
    fn test_missing_edge() {
        let b = MeshBuilder::new(2);
        b.get(3);
    }
}
