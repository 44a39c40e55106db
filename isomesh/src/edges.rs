//! Wireframe extraction from structured grids
//!
//! Every grid node becomes a vertex and every lattice edge a line segment,
//! colored per node by the node's value (or vector magnitude).
use crate::{
    color::{Rgb, TransferFunction},
    grid::StructuredGrid,
    Error,
};

/// A set of colored line segments
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LineMesh {
    /// Vertex positions, one per grid node
    pub coords: Vec<nalgebra::Vector3<f32>>,
    /// Segments, as pairs of indexes into [`self.coords`](Self::coords)
    pub connections: Vec<[u32; 2]>,
    /// Per-vertex colors
    pub colors: Vec<Rgb>,
}

impl LineMesh {
    /// Returns the number of line segments
    pub fn segment_count(&self) -> usize {
        self.connections.len()
    }
}

/// Extracts the lattice edges of a structured grid
///
/// Any vector length is accepted; vector-valued nodes are colored by their
/// magnitude.
pub fn extract_edges(
    grid: &StructuredGrid,
    tf: &TransferFunction,
) -> Result<LineMesh, Error> {
    let start = std::time::Instant::now();
    let [nx, ny, nz] = grid.resolution();

    let mut coords = Vec::with_capacity(grid.node_count());
    let mut connections = vec![];
    for z in 0..nz {
        for y in 0..ny {
            for x in 0..nx {
                coords.push(nalgebra::Vector3::new(
                    x as f32, y as f32, z as f32,
                ));
                let i = grid.index(x, y, z) as u32;
                if x + 1 < nx {
                    connections.push([i, i + 1]);
                }
                if y + 1 < ny {
                    connections.push([i, i + grid.line_size() as u32]);
                }
                if z + 1 < nz {
                    connections.push([i, i + grid.slice_size() as u32]);
                }
            }
        }
    }

    let colors = node_colors(grid, tf);
    log::debug!(
        "extracted {} segments from {:?} grid in {:?}",
        connections.len(),
        grid.resolution(),
        start.elapsed()
    );
    Ok(LineMesh {
        coords,
        connections,
        colors,
    })
}

/// Colors every node by truncating its normalized value onto the color map
fn node_colors(grid: &StructuredGrid, tf: &TransferFunction) -> Vec<Rgb> {
    let color_map = tf.color_map();
    let (min, max) = (grid.min_value(), grid.max_value());
    if !(max > min) {
        return vec![color_map.at_index(0); grid.node_count()];
    }
    let scale = (color_map.resolution() - 1) as f64 / (max - min);
    (0..grid.node_count())
        .map(|n| {
            let level = (scale * (grid.node_value(n) - min)).floor();
            color_map.at_index(level.max(0.0) as usize)
        })
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::color::ColorMap;

    #[test]
    fn test_segment_count() {
        let grid = StructuredGrid::scalar([3, 4, 5], vec![0u8; 60]).unwrap();
        let lines =
            extract_edges(&grid, &TransferFunction::default()).unwrap();
        let (cx, cy, cz) = (2, 3, 4);
        let expected = 3 * cx * cy * cz
            + 2 * (cx * cy + cy * cz + cz * cx)
            + (cx + cy + cz);
        assert_eq!(lines.segment_count(), expected);
        assert_eq!(lines.coords.len(), 60);
        assert_eq!(lines.colors.len(), 60);
        for [a, b] in &lines.connections {
            let d = lines.coords[*b as usize] - lines.coords[*a as usize];
            assert_eq!(d.norm(), 1.0);
        }
    }

    #[test]
    fn test_colors() {
        let tf = TransferFunction::new(ColorMap::rainbow(3).unwrap());
        let grid =
            StructuredGrid::scalar([4, 1, 1], vec![0.0f32, 0.4, 0.6, 1.0])
                .unwrap();
        let lines = extract_edges(&grid, &tf).unwrap();
        let map = tf.color_map();
        assert_eq!(
            lines.colors,
            [0, 0, 1, 2].map(|i| map.at_index(i)).to_vec()
        );

        let flat = StructuredGrid::scalar([2, 1, 1], vec![7u8, 7]).unwrap();
        let lines = extract_edges(&flat, &tf).unwrap();
        assert_eq!(lines.colors, vec![map.at_index(0); 2]);
    }

    #[test]
    fn test_vector_field() {
        let grid = StructuredGrid::new(
            [2, 1, 1],
            3,
            vec![0.0f64, 0.0, 0.0, 3.0, 4.0, 0.0],
        )
        .unwrap();
        let tf = TransferFunction::default();
        let lines = extract_edges(&grid, &tf).unwrap();
        assert_eq!(lines.segment_count(), 1);
        assert_eq!(lines.colors[0], tf.color_map().at_index(0));
        assert_eq!(lines.colors[1], tf.color_map().at_index(255));
    }
}
