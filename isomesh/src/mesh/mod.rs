//! Isosurface extraction with Marching Cubes
//!
//! This module converts a scalar [`StructuredGrid`] into a triangle mesh
//! approximating the surface where the field crosses a given isolevel.  Each
//! cell of eight neighboring samples is classified by which corners lie
//! strictly above the isolevel; the resulting 8-bit mask selects a fixed
//! triangulation from the topology table, and triangle vertices are placed by
//! linear interpolation along the crossing edges.
//!
//! Two vertex policies are supported:
//! - With `duplicate` set, every triangle gets three fresh vertices and a flat
//!   face normal.
//! - Otherwise, vertices are welded so that each grid edge which crosses the
//!   surface contributes exactly one vertex, and triangles are returned as
//!   index triples in [`Mesh::connections`].
//!
//! Here's a full example:
//!
//! ```
//! use isomesh::{
//!     color::TransferFunction,
//!     grid::StructuredGrid,
//!     mesh::{NormalMode, Settings},
//! };
//!
//! // Distance from the center of a 8×8×8 grid
//! let n = 8;
//! let values: Vec<f32> = (0..n * n * n)
//!     .map(|i| {
//!         let (x, y, z) = (i % n, (i / n) % n, i / (n * n));
//!         let d = |v: usize| v as f32 - 3.5;
//!         (d(x).powi(2) + d(y).powi(2) + d(z).powi(2)).sqrt()
//!     })
//!     .collect();
//! let grid = StructuredGrid::scalar([n, n, n], values)?;
//!
//! let settings = Settings {
//!     isolevel: 2.5,
//!     normals: NormalMode::PerVertex,
//!     ..Default::default()
//! };
//! let mesh = isomesh::extract(&grid, &settings, &TransferFunction::default())?;
//! assert!(mesh.triangle_count() > 0);
//!
//! // Open a file to write, e.g.
//! // let mut f = std::fs::File::create("out.stl")?;
//! # let mut f = vec![];
//! mesh.write_stl(&mut f)?;
//! # Ok::<(), isomesh::Error>(())
//! ```

mod builder;
mod cell;
mod normals;
mod output;

pub mod table;

#[doc(hidden)]
pub mod types;

use crate::{
    color::{Rgb, TransferFunction},
    grid::{with_values, Sample, StructuredGrid},
    Error,
};
use builder::MeshBuilder;
use cell::{Field, Lattice};
use types::{X, Y, Z};

pub use normals::face_normal;

/// Strategy used to compute normals
#[derive(
    Copy,
    Clone,
    Debug,
    Default,
    Eq,
    PartialEq,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[strum(serialize_all = "kebab-case")]
pub enum NormalMode {
    /// One face normal per triangle
    ///
    /// When vertices are welded, each vertex holds the normal of the last
    /// triangle that touched it.
    PerFace,

    /// Face normals summed into every vertex of each triangle
    ///
    /// This requires welded vertices, so it disables duplication.
    #[default]
    PerVertex,
}

/// Settings when extracting an isosurface
#[derive(Copy, Clone, Debug)]
pub struct Settings {
    /// Threshold defining the surface
    ///
    /// Samples strictly greater than this value are inside.
    pub isolevel: f64,

    /// Emit three unshared vertices per triangle
    ///
    /// This is ignored when `normals` is [`NormalMode::PerVertex`]; see
    /// [`Settings::effective_duplicate`].
    pub duplicate: bool,

    /// Normal strategy
    pub normals: NormalMode,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            isolevel: 0.0,
            duplicate: false,
            normals: NormalMode::PerVertex,
        }
    }
}

impl Settings {
    /// Returns whether vertices will actually be duplicated
    pub fn effective_duplicate(&self) -> bool {
        self.duplicate && self.normals != NormalMode::PerVertex
    }
}

////////////////////////////////////////////////////////////////////////////////

/// A flat-shaded triangle mesh
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Mesh {
    /// Vertex positions
    pub coords: Vec<nalgebra::Vector3<f32>>,

    /// Triangles, as indexes into [`self.coords`](Self::coords)
    ///
    /// This is `None` for duplicated meshes, where every three consecutive
    /// vertices form a triangle.
    pub connections: Option<Vec<nalgebra::Vector3<u32>>>,

    /// Unnormalized normals, one per entry in [`self.coords`](Self::coords)
    pub normals: Vec<nalgebra::Vector3<f32>>,

    /// Color of the whole surface
    pub color: Rgb,
}

impl Mesh {
    /// Builds a new mesh
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of triangles
    pub fn triangle_count(&self) -> usize {
        match &self.connections {
            Some(c) => c.len(),
            None => self.coords.len() / 3,
        }
    }

    /// Checks whether the mesh contains no triangles
    pub fn is_empty(&self) -> bool {
        self.triangle_count() == 0
    }

    /// Checks whether vertices are shared between triangles
    pub fn is_welded(&self) -> bool {
        self.connections.is_some()
    }

    /// Iterates over triangles as position triples
    ///
    /// This works the same way for both welded and duplicated meshes.
    pub fn triangles(
        &self,
    ) -> Box<dyn Iterator<Item = [nalgebra::Vector3<f32>; 3]> + '_> {
        match &self.connections {
            Some(c) => Box::new(c.iter().map(|t| {
                [t.x, t.y, t.z].map(|i| self.coords[i as usize])
            })),
            None => Box::new(
                self.coords.chunks_exact(3).map(|t| [t[0], t[1], t[2]]),
            ),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////

/// Extracts an isosurface from a scalar grid
///
/// Returns an error (and logs it) if the grid is not a scalar field.  A flat
/// field, or a grid too thin to contain any cells, produces an empty mesh.
pub fn extract(
    grid: &StructuredGrid,
    settings: &Settings,
    tf: &TransferFunction,
) -> Result<Mesh, Error> {
    if grid.veclen() != 1 {
        let err = Error::NotScalar(grid.veclen());
        log::error!("{err}");
        return Err(err);
    }

    let (min, max) = (grid.min_value(), grid.max_value());
    let duplicate = settings.effective_duplicate();
    if settings.duplicate && !duplicate {
        log::debug!("per-vertex normals require welded vertices");
    }
    let color = tf.color(settings.isolevel, min, max);

    if !(max > min) {
        log::warn!("flat field (min = {min}, max = {max}); mesh is empty");
        return Ok(empty(duplicate, color));
    }
    if grid.resolution().iter().any(|&n| n < 2) {
        log::warn!(
            "grid {:?} contains no cells; mesh is empty",
            grid.resolution()
        );
        return Ok(empty(duplicate, color));
    }

    let start = std::time::Instant::now();
    let lattice = Lattice::new(grid.resolution());
    let mut mesh = with_values!(grid.values(), |v| {
        let field = Field::new(v, lattice, settings.isolevel, (min, max));
        if duplicate {
            extract_duplicated(&field)
        } else {
            extract_welded(&field, settings.normals)
        }
    });
    mesh.color = color;

    log::debug!(
        "extracted {} triangles, {} vertices from {:?} cells in {:?}",
        mesh.triangle_count(),
        mesh.coords.len(),
        lattice.cell_counts(),
        start.elapsed()
    );
    Ok(mesh)
}

fn empty(duplicate: bool, color: Rgb) -> Mesh {
    Mesh {
        connections: (!duplicate).then(Vec::new),
        color,
        ..Mesh::default()
    }
}

/// Emits three fresh vertices per triangle, with flat normals
fn extract_duplicated<T: Sample>(field: &Field<T>) -> Mesh {
    let mut coords = vec![];
    for cell in field.lattice().cells() {
        let mask = field.mask(&cell);
        if mask.is_uniform() {
            continue;
        }
        for [e0, e1, e2] in table::triangles(mask) {
            for e in [e0, e2, e1] {
                coords.push(field.edge_vertex(&cell, e));
            }
        }
    }
    let normals = normals::duplicated(&coords);
    Mesh {
        coords,
        connections: None,
        normals,
        color: Rgb::default(),
    }
}

/// Emits one vertex per crossing grid edge, then connects them
fn extract_welded<T: Sample>(field: &Field<T>, mode: NormalMode) -> Mesh {
    let lattice = *field.lattice();
    let mut builder = MeshBuilder::new(lattice.node_count());

    // First pass: place a vertex on every crossing edge
    let [nx, ny, nz] = lattice.resolution();
    for pos in lattice.nodes() {
        let node = lattice.index(pos);
        let [x, y, z] = pos;
        let inner = [x + 1 < nx, y + 1 < ny, z + 1 < nz];
        for axis in [X, Y, Z] {
            if inner[axis.index()] && field.crosses(node, axis) {
                let mut end = pos;
                end[axis.index()] += 1;
                let v = field.interpolate(pos, end);
                builder.insert(MeshBuilder::key(node, axis), v);
            }
        }
    }

    log::debug!(
        "placed {} vertices on crossing edges",
        builder.vertex_count()
    );

    // Second pass: connect them using the topology table
    for cell in lattice.cells() {
        let mask = field.mask(&cell);
        if mask.is_uniform() {
            continue;
        }
        for [e0, e1, e2] in table::triangles(mask) {
            let [a, b, c] = [e0, e2, e1].map(|e| {
                builder.get(MeshBuilder::edge_key(&cell, e, &lattice))
            });
            builder.push(nalgebra::Vector3::new(a, b, c));
        }
    }

    let (coords, connections) = builder.take();
    let normals = match mode {
        NormalMode::PerFace => normals::per_face(&coords, &connections),
        NormalMode::PerVertex => normals::per_vertex(&coords, &connections),
    };
    Mesh {
        coords,
        connections: Some(connections),
        normals,
        color: Rgb::default(),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_settings() {
        let s = Settings::default();
        assert_eq!(s.isolevel, 0.0);
        assert!(!s.effective_duplicate());

        let s = Settings {
            duplicate: true,
            ..Default::default()
        };
        assert!(!s.effective_duplicate());

        let s = Settings {
            duplicate: true,
            normals: NormalMode::PerFace,
            ..Default::default()
        };
        assert!(s.effective_duplicate());
    }

    #[test]
    fn test_normal_mode_names() {
        let names: Vec<String> =
            NormalMode::iter().map(|m| m.to_string()).collect();
        assert_eq!(names, ["per-face", "per-vertex"]);
        assert_eq!("per-face".parse::<NormalMode>(), Ok(NormalMode::PerFace));
        assert!("smooth".parse::<NormalMode>().is_err());
    }

    #[test]
    fn test_too_thin() {
        let grid = StructuredGrid::scalar([1, 2, 2], vec![0u8, 1, 2, 3])
            .unwrap();
        let mesh = extract(
            &grid,
            &Settings {
                isolevel: 1.5,
                ..Default::default()
            },
            &TransferFunction::default(),
        )
        .unwrap();
        assert!(mesh.is_empty());
        assert!(mesh.is_welded());
    }

    #[test]
    fn test_triangles_iter() {
        let grid = StructuredGrid::scalar(
            [2, 2, 2],
            vec![1.0f64, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
        )
        .unwrap();
        for duplicate in [false, true] {
            let settings = Settings {
                isolevel: 0.5,
                duplicate,
                normals: NormalMode::PerFace,
            };
            let mesh =
                extract(&grid, &settings, &TransferFunction::default())
                    .unwrap();
            assert_eq!(mesh.is_welded(), !duplicate);
            assert_eq!(mesh.triangle_count(), 1);
            assert_eq!(mesh.triangles().count(), 1);
            assert_eq!(mesh.normals.len(), mesh.coords.len());
        }
    }
}
