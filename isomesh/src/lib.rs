//! `isomesh` extracts triangle meshes from volumetric scalar data.
//!
//! The input is a [`StructuredGrid`](crate::grid::StructuredGrid): a regular
//! 3D lattice of samples, stored with `x` varying fastest, in any of ten
//! numeric element types (signed and unsigned 8 to 64-bit integers, `f32`,
//! and `f64`).  Samples sit at integer coordinates; callers that need world
//! coordinates should transform the output.
//!
//! # Isosurfaces
//! The main operation is [`extract`], which runs Marching Cubes over the
//! grid and returns a [`Mesh`] approximating the surface where the field
//! crosses an isolevel.  Its behavior is controlled by
//! [`Settings`](crate::mesh::Settings):
//!
//! ```
//! use isomesh::{
//!     color::TransferFunction,
//!     grid::StructuredGrid,
//!     mesh::{NormalMode, Settings},
//! };
//!
//! // A single cell with one corner above the isolevel
//! let grid = StructuredGrid::scalar(
//!     [2, 2, 2],
//!     vec![10u8, 0, 0, 0, 0, 0, 0, 0],
//! )?;
//! let settings = Settings {
//!     isolevel: 5.0,
//!     duplicate: true,
//!     normals: NormalMode::PerFace,
//! };
//! let mesh = isomesh::extract(&grid, &settings, &TransferFunction::default())?;
//! assert_eq!(mesh.triangle_count(), 1);
//! assert_eq!(mesh.coords.len(), 3);
//! # Ok::<(), isomesh::Error>(())
//! ```
//!
//! The mesh is flat-shaded with a single color, looked up from the
//! [`TransferFunction`](crate::color::TransferFunction)'s color map at the
//! isolevel.  Normals are left unnormalized.
//!
//! # Wireframes
//! [`edges::extract_edges`] converts the grid's own lattice into colored line
//! segments, which is handy for inspecting small volumes.
#![warn(missing_docs)]

pub mod color;
pub mod edges;
pub mod grid;
pub mod mesh;

mod error;
pub use error::Error;

pub use grid::StructuredGrid;
pub use mesh::{extract, Mesh, Settings};
