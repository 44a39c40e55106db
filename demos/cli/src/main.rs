use std::path::PathBuf;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use env_logger::Env;
use log::info;

use isomesh::{
    color::{ColorMap, TransferFunction},
    mesh::NormalMode,
    StructuredGrid,
};

/// Isosurface and wireframe extraction from volume data
#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Args {
    #[clap(subcommand)]
    cmd: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Extract an isosurface with Marching Cubes
    Mesh {
        #[clap(flatten)]
        input: GridSource,

        #[clap(flatten)]
        settings: MeshSettings,
    },

    /// Extract the grid's lattice as colored line segments
    Edges {
        #[clap(flatten)]
        input: GridSource,

        /// Number of entries in the rainbow color map
        #[clap(long, default_value_t = 256)]
        colors: usize,
    },
}

/// Built-in synthetic fields, sampled over `[-1, 1]³`
#[derive(ValueEnum, Clone, Copy, Debug)]
enum Field {
    Sphere,
    Gyroid,
    Torus,
}

impl Field {
    /// Evaluates the field; positive values are inside
    fn eval(self, x: f32, y: f32, z: f32) -> f32 {
        match self {
            Field::Sphere => 0.6 - (x * x + y * y + z * z).sqrt(),
            Field::Gyroid => {
                let k = std::f32::consts::TAU;
                let (x, y, z) = (x * k, y * k, z * k);
                x.sin() * y.cos() + y.sin() * z.cos() + z.sin() * x.cos()
            }
            Field::Torus => {
                let q = (x * x + y * y).sqrt() - 0.6;
                0.25 - (q * q + z * z).sqrt()
            }
        }
    }
}

#[derive(Parser)]
struct GridSource {
    /// Raw little-endian sample file
    #[clap(long, conflicts_with = "field", requires_all = ["dims", "ty"])]
    raw: Option<PathBuf>,

    /// Grid resolution of the raw file
    #[clap(long, num_args = 3, value_names = ["NX", "NY", "NZ"])]
    dims: Option<Vec<usize>>,

    /// Element type of the raw file (`i8`, `u16`, `f32`, ...)
    #[clap(long = "type", id = "ty")]
    ty: Option<String>,

    /// Components per node in the raw file
    #[clap(long, default_value_t = 1)]
    veclen: usize,

    /// Synthetic field to sample instead of a raw file
    #[clap(long, value_enum, required_unless_present = "raw")]
    field: Option<Field>,

    /// Samples per axis for a synthetic field
    #[clap(long, default_value_t = 64)]
    size: usize,
}

impl GridSource {
    fn load(&self) -> Result<StructuredGrid> {
        let grid = match (&self.raw, self.field) {
            (Some(path), _) => {
                let (Some(dims), Some(ty)) = (&self.dims, &self.ty) else {
                    bail!("--raw requires --dims and --type");
                };
                let resolution = [dims[0], dims[1], dims[2]];
                let bytes = std::fs::read(path)
                    .with_context(|| format!("failed to read {path:?}"))?;
                StructuredGrid::from_bytes(
                    resolution,
                    self.veclen,
                    ty,
                    &bytes,
                )?
            }
            (None, Some(field)) => {
                let n = self.size;
                if n < 2 {
                    bail!("--size must be at least 2");
                }
                let div = (n - 1) as f32;
                let scale = |i: usize| -1.0 + 2.0 * (i as f32) / div;
                let mut values = Vec::with_capacity(n * n * n);
                for z in 0..n {
                    for y in 0..n {
                        for x in 0..n {
                            let v = field.eval(scale(x), scale(y), scale(z));
                            values.push(v);
                        }
                    }
                }
                StructuredGrid::scalar([n, n, n], values)?
            }
            (None, None) => bail!("either --raw or --field is required"),
        };
        Ok(grid)
    }
}

#[derive(Parser)]
struct MeshSettings {
    /// Threshold defining the surface
    #[clap(short, long, default_value_t = 0.0, allow_hyphen_values = true)]
    isolevel: f64,

    /// Emit three unshared vertices per triangle
    #[clap(long)]
    duplicate: bool,

    /// Normal strategy
    #[clap(long, default_value_t = NormalMode::PerVertex)]
    normals: NormalMode,

    /// Name of a `.stl` file to write
    #[clap(short, long)]
    out: Option<PathBuf>,

    /// Number of times to extract (for benchmarking)
    #[clap(short = 'N', default_value_t = 1)]
    n: usize,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .init();

    let args = Args::parse();
    match args.cmd {
        Command::Mesh { input, settings } => {
            let now = Instant::now();
            let grid = input.load()?;
            info!(
                "Loaded {:?} grid in {:?} (range {} to {})",
                grid.resolution(),
                now.elapsed(),
                grid.min_value(),
                grid.max_value()
            );

            let cfg = isomesh::Settings {
                isolevel: settings.isolevel,
                duplicate: settings.duplicate,
                normals: settings.normals,
            };
            let tf = TransferFunction::default();
            let start = Instant::now();
            let mut mesh = isomesh::Mesh::new();
            for _ in 0..settings.n {
                mesh = isomesh::extract(&grid, &cfg, &tf)?;
            }
            info!(
                "Extracted {}x at {:?} ms/iter",
                settings.n,
                start.elapsed().as_micros() as f64
                    / 1000.0
                    / (settings.n as f64)
            );
            info!(
                "{} triangles, {} vertices ({}), color {:?}",
                mesh.triangle_count(),
                mesh.coords.len(),
                if mesh.is_welded() { "welded" } else { "duplicated" },
                mesh.color
            );
            if let Some(out) = settings.out {
                info!("Writing STL to {out:?}");
                mesh.write_stl(&mut std::fs::File::create(out)?)?;
            }
        }
        Command::Edges { input, colors } => {
            let grid = input.load()?;
            let tf = TransferFunction::new(ColorMap::rainbow(colors)?);
            let start = Instant::now();
            let lines = isomesh::edges::extract_edges(&grid, &tf)?;
            info!(
                "Extracted {} vertices, {} segments in {:?}",
                lines.coords.len(),
                lines.segment_count(),
                start.elapsed()
            );
        }
    }

    Ok(())
}
