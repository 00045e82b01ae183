//! Patchwork CLI - tessellate Bézier patches and subdivide polygon meshes.
//!
//! Usage: patchwork [-v] <COMMAND> [OPTIONS]
//!
//! Run `patchwork --help` for available commands.

use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use patchwork::algo::subdivide::{self, SubdivideOptions};
use patchwork::algo::Progress;
use patchwork::buffers::RenderBuffers;
use patchwork::mesh::{primitives, HalfEdgeMesh};
use patchwork::patch::{control, BezierPatch, ControlGrid, EvalStrategy, DEFAULT_RESOLUTION};

#[derive(Parser)]
#[command(name = "patchwork")]
#[command(author, version, about = "Bezier patch and subdivision surface CLI", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Tessellate a bicubic Bezier patch
    Tessellate {
        /// Control grid to tessellate
        #[arg(short, long, value_enum, default_value = "saddle")]
        patch: PatchShape,

        /// Samples per parameter direction
        #[arg(short, long, default_value_t = DEFAULT_RESOLUTION)]
        resolution: usize,

        /// Evaluation strategy
        #[arg(short, long, value_enum, default_value = "de-casteljau")]
        strategy: Strategy,

        /// Also evaluate with the other strategy and report the largest deviation
        #[arg(long)]
        compare: bool,
    },

    /// Subdivide a built-in polygon mesh with Catmull-Clark
    Subdivide {
        /// Base mesh
        #[arg(long, value_enum, default_value = "cube")]
        shape: Shape,

        /// Cells per side for the grid shape
        #[arg(long, default_value = "3")]
        grid_size: usize,

        /// Number of subdivision iterations
        #[arg(short, long, default_value = "1")]
        iterations: usize,

        /// Skip the connectivity check after each pass
        #[arg(long)]
        no_verify: bool,
    },

    /// Display information about a built-in polygon mesh
    Info {
        /// Base mesh
        #[arg(long, value_enum, default_value = "cube")]
        shape: Shape,

        /// Cells per side for the grid shape
        #[arg(long, default_value = "3")]
        grid_size: usize,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum PatchShape {
    /// Hyperbolic paraboloid
    Saddle,
    /// Dome with raised inner control points
    Bump,
    /// Flat square
    Planar,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum Strategy {
    /// Closed-form Bernstein polynomials
    Bernstein,
    /// Recursive corner cutting
    DeCasteljau,
}

impl From<Strategy> for EvalStrategy {
    fn from(s: Strategy) -> Self {
        match s {
            Strategy::Bernstein => EvalStrategy::Bernstein,
            Strategy::DeCasteljau => EvalStrategy::DeCasteljau,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum Shape {
    /// Closed unit cube (6 quads)
    Cube,
    /// Closed tetrahedron (4 triangles)
    Tetrahedron,
    /// Square pyramid (1 quad, 4 triangles)
    Pyramid,
    /// Single open quad
    Quad,
    /// Open grid of quads
    Grid,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Tessellate {
            patch,
            resolution,
            strategy,
            compare,
        } => {
            cmd_tessellate(patch, resolution, strategy.into(), compare)?;
        }

        Commands::Subdivide {
            shape,
            grid_size,
            iterations,
            no_verify,
        } => {
            cmd_subdivide(shape, grid_size, iterations, !no_verify)?;
        }

        Commands::Info { shape, grid_size } => {
            cmd_info(shape, grid_size)?;
        }
    }

    Ok(())
}

/// Create a progress reporter that displays a progress bar on the terminal.
fn create_progress() -> Progress {
    let max_percent = Arc::new(AtomicUsize::new(0));

    Progress::new(move |current, total, message| {
        if total == 0 {
            return;
        }

        let percent = if current >= total {
            100
        } else {
            ((current * 100) + (total / 2)) / total
        };

        // Only redraw when the bar moves forward.
        let previous = max_percent.fetch_max(percent, Ordering::Relaxed);
        if percent <= previous && percent != 100 {
            return;
        }

        let bar_width = 30;
        let filled = (percent * bar_width) / 100;
        let bar = "=".repeat(filled);
        let space = " ".repeat(bar_width - filled);

        eprint!("\r[{}{}] {:3}% {}", bar, space, percent, message);
        let _ = std::io::stderr().flush();

        if current >= total {
            eprintln!();
        }
    })
}

fn control_grid(shape: PatchShape) -> ControlGrid {
    match shape {
        PatchShape::Saddle => control::saddle(),
        PatchShape::Bump => control::bump(0.75),
        PatchShape::Planar => control::planar(1.0),
    }
}

fn build_shape(shape: Shape, grid_size: usize) -> patchwork::error::Result<HalfEdgeMesh> {
    match shape {
        Shape::Cube => primitives::cube(),
        Shape::Tetrahedron => primitives::tetrahedron(),
        Shape::Pyramid => primitives::pyramid(),
        Shape::Quad => primitives::single_quad(),
        Shape::Grid => primitives::quad_grid(grid_size),
    }
}

fn cmd_tessellate(
    shape: PatchShape,
    resolution: usize,
    strategy: EvalStrategy,
    compare: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut patch = BezierPatch::new(control_grid(shape));
    patch.set_strategy(strategy);

    println!("Tessellating {}x{} samples ({})...", resolution, resolution, strategy);

    let start = Instant::now();
    let surface = patch.tessellate(resolution)?;
    let elapsed = start.elapsed();
    surface.validate()?;

    println!("Vertices: {}", surface.num_vertices());
    println!("Triangles: {}", surface.num_triangles());
    println!("Singular normals: {}", surface.num_singular());

    let (min, max) = patch.bounding_box();
    println!("Bounding box: ({:.3}, {:.3}, {:.3}) to ({:.3}, {:.3}, {:.3})",
        min.x, min.y, min.z, max.x, max.y, max.z);

    let surface_buffers = RenderBuffers::from_surface(&surface);
    let polygon_buffers = RenderBuffers::from_control_polygon(patch.control_points());
    surface_buffers.validate()?;
    polygon_buffers.validate()?;
    println!(
        "Buffers: {} position bytes, {} normal bytes, {} index bytes, {} control segments",
        surface_buffers.position_bytes().len(),
        surface_buffers.normal_bytes().len(),
        surface_buffers.index_bytes().len(),
        polygon_buffers.num_primitives()
    );

    if compare {
        patch.toggle_strategy();
        let other = patch.tessellate(resolution)?;

        let position_error = surface
            .positions
            .iter()
            .zip(&other.positions)
            .map(|(p, q)| (p - q).norm())
            .fold(0.0_f64, f64::max);
        let normal_error = surface
            .normals
            .iter()
            .zip(&other.normals)
            .map(|(n, m)| (n - m).norm())
            .fold(0.0_f64, f64::max);

        println!("Max deviation vs {}: position {:.3e}, normal {:.3e}",
            patch.strategy(), position_error, normal_error);
    }

    println!("Done ({:.2?})", elapsed);

    Ok(())
}

fn cmd_subdivide(
    shape: Shape,
    grid_size: usize,
    iterations: usize,
    verify: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut mesh = build_shape(shape, grid_size)?;

    println!("Base: {} vertices, {} edges, {} faces", mesh.num_vertices(), mesh.num_edges(), mesh.num_faces());

    let options = SubdivideOptions::new(iterations).with_verify(verify);
    let progress = create_progress();

    println!("Applying Catmull-Clark subdivision ({} iterations)...", iterations);
    let start = Instant::now();
    subdivide::catmull_clark_subdivide_with_progress(&mut mesh, &options, &progress)?;
    let elapsed = start.elapsed();

    println!("Result: {} vertices, {} edges, {} faces", mesh.num_vertices(), mesh.num_edges(), mesh.num_faces());
    println!("Euler characteristic: {}", mesh.euler_characteristic());

    let buffers = RenderBuffers::from_mesh(&mesh);
    buffers.validate()?;
    println!("Render triangles: {}", buffers.num_primitives());
    println!("Done ({:.2?})", elapsed);

    Ok(())
}

fn cmd_info(shape: Shape, grid_size: usize) -> Result<(), Box<dyn std::error::Error>> {
    let mesh = build_shape(shape, grid_size)?;

    println!("Vertices: {}", mesh.num_vertices());
    println!("Edges: {}", mesh.num_edges());
    println!("Faces: {}", mesh.num_faces());
    println!("Half-edges: {}", mesh.num_halfedges());
    println!("Euler characteristic: {}", mesh.euler_characteristic());

    let mut min_area = f64::MAX;
    let mut max_area = 0.0_f64;
    for fid in mesh.face_ids() {
        let area = mesh.face_area(fid);
        min_area = min_area.min(area);
        max_area = max_area.max(area);
    }

    println!("Surface area: {:.6}", mesh.surface_area());
    println!("Face area range: [{:.6}, {:.6}]", min_area, max_area);

    if let Some((min, max)) = mesh.bounding_box() {
        println!("Bounding box: ({:.3}, {:.3}, {:.3}) to ({:.3}, {:.3}, {:.3})",
            min.x, min.y, min.z, max.x, max.y, max.z);
    }

    if mesh.is_triangle_mesh() {
        println!("Mesh type: Triangle mesh");
    } else if mesh.is_quad_mesh() {
        println!("Mesh type: Quad mesh");
    } else {
        println!("Mesh type: Mixed polygon mesh");
    }

    let boundary_verts = mesh.vertex_ids().filter(|&v| mesh.is_boundary_vertex(v)).count();
    if boundary_verts == 0 {
        println!("Topology: Closed (no boundary)");
    } else {
        println!("Topology: Open ({} boundary vertices)", boundary_verts);
    }

    Ok(())
}
