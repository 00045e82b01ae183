//! Bicubic Bézier patches.
//!
//! A patch is defined by a 4×4 grid of control points ([`control`]). It can be
//! evaluated at any parameter pair in `[0, 1]²` ([`eval`]) and sampled into a
//! triangle mesh ([`tessellate`]). [`BezierPatch`] bundles a grid with the
//! state an interactive editor needs: the active evaluation strategy and a
//! selected control point.
//!
//! # Example
//!
//! ```
//! use patchwork::patch::{control, evaluate, EvalStrategy};
//!
//! let grid = control::saddle();
//! let corner = evaluate(&grid, 0.0, 0.0, EvalStrategy::DeCasteljau).unwrap();
//! assert_eq!(corner.position, grid[0][0]);
//! ```

mod bezier;
pub mod control;
mod eval;
mod tessellate;

pub use bezier::BezierPatch;
pub use control::{ControlGrid, CONTROL_EDGES};
pub use eval::{bernstein2, bernstein3, evaluate, EvalStrategy, SurfacePoint, SINGULAR_NORMAL_EPSILON};
pub use tessellate::{tessellate, SurfaceMesh, TessellateOptions, DEFAULT_RESOLUTION, MAX_RESOLUTION};
