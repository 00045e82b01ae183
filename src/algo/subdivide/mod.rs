//! Mesh subdivision.
//!
//! # Catmull-Clark Subdivision (Polygon Meshes)
//!
//! Catmull-Clark subdivision (Catmull & Clark, 1978) is an approximating
//! subdivision scheme. This implementation accepts faces of any valence. Each
//! iteration:
//!
//! 1. Creates a face point at each face centroid
//! 2. Creates an edge point from the edge ends and the two adjacent face points
//! 3. Moves original vertices to a weighted average of their neighborhood
//! 4. Splits every face of valence `m` into `m` quads
//!
//! Boundary edges use midpoints and boundary vertices only see their two
//! neighbors along the boundary, so open meshes keep a well-defined rim.
//!
//! # Example
//!
//! ```
//! use patchwork::prelude::*;
//! use patchwork::algo::subdivide::{catmull_clark_subdivide, SubdivideOptions};
//!
//! let mut mesh: HalfEdgeMesh = patchwork::mesh::primitives::cube().unwrap();
//!
//! catmull_clark_subdivide(&mut mesh, &SubdivideOptions::new(2)).unwrap();
//! assert_eq!(mesh.num_faces(), 96);
//! ```
//!
//! # References
//!
//! - Catmull, E. & Clark, J. (1978). "Recursively generated B-spline surfaces
//!   on arbitrary topological meshes." Computer-Aided Design, 10(6), 350-355.

mod catmull_clark;

pub use catmull_clark::{
    catmull_clark_refine, catmull_clark_subdivide, catmull_clark_subdivide_with_progress,
    compute_refinement_points, RefineStats, RefinementPoints,
};

/// Options for subdivision.
#[derive(Debug, Clone)]
pub struct SubdivideOptions {
    /// Number of subdivision iterations.
    pub iterations: usize,

    /// Check connectivity and the Euler characteristic after every pass
    /// (default: true).
    pub verify: bool,
}

impl SubdivideOptions {
    /// Create options with the specified number of iterations.
    pub fn new(iterations: usize) -> Self {
        Self {
            iterations,
            verify: true,
        }
    }

    /// Set the number of iterations.
    #[must_use]
    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    /// Set whether each pass is verified.
    #[must_use]
    pub fn with_verify(mut self, verify: bool) -> Self {
        self.verify = verify;
        self
    }
}

impl Default for SubdivideOptions {
    fn default() -> Self {
        Self::new(1)
    }
}
