//! # Patchwork
//!
//! Bicubic Bézier patches and Catmull-Clark subdivision surfaces.
//!
//! Patchwork covers the two classic ways of describing a smooth surface with a
//! handful of control points:
//!
//! - **Bézier patches** ([`patch`]): a 4×4 control grid evaluated with either
//!   Bernstein polynomials or de Casteljau's construction, and tessellated into
//!   a triangle grid
//! - **Subdivision surfaces** ([`algo::subdivide`]): generalized Catmull-Clark
//!   refinement of arbitrary polygon meshes stored in a half-edge structure
//!   ([`mesh`])
//!
//! Results can be flattened into upload-ready arrays with [`buffers`].
//!
//! ## Tessellating a Patch
//!
//! ```
//! use patchwork::prelude::*;
//! use patchwork::patch::control;
//!
//! let patch = BezierPatch::new(control::saddle());
//! let surface = patch.tessellate(5).unwrap();
//!
//! assert_eq!(surface.positions.len(), 25);
//! assert_eq!(surface.indices.len(), 96);
//! ```
//!
//! ## Subdividing a Mesh
//!
//! ```
//! use patchwork::prelude::*;
//! use nalgebra::Point3;
//!
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.5, 1.0, 0.0),
//!     Point3::new(0.5, 0.5, 1.0),
//! ];
//!
//! let faces = vec![
//!     [0, 2, 1],  // bottom
//!     [0, 1, 3],  // front
//!     [1, 2, 3],  // right
//!     [2, 0, 3],  // left
//! ];
//!
//! let mut mesh: HalfEdgeMesh = build_from_triangles(&vertices, &faces).unwrap();
//! let stats = catmull_clark_refine(&mut mesh).unwrap();
//!
//! // Every triangle became three quads.
//! assert_eq!(stats.faces_after, 12);
//! assert!(mesh.is_quad_mesh());
//! ```
//!
//! ## Mesh Traversal
//!
//! ```
//! use patchwork::prelude::*;
//!
//! let mesh: HalfEdgeMesh = patchwork::mesh::primitives::cube().unwrap();
//!
//! let v = VertexId::new(0);
//! for neighbor in mesh.vertex_neighbors(v) {
//!     println!("Neighbor: {:?}", neighbor);
//! }
//!
//! let f = FaceId::new(0);
//! let corners: Vec<VertexId> = mesh.face_vertices(f).collect();
//! assert_eq!(corners.len(), 4);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algo;
pub mod buffers;
pub mod error;
pub mod mesh;
pub mod patch;

/// Prelude module for convenient imports.
///
/// This module re-exports the most commonly used types and functions:
///
/// ```
/// use patchwork::prelude::*;
/// ```
pub mod prelude {
    pub use crate::algo::subdivide::{catmull_clark_refine, catmull_clark_subdivide, SubdivideOptions};
    pub use crate::buffers::RenderBuffers;
    pub use crate::error::{MeshError, Result};
    pub use crate::mesh::{
        build_from_polygons, build_from_quads, build_from_triangles, EdgeId, FaceId, HalfEdgeId,
        HalfEdgeMesh, MeshIndex, VertexId,
    };
    pub use crate::patch::{BezierPatch, EvalStrategy, SurfaceMesh, TessellateOptions};
}

// Re-export nalgebra types for convenience
pub use nalgebra;
