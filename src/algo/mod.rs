//! Mesh refinement algorithms.
//!
//! - **Subdivision**: generalized Catmull-Clark on arbitrary polygon meshes
//! - **Progress**: callbacks for reporting multi-pass work

mod progress;
pub mod subdivide;

pub use progress::Progress;
