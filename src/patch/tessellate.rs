//! Uniform tessellation of a Bézier patch.

use nalgebra::{Point3, Vector3};
use tracing::info;

use super::control::ControlGrid;
use super::eval::{evaluate, EvalStrategy};
use crate::error::{MeshError, Result};

/// Samples per side used when none is requested.
pub const DEFAULT_RESOLUTION: usize = 20;

/// Largest accepted resolution.
///
/// At this size a surface holds about 4.2M samples and 25M indices (roughly
/// 300 MB), well inside `u32` index range.
pub const MAX_RESOLUTION: usize = 2048;

/// Options for [`tessellate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TessellateOptions {
    /// Samples per parameter direction, at least 2.
    pub resolution: usize,
    /// Evaluation strategy for every sample.
    pub strategy: EvalStrategy,
}

impl TessellateOptions {
    /// Options with the given resolution and the default strategy.
    pub fn new(resolution: usize) -> Self {
        Self {
            resolution,
            ..Default::default()
        }
    }

    /// Set the resolution.
    #[must_use]
    pub fn with_resolution(mut self, resolution: usize) -> Self {
        self.resolution = resolution;
        self
    }

    /// Set the evaluation strategy.
    #[must_use]
    pub fn with_strategy(mut self, strategy: EvalStrategy) -> Self {
        self.strategy = strategy;
        self
    }
}

impl Default for TessellateOptions {
    fn default() -> Self {
        Self {
            resolution: DEFAULT_RESOLUTION,
            strategy: EvalStrategy::default(),
        }
    }
}

/// Triangulated samples of a patch.
///
/// Sample `(u_i, v_j)` is stored at `i * resolution + j`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SurfaceMesh {
    /// Samples per side.
    pub resolution: usize,
    /// Sample positions.
    pub positions: Vec<Point3<f64>>,
    /// Unit normals, zero at singular samples.
    pub normals: Vec<Vector3<f64>>,
    /// Triangle list, three indices per triangle.
    pub indices: Vec<u32>,
}

impl SurfaceMesh {
    /// Number of samples.
    pub fn num_vertices(&self) -> usize {
        self.positions.len()
    }

    /// Number of triangles.
    pub fn num_triangles(&self) -> usize {
        self.indices.len() / 3
    }

    /// Iterate over the triangles as index triples.
    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.indices.chunks_exact(3).map(|t| [t[0], t[1], t[2]])
    }

    /// Number of samples whose normal is undefined.
    pub fn num_singular(&self) -> usize {
        self.normals.iter().filter(|n| **n == Vector3::zeros()).count()
    }

    /// Check that the arrays agree with the resolution and each other.
    ///
    /// # Errors
    ///
    /// - [`MeshError::BufferMismatch`] if an array has the wrong length
    /// - [`MeshError::IndexOutOfBounds`] if an index does not address a sample
    pub fn validate(&self) -> Result<()> {
        let n = self.resolution;
        let expected_vertices = n * n;
        let expected_indices = 6 * n.saturating_sub(1) * n.saturating_sub(1);

        if self.positions.len() != expected_vertices {
            return Err(MeshError::BufferMismatch {
                what: "surface positions",
                expected: expected_vertices,
                actual: self.positions.len(),
            });
        }
        if self.normals.len() != self.positions.len() {
            return Err(MeshError::BufferMismatch {
                what: "surface normals",
                expected: self.positions.len(),
                actual: self.normals.len(),
            });
        }
        if self.indices.len() != expected_indices {
            return Err(MeshError::BufferMismatch {
                what: "triangle indices",
                expected: expected_indices,
                actual: self.indices.len(),
            });
        }
        if let Some(&index) = self.indices.iter().find(|&&i| i as usize >= self.positions.len()) {
            return Err(MeshError::IndexOutOfBounds {
                index: index as usize,
                len: self.positions.len(),
            });
        }

        Ok(())
    }
}

/// Sample the patch on a uniform `resolution × resolution` grid.
///
/// Each grid cell becomes two triangles, `(i,j) (i+1,j) (i+1,j+1)` and
/// `(i,j) (i+1,j+1) (i,j+1)`, wound so their geometric normals follow
/// `du × dv`.
///
/// # Errors
///
/// Returns [`MeshError::InvalidParameter`] if the resolution is below 2 or
/// above [`MAX_RESOLUTION`].
pub fn tessellate(grid: &ControlGrid, options: &TessellateOptions) -> Result<SurfaceMesh> {
    let n = options.resolution;
    if n < 2 {
        return Err(MeshError::invalid_param("resolution", n, "must be at least 2"));
    }
    if n > MAX_RESOLUTION {
        return Err(MeshError::invalid_param(
            "resolution",
            n,
            "exceeds the maximum resolution of 2048",
        ));
    }

    let step = 1.0 / (n - 1) as f64;
    let mut positions = Vec::with_capacity(n * n);
    let mut normals = Vec::with_capacity(n * n);

    for i in 0..n {
        // Pin the last sample to exactly 1.0.
        let u = if i == n - 1 { 1.0 } else { i as f64 * step };
        for j in 0..n {
            let v = if j == n - 1 { 1.0 } else { j as f64 * step };
            let sample = evaluate(grid, u, v, options.strategy)?;
            positions.push(sample.position);
            normals.push(sample.normal);
        }
    }

    let mut indices = Vec::with_capacity(6 * (n - 1) * (n - 1));
    let index = |i: usize, j: usize| (i * n + j) as u32;
    for i in 0..n - 1 {
        for j in 0..n - 1 {
            indices.extend_from_slice(&[index(i, j), index(i + 1, j), index(i + 1, j + 1)]);
            indices.extend_from_slice(&[index(i, j), index(i + 1, j + 1), index(i, j + 1)]);
        }
    }

    let mesh = SurfaceMesh {
        resolution: n,
        positions,
        normals,
        indices,
    };

    info!(
        resolution = n,
        strategy = %options.strategy,
        vertices = mesh.num_vertices(),
        triangles = mesh.num_triangles(),
        singular = mesh.num_singular(),
        "Tessellated patch"
    );

    Ok(mesh)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patch::control::{bump, saddle};
    use approx::assert_relative_eq;

    #[test]
    fn test_default_options() {
        let options = TessellateOptions::default();
        assert_eq!(options.resolution, 20);
        assert_eq!(options.strategy, EvalStrategy::DeCasteljau);

        let options = TessellateOptions::new(7).with_strategy(EvalStrategy::Bernstein);
        assert_eq!(options.resolution, 7);
        assert_eq!(options.strategy, EvalStrategy::Bernstein);
    }

    #[test]
    fn test_resolution_five() {
        let mesh = tessellate(&saddle(), &TessellateOptions::new(5)).unwrap();

        assert_eq!(mesh.positions.len(), 25);
        assert_eq!(mesh.normals.len(), 25);
        assert_eq!(mesh.indices.len(), 96);
        assert!(mesh.indices.iter().all(|&i| i < 25));
        assert!(mesh.validate().is_ok());
    }

    #[test]
    fn test_resolution_two() {
        let grid = saddle();
        let mesh = tessellate(&grid, &TessellateOptions::new(2)).unwrap();

        assert_eq!(mesh.positions.len(), 4);
        assert_eq!(mesh.indices, vec![0, 2, 3, 0, 3, 1]);
        assert_relative_eq!(mesh.positions[0], grid[0][0], epsilon = 1e-12);
        assert_relative_eq!(mesh.positions[1], grid[0][3], epsilon = 1e-12);
        assert_relative_eq!(mesh.positions[2], grid[3][0], epsilon = 1e-12);
        assert_relative_eq!(mesh.positions[3], grid[3][3], epsilon = 1e-12);
    }

    #[test]
    fn test_rejects_small_resolution() {
        for n in [0, 1] {
            let result = tessellate(&saddle(), &TessellateOptions::new(n));
            assert!(matches!(
                result,
                Err(MeshError::InvalidParameter { name: "resolution", .. })
            ));
        }
    }

    #[test]
    fn test_rejects_oversized_resolution() {
        // Fails before any sample is allocated.
        for n in [MAX_RESOLUTION + 1, 65_535, usize::MAX] {
            let result = tessellate(&saddle(), &TessellateOptions::new(n));
            assert!(matches!(
                result,
                Err(MeshError::InvalidParameter { name: "resolution", .. })
            ));
        }
    }

    #[test]
    fn test_winding_follows_normals() {
        let mesh = tessellate(&bump(0.6), &TessellateOptions::new(8)).unwrap();

        for [a, b, c] in mesh.triangles() {
            let (pa, pb, pc) = (
                mesh.positions[a as usize],
                mesh.positions[b as usize],
                mesh.positions[c as usize],
            );
            let face_normal = (pb - pa).cross(&(pc - pa));
            let average = mesh.normals[a as usize] + mesh.normals[b as usize] + mesh.normals[c as usize];
            assert!(face_normal.dot(&average) > 0.0);
        }
    }

    #[test]
    fn test_strategies_match() {
        let a = tessellate(&saddle(), &TessellateOptions::new(9).with_strategy(EvalStrategy::Bernstein)).unwrap();
        let b = tessellate(&saddle(), &TessellateOptions::new(9).with_strategy(EvalStrategy::DeCasteljau)).unwrap();

        assert_eq!(a.indices, b.indices);
        for (p, q) in a.positions.iter().zip(&b.positions) {
            assert_relative_eq!(p, q, epsilon = 1e-4);
        }
        for (n, m) in a.normals.iter().zip(&b.normals) {
            assert_relative_eq!(n, m, epsilon = 1e-4);
        }
    }

    #[test]
    fn test_validate_detects_inconsistency() {
        let mut mesh = tessellate(&saddle(), &TessellateOptions::new(3)).unwrap();
        mesh.normals.pop();
        assert!(matches!(
            mesh.validate(),
            Err(MeshError::BufferMismatch { what: "surface normals", .. })
        ));

        let mut mesh = tessellate(&saddle(), &TessellateOptions::new(3)).unwrap();
        mesh.indices[4] = 9;
        assert_eq!(mesh.validate(), Err(MeshError::IndexOutOfBounds { index: 9, len: 9 }));
    }

    #[test]
    fn test_degenerate_patch_tessellates() {
        let grid: ControlGrid = [[Point3::origin(); 4]; 4];
        let mesh = tessellate(&grid, &TessellateOptions::new(4)).unwrap();
        assert_eq!(mesh.num_singular(), 16);
        assert!(mesh.validate().is_ok());
    }
}
