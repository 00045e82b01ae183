//! Small procedural meshes.
//!
//! These are the shapes the CLI and benchmarks refine; they are also handy
//! fixtures when experimenting with subdivision.

use nalgebra::Point3;

use super::builder::{build_from_polygons, build_from_quads, build_from_triangles};
use super::halfedge::HalfEdgeMesh;
use super::index::MeshIndex;
use crate::error::{MeshError, Result};

/// Unit square in the XY plane: `(0,0,0) (1,0,0) (1,1,0) (0,1,0)`.
pub fn single_quad<I: MeshIndex>() -> Result<HalfEdgeMesh<I>> {
    let vertices = [
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(1.0, 0.0, 0.0),
        Point3::new(1.0, 1.0, 0.0),
        Point3::new(0.0, 1.0, 0.0),
    ];
    build_from_quads(&vertices, &[[0, 1, 2, 3]])
}

/// Closed unit cube made of six outward-facing quads.
pub fn cube<I: MeshIndex>() -> Result<HalfEdgeMesh<I>> {
    let vertices = [
        // Bottom (z = 0)
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(1.0, 0.0, 0.0),
        Point3::new(1.0, 1.0, 0.0),
        Point3::new(0.0, 1.0, 0.0),
        // Top (z = 1)
        Point3::new(0.0, 0.0, 1.0),
        Point3::new(1.0, 0.0, 1.0),
        Point3::new(1.0, 1.0, 1.0),
        Point3::new(0.0, 1.0, 1.0),
    ];
    let faces = [
        [0, 3, 2, 1], // bottom
        [4, 5, 6, 7], // top
        [0, 1, 5, 4], // front
        [2, 3, 7, 6], // back
        [0, 4, 7, 3], // left
        [1, 2, 6, 5], // right
    ];
    build_from_quads(&vertices, &faces)
}

/// Closed tetrahedron made of four triangles.
pub fn tetrahedron<I: MeshIndex>() -> Result<HalfEdgeMesh<I>> {
    let vertices = [
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(1.0, 0.0, 0.0),
        Point3::new(0.5, 1.0, 0.0),
        Point3::new(0.5, 0.5, 1.0),
    ];
    let faces = [
        [0, 2, 1], // bottom
        [0, 1, 3], // front
        [1, 2, 3], // right
        [2, 0, 3], // left
    ];
    build_from_triangles(&vertices, &faces)
}

/// Closed square pyramid: one quad base and four triangular sides.
pub fn pyramid<I: MeshIndex>() -> Result<HalfEdgeMesh<I>> {
    let vertices = [
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(1.0, 0.0, 0.0),
        Point3::new(1.0, 1.0, 0.0),
        Point3::new(0.0, 1.0, 0.0),
        Point3::new(0.5, 0.5, 1.0),
    ];
    let faces: [&[usize]; 5] = [&[0, 3, 2, 1], &[0, 1, 4], &[1, 2, 4], &[2, 3, 4], &[3, 0, 4]];
    build_from_polygons(&vertices, &faces)
}

/// Open `n`×`n` grid of unit quads in the XY plane.
pub fn quad_grid<I: MeshIndex>(n: usize) -> Result<HalfEdgeMesh<I>> {
    if n == 0 {
        return Err(MeshError::invalid_param("n", n, "grid needs at least one cell"));
    }

    let mut vertices = Vec::with_capacity((n + 1) * (n + 1));
    for j in 0..=n {
        for i in 0..=n {
            vertices.push(Point3::new(i as f64, j as f64, 0.0));
        }
    }

    let mut faces = Vec::with_capacity(n * n);
    for j in 0..n {
        for i in 0..n {
            let v00 = j * (n + 1) + i;
            let v10 = v00 + 1;
            let v01 = v00 + (n + 1);
            let v11 = v01 + 1;
            faces.push([v00, v10, v11, v01]);
        }
    }

    build_from_quads(&vertices, &faces)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closed_shapes() {
        let cube: HalfEdgeMesh = cube().unwrap();
        assert!(cube.is_valid());
        assert_eq!(cube.euler_characteristic(), 2);
        assert!(cube.vertex_ids().all(|v| !cube.is_boundary_vertex(v)));

        let tet: HalfEdgeMesh = tetrahedron().unwrap();
        assert!(tet.is_valid());
        assert_eq!(tet.euler_characteristic(), 2);

        let pyramid: HalfEdgeMesh = pyramid().unwrap();
        assert!(pyramid.is_valid());
        assert_eq!(pyramid.num_edges(), 8);
        assert_eq!(pyramid.euler_characteristic(), 2);
    }

    #[test]
    fn test_quad_grid() {
        let grid: HalfEdgeMesh = quad_grid(3).unwrap();
        assert!(grid.is_valid());
        assert_eq!(grid.num_vertices(), 16);
        assert_eq!(grid.num_faces(), 9);
        assert_eq!(grid.num_edges(), 24);
        assert_eq!(grid.euler_characteristic(), 1);

        assert!(quad_grid::<u32>(0).is_err());
    }
}
