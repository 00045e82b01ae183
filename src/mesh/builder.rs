//! Mesh construction utilities.
//!
//! This module provides functions for building half-edge meshes from
//! face-vertex lists, the representation most callers have at hand.

use std::collections::HashMap;

use nalgebra::Point3;

use super::halfedge::HalfEdgeMesh;
use super::index::{HalfEdgeId, MeshIndex, VertexId};
use crate::error::{MeshError, Result};

/// Build a half-edge mesh from vertices and polygonal faces.
///
/// Each face lists its vertex indices in counter-clockwise order and must
/// have at least three distinct vertices. Faces may have different sizes.
///
/// # Errors
///
/// - [`MeshError::EmptyMesh`] if `faces` is empty
/// - [`MeshError::InvalidVertexIndex`] for an out-of-range index
/// - [`MeshError::DegenerateFace`] for faces with fewer than three or repeated vertices
/// - [`MeshError::NonManifoldEdge`] if a directed edge is used twice
///   (more than two faces on an edge, or inconsistent orientation)
/// - [`MeshError::NonManifoldVertex`] if a vertex touches two boundary loops,
///   or joins surfaces that share no edge there (two solids meeting at a point)
///
/// # Example
/// ```
/// use patchwork::mesh::{build_from_polygons, HalfEdgeMesh};
/// use nalgebra::Point3;
///
/// let vertices = vec![
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(1.0, 1.0, 0.0),
///     Point3::new(0.0, 1.0, 0.0),
///     Point3::new(0.5, 1.5, 0.0),
/// ];
/// let faces = vec![vec![0, 1, 2, 3], vec![3, 2, 4]];
///
/// let mesh: HalfEdgeMesh = build_from_polygons(&vertices, &faces).unwrap();
/// assert_eq!(mesh.num_faces(), 2);
/// assert_eq!(mesh.num_edges(), 6);
/// ```
pub fn build_from_polygons<I, F>(vertices: &[Point3<f64>], faces: &[F]) -> Result<HalfEdgeMesh<I>>
where
    I: MeshIndex,
    F: AsRef<[usize]>,
{
    if faces.is_empty() {
        return Err(MeshError::EmptyMesh);
    }

    for (fi, face) in faces.iter().enumerate() {
        let face = face.as_ref();
        if face.len() < 3 {
            return Err(MeshError::DegenerateFace { face: fi });
        }
        for (k, &vi) in face.iter().enumerate() {
            if vi >= vertices.len() {
                return Err(MeshError::InvalidVertexIndex { face: fi, vertex: vi });
            }
            if face[..k].contains(&vi) {
                return Err(MeshError::DegenerateFace { face: fi });
            }
        }
    }

    let total_corners: usize = faces.iter().map(|f| f.as_ref().len()).sum();
    let mut mesh = HalfEdgeMesh::with_capacity(vertices.len(), total_corners, faces.len());

    let vertex_ids: Vec<VertexId<I>> = vertices.iter().map(|&pos| mesh.add_vertex(pos)).collect();

    // Directed edge (v0, v1) -> half-edge running v0 -> v1.
    let mut edge_map: HashMap<(usize, usize), HalfEdgeId<I>> = HashMap::with_capacity(total_corners);

    // First pass: create half-edge pairs and faces
    for face in faces {
        let face = face.as_ref();
        let n = face.len();

        let mut loop_hes = Vec::with_capacity(n);
        for i in 0..n {
            let (v0, v1) = (face[i], face[(i + 1) % n]);

            let he = match edge_map.get(&(v0, v1)) {
                Some(&he) => {
                    if !mesh.is_boundary_halfedge(he) {
                        return Err(MeshError::NonManifoldEdge { v0, v1 });
                    }
                    he
                }
                None => {
                    let he = mesh.new_edge(vertex_ids[v0], vertex_ids[v1]);
                    edge_map.insert((v0, v1), he);
                    edge_map.insert((v1, v0), mesh.twin(he));
                    he
                }
            };
            loop_hes.push(he);
        }

        let face_id = mesh.new_face(loop_hes[0]);
        for i in 0..n {
            let he = loop_hes[i];
            mesh.link(he, loop_hes[(i + 1) % n]);
            mesh.halfedge_mut(he).face = face_id;
            // Will be overwritten for shared vertices
            mesh.vertex_mut(vertex_ids[face[i]]).halfedge = he;
        }
    }

    // Second pass: link boundary half-edges into loops
    link_boundary_loops(&mut mesh)?;

    // Third pass: ensure boundary vertices point to boundary half-edges
    for v in vertex_ids {
        mesh.adjust_outgoing_halfedge(v);
    }

    if let Some(v) = mesh.find_pinched_vertex() {
        return Err(MeshError::NonManifoldVertex { vertex: v.index() });
    }

    Ok(mesh)
}

/// Link boundary half-edges into proper loops.
fn link_boundary_loops<I: MeshIndex>(mesh: &mut HalfEdgeMesh<I>) -> Result<()> {
    let boundary_hes: Vec<HalfEdgeId<I>> = mesh
        .halfedge_ids()
        .filter(|&he| mesh.is_boundary_halfedge(he))
        .collect();

    // A manifold vertex has at most one outgoing boundary half-edge.
    let mut outgoing: HashMap<VertexId<I>, HalfEdgeId<I>> = HashMap::new();
    for &he in &boundary_hes {
        let origin = mesh.origin(he);
        if outgoing.insert(origin, he).is_some() {
            return Err(MeshError::NonManifoldVertex {
                vertex: origin.index(),
            });
        }
    }

    for &he in &boundary_hes {
        // The next boundary half-edge starts where this one ends
        let dest = mesh.dest(he);
        match outgoing.get(&dest) {
            Some(&next_he) => mesh.link(he, next_he),
            None => {
                return Err(MeshError::NonManifold {
                    details: format!("boundary loop is open at vertex {}", dest.index()),
                })
            }
        }
    }

    Ok(())
}

/// Build a half-edge mesh from vertices and triangle faces.
pub fn build_from_triangles<I: MeshIndex>(
    vertices: &[Point3<f64>],
    faces: &[[usize; 3]],
) -> Result<HalfEdgeMesh<I>> {
    build_from_polygons(vertices, faces)
}

/// Build a half-edge mesh from vertices and quad faces (counter-clockwise).
pub fn build_from_quads<I: MeshIndex>(
    vertices: &[Point3<f64>],
    faces: &[[usize; 4]],
) -> Result<HalfEdgeMesh<I>> {
    build_from_polygons(vertices, faces)
}

/// Convert a half-edge mesh back to a face-vertex representation.
///
/// Returns a `(vertices, faces)` tuple; each face lists its vertex indices in
/// boundary order starting at the face's stored half-edge.
pub fn to_face_vertex_polygons<I: MeshIndex>(
    mesh: &HalfEdgeMesh<I>,
) -> (Vec<Point3<f64>>, Vec<Vec<usize>>) {
    let vertices: Vec<Point3<f64>> = mesh.vertex_ids().map(|v| *mesh.position(v)).collect();

    let faces: Vec<Vec<usize>> = mesh
        .face_ids()
        .map(|f| mesh.face_vertices(f).map(|v| v.index()).collect())
        .collect();

    (vertices, faces)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::FaceId;

    fn single_triangle() -> (Vec<Point3<f64>>, Vec<[usize; 3]>) {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.5, 1.0, 0.0),
        ];
        (vertices, vec![[0, 1, 2]])
    }

    fn two_quads() -> (Vec<Point3<f64>>, Vec<[usize; 4]>) {
        // Two quads sharing an edge (1-2)
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
            Point3::new(2.0, 1.0, 0.0),
        ];
        (vertices, vec![[0, 1, 2, 3], [1, 4, 5, 2]])
    }

    #[test]
    fn test_single_triangle() {
        let (vertices, faces) = single_triangle();
        let mesh: HalfEdgeMesh<u32> = build_from_triangles(&vertices, &faces).unwrap();

        assert_eq!(mesh.num_vertices(), 3);
        assert_eq!(mesh.num_faces(), 1);
        // 3 interior half-edges + 3 boundary half-edges
        assert_eq!(mesh.num_halfedges(), 6);
        assert!(mesh.is_valid());

        for v in mesh.vertex_ids() {
            assert!(mesh.is_boundary_vertex(v));
            assert!(mesh.is_boundary_halfedge(mesh.vertex(v).halfedge));
        }
    }

    #[test]
    fn test_two_quads() {
        let (vertices, faces) = two_quads();
        let mesh: HalfEdgeMesh<u32> = build_from_quads(&vertices, &faces).unwrap();

        assert_eq!(mesh.num_vertices(), 6);
        assert_eq!(mesh.num_faces(), 2);
        // 7 edges, the shared one has no boundary half-edge
        assert_eq!(mesh.num_edges(), 7);
        assert_eq!(mesh.num_halfedges(), 14);
        assert!(mesh.is_valid());
        assert!(mesh.is_quad_mesh());
        assert_eq!(mesh.edge_ids().filter(|&e| !mesh.is_boundary_edge(e)).count(), 1);
    }

    #[test]
    fn test_mixed_polygons() {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.5, 0.5, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(0.5, 2.0, 0.0),
        ];
        let faces = vec![vec![0, 1, 2, 3, 4], vec![4, 3, 5]];
        let mesh: HalfEdgeMesh = build_from_polygons(&vertices, &faces).unwrap();

        assert!(mesh.is_valid());
        assert_eq!(mesh.face_valence(FaceId::new(0)), 5);
        assert_eq!(mesh.face_valence(FaceId::new(1)), 3);
        assert_eq!(mesh.euler_characteristic(), 1);
    }

    #[test]
    fn test_roundtrip() {
        let (vertices, faces) = two_quads();
        let mesh: HalfEdgeMesh<u32> = build_from_quads(&vertices, &faces).unwrap();

        let (out_verts, out_faces) = to_face_vertex_polygons(&mesh);

        assert_eq!(out_verts, vertices);
        assert_eq!(out_faces, vec![vec![0, 1, 2, 3], vec![1, 4, 5, 2]]);
    }

    #[test]
    fn test_invalid_vertex_index() {
        let vertices = vec![Point3::new(0.0, 0.0, 0.0)];
        let result: Result<HalfEdgeMesh<u32>> = build_from_triangles(&vertices, &[[0, 1, 2]]);
        assert!(matches!(result, Err(MeshError::InvalidVertexIndex { face: 0, vertex: 1 })));
    }

    #[test]
    fn test_degenerate_faces() {
        let (vertices, _) = single_triangle();

        let repeated: Result<HalfEdgeMesh<u32>> = build_from_triangles(&vertices, &[[0, 0, 2]]);
        assert!(matches!(repeated, Err(MeshError::DegenerateFace { face: 0 })));

        let two_sided: Result<HalfEdgeMesh<u32>> = build_from_polygons(&vertices, &[vec![0, 1]]);
        assert!(matches!(two_sided, Err(MeshError::DegenerateFace { face: 0 })));
    }

    #[test]
    fn test_empty_faces() {
        let (vertices, _) = single_triangle();
        let faces: Vec<Vec<usize>> = Vec::new();
        let result: Result<HalfEdgeMesh<u32>> = build_from_polygons(&vertices, &faces);
        assert!(matches!(result, Err(MeshError::EmptyMesh)));
    }

    #[test]
    fn test_non_manifold_edge() {
        // Three triangles on edge 0-1
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.5, 1.0, 0.0),
            Point3::new(0.5, -1.0, 0.0),
            Point3::new(0.5, 0.0, 1.0),
        ];
        let faces = vec![[0, 1, 2], [1, 0, 3], [0, 1, 4]];
        let result: Result<HalfEdgeMesh<u32>> = build_from_triangles(&vertices, &faces);
        assert!(matches!(result, Err(MeshError::NonManifoldEdge { v0: 0, v1: 1 })));
    }

    #[test]
    fn test_bowtie_vertex_rejected() {
        // Two triangles touching only at vertex 0
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(-1.0, 0.0, 0.0),
            Point3::new(-1.0, -1.0, 0.0),
        ];
        let faces = vec![[0, 1, 2], [0, 3, 4]];
        let result: Result<HalfEdgeMesh<u32>> = build_from_triangles(&vertices, &faces);
        assert!(matches!(result, Err(MeshError::NonManifoldVertex { vertex: 0 })));
    }

    #[test]
    fn test_closed_fans_sharing_vertex_rejected() {
        // Two tetrahedra touching only at vertex 0, mirrored about z = 0
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 1.0),
            Point3::new(-0.5, 0.866, 1.0),
            Point3::new(-0.5, -0.866, 1.0),
            Point3::new(1.0, 0.0, -1.0),
            Point3::new(-0.5, 0.866, -1.0),
            Point3::new(-0.5, -0.866, -1.0),
        ];
        let faces = vec![
            [0, 2, 1],
            [0, 1, 3],
            [1, 2, 3],
            [2, 0, 3],
            [0, 4, 5],
            [0, 6, 4],
            [4, 6, 5],
            [5, 6, 0],
        ];

        let result: Result<HalfEdgeMesh<u32>> = build_from_triangles(&vertices, &faces);
        assert!(matches!(result, Err(MeshError::NonManifoldVertex { vertex: 0 })));

        // Either half alone is fine.
        let upper: HalfEdgeMesh<u32> = build_from_triangles(&vertices, &faces[..4]).unwrap();
        assert!(upper.find_pinched_vertex().is_none());
        assert_eq!(upper.valence(VertexId::new(0)), 3);
    }
}
