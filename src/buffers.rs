//! Render-ready vertex and index arrays.
//!
//! Everything the library produces can be flattened into [`RenderBuffers`]:
//! single precision positions and normals plus a `u32` index list, in a layout
//! that can be handed to a graphics API as raw bytes.

use bytemuck::{Pod, Zeroable};
use nalgebra::{Point3, Vector3};

use crate::error::{MeshError, Result};
use crate::mesh::{HalfEdgeMesh, MeshIndex};
use crate::patch::{ControlGrid, SurfaceMesh, CONTROL_EDGES};

/// Interleaved vertex with position and normal.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct RenderVertex {
    /// Position.
    pub position: [f32; 3],
    /// Unit normal, or zero where undefined.
    pub normal: [f32; 3],
}

/// How the index list is assembled into primitives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    /// Three indices per triangle.
    Triangles,
    /// Two indices per line segment.
    Lines,
}

impl Primitive {
    /// Indices consumed per primitive.
    pub fn arity(self) -> usize {
        match self {
            Primitive::Triangles => 3,
            Primitive::Lines => 2,
        }
    }
}

/// Flat arrays ready for upload.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderBuffers {
    /// Vertex positions.
    pub positions: Vec<[f32; 3]>,
    /// Vertex normals, one per position.
    pub normals: Vec<[f32; 3]>,
    /// Index list.
    pub indices: Vec<u32>,
    /// Primitive kind of the index list.
    pub primitive: Primitive,
    /// Vertex average, for camera targeting.
    pub center: [f32; 3],
    /// Largest distance from `center` to a vertex.
    pub radius: f32,
}

fn to_f32(p: &Point3<f64>) -> [f32; 3] {
    [p.x as f32, p.y as f32, p.z as f32]
}

fn normal_to_f32(n: &Vector3<f64>) -> [f32; 3] {
    [n.x as f32, n.y as f32, n.z as f32]
}

impl RenderBuffers {
    fn new(positions: Vec<[f32; 3]>, normals: Vec<[f32; 3]>, indices: Vec<u32>, primitive: Primitive) -> Self {
        let (center, radius) = bounds(&positions);
        Self {
            positions,
            normals,
            indices,
            primitive,
            center,
            radius,
        }
    }

    /// Triangles of a tessellated patch.
    pub fn from_surface(surface: &SurfaceMesh) -> Self {
        Self::new(
            surface.positions.iter().map(to_f32).collect(),
            surface.normals.iter().map(normal_to_f32).collect(),
            surface.indices.clone(),
            Primitive::Triangles,
        )
    }

    /// Line segments of the control polygon. Normals are zero.
    pub fn from_control_polygon(grid: &ControlGrid) -> Self {
        let positions: Vec<[f32; 3]> = grid.iter().flatten().map(to_f32).collect();
        let normals = vec![[0.0; 3]; positions.len()];
        let indices = CONTROL_EDGES.iter().flatten().copied().collect();
        Self::new(positions, normals, indices, Primitive::Lines)
    }

    /// Triangles of a polygon mesh with smooth shading.
    ///
    /// Every face is fan-triangulated from its first vertex; vertices are
    /// shared and carry area-weighted normals.
    pub fn from_mesh<I: MeshIndex>(mesh: &HalfEdgeMesh<I>) -> Self {
        let positions = mesh.vertex_ids().map(|v| to_f32(mesh.position(v))).collect();
        let normals = mesh.vertex_ids().map(|v| normal_to_f32(&mesh.vertex_normal(v))).collect();

        let mut indices = Vec::with_capacity(mesh.num_halfedges() * 3 / 2);
        for f in mesh.face_ids() {
            let corners: Vec<u32> = mesh.face_vertices(f).map(|v| v.index() as u32).collect();
            for k in 1..corners.len().saturating_sub(1) {
                indices.extend_from_slice(&[corners[0], corners[k], corners[k + 1]]);
            }
        }

        Self::new(positions, normals, indices, Primitive::Triangles)
    }

    /// Line segments along every edge of a polygon mesh.
    pub fn from_mesh_wireframe<I: MeshIndex>(mesh: &HalfEdgeMesh<I>) -> Self {
        let positions = mesh.vertex_ids().map(|v| to_f32(mesh.position(v))).collect();
        let normals = mesh.vertex_ids().map(|v| normal_to_f32(&mesh.vertex_normal(v))).collect();
        let indices = mesh
            .edge_ids()
            .flat_map(|e| mesh.edge_vertices(e).map(|v| v.index() as u32))
            .collect();

        Self::new(positions, normals, indices, Primitive::Lines)
    }

    /// Number of vertices.
    pub fn num_vertices(&self) -> usize {
        self.positions.len()
    }

    /// Number of triangles or line segments.
    pub fn num_primitives(&self) -> usize {
        self.indices.len() / self.primitive.arity()
    }

    /// Check the arrays before hand-off.
    ///
    /// # Errors
    ///
    /// - [`MeshError::BufferMismatch`] if normals and positions differ in
    ///   length, or the index count is not a multiple of the primitive arity
    /// - [`MeshError::IndexOutOfBounds`] if an index does not address a vertex
    pub fn validate(&self) -> Result<()> {
        if self.normals.len() != self.positions.len() {
            return Err(MeshError::BufferMismatch {
                what: "normals",
                expected: self.positions.len(),
                actual: self.normals.len(),
            });
        }

        let arity = self.primitive.arity();
        if self.indices.len() % arity != 0 {
            return Err(MeshError::BufferMismatch {
                what: "indices",
                expected: self.indices.len() - self.indices.len() % arity,
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

    /// Positions and normals zipped into one array.
    pub fn interleaved(&self) -> Vec<RenderVertex> {
        self.positions
            .iter()
            .zip(&self.normals)
            .map(|(&position, &normal)| RenderVertex { position, normal })
            .collect()
    }

    /// Positions as raw bytes.
    pub fn position_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.positions)
    }

    /// Normals as raw bytes.
    pub fn normal_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.normals)
    }

    /// Indices as raw bytes.
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }
}

fn bounds(positions: &[[f32; 3]]) -> ([f32; 3], f32) {
    if positions.is_empty() {
        return ([0.0; 3], 1.0);
    }

    let mut sum = [0.0_f64; 3];
    for p in positions {
        for k in 0..3 {
            sum[k] += p[k] as f64;
        }
    }
    let n = positions.len() as f64;
    let center = sum.map(|s| (s / n) as f32);

    let radius_sq = positions
        .iter()
        .map(|p| (0..3).map(|k| (p[k] - center[k]).powi(2)).sum::<f32>())
        .fold(0.0_f32, f32::max);

    (center, radius_sq.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::primitives;
    use crate::patch::{control, tessellate, TessellateOptions};

    #[test]
    fn test_from_surface() {
        let surface = tessellate(&control::saddle(), &TessellateOptions::new(5)).unwrap();
        let buffers = RenderBuffers::from_surface(&surface);

        assert_eq!(buffers.num_vertices(), 25);
        assert_eq!(buffers.num_primitives(), 32);
        assert_eq!(buffers.primitive, Primitive::Triangles);
        assert!(buffers.validate().is_ok());
        assert_eq!(buffers.position_bytes().len(), 25 * 12);
        assert_eq!(buffers.index_bytes().len(), 96 * 4);
    }

    #[test]
    fn test_from_control_polygon() {
        let buffers = RenderBuffers::from_control_polygon(&control::planar(3.0));

        assert_eq!(buffers.num_vertices(), 16);
        assert_eq!(buffers.indices.len(), 48);
        assert_eq!(buffers.primitive, Primitive::Lines);
        assert_eq!(&buffers.indices[..4], &[0, 1, 1, 2]);
        assert_eq!(buffers.center, [1.5, 1.5, 0.0]);
        assert!(buffers.validate().is_ok());
    }

    #[test]
    fn test_from_mesh_fans_polygons() {
        let mesh: HalfEdgeMesh = primitives::pyramid().unwrap();
        let buffers = RenderBuffers::from_mesh(&mesh);

        // Quad base -> 2 triangles, four sides -> 1 each.
        assert_eq!(buffers.num_primitives(), 6);
        assert_eq!(buffers.num_vertices(), 5);
        assert!(buffers.validate().is_ok());

        // Apex normal points up.
        assert!(buffers.normals[4][2] > 0.9);
    }

    #[test]
    fn test_wireframe() {
        let mesh: HalfEdgeMesh = primitives::cube().unwrap();
        let buffers = RenderBuffers::from_mesh_wireframe(&mesh);

        assert_eq!(buffers.num_primitives(), 12);
        assert!(buffers.validate().is_ok());
    }

    #[test]
    fn test_validate_catches_bad_buffers() {
        let mut buffers = RenderBuffers::from_control_polygon(&control::saddle());
        buffers.indices.push(3);
        assert!(matches!(
            buffers.validate(),
            Err(MeshError::BufferMismatch { what: "indices", .. })
        ));

        buffers.indices.push(16);
        assert_eq!(buffers.validate(), Err(MeshError::IndexOutOfBounds { index: 16, len: 16 }));

        let mut buffers = RenderBuffers::from_control_polygon(&control::saddle());
        buffers.normals.clear();
        assert!(matches!(
            buffers.validate(),
            Err(MeshError::BufferMismatch { what: "normals", .. })
        ));
    }

    #[test]
    fn test_interleaved_layout() {
        let surface = tessellate(&control::bump(1.0), &TessellateOptions::new(3)).unwrap();
        let buffers = RenderBuffers::from_surface(&surface);
        let vertices = buffers.interleaved();

        assert_eq!(vertices.len(), 9);
        assert_eq!(vertices[4].position, buffers.positions[4]);
        assert_eq!(std::mem::size_of::<RenderVertex>(), 24);
        assert_eq!(bytemuck::cast_slice::<RenderVertex, u8>(&vertices).len(), 9 * 24);
    }
}
