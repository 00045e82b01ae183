//! Half-edge mesh data structure.
//!
//! This module provides a half-edge (doubly-connected edge list) representation
//! for polygon meshes. Faces may have any number of sides (three or more). The
//! structure enables O(1) adjacency queries and local topological edits, which
//! is what the subdivision driver relies on.
//!
//! # Structure
//!
//! - Each edge is split into two **half-edges** pointing in opposite directions.
//!   They are always allocated together, so edge `e` owns half-edges `2e` and
//!   `2e + 1`.
//! - Each half-edge knows its **twin**, **next** and **prev** around its face,
//!   its **origin vertex** and its **incident face**.
//! - Each vertex stores one outgoing half-edge.
//! - Each face stores one half-edge on its boundary.
//!
//! # Boundary Handling
//!
//! Boundary half-edges have an invalid face ID. Their twins are the interior
//! half-edges. Boundary loops can be traversed using the `next` pointer on
//! boundary half-edges, and a boundary vertex always refers to an outgoing
//! boundary half-edge.

use nalgebra::{Point3, Vector3};

use super::index::{EdgeId, FaceId, HalfEdgeId, MeshIndex, VertexId};

/// A vertex in the half-edge mesh.
#[derive(Debug, Clone)]
pub struct Vertex<I: MeshIndex = u32> {
    /// The 3D position of this vertex.
    pub position: Point3<f64>,

    /// One outgoing half-edge from this vertex.
    /// For boundary vertices, this is guaranteed to be a boundary half-edge.
    pub halfedge: HalfEdgeId<I>,
}

impl<I: MeshIndex> Vertex<I> {
    /// Create a new isolated vertex at the given position.
    pub fn new(position: Point3<f64>) -> Self {
        Self {
            position,
            halfedge: HalfEdgeId::invalid(),
        }
    }

    /// Create a new vertex from coordinates.
    pub fn from_coords(x: f64, y: f64, z: f64) -> Self {
        Self::new(Point3::new(x, y, z))
    }
}

/// A half-edge in the mesh.
#[derive(Debug, Clone, Copy)]
pub struct HalfEdge<I: MeshIndex = u32> {
    /// The vertex this half-edge originates from.
    pub origin: VertexId<I>,

    /// The opposite half-edge (pointing in the reverse direction).
    pub twin: HalfEdgeId<I>,

    /// The next half-edge around the face (counter-clockwise).
    pub next: HalfEdgeId<I>,

    /// The previous half-edge around the face.
    pub prev: HalfEdgeId<I>,

    /// The face this half-edge belongs to.
    /// Invalid for boundary half-edges.
    pub face: FaceId<I>,
}

impl<I: MeshIndex> HalfEdge<I> {
    /// Create a new unlinked half-edge.
    pub fn new() -> Self {
        Self {
            origin: VertexId::invalid(),
            twin: HalfEdgeId::invalid(),
            next: HalfEdgeId::invalid(),
            prev: HalfEdgeId::invalid(),
            face: FaceId::invalid(),
        }
    }

    /// Check if this half-edge is on the boundary.
    #[inline]
    pub fn is_boundary(&self) -> bool {
        !self.face.is_valid()
    }
}

impl<I: MeshIndex> Default for HalfEdge<I> {
    fn default() -> Self {
        Self::new()
    }
}

/// A face in the half-edge mesh.
#[derive(Debug, Clone, Copy)]
pub struct Face<I: MeshIndex = u32> {
    /// One half-edge on the boundary of this face.
    pub halfedge: HalfEdgeId<I>,
}

impl<I: MeshIndex> Face<I> {
    /// Create a new face with the given half-edge.
    pub fn new(halfedge: HalfEdgeId<I>) -> Self {
        Self { halfedge }
    }
}

impl<I: MeshIndex> Default for Face<I> {
    fn default() -> Self {
        Self {
            halfedge: HalfEdgeId::invalid(),
        }
    }
}

/// A half-edge mesh data structure for polygon meshes.
///
/// Elements live in flat arenas and refer to each other by typed indices, so
/// there is no shared ownership between them. Elements are only ever appended;
/// handles stay valid for the lifetime of the mesh.
#[derive(Debug, Clone)]
pub struct HalfEdgeMesh<I: MeshIndex = u32> {
    /// All vertices in the mesh.
    pub(crate) vertices: Vec<Vertex<I>>,

    /// All half-edges in the mesh, stored in twin pairs.
    pub(crate) halfedges: Vec<HalfEdge<I>>,

    /// All faces in the mesh.
    pub(crate) faces: Vec<Face<I>>,
}

impl<I: MeshIndex> Default for HalfEdgeMesh<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: MeshIndex> HalfEdgeMesh<I> {
    /// Create a new empty mesh.
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            halfedges: Vec::new(),
            faces: Vec::new(),
        }
    }

    /// Create a mesh with pre-allocated capacity.
    pub fn with_capacity(num_vertices: usize, num_edges: usize, num_faces: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(num_vertices),
            halfedges: Vec::with_capacity(2 * num_edges),
            faces: Vec::with_capacity(num_faces),
        }
    }

    /// Reserve room for additional elements.
    pub fn reserve(&mut self, vertices: usize, edges: usize, faces: usize) {
        self.vertices.reserve(vertices);
        self.halfedges.reserve(2 * edges);
        self.faces.reserve(faces);
    }

    // ==================== Accessors ====================

    /// Get the number of vertices.
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of half-edges.
    #[inline]
    pub fn num_halfedges(&self) -> usize {
        self.halfedges.len()
    }

    /// Get the number of (full) edges.
    #[inline]
    pub fn num_edges(&self) -> usize {
        self.halfedges.len() / 2
    }

    /// Get the number of faces.
    #[inline]
    pub fn num_faces(&self) -> usize {
        self.faces.len()
    }

    /// Euler characteristic `V - E + F`.
    pub fn euler_characteristic(&self) -> i64 {
        self.num_vertices() as i64 - self.num_edges() as i64 + self.num_faces() as i64
    }

    /// Get a vertex by ID.
    #[inline]
    pub fn vertex(&self, id: VertexId<I>) -> &Vertex<I> {
        &self.vertices[id.index()]
    }

    /// Get a mutable vertex by ID.
    #[inline]
    pub fn vertex_mut(&mut self, id: VertexId<I>) -> &mut Vertex<I> {
        &mut self.vertices[id.index()]
    }

    /// Get a half-edge by ID.
    #[inline]
    pub fn halfedge(&self, id: HalfEdgeId<I>) -> &HalfEdge<I> {
        &self.halfedges[id.index()]
    }

    /// Get a mutable half-edge by ID.
    #[inline]
    pub fn halfedge_mut(&mut self, id: HalfEdgeId<I>) -> &mut HalfEdge<I> {
        &mut self.halfedges[id.index()]
    }

    /// Get a face by ID.
    #[inline]
    pub fn face(&self, id: FaceId<I>) -> &Face<I> {
        &self.faces[id.index()]
    }

    /// Get a mutable face by ID.
    #[inline]
    pub fn face_mut(&mut self, id: FaceId<I>) -> &mut Face<I> {
        &mut self.faces[id.index()]
    }

    /// Get the position of a vertex.
    #[inline]
    pub fn position(&self, v: VertexId<I>) -> &Point3<f64> {
        &self.vertex(v).position
    }

    /// Set the position of a vertex.
    #[inline]
    pub fn set_position(&mut self, v: VertexId<I>, pos: Point3<f64>) {
        self.vertex_mut(v).position = pos;
    }

    // ==================== Topology Queries ====================

    /// Get the twin (opposite) half-edge.
    #[inline]
    pub fn twin(&self, he: HalfEdgeId<I>) -> HalfEdgeId<I> {
        self.halfedge(he).twin
    }

    /// Get the next half-edge around the face.
    #[inline]
    pub fn next(&self, he: HalfEdgeId<I>) -> HalfEdgeId<I> {
        self.halfedge(he).next
    }

    /// Get the previous half-edge around the face.
    #[inline]
    pub fn prev(&self, he: HalfEdgeId<I>) -> HalfEdgeId<I> {
        self.halfedge(he).prev
    }

    /// Get the origin vertex of a half-edge.
    #[inline]
    pub fn origin(&self, he: HalfEdgeId<I>) -> VertexId<I> {
        self.halfedge(he).origin
    }

    /// Get the destination vertex of a half-edge.
    #[inline]
    pub fn dest(&self, he: HalfEdgeId<I>) -> VertexId<I> {
        self.origin(self.twin(he))
    }

    /// Get the face of a half-edge.
    #[inline]
    pub fn face_of(&self, he: HalfEdgeId<I>) -> FaceId<I> {
        self.halfedge(he).face
    }

    /// Check if a half-edge is on the boundary.
    #[inline]
    pub fn is_boundary_halfedge(&self, he: HalfEdgeId<I>) -> bool {
        self.halfedge(he).is_boundary()
    }

    /// Check if a vertex is on the boundary. Isolated vertices count as boundary.
    pub fn is_boundary_vertex(&self, v: VertexId<I>) -> bool {
        let start = self.vertex(v).halfedge;
        if !start.is_valid() {
            return true;
        }
        self.vertex_halfedges(v).any(|he| self.is_boundary_halfedge(he))
    }

    /// Check if a vertex has no incident edges.
    #[inline]
    pub fn is_isolated(&self, v: VertexId<I>) -> bool {
        !self.vertex(v).halfedge.is_valid()
    }

    /// Check if an edge has at most one incident face.
    #[inline]
    pub fn is_boundary_edge(&self, e: EdgeId<I>) -> bool {
        self.is_boundary_halfedge(e.halfedge(0)) || self.is_boundary_halfedge(e.halfedge(1))
    }

    /// The two endpoints of an edge.
    #[inline]
    pub fn edge_vertices(&self, e: EdgeId<I>) -> [VertexId<I>; 2] {
        [self.origin(e.halfedge(0)), self.origin(e.halfedge(1))]
    }

    /// The two incident faces of an edge. Either may be invalid on a boundary.
    #[inline]
    pub fn edge_faces(&self, e: EdgeId<I>) -> [FaceId<I>; 2] {
        [self.face_of(e.halfedge(0)), self.face_of(e.halfedge(1))]
    }

    // ==================== Iteration ====================

    /// Iterate over all vertex IDs.
    pub fn vertex_ids(&self) -> impl Iterator<Item = VertexId<I>> + '_ {
        (0..self.vertices.len()).map(VertexId::new)
    }

    /// Iterate over all vertices with their IDs.
    pub fn vertices(&self) -> impl Iterator<Item = (VertexId<I>, &Vertex<I>)> + '_ {
        self.vertices
            .iter()
            .enumerate()
            .map(|(i, v)| (VertexId::new(i), v))
    }

    /// Iterate over all half-edge IDs.
    pub fn halfedge_ids(&self) -> impl Iterator<Item = HalfEdgeId<I>> + '_ {
        (0..self.halfedges.len()).map(HalfEdgeId::new)
    }

    /// Iterate over all half-edges with their IDs.
    pub fn halfedges(&self) -> impl Iterator<Item = (HalfEdgeId<I>, &HalfEdge<I>)> + '_ {
        self.halfedges
            .iter()
            .enumerate()
            .map(|(i, he)| (HalfEdgeId::new(i), he))
    }

    /// Iterate over all edge IDs.
    pub fn edge_ids(&self) -> impl Iterator<Item = EdgeId<I>> + '_ {
        (0..self.num_edges()).map(EdgeId::new)
    }

    /// Iterate over all face IDs.
    pub fn face_ids(&self) -> impl Iterator<Item = FaceId<I>> + '_ {
        (0..self.faces.len()).map(FaceId::new)
    }

    /// Iterate over all faces with their IDs.
    pub fn faces(&self) -> impl Iterator<Item = (FaceId<I>, &Face<I>)> + '_ {
        self.faces
            .iter()
            .enumerate()
            .map(|(i, f)| (FaceId::new(i), f))
    }

    /// Iterate over half-edges around a vertex (outgoing half-edges).
    pub fn vertex_halfedges(&self, v: VertexId<I>) -> VertexHalfEdgeIter<'_, I> {
        VertexHalfEdgeIter::new(self, v)
    }

    /// Iterate over vertices adjacent to a vertex.
    pub fn vertex_neighbors(&self, v: VertexId<I>) -> impl Iterator<Item = VertexId<I>> + '_ {
        self.vertex_halfedges(v).map(|he| self.dest(he))
    }

    /// Iterate over faces adjacent to a vertex.
    pub fn vertex_faces(&self, v: VertexId<I>) -> impl Iterator<Item = FaceId<I>> + '_ {
        self.vertex_halfedges(v)
            .map(|he| self.face_of(he))
            .filter(|f| f.is_valid())
    }

    /// Iterate over half-edges around a face.
    pub fn face_halfedges(&self, f: FaceId<I>) -> FaceHalfEdgeIter<'_, I> {
        FaceHalfEdgeIter::new(self, f)
    }

    /// Iterate over vertices of a face.
    pub fn face_vertices(&self, f: FaceId<I>) -> impl Iterator<Item = VertexId<I>> + '_ {
        self.face_halfedges(f).map(|he| self.origin(he))
    }

    /// Number of sides of a face.
    pub fn face_valence(&self, f: FaceId<I>) -> usize {
        self.face_halfedges(f).count()
    }

    /// Number of edges incident to a vertex.
    pub fn valence(&self, v: VertexId<I>) -> usize {
        self.vertex_halfedges(v).count()
    }

    /// First vertex whose outgoing half-edges do not form a single fan.
    ///
    /// Where two surfaces touch at one vertex, circulating around it only
    /// reaches one of them, so `valence`, `vertex_faces` and
    /// `vertex_neighbors` would each see part of the neighborhood.
    pub fn find_pinched_vertex(&self) -> Option<VertexId<I>> {
        let mut outgoing = vec![0usize; self.num_vertices()];
        for (_, he) in self.halfedges() {
            if he.origin.is_valid() && he.origin.index() < outgoing.len() {
                outgoing[he.origin.index()] += 1;
            }
        }

        self.vertex_ids().find(|&v| self.valence(v) != outgoing[v.index()])
    }

    /// Check if every face is a quadrilateral.
    pub fn is_quad_mesh(&self) -> bool {
        self.face_ids().all(|f| self.face_valence(f) == 4)
    }

    /// Check if every face is a triangle.
    pub fn is_triangle_mesh(&self) -> bool {
        self.face_ids().all(|f| self.face_valence(f) == 3)
    }

    // ==================== Geometry ====================

    /// Area vector of a polygonal face (Newell's method).
    ///
    /// Its direction is the face normal and its length twice the face area.
    fn face_area_vector(&self, f: FaceId<I>) -> Vector3<f64> {
        self.face_halfedges(f)
            .map(|he| {
                let p = self.position(self.origin(he));
                let q = self.position(self.dest(he));
                p.coords.cross(&q.coords)
            })
            .sum()
    }

    /// Compute the unit normal of a face.
    ///
    /// Degenerate faces yield a zero vector.
    pub fn face_normal(&self, f: FaceId<I>) -> Vector3<f64> {
        self.face_area_vector(f)
            .try_normalize(f64::EPSILON)
            .unwrap_or_else(Vector3::zeros)
    }

    /// Compute the area of a (planar) face.
    pub fn face_area(&self, f: FaceId<I>) -> f64 {
        0.5 * self.face_area_vector(f).norm()
    }

    /// Compute the area-weighted normal at a vertex.
    ///
    /// Isolated vertices and vertices surrounded by degenerate faces yield a
    /// zero vector.
    pub fn vertex_normal(&self, v: VertexId<I>) -> Vector3<f64> {
        let sum: Vector3<f64> = self.vertex_faces(v).map(|f| self.face_area_vector(f)).sum();
        sum.try_normalize(f64::EPSILON).unwrap_or_else(Vector3::zeros)
    }

    /// Compute the centroid (vertex average) of a face.
    pub fn face_centroid(&self, f: FaceId<I>) -> Point3<f64> {
        let mut sum = Vector3::zeros();
        let mut count = 0usize;
        for v in self.face_vertices(f) {
            sum += self.position(v).coords;
            count += 1;
        }
        Point3::from(sum / count.max(1) as f64)
    }

    /// Compute the midpoint of an edge.
    pub fn edge_midpoint(&self, e: EdgeId<I>) -> Point3<f64> {
        let [v0, v1] = self.edge_vertices(e);
        Point3::from((self.position(v0).coords + self.position(v1).coords) * 0.5)
    }

    /// Compute the bounding box of the mesh.
    pub fn bounding_box(&self) -> Option<(Point3<f64>, Point3<f64>)> {
        let first = self.vertices.first()?.position;
        let (mut min, mut max) = (first, first);

        for v in &self.vertices {
            for i in 0..3 {
                min[i] = min[i].min(v.position[i]);
                max[i] = max[i].max(v.position[i]);
            }
        }

        Some((min, max))
    }

    /// Compute the total surface area of the mesh.
    pub fn surface_area(&self) -> f64 {
        self.face_ids().map(|f| self.face_area(f)).sum()
    }

    // ==================== Construction ====================

    /// Add a new isolated vertex and return its ID.
    pub fn add_vertex(&mut self, position: Point3<f64>) -> VertexId<I> {
        let id = VertexId::new(self.vertices.len());
        self.vertices.push(Vertex::new(position));
        id
    }

    /// Allocate a twin pair of half-edges `v0 -> v1` / `v1 -> v0`.
    ///
    /// Returns the half-edge originating at `v0`. Neither half-edge is linked
    /// into a face or loop yet.
    pub(crate) fn new_edge(&mut self, v0: VertexId<I>, v1: VertexId<I>) -> HalfEdgeId<I> {
        let h0 = HalfEdgeId::new(self.halfedges.len());
        let h1 = HalfEdgeId::new(self.halfedges.len() + 1);

        self.halfedges.push(HalfEdge {
            origin: v0,
            twin: h1,
            ..HalfEdge::new()
        });
        self.halfedges.push(HalfEdge {
            origin: v1,
            twin: h0,
            ..HalfEdge::new()
        });

        h0
    }

    /// Append a face whose boundary starts at `he`.
    pub(crate) fn new_face(&mut self, he: HalfEdgeId<I>) -> FaceId<I> {
        let id = FaceId::new(self.faces.len());
        self.faces.push(Face::new(he));
        id
    }

    /// Make `b` follow `a` in its loop.
    #[inline]
    pub(crate) fn link(&mut self, a: HalfEdgeId<I>, b: HalfEdgeId<I>) {
        self.halfedge_mut(a).next = b;
        self.halfedge_mut(b).prev = a;
    }

    /// Point a vertex at an outgoing boundary half-edge if it has one.
    pub(crate) fn adjust_outgoing_halfedge(&mut self, v: VertexId<I>) {
        let boundary = self
            .vertex_halfedges(v)
            .find(|&he| self.is_boundary_halfedge(he));
        if let Some(he) = boundary {
            self.vertex_mut(v).halfedge = he;
        }
    }

    // ==================== Mutation ====================

    /// Split the edge of `h0` at the isolated vertex `v`.
    ///
    /// ```text
    ///  before:  a ------- h0 ------> b
    ///  after:   a -- h0 --> v -- h1 --> b
    /// ```
    ///
    /// `h0` keeps its origin and now ends at `v`; the returned half-edge `h1`
    /// runs from `v` to the old destination in the same face. The twin side is
    /// split symmetrically. Faces and boundary loops stay closed.
    pub fn split_halfedge(&mut self, h0: HalfEdgeId<I>, v: VertexId<I>) -> HalfEdgeId<I> {
        debug_assert!(self.is_isolated(v), "split vertex {:?} is already connected", v);

        let o0 = self.twin(h0);
        let h2 = self.next(h0);
        let o2 = self.prev(o0);
        let v2 = self.origin(o0);
        let fh = self.face_of(h0);
        let fo = self.face_of(o0);

        let h1 = self.new_edge(v, v2);
        let o1 = self.twin(h1);

        self.link(h0, h1);
        self.link(h1, h2);
        self.halfedge_mut(h1).face = fh;

        self.link(o2, o1);
        self.link(o1, o0);
        self.halfedge_mut(o1).face = fo;
        self.halfedge_mut(o0).origin = v;

        if self.vertex(v2).halfedge == o0 {
            self.vertex_mut(v2).halfedge = o1;
        }
        self.vertex_mut(v).halfedge = h1;
        self.adjust_outgoing_halfedge(v);

        h1
    }

    /// Insert a new vertex at `point` on edge `e`, splitting it in two.
    pub fn insert_vertex(&mut self, e: EdgeId<I>, point: Point3<f64>) -> VertexId<I> {
        let v = self.add_vertex(point);
        self.split_halfedge(e.halfedge(0), v);
        v
    }

    /// Split a face by connecting `dest(h0)` to `dest(h1)`.
    ///
    /// Both half-edges must belong to the same face and must not be
    /// consecutive. The face of `h0` keeps `h0`, the new half-edge and
    /// everything after `h1`; a new face receives `h1`'s side. Returns the new
    /// half-edge running from `dest(h0)` to `dest(h1)`.
    pub fn insert_edge(&mut self, h0: HalfEdgeId<I>, h1: HalfEdgeId<I>) -> HalfEdgeId<I> {
        debug_assert_eq!(self.face_of(h0), self.face_of(h1));
        debug_assert!(h0 != h1 && self.next(h0) != h1 && self.next(h1) != h0);

        let h2 = self.next(h0);
        let h3 = self.next(h1);

        let h4 = self.new_edge(self.origin(h2), self.origin(h3));
        let h5 = self.twin(h4);

        let f0 = self.face_of(h0);
        let f1 = self.new_face(h1);
        self.face_mut(f0).halfedge = h0;

        self.link(h0, h4);
        self.link(h4, h3);
        self.halfedge_mut(h4).face = f0;

        self.link(h1, h5);
        self.link(h5, h2);

        let mut he = h2;
        loop {
            self.halfedge_mut(he).face = f1;
            he = self.next(he);
            if he == h2 {
                break;
            }
        }

        h4
    }

    // ==================== Validation ====================

    /// Check if the mesh is valid (all connectivity is consistent).
    pub fn is_valid(&self) -> bool {
        if self.halfedges.len() % 2 != 0 {
            return false;
        }

        for (vid, v) in self.vertices() {
            if v.halfedge.is_valid() && self.halfedge(v.halfedge).origin != vid {
                return false;
            }
        }

        for (heid, he) in self.halfedges() {
            if he.twin != heid.pair() || self.halfedge(he.twin).twin != heid {
                return false;
            }
            if !he.next.is_valid() || self.halfedge(he.next).prev != heid {
                return false;
            }
            if !he.prev.is_valid() || self.halfedge(he.prev).next != heid {
                return false;
            }
            // Consecutive half-edges share a vertex and a face.
            if self.origin(he.next) != self.origin(he.twin) {
                return false;
            }
            if self.face_of(he.next) != he.face {
                return false;
            }
        }

        for (fid, f) in self.faces() {
            if !f.halfedge.is_valid() || self.face_of(f.halfedge) != fid {
                return false;
            }
            if self.face_valence(fid) < 3 {
                return false;
            }
        }

        true
    }
}

/// Iterator over outgoing half-edges around a vertex.
pub struct VertexHalfEdgeIter<'a, I: MeshIndex = u32> {
    mesh: &'a HalfEdgeMesh<I>,
    start: HalfEdgeId<I>,
    current: HalfEdgeId<I>,
    done: bool,
}

impl<'a, I: MeshIndex> VertexHalfEdgeIter<'a, I> {
    fn new(mesh: &'a HalfEdgeMesh<I>, v: VertexId<I>) -> Self {
        let start = mesh.vertex(v).halfedge;
        Self {
            mesh,
            start,
            current: start,
            done: !start.is_valid(),
        }
    }
}

impl<I: MeshIndex> Iterator for VertexHalfEdgeIter<'_, I> {
    type Item = HalfEdgeId<I>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let result = self.current;

        // If he goes v -> w, twin(he) goes w -> v and the half-edge after it
        // is the next outgoing half-edge of v.
        self.current = self.mesh.next(self.mesh.twin(self.current));

        if self.current == self.start {
            self.done = true;
        }

        Some(result)
    }
}

/// Iterator over half-edges around a face.
pub struct FaceHalfEdgeIter<'a, I: MeshIndex = u32> {
    mesh: &'a HalfEdgeMesh<I>,
    start: HalfEdgeId<I>,
    current: HalfEdgeId<I>,
    done: bool,
}

impl<'a, I: MeshIndex> FaceHalfEdgeIter<'a, I> {
    fn new(mesh: &'a HalfEdgeMesh<I>, f: FaceId<I>) -> Self {
        let start = mesh.face(f).halfedge;
        Self {
            mesh,
            start,
            current: start,
            done: !start.is_valid(),
        }
    }
}

impl<I: MeshIndex> Iterator for FaceHalfEdgeIter<'_, I> {
    type Item = HalfEdgeId<I>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let result = self.current;
        self.current = self.mesh.next(self.current);

        if self.current == self.start {
            self.done = true;
        }

        Some(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::build_from_polygons;
    use approx::assert_relative_eq;

    fn unit_square() -> HalfEdgeMesh {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ];
        build_from_polygons(&vertices, &[vec![0, 1, 2, 3]]).unwrap()
    }

    #[test]
    fn test_vertex_creation() {
        let v = Vertex::<u32>::from_coords(1.0, 2.0, 3.0);
        assert_eq!(v.position, Point3::new(1.0, 2.0, 3.0));
        assert!(!v.halfedge.is_valid());
    }

    #[test]
    fn test_empty_mesh() {
        let mesh = HalfEdgeMesh::<u32>::new();
        assert_eq!(mesh.num_vertices(), 0);
        assert_eq!(mesh.num_halfedges(), 0);
        assert_eq!(mesh.num_faces(), 0);
        assert!(mesh.is_valid());
        assert!(mesh.bounding_box().is_none());
    }

    #[test]
    fn test_add_vertex() {
        let mut mesh = HalfEdgeMesh::<u32>::new();
        let v0 = mesh.add_vertex(Point3::new(0.0, 0.0, 0.0));
        let v1 = mesh.add_vertex(Point3::new(1.0, 0.0, 0.0));

        assert_eq!(mesh.num_vertices(), 2);
        assert_eq!(v0.index(), 0);
        assert_eq!(v1.index(), 1);
        assert!(mesh.is_isolated(v0));
        assert!(mesh.is_boundary_vertex(v0));
    }

    #[test]
    fn test_square_queries() {
        let mesh = unit_square();
        let f = FaceId::new(0);

        assert_eq!(mesh.num_edges(), 4);
        assert_eq!(mesh.face_valence(f), 4);
        assert_eq!(mesh.euler_characteristic(), 1);
        assert_relative_eq!(mesh.face_area(f), 1.0, epsilon = 1e-12);
        assert_relative_eq!(mesh.face_normal(f), Vector3::z(), epsilon = 1e-12);
        assert_relative_eq!(mesh.face_centroid(f), Point3::new(0.5, 0.5, 0.0), epsilon = 1e-12);

        for e in mesh.edge_ids() {
            assert!(mesh.is_boundary_edge(e));
            let [f0, f1] = mesh.edge_faces(e);
            assert!(f0.is_valid() != f1.is_valid());
        }
        for v in mesh.vertex_ids() {
            assert_eq!(mesh.valence(v), 2);
            assert!(mesh.is_boundary_vertex(v));
        }
    }

    #[test]
    fn test_insert_vertex_splits_edge() {
        let mut mesh = unit_square();
        let e = EdgeId::new(0);
        let [a, b] = mesh.edge_vertices(e);
        let mid = mesh.edge_midpoint(e);

        let v = mesh.insert_vertex(e, mid);

        assert!(mesh.is_valid());
        assert_eq!(mesh.num_edges(), 5);
        assert_eq!(mesh.face_valence(FaceId::new(0)), 5);
        assert_eq!(mesh.valence(v), 2);
        assert!(mesh.is_boundary_vertex(v));

        let mut neighbors: Vec<_> = mesh.vertex_neighbors(v).collect();
        neighbors.sort();
        let mut expected = vec![a, b];
        expected.sort();
        assert_eq!(neighbors, expected);
    }

    #[test]
    fn test_insert_edge_splits_face() {
        let mut mesh = unit_square();
        let f = FaceId::new(0);
        let h0 = mesh.face(f).halfedge;
        let h1 = mesh.next(mesh.next(h0));

        let h = mesh.insert_edge(h0, h1);

        assert!(mesh.is_valid());
        assert_eq!(mesh.num_faces(), 2);
        assert_eq!(mesh.num_edges(), 5);
        assert!(!mesh.is_boundary_edge(h.edge()));
        assert_eq!(mesh.origin(h), mesh.dest(h0));
        assert_eq!(mesh.dest(h), mesh.dest(h1));
        assert!(mesh.is_triangle_mesh());
        assert_eq!(mesh.euler_characteristic(), 1);
    }
}
