//! Generalized Catmull-Clark subdivision for polygon meshes.

use nalgebra::{Point3, Vector3};
use tracing::{debug, info, warn};

use crate::algo::Progress;
use crate::error::{MeshError, Result};
use crate::mesh::{EdgeId, FaceId, HalfEdgeId, HalfEdgeMesh, MeshIndex, PropertyMap, VertexId};

use super::SubdivideOptions;

/// The three point sets of one Catmull-Clark pass, computed on the unrefined mesh.
#[derive(Debug, Clone)]
pub struct RefinementPoints<I: MeshIndex = u32> {
    /// One new point per face: the average of its vertices.
    pub face_points: PropertyMap<FaceId<I>, Point3<f64>>,
    /// One new point per edge.
    pub edge_points: PropertyMap<EdgeId<I>, Point3<f64>>,
    /// Replacement position for every existing vertex.
    pub vertex_points: PropertyMap<VertexId<I>, Point3<f64>>,
}

/// Element counts before and after one refinement pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefineStats {
    /// Vertices before the pass.
    pub vertices_before: usize,
    /// Edges before the pass.
    pub edges_before: usize,
    /// Faces before the pass.
    pub faces_before: usize,
    /// Vertices after the pass.
    pub vertices_after: usize,
    /// Edges after the pass.
    pub edges_after: usize,
    /// Faces after the pass.
    pub faces_after: usize,
}

impl RefineStats {
    /// `V - E + F` of the input mesh.
    pub fn euler_before(&self) -> i64 {
        self.vertices_before as i64 - self.edges_before as i64 + self.faces_before as i64
    }

    /// `V - E + F` of the refined mesh.
    pub fn euler_after(&self) -> i64 {
        self.vertices_after as i64 - self.edges_after as i64 + self.faces_after as i64
    }
}

/// Performs Catmull-Clark subdivision on a polygon mesh.
///
/// Faces of any valence are accepted; after the first pass every face is a
/// quad. Each face of valence `m` is replaced by `m` quads.
///
/// # Arguments
///
/// * `mesh` - The mesh to subdivide (modified in place)
/// * `options` - Subdivision parameters
///
/// # Errors
///
/// Fails before touching the mesh if a pass's preconditions do not hold (see
/// [`catmull_clark_refine`]). Earlier passes stay applied.
pub fn catmull_clark_subdivide<I: MeshIndex>(
    mesh: &mut HalfEdgeMesh<I>,
    options: &SubdivideOptions,
) -> Result<()> {
    for _ in 0..options.iterations {
        refine_checked(mesh, options)?;
    }
    Ok(())
}

/// Catmull-Clark subdivision with progress reporting.
pub fn catmull_clark_subdivide_with_progress<I: MeshIndex>(
    mesh: &mut HalfEdgeMesh<I>,
    options: &SubdivideOptions,
    progress: &Progress,
) -> Result<()> {
    if options.iterations == 0 {
        return Ok(());
    }

    for iter in 0..options.iterations {
        progress.report(iter, options.iterations, "Catmull-Clark subdivision");
        refine_checked(mesh, options)?;
    }
    progress.report(options.iterations, options.iterations, "Catmull-Clark subdivision");
    Ok(())
}

fn refine_checked<I: MeshIndex>(mesh: &mut HalfEdgeMesh<I>, options: &SubdivideOptions) -> Result<RefineStats> {
    let stats = catmull_clark_refine(mesh)?;

    if options.verify {
        if !mesh.is_valid() {
            return Err(MeshError::NonManifold {
                details: "connectivity is inconsistent after refinement".to_string(),
            });
        }
        if stats.euler_before() != stats.euler_after() {
            return Err(MeshError::NonManifold {
                details: format!(
                    "Euler characteristic changed from {} to {}",
                    stats.euler_before(),
                    stats.euler_after()
                ),
            });
        }
    }

    Ok(stats)
}

/// Perform one pass of Catmull-Clark subdivision in place.
///
/// All new points are computed from the unrefined mesh first; only then are
/// old vertices moved, every original edge split at its edge point, and every
/// original face split into quads around its face point. Elements created
/// during the pass are never visited by it.
///
/// # Errors
///
/// - [`MeshError::DegenerateFace`] for a face with fewer than three sides
/// - [`MeshError::DanglingEdge`] for an edge without incident faces
/// - [`MeshError::NonManifoldVertex`] for a vertex whose incident edges do not
///   form a single fan, or a boundary vertex without exactly two boundary
///   neighbors
///
/// The mesh is left untouched when an error is returned.
pub fn catmull_clark_refine<I: MeshIndex>(mesh: &mut HalfEdgeMesh<I>) -> Result<RefineStats> {
    let vertices_before = mesh.num_vertices();
    let edges_before = mesh.num_edges();
    let faces_before = mesh.num_faces();

    info!(
        vertices = vertices_before,
        edges = edges_before,
        faces = faces_before,
        "Starting Catmull-Clark pass"
    );

    let points = compute_refinement_points(mesh)?;
    apply_refinement(mesh, &points);

    let stats = RefineStats {
        vertices_before,
        edges_before,
        faces_before,
        vertices_after: mesh.num_vertices(),
        edges_after: mesh.num_edges(),
        faces_after: mesh.num_faces(),
    };

    info!(
        vertices = stats.vertices_after,
        edges = stats.edges_after,
        faces = stats.faces_after,
        "Catmull-Clark pass complete"
    );

    Ok(stats)
}

/// Compute face, edge and vertex points without modifying the mesh.
///
/// # Rules
///
/// - **Face point**: average of the face's vertices
/// - **Boundary edge point**: `(v0 + v1) / 2`
/// - **Interior edge point**: `(v0 + v1 + F(f0) + F(f1)) / 4`
/// - **Boundary vertex point**: `3/4 v + 1/8 (n0 + n1)` with `n0`, `n1` the
///   neighbors along the boundary
/// - **Interior vertex point** (valence `k`):
///   `(k-2)/k v + 1/k² Σ F(f) + 1/k² Σ neighbors`
///
/// Isolated vertices keep their position.
pub fn compute_refinement_points<I: MeshIndex>(mesh: &HalfEdgeMesh<I>) -> Result<RefinementPoints<I>> {
    check_preconditions(mesh)?;

    let face_points: PropertyMap<FaceId<I>, Point3<f64>> =
        PropertyMap::from_fn(mesh.num_faces(), |i| mesh.face_centroid(FaceId::new(i)));

    let edge_points: PropertyMap<EdgeId<I>, Point3<f64>> =
        PropertyMap::from_fn(mesh.num_edges(), |i| edge_point(mesh, &face_points, EdgeId::new(i)));

    let mut vertex_points: PropertyMap<VertexId<I>, Point3<f64>> =
        PropertyMap::new(mesh.num_vertices(), Point3::origin());
    for v in mesh.vertex_ids() {
        vertex_points[v] = vertex_point(mesh, &face_points, v)?;
    }

    debug!(
        face_points = face_points.len(),
        edge_points = edge_points.len(),
        vertex_points = vertex_points.len(),
        "Computed refinement points"
    );

    Ok(RefinementPoints {
        face_points,
        edge_points,
        vertex_points,
    })
}

fn check_preconditions<I: MeshIndex>(mesh: &HalfEdgeMesh<I>) -> Result<()> {
    for f in mesh.face_ids() {
        if mesh.face_valence(f) < 3 {
            return Err(MeshError::DegenerateFace { face: f.index() });
        }
    }

    for e in mesh.edge_ids() {
        let [f0, f1] = mesh.edge_faces(e);
        if !f0.is_valid() && !f1.is_valid() {
            return Err(MeshError::DanglingEdge { edge: e.index() });
        }
    }

    // The vertex rule needs the full one-ring.
    if let Some(v) = mesh.find_pinched_vertex() {
        return Err(MeshError::NonManifoldVertex { vertex: v.index() });
    }

    Ok(())
}

fn edge_point<I: MeshIndex>(
    mesh: &HalfEdgeMesh<I>,
    face_points: &PropertyMap<FaceId<I>, Point3<f64>>,
    e: EdgeId<I>,
) -> Point3<f64> {
    let [v0, v1] = mesh.edge_vertices(e);
    let sum = mesh.position(v0).coords + mesh.position(v1).coords;

    match mesh.edge_faces(e) {
        [f0, f1] if f0.is_valid() && f1.is_valid() => {
            Point3::from((sum + face_points[f0].coords + face_points[f1].coords) * 0.25)
        }
        _ => Point3::from(sum * 0.5),
    }
}

fn vertex_point<I: MeshIndex>(
    mesh: &HalfEdgeMesh<I>,
    face_points: &PropertyMap<FaceId<I>, Point3<f64>>,
    v: VertexId<I>,
) -> Result<Point3<f64>> {
    let p = mesh.position(v).coords;

    if mesh.is_isolated(v) {
        warn!(vertex = v.index(), "Isolated vertex left in place");
        return Ok(Point3::from(p));
    }

    if mesh.is_boundary_vertex(v) {
        let neighbors: Vec<VertexId<I>> = mesh
            .vertex_halfedges(v)
            .filter(|he| mesh.is_boundary_edge(he.edge()))
            .map(|he| mesh.dest(he))
            .collect();

        return match neighbors.as_slice() {
            &[n0, n1] => Ok(Point3::from(
                p * 0.75 + (mesh.position(n0).coords + mesh.position(n1).coords) * 0.125,
            )),
            _ => Err(MeshError::NonManifoldVertex { vertex: v.index() }),
        };
    }

    let k = mesh.valence(v) as f64;
    let face_sum: Vector3<f64> = mesh.vertex_faces(v).map(|f| face_points[f].coords).sum();
    let neighbor_sum: Vector3<f64> = mesh.vertex_neighbors(v).map(|n| mesh.position(n).coords).sum();

    Ok(Point3::from(p * ((k - 2.0) / k) + (face_sum + neighbor_sum) / (k * k)))
}

/// Move old vertices, split edges and split faces.
fn apply_refinement<I: MeshIndex>(mesh: &mut HalfEdgeMesh<I>, points: &RefinementPoints<I>) {
    let nv = mesh.num_vertices();
    let ne = mesh.num_edges();
    let nf = mesh.num_faces();

    // Snapshot one half-edge per original face before anything moves.
    let face_corners: Vec<HalfEdgeId<I>> = mesh.faces().map(|(_, f)| f.halfedge).collect();
    let corners: usize = mesh.face_ids().map(|f| mesh.face_valence(f)).sum();
    mesh.reserve(ne + nf, ne + corners, corners - nf);

    for v in (0..nv).map(VertexId::new) {
        mesh.set_position(v, points.vertex_points[v]);
    }

    for e in (0..ne).map(EdgeId::new) {
        mesh.insert_vertex(e, points.edge_points[e]);
    }
    debug!(edges = ne, "Split original edges");

    for (fi, &he) in face_corners.iter().enumerate() {
        // The snapshot half-edge started at an original corner. If its edge was
        // split from the other side it now starts at the edge point, and the
        // half-edge before it leaves the corner instead.
        let h0 = if mesh.origin(he).index() < nv { he } else { mesh.prev(he) };
        debug_assert!(mesh.origin(h0).index() < nv);

        split_face(mesh, h0, points.face_points[FaceId::new(fi)]);
    }
    debug!(faces = nf, "Split original faces");
}

/// Split a face whose edges are already split into quads around a new face point.
///
/// `h0` runs from an original corner to an edge point. The face boundary
/// alternates corners and edge points, so every third step from the spoke
/// lands on the next edge point to connect.
fn split_face<I: MeshIndex>(mesh: &mut HalfEdgeMesh<I>, h0: HalfEdgeId<I>, face_point: Point3<f64>) {
    let across = mesh.next(mesh.next(h0));
    let h1 = mesh.insert_edge(h0, across);

    let center = mesh.add_vertex(face_point);
    mesh.split_halfedge(h1, center);

    let mut h = mesh.next(mesh.next(mesh.next(h1)));
    while h != h0 {
        mesh.insert_edge(h1, h);
        h = mesh.next(mesh.next(mesh.next(h1)));
    }
}
