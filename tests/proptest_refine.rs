//! Property-based tests for patch evaluation and Catmull-Clark refinement.
//!
//! Run with: cargo test --test proptest_refine

use nalgebra::Point3;
use patchwork::algo::subdivide::{
    catmull_clark_refine, catmull_clark_subdivide, compute_refinement_points, SubdivideOptions,
};
use patchwork::mesh::{primitives, HalfEdgeMesh};
use patchwork::patch::{bernstein3, evaluate, tessellate, ControlGrid, EvalStrategy, TessellateOptions};
use proptest::prelude::*;

// =============================================================================
// Strategies
// =============================================================================

/// Generate a random control point in a bounded range.
fn arb_point() -> impl Strategy<Value = Point3<f64>> {
    prop::array::uniform3(-10.0..10.0f64).prop_map(|[x, y, z]| Point3::new(x, y, z))
}

/// Generate a random 4×4 control grid.
fn arb_grid() -> impl Strategy<Value = ControlGrid> {
    prop::array::uniform4(prop::array::uniform4(arb_point()))
}

/// A closed built-in mesh, chosen by index.
fn closed_mesh(which: usize) -> HalfEdgeMesh {
    match which {
        0 => primitives::cube(),
        1 => primitives::tetrahedron(),
        _ => primitives::pyramid(),
    }
    .unwrap()
}

/// Move every vertex of a mesh by a random offset.
fn jitter(mesh: &mut HalfEdgeMesh, offsets: &[[f64; 3]]) {
    for (v, [dx, dy, dz]) in mesh.vertex_ids().collect::<Vec<_>>().into_iter().zip(offsets.iter().copied()) {
        let p = *mesh.position(v);
        mesh.set_position(v, Point3::new(p.x + dx, p.y + dy, p.z + dz));
    }
}

// =============================================================================
// Bezier evaluation
// =============================================================================

proptest! {
    #[test]
    fn bernstein_partition_of_unity(t in 0.0..=1.0f64) {
        let sum: f64 = (0..4).map(|i| bernstein3(i, t)).sum();
        prop_assert!((sum - 1.0).abs() < 1e-12);
        prop_assert!((0..4).all(|i| bernstein3(i, t) >= 0.0));
    }

    #[test]
    fn strategies_agree(grid in arb_grid(), u in 0.0..=1.0f64, v in 0.0..=1.0f64) {
        let a = evaluate(&grid, u, v, EvalStrategy::Bernstein).unwrap();
        let b = evaluate(&grid, u, v, EvalStrategy::DeCasteljau).unwrap();

        prop_assert!((a.position - b.position).norm() < 1e-9);
        prop_assert!((a.du - b.du).norm() < 1e-8);
        prop_assert!((a.dv - b.dv).norm() < 1e-8);

        // Normals are only comparable away from degenerate tangents.
        if a.du.cross(&a.dv).norm() > 1e-3 {
            prop_assert!((a.normal - b.normal).norm() < 1e-4);
        }
    }

    #[test]
    fn normals_are_unit_or_zero(grid in arb_grid(), u in 0.0..=1.0f64, v in 0.0..=1.0f64) {
        let p = evaluate(&grid, u, v, EvalStrategy::DeCasteljau).unwrap();
        let len = p.normal.norm();
        prop_assert!(p.is_singular() || (len - 1.0).abs() < 1e-9);
        prop_assert!(p.normal.iter().all(|c| c.is_finite()));
    }

    #[test]
    fn tessellation_sizes(grid in arb_grid(), n in 2usize..24) {
        let surface = tessellate(&grid, &TessellateOptions::new(n)).unwrap();

        prop_assert_eq!(surface.positions.len(), n * n);
        prop_assert_eq!(surface.normals.len(), n * n);
        prop_assert_eq!(surface.indices.len(), 6 * (n - 1) * (n - 1));
        prop_assert!(surface.validate().is_ok());
    }
}

// =============================================================================
// Catmull-Clark refinement
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn closed_meshes_keep_euler(
        which in 0usize..3,
        passes in 1usize..4,
        offsets in prop::collection::vec(prop::array::uniform3(-0.2..0.2f64), 8),
    ) {
        let mut mesh = closed_mesh(which);
        jitter(&mut mesh, &offsets);

        catmull_clark_subdivide(&mut mesh, &SubdivideOptions::new(passes)).unwrap();

        prop_assert_eq!(mesh.euler_characteristic(), 2);
        prop_assert!(mesh.is_valid());
        prop_assert!(mesh.is_quad_mesh());
    }

    #[test]
    fn refinement_counts(n in 1usize..6) {
        let mut mesh: HalfEdgeMesh = primitives::quad_grid(n).unwrap();
        let (v, e, f) = (mesh.num_vertices(), mesh.num_edges(), mesh.num_faces());
        let corners: usize = mesh.face_ids().map(|f| mesh.face_valence(f)).sum();

        let stats = catmull_clark_refine(&mut mesh).unwrap();

        prop_assert_eq!(stats.vertices_after, v + e + f);
        prop_assert_eq!(stats.edges_after, 2 * e + corners);
        prop_assert_eq!(stats.faces_after, corners);
        prop_assert_eq!(mesh.euler_characteristic(), 1);
    }

    #[test]
    fn refinement_points_stay_in_hull(
        offsets in prop::collection::vec(prop::array::uniform3(-0.3..0.3f64), 8),
    ) {
        let mut mesh: HalfEdgeMesh = primitives::cube().unwrap();
        jitter(&mut mesh, &offsets);
        let (min, max) = mesh.bounding_box().unwrap();

        // Every rule is a convex combination of existing positions.
        let points = compute_refinement_points(&mesh).unwrap();
        let all = points
            .face_points
            .values()
            .chain(points.edge_points.values())
            .chain(points.vertex_points.values());
        for p in all {
            for k in 0..3 {
                prop_assert!(p[k] >= min[k] - 1e-12 && p[k] <= max[k] + 1e-12);
            }
        }
    }
}
