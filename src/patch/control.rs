//! The 4×4 control grid and its wireframe.

use nalgebra::Point3;

/// Control points of a bicubic patch, indexed `[i][j]` with `i` along `u`
/// and `j` along `v`.
pub type ControlGrid = [[Point3<f64>; 4]; 4];

/// Number of control points in a grid.
pub const CONTROL_POINT_COUNT: usize = 16;

/// Line segments of the control polygon, as pairs of flat indices.
///
/// The three edges of every row come first, then the three edges of every
/// column.
pub const CONTROL_EDGES: [[u32; 2]; 24] = [
    [0, 1],
    [1, 2],
    [2, 3],
    [4, 5],
    [5, 6],
    [6, 7],
    [8, 9],
    [9, 10],
    [10, 11],
    [12, 13],
    [13, 14],
    [14, 15],
    [0, 4],
    [4, 8],
    [8, 12],
    [1, 5],
    [5, 9],
    [9, 13],
    [2, 6],
    [6, 10],
    [10, 14],
    [3, 7],
    [7, 11],
    [11, 15],
];

/// Flat index `4i + j` of control point `(i, j)`.
#[inline]
pub const fn flat_index(i: usize, j: usize) -> usize {
    4 * i + j
}

/// Inverse of [`flat_index`].
#[inline]
pub const fn grid_position(index: usize) -> (usize, usize) {
    (index / 4, index % 4)
}

/// Build a grid by evaluating `f(i, j)` for every control point.
pub fn grid_from_fn(mut f: impl FnMut(usize, usize) -> Point3<f64>) -> ControlGrid {
    std::array::from_fn(|i| std::array::from_fn(|j| f(i, j)))
}

/// Iterate over the control points in flat-index order.
pub fn flat_points(grid: &ControlGrid) -> impl Iterator<Item = &Point3<f64>> + '_ {
    grid.iter().flatten()
}

/// Axis-aligned bounds of the control points.
///
/// The surface lies inside the convex hull of its control points, so these
/// bounds also contain the whole patch.
pub fn bounding_box(grid: &ControlGrid) -> (Point3<f64>, Point3<f64>) {
    let first = grid[0][0];
    flat_points(grid).fold((first, first), |(mut min, mut max), p| {
        for k in 0..3 {
            min[k] = min[k].min(p[k]);
            max[k] = max[k].max(p[k]);
        }
        (min, max)
    })
}

/// Flat control points spanning `[0, size]²` in the XY plane.
pub fn planar(size: f64) -> ControlGrid {
    grid_from_fn(|i, j| Point3::new(size * i as f64 / 3.0, size * j as f64 / 3.0, 0.0))
}

/// A saddle over `[0, 1]²`: control heights `(i - 1.5)(j - 1.5) / 2`.
pub fn saddle() -> ControlGrid {
    grid_from_fn(|i, j| {
        let h = (i as f64 - 1.5) * (j as f64 - 1.5) * 0.5;
        Point3::new(i as f64 / 3.0, j as f64 / 3.0, h)
    })
}

/// A dome over `[0, 1]²` with the four inner control points raised.
pub fn bump(height: f64) -> ControlGrid {
    grid_from_fn(|i, j| {
        let inner = (1..=2).contains(&i) && (1..=2).contains(&j);
        let z = if inner { height } else { 0.0 };
        Point3::new(i as f64 / 3.0, j as f64 / 3.0, z)
    })
}
