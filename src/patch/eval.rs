//! Point and normal evaluation of a bicubic Bézier patch.
//!
//! Two strategies produce the same surface:
//!
//! - [`EvalStrategy::Bernstein`] sums the control points weighted by the cubic
//!   Bernstein polynomials; the partial derivatives use the quadratic basis on
//!   forward differences of the control points.
//! - [`EvalStrategy::DeCasteljau`] repeatedly blends neighboring points
//!   bilinearly until one remains; the tangents come from the last 2×2 level.
//!
//! Both are exact for polynomials of this degree and agree to rounding error.

use std::fmt;

use nalgebra::{Point3, Vector3};
use tracing::debug;

use super::control::ControlGrid;
use crate::error::{MeshError, Result};

/// Cross products shorter than this leave the normal undefined.
pub const SINGULAR_NORMAL_EPSILON: f64 = 1e-12;

const CUBIC_BINOMIALS: [f64; 4] = [1.0, 3.0, 3.0, 1.0];
const QUADRATIC_BINOMIALS: [f64; 3] = [1.0, 2.0, 1.0];

/// How a patch is evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EvalStrategy {
    /// Closed-form Bernstein polynomials.
    Bernstein,
    /// Recursive corner cutting.
    #[default]
    DeCasteljau,
}

impl EvalStrategy {
    /// The other strategy.
    pub fn toggled(self) -> Self {
        match self {
            EvalStrategy::Bernstein => EvalStrategy::DeCasteljau,
            EvalStrategy::DeCasteljau => EvalStrategy::Bernstein,
        }
    }

    /// Human readable name.
    pub fn name(self) -> &'static str {
        match self {
            EvalStrategy::Bernstein => "Bernstein",
            EvalStrategy::DeCasteljau => "de Casteljau",
        }
    }
}

impl fmt::Display for EvalStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Position, tangents and unit normal at one parameter pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfacePoint {
    /// Point on the surface.
    pub position: Point3<f64>,
    /// Partial derivative along `u`.
    pub du: Vector3<f64>,
    /// Partial derivative along `v`.
    pub dv: Vector3<f64>,
    /// `normalize(du × dv)`, or zero where the tangents are degenerate.
    pub normal: Vector3<f64>,
}

impl SurfacePoint {
    fn from_tangents(position: Point3<f64>, du: Vector3<f64>, dv: Vector3<f64>) -> Self {
        let cross = du.cross(&dv);
        let normal = match cross.try_normalize(SINGULAR_NORMAL_EPSILON) {
            Some(n) => n,
            None => {
                debug!(
                    x = position.x,
                    y = position.y,
                    z = position.z,
                    "Degenerate tangents, using zero normal"
                );
                Vector3::zeros()
            }
        };

        Self {
            position,
            du,
            dv,
            normal,
        }
    }

    /// Whether the normal is undefined here (and was set to zero).
    pub fn is_singular(&self) -> bool {
        self.normal == Vector3::zeros()
    }
}

/// Cubic Bernstein polynomial `C(3,i) t^i (1-t)^(3-i)`.
///
/// # Panics
///
/// Panics if `i > 3`.
#[inline]
pub fn bernstein3(i: usize, t: f64) -> f64 {
    CUBIC_BINOMIALS[i] * t.powi(i as i32) * (1.0 - t).powi(3 - i as i32)
}

/// Quadratic Bernstein polynomial `C(2,i) t^i (1-t)^(2-i)`.
///
/// # Panics
///
/// Panics if `i > 2`.
#[inline]
pub fn bernstein2(i: usize, t: f64) -> f64 {
    QUADRATIC_BINOMIALS[i] * t.powi(i as i32) * (1.0 - t).powi(2 - i as i32)
}

/// Evaluate the patch at `(u, v)` with the given strategy.
///
/// # Errors
///
/// Returns [`MeshError::InvalidParameter`] if `u` or `v` is not a finite
/// value in `[0, 1]`.
pub fn evaluate(grid: &ControlGrid, u: f64, v: f64, strategy: EvalStrategy) -> Result<SurfacePoint> {
    check_parameter("u", u)?;
    check_parameter("v", v)?;

    Ok(match strategy {
        EvalStrategy::Bernstein => evaluate_bernstein(grid, u, v),
        EvalStrategy::DeCasteljau => evaluate_de_casteljau(grid, u, v),
    })
}

fn check_parameter(name: &'static str, t: f64) -> Result<()> {
    if t.is_finite() && (0.0..=1.0).contains(&t) {
        Ok(())
    } else {
        Err(MeshError::invalid_param(name, t, "must be a finite value in [0, 1]"))
    }
}

fn evaluate_bernstein(grid: &ControlGrid, u: f64, v: f64) -> SurfacePoint {
    let bu: [f64; 4] = std::array::from_fn(|i| bernstein3(i, u));
    let bv: [f64; 4] = std::array::from_fn(|j| bernstein3(j, v));
    let du_basis: [f64; 3] = std::array::from_fn(|i| bernstein2(i, u));
    let dv_basis: [f64; 3] = std::array::from_fn(|j| bernstein2(j, v));

    let mut position = Vector3::zeros();
    let mut du = Vector3::zeros();
    let mut dv = Vector3::zeros();

    for i in 0..4 {
        for j in 0..4 {
            let p = grid[i][j].coords;
            position += p * (bu[i] * bv[j]);

            if i < 3 {
                du += (grid[i + 1][j] - grid[i][j]) * (du_basis[i] * bv[j]);
            }
            if j < 3 {
                dv += (grid[i][j + 1] - grid[i][j]) * (bu[i] * dv_basis[j]);
            }
        }
    }

    SurfacePoint::from_tangents(Point3::from(position), du * 3.0, dv * 3.0)
}

fn evaluate_de_casteljau(grid: &ControlGrid, u: f64, v: f64) -> SurfacePoint {
    let (u0, u1) = (1.0 - u, u);
    let (v0, v1) = (1.0 - v, v);

    let mut level: [[Vector3<f64>; 4]; 4] = std::array::from_fn(|i| std::array::from_fn(|j| grid[i][j].coords));

    // Reduce 4×4 -> 3×3 -> 2×2 in place. Each cell only reads cells at or
    // after itself, which are not yet overwritten.
    for size in [4, 3] {
        for i in 0..size - 1 {
            for j in 0..size - 1 {
                level[i][j] = level[i][j] * (u0 * v0)
                    + level[i + 1][j] * (u1 * v0)
                    + level[i][j + 1] * (u0 * v1)
                    + level[i + 1][j + 1] * (u1 * v1);
            }
        }
    }

    let (b00, b10, b01, b11) = (level[0][0], level[1][0], level[0][1], level[1][1]);

    let position = b00 * (u0 * v0) + b10 * (u1 * v0) + b01 * (u0 * v1) + b11 * (u1 * v1);
    let du = ((b10 - b00) * v0 + (b11 - b01) * v1) * 3.0;
    let dv = ((b01 - b00) * u0 + (b11 - b10) * u1) * 3.0;

    SurfacePoint::from_tangents(Point3::from(position), du, dv)
}
