//! An editable bicubic Bézier patch.

use nalgebra::{Matrix4, Point2, Point3, Vector3};
use tracing::debug;

use super::control::{self, ControlGrid, CONTROL_POINT_COUNT};
use super::eval::{self, EvalStrategy, SurfacePoint};
use super::tessellate::{self, SurfaceMesh, TessellateOptions};
use crate::error::{MeshError, Result};

/// A bicubic Bézier patch with an evaluation strategy and one selected
/// control point.
///
/// The selection is only bookkeeping for interactive editing; it never
/// affects evaluation.
///
/// # Example
///
/// ```
/// use patchwork::patch::{control, BezierPatch, EvalStrategy};
///
/// let mut patch = BezierPatch::new(control::saddle());
/// patch.set_strategy(EvalStrategy::Bernstein);
///
/// let surface = patch.tessellate(10).unwrap();
/// assert_eq!(surface.positions.len(), 100);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct BezierPatch {
    control: ControlGrid,
    strategy: EvalStrategy,
    selected: usize,
}

impl Default for BezierPatch {
    /// All control points at the origin, de Casteljau evaluation, point 0
    /// selected.
    fn default() -> Self {
        Self::new([[Point3::origin(); 4]; 4])
    }
}

impl BezierPatch {
    /// Create a patch from its control grid.
    pub fn new(control: ControlGrid) -> Self {
        Self {
            control,
            strategy: EvalStrategy::default(),
            selected: 0,
        }
    }

    /// The control grid.
    pub fn control_points(&self) -> &ControlGrid {
        &self.control
    }

    /// Control point `(i, j)`.
    ///
    /// # Panics
    ///
    /// Panics if `i` or `j` is greater than 3.
    pub fn control_point(&self, i: usize, j: usize) -> Point3<f64> {
        self.control[i][j]
    }

    /// Move control point `(i, j)`.
    pub fn set_control_point(&mut self, i: usize, j: usize, p: Point3<f64>) -> Result<()> {
        if i > 3 || j > 3 {
            return Err(MeshError::invalid_param(
                "control point",
                format!("({}, {})", i, j),
                "grid coordinates must be in 0..4",
            ));
        }
        self.control[i][j] = p;
        Ok(())
    }

    /// The active evaluation strategy.
    pub fn strategy(&self) -> EvalStrategy {
        self.strategy
    }

    /// Switch to the given strategy.
    pub fn set_strategy(&mut self, strategy: EvalStrategy) {
        self.strategy = strategy;
    }

    /// Switch to the other strategy and return it.
    pub fn toggle_strategy(&mut self) -> EvalStrategy {
        self.strategy = self.strategy.toggled();
        debug!(strategy = %self.strategy, "Switched evaluation strategy");
        self.strategy
    }

    /// Evaluate position, tangents and normal at `(u, v)`.
    pub fn evaluate(&self, u: f64, v: f64) -> Result<SurfacePoint> {
        eval::evaluate(&self.control, u, v, self.strategy)
    }

    /// Position and unit normal at `(u, v)`.
    pub fn position_normal(&self, u: f64, v: f64) -> Result<(Point3<f64>, Vector3<f64>)> {
        let sample = self.evaluate(u, v)?;
        Ok((sample.position, sample.normal))
    }

    /// Tessellate on a `resolution × resolution` grid with the active strategy.
    pub fn tessellate(&self, resolution: usize) -> Result<SurfaceMesh> {
        let options = TessellateOptions::new(resolution).with_strategy(self.strategy);
        tessellate::tessellate(&self.control, &options)
    }

    /// Axis-aligned bounds of the control points, which also bound the surface.
    pub fn bounding_box(&self) -> (Point3<f64>, Point3<f64>) {
        control::bounding_box(&self.control)
    }

    /// Flat index of the selected control point.
    pub fn selected(&self) -> usize {
        self.selected
    }

    /// Select a control point by flat index.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::InvalidParameter`] if `index > 15`.
    pub fn select(&mut self, index: usize) -> Result<()> {
        if index >= CONTROL_POINT_COUNT {
            return Err(MeshError::invalid_param("index", index, "control points are numbered 0..16"));
        }
        self.selected = index;
        Ok(())
    }

    /// Position of the selected control point.
    pub fn selected_control_point(&self) -> Point3<f64> {
        let (i, j) = control::grid_position(self.selected);
        self.control[i][j]
    }

    /// Move the selected control point.
    pub fn set_selected_control_point(&mut self, p: Point3<f64>) {
        let (i, j) = control::grid_position(self.selected);
        self.control[i][j] = p;
    }

    /// Select the control point whose projection lies closest to `coord`.
    ///
    /// Every control point is transformed by `mvp` and divided by `w`; the
    /// nearest one in normalized device coordinates becomes the selection.
    /// Returns its distance to `coord`. Points with `w == 0` cannot be
    /// projected and are skipped; if none can be, the selection is kept and
    /// infinity is returned.
    pub fn pick(&mut self, coord: Point2<f64>, mvp: &Matrix4<f64>) -> f64 {
        let mut best = f64::INFINITY;

        for (index, p) in control::flat_points(&self.control).enumerate() {
            let clip = mvp * p.to_homogeneous();
            if clip.w == 0.0 {
                debug!(index, "Control point projects to infinity");
                continue;
            }

            let ndc = Point2::new(clip.x / clip.w, clip.y / clip.w);
            let distance = (ndc - coord).norm();
            if distance < best {
                best = distance;
                self.selected = index;
            }
        }

        best
    }
}
