//! Coordinate system and graduated grid.
//!
//! Three coordinate spaces are involved:
//!
//! - **real**: metric units, origin-relative, Y pointing up.
//! - **canvas**: screen pixels at zoom 1.0 with the current pan applied.
//!   Element positions are stored in this space.
//! - **view**: what is on screen, `origin + (canvas − origin) × zoom`.
//!
//! The grid is not uniform: each axis has an ordered list of spacings and a
//! graduation sits at every running sum of them.

use crate::error::ValidationError;
use crate::model::Plane;
use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};
use smallvec::{SmallVec, smallvec};

pub const MIN_ZOOM: f64 = 0.1;
pub const MAX_ZOOM: f64 = 5.0;

/// Pixels per real unit at scale factor 1.0.
pub const BASE_SCALE: f64 = 100.0;
pub const MIN_SCALE_FACTOR: f64 = 0.1;
pub const MAX_SCALE_FACTOR: f64 = 2.0;

/// Default distance within which a point snaps to a grid intersection.
pub const DEFAULT_SNAP_TOLERANCE: f64 = 10.0;

/// Every n-th graduation is drawn as a major line.
pub const MAJOR_EVERY: usize = 5;

pub type Spacings = SmallVec<[f64; 8]>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// One tick mark along an axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Graduation {
    /// View-space coordinate along the axis (x for horizontal, y for vertical).
    pub position: f64,
    /// Cumulative real distance from the origin.
    pub distance: f64,
    pub major: bool,
}

impl Graduation {
    pub fn label(&self) -> String {
        format!("{:.1}", self.distance)
    }
}

/// The fields an undo snapshot restores.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridTransform {
    pub origin: Point,
    pub zoom: f64,
    pub scale_x: f64,
    pub scale_y: f64,
}

/// Serializable starting configuration for a grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub h_spacings: Vec<f64>,
    pub v_spacings: Vec<f64>,
    pub origin_x: f64,
    pub origin_y: f64,
    pub scale_x: f64,
    pub scale_y: f64,
    pub zoom: f64,
    pub plane: Plane,
    pub visible: bool,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            h_spacings: vec![1.0, 2.0, 5.0, 6.0],
            v_spacings: vec![7.0, 8.0, 4.0, 5.0],
            origin_x: 100.0,
            origin_y: 700.0,
            scale_x: BASE_SCALE,
            scale_y: BASE_SCALE,
            zoom: 1.0,
            plane: Plane::Xy,
            visible: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GridModel {
    origin: Point,
    zoom: f64,
    scale_x: f64,
    scale_y: f64,
    h_spacings: Spacings,
    v_spacings: Spacings,
    plane: Plane,
    pub visible: bool,
}

impl Default for GridModel {
    fn default() -> Self {
        Self {
            origin: Point::new(100.0, 700.0),
            zoom: 1.0,
            scale_x: BASE_SCALE,
            scale_y: BASE_SCALE,
            h_spacings: smallvec![1.0, 2.0, 5.0, 6.0],
            v_spacings: smallvec![7.0, 8.0, 4.0, 5.0],
            plane: Plane::Xy,
            visible: true,
        }
    }
}

impl GridModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a grid from a configuration, validating every number.
    pub fn from_config(config: &GridConfig) -> Result<Self, ValidationError> {
        let mut grid = Self::default();
        grid.set_spacings(Axis::Horizontal, config.h_spacings.iter().copied().collect())?;
        grid.set_spacings(Axis::Vertical, config.v_spacings.iter().copied().collect())?;
        for value in [config.origin_x, config.origin_y, config.zoom] {
            ensure_finite(value)?;
        }
        for scale in [config.scale_x, config.scale_y] {
            ensure_finite(scale)?;
            if scale <= 0.0 {
                return Err(ValidationError::InvalidSpacing { value: scale });
            }
        }
        grid.origin = Point::new(config.origin_x, config.origin_y);
        grid.scale_x = config.scale_x;
        grid.scale_y = config.scale_y;
        grid.set_zoom(config.zoom);
        grid.plane = config.plane;
        grid.visible = config.visible;
        Ok(grid)
    }

    // ─── Accessors ───────────────────────────────────────────────────────

    pub fn origin(&self) -> Point {
        self.origin
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn scale_x(&self) -> f64 {
        self.scale_x
    }

    pub fn scale_y(&self) -> f64 {
        self.scale_y
    }

    pub fn spacings(&self, axis: Axis) -> &[f64] {
        match axis {
            Axis::Horizontal => &self.h_spacings,
            Axis::Vertical => &self.v_spacings,
        }
    }

    pub fn plane(&self) -> Plane {
        self.plane
    }

    pub fn transform(&self) -> GridTransform {
        GridTransform {
            origin: self.origin,
            zoom: self.zoom,
            scale_x: self.scale_x,
            scale_y: self.scale_y,
        }
    }

    /// Restore a snapshot's transform verbatim.
    pub fn set_transform(&mut self, transform: GridTransform) {
        self.origin = transform.origin;
        self.zoom = transform.zoom.clamp(MIN_ZOOM, MAX_ZOOM);
        self.scale_x = transform.scale_x;
        self.scale_y = transform.scale_y;
    }

    // ─── Conversions ─────────────────────────────────────────────────────

    /// Real → canvas. Zoom is not applied.
    pub fn to_screen(&self, real: Point) -> Point {
        Point::new(
            self.origin.x + real.x * self.scale_x,
            self.origin.y - real.y * self.scale_y,
        )
    }

    /// Real → view, for placements computed from zoomed graduations.
    pub fn to_zoomed_screen(&self, real: Point) -> Point {
        Point::new(
            self.origin.x + real.x * self.scale_x * self.zoom,
            self.origin.y - real.y * self.scale_y * self.zoom,
        )
    }

    /// Canvas → real. Zoom is not applied.
    pub fn to_real(&self, canvas: Point) -> Point {
        Point::new(
            (canvas.x - self.origin.x) / self.scale_x,
            (self.origin.y - canvas.y) / self.scale_y,
        )
    }

    pub fn canvas_to_view(&self, canvas: Point) -> Point {
        self.origin + (canvas - self.origin) * self.zoom
    }

    pub fn view_to_canvas(&self, view: Point) -> Point {
        self.origin + (view - self.origin) / self.zoom
    }

    // ─── Axes & graduations ──────────────────────────────────────────────

    /// Drawn length of an axis: `sum(spacings) × scale × zoom`.
    pub fn axis_length(&self, spacings: &[f64], scale: f64) -> f64 {
        spacings.iter().sum::<f64>() * scale * self.zoom
    }

    pub fn h_axis_length(&self) -> f64 {
        self.axis_length(&self.h_spacings, self.scale_x)
    }

    pub fn v_axis_length(&self) -> f64 {
        self.axis_length(&self.v_spacings, self.scale_y)
    }

    /// Graduations along the horizontal axis, left to right.
    pub fn h_graduations(&self) -> Vec<Graduation> {
        let step = self.scale_x * self.zoom;
        graduations(&self.h_spacings, self.origin.x, step)
    }

    /// Graduations along the vertical axis, going up from the origin.
    pub fn v_graduations(&self) -> Vec<Graduation> {
        let step = -self.scale_y * self.zoom;
        graduations(&self.v_spacings, self.origin.y, step)
    }

    /// Snap a view-space point to the nearest graduation intersection.
    ///
    /// Each axis is searched independently; the intersection is returned
    /// only when both axis distances are strictly below `tolerance`. The
    /// origin itself is not a graduation.
    pub fn snap_to_grid(&self, view: Point, tolerance: f64) -> Option<Point> {
        let x = nearest_graduation(&self.h_graduations(), view.x)?;
        let y = nearest_graduation(&self.v_graduations(), view.y)?;
        if x.1 < tolerance && y.1 < tolerance {
            Some(Point::new(x.0, y.0))
        } else {
            log::trace!("no snap near ({:.1}, {:.1})", view.x, view.y);
            None
        }
    }

    // ─── Mutations ───────────────────────────────────────────────────────

    /// Multiply zoom by `factor`, clamped to [`MIN_ZOOM`, `MAX_ZOOM`].
    pub fn zoom_by(&mut self, factor: f64) -> f64 {
        if factor.is_finite() && factor > 0.0 {
            self.set_zoom(self.zoom * factor);
        }
        self.zoom
    }

    pub fn set_zoom(&mut self, zoom: f64) {
        if zoom.is_finite() {
            self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
        }
    }

    /// Move the origin by `delta`. Element positions must move with it;
    /// callers holding a scene pan both together.
    pub fn shift_origin(&mut self, delta: Vec2) {
        self.origin += delta;
    }

    /// Set an axis scale from a slider factor: `scale = 100 × factor`.
    pub fn set_scale_factor(&mut self, axis: Axis, factor: f64) -> Result<f64, ValidationError> {
        ensure_finite(factor)?;
        if !(MIN_SCALE_FACTOR..=MAX_SCALE_FACTOR).contains(&factor) {
            return Err(ValidationError::ScaleOutOfRange {
                factor,
                min: MIN_SCALE_FACTOR,
                max: MAX_SCALE_FACTOR,
            });
        }
        let scale = BASE_SCALE * factor;
        match axis {
            Axis::Horizontal => self.scale_x = scale,
            Axis::Vertical => self.scale_y = scale,
        }
        Ok(scale)
    }

    pub fn set_spacings(&mut self, axis: Axis, spacings: Spacings) -> Result<(), ValidationError> {
        if spacings.is_empty() {
            return Err(ValidationError::Empty);
        }
        if let Some(&value) = spacings.iter().find(|v| !(v.is_finite() && **v > 0.0)) {
            return Err(ValidationError::InvalidSpacing { value });
        }
        match axis {
            Axis::Horizontal => self.h_spacings = spacings,
            Axis::Vertical => self.v_spacings = spacings,
        }
        Ok(())
    }

    /// Returns `true` when the plane actually changed.
    pub fn set_plane(&mut self, plane: Plane) -> bool {
        if self.plane == plane {
            return false;
        }
        self.plane = plane;
        true
    }
}

fn ensure_finite(value: f64) -> Result<(), ValidationError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ValidationError::NotFinite { value })
    }
}

fn graduations(spacings: &[f64], start: f64, step: f64) -> Vec<Graduation> {
    let mut position = start;
    let mut distance = 0.0;
    spacings
        .iter()
        .enumerate()
        .map(|(i, spacing)| {
            position += spacing * step;
            distance += spacing;
            Graduation {
                position,
                distance,
                major: (i + 1) % MAJOR_EVERY == 0,
            }
        })
        .collect()
}

/// Closest graduation to `coord` as (position, distance). First wins ties.
fn nearest_graduation(marks: &[Graduation], coord: f64) -> Option<(f64, f64)> {
    let mut best: Option<(f64, f64)> = None;
    for mark in marks {
        let d = (coord - mark.position).abs();
        if best.is_none_or(|(_, min)| d < min) {
            best = Some((mark.position, d));
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn horizontal_graduations_accumulate_spacings() {
        let grid = GridModel::new();
        let xs: Vec<f64> = grid.h_graduations().iter().map(|g| g.position).collect();
        assert_eq!(xs, vec![200.0, 400.0, 900.0, 1500.0]);
    }

    #[test]
    fn vertical_graduations_go_up() {
        let grid = GridModel::new();
        let ys: Vec<f64> = grid.v_graduations().iter().map(|g| g.position).collect();
        assert_eq!(ys, vec![0.0, -800.0, -1200.0, -1700.0]);
        assert_eq!(grid.v_graduations()[1].label(), "15.0");
    }

    #[test]
    fn every_fifth_graduation_is_major() {
        let mut grid = GridModel::new();
        grid.set_spacings(Axis::Horizontal, smallvec![1.0; 10]).unwrap();
        let majors: Vec<bool> = grid.h_graduations().iter().map(|g| g.major).collect();
        assert!(majors[4] && majors[9]);
        assert_eq!(majors.iter().filter(|m| **m).count(), 2);
    }

    #[test]
    fn graduations_scale_with_zoom() {
        let mut grid = GridModel::new();
        grid.set_zoom(2.0);
        assert!(approx(grid.h_graduations()[0].position, 300.0));
        assert!(approx(grid.h_axis_length(), 2800.0));
    }

    #[test]
    fn real_and_screen_are_inverse() {
        let grid = GridModel::new();
        let real = Point::new(3.0, 7.0);
        let screen = grid.to_screen(real);
        assert_eq!(screen, Point::new(400.0, 0.0));
        assert_eq!(grid.to_real(screen), real);
    }

    #[test]
    fn zoomed_screen_applies_zoom() {
        let mut grid = GridModel::new();
        grid.set_zoom(0.5);
        assert_eq!(grid.to_zoomed_screen(Point::new(2.0, 2.0)), Point::new(200.0, 600.0));
        let canvas = Point::new(300.0, 500.0);
        let view = grid.canvas_to_view(canvas);
        assert_eq!(view, Point::new(200.0, 600.0));
        assert_eq!(grid.view_to_canvas(view), canvas);
    }

    #[test]
    fn snap_requires_both_axes_within_tolerance() {
        let grid = GridModel::new();
        assert_eq!(
            grid.snap_to_grid(Point::new(205.0, -795.0), DEFAULT_SNAP_TOLERANCE),
            Some(Point::new(200.0, -800.0))
        );
        assert_eq!(
            grid.snap_to_grid(Point::new(205.0, -780.0), DEFAULT_SNAP_TOLERANCE),
            None
        );
        // Exactly at the tolerance is a miss.
        assert_eq!(
            grid.snap_to_grid(Point::new(210.0, 0.0), DEFAULT_SNAP_TOLERANCE),
            None
        );
    }

    #[test]
    fn origin_is_not_a_snap_target() {
        let grid = GridModel::new();
        assert_eq!(grid.snap_to_grid(Point::new(100.0, 700.0), 10.0), None);
    }

    #[test]
    fn snap_ties_pick_first_graduation() {
        let mut grid = GridModel::new();
        grid.set_spacings(Axis::Horizontal, smallvec![1.0, 1.0]).unwrap();
        grid.set_spacings(Axis::Vertical, smallvec![1.0]).unwrap();
        // Halfway between x = 200 and x = 300 with a wide tolerance.
        let snapped = grid.snap_to_grid(Point::new(250.0, 600.0), 60.0).unwrap();
        assert_eq!(snapped, Point::new(200.0, 600.0));
    }

    #[test]
    fn zoom_is_clamped() {
        let mut grid = GridModel::new();
        for _ in 0..50 {
            grid.zoom_by(1.3);
        }
        assert_eq!(grid.zoom(), MAX_ZOOM);
        for _ in 0..100 {
            grid.zoom_by(0.5);
        }
        assert_eq!(grid.zoom(), MIN_ZOOM);
        grid.zoom_by(f64::NAN);
        assert_eq!(grid.zoom(), MIN_ZOOM);
    }

    #[test]
    fn scale_factor_maps_slider_range() {
        let mut grid = GridModel::new();
        assert_eq!(grid.set_scale_factor(Axis::Vertical, 1.5).unwrap(), 150.0);
        assert_eq!(grid.scale_y(), 150.0);
        assert!(grid.set_scale_factor(Axis::Horizontal, 3.0).is_err());
        assert_eq!(grid.scale_x(), BASE_SCALE);
    }

    #[test]
    fn invalid_spacings_keep_previous() {
        let mut grid = GridModel::new();
        assert!(grid.set_spacings(Axis::Horizontal, smallvec![1.0, -2.0]).is_err());
        assert!(grid.set_spacings(Axis::Horizontal, Spacings::new()).is_err());
        assert_eq!(grid.spacings(Axis::Horizontal), &[1.0, 2.0, 5.0, 6.0]);
    }

    #[test]
    fn plane_change_reports_only_real_changes() {
        let mut grid = GridModel::new();
        assert!(!grid.set_plane(Plane::Xy));
        assert!(grid.set_plane(Plane::Yz));
        assert_eq!(grid.plane().axis_labels(), ("Y", "Z"));
    }

    #[test]
    fn config_defaults_and_validation() {
        let grid = GridModel::from_config(&GridConfig::default()).unwrap();
        assert_eq!(grid, GridModel::default());

        let bad = GridConfig {
            v_spacings: vec![],
            ..GridConfig::default()
        };
        assert_eq!(GridModel::from_config(&bad), Err(ValidationError::Empty));

        let zoomed = GridConfig {
            zoom: 40.0,
            ..GridConfig::default()
        };
        assert_eq!(GridModel::from_config(&zoomed).unwrap().zoom(), MAX_ZOOM);
    }
}
