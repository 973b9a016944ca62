//! Editor tunables.

use grille_core::grid::DEFAULT_SNAP_TOLERANCE;

/// Maximum number of undo snapshots kept.
pub const DEFAULT_HISTORY_DEPTH: usize = 50;

/// Screen distance within which a click picks a node.
pub const DEFAULT_PICK_RADIUS: f64 = 30.0;

#[derive(Debug, Clone, PartialEq)]
pub struct EditorConfig {
    pub pick_radius: f64,
    pub snap_tolerance: f64,
    pub history_depth: usize,
    /// Wheel zoom factor for a positive wheel delta.
    pub wheel_zoom_in: f64,
    /// Wheel zoom factor for any other wheel delta.
    pub wheel_zoom_out: f64,
    pub zoom_in_step: f64,
    pub zoom_out_step: f64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            pick_radius: DEFAULT_PICK_RADIUS,
            snap_tolerance: DEFAULT_SNAP_TOLERANCE,
            history_depth: DEFAULT_HISTORY_DEPTH,
            wheel_zoom_in: 1.1,
            wheel_zoom_out: 0.9,
            zoom_in_step: 1.2,
            zoom_out_step: 0.8,
        }
    }
}
