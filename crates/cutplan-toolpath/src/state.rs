//! Simulated machine state.
//!
//! One instance exists per generation call; it tracks the controller's
//! modal values so the optimized emitter knows which words can be
//! omitted, and so move distances can be computed without re-reading the
//! emitted text.

/// Height the tool retracts to between pieces, in mm above the stock top.
pub const SAFE_Z_MM: f64 = 5.0;

/// Coordinate comparison tolerance; below this a word is considered
/// unchanged.
pub const COORD_EPSILON: f64 = 1e-6;

#[derive(Debug, Clone, Copy)]
pub(crate) struct MachineState {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub active_feed: Option<f64>,
    pub compensation_active: bool,
}

impl MachineState {
    pub fn new() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            z: SAFE_Z_MM,
            active_feed: None,
            compensation_active: false,
        }
    }

    pub fn at_xy(&self, x: f64, y: f64) -> bool {
        (self.x - x).abs() < COORD_EPSILON && (self.y - y).abs() < COORD_EPSILON
    }

    pub fn at_safe_height(&self) -> bool {
        (self.z - SAFE_Z_MM).abs() < COORD_EPSILON
    }

    /// Straight-line distance from the current position to the target;
    /// unspecified axes keep their current value.
    pub fn distance_to(&self, x: Option<f64>, y: Option<f64>, z: Option<f64>) -> f64 {
        let dx = x.map_or(0.0, |v| v - self.x);
        let dy = y.map_or(0.0, |v| v - self.y);
        let dz = z.map_or(0.0, |v| v - self.z);
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    pub fn apply(&mut self, x: Option<f64>, y: Option<f64>, z: Option<f64>) {
        if let Some(v) = x {
            self.x = v;
        }
        if let Some(v) = y {
            self.y = v;
        }
        if let Some(v) = z {
            self.z = v;
        }
    }
}
