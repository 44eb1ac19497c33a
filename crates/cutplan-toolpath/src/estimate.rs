//! Distance and time accounting, co-computed while the program is
//! emitted rather than re-derived from the text afterwards.

use serde::{Deserialize, Serialize};

/// Movement classes tracked by the estimator. Each converts distance to
/// time with its own speed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovementClass {
    /// Rapid positioning between pieces and Z lifts.
    Positioning,
    /// Straight cutting along the contour.
    Cutting,
    /// Vertical plunge entry.
    Plunge,
    /// Diagonal ramp entry; reported in the plunge bucket.
    Ramp,
}

/// Distance and time breakdown for one generated program.
///
/// Times are in seconds, distances in millimeters. Derived once at the
/// end of generation and never mutated afterwards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeEstimate {
    pub cut_time: f64,
    pub plunge_time: f64,
    pub positioning_time: f64,
    pub total_time: f64,
    pub cut_distance: f64,
    pub plunge_distance: f64,
    pub positioning_distance: f64,
    pub total_distance: f64,
}

/// Running totals while the generator walks the layout.
#[derive(Debug, Default)]
pub struct TimeAccumulator {
    cut_distance: f64,
    cut_time: f64,
    plunge_distance: f64,
    plunge_time: f64,
    positioning_distance: f64,
    positioning_time: f64,
}

impl TimeAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a move of `distance` mm at `speed` mm/min.
    pub fn add(&mut self, class: MovementClass, distance: f64, speed: f64) {
        if distance <= 0.0 || speed <= 0.0 {
            return;
        }
        let time = distance / speed * 60.0;
        match class {
            MovementClass::Positioning => {
                self.positioning_distance += distance;
                self.positioning_time += time;
            }
            MovementClass::Cutting => {
                self.cut_distance += distance;
                self.cut_time += time;
            }
            MovementClass::Plunge | MovementClass::Ramp => {
                self.plunge_distance += distance;
                self.plunge_time += time;
            }
        }
    }

    pub fn finish(self) -> TimeEstimate {
        TimeEstimate {
            cut_time: self.cut_time,
            plunge_time: self.plunge_time,
            positioning_time: self.positioning_time,
            total_time: self.cut_time + self.plunge_time + self.positioning_time,
            cut_distance: self.cut_distance,
            plunge_distance: self.plunge_distance,
            positioning_distance: self.positioning_distance,
            total_distance: self.cut_distance + self.plunge_distance + self.positioning_distance,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accumulation_by_class() {
        let mut acc = TimeAccumulator::new();
        acc.add(MovementClass::Cutting, 600.0, 3000.0);
        acc.add(MovementClass::Plunge, 15.0, 500.0);
        acc.add(MovementClass::Ramp, 30.0, 1500.0);
        acc.add(MovementClass::Positioning, 1000.0, 8000.0);
        let est = acc.finish();

        assert!((est.cut_time - 12.0).abs() < 1e-9);
        // Ramp folds into the plunge bucket.
        assert!((est.plunge_distance - 45.0).abs() < 1e-9);
        assert!((est.plunge_time - (1.8 + 1.2)).abs() < 1e-9);
        assert!((est.positioning_time - 7.5).abs() < 1e-9);
        assert!((est.total_distance - 1645.0).abs() < 1e-9);
        assert!(
            (est.total_time - (est.cut_time + est.plunge_time + est.positioning_time)).abs()
                < 1e-12
        );
    }

    #[test]
    fn test_zero_distance_is_ignored() {
        let mut acc = TimeAccumulator::new();
        acc.add(MovementClass::Cutting, 0.0, 3000.0);
        acc.add(MovementClass::Cutting, -5.0, 3000.0);
        let est = acc.finish();
        assert_eq!(est.total_distance, 0.0);
        assert_eq!(est.total_time, 0.0);
    }
}
