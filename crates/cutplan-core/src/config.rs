//! Machine and cut configuration models.

use serde::{Deserialize, Serialize};

/// Stock sheet geometry in millimeters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetConfig {
    pub width: f64,
    pub height: f64,
    pub thickness: f64,
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            width: 2850.0,
            height: 1500.0,
            thickness: 15.0,
        }
    }
}

/// When the ramp entry is applied across the pass sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RampApplyMode {
    /// Ramp only on the first pass; later passes plunge vertically.
    FirstPass,
    /// Ramp on every pass.
    EveryPass,
}

impl Default for RampApplyMode {
    fn default() -> Self {
        Self::FirstPass
    }
}

/// Cutting parameters. Feeds and speeds are in mm/min, depths in mm,
/// spindle speed in RPM.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CutConfig {
    pub total_depth: f64,
    pub depth_per_pass: f64,
    pub spacing: f64,
    pub edge_margin: f64,
    pub feedrate: f64,
    pub plunge_rate: f64,
    pub rapid_speed: f64,
    pub spindle_speed: f64,
    pub use_ramp: bool,
    pub ramp_angle_deg: f64,
    pub ramp_apply_mode: RampApplyMode,
}

impl Default for CutConfig {
    fn default() -> Self {
        Self {
            total_depth: 15.0,
            depth_per_pass: 5.0,
            spacing: 15.0,
            edge_margin: 10.0,
            feedrate: 3000.0,
            plunge_rate: 500.0,
            rapid_speed: 8000.0,
            spindle_speed: 18000.0,
            use_ramp: true,
            ramp_angle_deg: 10.0,
            ramp_apply_mode: RampApplyMode::FirstPass,
        }
    }
}

impl CutConfig {
    /// Number of depth passes needed to reach `total_depth`.
    pub fn pass_count(&self) -> u32 {
        if self.depth_per_pass <= 0.0 {
            return 1;
        }
        ((self.total_depth / self.depth_per_pass).ceil()).max(1.0) as u32
    }

    /// Target depth (positive, measured down from the stock top) for a
    /// 1-based pass index.
    pub fn pass_depth(&self, pass: u32) -> f64 {
        (self.depth_per_pass * pass as f64).min(self.total_depth)
    }

    /// Horizontal run needed for the ramp to descend one pass depth at
    /// the configured angle.
    pub fn ramp_distance(&self) -> f64 {
        self.depth_per_pass / self.ramp_angle_deg.to_radians().tan()
    }

    /// Feed used while ramping: shallow angles keep more of the nominal
    /// feedrate than steep ones.
    pub fn ramp_feed(&self) -> f64 {
        if self.ramp_angle_deg <= 5.0 {
            self.feedrate * 0.7
        } else {
            self.feedrate * 0.5
        }
    }
}

/// Cutting tool description.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolConfig {
    pub diameter_mm: f64,
    pub tool_number: u8,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            diameter_mm: 6.0,
            tool_number: 1,
        }
    }
}

/// Packing heuristic used by the nesting engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NestingMethod {
    Greedy,
    Shelf,
    Guillotine,
}

impl Default for NestingMethod {
    fn default() -> Self {
        Self::Greedy
    }
}

impl NestingMethod {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Greedy => "greedy",
            Self::Shelf => "shelf",
            Self::Guillotine => "guillotine",
        }
    }
}

impl std::fmt::Display for NestingMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Program emission strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeneratorVersion {
    /// Re-emits every word on every command for maximum compatibility.
    Verbose,
    /// Modal emission: a word is only repeated when its value changes.
    Optimized,
}

impl Default for GeneratorVersion {
    fn default() -> Self {
        Self::Optimized
    }
}

impl GeneratorVersion {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Verbose => "verbose",
            Self::Optimized => "optimized",
        }
    }
}
