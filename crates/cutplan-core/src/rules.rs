//! Static parameter-rule table and the clamping operation.
//!
//! Field keys match the host application's form identifiers so issues can
//! be attached to the right input; they are part of the observable
//! contract and must not be renamed.

use crate::config::{CutConfig, SheetConfig, ToolConfig};

/// Hard bounds and recommended range for one numeric parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamRule {
    pub field: &'static str,
    pub min: f64,
    pub max: f64,
    pub rec_min: f64,
    pub rec_max: f64,
    pub unit: &'static str,
}

impl ParamRule {
    pub fn in_bounds(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    pub fn in_recommended(&self, value: f64) -> bool {
        value >= self.rec_min && value <= self.rec_max
    }

    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }
}

/// Field keys used by `CONFIG_RULES` and the validator.
pub mod fields {
    pub const SHEET_WIDTH: &str = "larguraChapa";
    pub const SHEET_HEIGHT: &str = "alturaChapa";
    pub const SHEET_THICKNESS: &str = "espessuraChapa";
    pub const TOTAL_DEPTH: &str = "profundidadeTotal";
    pub const DEPTH_PER_PASS: &str = "profundidadePorPasse";
    pub const SPACING: &str = "espacamento";
    pub const EDGE_MARGIN: &str = "margemBorda";
    pub const FEEDRATE: &str = "avanco";
    pub const PLUNGE_RATE: &str = "mergulho";
    pub const RAPID_SPEED: &str = "rapido";
    pub const SPINDLE_SPEED: &str = "rotacao";
    pub const RAMP_ANGLE: &str = "anguloRampa";
    pub const TOOL_DIAMETER: &str = "diametroFresa";
    pub const TOOL_NUMBER: &str = "numeroFerramenta";
    pub const PIECES: &str = "pecas";
}

/// The read-only rule table. Shared by validation and clamping; requires
/// no locking.
pub const CONFIG_RULES: &[ParamRule] = &[
    ParamRule { field: fields::SHEET_WIDTH, min: 10.0, max: 10000.0, rec_min: 300.0, rec_max: 3700.0, unit: "mm" },
    ParamRule { field: fields::SHEET_HEIGHT, min: 10.0, max: 10000.0, rec_min: 300.0, rec_max: 2200.0, unit: "mm" },
    ParamRule { field: fields::SHEET_THICKNESS, min: 0.5, max: 200.0, rec_min: 3.0, rec_max: 50.0, unit: "mm" },
    ParamRule { field: fields::TOTAL_DEPTH, min: 0.1, max: 100.0, rec_min: 1.0, rec_max: 60.0, unit: "mm" },
    ParamRule { field: fields::DEPTH_PER_PASS, min: 0.1, max: 50.0, rec_min: 1.0, rec_max: 10.0, unit: "mm" },
    ParamRule { field: fields::SPACING, min: 0.0, max: 500.0, rec_min: 10.0, rec_max: 100.0, unit: "mm" },
    ParamRule { field: fields::EDGE_MARGIN, min: 0.0, max: 500.0, rec_min: 5.0, rec_max: 50.0, unit: "mm" },
    ParamRule { field: fields::FEEDRATE, min: 1.0, max: 20000.0, rec_min: 500.0, rec_max: 6000.0, unit: "mm/min" },
    ParamRule { field: fields::PLUNGE_RATE, min: 1.0, max: 5000.0, rec_min: 100.0, rec_max: 1000.0, unit: "mm/min" },
    ParamRule { field: fields::RAPID_SPEED, min: 100.0, max: 30000.0, rec_min: 3000.0, rec_max: 15000.0, unit: "mm/min" },
    ParamRule { field: fields::SPINDLE_SPEED, min: 1000.0, max: 30000.0, rec_min: 12000.0, rec_max: 24000.0, unit: "RPM" },
    ParamRule { field: fields::RAMP_ANGLE, min: 0.1, max: 89.9, rec_min: 2.0, rec_max: 15.0, unit: "deg" },
    ParamRule { field: fields::TOOL_DIAMETER, min: 0.1, max: 50.0, rec_min: 3.0, rec_max: 20.0, unit: "mm" },
    ParamRule { field: fields::TOOL_NUMBER, min: 1.0, max: 99.0, rec_min: 1.0, rec_max: 99.0, unit: "" },
];

/// Looks up the rule for a field key.
pub fn param_rule(field: &str) -> Option<&'static ParamRule> {
    CONFIG_RULES.iter().find(|r| r.field == field)
}

fn rule(field: &str) -> &'static ParamRule {
    // The table is a compile-time constant; every key in `fields` has a row.
    param_rule(field).unwrap_or(&CONFIG_RULES[0])
}

/// Returns a copy of `cut` with every numeric field clamped to its hard
/// bounds, with `depth_per_pass` additionally capped at `total_depth`.
///
/// Clamping is the fail-soft half of input handling for live previews; it
/// is deliberately independent of validation, which reports the original
/// out-of-range values as errors.
pub fn clamp_cut_config(cut: &CutConfig) -> CutConfig {
    let mut out = *cut;
    out.total_depth = rule(fields::TOTAL_DEPTH).clamp(cut.total_depth);
    out.depth_per_pass = rule(fields::DEPTH_PER_PASS)
        .clamp(cut.depth_per_pass)
        .min(out.total_depth);
    out.spacing = rule(fields::SPACING).clamp(cut.spacing);
    out.edge_margin = rule(fields::EDGE_MARGIN).clamp(cut.edge_margin);
    out.feedrate = rule(fields::FEEDRATE).clamp(cut.feedrate);
    out.plunge_rate = rule(fields::PLUNGE_RATE).clamp(cut.plunge_rate);
    out.rapid_speed = rule(fields::RAPID_SPEED).clamp(cut.rapid_speed);
    out.spindle_speed = rule(fields::SPINDLE_SPEED).clamp(cut.spindle_speed);
    out.ramp_angle_deg = rule(fields::RAMP_ANGLE).clamp(cut.ramp_angle_deg);
    out
}

/// Returns a copy of `tool` with the diameter and tool number clamped to
/// their hard bounds.
pub fn clamp_tool_config(tool: &ToolConfig) -> ToolConfig {
    ToolConfig {
        diameter_mm: rule(fields::TOOL_DIAMETER).clamp(tool.diameter_mm),
        tool_number: rule(fields::TOOL_NUMBER).clamp(tool.tool_number as f64) as u8,
    }
}

/// Returns a copy of `sheet` with dimensions clamped to their hard bounds.
pub fn clamp_sheet_config(sheet: &SheetConfig) -> SheetConfig {
    SheetConfig {
        width: rule(fields::SHEET_WIDTH).clamp(sheet.width),
        height: rule(fields::SHEET_HEIGHT).clamp(sheet.height),
        thickness: rule(fields::SHEET_THICKNESS).clamp(sheet.thickness),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_field_has_a_rule() {
        for key in [
            fields::SHEET_WIDTH,
            fields::SHEET_HEIGHT,
            fields::SHEET_THICKNESS,
            fields::TOTAL_DEPTH,
            fields::DEPTH_PER_PASS,
            fields::SPACING,
            fields::EDGE_MARGIN,
            fields::FEEDRATE,
            fields::PLUNGE_RATE,
            fields::RAPID_SPEED,
            fields::SPINDLE_SPEED,
            fields::RAMP_ANGLE,
            fields::TOOL_DIAMETER,
            fields::TOOL_NUMBER,
        ] {
            assert!(param_rule(key).is_some(), "missing rule for {key}");
        }
    }

    #[test]
    fn test_clamp_cut_config_is_independent_of_validation() {
        let cut = CutConfig {
            total_depth: -3.0,
            depth_per_pass: 200.0,
            feedrate: 50000.0,
            ..Default::default()
        };
        let clamped = clamp_cut_config(&cut);
        assert_eq!(clamped.total_depth, 0.1);
        // Capped at the clamped total depth, not just the table max.
        assert_eq!(clamped.depth_per_pass, 0.1);
        assert_eq!(clamped.feedrate, 20000.0);
        // The original is untouched.
        assert_eq!(cut.total_depth, -3.0);
    }

    #[test]
    fn test_clamp_tool_config() {
        let tool = ToolConfig {
            diameter_mm: 0.0,
            tool_number: 150,
        };
        let clamped = clamp_tool_config(&tool);
        assert_eq!(clamped.diameter_mm, 0.1);
        assert_eq!(clamped.tool_number, 99);
    }

    #[test]
    fn test_in_recommended() {
        let r = param_rule(fields::FEEDRATE).unwrap();
        assert!(r.in_recommended(3000.0));
        assert!(!r.in_recommended(100.0));
        assert!(r.in_bounds(100.0));
    }
}
