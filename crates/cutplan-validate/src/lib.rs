//! # CutPlan Validate
//!
//! Rule-based validation of a cutting configuration against the machine
//! safety table and the nested layout. Validation is pure and exhaustive:
//! every applicable rule is evaluated, nothing short-circuits, and the
//! result is always a structured report, never a panic or an `Err`.

use tracing::debug;

use cutplan_core::rules::fields;
use cutplan_core::{
    param_rule, CutConfig, CutType, Piece, PositionedPiece, RampApplyMode, SheetConfig,
    ToolConfig, ValidationIssue, ValidationReport,
};

/// Warning threshold for cutting deeper than the stock: one spoilboard
/// bite beyond the sheet is normal for through-cuts, more is suspicious.
const THROUGH_CUT_ALLOWANCE_MM: f64 = 2.0;

/// Validates the configuration and layout. `positioned`/`unpositioned`
/// come straight from the nesting engine.
pub fn validate(
    sheet: &SheetConfig,
    cut: &CutConfig,
    tool: &ToolConfig,
    positioned: &[PositionedPiece],
    unpositioned: &[Piece],
) -> ValidationReport {
    let mut issues: Vec<ValidationIssue> = Vec::new();

    check_hard_bounds(sheet, cut, tool, &mut issues);
    check_cross_field(cut, tool, positioned, &mut issues);
    check_ramp_feasibility(cut, positioned, &mut issues);
    check_recommendations(sheet, cut, &mut issues);
    check_compensation_overflow(sheet, tool, positioned, &mut issues);
    check_unpositioned(unpositioned, &mut issues);

    let report = ValidationReport::new(issues);
    debug!(
        valid = report.valid,
        errors = report.errors.len(),
        warnings = report.warnings.len(),
        "validation finished"
    );
    report
}

fn bound_issue(field: &'static str, value: f64, issues: &mut Vec<ValidationIssue>) {
    if let Some(rule) = param_rule(field) {
        if !rule.in_bounds(value) {
            let target = rule.clamp(value);
            issues.push(
                ValidationIssue::error(
                    field,
                    format!(
                        "value {value} is outside the allowed range [{}, {}] {}",
                        rule.min, rule.max, rule.unit
                    ),
                    format!("use a value between {} and {} {}", rule.min, rule.max, rule.unit),
                )
                .with_current(value)
                .with_recommended(target),
            );
        }
    }
}

fn check_hard_bounds(
    sheet: &SheetConfig,
    cut: &CutConfig,
    tool: &ToolConfig,
    issues: &mut Vec<ValidationIssue>,
) {
    bound_issue(fields::SHEET_WIDTH, sheet.width, issues);
    bound_issue(fields::SHEET_HEIGHT, sheet.height, issues);
    bound_issue(fields::SHEET_THICKNESS, sheet.thickness, issues);
    bound_issue(fields::TOTAL_DEPTH, cut.total_depth, issues);
    bound_issue(fields::DEPTH_PER_PASS, cut.depth_per_pass, issues);
    bound_issue(fields::SPACING, cut.spacing, issues);
    bound_issue(fields::EDGE_MARGIN, cut.edge_margin, issues);
    bound_issue(fields::FEEDRATE, cut.feedrate, issues);
    bound_issue(fields::PLUNGE_RATE, cut.plunge_rate, issues);
    bound_issue(fields::RAPID_SPEED, cut.rapid_speed, issues);
    bound_issue(fields::SPINDLE_SPEED, cut.spindle_speed, issues);
    bound_issue(fields::TOOL_DIAMETER, tool.diameter_mm, issues);
    bound_issue(fields::TOOL_NUMBER, tool.tool_number as f64, issues);
    if cut.use_ramp {
        bound_issue(fields::RAMP_ANGLE, cut.ramp_angle_deg, issues);
    }
}

fn check_cross_field(
    cut: &CutConfig,
    tool: &ToolConfig,
    positioned: &[PositionedPiece],
    issues: &mut Vec<ValidationIssue>,
) {
    if cut.depth_per_pass > cut.total_depth {
        issues.push(
            ValidationIssue::error(
                fields::DEPTH_PER_PASS,
                format!(
                    "depth per pass ({}) exceeds the total depth ({})",
                    cut.depth_per_pass, cut.total_depth
                ),
                "reduce the depth per pass to at most the total depth",
            )
            .with_current(cut.depth_per_pass)
            .with_recommended(cut.total_depth),
        );
    }

    // External compensation widens each path by half the tool diameter on
    // both sides; adjacent compensated paths collide when the pieces sit
    // closer than one full diameter.
    let any_external = positioned
        .iter()
        .any(|p| p.piece.cut_type == CutType::External);
    if any_external && cut.spacing < tool.diameter_mm {
        issues.push(
            ValidationIssue::error(
                fields::SPACING,
                format!(
                    "spacing {} is smaller than the tool diameter {}; compensated external \
                     paths of neighbouring pieces will collide",
                    cut.spacing, tool.diameter_mm
                ),
                format!("use a spacing of at least {} (twice the tool diameter)", tool.diameter_mm * 2.0),
            )
            .with_current(cut.spacing)
            .with_recommended(tool.diameter_mm * 2.0),
        );
    }
}

/// True when the piece has an edge long enough to host the ramp run.
pub fn piece_hosts_ramp(piece: &Piece, ramp_distance: f64) -> bool {
    piece.width >= ramp_distance || piece.height >= ramp_distance
}

fn check_ramp_feasibility(
    cut: &CutConfig,
    positioned: &[PositionedPiece],
    issues: &mut Vec<ValidationIssue>,
) {
    if !cut.use_ramp || positioned.is_empty() {
        return;
    }
    let Some(rule) = param_rule(fields::RAMP_ANGLE) else {
        return;
    };
    if !rule.in_bounds(cut.ramp_angle_deg) {
        // Already reported as a hard-bounds error; the distance would be
        // meaningless here.
        return;
    }

    let ramp_distance = cut.ramp_distance();
    let failing = positioned
        .iter()
        .filter(|p| !piece_hosts_ramp(&p.piece, ramp_distance))
        .count();
    if failing == 0 {
        return;
    }

    let message = format!(
        "{failing} of {} piece(s) are smaller than the {:.1} mm ramp run required by a {}° \
         ramp at {} mm per pass",
        positioned.len(),
        ramp_distance,
        cut.ramp_angle_deg,
        cut.depth_per_pass
    );
    let suggestion =
        "increase the ramp angle, reduce the depth per pass, or disable the ramp entry";

    if failing == positioned.len() {
        issues.push(
            ValidationIssue::error(fields::RAMP_ANGLE, message, suggestion)
                .with_current(cut.ramp_angle_deg),
        );
    } else {
        match cut.ramp_apply_mode {
            // Affected pieces fall back to a vertical plunge on pass one.
            RampApplyMode::FirstPass => issues.push(
                ValidationIssue::warning(fields::RAMP_ANGLE, message, suggestion)
                    .with_current(cut.ramp_angle_deg),
            ),
            // "Ramp on every pass" cannot be honoured for those pieces.
            RampApplyMode::EveryPass => issues.push(
                ValidationIssue::error(fields::RAMP_ANGLE, message, suggestion)
                    .with_current(cut.ramp_angle_deg),
            ),
        }
    }
}

fn recommended_issue(field: &'static str, value: f64, issues: &mut Vec<ValidationIssue>) {
    if let Some(rule) = param_rule(field) {
        if rule.in_bounds(value) && !rule.in_recommended(value) {
            let target = value.clamp(rule.rec_min, rule.rec_max);
            issues.push(
                ValidationIssue::warning(
                    field,
                    format!(
                        "value {value} is outside the recommended range [{}, {}] {}",
                        rule.rec_min, rule.rec_max, rule.unit
                    ),
                    format!(
                        "values between {} and {} {} work well for most materials",
                        rule.rec_min, rule.rec_max, rule.unit
                    ),
                )
                .with_current(value)
                .with_recommended(target),
            );
        }
    }
}

fn check_recommendations(
    sheet: &SheetConfig,
    cut: &CutConfig,
    issues: &mut Vec<ValidationIssue>,
) {
    if cut.plunge_rate > cut.feedrate {
        issues.push(
            ValidationIssue::warning(
                fields::PLUNGE_RATE,
                format!(
                    "plunge rate ({}) is higher than the cutting feedrate ({})",
                    cut.plunge_rate, cut.feedrate
                ),
                "plunging slower than cutting protects the tool tip",
            )
            .with_current(cut.plunge_rate)
            .with_recommended(cut.feedrate),
        );
    }

    if cut.total_depth > sheet.thickness + THROUGH_CUT_ALLOWANCE_MM {
        issues.push(
            ValidationIssue::warning(
                fields::TOTAL_DEPTH,
                format!(
                    "total depth ({}) cuts {} mm past the {} mm sheet",
                    cut.total_depth,
                    cut.total_depth - sheet.thickness,
                    sheet.thickness
                ),
                "check the sheet thickness; deep overcuts damage the spoilboard",
            )
            .with_current(cut.total_depth)
            .with_recommended(sheet.thickness + THROUGH_CUT_ALLOWANCE_MM),
        );
    }

    recommended_issue(fields::FEEDRATE, cut.feedrate, issues);
    recommended_issue(fields::SPINDLE_SPEED, cut.spindle_speed, issues);
    if cut.use_ramp {
        recommended_issue(fields::RAMP_ANGLE, cut.ramp_angle_deg, issues);
    }
}

fn check_compensation_overflow(
    sheet: &SheetConfig,
    tool: &ToolConfig,
    positioned: &[PositionedPiece],
    issues: &mut Vec<ValidationIssue>,
) {
    let radius = tool.diameter_mm / 2.0;
    for p in positioned {
        if p.piece.cut_type != CutType::External {
            continue;
        }
        let outside = p.x - radius < 0.0
            || p.y - radius < 0.0
            || p.right() + radius > sheet.width
            || p.top() + radius > sheet.height;
        if outside {
            issues.push(
                ValidationIssue::warning(
                    fields::PIECES,
                    format!(
                        "compensated path of piece '{}' extends past the sheet edge",
                        p.piece.name.as_deref().unwrap_or(&p.piece.id)
                    ),
                    "increase the edge margin or move the piece away from the sheet edge",
                )
                .with_current(radius),
            );
        }
    }
}

fn check_unpositioned(unpositioned: &[Piece], issues: &mut Vec<ValidationIssue>) {
    if unpositioned.is_empty() {
        return;
    }
    let names: Vec<&str> = unpositioned
        .iter()
        .map(|p| p.name.as_deref().unwrap_or(p.id.as_str()))
        .collect();
    issues.push(
        ValidationIssue::error(
            fields::PIECES,
            format!(
                "{} piece(s) could not be placed on the sheet: {}",
                unpositioned.len(),
                names.join(", ")
            ),
            "remove the pieces, enlarge the sheet, or try another nesting method",
        )
        .with_current(unpositioned.len() as f64),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn external(w: f64, h: f64, x: f64, y: f64) -> PositionedPiece {
        PositionedPiece::new(Piece::new(w, h, CutType::External, 0), x, y)
    }

    fn defaults() -> (SheetConfig, CutConfig, ToolConfig) {
        (SheetConfig::default(), CutConfig::default(), ToolConfig::default())
    }

    #[test]
    fn test_default_configuration_is_valid() {
        let (sheet, cut, tool) = defaults();
        let layout = [external(100.0, 200.0, 100.0, 100.0)];
        let report = validate(&sheet, &cut, &tool, &layout, &[]);
        assert!(report.valid, "unexpected errors: {:?}", report.errors);
    }

    #[test]
    fn test_negative_depth_is_a_hard_error() {
        let (sheet, mut cut, tool) = defaults();
        cut.total_depth = -1.0;
        let report = validate(&sheet, &cut, &tool, &[], &[]);
        assert!(report.has_error_on("profundidadeTotal"));
    }

    #[test]
    fn test_depth_per_pass_above_total_is_an_error() {
        let (sheet, mut cut, tool) = defaults();
        cut.total_depth = 6.0;
        cut.depth_per_pass = 9.0;
        let report = validate(&sheet, &cut, &tool, &[], &[]);
        assert!(report.has_error_on("profundidadePorPasse"));
    }

    #[test]
    fn test_spacing_below_tool_diameter_scenario() {
        // Scenario D: spacing 5, diameter 12, one external piece.
        let (sheet, mut cut, mut tool) = defaults();
        cut.spacing = 5.0;
        tool.diameter_mm = 12.0;
        let layout = [external(100.0, 200.0, 50.0, 50.0)];
        let report = validate(&sheet, &cut, &tool, &layout, &[]);
        let issue = report
            .errors
            .iter()
            .find(|i| i.field == "espacamento")
            .expect("missing spacing error");
        assert_eq!(issue.recommended_value, Some(24.0));
    }

    #[test]
    fn test_spacing_rule_needs_an_external_piece() {
        let (sheet, mut cut, mut tool) = defaults();
        cut.spacing = 5.0;
        tool.diameter_mm = 12.0;
        let piece = Piece::new(100.0, 200.0, CutType::Online, 0);
        let layout = [PositionedPiece::new(piece, 50.0, 50.0)];
        let report = validate(&sheet, &cut, &tool, &layout, &[]);
        assert!(!report.has_error_on("espacamento"));
    }

    #[test]
    fn test_ramp_infeasible_for_some_pieces() {
        // Scenario C: 3 degrees at 3.75 mm/pass needs about 71.6 mm.
        let (sheet, mut cut, tool) = defaults();
        cut.depth_per_pass = 3.75;
        cut.ramp_angle_deg = 3.0;
        cut.ramp_apply_mode = RampApplyMode::FirstPass;
        let layout = [
            external(50.0, 60.0, 10.0, 10.0),
            external(500.0, 300.0, 200.0, 200.0),
        ];
        let report = validate(&sheet, &cut, &tool, &layout, &[]);
        assert!(report.valid);
        assert!(report.has_warning_on("anguloRampa"));

        cut.ramp_apply_mode = RampApplyMode::EveryPass;
        let report = validate(&sheet, &cut, &tool, &layout, &[]);
        assert!(report.has_error_on("anguloRampa"));
    }

    #[test]
    fn test_ramp_infeasible_for_all_pieces_is_always_an_error() {
        let (sheet, mut cut, tool) = defaults();
        cut.depth_per_pass = 3.75;
        cut.ramp_angle_deg = 3.0;
        let layout = [external(50.0, 60.0, 10.0, 10.0)];
        let report = validate(&sheet, &cut, &tool, &layout, &[]);
        assert!(report.has_error_on("anguloRampa"));
    }

    #[test]
    fn test_plunge_faster_than_feed_is_a_warning() {
        let (sheet, mut cut, tool) = defaults();
        cut.plunge_rate = 4000.0;
        cut.feedrate = 3000.0;
        let report = validate(&sheet, &cut, &tool, &[], &[]);
        assert!(report.valid);
        assert!(report.has_warning_on("mergulho"));
    }

    #[test]
    fn test_overcut_warning() {
        let (sheet, mut cut, tool) = defaults();
        cut.total_depth = sheet.thickness + 5.0;
        let report = validate(&sheet, &cut, &tool, &[], &[]);
        assert!(report.has_warning_on("profundidadeTotal"));
    }

    #[test]
    fn test_compensated_path_overflow_warning() {
        let (sheet, cut, mut tool) = defaults();
        tool.diameter_mm = 10.0;
        let layout = [external(100.0, 100.0, 2.0, 50.0)];
        let report = validate(&sheet, &cut, &tool, &layout, &[]);
        assert!(report.has_warning_on("pecas"));
    }

    #[test]
    fn test_unpositioned_pieces_invalidate_the_layout() {
        // Scenario B: a piece wider than the sheet.
        let (sheet, cut, tool) = defaults();
        let leftover = [Piece::new(5000.0, 100.0, CutType::External, 0)];
        let report = validate(&sheet, &cut, &tool, &[], &leftover);
        assert!(!report.valid);
        assert!(report.has_error_on("pecas"));
    }

    #[test]
    fn test_all_rules_are_aggregated() {
        let (sheet, mut cut, mut tool) = defaults();
        cut.total_depth = -1.0;
        cut.spacing = 2.0;
        cut.plunge_rate = 4500.0;
        tool.diameter_mm = 12.0;
        let layout = [external(100.0, 200.0, 50.0, 50.0)];
        let leftover = [Piece::new(5000.0, 100.0, CutType::External, 1)];
        let report = validate(&sheet, &cut, &tool, &layout, &leftover);
        // No short-circuiting: bounds, cross-field and layout issues all
        // arrive in one report.
        assert!(report.has_error_on("profundidadeTotal"));
        assert!(report.has_error_on("espacamento"));
        assert!(report.has_error_on("pecas"));
        assert!(report.has_warning_on("mergulho"));
    }
}
