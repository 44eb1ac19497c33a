//! Program generation: walks the positioned layout piece by piece,
//! tracks the simulated machine state, and emits the program text while
//! accumulating the time estimate.

use serde::{Deserialize, Serialize};
use tracing::debug;

use cutplan_core::rules::fields;
use cutplan_core::{
    CutConfig, CutType, EngineError, GeneratorVersion, PositionedPiece, SheetConfig, ToolConfig,
    ValidationIssue,
};

use crate::emit::{CompSide, Emitter};
use crate::estimate::{MovementClass, TimeAccumulator, TimeEstimate};
use crate::ramp::{choose_ramp_edge, RampEdge};
use crate::state::SAFE_Z_MM;

/// The same program text is valid under any of these extensions; the
/// extension carries no semantic difference.
pub const PROGRAM_EXTENSIONS: [&str; 4] = ["nc", "tap", "cnc", "gcode"];

/// Size and shape counters for one generated program.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramMetrics {
    pub line_count: usize,
    pub byte_size: usize,
    pub piece_count: usize,
    pub total_passes: u32,
}

/// Result of a successful generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedProgram {
    pub program: String,
    pub time_estimate: TimeEstimate,
    pub metrics: ProgramMetrics,
}

/// Conditions that forbid building a program at all. These mirror the
/// validator's hard errors for the parameters the generator consumes
/// directly, so a caller that skips validation still gets a structured
/// failure instead of a broken program.
fn blocking_issues(cut: &CutConfig) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    if cut.total_depth <= 0.0 {
        issues.push(ValidationIssue::error(
            fields::TOTAL_DEPTH,
            format!("total depth must be positive, got {}", cut.total_depth),
            "set a positive total depth",
        ));
    }
    if cut.depth_per_pass <= 0.0 {
        issues.push(ValidationIssue::error(
            fields::DEPTH_PER_PASS,
            format!("depth per pass must be positive, got {}", cut.depth_per_pass),
            "set a positive depth per pass",
        ));
    } else if cut.depth_per_pass > cut.total_depth {
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
    for (field, value) in [
        (fields::FEEDRATE, cut.feedrate),
        (fields::PLUNGE_RATE, cut.plunge_rate),
        (fields::RAPID_SPEED, cut.rapid_speed),
        (fields::SPINDLE_SPEED, cut.spindle_speed),
    ] {
        if value <= 0.0 {
            issues.push(ValidationIssue::error(
                field,
                format!("value must be positive, got {value}"),
                "set a positive value",
            ));
        }
    }
    issues
}

/// Generates the cutting program for an already-nested layout.
///
/// Pieces are visited in positioned order. Compensation, when a tool is
/// supplied and the cut type is not online, brackets the pass loop once
/// in the optimized version and is re-declared per pass in the verbose
/// one.
pub fn generate(
    positioned: &[PositionedPiece],
    sheet: &SheetConfig,
    cut: &CutConfig,
    tool: Option<&ToolConfig>,
    version: GeneratorVersion,
    include_comments: bool,
) -> Result<GeneratedProgram, EngineError> {
    let errors = blocking_issues(cut);
    if !errors.is_empty() {
        return Err(EngineError::GenerationBlocked { errors });
    }

    let pieces: Vec<&PositionedPiece> =
        positioned.iter().filter(|p| !p.piece.ignored).collect();
    if pieces.is_empty() {
        return Err(EngineError::EmptyRequest);
    }

    let mut emitter = Emitter::new(version, include_comments);
    let mut acc = TimeAccumulator::new();
    let passes = cut.pass_count();

    emit_header(&mut emitter, sheet, cut, tool, pieces.len(), passes);

    for (index, piece) in pieces.iter().enumerate() {
        emit_piece(
            &mut emitter,
            &mut acc,
            piece,
            index,
            pieces.len(),
            positioned,
            cut,
            tool,
            version,
        );
    }

    emit_trailer(&mut emitter, &mut acc, cut);

    let program = emitter.finish();
    let metrics = ProgramMetrics {
        line_count: program.lines().count(),
        byte_size: program.len(),
        piece_count: pieces.len(),
        total_passes: passes * pieces.len() as u32,
    };
    let time_estimate = acc.finish();

    debug!(
        version = version.name(),
        lines = metrics.line_count,
        bytes = metrics.byte_size,
        total_time_s = time_estimate.total_time,
        "program generated"
    );

    Ok(GeneratedProgram {
        program,
        time_estimate,
        metrics,
    })
}

fn emit_header(
    emitter: &mut Emitter,
    sheet: &SheetConfig,
    cut: &CutConfig,
    tool: Option<&ToolConfig>,
    piece_count: usize,
    passes: u32,
) {
    emitter.comment(&format!(
        "sheet {}x{}x{} mm, {} piece(s), {} mm total depth in {} pass(es) of {} mm",
        sheet.width,
        sheet.height,
        sheet.thickness,
        piece_count,
        cut.total_depth,
        passes,
        cut.depth_per_pass
    ));
    emitter.raw("G21", Some("millimeter units"));
    emitter.raw("G90", Some("absolute coordinates"));
    emitter.raw(&format!("G0 Z{}", SAFE_Z_MM), Some("safe height"));
    if let Some(tool) = tool {
        emitter.raw(
            &format!("T{} M6", tool.tool_number),
            Some(&format!("tool change, {} mm cutter", tool.diameter_mm)),
        );
    }
    emitter.raw(
        &format!("M3 S{}", cut.spindle_speed as u32),
        Some("spindle on"),
    );
    emitter.raw("G0 X0 Y0", Some("origin"));
    emitter.blank();
}

#[allow(clippy::too_many_arguments)]
fn emit_piece(
    emitter: &mut Emitter,
    acc: &mut TimeAccumulator,
    piece: &PositionedPiece,
    index: usize,
    count: usize,
    all: &[PositionedPiece],
    cut: &CutConfig,
    tool: Option<&ToolConfig>,
    version: GeneratorVersion,
) {
    let (px, py) = (piece.x, piece.y);
    let (w, h) = (piece.piece.width, piece.piece.height);

    emitter.comment(&format!(
        "piece {}/{}: {} ({}x{} mm, {})",
        index + 1,
        count,
        piece.piece.name.as_deref().unwrap_or(&piece.piece.id),
        w,
        h,
        piece.piece.cut_type
    ));

    // Position over the piece origin at safe height.
    if !emitter.state.at_xy(px, py) {
        if !emitter.state.at_safe_height() {
            let d = emitter.rapid(None, None, Some(SAFE_Z_MM), Some("lift"));
            acc.add(MovementClass::Positioning, d, cut.rapid_speed);
        }
        let d = emitter.rapid(Some(px), Some(py), None, None);
        acc.add(MovementClass::Positioning, d, cut.rapid_speed);
    }

    let side = tool.and(match piece.piece.cut_type {
        CutType::External => Some(CompSide::Left),
        CutType::Internal => Some(CompSide::Right),
        CutType::Online => None,
    });

    let ramp_edge = if cut.use_ramp {
        choose_ramp_edge(piece, all, tool, cut.ramp_distance())
    } else {
        None
    };

    // The activate-once bracket is what separates the optimized output
    // from the verbose one, which re-declares the side on every pass.
    if version == GeneratorVersion::Optimized {
        if let (Some(side), Some(tool)) = (side, tool) {
            emitter.comp_on(side, tool.tool_number, Some("tool compensation"));
        }
    }

    let passes = cut.pass_count();
    for pass in 1..=passes {
        if version == GeneratorVersion::Verbose {
            if let (Some(side), Some(tool)) = (side, tool) {
                emitter.comp_on(side, tool.tool_number, Some("tool compensation"));
            }
        }

        let z_target = -cut.pass_depth(pass);

        // Drop through open air quickly; the entry move starts at the
        // stock top or at the previous pass floor.
        if emitter.state.z > 0.0 {
            let d = emitter.rapid(None, None, Some(0.0), None);
            acc.add(MovementClass::Positioning, d, cut.rapid_speed);
        }

        let ramp_this_pass = ramp_edge.is_some()
            && (pass == 1 || cut.ramp_apply_mode == cutplan_core::RampApplyMode::EveryPass);

        match (ramp_this_pass, ramp_edge) {
            (true, Some(edge)) => {
                let rd = cut.ramp_distance();
                let (ex, ey) = match edge {
                    RampEdge::Left => (px, py + rd),
                    RampEdge::Bottom => (px + rd, py),
                };
                let d = emitter.cut(
                    Some(ex),
                    Some(ey),
                    Some(z_target),
                    cut.ramp_feed(),
                    Some("ramp entry"),
                );
                acc.add(MovementClass::Ramp, d, cut.ramp_feed());
                let d = emitter.cut(Some(px), Some(py), None, cut.feedrate, None);
                acc.add(MovementClass::Cutting, d, cut.feedrate);
            }
            _ => {
                let d = emitter.cut(None, None, Some(z_target), cut.plunge_rate, Some("plunge"));
                acc.add(MovementClass::Plunge, d, cut.plunge_rate);
            }
        }

        // Closed perimeter loop back to the piece origin.
        for (cx, cy) in [(px + w, py), (px + w, py + h), (px, py + h), (px, py)] {
            let d = emitter.cut(Some(cx), Some(cy), None, cut.feedrate, None);
            acc.add(MovementClass::Cutting, d, cut.feedrate);
        }
    }

    if emitter.state.compensation_active {
        emitter.comp_off(Some("cancel compensation"));
    }
    let d = emitter.rapid(None, None, Some(SAFE_Z_MM), Some("lift"));
    acc.add(MovementClass::Positioning, d, cut.rapid_speed);
}

fn emit_trailer(emitter: &mut Emitter, acc: &mut TimeAccumulator, cut: &CutConfig) {
    emitter.blank();
    let d = emitter.rapid(None, None, Some(SAFE_Z_MM), Some("safe height"));
    acc.add(MovementClass::Positioning, d, cut.rapid_speed);
    emitter.raw("M5", Some("spindle off"));
    let d = emitter.rapid(Some(0.0), Some(0.0), None, Some("return to origin"));
    acc.add(MovementClass::Positioning, d, cut.rapid_speed);
    emitter.raw("M30", Some("end of program"));
}
