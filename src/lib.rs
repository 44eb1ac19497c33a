//! # CutPlan
//!
//! Planning engine for a 2-axis-plus-depth CNC router cutting rectangular
//! pieces from a flat sheet. The engine is organized as a workspace:
//!
//! 1. **cutplan-core** - data model, parameter rules, text helpers
//! 2. **cutplan-nesting** - packing heuristics (greedy, shelf, guillotine)
//! 3. **cutplan-validate** - rule-based configuration validation
//! 4. **cutplan-toolpath** - program generation and time estimation
//! 5. **cutplan** - the two external operations and a small CLI
//!
//! Each call runs the strict pipeline nest -> validate -> generate over
//! its own inputs and holds no state afterwards, so concurrent preview
//! and generation requests never interfere.

use serde::{Deserialize, Serialize};
use tracing::info;

pub use cutplan_core::{
    clamp_cut_config, clamp_sheet_config, clamp_tool_config, CutConfig, CutType, EngineError,
    GeneratorVersion, NestingMethod, Piece, PositionedPiece, RampApplyMode, Severity, SheetConfig,
    ToolConfig, ValidationIssue, ValidationReport,
};
pub use cutplan_nesting::{pack_with_metrics, NestingResult, PackingMetrics};
pub use cutplan_toolpath::{TimeEstimate, PROGRAM_EXTENSIONS};

/// One piece line in a job request. `quantity` expands into that many
/// identical pieces before nesting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PieceRequest {
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub cut_type: CutType,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    #[serde(default)]
    pub ignored: bool,
}

fn default_quantity() -> u32 {
    1
}

/// A complete engine request: pieces plus optional config overrides.
/// Omitted configs fall back to their defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobRequest {
    pub pieces: Vec<PieceRequest>,
    #[serde(default)]
    pub sheet: Option<SheetConfig>,
    #[serde(default)]
    pub cut: Option<CutConfig>,
    #[serde(default)]
    pub tool: Option<ToolConfig>,
    #[serde(default)]
    pub method: Option<NestingMethod>,
}

/// Nested layout returned with every validation, for live preview.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Preview {
    pub positioned: Vec<PositionedPiece>,
    pub unpositioned: Vec<Piece>,
    pub metrics: PackingMetrics,
    /// Present only when nothing blocks generation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_estimate: Option<TimeEstimate>,
}

/// Result of the `validate` operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationOutcome {
    pub valid: bool,
    pub errors: Vec<ValidationIssue>,
    pub warnings: Vec<ValidationIssue>,
    pub preview: Preview,
}

/// The configuration snapshot a program was generated with.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigsUsed {
    pub sheet: SheetConfig,
    pub cut: CutConfig,
    pub tool: ToolConfig,
    pub method: NestingMethod,
    pub version: GeneratorVersion,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationMetadata {
    pub line_count: usize,
    pub byte_size: usize,
    pub time_estimate: TimeEstimate,
    pub metrics: PackingMetrics,
    pub configs_used: ConfigsUsed,
}

/// Result of the `generate` operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationOutcome {
    pub program: String,
    pub metadata: GenerationMetadata,
}

/// Expands piece requests into engine pieces, preserving the caller's
/// ordering via `original_index`.
fn expand_pieces(requests: &[PieceRequest]) -> Vec<Piece> {
    let mut pieces = Vec::new();
    let mut index = 0usize;
    for request in requests {
        for _ in 0..request.quantity.max(1) {
            let mut piece = Piece::new(request.width, request.height, request.cut_type, index)
                .with_ignored(request.ignored);
            if let Some(name) = &request.name {
                piece = piece.with_name(name.clone());
            }
            pieces.push(piece);
            index += 1;
        }
    }
    pieces
}

fn resolve(req: &JobRequest) -> (SheetConfig, CutConfig, ToolConfig, NestingMethod) {
    (
        req.sheet.unwrap_or_default(),
        req.cut.unwrap_or_default(),
        req.tool.unwrap_or_default(),
        req.method.unwrap_or_default(),
    )
}

/// Validates a job and returns the report together with a nested layout
/// preview.
///
/// The preview is fail-soft: the layout is computed from clamped copies
/// of out-of-range values so the caller always has something to render,
/// while the report still describes the original values. The time
/// estimate is attached only when generation would not be blocked.
pub fn validate_job(req: &JobRequest) -> ValidationOutcome {
    let (sheet, cut, tool, method) = resolve(req);
    let pieces = expand_pieces(&req.pieces);

    // Clamping is independent of validation; the preview uses the
    // clamped values, the report the originals.
    let safe_sheet = clamp_sheet_config(&sheet);
    let safe_cut = clamp_cut_config(&cut);
    let safe_tool = clamp_tool_config(&tool);

    let (nested, metrics) = pack_with_metrics(
        &pieces,
        &safe_sheet,
        safe_cut.spacing,
        safe_cut.edge_margin,
        method,
    );

    let report = cutplan_validate::validate(
        &sheet,
        &cut,
        &tool,
        &nested.positioned,
        &nested.unpositioned,
    );

    let time_estimate = if report.valid && !nested.positioned.is_empty() {
        cutplan_toolpath::generate(
            &nested.positioned,
            &safe_sheet,
            &safe_cut,
            Some(&safe_tool),
            GeneratorVersion::Optimized,
            false,
        )
        .ok()
        .map(|p| p.time_estimate)
    } else {
        None
    };

    info!(
        valid = report.valid,
        positioned = nested.positioned.len(),
        unpositioned = nested.unpositioned.len(),
        "validate finished"
    );

    ValidationOutcome {
        valid: report.valid,
        errors: report.errors,
        warnings: report.warnings,
        preview: Preview {
            positioned: nested.positioned,
            unpositioned: nested.unpositioned,
            metrics,
            time_estimate,
        },
    }
}

/// Runs the full pipeline and returns the cutting program with its
/// metadata. Blocking validation errors abort before any text is built.
pub fn generate_job(
    req: &JobRequest,
    version: GeneratorVersion,
    include_comments: bool,
) -> Result<GenerationOutcome, EngineError> {
    let (sheet, cut, tool, method) = resolve(req);
    let pieces = expand_pieces(&req.pieces);

    let (nested, metrics) =
        pack_with_metrics(&pieces, &sheet, cut.spacing, cut.edge_margin, method);

    let report = cutplan_validate::validate(
        &sheet,
        &cut,
        &tool,
        &nested.positioned,
        &nested.unpositioned,
    );
    if !report.valid {
        return Err(EngineError::GenerationBlocked {
            errors: report.errors,
        });
    }

    let generated = cutplan_toolpath::generate(
        &nested.positioned,
        &sheet,
        &cut,
        Some(&tool),
        version,
        include_comments,
    )?;

    info!(
        version = version.name(),
        lines = generated.metrics.line_count,
        total_time_s = generated.time_estimate.total_time,
        "generate finished"
    );

    Ok(GenerationOutcome {
        program: generated.program,
        metadata: GenerationMetadata {
            line_count: generated.metrics.line_count,
            byte_size: generated.metrics.byte_size,
            time_estimate: generated.time_estimate,
            metrics,
            configs_used: ConfigsUsed {
                sheet,
                cut,
                tool,
                method,
                version,
            },
        },
    })
}

/// Initializes logging for the CLI.
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
    Ok(())
}
