//! # CutPlan Core
//!
//! Core types and utilities shared by the CutPlan engine crates:
//! piece and configuration models, the static parameter-rule table,
//! the clamping operation, and program-text helpers.

pub mod config;
pub mod error;
pub mod issue;
pub mod piece;
pub mod rules;
pub mod text;

pub use config::{
    CutConfig, GeneratorVersion, NestingMethod, RampApplyMode, SheetConfig, ToolConfig,
};
pub use error::{EngineError, Result};
pub use issue::{Severity, ValidationIssue, ValidationReport};
pub use piece::{CutType, Piece, PositionedPiece};
pub use rules::{
    clamp_cut_config, clamp_sheet_config, clamp_tool_config, param_rule, ParamRule, CONFIG_RULES,
};
pub use text::{format_coord, sanitize_annotation};
