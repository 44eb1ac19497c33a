//! # CutPlan Toolpath
//!
//! Turns a nested layout into a machine-executable cutting program.
//! Emission is driven by a simulated machine state so the optimized
//! generator can suppress modal words, and the time estimate is
//! accumulated while the text is built rather than recovered from it.

mod emit;
mod estimate;
mod generator;
mod ramp;
mod state;

pub use estimate::{MovementClass, TimeAccumulator, TimeEstimate};
pub use generator::{generate, GeneratedProgram, ProgramMetrics, PROGRAM_EXTENSIONS};
pub use state::SAFE_Z_MM;
