//! Ramp entry geometry.
//!
//! A ramp descends one pass depth while running along one edge of the
//! piece. The left edge is preferred when the piece is tall enough and
//! there is lateral clearance for the compensated cutter between the
//! piece and the sheet edge or its neighbours; the bottom edge is the
//! fallback when the piece is wide enough. With neither available the
//! entry degrades to a vertical plunge.

use cutplan_core::{PositionedPiece, ToolConfig};

/// Edge of the piece the ramp runs along.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RampEdge {
    /// Along the left edge, from the origin toward +Y.
    Left,
    /// Along the bottom edge, from the origin toward +X.
    Bottom,
}

/// Free space to the left of `piece`, limited by the sheet edge and by
/// neighbours whose Y extent overlaps the piece's.
fn clearance_left(piece: &PositionedPiece, others: &[PositionedPiece]) -> f64 {
    let mut clearance = piece.x;
    for other in others {
        // The piece itself never qualifies: its right edge is beyond x.
        let y_overlap = other.y < piece.top() && other.top() > piece.y;
        if y_overlap && other.right() <= piece.x {
            clearance = clearance.min(piece.x - other.right());
        }
    }
    clearance
}

/// Picks the ramp edge for `piece`, or `None` when no edge can host the
/// ramp run.
pub(crate) fn choose_ramp_edge(
    piece: &PositionedPiece,
    all: &[PositionedPiece],
    tool: Option<&ToolConfig>,
    ramp_distance: f64,
) -> Option<RampEdge> {
    let lateral_needed = tool.map_or(0.0, |t| t.diameter_mm);
    if piece.piece.height >= ramp_distance && clearance_left(piece, all) >= lateral_needed {
        return Some(RampEdge::Left);
    }
    if piece.piece.width >= ramp_distance {
        return Some(RampEdge::Bottom);
    }
    None
}
