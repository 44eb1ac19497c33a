//! Greedy first-fit-decreasing placement over a frontier of anchor
//! points.
//!
//! The frontier starts at the sheet origin; every placement contributes
//! two new anchors, the bottom-right and top-left corners of the placed
//! piece (offset by the spacing). Candidates are scanned lowest-y then
//! lowest-x, and the first anchor that accepts the piece wins.

use cutplan_core::{Piece, PositionedPiece};

use crate::{NestingResult, SheetArea};

pub(crate) fn pack(ordered: &[Piece], area: &SheetArea) -> NestingResult {
    let mut positioned: Vec<PositionedPiece> = Vec::with_capacity(ordered.len());
    let mut unpositioned: Vec<Piece> = Vec::new();
    let mut anchors: Vec<(f64, f64)> = vec![(area.margin, area.margin)];

    for piece in ordered {
        // Fixed scan order keeps the output deterministic.
        anchors.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.0.total_cmp(&b.0)));
        anchors.dedup();

        let slot = anchors
            .iter()
            .position(|&(x, y)| area.accepts(piece, x, y, &positioned));

        match slot {
            Some(i) => {
                let (x, y) = anchors.remove(i);
                let placed = PositionedPiece::new(piece.clone(), x, y);
                anchors.push((placed.right() + area.spacing, placed.y));
                anchors.push((placed.x, placed.top() + area.spacing));
                positioned.push(placed);
            }
            None => unpositioned.push(piece.clone()),
        }
    }

    NestingResult {
        positioned,
        unpositioned,
    }
}
