//! # CutPlan Nesting
//!
//! Packs rectangular pieces onto a stock sheet. Three heuristics are
//! available behind one entry point, selected by
//! [`NestingMethod`]: greedy first-fit-decreasing over anchor points,
//! shelf packing, and guillotine free-rectangle packing.
//!
//! The engine is a pure function of its inputs: identical calls yield
//! byte-identical placements, which callers rely on for caching and
//! reproducible previews. Pieces that do not fit are never dropped; they
//! come back in [`NestingResult::unpositioned`].

use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::debug;

use cutplan_core::{NestingMethod, Piece, PositionedPiece, SheetConfig};

mod greedy;
mod guillotine;
mod shelf;

/// Outcome of one packing run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NestingResult {
    pub positioned: Vec<PositionedPiece>,
    pub unpositioned: Vec<Piece>,
}

impl NestingResult {
    /// Total area of the positioned pieces.
    pub fn used_area(&self) -> f64 {
        self.positioned.iter().map(|p| p.piece.area()).sum()
    }
}

/// Sheet-usage statistics computed with the result.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PackingMetrics {
    pub used_area: f64,
    pub efficiency_pct: f64,
    pub packing_time_ms: u64,
}

/// Geometry shared by all heuristics: the usable region of the sheet and
/// the spacing to keep between pieces.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SheetArea {
    pub width: f64,
    pub height: f64,
    pub margin: f64,
    pub spacing: f64,
}

impl SheetArea {
    /// Width of the region inside the edge margin.
    pub fn usable_width(&self) -> f64 {
        self.width - 2.0 * self.margin
    }

    pub fn usable_height(&self) -> f64 {
        self.height - 2.0 * self.margin
    }

    /// True when `piece` at (x, y) stays inside the margin-reduced sheet
    /// and clears every already-placed piece by the configured spacing.
    pub fn accepts(
        &self,
        piece: &Piece,
        x: f64,
        y: f64,
        placed: &[PositionedPiece],
    ) -> bool {
        let candidate = PositionedPiece::new(piece.clone(), x, y);
        candidate.within(self.width, self.height, self.margin)
            && !placed.iter().any(|p| candidate.overlaps(p, self.spacing))
    }
}

/// Packs `pieces` onto the sheet with the selected heuristic.
///
/// Ignored pieces are excluded entirely; for the rest,
/// `positioned.len() + unpositioned.len()` always equals the number of
/// considered pieces.
pub fn pack(
    pieces: &[Piece],
    sheet: &SheetConfig,
    spacing: f64,
    edge_margin: f64,
    method: NestingMethod,
) -> NestingResult {
    let area = SheetArea {
        width: sheet.width,
        height: sheet.height,
        margin: edge_margin,
        spacing,
    };

    let ordered = sort_for_packing(pieces);
    let result = match method {
        NestingMethod::Greedy => greedy::pack(&ordered, &area),
        NestingMethod::Shelf => shelf::pack(&ordered, &area),
        NestingMethod::Guillotine => guillotine::pack(&ordered, &area),
    };

    debug_assert_eq!(
        result.positioned.len() + result.unpositioned.len(),
        ordered.len(),
        "packing must account for every piece"
    );
    result
}

/// Packs and reports usage metrics in one call.
pub fn pack_with_metrics(
    pieces: &[Piece],
    sheet: &SheetConfig,
    spacing: f64,
    edge_margin: f64,
    method: NestingMethod,
) -> (NestingResult, PackingMetrics) {
    let start = Instant::now();
    let result = pack(pieces, sheet, spacing, edge_margin, method);
    let elapsed = start.elapsed().as_millis() as u64;

    let used_area = result.used_area();
    let sheet_area = sheet.width * sheet.height;
    let metrics = PackingMetrics {
        used_area,
        efficiency_pct: if sheet_area > 0.0 {
            used_area / sheet_area * 100.0
        } else {
            0.0
        },
        packing_time_ms: elapsed,
    };

    debug!(
        method = method.name(),
        placed = result.positioned.len(),
        unplaced = result.unpositioned.len(),
        efficiency_pct = metrics.efficiency_pct,
        elapsed_ms = elapsed,
        "packing finished"
    );
    (result, metrics)
}

/// Shared pre-step: descending area, ties broken by descending width,
/// then original insertion order. The ordering is part of the observable
/// contract; it decides which pieces win when the sheet is nearly full.
fn sort_for_packing(pieces: &[Piece]) -> Vec<Piece> {
    let mut ordered: Vec<Piece> = pieces.iter().filter(|p| !p.ignored).cloned().collect();
    ordered.sort_by(|a, b| {
        b.area()
            .total_cmp(&a.area())
            .then(b.width.total_cmp(&a.width))
            .then(a.original_index.cmp(&b.original_index))
    });
    ordered
}
