//! Guillotine packing: free space is a set of disjoint axis-aligned
//! rectangles. Each placement picks the free rectangle with the least
//! leftover area (best-area-fit) and splits it with one straight cut
//! along the axis with the shorter leftover, so no L-shaped remainders
//! ever exist.

use cutplan_core::{Piece, PositionedPiece};

use crate::{NestingResult, SheetArea};

#[derive(Debug, Clone, Copy)]
struct FreeRect {
    x: f64,
    y: f64,
    width: f64,
    height: f64,
}

impl FreeRect {
    fn area(&self) -> f64 {
        self.width * self.height
    }

    fn fits(&self, piece: &Piece) -> bool {
        piece.width <= self.width && piece.height <= self.height
    }
}

pub(crate) fn pack(ordered: &[Piece], area: &SheetArea) -> NestingResult {
    let mut positioned: Vec<PositionedPiece> = Vec::with_capacity(ordered.len());
    let mut unpositioned: Vec<Piece> = Vec::new();
    let mut free: Vec<FreeRect> = vec![FreeRect {
        x: area.margin,
        y: area.margin,
        width: area.usable_width(),
        height: area.usable_height(),
    }];

    for piece in ordered {
        match best_area_fit(&free, piece) {
            Some(i) => {
                let rect = free.remove(i);
                positioned.push(PositionedPiece::new(piece.clone(), rect.x, rect.y));
                split(&mut free, rect, piece, area.spacing);
            }
            None => unpositioned.push(piece.clone()),
        }
    }

    NestingResult {
        positioned,
        unpositioned,
    }
}

/// Index of the fitting free rectangle with the smallest leftover area;
/// lowest index wins ties for determinism.
fn best_area_fit(free: &[FreeRect], piece: &Piece) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, rect) in free.iter().enumerate() {
        if !rect.fits(piece) {
            continue;
        }
        let leftover = rect.area() - piece.area();
        match best {
            Some((_, best_leftover)) if best_leftover <= leftover => {}
            _ => best = Some((i, leftover)),
        }
    }
    best.map(|(i, _)| i)
}

/// Splits `rect` around the placed piece (inflated by the spacing) into
/// two disjoint rectangles along the axis with the shorter leftover.
/// Degenerate slivers are dropped.
fn split(free: &mut Vec<FreeRect>, rect: FreeRect, piece: &Piece, spacing: f64) {
    let used_w = (piece.width + spacing).min(rect.width);
    let used_h = (piece.height + spacing).min(rect.height);
    let leftover_w = rect.width - used_w;
    let leftover_h = rect.height - used_h;

    let (right, top) = if leftover_w < leftover_h {
        // Horizontal cut: the top slab keeps the full width.
        (
            FreeRect {
                x: rect.x + used_w,
                y: rect.y,
                width: leftover_w,
                height: used_h,
            },
            FreeRect {
                x: rect.x,
                y: rect.y + used_h,
                width: rect.width,
                height: leftover_h,
            },
        )
    } else {
        // Vertical cut: the right slab keeps the full height.
        (
            FreeRect {
                x: rect.x + used_w,
                y: rect.y,
                width: leftover_w,
                height: rect.height,
            },
            FreeRect {
                x: rect.x,
                y: rect.y + used_h,
                width: used_w,
                height: leftover_h,
            },
        )
    };

    for r in [right, top] {
        if r.width > f64::EPSILON && r.height > f64::EPSILON {
            free.push(r);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cutplan_core::CutType;

    fn area(w: f64, h: f64, spacing: f64, margin: f64) -> SheetArea {
        SheetArea {
            width: w,
            height: h,
            margin,
            spacing,
        }
    }

    fn piece(idx: usize, w: f64, h: f64) -> Piece {
        Piece::new(w, h, CutType::External, idx)
    }

    #[test]
    fn test_first_placement_at_margin() {
        let result = pack(&[piece(0, 100.0, 50.0)], &area(1000.0, 600.0, 5.0, 20.0));
        assert_eq!(result.positioned.len(), 1);
        assert_eq!(result.positioned[0].x, 20.0);
        assert_eq!(result.positioned[0].y, 20.0);
    }

    #[test]
    fn test_split_produces_disjoint_free_space() {
        // Two equal pieces: the second must land in one of the two split
        // rectangles without overlapping the first.
        let result = pack(
            &[piece(0, 100.0, 100.0), piece(1, 100.0, 100.0)],
            &area(300.0, 300.0, 10.0, 0.0),
        );
        assert_eq!(result.positioned.len(), 2);
        let a = &result.positioned[0];
        let b = &result.positioned[1];
        assert!(!a.overlaps(b, 10.0));
    }

    #[test]
    fn test_best_area_fit_prefers_tight_rect() {
        // After a tall placement the free set holds a narrow right slab
        // and a top slab; a small piece must pick the tighter one.
        let result = pack(
            &[piece(0, 240.0, 100.0), piece(1, 50.0, 50.0)],
            &area(300.0, 300.0, 0.0, 0.0),
        );
        assert_eq!(result.positioned.len(), 2);
        let b = &result.positioned[1];
        // Right slab is 60x100 = 6000; top slab is 300x200 = 60000.
        assert_eq!((b.x, b.y), (240.0, 0.0));
    }

    #[test]
    fn test_exhausted_free_space() {
        let result = pack(
            &[piece(0, 90.0, 90.0), piece(1, 90.0, 90.0)],
            &area(100.0, 100.0, 0.0, 0.0),
        );
        assert_eq!(result.positioned.len(), 1);
        assert_eq!(result.unpositioned.len(), 1);
    }
}
