//! Shelf packing: pieces are placed into horizontal rows of accumulated
//! height. Each piece goes to the open shelf whose height is the closest
//! match at least as tall as the piece (best-fit by height delta); when
//! no shelf qualifies a new one is opened on top of the stack.

use cutplan_core::{Piece, PositionedPiece};

use crate::{NestingResult, SheetArea};

#[derive(Debug, Clone, Copy)]
struct Shelf {
    y_offset: f64,
    height: f64,
    used_width: f64,
}

pub(crate) fn pack(ordered: &[Piece], area: &SheetArea) -> NestingResult {
    let mut positioned: Vec<PositionedPiece> = Vec::with_capacity(ordered.len());
    let mut unpositioned: Vec<Piece> = Vec::new();
    let mut shelves: Vec<Shelf> = Vec::new();

    for piece in ordered {
        let fit = best_fit(&shelves, piece, area);

        if let Some(i) = fit {
            let shelf = &mut shelves[i];
            let x = area.margin + shelf.used_width;
            positioned.push(PositionedPiece::new(piece.clone(), x, shelf.y_offset));
            shelf.used_width += piece.width + area.spacing;
            continue;
        }

        // Open a new shelf on top of the stack if vertical space remains.
        let y_offset = shelves
            .last()
            .map(|s| s.y_offset + s.height + area.spacing)
            .unwrap_or(area.margin);
        let room = piece.height <= area.height - area.margin - y_offset
            && piece.width <= area.usable_width();
        if room {
            shelves.push(Shelf {
                y_offset,
                height: piece.height,
                used_width: piece.width + area.spacing,
            });
            positioned.push(PositionedPiece::new(piece.clone(), area.margin, y_offset));
        } else {
            unpositioned.push(piece.clone());
        }
    }

    NestingResult {
        positioned,
        unpositioned,
    }
}

/// Index of the shelf minimizing `shelf.height - piece.height` among
/// shelves tall and wide enough; first shelf wins ties for determinism.
fn best_fit(shelves: &[Shelf], piece: &Piece, area: &SheetArea) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, shelf) in shelves.iter().enumerate() {
        let remaining = area.usable_width() - shelf.used_width;
        if shelf.height < piece.height || remaining < piece.width {
            continue;
        }
        let delta = shelf.height - piece.height;
        match best {
            Some((_, best_delta)) if best_delta <= delta => {}
            _ => best = Some((i, delta)),
        }
    }
    best.map(|(i, _)| i)
}
