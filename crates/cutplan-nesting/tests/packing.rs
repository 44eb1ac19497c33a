//! Packing invariants checked across all three heuristics with random
//! piece sets: no overlap, containment, conservation, determinism.

use cutplan_core::{CutType, NestingMethod, Piece, SheetConfig};
use cutplan_nesting::pack;
use proptest::prelude::*;

const METHODS: [NestingMethod; 3] = [
    NestingMethod::Greedy,
    NestingMethod::Shelf,
    NestingMethod::Guillotine,
];

fn sheet() -> SheetConfig {
    SheetConfig {
        width: 2850.0,
        height: 1500.0,
        thickness: 15.0,
    }
}

fn arb_pieces() -> impl Strategy<Value = Vec<Piece>> {
    prop::collection::vec((10.0f64..900.0, 10.0f64..900.0), 1..15).prop_map(|dims| {
        dims.into_iter()
            .enumerate()
            .map(|(i, (w, h))| {
                Piece::new(
                    (w * 10.0).round() / 10.0,
                    (h * 10.0).round() / 10.0,
                    CutType::External,
                    i,
                )
            })
            .collect()
    })
}

proptest! {
    #[test]
    fn no_two_positioned_pieces_overlap(pieces in arb_pieces()) {
        let spacing = 12.0;
        for method in METHODS {
            let result = pack(&pieces, &sheet(), spacing, 10.0, method);
            for (i, a) in result.positioned.iter().enumerate() {
                for b in &result.positioned[i + 1..] {
                    prop_assert!(
                        !a.overlaps(b, spacing),
                        "{method}: {:?} overlaps {:?}",
                        (a.x, a.y, a.piece.width, a.piece.height),
                        (b.x, b.y, b.piece.width, b.piece.height)
                    );
                }
            }
        }
    }

    #[test]
    fn positioned_pieces_stay_inside_the_margin(pieces in arb_pieces()) {
        let margin = 10.0;
        for method in METHODS {
            let result = pack(&pieces, &sheet(), 12.0, margin, method);
            for p in &result.positioned {
                prop_assert!(
                    p.within(sheet().width, sheet().height, margin - 1e-9),
                    "{method}: piece at ({}, {}) leaves the usable area",
                    p.x,
                    p.y
                );
            }
        }
    }

    #[test]
    fn every_piece_is_accounted_for(pieces in arb_pieces()) {
        for method in METHODS {
            let result = pack(&pieces, &sheet(), 12.0, 10.0, method);
            prop_assert_eq!(
                result.positioned.len() + result.unpositioned.len(),
                pieces.len()
            );
        }
    }

    #[test]
    fn packing_is_deterministic(pieces in arb_pieces()) {
        for method in METHODS {
            let a = pack(&pieces, &sheet(), 12.0, 10.0, method);
            let b = pack(&pieces, &sheet(), 12.0, 10.0, method);
            prop_assert_eq!(a.positioned, b.positioned);
            prop_assert_eq!(a.unpositioned, b.unpositioned);
        }
    }
}

#[test]
fn ignored_pieces_are_excluded_but_nothing_is_lost() {
    let pieces = vec![
        Piece::new(100.0, 100.0, CutType::External, 0),
        Piece::new(100.0, 100.0, CutType::External, 1).with_ignored(true),
        Piece::new(100.0, 100.0, CutType::External, 2),
    ];
    for method in METHODS {
        let result = pack(&pieces, &sheet(), 12.0, 10.0, method);
        assert_eq!(result.positioned.len() + result.unpositioned.len(), 2);
        assert!(result
            .positioned
            .iter()
            .all(|p| p.piece.original_index != 1));
    }
}
