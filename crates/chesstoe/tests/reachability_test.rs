//! Movement rules checked across the whole board.

use chesstoe::{
    Board, CellId, MovementRule, PieceKind, ReachabilityCalculator, RockRule,
};
use strum::IntoEnumIterator;

fn cells(ids: &[u8]) -> Vec<CellId> {
    ids.iter().copied().map(CellId).collect()
}

#[test]
fn test_rock_destinations_from_every_cell() {
    for origin in CellId::all() {
        let expected: Vec<CellId> = CellId::all()
            .filter(|&c| c != origin && (c.row() == origin.row() || c.col() == origin.col()))
            .collect();
        assert_eq!(
            ReachabilityCalculator::destinations(origin, PieceKind::Rock),
            expected,
            "rock from {}",
            origin
        );
        assert_eq!(expected.len(), 4);
    }
}

#[test]
fn test_bishop_from_edge_and_corner() {
    assert_eq!(
        ReachabilityCalculator::destinations(CellId(1), PieceKind::Bishop),
        cells(&[3, 5])
    );
    assert_eq!(
        ReachabilityCalculator::destinations(CellId(6), PieceKind::Bishop),
        cells(&[2, 4])
    );
}

#[test]
fn test_horse_destinations() {
    assert_eq!(
        ReachabilityCalculator::destinations(CellId(0), PieceKind::Horse),
        cells(&[5, 7])
    );
    assert_eq!(
        ReachabilityCalculator::destinations(CellId(1), PieceKind::Horse),
        cells(&[6, 8])
    );
    assert!(ReachabilityCalculator::destinations(CellId(4), PieceKind::Horse).is_empty());
}

#[test]
fn test_no_rule_reaches_its_origin() {
    for kind in PieceKind::iter() {
        for origin in CellId::all() {
            assert!(
                !ReachabilityCalculator::reaches(origin, origin, kind),
                "{} reaches its own cell {}",
                kind,
                origin
            );
        }
    }
}

#[test]
fn test_reachability_is_symmetric_between_cells() {
    for kind in PieceKind::iter() {
        for a in CellId::all() {
            for b in CellId::all() {
                assert_eq!(
                    ReachabilityCalculator::reaches(a, b, kind),
                    ReachabilityCalculator::reaches(b, a, kind),
                    "{} between {} and {}",
                    kind,
                    a,
                    b
                );
            }
        }
    }
}

#[test]
fn test_reachability_survives_rotation_and_mirroring() {
    let images: [fn(CellId) -> Option<CellId>; 2] = [CellId::rotated, CellId::mirrored];
    for image in images {
        for kind in PieceKind::iter() {
            for origin in CellId::all() {
                for target in CellId::all() {
                    let (Some(o), Some(t)) = (image(origin), image(target)) else {
                        panic!("{} or {} has no image", origin, target);
                    };
                    assert_eq!(
                        ReachabilityCalculator::reaches(o, t, kind),
                        ReachabilityCalculator::reaches(origin, target, kind),
                        "{} {} -> {} against {} -> {}",
                        kind,
                        origin,
                        target,
                        o,
                        t
                    );
                }
            }
        }
    }
}

#[test]
fn test_mark_replaces_previous_flags() {
    let mut board = Board::new();
    ReachabilityCalculator::mark(&mut board, CellId(4), PieceKind::Bishop).unwrap();
    ReachabilityCalculator::mark(&mut board, CellId(0), PieceKind::Rock).unwrap();

    assert!(board.reachable_cells(PieceKind::Bishop).is_empty());
    assert_eq!(board.reachable_cells(PieceKind::Rock), cells(&[1, 2, 3, 6]));
}

#[test]
fn test_mark_ignores_occupancy() {
    let mut board = Board::new();
    board.set_occupant(CellId(1), Some(chesstoe::PieceId(3))).unwrap();
    let marked = ReachabilityCalculator::mark(&mut board, CellId(0), PieceKind::Rock).unwrap();
    assert!(marked.contains(&CellId(1)));
}

#[test]
fn test_reset_twice_matches_reset_once() {
    let mut board = Board::new();
    ReachabilityCalculator::mark(&mut board, CellId(2), PieceKind::Horse).unwrap();
    board.reset_reachability();
    let once = board.clone();
    board.reset_reachability();
    assert_eq!(board, once);
    assert!(!board.has_reachability());
}

#[test]
fn test_rule_trait_matches_calculator() {
    for origin in CellId::all() {
        assert_eq!(
            RockRule::destinations(origin),
            ReachabilityCalculator::destinations(origin, PieceKind::Rock)
        );
    }
}
