use std::collections::HashSet;

use proptest::prelude::*;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use serial_battleship::{
    Checkerboard, PerimeterFirst, RandomTargeting, ShotOutcome, StrategyKind, Targeting,
    TrackingBoard, BOARD_SIZE,
};

/// Fire `strategy` until it gives up, marking every shot as a miss.
fn exhaust<T: Targeting + ?Sized>(strategy: &mut T) -> Vec<(usize, usize)> {
    let mut board = TrackingBoard::new();
    let mut shots = Vec::new();
    while let Some(coord) = strategy.select_target(&board) {
        assert!(board.is_untried(coord.0, coord.1), "{:?} fired twice", coord);
        board.mark(coord, ShotOutcome::Miss);
        shots.push(coord);
        assert!(shots.len() <= BOARD_SIZE * BOARD_SIZE);
    }
    shots
}

#[test]
fn test_checkerboard_first_target() {
    let board = TrackingBoard::new();
    assert_eq!(Checkerboard.select_target(&board), Some((0, 0)));
}

#[test]
fn test_checkerboard_covers_board() {
    let shots = exhaust(&mut Checkerboard);
    assert_eq!(shots.len(), BOARD_SIZE * BOARD_SIZE);
    let distinct: HashSet<_> = shots.iter().collect();
    assert_eq!(distinct.len(), BOARD_SIZE * BOARD_SIZE);

    let half = BOARD_SIZE * BOARD_SIZE / 2;
    assert!(shots[..half].iter().all(|(r, c)| (r + c) % 2 == 0));
    assert!(shots[half..].iter().all(|(r, c)| (r + c) % 2 == 1));
    assert_eq!(&shots[..3], &[(0, 0), (0, 2), (0, 4)]);
    assert_eq!(shots[half], (0, 1));
}

#[test]
fn test_checkerboard_skips_tried_cells() {
    let mut board = TrackingBoard::new();
    board.mark((0, 0), ShotOutcome::Hit);
    board.mark((0, 2), ShotOutcome::Miss);
    assert_eq!(Checkerboard.select_target(&board), Some((0, 4)));
}

#[test]
fn test_full_board_has_no_target() {
    let mut board = TrackingBoard::new();
    for r in 0..BOARD_SIZE {
        for c in 0..BOARD_SIZE {
            board.mark((r, c), ShotOutcome::Miss);
        }
    }
    assert_eq!(board.untried_count(), 0);
    assert_eq!(Checkerboard.select_target(&board), None);
    assert_eq!(PerimeterFirst.select_target(&board), None);
    let mut random = RandomTargeting::new(SmallRng::seed_from_u64(3));
    assert_eq!(random.select_target(&board), None);
}

#[test]
fn test_perimeter_order() {
    let shots = exhaust(&mut PerimeterFirst);
    assert_eq!(shots.len(), BOARD_SIZE * BOARD_SIZE);

    let last = BOARD_SIZE - 1;
    let top: Vec<_> = (0..BOARD_SIZE).map(|c| (0, c)).collect();
    let bottom: Vec<_> = (0..BOARD_SIZE).map(|c| (last, c)).collect();
    assert_eq!(&shots[..BOARD_SIZE], top.as_slice());
    assert_eq!(&shots[BOARD_SIZE..2 * BOARD_SIZE], bottom.as_slice());
    // corners are already taken, so the left column starts at row 1
    assert_eq!(shots[2 * BOARD_SIZE], (1, 0));

    let border = 4 * BOARD_SIZE - 4;
    assert!(shots[..border]
        .iter()
        .all(|&(r, c)| r == 0 || r == last || c == 0 || c == last));
    // interior follows checkerboard order
    assert_eq!(shots[border], (1, 1));
}

#[test]
fn test_random_targeting_covers_board() {
    let mut strategy = RandomTargeting::new(SmallRng::seed_from_u64(42));
    let shots = exhaust(&mut strategy);
    let distinct: HashSet<_> = shots.iter().collect();
    assert_eq!(distinct.len(), BOARD_SIZE * BOARD_SIZE);
}

#[test]
fn test_strategy_kind_builds() {
    let board = TrackingBoard::new();
    assert_eq!(StrategyKind::default(), StrategyKind::Checkerboard);
    assert_eq!(
        StrategyKind::Checkerboard.build().select_target(&board),
        Some((0, 0))
    );
    let mut perimeter = StrategyKind::PerimeterFirst.build();
    assert_eq!(exhaust(perimeter.as_mut()).len(), BOARD_SIZE * BOARD_SIZE);
}

proptest! {
    #[test]
    fn checkerboard_prefers_even_parity(tried in prop::collection::vec((0..BOARD_SIZE, 0..BOARD_SIZE), 0..80)) {
        let mut board = TrackingBoard::new();
        for coord in &tried {
            board.mark(*coord, ShotOutcome::Miss);
        }
        let even_left = board.untried().any(|(r, c)| (r + c) % 2 == 0);
        match Checkerboard.select_target(&board) {
            Some((r, c)) => {
                prop_assert!(board.is_untried(r, c));
                if even_left {
                    prop_assert_eq!((r + c) % 2, 0);
                }
            }
            None => prop_assert_eq!(board.untried_count(), 0),
        }
    }

    #[test]
    fn random_targeting_picks_untried(seed in any::<u64>(), tried in prop::collection::vec((0..BOARD_SIZE, 0..BOARD_SIZE), 0..99)) {
        let mut board = TrackingBoard::new();
        for coord in &tried {
            board.mark(*coord, ShotOutcome::Hit);
        }
        let mut strategy = RandomTargeting::new(SmallRng::seed_from_u64(seed));
        let (r, c) = strategy.select_target(&board).unwrap();
        prop_assert!(board.is_untried(r, c));
    }
}
