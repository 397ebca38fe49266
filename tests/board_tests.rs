use serial_battleship::{
    Board, BoardError, Cell, Ship, ShotOutcome, BOARD_SIZE, FLEET, TOTAL_SHIP_CELLS,
};
use rand::rngs::SmallRng;
use rand::SeedableRng;

#[test]
fn test_canonical_fleet_places_every_ship() {
    let mut board = Board::new();
    let report = board.initialize();
    assert!(report.all_placed());
    assert_eq!(report.placed().count(), FLEET.len());
    assert_eq!(report.placed_cells(), TOTAL_SHIP_CELLS);
    assert_eq!(board.occupied_cells(), TOTAL_SHIP_CELLS);
}

#[test]
fn test_canonical_checksum() {
    let board = Board::canonical();
    let checksum = board.compute_row_checksum();
    assert_eq!(checksum.counts(), &[7, 1, 3, 3, 3, 4, 1, 5, 1, 2]);
    assert_eq!(checksum.total(), TOTAL_SHIP_CELLS);
}

#[test]
fn test_initialize_is_deterministic() {
    let mut a = Board::new();
    let mut b = Board::new();
    a.initialize();
    b.initialize();
    b.initialize();
    assert_eq!(a, b);
    assert_eq!(a.compute_row_checksum(), b.compute_row_checksum());
}

#[test]
fn test_cells_tagged_with_ship_length() {
    let board = Board::canonical();
    assert_eq!(board.cell(0, 0), Some(Cell::Ship(5)));
    assert_eq!(board.cell(3, 0), Some(Cell::Ship(4)));
    assert_eq!(board.cell(9, 6), Some(Cell::Ship(2)));
    assert_eq!(board.cell(9, 9), Some(Cell::Empty));
    assert_eq!(board.cell(BOARD_SIZE, 0), None);
}

#[test]
fn test_conflicting_ships_are_skipped() {
    let fleet = [
        Ship::horizontal(0, 0, 5),
        Ship::horizontal(0, 3, 3), // overlaps the first ship
        Ship::vertical(8, 0, 4),   // runs off the bottom edge
        Ship::vertical(1, 0, 2),
    ];
    let mut board = Board::new();
    let report = board.initialize_with(&fleet);

    assert!(!report.all_placed());
    let placed: Vec<_> = report.placed().copied().collect();
    let skipped: Vec<_> = report.skipped().copied().collect();
    assert_eq!(placed, vec![fleet[0], fleet[3]]);
    assert_eq!(skipped, vec![fleet[1], fleet[2]]);

    // no partial placement of the skipped ships
    assert_eq!(board.occupied_cells(), 7);
    assert_eq!(board.cell(8, 0), Some(Cell::Empty));
    assert_eq!(board.compute_row_checksum().total(), 7);
}

#[test]
fn test_place_reports_reason() {
    let mut board = Board::new();
    board.place(&Ship::vertical(0, 0, 3)).unwrap();
    assert_eq!(
        board.place(&Ship::horizontal(1, 0, 2)),
        Err(BoardError::ShipOverlaps)
    );
    assert_eq!(
        board.place(&Ship::horizontal(5, 8, 3)),
        Err(BoardError::ShipOutOfBounds)
    );
}

#[test]
fn test_incoming_shots() {
    let mut board = Board::canonical();
    assert_eq!(board.apply_incoming_shot(0, 0), ShotOutcome::Hit);
    assert_eq!(board.cell(0, 0), Some(Cell::Hit));
    // a resolved cell cannot be hit twice
    assert_eq!(board.apply_incoming_shot(0, 0), ShotOutcome::Miss);
    assert_eq!(board.apply_incoming_shot(9, 9), ShotOutcome::Miss);
    assert_eq!(board.cell(9, 9), Some(Cell::Empty));

    assert_eq!(board.remaining_ship_cells(), TOTAL_SHIP_CELLS - 1);
    assert_eq!(board.occupied_cells(), TOTAL_SHIP_CELLS);
}

#[test]
fn test_reveal_digits_keep_ship_lengths() {
    let board = Board::canonical();
    assert_eq!(board.row_digits(0), [5, 5, 5, 5, 5, 0, 2, 2, 0, 0]);
    assert_eq!(board.row_digits(7), [2, 0, 0, 0, 0, 3, 3, 3, 0, 2]);
}

#[test]
fn test_random_placement_fleet() {
    let mut rng = SmallRng::seed_from_u64(42);
    let mut board = Board::new();
    for len in [5u8, 4, 4, 3, 3, 3, 2, 2, 2, 2] {
        let ship = board.random_placement(&mut rng, len).unwrap();
        board.place(&ship).unwrap();
    }
    assert_eq!(board.occupied_cells(), TOTAL_SHIP_CELLS);
}

#[test]
fn test_random_placement_rejects_impossible_length() {
    let mut rng = SmallRng::seed_from_u64(1);
    let board = Board::new();
    assert_eq!(
        board.random_placement(&mut rng, BOARD_SIZE as u8 + 1),
        Err(BoardError::ShipOutOfBounds)
    );
}
