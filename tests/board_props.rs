use proptest::prelude::*;
use serial_battleship::{Board, Cell, Orientation, Ship, BOARD_SIZE};

fn arb_ship() -> impl Strategy<Value = Ship> {
    (0..BOARD_SIZE + 2, 0..BOARD_SIZE + 2, 1u8..=6, any::<bool>()).prop_map(
        |(row, col, len, horizontal)| {
            let orientation = if horizontal {
                Orientation::Horizontal
            } else {
                Orientation::Vertical
            };
            Ship::new(row, col, len, orientation)
        },
    )
}

fn non_empty_cells(board: &Board) -> usize {
    board
        .grid()
        .iter()
        .flatten()
        .filter(|c| **c != Cell::Empty)
        .count()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn checksum_sums_to_non_empty_cells(
        fleet in prop::collection::vec(arb_ship(), 0..12),
        shots in prop::collection::vec((0..BOARD_SIZE, 0..BOARD_SIZE), 0..40),
    ) {
        let mut board = Board::new();
        let report = board.initialize_with(&fleet);
        prop_assert_eq!(board.compute_row_checksum().total(), non_empty_cells(&board));
        prop_assert_eq!(report.placed_cells(), non_empty_cells(&board));

        for (r, c) in shots {
            board.apply_incoming_shot(r, c);
        }
        prop_assert_eq!(board.compute_row_checksum().total(), non_empty_cells(&board));
    }

    #[test]
    fn placed_ships_never_overlap_or_leave_the_grid(
        fleet in prop::collection::vec(arb_ship(), 0..12),
    ) {
        let mut board = Board::new();
        let report = board.initialize_with(&fleet);
        let mut seen = [[false; BOARD_SIZE]; BOARD_SIZE];
        for ship in report.placed() {
            for (r, c) in ship.cells() {
                prop_assert!(r < BOARD_SIZE && c < BOARD_SIZE);
                prop_assert!(!seen[r][c]);
                seen[r][c] = true;
                prop_assert_eq!(board.cell(r, c), Some(Cell::Ship(ship.length())));
            }
        }
    }
}
