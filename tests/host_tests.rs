use rand::rngs::SmallRng;
use rand::SeedableRng;
use serial_battleship::{
    Board, Cell, DeviceMessage, FieldRow, HostMessage, HostPeer, ShotOutcome, BOARD_SIZE,
    TOTAL_SHIP_CELLS,
};

fn host(games: u32) -> HostPeer<SmallRng> {
    HostPeer::new(SmallRng::seed_from_u64(7), games)
}

fn device_line(msg: DeviceMessage) -> String {
    msg.encode().unwrap().trim_end().to_string()
}

/// Open a game and return the host's first shot.
fn open_game(host: &mut HostPeer<SmallRng>, checksum: &str) -> (usize, usize) {
    assert_eq!(host.step(None), vec![HostMessage::Start]);
    match host.step(Some("DH_START_LEO")).as_slice() {
        [HostMessage::ChecksumRequest { host: Some(cs) }] => {
            assert_eq!(cs.total(), TOTAL_SHIP_CELLS)
        }
        other => panic!("unexpected {:?}", other),
    }
    match host.step(Some(checksum)).as_slice() {
        [HostMessage::Shot(coord)] => *coord,
        other => panic!("unexpected {:?}", other),
    }
}

fn reveal_canonical(host: &mut HostPeer<SmallRng>) {
    let board = Board::canonical();
    for row in 0..BOARD_SIZE {
        let line = device_line(DeviceMessage::FieldRow(FieldRow::from_board(&board, row)));
        assert!(host.step(Some(&line)).is_empty());
    }
}

#[test]
fn test_host_win_with_matching_checksum() {
    let mut host = host(1);
    open_game(&mut host, "DH_CS_7133341512");
    reveal_canonical(&mut host);

    let stats = host.stats();
    assert_eq!(stats.games, 1);
    assert_eq!(stats.host_wins, 1);
    assert_eq!(stats.device_wins, 0);
    assert_eq!(stats.checksum_mismatches, 0);
    assert!(host.is_done());
    assert!(host.step(None).is_empty());
}

#[test]
fn test_checksum_mismatch_is_counted() {
    let mut host = host(2);
    open_game(&mut host, "DH_CS_7133341513");
    reveal_canonical(&mut host);
    assert_eq!(host.stats().checksum_mismatches, 1);
    assert!(!host.is_done());
    // next game opens on the following tick
    assert_eq!(host.step(None), vec![HostMessage::Start]);
}

#[test]
fn test_device_sinks_host() {
    let mut host = host(1);
    open_game(&mut host, "DH_CS_7133341512");
    assert!(host.step(Some("DH_BOOM_M")).is_empty());

    let targets: Vec<_> = (0..BOARD_SIZE)
        .flat_map(|r| (0..BOARD_SIZE).map(move |c| (r, c)))
        .filter(|&(r, c)| matches!(host.board().cell(r, c), Some(Cell::Ship(_))))
        .collect();
    assert_eq!(targets.len(), TOTAL_SHIP_CELLS);

    let (last, rest) = targets.split_last().unwrap();
    for &(r, c) in rest {
        let out = host.step(Some(&format!("DH_BOOM_{}_{}", r, c)));
        assert_eq!(out[0], HostMessage::ShotResult(ShotOutcome::Hit));
        assert!(matches!(out[1], HostMessage::Shot(_)));
        assert!(host.step(Some("DH_BOOM_M")).is_empty());
    }

    let out = host.step(Some(&format!("DH_BOOM_{}_{}", last.0, last.1)));
    assert_eq!(out.len(), BOARD_SIZE);
    for (i, msg) in out.iter().enumerate() {
        match msg {
            HostMessage::FieldReveal(Some(row)) => assert_eq!(row.row, i),
            other => panic!("unexpected {:?}", other),
        }
    }
    assert_eq!(host.stats().device_wins, 1);

    reveal_canonical(&mut host);
    assert_eq!(host.stats().games, 1);
    assert_eq!(host.stats().checksum_mismatches, 0);
    assert!(host.is_done());
}

#[test]
fn test_host_ignores_noise() {
    let mut host = host(1);
    host.step(None);
    assert!(host.step(Some("DH_CS_7133341512")).is_empty());
    assert!(host.step(Some("nonsense")).is_empty());
    assert!(host.step(None).is_empty());
    assert!(matches!(
        host.step(Some("DH_START_LEO")).as_slice(),
        [HostMessage::ChecksumRequest { .. }]
    ));
}

#[test]
fn test_host_messages_encode() {
    let mut host = host(1);
    let lines: Vec<String> = host
        .step(None)
        .iter()
        .map(|m| m.encode().unwrap())
        .collect();
    assert_eq!(lines, vec!["HD_START\n"]);
    let cs = host.step(Some("DH_START_LEO"))[0].encode().unwrap();
    assert!(cs.starts_with("HD_CS_"));
    assert_eq!(cs.len(), "HD_CS_".len() + BOARD_SIZE + 1);
}
