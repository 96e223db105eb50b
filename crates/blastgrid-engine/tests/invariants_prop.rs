//! Property tests for board rules, hand generation and command sequences.

use blastgrid_engine::{
    BitBoard, Command, Direction, GameSession, PieceGenerator, PieceId, PieceSeed, Placement,
    Position, Reachability, ReachabilityRule, apply, line_clear_score, simulation,
};
use proptest::prelude::*;

fn board_from_rows(rows: [u8; BitBoard::SIZE]) -> BitBoard {
    let mut board = BitBoard::EMPTY;
    for (y, row) in rows.into_iter().enumerate() {
        for x in 0..BitBoard::SIZE {
            if row & (1 << x) != 0 {
                board.occupy_cell(x, y);
            }
        }
    }
    board
}

/// Boards with roughly a quarter of the cells occupied.
fn arb_board() -> impl Strategy<Value = BitBoard> {
    any::<([u8; BitBoard::SIZE], [u8; BitBoard::SIZE])>()
        .prop_map(|(a, b)| board_from_rows(std::array::from_fn(|y| a[y] & b[y])))
}

/// Boards with mostly filled rows, so that pieces stop fitting.
fn arb_dense_board() -> impl Strategy<Value = BitBoard> {
    prop::array::uniform8(prop_oneof![Just(0xff_u8), any::<u8>().prop_map(|row| row | 0xb5)])
        .prop_map(board_from_rows)
}

fn arb_piece() -> impl Strategy<Value = PieceId> {
    (0..PieceId::LEN).prop_map(|index| PieceId::new(index).unwrap())
}

fn arb_position() -> impl Strategy<Value = Position> {
    (-4_i8..12, -4_i8..12).prop_map(|(x, y)| Position::new(x, y))
}

fn arb_direction() -> impl Strategy<Value = Direction> {
    prop_oneof![
        Just(Direction::Up),
        Just(Direction::Down),
        Just(Direction::Left),
        Just(Direction::Right),
    ]
}

fn arb_command() -> impl Strategy<Value = Command> {
    prop_oneof![
        4 => Just(Command::Place),
        4 => arb_direction().prop_map(Command::Navigate),
        3 => arb_direction().prop_map(Command::Move),
        2 => Just(Command::Spawn),
        2 => Just(Command::Finalize),
        1 => Just(Command::Cancel),
        1 => (0_usize..4).prop_map(Command::SelectSlot),
        1 => (0_u32..500).prop_map(Command::SetLoadedScore),
    ]
}

proptest! {
    #[test]
    fn bounds_match_footprint_cells(piece in arb_piece(), position in arb_position()) {
        let on_board = Placement::new(piece, position)
            .cells()
            .all(|(x, y)| (0..BitBoard::SIZE_I32).contains(&x) && (0..BitBoard::SIZE_I32).contains(&y));
        prop_assert_eq!(BitBoard::EMPTY.is_within_bounds(piece, position), on_board);
    }

    #[test]
    fn stamping_a_legal_placement_adds_its_cells(
        board in arb_board(),
        piece in arb_piece(),
        position in arb_position(),
    ) {
        if !board.can_place(piece, position) {
            return Ok(());
        }
        let mut stamped = board;
        stamped.stamp(piece, position);
        prop_assert_eq!(stamped.occupied_count(), board.occupied_count() + piece.cell_count());
        for (x, y) in Placement::new(piece, position).cells() {
            let (x, y) = (usize::try_from(x).unwrap(), usize::try_from(y).unwrap());
            prop_assert!(stamped.is_occupied(x, y));
        }
    }

    #[test]
    fn clearing_removes_exactly_the_full_lines(board in arb_board()) {
        let full = board.full_lines();
        let mut cleared = board;
        let clear = cleared.clear_full_lines();

        prop_assert_eq!(clear.lines(), full.count());
        prop_assert!(cleared.full_lines().is_empty());
        prop_assert_eq!(
            usize::try_from(board.occupied_count() - cleared.occupied_count()).unwrap(),
            clear.cleared_count()
        );
        for cell in clear.cleared_cells() {
            let (x, y) = (usize::from(cell.x), usize::from(cell.y));
            prop_assert!(board.is_occupied(x, y));
            prop_assert!(!cleared.is_occupied(x, y));
            prop_assert!(full.covers(x, y));
        }
        if full.is_empty() {
            prop_assert_eq!(cleared, board);
            prop_assert!(clear.is_empty());
        }
    }

    #[test]
    fn projection_matches_stamp_and_clear(
        board in arb_board(),
        piece in arb_piece(),
        position in arb_position(),
    ) {
        if !board.can_place(piece, position) {
            return Ok(());
        }
        let (projected, lines) = simulation::project(&board, piece, position);
        let mut expected = board;
        expected.stamp(piece, position);
        let clear = expected.clear_full_lines();
        prop_assert_eq!(projected, expected);
        prop_assert_eq!(lines, clear.lines());
    }

    #[test]
    fn blocked_catalog_blocks_every_subset(board in arb_dense_board(), mask in any::<u64>()) {
        let catalog: Vec<_> = PieceId::all().collect();
        let subset: Vec<_> = catalog
            .iter()
            .copied()
            .filter(|piece| mask & (1 << (piece.index() % 64)) != 0)
            .collect();
        for rule in [ReachabilityRule::Legacy, ReachabilityRule::HandOnly] {
            if rule.check(&board, &catalog).is_blocked() {
                prop_assert!(rule.check(&board, &subset).is_blocked());
            }
        }
    }

    #[test]
    fn direct_fits_are_legal(board in arb_dense_board(), pieces in prop::collection::vec(arb_piece(), 0..4)) {
        let reachability = ReachabilityRule::HandOnly.check(&board, &pieces);
        let fits = pieces.iter().any(|&piece| board.is_placeable(piece));
        prop_assert_eq!(!reachability.is_blocked(), fits);
        if let Reachability::FitsNow(placement) = reachability {
            prop_assert!(board.can_place(placement.piece, placement.position));
        }
    }

    #[test]
    fn generated_hands_are_distinct(seed in any::<u32>(), board in arb_board()) {
        let mut generator = PieceGenerator::with_seed(PieceSeed::from(seed));
        let hand = generator.generate_hand(&board);
        let pieces = hand.map(|hand_piece| hand_piece.piece);
        prop_assert_ne!(pieces[0], pieces[1]);
        prop_assert_ne!(pieces[0], pieces[2]);
        prop_assert_ne!(pieces[1], pieces[2]);

        let placeable = PieceId::all().filter(|&piece| board.is_placeable(piece)).count();
        if placeable >= pieces.len() {
            for piece in pieces {
                prop_assert!(board.is_placeable(piece), "{} is not placeable", piece.name());
            }
        }
    }

    #[test]
    fn command_sequences_keep_session_consistent(
        seed in any::<u32>(),
        commands in prop::collection::vec(arb_command(), 0..200),
    ) {
        let mut session = GameSession::with_seed(PieceSeed::from(seed));
        for command in commands {
            let was_game_over = session.is_game_over();
            let events = apply(&mut session, command);
            if was_game_over && matches!(command, Command::Spawn) {
                prop_assert!(events.is_empty());
            }

            prop_assert!(session.board().full_lines().is_empty());
            prop_assert!(session.hand().selection() < 3);
            if let Some(active) = session.active() {
                prop_assert!(session.board().is_within_bounds(active.piece.piece, active.position));
                prop_assert!(session.hand().slot(active.slot).is_none());
            }

            let stats = session.stats();
            let line_bonus: u32 = stats
                .line_cleared_counter()
                .iter()
                .enumerate()
                .map(|(lines, &count)| line_clear_score(lines) * u32::try_from(count).unwrap())
                .sum();
            let placed = u32::try_from(stats.placed_pieces()).unwrap();
            prop_assert_eq!(stats.score(), placed * 5 + line_bonus);
            prop_assert!(stats.best_score() >= stats.score());
        }
    }
}

#[test]
fn horizontal_i4_at_origin_scores_placement_only() {
    let mut board = BitBoard::EMPTY;
    let (after, lines) = simulation::project(&board, PieceId::TETROMINO_I_H, Position::ORIGIN);
    assert_eq!(lines, 0);
    board.stamp(PieceId::TETROMINO_I_H, Position::ORIGIN);
    assert_eq!(after, board);
    assert_eq!(board.occupied_count(), 4);
    assert_eq!(line_clear_score(lines), 0);
}

#[test]
fn vertical_i4_completes_top_row() {
    let mut board = BitBoard::EMPTY;
    for x in 0..7 {
        board.occupy_cell(x, 0);
    }
    assert!(board.can_place(PieceId::TETROMINO_I_V, Position::new(7, 0)));
    board.stamp(PieceId::TETROMINO_I_V, Position::new(7, 0));
    let clear = board.clear_full_lines();
    assert_eq!(clear.lines(), 1);
    assert_eq!(clear.cleared_count(), 8);
    assert_eq!(line_clear_score(clear.lines()), 20);
    // The rest of the vertical piece stays behind
    assert_eq!(board.occupied_count(), 3);
    assert!((1..4).all(|y| board.is_occupied(7, y)));
}

#[test]
fn crossing_row_and_column_share_a_cell() {
    let mut board = BitBoard::EMPTY;
    for i in 0..BitBoard::SIZE {
        board.occupy_cell(i, 0);
        board.occupy_cell(0, i);
    }
    let clear = board.clear_full_lines();
    assert_eq!(clear.lines(), 2);
    assert_eq!(clear.cleared_count(), 15);
    assert_eq!(line_clear_score(clear.lines()), 40);
    assert!(board.is_empty());
}
