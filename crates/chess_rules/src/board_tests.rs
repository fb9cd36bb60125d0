use super::*;

fn sq(name: &str) -> Square {
    name.parse().unwrap()
}

fn set(names: &[&str]) -> SquareSet {
    names.iter().map(|n| sq(n)).collect()
}

fn board(rows: [&str; 8]) -> Board {
    Board::from_rows(&rows).unwrap()
}

fn play(board: &mut Board, moves: &[(&str, &str)]) {
    for &(from, to) in moves {
        board.execute_move(sq(from), sq(to)).unwrap();
    }
}

// =============================================================================
// Queries
// =============================================================================

#[test]
fn test_startpos_destinations() {
    let mut board = Board::new();
    assert_eq!(board.legal_destinations(sq("e2")), set(&["e3", "e4"]));
    assert_eq!(board.legal_destinations(sq("g1")), set(&["f3", "h3"]));
    assert_eq!(board.legal_destinations(sq("b8")), set(&["a6", "c6"]));
    assert!(board.legal_destinations(sq("e1")).is_empty());
    assert!(board.legal_destinations(sq("e4")).is_empty());
}

#[test]
fn test_query_is_idempotent() {
    let mut board = Board::new();
    play(&mut board, &[("e2", "e4"), ("d7", "d5")]);
    let first = board.legal_destinations(sq("e4"));
    let second = board.legal_destinations(sq("e4"));
    assert_eq!(first, second);
    assert_eq!(first, set(&["e5", "d5"]));
}

#[test]
fn test_probe_leaves_board_untouched() {
    let mut board = Board::new();
    play(&mut board, &[("e2", "e4"), ("d7", "d5")]);
    let before = board.clone();

    assert!(board.can_move_to(sq("e4"), sq("d5")));
    assert!(board.can_move_to(sq("d1"), sq("h5")));
    assert!(!board.can_move_to(sq("d1"), sq("d2")));
    for from in Square::all() {
        let _ = board.legal_destinations(from);
    }

    assert_eq!(board, before);
}

#[test]
fn test_attack_sets_follow_moves() {
    let mut board = Board::new();
    play(&mut board, &[("e2", "e4"), ("e7", "e5"), ("f1", "c4")]);

    let fresh = Board::from_rows(&board.to_rows()).unwrap();
    for (square, pc) in board.pieces() {
        let expected = fresh.piece_at(square).unwrap().attacks();
        assert_eq!(pc.attacks(), expected, "stale attack set on {square}");
    }
    assert!(board.piece_at(sq("c4")).unwrap().attacks().contains(sq("f7")));
}

#[test]
fn test_rook_stops_at_first_blocker() {
    let mut board = board([
        ".......K",
        "........",
        "........",
        "P.......",
        "........",
        "........",
        "........",
        "r...k...",
    ]);
    assert_eq!(
        board.legal_destinations(sq("a1")),
        set(&["a2", "a3", "a4", "a5", "b1", "c1", "d1"])
    );
}

// =============================================================================
// Self-check filter
// =============================================================================

#[test]
fn test_pinned_piece_cannot_move() {
    let mut board = board([
        "K...R...",
        "........",
        "........",
        "........",
        "........",
        "........",
        "....b...",
        "....k...",
    ]);
    assert!(board.legal_destinations(sq("e2")).is_empty());
    assert!(!board.is_king_attacked(Color::White));
}

#[test]
fn test_king_avoids_attacked_squares() {
    let mut board = board([
        "K..R....",
        "........",
        "........",
        "........",
        "........",
        "........",
        "........",
        "....k...",
    ]);
    assert_eq!(board.legal_destinations(sq("e1")), set(&["e2", "f1", "f2"]));
}

#[test]
fn test_check_must_be_answered() {
    let mut board = board([
        "K...R...",
        "........",
        "........",
        "........",
        "........",
        "........",
        "...n....",
        "....k...",
    ]);
    assert!(board.is_king_attacked(Color::White));
    // The knight may only interpose
    assert_eq!(board.legal_destinations(sq("d2")), set(&["e4"]));
    assert_eq!(board.legal_destinations(sq("e1")), set(&["d1", "f1", "f2"]));
}

#[test]
fn test_missing_king_is_never_attacked() {
    let board = board([
        "....K...",
        "........",
        "........",
        "........",
        "........",
        "........",
        "........",
        "....R...",
    ]);
    assert!(!board.is_king_attacked(Color::White));
}

// =============================================================================
// Castling
// =============================================================================

fn castling_board() -> Board {
    board([
        "R...K..R",
        "........",
        "........",
        "........",
        "........",
        "........",
        "........",
        "r...k..r",
    ])
}

#[test]
fn test_king_sees_both_castling_squares() {
    let mut board = castling_board();
    let dests = board.legal_destinations(sq("e1"));
    assert!(dests.contains(sq("g1")));
    assert!(dests.contains(sq("c1")));
    assert!(board.can_castle(Color::Black, 0));
    assert!(board.can_castle(Color::Black, 7));
}

#[test]
fn test_kingside_castle_moves_rook() {
    let mut board = castling_board();
    let outcome = board.execute_move(sq("e1"), sq("g1")).unwrap();
    assert_eq!(outcome, MoveOutcome::Quiet);
    assert_eq!(board.to_rows()[7], "r....rk.");

    let rook = board.piece_at(sq("f1")).unwrap();
    assert_eq!(rook.kind, PieceKind::Rook);
    assert!(rook.has_moved);
    assert_eq!(board.en_passant(), None);
}

#[test]
fn test_queenside_castle_moves_rook() {
    let mut board = castling_board();
    board.execute_move(sq("e1"), sq("c1")).unwrap();
    assert_eq!(board.to_rows()[7], "..kr...r");

    // The rook on d1 now covers d8
    assert!(!board.can_castle(Color::Black, 0));
    assert!(board.can_castle(Color::Black, 7));
}

#[test]
fn test_black_kingside_castle() {
    let mut board = castling_board();
    board.execute_move(sq("e8"), sq("g8")).unwrap();
    assert_eq!(board.to_rows()[0], "R....RK.");
}

#[test]
fn test_castling_blocked_by_pieces() {
    let mut board = Board::new();
    assert!(!board.can_castle(Color::White, 0));
    assert!(!board.can_castle(Color::White, 7));

    play(&mut board, &[("g1", "f3"), ("g8", "f6"), ("e2", "e3"), ("e7", "e6")]);
    assert!(!board.can_castle(Color::White, 7));
    play(&mut board, &[("f1", "e2"), ("f8", "e7")]);
    assert!(board.can_castle(Color::White, 7));
    assert!(!board.can_castle(Color::White, 0));
}

#[test]
fn test_cannot_castle_through_attacked_square() {
    let mut board = board([
        "K....R..",
        "........",
        "........",
        "........",
        "........",
        "........",
        "........",
        "r...k..r",
    ]);
    let dests = board.legal_destinations(sq("e1"));
    assert!(!dests.contains(sq("g1")));
    assert!(dests.contains(sq("c1")));
}

#[test]
fn test_cannot_castle_out_of_check() {
    let mut board = board([
        "K...R...",
        "........",
        "........",
        "........",
        "........",
        "........",
        "........",
        "r...k..r",
    ]);
    assert!(!board.can_castle(Color::White, 0));
    assert!(!board.can_castle(Color::White, 7));
    let dests = board.legal_destinations(sq("e1"));
    assert!(!dests.contains(sq("c1")));
    assert!(!dests.contains(sq("g1")));
}

#[test]
fn test_moved_king_loses_castling_for_good() {
    let mut board = castling_board();
    board.move_piece(sq("e1"), sq("f1")).unwrap();
    board.move_piece(sq("f1"), sq("e1")).unwrap();
    assert!(!board.can_castle(Color::White, 0));
    assert!(!board.can_castle(Color::White, 7));
    let dests = board.legal_destinations(sq("e1"));
    assert!(!dests.contains(sq("c1")));
    assert!(!dests.contains(sq("g1")));
}

#[test]
fn test_moved_rook_loses_its_side_only() {
    let mut board = castling_board();
    board.move_piece(sq("h1"), sq("h2")).unwrap();
    board.move_piece(sq("h2"), sq("h1")).unwrap();
    assert!(!board.can_castle(Color::White, 7));
    assert!(board.can_castle(Color::White, 0));
}

// =============================================================================
// En passant
// =============================================================================

fn en_passant_board() -> Board {
    board([
        "K.......",
        "...P....",
        "........",
        "....p...",
        "........",
        "........",
        "........",
        ".......k",
    ])
}

#[test]
fn test_double_step_opens_en_passant() {
    let mut board = en_passant_board();
    board.execute_move(sq("d7"), sq("d5")).unwrap();
    assert_eq!(
        board.en_passant(),
        Some(EnPassant {
            captured: sq("d5"),
            landing: sq("d6"),
        })
    );
    assert_eq!(board.legal_destinations(sq("e5")), set(&["d6", "e6"]));
}

#[test]
fn test_en_passant_removes_passed_pawn() {
    let mut board = en_passant_board();
    board.execute_move(sq("d7"), sq("d5")).unwrap();
    let outcome = board.execute_move(sq("e5"), sq("d6")).unwrap();

    let captured = outcome.captured().unwrap();
    assert_eq!((captured.kind, captured.color), (PieceKind::Pawn, Color::Black));
    assert!(board.piece_at(sq("d5")).is_none());
    assert_eq!(board.piece_at(sq("d6")).unwrap().color, Color::White);
    assert_eq!(board.en_passant(), None);
}

#[test]
fn test_en_passant_expires_after_one_move() {
    let mut board = en_passant_board();
    play(&mut board, &[("d7", "d5"), ("h1", "h2")]);
    assert_eq!(board.en_passant(), None);
    play(&mut board, &[("a8", "b8")]);
    assert_eq!(board.legal_destinations(sq("e5")), set(&["e6"]));
}

#[test]
fn test_single_step_does_not_open_en_passant() {
    let mut board = Board::new();
    play(&mut board, &[("e2", "e3")]);
    assert_eq!(board.en_passant(), None);
}

#[test]
fn test_en_passant_exposing_king_is_illegal() {
    let mut board = board([
        "....K...",
        "..P.....",
        "........",
        "kp.....R",
        "........",
        "........",
        "........",
        "........",
    ]);
    board.execute_move(sq("c7"), sq("c5")).unwrap();
    assert_eq!(board.legal_destinations(sq("b5")), set(&["b6"]));
}

// =============================================================================
// Promotion
// =============================================================================

#[test]
fn test_white_promotion_waits_for_choice() {
    let mut board = board([
        ".......K",
        "p.......",
        "........",
        "........",
        "........",
        "........",
        "........",
        "....k...",
    ]);
    let outcome = board.execute_move(sq("a7"), sq("a8")).unwrap();
    assert_eq!(
        outcome,
        MoveOutcome::Promotion {
            square: sq("a8"),
            captured: None,
        }
    );
    assert_eq!(board.pending_promotion(), Some(sq("a8")));
    assert_eq!(board.piece_at(sq("a8")).unwrap().kind, PieceKind::Pawn);

    assert_eq!(
        board.move_piece(sq("e1"), sq("e2")),
        Err(RulesError::PromotionPending(sq("a8")))
    );
    assert_eq!(
        board.promote(sq("a8"), PieceKind::King),
        Err(RulesError::InvalidPromotion(PieceKind::King))
    );
    assert_eq!(
        board.promote(sq("b8"), PieceKind::Queen),
        Err(RulesError::NoPendingPromotion)
    );

    board.promote(sq("a8"), PieceKind::Queen).unwrap();
    let queen = board.piece_at(sq("a8")).unwrap();
    assert_eq!((queen.kind, queen.color), (PieceKind::Queen, Color::White));
    assert!(queen.has_moved);
    assert_eq!(board.pending_promotion(), None);
    assert!(board.is_king_attacked(Color::Black));
}

#[test]
fn test_black_capture_promotion() {
    let mut board = board([
        "K.......",
        "........",
        "........",
        "........",
        "........",
        "........",
        ".......P",
        "....k.r.",
    ]);
    assert_eq!(board.legal_destinations(sq("h2")), set(&["g1", "h1"]));

    let outcome = board.execute_move(sq("h2"), sq("g1")).unwrap();
    let captured = outcome.captured().unwrap();
    assert_eq!((captured.kind, captured.color), (PieceKind::Rook, Color::White));

    board.promote(sq("g1"), PieceKind::Knight).unwrap();
    assert_eq!(board.to_rows()[7], "....k.N.");
}

#[test]
fn test_promote_without_pending_pawn() {
    let mut board = Board::new();
    assert_eq!(
        board.promote(sq("e2"), PieceKind::Queen),
        Err(RulesError::NoPendingPromotion)
    );
}

// =============================================================================
// Terminal states
// =============================================================================

#[test]
fn test_open_game_is_not_over() {
    let mut board = Board::new();
    play(&mut board, &[("e2", "e4"), ("e7", "e5")]);
    assert_eq!(board.check_for_win(Color::White), None);
    assert_eq!(board.check_for_win(Color::Black), None);
}

#[test]
fn test_fools_mate() {
    let mut board = Board::new();
    play(
        &mut board,
        &[("f2", "f3"), ("e7", "e5"), ("g2", "g4"), ("d8", "h4")],
    );
    assert!(board.is_king_attacked(Color::White));
    assert_eq!(board.check_for_win(Color::White), Some(GameStatus::Checkmate));
}

#[test]
fn test_back_rank_mate() {
    let mut board = board([
        "......K.",
        ".....PPP",
        "........",
        "........",
        "........",
        "........",
        "........",
        "r...k...",
    ]);
    assert_eq!(board.check_for_win(Color::Black), None);
    board.execute_move(sq("a1"), sq("a8")).unwrap();
    assert_eq!(board.check_for_win(Color::Black), Some(GameStatus::Checkmate));
}

#[test]
fn test_lone_king_stalemate() {
    // Black king a8, white king c7, white queen b6
    let mut board = board([
        "K.......",
        "..k.....",
        ".q......",
        "........",
        "........",
        "........",
        "........",
        "........",
    ]);
    assert!(!board.is_king_attacked(Color::Black));
    assert_eq!(board.check_for_win(Color::Black), Some(GameStatus::Stalemate));
}

// =============================================================================
// Move execution
// =============================================================================

#[test]
fn test_move_and_inverse_restore_placement() {
    let mut board = Board::new();
    play(&mut board, &[("g1", "f3"), ("f3", "g1")]);
    assert_eq!(board.to_rows(), STANDARD_LAYOUT);
    assert!(board.piece_at(sq("g1")).unwrap().has_moved);
}

#[test]
fn test_capture_returns_piece() {
    let mut board = Board::new();
    play(&mut board, &[("e2", "e4"), ("d7", "d5")]);
    let outcome = board.execute_move(sq("e4"), sq("d5")).unwrap();
    let captured = outcome.captured().unwrap();
    assert_eq!((captured.kind, captured.color), (PieceKind::Pawn, Color::Black));
    assert_eq!(board.occupied().len(), 31);
}

#[test]
fn test_checked_move_rejections() {
    let mut board = Board::new();
    assert_eq!(
        board.execute_move(sq("e2"), sq("e5")),
        Err(RulesError::IllegalMove {
            from: sq("e2"),
            to: sq("e5"),
        })
    );
    assert_eq!(
        board.execute_move(sq("e4"), sq("e5")),
        Err(RulesError::EmptySquare(sq("e4")))
    );
    assert_eq!(
        board.move_piece(sq("e4"), sq("e5")),
        Err(RulesError::EmptySquare(sq("e4")))
    );
}

#[test]
fn test_display_labels_ranks() {
    let board = Board::new();
    let text = board.to_string();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "8 RNBQKBNR");
    assert_eq!(lines[7], "1 rnbqkbnr");
    assert_eq!(lines[8], "  abcdefgh");
}
