//! Integration tests for goban-engine: board model, legality, termination and scoring.

use fastrand::Rng;

use goban_engine::board::{Board, Color, Coord, Move, Stone};
use goban_engine::moves::{
    is_suicide, is_valid_play, is_valid_play_no_suicide, legal_moves, play, play_in_place,
    play_random, play_random_in_place,
};
use goban_engine::ownermap::{GroupJudge, OwnerMap, dead_groups, dead_groups_with};
use goban_engine::score::{fast_score, official_score, official_score_with};
use goban_engine::termination::is_terminal;
use goban_engine::{Error, MoveError};

// =============================================================================
// Helper functions for setting up test positions
// =============================================================================

fn coord(board: &Board, s: &str) -> Coord {
    board.parse_coord(s).unwrap()
}

fn point(board: &Board, s: &str) -> usize {
    coord(board, s).point().unwrap()
}

/// Place stones directly, all of one color.
fn setpos(board: &mut Board, stones: &[&str], color: Color) {
    for s in stones {
        let c = coord(board, s);
        play_in_place(board, Move::new(c, color)).unwrap();
    }
}

/// Play `n` random legal moves with alternating colors, as a host would.
fn random_board(size: usize, n: usize, rng: &mut Rng) -> Board {
    let mut board = Board::new(size).unwrap();
    let mut color = Color::Black;
    for _ in 0..n {
        let moves = legal_moves(&board, color, true);
        let c = moves[rng.usize(..moves.len())];
        board = play(&board, Move::new(c, color)).unwrap();
        color = color.other();
    }
    board
}

/// 5x5, both sides alive with two eyes each, dame down the C column.
fn settled_board() -> Board {
    let mut board = Board::new(5).unwrap();
    setpos(&mut board, &["A1", "A3", "A5", "B1", "B2", "B3", "B4", "B5"], Color::Black);
    setpos(&mut board, &["E1", "E3", "E5", "D1", "D2", "D3", "D4", "D5"], Color::White);
    board
}

/// 5x5, a lone white stone at A1 inside black's area.
fn dead_stone_board() -> Board {
    let mut board = Board::new(5).unwrap();
    setpos(
        &mut board,
        &["A3", "A5", "B1", "B2", "B3", "B4", "B5", "C1", "C2", "C3", "C4", "C5"],
        Color::Black,
    );
    setpos(&mut board, &["A1", "D1", "D2", "D3", "D4", "D5", "E2", "E4"], Color::White);
    board
}

// =============================================================================
// Board creation and legal moves
// =============================================================================

#[test]
fn test_board_sizes() {
    for size in [9, 19] {
        let board = Board::new(size).unwrap();
        for color in [Color::Black, Color::White] {
            assert_eq!(
                legal_moves(&board, color, false).len(),
                size * size + 1,
                "starting board should have size**2 + 1 legal moves"
            );
            assert_eq!(legal_moves(&board, color, true).len(), size * size + 1);
        }
    }
}

#[test]
fn test_unsupported_sizes() {
    for size in [0, 26, 100] {
        assert!(matches!(Board::new(size), Err(Error::Config(_))), "{size}");
    }
    assert!(Board::new(1).is_ok());
    assert!(Board::new(25).is_ok());
}

#[test]
fn test_legal_moves_pass_first_then_scan_order() {
    let board = Board::new(9).unwrap();
    let moves = legal_moves(&board, Color::Black, false);
    assert_eq!(moves.len(), 82);
    assert_eq!(moves[0], Coord::Pass);
    assert_eq!(moves[1], coord(&board, "A1"));
    assert_eq!(moves[9], coord(&board, "J1"));
    assert_eq!(moves[10], coord(&board, "A2"));
    assert_eq!(moves[81], coord(&board, "J9"));
}

#[test]
fn test_filtered_is_subset_and_contains_pass() {
    let mut rng = Rng::with_seed(11);
    for _ in 0..5 {
        let board = random_board(9, 40, &mut rng);
        for color in [Color::Black, Color::White] {
            let all = legal_moves(&board, color, false);
            let filtered = legal_moves(&board, color, true);
            assert_eq!(all[0], Coord::Pass);
            assert_eq!(filtered[0], Coord::Pass);
            assert!(filtered.iter().all(|m| all.contains(m)));
        }
    }
}

#[test]
fn test_suicide_point_filtered() {
    let mut board = Board::new(9).unwrap();
    setpos(&mut board, &["A2", "B1"], Color::Black);
    let a1 = coord(&board, "A1");
    let a1_pt = a1.point().unwrap();

    assert!(is_suicide(&board, Color::White, a1_pt));
    assert!(is_valid_play(&board, Color::White, a1_pt));
    assert!(!is_valid_play_no_suicide(&board, Color::White, a1_pt));
    assert!(!legal_moves(&board, Color::White, true).contains(&a1));
    assert!(legal_moves(&board, Color::White, false).contains(&a1));

    // Black filling its own corner is fine
    assert!(legal_moves(&board, Color::Black, true).contains(&a1));

    let err = play(&board, Move::new(a1, Color::White)).unwrap_err();
    assert!(matches!(
        err,
        Error::IllegalMove {
            reason: MoveError::Suicide,
            ..
        }
    ));
}

#[test]
fn test_capture_is_not_suicide() {
    let mut board = Board::new(9).unwrap();
    setpos(&mut board, &["A2"], Color::White);
    setpos(&mut board, &["A3", "B2"], Color::Black);
    // Black A1 has no empty neighbor but captures A2
    let a1 = coord(&board, "A1");
    assert!(!is_suicide(&board, Color::Black, a1.point().unwrap()));
    let next = play(&board, Move::new(a1, Color::Black)).unwrap();
    assert_eq!(next.at(point(&board, "A2")), Stone::Empty);
    assert_eq!(next.captures(Color::Black), 1);
}

// =============================================================================
// Copy-on-write application
// =============================================================================

#[test]
fn test_play_leaves_original_untouched() {
    let mut rng = Rng::with_seed(21);
    let board = random_board(9, 30, &mut rng);
    let snapshot = board.clone();
    assert_eq!(snapshot, board);

    for c in legal_moves(&board, Color::Black, true).into_iter().skip(1) {
        let next = play(&board, Move::new(c, Color::Black)).unwrap();
        assert_eq!(board, snapshot);

        let pt = c.point().unwrap();
        assert_eq!(next.at(pt), Stone::Black);
        // Every other change is a white stone removed
        for q in board.points().filter(|&q| q != pt) {
            if next.at(q) != board.at(q) {
                assert_eq!(board.at(q), Stone::White);
                assert_eq!(next.at(q), Stone::Empty);
            }
        }
    }
}

#[test]
fn test_failed_play_leaves_board_untouched() {
    let mut board = Board::new(9).unwrap();
    let c = coord(&board, "E5");
    play_in_place(&mut board, Move::new(c, Color::White)).unwrap();
    let snapshot = board.clone();
    let moves = board.moves();

    assert!(play(&board, Move::new(c, Color::Black)).is_err());
    let err = play_in_place(&mut board, Move::new(c, Color::Black)).unwrap_err();
    assert_eq!(board, snapshot);
    assert_eq!(board.moves(), moves);

    let msg = err.to_string();
    assert!(msg.starts_with("Illegal move by black at E5"), "{msg}");
    assert!(msg.contains("Current board:"));
    assert!(msg.ends_with(&board.to_string()));
}

#[test]
fn test_equality_ignores_history() {
    let mut a = Board::new(9).unwrap();
    let mut b = Board::new(9).unwrap();
    setpos(&mut a, &["C3"], Color::Black);
    play_in_place(&mut b, Move::pass(Color::White)).unwrap();
    setpos(&mut b, &["C3"], Color::Black);
    assert_eq!(a, b);
    assert_ne!(a.moves(), b.moves());
    assert_ne!(Board::new(9).unwrap(), Board::new(13).unwrap());
}

#[test]
fn test_random_board_stones() {
    let mut rng = Rng::with_seed(1);
    let board = random_board(19, 50, &mut rng);
    let black = board.stones(Color::Black);
    let white = board.stones(Color::White);
    assert!(!black.is_empty() && !white.is_empty());
    assert!(black.iter().all(|&(i, j)| board.at_ij(i, j) == Stone::Black));
    assert!(white.iter().all(|&(i, j)| board.at_ij(i, j) == Stone::White));
}

#[test]
fn test_ij_mapping_round_trip() {
    let board = Board::new(13).unwrap();
    for pt in board.points() {
        let (i, j) = board.ij(pt);
        assert!(i < 13 && j < 13);
        assert_eq!(board.point_ij(i, j), Some(pt));
    }
    assert_eq!(board.ij(point(&board, "A13")), (0, 0));
    assert_eq!(board.ij(point(&board, "N1")), (12, 12));
    assert_eq!(board.point_ij(13, 0), None);
}

#[test]
fn test_random_play() {
    let mut rng = Rng::with_seed(8);
    let board = Board::new(9).unwrap();
    let (next, c) = play_random(&board, Color::White, &mut rng);
    assert_eq!(board.moves(), 0);
    assert_eq!(next.moves(), 1);
    assert_eq!(next.last_move(), Some(Move::new(c, Color::White)));
    assert!(legal_moves(&board, Color::White, true).contains(&c));

    // A 1x1 board only allows a pass
    let mut tiny = Board::new(1).unwrap();
    assert_eq!(play_random_in_place(&mut tiny, Color::Black, &mut rng), Coord::Pass);
}

// =============================================================================
// Ko
// =============================================================================

#[test]
fn test_ko_retake_forbidden_then_allowed() {
    let mut board = Board::new(9).unwrap();
    setpos(&mut board, &["D5", "C4", "D3"], Color::Black);
    setpos(&mut board, &["E5", "F4", "E3", "D4"], Color::White);
    // Black E4 captures D4
    setpos(&mut board, &["E4"], Color::Black);
    let d4 = coord(&board, "D4");
    assert_eq!(board.at(d4.point().unwrap()), Stone::Empty);

    assert!(!legal_moves(&board, Color::White, false).contains(&d4));
    let err = play(&board, Move::new(d4, Color::White)).unwrap_err();
    assert!(matches!(
        err,
        Error::IllegalMove {
            reason: MoveError::Ko,
            ..
        }
    ));

    // After a ko threat exchange, white may retake
    setpos(&mut board, &["J9"], Color::White);
    setpos(&mut board, &["J8"], Color::Black);
    assert!(play(&board, Move::new(d4, Color::White)).is_ok());
}

// =============================================================================
// Termination
// =============================================================================

#[test]
fn test_fresh_boards_not_terminal() {
    for size in 1..=25 {
        assert!(!is_terminal(&Board::new(size).unwrap()), "{size}");
    }
}

#[test]
fn test_two_passes_end_the_game() {
    let mut board = Board::new(9).unwrap();
    setpos(&mut board, &["E5"], Color::Black);
    play_in_place(&mut board, Move::pass(Color::White)).unwrap();
    assert!(!is_terminal(&board));
    play_in_place(&mut board, Move::pass(Color::Black)).unwrap();
    assert!(is_terminal(&board));
}

#[test]
fn test_resignation_ends_the_game() {
    let mut board = Board::new(9).unwrap();
    play_in_place(&mut board, Move::resign(Color::Black)).unwrap();
    assert!(is_terminal(&board));
}

// =============================================================================
// Ownership and scoring
// =============================================================================

#[test]
fn test_settled_board_scores_agree() {
    let board = settled_board();
    assert!(dead_groups(&board, None).is_empty());
    assert_eq!(fast_score(&board), 7.5);
    assert!((official_score(&board) - fast_score(&board)).abs() < 1e-4);
}

#[test]
fn test_dead_stone_removed() {
    let board = dead_stone_board();
    let mut rng = Rng::with_seed(3);
    let map = OwnerMap::estimate(&board, 200, &mut rng);
    let a1 = point(&board, "A1");

    assert_eq!(map.count(a1, Stone::Black), 200);
    assert_eq!(dead_groups(&board, Some(&map)), vec![a1]);
    assert_eq!(dead_groups(&board, None), vec![a1]);

    assert_eq!(fast_score(&board), 5.5);
    assert_eq!(official_score(&board), 2.5);
    assert_eq!(official_score_with(&board, &[]), 5.5);
}

#[test]
fn test_under_sampled_map_judges_nothing() {
    let board = dead_stone_board();
    let mut rng = Rng::with_seed(4);
    let map = OwnerMap::estimate(&board, 10, &mut rng);
    assert!(dead_groups(&board, Some(&map)).is_empty());

    let eager = GroupJudge {
        threshold: 0.8,
        min_playouts: 5,
    };
    assert_eq!(
        dead_groups_with(&board, Some(&map), &eager),
        vec![point(&board, "A1")]
    );
}

#[test]
fn test_score_sign_and_komi() {
    let mut board = Board::new(9).unwrap();
    board.set_komi(0.0);
    setpos(&mut board, &["E5"], Color::Black);
    // One black stone owns the whole empty board
    assert_eq!(official_score_with(&board, &[]), -81.0);
    assert_eq!(fast_score(&board), -1.0);
}
