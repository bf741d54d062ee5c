//! Integration tests for chess-match: whole games played through the
//! repository, from the standard starting position.

use chess_core::{Color, Move, PieceKind, Square};
use chess_match::{
    DomainEvent, EndReason, Match, MatchError, MatchId, MatchRepository, MatchResult,
    MatchStatus, MemberId, TurnOutcome,
};

fn sq(s: &str) -> Square {
    Square::from_algebraic(s).unwrap()
}

struct Game {
    repo: MatchRepository,
    id: MatchId,
    white: MemberId,
    black: MemberId,
}

impl Game {
    fn start() -> Self {
        let repo = MatchRepository::in_memory();
        let mut m = Match::new(MatchId::new());
        m.start(MemberId::new(), MemberId::new()).unwrap();
        repo.save(&mut m).unwrap();
        let white = m.state().white.unwrap().member_id;
        let black = m.state().black.unwrap().member_id;
        Game {
            repo,
            id: m.id(),
            white,
            black,
        }
    }

    /// Loads, plays one move for the side to move, and saves.
    fn play(&self, mv: &str) -> TurnOutcome {
        let mut m = self.repo.load(self.id).unwrap();
        let member = match m.color_to_move().unwrap() {
            Color::White => self.white,
            Color::Black => self.black,
        };
        let mv = Move::from_coordinate(mv).unwrap();
        let outcome = m.take_turn(member, mv.start, mv.end).unwrap();
        self.repo.save(&mut m).unwrap();
        outcome
    }

    fn play_all(&self, moves: &[&str]) {
        for mv in moves {
            let outcome = self.play(mv);
            assert!(outcome.is_accepted(), "{} rejected: {:?}", mv, outcome);
        }
    }

    fn load(&self) -> Match {
        self.repo.load(self.id).unwrap()
    }
}

#[test]
fn test_scholars_mate() {
    let game = Game::start();
    game.play_all(&["e2e4", "e7e5", "f1c4", "b8c6", "d1h5", "g8f6"]);

    let outcome = game.play("h5f7");
    assert_eq!(outcome, TurnOutcome::Checkmate { winner: Color::White });

    let m = game.load();
    assert_eq!(m.status(), MatchStatus::Ended(MatchResult::WhiteWins));
    assert_eq!(m.version(), 8);
    match m.events().last().unwrap() {
        DomainEvent::MatchEnded(e) => assert_eq!(e.reason, Some(EndReason::Checkmate)),
        other => panic!("unexpected event {:?}", other),
    }
    let queen = m.board().piece_at(sq("f7")).unwrap();
    assert_eq!((queen.kind, queen.color), (PieceKind::Queen, Color::White));
    assert_eq!(m.board().pieces_of(Color::Black).count(), 15);
}

#[test]
fn test_stalemate_ends_in_a_draw() {
    // Sam Loyd's ten-move stalemate.
    let game = Game::start();
    game.play_all(&[
        "e2e3", "a7a5", "d1h5", "a8a6", "h5a5", "h7h5", "h2h4", "a6h6", "a5c7", "f7f6",
        "c7d7", "e8f7", "d7b7", "d8d3", "b7b8", "d3h7", "b8c8", "f7g6",
    ]);

    let outcome = game.play("c8e6");
    assert_eq!(outcome, TurnOutcome::Stalemate);
    assert!(outcome.ends_match());

    let m = game.load();
    assert_eq!(m.status(), MatchStatus::Ended(MatchResult::Draw));
    assert_eq!(m.result(), Some(MatchResult::Draw));
    assert_eq!(m.version(), 20);
    match m.events().last().unwrap() {
        DomainEvent::MatchEnded(e) => {
            assert_eq!(e.result, MatchResult::Draw);
            assert_eq!(e.reason, Some(EndReason::Stalemate));
            let final_move = e.final_move.as_ref().unwrap();
            assert_eq!((final_move.start, final_move.end), (sq("c8"), sq("e6")));
        }
        other => panic!("unexpected event {:?}", other),
    }
    let queen = m.board().piece_at(sq("e6")).unwrap();
    assert_eq!((queen.kind, queen.color), (PieceKind::Queen, Color::White));
    assert!(m.board().piece_at(sq("c8")).is_none());
    assert_eq!(m.board().pieces_of(Color::Black).count(), 10);
}

#[test]
fn test_kingside_castling() {
    let game = Game::start();
    game.play_all(&["e2e4", "e7e5", "g1f3", "b8c6", "f1c4", "f8c5"]);

    assert!(game.play("e1g1").is_accepted());
    let m = game.load();
    let king = m.board().piece_at(Square::G1).unwrap();
    let rook = m.board().piece_at(Square::F1).unwrap();
    assert_eq!(king.kind, PieceKind::King);
    assert_eq!(rook.kind, PieceKind::Rook);
    assert!(m.board().piece_at(Square::E1).is_none());
    assert!(m.board().piece_at(Square::H1).is_none());
}

#[test]
fn test_castling_after_king_walk_is_rejected() {
    let game = Game::start();
    game.play_all(&[
        "e2e4", "e7e5", "g1f3", "b8c6", "f1c4", "f8c5", "e1e2", "d7d6", "e2e1", "c8d7",
    ]);

    let outcome = game.play("e1g1");
    assert_eq!(outcome.violations()[0].message, "The king has already moved.");
    assert_eq!(game.load().version(), 11);
}

#[test]
fn test_en_passant_capture() {
    let game = Game::start();
    game.play_all(&["d2d4", "a7a6", "d4d5", "c7c5"]);

    assert!(game.play("d5c6").is_accepted());
    let m = game.load();
    assert!(m.board().piece_at(sq("c5")).is_none());
    assert!(m.board().piece_at(sq("d5")).is_none());
    let pawn = m.board().piece_at(sq("c6")).unwrap();
    assert_eq!((pawn.kind, pawn.color), (PieceKind::Pawn, Color::White));
    assert_eq!(m.board().pieces_of(Color::Black).count(), 15);
}

#[test]
fn test_en_passant_expires_after_one_turn() {
    let game = Game::start();
    game.play_all(&["d2d4", "a7a6", "d4d5", "c7c5", "h2h3", "a6a5"]);

    let outcome = game.play("d5c6");
    assert_eq!(outcome.violations()[0].message, "A pawn must attack a filled square.");
}

#[test]
fn test_promotion_and_underpromotion() {
    let game = Game::start();
    game.play_all(&[
        "c2c4", "d7d5", "c4d5", "e7e5", "d5d6", "d8h4", "d6d7", "e8e7",
    ]);

    let outcome = game.play("d7d8");
    assert_eq!(
        outcome,
        TurnOutcome::Moved {
            check: true,
            promotion: Some(sq("d8"))
        }
    );

    let m = game.load();
    let queens: Vec<_> = m
        .board()
        .pieces_of(Color::White)
        .filter(|p| p.kind == PieceKind::Queen)
        .collect();
    assert_eq!(queens.len(), 2);
    assert_eq!(m.board().piece_at(sq("d8")).unwrap().kind, PieceKind::Queen);
    assert_eq!(
        m.board()
            .pieces_of(Color::White)
            .filter(|p| p.kind == PieceKind::Pawn)
            .count(),
        7
    );

    let mut m = game.load();
    m.promote_piece(sq("d8"), PieceKind::Knight).unwrap();
    game.repo.save(&mut m).unwrap();

    let m = game.load();
    assert_eq!(m.board().piece_at(sq("d8")).unwrap().kind, PieceKind::Knight);
    assert_eq!(m.board().pieces_of(Color::White).count(), 16);
    assert_eq!(m.color_to_move(), Some(Color::Black));

    // Only once, and only right after the pawn arrived.
    let mut again = game.load();
    assert!(matches!(
        again.promote_piece(sq("d8"), PieceKind::Rook),
        Err(MatchError::InvalidCommand(_))
    ));
}

#[test]
fn test_promotion_to_king_is_refused() {
    let game = Game::start();
    game.play_all(&[
        "c2c4", "d7d5", "c4d5", "e7e5", "d5d6", "d8h4", "d6d7", "e8e7", "d7d8",
    ]);
    let mut m = game.load();
    assert!(matches!(
        m.promote_piece(sq("d8"), PieceKind::King),
        Err(MatchError::InvalidCommand(_))
    ));
    assert!(m.uncommitted_events().is_empty());
}

#[test]
fn test_equal_members_store_nothing() {
    let repo = MatchRepository::in_memory();
    let member = MemberId::new();
    let mut m = Match::new(MatchId::new());

    assert!(matches!(
        m.start(member, member),
        Err(MatchError::InvalidCommand(_))
    ));
    repo.save(&mut m).unwrap();
    assert!(matches!(repo.load(m.id()), Err(MatchError::MatchNotFound(_))));
    assert!(repo.summaries().unwrap().is_empty());
}

#[test]
fn test_rejections_are_not_stored() {
    let game = Game::start();
    for mv in ["e2e5", "e1e2", "b1b3", "a1a3", "e7e5"] {
        assert!(!game.play(mv).is_accepted(), "{} should be rejected", mv);
    }
    assert_eq!(game.load().version(), 1);
    assert_eq!(game.repo.stored_events(game.id).unwrap().len(), 1);
}

#[test]
fn test_resignation_is_final() {
    let game = Game::start();
    game.play_all(&["e2e4"]);

    let mut m = game.load();
    m.resign(game.black).unwrap();
    game.repo.save(&mut m).unwrap();

    let mut m = game.load();
    assert_eq!(m.result(), Some(MatchResult::WhiteWins));
    let err = m.take_turn(game.black, sq("e7"), sq("e5")).unwrap_err();
    assert!(matches!(err, MatchError::InvalidOperation(_)));
}
