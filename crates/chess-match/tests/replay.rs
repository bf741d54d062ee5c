//! Property tests: replaying a stream always rebuilds the same match.

use chess_core::{Move, Square};
use chess_engine::{MoveContext, RulePipeline};
use chess_match::{project, Match, MatchId, MatchRepository, MemberId, StoredEvent};
use proptest::prelude::*;

/// Every move the side to move may play.
fn legal_moves(m: &Match) -> Vec<Move> {
    let Some(color) = m.color_to_move() else {
        return Vec::new();
    };
    let pipeline = RulePipeline::standard();
    let state = m.state();
    state
        .board
        .pieces_of(color)
        .flat_map(|piece| Square::all().map(move |end| Move::new(piece.square, end)))
        .filter(|mv| {
            let ctx = MoveContext::new(color, *mv, &state.board, &state.turns);
            pipeline.validate(&ctx).is_ok()
        })
        .collect()
}

/// Plays a game choosing each move by index into the legal moves.
fn play(choices: &[usize]) -> Match {
    let mut m = Match::new(MatchId::new());
    m.start(MemberId::new(), MemberId::new()).unwrap();
    for &choice in choices {
        let moves = legal_moves(&m);
        if moves.is_empty() {
            break;
        }
        let mv = moves[choice % moves.len()];
        let member = m.player_to_move().unwrap().member_id;
        let outcome = m.take_turn(member, mv.start, mv.end).unwrap();
        assert!(outcome.is_accepted(), "{} was listed as legal", mv);
    }
    m
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn replay_is_idempotent(choices in prop::collection::vec(0usize..256, 0..24)) {
        let live = play(&choices);

        let once = project(live.events());
        let twice = project(live.events());
        prop_assert_eq!(&once, &twice);
        prop_assert_eq!(&once, live.state());

        let rebuilt = Match::from_events(live.id(), live.events().to_vec());
        prop_assert_eq!(rebuilt.state(), live.state());
        prop_assert_eq!(rebuilt.version(), live.version());
    }

    #[test]
    fn stored_stream_rebuilds_the_match(choices in prop::collection::vec(0usize..256, 0..16)) {
        let mut live = play(&choices);
        let expected = live.state().clone();

        let repo = MatchRepository::in_memory();
        repo.save(&mut live).unwrap();
        let loaded = repo.load(live.id()).unwrap();
        prop_assert_eq!(loaded.state(), &expected);

        let stored = repo.stored_events(live.id()).unwrap();
        let versions: Vec<u64> = stored.iter().map(|e| e.version).collect();
        let contiguous: Vec<u64> = (1..=live.version()).collect();
        prop_assert_eq!(versions, contiguous);
        for (event, original) in stored.iter().zip(live.events()) {
            prop_assert_eq!(event.type_name.as_str(), original.type_name());
            prop_assert_eq!(&StoredEvent::decode(event).unwrap(), original);
        }
    }
}
