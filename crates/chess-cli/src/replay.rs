use anyhow::Context;
use chess_match::repository::decode_stream;
use chess_match::{DomainEvent, Match, MatchId, MatchStatus, StoredEvent};
use std::path::Path;

/// Prints the match rebuilt from the events in `path`.
pub fn run(path: &Path) -> anyhow::Result<()> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let stored: Vec<StoredEvent> =
        serde_json::from_str(&content).context("Event file is not a JSON array of events")?;
    let events = decode_stream(&stored)?;
    tracing::info!("Replaying {} event(s) from {}", events.len(), path.display());

    for event in &events {
        println!("{}", describe(event));
    }

    let m = Match::from_events(MatchId::new(), events);
    println!();
    println!("{}", m.board());
    println!("FEN: {}", m.board().to_fen());
    match m.status() {
        MatchStatus::NotStarted => println!("Match not started"),
        MatchStatus::InProgress => {
            if let Some(color) = m.color_to_move() {
                println!("{} to move", color);
            }
        }
        MatchStatus::Ended(result) => println!("Result: {}", result),
    }
    Ok(())
}

fn describe(event: &DomainEvent) -> String {
    match event {
        DomainEvent::MatchStarted(e) => format!(
            "{}  started: {} (white) vs {} (black)",
            e.started_at, e.white_member_id, e.black_member_id
        ),
        DomainEvent::TurnTaken(e) => format!("{}  {} played {}", e.taken_at, e.member_id, e.as_move()),
        DomainEvent::PawnPromoted(e) => {
            format!("{}  pawn on {} became a {}", e.promoted_at, e.square, e.kind)
        }
        DomainEvent::MatchEnded(e) => {
            let last = e
                .final_move
                .as_ref()
                .map(|t| format!(" after {}", t.as_move()))
                .unwrap_or_default();
            match e.reason {
                Some(reason) => format!("{}  ended {}{} ({:?})", e.ended_at, e.result, last, reason),
                None => format!("{}  ended {}{}", e.ended_at, e.result, last),
            }
        }
    }
}
