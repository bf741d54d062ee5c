use crate::input::{self, Input, HELP};
use chess_match::{
    MatchConfig, MatchId, MatchRepository, MatchService, MemberId, TurnOutcome,
};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

/// Hosts one match on this terminal until it ends or the players quit.
pub async fn run(config: MatchConfig, record: Option<PathBuf>) -> anyhow::Result<()> {
    let repository = Arc::new(MatchRepository::in_memory());
    let service = MatchService::new(Arc::clone(&repository), config);
    let mut expirations = service.subscribe();

    let id = service.start_match(MemberId::new(), MemberId::new())?;
    let m = service.get_match(id)?;
    if let (Some(white), Some(black)) = (m.state().white, m.state().black) {
        println!("Match {}", id);
        println!("White: {}", white.member_id);
        println!("Black: {}", black.member_id);
    }
    if service.config().clock_enabled {
        println!("Each turn is limited to {}ms.", service.config().turn_duration_ms);
    }
    println!("{}", HELP);
    println!("\n{}", m.board());
    prompt(&service, id)?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                if line.trim().is_empty() {
                    continue;
                }
                match input::parse(&line) {
                    Ok(Input::Quit) => break,
                    Ok(command) => {
                        if let Err(e) = handle(&service, id, command) {
                            println!("{}", e);
                        }
                    }
                    Err(e) => println!("{}", e),
                }
                if !prompt(&service, id)? {
                    break;
                }
            }
            expired = expirations.recv() => {
                if let Ok(expired) = expired {
                    println!(
                        "\n{} ran out of time after {}ms.",
                        expired.member_id,
                        expired.exceeded.as_millis()
                    );
                    prompt(&service, id)?;
                    break;
                }
            }
        }
    }

    if let Some(path) = record {
        let stored = repository.stored_events(id)?;
        std::fs::write(&path, serde_json::to_string_pretty(&stored)?)?;
        println!("Recorded {} event(s) to {}", stored.len(), path.display());
    }
    Ok(())
}

fn handle(service: &MatchService, id: MatchId, command: Input) -> anyhow::Result<()> {
    let m = service.get_match(id)?;
    let mover = m.player_to_move().map(|p| p.member_id);
    match command {
        Input::Move(mv) => {
            let member = mover.ok_or_else(|| anyhow::anyhow!("Nobody is to move"))?;
            match service.take_turn(id, member, mv.start, mv.end)? {
                TurnOutcome::Rejected(violations) => {
                    for v in violations {
                        println!("{}", v);
                    }
                }
                TurnOutcome::Moved { check, promotion } => {
                    println!("\n{}", service.get_match(id)?.board());
                    if let Some(square) = promotion {
                        println!("Pawn promoted to queen on {} (use 'promote' to pick another piece)", square);
                    }
                    if check {
                        println!("Check!");
                    }
                }
                TurnOutcome::Checkmate { winner } => {
                    println!("\n{}", service.get_match(id)?.board());
                    println!("Checkmate, {} wins.", winner);
                }
                TurnOutcome::Stalemate => {
                    println!("\n{}", service.get_match(id)?.board());
                    println!("Stalemate.");
                }
            }
        }
        Input::Resign => {
            let member = mover.ok_or_else(|| anyhow::anyhow!("Nobody is to move"))?;
            service.resign(id, member)?;
        }
        Input::Draw => service.draw(id, true)?,
        Input::Promote(square, kind) => {
            service.promote_piece(id, square, kind)?;
            println!("\n{}", service.get_match(id)?.board());
        }
        Input::Board => println!("\n{}", m.board()),
        Input::Help => println!("{}", HELP),
        Input::Quit => {}
    }
    Ok(())
}

/// Prints who is to move. Returns false once the match is over.
fn prompt(service: &MatchService, id: MatchId) -> anyhow::Result<bool> {
    let m = service.get_match(id)?;
    match (m.result(), m.color_to_move()) {
        (Some(result), _) => {
            println!("Match over: {}", result);
            Ok(false)
        }
        (None, Some(color)) => {
            println!("{} to move:", color);
            Ok(true)
        }
        (None, None) => Ok(false),
    }
}
