//! Event-sourced chess matches.
//!
//! A [`Match`] is rebuilt from its [`DomainEvent`]s and accepts commands
//! (start, take a turn, resign, draw, promote) that each raise at most one
//! new event. Moves are judged by the rule pipeline in `chess-engine`.
//!
//! # Modules
//!
//! - [`events`] - the four domain events and their stored encoding
//! - [`projection`] - match state folded from events
//! - [`aggregate`] - command handling
//! - [`store`] - event and summary store traits, with in-memory versions
//! - [`repository`] - loading and saving aggregates
//! - [`clock`] - the per-turn deadline
//! - [`config`] - `chess-match.toml` loading
//! - [`service`] - the application service wiring it all together
//!
//! # Example
//!
//! ```
//! use chess_core::Square;
//! use chess_match::{Match, MatchId, MemberId, TurnOutcome};
//!
//! let mut game = Match::new(MatchId::new());
//! game.start(MemberId::new(), MemberId::new()).unwrap();
//!
//! let white = game.player_to_move().unwrap().member_id;
//! let e2 = Square::from_algebraic("e2").unwrap();
//! let e4 = Square::from_algebraic("e4").unwrap();
//! let outcome = game.take_turn(white, e2, e4).unwrap();
//! assert!(matches!(outcome, TurnOutcome::Moved { check: false, .. }));
//! assert_eq!(game.version(), 2);
//! ```

pub mod aggregate;
pub mod clock;
pub mod config;
pub mod error;
pub mod events;
mod ids;
pub mod projection;
pub mod repository;
pub mod service;
pub mod store;

pub use aggregate::{Match, TurnOutcome};
pub use clock::{TurnClock, TurnExpired};
pub use config::{ConfigError, MatchConfig};
pub use error::{MatchError, StoreError};
pub use events::{DomainEvent, EndReason, MatchResult, StoredEvent};
pub use ids::{MatchId, MemberId};
pub use projection::{project, MatchStatus, Player, Projection};
pub use repository::MatchRepository;
pub use service::MatchService;
pub use store::{
    EventStore, InMemoryEventStore, InMemoryMatchSummaryStore, MatchSummary, MatchSummaryStore,
};
