#![warn(clippy::all, missing_docs)]

//! Core domain logic for League Desk.
//!
//! This crate hosts the club and player models, the roster store that
//! enforces league limits, the statistics report, and configuration
//! handling used by the terminal UI and any future frontends.

pub mod config;
pub mod error;
pub mod models;
pub mod report;
pub mod roster;

pub use config::{AppConfig, LeagueConfig};
pub use error::{ErrorKind, RosterError};
pub use models::{Club, ClubId, DateOfBirth, Player, PlayerRef};
pub use report::{ClubStatistics, PlayerLine};
pub use roster::{NewPlayer, PlayerQuery, RosterStore};
