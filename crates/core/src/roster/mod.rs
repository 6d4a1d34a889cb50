//! The roster store and its lookups.

/// Player search across every club.
pub mod search;
/// Club and player storage with invariant checks.
pub mod store;

pub use search::PlayerQuery;
pub use store::{NewPlayer, RosterStore};
