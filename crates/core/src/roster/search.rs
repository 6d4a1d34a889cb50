use serde::{Deserialize, Serialize};

use crate::{
    error::RosterError,
    models::{ClubId, PlayerRef},
};

use super::store::RosterStore;

/// Ways to look a player up across the whole league.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerQuery {
    /// Exact name match, ignoring case.
    Name(String),
    /// Exact kit number match.
    Kit(i32),
}

impl RosterStore {
    /// Find the first player matching `query`, scanning clubs in enrollment
    /// order and players in registration order.
    pub fn search_player(&self, query: &PlayerQuery) -> Result<PlayerRef, RosterError> {
        if self.is_empty() {
            return Err(RosterError::NoClubsEnrolled);
        }

        let needle = match query {
            PlayerQuery::Name(name) => name.to_lowercase(),
            PlayerQuery::Kit(_) => String::new(),
        };

        self.clubs()
            .iter()
            .enumerate()
            .flat_map(|(club_idx, club)| {
                club.players()
                    .iter()
                    .enumerate()
                    .map(move |(slot, player)| (club_idx, slot, player))
            })
            .find(|(_, _, player)| match query {
                PlayerQuery::Name(_) => player.name.to_lowercase() == needle,
                PlayerQuery::Kit(kit) => player.kit_number == *kit,
            })
            .map(|(club_idx, slot, _)| PlayerRef {
                club: ClubId(club_idx),
                slot,
            })
            .ok_or(RosterError::PlayerNotFound)
    }
}
