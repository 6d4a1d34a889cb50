//! Read-only statistics over the roster.

use serde::Serialize;

use crate::{
    error::RosterError,
    models::{Club, ClubId},
    roster::RosterStore,
};

/// One player's row in a club report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerLine {
    /// Player name.
    pub name: String,
    /// Kit number.
    pub kit_number: i32,
    /// Age derived from the reference year.
    pub age: i32,
    /// Current position.
    pub position: String,
}

/// Aggregates for a single club.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClubStatistics {
    /// Club handle.
    pub club: ClubId,
    /// Club name.
    pub name: String,
    /// Number of registered players.
    pub player_count: usize,
    /// Mean player age, or `None` when the club has no players.
    pub average_age: Option<f64>,
    /// Per-player rows in registration order.
    pub players: Vec<PlayerLine>,
}

impl ClubStatistics {
    fn collect(id: ClubId, club: &Club, reference_year: i32) -> Self {
        let players: Vec<PlayerLine> = club
            .players()
            .iter()
            .map(|player| PlayerLine {
                name: player.name.clone(),
                kit_number: player.kit_number,
                age: player.age(reference_year),
                position: player.position.clone(),
            })
            .collect();

        let average_age = if players.is_empty() {
            None
        } else {
            let total: i64 = players.iter().map(|line| i64::from(line.age)).sum();
            Some(total as f64 / players.len() as f64)
        };

        Self {
            club: id,
            name: club.name.clone(),
            player_count: players.len(),
            average_age,
            players,
        }
    }

    /// Whether the club has nobody registered yet.
    pub fn is_empty(&self) -> bool {
        self.player_count == 0
    }
}

impl RosterStore {
    /// Statistics for one club.
    pub fn club_statistics(&self, club: ClubId) -> Result<ClubStatistics, RosterError> {
        if self.is_empty() {
            return Err(RosterError::NoClubsEnrolled);
        }
        let entry = self.club(club).ok_or(RosterError::InvalidClubSelection {
            number: club.menu_number(),
        })?;
        Ok(ClubStatistics::collect(
            club,
            entry,
            self.config().reference_year,
        ))
    }

    /// Statistics for every club, in enrollment order.
    pub fn league_statistics(&self) -> Result<Vec<ClubStatistics>, RosterError> {
        if self.is_empty() {
            return Err(RosterError::NoClubsEnrolled);
        }
        let reference_year = self.config().reference_year;
        Ok(self
            .clubs()
            .iter()
            .enumerate()
            .map(|(idx, club)| ClubStatistics::collect(ClubId(idx), club, reference_year))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::DateOfBirth,
        roster::{NewPlayer, PlayerQuery},
    };
    use anyhow::Result;
    use serde_json::json;

    fn player(name: &str, kit_number: i32, year: i32) -> NewPlayer {
        NewPlayer {
            name: name.to_string(),
            kit_number,
            position: "Forward".to_string(),
            date_of_birth: DateOfBirth::new(1, 1, year),
        }
    }

    #[test]
    fn empty_club_has_no_average() -> Result<()> {
        let mut store = RosterStore::default();
        let club = store.enroll_club("Reds")?;
        let stats = store.club_statistics(club)?;
        assert!(stats.is_empty());
        assert_eq!(stats.average_age, None);
        assert!(stats.players.is_empty());
        Ok(())
    }

    #[test]
    fn average_is_arithmetic_mean() -> Result<()> {
        let mut store = RosterStore::default();
        let club = store.enroll_club("Reds")?;
        store.add_player(club, player("Twenty", 1, 2004))?;
        store.add_player(club, player("Thirty", 2, 1994))?;
        let stats = store.club_statistics(club)?;
        assert_eq!(stats.player_count, 2);
        assert_eq!(stats.average_age, Some(25.0));
        assert_eq!(stats.players[0].age, 20);
        assert_eq!(stats.players[1].age, 30);
        Ok(())
    }

    #[test]
    fn errors_for_missing_clubs() -> Result<()> {
        let mut store = RosterStore::default();
        assert_eq!(
            store.club_statistics(ClubId(0)),
            Err(RosterError::NoClubsEnrolled)
        );
        assert_eq!(store.league_statistics(), Err(RosterError::NoClubsEnrolled));
        store.enroll_club("Reds")?;
        assert_eq!(
            store.club_statistics(ClubId(3)),
            Err(RosterError::InvalidClubSelection { number: 4 })
        );
        Ok(())
    }

    #[test]
    fn league_report_follows_enrollment_order() -> Result<()> {
        let mut store = RosterStore::default();
        let reds = store.enroll_club("Reds")?;
        store.enroll_club("Blues")?;
        store.add_player(reds, player("Sam", 7, 2000))?;

        let report = store.league_statistics()?;
        let names: Vec<_> = report.iter().map(|stats| stats.name.as_str()).collect();
        assert_eq!(names, ["Reds", "Blues"]);
        assert_eq!(report[0].player_count, 1);
        assert!(report[1].is_empty());
        Ok(())
    }

    #[test]
    fn full_scenario() -> Result<()> {
        let mut store = RosterStore::default();
        let reds = store.enroll_club("Reds")?;
        let sam = store.add_player(
            reds,
            NewPlayer {
                name: "Sam".to_string(),
                kit_number: 7,
                position: "Forward".to_string(),
                date_of_birth: DateOfBirth::new(1, 1, 2000),
            },
        )?;
        assert_eq!(store.player(sam).map(|p| p.age(2024)), Some(24));

        let err = store.add_player(reds, player("Other", 7, 2000)).unwrap_err();
        assert!(matches!(err, RosterError::DuplicatePlayer { .. }));

        let found = store.search_player(&PlayerQuery::Kit(7))?;
        assert_eq!(store.player(found).map(|p| p.name.as_str()), Some("Sam"));

        store.update_player_position(found, "Midfielder")?;
        let found = store.search_player(&PlayerQuery::Kit(7))?;
        assert_eq!(
            store.player(found).map(|p| p.position.as_str()),
            Some("Midfielder")
        );

        let stats = store.club_statistics(reds)?;
        assert_eq!(stats.player_count, 1);
        assert_eq!(stats.average_age, Some(24.0));
        Ok(())
    }

    #[test]
    fn statistics_serialize_for_frontends() -> Result<()> {
        let mut store = RosterStore::default();
        let reds = store.enroll_club("Reds")?;
        store.add_player(reds, player("Sam", 7, 2000))?;
        let value = serde_json::to_value(store.club_statistics(reds)?)?;
        assert_eq!(
            value,
            json!({
                "club": 0,
                "name": "Reds",
                "player_count": 1,
                "average_age": 24.0,
                "players": [
                    { "name": "Sam", "kit_number": 7, "age": 24, "position": "Forward" }
                ]
            })
        );
        Ok(())
    }
}
