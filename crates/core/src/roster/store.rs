use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    config::LeagueConfig,
    error::RosterError,
    models::{Club, ClubId, DateOfBirth, Player, PlayerRef},
};

/// Values collected for a new registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPlayer {
    /// Full name.
    pub name: String,
    /// Requested kit number.
    pub kit_number: i32,
    /// Preferred position.
    pub position: String,
    /// Date of birth.
    pub date_of_birth: DateOfBirth,
}

/// Owns every club and player for one session.
///
/// All writes check their preconditions first, so a refused call leaves the
/// store exactly as it was.
#[derive(Debug, Clone)]
pub struct RosterStore {
    config: LeagueConfig,
    clubs: Vec<Club>,
}

impl Default for RosterStore {
    fn default() -> Self {
        Self::new(LeagueConfig::default())
    }
}

impl RosterStore {
    /// Create an empty league governed by `config`.
    pub fn new(config: LeagueConfig) -> Self {
        Self {
            config,
            clubs: Vec::new(),
        }
    }

    /// Limits in force for this store.
    pub fn config(&self) -> &LeagueConfig {
        &self.config
    }

    /// Enrolled clubs in enrollment order.
    pub fn clubs(&self) -> &[Club] {
        &self.clubs
    }

    /// Whether no club has been enrolled yet.
    pub fn is_empty(&self) -> bool {
        self.clubs.is_empty()
    }

    /// Number of enrolled clubs.
    pub fn club_count(&self) -> usize {
        self.clubs.len()
    }

    /// Number of players across every club.
    pub fn total_players(&self) -> usize {
        self.clubs.iter().map(Club::player_count).sum()
    }

    /// Resolve a club handle.
    pub fn club(&self, id: ClubId) -> Option<&Club> {
        self.clubs.get(id.0)
    }

    /// Resolve a player reference.
    pub fn player(&self, player: PlayerRef) -> Option<&Player> {
        self.club(player.club)?.players.get(player.slot)
    }

    /// Append a new club with an empty roster.
    pub fn enroll_club(&mut self, name: impl Into<String>) -> Result<ClubId, RosterError> {
        let name = name.into();
        self.check_enrollment(&name)
            .inspect_err(|err| debug!(club = %name, reason = %err, "Enrollment refused"))?;

        let id = ClubId(self.clubs.len());
        self.clubs.push(Club::new(name));
        info!(club = %self.clubs[id.0].name, number = id.menu_number(), "Club enrolled");
        Ok(id)
    }

    /// Check that `club` exists and can take another player.
    ///
    /// These are the checks [`add_player`](Self::add_player) runs before it
    /// looks at any player field, exposed so a frontend can refuse early.
    pub fn ensure_room(&self, club: ClubId) -> Result<&Club, RosterError> {
        if self.clubs.is_empty() {
            return Err(RosterError::NoClubsEnrolled);
        }
        let target = self
            .clubs
            .get(club.0)
            .ok_or(RosterError::InvalidClubSelection {
                number: club.menu_number(),
            })?;
        if target.player_count() >= self.config.max_players_per_club {
            return Err(RosterError::ClubFull {
                club: target.name.clone(),
                max: self.config.max_players_per_club,
            });
        }
        Ok(target)
    }

    /// Register a player with a club.
    ///
    /// Checks run in a fixed order and the first failure is returned: league
    /// empty, unknown club, club full, name, kit number, position, age, and
    /// finally name/kit uniqueness within the club.
    pub fn add_player(
        &mut self,
        club: ClubId,
        player: NewPlayer,
    ) -> Result<PlayerRef, RosterError> {
        if let Err(err) = self.check_registration(club, &player) {
            debug!(
                club = club.menu_number(),
                player = %player.name,
                kit_number = player.kit_number,
                reason = %err,
                "Registration refused"
            );
            return Err(err);
        }

        let club_entry = &mut self.clubs[club.0];
        let slot = club_entry.players.len();
        info!(
            club = %club_entry.name,
            player = %player.name,
            kit_number = player.kit_number,
            "Player added"
        );
        club_entry.players.push(Player {
            name: player.name,
            kit_number: player.kit_number,
            date_of_birth: player.date_of_birth,
            position: player.position,
        });
        Ok(PlayerRef { club, slot })
    }

    /// Replace a player's position. No other field is touched.
    pub fn update_player_position(
        &mut self,
        player: PlayerRef,
        position: impl Into<String>,
    ) -> Result<(), RosterError> {
        let position = position.into();
        if self.player(player).is_none() {
            debug!(?player, "Position update refused: unknown player");
            return Err(RosterError::InvalidPlayerReference);
        }
        check_position(&position, &self.config).inspect_err(|err| {
            debug!(?player, position = %position, reason = %err, "Position update refused")
        })?;

        let entry = &mut self.clubs[player.club.0].players[player.slot];
        info!(
            player = %entry.name,
            from = %entry.position,
            to = %position,
            "Position updated"
        );
        entry.position = position;
        Ok(())
    }

    fn check_enrollment(&self, name: &str) -> Result<(), RosterError> {
        if self.clubs.len() >= self.config.max_clubs {
            return Err(RosterError::LeagueFull {
                max: self.config.max_clubs,
            });
        }
        check_text(name, "Club name", self.config.club_name_max_len, |len, max| {
            RosterError::NameTooLong { len, max }
        })
    }

    fn check_registration(&self, club: ClubId, player: &NewPlayer) -> Result<(), RosterError> {
        let target = self.ensure_room(club)?;
        validate_fields(target, player, &self.config)
    }
}

fn validate_fields(
    club: &Club,
    player: &NewPlayer,
    config: &LeagueConfig,
) -> Result<(), RosterError> {
    check_text(&player.name, "Player name", config.player_name_max_len, |len, max| {
        RosterError::PlayerNameTooLong { len, max }
    })?;
    let kits = config.kit_number_range;
    if !kits.contains(player.kit_number) {
        return Err(RosterError::InvalidKitNumber {
            kit_number: player.kit_number,
            min: kits.min,
            max: kits.max,
        });
    }
    check_position(&player.position, config)?;
    let age = player.date_of_birth.age_in(config.reference_year);
    if !config.age_range.contains(age) {
        return Err(RosterError::InvalidAge {
            age,
            min: config.age_range.min,
            max: config.age_range.max,
        });
    }
    if club.has_conflict(&player.name, player.kit_number) {
        return Err(RosterError::DuplicatePlayer {
            club: club.name.clone(),
        });
    }
    Ok(())
}

fn check_position(position: &str, config: &LeagueConfig) -> Result<(), RosterError> {
    check_text(position, "Position", config.position_max_len, |len, max| {
        RosterError::PositionTooLong { len, max }
    })
}

fn check_text(
    value: &str,
    field: &'static str,
    max: usize,
    too_long: impl FnOnce(usize, usize) -> RosterError,
) -> Result<(), RosterError> {
    if value.trim().is_empty() {
        return Err(RosterError::EmptyField(field));
    }
    let len = value.chars().count();
    if len > max {
        return Err(too_long(len, max));
    }
    Ok(())
}
