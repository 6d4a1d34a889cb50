//! Shared domain models.

use serde::{Deserialize, Serialize};

/// Handle for an enrolled club: its position in enrollment order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ClubId(pub usize);

impl ClubId {
    /// Convert a 1-based menu choice into a handle.
    ///
    /// `0` maps to an index no store will ever hold, so it is rejected like
    /// any other out-of-range choice.
    pub fn from_menu_number(number: usize) -> Self {
        Self(number.wrapping_sub(1))
    }

    /// The 1-based number shown in club listings.
    pub fn menu_number(&self) -> usize {
        self.0.wrapping_add(1)
    }
}

/// Handle for a registered player: its club plus its slot in that club.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerRef {
    /// Owning club.
    pub club: ClubId,
    /// Index within the club's roster.
    pub slot: usize,
}

/// Birth date as entered. Only the year takes part in age derivation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateOfBirth {
    /// Day of month.
    pub day: i32,
    /// Month of year.
    pub month: i32,
    /// Four digit year.
    pub year: i32,
}

impl DateOfBirth {
    /// Build a date from its parts without calendar checks.
    pub const fn new(day: i32, month: i32, year: i32) -> Self {
        Self { day, month, year }
    }

    /// Age in whole years relative to `reference_year`.
    ///
    /// Saturates at the `i32` limits, so absurd years come out as an age no
    /// configured range accepts.
    pub fn age_in(&self, reference_year: i32) -> i32 {
        reference_year.saturating_sub(self.year)
    }
}

impl std::fmt::Display for DateOfBirth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}/{:02}/{:04}", self.day, self.month, self.year)
    }
}

/// One roster entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    /// Full name, unique (case-sensitive) within the club.
    pub name: String,
    /// Shirt number, unique within the club.
    pub kit_number: i32,
    /// Date of birth.
    pub date_of_birth: DateOfBirth,
    /// Preferred position; the only field that changes after registration.
    pub position: String,
}

impl Player {
    /// Derived age against the given reference year.
    pub fn age(&self, reference_year: i32) -> i32 {
        self.date_of_birth.age_in(reference_year)
    }
}

/// A team and its roster, in registration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Club {
    /// Club name.
    pub name: String,
    pub(crate) players: Vec<Player>,
}

impl Club {
    pub(crate) fn new(name: String) -> Self {
        Self {
            name,
            players: Vec::new(),
        }
    }

    /// Registered players in insertion order.
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    /// Number of registered players.
    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    /// Whether a player already uses `name` (exact case) or `kit_number`.
    pub fn has_conflict(&self, name: &str, kit_number: i32) -> bool {
        self.players
            .iter()
            .any(|player| player.name == name || player.kit_number == kit_number)
    }
}
