#![allow(missing_docs)]

//! Domain errors reported by the roster store.

use serde::Serialize;
use thiserror::Error;

/// Broad category of a [`RosterError`], used by frontends that only care
/// about the class of failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ErrorKind {
    /// The league or a club has no room left.
    CapacityExceeded,
    /// A supplied value is out of range or too long.
    ValidationFailed,
    /// The player's name or kit number is already taken in the club.
    DuplicatePlayer,
    /// A club handle or player reference does not resolve.
    InvalidSelection,
    /// A search matched nothing.
    NotFound,
    /// The operation needs at least one enrolled club.
    NoClubsEnrolled,
}

/// Every way a roster operation can be refused.
///
/// None of these are fatal: the store is unchanged and usable afterwards.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RosterError {
    #[error("Club limit reached ({max}). Enrollment not possible.")]
    LeagueFull { max: usize },

    #[error("Club '{club}' is at capacity ({max}). No more players can be added.")]
    ClubFull { club: String, max: usize },

    #[error("Club name exceeds the limit of {max} characters (got {len}).")]
    NameTooLong { len: usize, max: usize },

    #[error("Player name exceeds the limit of {max} characters (got {len}).")]
    PlayerNameTooLong { len: usize, max: usize },

    #[error("Position exceeds the limit of {max} characters (got {len}).")]
    PositionTooLong { len: usize, max: usize },

    #[error("{0} cannot be empty.")]
    EmptyField(&'static str),

    #[error("Invalid kit number {kit_number}. Range: {min} - {max}.")]
    InvalidKitNumber { kit_number: i32, min: i32, max: i32 },

    #[error("Invalid date of birth: age {age} is outside {min} - {max} years.")]
    InvalidAge { age: i32, min: i32, max: i32 },

    #[error("Duplicate entry in '{club}': player name or kit number must be unique.")]
    DuplicatePlayer { club: String },

    #[error("No clubs enrolled. Enroll a club to proceed.")]
    NoClubsEnrolled,

    #[error("Invalid club selection #{number}.")]
    InvalidClubSelection { number: usize },

    #[error("Player reference no longer points at a player.")]
    InvalidPlayerReference,

    #[error("Player not found.")]
    PlayerNotFound,
}

impl RosterError {
    /// Category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            RosterError::LeagueFull { .. } | RosterError::ClubFull { .. } => {
                ErrorKind::CapacityExceeded
            }
            RosterError::NameTooLong { .. }
            | RosterError::PlayerNameTooLong { .. }
            | RosterError::PositionTooLong { .. }
            | RosterError::EmptyField(_)
            | RosterError::InvalidKitNumber { .. }
            | RosterError::InvalidAge { .. } => ErrorKind::ValidationFailed,
            RosterError::DuplicatePlayer { .. } => ErrorKind::DuplicatePlayer,
            RosterError::InvalidClubSelection { .. } | RosterError::InvalidPlayerReference => {
                ErrorKind::InvalidSelection
            }
            RosterError::PlayerNotFound => ErrorKind::NotFound,
            RosterError::NoClubsEnrolled => ErrorKind::NoClubsEnrolled,
        }
    }
}
