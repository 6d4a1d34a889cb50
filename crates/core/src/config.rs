//! Application configuration: league limits plus shell settings.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use chrono::{Datelike, Local};
use serde::{Deserialize, Serialize};

/// Directory under the user's config dir holding `config.toml`.
pub const CONFIG_DIR: &str = "league-desk";
/// Prefix for environment overrides, e.g. `ROSTER__LEAGUE__MAX_CLUBS=4`.
pub const ENV_PREFIX: &str = "ROSTER";

const DEFAULT_CONFIG_TOML: &str = r#"# League Desk configuration.
# Every key is optional; missing keys fall back to the built-in defaults.

log_dir = "logs"
log_filter = "info"

[league]
max_clubs = 10
max_players_per_club = 15
kit_number_range = [1, 99]
age_range = [16, 45]
reference_year = 2024
# Set to true to derive ages against the current calendar year instead.
use_system_year = false
club_name_max_len = 20
player_name_max_len = 25
position_max_len = 20
"#;

/// Closed integer interval `[min, max]`, written as a two element array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "[i32; 2]", into = "[i32; 2]")]
pub struct Bounds {
    /// Smallest accepted value.
    pub min: i32,
    /// Largest accepted value.
    pub max: i32,
}

impl Bounds {
    /// Build a new interval.
    pub const fn new(min: i32, max: i32) -> Self {
        Self { min, max }
    }

    /// Whether `value` lies inside the interval, both ends included.
    pub fn contains(&self, value: i32) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

impl From<[i32; 2]> for Bounds {
    fn from([min, max]: [i32; 2]) -> Self {
        Self { min, max }
    }
}

impl From<Bounds> for [i32; 2] {
    fn from(bounds: Bounds) -> Self {
        [bounds.min, bounds.max]
    }
}

/// Limits and reference values enforced by the roster store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LeagueConfig {
    /// Maximum number of clubs in the league.
    pub max_clubs: usize,
    /// Maximum number of players per club.
    pub max_players_per_club: usize,
    /// Accepted kit numbers.
    pub kit_number_range: Bounds,
    /// Accepted player ages at registration.
    pub age_range: Bounds,
    /// Year ages are derived against.
    pub reference_year: i32,
    /// Replace `reference_year` with the current year when loading.
    pub use_system_year: bool,
    /// Maximum club name length in characters.
    pub club_name_max_len: usize,
    /// Maximum player name length in characters.
    pub player_name_max_len: usize,
    /// Maximum position length in characters.
    pub position_max_len: usize,
}

impl Default for LeagueConfig {
    fn default() -> Self {
        Self {
            max_clubs: 10,
            max_players_per_club: 15,
            kit_number_range: Bounds::new(1, 99),
            age_range: Bounds::new(16, 45),
            reference_year: 2024,
            use_system_year: false,
            club_name_max_len: 20,
            player_name_max_len: 25,
            position_max_len: 20,
        }
    }
}

impl LeagueConfig {
    /// Reject settings the store cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.max_clubs == 0 {
            bail!("league.max_clubs must be at least 1");
        }
        if self.max_players_per_club == 0 {
            bail!("league.max_players_per_club must be at least 1");
        }
        for (key, bounds) in [
            ("kit_number_range", self.kit_number_range),
            ("age_range", self.age_range),
        ] {
            if bounds.min > bounds.max {
                bail!(
                    "league.{key} is inverted: {} > {}",
                    bounds.min,
                    bounds.max
                );
            }
        }
        for (key, len) in [
            ("club_name_max_len", self.club_name_max_len),
            ("player_name_max_len", self.player_name_max_len),
            ("position_max_len", self.position_max_len),
        ] {
            if len == 0 {
                bail!("league.{key} must be at least 1");
            }
        }
        Ok(())
    }

    fn resolve_reference_year(&mut self) {
        if self.use_system_year {
            self.reference_year = Local::now().year();
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Roster limits.
    pub league: LeagueConfig,
    /// Directory the shell writes `league.log` into.
    pub log_dir: PathBuf,
    /// Default `tracing` filter directive when `RUST_LOG` is unset.
    pub log_filter: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            league: LeagueConfig::default(),
            log_dir: PathBuf::from("logs"),
            log_filter: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Load from the default config file plus environment overrides.
    pub fn load() -> Result<Self> {
        Self::load_layers(Some(&config_path()), Some(env_overrides()))
    }

    /// Load from an explicit file, ignoring the environment.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        Self::load_layers(Some(path.as_ref()), None)
    }

    fn load_layers(path: Option<&Path>, env: Option<config::Environment>) -> Result<Self> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(
                config::File::from(path.to_path_buf())
                    .format(config::FileFormat::Toml)
                    .required(false),
            );
        }
        if let Some(env) = env {
            builder = builder.add_source(env);
        }

        let mut loaded: AppConfig = builder
            .build()
            .context("failed to read configuration")?
            .try_deserialize()
            .context("failed to parse configuration")?;
        loaded.league.resolve_reference_year();
        loaded
            .league
            .validate()
            .context("invalid league configuration")?;
        Ok(loaded)
    }
}

/// `ROSTER__SECTION__KEY` overrides, layered above the file.
fn env_overrides() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .separator("__")
        .try_parsing(true)
}

/// Location of the user's config file.
pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_DIR)
        .join("config.toml")
}

/// Write the commented default config if no file exists yet.
pub fn ensure_default_config() -> Result<PathBuf> {
    let path = config_path();
    write_default_config(&path)?;
    Ok(path)
}

fn write_default_config(path: &Path) -> Result<()> {
    if path.exists() {
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    fs::write(path, DEFAULT_CONFIG_TOML)
        .with_context(|| format!("failed to write {}", path.display()))
}
