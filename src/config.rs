use std::path::PathBuf;

use figment::{providers::Env, Figment};
use serde::{Deserialize, Deserializer};
use tracing::warn;

use crate::scene::{GameMode, ScoreTiming};

/// The acting player for ledger operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerConfig {
    pub id: String,
    pub name: Option<String>,
}

/// Main application configuration
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "RawConfig")]
pub struct Config {
    /// Mode new sessions start in
    pub mode: GameMode,
    /// Seed for the gameplay RNG - if None, seeded from entropy
    pub seed: Option<u64>,
    /// How score accumulates over time
    pub score_timing: ScoreTiming,
    /// Directory holding the game's image assets
    pub asset_dir: PathBuf,
    /// Acting player - if None, ledger operations are rejected
    pub player: Option<PlayerConfig>,
    /// Notification channels informed of new personal bests
    pub high_score_subscribers: Vec<u64>,
    /// Age after which pending challenges fail - if None, challenges never expire
    pub challenge_ttl: Option<time::Duration>,
    /// Number of sessions the headless driver plays before exiting
    pub sessions: u32,
    /// Whether the headless driver steers the dinosaur itself
    pub autopilot: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mode: GameMode::default(),
            seed: None,
            score_timing: ScoreTiming::default(),
            asset_dir: default_asset_dir(),
            player: None,
            high_score_subscribers: Vec::new(),
            challenge_ttl: None,
            sessions: default_sessions(),
            autopilot: true,
        }
    }
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Player configuration is incomplete: DINO_PLAYER_NAME is set but DINO_PLAYER_ID is missing")]
    PlayerNameWithoutId,

    #[error("DINO_SESSIONS must be at least 1")]
    NoSessions,
}

/// Raw configuration loaded directly from environment variables
/// This is an intermediate representation that gets validated and converted to Config
#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    #[serde(default)]
    mode: GameMode,
    seed: Option<u64>,
    #[serde(default)]
    score_timing: ScoreTiming,
    #[serde(default = "default_asset_dir")]
    asset_dir: PathBuf,

    // Player
    #[serde(default, deserialize_with = "deserialize_optional_string_from_any")]
    player_id: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string_from_any")]
    player_name: Option<String>,

    // Ledger
    #[serde(default, deserialize_with = "deserialize_optional_string_from_any")]
    high_score_subscribers: Option<String>,
    challenge_ttl_hours: Option<u32>,

    // Driver
    #[serde(default = "default_sessions")]
    sessions: u32,
    #[serde(default = "default_autopilot")]
    autopilot: bool,
}

impl TryFrom<RawConfig> for Config {
    type Error = ConfigError;

    fn try_from(raw: RawConfig) -> Result<Self, Self::Error> {
        let player = match (raw.player_id, raw.player_name) {
            (Some(id), name) => Some(PlayerConfig { id, name }),
            (None, Some(_)) => return Err(ConfigError::PlayerNameWithoutId),
            (None, None) => None,
        };

        if raw.sessions == 0 {
            return Err(ConfigError::NoSessions);
        }

        Ok(Config {
            mode: raw.mode,
            seed: raw.seed,
            score_timing: raw.score_timing,
            asset_dir: raw.asset_dir,
            player,
            high_score_subscribers: raw
                .high_score_subscribers
                .as_deref()
                .map(parse_channel_list)
                .unwrap_or_default(),
            challenge_ttl: raw.challenge_ttl_hours.map(|hours| time::Duration::hours(hours.into())),
            sessions: raw.sessions,
            autopilot: raw.autopilot,
        })
    }
}

/// Parses a comma-separated list of numeric channel ids, skipping anything that isn't one.
fn parse_channel_list(list: &str) -> Vec<u64> {
    list.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .filter_map(|entry| match entry.parse::<u64>() {
            Ok(id) => Some(id),
            Err(_) => {
                warn!(entry, "Ignoring non-numeric high score subscriber");
                None
            }
        })
        .collect()
}

/// Environment values that look like numbers arrive as numbers; ids and names are kept as text.
fn deserialize_optional_string_from_any<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrNumber {
        String(String),
        Unsigned(u64),
        Signed(i64),
        Float(f64),
    }

    let value: Option<StringOrNumber> = Option::deserialize(deserializer)?;
    Ok(value.map(|value| match value {
        StringOrNumber::String(s) => s,
        StringOrNumber::Unsigned(n) => n.to_string(),
        StringOrNumber::Signed(n) => n.to_string(),
        StringOrNumber::Float(n) => n.to_string(),
    }))
}

fn default_asset_dir() -> PathBuf {
    PathBuf::from("assets/game")
}

fn default_sessions() -> u32 {
    1
}

fn default_autopilot() -> bool {
    true
}

/// Loads configuration from `DINO_`-prefixed environment variables.
pub fn load_config() -> Result<Config, figment::Error> {
    Figment::new().merge(Env::prefixed("DINO_")).extract()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.mode, GameMode::Solo);
        assert_eq!(config.score_timing, ScoreTiming::PerFrame);
        assert_eq!(config.asset_dir, PathBuf::from("assets/game"));
        assert!(config.player.is_none());
        assert!(config.challenge_ttl.is_none());
        assert_eq!(config.sessions, 1);
        assert!(config.autopilot);
    }

    #[test]
    fn test_raw_defaults_match_default_config() {
        let raw = RawConfig {
            asset_dir: default_asset_dir(),
            sessions: default_sessions(),
            autopilot: default_autopilot(),
            ..RawConfig::default()
        };
        assert_eq!(Config::try_from(raw), Ok(Config::default()));
    }

    #[test]
    fn test_player_group() {
        let raw = RawConfig {
            player_id: Some("42".to_string()),
            player_name: Some("rex".to_string()),
            sessions: 1,
            ..RawConfig::default()
        };
        let config = Config::try_from(raw).unwrap();
        assert_eq!(
            config.player,
            Some(PlayerConfig {
                id: "42".to_string(),
                name: Some("rex".to_string())
            })
        );
    }

    #[test]
    fn test_player_name_without_id_is_rejected() {
        let raw = RawConfig {
            player_name: Some("rex".to_string()),
            sessions: 1,
            ..RawConfig::default()
        };
        assert_eq!(Config::try_from(raw), Err(ConfigError::PlayerNameWithoutId));
    }

    #[test]
    fn test_zero_sessions_is_rejected() {
        let raw = RawConfig::default();
        assert_eq!(Config::try_from(raw), Err(ConfigError::NoSessions));
    }

    #[test]
    fn test_challenge_ttl_hours() {
        let raw = RawConfig {
            challenge_ttl_hours: Some(48),
            sessions: 1,
            ..RawConfig::default()
        };
        let config = Config::try_from(raw).unwrap();
        assert_eq!(config.challenge_ttl, Some(time::Duration::hours(48)));
    }

    #[test]
    fn test_parse_channel_list() {
        assert_eq!(parse_channel_list("1, 22,333"), vec![1, 22, 333]);
        assert_eq!(parse_channel_list("7,0xabc,,8"), vec![7, 8]);
        assert!(parse_channel_list("").is_empty());
    }
}
