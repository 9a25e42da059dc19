//! Table settings resolved from defaults, an optional TOML file and
//! environment overrides, in that order.
//!
//! | Setting                | File key               | Environment            |
//! |------------------------|------------------------|------------------------|
//! | starting stack         | `starting_stack`       | `FELT_STARTING_STACK`  |
//! | small blind            | `small_blind`          | `FELT_SMALL_BLIND`     |
//! | big blind              | `big_blind`            | `FELT_BIG_BLIND`       |
//! | equity rollouts        | `rollouts`             | `FELT_ROLLOUTS`        |
//! | idle timeout (seconds) | `session_timeout_secs` | `FELT_SESSION_TIMEOUT` |
//! | seed                   | `seed`                 | `FELT_SEED`            |
//!
//! The file is read from the path in `FELT_CONFIG`.

use std::fs;
use std::str::FromStr;
use std::time::Duration;

use felt_engine::equity::DEFAULT_ROLLOUTS;
use felt_engine::player::STARTING_STACK;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const CONFIG_ENV: &str = "FELT_CONFIG";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TableSettings {
    pub starting_stack: u32,
    pub small_blind: u32,
    pub big_blind: u32,
    /// Monte Carlo trials per opponent decision
    pub rollouts: usize,
    /// Idle games are evicted after this many seconds
    pub session_timeout_secs: u64,
    pub seed: Option<u64>,
}

impl Default for TableSettings {
    fn default() -> Self {
        Self {
            starting_stack: STARTING_STACK,
            small_blind: 5,
            big_blind: 10,
            rollouts: DEFAULT_ROLLOUTS,
            session_timeout_secs: 30 * 60,
            seed: None,
        }
    }
}

impl TableSettings {
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.small_blind == 0 || self.big_blind == 0 {
            return Err(SettingsError::Invalid("blinds must be greater than 0".into()));
        }
        if self.small_blind > self.big_blind {
            return Err(SettingsError::Invalid(
                "small_blind must not exceed big_blind".into(),
            ));
        }
        if self.starting_stack < self.big_blind {
            return Err(SettingsError::Invalid(
                "starting_stack must cover the big blind".into(),
            ));
        }
        if self.rollouts == 0 {
            return Err(SettingsError::Invalid("rollouts must be at least 1".into()));
        }
        if self.session_timeout_secs == 0 {
            return Err(SettingsError::Invalid(
                "session_timeout_secs must be greater than 0".into(),
            ));
        }
        Ok(())
    }

    pub fn session_timeout(&self) -> Duration {
        Duration::from_secs(self.session_timeout_secs)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueSource {
    Default,
    File,
    Env,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SettingsSources {
    pub starting_stack: ValueSource,
    pub small_blind: ValueSource,
    pub big_blind: ValueSource,
    pub rollouts: ValueSource,
    pub session_timeout_secs: ValueSource,
    pub seed: ValueSource,
}

impl Default for SettingsSources {
    fn default() -> Self {
        Self {
            starting_stack: ValueSource::Default,
            small_blind: ValueSource::Default,
            big_blind: ValueSource::Default,
            rollouts: ValueSource::Default,
            session_timeout_secs: ValueSource::Default,
            seed: ValueSource::Default,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ResolvedSettings {
    pub settings: TableSettings,
    pub sources: SettingsSources,
}

impl ResolvedSettings {
    /// Each setting with where its value came from, e.g.
    /// `{"seed": {"value": 7, "source": "env"}, ...}`.
    pub fn to_json(&self) -> serde_json::Value {
        let s = &self.settings;
        let src = &self.sources;
        serde_json::json!({
            "starting_stack": { "value": s.starting_stack, "source": src.starting_stack },
            "small_blind": { "value": s.small_blind, "source": src.small_blind },
            "big_blind": { "value": s.big_blind, "source": src.big_blind },
            "rollouts": { "value": s.rollouts, "source": src.rollouts },
            "session_timeout_secs": {
                "value": s.session_timeout_secs,
                "source": src.session_timeout_secs
            },
            "seed": { "value": s.seed, "source": src.seed },
        })
    }
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Failed to read settings file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse settings file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid settings: {0}")]
    Invalid(String),
}

pub fn load() -> Result<TableSettings, SettingsError> {
    load_with_sources().map(|resolved| resolved.settings)
}

pub fn load_with_sources() -> Result<ResolvedSettings, SettingsError> {
    let mut cfg = TableSettings::default();
    let mut sources = SettingsSources::default();

    if let Ok(path) = std::env::var(CONFIG_ENV)
        && !path.is_empty()
    {
        let s = fs::read_to_string(path)?;
        let f: FileSettings = toml::from_str(&s)?;
        if let Some(v) = f.starting_stack {
            cfg.starting_stack = v;
            sources.starting_stack = ValueSource::File;
        }
        if let Some(v) = f.small_blind {
            cfg.small_blind = v;
            sources.small_blind = ValueSource::File;
        }
        if let Some(v) = f.big_blind {
            cfg.big_blind = v;
            sources.big_blind = ValueSource::File;
        }
        if let Some(v) = f.rollouts {
            cfg.rollouts = v;
            sources.rollouts = ValueSource::File;
        }
        if let Some(v) = f.session_timeout_secs {
            cfg.session_timeout_secs = v;
            sources.session_timeout_secs = ValueSource::File;
        }
        if let Some(v) = f.seed {
            cfg.seed = Some(v);
            sources.seed = ValueSource::File;
        }
    }

    if let Some(v) = env_value("FELT_STARTING_STACK")? {
        cfg.starting_stack = v;
        sources.starting_stack = ValueSource::Env;
    }
    if let Some(v) = env_value("FELT_SMALL_BLIND")? {
        cfg.small_blind = v;
        sources.small_blind = ValueSource::Env;
    }
    if let Some(v) = env_value("FELT_BIG_BLIND")? {
        cfg.big_blind = v;
        sources.big_blind = ValueSource::Env;
    }
    if let Some(v) = env_value("FELT_ROLLOUTS")? {
        cfg.rollouts = v;
        sources.rollouts = ValueSource::Env;
    }
    if let Some(v) = env_value("FELT_SESSION_TIMEOUT")? {
        cfg.session_timeout_secs = v;
        sources.session_timeout_secs = ValueSource::Env;
    }
    if let Some(v) = env_value("FELT_SEED")? {
        cfg.seed = Some(v);
        sources.seed = ValueSource::Env;
    }

    cfg.validate()?;
    Ok(ResolvedSettings {
        settings: cfg,
        sources,
    })
}

/// Parse a non-empty environment variable; unset and empty both mean absent.
fn env_value<T: FromStr>(key: &str) -> Result<Option<T>, SettingsError> {
    match std::env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| SettingsError::Invalid(format!("{key} is not a valid number: {raw}"))),
        _ => Ok(None),
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileSettings {
    #[serde(default)]
    starting_stack: Option<u32>,
    #[serde(default)]
    small_blind: Option<u32>,
    #[serde(default)]
    big_blind: Option<u32>,
    #[serde(default)]
    rollouts: Option<usize>,
    #[serde(default)]
    session_timeout_secs: Option<u64>,
    #[serde(default)]
    seed: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let s = TableSettings::default();
        assert!(s.validate().is_ok());
        assert_eq!(s.session_timeout(), Duration::from_secs(1800));
        assert_eq!(s.rollouts, 100);
    }

    #[test]
    fn validation_rejects_bad_blinds_and_zero_knobs() {
        let bad = [
            TableSettings {
                small_blind: 0,
                ..TableSettings::default()
            },
            TableSettings {
                small_blind: 20,
                ..TableSettings::default()
            },
            TableSettings {
                starting_stack: 5,
                ..TableSettings::default()
            },
            TableSettings {
                rollouts: 0,
                ..TableSettings::default()
            },
            TableSettings {
                session_timeout_secs: 0,
                ..TableSettings::default()
            },
        ];
        for s in bad {
            assert!(matches!(s.validate(), Err(SettingsError::Invalid(_))), "{s:?}");
        }
    }

    #[test]
    fn resolved_json_reports_sources() {
        let resolved = ResolvedSettings {
            settings: TableSettings::default(),
            sources: SettingsSources {
                seed: ValueSource::Env,
                ..SettingsSources::default()
            },
        };
        let json = resolved.to_json();
        assert_eq!(json["seed"]["source"], "env");
        assert_eq!(json["big_blind"]["value"], 10);
        assert_eq!(json["big_blind"]["source"], "default");
    }
}
