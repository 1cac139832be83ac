use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::event::DEFAULT_FOULS_TO_GIVE;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "PBP_CONFIG";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnrichConfig {
    #[serde(default)]
    pub correlation: CorrelationConfig,
    #[serde(default)]
    pub fouls: FoulConfig,
    #[serde(default)]
    pub shots: ShotConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorrelationConfig {
    /// How far ahead (in game seconds) a split record may trail its partner.
    #[serde(default = "default_window_secs")]
    pub window_secs: u32,
}

impl Default for CorrelationConfig {
    fn default() -> Self {
        Self {
            window_secs: default_window_secs(),
        }
    }
}

impl CorrelationConfig {
    #[must_use]
    pub fn window_millis(&self) -> i64 {
        i64::from(self.window_secs) * 1_000
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FoulConfig {
    /// Team fouls allowed per period before the penalty.
    #[serde(default = "default_fouls_per_period")]
    pub per_period: u8,
    /// Periods after which the foul bank stops resetting.
    #[serde(default = "default_regulation_periods")]
    pub regulation_periods: u8,
}

impl Default for FoulConfig {
    fn default() -> Self {
        Self {
            per_period: default_fouls_per_period(),
            regulation_periods: default_regulation_periods(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShotConfig {
    #[serde(default = "default_at_rim_cutoff")]
    pub at_rim_cutoff: f64,
    #[serde(default = "default_short_mid_range_cutoff")]
    pub short_mid_range_cutoff: f64,
    /// Largest `x` at which a three is still a corner three.
    #[serde(default = "default_corner_three_max_x")]
    pub corner_three_max_x: f64,
    #[serde(default = "default_heave_distance_cutoff")]
    pub heave_distance_cutoff: f64,
    #[serde(default = "default_heave_time_cutoff_secs")]
    pub heave_time_cutoff_secs: u32,
    /// Max seconds between an offensive rebound and the putback attempt.
    #[serde(default = "default_putback_window_secs")]
    pub putback_window_secs: u32,
}

impl Default for ShotConfig {
    fn default() -> Self {
        Self {
            at_rim_cutoff: default_at_rim_cutoff(),
            short_mid_range_cutoff: default_short_mid_range_cutoff(),
            corner_three_max_x: default_corner_three_max_x(),
            heave_distance_cutoff: default_heave_distance_cutoff(),
            heave_time_cutoff_secs: default_heave_time_cutoff_secs(),
            putback_window_secs: default_putback_window_secs(),
        }
    }
}

/// Load a config file. A missing file yields the defaults.
///
/// # Errors
///
/// Fails when the file exists but cannot be read or parsed.
pub fn load_config(path: &Path) -> Result<EnrichConfig> {
    if !path.exists() {
        debug!(path = %path.display(), "config file not found, using defaults");
        return Ok(EnrichConfig::default());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<EnrichConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

/// Resolve the effective config.
///
/// Precedence: explicit path, then `$PBP_CONFIG`, then
/// `<config_dir>/pbp/config.toml`, then built-in defaults.
///
/// # Errors
///
/// Propagates read/parse failures from [`load_config`].
pub fn resolve_config(explicit: Option<&Path>) -> Result<EnrichConfig> {
    let env_path = env::var_os(CONFIG_ENV).map(PathBuf::from);
    match config_path(explicit, env_path, dirs::config_dir()) {
        Some(path) => load_config(&path),
        None => Ok(EnrichConfig::default()),
    }
}

fn config_path(
    explicit: Option<&Path>,
    env_path: Option<PathBuf>,
    config_dir: Option<PathBuf>,
) -> Option<PathBuf> {
    explicit
        .map(Path::to_path_buf)
        .or(env_path)
        .or_else(|| config_dir.map(|dir| dir.join("pbp/config.toml")))
}

const fn default_window_secs() -> u32 {
    5
}

const fn default_fouls_per_period() -> u8 {
    DEFAULT_FOULS_TO_GIVE
}

const fn default_regulation_periods() -> u8 {
    4
}

const fn default_at_rim_cutoff() -> f64 {
    4.0
}

const fn default_short_mid_range_cutoff() -> f64 {
    14.0
}

const fn default_corner_three_max_x() -> f64 {
    11.0
}

const fn default_heave_distance_cutoff() -> f64 {
    40.0
}

const fn default_heave_time_cutoff_secs() -> u32 {
    2
}

const fn default_putback_window_secs() -> u32 {
    2
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults_match_feed_rules() {
        let config = EnrichConfig::default();
        assert_eq!(config.correlation.window_secs, 5);
        assert_eq!(config.correlation.window_millis(), 5_000);
        assert_eq!(config.fouls.per_period, 4);
        assert_eq!(config.fouls.regulation_periods, 4);
        assert_eq!(config.shots.putback_window_secs, 2);
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = TempDir::new().expect("tempdir");
        let config = load_config(&dir.path().join("nope.toml")).expect("load");
        assert_eq!(config, EnrichConfig::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[correlation]\nwindow_secs = 3\n\n[fouls]\nper_period = 5\n")
            .expect("write");

        let config = load_config(&path).expect("load");
        assert_eq!(config.correlation.window_secs, 3);
        assert_eq!(config.fouls.per_period, 5);
        assert_eq!(config.fouls.regulation_periods, 4);
        assert_eq!(config.shots, ShotConfig::default());
    }

    #[test]
    fn malformed_file_is_an_error_with_context() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[correlation\nwindow_secs = ").expect("write");

        let err = load_config(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse"));
    }

    #[test]
    fn explicit_path_wins() {
        let explicit = PathBuf::from("/tmp/explicit.toml");
        let resolved = config_path(
            Some(explicit.as_path()),
            Some(PathBuf::from("/tmp/env.toml")),
            Some(PathBuf::from("/home/x/.config")),
        );
        assert_eq!(resolved, Some(explicit));
    }

    #[test]
    fn env_path_beats_config_dir() {
        let resolved = config_path(
            None,
            Some(PathBuf::from("/tmp/env.toml")),
            Some(PathBuf::from("/home/x/.config")),
        );
        assert_eq!(resolved, Some(PathBuf::from("/tmp/env.toml")));
    }

    #[test]
    fn falls_back_to_config_dir() {
        let resolved = config_path(None, None, Some(PathBuf::from("/home/x/.config")));
        assert_eq!(resolved, Some(PathBuf::from("/home/x/.config/pbp/config.toml")));
        assert_eq!(config_path(None, None, None), None);
    }
}
