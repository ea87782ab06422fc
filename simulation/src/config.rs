use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use face_arena_core::PlayArea;
use face_arena_world::DEFAULT_KILL_THRESHOLDS;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Largest number of waves, one per boss in the roster.
const MAX_WAVES: usize = 11;

/// Errors raised while loading or validating a [`GameConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read game config at {}", .path.display())]
    Io {
        /// Path that was being read.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The configuration is not valid TOML or has unexpected fields.
    #[error("failed to parse game config toml contents")]
    Parse(#[from] toml::de::Error),
    /// The play area has a non-positive dimension.
    #[error("play area must be positive, got {width}x{height}")]
    InvalidPlayArea {
        /// Configured width.
        width: f32,
        /// Configured height.
        height: f32,
    },
    /// The number of kill thresholds is outside `1..=11`.
    #[error("expected between 1 and 11 kill thresholds, found {0}")]
    ThresholdCount(usize),
    /// A wave requires zero kills.
    #[error("kill threshold for wave {wave} must be positive")]
    ZeroThreshold {
        /// Zero-based wave index of the offending threshold.
        wave: usize,
    },
    /// A duration setting is zero.
    #[error("{0} must be positive")]
    ZeroDuration(&'static str),
}

/// Play area dimensions as written in the configuration file.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlayAreaConfig {
    /// Width in screen units.
    pub width: f32,
    /// Height in screen units.
    pub height: f32,
}

impl Default for PlayAreaConfig {
    fn default() -> Self {
        let area = PlayArea::default();
        Self {
            width: area.width(),
            height: area.height(),
        }
    }
}

/// Tunable game parameters. Missing fields take their defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameConfig {
    /// Bounds projectiles and creatures live in.
    pub play_area: PlayAreaConfig,
    /// Kills required to summon each wave's boss.
    pub kill_thresholds: Vec<u32>,
    /// Milliseconds between creature spawns during minion waves.
    pub spawn_interval_ms: u64,
    /// Longest simulated step in milliseconds; longer frames are clamped.
    pub max_step_ms: u64,
    /// Seed for every random choice the simulation makes.
    pub seed: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            play_area: PlayAreaConfig::default(),
            kill_thresholds: DEFAULT_KILL_THRESHOLDS.to_vec(),
            spawn_interval_ms: 1500,
            max_step_ms: 100,
            seed: 0x00fa_ce00,
        }
    }
}

impl GameConfig {
    /// Reads and validates a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    /// Parses and validates configuration from TOML text.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks every field against its permitted range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let PlayAreaConfig { width, height } = self.play_area;
        if !(width > 0.0 && height > 0.0) {
            return Err(ConfigError::InvalidPlayArea { width, height });
        }

        let count = self.kill_thresholds.len();
        if !(1..=MAX_WAVES).contains(&count) {
            return Err(ConfigError::ThresholdCount(count));
        }
        if let Some(wave) = self.kill_thresholds.iter().position(|kills| *kills == 0) {
            return Err(ConfigError::ZeroThreshold { wave });
        }

        if self.spawn_interval_ms == 0 {
            return Err(ConfigError::ZeroDuration("spawn_interval_ms"));
        }
        if self.max_step_ms == 0 {
            return Err(ConfigError::ZeroDuration("max_step_ms"));
        }
        Ok(())
    }

    /// Play area described by the configuration.
    #[must_use]
    pub fn play_area(&self) -> PlayArea {
        PlayArea::new(self.play_area.width, self.play_area.height)
    }

    /// Interval between creature spawns.
    #[must_use]
    pub fn spawn_interval(&self) -> Duration {
        Duration::from_millis(self.spawn_interval_ms)
    }

    /// Upper bound applied to each simulated step.
    #[must_use]
    pub fn max_step(&self) -> Duration {
        Duration::from_millis(self.max_step_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let config = GameConfig::from_toml_str("").expect("defaults are valid");
        assert_eq!(config, GameConfig::default());
        assert_eq!(config.kill_thresholds, DEFAULT_KILL_THRESHOLDS.to_vec());
        assert_eq!(config.max_step(), Duration::from_millis(100));
    }

    #[test]
    fn partial_document_overrides_named_fields() {
        let config = GameConfig::from_toml_str(
            r#"
                kill_thresholds = [5, 10]
                seed = 42

                [play_area]
                width = 640.0
                height = 480.0
            "#,
        )
        .expect("valid config");

        assert_eq!(config.kill_thresholds, vec![5, 10]);
        assert_eq!(config.seed, 42);
        assert_eq!(config.play_area(), PlayArea::new(640.0, 480.0));
        assert_eq!(config.spawn_interval(), Duration::from_millis(1500));
    }

    #[test]
    fn rejects_zero_thresholds() {
        let error = GameConfig::from_toml_str("kill_thresholds = [10, 0]").unwrap_err();
        assert!(matches!(error, ConfigError::ZeroThreshold { wave: 1 }));
    }

    #[test]
    fn rejects_more_waves_than_bosses() {
        let error = GameConfig::from_toml_str("kill_thresholds = [1,1,1,1,1,1,1,1,1,1,1,1]")
            .unwrap_err();
        assert!(matches!(error, ConfigError::ThresholdCount(12)));
    }

    #[test]
    fn rejects_degenerate_play_area() {
        let error = GameConfig::from_toml_str("[play_area]\nwidth = 0.0\nheight = 10.0")
            .unwrap_err();
        assert!(matches!(error, ConfigError::InvalidPlayArea { .. }));
    }

    #[test]
    fn rejects_unknown_fields() {
        let error = GameConfig::from_toml_str("lives = 9").unwrap_err();
        assert!(matches!(error, ConfigError::Parse(_)));
    }
}
