use crate::domain::ports::SettingsRegistry;
use crate::domain::tuning::{
    GRENADE_ACCURACY, GRENADE_SPEED_FACTOR, GRENADE_VERTICAL_VELOCITY, GRENADE_WIDTH,
    MUZZLE_FRONT, MUZZLE_HEIGHT, SHOT_RANGE, SHOT_SPEED,
};
use serde::Deserialize;
use std::{env, path::Path, path::PathBuf};

// Runtime/server constants (not gameplay tuning).

pub fn command_channel_capacity() -> usize {
    env::var("COMMAND_CHANNEL_CAPACITY")
        .ok()
        .and_then(|v| v.parse().ok())
        .filter(|&v| v > 0)
        .unwrap_or(DEFAULT_COMMAND_CHANNEL_CAPACITY)
}

pub fn report_channel_capacity() -> usize {
    env::var("REPORT_CHANNEL_CAPACITY")
        .ok()
        .and_then(|v| v.parse().ok())
        .filter(|&v| v > 0)
        .unwrap_or(DEFAULT_REPORT_CHANNEL_CAPACITY)
}

/// Fixed seed for the accuracy spread; unset means seeded from entropy.
pub fn rng_seed() -> Option<u64> {
    env::var("GRENADE_RNG_SEED").ok().and_then(|v| v.parse().ok())
}

pub fn settings_path() -> Option<PathBuf> {
    env::var_os("GRENADE_CONFIG").map(PathBuf::from)
}

pub const DEFAULT_COMMAND_CHANNEL_CAPACITY: usize = 1024;
pub const DEFAULT_REPORT_CHANNEL_CAPACITY: usize = 128;

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "failed to read settings file: {e}"),
            ConfigError::Parse(e) => write!(f, "invalid settings file: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        ConfigError::Parse(e)
    }
}

/// Host variable overrides loaded from a TOML file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SettingsFile {
    #[serde(default)]
    pub world: WorldSection,
    #[serde(default)]
    pub grenade: GrenadeSection,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WorldSection {
    pub shot_speed: Option<f32>,
    pub shot_range: Option<f32>,
    pub muzzle_front: Option<f32>,
    pub muzzle_height: Option<f32>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GrenadeSection {
    pub speed_factor: Option<f32>,
    pub vertical_velocity: Option<bool>,
    pub width: Option<f32>,
    pub accuracy: Option<f32>,
}

impl SettingsFile {
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text)
    }

    /// Writes every value present in the file into the host's settings.
    pub fn apply<S: SettingsRegistry + ?Sized>(&self, settings: &mut S) {
        let floats = [
            (SHOT_SPEED, self.world.shot_speed),
            (SHOT_RANGE, self.world.shot_range),
            (MUZZLE_FRONT, self.world.muzzle_front),
            (MUZZLE_HEIGHT, self.world.muzzle_height),
            (GRENADE_SPEED_FACTOR, self.grenade.speed_factor),
            (GRENADE_WIDTH, self.grenade.width),
            (GRENADE_ACCURACY, self.grenade.accuracy),
        ];
        for (name, value) in floats {
            if let Some(value) = value {
                settings.set_float(name, value);
            }
        }
        if let Some(enabled) = self.grenade.vertical_velocity {
            settings.set_flag(GRENADE_VERTICAL_VELOCITY, enabled);
        }
    }
}
