//! Gameplay tuning for the grenade flag and the ambient shot constants it reads.
//!
//! Keep this separate from runtime configuration (channel sizes, log format, etc.).
use super::ports::SettingsRegistry;
use super::trajectory::Ballistics;

pub const SHOT_SPEED: &str = "_shotSpeed";
pub const SHOT_RANGE: &str = "_shotRange";
pub const MUZZLE_FRONT: &str = "_muzzleFront";
pub const MUZZLE_HEIGHT: &str = "_muzzleHeight";

pub const GRENADE_SPEED_FACTOR: &str = "_grenadeSpeedAdVel";
pub const GRENADE_VERTICAL_VELOCITY: &str = "_grenadeVerticalVelocity";
pub const GRENADE_WIDTH: &str = "_grenadeWidth";
pub const GRENADE_ACCURACY: &str = "_grenadeAccuracy";

/// Host-owned shot constants.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldTuning {
    /// World units per second for a unit shot velocity.
    pub shot_speed: f32,
    /// Maximum distance a shot travels.
    pub shot_range: f32,
    /// Distance in front of the tank where shots spawn.
    pub muzzle_front: f32,
    /// Height above the tank's base where shots spawn.
    pub muzzle_height: f32,
}

impl Default for WorldTuning {
    fn default() -> Self {
        Self {
            shot_speed: 100.0,
            shot_range: 350.0,
            muzzle_front: 4.42,
            muzzle_height: 1.57,
        }
    }
}

impl WorldTuning {
    /// Reads current values, falling back to defaults for anything unset.
    pub fn from_settings<S: SettingsRegistry + ?Sized>(settings: &S) -> Self {
        let d = Self::default();
        Self {
            shot_speed: settings.float(SHOT_SPEED).unwrap_or(d.shot_speed),
            shot_range: settings.float(SHOT_RANGE).unwrap_or(d.shot_range),
            muzzle_front: settings.float(MUZZLE_FRONT).unwrap_or(d.muzzle_front),
            muzzle_height: settings.float(MUZZLE_HEIGHT).unwrap_or(d.muzzle_height),
        }
    }

    pub fn ballistics(&self) -> Ballistics {
        Ballistics {
            shot_speed: self.shot_speed,
            shot_range: self.shot_range,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GrenadeTuning {
    /// Multiplier on the heading unit vector for launch velocity.
    pub speed_factor: f32,
    /// Adds the shooter's own vertical velocity to the launch.
    pub vertical_velocity: bool,
    /// Sideways offset of each visible side shot from the center line.
    pub width: f32,
    /// Maximum heading perturbation in radians; 0 is perfect accuracy.
    pub accuracy: f32,
}

impl Default for GrenadeTuning {
    fn default() -> Self {
        Self {
            speed_factor: 4.0,
            vertical_velocity: false,
            width: 2.0,
            accuracy: 0.02,
        }
    }
}

impl GrenadeTuning {
    pub fn from_settings<S: SettingsRegistry + ?Sized>(settings: &S) -> Self {
        let d = Self::default();
        Self {
            speed_factor: settings.float(GRENADE_SPEED_FACTOR).unwrap_or(d.speed_factor),
            vertical_velocity: settings
                .flag(GRENADE_VERTICAL_VELOCITY)
                .unwrap_or(d.vertical_velocity),
            width: settings.float(GRENADE_WIDTH).unwrap_or(d.width),
            accuracy: sanitize_accuracy(settings.float(GRENADE_ACCURACY).unwrap_or(d.accuracy)),
        }
    }

    /// Registers every grenade tunable with its default value.
    pub fn register_defaults<S: SettingsRegistry + ?Sized>(settings: &mut S) {
        let d = Self::default();
        settings.register_float(GRENADE_SPEED_FACTOR, d.speed_factor);
        settings.register_flag(GRENADE_VERTICAL_VELOCITY, d.vertical_velocity);
        settings.register_float(GRENADE_WIDTH, d.width);
        settings.register_float(GRENADE_ACCURACY, d.accuracy);
    }
}

/// Largest heading spread honored; anything wider is a full turn anyway.
pub const MAX_ACCURACY: f32 = std::f32::consts::PI;

// Sign is meaningless for a symmetric spread. Non-finite values fall back to the default.
fn sanitize_accuracy(raw: f32) -> f32 {
    if !raw.is_finite() {
        return GrenadeTuning::default().accuracy;
    }
    raw.abs().min(MAX_ACCURACY)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagQuality {
    Good,
    Bad,
}

/// Custom pickup flag definition handed to the host at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlagSpec {
    pub code: &'static str,
    pub name: &'static str,
    pub help: &'static str,
    pub quality: FlagQuality,
}

pub const GRENADE_FLAG: FlagSpec = FlagSpec {
    code: "GN",
    name: "Grenade",
    help: "First shot fires the grenade, second shot detonates.",
    quality: FlagQuality::Good,
};
