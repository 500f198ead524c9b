// Domain-level identities, player poses, grenade records and attribution data.

use super::vector::Vec3;
use serde::{Deserialize, Serialize};

pub type PlayerId = u64;
pub type ShotId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TeamId {
    #[default]
    Rogue,
    Red,
    Green,
    Blue,
    Purple,
    Observer,
}

/// Last known state of a player as reported by the host.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerState {
    pub id: PlayerId,
    pub team: TeamId,
    pub position: Vec3,
    /// Heading in radians, 0 = +X, counter-clockwise.
    pub rotation: f32,
    pub velocity: Vec3,
    /// Abbreviation of the flag currently carried, if any.
    pub flag: Option<String>,
}

impl PlayerState {
    pub fn new(id: PlayerId, team: TeamId) -> Self {
        Self {
            id,
            team,
            position: Vec3::ZERO,
            rotation: 0.0,
            velocity: Vec3::ZERO,
            flag: None,
        }
    }

    pub fn carries(&self, flag_code: &str) -> bool {
        self.flag.as_deref() == Some(flag_code)
    }
}

/// One player's grenade slot. Inactive records carry zeroed launch data.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GrenadeRecord {
    pub active: bool,
    pub origin: Vec3,
    pub velocity: Vec3,
    /// Host clock reading at launch, in seconds.
    pub launch_time: f64,
}

impl GrenadeRecord {
    pub fn armed(origin: Vec3, velocity: Vec3, launch_time: f64) -> Self {
        Self {
            active: true,
            origin,
            velocity,
            launch_time,
        }
    }
}

/// Projectile kinds the plugin asks the host to spawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShotKind {
    /// Visible side shot that trails the logical grenade.
    PhantomZone,
    /// Area blast spawned on detonation.
    ShockWave,
}

impl ShotKind {
    pub fn code(self) -> &'static str {
        match self {
            ShotKind::PhantomZone => "PZ",
            ShotKind::ShockWave => "SW",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributionKind {
    Grenade,
    /// Tag written by some other plugin; not ours to interpret.
    Foreign(String),
}

/// Kill-credit data attached to a spawned shot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShotAttribution {
    pub kind: AttributionKind,
    pub owner: PlayerId,
}

impl ShotAttribution {
    pub fn grenade(owner: PlayerId) -> Self {
        Self {
            kind: AttributionKind::Grenade,
            owner,
        }
    }
}

/// Death report, mutable until the host finalizes it.
#[derive(Debug, Clone, PartialEq)]
pub struct DeathEvent {
    pub victim_id: PlayerId,
    pub killer_id: PlayerId,
    pub killer_team: TeamId,
    /// Shot reported as the cause of death, if any.
    pub shot_id: Option<ShotId>,
}
