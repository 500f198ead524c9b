// Domain layer: grenade geometry, ballistic rules and host ports.

pub mod launch;
pub mod ports;
pub mod state;
pub mod trajectory;
pub mod tuning;
pub mod vector;

pub use state::{
    AttributionKind, DeathEvent, GrenadeRecord, PlayerId, PlayerState, ShotAttribution, ShotId,
    ShotKind, TeamId,
};
pub use vector::Vec3;
