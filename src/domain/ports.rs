use super::state::{PlayerId, PlayerState, ShotAttribution, ShotId, ShotKind, TeamId};
use super::tuning::FlagSpec;
use super::vector::Vec3;

// Port for the host's monotonic clock, in seconds.
pub trait Clock {
    fn now_seconds(&self) -> f64;
}

// Port for player lookups at event time.
pub trait PlayerDirectory {
    fn player(&self, player_id: PlayerId) -> Option<PlayerState>;

    fn team_of(&self, player_id: PlayerId) -> Option<TeamId> {
        self.player(player_id).map(|p| p.team)
    }
}

// Port for spawning server shots and tagging them for kill credit.
pub trait ShotWorld {
    fn spawn_shot(&mut self, kind: ShotKind, position: Vec3, velocity: Vec3, team: TeamId) -> ShotId;
    fn set_attribution(&mut self, shot_id: ShotId, attribution: ShotAttribution);
    /// Tag attached to a live shot. Tags go away with their shot.
    fn attribution(&self, shot_id: ShotId) -> Option<ShotAttribution>;
}

// Port for host-owned configuration variables and flag registration.
pub trait SettingsRegistry {
    fn register_float(&mut self, name: &str, default: f32);
    fn register_flag(&mut self, name: &str, default: bool);
    fn set_float(&mut self, name: &str, value: f32);
    fn set_flag(&mut self, name: &str, value: bool);
    fn float(&self, name: &str) -> Option<f32>;
    fn flag(&self, name: &str) -> Option<bool>;
    fn register_custom_flag(&mut self, flag: FlagSpec);
}

/// Everything the grenade plugin needs from its host.
pub trait GameHost: Clock + PlayerDirectory + ShotWorld + SettingsRegistry {}

impl<T: Clock + PlayerDirectory + ShotWorld + SettingsRegistry> GameHost for T {}
