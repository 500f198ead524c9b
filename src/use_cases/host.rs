// In-memory host world: players, clock, live shots and configuration variables.

use crate::domain::ports::{Clock, PlayerDirectory, SettingsRegistry, ShotWorld};
use crate::domain::tuning::{
    FlagSpec, MUZZLE_FRONT, MUZZLE_HEIGHT, SHOT_RANGE, SHOT_SPEED, WorldTuning,
};
use crate::domain::{PlayerId, PlayerState, ShotAttribution, ShotId, ShotKind, TeamId, Vec3};
use std::collections::HashMap;
use tracing::debug;

#[derive(Debug, Clone, PartialEq)]
pub struct SpawnedShot {
    pub id: ShotId,
    pub kind: ShotKind,
    pub position: Vec3,
    pub velocity: Vec3,
    pub team: TeamId,
    pub spawned_at: f64,
}

/// Host state the plugin talks to through its ports.
#[derive(Debug)]
pub struct SimulatedHost {
    now: f64,
    players: HashMap<PlayerId, PlayerState>,
    shots: HashMap<ShotId, SpawnedShot>,
    attributions: HashMap<ShotId, ShotAttribution>,
    next_shot_id: ShotId,
    floats: HashMap<String, f32>,
    flags: HashMap<String, bool>,
    custom_flags: Vec<FlagSpec>,
}

impl Default for SimulatedHost {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedHost {
    /// Creates a host with the stock world shot constants registered.
    pub fn new() -> Self {
        let mut host = Self {
            now: 0.0,
            players: HashMap::new(),
            shots: HashMap::new(),
            attributions: HashMap::new(),
            next_shot_id: 1,
            floats: HashMap::new(),
            flags: HashMap::new(),
            custom_flags: Vec::new(),
        };
        let world = WorldTuning::default();
        host.register_float(SHOT_SPEED, world.shot_speed);
        host.register_float(SHOT_RANGE, world.shot_range);
        host.register_float(MUZZLE_FRONT, world.muzzle_front);
        host.register_float(MUZZLE_HEIGHT, world.muzzle_height);
        host
    }

    pub fn advance(&mut self, seconds: f64) {
        // The clock is monotonic; ignore attempts to rewind it.
        if seconds > 0.0 {
            self.now += seconds;
        }
    }

    pub fn add_player(&mut self, player: PlayerState) {
        self.players.insert(player.id, player);
    }

    pub fn remove_player(&mut self, player_id: PlayerId) -> Option<PlayerState> {
        self.players.remove(&player_id)
    }

    pub fn player_mut(&mut self, player_id: PlayerId) -> Option<&mut PlayerState> {
        self.players.get_mut(&player_id)
    }

    /// Removes a shot from the world together with its attribution tag.
    pub fn end_shot(&mut self, shot_id: ShotId) -> Option<SpawnedShot> {
        self.attributions.remove(&shot_id);
        self.shots.remove(&shot_id)
    }

    pub fn shot(&self, shot_id: ShotId) -> Option<&SpawnedShot> {
        self.shots.get(&shot_id)
    }

    /// Live shots ordered by spawn.
    pub fn shots(&self) -> Vec<&SpawnedShot> {
        let mut shots: Vec<&SpawnedShot> = self.shots.values().collect();
        shots.sort_by_key(|s| s.id);
        shots
    }

    pub fn custom_flags(&self) -> &[FlagSpec] {
        &self.custom_flags
    }
}

impl Clock for SimulatedHost {
    fn now_seconds(&self) -> f64 {
        self.now
    }
}

impl PlayerDirectory for SimulatedHost {
    fn player(&self, player_id: PlayerId) -> Option<PlayerState> {
        self.players.get(&player_id).cloned()
    }
}

impl ShotWorld for SimulatedHost {
    fn spawn_shot(&mut self, kind: ShotKind, position: Vec3, velocity: Vec3, team: TeamId) -> ShotId {
        let id = self.next_shot_id;
        self.next_shot_id = self.next_shot_id.wrapping_add(1);
        debug!(shot_id = id, kind = kind.code(), ?position, ?velocity, "server shot fired");
        self.shots.insert(
            id,
            SpawnedShot {
                id,
                kind,
                position,
                velocity,
                team,
                spawned_at: self.now,
            },
        );
        id
    }

    fn set_attribution(&mut self, shot_id: ShotId, attribution: ShotAttribution) {
        if self.shots.contains_key(&shot_id) {
            self.attributions.insert(shot_id, attribution);
        }
    }

    fn attribution(&self, shot_id: ShotId) -> Option<ShotAttribution> {
        self.attributions.get(&shot_id).cloned()
    }
}

impl SettingsRegistry for SimulatedHost {
    fn register_float(&mut self, name: &str, default: f32) {
        self.floats.entry(name.to_string()).or_insert(default);
    }

    fn register_flag(&mut self, name: &str, default: bool) {
        self.flags.entry(name.to_string()).or_insert(default);
    }

    fn set_float(&mut self, name: &str, value: f32) {
        self.floats.insert(name.to_string(), value);
    }

    fn set_flag(&mut self, name: &str, value: bool) {
        self.flags.insert(name.to_string(), value);
    }

    fn float(&self, name: &str) -> Option<f32> {
        self.floats.get(name).copied()
    }

    fn flag(&self, name: &str) -> Option<bool> {
        self.flags.get(name).copied()
    }

    fn register_custom_flag(&mut self, flag: FlagSpec) {
        if !self.custom_flags.iter().any(|f| f.code == flag.code) {
            self.custom_flags.push(flag);
        }
    }
}
