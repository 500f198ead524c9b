// Per-player grenade slots: the single source of truth for launch vs. detonate.

use crate::domain::trajectory::{self, Ballistics};
use crate::domain::{GrenadeRecord, PlayerId, Vec3};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Owns exactly one grenade record per joined player.
#[derive(Debug, Default)]
pub struct GrenadeTracker {
    records: HashMap<PlayerId, GrenadeRecord>,
}

impl GrenadeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a fresh, unarmed slot. A duplicate join replaces the old slot.
    pub fn join(&mut self, player_id: PlayerId) {
        if self
            .records
            .insert(player_id, GrenadeRecord::default())
            .is_some()
        {
            warn!(player_id, "duplicate join; grenade slot reset");
        }
    }

    /// Releases the player's slot. Unknown players are a no-op.
    pub fn part(&mut self, player_id: PlayerId) -> Option<GrenadeRecord> {
        self.records.remove(&player_id)
    }

    pub fn is_tracked(&self, player_id: PlayerId) -> bool {
        self.records.contains_key(&player_id)
    }

    pub fn is_active(&self, player_id: PlayerId) -> bool {
        self.records.get(&player_id).is_some_and(|r| r.active)
    }

    pub fn record(&self, player_id: PlayerId) -> Option<&GrenadeRecord> {
        self.records.get(&player_id)
    }

    /// True only for an armed grenade that has hit the ground or run out of range.
    pub fn is_expired(&self, player_id: PlayerId, now: f64, ballistics: Ballistics) -> bool {
        self.records.get(&player_id).is_some_and(|r| {
            r.active
                && trajectory::is_expired(r.origin, r.velocity, r.launch_time, now, ballistics)
        })
    }

    /// Arms the player's slot. A missing slot is recreated first.
    pub fn launch(&mut self, player_id: PlayerId, origin: Vec3, velocity: Vec3, now: f64) {
        *self.slot(player_id) = GrenadeRecord::armed(origin, velocity, now);
    }

    /// Current projected position of the armed grenade, if any.
    pub fn detonation_position(&self, player_id: PlayerId, now: f64, shot_speed: f32) -> Option<Vec3> {
        let record = self.records.get(&player_id).filter(|r| r.active)?;
        Some(trajectory::position(
            record.origin,
            record.velocity,
            now - record.launch_time,
            shot_speed,
        ))
    }

    /// Disarms the slot and zeroes its launch data.
    pub fn clear(&mut self, player_id: PlayerId) {
        if let Some(record) = self.records.get_mut(&player_id) {
            *record = GrenadeRecord::default();
        }
    }

    /// Clears an armed grenade that has already expired. Returns true if it did.
    pub fn expire_if_stale(&mut self, player_id: PlayerId, now: f64, ballistics: Ballistics) -> bool {
        if !self.is_expired(player_id, now, ballistics) {
            return false;
        }
        debug!(player_id, "grenade expired before detonation");
        self.clear(player_id);
        true
    }

    /// Ensures a slot exists, recreating it when join was never observed.
    pub fn ensure_tracked(&mut self, player_id: PlayerId) {
        self.slot(player_id);
    }

    pub fn armed_count(&self) -> usize {
        self.records.values().filter(|r| r.active).count()
    }

    pub fn tracked_count(&self) -> usize {
        self.records.len()
    }

    /// Drops every slot, e.g. when the plugin unloads.
    pub fn flush(&mut self) {
        self.records.clear();
    }

    fn slot(&mut self, player_id: PlayerId) -> &mut GrenadeRecord {
        self.records.entry(player_id).or_insert_with(|| {
            warn!(player_id, "no grenade slot for player; creating one");
            GrenadeRecord::default()
        })
    }
}
