// Use-case level inputs/outputs for the grenade plugin and the session loop.

use crate::domain::{DeathEvent, PlayerId, ShotId, TeamId, Vec3};

/// Events the host dispatches to the plugin, one at a time.
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    ShotFired { player_id: PlayerId },
    PlayerJoin { player_id: PlayerId },
    PlayerPart { player_id: PlayerId },
    /// Handlers may rewrite the killer before the host finalizes the death.
    PlayerDie(DeathEvent),
}

/// What a fire trigger turned into.
#[derive(Debug, Clone, PartialEq)]
pub enum FireOutcome {
    /// Shooter unknown or not carrying the grenade flag.
    Ignored,
    Launched {
        side_shots: [ShotId; 2],
        origin: Vec3,
        velocity: Vec3,
        /// An expired grenade was discarded before this launch.
        replaced_expired: bool,
    },
    Detonated {
        shot_id: ShotId,
        position: Vec3,
    },
}

/// Commands driving the simulated host, in arrival order.
#[derive(Debug, Clone, PartialEq)]
pub enum HostCommand {
    Join {
        player_id: PlayerId,
        team: TeamId,
    },
    Part {
        player_id: PlayerId,
    },
    Move {
        player_id: PlayerId,
        position: Vec3,
        rotation: f32,
        velocity: Vec3,
    },
    SetFlag {
        player_id: PlayerId,
        flag: Option<String>,
    },
    Advance {
        seconds: f64,
    },
    Fire {
        player_id: PlayerId,
    },
    Kill {
        victim_id: PlayerId,
        killer_id: PlayerId,
        shot_id: Option<ShotId>,
    },
    EndShot {
        shot_id: ShotId,
    },
}

/// Observable results published by the session loop.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionReport {
    Joined { player_id: PlayerId },
    Left { player_id: PlayerId },
    Fired { player_id: PlayerId, outcome: FireOutcome },
    Death(DeathEvent),
}
