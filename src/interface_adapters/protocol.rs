// Wire DTOs for replay scripts (host commands in) and session reports (JSON lines out).

use crate::domain::{DeathEvent, TeamId, Vec3};
use crate::use_cases::{FireOutcome, HostCommand, SessionReport};
use serde::{Deserialize, Serialize};

/// One line of a replay script.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum HostCommandDto {
    Join {
        player_id: u64,
        #[serde(default)]
        team: TeamId,
    },
    Part {
        player_id: u64,
    },
    Move {
        player_id: u64,
        position: [f32; 3],
        #[serde(default)]
        rotation: f32,
        #[serde(default)]
        velocity: [f32; 3],
    },
    Flag {
        player_id: u64,
        // Omitted or null means the flag was dropped.
        #[serde(default)]
        flag: Option<String>,
    },
    Advance {
        seconds: f64,
    },
    Fire {
        player_id: u64,
    },
    Kill {
        victim_id: u64,
        killer_id: u64,
        #[serde(default)]
        shot_id: Option<u64>,
    },
    EndShot {
        shot_id: u64,
    },
}

impl From<HostCommandDto> for HostCommand {
    fn from(dto: HostCommandDto) -> Self {
        match dto {
            HostCommandDto::Join { player_id, team } => HostCommand::Join { player_id, team },
            HostCommandDto::Part { player_id } => HostCommand::Part { player_id },
            HostCommandDto::Move {
                player_id,
                position,
                rotation,
                velocity,
            } => HostCommand::Move {
                player_id,
                position: Vec3::from(position),
                rotation,
                velocity: Vec3::from(velocity),
            },
            HostCommandDto::Flag { player_id, flag } => HostCommand::SetFlag { player_id, flag },
            HostCommandDto::Advance { seconds } => HostCommand::Advance { seconds },
            HostCommandDto::Fire { player_id } => HostCommand::Fire { player_id },
            HostCommandDto::Kill {
                victim_id,
                killer_id,
                shot_id,
            } => HostCommand::Kill {
                victim_id,
                killer_id,
                shot_id,
            },
            HostCommandDto::EndShot { shot_id } => HostCommand::EndShot { shot_id },
        }
    }
}

/// Published session events, one JSON object per line.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", content = "data")]
pub enum SessionReportDto {
    Joined {
        player_id: u64,
    },
    Left {
        player_id: u64,
    },
    Ignored {
        player_id: u64,
    },
    Launched {
        player_id: u64,
        side_shot_ids: [u64; 2],
        origin: [f32; 3],
        velocity: [f32; 3],
        replaced_expired: bool,
    },
    Detonated {
        player_id: u64,
        shot_id: u64,
        position: [f32; 3],
    },
    Death(DeathDto),
}

#[derive(Debug, Clone, Serialize)]
pub struct DeathDto {
    pub victim_id: u64,
    pub killer_id: u64,
    pub killer_team: TeamId,
    pub shot_id: Option<u64>,
}

impl From<DeathEvent> for DeathDto {
    fn from(death: DeathEvent) -> Self {
        Self {
            victim_id: death.victim_id,
            killer_id: death.killer_id,
            killer_team: death.killer_team,
            shot_id: death.shot_id,
        }
    }
}

impl From<SessionReport> for SessionReportDto {
    fn from(report: SessionReport) -> Self {
        match report {
            SessionReport::Joined { player_id } => SessionReportDto::Joined { player_id },
            SessionReport::Left { player_id } => SessionReportDto::Left { player_id },
            SessionReport::Fired { player_id, outcome } => match outcome {
                FireOutcome::Ignored => SessionReportDto::Ignored { player_id },
                FireOutcome::Launched {
                    side_shots,
                    origin,
                    velocity,
                    replaced_expired,
                } => SessionReportDto::Launched {
                    player_id,
                    side_shot_ids: side_shots,
                    origin: origin.into(),
                    velocity: velocity.into(),
                    replaced_expired,
                },
                FireOutcome::Detonated { shot_id, position } => SessionReportDto::Detonated {
                    player_id,
                    shot_id,
                    position: position.into(),
                },
            },
            SessionReport::Death(death) => SessionReportDto::Death(DeathDto::from(death)),
        }
    }
}
