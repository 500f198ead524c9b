use super::grenade_flag::GrenadeFlag;
use super::host::SimulatedHost;
use super::types::{GameEvent, HostCommand, SessionReport};
use crate::domain::ports::PlayerDirectory;
use crate::domain::{DeathEvent, PlayerState, TeamId};
use rand::Rng;
use std::sync::Arc;
use tokio::sync::{Notify, mpsc};
use tracing::{info, warn};

/// Everything a session owns; handed back when the session ends.
pub struct Session<R> {
    pub host: SimulatedHost,
    pub plugin: GrenadeFlag<R>,
    pub commands_processed: u64,
}

impl<R: Rng> Session<R> {
    /// Loads the plugin into a fresh host.
    pub fn new(mut host: SimulatedHost, mut plugin: GrenadeFlag<R>) -> Self {
        plugin.init(&mut host);
        Self {
            host,
            plugin,
            commands_processed: 0,
        }
    }

    /// Applies one host command and dispatches the matching plugin event.
    pub fn apply(&mut self, command: HostCommand) -> Option<SessionReport> {
        self.commands_processed += 1;
        match command {
            HostCommand::Join { player_id, team } => {
                info!(player_id, ?team, "player joined");
                self.host.add_player(PlayerState::new(player_id, team));
                self.dispatch(GameEvent::PlayerJoin { player_id });
                Some(SessionReport::Joined { player_id })
            }
            HostCommand::Part { player_id } => {
                info!(player_id, "player left");
                self.dispatch(GameEvent::PlayerPart { player_id });
                self.host.remove_player(player_id);
                Some(SessionReport::Left { player_id })
            }
            HostCommand::Move {
                player_id,
                position,
                rotation,
                velocity,
            } => {
                match self.host.player_mut(player_id) {
                    Some(p) => {
                        p.position = position;
                        p.rotation = rotation;
                        p.velocity = velocity;
                    }
                    None => warn!(player_id, "move for unknown player"),
                }
                None
            }
            HostCommand::SetFlag { player_id, flag } => {
                match self.host.player_mut(player_id) {
                    Some(p) => p.flag = flag,
                    None => warn!(player_id, "flag change for unknown player"),
                }
                None
            }
            HostCommand::Advance { seconds } => {
                self.host.advance(seconds);
                None
            }
            HostCommand::Fire { player_id } => {
                let outcome = self
                    .plugin
                    .on_shot_fired(&mut self.host, player_id);
                Some(SessionReport::Fired { player_id, outcome })
            }
            HostCommand::Kill {
                victim_id,
                killer_id,
                shot_id,
            } => {
                let killer_team = self.host.team_of(killer_id).unwrap_or(TeamId::Rogue);
                let mut death = DeathEvent {
                    victim_id,
                    killer_id,
                    killer_team,
                    shot_id,
                };
                self.plugin.on_player_die(&mut self.host, &mut death);
                info!(
                    victim_id = death.victim_id,
                    killer_id = death.killer_id,
                    killer_team = ?death.killer_team,
                    "player died"
                );
                Some(SessionReport::Death(death))
            }
            HostCommand::EndShot { shot_id } => {
                self.host.end_shot(shot_id);
                None
            }
        }
    }

    fn dispatch(&mut self, mut event: GameEvent) {
        self.plugin.handle(&mut self.host, &mut event);
    }
}

/// Drives a session from its command channel, one command at a time.
///
/// Runs until the command channel closes or `shutdown` fires, then unloads the
/// plugin and returns the session state.
pub async fn session_task<R: Rng>(
    mut command_rx: mpsc::Receiver<HostCommand>,
    report_tx: mpsc::Sender<SessionReport>,
    mut session: Session<R>,
    shutdown: Arc<Notify>,
) -> Session<R> {
    loop {
        let command = tokio::select! {
            _ = shutdown.notified() => {
                break;
            }
            command = command_rx.recv() => command,
        };

        let Some(command) = command else {
            break;
        };

        if let Some(report) = session.apply(command) {
            if report_tx.send(report).await.is_err() {
                warn!("report channel closed; session exiting");
                break;
            }
        }
    }

    info!(
        commands = session.commands_processed,
        armed = session.plugin.tracker().armed_count(),
        "session finished"
    );
    session.plugin.cleanup();
    session
}
