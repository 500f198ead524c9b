// Grenade flag plugin: first shot launches, second shot detonates.

use super::tracker::GrenadeTracker;
use super::types::{FireOutcome, GameEvent};
use crate::domain::launch::plan_launch;
use crate::domain::ports::GameHost;
use crate::domain::tuning::{GRENADE_FLAG, GrenadeTuning, WorldTuning};
use crate::domain::{AttributionKind, DeathEvent, PlayerId, PlayerState, ShotAttribution, ShotKind, Vec3};
use rand::Rng;
use tracing::{debug, info, warn};

pub const PLUGIN_NAME: &str = "Grenade Flag";

/// Plugin state owned by the hosting session.
pub struct GrenadeFlag<R> {
    tracker: GrenadeTracker,
    rng: R,
}

impl<R: Rng> GrenadeFlag<R> {
    pub fn new(rng: R) -> Self {
        Self {
            tracker: GrenadeTracker::new(),
            rng,
        }
    }

    pub fn tracker(&self) -> &GrenadeTracker {
        &self.tracker
    }

    /// Declares the custom flag and registers tunables with their defaults.
    pub fn init<H: GameHost + ?Sized>(&mut self, host: &mut H) {
        host.register_custom_flag(GRENADE_FLAG);
        GrenadeTuning::register_defaults(host);
        info!(plugin = PLUGIN_NAME, flag = GRENADE_FLAG.code, "plugin loaded");
    }

    /// Routes one host event to its handler.
    pub fn handle<H: GameHost + ?Sized>(
        &mut self,
        host: &mut H,
        event: &mut GameEvent,
    ) -> Option<FireOutcome> {
        match event {
            GameEvent::ShotFired { player_id } => Some(self.on_shot_fired(host, *player_id)),
            GameEvent::PlayerJoin { player_id } => {
                self.on_player_join(*player_id);
                None
            }
            GameEvent::PlayerPart { player_id } => {
                self.on_player_part(*player_id);
                None
            }
            GameEvent::PlayerDie(death) => {
                self.on_player_die(host, death);
                None
            }
        }
    }

    pub fn on_player_join(&mut self, player_id: PlayerId) {
        self.tracker.join(player_id);
        debug!(player_id, "grenade slot created");
    }

    pub fn on_player_part(&mut self, player_id: PlayerId) {
        if let Some(record) = self.tracker.part(player_id) {
            debug!(player_id, was_armed = record.active, "grenade slot released");
        }
    }

    pub fn on_shot_fired<H: GameHost + ?Sized>(&mut self, host: &mut H, player_id: PlayerId) -> FireOutcome {
        let Some(shooter) = host.player(player_id) else {
            warn!(player_id, "shot fired by unknown player");
            return FireOutcome::Ignored;
        };
        if !shooter.carries(GRENADE_FLAG.code) {
            return FireOutcome::Ignored;
        }

        self.tracker.ensure_tracked(player_id);
        let world = WorldTuning::from_settings(&*host);
        let now = host.now_seconds();

        // An expired grenade does not use up the trigger; relaunch instead.
        let replaced_expired = self
            .tracker
            .expire_if_stale(player_id, now, world.ballistics());

        if self.tracker.is_active(player_id) {
            self.detonate(host, &shooter, world, now)
        } else {
            self.launch(host, &shooter, world, now, replaced_expired)
        }
    }

    /// Credits kills by a grenade blast to the grenade's owner.
    ///
    /// Returns true when the event was rewritten. Tags of other kinds, or
    /// deaths without a shot, are left alone.
    pub fn on_player_die<H: GameHost + ?Sized>(&mut self, host: &mut H, death: &mut DeathEvent) -> bool {
        let Some(shot_id) = death.shot_id else {
            return false;
        };
        let Some(ShotAttribution {
            kind: AttributionKind::Grenade,
            owner,
        }) = host.attribution(shot_id)
        else {
            return false;
        };

        death.killer_id = owner;
        match host.team_of(owner) {
            Some(team) => death.killer_team = team,
            None => warn!(owner_id = owner, "grenade owner no longer present; keeping team"),
        }
        info!(
            victim_id = death.victim_id,
            killer_id = owner,
            shot_id,
            "grenade kill credited"
        );
        true
    }

    /// Drops every grenade slot when the plugin unloads.
    pub fn cleanup(&mut self) {
        self.tracker.flush();
    }

    fn launch<H: GameHost + ?Sized>(
        &mut self,
        host: &mut H,
        shooter: &PlayerState,
        world: WorldTuning,
        now: f64,
        replaced_expired: bool,
    ) -> FireOutcome {
        let grenade = GrenadeTuning::from_settings(&*host);
        let perturbation = if grenade.accuracy > 0.0 {
            self.rng.gen_range(-grenade.accuracy..=grenade.accuracy)
        } else {
            0.0
        };
        let plan = plan_launch(shooter, world, grenade, perturbation);

        let side_shots = plan
            .side_shots
            .map(|position| host.spawn_shot(ShotKind::PhantomZone, position, plan.velocity, shooter.team));
        self.tracker.launch(shooter.id, plan.center, plan.velocity, now);

        info!(
            player_id = shooter.id,
            origin = ?plan.center,
            velocity = ?plan.velocity,
            "grenade launched"
        );
        FireOutcome::Launched {
            side_shots,
            origin: plan.center,
            velocity: plan.velocity,
            replaced_expired,
        }
    }

    fn detonate<H: GameHost + ?Sized>(
        &mut self,
        host: &mut H,
        shooter: &PlayerState,
        world: WorldTuning,
        now: f64,
    ) -> FireOutcome {
        let Some(position) = self
            .tracker
            .detonation_position(shooter.id, now, world.shot_speed)
        else {
            return FireOutcome::Ignored;
        };

        let shot_id = host.spawn_shot(ShotKind::ShockWave, position, Vec3::ZERO, shooter.team);
        host.set_attribution(shot_id, ShotAttribution::grenade(shooter.id));
        self.tracker.clear(shooter.id);

        info!(player_id = shooter.id, shot_id, ?position, "grenade detonated");
        FireOutcome::Detonated { shot_id, position }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{SettingsRegistry, ShotWorld};
    use crate::domain::tuning::{GRENADE_ACCURACY, GRENADE_VERTICAL_VELOCITY};
    use crate::domain::TeamId;
    use crate::use_cases::host::SimulatedHost;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn setup(accuracy: f32) -> (SimulatedHost, GrenadeFlag<ChaCha8Rng>) {
        let mut host = SimulatedHost::new();
        let mut plugin = GrenadeFlag::new(ChaCha8Rng::seed_from_u64(7));
        plugin.init(&mut host);
        host.set_float(GRENADE_ACCURACY, accuracy);
        (host, plugin)
    }

    fn join_with_flag(host: &mut SimulatedHost, plugin: &mut GrenadeFlag<ChaCha8Rng>, id: PlayerId, team: TeamId) {
        let mut player = PlayerState::new(id, team);
        player.flag = Some(GRENADE_FLAG.code.to_string());
        host.add_player(player);
        plugin.handle(host, &mut GameEvent::PlayerJoin { player_id: id });
    }

    fn fire(host: &mut SimulatedHost, plugin: &mut GrenadeFlag<ChaCha8Rng>, id: PlayerId) -> FireOutcome {
        plugin
            .handle(host, &mut GameEvent::ShotFired { player_id: id })
            .expect("fire events produce an outcome")
    }

    #[test]
    fn init_registers_flag_and_defaults() {
        let (host, _plugin) = setup(0.02);
        assert_eq!(host.custom_flags(), &[GRENADE_FLAG]);
        assert_eq!(host.flag(GRENADE_VERTICAL_VELOCITY), Some(false));
        assert_eq!(GrenadeTuning::from_settings(&host).speed_factor, 4.0);
    }

    #[test]
    fn first_shot_launches_two_side_shots() {
        let (mut host, mut plugin) = setup(0.0);
        join_with_flag(&mut host, &mut plugin, 1, TeamId::Red);
        let world = WorldTuning::default();

        let FireOutcome::Launched { side_shots, origin, velocity, replaced_expired } =
            fire(&mut host, &mut plugin, 1)
        else {
            panic!("expected a launch");
        };

        assert!(!replaced_expired);
        assert!(origin.approx_eq(Vec3::new(world.muzzle_front, 0.0, world.muzzle_height), 1e-5));
        assert!(velocity.approx_eq(Vec3::new(4.0, 0.0, 0.0), 1e-6));
        let left = host.shot(side_shots[0]).expect("side shot spawned");
        let right = host.shot(side_shots[1]).expect("side shot spawned");
        assert_eq!(left.kind, ShotKind::PhantomZone);
        assert_eq!(left.team, TeamId::Red);
        assert!(left.position.approx_eq(Vec3::new(world.muzzle_front, 2.0, world.muzzle_height), 1e-5));
        assert!(right.position.approx_eq(Vec3::new(world.muzzle_front, -2.0, world.muzzle_height), 1e-5));
        assert_eq!(left.velocity, right.velocity);
        assert!(plugin.tracker().is_active(1));
    }

    #[test]
    fn second_shot_detonates_and_tags_blast() {
        let (mut host, mut plugin) = setup(0.0);
        join_with_flag(&mut host, &mut plugin, 1, TeamId::Red);
        let world = WorldTuning::default();

        fire(&mut host, &mut plugin, 1);
        host.advance(1.0);
        let FireOutcome::Detonated { shot_id, position } = fire(&mut host, &mut plugin, 1) else {
            panic!("expected a detonation");
        };

        let expected = Vec3::new(world.muzzle_front + 4.0 * world.shot_speed, 0.0, world.muzzle_height);
        assert!(position.approx_eq(expected, 1e-3));
        let blast = host.shot(shot_id).expect("blast spawned");
        assert_eq!(blast.kind, ShotKind::ShockWave);
        assert_eq!(blast.velocity, Vec3::ZERO);
        assert_eq!(host.attribution(shot_id), Some(ShotAttribution::grenade(1)));
        assert!(!plugin.tracker().is_active(1));
    }

    #[test]
    fn grounded_grenade_relaunches_instead_of_detonating() {
        let (mut host, mut plugin) = setup(0.0);
        host.set_flag(GRENADE_VERTICAL_VELOCITY, true);
        join_with_flag(&mut host, &mut plugin, 1, TeamId::Green);
        if let Some(p) = host.player_mut(1) {
            p.velocity = Vec3::new(0.0, 0.0, -50.0);
        }

        fire(&mut host, &mut plugin, 1);
        host.advance(0.5);
        let outcome = fire(&mut host, &mut plugin, 1);

        assert!(matches!(outcome, FireOutcome::Launched { replaced_expired: true, .. }));
        assert!(host.shots().iter().all(|s| s.kind == ShotKind::PhantomZone));
        assert_eq!(host.shots().len(), 4);
        assert_eq!(plugin.tracker().armed_count(), 1);
    }

    #[test]
    fn players_without_the_flag_are_ignored() {
        let (mut host, mut plugin) = setup(0.0);
        host.add_player(PlayerState::new(2, TeamId::Blue));
        plugin.handle(&mut host, &mut GameEvent::PlayerJoin { player_id: 2 });

        assert_eq!(fire(&mut host, &mut plugin, 2), FireOutcome::Ignored);
        assert_eq!(fire(&mut host, &mut plugin, 404), FireOutcome::Ignored);
        assert!(host.shots().is_empty());
    }

    #[test]
    fn missing_slot_is_recreated_on_fire() {
        let (mut host, mut plugin) = setup(0.0);
        let mut player = PlayerState::new(3, TeamId::Purple);
        player.flag = Some(GRENADE_FLAG.code.to_string());
        host.add_player(player);

        assert!(matches!(fire(&mut host, &mut plugin, 3), FireOutcome::Launched { .. }));
        assert!(plugin.tracker().is_active(3));
    }

    #[test]
    fn accuracy_bounds_the_heading_error() {
        let (mut host, mut plugin) = setup(0.05);
        join_with_flag(&mut host, &mut plugin, 1, TeamId::Red);

        for _ in 0..20 {
            let FireOutcome::Launched { velocity, .. } = fire(&mut host, &mut plugin, 1) else {
                panic!("expected a launch");
            };
            let angle = velocity.y.atan2(velocity.x);
            assert!(angle.abs() <= 0.05 + 1e-6);
            assert!((velocity.z - angle.abs().sin()).abs() < 1e-4);
            plugin.tracker.clear(1);
        }
    }

    #[test]
    fn grenade_kill_is_credited_to_owner() {
        let (mut host, mut plugin) = setup(0.0);
        join_with_flag(&mut host, &mut plugin, 1, TeamId::Red);
        host.add_player(PlayerState::new(2, TeamId::Blue));
        host.add_player(PlayerState::new(3, TeamId::Green));

        fire(&mut host, &mut plugin, 1);
        let FireOutcome::Detonated { shot_id, .. } = fire(&mut host, &mut plugin, 1) else {
            panic!("expected a detonation");
        };

        // One blast may kill several players; each death is credited.
        for victim in [2, 3] {
            let mut death = DeathEvent {
                victim_id: victim,
                killer_id: 99,
                killer_team: TeamId::Rogue,
                shot_id: Some(shot_id),
            };
            assert!(plugin.on_player_die(&mut host, &mut death));
            assert_eq!(death.killer_id, 1);
            assert_eq!(death.killer_team, TeamId::Red);
        }
    }

    #[test]
    fn foreign_or_missing_tags_leave_death_untouched() {
        let (mut host, mut plugin) = setup(0.0);
        let shot = host.spawn_shot(ShotKind::ShockWave, Vec3::ZERO, Vec3::ZERO, TeamId::Blue);
        host.set_attribution(
            shot,
            ShotAttribution {
                kind: AttributionKind::Foreign("GK".to_string()),
                owner: 5,
            },
        );
        let untagged = host.spawn_shot(ShotKind::ShockWave, Vec3::ZERO, Vec3::ZERO, TeamId::Blue);

        for shot_id in [Some(shot), Some(untagged), None] {
            let original = DeathEvent {
                victim_id: 2,
                killer_id: 4,
                killer_team: TeamId::Blue,
                shot_id,
            };
            let mut death = original.clone();
            let mut event = GameEvent::PlayerDie(death.clone());
            plugin.handle(&mut host, &mut event);
            assert_eq!(event, GameEvent::PlayerDie(original.clone()));
            assert!(!plugin.on_player_die(&mut host, &mut death));
            assert_eq!(death, original);
        }
    }

    #[test]
    fn departed_owner_keeps_reported_team() {
        let (mut host, mut plugin) = setup(0.0);
        join_with_flag(&mut host, &mut plugin, 1, TeamId::Red);
        fire(&mut host, &mut plugin, 1);
        let FireOutcome::Detonated { shot_id, .. } = fire(&mut host, &mut plugin, 1) else {
            panic!("expected a detonation");
        };
        host.remove_player(1);
        plugin.handle(&mut host, &mut GameEvent::PlayerPart { player_id: 1 });

        let mut death = DeathEvent {
            victim_id: 2,
            killer_id: 2,
            killer_team: TeamId::Blue,
            shot_id: Some(shot_id),
        };
        assert!(plugin.on_player_die(&mut host, &mut death));
        assert_eq!(death.killer_id, 1);
        assert_eq!(death.killer_team, TeamId::Blue);
    }

    #[test]
    fn each_trigger_toggles_only_the_shooters_slot() {
        let (mut host, mut plugin) = setup(0.02);
        for id in 1..=3 {
            join_with_flag(&mut host, &mut plugin, id, TeamId::Red);
        }
        let mut armed = [false; 3];
        for step in 0..30u64 {
            let id = step % 3 + 1;
            let slot = (id - 1) as usize;
            let outcome = fire(&mut host, &mut plugin, id);
            // Short hops keep every grenade in flight, so triggers alternate.
            host.advance(0.1);

            if armed[slot] {
                assert!(matches!(outcome, FireOutcome::Detonated { .. }), "step {step}");
            } else {
                assert!(matches!(outcome, FireOutcome::Launched { replaced_expired: false, .. }), "step {step}");
            }
            armed[slot] = !armed[slot];

            for other in 1..=3u64 {
                assert_eq!(plugin.tracker().is_active(other), armed[(other - 1) as usize], "step {step}");
            }
            let expected = armed.iter().filter(|a| **a).count();
            assert_eq!(plugin.tracker().armed_count(), expected);
            assert_eq!(plugin.tracker().tracked_count(), 3);
        }
    }

    #[test]
    fn oversized_or_infinite_accuracy_still_launches() {
        for accuracy in [f32::INFINITY, 3.0e38, -3.0e38, f32::NAN] {
            let (mut host, mut plugin) = setup(accuracy);
            join_with_flag(&mut host, &mut plugin, 1, TeamId::Red);

            for _ in 0..10 {
                let FireOutcome::Launched { velocity, .. } = fire(&mut host, &mut plugin, 1) else {
                    panic!("expected a launch with accuracy {accuracy}");
                };
                assert!(velocity.x.is_finite() && velocity.y.is_finite() && velocity.z.is_finite());
                let angle = velocity.y.atan2(velocity.x);
                assert!(angle.abs() <= std::f32::consts::PI + 1e-5);
                plugin.tracker.clear(1);
            }
        }
        assert_eq!(
            GrenadeTuning::from_settings(&setup(f32::INFINITY).0).accuracy,
            GrenadeTuning::default().accuracy
        );
        assert_eq!(
            GrenadeTuning::from_settings(&setup(-3.0e38).0).accuracy,
            std::f32::consts::PI
        );
    }

    #[test]
    fn cleanup_flushes_slots() {
        let (mut host, mut plugin) = setup(0.0);
        join_with_flag(&mut host, &mut plugin, 1, TeamId::Red);
        fire(&mut host, &mut plugin, 1);
        plugin.cleanup();
        assert_eq!(plugin.tracker().tracked_count(), 0);
    }
}
