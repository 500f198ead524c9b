// Launch geometry for a grenade: center trajectory plus two visible side shots.

use super::state::PlayerState;
use super::tuning::{GrenadeTuning, WorldTuning};
use super::vector::Vec3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LaunchPlan {
    /// Logical grenade origin (no sideways offset).
    pub center: Vec3,
    /// Spawn points of the two visible shots, left then right of the heading.
    pub side_shots: [Vec3; 2],
    /// Shared by the logical grenade and both side shots.
    pub velocity: Vec3,
}

/// Computes where and how a grenade launches from the shooter's current pose.
///
/// `perturbation` is the accuracy angle in radians. It only bends the velocity;
/// spawn positions always follow the true heading.
pub fn plan_launch(
    shooter: &PlayerState,
    world: WorldTuning,
    grenade: GrenadeTuning,
    perturbation: f32,
) -> LaunchPlan {
    let heading = shooter.rotation;
    let (sin_h, cos_h) = heading.sin_cos();

    let center = Vec3::new(
        shooter.position.x + cos_h * world.muzzle_front,
        shooter.position.y + sin_h * world.muzzle_front,
        shooter.position.z + world.muzzle_height,
    );

    // Perpendicular to the heading, in the ground plane.
    let offset = Vec3::new(-sin_h * grenade.width, cos_h * grenade.width, 0.0);

    let (sin_a, cos_a) = (heading + perturbation).sin_cos();
    let mut velocity = Vec3::new(
        cos_a * grenade.speed_factor,
        sin_a * grenade.speed_factor,
        perturbation.abs().sin(),
    );
    if grenade.vertical_velocity && world.shot_speed != 0.0 {
        velocity.z += shooter.velocity.z / world.shot_speed;
    }

    LaunchPlan {
        center,
        side_shots: [center + offset, center - offset],
        velocity,
    }
}
