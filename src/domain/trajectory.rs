// Linear ballistic projection and expiration rules for logical grenades.

use super::vector::Vec3;

/// Ambient shot constants the host applies to every projectile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ballistics {
    /// World units per second for a unit shot velocity.
    pub shot_speed: f32,
    /// Distance along the trajectory after which a shot is spent.
    pub shot_range: f32,
}

/// Projected position after `elapsed_seconds` of flight.
///
/// Motion is linear: no gravity and no drag. Any vertical movement comes from
/// the launch velocity itself.
pub fn position(origin: Vec3, velocity: Vec3, elapsed_seconds: f64, shot_speed: f32) -> Vec3 {
    let travel = (elapsed_seconds * f64::from(shot_speed)) as f32;
    origin + velocity * travel
}

/// Returns true once the grenade has reached the ground or used up its range.
///
/// Checked lazily, so it reports the first observation after either condition
/// became true. Zero (or negative) elapsed time is never expired.
pub fn is_expired(
    origin: Vec3,
    velocity: Vec3,
    launch_time: f64,
    now: f64,
    ballistics: Ballistics,
) -> bool {
    let elapsed = now - launch_time;
    if elapsed <= 0.0 {
        return false;
    }

    // A zeroed speed or range disables grenades outright.
    if ballistics.shot_speed <= 0.0 || ballistics.shot_range <= 0.0 {
        return true;
    }

    if position(origin, velocity, elapsed, ballistics.shot_speed).z <= 0.0 {
        return true;
    }

    elapsed * f64::from(ballistics.shot_speed) >= f64::from(ballistics.shot_range)
}
