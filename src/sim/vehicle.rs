//! The scooter and its keyboard motion integrator
//!
//! Motion is kinematic: each tick moves a fixed distance along the current
//! heading. There are no forces, so the same inputs always produce the same
//! path.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use super::input::InputState;
use crate::settings::MovementSettings;

/// Position and heading of the controlled scooter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleState {
    /// World position; y stays at the ground offset
    pub pos: Vec3,
    /// Rotation about the vertical axis (radians, 0 faces -z)
    pub yaw: f32,
    /// Any directional key was held on the last integrated tick
    pub moving: bool,
    /// Boost toggle
    pub boosting: bool,
}

impl VehicleState {
    /// Parked at the home position facing -z
    pub fn at_home(cfg: &MovementSettings) -> Self {
        Self {
            pos: Vec3::new(cfg.home_x, cfg.ground_y, cfg.home_z),
            yaw: 0.0,
            moving: false,
            boosting: false,
        }
    }

    /// Unit vector the scooter drives along when going forward
    pub fn forward(&self) -> Vec3 {
        Vec3::new(-self.yaw.sin(), 0.0, -self.yaw.cos())
    }

    /// Orientation as a quaternion (for camera offsets and rendering)
    pub fn rotation(&self) -> Quat {
        Quat::from_rotation_y(self.yaw)
    }

    /// Current per-tick speed including boost
    pub fn speed(&self, cfg: &MovementSettings) -> f32 {
        if self.boosting {
            cfg.base_speed * cfg.boost_multiplier
        } else {
            cfg.base_speed
        }
    }
}

/// What one integration step produced, for animation-only consumers
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MotionOutput {
    pub is_moving: bool,
    /// Positive forward, negative reverse, zero when not translating
    pub signed_speed: f32,
    /// -1 turning left, 1 turning right, 0 straight
    pub steer: f32,
}

/// Integrate one tick of keyboard input into the vehicle state.
///
/// Forward/back translate along the heading, left/right turn in place;
/// every combination is applied in the same tick. The boost latch is
/// sampled first so a fresh press affects this tick's speed.
pub fn integrate(
    vehicle: &mut VehicleState,
    input: &mut InputState,
    cfg: &MovementSettings,
) -> MotionOutput {
    if input.take_boost_toggle() {
        vehicle.boosting = !vehicle.boosting;
        log::debug!("Boost {}", if vehicle.boosting { "on" } else { "off" });
    }

    let speed = vehicle.speed(cfg);
    let mut out = MotionOutput::default();

    if input.forward {
        vehicle.pos.x -= vehicle.yaw.sin() * speed;
        vehicle.pos.z -= vehicle.yaw.cos() * speed;
        out.is_moving = true;
        out.signed_speed = speed;
    }
    if input.back {
        vehicle.pos.x += vehicle.yaw.sin() * speed;
        vehicle.pos.z += vehicle.yaw.cos() * speed;
        out.is_moving = true;
        out.signed_speed = -speed;
    }
    if input.left {
        vehicle.yaw += cfg.rotation_speed;
        out.is_moving = true;
        out.steer = -1.0;
    }
    if input.right {
        vehicle.yaw -= cfg.rotation_speed;
        out.is_moving = true;
        out.steer = 1.0;
    }

    vehicle.pos.y = cfg.ground_y;
    vehicle.moving = out.is_moving;
    out
}
