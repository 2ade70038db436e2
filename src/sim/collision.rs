//! Collision resolution against the world boundary and static obstacles
//!
//! Runs after motion integration. Navigation bypasses it entirely: a
//! waypoint glide is allowed to pass through trees, and the zone targets
//! all sit inside the boundary.

use glam::Vec2;

use super::obstacle::ObstacleField;
use super::vehicle::VehicleState;
use crate::settings::CollisionSettings;

/// Result of resolving one tick's collisions
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollisionResult {
    /// Either axis hit the boundary
    pub clamped: bool,
    /// Number of obstacles the vehicle was pushed out of
    pub pushes: u32,
}

impl CollisionResult {
    pub fn hit(&self) -> bool {
        self.clamped || self.pushes > 0
    }
}

/// Clamp x and z independently to ±boundary (square, not radial)
pub fn clamp_to_boundary(vehicle: &mut VehicleState, boundary: f32) -> bool {
    let x = vehicle.pos.x.clamp(-boundary, boundary);
    let z = vehicle.pos.z.clamp(-boundary, boundary);
    let clamped = x != vehicle.pos.x || z != vehicle.pos.z;
    vehicle.pos.x = x;
    vehicle.pos.z = z;
    clamped
}

/// Push the vehicle straight out of every obstacle it overlaps.
///
/// Each overlap is resolved in iteration order along the obstacle→vehicle
/// ray by the overlap depth plus `epsilon`. Pushes are additive; a single
/// overlap always ends strictly outside the combined radius.
pub fn push_out_of_obstacles(
    vehicle: &mut VehicleState,
    obstacles: &ObstacleField,
    vehicle_radius: f32,
    epsilon: f32,
) -> u32 {
    let mut pushes = 0;
    for obstacle in obstacles.iter() {
        let offset = Vec2::new(
            vehicle.pos.x - obstacle.pos.x,
            vehicle.pos.z - obstacle.pos.y,
        );
        let distance = offset.length();
        let min_distance = vehicle_radius + obstacle.radius;

        if distance < min_distance {
            // atan2(0, 0) = 0, so a dead-centre hit pushes along +x
            let angle = offset.y.atan2(offset.x);
            let push = min_distance - distance + epsilon;
            vehicle.pos.x += angle.cos() * push;
            vehicle.pos.z += angle.sin() * push;
            pushes += 1;
            log::trace!(
                "Pushed out of obstacle at ({:.1}, {:.1}) by {:.3}",
                obstacle.pos.x,
                obstacle.pos.y,
                push
            );
        }
    }
    pushes
}

/// Apply both constraints, boundary first.
///
/// The boundary is re-applied after the push-out so it always holds; for
/// obstacles placed inside the spawn extent the second clamp never moves
/// the vehicle.
pub fn resolve(
    vehicle: &mut VehicleState,
    obstacles: &ObstacleField,
    cfg: &CollisionSettings,
) -> CollisionResult {
    let mut clamped = clamp_to_boundary(vehicle, cfg.boundary);
    let pushes = push_out_of_obstacles(vehicle, obstacles, cfg.vehicle_radius, cfg.push_epsilon);
    if pushes > 0 {
        clamped |= clamp_to_boundary(vehicle, cfg.boundary);
    }
    CollisionResult { clamped, pushes }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::MovementSettings;
    use crate::sim::obstacle::Obstacle;
    use glam::Vec3;

    fn vehicle_at(x: f32, z: f32) -> VehicleState {
        let mut v = VehicleState::at_home(&MovementSettings::default());
        v.pos = Vec3::new(x, 0.4, z);
        v
    }

    #[test]
    fn test_boundary_clamps_each_axis_independently() {
        let mut v = vehicle_at(60.0, -10.0);
        assert!(clamp_to_boundary(&mut v, 50.0));
        assert_eq!(v.pos.x, 50.0);
        assert_eq!(v.pos.z, -10.0);

        // Corner clamping, not radial
        let mut v = vehicle_at(-70.0, 80.0);
        clamp_to_boundary(&mut v, 50.0);
        assert_eq!((v.pos.x, v.pos.z), (-50.0, 50.0));
    }

    #[test]
    fn test_inside_boundary_is_untouched() {
        let mut v = vehicle_at(49.9, -49.9);
        assert!(!clamp_to_boundary(&mut v, 50.0));
        assert_eq!((v.pos.x, v.pos.z), (49.9, -49.9));
    }

    #[test]
    fn test_push_out_along_ray() {
        let field = ObstacleField::from_obstacles(vec![Obstacle::new(10.0, 10.0, 2.0)]);
        let mut v = vehicle_at(12.0, 10.0);

        assert_eq!(push_out_of_obstacles(&mut v, &field, 1.5, 0.1), 1);
        assert!((v.pos.x - 13.6).abs() < 1e-4);
        assert!((v.pos.z - 10.0).abs() < 1e-5);
        let d = Vec2::new(v.pos.x - 10.0, v.pos.z - 10.0).length();
        assert!(d >= 3.5);
    }

    #[test]
    fn test_dead_centre_pushes_along_positive_x() {
        let field = ObstacleField::from_obstacles(vec![Obstacle::new(0.0, 20.0, 2.0)]);
        let mut v = vehicle_at(0.0, 20.0);
        push_out_of_obstacles(&mut v, &field, 1.5, 0.1);
        assert!((v.pos.x - 3.6).abs() < 1e-5);
        assert!((v.pos.z - 20.0).abs() < 1e-5);
    }

    #[test]
    fn test_resolve_reports_hits() {
        let field = ObstacleField::from_obstacles(vec![Obstacle::new(48.0, 0.0, 2.0)]);
        let mut v = vehicle_at(55.0, 0.0);
        let result = resolve(&mut v, &field, &CollisionSettings::default());
        assert!(result.clamped);
        assert_eq!(result.pushes, 1);
        assert!(result.hit());
        // Boundary wins over an obstacle hugging the wall
        assert_eq!(v.pos.x, 50.0);
    }
}
