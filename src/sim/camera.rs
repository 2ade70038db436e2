//! Chase camera framing, zoom and screen picking

use glam::{Mat4, Vec2, Vec3};
use serde::{Deserialize, Serialize};

use super::obstacle::ObstacleField;
use super::vehicle::VehicleState;
use super::zone::{WorldLayout, ZoneId};
use crate::consts::*;
use crate::settings::CameraSettings;

/// Below this distance the camera snaps to a first-person-ish view
const CLOSE_DISTANCE: f32 = 4.0;
const MIN_HEIGHT: f32 = 1.5;
const MAX_HEIGHT: f32 = 8.0;
const MIN_BACK_OFFSET: f32 = 0.5;
const MAX_BACK_OFFSET: f32 = 12.0;
/// Position smoothing when zoomed out
const FOLLOW_LERP: f32 = 0.1;

/// Camera placement and the zoom scalar that drives it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraRig {
    /// Zoom scalar, clamped to [min_zoom, max_zoom]
    pub distance: f32,
    pub position: Vec3,
    /// Point the camera looks at
    pub target: Vec3,
    /// Viewport width / height
    pub aspect: f32,
    cfg: CameraSettings,
}

impl CameraRig {
    pub fn new(cfg: &CameraSettings, home: Vec3) -> Self {
        Self {
            distance: cfg.distance.clamp(cfg.min_zoom, cfg.max_zoom),
            position: Vec3::new(0.0, 8.0, 42.0),
            target: home,
            aspect: 16.0 / 9.0,
            cfg: cfg.clone(),
        }
    }

    /// Step the zoom one notch; negative deltas (wheel up) zoom in.
    /// Returns true if the distance changed.
    pub fn zoom(&mut self, delta: f32) -> bool {
        if delta == 0.0 || delta.is_nan() {
            return false;
        }
        let before = self.distance;
        self.distance = if delta < 0.0 {
            (self.distance - self.cfg.zoom_step).max(self.cfg.min_zoom)
        } else {
            (self.distance + self.cfg.zoom_step).min(self.cfg.max_zoom)
        };
        self.distance != before
    }

    pub fn set_viewport(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    /// 0 at closest zoom, 1 at furthest
    pub fn height_ratio(&self) -> f32 {
        let span = self.cfg.max_zoom - self.cfg.min_zoom;
        if span <= 0.0 {
            return 1.0;
        }
        ((self.distance - self.cfg.min_zoom) / span).clamp(0.0, 1.0)
    }

    /// Where the camera wants to be this tick (before smoothing)
    pub fn desired_position(&self, vehicle: &VehicleState) -> Vec3 {
        let t = self.height_ratio();
        let height = MIN_HEIGHT + (MAX_HEIGHT - MIN_HEIGHT) * t;
        let back = MIN_BACK_OFFSET + (MAX_BACK_OFFSET - MIN_BACK_OFFSET) * t;
        vehicle.pos + vehicle.rotation() * Vec3::new(0.0, height, back)
    }

    fn is_close(&self) -> bool {
        self.distance < CLOSE_DISTANCE
    }

    /// Follow the vehicle: snap when close, ease when zoomed out
    pub fn update(&mut self, vehicle: &VehicleState) {
        let factor = if self.is_close() { 1.0 } else { FOLLOW_LERP };
        self.position = self.position.lerp(self.desired_position(vehicle), factor);

        let look = if self.is_close() {
            Vec3::new(0.0, 1.5, -10.0)
        } else {
            Vec3::ZERO
        };
        self.target = vehicle.pos + vehicle.rotation() * look;
    }

    pub fn fov_y(&self) -> f32 {
        self.cfg.fov_deg.to_radians()
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, Vec3::Y)
    }

    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y(), self.aspect, CAMERA_NEAR, CAMERA_FAR)
    }

    /// World-space ray through a point in normalized device coordinates
    /// (x right, y up, both in [-1, 1])
    pub fn ray(&self, ndc: Vec2) -> (Vec3, Vec3) {
        let inv = (self.projection() * self.view()).inverse();
        let near = inv.project_point3(Vec3::new(ndc.x, ndc.y, 0.0));
        let far = inv.project_point3(Vec3::new(ndc.x, ndc.y, 1.0));
        (near, (far - near).normalize_or_zero())
    }

    /// Zone marker under a screen point, if no tree canopy is in the way
    pub fn pick_zone(
        &self,
        ndc: Vec2,
        layout: &WorldLayout,
        obstacles: &ObstacleField,
    ) -> Option<ZoneId> {
        let (origin, dir) = self.ray(ndc);
        if dir.y >= 0.0 {
            return None;
        }

        let t_marker = (ZONE_MARKER_HEIGHT - origin.y) / dir.y;
        if t_marker <= 0.0 {
            return None;
        }
        let hit = origin + dir * t_marker;
        let zone = layout.zone_at(Vec2::new(hit.x, hit.z))?;

        let occluded = obstacles.iter().any(|o| {
            let centre = Vec3::new(o.pos.x, CANOPY_HEIGHT, o.pos.y);
            ray_sphere(origin, dir, centre, CANOPY_RADIUS).is_some_and(|t| t < t_marker)
        });
        if occluded { None } else { Some(zone) }
    }
}

/// Nearest positive hit distance of a unit ray against a sphere
fn ray_sphere(origin: Vec3, dir: Vec3, centre: Vec3, radius: f32) -> Option<f32> {
    let oc = origin - centre;
    let b = oc.dot(dir);
    let c = oc.length_squared() - radius * radius;
    let disc = b * b - c;
    if disc < 0.0 {
        return None;
    }
    let sqrt = disc.sqrt();
    [-b - sqrt, -b + sqrt].into_iter().find(|t| *t > 0.0)
}

/// Convert a pixel position to normalized device coordinates
pub fn pixel_to_ndc(x: f32, y: f32, width: f32, height: f32) -> Vec2 {
    Vec2::new((x / width) * 2.0 - 1.0, -(y / height) * 2.0 + 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::MovementSettings;
    use crate::sim::obstacle::Obstacle;

    fn rig() -> CameraRig {
        CameraRig::new(&CameraSettings::default(), Vec3::new(0.0, 0.4, 30.0))
    }

    #[test]
    fn test_zoom_clamps() {
        let mut cam = rig();
        assert!(!cam.zoom(1.0));
        assert_eq!(cam.distance, MAX_ZOOM);
        for _ in 0..100 {
            cam.zoom(-3.0);
        }
        assert_eq!(cam.distance, MIN_ZOOM);
        assert!(cam.zoom(5.0));
        assert_eq!(cam.distance, MIN_ZOOM + ZOOM_SPEED);
    }

    #[test]
    fn test_far_camera_sits_behind_and_above() {
        let cam = rig();
        let vehicle = VehicleState::at_home(&MovementSettings::default());
        let desired = cam.desired_position(&vehicle);
        assert!((desired - Vec3::new(0.0, 8.4, 42.0)).length() < 1e-4);
    }

    #[test]
    fn test_close_camera_snaps_and_looks_ahead() {
        let mut cam = rig();
        while cam.distance > MIN_ZOOM {
            cam.zoom(-1.0);
        }
        let vehicle = VehicleState::at_home(&MovementSettings::default());
        cam.update(&vehicle);
        assert!((cam.position - Vec3::new(0.0, 1.9, 30.5)).length() < 1e-4);
        assert!((cam.target - Vec3::new(0.0, 1.9, 20.0)).length() < 1e-4);
    }

    #[test]
    fn test_rotated_vehicle_rotates_offset() {
        let cam = rig();
        let mut vehicle = VehicleState::at_home(&MovementSettings::default());
        vehicle.yaw = std::f32::consts::FRAC_PI_2;
        // Facing -x, so the camera trails along +x
        let desired = cam.desired_position(&vehicle);
        assert!((desired.x - 12.0).abs() < 1e-4);
        assert!((desired.z - 30.0).abs() < 1e-4);
    }

    fn camera_over(point: Vec3) -> CameraRig {
        let mut cam = rig();
        cam.position = point + Vec3::new(0.0, 20.0, 0.01);
        cam.target = point;
        cam.aspect = 1.0;
        cam
    }

    #[test]
    fn test_pick_zone_from_above() {
        let cam = camera_over(Vec3::new(20.0, 0.0, -20.0));
        let layout = WorldLayout::default();
        assert_eq!(
            cam.pick_zone(Vec2::ZERO, &layout, &ObstacleField::empty()),
            Some(ZoneId::Skills)
        );
        // Corner of the screen lands on plain ground
        assert_eq!(
            cam.pick_zone(Vec2::new(0.9, 0.9), &layout, &ObstacleField::empty()),
            None
        );
    }

    #[test]
    fn test_canopy_blocks_pick() {
        let cam = camera_over(Vec3::new(0.0, 0.0, 0.0));
        let layout = WorldLayout::default();
        let trees = ObstacleField::from_obstacles(vec![Obstacle::new(0.0, 0.0, 2.0)]);
        assert_eq!(cam.pick_zone(Vec2::ZERO, &layout, &trees), None);
    }

    #[test]
    fn test_pixel_to_ndc() {
        assert_eq!(pixel_to_ndc(0.0, 0.0, 100.0, 50.0), Vec2::new(-1.0, 1.0));
        assert_eq!(pixel_to_ndc(50.0, 25.0, 100.0, 50.0), Vec2::ZERO);
    }
}
