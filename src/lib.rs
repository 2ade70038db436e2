//! Scooter CV - an interactive résumé world
//!
//! Core modules:
//! - `sim`: Deterministic simulation (movement, collisions, zones, navigation)
//! - `renderer`: WebGPU rendering pipeline
//! - `ui`: Display sink seam between the simulation and the page
//! - `content`: Read-only CV content store
//! - `settings`: Data-driven tuning

pub mod content;
pub mod error;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod ui;

pub use content::CvData;
pub use error::{AssetError, ConfigError, ContentError, RenderError};
pub use settings::Settings;

use glam::{Vec2, Vec3};

/// World configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, one step per display refresh)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Largest frame delta fed into the accumulator (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Scooter rides at a fixed height above the ground plane
    pub const GROUND_Y: f32 = 0.4;
    /// Where the scooter starts and where reset sends it
    pub const HOME_X: f32 = 0.0;
    pub const HOME_Z: f32 = 30.0;

    /// Movement per tick
    pub const BASE_SPEED: f32 = 0.1;
    pub const BOOST_MULTIPLIER: f32 = 2.5;
    pub const ROTATION_SPEED: f32 = 0.02;

    /// Square world boundary (both axes clamp to ±BOUNDARY)
    pub const BOUNDARY: f32 = 50.0;
    pub const VEHICLE_RADIUS: f32 = 1.5;
    pub const OBSTACLE_RADIUS: f32 = 2.0;
    /// Extra push distance so the next tick doesn't re-detect the overlap
    pub const PUSH_EPSILON: f32 = 0.1;

    /// Zone radii
    pub const ZONE_PROXIMITY_RADIUS: f32 = 3.0;
    pub const ZONE_DISPLAY_RADIUS: f32 = 8.0;
    /// Height of the top face of a zone marker (picking plane)
    pub const ZONE_MARKER_HEIGHT: f32 = 0.5;

    /// Obstacle (tree) placement
    pub const OBSTACLE_COUNT: usize = 20;
    pub const OBSTACLE_MAX_ATTEMPTS: usize = 1000;
    pub const OBSTACLE_SPAWN_HALF_EXTENT: f32 = 40.0;
    /// Tree canopy sphere (occludes picking)
    pub const CANOPY_RADIUS: f32 = 2.0;
    pub const CANOPY_HEIGHT: f32 = 4.0;

    /// Waypoint navigation animation length (ms)
    pub const NAVIGATION_DURATION_MS: f64 = 2000.0;

    /// Camera zoom
    pub const CAMERA_DISTANCE: f32 = 12.0;
    pub const MIN_ZOOM: f32 = 2.0;
    pub const MAX_ZOOM: f32 = 12.0;
    pub const ZOOM_SPEED: f32 = 0.5;
    /// Vertical field of view (degrees)
    pub const CAMERA_FOV_DEG: f32 = 75.0;
    pub const CAMERA_NEAR: f32 = 0.1;
    pub const CAMERA_FAR: f32 = 1000.0;
}

/// Cubic ease-out: fast start, decelerating into the target
#[inline]
pub fn ease_out_cubic(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t).powi(3)
}

/// Exponential approach of `current` toward `target` by `factor` in (0, 1)
#[inline]
pub fn approach(current: f32, target: f32, factor: f32) -> f32 {
    current + (target - current) * factor
}

/// Project a world position onto the ground plane (x, z)
#[inline]
pub fn planar(pos: Vec3) -> Vec2 {
    Vec2::new(pos.x, pos.z)
}

/// Distance between two points measured on the ground plane only
#[inline]
pub fn planar_distance(a: Vec3, b: Vec2) -> f32 {
    planar(a).distance(b)
}
