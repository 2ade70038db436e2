//! World tuning and render preferences
//!
//! Every gameplay constant lives in `consts`; `Settings` carries them as
//! data so a page can override any of them with an inline JSON block.
//! Nothing here is persisted.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(QualityPreset::Low),
            "medium" | "med" => Some(QualityPreset::Medium),
            "high" => Some(QualityPreset::High),
            _ => None,
        }
    }

    /// Raymarch step budget per pixel
    pub fn march_steps(&self) -> u32 {
        match self {
            QualityPreset::Low => 64,
            QualityPreset::Medium => 96,
            QualityPreset::High => 160,
        }
    }

    /// Whether to march soft shadows toward the sun
    pub fn soft_shadows(&self) -> bool {
        match self {
            QualityPreset::Low => false,
            QualityPreset::Medium => true,
            QualityPreset::High => true,
        }
    }

    /// Exhaust smoke particles uploaded to the GPU
    pub fn max_smoke(&self) -> usize {
        match self {
            QualityPreset::Low => 0,
            QualityPreset::Medium => 24,
            QualityPreset::High => 50,
        }
    }
}

/// Keyboard-driven motion
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementSettings {
    /// Units per tick
    pub base_speed: f32,
    pub boost_multiplier: f32,
    /// Radians per tick
    pub rotation_speed: f32,
    pub ground_y: f32,
    pub home_x: f32,
    pub home_z: f32,
}

impl Default for MovementSettings {
    fn default() -> Self {
        Self {
            base_speed: BASE_SPEED,
            boost_multiplier: BOOST_MULTIPLIER,
            rotation_speed: ROTATION_SPEED,
            ground_y: GROUND_Y,
            home_x: HOME_X,
            home_z: HOME_Z,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CollisionSettings {
    pub boundary: f32,
    pub vehicle_radius: f32,
    pub push_epsilon: f32,
}

impl Default for CollisionSettings {
    fn default() -> Self {
        Self {
            boundary: BOUNDARY,
            vehicle_radius: VEHICLE_RADIUS,
            push_epsilon: PUSH_EPSILON,
        }
    }
}

/// Zone radii and obstacle placement
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldSettings {
    pub proximity_radius: f32,
    pub display_radius: f32,
    pub obstacle_count: usize,
    pub obstacle_radius: f32,
    pub obstacle_max_attempts: usize,
    pub obstacle_spawn_half_extent: f32,
    /// Seed for obstacle placement; `None` picks one at startup
    pub seed: Option<u64>,
}

impl Default for WorldSettings {
    fn default() -> Self {
        Self {
            proximity_radius: ZONE_PROXIMITY_RADIUS,
            display_radius: ZONE_DISPLAY_RADIUS,
            obstacle_count: OBSTACLE_COUNT,
            obstacle_radius: OBSTACLE_RADIUS,
            obstacle_max_attempts: OBSTACLE_MAX_ATTEMPTS,
            obstacle_spawn_half_extent: OBSTACLE_SPAWN_HALF_EXTENT,
            seed: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationSettings {
    pub duration_ms: f64,
}

impl Default for NavigationSettings {
    fn default() -> Self {
        Self {
            duration_ms: NAVIGATION_DURATION_MS,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    pub distance: f32,
    pub min_zoom: f32,
    pub max_zoom: f32,
    pub zoom_step: f32,
    pub fov_deg: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            distance: CAMERA_DISTANCE,
            min_zoom: MIN_ZOOM,
            max_zoom: MAX_ZOOM,
            zoom_step: ZOOM_SPEED,
            fov_deg: CAMERA_FOV_DEG,
        }
    }
}

/// All tuning for one page load
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Graphics quality preset
    pub quality: QualityPreset,
    pub movement: MovementSettings,
    pub collision: CollisionSettings,
    pub world: WorldSettings,
    pub navigation: NavigationSettings,
    pub camera: CameraSettings,
}

impl Settings {
    /// Create settings from a quality preset
    pub fn from_preset(preset: QualityPreset) -> Self {
        Self {
            quality: preset,
            ..Self::default()
        }
    }

    /// Parse settings from JSON; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject values the simulation can't work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
            if value > 0.0 && value.is_finite() {
                Ok(())
            } else {
                Err(ConfigError::Invalid {
                    field,
                    reason: format!("must be positive, got {value}"),
                })
            }
        }

        positive("movement.base_speed", self.movement.base_speed)?;
        positive("movement.boost_multiplier", self.movement.boost_multiplier)?;
        positive("collision.boundary", self.collision.boundary)?;
        positive("collision.vehicle_radius", self.collision.vehicle_radius)?;
        positive("world.proximity_radius", self.world.proximity_radius)?;
        positive("world.display_radius", self.world.display_radius)?;
        positive("world.obstacle_radius", self.world.obstacle_radius)?;
        positive("camera.zoom_step", self.camera.zoom_step)?;
        positive("camera.fov_deg", self.camera.fov_deg)?;

        let duration = self.navigation.duration_ms;
        if duration.is_nan() || duration <= 0.0 {
            return Err(ConfigError::Invalid {
                field: "navigation.duration_ms",
                reason: format!("must be positive, got {duration}"),
            });
        }

        let cam = &self.camera;
        if !(cam.min_zoom <= cam.distance && cam.distance <= cam.max_zoom) {
            return Err(ConfigError::Invalid {
                field: "camera.distance",
                reason: format!(
                    "{} is outside [{}, {}]",
                    cam.distance, cam.min_zoom, cam.max_zoom
                ),
            });
        }

        Ok(())
    }

    /// Read an inline `<script id="world-config" type="application/json">`
    /// block, falling back to defaults (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let text = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id("world-config"))
            .and_then(|el| el.text_content());

        match text {
            Some(json) if !json.trim().is_empty() => match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded world config from page");
                    settings
                }
                Err(e) => {
                    log::warn!("Ignoring world config: {e}");
                    Self::default()
                }
            },
            _ => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    /// Read the JSON file named by `SCOOTER_CV_CONFIG`, falling back to
    /// defaults (native only)
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        let Ok(path) = std::env::var("SCOOTER_CV_CONFIG") else {
            return Self::default();
        };
        match std::fs::read_to_string(&path) {
            Ok(json) => Self::from_json(&json).unwrap_or_else(|e| {
                log::warn!("Ignoring {path}: {e}");
                Self::default()
            }),
            Err(e) => {
                log::warn!("Cannot read {path}: {e}");
                Self::default()
            }
        }
    }
}
