//! The five information zones and where they sit in the world

use std::fmt;

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::planar_distance;

/// Zone identifiers (closed set)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZoneId {
    Experience,
    Skills,
    Projects,
    Education,
    Contact,
}

impl ZoneId {
    pub const ALL: [ZoneId; 5] = [
        ZoneId::Experience,
        ZoneId::Skills,
        ZoneId::Projects,
        ZoneId::Education,
        ZoneId::Contact,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ZoneId::Experience => "experience",
            ZoneId::Skills => "skills",
            ZoneId::Projects => "projects",
            ZoneId::Education => "education",
            ZoneId::Contact => "contact",
        }
    }

    /// Parse a `data-zone` attribute value
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "experience" => Some(ZoneId::Experience),
            "skills" => Some(ZoneId::Skills),
            "projects" => Some(ZoneId::Projects),
            "education" => Some(ZoneId::Education),
            "contact" => Some(ZoneId::Contact),
            _ => None,
        }
    }

    /// Stable index for GPU upload and highlight lookup
    pub fn index(&self) -> usize {
        match self {
            ZoneId::Experience => 0,
            ZoneId::Skills => 1,
            ZoneId::Projects => 2,
            ZoneId::Education => 3,
            ZoneId::Contact => 4,
        }
    }
}

impl fmt::Display for ZoneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A zone marker on the ground
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Zone {
    pub id: ZoneId,
    /// Centre on the ground plane (x, z)
    pub pos: Vec2,
    /// Entering this radius counts as being "in" the zone
    pub proximity_radius: f32,
    /// Decorations (and obstacles) stay outside this radius
    pub display_radius: f32,
    /// Marker colour, 0xRRGGBB
    pub color: u32,
}

impl Zone {
    pub fn new(id: ZoneId, x: f32, z: f32, color: u32) -> Self {
        Self {
            id,
            pos: Vec2::new(x, z),
            proximity_radius: ZONE_PROXIMITY_RADIUS,
            display_radius: ZONE_DISPLAY_RADIUS,
            color,
        }
    }

    /// Ground-plane distance from a world position to the zone centre
    #[inline]
    pub fn distance_to(&self, pos: Vec3) -> f32 {
        planar_distance(pos, self.pos)
    }

    #[inline]
    pub fn contains(&self, pos: Vec3) -> bool {
        self.distance_to(pos) <= self.proximity_radius
    }

    /// Marker colour as linear-ish RGB floats
    pub fn rgb(&self) -> [f32; 3] {
        [
            ((self.color >> 16) & 0xff) as f32 / 255.0,
            ((self.color >> 8) & 0xff) as f32 / 255.0,
            (self.color & 0xff) as f32 / 255.0,
        ]
    }
}

/// Static registry of every zone, in a fixed iteration order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldLayout {
    zones: Vec<Zone>,
}

impl Default for WorldLayout {
    fn default() -> Self {
        Self {
            zones: vec![
                Zone::new(ZoneId::Experience, -20.0, -20.0, 0xff6b6b),
                Zone::new(ZoneId::Skills, 20.0, -20.0, 0x4ecdc4),
                Zone::new(ZoneId::Projects, -20.0, 20.0, 0x45b7d1),
                Zone::new(ZoneId::Education, 20.0, 20.0, 0xf9ca24),
                Zone::new(ZoneId::Contact, 0.0, 0.0, 0xf0932b),
            ],
        }
    }
}

impl WorldLayout {
    /// Default layout with radii taken from settings
    pub fn with_radii(proximity_radius: f32, display_radius: f32) -> Self {
        let mut layout = Self::default();
        for zone in &mut layout.zones {
            zone.proximity_radius = proximity_radius;
            zone.display_radius = display_radius;
        }
        layout
    }

    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    pub fn get(&self, id: ZoneId) -> Option<&Zone> {
        self.zones.iter().find(|z| z.id == id)
    }

    /// Target position for navigation, if the zone exists
    pub fn position_of(&self, id: ZoneId) -> Option<Vec2> {
        self.get(id).map(|z| z.pos)
    }

    /// True if a ground point lies outside every zone's display radius
    pub fn is_clear_of_zones(&self, point: Vec2) -> bool {
        self.zones
            .iter()
            .all(|z| point.distance(z.pos) >= z.display_radius)
    }

    /// Zone whose marker covers a ground point
    pub fn zone_at(&self, point: Vec2) -> Option<ZoneId> {
        self.zones
            .iter()
            .find(|z| point.distance(z.pos) <= z.proximity_radius)
            .map(|z| z.id)
    }
}
