//! Animatable scooter parts and exhaust smoke
//!
//! The loaded model is searched once, by node name, for the parts worth
//! animating. Each slot is independently present or absent and every
//! animator skips absent slots, so a failed or partial model load only
//! loses visuals.

use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::Deserialize;

use super::vehicle::MotionOutput;
use crate::approach;
use crate::error::AssetError;

/// Wheel spin per tick per unit of signed speed
const WHEEL_SPIN_FACTOR: f32 = 0.5;
const MAX_STEER_ANGLE: f32 = std::f32::consts::FRAC_PI_6;
const STEER_LERP: f32 = 0.15;
const KICKSTAND_UP: f32 = std::f32::consts::FRAC_PI_3;
const KICKSTAND_LERP: f32 = 0.05;

pub const SMOKE_PARTICLES: usize = 50;
/// Exhaust outlet in scooter-local space
pub const SMOKE_EMITTER: Vec3 = Vec3::new(0.25, -0.1, 1.0);
const SMOKE_MAX_AGE: f32 = 100.0;
const SMOKE_OPACITY_MOVING: f32 = 0.6;
const SMOKE_OPACITY_IDLE: f32 = 0.2;
const SMOKE_OPACITY_LERP: f32 = 0.1;

/// One node of the loaded model, as listed in the manifest
#[derive(Debug, Clone, Deserialize)]
pub struct ManifestNode {
    pub name: String,
    /// Index of the parent node; parents are listed before children
    #[serde(default)]
    pub parent: Option<usize>,
}

/// Flattened node hierarchy of the scooter model
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ModelManifest {
    pub nodes: Vec<ManifestNode>,
}

impl ModelManifest {
    pub fn from_json(json: &str) -> Result<Self, AssetError> {
        let manifest: ModelManifest = serde_json::from_str(json)?;
        if manifest.nodes.is_empty() {
            return Err(AssetError::Empty);
        }
        Ok(manifest)
    }

    fn lower_name(&self, index: usize) -> String {
        self.nodes[index].name.to_lowercase()
    }

    /// Walk up from `index` (exclusive) toward the root
    fn ancestors(&self, index: usize) -> impl Iterator<Item = usize> + '_ {
        let mut next = self.nodes.get(index).and_then(|n| n.parent);
        std::iter::from_fn(move || {
            let current = next.filter(|&i| i < self.nodes.len())?;
            // Guard against malformed cycles: parents must come first
            next = self.nodes[current].parent.filter(|&p| p < current);
            Some(current)
        })
    }

    /// `node` is `root` or one of its descendants
    fn in_subtree(&self, node: usize, root: usize) -> bool {
        node == root || self.ancestors(node).any(|a| a == root)
    }

    fn find(&self, pred: impl Fn(&str) -> bool) -> Option<usize> {
        (0..self.nodes.len()).find(|&i| pred(&self.lower_name(i)))
    }
}

/// Pose of one animatable part
#[derive(Debug, Clone, PartialEq)]
pub struct RigPart {
    /// Model node this part drives
    pub node: String,
    /// Accumulated wheel rotation (radians)
    pub spin: f32,
    /// Steering rotation about the vertical axis (radians)
    pub steer: f32,
    /// Kickstand swing (radians)
    pub swing: f32,
}

impl RigPart {
    pub fn new(node: impl Into<String>) -> Self {
        Self {
            node: node.into(),
            spin: 0.0,
            steer: 0.0,
            swing: 0.0,
        }
    }
}

/// Named part slots, filled once after the model loads
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VehicleRig {
    pub rear_wheel: Option<RigPart>,
    pub front_wheel: Option<RigPart>,
    pub handlebars: Option<RigPart>,
    pub steering_column: Option<RigPart>,
    pub kickstand: Option<RigPart>,
}

impl VehicleRig {
    /// A rig with nothing to animate (model failed to load)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Find the animatable parts by name
    pub fn from_manifest(manifest: &ModelManifest) -> Self {
        let part = |i: usize| RigPart::new(manifest.nodes[i].name.clone());

        let rear_wheel = manifest.find(|n| n == "wheel rear" || n == "wheel_rear_30");

        let front_wheel = (0..manifest.nodes.len()).find(|&i| {
            manifest.lower_name(i).starts_with("bone_")
                && (0..manifest.nodes.len()).any(|j| {
                    manifest.in_subtree(j, i) && manifest.lower_name(j).contains("wheel front")
                })
        });

        // Prefer the enclosing "handle" group over the matched mesh itself
        let handlebars = manifest.find(|n| n.contains("handle")).map(|i| {
            manifest
                .ancestors(i)
                .find(|&a| manifest.lower_name(a).contains("handle"))
                .or(manifest.nodes[i].parent.filter(|&p| p < manifest.nodes.len()))
                .unwrap_or(i)
        });

        let steering_column = manifest.find(|n| n.contains("steering"));
        let kickstand = manifest.find(|n| n.contains("leg_1") || n.contains("rear_leg"));

        let rig = Self {
            rear_wheel: rear_wheel.map(part),
            front_wheel: front_wheel.map(part),
            handlebars: handlebars.map(part),
            steering_column: steering_column.map(part),
            kickstand: kickstand.map(part),
        };
        log::info!("Scooter rig: {} of 5 parts found", rig.part_count());
        rig
    }

    pub fn part_count(&self) -> usize {
        [
            &self.rear_wheel,
            &self.front_wheel,
            &self.handlebars,
            &self.steering_column,
            &self.kickstand,
        ]
        .iter()
        .filter(|p| p.is_some())
        .count()
    }

    /// Spin both wheels by the signed speed
    pub fn update_wheels(&mut self, signed_speed: f32) {
        let delta = signed_speed * WHEEL_SPIN_FACTOR;
        for wheel in [&mut self.rear_wheel, &mut self.front_wheel].into_iter().flatten() {
            wheel.spin += delta;
        }
    }

    /// Ease the steering parts toward the steer input (-1, 0, 1)
    pub fn update_steering(&mut self, steer: f32) {
        let target = -steer * MAX_STEER_ANGLE;
        for part in [
            &mut self.steering_column,
            &mut self.handlebars,
            &mut self.front_wheel,
        ]
        .into_iter()
        .flatten()
        {
            part.steer = approach(part.steer, target, STEER_LERP);
        }
    }

    /// Kickstand folds up while moving, drops when parked
    pub fn update_kickstand(&mut self, is_moving: bool) {
        if let Some(stand) = &mut self.kickstand {
            let target = if is_moving { KICKSTAND_UP } else { 0.0 };
            stand.swing = approach(stand.swing, target, KICKSTAND_LERP);
        }
    }

    /// Run every part animator for one tick
    pub fn animate(&mut self, motion: &MotionOutput) {
        self.update_wheels(motion.signed_speed);
        self.update_steering(motion.steer);
        self.update_kickstand(motion.is_moving);
    }
}

/// One exhaust puff in scooter-local space, relative to the emitter
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SmokeParticle {
    pub pos: Vec3,
    pub vel: Vec3,
    pub age: f32,
}

/// Exhaust smoke: a fixed pool of recycled particles
#[derive(Debug, Clone)]
pub struct SmokeSystem {
    pub particles: Vec<SmokeParticle>,
    pub opacity: f32,
    rng: Pcg32,
}

impl SmokeSystem {
    pub fn new(seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let particles = (0..SMOKE_PARTICLES)
            .map(|_| SmokeParticle {
                pos: Vec3::ZERO,
                vel: Vec3::ZERO,
                age: rng.random::<f32>() * SMOKE_MAX_AGE,
            })
            .collect();
        Self {
            particles,
            opacity: SMOKE_OPACITY_MOVING,
            rng,
        }
    }

    /// Age, recycle and drift every particle; fade toward the idle or
    /// moving opacity
    pub fn update(&mut self, is_moving: bool) {
        let aging = if is_moving { 2.0 } else { 3.0 };
        let rng = &mut self.rng;

        for p in &mut self.particles {
            p.age += aging;
            if p.age > SMOKE_MAX_AGE {
                p.age = 0.0;
                p.pos = Vec3::new(
                    (rng.random::<f32>() - 0.5) * 0.1,
                    (rng.random::<f32>() - 0.5) * 0.1,
                    (rng.random::<f32>() - 0.5) * 0.1,
                );
                p.vel = Vec3::new(
                    (rng.random::<f32>() - 0.5) * 0.01,
                    0.01 + rng.random::<f32>() * 0.01,
                    0.05 + rng.random::<f32>() * 0.03,
                );
            }

            p.pos += p.vel;
            p.vel.x += (rng.random::<f32>() - 0.5) * 0.001;
            p.vel.z += (rng.random::<f32>() - 0.5) * 0.001;
        }

        let target = if is_moving {
            SMOKE_OPACITY_MOVING
        } else {
            SMOKE_OPACITY_IDLE
        };
        self.opacity = approach(self.opacity, target, SMOKE_OPACITY_LERP);
    }

    /// Normalized age in [0, 1] (for fading individual puffs)
    pub fn life(p: &SmokeParticle) -> f32 {
        (p.age / SMOKE_MAX_AGE).clamp(0.0, 1.0)
    }
}
