//! Static obstacles (trees) scattered around the zones
//!
//! Placement is rejection sampling from a seeded RNG: the same seed and
//! layout always produce the same field.

use glam::{Vec2, Vec3};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::zone::WorldLayout;
use crate::planar_distance;
use crate::settings::WorldSettings;

/// A collidable obstacle on the ground plane
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub pos: Vec2,
    pub radius: f32,
}

impl Obstacle {
    pub fn new(x: f32, z: f32, radius: f32) -> Self {
        Self {
            pos: Vec2::new(x, z),
            radius,
        }
    }

    #[inline]
    pub fn distance_to(&self, pos: Vec3) -> f32 {
        planar_distance(pos, self.pos)
    }
}

/// Every obstacle in the world; fixed after construction
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ObstacleField {
    obstacles: Vec<Obstacle>,
    /// Seed the field was generated from (None for hand-built fields)
    pub seed: Option<u64>,
}

impl ObstacleField {
    /// No obstacles at all
    pub fn empty() -> Self {
        Self::default()
    }

    /// Hand-placed obstacles
    pub fn from_obstacles(obstacles: Vec<Obstacle>) -> Self {
        Self {
            obstacles,
            seed: None,
        }
    }

    /// Scatter obstacles uniformly, rejecting candidates inside any zone's
    /// display radius. Gives up after `obstacle_max_attempts` candidates, so
    /// the field may hold fewer than `obstacle_count` obstacles.
    pub fn generate(seed: u64, layout: &WorldLayout, cfg: &WorldSettings) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let half = cfg.obstacle_spawn_half_extent;
        let mut obstacles = Vec::with_capacity(cfg.obstacle_count);
        let mut attempts = 0;

        while obstacles.len() < cfg.obstacle_count && attempts < cfg.obstacle_max_attempts {
            attempts += 1;
            let candidate = Vec2::new(
                (rng.random::<f32>() - 0.5) * 2.0 * half,
                (rng.random::<f32>() - 0.5) * 2.0 * half,
            );
            if layout.is_clear_of_zones(candidate) {
                obstacles.push(Obstacle {
                    pos: candidate,
                    radius: cfg.obstacle_radius,
                });
            }
        }

        if obstacles.len() < cfg.obstacle_count {
            log::warn!(
                "Placed only {}/{} obstacles after {} attempts",
                obstacles.len(),
                cfg.obstacle_count,
                attempts
            );
        } else {
            log::debug!("Placed {} obstacles in {} attempts", obstacles.len(), attempts);
        }

        Self {
            obstacles,
            seed: Some(seed),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Obstacle> {
        self.obstacles.iter()
    }

    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_obstacles_avoid_zones() {
        let layout = WorldLayout::default();
        let cfg = WorldSettings::default();
        let field = ObstacleField::generate(42, &layout, &cfg);

        assert_eq!(field.len(), cfg.obstacle_count);
        for obstacle in field.iter() {
            assert!(layout.is_clear_of_zones(obstacle.pos));
            assert!(obstacle.pos.x.abs() <= cfg.obstacle_spawn_half_extent);
            assert!(obstacle.pos.y.abs() <= cfg.obstacle_spawn_half_extent);
        }
    }

    #[test]
    fn test_generation_is_deterministic() {
        let layout = WorldLayout::default();
        let cfg = WorldSettings::default();
        let a = ObstacleField::generate(7, &layout, &cfg);
        let b = ObstacleField::generate(7, &layout, &cfg);
        let positions = |f: &ObstacleField| f.iter().map(|o| o.pos).collect::<Vec<_>>();
        assert_eq!(positions(&a), positions(&b));
    }

    #[test]
    fn test_attempt_budget_caps_placement() {
        let layout = WorldLayout::default();
        let cfg = WorldSettings {
            obstacle_count: 500,
            obstacle_max_attempts: 50,
            ..WorldSettings::default()
        };
        let field = ObstacleField::generate(1, &layout, &cfg);
        assert!(field.len() <= 50);
    }
}
