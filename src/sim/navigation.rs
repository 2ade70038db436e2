//! Waypoint navigation: an eased glide to a zone
//!
//! Completion is driven by wall-clock time, not tick count, so the glide
//! takes the same time at any frame rate.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::vehicle::VehicleState;
use super::zone::ZoneId;
use crate::ease_out_cubic;

/// An in-flight glide toward a zone
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavigationTask {
    pub target_zone: ZoneId,
    pub start: Vec2,
    pub target: Vec2,
    /// Timestamp the glide started (ms)
    pub start_ms: f64,
    pub duration_ms: f64,
}

impl NavigationTask {
    /// Linear progress in [0, 1] at `now_ms`
    pub fn progress(&self, now_ms: f64) -> f32 {
        let elapsed = (now_ms - self.start_ms).max(0.0);
        (elapsed / self.duration_ms).min(1.0) as f32
    }

    /// Ground position at `now_ms`; exactly `target` once complete
    pub fn position_at(&self, now_ms: f64) -> Vec2 {
        let progress = self.progress(now_ms);
        if progress >= 1.0 {
            return self.target;
        }
        let eased = ease_out_cubic(progress);
        self.start + (self.target - self.start) * eased
    }
}

/// Result of advancing the animator by one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationStep {
    /// No glide in progress
    Idle,
    /// Position updated, glide continues
    Moving,
    /// Glide reached its target this tick
    Arrived(ZoneId),
}

/// Idle / animating state machine owning at most one task
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NavigationAnimator {
    task: Option<NavigationTask>,
}

impl NavigationAnimator {
    /// Start gliding from the vehicle's current position. Any task already
    /// in flight is replaced.
    pub fn start(
        &mut self,
        zone: ZoneId,
        target: Vec2,
        vehicle: &VehicleState,
        now_ms: f64,
        duration_ms: f64,
    ) {
        if let Some(stale) = self.task.take() {
            log::debug!("Replacing navigation to {}", stale.target_zone);
        }
        self.task = Some(NavigationTask {
            target_zone: zone,
            start: Vec2::new(vehicle.pos.x, vehicle.pos.z),
            target,
            start_ms: now_ms,
            duration_ms,
        });
    }

    pub fn is_navigating(&self) -> bool {
        self.task.is_some()
    }

    /// Zone the current glide is heading for
    pub fn target_zone(&self) -> Option<ZoneId> {
        self.task.as_ref().map(|t| t.target_zone)
    }

    pub fn task(&self) -> Option<&NavigationTask> {
        self.task.as_ref()
    }

    /// Drop the task immediately (reset)
    pub fn abort(&mut self) -> Option<NavigationTask> {
        self.task.take()
    }

    /// Move the vehicle along the glide. Only x and z are written; yaw and
    /// everything else is left alone.
    pub fn step(&mut self, vehicle: &mut VehicleState, now_ms: f64) -> NavigationStep {
        let Some(task) = &self.task else {
            return NavigationStep::Idle;
        };

        let pos = task.position_at(now_ms);
        vehicle.pos.x = pos.x;
        vehicle.pos.z = pos.y;

        if task.progress(now_ms) >= 1.0 {
            let zone = task.target_zone;
            self.task = None;
            NavigationStep::Arrived(zone)
        } else {
            NavigationStep::Moving
        }
    }
}
