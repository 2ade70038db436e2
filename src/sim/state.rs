//! Simulation context and the command/event vocabulary
//!
//! Everything mutable lives in one `SimContext`, built once at startup and
//! passed by reference into the tick and command handlers.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use super::camera::CameraRig;
use super::input::{InputState, Key};
use super::modal::ModalCoordinator;
use super::navigation::NavigationAnimator;
use super::obstacle::ObstacleField;
use super::rig::{SmokeSystem, VehicleRig};
use super::vehicle::{MotionOutput, VehicleState};
use super::zone::{WorldLayout, ZoneId};
use crate::error::AssetError;
use crate::settings::Settings;

/// Inputs from the page, applied between ticks
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    KeyChanged { key: Key, pressed: bool },
    /// Waypoint control clicked
    NavigateTo(ZoneId),
    /// Zone marker clicked in the 3D view
    ZonePicked(ZoneId),
    /// Close control or Escape
    CloseModal,
    Reset,
    /// Mouse wheel; negative zooms in
    ZoomDelta(f32),
    Resize { width: u32, height: u32 },
}

/// Outputs for the display sink, in the order they happened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SimEvent {
    ModalOpened(ZoneId),
    ModalClosed,
    WaypointHighlighted(Option<ZoneId>),
    ZoneEntered(ZoneId),
    ZoneLeft(ZoneId),
    NavigationStarted(ZoneId),
    NavigationFinished(ZoneId),
    WorldReset,
    /// Model load finished (or failed) and simulation is running
    Ready,
}

/// All simulation state for one page load
#[derive(Debug, Clone)]
pub struct SimContext {
    pub settings: Settings,
    pub layout: WorldLayout,
    pub obstacles: ObstacleField,
    pub vehicle: VehicleState,
    pub input: InputState,
    pub navigation: NavigationAnimator,
    pub modal: ModalCoordinator,
    pub camera: CameraRig,
    pub rig: VehicleRig,
    pub smoke: SmokeSystem,
    /// Motion produced by the last integrated tick
    pub last_motion: MotionOutput,
    /// Simulation ticks run since readiness
    pub time_ticks: u64,
    /// Timestamp of the latest frame (ms)
    pub now_ms: f64,
    ready: bool,
    pub(crate) events: Vec<SimEvent>,
}

impl SimContext {
    /// Build the world, scattering obstacles from the configured seed (or
    /// `fallback_seed` when none is configured)
    pub fn new(settings: Settings, fallback_seed: u64) -> Self {
        let seed = settings.world.seed.unwrap_or(fallback_seed);
        let layout = WorldLayout::with_radii(
            settings.world.proximity_radius,
            settings.world.display_radius,
        );
        let obstacles = ObstacleField::generate(seed, &layout, &settings.world);
        log::info!("World built with seed {seed}: {} obstacles", obstacles.len());
        Self::with_world(settings, layout, obstacles, seed)
    }

    /// Build around a hand-made layout and obstacle field
    pub fn with_world(
        settings: Settings,
        layout: WorldLayout,
        obstacles: ObstacleField,
        seed: u64,
    ) -> Self {
        let vehicle = VehicleState::at_home(&settings.movement);
        let camera = CameraRig::new(&settings.camera, vehicle.pos);
        Self {
            layout,
            obstacles,
            camera,
            vehicle,
            input: InputState::default(),
            navigation: NavigationAnimator::default(),
            modal: ModalCoordinator::default(),
            rig: VehicleRig::empty(),
            smoke: SmokeSystem::new(seed.wrapping_add(1)),
            last_motion: MotionOutput::default(),
            time_ticks: 0,
            now_ms: 0.0,
            ready: false,
            events: Vec::new(),
            settings,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// The model load finished. A failed load is logged and leaves an
    /// empty rig; the simulation starts either way.
    pub fn mark_ready(&mut self, rig: Result<VehicleRig, AssetError>) {
        match rig {
            Ok(rig) => self.rig = rig,
            Err(e) => {
                log::error!("Error loading scooter model: {e}");
                self.rig = VehicleRig::empty();
            }
        }
        if !self.ready {
            self.ready = true;
            self.events.push(SimEvent::Ready);
            log::info!("Simulation ready");
        }
    }

    /// Ground position of a zone, for navigation
    pub fn zone_position(&self, zone: ZoneId) -> Option<Vec2> {
        self.layout.position_of(zone)
    }

    /// Zone under a screen point (normalized device coordinates)
    pub fn pick(&self, ndc: Vec2) -> Option<ZoneId> {
        self.camera.pick_zone(ndc, &self.layout, &self.obstacles)
    }

    /// Send the scooter home and forget the session: closes the panel,
    /// clears visited zones, aborts navigation, drops boost
    pub fn reset(&mut self) {
        log::info!("Resetting scooter");
        if let Some(task) = self.navigation.abort() {
            log::debug!("Aborted navigation to {}", task.target_zone);
        }
        self.vehicle = VehicleState::at_home(&self.settings.movement);
        self.last_motion = MotionOutput::default();
        self.modal.reset(&mut self.events);
        self.events.push(SimEvent::WorldReset);
    }

    /// Take every event raised since the last drain
    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }

    /// Home position as a world point
    pub fn home(&self) -> Vec3 {
        let m = &self.settings.movement;
        Vec3::new(m.home_x, m.ground_y, m.home_z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_context_starts_parked_and_not_ready() {
        let ctx = SimContext::new(Settings::default(), 42);
        assert!(!ctx.is_ready());
        assert_eq!(ctx.vehicle.pos, Vec3::new(0.0, 0.4, 30.0));
        assert_eq!(ctx.obstacles.seed, Some(42));
        assert_eq!(ctx.home(), ctx.vehicle.pos);
    }

    #[test]
    fn test_configured_seed_wins() {
        let mut settings = Settings::default();
        settings.world.seed = Some(9);
        let ctx = SimContext::new(settings, 42);
        assert_eq!(ctx.obstacles.seed, Some(9));
    }

    #[test]
    fn test_failed_load_still_becomes_ready() {
        let mut ctx = SimContext::new(Settings::default(), 1);
        ctx.mark_ready(Err(AssetError::Empty));
        assert!(ctx.is_ready());
        assert_eq!(ctx.rig.part_count(), 0);
        assert_eq!(ctx.drain_events(), vec![SimEvent::Ready]);
        assert!(ctx.drain_events().is_empty());
    }
}
