//! End-to-end rides through the world
//!
//! Each test drives a `SimContext` the way the page does: commands between
//! ticks, one tick per 60 Hz step, events drained afterwards.

use glam::{Vec2, Vec3};

use scooter_cv::Settings;
use scooter_cv::consts::SIM_DT;
use scooter_cv::error::AssetError;
use scooter_cv::sim::{
    BoostSide, Command, Key, ObstacleField, SimContext, SimEvent, VehicleRig, WorldLayout,
    ZoneId, apply_command, tick,
};
use scooter_cv::ui::{RecordingSink, UiDispatcher};
use scooter_cv::CvData;

const FRAME_MS: f64 = SIM_DT as f64 * 1000.0;

/// World with the default zones and no trees in the way
struct Ride {
    ctx: SimContext,
    now: f64,
    events: Vec<SimEvent>,
}

impl Ride {
    fn new() -> Self {
        let mut ctx = SimContext::with_world(
            Settings::default(),
            WorldLayout::default(),
            ObstacleField::empty(),
            11,
        );
        ctx.mark_ready(Ok(VehicleRig::empty()));
        ctx.drain_events();
        Self {
            ctx,
            now: 0.0,
            events: Vec::new(),
        }
    }

    fn command(&mut self, command: Command) {
        self.ctx.now_ms = self.now;
        apply_command(&mut self.ctx, command);
        self.events.extend(self.ctx.drain_events());
    }

    fn key(&mut self, key: Key, pressed: bool) {
        self.command(Command::KeyChanged { key, pressed });
    }

    fn ticks(&mut self, n: u32) {
        for _ in 0..n {
            tick(&mut self.ctx, self.now);
            self.now += FRAME_MS;
        }
        self.events.extend(self.ctx.drain_events());
    }

    /// Tick until one tick has run at or past `ms` from now
    fn ride_for_ms(&mut self, ms: f64) {
        let end = self.now + ms;
        loop {
            let at = self.now;
            self.ticks(1);
            if at >= end {
                break;
            }
        }
    }

    fn count(&self, event: SimEvent) -> usize {
        self.events.iter().filter(|e| **e == event).count()
    }
}

#[test]
fn forward_from_home_enters_contact_once() {
    let mut ride = Ride::new();
    ride.key(Key::Forward, true);
    ride.ticks(300);

    assert!(ride.ctx.vehicle.pos.z.abs() < 1e-3);
    assert_eq!(ride.ctx.modal.current_zone(), Some(ZoneId::Contact));
    assert_eq!(ride.count(SimEvent::ModalOpened(ZoneId::Contact)), 1);
    assert_eq!(ride.count(SimEvent::ZoneEntered(ZoneId::Contact)), 1);
    assert!(ride.ctx.modal.is_open());
    assert_eq!(ride.ctx.modal.highlighted(), Some(ZoneId::Contact));

    // Keep riding out the other side
    ride.ticks(60);
    assert_eq!(ride.count(SimEvent::ZoneLeft(ZoneId::Contact)), 1);
    assert_eq!(ride.ctx.modal.current_zone(), None);
    assert_eq!(ride.count(SimEvent::ModalOpened(ZoneId::Contact)), 1);
}

#[test]
fn navigate_to_skills_lands_exactly() {
    let mut ride = Ride::new();
    ride.command(Command::NavigateTo(ZoneId::Skills));
    assert!(ride.ctx.navigation.is_navigating());
    assert_eq!(ride.ctx.modal.highlighted(), Some(ZoneId::Skills));

    ride.ride_for_ms(2000.0);

    assert_eq!(ride.ctx.vehicle.pos, Vec3::new(20.0, 0.4, -20.0));
    assert!(!ride.ctx.navigation.is_navigating());
    assert_eq!(ride.ctx.navigation.target_zone(), None);
    assert_eq!(ride.count(SimEvent::NavigationStarted(ZoneId::Skills)), 1);
    assert_eq!(ride.count(SimEvent::NavigationFinished(ZoneId::Skills)), 1);
    assert_eq!(ride.count(SimEvent::ModalOpened(ZoneId::Skills)), 1);
    // The glide does not pass through any other zone
    assert!(
        !ride
            .events
            .iter()
            .any(|e| matches!(e, SimEvent::ModalOpened(z) if *z != ZoneId::Skills))
    );
}

#[test]
fn keyboard_is_ignored_while_gliding() {
    let mut ride = Ride::new();
    ride.command(Command::NavigateTo(ZoneId::Education));
    ride.key(Key::Left, true);
    ride.ride_for_ms(2000.0);

    assert_eq!(ride.ctx.vehicle.yaw, 0.0);
    assert_eq!(ride.ctx.vehicle.pos.x, 20.0);
    assert_eq!(ride.ctx.vehicle.pos.z, 20.0);
}

#[test]
fn second_waypoint_replaces_the_first() {
    let mut ride = Ride::new();
    ride.command(Command::NavigateTo(ZoneId::Skills));
    ride.ride_for_ms(500.0);
    ride.command(Command::NavigateTo(ZoneId::Projects));
    ride.ride_for_ms(2000.0);

    assert_eq!(ride.ctx.vehicle.pos.x, -20.0);
    assert_eq!(ride.ctx.vehicle.pos.z, 20.0);
    assert_eq!(ride.count(SimEvent::NavigationFinished(ZoneId::Skills)), 0);
    assert_eq!(ride.count(SimEvent::NavigationFinished(ZoneId::Projects)), 1);
}

#[test]
fn reset_restores_home_and_forgets_session() {
    let mut ride = Ride::new();
    ride.key(Key::Boost(BoostSide::Left), true);
    ride.key(Key::Forward, true);
    ride.key(Key::Right, true);
    ride.ticks(100);
    assert!(ride.ctx.vehicle.boosting);

    ride.command(Command::NavigateTo(ZoneId::Contact));
    ride.ride_for_ms(2100.0);
    assert!(ride.ctx.modal.has_visited(ZoneId::Contact));
    ride.command(Command::NavigateTo(ZoneId::Skills));
    ride.ticks(10);

    ride.command(Command::Reset);

    let v = &ride.ctx.vehicle;
    assert_eq!(v.pos, Vec3::new(0.0, 0.4, 30.0));
    assert_eq!(v.yaw, 0.0);
    assert!(!v.boosting);
    assert!(!ride.ctx.modal.is_open());
    assert_eq!(ride.ctx.modal.visited().count(), 0);
    assert_eq!(ride.ctx.modal.highlighted(), None);
    assert!(!ride.ctx.navigation.is_navigating());
    assert_eq!(ride.count(SimEvent::WorldReset), 1);
}

#[test]
fn reset_key_with_keys_held_restores_home() {
    let mut ride = Ride::new();
    ride.key(Key::Boost(BoostSide::Right), true);
    ride.key(Key::Forward, true);
    ride.key(Key::Left, true);
    ride.ticks(80);
    assert!(ride.ctx.vehicle.boosting);
    assert_ne!(ride.ctx.vehicle.yaw, 0.0);
    ride.key(Key::Forward, false);
    ride.key(Key::Left, false);

    ride.command(Command::NavigateTo(ZoneId::Contact));
    ride.ride_for_ms(2000.0);
    assert!(ride.ctx.modal.has_visited(ZoneId::Contact));
    assert!(ride.ctx.modal.is_open());

    ride.command(Command::NavigateTo(ZoneId::Skills));
    ride.ticks(10);
    assert!(ride.ctx.navigation.is_navigating());

    // Movement and boost still held when R goes down
    ride.key(Key::Forward, true);
    ride.key(Key::Left, true);
    ride.key(Key::Reset, true);
    ride.ticks(1);

    let v = &ride.ctx.vehicle;
    assert_eq!(v.pos, Vec3::new(0.0, 0.4, 30.0));
    assert_eq!(v.yaw, 0.0);
    assert!(!v.boosting);
    assert!(!ride.ctx.modal.is_open());
    assert_eq!(ride.ctx.modal.visited().count(), 0);
    assert_eq!(ride.ctx.modal.current_zone(), None);
    assert_eq!(ride.ctx.modal.highlighted(), None);
    assert!(!ride.ctx.navigation.is_navigating());
    assert_eq!(ride.ctx.navigation.target_zone(), None);
    assert_eq!(ride.count(SimEvent::WorldReset), 1);
    assert_eq!(ride.count(SimEvent::NavigationFinished(ZoneId::Skills)), 0);

    // Still holding Shift does not toggle boost back on
    ride.ticks(5);
    assert!(!ride.ctx.vehicle.boosting);
    assert_eq!(ride.count(SimEvent::WorldReset), 1);
}

#[test]
fn zone_auto_shows_once_per_reset_cycle() {
    let mut ride = Ride::new();
    ride.command(Command::NavigateTo(ZoneId::Contact));
    ride.ride_for_ms(2000.0);
    ride.command(Command::CloseModal);

    // Leave and come back
    ride.key(Key::Back, true);
    ride.ticks(60);
    ride.key(Key::Back, false);
    ride.key(Key::Forward, true);
    ride.ticks(60);
    ride.key(Key::Forward, false);

    assert_eq!(ride.count(SimEvent::ZoneEntered(ZoneId::Contact)), 2);
    assert_eq!(ride.count(SimEvent::ModalOpened(ZoneId::Contact)), 1);

    // A fresh cycle shows it again
    ride.command(Command::Reset);
    ride.command(Command::NavigateTo(ZoneId::Contact));
    ride.ride_for_ms(2000.0);
    assert_eq!(ride.count(SimEvent::ModalOpened(ZoneId::Contact)), 2);
}

#[test]
fn clicked_zone_always_opens() {
    let mut ride = Ride::new();
    ride.command(Command::ZonePicked(ZoneId::Projects));
    ride.command(Command::CloseModal);
    ride.command(Command::ZonePicked(ZoneId::Projects));
    assert_eq!(ride.count(SimEvent::ModalOpened(ZoneId::Projects)), 2);
}

#[test]
fn open_panel_blocks_zoom() {
    let mut ride = Ride::new();
    let before = ride.ctx.camera.distance;
    ride.command(Command::ZonePicked(ZoneId::Skills));
    ride.command(Command::ZoomDelta(-1.0));
    assert_eq!(ride.ctx.camera.distance, before);

    ride.key(Key::Escape, true);
    ride.command(Command::ZoomDelta(-1.0));
    assert_eq!(ride.ctx.camera.distance, before - 0.5);
}

#[test]
fn picking_through_the_camera() {
    let mut ride = Ride::new();
    let camera = &mut ride.ctx.camera;
    camera.position = Vec3::new(-20.0, 25.0, -19.99);
    camera.target = Vec3::new(-20.0, 0.0, -20.0);
    camera.aspect = 1.0;
    assert_eq!(ride.ctx.pick(Vec2::ZERO), Some(ZoneId::Experience));
    assert_eq!(ride.ctx.pick(Vec2::new(0.95, -0.95)), None);
}

#[test]
fn world_waits_for_the_model() {
    let mut ctx = SimContext::with_world(
        Settings::default(),
        WorldLayout::default(),
        ObstacleField::empty(),
        3,
    );
    apply_command(
        &mut ctx,
        Command::KeyChanged {
            key: Key::Forward,
            pressed: true,
        },
    );
    tick(&mut ctx, 0.0);
    assert_eq!(ctx.vehicle.pos.z, 30.0);

    ctx.mark_ready(Err(AssetError::Fetch {
        url: "assets/scooter_manifest.json".into(),
        reason: "HTTP 404".into(),
    }));
    tick(&mut ctx, FRAME_MS);
    assert!(ctx.vehicle.pos.z < 30.0);
    assert_eq!(ctx.rig.part_count(), 0);
}

#[test]
fn events_reach_the_page() {
    let mut ride = Ride::new();
    ride.command(Command::NavigateTo(ZoneId::Education));
    ride.ride_for_ms(2000.0);

    let ui = UiDispatcher::new(CvData::embedded().unwrap());
    let mut sink = RecordingSink::default();
    ui.dispatch(&ride.events, &mut sink);

    assert_eq!(sink.panels_for(ZoneId::Education), 1);
    assert!(sink.last_html.unwrap().contains("Education"));
}

#[test]
fn generated_trees_keep_zones_clear() {
    let settings = Settings::default();
    let ctx = SimContext::new(settings, 2024);
    for tree in ctx.obstacles.iter() {
        for zone in ctx.layout.zones() {
            assert!(tree.pos.distance(zone.pos) >= zone.display_radius);
        }
    }
}
