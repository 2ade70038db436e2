//! Property-based tests for the world invariants
//!
//! These check that collision, boost, navigation and auto-show rules hold
//! across a wide range of positions, timings and input sequences.

use glam::{Vec2, Vec3};
use proptest::prelude::*;

use scooter_cv::Settings;
use scooter_cv::consts::SIM_DT;
use scooter_cv::settings::{CollisionSettings, MovementSettings};
use scooter_cv::sim::{
    BoostSide, Command, InputState, Key, NavigationTask, Obstacle, ObstacleField, SimContext,
    SimEvent, VehicleRig, VehicleState, WorldLayout, ZoneId, apply_command, integrate,
    push_out_of_obstacles, resolve, tick,
};

fn vehicle_at(x: f32, z: f32) -> VehicleState {
    let mut v = VehicleState::at_home(&MovementSettings::default());
    v.pos = Vec3::new(x, 0.4, z);
    v
}

fn zone_strategy() -> impl Strategy<Value = ZoneId> {
    prop::sample::select(ZoneId::ALL.to_vec())
}

proptest! {
    #[test]
    fn resolved_position_stays_inside_boundary(
        x in -500.0f32..500.0,
        z in -500.0f32..500.0,
        trees in prop::collection::vec((-48.0f32..48.0, -48.0f32..48.0), 0..20),
    ) {
        let field = ObstacleField::from_obstacles(
            trees.iter().map(|&(tx, tz)| Obstacle::new(tx, tz, 2.0)).collect(),
        );
        let mut v = vehicle_at(x, z);
        resolve(&mut v, &field, &CollisionSettings::default());
        prop_assert!(v.pos.x.abs() <= 50.0);
        prop_assert!(v.pos.z.abs() <= 50.0);
    }

    #[test]
    fn single_push_out_clears_the_obstacle(
        ox in -40.0f32..40.0,
        oz in -40.0f32..40.0,
        angle in 0.0f32..std::f32::consts::TAU,
        depth in 0.0f32..3.5,
    ) {
        let field = ObstacleField::from_obstacles(vec![Obstacle::new(ox, oz, 2.0)]);
        let mut v = vehicle_at(ox + angle.cos() * depth, oz + angle.sin() * depth);
        let pushes = push_out_of_obstacles(&mut v, &field, 1.5, 0.1);
        prop_assert_eq!(pushes, 1);
        let distance = Vec2::new(v.pos.x - ox, v.pos.z - oz).length();
        prop_assert!(distance >= 3.5 - 1e-4, "distance {}", distance);
    }

    #[test]
    fn boost_toggles_once_per_press(holds in prop::collection::vec(any::<bool>(), 1..200)) {
        let mut input = InputState::default();
        let mut toggles = 0;
        let mut presses = 0;
        let mut was_held = false;
        for held in holds {
            input.set(Key::Boost(BoostSide::Right), held);
            if held && !was_held {
                presses += 1;
            }
            was_held = held;
            if input.take_boost_toggle() {
                toggles += 1;
            }
        }
        prop_assert_eq!(toggles, presses);
    }

    #[test]
    fn boost_flag_parity_matches_presses(holds in prop::collection::vec(any::<bool>(), 1..120)) {
        let cfg = MovementSettings::default();
        let mut v = VehicleState::at_home(&cfg);
        let mut input = InputState::default();
        let mut presses = 0;
        let mut was_held = false;
        for held in holds {
            input.set(Key::Boost(BoostSide::Left), held);
            if held && !was_held {
                presses += 1;
            }
            was_held = held;
            integrate(&mut v, &mut input, &cfg);
        }
        prop_assert_eq!(v.boosting, presses % 2 == 1);
    }

    #[test]
    fn glide_is_monotonic_and_exact(
        sx in -50.0f32..50.0,
        sz in -50.0f32..50.0,
        zone in zone_strategy(),
        duration in 100.0f64..5000.0,
        samples in prop::collection::vec(0.0f64..1.2, 1..40),
    ) {
        let layout = WorldLayout::default();
        let target = layout.position_of(zone).unwrap();
        let task = NavigationTask {
            target_zone: zone,
            start: Vec2::new(sx, sz),
            target,
            start_ms: 1000.0,
            duration_ms: duration,
        };

        prop_assert_eq!(task.position_at(1000.0), task.start);
        prop_assert_eq!(task.position_at(1000.0 + duration), target);

        let mut times: Vec<f64> = samples.iter().map(|s| 1000.0 + s * duration).collect();
        times.sort_by(|a, b| a.total_cmp(b));
        let total = task.start.distance(target);
        let mut last_remaining = total;
        for t in times {
            let remaining = task.position_at(t).distance(target);
            prop_assert!(remaining <= last_remaining + 1e-3);
            // Never overshoots: stays on the segment
            prop_assert!(remaining <= total + 1e-3);
            last_remaining = remaining;
        }
    }

    #[test]
    fn waypoint_rides_auto_show_each_zone_at_most_once(
        route in prop::collection::vec(zone_strategy(), 1..8),
    ) {
        let mut ctx = SimContext::with_world(
            Settings::default(),
            WorldLayout::default(),
            ObstacleField::empty(),
            5,
        );
        ctx.mark_ready(Ok(VehicleRig::empty()));

        let frame_ms = SIM_DT as f64 * 1000.0;
        let mut now = 0.0;
        let mut events = Vec::new();
        for zone in route {
            ctx.now_ms = now;
            apply_command(&mut ctx, Command::NavigateTo(zone));
            for _ in 0..125 {
                tick(&mut ctx, now);
                now += frame_ms;
            }
            apply_command(&mut ctx, Command::CloseModal);
            events.extend(ctx.drain_events());
        }

        for zone in ZoneId::ALL {
            let opened = events.iter().filter(|e| **e == SimEvent::ModalOpened(zone)).count();
            prop_assert!(opened <= 1, "{} opened {} times", zone, opened);
        }
    }
}
