//! Per-tick simulation and command handling
//!
//! One tick: sample input, then either integrate keyboard motion (with
//! collision resolution) or advance the navigation glide, then track zone
//! proximity and frame the camera. The two motion paths never both run.

use super::collision;
use super::input::Key;
use super::navigation::NavigationStep;
use super::proximity::track_zones;
use super::state::{Command, SimContext, SimEvent};
use super::vehicle::integrate;

/// Advance the simulation by one fixed step at wall-clock time `now_ms`
pub fn tick(ctx: &mut SimContext, now_ms: f64) {
    ctx.now_ms = now_ms;

    // Before the model is in, the page renders but nothing moves
    if !ctx.is_ready() {
        return;
    }
    ctx.time_ticks += 1;

    if ctx.input.take_reset_press() {
        // The reset tick ends at home even with movement keys held
        ctx.reset();
    } else if ctx.navigation.is_navigating() {
        // The glide owns the vehicle: no input motion, no collisions
        if let NavigationStep::Arrived(zone) = ctx.navigation.step(&mut ctx.vehicle, now_ms) {
            log::info!("Arrived at {zone}");
            ctx.events.push(SimEvent::NavigationFinished(zone));
        }
    } else {
        let motion = integrate(&mut ctx.vehicle, &mut ctx.input, &ctx.settings.movement);
        let hits = collision::resolve(&mut ctx.vehicle, &ctx.obstacles, &ctx.settings.collision);
        if hits.hit() {
            log::trace!("Collision: {hits:?}");
        }

        ctx.rig.animate(&motion);
        ctx.smoke.update(motion.is_moving);
        ctx.last_motion = motion;
    }

    track_zones(
        &ctx.layout,
        &ctx.vehicle,
        &ctx.navigation,
        &mut ctx.modal,
        &mut ctx.events,
    );

    ctx.camera.update(&ctx.vehicle);
}

/// Apply one page command between ticks
pub fn apply_command(ctx: &mut SimContext, command: Command) {
    match command {
        Command::KeyChanged {
            key: Key::Escape,
            pressed,
        } => {
            if pressed {
                ctx.modal.close(&mut ctx.events);
            }
        }
        Command::KeyChanged { key, pressed } => ctx.input.set(key, pressed),
        Command::NavigateTo(zone) => {
            let Some(target) = ctx.zone_position(zone) else {
                log::warn!("No position for zone {zone}, ignoring navigation");
                return;
            };
            log::info!("Navigating to {zone}");
            let duration = ctx.settings.navigation.duration_ms;
            ctx.navigation
                .start(zone, target, &ctx.vehicle, ctx.now_ms, duration);
            ctx.events.push(SimEvent::NavigationStarted(zone));
            ctx.modal.set_highlight(Some(zone), &mut ctx.events);
        }
        Command::ZonePicked(zone) => {
            if ctx.layout.get(zone).is_some() {
                ctx.modal.show_zone(zone, &mut ctx.events);
            }
        }
        Command::CloseModal => ctx.modal.close(&mut ctx.events),
        Command::Reset => {
            if ctx.is_ready() {
                ctx.reset();
            }
        }
        Command::ZoomDelta(delta) => {
            // Wheel scrolls the panel while it's open
            if ctx.modal.is_open() {
                log::trace!("Zoom ignored while panel is open");
            } else if ctx.camera.zoom(delta) {
                log::debug!("Camera distance {:.1}", ctx.camera.distance);
            }
        }
        Command::Resize { width, height } => ctx.camera.set_viewport(width, height),
    }
}
