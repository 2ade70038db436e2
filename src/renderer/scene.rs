//! CPU-side scene snapshot for the raymarch shader
//!
//! Everything the GPU needs for one frame is packed here from a
//! `SimContext`, so the packing can be tested without a device.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

use crate::settings::Settings;
use crate::sim::SimContext;
use crate::sim::rig::SMOKE_EMITTER;

/// Uniform array capacities (must match the shader)
pub const MAX_ZONES: usize = 8;
pub const MAX_OBSTACLES: usize = 32;
pub const MAX_SMOKE: usize = 64;

// ============================================================================
// GPU DATA STRUCTURES (must match shader)
// ============================================================================

#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct SceneGlobals {
    pub inv_view_proj: [[f32; 4]; 4], // offset 0
    pub camera_pos: [f32; 4],         // offset 64 - xyz, w = time (s)
    pub resolution: [f32; 2],         // offset 80
    pub zone_count: u32,              // offset 88
    pub obstacle_count: u32,          // offset 92
    pub vehicle: [f32; 4],            // offset 96 - xyz, w = yaw
    pub vehicle_anim: [f32; 4],       // offset 112 - rear spin, front spin, steer, kickstand
    pub march_steps: u32,             // offset 128
    pub soft_shadows: u32,            // offset 132
    pub smoke_count: u32,             // offset 136
    pub smoke_opacity: f32,           // offset 140
    pub highlight: i32,               // offset 144 - highlighted zone index, -1 for none
    pub boosting: u32,                // offset 148
    pub _pad: [u32; 2],               // pad to 160 bytes
}

#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct ZoneData {
    /// x, z, proximity radius, display radius
    pub pos_radius: [f32; 4],
    /// rgb, w = 1 if visited this session
    pub color: [f32; 4],
}

#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct ObstacleData {
    /// x, z, trunk radius, unused
    pub pos_radius: [f32; 4],
}

#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct SmokeData {
    /// World position, w = normalized age
    pub pos_life: [f32; 4],
}

/// One frame's worth of uniform data
pub struct SceneFrame {
    pub globals: SceneGlobals,
    pub zones: [ZoneData; MAX_ZONES],
    pub obstacles: [ObstacleData; MAX_OBSTACLES],
    pub smoke: [SmokeData; MAX_SMOKE],
}

impl SceneFrame {
    /// Pack the current world state. `time_s` drives shader-side animation
    /// only (marker bobbing, sky).
    pub fn build(ctx: &SimContext, settings: &Settings, size: (u32, u32), time_s: f32) -> Self {
        let camera = &ctx.camera;
        let inv_view_proj = (camera.projection() * camera.view()).inverse();
        let vehicle = &ctx.vehicle;

        let mut zones = [ZoneData::zeroed(); MAX_ZONES];
        let zone_count = ctx.layout.zones().len().min(MAX_ZONES);
        for (slot, zone) in zones.iter_mut().zip(ctx.layout.zones()) {
            let [r, g, b] = zone.rgb();
            let visited = if ctx.modal.has_visited(zone.id) { 1.0 } else { 0.0 };
            *slot = ZoneData {
                pos_radius: [
                    zone.pos.x,
                    zone.pos.y,
                    zone.proximity_radius,
                    zone.display_radius,
                ],
                color: [r, g, b, visited],
            };
        }

        let mut obstacles = [ObstacleData::zeroed(); MAX_OBSTACLES];
        let obstacle_count = ctx.obstacles.len().min(MAX_OBSTACLES);
        if ctx.obstacles.len() > MAX_OBSTACLES {
            log::debug!(
                "Drawing {MAX_OBSTACLES} of {} obstacles",
                ctx.obstacles.len()
            );
        }
        for (slot, o) in obstacles.iter_mut().zip(ctx.obstacles.iter()) {
            *slot = ObstacleData {
                pos_radius: [o.pos.x, o.pos.y, o.radius, 0.0],
            };
        }

        // Smoke lives in scooter space; move it into the world here
        let mut smoke = [SmokeData::zeroed(); MAX_SMOKE];
        let max_smoke = settings.quality.max_smoke().min(MAX_SMOKE);
        let rotation = vehicle.rotation();
        let smoke_count = ctx.smoke.particles.len().min(max_smoke);
        for (slot, p) in smoke.iter_mut().zip(ctx.smoke.particles.iter().take(max_smoke)) {
            let world = vehicle.pos + rotation * (SMOKE_EMITTER + p.pos);
            *slot = SmokeData {
                pos_life: [world.x, world.y, world.z, crate::sim::SmokeSystem::life(p)],
            };
        }

        let rig = &ctx.rig;
        let spin = |p: &Option<crate::sim::rig::RigPart>| p.as_ref().map_or(0.0, |p| p.spin);
        let steer = rig
            .steering_column
            .as_ref()
            .or(rig.handlebars.as_ref())
            .map_or(0.0, |p| p.steer);
        let kickstand = rig.kickstand.as_ref().map_or(0.0, |p| p.swing);

        let highlight = ctx
            .modal
            .highlighted()
            .and_then(|id| ctx.layout.zones().iter().position(|z| z.id == id))
            .map_or(-1, |i| i as i32);

        let globals = SceneGlobals {
            inv_view_proj: mat_cols(inv_view_proj),
            camera_pos: [camera.position.x, camera.position.y, camera.position.z, time_s],
            resolution: [size.0 as f32, size.1 as f32],
            zone_count: zone_count as u32,
            obstacle_count: obstacle_count as u32,
            vehicle: [vehicle.pos.x, vehicle.pos.y, vehicle.pos.z, vehicle.yaw],
            vehicle_anim: [spin(&rig.rear_wheel), spin(&rig.front_wheel), steer, kickstand],
            march_steps: settings.quality.march_steps(),
            soft_shadows: settings.quality.soft_shadows() as u32,
            smoke_count: smoke_count as u32,
            smoke_opacity: ctx.smoke.opacity,
            highlight,
            boosting: vehicle.boosting as u32,
            _pad: [0; 2],
        };

        Self {
            globals,
            zones,
            obstacles,
            smoke,
        }
    }

    pub fn camera_world_pos(&self) -> Vec3 {
        let [x, y, z, _] = self.globals.camera_pos;
        Vec3::new(x, y, z)
    }
}

fn mat_cols(m: Mat4) -> [[f32; 4]; 4] {
    m.to_cols_array_2d()
}
