//! Deterministic simulation module
//!
//! All world logic lives here. This module must stay pure:
//! - Fixed timestep for keyboard motion, wall-clock ms only for navigation
//! - Seeded RNG only
//! - Stable iteration order (zone layout order, obstacle insertion order)
//! - No rendering or platform dependencies

pub mod camera;
pub mod collision;
pub mod input;
pub mod modal;
pub mod navigation;
pub mod obstacle;
pub mod proximity;
pub mod rig;
pub mod state;
pub mod tick;
pub mod vehicle;
pub mod zone;

pub use camera::{CameraRig, pixel_to_ndc};
pub use collision::{CollisionResult, clamp_to_boundary, push_out_of_obstacles, resolve};
pub use input::{BoostSide, InputState, Key};
pub use modal::ModalCoordinator;
pub use navigation::{NavigationAnimator, NavigationStep, NavigationTask};
pub use obstacle::{Obstacle, ObstacleField};
pub use proximity::track_zones;
pub use rig::{ModelManifest, SmokeSystem, VehicleRig};
pub use state::{Command, SimContext, SimEvent};
pub use tick::{apply_command, tick};
pub use vehicle::{MotionOutput, VehicleState, integrate};
pub use zone::{WorldLayout, Zone, ZoneId};
