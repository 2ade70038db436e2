//! WebGPU rendering module
//!
//! The world is raymarched as signed distance fields in the fragment shader.
//! `scene` packs simulation state into uniforms; `sdf_pipeline` owns the GPU.

pub mod scene;
pub mod sdf_pipeline;

pub use scene::SceneFrame;
pub use sdf_pipeline::SdfRenderState;
