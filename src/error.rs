//! Error types for the fallible edges of the app
//!
//! The simulation itself is total; only config parsing, content parsing,
//! asset loading and GPU setup can fail.

use thiserror::Error;

/// Settings could not be parsed or failed validation
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("settings JSON is malformed: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid setting `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// The scooter model manifest could not be loaded
#[derive(Error, Debug)]
pub enum AssetError {
    #[error("failed to fetch {url}: {reason}")]
    Fetch { url: String, reason: String },

    #[error("model manifest is malformed: {0}")]
    Manifest(#[from] serde_json::Error),

    #[error("model manifest contains no nodes")]
    Empty,
}

/// The embedded CV content blob is malformed
#[derive(Error, Debug)]
pub enum ContentError {
    #[error("CV content is malformed: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("CV field {field} has an unsupported link: {value}")]
    UnsafeLink { field: &'static str, value: String },
}

/// WebGPU setup failed
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("no compatible GPU adapter: {0}")]
    Adapter(String),

    #[error("failed to create GPU device: {0}")]
    Device(String),

    #[error("failed to create surface: {0}")]
    Surface(String),

    #[error("surface reports no supported formats")]
    NoSurfaceFormat,
}
