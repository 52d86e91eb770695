//! The GL-facing half of the sample: safe wrappers over the raw API, the
//! vertex supply strategies being compared, and the scene that drives them.

pub mod gl_types;
pub mod instancing;
pub mod scene;
pub mod strategies;
pub mod utils;

use thiserror::Error;

/// Attribute location every shader reads vertex positions from.
pub const POSITION_LOC: u32 = 0;
/// Attribute location for color, per vertex or per instance.
pub const COLOR_LOC: u32 = 1;
/// First of the four consecutive attribute locations that carry a
/// per-instance MVP matrix, one vec4 column each.
pub const MVP_LOC: u32 = 2;

/// Degrees of cube rotation per second of wall time.
pub const SPIN_RATE: f32 = 40.0;

/// Everything that can go wrong once a GL context is current, plus the
/// window-system failures hit while getting one.
#[derive(Debug, Error)]
pub enum GlError {
    #[error("failed to compile {kind} shader: {log}")]
    Compile { kind: &'static str, log: String },
    #[error("failed to link shader program: {log}")]
    Link { log: String },
    #[error("mapping the {what} buffer returned no memory")]
    MapFailed { what: &'static str },
    #[error("unmapping the {what} buffer discarded the written data")]
    UnmapFailed { what: &'static str },
    #[error("window system error: {0}")]
    Window(String),
    #[error(transparent)]
    Mesh(#[from] esutil::mesh::MeshError),
}
