//! CPU-side mesh data, staged per attribute until it is handed to the GPU.

use bitflags::bitflags;
use thiserror::Error;

bitflags! {
    /// Selects which arrays a shape generator should produce.
    ///
    /// Unselected arrays stay `None`, so callers that feed a position-only
    /// pipeline don't pay for attributes they will never upload. The index
    /// count is reported whether or not the index array itself was
    /// requested.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct MeshParts: u32 {
        const POSITIONS = 1;
        const NORMALS = 1 << 1;
        const TEXCOORDS = 1 << 2;
        const INDICES = 1 << 3;
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MeshError {
    #[error("cannot interleave {positions} positions with {colors} colors")]
    LengthMismatch { positions: usize, colors: usize },
}

/// Geometry as the generators hand it out: one optional array per
/// attribute, plus the triangle-list indices.
///
/// `index_count` is tracked separately from `indices` so a renderer can
/// drop the CPU copies after uploading them and still know how many
/// elements to draw.
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    pub positions: Option<Vec<[f32; 3]>>,
    pub normals: Option<Vec<[f32; 3]>>,
    pub texcoords: Option<Vec<[f32; 2]>>,
    pub indices: Option<Vec<u32>>,
    pub index_count: usize,
}

impl Mesh {
    pub fn vertex_count(&self) -> usize {
        self.positions.as_ref().map_or(0, Vec::len)
    }

    pub fn triangle_count(&self) -> usize {
        self.index_count / 3
    }
}

/// Packs positions and colors into a single `[x y z r g b a]*` array, the
/// layout the interleaved vertex paths bind with a 7-float stride.
pub fn interleave(
    positions: &[[f32; 3]],
    colors: &[[f32; 4]],
) -> Result<Vec<f32>, MeshError> {
    if positions.len() != colors.len() {
        return Err(MeshError::LengthMismatch {
            positions: positions.len(),
            colors: colors.len(),
        });
    }
    let mut packed = Vec::with_capacity(positions.len() * 7);
    for (position, color) in positions.iter().zip(colors) {
        packed.extend_from_slice(position);
        packed.extend_from_slice(color);
    }
    Ok(packed)
}

/// Derives an opaque RGBA color per vertex from its position, mapping the
/// mesh's coordinate extent onto `[0, 1]` per channel.
///
/// Deterministic, so every upload path colors a given shape identically.
pub fn vertex_colors(positions: &[[f32; 3]]) -> Vec<[f32; 4]> {
    let extent = positions
        .iter()
        .flatten()
        .fold(0f32, |extent, component| extent.max(component.abs()));
    positions
        .iter()
        .map(|position| {
            if extent == 0.0 {
                return [0.5, 0.5, 0.5, 1.0];
            }
            [
                position[0] / (2.0 * extent) + 0.5,
                position[1] / (2.0 * extent) + 0.5,
                position[2] / (2.0 * extent) + 0.5,
                1.0,
            ]
        })
        .collect()
}
