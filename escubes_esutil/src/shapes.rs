//! Procedural triangle-list generators for the shapes the sample renders.
//!
//! All shapes share the same contract: counter-clockwise winding when a
//! face is viewed from outside, indices into a shared vertex array, and
//! per-vertex attributes gated by [`MeshParts`] so callers only generate
//! what their pipeline binds.

use std::f32::consts::PI;

use crate::mesh::{Mesh, MeshParts};

const CUBE_POSITIONS: [[f32; 3]; 24] = [
    // bottom face
    [-0.5, -0.5, -0.5],
    [-0.5, -0.5, 0.5],
    [0.5, -0.5, 0.5],
    [0.5, -0.5, -0.5],
    // top face
    [-0.5, 0.5, -0.5],
    [-0.5, 0.5, 0.5],
    [0.5, 0.5, 0.5],
    [0.5, 0.5, -0.5],
    // back face
    [-0.5, -0.5, -0.5],
    [-0.5, 0.5, -0.5],
    [0.5, 0.5, -0.5],
    [0.5, -0.5, -0.5],
    // front face
    [-0.5, -0.5, 0.5],
    [-0.5, 0.5, 0.5],
    [0.5, 0.5, 0.5],
    [0.5, -0.5, 0.5],
    // left face
    [-0.5, -0.5, -0.5],
    [-0.5, -0.5, 0.5],
    [-0.5, 0.5, 0.5],
    [-0.5, 0.5, -0.5],
    // right face
    [0.5, -0.5, -0.5],
    [0.5, -0.5, 0.5],
    [0.5, 0.5, 0.5],
    [0.5, 0.5, -0.5],
];

const CUBE_NORMALS: [[f32; 3]; 24] = [
    [0.0, -1.0, 0.0],
    [0.0, -1.0, 0.0],
    [0.0, -1.0, 0.0],
    [0.0, -1.0, 0.0],
    [0.0, 1.0, 0.0],
    [0.0, 1.0, 0.0],
    [0.0, 1.0, 0.0],
    [0.0, 1.0, 0.0],
    [0.0, 0.0, -1.0],
    [0.0, 0.0, -1.0],
    [0.0, 0.0, -1.0],
    [0.0, 0.0, -1.0],
    [0.0, 0.0, 1.0],
    [0.0, 0.0, 1.0],
    [0.0, 0.0, 1.0],
    [0.0, 0.0, 1.0],
    [-1.0, 0.0, 0.0],
    [-1.0, 0.0, 0.0],
    [-1.0, 0.0, 0.0],
    [-1.0, 0.0, 0.0],
    [1.0, 0.0, 0.0],
    [1.0, 0.0, 0.0],
    [1.0, 0.0, 0.0],
    [1.0, 0.0, 0.0],
];

const CUBE_TEXCOORDS: [[f32; 2]; 24] = [
    // bottom face
    [0.0, 0.0],
    [0.0, 1.0],
    [1.0, 1.0],
    [1.0, 0.0],
    // top face runs the opposite way so the image is upright from above
    [1.0, 0.0],
    [1.0, 1.0],
    [0.0, 1.0],
    [0.0, 0.0],
    // back face
    [0.0, 0.0],
    [0.0, 1.0],
    [1.0, 1.0],
    [1.0, 0.0],
    // front face
    [0.0, 0.0],
    [0.0, 1.0],
    [1.0, 1.0],
    [1.0, 0.0],
    // left face
    [0.0, 0.0],
    [0.0, 1.0],
    [1.0, 1.0],
    [1.0, 0.0],
    // right face
    [0.0, 0.0],
    [0.0, 1.0],
    [1.0, 1.0],
    [1.0, 0.0],
];

const CUBE_INDICES: [u32; 36] = [
    // bottom
    0, 2, 1, //
    0, 3, 2, //
    // top
    4, 5, 6, //
    4, 6, 7, //
    // back
    8, 9, 10, //
    8, 10, 11, //
    // front
    12, 15, 14, //
    12, 14, 13, //
    // left
    16, 17, 18, //
    16, 18, 19, //
    // right
    20, 23, 22, //
    20, 22, 21, //
];

/// Generates a cube centered on the origin with edge length `scale`.
///
/// Each of the six faces owns four vertices so normals and texture
/// coordinates stay flat per face, giving 24 vertices and 36 indices.
/// `scale` multiplies positions only.
pub fn cube(scale: f32, parts: MeshParts) -> Mesh {
    let mut mesh = Mesh {
        index_count: CUBE_INDICES.len(),
        ..Mesh::default()
    };
    if parts.contains(MeshParts::INDICES) {
        mesh.indices = Some(CUBE_INDICES.to_vec());
    }
    if parts.contains(MeshParts::POSITIONS) {
        mesh.positions = Some(
            CUBE_POSITIONS
                .iter()
                .map(|p| [p[0] * scale, p[1] * scale, p[2] * scale])
                .collect(),
        );
    }
    if parts.contains(MeshParts::NORMALS) {
        mesh.normals = Some(CUBE_NORMALS.to_vec());
    }
    if parts.contains(MeshParts::TEXCOORDS) {
        mesh.texcoords = Some(CUBE_TEXCOORDS.to_vec());
    }
    mesh
}

/// Generates a sphere of the given `radius` from `num_slices` longitude
/// bands and `num_slices / 2` latitude bands.
///
/// Rows run pole to pole; the seam column is duplicated so texture
/// coordinates can wrap without interpolation artifacts. Returns an empty
/// mesh when `num_slices < 2`.
pub fn sphere(num_slices: usize, radius: f32, parts: MeshParts) -> Mesh {
    if num_slices < 2 {
        return Mesh::default();
    }
    let parallels = num_slices / 2;
    let angle_step = 2.0 * PI / num_slices as f32;

    let mut mesh = Mesh {
        index_count: parallels * num_slices * 6,
        ..Mesh::default()
    };

    let rows = parallels + 1;
    let columns = num_slices + 1;
    let mut positions = Vec::with_capacity(rows * columns);
    let mut normals = Vec::with_capacity(rows * columns);
    let mut texcoords = Vec::with_capacity(rows * columns);
    for i in 0..rows {
        let (sin_row, cos_row) = (angle_step * i as f32).sin_cos();
        for j in 0..columns {
            let (sin_column, cos_column) = (angle_step * j as f32).sin_cos();
            let direction = [sin_row * sin_column, cos_row, sin_row * cos_column];
            positions.push([
                radius * direction[0],
                radius * direction[1],
                radius * direction[2],
            ]);
            normals.push(direction);
            texcoords.push([
                j as f32 / num_slices as f32,
                i as f32 / parallels as f32,
            ]);
        }
    }

    if parts.contains(MeshParts::INDICES) {
        let mut indices = Vec::with_capacity(mesh.index_count);
        for i in 0..parallels {
            for j in 0..num_slices {
                let row = (i * columns) as u32;
                let next_row = ((i + 1) * columns) as u32;
                let j = j as u32;
                indices.extend_from_slice(&[
                    row + j,
                    next_row + j,
                    next_row + j + 1,
                    row + j,
                    next_row + j + 1,
                    row + j + 1,
                ]);
            }
        }
        mesh.indices = Some(indices);
    }

    if parts.contains(MeshParts::POSITIONS) {
        mesh.positions = Some(positions);
    }
    if parts.contains(MeshParts::NORMALS) {
        mesh.normals = Some(normals);
    }
    if parts.contains(MeshParts::TEXCOORDS) {
        mesh.texcoords = Some(texcoords);
    }
    mesh
}

/// Generates a flat `size` x `size` vertex grid spanning the unit square
/// in the XY plane, triangulated counter-clockwise as seen from +Z.
///
/// Returns an empty mesh when `size < 2`.
pub fn square_grid(size: usize, parts: MeshParts) -> Mesh {
    if size < 2 {
        return Mesh::default();
    }
    let quads = size - 1;
    let step = quads as f32;

    let mut mesh = Mesh {
        index_count: quads * quads * 6,
        ..Mesh::default()
    };

    let mut positions = Vec::with_capacity(size * size);
    let mut texcoords = Vec::with_capacity(size * size);
    for i in 0..size {
        for j in 0..size {
            let u = i as f32 / step;
            let v = j as f32 / step;
            positions.push([u, v, 0.0]);
            texcoords.push([u, v]);
        }
    }

    if parts.contains(MeshParts::INDICES) {
        let mut indices = Vec::with_capacity(mesh.index_count);
        for i in 0..quads {
            for j in 0..quads {
                let here = (j + i * size) as u32;
                let right = (j + (i + 1) * size) as u32;
                indices.extend_from_slice(&[
                    here,
                    right,
                    right + 1,
                    here,
                    right + 1,
                    here + 1,
                ]);
            }
        }
        mesh.indices = Some(indices);
    }

    if parts.contains(MeshParts::POSITIONS) {
        mesh.positions = Some(positions);
    }
    if parts.contains(MeshParts::NORMALS) {
        mesh.normals = Some(vec![[0.0, 0.0, 1.0]; size * size]);
    }
    if parts.contains(MeshParts::TEXCOORDS) {
        mesh.texcoords = Some(texcoords);
    }
    mesh
}
