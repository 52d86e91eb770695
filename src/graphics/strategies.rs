//! The five vertex supply strategies the sample compares.
//!
//! Every strategy renders the same mesh through the same shaders; the only
//! difference is where the vertex data lives and how it reaches the GPU.
//! GPU storage is allocated lazily on the first draw, and once an upload
//! has succeeded the CPU copies are dropped, except for the client-array
//! path whose entire point is drawing out of CPU memory every frame.

use std::ffi::c_void;
use std::mem::size_of;
use std::ptr::null;

use clap::ValueEnum;
use glam::Mat4;

use esutil::mesh::{interleave, vertex_colors, Mesh};

use super::gl_types::{
    disable_vertex_attrib, set_vertex_attrib, GlBuffer, GlBufferType, GlVertexArray,
};
use super::instancing::InstanceTable;
use super::{GlError, COLOR_LOC, MVP_LOC, POSITION_LOC};

/// Floats per vertex position.
const VERTEX_POS_SIZE: usize = 3;
/// Floats per vertex color.
const VERTEX_COLOR_SIZE: usize = 4;
/// Floats per vertex in the interleaved layouts.
const VERTEX_STRIDE: usize = VERTEX_POS_SIZE + VERTEX_COLOR_SIZE;

/// Which upload path feeds vertex data to the GPU.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum UploadStrategy {
    /// Attribute pointers straight into CPU memory, re-sent every draw.
    ClientArrays,
    /// One static VBO per attribute plus an element buffer.
    SeparateVbos,
    /// Static buffers written through `glMapBufferRange`.
    Mapped,
    /// A vertex array object capturing an interleaved layout once.
    Vao,
    /// A single call drawing every instance via attribute divisors.
    Instanced,
}

/// Per-frame values the scene feeds into [`DrawStrategy::update`].
pub struct FrameInput {
    /// Seconds since the previous update.
    pub delta: f32,
    /// Window width over height.
    pub aspect: f32,
}

/// One way of getting vertices in front of the GPU.
///
/// The scene calls `update` then `draw` once per frame. Draw calls may
/// allocate GPU storage the first time through; when an upload fails the
/// strategy keeps its CPU data and tries again on the next frame.
pub trait DrawStrategy {
    /// Advances per-frame state and re-uploads whatever the strategy keeps
    /// current on the GPU. Most strategies have nothing to do here.
    fn update(&mut self, _frame: &FrameInput) -> Result<(), GlError> {
        Ok(())
    }

    /// Issues this strategy's draw call.
    fn draw(&mut self) -> Result<(), GlError>;
}

/// Builds the strategy `kind`, deriving per-vertex colors from the mesh and
/// packing whatever layout that strategy uploads. No GL calls happen here;
/// the first draw does the allocation.
pub fn create(
    kind: UploadStrategy,
    mesh: Mesh,
    instances: usize,
) -> Result<Box<dyn DrawStrategy>, GlError> {
    let index_count = mesh.index_count;
    let positions = mesh.positions.unwrap_or_default();
    let indices = mesh.indices.unwrap_or_default();
    let colors = vertex_colors(&positions);

    Ok(match kind {
        UploadStrategy::ClientArrays => Box::new(ClientArrays {
            vertices: interleave(&positions, &colors)?,
            indices,
        }),
        UploadStrategy::SeparateVbos => Box::new(SeparateVbos {
            staged: Some(AttributeArrays {
                positions,
                colors,
                indices,
            }),
            buffers: None,
            index_count,
        }),
        UploadStrategy::Mapped => Box::new(Mapped {
            staged: Some(InterleavedArrays {
                vertices: interleave(&positions, &colors)?,
                indices,
            }),
            buffers: None,
            index_count,
        }),
        UploadStrategy::Vao => Box::new(Vao {
            staged: Some(InterleavedArrays {
                vertices: interleave(&positions, &colors)?,
                indices,
            }),
            gpu: None,
            index_count,
        }),
        UploadStrategy::Instanced => Box::new(Instanced {
            table: InstanceTable::new(instances),
            staged: Some(IndexedPositions { positions, indices }),
            gpu: None,
            index_count,
            aspect: 1.0,
        }),
    })
}

/// CPU data for one attribute array per buffer.
struct AttributeArrays {
    positions: Vec<[f32; 3]>,
    colors: Vec<[f32; 4]>,
    indices: Vec<u32>,
}

/// CPU data packed `[x y z r g b a]` per vertex.
struct InterleavedArrays {
    vertices: Vec<f32>,
    indices: Vec<u32>,
}

/// CPU data for the instanced path, which only uploads positions.
struct IndexedPositions {
    positions: Vec<[f32; 3]>,
    indices: Vec<u32>,
}

/// Draws with attribute pointers aimed at CPU memory. Nothing is uploaded
/// ahead of time; the driver pulls the arrays through on every draw call.
struct ClientArrays {
    vertices: Vec<f32>,
    indices: Vec<u32>,
}

impl DrawStrategy for ClientArrays {
    fn draw(&mut self) -> Result<(), GlError> {
        unsafe {
            // a bound buffer would turn the pointers into offsets
            gl::BindBuffer(gl::ARRAY_BUFFER, 0);
            gl::BindBuffer(gl::ELEMENT_ARRAY_BUFFER, 0);

            gl::EnableVertexAttribArray(POSITION_LOC);
            gl::EnableVertexAttribArray(COLOR_LOC);

            let stride = (VERTEX_STRIDE * size_of::<f32>()) as i32;
            gl::VertexAttribPointer(
                POSITION_LOC,
                VERTEX_POS_SIZE as i32,
                gl::FLOAT,
                gl::FALSE,
                stride,
                self.vertices.as_ptr() as *const c_void,
            );
            gl::VertexAttribPointer(
                COLOR_LOC,
                VERTEX_COLOR_SIZE as i32,
                gl::FLOAT,
                gl::FALSE,
                stride,
                self.vertices.as_ptr().add(VERTEX_POS_SIZE) as *const c_void,
            );

            gl::DrawElements(
                gl::TRIANGLES,
                self.indices.len() as i32,
                gl::UNSIGNED_INT,
                self.indices.as_ptr() as *const c_void,
            );

            gl::DisableVertexAttribArray(POSITION_LOC);
            gl::DisableVertexAttribArray(COLOR_LOC);
        }

        Ok(())
    }
}

struct SeparateBuffers {
    position: GlBuffer,
    color: GlBuffer,
    element: GlBuffer,
}

/// Keeps each attribute in its own static VBO.
struct SeparateVbos {
    staged: Option<AttributeArrays>,
    buffers: Option<SeparateBuffers>,
    index_count: usize,
}

impl SeparateVbos {
    fn ensure_uploaded(&mut self) {
        if self.buffers.is_some() {
            return;
        }
        let Some(staged) = &self.staged else { return };

        self.buffers = Some(SeparateBuffers {
            position: GlBuffer::init(
                GlBufferType::Array,
                bytemuck::cast_slice(&staged.positions),
                gl::STATIC_DRAW,
            ),
            color: GlBuffer::init(
                GlBufferType::Array,
                bytemuck::cast_slice(&staged.colors),
                gl::STATIC_DRAW,
            ),
            element: GlBuffer::init(
                GlBufferType::Element,
                bytemuck::cast_slice(&staged.indices),
                gl::STATIC_DRAW,
            ),
        });
        self.staged = None;
    }
}

impl DrawStrategy for SeparateVbos {
    fn draw(&mut self) -> Result<(), GlError> {
        self.ensure_uploaded();
        let Some(buffers) = &self.buffers else {
            return Ok(());
        };

        buffers.position.bind();
        set_vertex_attrib(POSITION_LOC, 0, VERTEX_POS_SIZE as i32, VERTEX_POS_SIZE);
        buffers.color.bind();
        set_vertex_attrib(COLOR_LOC, 0, VERTEX_COLOR_SIZE as i32, VERTEX_COLOR_SIZE);
        buffers.element.bind();

        unsafe {
            gl::DrawElements(
                gl::TRIANGLES,
                self.index_count as i32,
                gl::UNSIGNED_INT,
                null(),
            );
        }

        disable_vertex_attrib(POSITION_LOC);
        disable_vertex_attrib(COLOR_LOC);
        buffers.position.unbind();
        buffers.element.unbind();

        Ok(())
    }
}

struct MappedBuffers {
    vertex: GlBuffer,
    element: GlBuffer,
}

/// Fills static buffers by mapping them into client memory and copying,
/// instead of handing pointers to `glBufferData`.
struct Mapped {
    staged: Option<InterleavedArrays>,
    buffers: Option<MappedBuffers>,
    index_count: usize,
}

impl Mapped {
    fn ensure_uploaded(&mut self) -> Result<(), GlError> {
        if self.buffers.is_some() {
            return Ok(());
        }
        let Some(staged) = &self.staged else {
            return Ok(());
        };

        // If a map or unmap fails the partially built buffers drop here,
        // releasing their names, and the staged data stays for a retry on
        // the next frame.
        let vertex_bytes: &[u8] = bytemuck::cast_slice(&staged.vertices);
        let mut vertex = GlBuffer::generate(GlBufferType::Array);
        vertex.data_uninitialized(vertex_bytes.len(), gl::STATIC_DRAW);
        let target = vertex.map_write(
            vertex_bytes.len(),
            gl::MAP_INVALIDATE_BUFFER_BIT,
            "vertex",
        )?;
        target.copy_from_slice(vertex_bytes);
        vertex.unmap("vertex")?;

        let index_bytes: &[u8] = bytemuck::cast_slice(&staged.indices);
        let mut element = GlBuffer::generate(GlBufferType::Element);
        element.data_uninitialized(index_bytes.len(), gl::STATIC_DRAW);
        let target = element.map_write(
            index_bytes.len(),
            gl::MAP_INVALIDATE_BUFFER_BIT,
            "element",
        )?;
        target.copy_from_slice(index_bytes);
        element.unmap("element")?;

        self.buffers = Some(MappedBuffers { vertex, element });
        self.staged = None;
        Ok(())
    }
}

impl DrawStrategy for Mapped {
    fn draw(&mut self) -> Result<(), GlError> {
        self.ensure_uploaded()?;
        let Some(buffers) = &self.buffers else {
            return Ok(());
        };

        buffers.vertex.bind();
        buffers.element.bind();

        set_vertex_attrib(POSITION_LOC, 0, VERTEX_POS_SIZE as i32, VERTEX_STRIDE);
        set_vertex_attrib(
            COLOR_LOC,
            VERTEX_POS_SIZE,
            VERTEX_COLOR_SIZE as i32,
            VERTEX_STRIDE,
        );

        unsafe {
            gl::DrawElements(
                gl::TRIANGLES,
                self.index_count as i32,
                gl::UNSIGNED_INT,
                null(),
            );
        }

        disable_vertex_attrib(POSITION_LOC);
        disable_vertex_attrib(COLOR_LOC);
        buffers.vertex.unbind();
        buffers.element.unbind();

        Ok(())
    }
}

struct VaoState {
    vao: GlVertexArray,
    // the VAO only references these; they must outlive it
    _vertex: GlBuffer,
    _element: GlBuffer,
}

/// Records the interleaved layout in a vertex array object once, so each
/// draw is a single bind.
struct Vao {
    staged: Option<InterleavedArrays>,
    gpu: Option<VaoState>,
    index_count: usize,
}

impl Vao {
    fn ensure_uploaded(&mut self) {
        if self.gpu.is_some() {
            return;
        }
        let Some(staged) = &self.staged else { return };

        let vertex = GlBuffer::init(
            GlBufferType::Array,
            bytemuck::cast_slice(&staged.vertices),
            gl::STATIC_DRAW,
        );
        let element = GlBuffer::init(
            GlBufferType::Element,
            bytemuck::cast_slice(&staged.indices),
            gl::STATIC_DRAW,
        );

        let vao = GlVertexArray::generate();
        vao.bind();

        vertex.bind();
        element.bind();
        set_vertex_attrib(POSITION_LOC, 0, VERTEX_POS_SIZE as i32, VERTEX_STRIDE);
        set_vertex_attrib(
            COLOR_LOC,
            VERTEX_POS_SIZE,
            VERTEX_COLOR_SIZE as i32,
            VERTEX_STRIDE,
        );

        vao.unbind();
        vertex.unbind();

        self.gpu = Some(VaoState {
            vao,
            _vertex: vertex,
            _element: element,
        });
        self.staged = None;
    }
}

impl DrawStrategy for Vao {
    fn draw(&mut self) -> Result<(), GlError> {
        self.ensure_uploaded();
        let Some(gpu) = &self.gpu else {
            return Ok(());
        };

        gpu.vao.bind();
        unsafe {
            gl::DrawElements(
                gl::TRIANGLES,
                self.index_count as i32,
                gl::UNSIGNED_INT,
                null(),
            );
        }
        gpu.vao.unbind();

        Ok(())
    }
}

struct InstancedBuffers {
    position: GlBuffer,
    color: GlBuffer,
    mvp: GlBuffer,
    element: GlBuffer,
}

/// Renders the whole field of cubes in one call. Positions, per-instance
/// colors and the index buffer upload once; the per-instance matrix buffer
/// is remapped and rewritten every frame.
struct Instanced {
    table: InstanceTable,
    staged: Option<IndexedPositions>,
    gpu: Option<InstancedBuffers>,
    index_count: usize,
    aspect: f32,
}

impl Instanced {
    fn matrix_bytes(&self) -> usize {
        self.table.len() * size_of::<Mat4>()
    }

    fn write_matrices(table: &InstanceTable, mvp: &mut GlBuffer, aspect: f32) -> Result<(), GlError> {
        // mapping zero bytes is a GL error, not a no-op
        if table.is_empty() {
            return Ok(());
        }
        let bytes = mvp.map_write(table.len() * size_of::<Mat4>(), 0, "matrix")?;
        table.write_transforms(aspect, bytemuck::cast_slice_mut(bytes));
        mvp.unmap("matrix")
    }

    fn ensure_uploaded(&mut self) -> Result<(), GlError> {
        if self.gpu.is_some() {
            return Ok(());
        }
        let Some(staged) = &self.staged else {
            return Ok(());
        };

        let position = GlBuffer::init(
            GlBufferType::Array,
            bytemuck::cast_slice(&staged.positions),
            gl::STATIC_DRAW,
        );
        let color = GlBuffer::init(GlBufferType::Array, self.table.color_bytes(), gl::STATIC_DRAW);
        let element = GlBuffer::init(
            GlBufferType::Element,
            bytemuck::cast_slice(&staged.indices),
            gl::STATIC_DRAW,
        );

        // The matrix buffer starts unwritten; fill it before the first
        // draw reads from it. On failure everything drops and the next
        // frame starts over.
        let mut mvp = GlBuffer::generate(GlBufferType::Array);
        mvp.data_uninitialized(self.matrix_bytes(), gl::DYNAMIC_DRAW);
        Self::write_matrices(&self.table, &mut mvp, self.aspect)?;

        self.gpu = Some(InstancedBuffers {
            position,
            color,
            mvp,
            element,
        });
        self.staged = None;
        Ok(())
    }
}

impl DrawStrategy for Instanced {
    fn update(&mut self, frame: &FrameInput) -> Result<(), GlError> {
        self.table.advance(frame.delta);
        self.aspect = frame.aspect;

        // Nothing allocated yet means the first draw will write the
        // freshly advanced matrices itself.
        if let Some(gpu) = &mut self.gpu {
            Self::write_matrices(&self.table, &mut gpu.mvp, self.aspect)?;
        }
        Ok(())
    }

    fn draw(&mut self) -> Result<(), GlError> {
        self.ensure_uploaded()?;
        let Some(gpu) = &self.gpu else {
            return Ok(());
        };

        gpu.position.bind();
        set_vertex_attrib(POSITION_LOC, 0, VERTEX_POS_SIZE as i32, VERTEX_POS_SIZE);

        unsafe {
            gpu.color.bind();
            gl::VertexAttribPointer(COLOR_LOC, 4, gl::UNSIGNED_BYTE, gl::TRUE, 4, null());
            gl::EnableVertexAttribArray(COLOR_LOC);
            gl::VertexAttribDivisor(COLOR_LOC, 1);

            // One vec4 column of the instance matrix per location.
            gpu.mvp.bind();
            for column in 0..4 {
                let location = MVP_LOC + column;
                gl::VertexAttribPointer(
                    location,
                    4,
                    gl::FLOAT,
                    gl::FALSE,
                    size_of::<Mat4>() as i32,
                    (column as usize * 4 * size_of::<f32>()) as *const c_void,
                );
                gl::EnableVertexAttribArray(location);
                gl::VertexAttribDivisor(location, 1);
            }

            gpu.element.bind();
            gl::DrawElementsInstanced(
                gl::TRIANGLES,
                self.index_count as i32,
                gl::UNSIGNED_INT,
                null(),
                self.table.len() as i32,
            );

            // divisor 0 is the per-vertex default the other paths expect
            gl::VertexAttribDivisor(COLOR_LOC, 0);
            gl::DisableVertexAttribArray(COLOR_LOC);
            for column in 0..4 {
                gl::VertexAttribDivisor(MVP_LOC + column, 0);
                gl::DisableVertexAttribArray(MVP_LOC + column);
            }
        }

        disable_vertex_attrib(POSITION_LOC);
        gpu.mvp.unbind();
        gpu.element.unbind();

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use esutil::mesh::MeshParts;
    use esutil::shapes;

    // Construction must stay free of GL calls; allocation belongs to the
    // first draw. Running this headless proves it.
    #[test]
    fn every_strategy_builds_without_a_context() {
        for kind in UploadStrategy::value_variants() {
            let mesh = shapes::cube(1.0, MeshParts::POSITIONS | MeshParts::INDICES);
            assert!(create(*kind, mesh, 4).is_ok(), "{kind:?} failed to build");
        }
    }

    #[test]
    fn client_arrays_keep_the_full_interleaved_copy() {
        let mesh = shapes::cube(1.0, MeshParts::POSITIONS | MeshParts::INDICES);
        let vertex_count = mesh.vertex_count();

        let positions = mesh.positions.clone().unwrap();
        let colors = vertex_colors(&positions);
        let strategy = ClientArrays {
            vertices: interleave(&positions, &colors).unwrap(),
            indices: mesh.indices.unwrap(),
        };

        assert_eq!(strategy.vertices.len(), vertex_count * VERTEX_STRIDE);
        assert_eq!(strategy.indices.len(), mesh.index_count);
    }

    #[test]
    fn staged_uploads_start_on_the_cpu() {
        let mesh = shapes::cube(1.0, MeshParts::POSITIONS | MeshParts::INDICES);

        let strategy = SeparateVbos {
            staged: Some(AttributeArrays {
                positions: mesh.positions.clone().unwrap(),
                colors: vertex_colors(mesh.positions.as_ref().unwrap()),
                indices: mesh.indices.clone().unwrap(),
            }),
            buffers: None,
            index_count: mesh.index_count,
        };

        let staged = strategy.staged.as_ref().unwrap();
        assert_eq!(staged.positions.len(), staged.colors.len());
        assert_eq!(staged.indices.len(), strategy.index_count);
        assert!(strategy.buffers.is_none());
    }
}
