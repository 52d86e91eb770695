//! A simple set of wrappers around the OpenGL API.
//!
//! The sample uses raw OpenGL calls on purpose: the whole point is to show
//! how the different buffer upload and binding APIs behave, and a rendering
//! library would hide exactly the calls being compared. Raw GL in Rust means
//! hundreds of lines of cryptic, unsafe function calls though, so this module
//! wraps each object kind in a small safe type that owns its GL name, turns
//! failure codes into [`GlError`](super::GlError), and deletes the object on
//! drop. [docs.gl](http://docs.gl/) is a good reference for the individual
//! calls.

use std::ffi::{c_void, CString};
use std::mem::size_of;
use std::ptr::{null, null_mut};
use std::slice;

use gl;
use gl::types::*;

use super::utils::{create_ws_cstring_with_len, shader_from_source};
use super::GlError;

pub enum GlShaderType {
    Vertex = gl::VERTEX_SHADER as isize,
    Fragment = gl::FRAGMENT_SHADER as isize,
}

impl GlShaderType {
    fn label(&self) -> &'static str {
        match self {
            Self::Vertex => "vertex",
            Self::Fragment => "fragment",
        }
    }
}

/// A compiled shader stage.
pub struct GlShader {
    id: GLuint,
}

impl GlShader {
    pub fn id(&self) -> GLuint {
        self.id
    }

    pub fn from_source(src: &str, kind: GlShaderType) -> Result<Self, GlError> {
        let label = kind.label();
        let source = CString::new(src).map_err(|_| GlError::Compile {
            kind: label,
            log: String::from("shader source contains a NUL byte"),
        })?;

        let id = shader_from_source(&source, kind as u32, label)?;

        Ok(Self { id })
    }

    pub fn from_vert_source(src: &str) -> Result<Self, GlError> {
        Self::from_source(src, GlShaderType::Vertex)
    }

    pub fn from_frag_source(src: &str) -> Result<Self, GlError> {
        Self::from_source(src, GlShaderType::Fragment)
    }
}

impl Drop for GlShader {
    fn drop(&mut self) {
        unsafe {
            gl::DeleteShader(self.id);
        }
    }
}

/// A linked shader program.
pub struct GlProgram {
    id: GLuint,
}

impl GlProgram {
    pub fn id(&self) -> GLuint {
        self.id
    }

    pub fn from_shaders(shaders: &[GlShader]) -> Result<Self, GlError> {
        let id = unsafe { gl::CreateProgram() };

        unsafe {
            for shader in shaders {
                gl::AttachShader(id, shader.id());
            }

            gl::LinkProgram(id);

            let mut success = 1;
            gl::GetProgramiv(id, gl::LINK_STATUS, &mut success);

            if success == 0 {
                let mut len = 0;
                gl::GetProgramiv(id, gl::INFO_LOG_LENGTH, &mut len);

                let log = create_ws_cstring_with_len(len as usize);
                gl::GetProgramInfoLog(id, len, null_mut(), log.as_ptr() as *mut i8);
                gl::DeleteProgram(id);

                return Err(GlError::Link {
                    log: log.to_string_lossy().into_owned(),
                });
            }

            for shader in shaders {
                gl::DetachShader(id, shader.id());
            }
        }

        Ok(Self { id })
    }

    pub fn set_used(&self) {
        unsafe {
            gl::UseProgram(self.id);
        }
    }

    /// Location of a uniform, or -1 when the linker discarded it.
    pub fn uniform_location(&self, name: &str) -> GLint {
        CString::new(name)
            .map_or(-1, |name| unsafe { gl::GetUniformLocation(self.id, name.as_ptr()) })
    }
}

impl Drop for GlProgram {
    fn drop(&mut self) {
        unsafe {
            gl::DeleteProgram(self.id);
        }
    }
}

#[derive(Clone, Copy)]
pub enum GlBufferType {
    Array = gl::ARRAY_BUFFER as isize,
    Element = gl::ELEMENT_ARRAY_BUFFER as isize,
}

/// A [buffer object](vbo) together with the target it binds to. Vertex
/// attributes, element indices and per-instance data all live in these;
/// only the target and the attached pointers differ.
///
/// [vbo]: https://en.wikipedia.org/wiki/Vertex_buffer_object
pub struct GlBuffer {
    id: GLuint,
    target: GLenum,
}

impl GlBuffer {
    pub fn id(&self) -> GLuint {
        self.id
    }

    pub fn generate(kind: GlBufferType) -> Self {
        let mut id = 0u32;
        unsafe { gl::GenBuffers(1, &mut id) };
        Self {
            id,
            target: kind as u32,
        }
    }

    /// Generates a buffer and uploads `bytes` into it in one go.
    pub fn init(kind: GlBufferType, bytes: &[u8], usage: GLenum) -> Self {
        let buffer = Self::generate(kind);
        buffer.bind();
        buffer.data(bytes, usage);
        buffer
    }

    pub fn bind(&self) {
        unsafe {
            gl::BindBuffer(self.target, self.id);
        }
    }

    pub fn unbind(&self) {
        unsafe {
            gl::BindBuffer(self.target, 0);
        }
    }

    /// Uploads `bytes` into the buffer's data store. Binds the buffer.
    pub fn data(&self, bytes: &[u8], usage: GLenum) {
        self.bind();
        unsafe {
            gl::BufferData(
                self.target,
                bytes.len() as isize,
                bytes.as_ptr() as *const c_void,
                usage,
            );
        }
    }

    /// Allocates `len` bytes of storage without writing anything, for use
    /// with [`Self::map_write`]. Binds the buffer.
    pub fn data_uninitialized(&self, len: usize, usage: GLenum) {
        self.bind();
        unsafe {
            gl::BufferData(self.target, len as isize, null(), usage);
        }
    }

    /// Maps the first `len` bytes of the buffer into client memory for
    /// writing. `access` can add flags like `gl::MAP_INVALIDATE_BUFFER_BIT`
    /// on top of the implied write bit.
    ///
    /// The returned slice is only valid until [`Self::unmap`], which must
    /// run before the buffer is drawn from. `what` labels the buffer in
    /// errors.
    pub fn map_write(
        &mut self,
        len: usize,
        access: GLbitfield,
        what: &'static str,
    ) -> Result<&mut [u8], GlError> {
        self.bind();
        let ptr = unsafe {
            gl::MapBufferRange(self.target, 0, len as isize, gl::MAP_WRITE_BIT | access)
        };

        if ptr.is_null() {
            return Err(GlError::MapFailed { what });
        }

        Ok(unsafe { slice::from_raw_parts_mut(ptr as *mut u8, len) })
    }

    /// Hands a mapped buffer back to the GL. A `GL_FALSE` return means the
    /// data store was lost while mapped and the write must be redone.
    pub fn unmap(&self, what: &'static str) -> Result<(), GlError> {
        if unsafe { gl::UnmapBuffer(self.target) } == gl::FALSE {
            return Err(GlError::UnmapFailed { what });
        }
        Ok(())
    }
}

impl Drop for GlBuffer {
    fn drop(&mut self) {
        unsafe {
            gl::DeleteBuffers(1, &self.id);
        }
    }
}

/// A vertex array object: records attribute formats, their source buffers
/// and the element buffer binding, so a draw only has to bind the one VAO.
pub struct GlVertexArray {
    id: GLuint,
}

impl GlVertexArray {
    pub fn id(&self) -> GLuint {
        self.id
    }

    pub fn generate() -> Self {
        let mut id = 0u32;
        unsafe { gl::GenVertexArrays(1, &mut id) };
        Self { id }
    }

    pub fn bind(&self) {
        unsafe {
            gl::BindVertexArray(self.id);
        }
    }

    pub fn unbind(&self) {
        unsafe {
            gl::BindVertexArray(0);
        }
    }
}

impl Drop for GlVertexArray {
    fn drop(&mut self) {
        unsafe {
            gl::DeleteVertexArrays(1, &self.id);
        }
    }
}

/// Points attribute `index` at float data in the bound array buffer.
/// `offset` and `stride` are in floats, not bytes.
pub fn set_vertex_attrib(index: u32, offset: usize, size: i32, stride: usize) {
    unsafe {
        gl::EnableVertexAttribArray(index);
        gl::VertexAttribPointer(
            index,
            size,
            gl::FLOAT,
            gl::FALSE,
            (stride * size_of::<f32>()) as i32,
            (offset * size_of::<f32>()) as *const c_void,
        );
    }
}

pub fn disable_vertex_attrib(index: u32) {
    unsafe {
        gl::DisableVertexAttribArray(index);
    }
}
