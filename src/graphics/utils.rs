use std::ffi::{CStr, CString};
use std::ptr::{null, null_mut};

use gl;

use super::GlError;

/// Compiles a single shader stage, returning its name or the compiler's
/// info log on failure. `kind_name` only labels the error.
pub fn shader_from_source(
    source: &CStr,
    kind: u32,
    kind_name: &'static str,
) -> Result<u32, GlError> {
    let id: u32 = unsafe { gl::CreateShader(kind) };
    unsafe {
        gl::ShaderSource(id, 1, &source.as_ptr(), null());
        gl::CompileShader(id);
    }

    let mut success = 1;
    unsafe {
        gl::GetShaderiv(id, gl::COMPILE_STATUS, &mut success);
    }

    if success == 0 {
        let mut len = 0;
        unsafe {
            gl::GetShaderiv(id, gl::INFO_LOG_LENGTH, &mut len);
        }

        let log = create_ws_cstring_with_len(len as usize);
        unsafe {
            gl::GetShaderInfoLog(id, len, null_mut(), log.as_ptr() as *mut i8);
            gl::DeleteShader(id);
        }

        return Err(GlError::Compile {
            kind: kind_name,
            log: log.to_string_lossy().into_owned(),
        });
    }

    Ok(id)
}

/// Builds a CString of `len` spaces for the GL info-log calls to write into.
pub fn create_ws_cstring_with_len(len: usize) -> CString {
    let mut buf: Vec<u8> = Vec::with_capacity(len + 1);
    buf.extend([b' '].iter().cycle().take(len));
    unsafe { CString::from_vec_unchecked(buf) }
}
