//! The scene driver: one shader program, one upload strategy, and the
//! spin state that ties successive frames together.

use clap::ValueEnum;
use gl::types::GLint;
use glam::{Mat4, Vec3};
use log::info;

use esutil::mesh::{Mesh, MeshParts};
use esutil::shapes;

use super::gl_types::{GlProgram, GlShader};
use super::strategies::{self, DrawStrategy, FrameInput, UploadStrategy};
use super::{GlError, SPIN_RATE};

/// Which shape the sample renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Shape {
    Cube,
    Sphere,
    Grid,
}

impl Shape {
    /// Generates the indexed, position-only mesh for this shape; colors are
    /// derived later from the positions. `scale` sets the cube's edge length
    /// and the sphere's diameter. The grid always spans the unit square.
    fn generate(self, scale: f32) -> Mesh {
        let parts = MeshParts::POSITIONS | MeshParts::INDICES;
        match self {
            Self::Cube => shapes::cube(scale, parts),
            Self::Sphere => shapes::sphere(24, scale * 0.5, parts),
            Self::Grid => shapes::square_grid(10, parts),
        }
    }
}

fn wrap_angle(angle: f32) -> f32 {
    if angle >= 360.0 {
        angle - 360.0
    } else {
        angle
    }
}

/// MVP for the single spinning shape: a 60 degree perspective over
/// [1, 20], with the shape two units from the camera rotating around the
/// diagonal (1, 0, 1) axis.
fn spin_mvp(angle: f32, aspect: f32) -> Mat4 {
    let perspective = Mat4::perspective_rh_gl(60f32.to_radians(), aspect, 1.0, 20.0);
    let modelview = Mat4::from_translation(Vec3::new(0.0, 0.0, -2.0))
        * Mat4::from_axis_angle(Vec3::new(1.0, 0.0, 1.0).normalize(), angle.to_radians());
    perspective * modelview
}

/// Owns everything a frame needs: the linked program, the chosen upload
/// strategy and the current rotation.
///
/// Instanced rendering swaps in a vertex shader that reads its matrix from
/// per-instance attributes; every other strategy shares the standard
/// shader and gets the matrix through a uniform.
pub struct CubeScene {
    program: GlProgram,
    mvp_loc: GLint,
    strategy: Box<dyn DrawStrategy>,
    angle: f32,
    mvp: Mat4,
}

impl CubeScene {
    /// Compiles the shaders, generates the mesh and prepares the strategy.
    /// Needs a current GL context; GPU buffers still wait for the first
    /// draw.
    pub fn new(
        kind: UploadStrategy,
        shape: Shape,
        instances: usize,
        scale: f32,
    ) -> Result<Self, GlError> {
        let vert_source = match kind {
            UploadStrategy::Instanced => include_str!("shaders/instanced.vert"),
            _ => include_str!("shaders/standard.vert"),
        };
        let shaders = [
            GlShader::from_vert_source(vert_source)?,
            GlShader::from_frag_source(include_str!("shaders/color.frag"))?,
        ];
        let program = GlProgram::from_shaders(&shaders)?;
        // Resolves to -1 under the instanced shader, which has no uniform.
        let mvp_loc = program.uniform_location("u_mvpMatrix");

        let mesh = shape.generate(scale);
        info!(
            "drawing a {:?} ({} vertices, {} triangles) with the {:?} strategy",
            shape,
            mesh.vertex_count(),
            mesh.triangle_count(),
            kind,
        );
        let strategy = strategies::create(kind, mesh, instances)?;

        unsafe {
            gl::ClearColor(1.0, 1.0, 1.0, 0.0);
        }

        Ok(Self {
            program,
            mvp_loc,
            strategy,
            angle: 45.0,
            mvp: Mat4::IDENTITY,
        })
    }

    /// Advances the rotation by `delta` seconds and lets the strategy
    /// refresh whatever it keeps on the GPU.
    pub fn update(&mut self, delta: f32, aspect: f32) -> Result<(), GlError> {
        self.angle = wrap_angle(self.angle + delta * SPIN_RATE);
        self.mvp = spin_mvp(self.angle, aspect);

        self.strategy.update(&FrameInput { delta, aspect })
    }

    /// Clears the frame and issues the strategy's draw call.
    pub fn draw(&mut self, width: i32, height: i32) -> Result<(), GlError> {
        unsafe {
            gl::Viewport(0, 0, width, height);
            gl::Clear(gl::COLOR_BUFFER_BIT | gl::DEPTH_BUFFER_BIT);
        }

        self.program.set_used();
        if self.mvp_loc >= 0 {
            let matrix = self.mvp.to_cols_array();
            unsafe {
                gl::UniformMatrix4fv(self.mvp_loc, 1, gl::FALSE, matrix.as_ptr());
            }
        }

        self.strategy.draw()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn angles_wrap_modularly() {
        assert_eq!(wrap_angle(359.5), 359.5);
        assert_eq!(wrap_angle(360.0), 0.0);
        assert_eq!(wrap_angle(361.25), 1.25);
    }

    #[test]
    fn the_single_shape_camera_matches_its_formula() {
        let expected = Mat4::perspective_rh_gl(60f32.to_radians(), 1.25, 1.0, 20.0)
            * Mat4::from_translation(Vec3::new(0.0, 0.0, -2.0))
            * Mat4::from_axis_angle(Vec3::new(1.0, 0.0, 1.0).normalize(), 45f32.to_radians());

        assert!(expected.abs_diff_eq(spin_mvp(45.0, 1.25), 1e-6));
    }

    #[test]
    fn every_shape_generates_positions_and_indices() {
        for shape in [Shape::Cube, Shape::Sphere, Shape::Grid] {
            let mesh = shape.generate(1.0);
            assert!(mesh.vertex_count() > 0, "{shape:?} has no vertices");
            assert!(mesh.index_count > 0, "{shape:?} has no indices");
            assert!(mesh.indices.is_some(), "{shape:?} skipped its index array");
            assert!(mesh.normals.is_none());
        }
    }

    #[test]
    fn scale_reaches_the_generated_cube() {
        let mesh = Shape::Cube.generate(3.0);
        let positions = mesh.positions.unwrap();

        assert!(positions.iter().flatten().all(|c| c.abs() == 1.5));
    }
}
