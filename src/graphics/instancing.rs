//! Per-instance state for the instanced draw path: one color and one spin
//! phase per cube, plus the per-frame matrix fill.

use glam::{Mat4, Vec3};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha12Rng;

use super::SPIN_RATE;

/// CPU copy of everything that varies per instance.
///
/// Colors are immutable after construction and upload once; angles advance
/// every frame and turn into the matrices the instanced vertex shader reads
/// from attribute locations 2 through 5.
pub struct InstanceTable {
    colors: Vec<[u8; 4]>,
    angles: Vec<f32>,
}

impl InstanceTable {
    /// Builds `count` instances with random colors and starting angles.
    ///
    /// The generator is seeded with a fixed value, so every run renders the
    /// same field of cubes and the upload strategies can be compared
    /// against identical frames.
    pub fn new(count: usize) -> Self {
        let mut rng = ChaCha12Rng::seed_from_u64(0);

        let colors = (0..count)
            .map(|_| [rng.gen::<u8>(), rng.gen::<u8>(), rng.gen::<u8>(), 0])
            .collect();
        let angles = (0..count).map(|_| rng.gen_range(0.0..360.0)).collect();

        Self { colors, angles }
    }

    pub fn len(&self) -> usize {
        self.angles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.angles.is_empty()
    }

    /// RGBA bytes, 4 per instance, ready for the color buffer upload.
    pub fn color_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.colors)
    }

    /// Advances every instance's rotation by `delta` seconds of spin,
    /// wrapping each angle back into [0, 360).
    pub fn advance(&mut self, delta: f32) {
        for angle in &mut self.angles {
            *angle += delta * SPIN_RATE;
            if *angle >= 360.0 {
                *angle -= 360.0;
            }
        }
    }

    /// Writes one MVP matrix per instance into `out`, stopping at whichever
    /// side is shorter.
    ///
    /// Every instance shares the camera: a 60 degree perspective over
    /// [1, 20], five units back from the cube field. Only the rotation
    /// phase differs.
    pub fn write_transforms(&self, aspect: f32, out: &mut [Mat4]) {
        let perspective = Mat4::perspective_rh_gl(60f32.to_radians(), aspect, 1.0, 20.0);
        let axis = Vec3::new(1.0, 0.0, 1.0).normalize();

        for (matrix, angle) in out.iter_mut().zip(&self.angles) {
            let modelview = Mat4::from_translation(Vec3::new(0.0, 0.0, -5.0))
                * Mat4::from_axis_angle(axis, angle.to_radians());
            *matrix = perspective * modelview;
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn tables_are_deterministic_across_runs() {
        let first = InstanceTable::new(16);
        let second = InstanceTable::new(16);

        assert_eq!(first.colors, second.colors);
        assert_eq!(first.angles, second.angles);
    }

    #[test]
    fn colors_carry_a_zero_alpha() {
        let table = InstanceTable::new(8);

        assert_eq!(table.color_bytes().len(), 32);
        for color in &table.colors {
            assert_eq!(color[3], 0);
        }
    }

    #[test]
    fn angles_start_inside_a_full_turn() {
        let table = InstanceTable::new(32);

        assert!(table.angles.iter().all(|a| (0.0..360.0).contains(a)));
    }

    #[test]
    fn advance_spins_at_the_shared_rate() {
        let mut table = InstanceTable::new(4);
        table.angles = vec![0.0, 10.0, 100.0, 300.0];

        table.advance(0.5);

        assert_eq!(table.angles, vec![20.0, 30.0, 120.0, 320.0]);
    }

    #[test]
    fn advance_wraps_angles_back_into_range() {
        let mut table = InstanceTable::new(1);
        table.angles = vec![359.0];

        table.advance(0.1);

        assert!((table.angles[0] - 3.0).abs() < 1e-4);
    }

    #[test]
    fn transforms_follow_the_camera_formula() {
        let mut table = InstanceTable::new(1);
        table.angles = vec![45.0];
        let mut out = [Mat4::IDENTITY];

        table.write_transforms(1.5, &mut out);

        let expected = Mat4::perspective_rh_gl(60f32.to_radians(), 1.5, 1.0, 20.0)
            * Mat4::from_translation(Vec3::new(0.0, 0.0, -5.0))
            * Mat4::from_axis_angle(Vec3::new(1.0, 0.0, 1.0).normalize(), 45f32.to_radians());
        assert!(expected.abs_diff_eq(out[0], 1e-6));
    }

    #[test]
    fn transforms_stop_at_the_shorter_side() {
        let table = InstanceTable::new(2);
        let mut out = [Mat4::ZERO; 3];

        table.write_transforms(1.0, &mut out);

        assert_ne!(out[0], Mat4::ZERO);
        assert_ne!(out[1], Mat4::ZERO);
        assert_eq!(out[2], Mat4::ZERO);
    }
}
