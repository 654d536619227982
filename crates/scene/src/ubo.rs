//! Uniform block layouts for backends that upload lights as a buffer.
//!
//! All structures use `#[repr(C)]` for predictable memory layout and
//! implement `Pod` and `Zeroable` for safe byte casting. Layouts follow
//! std140: every `Vec3` is padded to 16 bytes.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

use crate::light::PointLight;

/// One point light as seen by the lighting shader.
///
/// # Memory Layout (std140)
///
/// | Offset | Size | Field |
/// |--------|------|-------|
/// | 0      | 12   | colour |
/// | 12     | 4    | ambient |
/// | 16     | 12   | position |
/// | 28     | 4    | constant_att |
/// | 32     | 4    | linear_att |
/// | 36     | 4    | exponential_att |
/// | 40     | 8    | _padding |
///
/// Total size: 48 bytes
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct PointLightUbo {
    pub colour: Vec3,
    pub ambient: f32,
    pub position: Vec3,
    pub constant_att: f32,
    pub linear_att: f32,
    pub exponential_att: f32,
    _padding: [f32; 2],
}

impl PointLightUbo {
    /// Size of the struct in bytes.
    pub const SIZE: usize = std::mem::size_of::<Self>();
}

impl From<&PointLight> for PointLightUbo {
    fn from(light: &PointLight) -> Self {
        Self {
            colour: light.colour,
            ambient: light.ambient,
            position: light.position,
            constant_att: light.constant_att,
            linear_att: light.linear_att,
            exponential_att: light.exponential_att,
            _padding: [0.0; 2],
        }
    }
}

/// Computes the normal matrix (inverse transpose) for a model matrix.
///
/// Singular model matrices (e.g. a zero scale) fall back to the identity
/// so no NaN reaches the shader.
pub fn normal_matrix(model: Mat4) -> Mat4 {
    const EPSILON: f32 = 1e-6;
    if model.determinant().abs() < EPSILON {
        Mat4::IDENTITY
    } else {
        model.inverse().transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_light_ubo_size() {
        assert_eq!(PointLightUbo::SIZE, 48);
        assert_eq!(PointLightUbo::SIZE % 16, 0);
    }

    #[test]
    fn test_point_light_ubo_from_light() {
        let mut light = PointLight::new(Vec3::new(1.0, 0.5, 0.25));
        light.position = Vec3::new(3.0, 2.0, 1.0);
        let ubo = PointLightUbo::from(&light);

        assert_eq!(ubo.colour, light.colour);
        assert_eq!(ubo.position, light.position);
        assert_eq!(ubo.exponential_att, light.exponential_att);

        assert_eq!(ubo._padding, [0.0; 2]);

        let bytes: &[u8] = bytemuck::bytes_of(&ubo);
        assert_eq!(bytes.len(), PointLightUbo::SIZE);
    }

    #[test]
    fn test_normal_matrix_non_invertible() {
        let normal = normal_matrix(Mat4::from_scale(Vec3::ZERO));
        assert_eq!(normal, Mat4::IDENTITY);
    }

    #[test]
    fn test_normal_matrix_with_scale() {
        let model = Mat4::from_scale(Vec3::new(1.0, 2.0, 1.0));
        assert_eq!(normal_matrix(model), model.inverse().transpose());
    }
}
