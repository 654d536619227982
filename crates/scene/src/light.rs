//! Point lights attached to scene nodes.

use glam::Vec3;

use crate::shader::Shader;

/// A point light (omnidirectional) with quadratic attenuation.
///
/// The light's `position` is owned by the scene graph: it is overwritten
/// with the node's absolute position whenever the node propagates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointLight {
    /// Light colour
    pub colour: Vec3,
    /// Light position in world space
    pub position: Vec3,
    /// Ambient intensity contributed regardless of distance
    pub ambient: f32,
    /// Constant attenuation term
    pub constant_att: f32,
    /// Linear attenuation term
    pub linear_att: f32,
    /// Quadratic attenuation term
    pub exponential_att: f32,
}

impl Default for PointLight {
    fn default() -> Self {
        Self {
            colour: Vec3::ONE,
            position: Vec3::ZERO,
            ambient: 0.1,
            constant_att: 1.0,
            linear_att: 0.09,
            exponential_att: 0.032,
        }
    }
}

impl PointLight {
    /// A light of the given colour with default attenuation.
    pub fn new(colour: Vec3) -> Self {
        Self {
            colour,
            ..Self::default()
        }
    }

    /// Set the ambient intensity.
    pub fn with_ambient(mut self, ambient: f32) -> Self {
        self.ambient = ambient;
        self
    }

    /// Set the constant, linear and quadratic attenuation terms.
    pub fn with_attenuation(mut self, constant: f32, linear: f32, exponential: f32) -> Self {
        self.constant_att = constant;
        self.linear_att = linear;
        self.exponential_att = exponential;
        self
    }

    /// Copy every user-controlled parameter from `other`, keeping `position`.
    pub(crate) fn assign(&mut self, other: PointLight) {
        self.colour = other.colour;
        self.ambient = other.ambient;
        self.constant_att = other.constant_att;
        self.linear_att = other.linear_att;
        self.exponential_att = other.exponential_att;
    }

    /// Attenuation factor at `distance` from the light.
    pub fn attenuation(&self, distance: f32) -> f32 {
        let denom = self.constant_att
            + self.linear_att * distance
            + self.exponential_att * distance * distance;
        if denom <= 0.0 { 1.0 } else { 1.0 / denom }
    }

    /// Write this light into slot `index` of the `pointLights` uniform array.
    pub fn draw(&self, shader: &mut dyn Shader, index: usize) {
        let prefix = format!("pointLights[{index}]");
        shader.set_uniform(&format!("{prefix}.colour"), self.colour.into());
        shader.set_uniform(&format!("{prefix}.position"), self.position.into());
        shader.set_uniform(&format!("{prefix}.ambient"), self.ambient.into());
        shader.set_uniform(&format!("{prefix}.constantAtt"), self.constant_att.into());
        shader.set_uniform(&format!("{prefix}.linearAtt"), self.linear_att.into());
        shader.set_uniform(&format!("{prefix}.exponentialAtt"), self.exponential_att.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shader::{Uniform, UniformRecorder};

    #[test]
    fn test_draw_writes_indexed_fields() {
        let mut light = PointLight::new(Vec3::new(1.0, 0.0, 0.0)).with_ambient(0.25);
        light.position = Vec3::new(0.0, 4.0, 0.0);

        let mut shader = UniformRecorder::new();
        light.draw(&mut shader, 7);

        assert_eq!(shader.uniform_count(), 6);
        assert_eq!(
            shader.get("pointLights[7].colour"),
            Some(&Uniform::Vec3(Vec3::new(1.0, 0.0, 0.0)))
        );
        assert_eq!(
            shader.get("pointLights[7].position"),
            Some(&Uniform::Vec3(Vec3::new(0.0, 4.0, 0.0)))
        );
        assert_eq!(shader.get("pointLights[7].ambient"), Some(&Uniform::Float(0.25)));
        assert!(shader.get("pointLights[7].constantAtt").is_some());
        assert!(shader.get("pointLights[7].linearAtt").is_some());
        assert!(shader.get("pointLights[7].exponentialAtt").is_some());
    }

    #[test]
    fn test_assign_keeps_position() {
        let mut light = PointLight::default();
        light.position = Vec3::X;
        light.assign(PointLight::new(Vec3::Y).with_attenuation(2.0, 0.0, 0.0));

        assert_eq!(light.position, Vec3::X);
        assert_eq!(light.colour, Vec3::Y);
        assert_eq!(light.constant_att, 2.0);
    }

    #[test]
    fn test_attenuation() {
        let light = PointLight::default().with_attenuation(1.0, 0.0, 1.0);
        assert_eq!(light.attenuation(0.0), 1.0);
        assert_eq!(light.attenuation(1.0), 0.5);

        let degenerate = PointLight::default().with_attenuation(0.0, 0.0, 0.0);
        assert_eq!(degenerate.attenuation(3.0), 1.0);
    }
}
