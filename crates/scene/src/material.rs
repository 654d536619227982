//! Material parameters bound before a scene object is drawn.

use glam::Vec4;

use crate::shader::Shader;

/// PBR material properties.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    /// Base color (albedo)
    pub base_colour: Vec4,
    /// Metallic factor (0.0 = dielectric, 1.0 = metal)
    pub metallic: f32,
    /// Roughness factor (0.0 = smooth, 1.0 = rough)
    pub roughness: f32,
    /// Ambient occlusion factor
    pub ao: f32,
    /// Emissive color
    pub emissive: Vec4,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            base_colour: Vec4::ONE,
            metallic: 0.0,
            roughness: 0.5,
            ao: 1.0,
            emissive: Vec4::ZERO,
        }
    }
}

impl Material {
    /// Uniform names written by [`Material::bind`].
    pub const UNIFORMS: [&'static str; 5] = [
        "material.baseColour",
        "material.metallic",
        "material.roughness",
        "material.ao",
        "material.emissive",
    ];

    /// An opaque dielectric of the given colour.
    pub fn coloured(base_colour: Vec4) -> Self {
        Self {
            base_colour,
            ..Self::default()
        }
    }

    /// Write this material's uniforms.
    pub fn bind(&self, shader: &mut dyn Shader) {
        let [base, metallic, roughness, ao, emissive] = Self::UNIFORMS;
        shader.set_uniform(base, self.base_colour.into());
        shader.set_uniform(metallic, self.metallic.into());
        shader.set_uniform(roughness, self.roughness.into());
        shader.set_uniform(ao, self.ao.into());
        shader.set_uniform(emissive, self.emissive.into());
    }
}
