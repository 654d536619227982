//! Drawable objects attached to scene nodes.

use std::fmt;

use crate::material::Material;
use crate::shader::Shader;
use crate::transform::Transform;
use crate::ubo::normal_matrix;

/// Something that can issue a draw call, typically a mesh.
///
/// The scene object binds the model matrix and material before calling
/// [`Drawable::draw`]; the drawable only binds its own geometry state and
/// issues the call.
pub trait Drawable: Send {
    fn draw(&self, shader: &mut dyn Shader, model: &Transform);

    /// Name used in logs and draw traces.
    fn label(&self) -> &str {
        "drawable"
    }
}

/// A drawable that only records a labelled draw call.
///
/// Stands in for real geometry in headless runs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LabelledDrawable(pub String);

impl LabelledDrawable {
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }
}

impl Drawable for LabelledDrawable {
    fn draw(&self, shader: &mut dyn Shader, _model: &Transform) {
        shader.draw_call(&self.0);
    }

    fn label(&self) -> &str {
        &self.0
    }
}

/// A material + drawable binding owned by a scene node.
pub struct SceneObject {
    pub material: Material,
    drawable: Box<dyn Drawable>,
}

impl fmt::Debug for SceneObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SceneObject")
            .field("material", &self.material)
            .field("drawable", &self.drawable.label())
            .finish()
    }
}

impl SceneObject {
    pub fn new(material: Material, drawable: Box<dyn Drawable>) -> Self {
        Self { material, drawable }
    }

    pub fn drawable(&self) -> &dyn Drawable {
        self.drawable.as_ref()
    }

    /// Replace the drawable, keeping the material.
    pub fn set_drawable(&mut self, drawable: Box<dyn Drawable>) {
        self.drawable = drawable;
    }

    /// Bind `model` (and the material unless `omit_material`) and draw.
    pub fn draw(&self, shader: &mut dyn Shader, model: &Transform, omit_material: bool) {
        let matrix = *model.as_mat4();
        shader.set_uniform("model", matrix.into());
        shader.set_uniform("normalMatrix", normal_matrix(matrix).into());
        if !omit_material {
            self.material.bind(shader);
        }
        self.drawable.draw(shader, model);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shader::{ShaderEvent, Uniform, UniformRecorder};
    use glam::Vec3;

    #[test]
    fn test_draw_binds_model_then_draws() {
        let object = SceneObject::new(Material::default(), Box::new(LabelledDrawable::new("cube")));
        let model = Transform::translation(Vec3::new(1.0, 2.0, 3.0));
        let mut shader = UniformRecorder::new();

        object.draw(&mut shader, &model, false);

        assert_eq!(shader.get("model"), Some(&Uniform::Mat4(*model.as_mat4())));
        assert!(shader.get("material.baseColour").is_some());
        assert_eq!(
            shader.events().last(),
            Some(&ShaderEvent::Draw {
                label: "cube".to_owned()
            })
        );
    }

    #[test]
    fn test_omit_material() {
        let object = SceneObject::new(Material::default(), Box::new(LabelledDrawable::new("cube")));
        let mut shader = UniformRecorder::new();

        object.draw(&mut shader, &Transform::IDENTITY, true);

        assert!(shader.get("material.baseColour").is_none());
        assert_eq!(shader.draw_labels(), vec!["cube"]);
    }

    #[test]
    fn test_debug_shows_label() {
        let object = SceneObject::new(Material::default(), Box::new(LabelledDrawable::new("teapot")));
        assert!(format!("{object:?}").contains("teapot"));
    }
}
