//! Hierarchical scene graph.
//!
//! This crate provides scene management:
//! - 4x4 transforms with a fixed composition convention
//! - A node tree with relative/absolute transforms and a save/restore stack
//! - Scene objects (material + drawable) drawn children-first
//! - Point lights collected into shader uniforms under a light budget

mod error;
mod light;
mod material;
mod node;
mod object;
mod shader;
mod transform;
mod tree;
mod ubo;

pub use arbor_core::{DEFAULT_MAX_POINT_LIGHTS, SceneConfig};
pub use error::{Collection, SceneError, SceneResult};
pub use light::PointLight;
pub use material::Material;
pub use node::{NodeId, NodeMut, SceneNode};
pub use object::{Drawable, LabelledDrawable, SceneObject};
pub use shader::{Shader, ShaderEvent, Uniform, UniformRecorder};
pub use transform::Transform;
pub use tree::{NUM_POINT_LIGHTS_UNIFORM, SceneTree};
pub use ubo::{PointLightUbo, normal_matrix};
