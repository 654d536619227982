//! Shader uniform interface.
//!
//! The scene graph never talks to a GPU API directly. Everything it needs to
//! hand to a shader program goes through [`Shader::set_uniform`] with a
//! GLSL-style uniform name such as `pointLights[3].colour`.

use std::collections::HashMap;

use glam::{Mat4, Vec3, Vec4};

/// A value written to a shader uniform.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Uniform {
    Int(i32),
    Float(f32),
    Vec3(Vec3),
    Vec4(Vec4),
    Mat4(Mat4),
}

impl From<i32> for Uniform {
    fn from(value: i32) -> Self {
        Uniform::Int(value)
    }
}

impl From<f32> for Uniform {
    fn from(value: f32) -> Self {
        Uniform::Float(value)
    }
}

impl From<Vec3> for Uniform {
    fn from(value: Vec3) -> Self {
        Uniform::Vec3(value)
    }
}

impl From<Vec4> for Uniform {
    fn from(value: Vec4) -> Self {
        Uniform::Vec4(value)
    }
}

impl From<Mat4> for Uniform {
    fn from(value: Mat4) -> Self {
        Uniform::Mat4(value)
    }
}

/// A bound shader program that accepts named uniforms.
pub trait Shader {
    /// Write a single uniform. Unknown names are the implementation's business.
    fn set_uniform(&mut self, name: &str, value: Uniform);

    /// Record that a draw call was issued. Backends without a notion of
    /// draw calls can ignore this.
    fn draw_call(&mut self, _label: &str) {}
}

/// One entry of a [`UniformRecorder`] trace.
#[derive(Clone, Debug, PartialEq)]
pub enum ShaderEvent {
    Uniform { name: String, value: Uniform },
    Draw { label: String },
}

/// In-memory [`Shader`] that keeps every write.
///
/// Used for headless runs and for asserting traversal order in tests.
#[derive(Debug, Default)]
pub struct UniformRecorder {
    values: HashMap<String, Uniform>,
    events: Vec<ShaderEvent>,
}

impl UniformRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Latest value written to `name`.
    pub fn get(&self, name: &str) -> Option<&Uniform> {
        self.values.get(name)
    }

    /// Every uniform write and draw call, in issue order.
    pub fn events(&self) -> &[ShaderEvent] {
        &self.events
    }

    /// Labels of the draw calls, in issue order.
    pub fn draw_labels(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|event| match event {
                ShaderEvent::Draw { label } => Some(label.as_str()),
                ShaderEvent::Uniform { .. } => None,
            })
            .collect()
    }

    /// Number of distinct uniform names written.
    pub fn uniform_count(&self) -> usize {
        self.values.len()
    }

    pub fn clear(&mut self) {
        self.values.clear();
        self.events.clear();
    }
}

impl Shader for UniformRecorder {
    fn set_uniform(&mut self, name: &str, value: Uniform) {
        self.values.insert(name.to_owned(), value);
        self.events.push(ShaderEvent::Uniform {
            name: name.to_owned(),
            value,
        });
    }

    fn draw_call(&mut self, label: &str) {
        self.events.push(ShaderEvent::Draw {
            label: label.to_owned(),
        });
    }
}
