//! Arbor - headless scene graph demo
//!
//! Builds a small orrery, spins it for a few frames and logs what a shader
//! would have received. Pass a JSON config path as the first argument to
//! override the defaults.

use anyhow::{Context, Result};
use glam::{Vec3, Vec4};
use tracing::{debug, info};

use arbor_core::{EngineConfig, Timer};
use arbor_scene::{
    LabelledDrawable, Material, NodeId, PointLight, SceneTree, Transform, UniformRecorder,
};

const FRAMES: u32 = 120;
const DEGREES_PER_FRAME: f32 = 3.0;

struct Orrery {
    tree: SceneTree,
    sun: NodeId,
    planet: NodeId,
    moon: NodeId,
}

impl Orrery {
    fn build(config: &EngineConfig) -> Result<Self> {
        let mut tree = SceneTree::with_config(config.scene.clone())?;

        let sun = tree.add_named_child("sun");
        let mut node = tree.node_mut(sun)?;
        node.add_scene_object(
            Material::coloured(Vec4::new(1.0, 0.8, 0.2, 1.0)),
            LabelledDrawable::new("sun"),
        );
        node.set_point_light(PointLight::new(Vec3::new(1.0, 0.9, 0.7)).with_ambient(0.2));

        let planet = node.add_named_child("planet");
        let mut node = tree.node_mut(planet)?;
        node.apply_translation(Vec3::new(4.0, 0.0, 0.0));
        node.add_scene_object(
            Material::coloured(Vec4::new(0.2, 0.4, 1.0, 1.0)),
            LabelledDrawable::new("planet"),
        );

        let moon = node.add_named_child("moon");
        let mut node = tree.node_mut(moon)?;
        node.apply_translation(Vec3::new(1.0, 0.0, 0.0));
        node.apply_scale(Vec3::splat(0.25));
        node.add_scene_object(Material::default(), LabelledDrawable::new("moon"));
        node.set_point_light(
            PointLight::new(Vec3::new(0.6, 0.6, 0.8)).with_attenuation(1.0, 0.35, 0.44),
        );

        Ok(Self {
            tree,
            sun,
            planet,
            moon,
        })
    }

    /// Spin the sun and planet, propagating once per frame.
    fn step(&mut self) -> Result<()> {
        let spin = Transform::rotation_y(DEGREES_PER_FRAME);
        self.tree
            .node_mut(self.sun)?
            .apply_transformation_matrix(spin, false);
        self.tree
            .node_mut(self.planet)?
            .apply_transformation_matrix(spin * spin * spin * spin, false);
        self.tree.update_real_positions();
        Ok(())
    }
}

fn main() -> Result<()> {
    let config = match std::env::args().nth(1) {
        Some(path) => EngineConfig::load_or_default(&path)
            .with_context(|| format!("Failed to load config from {path}"))?,
        None => EngineConfig::default(),
    };

    arbor_core::init_logging_with(&config.log_filter);
    info!("Starting arbor demo");

    let mut orrery = Orrery::build(&config)?;
    let mut timer = Timer::new();
    let mut shader = UniformRecorder::new();

    for frame in 0..FRAMES {
        orrery.step()?;

        shader.clear();
        let lights = orrery.tree.draw_point_lights(&mut shader)?;
        orrery.tree.draw(&mut shader, false);
        timer.tick();

        if frame % 30 == 0 {
            let moon = orrery.tree.node(orrery.moon)?;
            debug!(
                "Frame {}: {} lights, draws {:?}, moon at {:?}",
                frame,
                lights,
                shader.draw_labels(),
                moon.absolute_transform().origin()
            );
        }
    }

    info!(
        "Rendered {} frames of {} nodes, {:.3} ms per frame",
        timer.frame_count(),
        orrery.tree.len(),
        timer.average_frame_secs() * 1000.0
    );

    Ok(())
}
