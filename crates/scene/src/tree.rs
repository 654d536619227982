//! The scene tree: node arena, implicit root and whole-tree traversals.
//!
//! The tree's top-level children are exactly the root node's children;
//! there is no separate list to keep in sync.

use arbor_core::SceneConfig;
use glam::Vec3;
use thunderdome::Arena;
use tracing::{debug, warn};

use crate::error::{Collection, SceneError, SceneResult};
use crate::light::PointLight;
use crate::node::{NodeId, NodeMut, SceneNode, next_tree_id};
use crate::shader::{Shader, Uniform};
use crate::transform::Transform;
use crate::ubo::PointLightUbo;

/// Uniform receiving the number of lights written by a light pass.
pub const NUM_POINT_LIGHTS_UNIFORM: &str = "numPointLights";

/// Owner of every node in a scene.
///
/// # Example
///
/// ```
/// use arbor_scene::{LabelledDrawable, Material, SceneTree, UniformRecorder};
/// use glam::Vec3;
///
/// let mut tree = SceneTree::new();
/// let table = tree.add_named_child("table");
/// let mut node = tree.node_mut(table)?;
/// node.apply_translation(Vec3::new(0.0, 0.0, -3.0));
/// node.add_scene_object(Material::default(), LabelledDrawable::new("table"));
///
/// let mut shader = UniformRecorder::new();
/// tree.draw(&mut shader, false);
/// assert_eq!(shader.draw_labels(), vec!["table"]);
/// # Ok::<(), arbor_scene::SceneError>(())
/// ```
#[derive(Debug)]
pub struct SceneTree {
    pub(crate) nodes: Arena<SceneNode>,
    root: NodeId,
    config: SceneConfig,
}

impl Default for SceneTree {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneTree {
    /// An empty tree with the default configuration.
    pub fn new() -> Self {
        Self::from_valid_config(SceneConfig::default())
    }

    /// An empty tree using `config`, rejected with
    /// [`SceneError::InvalidConfig`] if it fails [`SceneConfig::validate`].
    pub fn with_config(config: SceneConfig) -> SceneResult<Self> {
        config
            .validate()
            .map_err(|err| SceneError::InvalidConfig(err.to_string()))?;
        Ok(Self::from_valid_config(config))
    }

    fn from_valid_config(config: SceneConfig) -> Self {
        let mut nodes = Arena::new();
        let tree = next_tree_id();
        let root = NodeId::new(tree, nodes.insert(SceneNode::root()));
        Self {
            nodes,
            root,
            config,
        }
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    /// Adds a top-level node.
    pub fn add_child(&mut self) -> NodeId {
        self.insert_child(self.root, None)
    }

    /// Adds a labelled top-level node.
    pub fn add_named_child(&mut self, name: impl Into<String>) -> NodeId {
        self.insert_child(self.root, Some(name.into()))
    }

    /// Destroys the top-level node at `index` and its subtree.
    pub fn remove_child(&mut self, index: usize) -> SceneResult<()> {
        self.remove_child_at(self.root, index)
    }

    /// Destroys every node in the tree.
    pub fn remove_all_children(&mut self) {
        self.remove_children_of(self.root);
    }

    /// Top-level nodes, in insertion order.
    pub fn children(&self) -> &[NodeId] {
        &self.nodes[self.root.index].children
    }

    /// Number of live nodes, not counting the root.
    pub fn len(&self) -> usize {
        self.nodes.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether `id` names a live node of this tree (the root excluded).
    ///
    /// Ids minted by another tree are never contained, even when their
    /// arena slot happens to be live here.
    pub fn contains(&self, id: NodeId) -> bool {
        id.tree == self.root.tree && id != self.root && self.nodes.contains(id.index)
    }

    pub fn node(&self, id: NodeId) -> SceneResult<&SceneNode> {
        if !self.contains(id) {
            return Err(SceneError::NodeNotFound(id));
        }
        Ok(&self.nodes[id.index])
    }

    pub fn node_mut(&mut self, id: NodeId) -> SceneResult<NodeMut<'_>> {
        if !self.contains(id) {
            return Err(SceneError::NodeNotFound(id));
        }
        Ok(NodeMut { tree: self, id })
    }

    /// Recomputes absolute state for the whole tree.
    pub fn update_real_positions(&mut self) {
        self.propagate_from(self.root);
    }

    /// Draws every top-level subtree in order.
    ///
    /// Within a subtree, a node's descendants are drawn before its own
    /// scene objects.
    pub fn draw(&self, shader: &mut dyn Shader, omit_materials: bool) {
        for &child in self.children() {
            self.draw_node(child, shader, omit_materials);
        }
    }

    /// Every point light in the tree, in pre-order.
    pub fn point_lights(&self) -> Vec<&PointLight> {
        let mut lights = Vec::new();
        self.collect_point_lights(self.root, &mut lights);
        lights
    }

    /// Writes every light to `pointLights[i]` and the count to
    /// [`NUM_POINT_LIGHTS_UNIFORM`], returning the count.
    ///
    /// At most `max_point_lights` lights are accepted. Meeting one more
    /// fails with [`SceneError::LightBudgetExceeded`] before any of its
    /// uniforms are written; the lights already written stay written and
    /// the count uniform is left untouched.
    pub fn draw_point_lights(&self, shader: &mut dyn Shader) -> SceneResult<usize> {
        let max = self.config.max_point_lights;
        let mut drawn = 0;
        for light in self.point_lights() {
            if drawn == max {
                warn!("Light pass stopped after {} point lights", max);
                return Err(SceneError::LightBudgetExceeded { max });
            }
            light.draw(shader, drawn);
            drawn += 1;
        }
        shader.set_uniform(NUM_POINT_LIGHTS_UNIFORM, Uniform::Int(drawn as i32));
        debug!("Drew {} point lights", drawn);
        Ok(drawn)
    }

    /// Packs every light into a uniform-buffer array, under the same
    /// budget as [`SceneTree::draw_point_lights`].
    pub fn point_light_block(&self) -> SceneResult<Vec<PointLightUbo>> {
        let lights = self.point_lights();
        let max = self.config.max_point_lights;
        if lights.len() > max {
            return Err(SceneError::LightBudgetExceeded { max });
        }
        Ok(lights.into_iter().map(PointLightUbo::from).collect())
    }

    pub(crate) fn insert_child(&mut self, parent: NodeId, name: Option<String>) -> NodeId {
        let child = SceneNode::child_of(parent, &self.nodes[parent.index], name);
        debug!("Adding node {} under {}", child.label(), self.nodes[parent.index].label());
        let id = NodeId::new(self.root.tree, self.nodes.insert(child));
        self.nodes[parent.index].children.push(id);
        id
    }

    pub(crate) fn remove_child_at(&mut self, parent: NodeId, index: usize) -> SceneResult<()> {
        let children = &mut self.nodes[parent.index].children;
        if index >= children.len() {
            return Err(SceneError::out_of_bounds(
                Collection::Children,
                index,
                children.len(),
            ));
        }
        let child = children.remove(index);
        self.destroy_subtree(child);
        Ok(())
    }

    pub(crate) fn remove_children_of(&mut self, parent: NodeId) {
        let children = std::mem::take(&mut self.nodes[parent.index].children);
        for child in children {
            self.destroy_subtree(child);
        }
    }

    /// Frees `id` and everything below it. The caller unlinks `id` from its parent.
    fn destroy_subtree(&mut self, id: NodeId) {
        let mut pending = vec![id];
        let mut removed = 0;
        while let Some(current) = pending.pop() {
            if let Some(node) = self.nodes.remove(current.index) {
                pending.extend(node.children);
                removed += 1;
            }
        }
        debug!("Removed {} nodes", removed);
    }

    /// Recomputes absolute state from `id` down.
    ///
    /// `absolute = parent.absolute * relative`, and positions add:
    /// `absolute_position = parent.absolute_position + relative_position`.
    pub(crate) fn propagate_from(&mut self, id: NodeId) {
        let mut pending = vec![id];
        while let Some(current) = pending.pop() {
            let inherited = self.nodes[current.index]
                .parent
                .and_then(|parent| self.nodes.get(parent.index))
                .map(|parent| (parent.absolute_transform, parent.absolute_position))
                .unwrap_or((Transform::IDENTITY, Vec3::ZERO));

            let node = &mut self.nodes[current.index];
            node.absolute_transform = inherited.0 * node.relative_transform;
            node.absolute_position = inherited.1 + node.relative_position;
            if let Some(light) = &mut node.point_light {
                light.position = node.absolute_position;
            }
            pending.extend(node.children.iter().rev());
        }
    }

    /// Draws the subtree at `id`, every node's descendants before its own objects.
    pub(crate) fn draw_node(&self, id: NodeId, shader: &mut dyn Shader, omit_materials: bool) {
        // (node, children already drawn)
        let mut pending = vec![(id, false)];
        while let Some((current, expanded)) = pending.pop() {
            let node = &self.nodes[current.index];
            if expanded {
                for object in &node.scene_objects {
                    object.draw(shader, &node.absolute_transform, omit_materials);
                }
            } else {
                pending.push((current, true));
                pending.extend(node.children.iter().rev().map(|&child| (child, false)));
            }
        }
    }

    /// Lights strictly below `id`, in pre-order.
    pub(crate) fn collect_point_lights<'a>(&'a self, id: NodeId, out: &mut Vec<&'a PointLight>) {
        let mut pending: Vec<NodeId> = self.nodes[id.index].children.iter().rev().copied().collect();
        while let Some(current) = pending.pop() {
            let node = &self.nodes[current.index];
            if let Some(light) = &node.point_light {
                out.push(light);
            }
            pending.extend(node.children.iter().rev());
        }
    }
}
