//! Scene nodes and the mutable node handle.
//!
//! Nodes live in the [`SceneTree`]'s arena and refer to each other through
//! generation-checked [`NodeId`]s, so a removed node's id can never reach a
//! different node that later reuses its slot.
//!
//! All node operations go through a [`NodeMut`] obtained from
//! [`SceneTree::node_mut`]; reads go through [`SceneTree::node`].

use std::sync::atomic::{AtomicU32, Ordering};

use glam::Vec3;
use tracing::debug;

use crate::error::{Collection, SceneError, SceneResult};
use crate::light::PointLight;
use crate::material::Material;
use crate::object::{Drawable, SceneObject};
use crate::shader::Shader;
use crate::transform::Transform;
use crate::tree::SceneTree;

static NEXT_TREE_ID: AtomicU32 = AtomicU32::new(0);

/// Allocates the id stamped on every [`NodeId`] a new tree hands out.
pub(crate) fn next_tree_id() -> u32 {
    NEXT_TREE_ID.fetch_add(1, Ordering::Relaxed)
}

/// Handle to a node in a [`SceneTree`].
///
/// Carries the id of the tree that created it, so it never resolves in a
/// different tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId {
    pub(crate) tree: u32,
    pub(crate) index: thunderdome::Index,
}

impl NodeId {
    pub(crate) fn new(tree: u32, index: thunderdome::Index) -> Self {
        Self { tree, index }
    }
}

/// A node in the scene hierarchy.
#[derive(Debug)]
pub struct SceneNode {
    pub(crate) name: Option<String>,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) relative_transform: Transform,
    pub(crate) absolute_transform: Transform,
    pub(crate) relative_position: Vec3,
    pub(crate) absolute_position: Vec3,
    pub(crate) matrix_stack: Vec<Transform>,
    pub(crate) scene_objects: Vec<SceneObject>,
    pub(crate) point_light: Option<PointLight>,
}

impl SceneNode {
    pub(crate) fn root() -> Self {
        Self {
            name: Some("root".to_owned()),
            parent: None,
            children: Vec::new(),
            relative_transform: Transform::IDENTITY,
            absolute_transform: Transform::IDENTITY,
            relative_position: Vec3::ZERO,
            absolute_position: Vec3::ZERO,
            matrix_stack: Vec::new(),
            scene_objects: Vec::new(),
            point_light: None,
        }
    }

    /// A fresh child whose absolute state is a snapshot of the parent's.
    pub(crate) fn child_of(parent_id: NodeId, parent: &SceneNode, name: Option<String>) -> Self {
        Self {
            name,
            parent: Some(parent_id),
            absolute_transform: parent.absolute_transform,
            absolute_position: parent.absolute_position,
            ..Self::root()
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Parent node; `None` only for the tree's root.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Transform accumulated by this node's own `apply_*` calls.
    pub fn relative_transform(&self) -> &Transform {
        &self.relative_transform
    }

    /// `parent.absolute * relative` as of the last propagation.
    pub fn absolute_transform(&self) -> &Transform {
        &self.absolute_transform
    }

    /// Origin of the relative transform.
    pub fn relative_position(&self) -> Vec3 {
        self.relative_position
    }

    /// Sum of the relative positions along the ancestor chain, as of the
    /// last propagation.
    ///
    /// Positions compose additively, so this matches
    /// `absolute_transform().origin()` only while every ancestor is a pure
    /// translation.
    pub fn absolute_position(&self) -> Vec3 {
        self.absolute_position
    }

    /// Alias for [`SceneNode::absolute_position`].
    pub fn position(&self) -> Vec3 {
        self.absolute_position
    }

    pub fn scene_objects(&self) -> &[SceneObject] {
        &self.scene_objects
    }

    pub fn point_light(&self) -> Option<&PointLight> {
        self.point_light.as_ref()
    }

    /// Number of saved relative transforms.
    pub fn matrix_stack_depth(&self) -> usize {
        self.matrix_stack.len()
    }

    /// Recomputes the relative position from the relative transform.
    pub(crate) fn refresh_relative_position(&mut self) {
        self.relative_position = self.relative_transform.origin();
    }

    pub(crate) fn label(&self) -> &str {
        self.name.as_deref().unwrap_or("<unnamed>")
    }
}

/// Mutable access to one node of a [`SceneTree`].
///
/// ```
/// use arbor_scene::SceneTree;
/// use glam::Vec3;
///
/// let mut tree = SceneTree::new();
/// let arm = tree.add_child();
/// let hand = tree.node_mut(arm)?.add_child();
///
/// tree.node_mut(arm)?.apply_translation(Vec3::new(0.0, 1.0, 0.0));
/// tree.node_mut(hand)?.apply_translation(Vec3::new(0.5, 0.0, 0.0));
///
/// assert_eq!(tree.node(hand)?.position(), Vec3::new(0.5, 1.0, 0.0));
/// # Ok::<(), arbor_scene::SceneError>(())
/// ```
pub struct NodeMut<'a> {
    pub(crate) tree: &'a mut SceneTree,
    pub(crate) id: NodeId,
}

impl NodeMut<'_> {
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Read-only view of the node.
    pub fn node(&self) -> &SceneNode {
        &self.tree.nodes[self.id.index]
    }

    fn node_data(&mut self) -> &mut SceneNode {
        &mut self.tree.nodes[self.id.index]
    }

    /// Creates a child parented to this node.
    ///
    /// The child starts with an identity relative transform and a copy of
    /// this node's current absolute state.
    pub fn add_child(&mut self) -> NodeId {
        self.tree.insert_child(self.id, None)
    }

    /// Like [`NodeMut::add_child`], with a label used in logs.
    pub fn add_named_child(&mut self, name: impl Into<String>) -> NodeId {
        self.tree.insert_child(self.id, Some(name.into()))
    }

    /// Child at `index`.
    pub fn child(&self, index: usize) -> SceneResult<NodeId> {
        let children = &self.node().children;
        children
            .get(index)
            .copied()
            .ok_or_else(|| SceneError::out_of_bounds(Collection::Children, index, children.len()))
    }

    /// Destroys the child at `index` together with its whole subtree.
    pub fn remove_child(&mut self, index: usize) -> SceneResult<()> {
        self.tree.remove_child_at(self.id, index)
    }

    /// Destroys every child subtree.
    pub fn remove_all_children(&mut self) {
        self.tree.remove_children_of(self.id);
    }

    /// Attaches a drawable with its material and returns the new binding.
    pub fn add_scene_object(
        &mut self,
        material: Material,
        drawable: impl Drawable + 'static,
    ) -> &mut SceneObject {
        let node = self.node_data();
        node.scene_objects
            .push(SceneObject::new(material, Box::new(drawable)));
        let index = node.scene_objects.len() - 1;
        &mut node.scene_objects[index]
    }

    pub fn scene_object(&self, index: usize) -> SceneResult<&SceneObject> {
        let objects = &self.node().scene_objects;
        objects
            .get(index)
            .ok_or_else(|| SceneError::out_of_bounds(Collection::SceneObjects, index, objects.len()))
    }

    pub fn scene_object_mut(&mut self, index: usize) -> SceneResult<&mut SceneObject> {
        let objects = &mut self.node_data().scene_objects;
        let len = objects.len();
        objects
            .get_mut(index)
            .ok_or_else(|| SceneError::out_of_bounds(Collection::SceneObjects, index, len))
    }

    /// Detaches and returns the scene object at `index`.
    pub fn remove_scene_object(&mut self, index: usize) -> SceneResult<SceneObject> {
        let objects = &mut self.node_data().scene_objects;
        if index >= objects.len() {
            return Err(SceneError::out_of_bounds(
                Collection::SceneObjects,
                index,
                objects.len(),
            ));
        }
        Ok(objects.remove(index))
    }

    pub fn apply_translation(&mut self, offset: Vec3) {
        self.apply(Transform::translation(offset));
    }

    pub fn apply_scale(&mut self, factors: Vec3) {
        self.apply(Transform::scale(factors));
    }

    pub fn apply_x_rotation(&mut self, degrees: f32) {
        self.apply(Transform::rotation_x(degrees));
    }

    pub fn apply_y_rotation(&mut self, degrees: f32) {
        self.apply(Transform::rotation_y(degrees));
    }

    pub fn apply_z_rotation(&mut self, degrees: f32) {
        self.apply(Transform::rotation_z(degrees));
    }

    pub fn apply_rotation(&mut self, degrees: f32, axis: Vec3) {
        self.apply(Transform::rotation(degrees, axis));
    }

    fn apply(&mut self, matrix: Transform) {
        let eager = self.tree.config().eager_propagation;
        self.apply_transformation_matrix(matrix, eager);
    }

    /// Composes `matrix` into the relative transform as `relative * matrix`.
    ///
    /// With `update_absolute` false the absolute state of this node and its
    /// descendants stays stale until [`NodeMut::update_real_positions`] or
    /// [`SceneTree::update_real_positions`] runs.
    pub fn apply_transformation_matrix(&mut self, matrix: Transform, update_absolute: bool) {
        let node = self.node_data();
        node.relative_transform *= matrix;
        node.refresh_relative_position();
        if update_absolute {
            self.update_real_positions();
        }
    }

    /// Recomputes absolute state for this node and every descendant.
    pub fn update_real_positions(&mut self) {
        self.tree.propagate_from(self.id);
    }

    /// Pushes the current relative transform.
    pub fn save_matrix_state(&mut self) {
        let node = self.node_data();
        node.matrix_stack.push(node.relative_transform);
    }

    /// Pops the last saved relative transform and propagates.
    ///
    /// Popping an empty stack leaves the transform untouched; propagation
    /// still runs.
    pub fn reset_matrix_state(&mut self) {
        let node = self.node_data();
        match node.matrix_stack.pop() {
            Some(saved) => {
                node.relative_transform = saved;
                node.refresh_relative_position();
            }
            None => debug!(
                "Matrix stack of {} is empty, nothing to restore",
                node.label()
            ),
        }
        self.update_real_positions();
    }

    /// Attaches a point light, or updates the existing one in place.
    ///
    /// The light's position follows the node's absolute position.
    pub fn set_point_light(&mut self, light: PointLight) -> &mut PointLight {
        let node = self.node_data();
        let position = node.absolute_position;
        let slot = node
            .point_light
            .get_or_insert(PointLight { position, ..light });
        slot.assign(light);
        slot
    }

    /// Detaches and returns the point light, if any.
    pub fn unset_point_light(&mut self) -> Option<PointLight> {
        self.node_data().point_light.take()
    }

    pub fn point_light(&self) -> Option<&PointLight> {
        self.node().point_light.as_ref()
    }

    pub fn point_light_mut(&mut self) -> Option<&mut PointLight> {
        self.node_data().point_light.as_mut()
    }

    /// Draws every descendant first, then this node's own objects.
    pub fn draw(&self, shader: &mut dyn Shader, omit_materials: bool) {
        self.tree.draw_node(self.id, shader, omit_materials);
    }

    /// Lights strictly below this node, in pre-order.
    pub fn point_lights(&self) -> Vec<&PointLight> {
        let mut lights = Vec::new();
        self.tree.collect_point_lights(self.id, &mut lights);
        lights
    }
}
