use crate::core::geometry::{LineSegments, Mesh};
use crate::core::math::transform::TransformFactory;
use crate::scene::material::Material;
use nalgebra::{Matrix4, Vector3};
use std::sync::Arc;

/// Drawable content of a node. Geometry is shared, so cloning a node is cheap.
#[derive(Debug, Clone)]
pub enum Shape {
    Mesh(Arc<Mesh>),
    Lines(Arc<LineSegments>),
}

/// Local placement of a node: `T · orientation · Rx·Ry·Rz(euler) · S`.
///
/// `orientation` holds a fixed rotation set at build time (an alignment, a
/// look-at); `euler` is the part animations increment.
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    pub translation: Vector3<f32>,
    pub orientation: Matrix4<f32>,
    pub euler: Vector3<f32>,
    pub scale: Vector3<f32>,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            translation: Vector3::zeros(),
            orientation: Matrix4::identity(),
            euler: Vector3::zeros(),
            scale: Vector3::new(1.0, 1.0, 1.0),
        }
    }
}

impl Transform {
    pub fn from_translation(translation: Vector3<f32>) -> Self {
        Self {
            translation,
            ..Default::default()
        }
    }

    pub fn matrix(&self) -> Matrix4<f32> {
        TransformFactory::translation(&self.translation)
            * self.orientation
            * TransformFactory::rotation_euler(self.euler.x, self.euler.y, self.euler.z)
            * TransformFactory::scaling_nonuniform(&self.scale)
    }
}

/// A node of the retained scene graph.
#[derive(Debug, Clone)]
pub struct SceneNode {
    pub name: Option<String>,
    pub shape: Option<Shape>,
    pub material: Material,
    pub transform: Transform,
    /// Invisible nodes are skipped together with their whole subtree.
    pub visible: bool,
    pub children: Vec<SceneNode>,
}

impl Default for SceneNode {
    fn default() -> Self {
        Self {
            name: None,
            shape: None,
            material: Material::default(),
            transform: Transform::default(),
            visible: true,
            children: Vec::new(),
        }
    }
}

impl SceneNode {
    /// An empty grouping node.
    pub fn group(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    pub fn mesh(mesh: impl Into<Arc<Mesh>>, material: Material) -> Self {
        Self {
            shape: Some(Shape::Mesh(mesh.into())),
            material,
            ..Default::default()
        }
    }

    pub fn lines(lines: impl Into<Arc<LineSegments>>, material: Material) -> Self {
        Self {
            shape: Some(Shape::Lines(lines.into())),
            material,
            ..Default::default()
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn at(mut self, translation: Vector3<f32>) -> Self {
        self.transform.translation = translation;
        self
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_child(mut self, child: SceneNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn add_child(&mut self, child: SceneNode) {
        self.children.push(child);
    }

    fn is_named(&self, name: &str) -> bool {
        self.name.as_deref() == Some(name)
    }

    /// First node named `name` in depth-first order, this node included.
    pub fn find(&self, name: &str) -> Option<&SceneNode> {
        if self.is_named(name) {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(name))
    }

    pub fn find_mut(&mut self, name: &str) -> Option<&mut SceneNode> {
        if self.is_named(name) {
            return Some(self);
        }
        self.children.iter_mut().find_map(|c| c.find_mut(name))
    }

    /// Swaps the first descendant named `name` for `node`, returning the old
    /// subtree. `None` (and `node` dropped) when there is no such descendant.
    pub fn replace_child(&mut self, name: &str, node: SceneNode) -> Option<SceneNode> {
        let slot = self.descendant_slot(name)?;
        Some(std::mem::replace(slot, node))
    }

    /// Detaches the first descendant named `name`.
    pub fn remove_child(&mut self, name: &str) -> Option<SceneNode> {
        if let Some(pos) = self.children.iter().position(|c| c.is_named(name)) {
            return Some(self.children.remove(pos));
        }
        self.children.iter_mut().find_map(|c| c.remove_child(name))
    }

    fn descendant_slot(&mut self, name: &str) -> Option<&mut SceneNode> {
        self.children.iter_mut().find_map(|c| {
            if c.is_named(name) {
                Some(c)
            } else {
                c.descendant_slot(name)
            }
        })
    }

    /// Walks the visible subtree depth first, passing each node with its
    /// world matrix (`parent_world · local`).
    pub fn visit<F>(&self, f: &mut F)
    where
        F: FnMut(&SceneNode, &Matrix4<f32>),
    {
        self.visit_with(&Matrix4::identity(), f);
    }

    fn visit_with<F>(&self, parent: &Matrix4<f32>, f: &mut F)
    where
        F: FnMut(&SceneNode, &Matrix4<f32>),
    {
        if !self.visible {
            return;
        }
        let world = parent * self.transform.matrix();
        f(self, &world);
        for child in &self.children {
            child.visit_with(&world, f);
        }
    }

    /// Number of nodes in this subtree, invisible ones included.
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(SceneNode::count).sum::<usize>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Point3;

    fn tree() -> SceneNode {
        SceneNode::group("root").with_child(
            SceneNode::group("arm")
                .at(Vector3::new(1.0, 0.0, 0.0))
                .with_child(SceneNode::group("hand").at(Vector3::new(0.0, 2.0, 0.0))),
        )
    }

    #[test]
    fn visit_composes_parent_transforms() {
        let mut origins = Vec::new();
        tree().visit(&mut |node, world| {
            origins.push((
                node.name.clone().unwrap_or_default(),
                world.transform_point(&Point3::origin()),
            ));
        });
        assert_eq!(origins.len(), 3);
        assert_eq!(origins[2].0, "hand");
        assert_relative_eq!(origins[2].1, Point3::new(1.0, 2.0, 0.0));
    }

    #[test]
    fn invisible_subtrees_are_skipped() {
        let mut root = tree();
        root.find_mut("arm").unwrap().visible = false;
        let mut seen = 0;
        root.visit(&mut |_, _| seen += 1);
        assert_eq!(seen, 1);
        assert_eq!(root.count(), 3);
    }

    #[test]
    fn replace_and_remove_by_name() {
        let mut root = tree();
        let old = root
            .replace_child("arm", SceneNode::group("arm").at(Vector3::new(5.0, 0.0, 0.0)))
            .unwrap();
        assert_eq!(old.count(), 2);
        assert!(root.find("hand").is_none());
        assert_eq!(root.count(), 2);

        assert!(root.replace_child("missing", SceneNode::group("x")).is_none());
        assert!(root.remove_child("arm").is_some());
        assert_eq!(root.count(), 1);
    }

    #[test]
    fn euler_rotation_applies_before_translation() {
        let mut node = SceneNode::group("spin").at(Vector3::new(0.0, 0.0, 3.0));
        node.transform.euler.y = std::f32::consts::FRAC_PI_2;
        let p = node.transform.matrix().transform_point(&Point3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(p, Point3::new(0.0, 0.0, 2.0), epsilon = 1e-6);
    }
}
