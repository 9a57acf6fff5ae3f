//! Arena of drawables and their parent relations.

use std::fmt;

use common::{DrawError, DrawResult, Point};
use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;

use crate::drawable::{Drawable, DrawableProps};

new_key_type! {
    /// Unique identifier for a drawable.
    pub struct DrawableId;
}

/// Ancestor chain, root first and the object itself last.
pub type Chain = SmallVec<[DrawableId; 8]>;

/// A drawable held by the scene.
pub struct Node {
    /// Transform and paint state.
    pub props: DrawableProps,
    /// Parent drawable. Not an owning reference; a parent that has been
    /// removed from the scene is treated as absent.
    pub(crate) parent: Option<DrawableId>,
    /// Whether the node was painted by the most recent pass.
    pub(crate) drawn: bool,
    /// Paint routine. `None` for group nodes that only carry a transform.
    pub(crate) content: Option<Box<dyn Drawable>>,
}

impl Node {
    fn new(props: DrawableProps, content: Option<Box<dyn Drawable>>) -> Self {
        Self {
            props,
            parent: None,
            drawn: false,
            content,
        }
    }

    pub fn is_drawn(&self) -> bool {
        self.drawn
    }

    /// Whether the node has a draw routine.
    pub fn is_drawable(&self) -> bool {
        self.content.is_some()
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("props", &self.props)
            .field("parent", &self.parent)
            .field("drawn", &self.drawn)
            .field("drawable", &self.content.is_some())
            .finish()
    }
}

/// Owns every drawable; the render list and parent links refer into it by id.
#[derive(Debug, Default)]
pub struct Scene {
    nodes: SlotMap<DrawableId, Node>,
}

impl Scene {
    pub fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
        }
    }

    /// Insert a drawable.
    pub fn insert(&mut self, props: DrawableProps, drawable: impl Drawable + 'static) -> DrawableId {
        self.insert_boxed(props, Box::new(drawable))
    }

    pub fn insert_boxed(&mut self, props: DrawableProps, drawable: Box<dyn Drawable>) -> DrawableId {
        self.nodes.insert(Node::new(props, Some(drawable)))
    }

    /// Insert a node without a draw routine. Useful as a parent that
    /// moves, rotates or scales a group of children.
    pub fn insert_group(&mut self, props: DrawableProps) -> DrawableId {
        self.nodes.insert(Node::new(props, None))
    }

    /// Remove a node. Children keep their (now dangling) parent id and
    /// behave as root objects from then on.
    pub fn remove(&mut self, id: DrawableId) -> Option<Node> {
        self.nodes.remove(id)
    }

    pub fn get(&self, id: DrawableId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn get_mut(&mut self, id: DrawableId) -> Option<&mut Node> {
        self.nodes.get_mut(id)
    }

    pub fn props(&self, id: DrawableId) -> Option<&DrawableProps> {
        self.nodes.get(id).map(|n| &n.props)
    }

    pub fn props_mut(&mut self, id: DrawableId) -> Option<&mut DrawableProps> {
        self.nodes.get_mut(id).map(|n| &mut n.props)
    }

    pub fn contains(&self, id: DrawableId) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn is_drawn(&self, id: DrawableId) -> bool {
        self.nodes.get(id).map_or(false, |n| n.drawn)
    }

    pub(crate) fn set_drawn(&mut self, id: DrawableId, drawn: bool) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.drawn = drawn;
        }
    }

    /// Live parent of a node.
    pub fn parent(&self, id: DrawableId) -> Option<DrawableId> {
        self.nodes
            .get(id)
            .and_then(|n| n.parent)
            .filter(|p| self.nodes.contains_key(*p))
    }

    /// Attach `child` under `parent`.
    ///
    /// Fails when either id is unknown or when `child` is already an
    /// ancestor of `parent`.
    pub fn set_parent(&mut self, child: DrawableId, parent: DrawableId) -> DrawResult<()> {
        if !self.contains(child) {
            return Err(DrawError::unknown_drawable(format!("{:?}", child)));
        }
        if !self.contains(parent) {
            return Err(DrawError::unknown_drawable(format!("{:?}", parent)));
        }

        let mut cursor = Some(parent);
        while let Some(id) = cursor {
            if id == child {
                return Err(DrawError::cyclic(format!(
                    "{:?} is an ancestor of {:?}",
                    child, parent
                )));
            }
            cursor = self.parent(id);
        }

        self.nodes[child].parent = Some(parent);
        tracing::debug!(?child, ?parent, "parent set");
        Ok(())
    }

    /// Detach `child` from its parent.
    pub fn clear_parent(&mut self, child: DrawableId) -> DrawResult<()> {
        let node = self
            .nodes
            .get_mut(child)
            .ok_or_else(|| DrawError::unknown_drawable(format!("{:?}", child)))?;
        node.parent = None;
        Ok(())
    }

    /// Chain from the root-most ancestor down to `id` itself.
    ///
    /// A chain longer than the scene can only come from a cycle and is
    /// reported instead of followed.
    pub fn ancestor_chain(&self, id: DrawableId) -> DrawResult<Chain> {
        if !self.contains(id) {
            return Err(DrawError::unknown_drawable(format!("{:?}", id)));
        }

        let mut chain = Chain::new();
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            if chain.len() >= self.nodes.len() {
                return Err(DrawError::cyclic(format!("ancestor chain of {:?} does not end", id)));
            }
            chain.push(current);
            cursor = self.parent(current);
        }

        chain.reverse();
        Ok(chain)
    }

    /// Position of `id` in surface space, ignoring ancestor rotation and
    /// scale: the sum of positions along its ancestor chain.
    pub fn absolute_position(&self, id: DrawableId) -> Option<Point> {
        let chain = self.ancestor_chain(id).ok()?;
        Some(
            chain
                .iter()
                .filter_map(|a| self.props(*a))
                .fold(Point::ZERO, |acc, p| acc + p.position),
        )
    }

    pub fn iter(&self) -> impl Iterator<Item = (DrawableId, &Node)> {
        self.nodes.iter()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
