//! Retained scene graph for the stage.
//!
//! The graph is a tree: containers hold children, circles are leaves.
//! Every node carries a position relative to its parent, so moving a
//! container moves everything below it. Only the positions change after
//! the scene is built; structure is fixed once attached to the stage.

use kurbo::{Point, Rect, Size, Vec2};
use petgraph::graph::NodeIndex;
use petgraph::stable_graph::StableDiGraph;
use serde::{Deserialize, Serialize};

// ─── Colors ──────────────────────────────────────────────────────────────

/// RGBA color. Stored as 4 × f32 [0.0, 1.0].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const RED: Color = Color::rgba(1.0, 0.0, 0.0, 1.0);

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// CSS `rgba()` form, suitable for `fillStyle`.
    pub fn to_css(&self) -> String {
        let [r, g, b, _] = self.to_u8();
        format!("rgba({r}, {g}, {b}, {})", self.a)
    }

    fn to_u8(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a].map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8)
    }
}

// ─── Nodes ───────────────────────────────────────────────────────────────

/// What a node draws.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum NodeKind {
    /// The stage root. Never drawn.
    Root,
    /// Groups children; has no visuals of its own.
    Container,
    /// A filled circle centered on the node position.
    Circle { radius: f64 },
}

/// A single node in the scene graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneNode {
    pub kind: NodeKind,

    /// Offset from the parent's origin.
    pub position: Point,

    /// Fill for shapes. Containers ignore it.
    pub fill: Option<Color>,
}

impl SceneNode {
    pub fn container() -> Self {
        Self {
            kind: NodeKind::Container,
            position: Point::ORIGIN,
            fill: None,
        }
    }

    pub fn circle(radius: f64, fill: Color) -> Self {
        Self {
            kind: NodeKind::Circle { radius },
            position: Point::ORIGIN,
            fill: Some(fill),
        }
    }

    #[must_use]
    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.position = Point::new(x, y);
        self
    }
}

// ─── Scene Graph ─────────────────────────────────────────────────────────

/// The stage's display list. Edges go from parent → child.
#[derive(Debug, Clone)]
pub struct SceneGraph {
    /// The underlying directed graph.
    pub graph: StableDiGraph<SceneNode, ()>,

    /// The root node index.
    pub root: NodeIndex,
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneGraph {
    /// Create a new empty scene graph with a root node.
    #[must_use]
    pub fn new() -> Self {
        let mut graph = StableDiGraph::new();
        let root = graph.add_node(SceneNode {
            kind: NodeKind::Root,
            position: Point::ORIGIN,
            fill: None,
        });
        Self { graph, root }
    }

    /// Add a node as a child of `parent`. Returns the new node's index.
    pub fn add_node(&mut self, parent: NodeIndex, node: SceneNode) -> NodeIndex {
        let idx = self.graph.add_node(node);
        self.graph.add_edge(parent, idx, ());
        idx
    }

    /// Add a node with no parent yet. It is not drawn until attached.
    pub fn add_detached(&mut self, node: SceneNode) -> NodeIndex {
        self.graph.add_node(node)
    }

    /// Move an already-built subtree under a new parent.
    pub fn attach(&mut self, child: NodeIndex, new_parent: NodeIndex) {
        if let Some(old_parent) = self.parent(child)
            && let Some(edge) = self.graph.find_edge(old_parent, child)
        {
            self.graph.remove_edge(edge);
        }
        self.graph.add_edge(new_parent, child, ());
    }

    pub fn get(&self, idx: NodeIndex) -> Option<&SceneNode> {
        self.graph.node_weight(idx)
    }

    /// Get the parent index of a node.
    pub fn parent(&self, idx: NodeIndex) -> Option<NodeIndex> {
        self.graph
            .neighbors_directed(idx, petgraph::Direction::Incoming)
            .next()
    }

    /// Get children of a node in insertion order.
    ///
    /// Sorts by `NodeIndex` so the result is deterministic regardless of
    /// how `petgraph` iterates its adjacency list on different targets
    /// (native vs WASM).
    pub fn children(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        let mut children: Vec<NodeIndex> = self
            .graph
            .neighbors_directed(idx, petgraph::Direction::Outgoing)
            .collect();
        children.sort();
        children
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn position(&self, idx: NodeIndex) -> Option<Point> {
        self.get(idx).map(|n| n.position)
    }

    /// Returns false if the node no longer exists.
    pub fn set_position(&mut self, idx: NodeIndex, position: Point) -> bool {
        match self.graph.node_weight_mut(idx) {
            Some(node) => {
                node.position = position;
                true
            }
            None => false,
        }
    }

    /// Position in stage coordinates (sum of the ancestor chain).
    pub fn world_position(&self, idx: NodeIndex) -> Option<Point> {
        let mut offset = Vec2::ZERO;
        let mut cursor = Some(idx);
        while let Some(current) = cursor {
            offset += self.get(current)?.position.to_vec2();
            cursor = self.parent(current);
        }
        Some(offset.to_point())
    }

    /// Union of every circle's extent below `idx`, in stage coordinates.
    /// `None` when the subtree draws nothing.
    pub fn world_bounds(&self, idx: NodeIndex) -> Option<Rect> {
        let origin = self.world_position(idx)?.to_vec2() - self.get(idx)?.position.to_vec2();
        self.bounds_from(idx, origin)
    }

    fn bounds_from(&self, idx: NodeIndex, parent_origin: Vec2) -> Option<Rect> {
        let node = self.get(idx)?;
        let here = parent_origin + node.position.to_vec2();

        let own = match node.kind {
            NodeKind::Circle { radius } => Some(Rect::from_center_size(
                here.to_point(),
                Size::new(radius * 2.0, radius * 2.0),
            )),
            NodeKind::Root | NodeKind::Container => None,
        };

        self.children(idx)
            .into_iter()
            .filter_map(|child| self.bounds_from(child, here))
            .fold(own, |acc, r| Some(acc.map_or(r, |a| a.union(r))))
    }
}
