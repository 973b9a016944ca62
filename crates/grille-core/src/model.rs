//! Structure model: nodes, lines (members), and forces.
//!
//! Nodes and lines live in an undirected `StableGraph`: a node is a graph
//! vertex and a line is an edge between its two endpoint nodes, so a line's
//! endpoints are always resolved from the nodes it connects. Forces are free
//! annotations at a position and are kept in a plain list.
//!
//! Positions are canvas coordinates: screen pixels at zoom 1.0, already
//! offset by any panning. See [`crate::grid::GridModel`] for conversions.

use crate::error::ValidationError;
use crate::geometry::{self, nearest_within};
use crate::id::{ForceId, IdAllocator, LineId, NodeId};
use kurbo::{Point, Vec2};
use petgraph::stable_graph::{EdgeIndex, NodeIndex, StableUnGraph};
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Per-axis tolerance for "this line ends at this node".
pub const LINE_ENDPOINT_TOLERANCE: f64 = 1.0;

// ─── Element kinds ───────────────────────────────────────────────────────

/// Support condition of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    #[default]
    Simple,
    Fixed,
    Hinge,
    Elastic,
}

/// Load distribution shape of a force.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ForceType {
    #[default]
    Point,
    Rectangle,
    Triangle,
    Circular,
}

/// Working plane. Only changes axis labels, never coordinate math.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Plane {
    #[default]
    Xy,
    Yz,
    Zx,
}

impl NodeType {
    pub const ALL: [NodeType; 4] = [Self::Simple, Self::Fixed, Self::Hinge, Self::Elastic];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Simple => "simple",
            Self::Fixed => "fixed",
            Self::Hinge => "hinge",
            Self::Elastic => "elastic",
        }
    }
}

impl ForceType {
    pub const ALL: [ForceType; 4] = [Self::Point, Self::Rectangle, Self::Triangle, Self::Circular];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Point => "point",
            Self::Rectangle => "rectangle",
            Self::Triangle => "triangle",
            Self::Circular => "circular",
        }
    }
}

impl Plane {
    pub const ALL: [Plane; 3] = [Self::Xy, Self::Yz, Self::Zx];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Xy => "xy",
            Self::Yz => "yz",
            Self::Zx => "zx",
        }
    }

    /// Labels for the (horizontal, vertical) axes.
    pub fn axis_labels(self) -> (&'static str, &'static str) {
        match self {
            Self::Xy => ("X", "Y"),
            Self::Yz => ("Y", "Z"),
            Self::Zx => ("Z", "X"),
        }
    }
}

/// `Display` + `FromStr` through the lowercase wire name.
macro_rules! named_enum {
    ($ty:ident, $kind:literal) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = ValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = s.trim();
                $ty::ALL
                    .into_iter()
                    .find(|v| v.as_str().eq_ignore_ascii_case(wanted))
                    .ok_or_else(|| ValidationError::UnknownName {
                        kind: $kind,
                        name: s.to_string(),
                    })
            }
        }
    };
}

named_enum!(NodeType, "node type");
named_enum!(ForceType, "force type");
named_enum!(Plane, "plane");

// ─── Elements ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: NodeId,
    pub node_type: NodeType,
    pub position: Point,
}

/// A structural member between two nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub id: LineId,
    pub start: NodeId,
    pub end: NodeId,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Force {
    pub id: ForceId,
    pub force_type: ForceType,
    pub position: Point,
    pub value: f64,
}

/// What a node deletion removed, in notification order.
#[derive(Debug, Clone, PartialEq)]
pub struct RemovedNode {
    pub node: Node,
    /// Lines removed by the cascade, in id order.
    pub lines: Vec<Line>,
}

// ─── Scene ───────────────────────────────────────────────────────────────

/// The collection of every drawn element.
///
/// Cloning a scene is a deep copy; undo snapshots rely on that.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    graph: StableUnGraph<Node, Line>,
    node_index: HashMap<NodeId, NodeIndex>,
    line_index: HashMap<LineId, EdgeIndex>,
    forces: Vec<Force>,
    ids: IdAllocator,
}

impl Scene {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, position: Point, node_type: NodeType) -> NodeId {
        let id = self.ids.node();
        let idx = self.graph.add_node(Node {
            id,
            node_type,
            position,
        });
        self.node_index.insert(id, idx);
        id
    }

    /// Connect two existing, distinct nodes. Returns `None` otherwise.
    pub fn add_line(&mut self, start: NodeId, end: NodeId) -> Option<LineId> {
        if start == end {
            return None;
        }
        let a = self.node_index.get(&start).copied()?;
        let b = self.node_index.get(&end).copied()?;
        let id = self.ids.line();
        let edge = self.graph.add_edge(a, b, Line { id, start, end });
        self.line_index.insert(id, edge);
        Some(id)
    }

    pub fn add_force(&mut self, position: Point, force_type: ForceType, value: f64) -> ForceId {
        let id = self.ids.force();
        self.forces.push(Force {
            id,
            force_type,
            position,
            value,
        });
        id
    }

    /// Remove a node together with every line that touches it.
    ///
    /// A line touches the node when it is incident on it, or when either of
    /// its resolved endpoints lies within [`LINE_ENDPOINT_TOLERANCE`] of the
    /// node's position on both axes.
    pub fn remove_node(&mut self, id: NodeId) -> Option<RemovedNode> {
        let idx = self.node_index.get(&id).copied()?;
        let position = self.graph[idx].position;

        let mut doomed: Vec<EdgeIndex> = self.graph.edges(idx).map(|e| e.id()).collect();
        for edge in self.graph.edge_indices() {
            if doomed.contains(&edge) {
                continue;
            }
            if let Some((a, b)) = self.graph.edge_endpoints(edge) {
                let touches = |p: Point| {
                    (p.x - position.x).abs() < LINE_ENDPOINT_TOLERANCE
                        && (p.y - position.y).abs() < LINE_ENDPOINT_TOLERANCE
                };
                if touches(self.graph[a].position) || touches(self.graph[b].position) {
                    doomed.push(edge);
                }
            }
        }

        let mut lines: Vec<Line> = doomed
            .into_iter()
            .filter_map(|edge| self.graph.remove_edge(edge))
            .collect();
        lines.sort_by_key(|l| l.id);
        for line in &lines {
            self.line_index.remove(&line.id);
        }

        let node = self.graph.remove_node(idx)?;
        self.node_index.remove(&id);
        Some(RemovedNode { node, lines })
    }

    pub fn remove_line(&mut self, id: LineId) -> Option<Line> {
        let edge = self.line_index.remove(&id)?;
        self.graph.remove_edge(edge)
    }

    pub fn remove_force(&mut self, id: ForceId) -> Option<Force> {
        let pos = self.forces.iter().position(|f| f.id == id)?;
        Some(self.forces.remove(pos))
    }

    /// Remove every element. Id counters keep running.
    pub fn clear(&mut self) {
        self.graph.clear();
        self.node_index.clear();
        self.line_index.clear();
        self.forces.clear();
    }

    /// An empty scene whose ids continue after every id this one issued.
    #[must_use]
    pub fn successor(&self) -> Self {
        Self {
            ids: self.ids.clone(),
            ..Self::default()
        }
    }

    /// Replace every element with `other`'s, keeping ids monotonic.
    pub fn replace_with(&mut self, other: Scene) {
        let mut ids = std::mem::take(&mut self.ids);
        ids.absorb(&other.ids);
        *self = other;
        self.ids = ids;
    }

    /// Rigidly move every node and force by `delta`.
    pub fn translate(&mut self, delta: Vec2) {
        for node in self.graph.node_weights_mut() {
            node.position += delta;
        }
        for force in &mut self.forces {
            force.position += delta;
        }
    }

    // ─── Queries ─────────────────────────────────────────────────────────

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.node_index.get(&id).map(|idx| &self.graph[*idx])
    }

    pub fn line(&self, id: LineId) -> Option<&Line> {
        self.line_index.get(&id).map(|edge| &self.graph[*edge])
    }

    pub fn force(&self, id: ForceId) -> Option<&Force> {
        self.forces.iter().find(|f| f.id == id)
    }

    /// Nodes in creation order.
    pub fn nodes(&self) -> Vec<&Node> {
        let mut nodes: Vec<&Node> = self.graph.node_weights().collect();
        nodes.sort_by_key(|n| n.id);
        nodes
    }

    /// Lines in creation order.
    pub fn lines(&self) -> Vec<&Line> {
        let mut lines: Vec<&Line> = self.graph.edge_weights().collect();
        lines.sort_by_key(|l| l.id);
        lines
    }

    /// Forces in creation order.
    pub fn forces(&self) -> &[Force] {
        &self.forces
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn line_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn force_count(&self) -> usize {
        self.forces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_count() == 0 && self.line_count() == 0 && self.forces.is_empty()
    }

    /// Resolved (start, end) positions of a line.
    pub fn line_endpoints(&self, id: LineId) -> Option<(Point, Point)> {
        let line = self.line(id)?;
        Some((self.node(line.start)?.position, self.node(line.end)?.position))
    }

    /// Lines connected to `id`.
    pub fn lines_of(&self, id: NodeId) -> Vec<LineId> {
        let Some(idx) = self.node_index.get(&id).copied() else {
            return Vec::new();
        };
        let mut ids: Vec<LineId> = self.graph.edges(idx).map(|e| e.weight().id).collect();
        ids.sort();
        ids
    }

    /// Node nearest to `query` strictly within `radius`.
    ///
    /// `project` maps stored canvas positions into the space `query` is
    /// expressed in (usually zoomed view space).
    pub fn nearest_node(
        &self,
        query: Point,
        radius: f64,
        project: impl Fn(Point) -> Point,
    ) -> Option<NodeId> {
        let candidates = self.nodes().into_iter().map(|n| (n.id, project(n.position)));
        nearest_within(candidates, query, radius).map(|(id, _)| id)
    }

    /// Line nearest to `query` strictly within `radius`, measured to the
    /// projected segment.
    pub fn nearest_line(
        &self,
        query: Point,
        radius: f64,
        project: impl Fn(Point) -> Point,
    ) -> Option<LineId> {
        let mut best: Option<(LineId, f64)> = None;
        for line in self.lines() {
            let Some((a, b)) = self.line_endpoints(line.id) else {
                continue;
            };
            let d = geometry::point_segment_distance(query, project(a), project(b));
            let closer = best.is_none_or(|(_, min)| d < min);
            if closer && d < radius {
                best = Some((line.id, d));
            }
        }
        best.map(|(id, _)| id)
    }

    /// Closest node sitting on `position` within the per-axis endpoint
    /// tolerance. Ties go to the earlier node.
    pub fn node_at(&self, position: Point) -> Option<NodeId> {
        let mut best: Option<(NodeId, f64)> = None;
        for n in self.nodes() {
            let dx = (n.position.x - position.x).abs();
            let dy = (n.position.y - position.y).abs();
            if dx >= LINE_ENDPOINT_TOLERANCE || dy >= LINE_ENDPOINT_TOLERANCE {
                continue;
            }
            let d = n.position.distance(position);
            if best.is_none_or(|(_, bd)| d < bd) {
                best = Some((n.id, d));
            }
        }
        best.map(|(id, _)| id)
    }
}
