use std::collections::{HashMap, HashSet};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::layout::{
    desired_edge_length, GraphLayout, LayeredLayout, LayoutEdge, LayoutNode, LayoutOptions,
    Position,
};
use crate::core::process_models::oc_declare::{
    Cardinality, EdgeType, OCDeclareArc, OCDeclareArcLabel, OCDeclareNode,
};

/// Lifecycle role of a graph node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum NodeRole {
    /// Start of an object type's lifecycle
    Init,
    /// End of an object type's lifecycle
    Exit,
    /// Regular activity
    None,
}

impl NodeRole {
    /// Role of the node representing an endpoint
    pub fn of(endpoint: &OCDeclareNode) -> Self {
        match endpoint {
            OCDeclareNode::Activity { .. } => NodeRole::None,
            OCDeclareNode::ObjectInit { .. } => NodeRole::Init,
            OCDeclareNode::ObjectEnd { .. } => NodeRole::Exit,
        }
    }
}

/// Node of the constraint graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct GraphNode {
    /// Unique node id
    pub id: String,
    /// Activity or lifecycle endpoint represented by this node
    pub endpoint: OCDeclareNode,
    /// Lifecycle role (derived from `endpoint`)
    pub role: NodeRole,
    /// Position of the top-left corner
    pub position: Position,
}

impl GraphNode {
    /// Create a node with a fresh id
    pub fn new(endpoint: OCDeclareNode, position: Position) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role: NodeRole::of(&endpoint),
            endpoint,
            position,
        }
    }

    /// Displayed text (activity name or object type)
    pub fn text(&self) -> &str {
        self.endpoint.name()
    }
}

/// Edge of the constraint graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct GraphEdge {
    /// Unique edge id
    pub id: String,
    /// Id of the source node
    pub from: String,
    /// Id of the target node
    pub to: String,
    /// Visual kind
    pub edge_type: EdgeType,
    /// Cardinality
    pub cardinality: Cardinality,
    /// Object involvement label
    pub label: OCDeclareArcLabel,
}

/// Nodes and edges to add to a graph
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct MaterializedGraph {
    /// New nodes (positioned)
    pub nodes: Vec<GraphNode>,
    /// New edges, possibly connected to already existing nodes
    pub edges: Vec<GraphEdge>,
}

/// Turns discovered arcs into graph nodes and edges
///
/// Every distinct endpoint yields one node; endpoints already present among the existing nodes
/// reuse their id. Duplicate arcs yield a single edge. The new nodes are laid out on their own and
/// placed below the bounding box of the existing nodes.
#[derive(Debug, Clone)]
pub struct DiscoveryMaterializer<L = LayeredLayout> {
    layout: L,
    options: LayoutOptions,
}

impl DiscoveryMaterializer<LayeredLayout> {
    /// Materializer using the [`LayeredLayout`]
    pub fn new(options: LayoutOptions) -> Self {
        Self::with_layout(LayeredLayout, options)
    }
}

impl Default for DiscoveryMaterializer<LayeredLayout> {
    fn default() -> Self {
        Self::new(LayoutOptions::default())
    }
}

/// Id of the node for `endpoint`, creating the node on first sight
fn node_id<'a>(
    endpoint: &'a OCDeclareNode,
    ids: &mut HashMap<&'a OCDeclareNode, String>,
    nodes: &mut Vec<GraphNode>,
) -> String {
    ids.entry(endpoint)
        .or_insert_with(|| {
            let node = GraphNode::new(endpoint.clone(), Position::default());
            let id = node.id.clone();
            nodes.push(node);
            id
        })
        .clone()
}

impl<L: GraphLayout> DiscoveryMaterializer<L> {
    /// Materializer using a custom layout
    pub fn with_layout(layout: L, options: LayoutOptions) -> Self {
        Self { layout, options }
    }

    /// Layout options
    pub fn options(&self) -> &LayoutOptions {
        &self.options
    }

    /// Materialize arcs next to the existing nodes (which are never modified)
    pub fn materialize(&self, arcs: &[OCDeclareArc], existing: &[GraphNode]) -> MaterializedGraph {
        let mut ids: HashMap<&OCDeclareNode, String> = HashMap::new();
        for node in existing {
            ids.entry(&node.endpoint).or_insert_with(|| node.id.clone());
        }
        let mut nodes: Vec<GraphNode> = Vec::new();
        let mut edges: Vec<GraphEdge> = Vec::new();
        let mut seen_arcs: HashSet<&OCDeclareArc> = HashSet::new();
        for arc in arcs {
            if !seen_arcs.insert(arc) {
                continue;
            }
            let from = node_id(&arc.from, &mut ids, &mut nodes);
            let to = node_id(&arc.to, &mut ids, &mut nodes);
            edges.push(GraphEdge {
                id: Uuid::new_v4().to_string(),
                from,
                to,
                edge_type: EdgeType::from_arc(arc),
                cardinality: arc.counts,
                label: arc.label.clone(),
            });
        }
        self.position(&mut nodes, &edges, existing);
        tracing::debug!(
            nodes = nodes.len(),
            edges = edges.len(),
            "materialized discovered arcs"
        );
        MaterializedGraph { nodes, edges }
    }

    fn position(&self, nodes: &mut [GraphNode], edges: &[GraphEdge], existing: &[GraphNode]) {
        let layout_nodes: Vec<LayoutNode> = nodes
            .iter()
            .map(|n| LayoutNode {
                id: n.id.clone(),
                size: None,
            })
            .collect();
        let layout_edges: Vec<LayoutEdge> = edges
            .iter()
            .map(|e| LayoutEdge {
                from: e.from.clone(),
                to: e.to.clone(),
                desired_length: desired_edge_length(&e.label),
            })
            .collect();
        let positions = self
            .layout
            .layout(&layout_nodes, &layout_edges, &self.options);
        let offset = if existing.is_empty() {
            Position::default()
        } else {
            let min_x = existing
                .iter()
                .map(|n| n.position.x)
                .fold(f64::INFINITY, f64::min);
            let max_y = existing
                .iter()
                .map(|n| n.position.y + self.options.default_node_size)
                .fold(f64::NEG_INFINITY, f64::max);
            Position::new(min_x, max_y + self.options.layer_spacing)
        };
        for node in nodes {
            let p = positions.get(&node.id).copied().unwrap_or_default();
            node.position = Position::new(p.x + offset.x, p.y + offset.y);
        }
    }
}
