use std::collections::{BTreeMap, HashMap};

use petgraph::{
    algo::{condensation, toposort},
    graph::{DiGraph, NodeIndex},
    Direction,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::core::process_models::oc_declare::OCDeclareArcLabel;

/// Position of a node's top-left corner
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Position {
    /// Horizontal coordinate
    pub x: f64,
    /// Vertical coordinate
    pub y: f64,
}

impl Position {
    /// Create a new position
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Main direction of a layered layout
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum LayoutDirection {
    /// Layers are stacked top to bottom
    #[default]
    TopToBottom,
    /// Layers are placed left to right
    LeftToRight,
}

/// Options of a [`GraphLayout`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct LayoutOptions {
    /// Main direction
    pub direction: LayoutDirection,
    /// Distance between the centers of neighboring nodes within a layer
    pub node_spacing: f64,
    /// Minimal gap between consecutive layers
    pub layer_spacing: f64,
    /// Size of nodes without a size hint
    pub default_node_size: f64,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            direction: LayoutDirection::TopToBottom,
            node_spacing: 235.0,
            layer_spacing: 80.0,
            default_node_size: 120.0,
        }
    }
}

/// Node to lay out
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutNode {
    /// Node id
    pub id: String,
    /// Size hint (width and height)
    pub size: Option<f64>,
}

/// Edge to lay out
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutEdge {
    /// Source node id
    pub from: String,
    /// Target node id
    pub to: String,
    /// Desired length (see [`desired_edge_length`])
    pub desired_length: f64,
}

/// Desired length of an edge carrying the given label
///
/// Longer labels need more space: `120 + 6 * Σ (10 * |set| + 10)` over the non-empty sets of the label.
///
/// ```
/// use oc_declare::core::process_models::oc_declare::{OCDeclareArcLabel, ObjectTypeAssociation};
/// use oc_declare::graph::layout::desired_edge_length;
///
/// assert_eq!(desired_edge_length(&OCDeclareArcLabel::default()), 120.0);
/// let label = OCDeclareArcLabel::each(ObjectTypeAssociation::new_simple("orders"));
/// assert_eq!(desired_edge_length(&label), 240.0);
/// ```
pub fn desired_edge_length(label: &OCDeclareArcLabel) -> f64 {
    let label_space: usize = [&label.each, &label.all, &label.any]
        .into_iter()
        .filter(|set| !set.is_empty())
        .map(|set| 10 * set.len() + 10)
        .sum();
    120.0 + 6.0 * label_space as f64
}

/// Layout algorithm: a pure function from nodes, edges and options to positions
pub trait GraphLayout {
    /// Compute a position for every node
    ///
    /// Edges referring to unknown node ids are ignored.
    fn layout(
        &self,
        nodes: &[LayoutNode],
        edges: &[LayoutEdge],
        options: &LayoutOptions,
    ) -> BTreeMap<String, Position>;
}

/// Layered layout
///
/// Strongly connected components are condensed so that the graph becomes acyclic. Every node is
/// then put on the layer given by the longest path reaching its component. Nodes of a layer are
/// stacked in input order and centered; the gap between two layers is the largest desired length
/// of the edges entering the later layer (at least [`LayoutOptions::layer_spacing`]).
/// The bounding box of the result starts at `(0, 0)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LayeredLayout;

impl LayeredLayout {
    fn layers(nodes: &[LayoutNode], edges: &[LayoutEdge]) -> Vec<usize> {
        let mut graph: DiGraph<usize, ()> = DiGraph::new();
        let indices: HashMap<&str, NodeIndex> = nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (n.id.as_str(), graph.add_node(i)))
            .collect();
        for edge in edges {
            if let (Some(from), Some(to)) = (
                indices.get(edge.from.as_str()),
                indices.get(edge.to.as_str()),
            ) {
                if from != to {
                    graph.update_edge(*from, *to, ());
                }
            }
        }
        let condensed = condensation(graph, true);
        let order = toposort(&condensed, None)
            .unwrap_or_else(|_| condensed.node_indices().collect());
        let mut component_layer = vec![0; condensed.node_count()];
        for c in order {
            let layer = condensed
                .neighbors_directed(c, Direction::Incoming)
                .map(|pred| component_layer[pred.index()] + 1)
                .max()
                .unwrap_or(0);
            component_layer[c.index()] = layer;
        }
        let mut layers = vec![0; nodes.len()];
        for c in condensed.node_indices() {
            for &member in &condensed[c] {
                layers[member] = component_layer[c.index()];
            }
        }
        layers
    }
}

impl GraphLayout for LayeredLayout {
    fn layout(
        &self,
        nodes: &[LayoutNode],
        edges: &[LayoutEdge],
        options: &LayoutOptions,
    ) -> BTreeMap<String, Position> {
        if nodes.is_empty() {
            return BTreeMap::new();
        }
        let size = |n: &LayoutNode| n.size.unwrap_or(options.default_node_size);
        let layers = Self::layers(nodes, edges);
        let num_layers = layers.iter().max().map_or(0, |l| l + 1);
        let mut members: Vec<Vec<usize>> = vec![Vec::new(); num_layers];
        for (i, layer) in layers.iter().enumerate() {
            members[*layer].push(i);
        }

        // Main axis: layer centers
        let layer_of: HashMap<&str, usize> = nodes
            .iter()
            .zip(&layers)
            .map(|(n, l)| (n.id.as_str(), *l))
            .collect();
        let mut gap_before = vec![options.layer_spacing; num_layers];
        for edge in edges {
            if let Some(&to_layer) = layer_of.get(edge.to.as_str()) {
                gap_before[to_layer] = gap_before[to_layer].max(edge.desired_length);
            }
        }
        let layer_extent = |l: usize| {
            members[l]
                .iter()
                .map(|i| size(&nodes[*i]))
                .fold(0.0, f64::max)
        };
        let mut layer_center = vec![layer_extent(0) / 2.0; num_layers];
        for l in 1..num_layers {
            layer_center[l] = layer_center[l - 1]
                + layer_extent(l - 1) / 2.0
                + gap_before[l]
                + layer_extent(l) / 2.0;
        }

        // Cross axis: centered stacks
        let mut centers: Vec<(f64, f64)> = vec![(0.0, 0.0); nodes.len()];
        for (l, layer_members) in members.iter().enumerate() {
            let mut cross = 0.0;
            let mut offsets = Vec::with_capacity(layer_members.len());
            for (k, i) in layer_members.iter().enumerate() {
                if k > 0 {
                    let prev = size(&nodes[layer_members[k - 1]]);
                    cross += options.node_spacing.max((prev + size(&nodes[*i])) / 2.0);
                }
                offsets.push(cross);
            }
            let shift = cross / 2.0;
            for (i, offset) in layer_members.iter().zip(offsets) {
                centers[*i] = (layer_center[l], offset - shift);
            }
        }

        let corners = nodes
            .iter()
            .zip(centers)
            .map(|(n, (main, cross))| {
                let half = size(n) / 2.0;
                match options.direction {
                    LayoutDirection::TopToBottom => Position::new(cross - half, main - half),
                    LayoutDirection::LeftToRight => Position::new(main - half, cross - half),
                }
            })
            .collect::<Vec<_>>();
        let min_x = corners.iter().map(|p| p.x).fold(f64::INFINITY, f64::min);
        let min_y = corners.iter().map(|p| p.y).fold(f64::INFINITY, f64::min);
        nodes
            .iter()
            .zip(corners)
            .map(|(n, p)| (n.id.clone(), Position::new(p.x - min_x, p.y - min_y)))
            .collect()
    }
}
