//! Constraint graphs: layout and materialization of discovered arcs
/// Layout of constraint graphs
pub mod layout;
/// Folding discovered arcs into graph nodes and edges
pub mod materialize;

#[doc(inline)]
pub use layout::{GraphLayout, LayeredLayout, LayoutOptions, Position};
#[doc(inline)]
pub use materialize::{DiscoveryMaterializer, GraphEdge, GraphNode, MaterializedGraph, NodeRole};
