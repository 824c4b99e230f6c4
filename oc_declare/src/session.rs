//! Client-side state of a constraint editor
//!
//! An [`EditorSession`] owns an [`EngineHandle`], caches the [`OcelInfo`] of the loaded log and keeps
//! the latest evaluation result of every edge drawn in the editor.
use std::collections::HashMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{
    core::{
        event_data::object_centric::OcelFormat,
        process_models::oc_declare::{
            Cardinality, EdgeType, OCDeclareArc, OCDeclareArcLabel, OCDeclareNode, OcelInfo,
            ViolationPercentage, ViolationResult,
        },
    },
    engine::{EngineConfig, EngineError, EngineHandle},
    graph::{DiscoveryMaterializer, GraphNode, LayoutOptions, MaterializedGraph},
};

/// A constraint edge as drawn in the editor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ConstraintEdgeSpec {
    /// Edge id (key of the evaluation annotations)
    pub id: String,
    /// Source endpoint
    pub from: OCDeclareNode,
    /// Target endpoint
    pub to: OCDeclareNode,
    /// Visual kind
    pub edge_type: EdgeType,
    /// Cardinality override (ignored by negated kinds)
    #[serde(default)]
    pub cardinality: Option<Cardinality>,
    /// Object involvement label
    #[serde(default)]
    pub label: OCDeclareArcLabel,
}

impl ConstraintEdgeSpec {
    /// The arc checked for this edge
    pub fn to_arc(&self) -> OCDeclareArc {
        self.edge_type.to_arc(
            self.from.clone(),
            self.to.clone(),
            self.label.clone(),
            self.cardinality,
        )
    }
}

/// Editor-side facade over the evaluation engine
#[derive(Debug)]
pub struct EditorSession {
    engine: EngineHandle,
    materializer: DiscoveryMaterializer,
    info: Option<OcelInfo>,
    annotations: HashMap<String, ViolationResult>,
}

impl EditorSession {
    /// Start a session with its own engine worker
    pub fn new(config: EngineConfig, layout: LayoutOptions) -> Result<Self, EngineError> {
        Ok(Self {
            engine: EngineHandle::spawn(config)?,
            materializer: DiscoveryMaterializer::new(layout),
            info: None,
            annotations: HashMap::new(),
        })
    }

    /// Summary of the loaded log (`None` while nothing is loaded)
    pub fn info(&self) -> Option<&OcelInfo> {
        self.info.as_ref()
    }

    /// Latest evaluation result of an edge
    pub fn annotation(&self, edge_id: &str) -> Option<ViolationResult> {
        self.annotations.get(edge_id).copied()
    }

    /// Latest violation percentage of an edge, as displayed on the edge
    pub fn violation_percentage(&self, edge_id: &str) -> Option<ViolationPercentage> {
        self.annotation(edge_id)
            .map(|res| res.violation_percentage())
    }

    /// Forget the annotation of an edge (e.g., after it was deleted or edited)
    pub fn clear_annotation(&mut self, edge_id: &str) -> Option<ViolationResult> {
        self.annotations.remove(edge_id)
    }

    /// Load a log, replacing the current one
    ///
    /// Cached info and annotations are reset first, so they stay empty if loading fails.
    pub async fn load(
        &mut self,
        bytes: Vec<u8>,
        format: OcelFormat,
    ) -> Result<&OcelInfo, EngineError> {
        self.info = None;
        self.annotations.clear();
        let info = self.engine.load(bytes, format).await?;
        Ok(self.info.insert(info))
    }

    /// Release the loaded log and reset the cached info and annotations
    pub async fn unload(&mut self) -> Result<(), EngineError> {
        self.engine.unload().await?;
        self.info = None;
        self.annotations.clear();
        Ok(())
    }

    /// Evaluate edges and annotate them with their results
    ///
    /// On error, earlier annotations are left untouched.
    pub async fn evaluate_edges(
        &mut self,
        edges: &[ConstraintEdgeSpec],
    ) -> Result<Vec<ViolationResult>, EngineError> {
        let arcs = edges.iter().map(ConstraintEdgeSpec::to_arc).collect();
        let results = self.engine.evaluate(arcs).await?;
        for (edge, res) in edges.iter().zip(&results) {
            self.annotations.insert(edge.id.clone(), *res);
        }
        Ok(results)
    }

    /// Discover arcs and materialize them next to the existing nodes
    pub async fn discover(
        &self,
        threshold: f64,
        existing: &[GraphNode],
    ) -> Result<MaterializedGraph, EngineError> {
        let arcs = self.engine.discover(threshold).await?;
        Ok(self.materializer.materialize(&arcs, existing))
    }

    /// Stop the engine worker
    pub fn shutdown(self) -> Result<(), EngineError> {
        self.engine.shutdown()
    }
}
