use std::collections::BTreeMap;

use schemars::{schema_for, JsonSchema, Schema};
use serde::{Deserialize, Serialize};

use crate::core::{
    event_data::object_centric::OcelFormat,
    process_models::oc_declare::{OCDeclareArc, OcelInfo, ViolationResult},
};

/// Request to the evaluation engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type")]
pub enum EngineRequest {
    /// Parse and load a log, replacing the currently loaded one
    Load {
        /// Raw log bytes
        bytes: Vec<u8>,
        /// Format of `bytes`
        format: OcelFormat,
    },
    /// Release the loaded log (no-op if nothing is loaded)
    Unload,
    /// Evaluate arcs on the loaded log
    Evaluate {
        /// Arcs to evaluate; results are returned in the same order
        arcs: Vec<OCDeclareArc>,
    },
    /// Discover arcs satisfied by at least a `threshold` fraction of their source activations
    Discover {
        /// Confidence threshold in `[0, 1]`
        threshold: f64,
    },
}

impl EngineRequest {
    /// Short name of the request kind (for logging)
    pub fn name(&self) -> &'static str {
        match self {
            EngineRequest::Load { .. } => "load",
            EngineRequest::Unload => "unload",
            EngineRequest::Evaluate { .. } => "evaluate",
            EngineRequest::Discover { .. } => "discover",
        }
    }
}

/// Successful response of the evaluation engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", content = "data")]
pub enum EngineResponse {
    /// Log loaded; summary of its object involvements
    Loaded(OcelInfo),
    /// Log released
    Unloaded,
    /// One result per evaluated arc, aligned with the request
    Evaluated(Vec<ViolationResult>),
    /// Discovered arcs
    Discovered(Vec<OCDeclareArc>),
}

impl EngineResponse {
    /// Short name of the response kind (for logging)
    pub fn name(&self) -> &'static str {
        match self {
            EngineResponse::Loaded(_) => "loaded",
            EngineResponse::Unloaded => "unloaded",
            EngineResponse::Evaluated(_) => "evaluated",
            EngineResponse::Discovered(_) => "discovered",
        }
    }
}

/// JSON schemas of all wire types, keyed by type name
pub fn wire_schemas() -> BTreeMap<&'static str, Schema> {
    BTreeMap::from([
        ("OCDeclareArc", schema_for!(OCDeclareArc)),
        ("EngineRequest", schema_for!(EngineRequest)),
        ("EngineResponse", schema_for!(EngineResponse)),
        ("OcelInfo", schema_for!(OcelInfo)),
        ("ViolationResult", schema_for!(ViolationResult)),
    ])
}
