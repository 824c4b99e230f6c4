#![warn(
    clippy::doc_markdown,
    missing_debug_implementations,
    rust_2018_idioms,
    missing_docs
)]
#![doc = include_str!("../README.md")]

pub mod conformance;
pub mod core;
pub mod discovery;
pub mod engine;
pub mod graph;
pub mod session;

#[doc(inline)]
pub use crate::core::{
    event_data::object_centric::{
        import_ocel_path, import_ocel_slice, linked_ocel::SlimLinkedOCEL, OCELIOError,
        OCELImportOptions, OcelFormat, OCEL,
    },
    process_models::oc_declare::{
        EdgeType, OCDeclareArc, OCDeclareArcLabel, OCDeclareArcType, OCDeclareNode,
        ObjectTypeAssociation, OcelInfo, ViolationResult,
    },
};
#[doc(inline)]
pub use discovery::{discover_behavior_constraints, OCDeclareDiscoveryOptions};
#[doc(inline)]
pub use engine::{EngineConfig, EngineError, EngineHandle, EvaluationContext};
#[doc(inline)]
pub use session::{ConstraintEdgeSpec, EditorSession};
