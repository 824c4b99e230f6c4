//! Discovery of OC-DECLARE constraints
pub mod oc_declare;

#[doc(inline)]
pub use oc_declare::{
    discover_behavior_constraints, reduce_oc_arcs, O2OMode, OCDeclareDiscoveryOptions,
    OCDeclareReductionMode,
};
