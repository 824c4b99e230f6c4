//! Conformance checking of OC-DECLARE constraints
pub mod oc_declare;

#[doc(inline)]
pub use oc_declare::{evaluate_arc, is_within_noise_threshold};
