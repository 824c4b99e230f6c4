//! Process Models
//!
//! Currently only declarative object-centric models ([`oc_declare`]).
pub mod oc_declare;
