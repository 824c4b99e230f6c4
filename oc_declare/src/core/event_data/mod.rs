//! Event Data
//!
//! Object-centric event data and adjacent utilities
pub mod object_centric;
/// Timestamp parsing shared by the importers
pub mod timestamp_utils;

#[doc(inline)]
pub use object_centric::OCEL;
