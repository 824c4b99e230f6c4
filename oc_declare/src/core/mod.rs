//! Core modules: object-centric event data, the OC-DECLARE model and IO traits

pub use chrono;
pub mod event_data;

/// IO Traits
pub mod io;

pub mod process_models;

pub use event_data::object_centric::OCEL;
pub use process_models::oc_declare::OCDeclareArc;
