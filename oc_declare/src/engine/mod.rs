//! Background evaluation engine
//!
//! An [`EvaluationContext`] owns at most one loaded log together with a dedicated rayon thread pool
//! and answers [`EngineRequest`]s synchronously. An [`EngineHandle`] moves one context onto its own
//! worker thread and exposes it through an asynchronous request/response channel that accepts one
//! request at a time.
use thiserror::Error;

use crate::core::{
    event_data::object_centric::OCELIOError, process_models::oc_declare::ArcValidationError,
};

/// Engine configuration (thread pool sizing, import and discovery defaults)
pub mod config;
/// Synchronous evaluation context owning the loaded log
pub mod context;
/// Asynchronous handle running a context on a worker thread
pub mod handle;
/// Requests, responses and their JSON schemas
pub mod protocol;

#[doc(inline)]
pub use config::EngineConfig;
#[doc(inline)]
pub use context::EvaluationContext;
#[doc(inline)]
pub use handle::{EngineHandle, PendingResponse};
#[doc(inline)]
pub use protocol::{EngineRequest, EngineResponse};

/// Errors reported by the evaluation engine
///
/// None of them leave the engine in an unusable state: after any error, further requests can be submitted.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The log bytes could not be parsed (nothing is loaded afterwards)
    #[error("failed to parse OCEL: {0}")]
    Parse(#[from] OCELIOError),
    /// The request requires a loaded log
    #[error("no OCEL is loaded")]
    NotLoaded,
    /// The engine failed internally (e.g., a panic during evaluation or a failing thread pool)
    #[error("engine fault: {0}")]
    EngineFault(String),
    /// Another request is still in flight
    #[error("another request is still being processed")]
    Busy,
    /// An arc of an evaluation request cannot be evaluated
    #[error("arc {index} is invalid: {reason}")]
    InvalidArc {
        /// Position of the arc in the request
        index: usize,
        /// Why the arc is invalid
        #[source]
        reason: ArcValidationError,
    },
    /// Discovery threshold outside of `[0, 1]`
    #[error("threshold {0} is not within [0, 1]")]
    InvalidThreshold(f64),
    /// The worker thread of the engine is gone
    #[error("engine worker is not running")]
    Disconnected,
}
