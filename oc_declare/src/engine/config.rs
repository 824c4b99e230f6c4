use std::{num::NonZeroUsize, thread};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{
    core::event_data::object_centric::OCELImportOptions,
    discovery::oc_declare::OCDeclareDiscoveryOptions,
};

/// Configuration of an [`EvaluationContext`](super::EvaluationContext)
///
/// All fields are optional when deserializing, e.g., `{"pool_fraction": 0.5}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct EngineConfig {
    /// Fraction of the available hardware threads used for the worker pool of a loaded log
    pub pool_fraction: f64,
    /// Lower bound for the number of worker threads
    pub min_threads: usize,
    /// Options used when importing logs
    pub import: OCELImportOptions,
    /// Discovery options (the noise threshold is replaced by the threshold of each discovery request)
    pub discovery: OCDeclareDiscoveryOptions,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            pool_fraction: 0.25,
            min_threads: 1,
            import: OCELImportOptions {
                verbose: false,
                ..Default::default()
            },
            discovery: OCDeclareDiscoveryOptions::default(),
        }
    }
}

impl EngineConfig {
    /// Number of worker threads for the given hardware parallelism (always at least 1)
    pub fn pool_size_for(&self, available: usize) -> usize {
        let fraction = if self.pool_fraction.is_finite() {
            self.pool_fraction.max(0.0)
        } else {
            0.0
        };
        ((available as f64 * fraction).round() as usize)
            .max(self.min_threads)
            .max(1)
    }

    /// Number of worker threads on this machine
    pub fn pool_size(&self) -> usize {
        let available = thread::available_parallelism()
            .map(NonZeroUsize::get)
            .unwrap_or(1);
        self.pool_size_for(available)
    }
}
