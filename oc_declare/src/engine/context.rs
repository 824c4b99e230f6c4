use std::{
    any::Any,
    fmt::Debug,
    panic::{self, AssertUnwindSafe},
    time::Instant,
};

use rayon::prelude::*;
use tracing::{debug, error, info, warn};

use super::{EngineConfig, EngineError, EngineRequest, EngineResponse};
use crate::{
    conformance::oc_declare::evaluate_arc,
    core::{
        event_data::object_centric::{import_ocel_slice, linked_ocel::SlimLinkedOCEL, OcelFormat},
        process_models::oc_declare::{OCDeclareArc, OcelInfo, ViolationResult},
    },
    discovery::oc_declare::discover_behavior_constraints,
};

/// A loaded log together with its worker pool
struct LoadedLog {
    locel: SlimLinkedOCEL,
    pool: rayon::ThreadPool,
    info: OcelInfo,
}

impl Debug for LoadedLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadedLog")
            .field("events", &self.locel.num_events())
            .field("objects", &self.locel.num_objects())
            .field("threads", &self.pool.current_num_threads())
            .finish()
    }
}

/// Owner of (at most) one loaded log
///
/// The context is either unloaded or loaded. Only [`EvaluationContext::load`] works while
/// unloaded; all other requests fail with [`EngineError::NotLoaded`] (except `unload`, which is a no-op).
#[derive(Debug)]
pub struct EvaluationContext {
    config: EngineConfig,
    loaded: Option<LoadedLog>,
}

impl Default for EvaluationContext {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl EvaluationContext {
    /// Create an unloaded context
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            loaded: None,
        }
    }

    /// Configuration of this context
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Whether a log is loaded
    pub fn is_loaded(&self) -> bool {
        self.loaded.is_some()
    }

    /// Summary of the loaded log
    pub fn info(&self) -> Option<&OcelInfo> {
        self.loaded.as_ref().map(|l| &l.info)
    }

    fn loaded(&self) -> Result<&LoadedLog, EngineError> {
        self.loaded.as_ref().ok_or(EngineError::NotLoaded)
    }

    /// Parse and load a log
    ///
    /// A previously loaded log is released first, so the context is unloaded if parsing fails.
    pub fn load(&mut self, bytes: &[u8], format: OcelFormat) -> Result<OcelInfo, EngineError> {
        self.unload();
        let now = Instant::now();
        let ocel = import_ocel_slice(bytes, format, &self.config.import)?;
        let locel = SlimLinkedOCEL::from_ocel(ocel);
        let info = OcelInfo::from_locel(&locel);
        let threads = self.config.pool_size();
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("oc-declare-worker-{i}"))
            .build()
            .map_err(|e| EngineError::EngineFault(format!("failed to build worker pool: {e}")))?;
        info!(
            %format,
            events = locel.num_events(),
            objects = locel.num_objects(),
            threads,
            elapsed = ?now.elapsed(),
            "loaded OCEL"
        );
        self.loaded = Some(LoadedLog {
            locel,
            pool,
            info: info.clone(),
        });
        Ok(info)
    }

    /// Release the loaded log
    ///
    /// Returns `false` if nothing was loaded.
    pub fn unload(&mut self) -> bool {
        match self.loaded.take() {
            Some(loaded) => {
                info!(events = loaded.locel.num_events(), "unloaded OCEL");
                true
            }
            None => false,
        }
    }

    /// Evaluate arcs on the loaded log, returning one result per arc (in the same order)
    ///
    /// All arcs are validated before any of them is evaluated.
    pub fn evaluate(&self, arcs: &[OCDeclareArc]) -> Result<Vec<ViolationResult>, EngineError> {
        let loaded = self.loaded()?;
        if arcs.is_empty() {
            return Ok(Vec::new());
        }
        for (index, arc) in arcs.iter().enumerate() {
            arc.validate()
                .map_err(|reason| EngineError::InvalidArc { index, reason })?;
        }
        let now = Instant::now();
        let results: Vec<ViolationResult> = loaded.pool.install(|| {
            arcs.par_iter()
                .map(|arc| evaluate_arc(arc, &loaded.locel))
                .collect()
        });
        debug!(arcs = arcs.len(), elapsed = ?now.elapsed(), "evaluated arcs");
        Ok(results)
    }

    /// Discover arcs satisfied by at least a `threshold` fraction of their source activations
    pub fn discover(&self, threshold: f64) -> Result<Vec<OCDeclareArc>, EngineError> {
        let loaded = self.loaded()?;
        if !(0.0..=1.0).contains(&threshold) {
            return Err(EngineError::InvalidThreshold(threshold));
        }
        let options = self.config.discovery.clone().with_threshold(threshold);
        let now = Instant::now();
        let arcs = loaded
            .pool
            .install(|| discover_behavior_constraints(&loaded.locel, &options));
        info!(
            threshold,
            arcs = arcs.len(),
            elapsed = ?now.elapsed(),
            "discovered arcs"
        );
        Ok(arcs)
    }

    fn dispatch(&mut self, request: EngineRequest) -> Result<EngineResponse, EngineError> {
        match request {
            EngineRequest::Load { bytes, format } => {
                self.load(&bytes, format).map(EngineResponse::Loaded)
            }
            EngineRequest::Unload => {
                self.unload();
                Ok(EngineResponse::Unloaded)
            }
            EngineRequest::Evaluate { arcs } => self.evaluate(&arcs).map(EngineResponse::Evaluated),
            EngineRequest::Discover { threshold } => {
                self.discover(threshold).map(EngineResponse::Discovered)
            }
        }
    }

    /// Answer a request
    ///
    /// Panics while answering are caught and reported as [`EngineError::EngineFault`].
    pub fn handle(&mut self, request: EngineRequest) -> Result<EngineResponse, EngineError> {
        let name = request.name();
        let result = panic::catch_unwind(AssertUnwindSafe(|| self.dispatch(request)))
            .unwrap_or_else(|payload| Err(EngineError::EngineFault(panic_message(payload))));
        match &result {
            Ok(response) => debug!(request = name, response = response.name(), "handled request"),
            Err(e @ EngineError::EngineFault(_)) => error!(request = name, error = %e, "engine fault"),
            Err(e) => warn!(request = name, error = %e, "request failed"),
        }
        result
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    match payload.downcast::<String>() {
        Ok(msg) => *msg,
        Err(payload) => match payload.downcast::<&'static str>() {
            Ok(msg) => msg.to_string(),
            Err(_) => "panic with unknown payload".to_string(),
        },
    }
}
