use std::{
    future::Future,
    pin::Pin,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    task::{Context, Poll},
    thread::{self, JoinHandle},
};

use tokio::sync::{
    mpsc,
    oneshot::{self, error::TryRecvError},
};
use tracing::{debug, info};

use super::{EngineConfig, EngineError, EngineRequest, EngineResponse, EvaluationContext};
use crate::core::{
    event_data::object_centric::OcelFormat,
    process_models::oc_declare::{OCDeclareArc, OcelInfo, ViolationResult},
};

type EngineResult = Result<EngineResponse, EngineError>;

struct Job {
    request: EngineRequest,
    reply: oneshot::Sender<EngineResult>,
}

/// Asynchronous access to an [`EvaluationContext`] running on its own worker thread
///
/// At most one request is in flight at a time: submitting while another request has not been
/// answered yet fails with [`EngineError::Busy`]. Handles never share state; each one owns its
/// worker thread and context.
#[derive(Debug)]
pub struct EngineHandle {
    sender: mpsc::UnboundedSender<Job>,
    in_flight: Arc<AtomicBool>,
    worker: JoinHandle<()>,
}

impl EngineHandle {
    /// Spawn a worker thread owning a fresh (unloaded) context
    pub fn spawn(config: EngineConfig) -> Result<Self, EngineError> {
        let (sender, mut receiver) = mpsc::unbounded_channel::<Job>();
        let in_flight = Arc::new(AtomicBool::new(false));
        let worker_in_flight = Arc::clone(&in_flight);
        let worker = thread::Builder::new()
            .name("oc-declare-engine".to_string())
            .spawn(move || {
                let mut context = EvaluationContext::new(config);
                while let Some(Job { request, reply }) = receiver.blocking_recv() {
                    let response = context.handle(request);
                    worker_in_flight.store(false, Ordering::Release);
                    // The caller may have stopped waiting
                    let _ = reply.send(response);
                }
                debug!("engine worker stopped");
            })
            .map_err(|e| EngineError::EngineFault(format!("failed to spawn engine worker: {e}")))?;
        info!("engine worker started");
        Ok(Self {
            sender,
            in_flight,
            worker,
        })
    }

    /// Whether a submitted request has not been answered yet
    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Submit a request without waiting for its response
    ///
    /// Fails with [`EngineError::Busy`] if another request is still in flight.
    pub fn submit(&self, request: EngineRequest) -> Result<PendingResponse, EngineError> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| EngineError::Busy)?;
        let (reply, receiver) = oneshot::channel();
        if self.sender.send(Job { request, reply }).is_err() {
            self.in_flight.store(false, Ordering::Release);
            return Err(EngineError::Disconnected);
        }
        Ok(PendingResponse { receiver })
    }

    async fn request(&self, request: EngineRequest) -> EngineResult {
        self.submit(request)?.await
    }

    /// Load a log (see [`EvaluationContext::load`])
    pub async fn load(&self, bytes: Vec<u8>, format: OcelFormat) -> Result<OcelInfo, EngineError> {
        match self.request(EngineRequest::Load { bytes, format }).await? {
            EngineResponse::Loaded(info) => Ok(info),
            other => Err(unexpected(&other)),
        }
    }

    /// Release the loaded log
    pub async fn unload(&self) -> Result<(), EngineError> {
        match self.request(EngineRequest::Unload).await? {
            EngineResponse::Unloaded => Ok(()),
            other => Err(unexpected(&other)),
        }
    }

    /// Evaluate arcs on the loaded log (see [`EvaluationContext::evaluate`])
    pub async fn evaluate(
        &self,
        arcs: Vec<OCDeclareArc>,
    ) -> Result<Vec<ViolationResult>, EngineError> {
        match self.request(EngineRequest::Evaluate { arcs }).await? {
            EngineResponse::Evaluated(results) => Ok(results),
            other => Err(unexpected(&other)),
        }
    }

    /// Discover arcs on the loaded log (see [`EvaluationContext::discover`])
    pub async fn discover(&self, threshold: f64) -> Result<Vec<OCDeclareArc>, EngineError> {
        match self.request(EngineRequest::Discover { threshold }).await? {
            EngineResponse::Discovered(arcs) => Ok(arcs),
            other => Err(unexpected(&other)),
        }
    }

    /// Stop the worker thread (after it answered all submitted requests) and wait for it
    pub fn shutdown(self) -> Result<(), EngineError> {
        let Self { sender, worker, .. } = self;
        drop(sender);
        worker
            .join()
            .map_err(|_| EngineError::EngineFault("engine worker panicked".to_string()))
    }
}

fn unexpected(response: &EngineResponse) -> EngineError {
    EngineError::EngineFault(format!("unexpected response `{}`", response.name()))
}

/// Response to a submitted request that may not be available yet
///
/// Can be awaited or polled with [`PendingResponse::try_take`].
#[derive(Debug)]
pub struct PendingResponse {
    receiver: oneshot::Receiver<EngineResult>,
}

impl PendingResponse {
    /// Take the response if it is available
    ///
    /// Returns `None` while the request is still being processed. The response can only be taken once;
    /// afterwards this returns [`EngineError::Disconnected`].
    pub fn try_take(&mut self) -> Option<EngineResult> {
        match self.receiver.try_recv() {
            Ok(response) => Some(response),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Closed) => Some(Err(EngineError::Disconnected)),
        }
    }

    /// Block the current thread until the response is available
    ///
    /// Must not be called from within an asynchronous runtime.
    pub fn wait(self) -> EngineResult {
        self.receiver
            .blocking_recv()
            .unwrap_or(Err(EngineError::Disconnected))
    }
}

impl Future for PendingResponse {
    type Output = EngineResult;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.receiver)
            .poll(cx)
            .map(|res| res.unwrap_or(Err(EngineError::Disconnected)))
    }
}
