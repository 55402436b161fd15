//! Dispatch pipeline seam.
//!
//! The router is one stage in a host-owned chain of middleware. This module
//! defines that contract — the dispatcher capability, the downstream
//! continuation, and the stage trait — plus a minimal pipeline
//! implementation that chains stages in front of a terminal sink.

use crate::action::Action;
use fluxbridge_socket::SocketError;
use std::sync::Arc;
use thiserror::Error;
use tracing::trace;

/// Pipeline errors.
///
/// Failures from collaborators propagate unmodified; there are no retries
/// and no wrapping beyond the conversions below.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// Socket error while emitting a routed action.
    #[error(transparent)]
    Socket(#[from] SocketError),

    /// A routed action reached the default send strategy without an
    /// `event` field.
    #[error("Routed action missing `event` field: {0}")]
    MissingEvent(String),

    /// A middleware stage failed.
    #[error("Stage failed: {0}")]
    Stage(String),
}

/// The dispatcher capability: submit a new action at the head of the
/// pipeline.
pub trait Dispatch: Send + Sync {
    /// Dispatch an action through the full pipeline.
    ///
    /// # Errors
    ///
    /// Returns whatever error a stage or the sink's collaborators raise.
    fn dispatch(&self, action: Action) -> Result<Action, DispatchError>;
}

/// The downstream continuation handed to each stage.
pub type Next<'a> = &'a mut (dyn FnMut(Action) -> Result<Action, DispatchError> + 'a);

/// A pipeline stage.
pub trait Middleware: Send + Sync {
    /// Called once when the stage is mounted into a pipeline.
    ///
    /// The handle re-enters the pipeline from the top and stays valid for
    /// the pipeline's lifetime.
    fn install(&self, dispatch: Arc<dyn Dispatch>) {
        let _ = dispatch;
    }

    /// Process one action.
    ///
    /// A stage either forwards the action (possibly transformed) through
    /// `next`, or consumes it and returns its own result.
    ///
    /// # Errors
    ///
    /// Returns an error if the stage or anything downstream of it fails.
    fn handle(
        &self,
        action: Action,
        next: Next<'_>,
        dispatch: &dyn Dispatch,
    ) -> Result<Action, DispatchError>;
}

/// An ordered chain of middleware stages ending in a terminal sink.
///
/// Actions dispatched into the pipeline pass through every stage in order;
/// whatever falls out of the last stage reaches the sink. The pipeline
/// holds no other state, so one instance can be shared behind `Arc` and
/// re-entered from socket handlers.
pub struct Pipeline {
    stages: Vec<Arc<dyn Middleware>>,
    sink: Box<dyn Fn(Action) -> Action + Send + Sync>,
}

impl Pipeline {
    /// Build a pipeline and mount every stage.
    ///
    /// Mounting calls each stage's [`Middleware::install`] with a handle to
    /// this pipeline, which is when the router performs its one-time socket
    /// subscriptions.
    #[must_use]
    pub fn build(
        stages: Vec<Arc<dyn Middleware>>,
        sink: impl Fn(Action) -> Action + Send + Sync + 'static,
    ) -> Arc<Self> {
        let pipeline = Arc::new(Self {
            stages,
            sink: Box::new(sink),
        });

        for stage in &pipeline.stages {
            stage.install(pipeline.clone());
        }

        pipeline
    }

    /// Number of mounted stages.
    #[must_use]
    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }

    fn run(&self, index: usize, action: Action) -> Result<Action, DispatchError> {
        match self.stages.get(index) {
            None => Ok((self.sink)(action)),
            Some(stage) => {
                let mut next = |action: Action| self.run(index + 1, action);
                stage.handle(action, &mut next, self)
            }
        }
    }
}

impl Dispatch for Pipeline {
    fn dispatch(&self, action: Action) -> Result<Action, DispatchError> {
        trace!(kind = action.kind().unwrap_or_default(), "Dispatching action");
        self.run(0, action)
    }
}
