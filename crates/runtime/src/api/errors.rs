//! Unified error types surfaced by the runtime API.
//!
//! Only caller mistakes and infrastructure failures appear here. Illegal
//! combat actions are not errors at this layer: the worker tolerates them,
//! logs the reason, and publishes [`SessionEvent::ActionRejected`].
//!
//! [`SessionEvent::ActionRejected`]: crate::api::SessionEvent::ActionRejected

use thiserror::Error;
use tokio::sync::oneshot;

use combat_core::{ActorId, SchedulerError};

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("scheduler worker command channel closed")]
    CommandChannelClosed,

    #[error("scheduler worker reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("scheduler worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),

    #[error("combatant id {0} registered twice")]
    DuplicateCombatant(ActorId),

    #[error("runtime requires a board to be configured before building")]
    MissingBoard,

    #[error(transparent)]
    Scheduler(#[from] SchedulerError),
}
