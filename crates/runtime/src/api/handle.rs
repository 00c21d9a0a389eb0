//! Cloneable façade for issuing commands to the runtime.
//!
//! [`RuntimeHandle`] hides channel plumbing and offers async helpers for
//! driving the session or streaming its events.

use tokio::sync::{broadcast, mpsc, oneshot};

use combat_core::{ActorId, CombatState, Position, TurnBrief};

use super::errors::{Result, RuntimeError};
use super::events::SessionEvent;
use crate::scheduler::Command;

/// Client-facing handle to interact with the runtime.
#[derive(Clone)]
pub struct RuntimeHandle {
    command_tx: mpsc::Sender<Command>,
    event_tx: broadcast::Sender<SessionEvent>,
}

impl RuntimeHandle {
    pub(crate) fn new(
        command_tx: mpsc::Sender<Command>,
        event_tx: broadcast::Sender<SessionEvent>,
    ) -> Self {
        Self {
            command_tx,
            event_tx,
        }
    }

    /// Opens a combat session over the registered combatants.
    pub async fn start_combat(&self) -> Result<()> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(Command::StartCombat { reply: reply_tx })
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)?
    }

    /// Force-ends the running session, walking survivors home.
    pub async fn end_combat(&self) -> Result<()> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(Command::EndCombat { reply: reply_tx })
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)?
    }

    /// Ends `actor`'s turn.
    ///
    /// Like all per-combatant requests, an illegal or stale call succeeds
    /// here and surfaces as [`SessionEvent::ActionRejected`].
    pub async fn end_turn(&self, actor: ActorId) -> Result<()> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(Command::EndTurn {
                actor,
                reply: reply_tx,
            })
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)?
    }

    /// Requests a move for `actor` to `destination`.
    pub async fn request_move(&self, actor: ActorId, destination: Position) -> Result<()> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(Command::RequestMove {
                actor,
                destination,
                reply: reply_tx,
            })
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)?
    }

    /// Requests an attack from `actor` against `target`.
    pub async fn request_attack(&self, actor: ActorId, target: ActorId) -> Result<()> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(Command::RequestAttack {
                actor,
                target,
                reply: reply_tx,
            })
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)?
    }

    /// The cells `actor` would be offered for its move, for display.
    ///
    /// Empty when the actor cannot move right now.
    pub async fn reachable_cells(&self, actor: ActorId) -> Result<Vec<Position>> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(Command::ReachableCells {
                actor,
                reply: reply_tx,
            })
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// Query the current combat state (read-only snapshot).
    pub async fn state(&self) -> Result<CombatState> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(Command::QueryState { reply: reply_tx })
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// Who is acting and what they can still do, while combat is active.
    pub async fn turn_brief(&self) -> Result<Option<TurnBrief>> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(Command::QueryTurnBrief { reply: reply_tx })
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// Subscribe to session events.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.event_tx.subscribe()
    }
}
