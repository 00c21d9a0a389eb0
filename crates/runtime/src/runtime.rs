//! High-level runtime orchestrator.
//!
//! The runtime owns the scheduler worker, wires up command/event channels,
//! and exposes a builder-based API for clients to drive a combat session.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;

use combat_core::{BoardOracle, CombatState, Combatant};

use crate::api::{Result, RuntimeError, RuntimeHandle, SessionEvent};
use crate::policy::{SeekNearest, TacticsPolicy};
use crate::scheduler::{Command, SchedulerWorker};

/// Runtime configuration shared across the orchestrator and worker.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub event_buffer_size: usize,
    pub command_buffer_size: usize,
    /// Pause between a policy combatant's activation and its move decision.
    pub policy_move_delay: Duration,
    /// How long a started move stays in flight before arrival confirms it.
    pub move_duration: Duration,
    /// Pause between arrival (or a skipped move) and the attack decision.
    pub policy_attack_delay: Duration,
    /// How long corpses linger before leaving the battlefield.
    pub corpse_lifetime: Duration,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            event_buffer_size: 100,
            command_buffer_size: 32,
            policy_move_delay: Duration::from_secs(1),
            move_duration: Duration::from_millis(200),
            policy_attack_delay: Duration::from_millis(500),
            corpse_lifetime: Duration::from_secs(2),
        }
    }
}

/// Main runtime that orchestrates combat sessions.
///
/// Design: the runtime owns the worker and coordinates its lifetime.
/// [`RuntimeHandle`] provides a cloneable façade for clients.
pub struct Runtime {
    handle: RuntimeHandle,
    worker_handle: JoinHandle<()>,
}

impl Runtime {
    /// Create a new runtime builder.
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Get a cloneable handle to this runtime.
    ///
    /// The handle can be shared across clients and async tasks.
    pub fn handle(&self) -> RuntimeHandle {
        self.handle.clone()
    }

    /// Subscribe to session events.
    pub fn subscribe_events(&self) -> broadcast::Receiver<SessionEvent> {
        self.handle.subscribe()
    }

    /// Shutdown the runtime gracefully.
    ///
    /// The worker exits once the last handle is gone, so clones held
    /// elsewhere keep it alive past this call's drop.
    pub async fn shutdown(self) -> Result<()> {
        drop(self.handle);
        self.worker_handle.await.map_err(RuntimeError::WorkerJoin)
    }
}

/// Builder for [`Runtime`] with flexible configuration.
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    combatants: Vec<Combatant>,
    board: Option<Arc<dyn BoardOracle>>,
    policy: Option<Arc<dyn TacticsPolicy>>,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            combatants: Vec::new(),
            board: None,
            policy: None,
        }
    }

    /// Override runtime configuration.
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Register one combatant.
    pub fn combatant(mut self, combatant: Combatant) -> Self {
        self.combatants.push(combatant);
        self
    }

    /// Register a batch of combatants.
    pub fn combatants(mut self, combatants: impl IntoIterator<Item = Combatant>) -> Self {
        self.combatants.extend(combatants);
        self
    }

    /// Set the required board oracle.
    pub fn board(mut self, board: impl BoardOracle + 'static) -> Self {
        self.board = Some(Arc::new(board));
        self
    }

    /// Set the tactics policy driving AI-controlled combatants.
    ///
    /// Defaults to [`SeekNearest`] when not provided.
    pub fn policy(mut self, policy: impl TacticsPolicy + 'static) -> Self {
        self.policy = Some(Arc::new(policy));
        self
    }

    /// Build the runtime and spawn its worker.
    pub async fn build(self) -> Result<Runtime> {
        let board = self.board.ok_or(RuntimeError::MissingBoard)?;
        let policy = self.policy.unwrap_or_else(|| Arc::new(SeekNearest));

        let mut seen = BTreeSet::new();
        for combatant in &self.combatants {
            if !seen.insert(combatant.id) {
                return Err(RuntimeError::DuplicateCombatant(combatant.id));
            }
        }
        let state = CombatState::with_combatants(self.combatants);

        let (command_tx, command_rx) = mpsc::channel::<Command>(self.config.command_buffer_size);
        let (event_tx, _event_rx) =
            broadcast::channel::<SessionEvent>(self.config.event_buffer_size);

        let handle = RuntimeHandle::new(command_tx, event_tx.clone());

        let worker = SchedulerWorker::new(state, board, policy, self.config, command_rx, event_tx);
        let worker_handle = tokio::spawn(async move {
            worker.run().await;
        });

        Ok(Runtime {
            handle,
            worker_handle,
        })
    }
}
