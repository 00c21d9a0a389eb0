//! Async orchestration for `combat-core` sessions.
//!
//! This crate wires the pure combat rules into a running service: a single
//! scheduler worker owns the authoritative [`combat_core::CombatState`],
//! executes commands, paces movement and policy turns on the tokio clock,
//! and broadcasts [`SessionEvent`]s. Consumers embed [`Runtime`] and talk to
//! the session through [`RuntimeHandle`].
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator and builder
//! - [`api`] exposes the types downstream clients interact with
//! - [`policy`] is the seam for replaceable combat tactics
//! - `scheduler` keeps the worker loop and its timers internal

pub mod api;
pub mod policy;
pub mod runtime;

mod scheduler;

pub use api::{Result, RuntimeError, RuntimeHandle, SessionEvent};
pub use policy::{SeekNearest, TacticsPolicy};
pub use runtime::{Runtime, RuntimeBuilder, RuntimeConfig};
