//! Events emitted during a session for front-ends to observe.
//!
//! Consumers subscribe to [`SessionEvent`] to react to state changes without
//! blocking the worker loop.

use combat_core::{ActorId, CombatEvent};

/// Events broadcast by the runtime while a session runs.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// A combat rule transition, in the order the state went through them.
    Combat(CombatEvent),

    /// A requested action was refused by the combat rules. The request was
    /// answered successfully; this event carries the reason for observers.
    ActionRejected { actor: ActorId, reason: String },

    /// A corpse finished lingering and left the battlefield.
    CorpseRemoved { actor: ActorId },
}
