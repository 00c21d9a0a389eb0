//! Typed failures surfaced by engine operations.
//!
//! Everything here is a rejection, not a fault: the state is untouched when
//! an error comes back, and outer layers are free to tolerate stale or
//! redundant requests silently.

use crate::movement::MoveError;
use crate::state::ActorId;

/// Session lifecycle preconditions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SchedulerError {
    #[error("combat is already active")]
    AlreadyActive,

    #[error("combat is not active")]
    Inactive,

    #[error("no living combatants to fight")]
    NoCombatants,

    #[error("too many living combatants for one session")]
    RosterFull,
}

/// Gate and validation failures for per-combatant actions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ActionError {
    #[error("combat is not active")]
    CombatInactive,

    #[error("combatant {0} does not exist")]
    UnknownCombatant(ActorId),

    #[error("combatant {0} is dead")]
    DeadActor(ActorId),

    #[error("it is not {0}'s turn")]
    NotYourTurn(ActorId),

    #[error("{0} has already moved this turn")]
    AlreadyMoved(ActorId),

    #[error("{0} has already attacked this turn")]
    AlreadyAttacked(ActorId),

    #[error("{0} already has a move in flight")]
    MoveInFlight(ActorId),

    #[error("{0} has no move in flight")]
    NotInTransit(ActorId),

    #[error(transparent)]
    Move(#[from] MoveError),

    #[error("target {0} does not exist")]
    UnknownTarget(ActorId),

    #[error("target {0} is already dead")]
    TargetDead(ActorId),

    #[error("{target} is not hostile to {actor}")]
    TargetNotHostile { actor: ActorId, target: ActorId },

    #[error("target {target} is out of reach for {actor}")]
    TargetOutOfReach { actor: ActorId, target: ActorId },
}
