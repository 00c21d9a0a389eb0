//! Events produced by engine transitions for outer layers to publish.

use crate::state::{ActionSet, ActorId, Position, Rewards, Team};

/// One observable combat state change.
///
/// Engine operations return these in the order the changes happened, so a
/// subscriber replaying them sees the same sequence the state went through.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CombatEvent {
    /// A session began; `order` is the initiative sequence, first entry acts
    /// first.
    CombatStarted { order: Vec<ActorId> },

    /// A new combatant's turn began. Fires exactly once per activation.
    TurnChanged {
        actor: ActorId,
        available: ActionSet,
    },

    /// A validated move started; the combatant is in transit to `to`.
    ActorMoved {
        actor: ActorId,
        from: Position,
        to: Position,
    },

    /// An attack resolved. `remaining` is the target's health afterwards.
    AttackLanded {
        attacker: ActorId,
        target: ActorId,
        damage: u32,
        remaining: u32,
    },

    /// A combatant died and left the initiative order. `rewards` is the
    /// bundle external collaborators grant for the kill.
    ActorDied { actor: ActorId, rewards: Rewards },

    /// The session ended. `victor` names the team with survivors, or `None`
    /// when the session was aborted with both sides standing.
    CombatEnded { victor: Option<Team> },
}
