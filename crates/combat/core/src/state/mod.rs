//! Authoritative combat state representation.
//!
//! This module owns the data structures describing combatants and turn
//! bookkeeping. Outer layers clone or query this state but mutate it
//! exclusively through the engine.
pub mod actor;
pub mod common;
pub mod turn;

use std::collections::BTreeMap;

pub use actor::{CombatStats, Combatant, CombatantBuilder, Control, Rewards, Team, TurnPhase};
pub use common::{ActorId, Position, ResourceMeter};
pub use turn::TurnOrder;

bitflags::bitflags! {
    /// Remaining action availability for the active combatant.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct ActionSet: u8 {
        const MOVE = 1 << 0;
        const ATTACK = 1 << 1;
    }
}

/// Per-turn display snapshot: who is acting and what they can still do.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TurnBrief {
    pub actor: ActorId,
    pub available: ActionSet,
}

/// Canonical snapshot of one combat arena.
///
/// Combatants outlive combat sessions; only [`CombatState::turn`] is
/// session-scoped. Combat is active exactly while `turn` is `Some`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatState {
    /// All known participants, keyed by id. Iteration order (ascending id)
    /// is the pre-sort order initiative ties fall back to.
    pub combatants: BTreeMap<ActorId, Combatant>,
    /// Initiative order and cursor for the active session, if any.
    pub turn: Option<TurnOrder>,
}

impl CombatState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collects combatants into a fresh, inactive state.
    ///
    /// Callers ensure ids are unique; a duplicate id keeps the last entry.
    pub fn with_combatants(combatants: impl IntoIterator<Item = Combatant>) -> Self {
        Self {
            combatants: combatants.into_iter().map(|c| (c.id, c)).collect(),
            turn: None,
        }
    }

    pub fn combatant(&self, id: ActorId) -> Option<&Combatant> {
        self.combatants.get(&id)
    }

    pub fn combatant_mut(&mut self, id: ActorId) -> Option<&mut Combatant> {
        self.combatants.get_mut(&id)
    }

    pub fn is_combat_active(&self) -> bool {
        self.turn.is_some()
    }

    /// The combatant whose turn is current, while combat is active.
    pub fn current_actor(&self) -> Option<ActorId> {
        self.turn.as_ref().and_then(TurnOrder::current)
    }

    /// All living combatants, in ascending id order.
    pub fn living(&self) -> impl Iterator<Item = &Combatant> {
        self.combatants.values().filter(|c| c.is_alive())
    }

    /// The living combatant standing on `position`, if any.
    ///
    /// Dead combatants do not block cells; their removal from presentation
    /// is cosmetic and independent of occupancy.
    pub fn occupant_at(&self, position: Position) -> Option<ActorId> {
        self.living()
            .find(|c| c.position == position)
            .map(|c| c.id)
    }

    /// Display snapshot for the current turn, while combat is active.
    pub fn turn_brief(&self) -> Option<TurnBrief> {
        let actor = self.current_actor()?;
        let combatant = self.combatant(actor)?;
        Some(TurnBrief {
            actor,
            available: combatant.available_actions(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn occupancy_ignores_the_dead() {
        let spot = Position::new(2, 2);
        let mut state = CombatState::with_combatants([
            Combatant::builder(ActorId(1), "a").position(spot).build(),
            Combatant::builder(ActorId(2), "b")
                .position(Position::new(4, 4))
                .build(),
        ]);
        assert_eq!(state.occupant_at(spot), Some(ActorId(1)));

        state.combatant_mut(ActorId(1)).unwrap().die();
        assert_eq!(state.occupant_at(spot), None);
    }

    #[test]
    fn turn_brief_tracks_spent_actions() {
        let mut state = CombatState::with_combatants([
            Combatant::builder(ActorId(1), "a").speed(9).build(),
            Combatant::builder(ActorId(2), "b").speed(1).build(),
        ]);
        assert!(state.turn_brief().is_none());

        state.turn = TurnOrder::from_initiative(&[(ActorId(1), 9), (ActorId(2), 1)]);
        state.combatant_mut(ActorId(1)).unwrap().activate();

        let brief = state.turn_brief().unwrap();
        assert_eq!(brief.actor, ActorId(1));
        assert_eq!(brief.available, ActionSet::MOVE | ActionSet::ATTACK);

        state.combatant_mut(ActorId(1)).unwrap().mark_moved();
        let brief = state.turn_brief().unwrap();
        assert_eq!(brief.available, ActionSet::ATTACK);
    }
}
