//! Asynchronous abstraction for sourcing policy-driven combat decisions.
//!
//! Runtime users plug in [`TacticsPolicy`] implementations so policy turns
//! can run with the built-in seek-and-strike behavior, scripted fixtures,
//! or an external decision service. The scheduler owns all timing; a policy
//! only answers what to do, never when.

use async_trait::async_trait;

use combat_core::{ActorId, CombatState, Position, tactics};

/// Decision source for combatants the runtime drives itself.
///
/// Both hooks receive a read-only snapshot. A policy proposes; the combat
/// rules still validate every proposal, so a policy cannot break invariants,
/// only waste its turn.
#[async_trait]
pub trait TacticsPolicy: Send + Sync {
    /// The destination `actor` should move to this turn, or `None` to stay
    /// put. Called once per policy turn, before the attack decision.
    async fn plan_move(&self, state: &CombatState, actor: ActorId) -> Option<Position>;

    /// The target `actor` should attack once its move has resolved, or
    /// `None` to pass. The turn ends after this either way.
    async fn plan_attack(&self, state: &CombatState, actor: ActorId) -> Option<ActorId>;
}

/// Default tactics: walk toward the nearest opponent, then attack the
/// nearest one in reach.
///
/// Deterministic by construction. Target selection goes by squared
/// straight-line distance with ties falling to the lowest id, and the
/// approach steps along the dominant axis without entering the target's
/// cell.
pub struct SeekNearest;

#[async_trait]
impl TacticsPolicy for SeekNearest {
    async fn plan_move(&self, state: &CombatState, actor: ActorId) -> Option<Position> {
        let combatant = state.combatant(actor)?;
        let opponent = tactics::nearest_opponent(state, combatant)?;
        let target = state.combatant(opponent)?;
        tactics::step_toward(combatant.position, target.position, combatant.move_range)
    }

    async fn plan_attack(&self, state: &CombatState, actor: ActorId) -> Option<ActorId> {
        let combatant = state.combatant(actor)?;
        tactics::nearest_opponent_in_range(state, combatant)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use combat_core::{Combatant, Team};

    fn duel() -> CombatState {
        CombatState::with_combatants([
            Combatant::builder(ActorId(0), "hero")
                .team(Team::Player)
                .position(Position::new(0, 0))
                .build(),
            Combatant::builder(ActorId(1), "goblin")
                .team(Team::Enemy)
                .position(Position::new(5, 0))
                .build(),
        ])
    }

    #[tokio::test]
    async fn seek_nearest_closes_the_gap_then_strikes() {
        let mut state = duel();
        let policy = SeekNearest;

        // Five cells out: approach, but no target in reach yet.
        assert_eq!(
            policy.plan_move(&state, ActorId(1)).await,
            Some(Position::new(2, 0))
        );
        assert_eq!(policy.plan_attack(&state, ActorId(1)).await, None);

        // Adjacent: no closer cell to take, strike instead.
        state.combatant_mut(ActorId(1)).unwrap().position = Position::new(1, 0);
        assert_eq!(policy.plan_move(&state, ActorId(1)).await, None);
        assert_eq!(policy.plan_attack(&state, ActorId(1)).await, Some(ActorId(0)));
    }

    #[tokio::test]
    async fn policy_goes_idle_without_living_opponents() {
        let mut state = duel();
        state.combatant_mut(ActorId(0)).unwrap().die();

        let policy = SeekNearest;
        assert_eq!(policy.plan_move(&state, ActorId(1)).await, None);
        assert_eq!(policy.plan_attack(&state, ActorId(1)).await, None);
    }
}
