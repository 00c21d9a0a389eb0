//! Pure targeting and approach math behind the default tactics policy.
//!
//! Everything here is deterministic: ties between equally close targets go
//! to the lowest id, and the approach walk always prefers the axis with the
//! larger remaining gap (x when tied).

use crate::state::{ActorId, CombatState, Combatant, Position};

/// The nearest living combatant hostile to `actor`, by squared straight-line
/// distance. Equidistant candidates resolve to the lowest id.
pub fn nearest_opponent(state: &CombatState, actor: &Combatant) -> Option<ActorId> {
    state
        .living()
        .filter(|c| c.team.is_hostile_to(&actor.team))
        .min_by_key(|c| (actor.position.distance_squared(c.position), c.id))
        .map(|c| c.id)
}

/// Like [`nearest_opponent`], restricted to targets within attack reach.
pub fn nearest_opponent_in_range(state: &CombatState, actor: &Combatant) -> Option<ActorId> {
    let reach = actor.attack_range as u64;
    state
        .living()
        .filter(|c| c.team.is_hostile_to(&actor.team))
        .filter(|c| actor.position.distance_squared(c.position) <= reach * reach)
        .min_by_key(|c| (actor.position.distance_squared(c.position), c.id))
        .map(|c| c.id)
}

/// Greedy approach toward `target`: up to `max_steps` single-cell axis
/// steps, never entering the target's own cell.
///
/// Each step follows the axis with the larger remaining gap. The result is
/// one proposed destination for the movement validator, not a path; a
/// blocked proposal means the move is skipped, not re-routed.
///
/// Returns `None` when no displacement is possible (already adjacent, or
/// `max_steps` is 0).
pub fn step_toward(origin: Position, target: Position, max_steps: u32) -> Option<Position> {
    let mut current = origin;
    for _ in 0..max_steps {
        let dx = target.x - current.x;
        let dy = target.y - current.y;
        let next = if dx.abs() >= dy.abs() && dx != 0 {
            Position::new(current.x + dx.signum(), current.y)
        } else if dy != 0 {
            Position::new(current.x, current.y + dy.signum())
        } else {
            break;
        };
        if next == target {
            break;
        }
        current = next;
    }
    (current != origin).then_some(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Team;

    fn setup() -> CombatState {
        CombatState::with_combatants([
            Combatant::builder(ActorId(0), "hero")
                .position(Position::new(0, 0))
                .build(),
            Combatant::builder(ActorId(1), "goblin-a")
                .team(Team::Enemy)
                .position(Position::new(4, 0))
                .build(),
            Combatant::builder(ActorId(2), "goblin-b")
                .team(Team::Enemy)
                .position(Position::new(0, 4))
                .build(),
            Combatant::builder(ActorId(3), "goblin-c")
                .team(Team::Enemy)
                .position(Position::new(9, 9))
                .build(),
        ])
    }

    #[test]
    fn nearest_opponent_breaks_distance_ties_by_lowest_id() {
        let state = setup();
        let hero = state.combatant(ActorId(0)).unwrap();
        // goblin-a and goblin-b are both 4 cells away.
        assert_eq!(nearest_opponent(&state, hero), Some(ActorId(1)));
    }

    #[test]
    fn nearest_opponent_skips_the_dead_and_allies() {
        let mut state = setup();
        state.combatant_mut(ActorId(1)).unwrap().die();
        let hero = state.combatant(ActorId(0)).unwrap();
        assert_eq!(nearest_opponent(&state, hero), Some(ActorId(2)));

        let goblin = state.combatant(ActorId(2)).unwrap();
        // Goblins never target each other.
        assert_eq!(nearest_opponent(&state, goblin), Some(ActorId(0)));
    }

    #[test]
    fn in_range_scan_respects_attack_reach() {
        let mut state = setup();
        {
            let hero = state.combatant(ActorId(0)).unwrap();
            assert_eq!(nearest_opponent_in_range(&state, hero), None);
        }

        state.combatant_mut(ActorId(1)).unwrap().position = Position::new(1, 0);
        let hero = state.combatant(ActorId(0)).unwrap();
        assert_eq!(nearest_opponent_in_range(&state, hero), Some(ActorId(1)));
    }

    #[test]
    fn approach_walks_the_dominant_axis_first() {
        // From (0,0) toward (5,2) with 3 steps: x, x, x.
        assert_eq!(
            step_toward(Position::new(0, 0), Position::new(5, 2), 3),
            Some(Position::new(3, 0))
        );
        // From (0,0) toward (2,2): x and y alternate, x first on ties.
        assert_eq!(
            step_toward(Position::new(0, 0), Position::new(2, 2), 3),
            Some(Position::new(2, 1))
        );
    }

    #[test]
    fn approach_stops_short_of_the_target_cell() {
        assert_eq!(
            step_toward(Position::new(0, 0), Position::new(3, 0), 5),
            Some(Position::new(2, 0))
        );
    }

    #[test]
    fn approach_from_adjacent_yields_no_move() {
        assert_eq!(step_toward(Position::new(2, 0), Position::new(3, 0), 3), None);
        assert_eq!(step_toward(Position::new(3, 0), Position::new(3, 0), 3), None);
    }
}
