//! Movement legality: a pure range + occupancy predicate, not path search.

use crate::board::BoardOracle;
use crate::state::{CombatState, Combatant, Position};

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MoveError {
    #[error("destination {destination:?} is out of range")]
    OutOfRange { destination: Position },

    #[error("destination {destination:?} is off the board")]
    OffBoard { destination: Position },

    #[error("destination {destination:?} is blocked")]
    Blocked { destination: Position },

    #[error("destination {destination:?} is occupied")]
    Occupied { destination: Position },
}

/// Decides whether `mover` may relocate to `destination`.
///
/// Legal iff the straight-line distance fits the mover's budget
/// (`dx² + dy² ≤ move_range²`), the cell exists and carries no obstacle,
/// and no other living combatant stands there. The mover's own cell is not
/// "occupied by another", so zero-length moves pass.
pub fn validate_destination(
    state: &CombatState,
    board: &dyn BoardOracle,
    mover: &Combatant,
    destination: Position,
) -> Result<(), MoveError> {
    let budget = mover.move_range as u64;
    if mover.position.distance_squared(destination) > budget * budget {
        return Err(MoveError::OutOfRange { destination });
    }
    if !board.contains(destination) {
        return Err(MoveError::OffBoard { destination });
    }
    if board.is_obstacle(destination) {
        return Err(MoveError::Blocked { destination });
    }
    if state
        .occupant_at(destination)
        .is_some_and(|id| id != mover.id)
    {
        return Err(MoveError::Occupied { destination });
    }
    Ok(())
}

/// Enumerates the candidate cells offered for display.
///
/// Candidates come from the Manhattan bound `|dx| + |dy| ≤ move_range`, each
/// re-checked through [`validate_destination`]. The displayed set is a
/// subset of what the predicate accepts: diagonal cells can pass the
/// Euclidean check while falling outside the Manhattan bound, and direct
/// requests to them are still legal.
pub fn reachable_cells(
    state: &CombatState,
    board: &dyn BoardOracle,
    mover: &Combatant,
) -> Vec<Position> {
    let range = mover.move_range as i32;
    let mut cells = Vec::new();
    for dx in -range..=range {
        for dy in -range..=range {
            if dx == 0 && dy == 0 {
                continue;
            }
            if dx.abs() + dy.abs() > range {
                continue;
            }
            let candidate = Position::new(mover.position.x + dx, mover.position.y + dy);
            if validate_destination(state, board, mover, candidate).is_ok() {
                cells.push(candidate);
            }
        }
    }
    cells
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::GridBoard;
    use crate::state::{ActorId, CombatState, Combatant};

    fn arena() -> (CombatState, GridBoard, ActorId) {
        let mover = Combatant::builder(ActorId(1), "mover")
            .position(Position::new(5, 5))
            .move_range(3)
            .build();
        let bystander = Combatant::builder(ActorId(2), "bystander")
            .position(Position::new(5, 7))
            .build();
        let state = CombatState::with_combatants([mover, bystander]);
        let board = GridBoard::new(12, 12).with_obstacle(Position::new(6, 5));
        (state, board, ActorId(1))
    }

    fn check(state: &CombatState, board: &GridBoard, destination: Position) -> Result<(), MoveError> {
        let mover = state.combatant(ActorId(1)).unwrap();
        validate_destination(state, board, mover, destination)
    }

    #[test]
    fn accepts_cells_within_euclidean_budget() {
        let (state, board, _) = arena();
        // (7, 7) is 2√2 ≈ 2.83 cells away: inside the budget of 3 even
        // though its Manhattan distance is 4.
        assert!(check(&state, &board, Position::new(7, 7)).is_ok());
        assert!(check(&state, &board, Position::new(5, 8)).is_ok());
    }

    #[test]
    fn rejects_cells_beyond_the_budget() {
        let (state, board, _) = arena();
        assert!(matches!(
            check(&state, &board, Position::new(8, 7)),
            Err(MoveError::OutOfRange { .. })
        ));
    }

    #[test]
    fn rejects_obstacles_and_off_board_cells() {
        let (mut state, board, _) = arena();
        assert!(matches!(
            check(&state, &board, Position::new(6, 5)),
            Err(MoveError::Blocked { .. })
        ));

        state.combatant_mut(ActorId(1)).unwrap().position = Position::new(0, 0);
        assert!(matches!(
            check(&state, &board, Position::new(-1, 0)),
            Err(MoveError::OffBoard { .. })
        ));
    }

    #[test]
    fn rejects_cells_held_by_living_combatants() {
        let (state, board, _) = arena();
        assert!(matches!(
            check(&state, &board, Position::new(5, 7)),
            Err(MoveError::Occupied { .. })
        ));
    }

    #[test]
    fn corpses_do_not_block_movement() {
        let (mut state, board, _) = arena();
        state.combatant_mut(ActorId(2)).unwrap().die();
        assert!(check(&state, &board, Position::new(5, 7)).is_ok());
    }

    #[test]
    fn own_cell_is_a_legal_destination() {
        let (state, board, _) = arena();
        assert!(check(&state, &board, Position::new(5, 5)).is_ok());
    }

    #[test]
    fn displayed_cells_are_manhattan_bounded_and_individually_legal() {
        let (state, board, _) = arena();
        let mover = state.combatant(ActorId(1)).unwrap();
        let cells = reachable_cells(&state, &board, mover);

        // Diagonal (7, 7) passes the predicate but is not displayed.
        assert!(!cells.contains(&Position::new(7, 7)));
        assert!(cells.contains(&Position::new(5, 8)));
        // Occupied and blocked cells never show up.
        assert!(!cells.contains(&Position::new(5, 7)));
        assert!(!cells.contains(&Position::new(6, 5)));

        for cell in &cells {
            assert!(validate_destination(&state, &board, mover, *cell).is_ok());
            assert!(mover.position.manhattan_distance(*cell) <= mover.move_range);
        }
    }
}
