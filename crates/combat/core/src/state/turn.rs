//! Initiative order and turn cursor for one combat session.

use arrayvec::ArrayVec;

use crate::config::CoreConfig;

use super::ActorId;

/// Ordered roster of living participants plus the turn cursor.
///
/// Exists only while combat is active; the whole value is discarded when the
/// session ends. Entries leave exactly when their combatant dies.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TurnOrder {
    order: ArrayVec<ActorId, { CoreConfig::MAX_COMBATANTS }>,
    cursor: usize,
}

impl TurnOrder {
    /// Builds the initiative order from `(id, speed)` pairs.
    ///
    /// Sorted by descending speed; the sort is stable, so equal speeds keep
    /// the relative order of `entries`. Returns `None` when `entries`
    /// exceeds [`CoreConfig::MAX_COMBATANTS`].
    pub fn from_initiative(entries: &[(ActorId, u32)]) -> Option<Self> {
        if entries.len() > CoreConfig::MAX_COMBATANTS {
            return None;
        }
        let mut sorted: Vec<(ActorId, u32)> = entries.to_vec();
        sorted.sort_by_key(|(_, speed)| std::cmp::Reverse(*speed));

        let order = sorted.into_iter().map(|(id, _)| id).collect();
        Some(Self { order, cursor: 0 })
    }

    /// The combatant whose turn is current, or `None` on an empty roster.
    pub fn current(&self) -> Option<ActorId> {
        self.order.get(self.cursor).copied()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains(&self, id: ActorId) -> bool {
        self.order.contains(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = ActorId> + '_ {
        self.order.iter().copied()
    }

    /// Steps the cursor forward one slot, wrapping at the end.
    pub fn step(&mut self) {
        if !self.order.is_empty() {
            self.cursor = (self.cursor + 1) % self.order.len();
        }
    }

    /// Removes a dead combatant, keeping the cursor on the same logical slot.
    ///
    /// Removal and cursor adjustment are one step: an entry removed before
    /// the cursor shifts it down so the current combatant's slot is
    /// unchanged, and a cursor left past the end wraps to 0. Returns whether
    /// the id was present.
    pub fn remove(&mut self, id: ActorId) -> bool {
        let Some(index) = self.order.iter().position(|entry| *entry == id) else {
            return false;
        };
        self.order.remove(index);

        if index < self.cursor {
            self.cursor -= 1;
        } else if self.cursor >= self.order.len() {
            self.cursor = 0;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(n: u32) -> ActorId {
        ActorId(n)
    }

    #[test]
    fn initiative_sorts_by_descending_speed() {
        // Player 10, GoblinA 15, GoblinB 5.
        let order =
            TurnOrder::from_initiative(&[(id(0), 10), (id(1), 15), (id(2), 5)]).unwrap();
        let sequence: Vec<ActorId> = order.iter().collect();
        assert_eq!(sequence, vec![id(1), id(0), id(2)]);
        assert_eq!(order.current(), Some(id(1)));
    }

    #[test]
    fn equal_speeds_keep_relative_order() {
        let order =
            TurnOrder::from_initiative(&[(id(3), 7), (id(1), 9), (id(2), 7), (id(4), 7)])
                .unwrap();
        let sequence: Vec<ActorId> = order.iter().collect();
        assert_eq!(sequence, vec![id(1), id(3), id(2), id(4)]);
    }

    #[test]
    fn oversized_roster_is_refused() {
        let entries: Vec<(ActorId, u32)> = (0..CoreConfig::MAX_COMBATANTS as u32 + 1)
            .map(|n| (id(n), n))
            .collect();
        assert!(TurnOrder::from_initiative(&entries).is_none());
    }

    #[test]
    fn step_wraps_around() {
        let mut order = TurnOrder::from_initiative(&[(id(0), 3), (id(1), 2)]).unwrap();
        order.step();
        assert_eq!(order.current(), Some(id(1)));
        order.step();
        assert_eq!(order.current(), Some(id(0)));
    }

    #[test]
    fn removal_before_cursor_keeps_current_slot() {
        let mut order =
            TurnOrder::from_initiative(&[(id(0), 9), (id(1), 8), (id(2), 7)]).unwrap();
        order.step(); // current: id(1)

        assert!(order.remove(id(0)));
        assert_eq!(order.current(), Some(id(1)));
        assert_eq!(order.len(), 2);
    }

    #[test]
    fn removal_past_the_end_wraps_cursor_to_start() {
        let mut order =
            TurnOrder::from_initiative(&[(id(0), 9), (id(1), 8), (id(2), 7)]).unwrap();
        order.step();
        order.step(); // current: id(2), last slot

        assert!(order.remove(id(2)));
        assert_eq!(order.current(), Some(id(0)));
    }

    #[test]
    fn removal_after_cursor_leaves_it_alone() {
        let mut order =
            TurnOrder::from_initiative(&[(id(0), 9), (id(1), 8), (id(2), 7)]).unwrap();
        order.step(); // current: id(1)

        assert!(order.remove(id(2)));
        assert_eq!(order.current(), Some(id(1)));
        assert!(!order.remove(id(2)));
    }
}
