//! Turn scheduling over a [`CombatState`].
//!
//! [`CombatEngine`] borrows the state mutably and is the only place combat
//! rules mutate it. Every operation validates before it writes, so a caller
//! that receives an error can keep using the state as if nothing happened.
//! Successful operations return the [`CombatEvent`]s they produced, in the
//! order they occurred.

pub mod errors;

pub use errors::{ActionError, SchedulerError};

use crate::board::BoardOracle;
use crate::events::CombatEvent;
use crate::movement;
use crate::state::{ActorId, CombatState, Combatant, Position, Rewards, Team, TurnOrder};

/// Combat rule executor.
///
/// Short-lived by design: borrow the state, apply one operation, drop the
/// engine, publish the returned events.
pub struct CombatEngine<'a> {
    state: &'a mut CombatState,
}

impl<'a> CombatEngine<'a> {
    pub fn new(state: &'a mut CombatState) -> Self {
        Self { state }
    }

    /// Opens a session: snapshots the living roster into an initiative
    /// order, records every fighter's home cell, and activates the first
    /// turn. Fails if a session is already running or nobody can fight.
    pub fn start_combat(&mut self) -> Result<Vec<CombatEvent>, SchedulerError> {
        if self.state.is_combat_active() {
            return Err(SchedulerError::AlreadyActive);
        }

        let initiative: Vec<(ActorId, u32)> = self
            .state
            .living()
            .map(|combatant| (combatant.id, combatant.stats.speed))
            .collect();
        if initiative.is_empty() {
            return Err(SchedulerError::NoCombatants);
        }
        let order = TurnOrder::from_initiative(&initiative).ok_or(SchedulerError::RosterFull)?;

        for combatant in self.state.combatants.values_mut() {
            if combatant.is_alive() {
                combatant.deactivate();
                combatant.in_transit = false;
                combatant.home = combatant.position;
            }
        }

        let mut events = vec![CombatEvent::CombatStarted {
            order: order.iter().collect(),
        }];
        self.state.turn = Some(order);
        self.start_turn(&mut events);
        Ok(events)
    }

    /// Closes the session: releases the turn order, clears transient turn
    /// state, and walks every survivor back to its home cell.
    pub fn end_combat(&mut self) -> Result<Vec<CombatEvent>, SchedulerError> {
        if !self.state.is_combat_active() {
            return Err(SchedulerError::Inactive);
        }
        let mut events = Vec::new();
        self.finish_combat(&mut events);
        Ok(events)
    }

    /// Ends `actor`'s turn and hands the cursor to the next living fighter.
    pub fn finish_turn(&mut self, actor: ActorId) -> Result<Vec<CombatEvent>, ActionError> {
        self.acting_combatant(actor)?;

        if let Some(combatant) = self.state.combatant_mut(actor) {
            combatant.deactivate();
        }
        let mut events = Vec::new();
        self.advance(&mut events);
        Ok(events)
    }

    /// Starts a move: validates the destination, applies the new position
    /// immediately, and flags the mover as in transit until
    /// [`complete_move`](Self::complete_move) confirms arrival.
    pub fn apply_move(
        &mut self,
        board: &dyn BoardOracle,
        actor: ActorId,
        destination: Position,
    ) -> Result<Vec<CombatEvent>, ActionError> {
        let mover = self.acting_combatant(actor)?;
        if !mover.can_move() {
            return Err(ActionError::AlreadyMoved(actor));
        }
        if mover.in_transit {
            return Err(ActionError::MoveInFlight(actor));
        }
        movement::validate_destination(self.state, board, mover, destination)?;
        let from = mover.position;

        if let Some(mover) = self.state.combatant_mut(actor) {
            mover.position = destination;
            mover.in_transit = true;
        }
        Ok(vec![CombatEvent::ActorMoved {
            actor,
            from,
            to: destination,
        }])
    }

    /// Confirms arrival of a move started by [`apply_move`](Self::apply_move).
    ///
    /// The move is only spent if the mover still holds the turn; an arrival
    /// that lands after the turn ended merely clears the transit flag.
    pub fn complete_move(&mut self, actor: ActorId) -> Result<Vec<CombatEvent>, ActionError> {
        let combatant = self
            .state
            .combatant_mut(actor)
            .ok_or(ActionError::UnknownCombatant(actor))?;
        if !combatant.in_transit {
            return Err(ActionError::NotInTransit(actor));
        }
        combatant.in_transit = false;

        let mut events = Vec::new();
        let holds_turn = self.state.current_actor() == Some(actor)
            && self
                .state
                .combatant(actor)
                .is_some_and(|combatant| combatant.phase.is_active());
        if holds_turn {
            if let Some(combatant) = self.state.combatant_mut(actor) {
                combatant.mark_moved();
            }
            self.finish_if_spent(actor, &mut events);
        }
        Ok(events)
    }

    /// Resolves an attack from `actor` against `target`: gates, hostility
    /// and reach checks, then damage. A kill removes the target from the
    /// initiative order in the same step and may end the combat outright.
    pub fn apply_attack(
        &mut self,
        actor: ActorId,
        target: ActorId,
    ) -> Result<Vec<CombatEvent>, ActionError> {
        let attacker = self.acting_combatant(actor)?;
        if !attacker.can_attack() {
            return Err(ActionError::AlreadyAttacked(actor));
        }
        let attacker_team = attacker.team;
        let attacker_position = attacker.position;
        let attack = attacker.stats.attack;
        let reach = u64::from(attacker.attack_range);

        let defender = self
            .state
            .combatant(target)
            .ok_or(ActionError::UnknownTarget(target))?;
        if !defender.is_alive() {
            return Err(ActionError::TargetDead(target));
        }
        if !defender.team.is_hostile_to(&attacker_team) {
            return Err(ActionError::TargetNotHostile { actor, target });
        }
        if attacker_position.distance_squared(defender.position) > reach * reach {
            return Err(ActionError::TargetOutOfReach { actor, target });
        }

        let mut events = Vec::new();
        if let Some(attacker) = self.state.combatant_mut(actor) {
            attacker.mark_attacked();
        }
        let mut killed = None;
        if let Some(defender) = self.state.combatant_mut(target) {
            let damage = defender.take_damage(attack);
            events.push(CombatEvent::AttackLanded {
                attacker: actor,
                target,
                damage,
                remaining: defender.health.current(),
            });
            if !defender.is_alive() {
                killed = Some(defender.rewards);
            }
        }
        if let Some(rewards) = killed {
            self.resolve_death(target, rewards, &mut events);
        }
        if self.state.is_combat_active() {
            self.finish_if_spent(actor, &mut events);
        }
        Ok(events)
    }

    /// Looks up `actor` and checks the common action gates: a session is
    /// running, the combatant exists, is alive, and holds the current turn.
    fn acting_combatant(&self, actor: ActorId) -> Result<&Combatant, ActionError> {
        let turn = self
            .state
            .turn
            .as_ref()
            .ok_or(ActionError::CombatInactive)?;
        let combatant = self
            .state
            .combatant(actor)
            .ok_or(ActionError::UnknownCombatant(actor))?;
        if combatant.phase.is_dead() {
            return Err(ActionError::DeadActor(actor));
        }
        if turn.current() != Some(actor) || !combatant.phase.is_active() {
            return Err(ActionError::NotYourTurn(actor));
        }
        Ok(combatant)
    }

    /// Activates the fighter under the cursor, or resolves the session when
    /// there is nothing left to schedule.
    fn start_turn(&mut self, events: &mut Vec<CombatEvent>) {
        let Some(current) = self.state.current_actor() else {
            return;
        };
        let alive = self
            .state
            .combatant(current)
            .is_some_and(Combatant::is_alive);
        if !alive {
            self.advance(events);
            return;
        }
        if self.end_condition_met() {
            self.finish_combat(events);
            return;
        }
        if let Some(combatant) = self.state.combatant_mut(current) {
            combatant.activate();
            events.push(CombatEvent::TurnChanged {
                actor: current,
                available: combatant.available_actions(),
            });
        }
    }

    /// Steps the cursor to the next living fighter. A full cycle without
    /// one ends the combat.
    fn advance(&mut self, events: &mut Vec<CombatEvent>) {
        let Some(len) = self.state.turn.as_ref().map(TurnOrder::len) else {
            return;
        };
        if len == 0 {
            self.finish_combat(events);
            return;
        }
        for _ in 0..len {
            if let Some(turn) = self.state.turn.as_mut() {
                turn.step();
            }
            let living = self.state.current_actor().is_some_and(|id| {
                self.state
                    .combatant(id)
                    .is_some_and(Combatant::is_alive)
            });
            if living {
                self.start_turn(events);
                return;
            }
        }
        self.finish_combat(events);
    }

    /// Deactivates `actor` and advances once both its actions are spent.
    fn finish_if_spent(&mut self, actor: ActorId, events: &mut Vec<CombatEvent>) {
        let spent = self.state.current_actor() == Some(actor)
            && self
                .state
                .combatant(actor)
                .is_some_and(Combatant::turn_spent);
        if spent {
            if let Some(combatant) = self.state.combatant_mut(actor) {
                combatant.deactivate();
            }
            self.advance(events);
        }
    }

    /// Drops `actor` from the initiative order, fixing the cursor so the
    /// turn sequence is undisturbed, then checks whether a side just lost
    /// its last fighter.
    fn resolve_death(&mut self, actor: ActorId, rewards: Rewards, events: &mut Vec<CombatEvent>) {
        if let Some(turn) = self.state.turn.as_mut() {
            turn.remove(actor);
        }
        events.push(CombatEvent::ActorDied { actor, rewards });
        if self.end_condition_met() {
            self.finish_combat(events);
        }
    }

    /// A session must stop once either side has no living fighter left.
    fn end_condition_met(&self) -> bool {
        let Some(turn) = self.state.turn.as_ref() else {
            return false;
        };
        let mut player = false;
        let mut enemy = false;
        for id in turn.iter() {
            let Some(combatant) = self.state.combatant(id) else {
                continue;
            };
            if combatant.is_alive() {
                match combatant.team {
                    Team::Player => player = true,
                    Team::Enemy => enemy = true,
                }
            }
        }
        !(player && enemy)
    }

    fn victor(&self) -> Option<Team> {
        let mut player = false;
        let mut enemy = false;
        for combatant in self.state.living() {
            match combatant.team {
                Team::Player => player = true,
                Team::Enemy => enemy = true,
            }
        }
        match (player, enemy) {
            (true, false) => Some(Team::Player),
            (false, true) => Some(Team::Enemy),
            _ => None,
        }
    }

    fn finish_combat(&mut self, events: &mut Vec<CombatEvent>) {
        let victor = self.victor();
        self.state.turn = None;
        for combatant in self.state.combatants.values_mut() {
            if combatant.is_alive() {
                combatant.deactivate();
                combatant.in_transit = false;
                combatant.position = combatant.home;
            }
        }
        events.push(CombatEvent::CombatEnded { victor });
    }
}
