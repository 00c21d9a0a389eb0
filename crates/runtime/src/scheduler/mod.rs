//! Scheduler worker that owns the authoritative [`CombatState`].
//!
//! Receives commands from [`RuntimeHandle`], executes them through
//! [`CombatEngine`], paces delayed steps (movement interpolation, policy
//! turns, corpse cleanup) with [`TaskQueue`], and publishes [`SessionEvent`]
//! notifications.
//!
//! Illegal and stale requests are tolerated here: the command still
//! succeeds, the reason is logged at debug level, and observers get an
//! [`SessionEvent::ActionRejected`].
//!
//! [`RuntimeHandle`]: crate::api::RuntimeHandle

mod timers;

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::time::{Instant, sleep_until};
use tracing::{debug, info, trace};

use combat_core::{
    ActionError, ActorId, BoardOracle, CombatEngine, CombatEvent, CombatState, Control, Position,
    TurnBrief, movement,
};

use crate::api::{Result, SessionEvent};
use crate::policy::TacticsPolicy;
use crate::runtime::RuntimeConfig;

use timers::{TaskKind, TaskQueue};

/// Commands that can be sent to the scheduler worker.
pub(crate) enum Command {
    /// Open a combat session over the registered combatants.
    StartCombat { reply: oneshot::Sender<Result<()>> },
    /// Force-end the running session.
    EndCombat { reply: oneshot::Sender<Result<()>> },
    /// End `actor`'s turn.
    EndTurn {
        actor: ActorId,
        reply: oneshot::Sender<Result<()>>,
    },
    /// Start a move for `actor`.
    RequestMove {
        actor: ActorId,
        destination: Position,
        reply: oneshot::Sender<Result<()>>,
    },
    /// Resolve an attack from `actor` against `target`.
    RequestAttack {
        actor: ActorId,
        target: ActorId,
        reply: oneshot::Sender<Result<()>>,
    },
    /// Cells offered for `actor`'s move, for display.
    ReachableCells {
        actor: ActorId,
        reply: oneshot::Sender<Vec<Position>>,
    },
    /// Query the current combat state (read-only).
    QueryState { reply: oneshot::Sender<CombatState> },
    /// Query the current turn summary.
    QueryTurnBrief {
        reply: oneshot::Sender<Option<TurnBrief>>,
    },
}

/// Background task that processes session commands and timer deadlines.
pub(crate) struct SchedulerWorker {
    state: CombatState,
    board: Arc<dyn BoardOracle>,
    policy: Arc<dyn TacticsPolicy>,
    config: RuntimeConfig,
    /// Session epoch. Bumped when a session ends so stamped tasks scheduled
    /// before the end are recognized as stale when they fire.
    session: u64,
    tasks: TaskQueue,
    command_rx: mpsc::Receiver<Command>,
    event_tx: broadcast::Sender<SessionEvent>,
}

impl SchedulerWorker {
    pub fn new(
        state: CombatState,
        board: Arc<dyn BoardOracle>,
        policy: Arc<dyn TacticsPolicy>,
        config: RuntimeConfig,
        command_rx: mpsc::Receiver<Command>,
        event_tx: broadcast::Sender<SessionEvent>,
    ) -> Self {
        Self {
            state,
            board,
            policy,
            config,
            session: 0,
            tasks: TaskQueue::new(),
            command_rx,
            event_tx,
        }
    }

    /// Main worker loop: commands race against the soonest timer deadline.
    pub async fn run(mut self) {
        info!(
            target: "runtime::scheduler",
            combatants = self.state.combatants.len(),
            "Scheduler worker started"
        );
        loop {
            let deadline = self.tasks.next_due();
            tokio::select! {
                cmd = self.command_rx.recv() => {
                    match cmd {
                        Some(cmd) => self.handle_command(cmd).await,
                        None => break,
                    }
                }
                _ = sleep_until(deadline.unwrap_or_else(far_future)), if deadline.is_some() => {
                    self.run_due_tasks().await;
                }
            }
        }
        info!(target: "runtime::scheduler", "Scheduler worker stopped");
    }

    async fn handle_command(&mut self, cmd: Command) {
        match cmd {
            Command::StartCombat { reply } => {
                let result = self.start_combat();
                let _ = reply.send(result);
            }
            Command::EndCombat { reply } => {
                let result = self.end_combat();
                let _ = reply.send(result);
            }
            Command::EndTurn { actor, reply } => {
                let result = self.request(actor, "end_turn", |engine| engine.finish_turn(actor));
                let _ = reply.send(result);
            }
            Command::RequestMove {
                actor,
                destination,
                reply,
            } => {
                let board = Arc::clone(&self.board);
                let result = self.request(actor, "move", move |engine| {
                    engine.apply_move(board.as_ref(), actor, destination)
                });
                let _ = reply.send(result);
            }
            Command::RequestAttack {
                actor,
                target,
                reply,
            } => {
                let result =
                    self.request(actor, "attack", |engine| engine.apply_attack(actor, target));
                let _ = reply.send(result);
            }
            Command::ReachableCells { actor, reply } => {
                let _ = reply.send(self.reachable_cells(actor));
            }
            Command::QueryState { reply } => {
                let _ = reply.send(self.state.clone());
            }
            Command::QueryTurnBrief { reply } => {
                let _ = reply.send(self.state.turn_brief());
            }
        }
    }

    fn start_combat(&mut self) -> Result<()> {
        let events = CombatEngine::new(&mut self.state).start_combat()?;
        self.publish(events);
        Ok(())
    }

    fn end_combat(&mut self) -> Result<()> {
        let events = CombatEngine::new(&mut self.state).end_combat()?;
        self.publish(events);
        Ok(())
    }

    /// Runs one external action request. Rule rejections do not fail the
    /// request; they are logged and published for observers.
    fn request<F>(&mut self, actor: ActorId, action: &'static str, op: F) -> Result<()>
    where
        F: FnOnce(&mut CombatEngine<'_>) -> std::result::Result<Vec<CombatEvent>, ActionError>,
    {
        let mut engine = CombatEngine::new(&mut self.state);
        match op(&mut engine) {
            Ok(events) => self.publish(events),
            Err(error) => self.reject(actor, action, error),
        }
        Ok(())
    }

    fn reject(&mut self, actor: ActorId, action: &'static str, error: ActionError) {
        debug!(
            target: "runtime::scheduler",
            actor = %actor,
            action,
            error = %error,
            "Action rejected"
        );
        let _ = self.event_tx.send(SessionEvent::ActionRejected {
            actor,
            reason: error.to_string(),
        });
    }

    /// The cells `actor` would be offered for its move. Empty unless the
    /// actor is taking its turn with the move still unspent.
    fn reachable_cells(&self, actor: ActorId) -> Vec<Position> {
        let Some(combatant) = self.state.combatant(actor) else {
            return Vec::new();
        };
        if !combatant.can_move() || combatant.in_transit {
            return Vec::new();
        }
        movement::reachable_cells(&self.state, self.board.as_ref(), combatant)
    }

    /// Publishes engine events in order, scheduling the follow-up work each
    /// one implies.
    fn publish(&mut self, events: Vec<CombatEvent>) {
        for event in events {
            self.react(&event);
            let _ = self.event_tx.send(SessionEvent::Combat(event));
        }
    }

    fn react(&mut self, event: &CombatEvent) {
        match event {
            CombatEvent::CombatStarted { order } => {
                info!(
                    target: "runtime::scheduler",
                    session = self.session,
                    combatants = order.len(),
                    "Combat started"
                );
            }
            CombatEvent::TurnChanged { actor, .. } => {
                if self.is_policy_controlled(*actor) {
                    let delay = self.config.policy_move_delay;
                    self.schedule(delay, TaskKind::PolicyMove { actor: *actor });
                }
            }
            CombatEvent::ActorMoved { actor, .. } => {
                let delay = self.config.move_duration;
                self.schedule(delay, TaskKind::FinishMove { actor: *actor });
            }
            CombatEvent::ActorDied { actor, .. } => {
                // Corpse cleanup outlives the session; it carries no stamp.
                trace!(target: "runtime::scheduler", actor = %actor, "Corpse removal scheduled");
                self.tasks.push(
                    Instant::now() + self.config.corpse_lifetime,
                    None,
                    TaskKind::RemoveCorpse { actor: *actor },
                );
            }
            CombatEvent::CombatEnded { victor } => {
                info!(
                    target: "runtime::scheduler",
                    session = self.session,
                    victor = ?victor,
                    "Combat ended"
                );
                self.session += 1;
            }
            _ => {}
        }
    }

    /// Queues a deferred step stamped with the running session, so it is
    /// dropped unrun if the session ends first.
    fn schedule(&mut self, delay: Duration, kind: TaskKind) {
        trace!(
            target: "runtime::scheduler",
            task = ?kind,
            delay = ?delay,
            "Deferred task scheduled"
        );
        self.tasks
            .push(Instant::now() + delay, Some(self.session), kind);
    }

    async fn run_due_tasks(&mut self) {
        let now = Instant::now();
        while let Some(task) = self.tasks.pop_due(now) {
            if task.session.is_some_and(|session| session != self.session) {
                debug!(
                    target: "runtime::scheduler",
                    task = ?task.kind,
                    "Discarding stale task from an earlier session"
                );
                continue;
            }
            self.run_task(task.kind).await;
        }
    }

    async fn run_task(&mut self, kind: TaskKind) {
        match kind {
            TaskKind::PolicyMove { actor } => self.policy_move(actor).await,
            TaskKind::PolicyAttack { actor } => self.policy_attack(actor).await,
            TaskKind::FinishMove { actor } => self.finish_move(actor),
            TaskKind::RemoveCorpse { actor } => self.remove_corpse(actor),
        }
    }

    /// First half of a policy turn: approach the chosen opponent.
    ///
    /// When no move happens (nothing to gain, or the proposal was refused)
    /// the attack is scheduled directly; otherwise it follows arrival.
    async fn policy_move(&mut self, actor: ActorId) {
        if !self.holds_turn(actor) {
            debug!(target: "runtime::scheduler", actor = %actor, "Policy move skipped; turn is over");
            return;
        }
        let mut moved = false;
        if let Some(destination) = self.policy.plan_move(&self.state, actor).await {
            match CombatEngine::new(&mut self.state).apply_move(
                self.board.as_ref(),
                actor,
                destination,
            ) {
                Ok(events) => {
                    moved = true;
                    self.publish(events);
                }
                Err(error) => {
                    debug!(
                        target: "runtime::scheduler",
                        actor = %actor,
                        error = %error,
                        "Policy move refused; attacking from here"
                    );
                }
            }
        }
        if !moved {
            let delay = self.config.policy_attack_delay;
            self.schedule(delay, TaskKind::PolicyAttack { actor });
        }
    }

    /// Second half of a policy turn: strike if anything is in reach, then
    /// close the turn unless the attack already did.
    async fn policy_attack(&mut self, actor: ActorId) {
        if !self.holds_turn(actor) {
            debug!(target: "runtime::scheduler", actor = %actor, "Policy attack skipped; turn is over");
            return;
        }
        if let Some(target) = self.policy.plan_attack(&self.state, actor).await {
            match CombatEngine::new(&mut self.state).apply_attack(actor, target) {
                Ok(events) => self.publish(events),
                Err(error) => {
                    debug!(
                        target: "runtime::scheduler",
                        actor = %actor,
                        target = %target,
                        error = %error,
                        "Policy attack refused"
                    );
                }
            }
        }
        if self.holds_turn(actor) {
            match CombatEngine::new(&mut self.state).finish_turn(actor) {
                Ok(events) => self.publish(events),
                Err(error) => {
                    debug!(
                        target: "runtime::scheduler",
                        actor = %actor,
                        error = %error,
                        "Policy turn close refused"
                    );
                }
            }
        }
    }

    /// Confirms a movement interpolation that just finished.
    fn finish_move(&mut self, actor: ActorId) {
        match CombatEngine::new(&mut self.state).complete_move(actor) {
            Ok(events) => {
                self.publish(events);
                // policy turns continue with their attack once they arrive
                if self.holds_turn(actor) && self.is_policy_controlled(actor) {
                    let delay = self.config.policy_attack_delay;
                    self.schedule(delay, TaskKind::PolicyAttack { actor });
                }
            }
            Err(error) => {
                debug!(
                    target: "runtime::scheduler",
                    actor = %actor,
                    error = %error,
                    "Arrival dropped"
                );
            }
        }
    }

    /// Cosmetic cleanup: corpses never block movement, they just linger a
    /// moment before leaving the battlefield.
    fn remove_corpse(&mut self, actor: ActorId) {
        let dead = self
            .state
            .combatant(actor)
            .is_some_and(|combatant| !combatant.is_alive());
        if dead {
            self.state.combatants.remove(&actor);
            let _ = self.event_tx.send(SessionEvent::CorpseRemoved { actor });
        }
    }

    fn holds_turn(&self, actor: ActorId) -> bool {
        self.state.current_actor() == Some(actor)
            && self
                .state
                .combatant(actor)
                .is_some_and(|combatant| combatant.phase.is_active())
    }

    fn is_policy_controlled(&self, actor: ActorId) -> bool {
        self.state
            .combatant(actor)
            .is_some_and(|combatant| combatant.control == Control::Ai)
    }
}

/// Placeholder deadline for the disabled timer branch of the select loop.
fn far_future() -> Instant {
    Instant::now() + Duration::from_secs(86_400)
}
