//! Combatant state: identity, stats, and the per-turn state machine.

use crate::config::CoreConfig;
use crate::damage;

use super::{ActionSet, ActorId, Position, ResourceMeter};

/// Side a combatant fights for. The end condition and hostility checks key
/// off this, not off who supplies the combatant's actions.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Team {
    #[default]
    Player,
    Enemy,
}

impl Team {
    /// Two-sided combat: everyone not on your team is hostile.
    pub fn is_hostile_to(&self, other: &Team) -> bool {
        self != other
    }
}

/// Who drives a combatant's turns: external commands or the tactics policy.
///
/// Kept separate from [`Team`] so a policy-driven ally or an externally
/// puppeted enemy stays expressible.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Control {
    #[default]
    Player,
    Ai,
}

/// Offensive and defensive numbers. Speed decides initiative order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatStats {
    pub attack: u32,
    pub defense: u32,
    pub speed: u32,
}

impl Default for CombatStats {
    fn default() -> Self {
        Self {
            attack: CoreConfig::DEFAULT_ATTACK,
            defense: CoreConfig::DEFAULT_DEFENSE,
            speed: CoreConfig::DEFAULT_SPEED,
        }
    }
}

/// Bundle granted to external collaborators when this combatant dies.
///
/// Carried in the death notification; nothing in the combat rules reads it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rewards {
    pub experience: u32,
    pub gold: u32,
}

/// Per-turn state machine.
///
/// A single tagged value instead of independent `active`/`moved`/`attacked`/
/// `dead` flags, so contradictory combinations (active and dead at once)
/// cannot be represented. `Dead` is absorbing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TurnPhase {
    /// Not this combatant's turn.
    #[default]
    Idle,
    /// Taking its turn; each flag records one spent action.
    Active { moved: bool, attacked: bool },
    /// Out of combat permanently.
    Dead,
}

impl TurnPhase {
    pub fn is_active(&self) -> bool {
        matches!(self, TurnPhase::Active { .. })
    }

    pub fn is_dead(&self) -> bool {
        matches!(self, TurnPhase::Dead)
    }
}

/// One combat participant.
///
/// Fields are public for inspection; mutation during combat goes through
/// [`crate::engine::CombatEngine`], which is the only place the scheduling
/// invariants are enforced.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Combatant {
    pub id: ActorId,
    pub name: String,
    pub team: Team,
    pub control: Control,
    pub health: ResourceMeter,
    pub stats: CombatStats,
    /// Move budget in cells per turn.
    pub move_range: u32,
    /// Attack reach in cells.
    pub attack_range: u32,
    pub position: Position,
    /// Recorded when combat starts; survivors return here when it ends.
    pub home: Position,
    pub phase: TurnPhase,
    /// A movement interpolation is running for this combatant.
    ///
    /// At most one move may be in flight per combatant; the `moved` flag is
    /// only set when the interpolation finishes.
    pub in_transit: bool,
    pub rewards: Rewards,
}

impl Combatant {
    pub fn builder(id: ActorId, name: impl Into<String>) -> CombatantBuilder {
        CombatantBuilder::new(id, name)
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        !self.phase.is_dead()
    }

    /// Action gate for movement: taking a turn and the move not yet spent.
    ///
    /// Pure. A move already in flight is tracked separately via
    /// `in_transit` because the move is only *spent* on arrival.
    pub fn can_move(&self) -> bool {
        matches!(self.phase, TurnPhase::Active { moved: false, .. })
    }

    /// Action gate for attacking: taking a turn and the attack not yet spent.
    ///
    /// Pure.
    pub fn can_attack(&self) -> bool {
        matches!(self.phase, TurnPhase::Active { attacked: false, .. })
    }

    /// Remaining action availability, for display.
    pub fn available_actions(&self) -> ActionSet {
        let mut set = ActionSet::empty();
        if self.can_move() {
            set |= ActionSet::MOVE;
        }
        if self.can_attack() {
            set |= ActionSet::ATTACK;
        }
        set
    }

    /// Both per-turn actions are spent.
    pub fn turn_spent(&self) -> bool {
        matches!(
            self.phase,
            TurnPhase::Active {
                moved: true,
                attacked: true,
            }
        )
    }

    /// Begins this combatant's turn with fresh action flags.
    pub fn activate(&mut self) {
        if !self.phase.is_dead() {
            self.phase = TurnPhase::Active {
                moved: false,
                attacked: false,
            };
        }
    }

    /// Ends this combatant's turn. Death is never undone here.
    pub fn deactivate(&mut self) {
        if !self.phase.is_dead() {
            self.phase = TurnPhase::Idle;
        }
    }

    /// Records the move action as spent for this turn.
    pub fn mark_moved(&mut self) {
        if let TurnPhase::Active { attacked, .. } = self.phase {
            self.phase = TurnPhase::Active {
                moved: true,
                attacked,
            };
        }
    }

    /// Records the attack action as spent for this turn.
    pub fn mark_attacked(&mut self) {
        if let TurnPhase::Active { moved, .. } = self.phase {
            self.phase = TurnPhase::Active {
                moved,
                attacked: true,
            };
        }
    }

    /// Applies incoming damage and returns the effective amount dealt.
    ///
    /// Defense reduces the hit but never below the global damage floor.
    /// Reaching zero health kills the combatant in the same step.
    pub fn take_damage(&mut self, amount: u32) -> u32 {
        let effective = damage::effective_damage(amount, self.stats.defense);
        if self.health.deplete(effective) == 0 {
            self.die();
        }
        effective
    }

    /// Transitions to `Dead`. Absorbing: every later transition keeps it.
    pub fn die(&mut self) {
        self.phase = TurnPhase::Dead;
        self.in_transit = false;
    }
}

/// Builder for [`Combatant`] with the default parameter set from
/// [`CoreConfig`].
///
/// `team` also selects the matching default control (enemies are
/// policy-driven, players externally driven); call [`control`] afterwards to
/// decouple them.
///
/// [`control`]: CombatantBuilder::control
pub struct CombatantBuilder {
    combatant: Combatant,
}

impl CombatantBuilder {
    pub fn new(id: ActorId, name: impl Into<String>) -> Self {
        Self {
            combatant: Combatant {
                id,
                name: name.into(),
                team: Team::Player,
                control: Control::Player,
                health: ResourceMeter::full(CoreConfig::DEFAULT_MAX_HEALTH),
                stats: CombatStats::default(),
                move_range: CoreConfig::DEFAULT_MOVE_RANGE,
                attack_range: CoreConfig::DEFAULT_ATTACK_RANGE,
                position: Position::ORIGIN,
                home: Position::ORIGIN,
                phase: TurnPhase::Idle,
                in_transit: false,
                rewards: Rewards::default(),
            },
        }
    }

    pub fn team(mut self, team: Team) -> Self {
        self.combatant.team = team;
        self.combatant.control = match team {
            Team::Player => Control::Player,
            Team::Enemy => Control::Ai,
        };
        self
    }

    pub fn control(mut self, control: Control) -> Self {
        self.combatant.control = control;
        self
    }

    pub fn health(mut self, maximum: u32) -> Self {
        self.combatant.health = ResourceMeter::full(maximum);
        self
    }

    pub fn attack(mut self, attack: u32) -> Self {
        self.combatant.stats.attack = attack;
        self
    }

    pub fn defense(mut self, defense: u32) -> Self {
        self.combatant.stats.defense = defense;
        self
    }

    pub fn speed(mut self, speed: u32) -> Self {
        self.combatant.stats.speed = speed;
        self
    }

    pub fn move_range(mut self, cells: u32) -> Self {
        self.combatant.move_range = cells;
        self
    }

    pub fn attack_range(mut self, cells: u32) -> Self {
        self.combatant.attack_range = cells;
        self
    }

    pub fn position(mut self, position: Position) -> Self {
        self.combatant.position = position;
        self.combatant.home = position;
        self
    }

    pub fn rewards(mut self, experience: u32, gold: u32) -> Self {
        self.combatant.rewards = Rewards { experience, gold };
        self
    }

    pub fn build(self) -> Combatant {
        self.combatant
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fresh(id: u32) -> Combatant {
        Combatant::builder(ActorId(id), format!("fighter-{id}")).build()
    }

    #[test]
    fn gates_closed_while_idle() {
        let c = fresh(1);
        assert!(!c.can_move());
        assert!(!c.can_attack());
    }

    #[test]
    fn gates_open_on_activation_and_close_per_action() {
        let mut c = fresh(1);
        c.activate();
        assert!(c.can_move());
        assert!(c.can_attack());

        c.mark_moved();
        assert!(!c.can_move());
        assert!(c.can_attack());
        assert!(!c.turn_spent());

        c.mark_attacked();
        assert!(!c.can_attack());
        assert!(c.turn_spent());
    }

    #[test]
    fn gates_do_not_mutate() {
        let mut c = fresh(1);
        c.activate();
        let before = c.clone();
        let _ = c.can_move();
        let _ = c.can_attack();
        let _ = c.turn_spent();
        assert_eq!(c, before);
    }

    #[test]
    fn damage_is_reduced_by_defense() {
        let mut c = Combatant::builder(ActorId(1), "tank")
            .health(100)
            .defense(5)
            .build();
        let dealt = c.take_damage(20);
        assert_eq!(dealt, 15);
        assert_eq!(c.health.current(), 85);
        assert!(c.is_alive());
    }

    #[test]
    fn damage_never_drops_below_one() {
        let mut c = Combatant::builder(ActorId(1), "turtle")
            .health(10)
            .defense(20)
            .build();
        let dealt = c.take_damage(5);
        assert_eq!(dealt, 1);
        assert_eq!(c.health.current(), 9);
    }

    #[test]
    fn lethal_damage_kills_in_the_same_step() {
        let mut c = Combatant::builder(ActorId(1), "wisp")
            .health(10)
            .defense(0)
            .build();
        c.activate();
        c.in_transit = true;
        c.take_damage(50);
        assert_eq!(c.health.current(), 0);
        assert!(c.phase.is_dead());
        assert!(!c.in_transit);
    }

    #[test]
    fn death_is_absorbing() {
        let mut c = fresh(1);
        c.die();
        c.activate();
        assert!(c.phase.is_dead());

        c.deactivate();
        c.mark_moved();
        c.mark_attacked();
        assert!(c.phase.is_dead());
        assert!(!c.can_move());
        assert!(!c.can_attack());
    }

    #[test]
    fn team_selects_default_control() {
        let goblin = Combatant::builder(ActorId(2), "goblin")
            .team(Team::Enemy)
            .build();
        assert_eq!(goblin.control, Control::Ai);

        let puppet = Combatant::builder(ActorId(3), "puppet")
            .team(Team::Enemy)
            .control(Control::Player)
            .build();
        assert_eq!(puppet.control, Control::Player);
    }

    #[test]
    fn hostility_is_team_inequality() {
        assert!(Team::Player.is_hostile_to(&Team::Enemy));
        assert!(Team::Enemy.is_hostile_to(&Team::Player));
        assert!(!Team::Player.is_hostile_to(&Team::Player));
    }
}
