//! Deterministic turn-based combat logic shared across front-ends.
//!
//! `combat-core` defines the canonical rules: the per-combatant state
//! machine, initiative order, movement legality, damage, and the default
//! tactics math. All state mutation flows through [`engine::CombatEngine`],
//! which returns the [`events::CombatEvent`]s each transition produced so
//! outer layers can publish them without re-deriving what happened.
pub mod board;
pub mod config;
pub mod damage;
pub mod engine;
pub mod events;
pub mod movement;
pub mod state;
pub mod tactics;

pub use board::{BoardOracle, GridBoard, GridDimensions};
pub use config::CoreConfig;
pub use engine::{ActionError, CombatEngine, SchedulerError};
pub use events::CombatEvent;
pub use movement::MoveError;
pub use state::{
    ActionSet, ActorId, CombatStats, CombatState, Combatant, CombatantBuilder, Control, Position,
    ResourceMeter, Rewards, Team, TurnBrief, TurnOrder, TurnPhase,
};
