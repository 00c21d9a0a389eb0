/// Combat configuration constants and default combatant parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CoreConfig;

impl CoreConfig {
    // ===== compile-time constants used as type parameters =====
    /// Maximum number of combatants in a single session's initiative order.
    pub const MAX_COMBATANTS: usize = 16;

    // ===== default combatant parameters =====
    pub const DEFAULT_MAX_HEALTH: u32 = 100;
    pub const DEFAULT_ATTACK: u32 = 20;
    pub const DEFAULT_DEFENSE: u32 = 5;
    pub const DEFAULT_SPEED: u32 = 10;
    /// Move budget in cells per turn.
    pub const DEFAULT_MOVE_RANGE: u32 = 3;
    /// Attack reach in cells.
    pub const DEFAULT_ATTACK_RANGE: u32 = 1;
}
