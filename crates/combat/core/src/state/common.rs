use std::fmt;

/// Unique identifier for a combat participant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActorId(pub u32);

impl ActorId {
    pub const fn new(value: u32) -> Self {
        Self(value)
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Discrete grid position expressed in cell coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const ORIGIN: Self = Self { x: 0, y: 0 };

    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Squared straight-line distance in cells.
    ///
    /// Kept squared so range checks compare against `range * range`
    /// without leaving integer arithmetic.
    pub fn distance_squared(self, other: Position) -> u64 {
        let dx = (self.x - other.x) as i64;
        let dy = (self.y - other.y) as i64;
        (dx * dx + dy * dy) as u64
    }

    /// Manhattan distance in cells (`|dx| + |dy|`).
    pub fn manhattan_distance(self, other: Position) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::ORIGIN
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Integer resource meter (health) tracked per combatant.
///
/// Invariant: `current <= maximum`. All mutation goes through the clamping
/// helpers below.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResourceMeter {
    current: u32,
    maximum: u32,
}

impl ResourceMeter {
    /// Creates a full meter.
    pub fn full(maximum: u32) -> Self {
        Self {
            current: maximum,
            maximum,
        }
    }

    /// Creates a meter with an explicit current value, clamped to `maximum`.
    pub fn new(current: u32, maximum: u32) -> Self {
        Self {
            current: current.min(maximum),
            maximum,
        }
    }

    pub fn current(&self) -> u32 {
        self.current
    }

    pub fn maximum(&self) -> u32 {
        self.maximum
    }

    pub fn is_depleted(&self) -> bool {
        self.current == 0
    }

    /// Subtracts `amount`, floor-clamped at 0. Returns the new current value.
    pub fn deplete(&mut self, amount: u32) -> u32 {
        self.current = self.current.saturating_sub(amount);
        self.current
    }

    /// Adds `amount`, ceiling-clamped at `maximum`. Returns the new current value.
    pub fn restore(&mut self, amount: u32) -> u32 {
        self.current = self.current.saturating_add(amount).min(self.maximum);
        self.current
    }
}
