//! Damage calculation.

/// Floor for any landed attack. Defense can weaken a hit but never
/// nullify it.
pub const MIN_DAMAGE: u32 = 1;

/// Calculate the effective damage of an attack.
///
/// # Formula
///
/// ```text
/// effective = max(MIN_DAMAGE, amount - defense)
/// ```
pub fn effective_damage(amount: u32, defense: u32) -> u32 {
    amount.saturating_sub(defense).max(MIN_DAMAGE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defense_reduces_damage() {
        assert_eq!(effective_damage(20, 5), 15);
    }

    #[test]
    fn overwhelming_defense_still_leaks_one_point() {
        assert_eq!(effective_damage(5, 20), 1);
        assert_eq!(effective_damage(0, 0), 1);
    }
}
