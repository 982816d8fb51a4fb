//! Game option toggles consumed by the core.
//!
//! Each toggle swaps one rule table for its alternate version. Toggles are
//! independent of each other.

use serde::{Deserialize, Serialize};

/// Alternate-rule toggles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct GameOptions {
    /// Hip hits subtract 2 MP instead of halving, and actuators on a
    /// hip-damaged leg still count.
    pub tacops_leg_damage: bool,
    /// Finer-grained heat table extending the MP penalty up to 9.
    pub tacops_heat: bool,
    /// Allow sprinting for legged walkers.
    pub tacops_sprint: bool,
    /// Disable through-armor critical checks.
    pub no_tac: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_standard_rules() {
        let options = GameOptions::default();
        assert!(!options.tacops_leg_damage);
        assert!(!options.tacops_heat);
        assert!(!options.tacops_sprint);
        assert!(!options.no_tac);
    }

    #[test]
    fn test_partial_ron_uses_defaults() {
        let options: GameOptions = ron::from_str("(tacops_heat: true)").unwrap();
        assert!(options.tacops_heat);
        assert!(!options.no_tac);
    }
}
