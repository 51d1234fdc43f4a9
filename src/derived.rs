//! Derived stat definitions.
//!
//! A derived stat (max HP, crit chance, ...) is computed from core stats by
//! an ordered list of weighted modifiers. Each modifier reads one core stat,
//! multiplies it by an integer weight, and folds the result into a running
//! value with its operator. The running value starts at `0.0`.

use crate::character::CoreStats;
use crate::id::{DerivedStatId, StatId};
use crate::numeric::approximately;
use serde::{Deserialize, Serialize};

/// How a modifier's term combines with the running value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModifierOp {
    Addition,
    Subtraction,
    Multiplication,
    Division,
}

/// One weighted core-stat term of a derived stat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatModifier {
    /// The core stat read by this term. Missing stats read as `0`.
    pub stat: StatId,
    /// Integer weight applied to the core stat value.
    pub weight: i32,
    /// Operator folding `stat * weight` into the running value.
    pub op: ModifierOp,
}

impl StatModifier {
    pub fn new(stat: impl Into<StatId>, weight: i32, op: ModifierOp) -> Self {
        Self {
            stat: stat.into(),
            weight,
            op,
        }
    }
}

/// Definition of a derived stat.
///
/// # Examples
///
/// ```rust
/// use zzformula::{CharacterData, DerivedStat, ModifierOp};
///
/// // MAX_HP = CON * 10 + STR * 2
/// let max_hp = DerivedStat::new("MAX_HP")
///     .with_modifier("CON", 10, ModifierOp::Addition)
///     .with_modifier("STR", 2, ModifierOp::Addition);
///
/// let data = CharacterData::new("hero")
///     .with_core_stat("CON", 12)
///     .with_core_stat("STR", 8);
///
/// assert_eq!(max_hp.evaluate(&data), 136.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedStat {
    pub id: DerivedStatId,
    #[serde(default)]
    pub modifiers: Vec<StatModifier>,
}

impl DerivedStat {
    /// Create a derived stat with no modifiers (evaluates to `0.0`).
    pub fn new(id: impl Into<DerivedStatId>) -> Self {
        Self {
            id: id.into(),
            modifiers: Vec::new(),
        }
    }

    /// Append a modifier, builder style.
    pub fn with_modifier(mut self, stat: impl Into<StatId>, weight: i32, op: ModifierOp) -> Self {
        self.modifiers.push(StatModifier::new(stat, weight, op));
        self
    }

    /// Fold the modifiers over the given core stats.
    ///
    /// A division by a zero term is logged and the whole stat evaluates
    /// to `0.0`.
    pub fn evaluate(&self, stats: &dyn CoreStats) -> f64 {
        let mut value = 0.0;
        for modifier in &self.modifiers {
            let base = stats.core_stat(&modifier.stat).unwrap_or(0);
            let term = f64::from(base) * f64::from(modifier.weight);
            value = match modifier.op {
                ModifierOp::Addition => value + term,
                ModifierOp::Subtraction => value - term,
                ModifierOp::Multiplication => value * term,
                ModifierOp::Division => {
                    if approximately(term, 0.0) {
                        tracing::error!(
                            derived_stat = %self.id,
                            stat = %modifier.stat,
                            "division by zero while computing derived stat"
                        );
                        return 0.0;
                    }
                    value / term
                }
            };
        }
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::CharacterData;

    fn data() -> CharacterData {
        CharacterData::new("test")
            .with_core_stat("STR", 10)
            .with_core_stat("DEX", 4)
    }

    #[test]
    fn test_empty_derived_stat_is_zero() {
        assert_eq!(DerivedStat::new("EMPTY").evaluate(&data()), 0.0);
    }

    #[test]
    fn test_modifiers_apply_in_order() {
        // ((0 + 10*3) - 4*1) * (4*2) = 26 * 8
        let stat = DerivedStat::new("ATK")
            .with_modifier("STR", 3, ModifierOp::Addition)
            .with_modifier("DEX", 1, ModifierOp::Subtraction)
            .with_modifier("DEX", 2, ModifierOp::Multiplication);
        assert_eq!(stat.evaluate(&data()), 208.0);
    }

    #[test]
    fn test_division_modifier() {
        let stat = DerivedStat::new("RATIO")
            .with_modifier("STR", 2, ModifierOp::Addition)
            .with_modifier("DEX", 1, ModifierOp::Division);
        assert_eq!(stat.evaluate(&data()), 5.0);
    }

    #[test]
    fn test_division_by_missing_stat_yields_zero() {
        let stat = DerivedStat::new("BROKEN")
            .with_modifier("STR", 1, ModifierOp::Addition)
            .with_modifier("LUCK", 1, ModifierOp::Division);
        assert_eq!(stat.evaluate(&data()), 0.0);
    }

    #[test]
    fn test_missing_stat_reads_as_zero() {
        let stat = DerivedStat::new("X").with_modifier("WIS", 5, ModifierOp::Addition);
        assert_eq!(stat.evaluate(&data()), 0.0);
    }
}
