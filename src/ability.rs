//! Ability records.
//!
//! Only the parts of an ability that formulas read live here: its id and
//! its mastery threshold table, plus the cost fields that cost formulas
//! usually sit next to.

use crate::id::{AbilityId, DerivedStatId};
use serde::{Deserialize, Serialize};

fn default_thresholds() -> Vec<i32> {
    vec![0]
}

/// An ability as seen by the formula engine.
///
/// # Examples
///
/// ```rust
/// use zzformula::Ability;
///
/// let fireball = Ability::new("fireball").with_thresholds(vec![10, 25, 60]);
/// assert_eq!(fireball.mastery_threshold(0), Some(10));
/// assert_eq!(fireball.mastery_threshold(7), Some(60)); // clamped to the last entry
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ability {
    pub id: AbilityId,
    /// Ordered per-level thresholds, indexed by mastery level.
    #[serde(default = "default_thresholds")]
    pub mastery_thresholds: Vec<i32>,
    /// Resource pool paid from when the ability is used.
    #[serde(default)]
    pub stat_used: Option<DerivedStatId>,
    #[serde(default)]
    pub cost: i32,
    /// Cooldown in turns.
    #[serde(default)]
    pub cooldown: f64,
}

impl Ability {
    /// Create an ability with the default threshold table `[0]`.
    pub fn new(id: impl Into<AbilityId>) -> Self {
        Self {
            id: id.into(),
            mastery_thresholds: default_thresholds(),
            stat_used: None,
            cost: 0,
            cooldown: 0.0,
        }
    }

    pub fn with_thresholds(mut self, thresholds: Vec<i32>) -> Self {
        self.mastery_thresholds = thresholds;
        self
    }

    pub fn with_cost(mut self, stat_used: impl Into<DerivedStatId>, cost: i32) -> Self {
        self.stat_used = Some(stat_used.into());
        self.cost = cost;
        self
    }

    pub fn with_cooldown(mut self, cooldown: f64) -> Self {
        self.cooldown = cooldown;
        self
    }

    /// Threshold for a mastery level, with the level clamped into the
    /// table. `None` only when the table is empty.
    pub fn mastery_threshold(&self, level: u32) -> Option<i32> {
        let last = self.mastery_thresholds.len().checked_sub(1)?;
        let index = usize::try_from(level).unwrap_or(usize::MAX).min(last);
        self.mastery_thresholds.get(index).copied()
    }
}
