//! Character data consulted by the lookup nodes.
//!
//! The expression engine only talks to characters through two traits:
//! [`CoreStats`] (raw stat lookup) and [`CharacterSheet`] (derived stats and
//! ability mastery on top of that). [`CharacterData`] and [`Character`] are
//! the in-crate implementations; game code is free to implement the traits
//! on its own entity types instead.

use crate::derived::DerivedStat;
use crate::error::FormulaError;
use crate::id::{AbilityId, DerivedStatId, StatId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Read access to a character's core stats.
pub trait CoreStats: Send + Sync {
    /// The value of a core stat, or `None` if the character does not have it.
    fn core_stat(&self, stat: &StatId) -> Option<i32>;
}

/// A full character: core stats plus derived stats and ability mastery.
pub trait CharacterSheet: CoreStats {
    /// Compute a derived stat for this character, including any stored
    /// adjustment for it.
    fn derived_stat(&self, stat: &DerivedStat) -> f64;

    /// The character's mastery level for an ability, or `None` if the
    /// ability has not been unlocked.
    fn mastery_level(&self, ability: &AbilityId) -> Option<u32>;
}

/// Static, authored character data: core stats and derived-stat adjustments.
///
/// # Examples
///
/// ```rust
/// use zzformula::{CharacterData, CoreStats, StatId};
///
/// let data = CharacterData::new("goblin")
///     .with_core_stat("STR", 6)
///     .with_core_stat("DEX", 14);
///
/// assert_eq!(data.core_stat(&StatId::new("DEX")), Some(14));
/// assert_eq!(data.core_stat(&StatId::new("INT")), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CharacterData {
    pub id: String,
    #[serde(default)]
    core_stats: HashMap<StatId, i32>,
    #[serde(default)]
    derived_adjustments: HashMap<DerivedStatId, i32>,
}

impl CharacterData {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// Build character data from authored stat lists, rejecting duplicates.
    ///
    /// ```rust
    /// use zzformula::{CharacterData, DerivedStatId, FormulaError, StatId};
    ///
    /// let err = CharacterData::from_entries(
    ///     "hero",
    ///     [(StatId::new("STR"), 5), (StatId::new("STR"), 7)],
    ///     Vec::<(DerivedStatId, i32)>::new(),
    /// )
    /// .unwrap_err();
    /// assert_eq!(err, FormulaError::DuplicateStat("STR".into()));
    /// ```
    pub fn from_entries(
        id: impl Into<String>,
        core_stats: impl IntoIterator<Item = (StatId, i32)>,
        derived_adjustments: impl IntoIterator<Item = (DerivedStatId, i32)>,
    ) -> Result<Self, FormulaError> {
        let mut data = Self::new(id);
        for (stat, value) in core_stats {
            if data.core_stats.contains_key(&stat) {
                return Err(FormulaError::DuplicateStat(stat.to_string()));
            }
            data.core_stats.insert(stat, value);
        }
        for (stat, value) in derived_adjustments {
            if data.derived_adjustments.contains_key(&stat) {
                return Err(FormulaError::DuplicateStat(stat.to_string()));
            }
            data.derived_adjustments.insert(stat, value);
        }
        Ok(data)
    }

    /// Set a core stat, builder style. Later values overwrite earlier ones.
    pub fn with_core_stat(mut self, stat: impl Into<StatId>, value: i32) -> Self {
        self.core_stats.insert(stat.into(), value);
        self
    }

    /// Set a stored adjustment for a derived stat, builder style.
    pub fn with_derived_adjustment(mut self, stat: impl Into<DerivedStatId>, value: i32) -> Self {
        self.derived_adjustments.insert(stat.into(), value);
        self
    }

    pub fn core_stats(&self) -> &HashMap<StatId, i32> {
        &self.core_stats
    }

    /// Stored adjustment for a derived stat (`0` when none is stored).
    pub fn derived_adjustment(&self, stat: &DerivedStatId) -> i32 {
        self.derived_adjustments.get(stat).copied().unwrap_or(0)
    }
}

impl CoreStats for CharacterData {
    fn core_stat(&self, stat: &StatId) -> Option<i32> {
        self.core_stats.get(stat).copied()
    }
}

/// A live character: authored data plus per-ability mastery progression.
///
/// # Examples
///
/// ```rust
/// use zzformula::{AbilityId, Character, CharacterData, CharacterSheet};
///
/// let mut hero = Character::new(CharacterData::new("hero"));
/// let fireball = AbilityId::new("fireball");
///
/// hero.add_ability(fireball.clone());
/// hero.level_up_ability(&fireball).unwrap();
/// assert_eq!(hero.mastery_level(&fireball), Some(1));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Character {
    data: CharacterData,
    #[serde(default)]
    abilities: HashMap<AbilityId, u32>,
}

impl Character {
    pub fn new(data: CharacterData) -> Self {
        Self {
            data,
            abilities: HashMap::new(),
        }
    }

    pub fn data(&self) -> &CharacterData {
        &self.data
    }

    pub fn abilities(&self) -> &HashMap<AbilityId, u32> {
        &self.abilities
    }

    /// Unlock an ability at mastery level 0.
    ///
    /// Returns `false` (and keeps the current level) if the ability was
    /// already unlocked.
    pub fn add_ability(&mut self, ability: AbilityId) -> bool {
        if self.abilities.contains_key(&ability) {
            return false;
        }
        self.abilities.insert(ability, 0);
        true
    }

    /// Raise the mastery level of an unlocked ability by one.
    ///
    /// Returns the new level, or [`FormulaError::UnknownAbility`] if the
    /// character has not unlocked it.
    pub fn level_up_ability(&mut self, ability: &AbilityId) -> Result<u32, FormulaError> {
        match self.abilities.get_mut(ability) {
            Some(level) => {
                *level = level.saturating_add(1);
                Ok(*level)
            }
            None => {
                tracing::error!(character = %self.data.id, ability = %ability, "ability does not exist");
                Err(FormulaError::UnknownAbility(ability.clone()))
            }
        }
    }
}

impl CoreStats for Character {
    fn core_stat(&self, stat: &StatId) -> Option<i32> {
        self.data.core_stat(stat)
    }
}

impl CharacterSheet for Character {
    fn derived_stat(&self, stat: &DerivedStat) -> f64 {
        stat.evaluate(&self.data) + f64::from(self.data.derived_adjustment(&stat.id))
    }

    fn mastery_level(&self, ability: &AbilityId) -> Option<u32> {
        self.abilities.get(ability).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::derived::ModifierOp;

    #[test]
    fn test_core_stat_lookup() {
        let data = CharacterData::new("c").with_core_stat("STR", 12);
        let character = Character::new(data);
        assert_eq!(character.core_stat(&StatId::new("STR")), Some(12));
        assert_eq!(character.core_stat(&StatId::new("DEX")), None);
    }

    #[test]
    fn test_derived_stat_includes_adjustment() {
        let data = CharacterData::new("c")
            .with_core_stat("CON", 10)
            .with_derived_adjustment("MAX_HP", 15);
        let character = Character::new(data);
        let max_hp = DerivedStat::new("MAX_HP").with_modifier("CON", 5, ModifierOp::Addition);

        assert_eq!(character.derived_stat(&max_hp), 65.0);
    }

    #[test]
    fn test_derived_stat_without_adjustment() {
        let character = Character::new(CharacterData::new("c").with_core_stat("CON", 2));
        let max_hp = DerivedStat::new("MAX_HP").with_modifier("CON", 5, ModifierOp::Addition);
        assert_eq!(character.derived_stat(&max_hp), 10.0);
    }

    #[test]
    fn test_add_ability_twice_keeps_level() {
        let mut character = Character::default();
        let dash = AbilityId::new("dash");

        assert!(character.add_ability(dash.clone()));
        character.level_up_ability(&dash).unwrap();
        assert!(!character.add_ability(dash.clone()));
        assert_eq!(character.mastery_level(&dash), Some(1));
    }

    #[test]
    fn test_level_up_unknown_ability() {
        let mut character = Character::default();
        let err = character
            .level_up_ability(&AbilityId::new("fly"))
            .unwrap_err();
        assert_eq!(err, FormulaError::UnknownAbility(AbilityId::new("fly")));
    }

    #[test]
    fn test_from_entries_rejects_duplicate_adjustment() {
        let err = CharacterData::from_entries(
            "c",
            [(StatId::new("STR"), 1)],
            [
                (DerivedStatId::new("MAX_HP"), 1),
                (DerivedStatId::new("MAX_HP"), 2),
            ],
        )
        .unwrap_err();
        assert_eq!(err, FormulaError::DuplicateStat("MAX_HP".to_string()));
    }

    #[test]
    fn test_character_data_json() {
        let data = CharacterData::new("orc").with_core_stat("STR", 16);
        let json = serde_json::to_string(&data).unwrap();
        let back: CharacterData = serde_json::from_str(&json).unwrap();
        assert_eq!(back, data);
    }
}
