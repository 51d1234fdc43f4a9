//! Evaluation context.
//!
//! The `EvalContext` carries the domain objects that lookup nodes read
//! (a character, raw character data, an ability) plus a free-form key/value
//! map for game-specific extras. The core never mutates it; every node in a
//! tree sees the same context.

use crate::ability::Ability;
use crate::character::{Character, CharacterData, CharacterSheet, CoreStats};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// One positional argument passed to [`EvalContext::from_args`].
#[derive(Clone, Copy)]
pub enum ContextArg<'a> {
    Character(&'a dyn CharacterSheet),
    CharacterData(&'a dyn CoreStats),
    Ability(&'a Ability),
}

impl<'a> From<&'a Character> for ContextArg<'a> {
    fn from(character: &'a Character) -> Self {
        ContextArg::Character(character)
    }
}

impl<'a> From<&'a CharacterData> for ContextArg<'a> {
    fn from(data: &'a CharacterData) -> Self {
        ContextArg::CharacterData(data)
    }
}

impl<'a> From<&'a Ability> for ContextArg<'a> {
    fn from(ability: &'a Ability) -> Self {
        ContextArg::Ability(ability)
    }
}

impl ContextArg<'_> {
    fn kind(&self) -> &'static str {
        match self {
            ContextArg::Character(_) => "character",
            ContextArg::CharacterData(_) => "character_data",
            ContextArg::Ability(_) => "ability",
        }
    }
}

fn fill<'a, T: ?Sized>(slot: &mut Option<&'a T>, value: &'a T) -> bool {
    if slot.is_some() {
        return false;
    }
    *slot = Some(value);
    true
}

/// Context passed through every `evaluate` call.
///
/// # Examples
///
/// ```rust
/// use zzformula::{Ability, Character, CharacterData, EvalContext};
///
/// let hero = Character::new(CharacterData::new("hero"));
/// let fireball = Ability::new("fireball");
///
/// let context = EvalContext::from_args([(&hero).into(), (&fireball).into()]);
/// assert!(context.character().is_some());
/// assert_eq!(context.ability().map(|a| a.id.as_str()), Some("fireball"));
/// ```
#[derive(Clone, Default)]
pub struct EvalContext<'a> {
    character: Option<&'a dyn CharacterSheet>,
    character_data: Option<&'a dyn CoreStats>,
    ability: Option<&'a Ability>,
    data: HashMap<String, serde_json::Value>,
}

impl<'a> EvalContext<'a> {
    /// Create an empty context. Lookup nodes evaluate to `0.0` against it.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a context from positional arguments.
    ///
    /// The first argument of each kind wins; later arguments of the same
    /// kind are ignored. Callers are expected to pass at most one character
    /// and one ability per call.
    ///
    /// ```rust
    /// use zzformula::{Ability, EvalContext};
    ///
    /// let first = Ability::new("first");
    /// let second = Ability::new("second");
    ///
    /// let context = EvalContext::from_args([(&first).into(), (&second).into()]);
    /// assert_eq!(context.ability().unwrap().id.as_str(), "first");
    /// ```
    pub fn from_args(args: impl IntoIterator<Item = ContextArg<'a>>) -> Self {
        let mut context = Self::new();
        for arg in args {
            let accepted = match arg {
                ContextArg::Character(c) => fill(&mut context.character, c),
                ContextArg::CharacterData(d) => fill(&mut context.character_data, d),
                ContextArg::Ability(a) => fill(&mut context.ability, a),
            };
            if !accepted {
                tracing::debug!(kind = arg.kind(), "ignoring duplicate context argument");
            }
        }
        context
    }

    pub fn with_character(mut self, character: &'a dyn CharacterSheet) -> Self {
        self.character = Some(character);
        self
    }

    pub fn with_character_data(mut self, data: &'a dyn CoreStats) -> Self {
        self.character_data = Some(data);
        self
    }

    pub fn with_ability(mut self, ability: &'a Ability) -> Self {
        self.ability = Some(ability);
        self
    }

    pub fn character(&self) -> Option<&'a dyn CharacterSheet> {
        self.character
    }

    pub fn character_data(&self) -> Option<&'a dyn CoreStats> {
        self.character_data
    }

    pub fn ability(&self) -> Option<&'a Ability> {
        self.ability
    }

    /// Set an extra value. Values that fail to serialize are not stored.
    pub fn set(&mut self, key: impl Into<String>, value: impl Serialize) {
        if let Ok(json_value) = serde_json::to_value(value) {
            self.data.insert(key.into(), json_value);
        }
    }

    /// Read an extra value back, `None` if missing or of another type.
    pub fn get<T: for<'de> Deserialize<'de>>(&self, key: &str) -> Option<T> {
        self.data
            .get(key)
            .and_then(|v| T::deserialize(v).ok())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }
}

impl fmt::Debug for EvalContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EvalContext")
            .field("character", &self.character.is_some())
            .field("character_data", &self.character_data.is_some())
            .field("ability", &self.ability.map(|a| a.id.as_str()))
            .field("data", &self.data)
            .finish()
    }
}
