//! # zzformula - Expression Trees for RPG Formulas
//!
//! A small, deterministic engine for the numbers an RPG computes at
//! runtime: damage, healing, resource costs, scaling thresholds.
//!
//! - **Tree-shaped**: formulas are trees of arithmetic nodes, authored as
//!   data (JSON) rather than code
//! - **Hardcode-free**: no built-in stat names; stats are looked up by id
//! - **Total**: evaluation never fails, bad configuration degrades to `0.0`
//!   plus a log line
//! - **Pure**: no hidden state, the same tree and context give the same value
//!
//! ## Core Concepts
//!
//! ```text
//! [EvalContext] → [Expression tree] → f64
//!                  (Formula = ordered list of trees, last one wins)
//! ```
//!
//! 1. **Expressions** are nodes: constants, arithmetic combinators, and
//!    lookups into the character/ability carried by the context
//! 2. **Formulas** name an ordered list of expressions
//! 3. **Libraries** hold every formula a game ships with, keyed by name
//!
//! ## Example
//!
//! ```rust
//! use zzformula::*;
//!
//! // damage = STR * 2 + mastery threshold, capped at 50
//! let damage = Formula::new("slash_damage").with_expression(Expression::clamp(
//!     Expression::add([
//!         Expression::mul([Expression::core_stat("STR"), Expression::constant(2.0)]),
//!         Expression::ability_mastery(),
//!     ]),
//!     Expression::constant(0.0),
//!     Expression::constant(50.0),
//! ));
//!
//! let slash = Ability::new("slash").with_thresholds(vec![5, 10, 20]);
//! let mut hero = Character::new(CharacterData::new("hero").with_core_stat("STR", 12));
//! hero.add_ability(slash.id.clone());
//! hero.level_up_ability(&slash.id)?;
//!
//! let context = EvalContext::from_args([(&hero).into(), (&slash).into()]);
//! assert_eq!(damage.evaluate(&context), 34.0); // 12 * 2 + 10
//! # Ok::<(), FormulaError>(())
//! ```
//!
//! ## Modules
//!
//! - [`expression`] - Expression nodes and their evaluation
//! - [`formula`] - Named expression sequences
//! - [`library`] - Formula registry and JSON loading
//! - [`context`] - Evaluation context
//! - [`character`] - Character collaborator traits and default implementations
//! - [`derived`] - Derived stat definitions
//! - [`ability`] - Ability records
//! - [`evaluation`] - Detailed evaluation results
//! - [`numeric`] - Float helpers
//! - [`id`] - Identifier types
//! - [`error`] - Error types

pub mod ability;
pub mod character;
pub mod context;
pub mod derived;
pub mod error;
pub mod evaluation;
pub mod expression;
pub mod formula;
pub mod id;
pub mod library;
pub mod numeric;

pub use ability::Ability;
pub use character::{Character, CharacterData, CharacterSheet, CoreStats};
pub use context::{ContextArg, EvalContext};
pub use derived::{DerivedStat, ModifierOp, StatModifier};
pub use error::FormulaError;
pub use evaluation::Evaluation;
pub use expression::{Expression, Operand};
pub use formula::Formula;
pub use id::{AbilityId, DerivedStatId, StatId};
pub use library::FormulaLibrary;
