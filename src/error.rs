//! Error types for formula evaluation and authoring.
//!
//! Evaluation never surfaces these through [`Expression::evaluate`]: the node
//! that detects a problem logs it and substitutes `0.0`. They are returned
//! from the fallible entry points instead (`try_evaluate`, `validate`,
//! library loading and character mutation).
//!
//! [`Expression::evaluate`]: crate::expression::Expression::evaluate

use crate::id::AbilityId;
use thiserror::Error;

/// Errors produced while building, validating or evaluating formulas.
///
/// # Examples
///
/// ```rust
/// use zzformula::FormulaError;
///
/// let err = FormulaError::MissingOperand { node: "clamp", operand: "max" };
/// assert_eq!(err.to_string(), "clamp is missing its max operand");
/// ```
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FormulaError {
    /// A required child expression is absent.
    #[error("{node} is missing its {operand} operand")]
    MissingOperand {
        node: &'static str,
        operand: &'static str,
    },

    /// A divisor evaluated to (approximately) zero.
    ///
    /// `index` is the position of the offending operand in the divide list.
    #[error("Division by zero at operand {index}")]
    DivisionByZero { index: usize },

    /// The logarithm base is not positive or is (approximately) one.
    #[error("Invalid logarithm base: {0}")]
    InvalidLogBase(f64),

    /// An ability's mastery threshold table is empty.
    #[error("Ability {0} has no mastery thresholds")]
    EmptyThresholds(AbilityId),

    /// A formula name was looked up but never registered.
    #[error("Missing formula: {0}")]
    MissingFormula(String),

    /// Two formulas were registered under the same name.
    #[error("Duplicate formula: {0}")]
    DuplicateFormula(String),

    /// A stat appears twice in a character's stat list.
    #[error("Duplicate stat: {0}")]
    DuplicateStat(String),

    /// A character was asked to level up an ability it does not know.
    #[error("Ability {0} does not exist")]
    UnknownAbility(AbilityId),

    /// A formula document could not be parsed.
    #[error("Failed to parse formula document: {0}")]
    Parse(String),
}

impl From<serde_json::Error> for FormulaError {
    fn from(err: serde_json::Error) -> Self {
        FormulaError::Parse(err.to_string())
    }
}
