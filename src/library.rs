//! Formula library.
//!
//! A [`FormulaLibrary`] is the registry of every formula a game ships with,
//! keyed by name. It is usually loaded once from a JSON document:
//!
//! ```json
//! {
//!   "formulas": [
//!     { "name": "fireball_damage", "expressions": [ { "kind": "constant", "value": 12.0 } ] }
//!   ]
//! }
//! ```

use crate::context::EvalContext;
use crate::error::FormulaError;
use crate::formula::Formula;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Serialize, Deserialize)]
struct LibraryDocument {
    #[serde(default)]
    formulas: Vec<Formula>,
}

/// Named registry of formulas.
///
/// # Examples
///
/// ```rust
/// use zzformula::{EvalContext, FormulaLibrary};
///
/// let library = FormulaLibrary::from_json_str(r#"{
///     "formulas": [
///         { "name": "flat", "expressions": [ { "kind": "constant", "value": 12.0 } ] }
///     ]
/// }"#).unwrap();
///
/// let ctx = EvalContext::new();
/// assert_eq!(library.evaluate("flat", &ctx), 12.0);
/// assert_eq!(library.evaluate("unknown", &ctx), 0.0); // logged, not fatal
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormulaLibrary {
    formulas: BTreeMap<String, Formula>,
}

impl FormulaLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a library document. Duplicate formula names are rejected.
    pub fn from_json_str(json: &str) -> Result<Self, FormulaError> {
        let document: LibraryDocument = serde_json::from_str(json)?;
        let mut library = Self::new();
        for formula in document.formulas {
            library.insert(formula)?;
        }
        Ok(library)
    }

    /// Serialize the library back into a document, formulas sorted by name.
    pub fn to_json_string(&self) -> Result<String, FormulaError> {
        let document = LibraryDocument {
            formulas: self.formulas.values().cloned().collect(),
        };
        Ok(serde_json::to_string_pretty(&document)?)
    }

    /// Register a formula under its own name.
    pub fn insert(&mut self, formula: Formula) -> Result<(), FormulaError> {
        if self.formulas.contains_key(formula.name()) {
            return Err(FormulaError::DuplicateFormula(formula.name().to_string()));
        }
        self.formulas.insert(formula.name().to_string(), formula);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Formula> {
        self.formulas.get(name)
    }

    /// Like [`FormulaLibrary::get`], but a missing name is an error.
    pub fn require(&self, name: &str) -> Result<&Formula, FormulaError> {
        self.get(name)
            .ok_or_else(|| FormulaError::MissingFormula(name.to_string()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.formulas.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.formulas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.formulas.is_empty()
    }

    /// Evaluate a formula by name. A missing formula is logged and
    /// evaluates to `0.0`.
    pub fn evaluate(&self, name: &str, ctx: &EvalContext<'_>) -> f64 {
        match self.require(name) {
            Ok(formula) => formula.evaluate(ctx),
            Err(err) => {
                tracing::warn!(formula = name, error = %err, "formula evaluated to 0");
                0.0
            }
        }
    }

    /// Validate every formula, reporting the first problem found (in name
    /// order).
    pub fn validate(&self) -> Result<(), FormulaError> {
        self.formulas.values().try_for_each(Formula::validate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::Expression;

    #[test]
    fn test_insert_and_get() {
        let mut library = FormulaLibrary::new();
        library
            .insert(Formula::new("a").with_expression(Expression::constant(1.0)))
            .unwrap();

        assert_eq!(library.len(), 1);
        assert!(library.get("a").is_some());
        assert!(library.get("b").is_none());
    }

    #[test]
    fn test_duplicate_insert() {
        let mut library = FormulaLibrary::new();
        library.insert(Formula::new("a")).unwrap();
        assert_eq!(
            library.insert(Formula::new("a")),
            Err(FormulaError::DuplicateFormula("a".to_string()))
        );
    }

    #[test]
    fn test_require_missing() {
        let library = FormulaLibrary::new();
        assert_eq!(
            library.require("nope").unwrap_err(),
            FormulaError::MissingFormula("nope".to_string())
        );
        assert_eq!(library.evaluate("nope", &EvalContext::new()), 0.0);
    }

    #[test]
    fn test_names_sorted() {
        let mut library = FormulaLibrary::new();
        library.insert(Formula::new("zeta")).unwrap();
        library.insert(Formula::new("alpha")).unwrap();
        assert_eq!(library.names().collect::<Vec<_>>(), vec!["alpha", "zeta"]);
    }

    #[test]
    fn test_invalid_json() {
        let err = FormulaLibrary::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, FormulaError::Parse(_)));
    }

    #[test]
    fn test_unknown_kind_is_parse_error() {
        let err = FormulaLibrary::from_json_str(
            r#"{"formulas": [{"name": "x", "expressions": [{"kind": "modulo"}]}]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, FormulaError::Parse(_)));
    }
}
