//! Formulas.
//!
//! A [`Formula`] is a named, ordered list of top-level expressions. It is
//! the unit that abilities and status effects hold on to (a damage formula,
//! a heal-per-tick formula, a cost formula).
//!
//! Evaluating a formula evaluates every top-level expression in order with
//! the same context, and the result is the value of the **last** one.
//! Earlier expressions do not feed into later ones and are not summed.

use crate::context::EvalContext;
use crate::error::FormulaError;
use crate::evaluation::Evaluation;
use crate::expression::Expression;
use serde::{Deserialize, Serialize};

/// A named sequence of expressions.
///
/// # Examples
///
/// ```rust
/// use zzformula::{EvalContext, Expression, Formula};
///
/// let formula = Formula::new("fixed")
///     .with_expression(Expression::constant(1.0))
///     .with_expression(Expression::constant(2.0));
///
/// // last expression wins
/// assert_eq!(formula.evaluate(&EvalContext::new()), 2.0);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Formula {
    name: String,
    #[serde(default)]
    expressions: Vec<Expression>,
}

impl Formula {
    /// Create an empty formula. It evaluates to `0.0` until expressions
    /// are added.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            expressions: Vec::new(),
        }
    }

    pub fn with_expression(mut self, expression: Expression) -> Self {
        self.expressions.push(expression);
        self
    }

    pub fn push(&mut self, expression: Expression) {
        self.expressions.push(expression);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn expressions(&self) -> &[Expression] {
        &self.expressions
    }

    pub fn is_empty(&self) -> bool {
        self.expressions.is_empty()
    }

    /// Evaluate the formula.
    ///
    /// Every top-level expression is evaluated with `ctx`; the value of the
    /// last one is returned. An empty formula evaluates to `0.0`.
    pub fn evaluate(&self, ctx: &EvalContext<'_>) -> f64 {
        let mut result = 0.0;
        for expression in &self.expressions {
            result = expression.evaluate(ctx);
        }
        tracing::trace!(formula = %self.name, value = result, "formula evaluated");
        result
    }

    /// Evaluate the formula and keep a per-expression breakdown.
    ///
    /// ```rust
    /// use zzformula::{EvalContext, Expression, Formula};
    ///
    /// let formula = Formula::new("damage")
    ///     .with_expression(Expression::add([Expression::constant(3.0), Expression::constant(4.0)]));
    ///
    /// let evaluation = formula.evaluate_detailed(&EvalContext::new());
    /// assert_eq!(evaluation.value, 7.0);
    /// assert_eq!(evaluation.steps, vec![("(3 + 4)".to_string(), 7.0)]);
    /// ```
    pub fn evaluate_detailed(&self, ctx: &EvalContext<'_>) -> Evaluation {
        let mut evaluation = Evaluation::new(self.name.clone());
        for expression in &self.expressions {
            evaluation.push_step(expression.to_string(), expression.evaluate(ctx));
        }
        evaluation
    }

    /// Validate every top-level expression.
    pub fn validate(&self) -> Result<(), FormulaError> {
        self.expressions.iter().try_for_each(Expression::validate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_formula_is_zero() {
        let formula = Formula::new("empty");
        assert!(formula.is_empty());
        assert_eq!(formula.evaluate(&EvalContext::new()), 0.0);
        assert_eq!(formula.evaluate_detailed(&EvalContext::new()).value, 0.0);
    }

    #[test]
    fn test_last_expression_wins() {
        let formula = Formula::new("overwrite")
            .with_expression(Expression::constant(1.0))
            .with_expression(Expression::constant(2.0));
        assert_eq!(formula.evaluate(&EvalContext::new()), 2.0);
    }

    #[test]
    fn test_failing_last_expression_yields_zero() {
        let formula = Formula::new("broken")
            .with_expression(Expression::constant(9.0))
            .with_expression(Expression::div([Expression::constant(0.0)]));
        assert_eq!(formula.evaluate(&EvalContext::new()), 0.0);
    }

    #[test]
    fn test_detailed_steps() {
        let mut formula = Formula::new("steps");
        formula.push(Expression::constant(5.0));
        formula.push(Expression::mul([Expression::constant(2.0), Expression::constant(3.0)]));

        let evaluation = formula.evaluate_detailed(&EvalContext::new());
        assert_eq!(evaluation.formula, "steps");
        assert_eq!(evaluation.value, 6.0);
        assert_eq!(
            evaluation.steps,
            vec![("5".to_string(), 5.0), ("(2 * 3)".to_string(), 6.0)]
        );
    }

    #[test]
    fn test_validate() {
        let ok = Formula::new("ok").with_expression(Expression::constant(1.0));
        assert!(ok.validate().is_ok());

        let bad = Formula::new("bad")
            .with_expression(Expression::constant(1.0))
            .with_expression(Expression::Exponential { power: None });
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_formula_json() {
        let formula = Formula::new("heal").with_expression(Expression::core_stat("WIS"));
        let json = serde_json::to_string(&formula).unwrap();
        let back: Formula = serde_json::from_str(&json).unwrap();
        assert_eq!(back, formula);
        assert_eq!(back.name(), "heal");
    }
}
