//! Detailed evaluation results.
//!
//! An [`Evaluation`] is what [`Formula::evaluate_detailed`] returns: the
//! final value plus one step per top-level expression, for debugging and
//! tooltips.
//!
//! [`Formula::evaluate_detailed`]: crate::formula::Formula::evaluate_detailed

use serde::{Deserialize, Serialize};

/// A formula result with its per-expression breakdown.
///
/// # Examples
///
/// ```rust
/// use zzformula::Evaluation;
///
/// let mut evaluation = Evaluation::new("damage");
/// evaluation.push_step("(STR * 2)", 24.0);
/// evaluation.push_step("max(24, 30)", 30.0);
///
/// assert_eq!(evaluation.value, 30.0);
/// assert_eq!(evaluation.steps.len(), 2);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Evaluation {
    /// Name of the evaluated formula.
    pub formula: String,

    /// The final value: the value of the last step, or `0.0` if there were
    /// no steps.
    pub value: f64,

    /// Each evaluated top-level expression, rendered, with its value.
    /// Steps are listed in evaluation order.
    pub steps: Vec<(String, f64)>,
}

impl Evaluation {
    /// Start an evaluation with no steps and a value of `0.0`.
    pub fn new(formula: impl Into<String>) -> Self {
        Self {
            formula: formula.into(),
            value: 0.0,
            steps: Vec::new(),
        }
    }

    /// Record a step. The step's value replaces the current value.
    pub fn push_step(&mut self, description: impl Into<String>, value: f64) {
        self.steps.push((description.into(), value));
        self.value = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evaluation_starts_empty() {
        let evaluation = Evaluation::new("heal");
        assert_eq!(evaluation.formula, "heal");
        assert_eq!(evaluation.value, 0.0);
        assert!(evaluation.steps.is_empty());
    }

    #[test]
    fn test_last_step_wins() {
        let mut evaluation = Evaluation::new("cost");
        evaluation.push_step("10", 10.0);
        evaluation.push_step("3", 3.0);

        assert_eq!(evaluation.value, 3.0);
        assert_eq!(evaluation.steps[0], ("10".to_string(), 10.0));
        assert_eq!(evaluation.steps[1], ("3".to_string(), 3.0));
    }
}
