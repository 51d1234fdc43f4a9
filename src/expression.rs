//! Expression trees.
//!
//! An [`Expression`] is one node of an arithmetic tree. Interior nodes own
//! their children outright, so a tree can never contain a cycle. Leaves are
//! either literals or lookups into the [`EvalContext`].
//!
//! Evaluation is total: a node that finds a problem (a missing child, a
//! zero divisor, an unusable logarithm base) logs it and evaluates to
//! `0.0`. Its parent carries on with that value. Use
//! [`Expression::try_evaluate`] to get the node's own failure as an error
//! instead, or [`Expression::validate`] to catch missing children before
//! anything is evaluated.

use crate::context::EvalContext;
use crate::derived::DerivedStat;
use crate::error::FormulaError;
use crate::id::StatId;
use crate::numeric::{approximately, checked_log, clamp};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single, possibly absent, child of a fixed-arity node.
pub type Operand = Option<Box<Expression>>;

/// A node of a formula tree.
///
/// Trees are usually built with the constructor functions, or deserialized
/// from JSON where each node is tagged with its `kind`:
///
/// ```rust
/// use zzformula::{EvalContext, Expression};
///
/// let expr: Expression = serde_json::from_str(r#"{
///     "kind": "multiply",
///     "values": [
///         { "kind": "constant", "value": 4.0 },
///         { "kind": "addition", "values": [
///             { "kind": "constant", "value": 1.0 },
///             { "kind": "constant", "value": 2.0 }
///         ]}
///     ]
/// }"#).unwrap();
///
/// assert_eq!(expr.evaluate(&EvalContext::new()), 12.0);
/// assert_eq!(expr.to_string(), "(4 * (1 + 2))");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Expression {
    /// A literal value.
    Constant { value: f64 },

    /// Euler's number `e`.
    EulerConstant,

    /// `0 + v1 + v2 + ...`
    Addition {
        #[serde(default)]
        values: Vec<Option<Expression>>,
    },

    /// `0 - v1 - v2 - ...`, i.e. the negated sum of the operands.
    Subtraction {
        #[serde(default)]
        values: Vec<Option<Expression>>,
    },

    /// `1 * v1 * v2 * ...`
    Multiply {
        #[serde(default)]
        values: Vec<Option<Expression>>,
    },

    /// `1 / v1 / v2 / ...`. Any operand that is approximately zero makes
    /// the whole node evaluate to `0.0`.
    Divide {
        #[serde(default)]
        values: Vec<Option<Expression>>,
    },

    /// `base ^ exponent`.
    Power { base: Operand, exponent: Operand },

    /// `e ^ power`.
    Exponential { power: Operand },

    /// `log_base(max(power, 1e-4))`. Bases that are not positive or are
    /// approximately one evaluate to `0.0`.
    Logarithmic { base: Operand, power: Operand },

    /// `value` constrained to `[min, max]`. When `min > max`, `min` wins.
    Clamp {
        value: Operand,
        min: Operand,
        max: Operand,
    },

    /// Largest of the present operands, `0.0` if there are none.
    Max {
        #[serde(default)]
        expressions: Vec<Option<Expression>>,
    },

    /// Smallest of the present operands, `0.0` if there are none.
    Min {
        #[serde(default)]
        expressions: Vec<Option<Expression>>,
    },

    /// A core stat of the context's character (or, failing that, of its
    /// character data). Missing stats read as `0`.
    CoreStatLookup { stat: StatId },

    /// A derived stat of the context's character, including its stored
    /// adjustment. `0.0` without a character.
    DerivedStatLookup { stat: DerivedStat },

    /// The context ability's mastery threshold for the context character's
    /// mastery level. `0.0` unless both are present.
    AbilityMasteryLookup,
}

fn present(values: impl IntoIterator<Item = Expression>) -> Vec<Option<Expression>> {
    values.into_iter().map(Some).collect()
}

fn required<'e>(
    slot: Option<&'e Expression>,
    node: &'static str,
    operand: &'static str,
) -> Result<&'e Expression, FormulaError> {
    slot.ok_or(FormulaError::MissingOperand { node, operand })
}

impl Expression {
    pub fn constant(value: f64) -> Self {
        Expression::Constant { value }
    }

    pub fn euler() -> Self {
        Expression::EulerConstant
    }

    pub fn add(values: impl IntoIterator<Item = Expression>) -> Self {
        Expression::Addition {
            values: present(values),
        }
    }

    pub fn sub(values: impl IntoIterator<Item = Expression>) -> Self {
        Expression::Subtraction {
            values: present(values),
        }
    }

    pub fn mul(values: impl IntoIterator<Item = Expression>) -> Self {
        Expression::Multiply {
            values: present(values),
        }
    }

    pub fn div(values: impl IntoIterator<Item = Expression>) -> Self {
        Expression::Divide {
            values: present(values),
        }
    }

    pub fn pow(base: Expression, exponent: Expression) -> Self {
        Expression::Power {
            base: Some(Box::new(base)),
            exponent: Some(Box::new(exponent)),
        }
    }

    pub fn exp(power: Expression) -> Self {
        Expression::Exponential {
            power: Some(Box::new(power)),
        }
    }

    pub fn log(base: Expression, power: Expression) -> Self {
        Expression::Logarithmic {
            base: Some(Box::new(base)),
            power: Some(Box::new(power)),
        }
    }

    pub fn clamp(value: Expression, min: Expression, max: Expression) -> Self {
        Expression::Clamp {
            value: Some(Box::new(value)),
            min: Some(Box::new(min)),
            max: Some(Box::new(max)),
        }
    }

    pub fn max(expressions: impl IntoIterator<Item = Expression>) -> Self {
        Expression::Max {
            expressions: present(expressions),
        }
    }

    pub fn min(expressions: impl IntoIterator<Item = Expression>) -> Self {
        Expression::Min {
            expressions: present(expressions),
        }
    }

    pub fn core_stat(stat: impl Into<StatId>) -> Self {
        Expression::CoreStatLookup { stat: stat.into() }
    }

    pub fn derived_stat(stat: DerivedStat) -> Self {
        Expression::DerivedStatLookup { stat }
    }

    pub fn ability_mastery() -> Self {
        Expression::AbilityMasteryLookup
    }

    /// Short name of the node kind, used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Expression::Constant { .. } => "constant",
            Expression::EulerConstant => "euler_constant",
            Expression::Addition { .. } => "addition",
            Expression::Subtraction { .. } => "subtraction",
            Expression::Multiply { .. } => "multiply",
            Expression::Divide { .. } => "divide",
            Expression::Power { .. } => "power",
            Expression::Exponential { .. } => "exponential",
            Expression::Logarithmic { .. } => "logarithmic",
            Expression::Clamp { .. } => "clamp",
            Expression::Max { .. } => "max",
            Expression::Min { .. } => "min",
            Expression::CoreStatLookup { .. } => "core_stat_lookup",
            Expression::DerivedStatLookup { .. } => "derived_stat_lookup",
            Expression::AbilityMasteryLookup => "ability_mastery_lookup",
        }
    }

    /// Evaluate this node against a context.
    ///
    /// Never fails: if this node cannot produce a value it logs the reason
    /// and returns `0.0`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use zzformula::{EvalContext, Expression};
    ///
    /// let ctx = EvalContext::new();
    /// let halved = Expression::mul([Expression::constant(10.0), Expression::div([Expression::constant(2.0)])]);
    /// assert_eq!(halved.evaluate(&ctx), 5.0);
    ///
    /// // 1 / 0 is reported and replaced by 0
    /// let broken = Expression::div([Expression::constant(0.0)]);
    /// assert_eq!(broken.evaluate(&ctx), 0.0);
    /// ```
    pub fn evaluate(&self, ctx: &EvalContext<'_>) -> f64 {
        match self.try_evaluate(ctx) {
            Ok(value) => value,
            Err(err) => {
                self.report(&err);
                0.0
            }
        }
    }

    /// Evaluate this node, returning its own failure as an error.
    ///
    /// Children are still evaluated with [`Expression::evaluate`], so a
    /// failing child contributes `0.0` rather than failing its parent.
    pub fn try_evaluate(&self, ctx: &EvalContext<'_>) -> Result<f64, FormulaError> {
        match self {
            Expression::Constant { value } => Ok(*value),
            Expression::EulerConstant => Ok(std::f64::consts::E),
            Expression::Addition { values } => {
                fold(values, ctx, "addition", 0.0, |acc, v| acc + v)
            }
            Expression::Subtraction { values } => {
                fold(values, ctx, "subtraction", 0.0, |acc, v| acc - v)
            }
            Expression::Multiply { values } => {
                fold(values, ctx, "multiply", 1.0, |acc, v| acc * v)
            }
            Expression::Divide { values } => {
                let mut acc = 1.0;
                for (index, slot) in values.iter().enumerate() {
                    let divisor = required(slot.as_ref(), "divide", "value")?.evaluate(ctx);
                    if approximately(divisor, 0.0) {
                        return Err(FormulaError::DivisionByZero { index });
                    }
                    acc /= divisor;
                }
                Ok(acc)
            }
            Expression::Power { base, exponent } => {
                let base = required(base.as_deref(), "power", "base")?;
                let exponent = required(exponent.as_deref(), "power", "exponent")?;
                Ok(base.evaluate(ctx).powf(exponent.evaluate(ctx)))
            }
            Expression::Exponential { power } => {
                let power = required(power.as_deref(), "exponential", "power")?;
                Ok(power.evaluate(ctx).exp())
            }
            Expression::Logarithmic { base, power } => {
                let base = required(base.as_deref(), "logarithmic", "base")?;
                let power = required(power.as_deref(), "logarithmic", "power")?;
                let base_value = base.evaluate(ctx);
                let power_value = power.evaluate(ctx);
                checked_log(power_value, base_value).ok_or(FormulaError::InvalidLogBase(base_value))
            }
            Expression::Clamp { value, min, max } => {
                let value = required(value.as_deref(), "clamp", "value")?;
                let min = required(min.as_deref(), "clamp", "min")?;
                let max = required(max.as_deref(), "clamp", "max")?;
                Ok(clamp(value.evaluate(ctx), min.evaluate(ctx), max.evaluate(ctx)))
            }
            Expression::Max { expressions } => {
                Ok(evaluate_present(expressions, ctx, "max")
                    .into_iter()
                    .reduce(f64::max)
                    .unwrap_or(0.0))
            }
            Expression::Min { expressions } => {
                Ok(evaluate_present(expressions, ctx, "min")
                    .into_iter()
                    .reduce(f64::min)
                    .unwrap_or(0.0))
            }
            Expression::CoreStatLookup { stat } => {
                let value = if let Some(character) = ctx.character() {
                    character.core_stat(stat)
                } else if let Some(data) = ctx.character_data() {
                    data.core_stat(stat)
                } else {
                    None
                };
                Ok(value.map(f64::from).unwrap_or(0.0))
            }
            Expression::DerivedStatLookup { stat } => Ok(ctx
                .character()
                .map(|character| character.derived_stat(stat))
                .unwrap_or(0.0)),
            Expression::AbilityMasteryLookup => {
                let (Some(ability), Some(character)) = (ctx.ability(), ctx.character()) else {
                    return Ok(0.0);
                };
                let level = character.mastery_level(&ability.id).unwrap_or(0);
                ability
                    .mastery_threshold(level)
                    .map(f64::from)
                    .ok_or_else(|| FormulaError::EmptyThresholds(ability.id.clone()))
            }
        }
    }

    /// Check the whole tree for missing required children.
    ///
    /// Absent entries of `max`/`min` are allowed since evaluation skips
    /// them. Domain problems (zero divisors, bad log bases) depend on the
    /// context and are not checked here.
    ///
    /// ```rust
    /// use zzformula::{Expression, FormulaError};
    ///
    /// let incomplete = Expression::Clamp {
    ///     value: Some(Box::new(Expression::constant(5.0))),
    ///     min: Some(Box::new(Expression::constant(0.0))),
    ///     max: None,
    /// };
    /// assert_eq!(
    ///     incomplete.validate(),
    ///     Err(FormulaError::MissingOperand { node: "clamp", operand: "max" }),
    /// );
    /// ```
    pub fn validate(&self) -> Result<(), FormulaError> {
        match self {
            Expression::Constant { .. }
            | Expression::EulerConstant
            | Expression::CoreStatLookup { .. }
            | Expression::DerivedStatLookup { .. }
            | Expression::AbilityMasteryLookup => Ok(()),
            Expression::Addition { values }
            | Expression::Subtraction { values }
            | Expression::Multiply { values }
            | Expression::Divide { values } => values
                .iter()
                .try_for_each(|slot| required(slot.as_ref(), self.kind(), "value")?.validate()),
            Expression::Max { expressions } | Expression::Min { expressions } => expressions
                .iter()
                .flatten()
                .try_for_each(Expression::validate),
            Expression::Power { base, exponent } => {
                required(base.as_deref(), "power", "base")?.validate()?;
                required(exponent.as_deref(), "power", "exponent")?.validate()
            }
            Expression::Exponential { power } => {
                required(power.as_deref(), "exponential", "power")?.validate()
            }
            Expression::Logarithmic { base, power } => {
                required(base.as_deref(), "logarithmic", "base")?.validate()?;
                required(power.as_deref(), "logarithmic", "power")?.validate()
            }
            Expression::Clamp { value, min, max } => {
                required(value.as_deref(), "clamp", "value")?.validate()?;
                required(min.as_deref(), "clamp", "min")?.validate()?;
                required(max.as_deref(), "clamp", "max")?.validate()
            }
        }
    }

    fn report(&self, err: &FormulaError) {
        match err {
            FormulaError::DivisionByZero { .. } => {
                tracing::error!(node = self.kind(), expression = %self, error = %err, "expression evaluated to 0");
            }
            FormulaError::InvalidLogBase(_) => {
                tracing::debug!(node = self.kind(), expression = %self, error = %err, "expression evaluated to 0");
            }
            _ => {
                tracing::warn!(node = self.kind(), expression = %self, error = %err, "expression evaluated to 0");
            }
        }
    }
}

fn fold(
    values: &[Option<Expression>],
    ctx: &EvalContext<'_>,
    node: &'static str,
    init: f64,
    op: impl Fn(f64, f64) -> f64,
) -> Result<f64, FormulaError> {
    let mut acc = init;
    for slot in values {
        acc = op(acc, required(slot.as_ref(), node, "value")?.evaluate(ctx));
    }
    Ok(acc)
}

fn evaluate_present(
    expressions: &[Option<Expression>],
    ctx: &EvalContext<'_>,
    node: &'static str,
) -> Vec<f64> {
    expressions
        .iter()
        .enumerate()
        .filter_map(|(index, slot)| match slot {
            Some(expression) => Some(expression.evaluate(ctx)),
            None => {
                tracing::warn!(node, index, "skipping absent operand");
                None
            }
        })
        .collect()
}

impl From<f64> for Expression {
    fn from(value: f64) -> Self {
        Expression::constant(value)
    }
}

struct Slot<'e>(Option<&'e Expression>);

impl fmt::Display for Slot<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(expression) => write!(f, "{}", expression),
            None => f.write_str("?"),
        }
    }
}

fn write_chain(
    f: &mut fmt::Formatter<'_>,
    seed: Option<&str>,
    separator: &str,
    values: &[Option<Expression>],
) -> fmt::Result {
    f.write_str("(")?;
    let mut first = true;
    if let Some(seed) = seed {
        f.write_str(seed)?;
        first = false;
    }
    for slot in values {
        if !first {
            f.write_str(separator)?;
        }
        write!(f, "{}", Slot(slot.as_ref()))?;
        first = false;
    }
    f.write_str(")")
}

fn write_call(f: &mut fmt::Formatter<'_>, name: &str, args: &[Slot<'_>]) -> fmt::Result {
    write!(f, "{}(", name)?;
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{}", arg)?;
    }
    f.write_str(")")
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Constant { value } => write!(f, "{}", value),
            Expression::EulerConstant => f.write_str("e"),
            Expression::Addition { values } => write_chain(f, None, " + ", values),
            Expression::Subtraction { values } => write_chain(f, Some("0"), " - ", values),
            Expression::Multiply { values } => write_chain(f, None, " * ", values),
            Expression::Divide { values } => write_chain(f, Some("1"), " / ", values),
            Expression::Power { base, exponent } => write!(
                f,
                "({} ^ {})",
                Slot(base.as_deref()),
                Slot(exponent.as_deref())
            ),
            Expression::Exponential { power } => write_call(f, "exp", &[Slot(power.as_deref())]),
            Expression::Logarithmic { base, power } => write_call(
                f,
                "log",
                &[Slot(base.as_deref()), Slot(power.as_deref())],
            ),
            Expression::Clamp { value, min, max } => write_call(
                f,
                "clamp",
                &[
                    Slot(value.as_deref()),
                    Slot(min.as_deref()),
                    Slot(max.as_deref()),
                ],
            ),
            Expression::Max { expressions } => {
                let args: Vec<_> = expressions.iter().map(|e| Slot(e.as_ref())).collect();
                write_call(f, "max", &args)
            }
            Expression::Min { expressions } => {
                let args: Vec<_> = expressions.iter().map(|e| Slot(e.as_ref())).collect();
                write_call(f, "min", &args)
            }
            Expression::CoreStatLookup { stat } => write!(f, "{}", stat),
            Expression::DerivedStatLookup { stat } => write!(f, "{}", stat.id),
            Expression::AbilityMasteryLookup => f.write_str("mastery"),
        }
    }
}
