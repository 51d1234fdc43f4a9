//! Numeric helpers shared by the expression nodes.
//!
//! All formula math is done in `f64`. The helpers here pin down the few
//! places where float behavior has to be decided explicitly: what counts
//! as "zero" for a divisor, what counts as "one" for a logarithm base, and
//! what a clamp does with inverted bounds.

/// Smallest argument passed to a logarithm. Smaller (or negative) arguments
/// are raised to this floor before taking the log.
pub const MIN_LOG_ARGUMENT: f64 = 1e-4;

/// Approximate float equality.
///
/// Two values compare equal when their difference is below
/// `max(1e-6 * max(|a|, |b|), 8 * f64::EPSILON)`: relative for large
/// magnitudes, a few ULPs around zero.
///
/// # Examples
///
/// ```rust
/// use zzformula::numeric::approximately;
///
/// assert!(approximately(0.1 + 0.2, 0.3));
/// assert!(approximately(0.0, 1e-17));
/// assert!(!approximately(0.0, 1e-3));
/// ```
pub fn approximately(a: f64, b: f64) -> bool {
    let tolerance = (1e-6 * a.abs().max(b.abs())).max(f64::EPSILON * 8.0);
    (b - a).abs() < tolerance
}

/// Constrain `value` to `[min, max]`.
///
/// Unlike [`f64::clamp`] this never panics: when `min > max` the lower
/// bound wins and `min` is returned.
///
/// ```rust
/// use zzformula::numeric::clamp;
///
/// assert_eq!(clamp(5.0, 0.0, 3.0), 3.0);
/// assert_eq!(clamp(-1.0, 0.0, 3.0), 0.0);
/// assert_eq!(clamp(2.0, 4.0, 1.0), 4.0);
/// ```
pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    if min > max || value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}

/// Logarithm of `argument` in `base`, with the argument floored at
/// [`MIN_LOG_ARGUMENT`].
///
/// Returns `None` when the base is not usable (non-positive, NaN, or
/// approximately one).
pub fn checked_log(argument: f64, base: f64) -> Option<f64> {
    if base.is_nan() || base <= 0.0 || approximately(base, 1.0) {
        return None;
    }
    Some(argument.max(MIN_LOG_ARGUMENT).ln() / base.ln())
}
