//! Numeric coercion for `-eq`, `-lt`, ... and `-t`
//!
//! The interpreter's arithmetic subsystem owns the real policy. The evaluator
//! only relies on coercion being total and deterministic.

/// Numeric coercion collaborator.
pub trait Arithmetic: Send + Sync {
    /// Turn an operand into a signed integer. Must never fail.
    fn coerce(&self, s: &str) -> i64;
}

/// Plain decimal coercion: surrounding whitespace is ignored, anything that is
/// not a signed decimal integer is 0.
#[derive(Debug, Clone, Copy, Default)]
pub struct DecimalArithmetic;

impl Arithmetic for DecimalArithmetic {
    fn coerce(&self, s: &str) -> i64 {
        s.trim().parse().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decimal() {
        let a = DecimalArithmetic;
        assert_eq!(a.coerce("42"), 42);
        assert_eq!(a.coerce("-5"), -5);
        assert_eq!(a.coerce("  7 \n"), 7);
    }

    #[test]
    fn test_non_numeric_is_zero() {
        let a = DecimalArithmetic;
        assert_eq!(a.coerce("abc"), 0);
        assert_eq!(a.coerce(""), 0);
        assert_eq!(a.coerce("1.5"), 0);
        assert_eq!(a.coerce("99999999999999999999"), 0);
    }
}
