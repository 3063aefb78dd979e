//! Numeric tolerance policy.
//!
//! Most lane operators are exact: integral arithmetic and the IEEE-754 basic operations
//! must reproduce the scalar result bit for bit. Transcendental functions, `FMA` on
//! narrow floats and floating `ADD`/`MUL` reductions are instead accepted within a
//! bounded distance in units in the last place (ULP) of a reference computed in `f64`
//! and rounded once to the lane kind.
//!
//! ULP distance is measured on the sign-magnitude ordering of lane bit patterns, so
//! `-0.0` and `+0.0` are zero apart and adjacent representable values are one apart.
//! A NaN only matches another NaN.
//!
//! ```rust
//! use half::f16;
//! use lanely::simd::{tolerance, ElementKind, UnaryOp};
//!
//! let x = f16::from_f32(0.5);
//! let reference = tolerance::reference_unary(UnaryOp::Sin, x).unwrap();
//! let policy = tolerance::unary_tolerance(UnaryOp::Sin, ElementKind::F16);
//! assert!(policy.accepts(f16::from_f32(0.5f32.sin()), reference));
//! ```

use crate::{
    error::{capability_error, Result},
    simd::{
        element::{reference_binary_f64, reference_unary_f64},
        AssociativeOp, BinaryOp, Element, ElementKind, TernaryOp, UnaryOp,
    },
};

/// ULP bound for floating `ADD` reductions.
pub const REDUCTION_ADD_ULPS: u32 = 10;

/// ULP bound for floating `MUL` reductions.
pub const REDUCTION_MUL_ULPS: u32 = 50;

/// How far a computed lane may be from its reference value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tolerance {
    /// Bit-identical (any NaN matches any NaN).
    Exact,
    /// Within the given number of units in the last place.
    Ulps(u32),
}

impl Tolerance {
    pub fn accepts<E: Element>(self, actual: E, expected: E) -> bool {
        match self {
            Tolerance::Exact => {
                actual.to_bits() == expected.to_bits() || (is_nan(actual) && is_nan(expected))
            }
            Tolerance::Ulps(bound) => {
                ulp_distance(actual, expected).is_some_and(|distance| distance <= bound as u64)
            }
        }
    }
}

#[inline(always)]
fn is_nan<E: Element>(x: E) -> bool {
    x.partial_cmp(&x).is_none()
}

/// Maps lane bits onto a line where adjacent representable values differ by one.
fn ordered_bits<E: Element>(x: E) -> i64 {
    if E::KIND.is_integral() {
        return x.to_i64();
    }
    let sign = 1u64 << (E::KIND.bit_size() - 1);
    let bits = x.to_bits();
    let magnitude = (bits & !sign) as i64;
    if bits & sign != 0 {
        -magnitude
    } else {
        magnitude
    }
}

/// Distance between `a` and `b` in ULPs, or `None` when exactly one of them is NaN.
pub fn ulp_distance<E: Element>(a: E, b: E) -> Option<u64> {
    match (is_nan(a), is_nan(b)) {
        (true, true) => Some(0),
        (false, false) => {
            let distance = ordered_bits(a) as i128 - ordered_bits(b) as i128;
            Some(distance.unsigned_abs() as u64)
        }
        _ => None,
    }
}

/// Spacing between `|x|` and the next representable magnitude, as an `f64`.
///
/// Integral kinds have a spacing of one; NaN and infinities have none (NaN).
pub fn ulp<E: Element>(x: E) -> f64 {
    if E::KIND.is_integral() {
        return 1.0;
    }
    let magnitude_bits = x.to_bits() & !(1u64 << (E::KIND.bit_size() - 1));
    let magnitude = E::from_bits(magnitude_bits).to_f64();
    if !magnitude.is_finite() {
        return f64::NAN;
    }

    let next = E::from_bits(magnitude_bits + 1).to_f64();
    if next.is_finite() {
        next - magnitude
    } else {
        // largest finite value: use the spacing below it
        magnitude - E::from_bits(magnitude_bits - 1).to_f64()
    }
}

pub fn unary_tolerance(op: UnaryOp, kind: ElementKind) -> Tolerance {
    if kind.is_floating() && op.is_transcendental() {
        Tolerance::Ulps(1)
    } else {
        Tolerance::Exact
    }
}

pub fn binary_tolerance(op: BinaryOp, kind: ElementKind) -> Tolerance {
    if kind.is_floating() && op.is_transcendental() {
        Tolerance::Ulps(1)
    } else {
        Tolerance::Exact
    }
}

/// `FMA` is computed in the next wider format for kinds narrower than `f64`.
pub fn ternary_tolerance(op: TernaryOp, kind: ElementKind) -> Tolerance {
    match op {
        TernaryOp::Fma if kind != ElementKind::F64 => Tolerance::Ulps(1),
        _ => Tolerance::Exact,
    }
}

/// Floating `ADD` and `MUL` reductions may reassociate.
pub fn reduction_tolerance(op: AssociativeOp, kind: ElementKind) -> Tolerance {
    match op {
        AssociativeOp::Add if kind.is_floating() => Tolerance::Ulps(REDUCTION_ADD_ULPS),
        AssociativeOp::Mul if kind.is_floating() => Tolerance::Ulps(REDUCTION_MUL_ULPS),
        _ => Tolerance::Exact,
    }
}

/// Reference value of a unary lane operation.
///
/// Floating `SQRT` and transcendental operators are evaluated in `f64` and rounded to
/// the lane kind; every other operator is its own reference.
pub fn reference_unary<E: Element>(op: UnaryOp, x: E) -> Result<E> {
    if !op.supports(E::KIND) {
        return Err(capability_error(E::KIND, op.name()));
    }
    if E::KIND.is_floating() && (op.is_transcendental() || op == UnaryOp::Sqrt) {
        Ok(E::from_f64(reference_unary_f64(op, x.to_f64())))
    } else {
        E::unary(op, x)
    }
}

/// Reference value of a binary lane operation, evaluated like [`reference_unary`].
pub fn reference_binary<E: Element>(op: BinaryOp, x: E, y: E) -> Result<E> {
    if !op.supports(E::KIND) {
        return Err(capability_error(E::KIND, op.name()));
    }
    if E::KIND.is_floating() && op.is_transcendental() {
        Ok(E::from_f64(reference_binary_f64(op, x.to_f64(), y.to_f64())))
    } else {
        E::binary(op, x, y)
    }
}

#[cfg(test)]
mod tests {
    use half::f16;

    use super::*;

    #[test]
    fn test_ulp_distance_adjacent_values() {
        let one = 1.0f32;
        let next = f32::from_bits(one.to_bits() + 1);
        assert_eq!(ulp_distance(one, next), Some(1));
        assert_eq!(ulp_distance(next, one), Some(1));
    }

    #[test]
    fn test_ulp_distance_across_zero() {
        assert_eq!(ulp_distance(0.0f64, -0.0f64), Some(0));

        let tiny = f64::from_bits(1);
        assert_eq!(ulp_distance(tiny, -tiny), Some(2));
    }

    #[test]
    fn test_ulp_distance_nan() {
        assert_eq!(ulp_distance(f32::NAN, f32::NAN), Some(0));
        assert_eq!(ulp_distance(f32::NAN, 1.0), None);
        assert!(!Tolerance::Ulps(u32::MAX).accepts(1.0f32, f32::NAN));
        assert!(Tolerance::Exact.accepts(f64::NAN, -f64::NAN));
    }

    #[test]
    fn test_ulp_of_one() {
        assert_eq!(ulp(1.0f32), f32::EPSILON as f64);
        assert_eq!(ulp(1.0f64), f64::EPSILON);
        assert_eq!(ulp(f16::ONE), f16::EPSILON.to_f64());
        assert_eq!(ulp(-1.0f64), f64::EPSILON);
        assert_eq!(ulp(42i32), 1.0);
        assert!(ulp(f32::INFINITY).is_nan());
        assert!(ulp(f32::MAX) > 0.0);
    }

    #[test]
    fn test_policies() {
        assert_eq!(unary_tolerance(UnaryOp::Sin, ElementKind::F16), Tolerance::Ulps(1));
        assert_eq!(unary_tolerance(UnaryOp::Sqrt, ElementKind::F16), Tolerance::Exact);
        assert_eq!(unary_tolerance(UnaryOp::Abs, ElementKind::F64), Tolerance::Exact);
        assert_eq!(binary_tolerance(BinaryOp::Pow, ElementKind::F32), Tolerance::Ulps(1));
        assert_eq!(binary_tolerance(BinaryOp::Add, ElementKind::F32), Tolerance::Exact);
        assert_eq!(ternary_tolerance(TernaryOp::Fma, ElementKind::F16), Tolerance::Ulps(1));
        assert_eq!(ternary_tolerance(TernaryOp::Fma, ElementKind::F64), Tolerance::Exact);
        assert_eq!(
            reduction_tolerance(AssociativeOp::Add, ElementKind::F32),
            Tolerance::Ulps(REDUCTION_ADD_ULPS)
        );
        assert_eq!(
            reduction_tolerance(AssociativeOp::Mul, ElementKind::F16),
            Tolerance::Ulps(REDUCTION_MUL_ULPS)
        );
        assert_eq!(reduction_tolerance(AssociativeOp::Add, ElementKind::I32), Tolerance::Exact);
    }

    #[test]
    fn test_reference_rejects_unsupported_operators() {
        assert!(reference_unary(UnaryOp::Sin, 3i32).is_err());
        assert!(reference_binary(BinaryOp::Lshl, 1.0f32, 2.0).is_err());
    }

    #[test]
    fn test_f64_transcendentals_match_reference_exactly() {
        for x in [0.1f64, 0.5, 1.0, 2.5, -3.75] {
            for op in [UnaryOp::Sin, UnaryOp::Exp, UnaryOp::Atan, UnaryOp::Cbrt] {
                let lane = f64::unary(op, x).unwrap();
                assert!(Tolerance::Exact.accepts(lane, reference_unary(op, x).unwrap()));
            }
        }
    }
}
