//! Scalar element kinds and their per-lane operator tables.
//!
//! The engine is generic over [`Element`], which is implemented for exactly the seven
//! supported scalar types: `i8`, `i16`, `i32`, `i64`, [`half::f16`], `f32` and `f64`.
//! Each implementation carries the scalar semantics the vector engine needs:
//!
//! - **Identities** for every associative operator (see [`Element::identity`])
//! - **Comparison modes**: signed ordering for `LT`..`GE`, bit-pattern unsigned ordering
//!   for `ULT`..`UGE`, IEEE-754 unordered semantics for NaN
//! - **Saturation**: signed and unsigned saturating add/subtract clamp instead of wrapping
//! - **Bit reinterpretation** through [`Element::to_bits`] / [`Element::from_bits`]
//!
//! Integral kinds wrap on overflow (two's complement) and reduce shift and rotate
//! amounts modulo the lane width. Floating kinds narrower than `f64` evaluate `SQRT`,
//! transcendental functions and `FMA` in the next wider format and round once.

use std::fmt;

use half::f16;

use crate::{
    error::{arithmetic_error, capability_error, Result},
    simd::{AssociativeOp, BinaryOp, Comparison, TernaryOp, TestOp, UnaryOp},
    utils::{compress_bits, expand_bits},
};

/// The closed set of lane element kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ElementKind {
    I8,
    I16,
    I32,
    I64,
    F16,
    F32,
    F64,
}

impl ElementKind {
    pub const ALL: [ElementKind; 7] = [
        ElementKind::I8,
        ElementKind::I16,
        ElementKind::I32,
        ElementKind::I64,
        ElementKind::F16,
        ElementKind::F32,
        ElementKind::F64,
    ];

    /// Width of one lane in bits.
    pub const fn bit_size(self) -> usize {
        match self {
            ElementKind::I8 => 8,
            ElementKind::I16 | ElementKind::F16 => 16,
            ElementKind::I32 | ElementKind::F32 => 32,
            ElementKind::I64 | ElementKind::F64 => 64,
        }
    }

    pub const fn byte_size(self) -> usize {
        self.bit_size() / 8
    }

    pub const fn is_floating(self) -> bool {
        matches!(self, ElementKind::F16 | ElementKind::F32 | ElementKind::F64)
    }

    pub const fn is_integral(self) -> bool {
        !self.is_floating()
    }

    /// Every kind is signed; unsigned views are provided by the `U*` operators.
    pub const fn is_signed(self) -> bool {
        true
    }

    /// The integral kind of the same width.
    pub const fn integral_counterpart(self) -> ElementKind {
        match self {
            ElementKind::F16 => ElementKind::I16,
            ElementKind::F32 => ElementKind::I32,
            ElementKind::F64 => ElementKind::I64,
            other => other,
        }
    }

    /// The floating kind of the same width, if one exists.
    pub const fn floating_counterpart(self) -> Option<ElementKind> {
        match self {
            ElementKind::I8 => None,
            ElementKind::I16 | ElementKind::F16 => Some(ElementKind::F16),
            ElementKind::I32 | ElementKind::F32 => Some(ElementKind::F32),
            ElementKind::I64 | ElementKind::F64 => Some(ElementKind::F64),
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            ElementKind::I8 => "i8",
            ElementKind::I16 => "i16",
            ElementKind::I32 => "i32",
            ElementKind::I64 => "i64",
            ElementKind::F16 => "f16",
            ElementKind::F32 => "f32",
            ElementKind::F64 => "f64",
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A scalar type that can populate vector lanes.
///
/// All per-lane semantics live here so that `Vector`, `Mask` and the reduction engine
/// stay generic. Operator methods return a
/// [`CapabilityError`](crate::VectorError::CapabilityError) for operators the kind
/// does not support; integer `DIV` by zero returns an
/// [`ArithmeticError`](crate::VectorError::ArithmeticError).
pub trait Element:
    Copy + Default + PartialEq + PartialOrd + fmt::Debug + fmt::Display + Send + Sync + 'static
{
    const KIND: ElementKind;

    /// Raw lane bits, zero-extended to 64 bits.
    fn to_bits(self) -> u64;

    /// Builds a lane from the low `KIND.bit_size()` bits of `bits`.
    fn from_bits(bits: u64) -> Self;

    /// Narrowing scalar extraction: wrapping for integers, saturating for floats.
    fn to_i32(self) -> i32;

    /// Widening scalar extraction: sign-extending for integers, saturating for floats.
    fn to_i64(self) -> i64;

    fn to_f64(self) -> f64;

    /// Wrapping conversion for integers, rounding conversion for floats.
    fn from_i64(value: i64) -> Self;

    /// Saturating conversion for integers, rounding conversion for floats.
    fn from_f64(value: f64) -> Self;

    /// Identity element of `op`: `op(identity, x) == x` for every `x`.
    fn identity(op: AssociativeOp) -> Result<Self>;

    fn unary(op: UnaryOp, a: Self) -> Result<Self>;

    fn binary(op: BinaryOp, a: Self, b: Self) -> Result<Self>;

    fn ternary(op: TernaryOp, a: Self, b: Self, c: Self) -> Result<Self>;

    fn compare(op: Comparison, a: Self, b: Self) -> Result<bool>;

    fn test(op: TestOp, a: Self) -> Result<bool>;
}

macro_rules! impl_integral_element {
    ($t:ty, $u:ty, $kind:expr) => {
        impl Element for $t {
            const KIND: ElementKind = $kind;

            #[inline(always)]
            fn to_bits(self) -> u64 {
                self as $u as u64
            }

            #[inline(always)]
            fn from_bits(bits: u64) -> Self {
                bits as $u as $t
            }

            #[inline(always)]
            fn to_i32(self) -> i32 {
                self as i32
            }

            #[inline(always)]
            fn to_i64(self) -> i64 {
                self as i64
            }

            #[inline(always)]
            fn to_f64(self) -> f64 {
                self as f64
            }

            #[inline(always)]
            fn from_i64(value: i64) -> Self {
                value as $t
            }

            #[inline(always)]
            fn from_f64(value: f64) -> Self {
                value as $t
            }

            fn identity(op: AssociativeOp) -> Result<Self> {
                Ok(match op {
                    AssociativeOp::Add
                    | AssociativeOp::Or
                    | AssociativeOp::Xor
                    | AssociativeOp::UMax
                    | AssociativeOp::FirstNonzero
                    | AssociativeOp::SUAdd => 0,
                    AssociativeOp::Mul => 1,
                    AssociativeOp::Min => <$t>::MAX,
                    AssociativeOp::Max => <$t>::MIN,
                    AssociativeOp::And | AssociativeOp::UMin => -1,
                })
            }

            fn unary(op: UnaryOp, a: Self) -> Result<Self> {
                Ok(match op {
                    UnaryOp::Neg => a.wrapping_neg(),
                    UnaryOp::Abs => a.wrapping_abs(),
                    UnaryOp::Not => !a,
                    UnaryOp::BitCount => a.count_ones() as $t,
                    UnaryOp::LeadingZerosCount => a.leading_zeros() as $t,
                    UnaryOp::TrailingZerosCount => a.trailing_zeros() as $t,
                    UnaryOp::Reverse => a.reverse_bits(),
                    UnaryOp::ReverseBytes => a.swap_bytes(),
                    UnaryOp::Zomo => {
                        if a == 0 {
                            0
                        } else {
                            -1
                        }
                    }
                    _ => return Err(capability_error(Self::KIND, op.name())),
                })
            }

            fn binary(op: BinaryOp, a: Self, b: Self) -> Result<Self> {
                // Shift and rotate amounts are taken modulo the lane width.
                let amount = (b as u32) & (<$t>::BITS - 1);

                Ok(match op {
                    BinaryOp::Add => a.wrapping_add(b),
                    BinaryOp::Sub => a.wrapping_sub(b),
                    BinaryOp::Mul => a.wrapping_mul(b),
                    BinaryOp::Div => {
                        if b == 0 {
                            return Err(arithmetic_error(format!(
                                "{} division by zero",
                                Self::KIND
                            )));
                        }
                        a.wrapping_div(b)
                    }
                    BinaryOp::Min => a.min(b),
                    BinaryOp::Max => a.max(b),
                    BinaryOp::FirstNonzero => {
                        if a != 0 {
                            a
                        } else {
                            b
                        }
                    }
                    BinaryOp::And => a & b,
                    BinaryOp::Or => a | b,
                    BinaryOp::Xor => a ^ b,
                    BinaryOp::AndNot => a & !b,
                    BinaryOp::UMin => (a as $u).min(b as $u) as $t,
                    BinaryOp::UMax => (a as $u).max(b as $u) as $t,
                    BinaryOp::SAdd => a.saturating_add(b),
                    BinaryOp::SSub => a.saturating_sub(b),
                    BinaryOp::SUAdd => (a as $u).saturating_add(b as $u) as $t,
                    BinaryOp::SUSub => (a as $u).saturating_sub(b as $u) as $t,
                    BinaryOp::Lshl => a.wrapping_shl(amount),
                    BinaryOp::Lshr => (a as $u).wrapping_shr(amount) as $t,
                    BinaryOp::Ashr => a.wrapping_shr(amount),
                    BinaryOp::Rol => a.rotate_left(amount),
                    BinaryOp::Ror => a.rotate_right(amount),
                    BinaryOp::CompressBits => {
                        compress_bits(a.to_bits(), b.to_bits(), <$t>::BITS) as $u as $t
                    }
                    BinaryOp::ExpandBits => {
                        expand_bits(a.to_bits(), b.to_bits(), <$t>::BITS) as $u as $t
                    }
                    BinaryOp::Atan2 | BinaryOp::Pow | BinaryOp::Hypot => {
                        return Err(capability_error(Self::KIND, op.name()))
                    }
                })
            }

            fn ternary(op: TernaryOp, a: Self, b: Self, c: Self) -> Result<Self> {
                match op {
                    TernaryOp::BitwiseBlend => Ok((a & !c) | (b & c)),
                    TernaryOp::Fma => Err(capability_error(Self::KIND, op.name())),
                }
            }

            fn compare(op: Comparison, a: Self, b: Self) -> Result<bool> {
                let (ua, ub) = (a as $u, b as $u);
                Ok(match op {
                    Comparison::Eq => a == b,
                    Comparison::Ne => a != b,
                    Comparison::Lt => a < b,
                    Comparison::Le => a <= b,
                    Comparison::Gt => a > b,
                    Comparison::Ge => a >= b,
                    Comparison::Ult => ua < ub,
                    Comparison::Ule => ua <= ub,
                    Comparison::Ugt => ua > ub,
                    Comparison::Uge => ua >= ub,
                })
            }

            fn test(op: TestOp, a: Self) -> Result<bool> {
                match op {
                    TestOp::IsDefault => Ok(a == 0),
                    TestOp::IsNegative => Ok(a < 0),
                    _ => Err(capability_error(Self::KIND, op.name())),
                }
            }
        }
    };
}

impl_integral_element!(i8, u8, ElementKind::I8);
impl_integral_element!(i16, u16, ElementKind::I16);
impl_integral_element!(i32, u32, ElementKind::I32);
impl_integral_element!(i64, u64, ElementKind::I64);

/// Evaluates a floating unary operator that has no exact lane formula.
#[inline(always)]
fn wide_unary<W: num::Float>(op: UnaryOp, x: W) -> W {
    match op {
        UnaryOp::Sqrt => x.sqrt(),
        UnaryOp::Cbrt => x.cbrt(),
        UnaryOp::Sin => x.sin(),
        UnaryOp::Cos => x.cos(),
        UnaryOp::Tan => x.tan(),
        UnaryOp::Asin => x.asin(),
        UnaryOp::Acos => x.acos(),
        UnaryOp::Atan => x.atan(),
        UnaryOp::Exp => x.exp(),
        UnaryOp::Expm1 => x.exp_m1(),
        UnaryOp::Log => x.ln(),
        UnaryOp::Log10 => x.log10(),
        UnaryOp::Log1p => x.ln_1p(),
        UnaryOp::Sinh => x.sinh(),
        UnaryOp::Cosh => x.cosh(),
        UnaryOp::Tanh => x.tanh(),
        _ => W::nan(),
    }
}

#[inline(always)]
fn wide_binary<W: num::Float>(op: BinaryOp, x: W, y: W) -> W {
    match op {
        BinaryOp::Atan2 => x.atan2(y),
        BinaryOp::Pow => x.powf(y),
        BinaryOp::Hypot => x.hypot(y),
        _ => W::nan(),
    }
}

pub(crate) fn reference_unary_f64(op: UnaryOp, x: f64) -> f64 {
    wide_unary(op, x)
}

pub(crate) fn reference_binary_f64(op: BinaryOp, x: f64, y: f64) -> f64 {
    wide_binary(op, x, y)
}

macro_rules! impl_floating_element {
    (
        $t:ty, $bits:ty, $kind:expr,
        wide = $wide:ty, to_wide = $to_wide:expr, from_wide = $from_wide:expr,
        to_f64 = $to_f64:expr, from_f64 = $from_f64:expr,
        zero = $zero:expr, one = $one:expr, inf = $inf:expr, neg_inf = $neg_inf:expr
    ) => {
        impl Element for $t {
            const KIND: ElementKind = $kind;

            #[inline(always)]
            fn to_bits(self) -> u64 {
                <$t>::to_bits(self) as u64
            }

            #[inline(always)]
            fn from_bits(bits: u64) -> Self {
                <$t>::from_bits(bits as $bits)
            }

            #[inline(always)]
            fn to_i32(self) -> i32 {
                ($to_f64)(self) as i32
            }

            #[inline(always)]
            fn to_i64(self) -> i64 {
                ($to_f64)(self) as i64
            }

            #[inline(always)]
            fn to_f64(self) -> f64 {
                ($to_f64)(self)
            }

            #[inline(always)]
            fn from_i64(value: i64) -> Self {
                ($from_f64)(value as f64)
            }

            #[inline(always)]
            fn from_f64(value: f64) -> Self {
                ($from_f64)(value)
            }

            fn identity(op: AssociativeOp) -> Result<Self> {
                match op {
                    AssociativeOp::Add | AssociativeOp::FirstNonzero => Ok($zero),
                    AssociativeOp::Mul => Ok($one),
                    AssociativeOp::Min => Ok($inf),
                    AssociativeOp::Max => Ok($neg_inf),
                    _ => Err(capability_error(Self::KIND, op.name())),
                }
            }

            fn unary(op: UnaryOp, a: Self) -> Result<Self> {
                const SIGN: u64 = 1 << (<$bits>::BITS - 1);

                if !op.supports(Self::KIND) {
                    return Err(capability_error(Self::KIND, op.name()));
                }
                Ok(match op {
                    UnaryOp::Neg => <Self as Element>::from_bits(Element::to_bits(a) ^ SIGN),
                    UnaryOp::Abs => <Self as Element>::from_bits(Element::to_bits(a) & !SIGN),
                    _ => ($from_wide)(wide_unary::<$wide>(op, ($to_wide)(a))),
                })
            }

            fn binary(op: BinaryOp, a: Self, b: Self) -> Result<Self> {
                Ok(match op {
                    BinaryOp::Add => a + b,
                    BinaryOp::Sub => a - b,
                    BinaryOp::Mul => a * b,
                    BinaryOp::Div => a / b,
                    BinaryOp::Min => {
                        if a.is_nan() || b.is_nan() {
                            <$t>::NAN
                        } else if a == b {
                            // -0.0 orders below +0.0
                            if a.is_sign_negative() { a } else { b }
                        } else if a < b {
                            a
                        } else {
                            b
                        }
                    }
                    BinaryOp::Max => {
                        if a.is_nan() || b.is_nan() {
                            <$t>::NAN
                        } else if a == b {
                            if a.is_sign_negative() { b } else { a }
                        } else if a > b {
                            a
                        } else {
                            b
                        }
                    }
                    BinaryOp::FirstNonzero => {
                        if Element::to_bits(a) != 0 {
                            a
                        } else {
                            b
                        }
                    }
                    BinaryOp::Atan2 | BinaryOp::Pow | BinaryOp::Hypot => ($from_wide)(
                        wide_binary::<$wide>(op, ($to_wide)(a), ($to_wide)(b)),
                    ),
                    _ => return Err(capability_error(Self::KIND, op.name())),
                })
            }

            fn ternary(op: TernaryOp, a: Self, b: Self, c: Self) -> Result<Self> {
                match op {
                    TernaryOp::Fma => Ok(($from_wide)(num::Float::mul_add(
                        ($to_wide)(a),
                        ($to_wide)(b),
                        ($to_wide)(c),
                    ))),
                    TernaryOp::BitwiseBlend => Err(capability_error(Self::KIND, op.name())),
                }
            }

            fn compare(op: Comparison, a: Self, b: Self) -> Result<bool> {
                Ok(match op {
                    Comparison::Eq => a == b,
                    Comparison::Ne => a != b,
                    Comparison::Lt => a < b,
                    Comparison::Le => a <= b,
                    Comparison::Gt => a > b,
                    Comparison::Ge => a >= b,
                    _ => return Err(capability_error(Self::KIND, op.name())),
                })
            }

            fn test(op: TestOp, a: Self) -> Result<bool> {
                Ok(match op {
                    TestOp::IsDefault => Element::to_bits(a) == 0,
                    TestOp::IsNegative => a.is_sign_negative(),
                    TestOp::IsFinite => a.is_finite(),
                    TestOp::IsNan => a.is_nan(),
                    TestOp::IsInfinite => a.is_infinite(),
                })
            }
        }
    };
}

impl_floating_element!(
    f16, u16, ElementKind::F16,
    wide = f32, to_wide = |x: f16| x.to_f32(), from_wide = f16::from_f32,
    to_f64 = |x: f16| x.to_f64(), from_f64 = f16::from_f64,
    zero = f16::ZERO, one = f16::ONE, inf = f16::INFINITY, neg_inf = f16::NEG_INFINITY
);

impl_floating_element!(
    f32, u32, ElementKind::F32,
    wide = f64, to_wide = |x: f32| x as f64, from_wide = |x: f64| x as f32,
    to_f64 = |x: f32| x as f64, from_f64 = |x: f64| x as f32,
    zero = 0.0, one = 1.0, inf = f32::INFINITY, neg_inf = f32::NEG_INFINITY
);

impl_floating_element!(
    f64, u64, ElementKind::F64,
    wide = f64, to_wide = |x: f64| x, from_wide = |x: f64| x,
    to_f64 = |x: f64| x, from_f64 = |x: f64| x,
    zero = 0.0, one = 1.0, inf = f64::INFINITY, neg_inf = f64::NEG_INFINITY
);
