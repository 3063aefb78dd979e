//! Operator taxonomy for lane-wise, comparison, test and reduction operations.
//!
//! Operators are plain `Copy` tags. Whether an element kind supports an operator can be
//! queried up front with `supports`, so a [`CapabilityError`](crate::VectorError) is
//! always avoidable by the caller.

use std::fmt;

use crate::simd::ElementKind;

/// Lane-wise unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Neg,
    Abs,
    Not,
    BitCount,
    LeadingZerosCount,
    TrailingZerosCount,
    Reverse,
    ReverseBytes,
    /// Zero-or-minus-one: `0` for zero lanes, all ones otherwise.
    Zomo,
    Sqrt,
    Cbrt,
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
    Exp,
    Expm1,
    Log,
    Log10,
    Log1p,
    Sinh,
    Cosh,
    Tanh,
}

impl UnaryOp {
    pub const ALL: [UnaryOp; 25] = [
        UnaryOp::Neg,
        UnaryOp::Abs,
        UnaryOp::Not,
        UnaryOp::BitCount,
        UnaryOp::LeadingZerosCount,
        UnaryOp::TrailingZerosCount,
        UnaryOp::Reverse,
        UnaryOp::ReverseBytes,
        UnaryOp::Zomo,
        UnaryOp::Sqrt,
        UnaryOp::Cbrt,
        UnaryOp::Sin,
        UnaryOp::Cos,
        UnaryOp::Tan,
        UnaryOp::Asin,
        UnaryOp::Acos,
        UnaryOp::Atan,
        UnaryOp::Exp,
        UnaryOp::Expm1,
        UnaryOp::Log,
        UnaryOp::Log10,
        UnaryOp::Log1p,
        UnaryOp::Sinh,
        UnaryOp::Cosh,
        UnaryOp::Tanh,
    ];

    pub fn name(self) -> &'static str {
        match self {
            UnaryOp::Neg => "NEG",
            UnaryOp::Abs => "ABS",
            UnaryOp::Not => "NOT",
            UnaryOp::BitCount => "BIT_COUNT",
            UnaryOp::LeadingZerosCount => "LEADING_ZEROS_COUNT",
            UnaryOp::TrailingZerosCount => "TRAILING_ZEROS_COUNT",
            UnaryOp::Reverse => "REVERSE",
            UnaryOp::ReverseBytes => "REVERSE_BYTES",
            UnaryOp::Zomo => "ZOMO",
            UnaryOp::Sqrt => "SQRT",
            UnaryOp::Cbrt => "CBRT",
            UnaryOp::Sin => "SIN",
            UnaryOp::Cos => "COS",
            UnaryOp::Tan => "TAN",
            UnaryOp::Asin => "ASIN",
            UnaryOp::Acos => "ACOS",
            UnaryOp::Atan => "ATAN",
            UnaryOp::Exp => "EXP",
            UnaryOp::Expm1 => "EXPM1",
            UnaryOp::Log => "LOG",
            UnaryOp::Log10 => "LOG10",
            UnaryOp::Log1p => "LOG1P",
            UnaryOp::Sinh => "SINH",
            UnaryOp::Cosh => "COSH",
            UnaryOp::Tanh => "TANH",
        }
    }

    /// Operators whose floating results are only guaranteed to a bounded ULP error.
    pub fn is_transcendental(self) -> bool {
        !matches!(
            self,
            UnaryOp::Neg
                | UnaryOp::Abs
                | UnaryOp::Not
                | UnaryOp::BitCount
                | UnaryOp::LeadingZerosCount
                | UnaryOp::TrailingZerosCount
                | UnaryOp::Reverse
                | UnaryOp::ReverseBytes
                | UnaryOp::Zomo
                | UnaryOp::Sqrt
        )
    }

    fn is_bitwise(self) -> bool {
        matches!(
            self,
            UnaryOp::Not
                | UnaryOp::BitCount
                | UnaryOp::LeadingZerosCount
                | UnaryOp::TrailingZerosCount
                | UnaryOp::Reverse
                | UnaryOp::ReverseBytes
                | UnaryOp::Zomo
        )
    }

    pub fn supports(self, kind: ElementKind) -> bool {
        match self {
            UnaryOp::Neg | UnaryOp::Abs => true,
            op if op.is_bitwise() => kind.is_integral(),
            _ => kind.is_floating(),
        }
    }
}

/// Lane-wise binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Min,
    Max,
    FirstNonzero,
    And,
    Or,
    Xor,
    AndNot,
    UMin,
    UMax,
    /// Signed saturating add.
    SAdd,
    /// Signed saturating subtract.
    SSub,
    /// Unsigned saturating add.
    SUAdd,
    /// Unsigned saturating subtract.
    SUSub,
    Lshl,
    Lshr,
    Ashr,
    Rol,
    Ror,
    CompressBits,
    ExpandBits,
    Atan2,
    Pow,
    Hypot,
}

impl BinaryOp {
    pub const ALL: [BinaryOp; 27] = [
        BinaryOp::Add,
        BinaryOp::Sub,
        BinaryOp::Mul,
        BinaryOp::Div,
        BinaryOp::Min,
        BinaryOp::Max,
        BinaryOp::FirstNonzero,
        BinaryOp::And,
        BinaryOp::Or,
        BinaryOp::Xor,
        BinaryOp::AndNot,
        BinaryOp::UMin,
        BinaryOp::UMax,
        BinaryOp::SAdd,
        BinaryOp::SSub,
        BinaryOp::SUAdd,
        BinaryOp::SUSub,
        BinaryOp::Lshl,
        BinaryOp::Lshr,
        BinaryOp::Ashr,
        BinaryOp::Rol,
        BinaryOp::Ror,
        BinaryOp::CompressBits,
        BinaryOp::ExpandBits,
        BinaryOp::Atan2,
        BinaryOp::Pow,
        BinaryOp::Hypot,
    ];

    pub fn name(self) -> &'static str {
        match self {
            BinaryOp::Add => "ADD",
            BinaryOp::Sub => "SUB",
            BinaryOp::Mul => "MUL",
            BinaryOp::Div => "DIV",
            BinaryOp::Min => "MIN",
            BinaryOp::Max => "MAX",
            BinaryOp::FirstNonzero => "FIRST_NONZERO",
            BinaryOp::And => "AND",
            BinaryOp::Or => "OR",
            BinaryOp::Xor => "XOR",
            BinaryOp::AndNot => "AND_NOT",
            BinaryOp::UMin => "UMIN",
            BinaryOp::UMax => "UMAX",
            BinaryOp::SAdd => "SADD",
            BinaryOp::SSub => "SSUB",
            BinaryOp::SUAdd => "SUADD",
            BinaryOp::SUSub => "SUSUB",
            BinaryOp::Lshl => "LSHL",
            BinaryOp::Lshr => "LSHR",
            BinaryOp::Ashr => "ASHR",
            BinaryOp::Rol => "ROL",
            BinaryOp::Ror => "ROR",
            BinaryOp::CompressBits => "COMPRESS_BITS",
            BinaryOp::ExpandBits => "EXPAND_BITS",
            BinaryOp::Atan2 => "ATAN2",
            BinaryOp::Pow => "POW",
            BinaryOp::Hypot => "HYPOT",
        }
    }

    /// Shifts and rotates, whose second operand is reduced modulo the lane width.
    pub fn is_shift(self) -> bool {
        matches!(
            self,
            BinaryOp::Lshl | BinaryOp::Lshr | BinaryOp::Ashr | BinaryOp::Rol | BinaryOp::Ror
        )
    }

    pub fn is_transcendental(self) -> bool {
        matches!(self, BinaryOp::Atan2 | BinaryOp::Pow | BinaryOp::Hypot)
    }

    pub fn supports(self, kind: ElementKind) -> bool {
        match self {
            BinaryOp::Add
            | BinaryOp::Sub
            | BinaryOp::Mul
            | BinaryOp::Div
            | BinaryOp::Min
            | BinaryOp::Max
            | BinaryOp::FirstNonzero => true,
            op if op.is_transcendental() => kind.is_floating(),
            _ => kind.is_integral(),
        }
    }
}

/// Lane-wise ternary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TernaryOp {
    /// Fused multiply-add `a * b + c`.
    Fma,
    /// `(a & !c) | (b & c)`.
    BitwiseBlend,
}

impl TernaryOp {
    pub fn name(self) -> &'static str {
        match self {
            TernaryOp::Fma => "FMA",
            TernaryOp::BitwiseBlend => "BITWISE_BLEND",
        }
    }

    pub fn supports(self, kind: ElementKind) -> bool {
        match self {
            TernaryOp::Fma => kind.is_floating(),
            TernaryOp::BitwiseBlend => kind.is_integral(),
        }
    }
}

/// Lane-wise comparisons producing a mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Comparison {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    Ult,
    Ule,
    Ugt,
    Uge,
}

impl Comparison {
    pub const ALL: [Comparison; 10] = [
        Comparison::Eq,
        Comparison::Ne,
        Comparison::Lt,
        Comparison::Le,
        Comparison::Gt,
        Comparison::Ge,
        Comparison::Ult,
        Comparison::Ule,
        Comparison::Ugt,
        Comparison::Uge,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Comparison::Eq => "EQ",
            Comparison::Ne => "NE",
            Comparison::Lt => "LT",
            Comparison::Le => "LE",
            Comparison::Gt => "GT",
            Comparison::Ge => "GE",
            Comparison::Ult => "ULT",
            Comparison::Ule => "ULE",
            Comparison::Ugt => "UGT",
            Comparison::Uge => "UGE",
        }
    }

    pub fn is_unsigned(self) -> bool {
        matches!(
            self,
            Comparison::Ult | Comparison::Ule | Comparison::Ugt | Comparison::Uge
        )
    }

    pub fn supports(self, kind: ElementKind) -> bool {
        !self.is_unsigned() || kind.is_integral()
    }
}

/// Lane predicates producing a mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TestOp {
    /// Lane bit pattern is zero.
    IsDefault,
    /// Sign bit is set.
    IsNegative,
    IsFinite,
    IsNan,
    IsInfinite,
}

impl TestOp {
    pub fn name(self) -> &'static str {
        match self {
            TestOp::IsDefault => "IS_DEFAULT",
            TestOp::IsNegative => "IS_NEGATIVE",
            TestOp::IsFinite => "IS_FINITE",
            TestOp::IsNan => "IS_NAN",
            TestOp::IsInfinite => "IS_INFINITE",
        }
    }

    pub fn supports(self, kind: ElementKind) -> bool {
        match self {
            TestOp::IsDefault | TestOp::IsNegative => true,
            _ => kind.is_floating(),
        }
    }
}

/// Associative operators usable in reductions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssociativeOp {
    Add,
    Mul,
    Min,
    Max,
    FirstNonzero,
    And,
    Or,
    Xor,
    UMin,
    UMax,
    SUAdd,
}

impl AssociativeOp {
    pub const ALL: [AssociativeOp; 11] = [
        AssociativeOp::Add,
        AssociativeOp::Mul,
        AssociativeOp::Min,
        AssociativeOp::Max,
        AssociativeOp::FirstNonzero,
        AssociativeOp::And,
        AssociativeOp::Or,
        AssociativeOp::Xor,
        AssociativeOp::UMin,
        AssociativeOp::UMax,
        AssociativeOp::SUAdd,
    ];

    pub fn name(self) -> &'static str {
        self.as_binary().name()
    }

    /// The lane-wise operator folded by this reduction.
    pub fn as_binary(self) -> BinaryOp {
        match self {
            AssociativeOp::Add => BinaryOp::Add,
            AssociativeOp::Mul => BinaryOp::Mul,
            AssociativeOp::Min => BinaryOp::Min,
            AssociativeOp::Max => BinaryOp::Max,
            AssociativeOp::FirstNonzero => BinaryOp::FirstNonzero,
            AssociativeOp::And => BinaryOp::And,
            AssociativeOp::Or => BinaryOp::Or,
            AssociativeOp::Xor => BinaryOp::Xor,
            AssociativeOp::UMin => BinaryOp::UMin,
            AssociativeOp::UMax => BinaryOp::UMax,
            AssociativeOp::SUAdd => BinaryOp::SUAdd,
        }
    }

    pub fn supports(self, kind: ElementKind) -> bool {
        self.as_binary().supports(kind)
    }
}

macro_rules! impl_display_by_name {
    ($($t:ty),*) => {
        $(
            impl fmt::Display for $t {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.name())
                }
            }
        )*
    };
}

impl_display_by_name!(UnaryOp, BinaryOp, TernaryOp, Comparison, TestOp, AssociativeOp);
