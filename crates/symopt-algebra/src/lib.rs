//! SymOpt scalar-operation algebra
//!
//! This crate is the semantic foundation of the framework: the closed
//! catalogue of built-in scalar operations together with their numeric
//! evaluation rules, first-order partial derivatives, algebraic flags, and
//! printing grammar, dispatched generically over the operand type.
//!
//! # Architecture
//!
//! - [`OpCode`] enumerates the operations; each carries a static
//!   [`OpDescriptor`] (arity, commutativity, zero-absorption flags, print
//!   grammar).
//! - [`Scalar`] is the operand trait; `f64` and `f32` impls ship here and
//!   AD or symbolic operand types implement it downstream.
//! - [`OpTable`] holds the dense per-operand-type dispatch tables, built
//!   once per type and shared process-wide; [`eval`], [`partials`] and
//!   [`eval_and_partials`] are the entry points expression graphs and the
//!   derivative propagation layers call.
//!
//! # Design Principles
//!
//! 1. **One source of truth**: every operation defines its evaluator,
//!    derivative, flags and grammar exactly once.
//! 2. **Uniform over operand domains**: the same rules serve concrete
//!    floats and AD pairs; nothing in the dispatch path assumes `f64`.
//! 3. **Exact algebraic contracts**: zero-absorption and commutativity
//!    flags are promises simplification and sparsity passes may rely on.

mod opcode;
mod print;
mod rules;
mod scalar;
mod table;

pub use opcode::{Arity, OpCode, OpDescriptor, NUM_BUILT_IN_OPS};
pub use scalar::Scalar;
pub use table::{eval, eval_and_partials, partials, table, DerFn, EvalDerFn, EvalFn, OpTable};

/// Error type for the algebra surface.
#[derive(Debug, Clone, thiserror::Error)]
pub enum AlgebraError {
    #[error("invalid operation code: {0}")]
    InvalidOpCode(u8),
}

pub type Result<T> = std::result::Result<T, AlgebraError>;
