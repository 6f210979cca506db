//! Dense dispatch tables, one per operand type.
//!
//! Dispatch is an array index keyed by the opcode ordinal. A table is built
//! the first time an operand type is used, published through a process-wide
//! registry, and read without locking from then on. A missing entry at build
//! time is a build bug and aborts the process.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::{Mutex, OnceLock};

use log::{debug, error};

use crate::opcode::{OpCode, NUM_BUILT_IN_OPS};
use crate::rules;
use crate::scalar::Scalar;

/// Evaluator entry: `(x, y) -> f`.
pub type EvalFn<T> = fn(&T, &T) -> T;
/// Partial-derivative entry: `(x, y, f) -> (d0, d1)`.
pub type DerFn<T> = fn(&T, &T, &T) -> (T, T);
/// Fused entry: `(x, y) -> (f, d0, d1)`.
pub type EvalDerFn<T> = fn(&T, &T) -> (T, T, T);

/// The complete operation tables for one operand type.
pub struct OpTable<T: Scalar> {
    eval: [EvalFn<T>; NUM_BUILT_IN_OPS],
    der: [DerFn<T>; NUM_BUILT_IN_OPS],
    eval_der: [EvalDerFn<T>; NUM_BUILT_IN_OPS],
}

impl<T: Scalar> OpTable<T> {
    /// Populate all three tables, entry by entry.
    ///
    /// Panics if any opcode ends up without an entry: that is a build bug in
    /// this module, not a runtime condition, and nothing downstream can run
    /// with a partial table.
    fn build() -> Self {
        let mut eval: [Option<EvalFn<T>>; NUM_BUILT_IN_OPS] = [None; NUM_BUILT_IN_OPS];
        let mut der: [Option<DerFn<T>>; NUM_BUILT_IN_OPS] = [None; NUM_BUILT_IN_OPS];
        let mut fused: [Option<EvalDerFn<T>>; NUM_BUILT_IN_OPS] = [None; NUM_BUILT_IN_OPS];

        let mut set = |op: OpCode, e: EvalFn<T>, d: DerFn<T>, f: EvalDerFn<T>| {
            eval[op as usize] = Some(e);
            der[op as usize] = Some(d);
            fused[op as usize] = Some(f);
        };

        set(OpCode::Add, rules::eval_add, rules::der_add, rules::eval_der_add);
        set(OpCode::Sub, rules::eval_sub, rules::der_sub, rules::eval_der_sub);
        set(OpCode::Mul, rules::eval_mul, rules::der_mul, rules::eval_der_mul);
        set(OpCode::Div, rules::eval_div, rules::der_div, rules::eval_der_div);

        set(OpCode::Neg, rules::eval_neg, rules::der_neg, rules::eval_der_neg);
        set(OpCode::Exp, rules::eval_exp, rules::der_exp, rules::eval_der_exp);
        set(OpCode::Log, rules::eval_log, rules::der_log, rules::eval_der_log);
        set(OpCode::Pow, rules::eval_pow, rules::der_pow, rules::eval_der_pow);
        set(
            OpCode::ConstPow,
            rules::eval_constpow,
            rules::der_constpow,
            rules::eval_der_constpow,
        );

        set(OpCode::Sqrt, rules::eval_sqrt, rules::der_sqrt, rules::eval_der_sqrt);
        set(OpCode::Sin, rules::eval_sin, rules::der_sin, rules::eval_der_sin);
        set(OpCode::Cos, rules::eval_cos, rules::der_cos, rules::eval_der_cos);
        set(OpCode::Tan, rules::eval_tan, rules::der_tan, rules::eval_der_tan);

        set(OpCode::Asin, rules::eval_asin, rules::der_asin, rules::eval_der_asin);
        set(OpCode::Acos, rules::eval_acos, rules::der_acos, rules::eval_der_acos);
        set(OpCode::Atan, rules::eval_atan, rules::der_atan, rules::eval_der_atan);

        set(OpCode::Step, rules::eval_step, rules::der_step, rules::eval_der_step);
        set(OpCode::Floor, rules::eval_floor, rules::der_floor, rules::eval_der_floor);
        set(OpCode::Ceil, rules::eval_ceil, rules::der_ceil, rules::eval_der_ceil);
        set(
            OpCode::Equality,
            rules::eval_equality,
            rules::der_equality,
            rules::eval_der_equality,
        );

        set(OpCode::Erf, rules::eval_erf, rules::der_erf, rules::eval_der_erf);
        set(OpCode::Fmin, rules::eval_fmin, rules::der_fmin, rules::eval_der_fmin);
        set(OpCode::Fmax, rules::eval_fmax, rules::der_fmax, rules::eval_der_fmax);
        set(OpCode::Inv, rules::eval_inv, rules::der_inv, rules::eval_der_inv);

        set(OpCode::Sinh, rules::eval_sinh, rules::der_sinh, rules::eval_der_sinh);
        set(OpCode::Cosh, rules::eval_cosh, rules::der_cosh, rules::eval_der_cosh);
        set(OpCode::Tanh, rules::eval_tanh, rules::der_tanh, rules::eval_der_tanh);

        set(
            OpCode::PrintMe,
            rules::eval_printme,
            rules::der_printme,
            rules::eval_der_printme,
        );

        OpTable {
            eval: complete(&eval),
            der: complete(&der),
            eval_der: complete(&fused),
        }
    }

    /// Apply the numeric rule of `op`. For unary operations `y` is ignored
    /// but must be a well-formed value.
    #[inline]
    pub fn eval(&self, op: OpCode, x: &T, y: &T) -> T {
        (self.eval[op as usize])(x, y)
    }

    /// Partial derivatives of `op` with respect to both operands, given the
    /// already-computed output `f`. The second partial is an exact zero for
    /// unary operations.
    #[inline]
    pub fn partials(&self, op: OpCode, x: &T, y: &T, f: &T) -> (T, T) {
        (self.der[op as usize])(x, y, f)
    }

    /// Evaluate and differentiate in one call.
    ///
    /// The output is computed into a temporary strictly before the
    /// derivative rule runs, and that temporary is the `f` the rule sees, so
    /// derivatives expressed in terms of the output stay correct even when
    /// the caller's input and output storage alias.
    #[inline]
    pub fn eval_and_partials(&self, op: OpCode, x: &T, y: &T) -> (T, T, T) {
        (self.eval_der[op as usize])(x, y)
    }

    #[cfg(test)]
    fn lengths(&self) -> (usize, usize, usize) {
        (self.eval.len(), self.der.len(), self.eval_der.len())
    }
}

fn complete<F: Copy>(slots: &[Option<F>; NUM_BUILT_IN_OPS]) -> [F; NUM_BUILT_IN_OPS] {
    std::array::from_fn(|i| {
        slots[i].unwrap_or_else(|| {
            let op = OpCode::ALL[i];
            error!("operation table has no entry for {op:?}");
            panic!("operation table has no entry for {op:?}");
        })
    })
}

static TABLES: OnceLock<Mutex<HashMap<TypeId, &'static (dyn Any + Send + Sync)>>> =
    OnceLock::new();

/// The operation table for operand type `T`, built on first use.
///
/// Construction is serialised behind a lock, so concurrent first uses observe
/// a single fully-built table; afterwards this is a map lookup returning a
/// `'static` reference and dispatch through it takes no locks.
pub fn table<T: Scalar>() -> &'static OpTable<T> {
    let registry = TABLES.get_or_init(|| Mutex::new(HashMap::new()));
    let mut guard = registry.lock().unwrap();
    let entry: &'static (dyn Any + Send + Sync) =
        *guard.entry(TypeId::of::<T>()).or_insert_with(|| {
            debug!("building operation table for {}", std::any::type_name::<T>());
            let built: &'static OpTable<T> = Box::leak(Box::new(OpTable::<T>::build()));
            built
        });
    entry
        .downcast_ref::<OpTable<T>>()
        .expect("operation table registered under a foreign type")
}

/// Evaluate `op` on `(x, y)`.
#[inline]
pub fn eval<T: Scalar>(op: OpCode, x: &T, y: &T) -> T {
    table::<T>().eval(op, x, y)
}

/// Partial derivatives of `op` at `(x, y)` given the output `f`.
#[inline]
pub fn partials<T: Scalar>(op: OpCode, x: &T, y: &T, f: &T) -> (T, T) {
    table::<T>().partials(op, x, y, f)
}

/// Evaluate `op` and its partials in one call; see
/// [`OpTable::eval_and_partials`] for the aliasing contract.
#[inline]
pub fn eval_and_partials<T: Scalar>(op: OpCode, x: &T, y: &T) -> (T, T, T) {
    table::<T>().eval_and_partials(op, x, y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tables_are_complete() {
        let t = table::<f64>();
        assert_eq!(
            t.lengths(),
            (NUM_BUILT_IN_OPS, NUM_BUILT_IN_OPS, NUM_BUILT_IN_OPS)
        );
        // Every entry dispatches; operands chosen inside every op's domain.
        for op in OpCode::ALL {
            let f: f64 = eval(op, &0.5, &0.25);
            assert!(f.is_finite(), "{op:?} produced {f}");
        }
    }

    #[test]
    fn table_reference_is_shared() {
        let a = table::<f64>() as *const OpTable<f64>;
        let b = table::<f64>() as *const OpTable<f64>;
        assert_eq!(a, b);
    }

    #[test]
    fn add_matches_hand_computation() {
        assert_eq!(eval(OpCode::Add, &2.0, &3.0), 5.0);
        assert_eq!(partials(OpCode::Add, &2.0, &3.0, &5.0), (1.0, 1.0));
    }

    #[test]
    fn div_fused_path() {
        assert_eq!(eval_and_partials(OpCode::Div, &6.0, &2.0), (3.0, 0.5, -1.5));
    }

    #[test]
    fn pow_partials() {
        assert_eq!(eval(OpCode::Pow, &2.0, &3.0), 8.0);
        let (d0, d1): (f64, f64) = partials(OpCode::Pow, &2.0, &3.0, &8.0);
        assert!((d0 - 12.0).abs() < 1e-12);
        assert!((d1 - 2.0f64.ln() * 8.0).abs() < 1e-12);
    }

    #[test]
    fn constpow_second_partial_is_zero() {
        let (f, d0, d1): (f64, f64, f64) = eval_and_partials(OpCode::ConstPow, &2.0, &3.0);
        assert_eq!(f, 8.0);
        assert!((d0 - 12.0).abs() < 1e-12);
        assert_eq!(d1, 0.0);
    }

    #[test]
    fn fmin_selects_and_differentiates() {
        assert_eq!(eval(OpCode::Fmin, &1.5, &2.5), 1.5);
        assert_eq!(partials(OpCode::Fmin, &1.5, &2.5, &1.5), (1.0, 0.0));
        assert_eq!(partials(OpCode::Fmax, &1.5, &2.5, &2.5), (0.0, 1.0));
    }

    #[test]
    fn tanh_at_origin() {
        let (f, d0, d1) = eval_and_partials(OpCode::Tanh, &0.0, &0.0);
        assert_eq!(f, 0.0);
        assert_eq!(d0, 1.0);
        assert_eq!(d1, 0.0);
    }

    #[test]
    fn mul_absorbs_zero() {
        assert_eq!(eval(OpCode::Mul, &0.0, &7.0), 0.0);
        assert!(OpCode::Mul.f00_is_zero());
        assert!(OpCode::Mul.f0x_is_zero());
        assert!(OpCode::Mul.fx0_is_zero());
    }

    #[test]
    fn printme_is_the_identity_with_unit_partial() {
        let (f, d0, d1) = eval_and_partials(OpCode::PrintMe, &4.25, &17.0);
        assert_eq!(f, 4.25);
        assert_eq!(d0, 1.0);
        assert_eq!(d1, 0.0);
    }

    #[test]
    fn f32_table_dispatches() {
        assert_eq!(eval(OpCode::Add, &2.0f32, &3.0f32), 5.0f32);
        let (f, d0, d1) = eval_and_partials(OpCode::Inv, &4.0f32, &0.0f32);
        assert_eq!(f, 0.25);
        assert_eq!(d0, -0.0625);
        assert_eq!(d1, 0.0);
    }
}
