//! Evaluation and first-order derivative rules for every built-in operation.
//!
//! Each operation contributes three generic functions: an evaluator
//! `(x, y) -> f`, a partial-derivative rule `(x, y, f) -> (d0, d1)`, and a
//! fused form that evaluates first and derives from the fresh result. Unary
//! operations ignore `y` and set the second partial to an exact zero.
//!
//! Several derivative rules are written in terms of the already-computed
//! output `f` (`Div`, `Exp`, `Sqrt`, `Inv`, `Tanh`); the fused forms and the
//! dispatch layer guarantee the evaluator runs before the derivative rule.

use crate::scalar::Scalar;

// ========== Binary arithmetic ==========

pub(crate) fn eval_add<T: Scalar>(x: &T, y: &T) -> T {
    x.clone() + y.clone()
}

pub(crate) fn der_add<T: Scalar>(_x: &T, _y: &T, _f: &T) -> (T, T) {
    (T::one(), T::one())
}

pub(crate) fn eval_sub<T: Scalar>(x: &T, y: &T) -> T {
    x.clone() - y.clone()
}

pub(crate) fn der_sub<T: Scalar>(_x: &T, _y: &T, _f: &T) -> (T, T) {
    (T::one(), -T::one())
}

pub(crate) fn eval_mul<T: Scalar>(x: &T, y: &T) -> T {
    x.clone() * y.clone()
}

pub(crate) fn der_mul<T: Scalar>(x: &T, y: &T, _f: &T) -> (T, T) {
    (y.clone(), x.clone())
}

pub(crate) fn eval_div<T: Scalar>(x: &T, y: &T) -> T {
    x.clone() / y.clone()
}

pub(crate) fn der_div<T: Scalar>(_x: &T, y: &T, f: &T) -> (T, T) {
    (T::one() / y.clone(), -(f.clone() / y.clone()))
}

// ========== Negation, exponentials, powers ==========

pub(crate) fn eval_neg<T: Scalar>(x: &T, _y: &T) -> T {
    -x.clone()
}

pub(crate) fn der_neg<T: Scalar>(_x: &T, _y: &T, _f: &T) -> (T, T) {
    (-T::one(), T::zero())
}

pub(crate) fn eval_exp<T: Scalar>(x: &T, _y: &T) -> T {
    x.exp()
}

pub(crate) fn der_exp<T: Scalar>(_x: &T, _y: &T, f: &T) -> (T, T) {
    (f.clone(), T::zero())
}

pub(crate) fn eval_log<T: Scalar>(x: &T, _y: &T) -> T {
    x.ln()
}

pub(crate) fn der_log<T: Scalar>(x: &T, _y: &T, _f: &T) -> (T, T) {
    (T::one() / x.clone(), T::zero())
}

pub(crate) fn eval_pow<T: Scalar>(x: &T, y: &T) -> T {
    x.powf(y)
}

// d0 is y*x^(y-1) rather than y*f/x so it stays defined at x = 0 for
// integer exponents.
pub(crate) fn der_pow<T: Scalar>(x: &T, y: &T, f: &T) -> (T, T) {
    let d0 = y.clone() * x.powf(&(y.clone() - T::one()));
    let d1 = x.ln() * f.clone();
    (d0, d1)
}

pub(crate) fn eval_constpow<T: Scalar>(x: &T, y: &T) -> T {
    x.powf(y)
}

// The exponent is constant by contract, so its partial is zero.
pub(crate) fn der_constpow<T: Scalar>(x: &T, y: &T, _f: &T) -> (T, T) {
    (y.clone() * x.powf(&(y.clone() - T::one())), T::zero())
}

pub(crate) fn eval_sqrt<T: Scalar>(x: &T, _y: &T) -> T {
    x.sqrt()
}

pub(crate) fn der_sqrt<T: Scalar>(_x: &T, _y: &T, f: &T) -> (T, T) {
    (T::one() / (f.clone() + f.clone()), T::zero())
}

// ========== Trigonometry ==========

pub(crate) fn eval_sin<T: Scalar>(x: &T, _y: &T) -> T {
    x.sin()
}

pub(crate) fn der_sin<T: Scalar>(x: &T, _y: &T, _f: &T) -> (T, T) {
    (x.cos(), T::zero())
}

pub(crate) fn eval_cos<T: Scalar>(x: &T, _y: &T) -> T {
    x.cos()
}

pub(crate) fn der_cos<T: Scalar>(x: &T, _y: &T, _f: &T) -> (T, T) {
    (-x.sin(), T::zero())
}

pub(crate) fn eval_tan<T: Scalar>(x: &T, _y: &T) -> T {
    x.tan()
}

pub(crate) fn der_tan<T: Scalar>(x: &T, _y: &T, _f: &T) -> (T, T) {
    let c = x.cos();
    (T::one() / (c.clone() * c), T::zero())
}

pub(crate) fn eval_asin<T: Scalar>(x: &T, _y: &T) -> T {
    x.asin()
}

pub(crate) fn der_asin<T: Scalar>(x: &T, _y: &T, _f: &T) -> (T, T) {
    (T::one() / (T::one() - x.clone() * x.clone()).sqrt(), T::zero())
}

pub(crate) fn eval_acos<T: Scalar>(x: &T, _y: &T) -> T {
    x.acos()
}

pub(crate) fn der_acos<T: Scalar>(x: &T, _y: &T, _f: &T) -> (T, T) {
    (-(T::one() / (T::one() - x.clone() * x.clone()).sqrt()), T::zero())
}

pub(crate) fn eval_atan<T: Scalar>(x: &T, _y: &T) -> T {
    x.atan()
}

pub(crate) fn der_atan<T: Scalar>(x: &T, _y: &T, _f: &T) -> (T, T) {
    (T::one() / (T::one() + x.clone() * x.clone()), T::zero())
}

// ========== Piecewise-constant operations ==========

pub(crate) fn eval_step<T: Scalar>(x: &T, _y: &T) -> T {
    x.ge_mask(&T::zero())
}

pub(crate) fn der_step<T: Scalar>(_x: &T, _y: &T, _f: &T) -> (T, T) {
    (T::zero(), T::zero())
}

pub(crate) fn eval_floor<T: Scalar>(x: &T, _y: &T) -> T {
    x.floor()
}

pub(crate) fn der_floor<T: Scalar>(_x: &T, _y: &T, _f: &T) -> (T, T) {
    (T::zero(), T::zero())
}

pub(crate) fn eval_ceil<T: Scalar>(x: &T, _y: &T) -> T {
    x.ceil()
}

pub(crate) fn der_ceil<T: Scalar>(_x: &T, _y: &T, _f: &T) -> (T, T) {
    (T::zero(), T::zero())
}

pub(crate) fn eval_equality<T: Scalar>(x: &T, y: &T) -> T {
    x.eq_mask(y)
}

pub(crate) fn der_equality<T: Scalar>(_x: &T, _y: &T, _f: &T) -> (T, T) {
    (T::zero(), T::zero())
}

// ========== Error function, extrema, inverse ==========

pub(crate) fn eval_erf<T: Scalar>(x: &T, _y: &T) -> T {
    x.erf()
}

pub(crate) fn der_erf<T: Scalar>(x: &T, _y: &T, _f: &T) -> (T, T) {
    let d0 = T::from_f64(std::f64::consts::FRAC_2_SQRT_PI) * (-(x.clone() * x.clone())).exp();
    (d0, T::zero())
}

pub(crate) fn eval_fmin<T: Scalar>(x: &T, y: &T) -> T {
    x.fmin(y)
}

pub(crate) fn der_fmin<T: Scalar>(x: &T, y: &T, _f: &T) -> (T, T) {
    let d0 = x.le_mask(y);
    let d1 = T::one() - d0.clone();
    (d0, d1)
}

pub(crate) fn eval_fmax<T: Scalar>(x: &T, y: &T) -> T {
    x.fmax(y)
}

pub(crate) fn der_fmax<T: Scalar>(x: &T, y: &T, _f: &T) -> (T, T) {
    let d0 = x.ge_mask(y);
    let d1 = T::one() - d0.clone();
    (d0, d1)
}

pub(crate) fn eval_inv<T: Scalar>(x: &T, _y: &T) -> T {
    T::one() / x.clone()
}

pub(crate) fn der_inv<T: Scalar>(_x: &T, _y: &T, f: &T) -> (T, T) {
    (-(f.clone() * f.clone()), T::zero())
}

// ========== Hyperbolic operations ==========

pub(crate) fn eval_sinh<T: Scalar>(x: &T, _y: &T) -> T {
    x.sinh()
}

pub(crate) fn der_sinh<T: Scalar>(x: &T, _y: &T, _f: &T) -> (T, T) {
    (x.cosh(), T::zero())
}

pub(crate) fn eval_cosh<T: Scalar>(x: &T, _y: &T) -> T {
    x.cosh()
}

pub(crate) fn der_cosh<T: Scalar>(x: &T, _y: &T, _f: &T) -> (T, T) {
    (x.sinh(), T::zero())
}

pub(crate) fn eval_tanh<T: Scalar>(x: &T, _y: &T) -> T {
    x.tanh()
}

pub(crate) fn der_tanh<T: Scalar>(_x: &T, _y: &T, f: &T) -> (T, T) {
    (T::one() - f.clone() * f.clone(), T::zero())
}

// ========== Diagnostic identity ==========

pub(crate) fn eval_printme<T: Scalar>(x: &T, y: &T) -> T {
    x.on_printme(y);
    x.clone()
}

// Identity in the first argument.
pub(crate) fn der_printme<T: Scalar>(_x: &T, _y: &T, _f: &T) -> (T, T) {
    (T::one(), T::zero())
}

// ========== Fused evaluate-and-derive forms ==========

// Evaluate into a fresh temporary, then derive from it. Keeping the result
// in a local means callers may alias inputs and outputs freely.
macro_rules! fused {
    ($fused:ident, $eval:ident, $der:ident) => {
        pub(crate) fn $fused<T: Scalar>(x: &T, y: &T) -> (T, T, T) {
            let f = $eval(x, y);
            let (d0, d1) = $der(x, y, &f);
            (f, d0, d1)
        }
    };
}

fused!(eval_der_add, eval_add, der_add);
fused!(eval_der_sub, eval_sub, der_sub);
fused!(eval_der_mul, eval_mul, der_mul);
fused!(eval_der_div, eval_div, der_div);
fused!(eval_der_neg, eval_neg, der_neg);
fused!(eval_der_exp, eval_exp, der_exp);
fused!(eval_der_log, eval_log, der_log);
fused!(eval_der_pow, eval_pow, der_pow);
fused!(eval_der_constpow, eval_constpow, der_constpow);
fused!(eval_der_sqrt, eval_sqrt, der_sqrt);
fused!(eval_der_sin, eval_sin, der_sin);
fused!(eval_der_cos, eval_cos, der_cos);
fused!(eval_der_tan, eval_tan, der_tan);
fused!(eval_der_asin, eval_asin, der_asin);
fused!(eval_der_acos, eval_acos, der_acos);
fused!(eval_der_atan, eval_atan, der_atan);
fused!(eval_der_step, eval_step, der_step);
fused!(eval_der_floor, eval_floor, der_floor);
fused!(eval_der_ceil, eval_ceil, der_ceil);
fused!(eval_der_equality, eval_equality, der_equality);
fused!(eval_der_erf, eval_erf, der_erf);
fused!(eval_der_fmin, eval_fmin, der_fmin);
fused!(eval_der_fmax, eval_fmax, der_fmax);
fused!(eval_der_inv, eval_inv, der_inv);
fused!(eval_der_sinh, eval_sinh, der_sinh);
fused!(eval_der_cosh, eval_cosh, der_cosh);
fused!(eval_der_tanh, eval_tanh, der_tanh);
fused!(eval_der_printme, eval_printme, der_printme);
