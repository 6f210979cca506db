//! The operand trait the operation rules are generic over.
//!
//! Any scalar-like value can flow through the dispatch tables: concrete
//! floats, forward-mode AD pairs, interval or symbolic values, as long as it
//! provides the arithmetic surface below. Comparisons return a mask *value*
//! of the same type rather than `bool` so that operand types without a
//! concrete ordering (symbolic nodes, AD pairs) stay expressible.

use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};

/// A scalar operand type.
///
/// Implementations are value types: the rules take operands by shared
/// reference, clone where they need an owned value, and return results by
/// value. For `Copy` scalars the clones are free.
pub trait Scalar:
    Clone
    + PartialEq
    + fmt::Debug
    + Send
    + Sync
    + 'static
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Neg<Output = Self>
{
    /// The additive identity. Zero-absorption flags promise outputs equal to
    /// this exact value.
    fn zero() -> Self;

    /// The multiplicative identity.
    fn one() -> Self;

    /// Lift a constant into the operand domain.
    fn from_f64(c: f64) -> Self;

    fn exp(&self) -> Self;
    fn ln(&self) -> Self;
    fn sqrt(&self) -> Self;
    fn sin(&self) -> Self;
    fn cos(&self) -> Self;
    fn tan(&self) -> Self;
    fn asin(&self) -> Self;
    fn acos(&self) -> Self;
    fn atan(&self) -> Self;
    fn sinh(&self) -> Self;
    fn cosh(&self) -> Self;
    fn tanh(&self) -> Self;
    fn erf(&self) -> Self;
    fn powf(&self, exponent: &Self) -> Self;
    fn floor(&self) -> Self;
    fn ceil(&self) -> Self;
    fn fmin(&self, rhs: &Self) -> Self;
    fn fmax(&self, rhs: &Self) -> Self;

    /// `1` if `self <= rhs`, else `0`, in the operand domain.
    fn le_mask(&self, rhs: &Self) -> Self;

    /// `1` if `self >= rhs`, else `0`, in the operand domain.
    fn ge_mask(&self, rhs: &Self) -> Self;

    /// `1` if `self == rhs`, else `0`, in the operand domain.
    fn eq_mask(&self, rhs: &Self) -> Self;

    /// Diagnostic hook invoked by the `PrintMe` operation with its second
    /// operand as tag. The default does nothing; concrete float impls emit a
    /// line on stdout when the `with-printme` feature is enabled. Best-effort
    /// side channel, not part of any ordering contract.
    #[allow(unused_variables)]
    fn on_printme(&self, tag: &Self) {}
}

impl Scalar for f64 {
    fn zero() -> Self {
        0.0
    }

    fn one() -> Self {
        1.0
    }

    fn from_f64(c: f64) -> Self {
        c
    }

    fn exp(&self) -> Self {
        f64::exp(*self)
    }

    fn ln(&self) -> Self {
        f64::ln(*self)
    }

    fn sqrt(&self) -> Self {
        f64::sqrt(*self)
    }

    fn sin(&self) -> Self {
        f64::sin(*self)
    }

    fn cos(&self) -> Self {
        f64::cos(*self)
    }

    fn tan(&self) -> Self {
        f64::tan(*self)
    }

    fn asin(&self) -> Self {
        f64::asin(*self)
    }

    fn acos(&self) -> Self {
        f64::acos(*self)
    }

    fn atan(&self) -> Self {
        f64::atan(*self)
    }

    fn sinh(&self) -> Self {
        f64::sinh(*self)
    }

    fn cosh(&self) -> Self {
        f64::cosh(*self)
    }

    fn tanh(&self) -> Self {
        f64::tanh(*self)
    }

    fn erf(&self) -> Self {
        libm::erf(*self)
    }

    fn powf(&self, exponent: &Self) -> Self {
        f64::powf(*self, *exponent)
    }

    fn floor(&self) -> Self {
        f64::floor(*self)
    }

    fn ceil(&self) -> Self {
        f64::ceil(*self)
    }

    fn fmin(&self, rhs: &Self) -> Self {
        f64::min(*self, *rhs)
    }

    fn fmax(&self, rhs: &Self) -> Self {
        f64::max(*self, *rhs)
    }

    fn le_mask(&self, rhs: &Self) -> Self {
        if *self <= *rhs {
            1.0
        } else {
            0.0
        }
    }

    fn ge_mask(&self, rhs: &Self) -> Self {
        if *self >= *rhs {
            1.0
        } else {
            0.0
        }
    }

    fn eq_mask(&self, rhs: &Self) -> Self {
        if *self == *rhs {
            1.0
        } else {
            0.0
        }
    }

    #[allow(unused_variables)]
    fn on_printme(&self, tag: &Self) {
        #[cfg(feature = "with-printme")]
        println!("|> {tag} : {self}");
    }
}

impl Scalar for f32 {
    fn zero() -> Self {
        0.0
    }

    fn one() -> Self {
        1.0
    }

    fn from_f64(c: f64) -> Self {
        c as f32
    }

    fn exp(&self) -> Self {
        f32::exp(*self)
    }

    fn ln(&self) -> Self {
        f32::ln(*self)
    }

    fn sqrt(&self) -> Self {
        f32::sqrt(*self)
    }

    fn sin(&self) -> Self {
        f32::sin(*self)
    }

    fn cos(&self) -> Self {
        f32::cos(*self)
    }

    fn tan(&self) -> Self {
        f32::tan(*self)
    }

    fn asin(&self) -> Self {
        f32::asin(*self)
    }

    fn acos(&self) -> Self {
        f32::acos(*self)
    }

    fn atan(&self) -> Self {
        f32::atan(*self)
    }

    fn sinh(&self) -> Self {
        f32::sinh(*self)
    }

    fn cosh(&self) -> Self {
        f32::cosh(*self)
    }

    fn tanh(&self) -> Self {
        f32::tanh(*self)
    }

    fn erf(&self) -> Self {
        libm::erff(*self)
    }

    fn powf(&self, exponent: &Self) -> Self {
        f32::powf(*self, *exponent)
    }

    fn floor(&self) -> Self {
        f32::floor(*self)
    }

    fn ceil(&self) -> Self {
        f32::ceil(*self)
    }

    fn fmin(&self, rhs: &Self) -> Self {
        f32::min(*self, *rhs)
    }

    fn fmax(&self, rhs: &Self) -> Self {
        f32::max(*self, *rhs)
    }

    fn le_mask(&self, rhs: &Self) -> Self {
        if *self <= *rhs {
            1.0
        } else {
            0.0
        }
    }

    fn ge_mask(&self, rhs: &Self) -> Self {
        if *self >= *rhs {
            1.0
        } else {
            0.0
        }
    }

    fn eq_mask(&self, rhs: &Self) -> Self {
        if *self == *rhs {
            1.0
        } else {
            0.0
        }
    }

    #[allow(unused_variables)]
    fn on_printme(&self, tag: &Self) {
        #[cfg(feature = "with-printme")]
        println!("|> {tag} : {self}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn masks_are_exact_indicators() {
        assert_eq!(1.0f64.le_mask(&2.0), 1.0);
        assert_eq!(2.0f64.le_mask(&1.0), 0.0);
        assert_eq!(2.0f64.ge_mask(&2.0), 1.0);
        assert_eq!(3.0f64.eq_mask(&3.0), 1.0);
        assert_eq!(3.0f64.eq_mask(&4.0), 0.0);
    }

    #[test]
    fn erf_matches_known_values() {
        assert!((0.0f64.erf()).abs() < 1e-15);
        assert!((1.0f64.erf() - 0.842_700_792_949_714_9).abs() < 1e-12);
        assert!(((-1.0f64).erf() + 1.0f64.erf()).abs() < 1e-15);
    }
}
