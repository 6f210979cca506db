//! Forward-mode dual numbers as an operand type for the scalar algebra.
//!
//! A [`Dual`] carries a value and a first-order tangent; sending it through
//! the generic dispatch tables propagates one directional derivative
//! alongside every evaluation. The sensitivity layers seed one input with a
//! unit tangent and read the derivative off the output.
//!
//! Only first-order tangents are carried; higher-order propagation and
//! reverse mode are out of scope.

use std::ops::{Add, Div, Mul, Neg, Sub};

use serde::{Deserialize, Serialize};
use symopt_algebra::Scalar;

/// A value paired with its first-order tangent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dual<F> {
    /// Value part.
    pub re: F,
    /// Tangent part.
    pub eps: F,
}

impl<F: Scalar> Dual<F> {
    pub fn new(re: F, eps: F) -> Self {
        Dual { re, eps }
    }

    /// Lift a value with a zero tangent.
    pub fn constant(re: F) -> Self {
        Dual {
            re,
            eps: F::zero(),
        }
    }

    /// Lift a value seeded with a unit tangent.
    pub fn variable(re: F) -> Self {
        Dual {
            re,
            eps: F::one(),
        }
    }
}

impl<F: Scalar> Add for Dual<F> {
    type Output = Dual<F>;

    fn add(self, rhs: Self) -> Self {
        Dual::new(self.re + rhs.re, self.eps + rhs.eps)
    }
}

impl<F: Scalar> Sub for Dual<F> {
    type Output = Dual<F>;

    fn sub(self, rhs: Self) -> Self {
        Dual::new(self.re - rhs.re, self.eps - rhs.eps)
    }
}

impl<F: Scalar> Mul for Dual<F> {
    type Output = Dual<F>;

    fn mul(self, rhs: Self) -> Self {
        Dual::new(
            self.re.clone() * rhs.re.clone(),
            self.eps * rhs.re + self.re * rhs.eps,
        )
    }
}

impl<F: Scalar> Div for Dual<F> {
    type Output = Dual<F>;

    fn div(self, rhs: Self) -> Self {
        let denom = rhs.re.clone() * rhs.re.clone();
        Dual::new(
            self.re.clone() / rhs.re.clone(),
            (self.eps * rhs.re - self.re * rhs.eps) / denom,
        )
    }
}

impl<F: Scalar> Neg for Dual<F> {
    type Output = Dual<F>;

    fn neg(self) -> Self {
        Dual::new(-self.re, -self.eps)
    }
}

impl<F: Scalar> Scalar for Dual<F> {
    fn zero() -> Self {
        Dual::constant(F::zero())
    }

    fn one() -> Self {
        Dual::constant(F::one())
    }

    fn from_f64(c: f64) -> Self {
        Dual::constant(F::from_f64(c))
    }

    fn exp(&self) -> Self {
        let f = self.re.exp();
        Dual::new(f.clone(), self.eps.clone() * f)
    }

    fn ln(&self) -> Self {
        Dual::new(self.re.ln(), self.eps.clone() / self.re.clone())
    }

    fn sqrt(&self) -> Self {
        let f = self.re.sqrt();
        Dual::new(f.clone(), self.eps.clone() / (f.clone() + f))
    }

    fn sin(&self) -> Self {
        Dual::new(self.re.sin(), self.eps.clone() * self.re.cos())
    }

    fn cos(&self) -> Self {
        Dual::new(self.re.cos(), -(self.eps.clone() * self.re.sin()))
    }

    fn tan(&self) -> Self {
        let c = self.re.cos();
        Dual::new(self.re.tan(), self.eps.clone() / (c.clone() * c))
    }

    fn asin(&self) -> Self {
        let root = (F::one() - self.re.clone() * self.re.clone()).sqrt();
        Dual::new(self.re.asin(), self.eps.clone() / root)
    }

    fn acos(&self) -> Self {
        let root = (F::one() - self.re.clone() * self.re.clone()).sqrt();
        Dual::new(self.re.acos(), -(self.eps.clone() / root))
    }

    fn atan(&self) -> Self {
        let denom = F::one() + self.re.clone() * self.re.clone();
        Dual::new(self.re.atan(), self.eps.clone() / denom)
    }

    fn sinh(&self) -> Self {
        Dual::new(self.re.sinh(), self.eps.clone() * self.re.cosh())
    }

    fn cosh(&self) -> Self {
        Dual::new(self.re.cosh(), self.eps.clone() * self.re.sinh())
    }

    fn tanh(&self) -> Self {
        let f = self.re.tanh();
        Dual::new(
            f.clone(),
            self.eps.clone() * (F::one() - f.clone() * f),
        )
    }

    fn erf(&self) -> Self {
        let gauss = F::from_f64(std::f64::consts::FRAC_2_SQRT_PI)
            * (-(self.re.clone() * self.re.clone())).exp();
        Dual::new(self.re.erf(), self.eps.clone() * gauss)
    }

    fn powf(&self, exponent: &Self) -> Self {
        let f = self.re.powf(&exponent.re);
        let d0 = exponent.re.clone() * self.re.powf(&(exponent.re.clone() - F::one()));
        let d1 = self.re.ln() * f.clone();
        Dual::new(
            f,
            d0 * self.eps.clone() + d1 * exponent.eps.clone(),
        )
    }

    fn floor(&self) -> Self {
        Dual::constant(self.re.floor())
    }

    fn ceil(&self) -> Self {
        Dual::constant(self.re.ceil())
    }

    fn fmin(&self, rhs: &Self) -> Self {
        // Selection by value part; ties keep the left operand, matching the
        // derivative convention d0 = [x <= y].
        if self.re.le_mask(&rhs.re) == F::one() {
            self.clone()
        } else {
            rhs.clone()
        }
    }

    fn fmax(&self, rhs: &Self) -> Self {
        if self.re.ge_mask(&rhs.re) == F::one() {
            self.clone()
        } else {
            rhs.clone()
        }
    }

    fn le_mask(&self, rhs: &Self) -> Self {
        // Masks compare value parts only and are locally constant, so the
        // tangent is zero.
        Dual::constant(self.re.le_mask(&rhs.re))
    }

    fn ge_mask(&self, rhs: &Self) -> Self {
        Dual::constant(self.re.ge_mask(&rhs.re))
    }

    fn eq_mask(&self, rhs: &Self) -> Self {
        Dual::constant(self.re.eq_mask(&rhs.re))
    }

    fn on_printme(&self, tag: &Self) {
        self.re.on_printme(&tag.re);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use symopt_algebra::{eval, partials, Arity, OpCode};

    type D = Dual<f64>;

    /// An in-domain sample point for each operation.
    fn sample(op: OpCode) -> (f64, f64) {
        match op {
            OpCode::Log | OpCode::Sqrt | OpCode::Pow | OpCode::ConstPow => (1.3, 0.7),
            OpCode::Asin | OpCode::Acos => (0.4, 0.0),
            OpCode::Div | OpCode::Inv => (1.7, 0.9),
            _ => (0.8, -0.6),
        }
    }

    #[test]
    fn dual_arithmetic() {
        let x = D::variable(3.0);
        let c = D::constant(2.0);
        assert_eq!((x + c).eps, 1.0);
        assert_eq!((x * c).eps, 2.0);
        assert_eq!((c / x).re, 2.0 / 3.0);
        // d/dx (2/x) = -2/x^2
        assert!(((c / x).eps + 2.0 / 9.0).abs() < 1e-15);
        assert_eq!((-x).eps, -1.0);
    }

    #[test]
    fn tangents_match_the_partials_table() {
        for op in OpCode::ALL {
            let (x, y) = sample(op);
            let f = eval(op, &x, &y);
            let (d0, d1) = partials(op, &x, &y, &f);

            let seeded_x = eval(op, &D::variable(x), &D::constant(y));
            assert_eq!(seeded_x.re, f, "{op:?} value");
            assert!(
                (seeded_x.eps - d0).abs() < 1e-12,
                "{op:?} d0: dual {} vs table {d0}",
                seeded_x.eps
            );

            if op.arity() == Arity::Binary && op != OpCode::ConstPow {
                let seeded_y = eval(op, &D::constant(x), &D::variable(y));
                assert!(
                    (seeded_y.eps - d1).abs() < 1e-12,
                    "{op:?} d1: dual {} vs table {d1}",
                    seeded_y.eps
                );
            }
        }
    }

    #[test]
    fn piecewise_ops_carry_zero_tangent() {
        for op in [OpCode::Step, OpCode::Floor, OpCode::Ceil, OpCode::Equality] {
            let out = eval(op, &D::variable(0.4), &D::variable(-0.7));
            assert_eq!(out.eps, 0.0, "{op:?}");
        }
    }

    #[test]
    fn extrema_select_the_matching_tangent() {
        let a = D::new(1.0, 10.0);
        let b = D::new(2.0, 20.0);
        assert_eq!(a.fmin(&b).eps, 10.0);
        assert_eq!(a.fmax(&b).eps, 20.0);
        // Ties keep the left operand, matching d0 = [x <= y].
        let c = D::new(1.0, 30.0);
        assert_eq!(a.fmin(&c).eps, 10.0);
        assert_eq!(a.fmax(&c).eps, 10.0);
    }

    #[test]
    fn fused_dispatch_works_over_duals() {
        use symopt_algebra::eval_and_partials;
        let (f, d0, d1) = eval_and_partials(
            OpCode::Mul,
            &D::variable(3.0),
            &D::constant(4.0),
        );
        assert_eq!(f.re, 12.0);
        assert_eq!(f.eps, 4.0);
        assert_eq!(d0.re, 4.0);
        assert_eq!(d1.re, 3.0);
    }
}
