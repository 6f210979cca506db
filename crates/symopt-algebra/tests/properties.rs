//! Cross-cutting properties of the catalogue: zero-absorption soundness,
//! commutativity soundness, and agreement between the fused and split
//! dispatch paths under operand aliasing.

use symopt_algebra::{eval, eval_and_partials, partials, Arity, OpCode};

#[test]
fn zero_absorption_flags_are_sound() {
    let nonzero = [1.7, -2.3, 0.04];
    for op in OpCode::ALL {
        if op.f00_is_zero() {
            assert_eq!(eval(op, &0.0, &0.0), 0.0, "{op:?} f(0,0)");
        }
        if op.f0x_is_zero() {
            for &y in &nonzero {
                assert_eq!(eval(op, &0.0, &y), 0.0, "{op:?} f(0,{y})");
            }
        }
        if op.fx0_is_zero() {
            for &x in &nonzero {
                assert_eq!(eval(op, &x, &0.0), 0.0, "{op:?} f({x},0)");
            }
        }
    }
}

#[test]
fn commutative_ops_commute_exactly() {
    let pairs = [(2.0, 3.0), (-1.4, 0.6), (7.5, -7.5), (0.0, 4.2)];
    for op in OpCode::ALL {
        if op.arity() != Arity::Binary || !op.is_commutative() {
            continue;
        }
        for &(x, y) in &pairs {
            assert_eq!(eval(op, &x, &y), eval(op, &y, &x), "{op:?} ({x},{y})");
        }
    }
}

#[test]
fn fused_path_agrees_with_split_path() {
    // Operands chosen inside every operation's domain.
    let (x, y) = (0.6, 0.3);
    for op in OpCode::ALL {
        let f = eval(op, &x, &y);
        let (d0, d1) = partials(op, &x, &y, &f);
        let (ff, fd0, fd1) = eval_and_partials(op, &x, &y);
        assert_eq!(f, ff, "{op:?} value");
        assert_eq!(d0, fd0, "{op:?} d0");
        assert_eq!(d1, fd1, "{op:?} d1");
    }
}

#[test]
fn aliased_operands_are_safe() {
    // The same storage supplies both operands and then receives the output;
    // the fused path must still see the fresh result while differentiating.
    for op in OpCode::ALL {
        let mut cell = 0.7;
        let expected = {
            let f = eval(op, &0.7, &0.7);
            let (d0, d1) = partials(op, &0.7, &0.7, &f);
            (f, d0, d1)
        };
        let got = eval_and_partials(op, &cell, &cell);
        cell = got.0;
        assert_eq!(got, expected, "{op:?}");
        assert_eq!(cell, expected.0, "{op:?} write-back");
    }
}

#[test]
fn unary_ops_ignore_the_second_operand() {
    for op in OpCode::ALL {
        if op.arity() != Arity::Unary {
            continue;
        }
        let a = eval_and_partials(op, &0.42, &-3.0);
        let b = eval_and_partials(op, &0.42, &11.5);
        assert_eq!(a, b, "{op:?}");
        assert_eq!(a.2, 0.0, "{op:?} second partial");
    }
}
