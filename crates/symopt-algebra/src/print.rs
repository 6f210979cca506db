//! Human-oriented rendering of operations.
//!
//! The grammar is `prefix x separator y postfix` for binary operations and
//! `prefix x postfix` for unary ones. Output is for people and debug dumps;
//! it is not a parseable format.

use std::fmt;

use crate::opcode::{Arity, OpCode};

impl OpCode {
    /// Render the operation applied to the given operand representations.
    /// Unary operations ignore `y`.
    pub fn write_op<W: fmt::Write>(self, out: &mut W, x: &str, y: &str) -> fmt::Result {
        let d = self.descriptor();
        match d.arity {
            Arity::Unary => write!(out, "{}{}{}", d.prefix, x, d.postfix),
            Arity::Binary => write!(out, "{}{}{}{}{}", d.prefix, x, d.separator, y, d.postfix),
        }
    }

    pub fn write_prefix<W: fmt::Write>(self, out: &mut W) -> fmt::Result {
        out.write_str(self.descriptor().prefix)
    }

    /// No-op for unary operations.
    pub fn write_separator<W: fmt::Write>(self, out: &mut W) -> fmt::Result {
        out.write_str(self.descriptor().separator)
    }

    pub fn write_postfix<W: fmt::Write>(self, out: &mut W) -> fmt::Result {
        out.write_str(self.descriptor().postfix)
    }

    /// Convenience form of [`write_op`](Self::write_op) returning a `String`.
    pub fn render(self, x: &str, y: &str) -> String {
        let mut s = String::new();
        // Writing to a String cannot fail.
        let _ = self.write_op(&mut s, x, y);
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binary_grammar() {
        assert_eq!(OpCode::Add.render("a", "b"), "(a+b)");
        assert_eq!(OpCode::Sub.render("a", "b"), "(a-b)");
        assert_eq!(OpCode::Div.render("a", "b"), "(a/b)");
        assert_eq!(OpCode::Pow.render("a", "b"), "pow(a,b)");
        assert_eq!(OpCode::Equality.render("a", "b"), "(a==b)");
        assert_eq!(OpCode::Fmin.render("a", "b"), "fmin(a,b)");
        assert_eq!(OpCode::PrintMe.render("a", "b"), "printme(a,b)");
    }

    #[test]
    fn unary_grammar_ignores_second_operand() {
        assert_eq!(OpCode::Sqrt.render("a", "ignored"), "sqrt(a)");
        assert_eq!(OpCode::Neg.render("a", "ignored"), "(-a)");
        assert_eq!(OpCode::Inv.render("a", "ignored"), "(1/a)");
        assert_eq!(OpCode::Step.render("a", "ignored"), "(a>=0)");
        assert_eq!(OpCode::Erf.render("a", "ignored"), "erf(a)");
    }

    #[test]
    fn piecewise_rendering_matches_write_op() {
        let mut s = String::new();
        OpCode::Mul.write_prefix(&mut s).unwrap();
        s.push('a');
        OpCode::Mul.write_separator(&mut s).unwrap();
        s.push('b');
        OpCode::Mul.write_postfix(&mut s).unwrap();
        assert_eq!(s, OpCode::Mul.render("a", "b"));

        let mut u = String::new();
        OpCode::Cos.write_prefix(&mut u).unwrap();
        u.push('a');
        OpCode::Cos.write_separator(&mut u).unwrap();
        OpCode::Cos.write_postfix(&mut u).unwrap();
        assert_eq!(u, "cos(a)");
    }
}
