//! Symbolic rotation angles.
//!
//! A QSP template circuit carries its signal rotation as
//! `-2 * acos(x)`; binding `x` turns the template into a runnable circuit.

use std::collections::BTreeSet;
use std::f64::consts::PI;
use std::fmt;
use std::ops;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnaryOp {
    Neg,
    /// Inverse cosine, defined on [-1, 1].
    Acos,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl UnaryOp {
    fn apply(self, v: f64) -> Option<f64> {
        match self {
            UnaryOp::Neg => Some(-v),
            UnaryOp::Acos => (-1.0..=1.0).contains(&v).then(|| v.acos()),
        }
    }
}

impl BinaryOp {
    fn apply(self, a: f64, b: f64) -> Option<f64> {
        match self {
            BinaryOp::Add => Some(a + b),
            BinaryOp::Sub => Some(a - b),
            BinaryOp::Mul => Some(a * b),
            BinaryOp::Div => (b != 0.0).then(|| a / b),
        }
    }

    fn symbol(self) -> char {
        match self {
            BinaryOp::Add => '+',
            BinaryOp::Sub => '-',
            BinaryOp::Mul => '*',
            BinaryOp::Div => '/',
        }
    }
}

/// An angle that may still depend on named symbols.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ParameterExpression {
    Constant(f64),
    Symbol(String),
    Pi,
    Unary(UnaryOp, Box<ParameterExpression>),
    Binary(BinaryOp, Box<ParameterExpression>, Box<ParameterExpression>),
}

impl ParameterExpression {
    pub fn constant(value: f64) -> Self {
        Self::Constant(value)
    }

    pub fn symbol(name: impl Into<String>) -> Self {
        Self::Symbol(name.into())
    }

    pub fn pi() -> Self {
        Self::Pi
    }

    #[must_use]
    pub fn acos(self) -> Self {
        Self::Unary(UnaryOp::Acos, Box::new(self))
    }

    fn binary(op: BinaryOp, lhs: Self, rhs: Self) -> Self {
        Self::Binary(op, Box::new(lhs), Box::new(rhs))
    }

    /// True when at least one symbol is still free.
    pub fn is_symbolic(&self) -> bool {
        match self {
            Self::Symbol(_) => true,
            Self::Constant(_) | Self::Pi => false,
            Self::Unary(_, e) => e.is_symbolic(),
            Self::Binary(_, a, b) => a.is_symbolic() || b.is_symbolic(),
        }
    }

    /// Numeric value, if there is one.
    ///
    /// `None` for free symbols, division by zero and `acos` outside [-1, 1].
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Constant(v) => Some(*v),
            Self::Symbol(_) => None,
            Self::Pi => Some(PI),
            Self::Unary(op, e) => op.apply(e.as_f64()?),
            Self::Binary(op, a, b) => op.apply(a.as_f64()?, b.as_f64()?),
        }
    }

    pub fn symbols(&self) -> BTreeSet<String> {
        let mut names = BTreeSet::new();
        self.collect_symbols(&mut names);
        names
    }

    pub(crate) fn collect_symbols(&self, names: &mut BTreeSet<String>) {
        match self {
            Self::Symbol(name) => {
                names.insert(name.clone());
            }
            Self::Constant(_) | Self::Pi => {}
            Self::Unary(_, e) => e.collect_symbols(names),
            Self::Binary(_, a, b) => {
                a.collect_symbols(names);
                b.collect_symbols(names);
            }
        }
    }

    /// Replace every occurrence of `name` with `value`.
    #[must_use]
    pub fn bind(&self, name: &str, value: f64) -> Self {
        match self {
            Self::Symbol(s) if s == name => Self::Constant(value),
            Self::Constant(_) | Self::Pi | Self::Symbol(_) => self.clone(),
            Self::Unary(op, e) => Self::Unary(*op, Box::new(e.bind(name, value))),
            Self::Binary(op, a, b) => Self::binary(*op, a.bind(name, value), b.bind(name, value)),
        }
    }

    /// Fold to a constant when fully numeric.
    #[must_use]
    pub fn simplify(&self) -> Self {
        self.as_f64().map_or_else(|| self.clone(), Self::Constant)
    }
}

impl fmt::Display for ParameterExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Constant(v) => write!(f, "{v}"),
            Self::Symbol(name) => f.write_str(name),
            Self::Pi => f.write_str("π"),
            Self::Unary(UnaryOp::Neg, e) => write!(f, "-({e})"),
            Self::Unary(UnaryOp::Acos, e) => write!(f, "acos({e})"),
            Self::Binary(op, a, b) => write!(f, "({a} {} {b})", op.symbol()),
        }
    }
}

impl From<f64> for ParameterExpression {
    fn from(value: f64) -> Self {
        Self::Constant(value)
    }
}

impl From<i32> for ParameterExpression {
    fn from(value: i32) -> Self {
        Self::Constant(value.into())
    }
}

macro_rules! binary_ops {
    ($($trait:ident :: $method:ident => $op:ident),* $(,)?) => {
        $(
            impl ops::$trait for ParameterExpression {
                type Output = Self;

                fn $method(self, rhs: Self) -> Self {
                    Self::binary(BinaryOp::$op, self, rhs)
                }
            }
        )*
    };
}

binary_ops! {
    Add::add => Add,
    Sub::sub => Sub,
    Mul::mul => Mul,
    Div::div => Div,
}

impl ops::Neg for ParameterExpression {
    type Output = Self;

    fn neg(self) -> Self {
        Self::Unary(UnaryOp::Neg, Box::new(self))
    }
}
