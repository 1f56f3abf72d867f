//! FPU operations.
//!
//! An [`Operation`] is what a client queues: an operation kind, the width of the
//! destination register, two operands, and the destination address. The result is
//! computed with host `f64` arithmetic when the operation is admitted into a unit.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use super::codec::FloatWidth;
use crate::common::RegAddr;

/// Number of operation kinds.
pub const NUM_OPS: usize = 5;

/// Kind of floating-point operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FpuOp {
    /// `a + b`.
    Add,
    /// `a - b`.
    Sub,
    /// `a * b`.
    Mul,
    /// `a / b`.
    Div,
    /// `sqrt(b)`; operand `a` is ignored.
    Sqrt,
}

impl FpuOp {
    /// Every operation kind, in table order.
    pub const ALL: [Self; NUM_OPS] = [Self::Add, Self::Sub, Self::Mul, Self::Div, Self::Sqrt];

    /// Position of this kind in [`ALL`](Self::ALL); used to index per-kind tables.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Upper-case mnemonic.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Add => "ADD",
            Self::Sub => "SUB",
            Self::Mul => "MUL",
            Self::Div => "DIV",
            Self::Sqrt => "SQRT",
        }
    }

    /// Applies the operation to host doubles.
    ///
    /// No special cases: NaN, infinities, and division by zero follow IEEE-754
    /// semantics of the host.
    ///
    /// # Examples
    ///
    /// ```
    /// use fpusim_core::fpu::op::FpuOp;
    ///
    /// assert_eq!(FpuOp::Add.evaluate(2.5, 1.5), 4.0);
    /// assert_eq!(FpuOp::Sqrt.evaluate(123.0, 16.0), 4.0);
    /// assert!(FpuOp::Sqrt.evaluate(0.0, -4.0).is_nan());
    /// assert_eq!(FpuOp::Div.evaluate(1.0, 0.0), f64::INFINITY);
    /// ```
    pub fn evaluate(self, a: f64, b: f64) -> f64 {
        match self {
            Self::Add => a + b,
            Self::Sub => a - b,
            Self::Mul => a * b,
            Self::Div => a / b,
            Self::Sqrt => b.sqrt(),
        }
    }
}

impl fmt::Display for FpuOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when an operation name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown FPU operation `{0}`")]
pub struct UnknownOp(pub String);

impl FromStr for FpuOp {
    type Err = UnknownOp;

    /// Parses a mnemonic, ignoring case and surrounding whitespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        Self::ALL
            .into_iter()
            .find(|op| op.name() == upper)
            .ok_or_else(|| UnknownOp(s.to_owned()))
    }
}

/// One queued FPU request.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Operation {
    /// Operation kind.
    pub op: FpuOp,
    /// Width of the destination register.
    pub width: FloatWidth,
    /// First operand.
    pub a: f64,
    /// Second operand (the only operand of `SQRT`).
    pub b: f64,
    /// First destination register.
    pub dest: RegAddr,
}

impl Operation {
    /// Width of the destination in bytes.
    #[inline]
    pub const fn size(&self) -> usize {
        self.width.bytes()
    }

    /// Computes the result value.
    #[inline]
    pub fn compute(&self) -> f64 {
        self.op.evaluate(self.a, self.b)
    }
}

impl fmt::Display for Operation {
    /// Formats as `ADD64 2.500000, 1.500000, $f3`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{} {:.6}, {:.6}, {}",
            self.op,
            self.size() * 8,
            self.a,
            self.b,
            self.dest
        )
    }
}
