use crate::operand::Operand;
use std::fmt;
use thiserror::Error;

/// Operations that can fail on a particular input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Div,
    FloorDiv,
    Rem,
    Pow,
    Tan,
    Log,
    Inverse,
    FiniteDifference,
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Op::Div => "division",
            Op::FloorDiv => "floor division",
            Op::Rem => "modulus",
            Op::Pow => "power",
            Op::Tan => "tan",
            Op::Log => "log",
            Op::Inverse => "inverse",
            Op::FiniteDifference => "finite difference",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DualError {
    /// A component was not a finite real number.
    #[error("invalid {component} component {value:?}: expected a finite number")]
    InvalidOperand {
        component: &'static str,
        value: String,
    },
    /// The result is mathematically undefined at the given operand.
    #[error("{op} is undefined for operand {operand}: {reason}")]
    UndefinedOperation {
        op: Op,
        operand: Operand,
        reason: &'static str,
    },
}

pub type Result<T> = std::result::Result<T, DualError>;

impl DualError {
    /// Logs a warning and builds an `InvalidOperand` error.
    pub(crate) fn invalid(component: &'static str, value: impl fmt::Display) -> Self {
        let value = value.to_string();
        tracing::warn!(component, value = %value, "rejected non-numeric dual component");
        DualError::InvalidOperand { component, value }
    }

    /// Logs a warning and builds an `UndefinedOperation` error.
    pub(crate) fn undefined(op: Op, operand: impl Into<Operand>, reason: &'static str) -> Self {
        let operand = operand.into();
        tracing::warn!(op = %op, operand = %operand, "{reason}");
        DualError::UndefinedOperation {
            op,
            operand,
            reason,
        }
    }

    /// The failing operation, if the error came from one.
    pub fn op(&self) -> Option<Op> {
        match self {
            DualError::InvalidOperand { .. } => None,
            DualError::UndefinedOperation { op, .. } => Some(*op),
        }
    }
}

/// Fails `op` with a zero-divisor error when `divisor` is zero.
pub(crate) fn ensure_nonzero(op: Op, divisor: f64, operand: impl Into<Operand>) -> Result<()> {
    if divisor == 0.0 {
        let reason = match op {
            Op::Rem => "modulus by zero",
            Op::Log => "logarithm of a zero real part",
            Op::Inverse => "inverse of a zero real part",
            _ => "real part of the divisor is zero",
        };
        return Err(DualError::undefined(op, operand, reason));
    }
    Ok(())
}

pub(crate) fn ensure_finite(component: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(DualError::invalid(component, value))
    }
}
