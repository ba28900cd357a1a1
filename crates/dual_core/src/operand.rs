use crate::autodiff::Dual;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Right-hand side of a binary dual-number operation.
///
/// A `Scalar(s)` behaves like `Dual(s, 0)` unless an operation states otherwise.
/// Serialized untagged: a bare number is a scalar, `{"real":..,"dual":..}` a dual.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Operand {
    Scalar(f64),
    Dual(Dual),
}

impl Operand {
    /// Lifts the operand into a dual number.
    pub fn to_dual(self) -> Dual {
        match self {
            Operand::Scalar(s) => Dual::constant(s),
            Operand::Dual(d) => d,
        }
    }

    pub fn real(self) -> f64 {
        self.to_dual().real
    }

    /// Dual part, zero for scalars.
    pub fn dual(self) -> f64 {
        self.to_dual().dual
    }

    pub fn is_scalar(&self) -> bool {
        matches!(self, Operand::Scalar(_))
    }
}

impl Default for Operand {
    fn default() -> Self {
        Operand::Scalar(0.0)
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Scalar(s) => write!(f, "{s:?}"),
            Operand::Dual(d) => write!(f, "{d}"),
        }
    }
}

impl From<Dual> for Operand {
    fn from(d: Dual) -> Self {
        Operand::Dual(d)
    }
}

macro_rules! scalar_operand_from {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Operand {
                fn from(s: $t) -> Self {
                    Operand::Scalar(s as f64)
                }
            }
        )*
    };
}

scalar_operand_from!(f64, f32, i32, i64, u32);

impl PartialEq for Operand {
    fn eq(&self, other: &Self) -> bool {
        self.to_dual() == other.to_dual()
    }
}

impl PartialEq<f64> for Operand {
    fn eq(&self, other: &f64) -> bool {
        self.to_dual() == *other
    }
}

impl PartialEq<Dual> for Operand {
    fn eq(&self, other: &Dual) -> bool {
        self.to_dual() == *other
    }
}
