use crate::error::{ensure_finite, DualError, Result};
use crate::operand::Operand;
use num_traits::{FromPrimitive, One, ToPrimitive, Zero};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign};
use std::str::FromStr;

/// Dual number for forward-mode AD
/// real: function value
/// dual: derivative (tangent) carried alongside it
///
/// Plain `Copy` data: values can be shared freely across threads. The in-place
/// operations take `&mut self`, so concurrent mutation needs external locking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Dual {
    pub real: f64,
    pub dual: f64,
}

impl Dual {
    pub const fn new(real: f64, dual: f64) -> Self {
        Self { real, dual }
    }

    /// Like `new`, but rejects components that are not finite numbers.
    pub fn try_new(real: f64, dual: f64) -> Result<Self> {
        Ok(Self::new(
            ensure_finite("real", real)?,
            ensure_finite("dual", dual)?,
        ))
    }

    /// Seeds the independent variable: `d/dx x = 1`.
    pub const fn variable(x: f64) -> Self {
        Self::new(x, 1.0)
    }

    pub const fn constant(c: f64) -> Self {
        Self::new(c, 0.0)
    }

    pub fn real(&self) -> f64 {
        self.real
    }

    pub fn dual(&self) -> f64 {
        self.dual
    }

    /// `(|real|, |dual|)`. The dual part is not the derivative of `|x|`.
    pub fn abs(self) -> Self {
        Self::new(self.real.abs(), self.dual.abs())
    }

    pub(crate) fn has_tangent(&self) -> bool {
        self.dual != 0.0
    }
}

impl fmt::Display for Dual {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // `{:?}` keeps the trailing `.0` on integral floats.
        write!(f, "Dual(real={:?}, dual={:?}).", self.real, self.dual)
    }
}

impl FromStr for Dual {
    type Err = DualError;

    /// Parses the `Display` form (`Dual(real=1.5, dual=1.0).`) or a bare number,
    /// which becomes a constant.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let Some(body) = s.strip_prefix("Dual(") else {
            let real = parse_component("real", s)?;
            return Self::try_new(real, 0.0);
        };
        let body = body.strip_suffix('.').unwrap_or(body);
        let body = body
            .strip_suffix(')')
            .ok_or_else(|| DualError::invalid("input", s))?;

        let (real, dual) = body
            .split_once(',')
            .ok_or_else(|| DualError::invalid("input", s))?;
        let real = named_component("real", real)?;
        let dual = named_component("dual", dual)?;
        Self::try_new(real, dual)
    }
}

fn named_component(name: &'static str, field: &str) -> Result<f64> {
    let value = field
        .trim()
        .strip_prefix(name)
        .and_then(|rest| rest.trim_start().strip_prefix('='))
        .ok_or_else(|| DualError::invalid(name, field.trim()))?;
    parse_component(name, value)
}

fn parse_component(name: &'static str, text: &str) -> Result<f64> {
    text.trim()
        .parse::<f64>()
        .map_err(|_| DualError::invalid(name, text.trim()))
}

impl TryFrom<(f64, f64)> for Dual {
    type Error = DualError;

    fn try_from((real, dual): (f64, f64)) -> Result<Self> {
        Self::try_new(real, dual)
    }
}

impl From<Dual> for (f64, f64) {
    fn from(d: Dual) -> Self {
        (d.real, d.dual)
    }
}

// --- Arithmetic that cannot fail ---

impl Add for Dual {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.real + rhs.real, self.dual + rhs.dual)
    }
}

impl Add<f64> for Dual {
    type Output = Self;
    fn add(self, rhs: f64) -> Self {
        Self::new(self.real + rhs, self.dual)
    }
}

impl Add<Dual> for f64 {
    type Output = Dual;
    fn add(self, rhs: Dual) -> Dual {
        rhs + self
    }
}

impl Add<Operand> for Dual {
    type Output = Self;
    fn add(self, rhs: Operand) -> Self {
        self + rhs.to_dual()
    }
}

impl Sub for Dual {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.real - rhs.real, self.dual - rhs.dual)
    }
}

impl Sub<f64> for Dual {
    type Output = Self;
    fn sub(self, rhs: f64) -> Self {
        Self::new(self.real - rhs, self.dual)
    }
}

impl Sub<Dual> for f64 {
    type Output = Dual;
    fn sub(self, rhs: Dual) -> Dual {
        Dual::new(self - rhs.real, -rhs.dual)
    }
}

impl Sub<Operand> for Dual {
    type Output = Self;
    fn sub(self, rhs: Operand) -> Self {
        self - rhs.to_dual()
    }
}

impl Mul for Dual {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self {
        Self::new(
            self.real * rhs.real,
            self.real * rhs.dual + self.dual * rhs.real,
        )
    }
}

impl Mul<f64> for Dual {
    type Output = Self;
    fn mul(self, rhs: f64) -> Self {
        Self::new(self.real * rhs, self.dual * rhs)
    }
}

impl Mul<Dual> for f64 {
    type Output = Dual;
    fn mul(self, rhs: Dual) -> Dual {
        rhs * self
    }
}

impl Mul<Operand> for Dual {
    type Output = Self;
    fn mul(self, rhs: Operand) -> Self {
        self * rhs.to_dual()
    }
}

impl Neg for Dual {
    type Output = Self;
    fn neg(self) -> Self {
        Self::new(-self.real, -self.dual)
    }
}

impl AddAssign for Dual {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}
impl AddAssign<f64> for Dual {
    fn add_assign(&mut self, rhs: f64) {
        *self = *self + rhs;
    }
}
impl SubAssign for Dual {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}
impl SubAssign<f64> for Dual {
    fn sub_assign(&mut self, rhs: f64) {
        *self = *self - rhs;
    }
}
impl MulAssign for Dual {
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}
impl MulAssign<f64> for Dual {
    fn mul_assign(&mut self, rhs: f64) {
        *self = *self * rhs;
    }
}
impl AddAssign<Operand> for Dual {
    fn add_assign(&mut self, rhs: Operand) {
        *self = *self + rhs;
    }
}
impl SubAssign<Operand> for Dual {
    fn sub_assign(&mut self, rhs: Operand) {
        *self = *self - rhs;
    }
}
impl MulAssign<Operand> for Dual {
    fn mul_assign(&mut self, rhs: Operand) {
        *self = *self * rhs;
    }
}

// --- Comparison ---
//
// Equality is componentwise. Ordering only looks at real parts: there is no
// ring-compatible order once the dual part is non-zero, so `<`/`>` on such
// values log a warning and fall back to comparing real parts.

impl PartialEq<f64> for Dual {
    fn eq(&self, other: &f64) -> bool {
        self.real == *other && self.dual == 0.0
    }
}

impl PartialEq<Dual> for f64 {
    fn eq(&self, other: &Dual) -> bool {
        other == self
    }
}

fn warn_real_part_ordering(op: &'static str, lhs: Operand, rhs: Operand) {
    if lhs.dual() != 0.0 || rhs.dual() != 0.0 {
        tracing::warn!(
            op,
            lhs = %lhs,
            rhs = %rhs,
            "ordering is not defined for dual numbers with non-zero dual parts; comparing real parts"
        );
    }
}

/// Consistent with `==`: ties on the real part only order as equal when the
/// dual parts agree too.
fn tie_break(real: Option<Ordering>, lhs: Dual, rhs: Dual) -> Option<Ordering> {
    match real? {
        Ordering::Equal if lhs.dual != rhs.dual => None,
        ord => Some(ord),
    }
}

fn compare_real_parts(
    op: &'static str,
    lhs: Operand,
    rhs: Operand,
    cmp: fn(&f64, &f64) -> bool,
) -> bool {
    warn_real_part_ordering(op, lhs, rhs);
    cmp(&lhs.real(), &rhs.real())
}

macro_rules! real_part_ordering {
    ($lhs:ty, $rhs:ty) => {
        impl PartialOrd<$rhs> for $lhs {
            fn partial_cmp(&self, other: &$rhs) -> Option<Ordering> {
                let (lhs, rhs) = (Operand::from(*self), Operand::from(*other));
                tie_break(
                    lhs.real().partial_cmp(&rhs.real()),
                    lhs.to_dual(),
                    rhs.to_dual(),
                )
            }
            fn lt(&self, other: &$rhs) -> bool {
                compare_real_parts("<", (*self).into(), (*other).into(), |a, b| a < b)
            }
            fn le(&self, other: &$rhs) -> bool {
                compare_real_parts("<=", (*self).into(), (*other).into(), |a, b| a <= b)
            }
            fn gt(&self, other: &$rhs) -> bool {
                compare_real_parts(">", (*self).into(), (*other).into(), |a, b| a > b)
            }
            fn ge(&self, other: &$rhs) -> bool {
                compare_real_parts(">=", (*self).into(), (*other).into(), |a, b| a >= b)
            }
        }
    };
}

real_part_ordering!(Dual, Dual);
real_part_ordering!(Dual, f64);
real_part_ordering!(f64, Dual);

// num-traits glue so `Dual` fits generic numeric code.

impl Zero for Dual {
    fn zero() -> Self {
        Self::new(0.0, 0.0)
    }
    fn is_zero(&self) -> bool {
        self.real == 0.0 && self.dual == 0.0
    }
}

impl One for Dual {
    fn one() -> Self {
        Self::new(1.0, 0.0)
    }
}

impl ToPrimitive for Dual {
    fn to_i64(&self) -> Option<i64> {
        self.real.to_i64()
    }
    fn to_u64(&self) -> Option<u64> {
        self.real.to_u64()
    }
    fn to_f64(&self) -> Option<f64> {
        Some(self.real)
    }
}

impl FromPrimitive for Dual {
    fn from_i64(n: i64) -> Option<Self> {
        Some(Self::constant(n as f64))
    }
    fn from_u64(n: u64) -> Option<Self> {
        Some(Self::constant(n as f64))
    }
    fn from_f64(n: f64) -> Option<Self> {
        Some(Self::constant(n))
    }
}
