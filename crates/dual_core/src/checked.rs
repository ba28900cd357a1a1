//! Operations that can be undefined at particular inputs: the division family
//! (`/`, floor division, modulus) and powers.
//!
//! Each comes in three forms: forward (`Dual ∘ operand`), reflected
//! (`scalar ∘ Dual`, the `try_r*` methods) and in-place (`try_*_assign`). The
//! in-place forms compute the result first and only then overwrite the
//! receiver, so a failed call leaves it untouched.
//!
//! Floor division and modulus reuse the quotient-rule shape for the dual
//! component. Neither operation is differentiable; this keeps the family
//! structurally uniform and is not a derivative.

use crate::autodiff::Dual;
use crate::error::{ensure_nonzero, DualError, Op, Result};
use crate::operand::Operand;
use std::ops::{Div, Rem};

/// Floored division and modulo of `a` by `b`, as `(a // b, a mod b)`.
///
/// The quotient is derived from the remainder, not rounded from `a / b`, so
/// `b·q + r ≈ a` holds for the pair.
fn floor_div_mod(a: f64, b: f64) -> (f64, f64) {
    let mut r = a % b;
    let mut q = (a - r) / b;
    if r != 0.0 {
        if (b < 0.0) != (r < 0.0) {
            r += b;
            q -= 1.0;
        }
    } else {
        r = 0.0_f64.copysign(b);
    }

    let q = if q != 0.0 {
        let f = q.floor();
        if q - f > 0.5 {
            f + 1.0
        } else {
            f
        }
    } else {
        0.0_f64.copysign(a / b)
    };
    (q, r)
}

fn floor_div(a: f64, b: f64) -> f64 {
    floor_div_mod(a, b).0
}

/// Floored modulo: the result takes the sign of `b`.
fn floor_mod(a: f64, b: f64) -> f64 {
    floor_div_mod(a, b).1
}

impl Dual {
    /// Applies `combine` with the quotient-rule layout after checking the divisor.
    fn quotient_family(
        self,
        op: Op,
        rhs: Operand,
        combine: fn(f64, f64) -> f64,
    ) -> Result<Dual> {
        match rhs {
            Operand::Dual(d) => {
                ensure_nonzero(op, d.real, d)?;
                Ok(Dual::new(
                    combine(self.real, d.real),
                    combine(self.dual * d.real - self.real * d.dual, d.real * d.real),
                ))
            }
            Operand::Scalar(s) => {
                ensure_nonzero(op, s, s)?;
                Ok(Dual::new(combine(self.real, s), combine(self.dual, s)))
            }
        }
    }

    /// `lhs ∘ self` for a scalar `lhs`, treated as `Dual(lhs, 0)`.
    fn reflected_quotient_family(
        self,
        op: Op,
        lhs: f64,
        combine: fn(f64, f64) -> f64,
    ) -> Result<Dual> {
        ensure_nonzero(op, self.real, self)?;
        Ok(Dual::new(
            combine(lhs, self.real),
            combine(-self.dual * lhs, self.real * self.real),
        ))
    }

    /// Quotient rule: `(a/b, (da·b − a·db) / b²)`.
    pub fn try_div(self, rhs: impl Into<Operand>) -> Result<Dual> {
        self.quotient_family(Op::Div, rhs.into(), |a, b| a / b)
    }

    pub fn try_div_assign(&mut self, rhs: impl Into<Operand>) -> Result<&mut Self> {
        *self = self.try_div(rhs)?;
        Ok(self)
    }

    /// `lhs / self`.
    pub fn try_rdiv(self, lhs: f64) -> Result<Dual> {
        self.reflected_quotient_family(Op::Div, lhs, |a, b| a / b)
    }

    pub fn try_floor_div(self, rhs: impl Into<Operand>) -> Result<Dual> {
        self.quotient_family(Op::FloorDiv, rhs.into(), floor_div)
    }

    pub fn try_floor_div_assign(&mut self, rhs: impl Into<Operand>) -> Result<&mut Self> {
        *self = self.try_floor_div(rhs)?;
        Ok(self)
    }

    pub fn try_rfloor_div(self, lhs: f64) -> Result<Dual> {
        self.reflected_quotient_family(Op::FloorDiv, lhs, floor_div)
    }

    pub fn try_rem(self, rhs: impl Into<Operand>) -> Result<Dual> {
        self.quotient_family(Op::Rem, rhs.into(), floor_mod)
    }

    pub fn try_rem_assign(&mut self, rhs: impl Into<Operand>) -> Result<&mut Self> {
        *self = self.try_rem(rhs)?;
        Ok(self)
    }

    pub fn try_rrem(self, lhs: f64) -> Result<Dual> {
        self.reflected_quotient_family(Op::Rem, lhs, floor_mod)
    }

    /// Raises `self` to a constant power: `(a^p, p·a^(p−1)·da)`.
    ///
    /// A zero power yields the scalar identity `1`, not a dual number. The
    /// exponent must not carry a tangent of its own.
    pub fn try_pow(self, power: impl Into<Operand>) -> Result<Operand> {
        let power = power.into();
        let p = match power {
            Operand::Dual(d) if d.has_tangent() => {
                return Err(DualError::undefined(
                    Op::Pow,
                    d,
                    "exponent has a non-zero dual part",
                ));
            }
            Operand::Dual(d) => d.real,
            Operand::Scalar(s) => s,
        };

        // At a zero base the derivative needs 0^(p−1), undefined for p < 1.
        if self.real == 0.0 && p < 1.0 && p != 0.0 {
            return Err(DualError::undefined(
                Op::Pow,
                self,
                "derivative of a power below one is undefined at a zero real part",
            ));
        }
        if self.real < 0.0 && p.fract() != 0.0 {
            return Err(DualError::undefined(
                Op::Pow,
                self,
                "non-integer power of a negative real part",
            ));
        }
        if p == 0.0 {
            return Ok(Operand::Scalar(1.0));
        }

        Ok(Operand::Dual(Dual::new(
            self.real.powf(p),
            p * self.real.powf(p - 1.0) * self.dual,
        )))
    }

    /// In-place power. A zero power leaves the receiver equal to `1`.
    pub fn try_pow_assign(&mut self, power: impl Into<Operand>) -> Result<&mut Self> {
        *self = self.try_pow(power)?.to_dual();
        Ok(self)
    }

    /// `base ^ self`: differentiating through the exponent is unsupported.
    pub fn try_rpow(self, _base: f64) -> Result<Dual> {
        Err(DualError::undefined(
            Op::Pow,
            self,
            "exponent cannot be a dual number",
        ))
    }
}

// Operator sugar for the fallible forms: `(a / b)?`.

impl Div for Dual {
    type Output = Result<Dual>;
    fn div(self, rhs: Self) -> Result<Dual> {
        self.try_div(rhs)
    }
}

impl Div<f64> for Dual {
    type Output = Result<Dual>;
    fn div(self, rhs: f64) -> Result<Dual> {
        self.try_div(rhs)
    }
}

impl Div<Dual> for f64 {
    type Output = Result<Dual>;
    fn div(self, rhs: Dual) -> Result<Dual> {
        rhs.try_rdiv(self)
    }
}

impl Rem for Dual {
    type Output = Result<Dual>;
    fn rem(self, rhs: Self) -> Result<Dual> {
        self.try_rem(rhs)
    }
}

impl Rem<f64> for Dual {
    type Output = Result<Dual>;
    fn rem(self, rhs: f64) -> Result<Dual> {
        self.try_rem(rhs)
    }
}

impl Rem<Dual> for f64 {
    type Output = Result<Dual>;
    fn rem(self, rhs: Dual) -> Result<Dual> {
        rhs.try_rrem(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_undefined<T: std::fmt::Debug>(result: Result<T>, expected: Op) {
        let err = result.expect_err("expected an undefined operation");
        assert_eq!(err.op(), Some(expected), "unexpected error: {err}");
    }

    #[test]
    fn division_by_dual() {
        let y = Dual::new(4.0, 3.0);
        let z = y.try_div(Dual::new(2.0, 3.0)).unwrap();
        assert_eq!(z, Dual::new(2.0, -1.5));
        assert_eq!((y / Dual::new(2.0, 3.0)).unwrap(), z);
        assert_undefined(y.try_div(Dual::new(0.0, 9.0)), Op::Div);
    }

    #[test]
    fn division_by_scalar() {
        let x = Dual::new(2.0, 3.0);
        assert_eq!(x.try_div(2).unwrap(), Dual::new(1.0, 1.5));
        assert_eq!((x / 2.0).unwrap(), Dual::new(1.0, 1.5));
        assert_undefined(x.try_div(0), Op::Div);
    }

    #[test]
    fn reflected_division() {
        let x = Dual::new(7.0, 12.0);
        let y = (2.0 / x).unwrap();
        assert_eq!(y.real, 2.0 / 7.0);
        assert_eq!(y.dual, -24.0 / 49.0);
        assert_undefined(Dual::new(0.0, 10.0).try_rdiv(2.0), Op::Div);
    }

    #[test]
    fn in_place_division_returns_receiver() {
        let mut z = Dual::new(4.0, 3.0);
        let returned = *z.try_div_assign(Dual::new(2.0, 3.0)).unwrap();
        assert_eq!(returned, Dual::new(2.0, -1.5));
        assert_eq!(z, returned);

        let mut x = Dual::new(2.0, 3.0);
        x.try_div_assign(2.0).unwrap();
        assert_eq!(x, Dual::new(1.0, 1.5));
    }

    #[test]
    fn failed_in_place_operations_leave_receiver_untouched() {
        let mut y = Dual::new(4.0, 3.0);
        assert_undefined(y.try_div_assign(Dual::new(0.0, 9.0)), Op::Div);
        assert_undefined(y.try_floor_div_assign(0.0), Op::FloorDiv);
        assert_undefined(y.try_rem_assign(Dual::new(0.0, 1.0)), Op::Rem);
        assert_undefined(y.try_pow_assign(Dual::new(2.0, 1.0)), Op::Pow);
        assert_eq!(y, Dual::new(4.0, 3.0));
    }

    #[test]
    fn floor_division() {
        let y = Dual::new(4.0, 3.0);
        assert_eq!(y.try_floor_div(Dual::new(2.0, 3.0)).unwrap(), Dual::new(2.0, -2.0));
        assert_eq!(Dual::new(2.0, 3.0).try_floor_div(2).unwrap(), Dual::new(1.0, 1.0));
        assert_undefined(y.try_floor_div(Dual::new(0.0, 9.0)), Op::FloorDiv);
        assert_undefined(y.try_floor_div(0), Op::FloorDiv);

        let mut z = Dual::new(4.0, 3.0);
        z.try_floor_div_assign(Dual::new(2.0, 3.0)).unwrap();
        assert_eq!(z, Dual::new(2.0, -2.0));

        let r = Dual::new(7.0, 12.0).try_rfloor_div(2.0).unwrap();
        assert_eq!(r, Dual::new(0.0, -1.0));
        assert_undefined(Dual::new(0.0, 10.0).try_rfloor_div(2.0), Op::FloorDiv);
    }

    #[test]
    fn floored_modulus() {
        let y = Dual::new(4.0, 3.0);
        assert_eq!(y.try_rem(Dual::new(2.0, 3.0)).unwrap(), Dual::new(0.0, 2.0));
        assert_eq!((Dual::new(2.0, 3.0) % 2.0).unwrap(), Dual::new(0.0, 1.0));
        assert_undefined(y.try_rem(Dual::new(0.0, 9.0)), Op::Rem);
        assert_undefined(Dual::new(2.0, 3.0).try_rem(0), Op::Rem);

        let r = (2.0 % Dual::new(7.0, 12.0)).unwrap();
        assert_eq!(r, Dual::new(2.0, 25.0));
        assert_undefined(Dual::new(0.0, 10.0).try_rrem(2.0), Op::Rem);

        let mut x = Dual::new(2.0, 3.0);
        x.try_rem_assign(2).unwrap();
        assert_eq!(x, Dual::new(0.0, 1.0));
    }

    #[test]
    fn floor_mod_follows_divisor_sign() {
        assert_eq!(floor_mod(-6.0, 4.0), 2.0);
        assert_eq!(floor_mod(6.0, -4.0), -2.0);
        assert_eq!(floor_mod(-6.0, -4.0), -2.0);
        assert_eq!(floor_div(-6.0, 4.0), -2.0);
    }

    #[test]
    fn floor_division_derives_quotient_from_remainder() {
        assert_eq!(floor_div(1.0, 0.1), 9.0);
        let (q, r) = floor_div_mod(1.0, 0.1);
        assert!((0.1 * q + r - 1.0).abs() < 1e-12);
        assert_eq!(
            Dual::new(1.0, 0.0).try_floor_div(0.1).unwrap(),
            Dual::new(9.0, 0.0)
        );
        assert_eq!(floor_div(-24.0, 49.0), -1.0);
        assert_eq!(floor_div(2.0, 7.0), 0.0);
        assert_eq!(floor_div(7.0, -2.0), -4.0);
    }

    #[test]
    fn power_rule() {
        let x = Dual::new(6.0, 8.0);
        assert_eq!(x.try_pow(3).unwrap(), Dual::new(216.0, 864.0));
        assert_eq!(x.try_pow(Dual::new(3.0, 0.0)).unwrap(), Dual::new(216.0, 864.0));

        let mut y = Dual::new(6.0, 8.0);
        y.try_pow_assign(3).unwrap();
        assert_eq!(y, Dual::new(216.0, 864.0));
    }

    #[test]
    fn zero_power_is_scalar_identity() {
        let p = Dual::new(6.0, 8.0).try_pow(0).unwrap();
        assert_eq!(p, Operand::Scalar(1.0));
        assert!(p.is_scalar());
        assert_eq!(p, 1.0);

        let mut z = Dual::new(9.0, 8.0);
        z.try_pow_assign(0).unwrap();
        assert_eq!(z, 1.0);
    }

    #[test]
    fn undefined_powers() {
        let zero = Dual::new(0.0, 5.0);
        assert_undefined(zero.try_pow(-1), Op::Pow);
        assert_undefined(zero.try_pow(Dual::new(-1.0, 0.0)), Op::Pow);
        assert_undefined(Dual::new(6.0, 8.0).try_pow(Dual::new(7.0, 8.0)), Op::Pow);
        assert_undefined(Dual::new(-8.0, 1.0).try_pow(0.5), Op::Pow);
        assert_undefined(Dual::new(9.0, 0.0).try_rpow(5.0), Op::Pow);

        let mut x = Dual::new(0.0, 1.0);
        assert_undefined(x.try_pow_assign(-1), Op::Pow);
        assert_eq!(x, Dual::new(0.0, 1.0));
    }

    #[test]
    fn fractional_powers_below_one_fail_at_zero_base() {
        assert_undefined(Dual::new(0.0, 1.0).try_pow(0.5), Op::Pow);
        assert_undefined(Dual::new(0.0, 0.0).try_pow(0.5), Op::Pow);

        let mut x = Dual::new(0.0, 1.0);
        assert_undefined(x.try_pow_assign(0.5), Op::Pow);
        assert_eq!(x, Dual::new(0.0, 1.0));

        // p >= 1 keeps a finite derivative at zero.
        assert_eq!(Dual::new(0.0, 1.0).try_pow(1).unwrap(), Dual::new(0.0, 1.0));
        assert_eq!(Dual::new(0.0, 1.0).try_pow(2).unwrap(), Dual::new(0.0, 0.0));
        assert_eq!(Dual::new(0.0, 3.0).try_pow(0).unwrap(), 1.0);
    }

    #[test]
    fn negative_base_with_integer_power() {
        let r = Dual::new(-2.0, 1.0).try_pow(3).unwrap().to_dual();
        assert_eq!(r, Dual::new(-8.0, 12.0));
    }

    #[test]
    fn error_message_names_operation_and_operand() {
        let err = Dual::new(1.0, 1.0).try_div(Dual::new(0.0, 9.0)).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("division"), "{message}");
        assert!(message.contains("Dual(real=0.0, dual=9.0)."), "{message}");
    }
}
