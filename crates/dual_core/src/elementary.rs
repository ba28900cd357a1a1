use crate::autodiff::Dual;
use crate::error::{ensure_nonzero, DualError, Op, Result};

/// `cos(real)` at or below this magnitude counts as a pole of `tan`.
pub const TAN_POLE_TOLERANCE: f64 = 1e-8;

/// Elementary functions, each applying the chain rule:
/// `f(a + da·ε) = f(a) + f'(a)·da·ε`.
impl Dual {
    pub fn sin(self) -> Self {
        Self::new(self.real.sin(), self.dual * self.real.cos())
    }

    pub fn cos(self) -> Self {
        Self::new(self.real.cos(), -self.dual * self.real.sin())
    }

    /// Fails near odd multiples of π/2, where `cos(real)` vanishes.
    pub fn tan(self) -> Result<Self> {
        let c = self.real.cos();
        if c.abs() <= TAN_POLE_TOLERANCE {
            return Err(DualError::undefined(
                Op::Tan,
                self,
                "cosine of the real part is zero",
            ));
        }
        Ok(Self::new(self.real.tan(), self.dual / (c * c)))
    }

    pub fn exp(self) -> Self {
        let e = self.real.exp();
        Self::new(e, e * self.dual)
    }

    /// Natural logarithm.
    pub fn log(self) -> Result<Self> {
        ensure_nonzero(Op::Log, self.real, self)?;
        Ok(Self::new(self.real.ln(), self.dual / self.real))
    }

    pub fn square(self) -> Self {
        Self::new(self.real * self.real, 2.0 * self.real * self.dual)
    }

    /// `1 / x`.
    pub fn inverse(self) -> Result<Self> {
        ensure_nonzero(Op::Inverse, self.real, self)?;
        Ok(Self::new(
            1.0 / self.real,
            -self.dual / (self.real * self.real),
        ))
    }

    // floor/ceil round both components. Neither is differentiable, so the dual
    // part here is a convention rather than a derivative.

    pub fn floor(self) -> Self {
        Self::new(self.real.floor(), self.dual.floor())
    }

    pub fn ceil(self) -> Self {
        Self::new(self.real.ceil(), self.dual.ceil())
    }
}
