use crate::autodiff::Dual;
use crate::error::{DualError, Op, Result};
use crate::traits::UnivariateFunction;

/// `f'(x)` by seeding `Dual(x, 1)` and reading off the dual part.
pub fn derivative<F: UnivariateFunction>(f: F, x: f64) -> Result<f64> {
    value_and_derivative(f, x).map(|(_, d)| d)
}

/// `(f(x), f'(x))` from a single forward evaluation.
pub fn value_and_derivative<F: UnivariateFunction>(f: F, x: f64) -> Result<(f64, f64)> {
    let out = f.eval_dual(Dual::variable(x))?;
    Ok((out.real, out.dual))
}

fn check_step(h: f64) -> Result<()> {
    if h == 0.0 || !h.is_finite() {
        return Err(DualError::undefined(
            Op::FiniteDifference,
            h,
            "step size must be finite and non-zero",
        ));
    }
    Ok(())
}

/// Forward difference `(f(x + h) − f(x)) / h`. Truncation error is O(h);
/// very small steps lose precision to cancellation instead.
pub fn forward_difference<F: UnivariateFunction>(f: F, x: f64, h: f64) -> Result<f64> {
    check_step(h)?;
    Ok((f.value(x + h) - f.value(x)) / h)
}

/// Central difference `(f(x + h) − f(x − h)) / 2h`, O(h²).
pub fn central_difference<F: UnivariateFunction>(f: F, x: f64, h: f64) -> Result<f64> {
    check_step(h)?;
    Ok((f.value(x + h) - f.value(x - h)) / (2.0 * h))
}
