use crate::autodiff::Dual;
use crate::error::Result;

/// A scalar function of one variable that can be evaluated both on plain
/// floats and on dual numbers.
pub trait UnivariateFunction {
    /// Evaluates `f(x)`.
    fn value(&self, x: f64) -> f64;

    /// Evaluates `f` on a dual number, propagating the tangent.
    /// Fails where `f` (or one of its steps) is undefined.
    fn eval_dual(&self, x: Dual) -> Result<Dual>;
}

/// Adapts a pair of closures into a [`UnivariateFunction`].
pub struct FnFunction<V, D> {
    value: V,
    dual: D,
}

impl<V, D> FnFunction<V, D>
where
    V: Fn(f64) -> f64,
    D: Fn(Dual) -> Result<Dual>,
{
    pub fn new(value: V, dual: D) -> Self {
        Self { value, dual }
    }
}

impl<V, D> UnivariateFunction for FnFunction<V, D>
where
    V: Fn(f64) -> f64,
    D: Fn(Dual) -> Result<Dual>,
{
    fn value(&self, x: f64) -> f64 {
        (self.value)(x)
    }

    fn eval_dual(&self, x: Dual) -> Result<Dual> {
        (self.dual)(x)
    }
}

impl<F: UnivariateFunction + ?Sized> UnivariateFunction for &F {
    fn value(&self, x: f64) -> f64 {
        (**self).value(x)
    }

    fn eval_dual(&self, x: Dual) -> Result<Dual> {
        (**self).eval_dual(x)
    }
}
