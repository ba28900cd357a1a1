pub mod autodiff;
pub mod checked;
pub mod derivative;
pub mod elementary;
pub mod error;
pub mod operand;
/// The `dual_core` crate provides dual numbers for forward-mode automatic
/// differentiation of scalar functions of one variable.
///
/// Key components:
/// - **Autodiff**: the `Dual` value type with its infallible operators and comparisons.
/// - **Checked**: division, floor division, modulus and powers, which can be undefined.
/// - **Elementary**: sin, cos, tan, exp, log, square, inverse, floor, ceil.
/// - **Traits / Derivative**: `UnivariateFunction` and helpers comparing dual-number
///   derivatives against finite differences.
///
/// Failures are reported as `DualError` and logged at warn level through `tracing`
/// just before they are returned; the caller decides which subscriber, if any, sees them.
pub mod traits;

pub use autodiff::Dual;
pub use error::{DualError, Op, Result};
pub use operand::Operand;
