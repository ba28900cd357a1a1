use serde::Serialize;
use std::fmt::Write;
use std::time::Duration;

pub struct Timed<T> {
    pub value: T,
    pub elapsed: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Method {
    DualNumber,
    Analytic,
    Numerical,
}

#[derive(Debug, Clone, Serialize)]
pub struct Row {
    pub method: Method,
    /// Step size, for finite differences only.
    pub step: Option<f64>,
    pub derivative: f64,
    /// Distance from the analytic derivative.
    pub abs_error: f64,
    pub elapsed_us: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub point: f64,
    pub value: f64,
    pub rows: Vec<Row>,
}

impl Report {
    pub fn new(
        point: f64,
        dual: Timed<(f64, f64)>,
        analytic: Timed<f64>,
        numerical: Vec<(f64, Timed<f64>)>,
    ) -> Self {
        let exact = analytic.value;
        let row = |method, step, derivative: f64, elapsed: Duration| Row {
            method,
            step,
            derivative,
            abs_error: (derivative - exact).abs(),
            elapsed_us: elapsed.as_secs_f64() * 1e6,
        };

        let (value, dual_derivative) = dual.value;
        let mut rows = vec![
            row(Method::DualNumber, None, dual_derivative, dual.elapsed),
            row(Method::Analytic, None, exact, analytic.elapsed),
        ];
        rows.extend(
            numerical
                .into_iter()
                .map(|(h, est)| row(Method::Numerical, Some(h), est.value, est.elapsed)),
        );

        Self { point, value, rows }
    }

    /// Row of `method` closest to the analytic derivative.
    pub fn best(&self, method: Method) -> Option<&Row> {
        self.rows
            .iter()
            .filter(|r| r.method == method && r.abs_error.is_finite())
            .min_by(|a, b| a.abs_error.total_cmp(&b.abs_error))
    }

    pub fn render_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "f(t) = cos(t)·t² + ln(sin t) at t = {}", self.point);
        let _ = writeln!(out, "f({}) = {:.12}", self.point, self.value);
        let _ = writeln!(
            out,
            "{:<12} {:>10} {:>22} {:>12} {:>12}",
            "method", "step", "derivative", "|error|", "time (µs)"
        );
        for r in &self.rows {
            let method = match r.method {
                Method::DualNumber => "dual",
                Method::Analytic => "analytic",
                Method::Numerical => "numerical",
            };
            let step = r.step.map(|h| format!("{h:e}")).unwrap_or_else(|| "-".into());
            let _ = writeln!(
                out,
                "{:<12} {:>10} {:>22.15} {:>12.3e} {:>12.3}",
                method, step, r.derivative, r.abs_error, r.elapsed_us
            );
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn timed<T>(value: T) -> Timed<T> {
        Timed {
            value,
            elapsed: Duration::from_micros(3),
        }
    }

    fn sample() -> Report {
        Report::new(
            1.5,
            timed((0.5, 2.0)),
            timed(2.0),
            vec![(0.1, timed(2.3)), (0.01, timed(2.03)), (1e-12, timed(f64::NAN))],
        )
    }

    #[test]
    fn errors_are_measured_against_analytic() {
        let report = sample();
        assert_eq!(report.rows.len(), 5);
        assert_eq!(report.rows[0].method, Method::DualNumber);
        assert_eq!(report.rows[0].abs_error, 0.0);
        assert!((report.rows[2].abs_error - 0.3).abs() < 1e-12);
    }

    #[test]
    fn best_skips_non_finite_errors() {
        let report = sample();
        let best = report.best(Method::Numerical).unwrap();
        assert_eq!(best.step, Some(0.01));
    }

    #[test]
    fn text_lists_every_row() {
        let text = sample().render_text();
        assert_eq!(text.lines().count(), 2 + 1 + 5);
        assert!(text.contains("numerical"));
    }

    #[test]
    fn json_uses_snake_case_methods() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["rows"][0]["method"], "dual_number");
        assert_eq!(json["rows"][1]["step"], serde_json::Value::Null);
    }
}
