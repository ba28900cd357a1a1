//! Derivative comparison demo
//!
//! Differentiates `f(t) = cos(t)·t² + ln(sin t)` three ways: dual numbers,
//! the closed-form derivative, and forward differences over a range of step sizes.

mod report;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use dual_core::derivative::{forward_difference, value_and_derivative};
use dual_core::traits::UnivariateFunction;
use dual_core::Dual;
use report::{Method, Report, Timed};
use std::time::Instant;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "dual_demo")]
#[command(about = "Compare dual-number, analytic and finite-difference derivatives")]
#[command(version)]
struct Cli {
    /// Log verbosity level (trace, debug, info, warn, error); `RUST_LOG` takes precedence
    #[arg(long, default_value = "warn")]
    log_level: tracing::Level,

    /// Point at which to differentiate.
    #[arg(long, default_value_t = 1.5, allow_negative_numbers = true)]
    point: f64,

    /// Forward-difference step sizes.
    #[arg(
        long,
        value_delimiter = ',',
        default_value = "1,0.5,0.3,0.01,1e-3,1e-4,1e-5,1e-6,1e-7,1e-8,1e-10,1e-11,1e-12"
    )]
    steps: Vec<f64>,

    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
}

/// `cos(t)·t² + ln(sin t)`
struct Target;

impl UnivariateFunction for Target {
    fn value(&self, t: f64) -> f64 {
        t.sin().ln() + t * t * t.cos()
    }

    fn eval_dual(&self, t: Dual) -> dual_core::Result<Dual> {
        Ok(t.cos() * t.square() + t.sin().log()?)
    }
}

fn analytic_derivative(t: f64) -> f64 {
    2.0 * t * t.cos() - t * t * t.sin() + t.cos() / t.sin()
}

/// `RUST_LOG` directives when set and valid, otherwise `fallback` for every target.
fn log_filter(fallback: tracing::Level, env: Option<&str>) -> EnvFilter {
    env.filter(|directives| !directives.trim().is_empty())
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| {
            EnvFilter::default().add_directive(LevelFilter::from_level(fallback).into())
        })
}

fn timed<T>(f: impl FnOnce() -> Result<T>) -> Result<Timed<T>> {
    let start = Instant::now();
    let value = f()?;
    Ok(Timed {
        value,
        elapsed: start.elapsed(),
    })
}

fn run(cli: &Cli) -> Result<Report> {
    let t = cli.point;
    tracing::info!(point = t, steps = cli.steps.len(), "differentiating target");

    let dual = timed(|| {
        value_and_derivative(Target, t)
            .with_context(|| format!("dual-number evaluation failed at t = {t}"))
    })?;
    let analytic = timed(|| Ok(analytic_derivative(t)))?;

    let mut numerical = Vec::with_capacity(cli.steps.len());
    for &h in &cli.steps {
        let estimate = timed(|| {
            forward_difference(Target, t, h)
                .with_context(|| format!("forward difference failed for step {h}"))
        })?;
        numerical.push((h, estimate));
    }

    Ok(Report::new(t, dual, analytic, numerical))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let env = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(cli.log_level, env.as_deref()))
        .with_target(false)
        .init();

    let report = run(&cli)?;
    match cli.format {
        Format::Text => print!("{}", report.render_text()),
        Format::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }

    let best = report
        .best(Method::Numerical)
        .context("no finite-difference estimates were produced")?;
    tracing::debug!(step = best.step, error = best.abs_error, "best finite-difference step");
    Ok(())
}
