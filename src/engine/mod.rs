//! Random engine abstraction.
//!
//! The engine owns entropy, seeding and the sampling algorithms. The tools
//! domain only ever talks to it through [`RandomEngine`], after arguments
//! have been validated against the operation contracts.
//!
//! Methods return raw samples in the engine's native types: integers are
//! `i64`, floats are `f64`, and the Bernoulli draw is reported as `0`/`1`.

mod error;
mod thread_rng;

pub use error::{EngineError, EngineResult};
pub use thread_rng::ThreadRngEngine;

use serde::Serialize;

/// Smallest integer the engine accepts or produces.
pub const MIN_INT: i64 = -i64::MAX;

/// Largest integer the engine accepts or produces.
pub const MAX_INT: i64 = i64::MAX;

/// Smallest finite float the engine accepts.
pub const MIN_FLOAT: f64 = f64::MIN;

/// Largest finite float the engine accepts.
pub const MAX_FLOAT: f64 = f64::MAX;

/// Representable domain reported by an engine.
///
/// Operation contracts are derived from these values so that no contract
/// claims a wider domain than the engine supports.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EngineLimits {
    pub min_int: i64,
    pub max_int: i64,
    pub min_float: f64,
    pub max_float: f64,
}

impl Default for EngineLimits {
    fn default() -> Self {
        Self {
            min_int: MIN_INT,
            max_int: MAX_INT,
            min_float: MIN_FLOAT,
            max_float: MAX_FLOAT,
        }
    }
}

/// A raw value produced by the engine, before result coercion.
#[derive(Debug, Clone, PartialEq)]
pub enum Sample {
    Int(i64),
    Float(f64),
    Text(String),
}

impl Sample {
    /// Short name of the variant, used in coercion errors.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Int(_) => "integer",
            Self::Float(_) => "float",
            Self::Text(_) => "text",
        }
    }
}

/// The random value generation service behind every tool.
///
/// Implementations must be safe to share across tasks; every method takes
/// `&self` and callers never hold a lock around it.
pub trait RandomEngine: Send + Sync {
    /// Engine name as reported in `fortuna_info`.
    fn name(&self) -> &str;

    /// Engine version string.
    fn version(&self) -> String;

    /// Representable numeric domain.
    fn limits(&self) -> EngineLimits {
        EngineLimits::default()
    }

    /// Sum of `rolls` dice with `sides` faces each.
    fn dice(&self, rolls: i64, sides: i64) -> EngineResult<i64>;

    /// Uniform pick from `range(start, stop, step)`.
    fn random_range(&self, start: i64, stop: i64, step: i64) -> EngineResult<i64>;

    /// Uniform float in `[lower_limit, upper_bound)`.
    fn random_float(&self, lower_limit: f64, upper_bound: f64) -> EngineResult<f64>;

    fn triangular(&self, lower_limit: f64, upper_limit: f64, mode: f64) -> EngineResult<f64>;

    /// Returns `1` with probability `ratio_of_truth`, `0` otherwise.
    fn bernoulli_variate(&self, ratio_of_truth: f64) -> EngineResult<i64>;

    fn binomial_variate(&self, number_of_trials: i64, probability: f64) -> EngineResult<i64>;

    /// Number of failures before `number_of_trials` successes.
    fn negative_binomial_variate(&self, number_of_trials: i64, probability: f64)
    -> EngineResult<i64>;

    /// Number of failures before the first success.
    fn geometric_variate(&self, probability: f64) -> EngineResult<i64>;

    fn poisson_variate(&self, mean: f64) -> EngineResult<i64>;

    fn beta_variate(&self, alpha: f64, beta: f64) -> EngineResult<f64>;

    /// Pareto sample with unit scale, always `>= 1`.
    fn pareto_variate(&self, alpha: f64) -> EngineResult<f64>;

    /// Angle in `[0, 2π)`.
    fn vonmises_variate(&self, mu: f64, kappa: f64) -> EngineResult<f64>;

    fn exponential_variate(&self, lambda_rate: f64) -> EngineResult<f64>;

    fn gamma_variate(&self, shape: f64, scale: f64) -> EngineResult<f64>;

    fn weibull_variate(&self, shape: f64, scale: f64) -> EngineResult<f64>;

    fn normal_variate(&self, mean: f64, std_dev: f64) -> EngineResult<f64>;

    fn log_normal_variate(&self, log_mean: f64, log_deviation: f64) -> EngineResult<f64>;

    /// Gumbel (type I extreme value) sample.
    fn extreme_value_variate(&self, location: f64, scale: f64) -> EngineResult<f64>;

    fn chi_squared_variate(&self, degrees_of_freedom: f64) -> EngineResult<f64>;

    fn cauchy_variate(&self, location: f64, scale: f64) -> EngineResult<f64>;

    fn fisher_f_variate(
        &self,
        degrees_of_freedom_1: f64,
        degrees_of_freedom_2: f64,
    ) -> EngineResult<f64>;

    fn student_t_variate(&self, degrees_of_freedom: f64) -> EngineResult<f64>;
}
