//! Engine backed by `rand`'s thread-local generator and `rand_distr`.
//!
//! `thread_rng()` is a ChaCha block cipher generator seeded from OS entropy
//! and periodically reseeded. Each worker thread owns its own state, so
//! concurrent tool calls never contend on a lock.
//!
//! Continuous samplers are written against the standard form of each
//! distribution (unit scale, zero location) and then scaled, so that any
//! finite parameter yields a finite sample. Results beyond the float range
//! saturate at `MIN_FLOAT`/`MAX_FLOAT`.

use std::f64::consts::{PI, TAU};

use rand::distributions::OpenClosed01;
use rand::{Rng, thread_rng};
use rand_distr::{
    Bernoulli, Binomial, Cauchy, Distribution, Exp1, Gamma, Gumbel, Normal, Pareto, Poisson,
    StandardNormal, Weibull,
};

use super::{EngineError, EngineResult, MAX_FLOAT, MAX_INT, MIN_FLOAT, RandomEngine};

/// Release series of `rand` this engine is built against (semver-compatible).
pub const RAND_SERIES: &str = "0.8";

/// Release series of `rand_distr` this engine is built against (semver-compatible).
pub const RAND_DISTR_SERIES: &str = "0.4";

/// Above this mean a Poisson draw is approximated by a rounded normal draw.
/// The exact sampler's rejection loop loses precision for very large means.
const POISSON_NORMAL_THRESHOLD: f64 = 1.0e12;

/// Below this concentration the von Mises distribution is treated as uniform.
const VONMISES_UNIFORM_KAPPA: f64 = 1.0e-6;

/// Smallest positive subnormal, the floor for halved shape parameters.
const SMALLEST_SHAPE: f64 = 5e-324;

/// The default engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRngEngine;

impl ThreadRngEngine {
    pub fn new() -> Self {
        Self
    }
}

fn saturate(count: u64) -> i64 {
    i64::try_from(count).unwrap_or(MAX_INT)
}

/// Clamp an overflowed float to the representable range. NaN passes through.
fn bounded(value: f64) -> f64 {
    value.clamp(MIN_FLOAT, MAX_FLOAT)
}

/// `location + scale * z`. With finite operands the sum is never NaN, only
/// possibly infinite, which `bounded` folds back.
fn location_scale(location: f64, scale: f64, z: f64) -> f64 {
    bounded(location + scale * z)
}

/// `x / 2`, kept strictly positive for use as a gamma shape.
fn half_shape(x: f64) -> f64 {
    (0.5 * x).max(SMALLEST_SHAPE)
}

/// Gamma(shape, 1) draw.
fn standard_gamma<R: Rng + ?Sized>(rng: &mut R, shape: f64) -> EngineResult<f64> {
    let gamma = Gamma::new(shape, 1.0).map_err(EngineError::distribution)?;
    Ok(gamma.sample(rng))
}

/// `numerator / denominator` for non-negative operands. Two zeros or two
/// infinities carry no ordering information and resolve to `1.0`.
fn ratio(numerator: f64, denominator: f64) -> f64 {
    let degenerate = (numerator == 0.0 && denominator == 0.0)
        || (numerator.is_infinite() && denominator.is_infinite());
    if degenerate {
        1.0
    } else {
        bounded(numerator / denominator)
    }
}

fn poisson_count<R: Rng + ?Sized>(rng: &mut R, mean: f64) -> EngineResult<i64> {
    if mean <= 0.0 {
        return Ok(0);
    }
    if mean >= POISSON_NORMAL_THRESHOLD {
        let z: f64 = rng.sample(StandardNormal);
        let draw = location_scale(mean, mean.sqrt(), z);
        // float -> int casts saturate at the i64 bounds
        return Ok(draw.round().max(0.0) as i64);
    }
    let poisson = Poisson::new(mean).map_err(EngineError::distribution)?;
    let draw: f64 = poisson.sample(rng);
    Ok(draw as i64)
}

impl RandomEngine for ThreadRngEngine {
    fn name(&self) -> &str {
        "rand_distr"
    }

    fn version(&self) -> String {
        format!("rand {}.x / rand_distr {}.x", RAND_SERIES, RAND_DISTR_SERIES)
    }

    fn dice(&self, rolls: i64, sides: i64) -> EngineResult<i64> {
        if rolls < 0 || sides < 1 {
            return Err(EngineError::Distribution(format!(
                "cannot roll {} dice with {} sides",
                rolls, sides
            )));
        }
        let mut rng = thread_rng();
        Ok((0..rolls).map(|_| rng.gen_range(1..=sides)).sum())
    }

    fn random_range(&self, start: i64, stop: i64, step: i64) -> EngineResult<i64> {
        let empty = EngineError::EmptyRange { start, stop, step };
        let (first, last, stride) = (start as i128, stop as i128, step as i128);

        // Number of elements in range(start, stop, step); i128 cannot overflow here.
        let count = match stride {
            0 => return Err(empty),
            s if s > 0 && last > first => (last - first + s - 1) / s,
            s if s < 0 && last < first => (first - last - s - 1) / -s,
            _ => 0,
        };
        if count <= 0 {
            return Err(empty);
        }

        let index: u128 = thread_rng().gen_range(0..count as u128);
        let value = first + index as i128 * stride;
        i64::try_from(value).map_err(|_| EngineError::Distribution("range overflow".into()))
    }

    fn random_float(&self, lower_limit: f64, upper_bound: f64) -> EngineResult<f64> {
        if lower_limit.is_nan() || upper_bound.is_nan() || lower_limit >= upper_bound {
            return Err(EngineError::Distribution(format!(
                "empty interval [{}, {})",
                lower_limit, upper_bound
            )));
        }
        let width = upper_bound - lower_limit;
        let mut rng = thread_rng();
        loop {
            let unit: f64 = rng.r#gen();
            let value = if width.is_finite() {
                lower_limit + width * unit
            } else {
                // Halve the endpoints so the width stays finite.
                2.0 * (lower_limit / 2.0 + (upper_bound / 2.0 - lower_limit / 2.0) * unit)
            };
            // Rounding can land exactly on the excluded upper bound.
            if value >= lower_limit && value < upper_bound {
                return Ok(value);
            }
        }
    }

    fn triangular(&self, lower_limit: f64, upper_limit: f64, mode: f64) -> EngineResult<f64> {
        if !(lower_limit..=upper_limit).contains(&mode) {
            return Err(EngineError::Distribution(format!(
                "mode {} outside [{}, {}]",
                mode, lower_limit, upper_limit
            )));
        }
        if lower_limit == upper_limit {
            return Ok(lower_limit);
        }

        // Inverse CDF on halved endpoints so that `high - low` stays finite.
        let (low, high) = (lower_limit / 2.0, upper_limit / 2.0);
        let width = high - low;
        let split = (mode / 2.0 - low) / width;
        let unit: f64 = thread_rng().r#gen();
        let value = if unit < split {
            low + width * (unit * split).sqrt()
        } else {
            high - width * ((1.0 - unit) * (1.0 - split)).sqrt()
        };
        Ok((2.0 * value).clamp(lower_limit, upper_limit))
    }

    fn bernoulli_variate(&self, ratio_of_truth: f64) -> EngineResult<i64> {
        let bernoulli = Bernoulli::new(ratio_of_truth).map_err(EngineError::distribution)?;
        Ok(i64::from(bernoulli.sample(&mut thread_rng())))
    }

    fn binomial_variate(&self, number_of_trials: i64, probability: f64) -> EngineResult<i64> {
        let trials = u64::try_from(number_of_trials).map_err(EngineError::distribution)?;
        let binomial = Binomial::new(trials, probability).map_err(EngineError::distribution)?;
        Ok(saturate(binomial.sample(&mut thread_rng())))
    }

    fn negative_binomial_variate(
        &self,
        number_of_trials: i64,
        probability: f64,
    ) -> EngineResult<i64> {
        if number_of_trials < 1 || !(0.0..=1.0).contains(&probability) {
            return Err(EngineError::Distribution(format!(
                "invalid negative binomial parameters ({}, {})",
                number_of_trials, probability
            )));
        }
        if probability == 1.0 {
            return Ok(0);
        }
        if probability == 0.0 {
            // Success never happens: the failure count saturates.
            return Ok(MAX_INT);
        }

        // Gamma-Poisson mixture.
        let scale = (1.0 - probability) / probability;
        let mut rng = thread_rng();
        let mean = scale * standard_gamma(&mut rng, number_of_trials as f64)?;
        if !mean.is_finite() {
            return Ok(MAX_INT);
        }
        poisson_count(&mut rng, mean)
    }

    fn geometric_variate(&self, probability: f64) -> EngineResult<i64> {
        if !(probability > 0.0 && probability <= 1.0) {
            return Err(EngineError::Distribution(format!(
                "geometric probability must be in (0, 1], got {}",
                probability
            )));
        }
        // Inverse CDF: failures = floor(ln U / ln(1 - p)) with U in (0, 1].
        let unit: f64 = thread_rng().sample(OpenClosed01);
        let failures = (unit.ln() / (-probability).ln_1p()).floor();
        // float -> int casts saturate; -0.0 and 0.0 both map to 0
        Ok(failures.max(0.0) as i64)
    }

    fn poisson_variate(&self, mean: f64) -> EngineResult<i64> {
        if mean <= 0.0 {
            return Err(EngineError::Distribution(format!(
                "poisson mean must be positive, got {}",
                mean
            )));
        }
        poisson_count(&mut thread_rng(), mean)
    }

    fn beta_variate(&self, alpha: f64, beta: f64) -> EngineResult<f64> {
        let mut rng = thread_rng();
        let x = standard_gamma(&mut rng, alpha)?;
        let y = standard_gamma(&mut rng, beta)?;

        let mean = if (alpha + beta).is_finite() {
            alpha / (alpha + beta)
        } else {
            (alpha / 2.0) / (alpha / 2.0 + beta / 2.0)
        };

        let value = match (x.is_infinite(), y.is_infinite()) {
            // Shapes this large leave no spread around the mean.
            (true, true) => mean,
            (true, false) => 1.0,
            (false, true) => 0.0,
            // Both draws underflowed: the mass sits on {0, 1} with P(1) = mean.
            _ if x == 0.0 && y == 0.0 => {
                if rng.r#gen::<f64>() < mean { 1.0 } else { 0.0 }
            }
            _ if (x + y).is_finite() => x / (x + y),
            _ => (x / 2.0) / (x / 2.0 + y / 2.0),
        };
        Ok(value.clamp(0.0, 1.0))
    }

    fn pareto_variate(&self, alpha: f64) -> EngineResult<f64> {
        let dist = Pareto::new(1.0, alpha).map_err(EngineError::distribution)?;
        Ok(bounded(dist.sample(&mut thread_rng())))
    }

    fn vonmises_variate(&self, mu: f64, kappa: f64) -> EngineResult<f64> {
        if kappa < 0.0 {
            return Err(EngineError::Distribution(format!(
                "kappa must be non-negative, got {}",
                kappa
            )));
        }
        let mut rng = thread_rng();
        if kappa <= VONMISES_UNIFORM_KAPPA {
            return Ok(TAU * rng.r#gen::<f64>());
        }

        // Best & Fisher rejection sampler.
        let s = 0.5 / kappa;
        let r = s + (1.0 + s * s).sqrt();
        let z = loop {
            let z = (PI * rng.r#gen::<f64>()).cos();
            let d = z / (r + z);
            let u: f64 = rng.r#gen();
            if u < 1.0 - d * d || u <= (1.0 - d) * d.exp() {
                break z;
            }
        };
        let q = 1.0 / r;
        let f = (q + z) / (1.0 + q * z);
        let theta = if rng.r#gen::<f64>() > 0.5 {
            mu + f.acos()
        } else {
            mu - f.acos()
        };
        // rem_euclid may round up to TAU itself for tiny negative inputs.
        let angle = theta.rem_euclid(TAU);
        Ok(if angle >= TAU { 0.0 } else { angle })
    }

    fn exponential_variate(&self, lambda_rate: f64) -> EngineResult<f64> {
        if !(lambda_rate > 0.0) {
            return Err(EngineError::Distribution(format!(
                "rate must be positive, got {}",
                lambda_rate
            )));
        }
        let draw: f64 = thread_rng().sample(Exp1);
        Ok(bounded(draw / lambda_rate))
    }

    fn gamma_variate(&self, shape: f64, scale: f64) -> EngineResult<f64> {
        if !(scale > 0.0) {
            return Err(EngineError::Distribution(format!(
                "gamma scale must be positive, got {}",
                scale
            )));
        }
        let draw = standard_gamma(&mut thread_rng(), shape)?;
        Ok(bounded(scale * draw))
    }

    fn weibull_variate(&self, shape: f64, scale: f64) -> EngineResult<f64> {
        let dist = Weibull::new(scale, shape).map_err(EngineError::distribution)?;
        Ok(bounded(dist.sample(&mut thread_rng())))
    }

    fn normal_variate(&self, mean: f64, std_dev: f64) -> EngineResult<f64> {
        let z: f64 = thread_rng().sample(StandardNormal);
        Ok(location_scale(mean, std_dev, z))
    }

    fn log_normal_variate(&self, log_mean: f64, log_deviation: f64) -> EngineResult<f64> {
        let z: f64 = thread_rng().sample(StandardNormal);
        Ok(bounded(location_scale(log_mean, log_deviation, z).exp()))
    }

    fn extreme_value_variate(&self, location: f64, scale: f64) -> EngineResult<f64> {
        let gumbel = Gumbel::new(0.0, 1.0).map_err(EngineError::distribution)?;
        let z: f64 = gumbel.sample(&mut thread_rng());
        Ok(location_scale(location, scale, z))
    }

    fn chi_squared_variate(&self, degrees_of_freedom: f64) -> EngineResult<f64> {
        // Chi-squared(k) = 2 * Gamma(k / 2, 1).
        let draw = standard_gamma(&mut thread_rng(), half_shape(degrees_of_freedom))?;
        Ok(bounded(2.0 * draw))
    }

    fn cauchy_variate(&self, location: f64, scale: f64) -> EngineResult<f64> {
        let cauchy = Cauchy::new(0.0, 1.0).map_err(EngineError::distribution)?;
        let z: f64 = cauchy.sample(&mut thread_rng());
        Ok(location_scale(location, scale, z))
    }

    fn fisher_f_variate(
        &self,
        degrees_of_freedom_1: f64,
        degrees_of_freedom_2: f64,
    ) -> EngineResult<f64> {
        // F = (X1 / d1) / (X2 / d2) with Xi ~ Chi-squared(di) = 2 * Gamma(di / 2).
        let (h1, h2) = (
            half_shape(degrees_of_freedom_1),
            half_shape(degrees_of_freedom_2),
        );
        let mut rng = thread_rng();
        let numerator = standard_gamma(&mut rng, h1)? / h1;
        let denominator = standard_gamma(&mut rng, h2)? / h2;
        Ok(ratio(numerator, denominator))
    }

    fn student_t_variate(&self, degrees_of_freedom: f64) -> EngineResult<f64> {
        // T = Z / sqrt(X / k) with X ~ Chi-squared(k), i.e. X / k = G / (k / 2).
        let half = half_shape(degrees_of_freedom);
        let mut rng = thread_rng();
        let z: f64 = rng.sample(StandardNormal);
        let spread = (standard_gamma(&mut rng, half)? / half).sqrt();
        if z == 0.0 {
            return Ok(0.0);
        }
        Ok(bounded(z / spread))
    }
}
