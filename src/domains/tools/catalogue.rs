//! The operation catalogue.
//!
//! Every tool the server exposes is declared here as data. Bounds come from
//! the engine's reported limits so that no contract is wider than what the
//! engine can represent.

use crate::engine::{EngineLimits, EngineResult, Sample};

use super::contract::{
    Arguments, Constraint, Number, OperationContract, ParamKind, Parameter, ResultKind,
};

/// Faces accepted by `dice`.
pub const POLYHEDRA: &[i64] = &[2, 4, 6, 8, 10, 12, 20, 30, 100];

/// Largest number of dice per roll.
pub const MAX_ROLLS: i64 = 100;

/// Service version interpolated into `fortuna_info`.
pub const SERVICE_VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// Parameter shorthands
// ============================================================================

fn int_in(name: &'static str, lo: i64, hi: i64, description: &'static str) -> Parameter {
    Parameter {
        name,
        kind: ParamKind::Integer,
        constraint: Constraint::Closed {
            lo: Number::Int(lo),
            hi: Number::Int(hi),
        },
        description,
    }
}

fn float_in(name: &'static str, lo: f64, hi: f64, description: &'static str) -> Parameter {
    Parameter {
        name,
        kind: ParamKind::Float,
        constraint: Constraint::Closed {
            lo: Number::Float(lo),
            hi: Number::Float(hi),
        },
        description,
    }
}

/// A float in `(0, hi]`.
fn positive_float(name: &'static str, hi: f64, description: &'static str) -> Parameter {
    Parameter {
        name,
        kind: ParamKind::Float,
        constraint: Constraint::OpenLower {
            lo: Number::Float(0.0),
            hi: Number::Float(hi),
        },
        description,
    }
}

fn probability(name: &'static str, description: &'static str) -> Parameter {
    float_in(name, 0.0, 1.0, description)
}

fn choice(name: &'static str, choices: &'static [i64], description: &'static str) -> Parameter {
    Parameter {
        name,
        kind: ParamKind::Enum,
        constraint: Constraint::OneOf(choices),
        description,
    }
}

// ============================================================================
// Cross-field rules
// ============================================================================

fn step_nonzero(args: &Arguments) -> EngineResult<bool> {
    Ok(args.int("step")? != 0)
}

fn range_non_empty(args: &Arguments) -> EngineResult<bool> {
    let (start, stop, step) = (args.int("start")?, args.int("stop")?, args.int("step")?);
    Ok((step > 0 && start < stop) || (step < 0 && start > stop))
}

fn lower_below_upper(args: &Arguments) -> EngineResult<bool> {
    Ok(args.float("lower_limit")? < args.float("upper_bound")?)
}

fn mode_within_limits(args: &Arguments) -> EngineResult<bool> {
    let (lower, upper, mode) = (
        args.float("lower_limit")?,
        args.float("upper_limit")?,
        args.float("mode")?,
    );
    Ok(lower <= mode && mode <= upper)
}

// ============================================================================
// Catalogue
// ============================================================================

/// Build the contract of every operation, in listing order.
pub fn standard_catalogue(limits: &EngineLimits) -> Vec<OperationContract> {
    let EngineLimits {
        min_int,
        max_int,
        min_float,
        max_float,
    } = *limits;

    vec![
        OperationContract::new(
            "fortuna_info",
            "Return information about FortunaMCP and the random engine that powers it.",
            ResultKind::Text,
            |engine, _| Ok(Sample::Text(info_text(engine.name(), &engine.version()))),
        ),
        OperationContract::new(
            "dice",
            "Roll a number of dice with the given number of sides and return the summed total.",
            ResultKind::Integer,
            |engine, args| Ok(Sample::Int(engine.dice(args.int("rolls")?, args.int("sides")?)?)),
        )
        .param(int_in("rolls", 1, MAX_ROLLS, "Number of dice to roll (1 <= rolls <= 100)."))
        .param(choice(
            "sides",
            POLYHEDRA,
            "Number of sides per die: 2, 4, 6, 8, 10, 12, 20, 30 or 100.",
        )),
        OperationContract::new(
            "random_range",
            "Return a random integer picked uniformly from range(start, stop, step).",
            ResultKind::Integer,
            |engine, args| {
                Ok(Sample::Int(engine.random_range(
                    args.int("start")?,
                    args.int("stop")?,
                    args.int("step")?,
                )?))
            },
        )
        .param(int_in("start", min_int, max_int, "Start of the range (inclusive)."))
        .param(int_in("stop", min_int, max_int, "End of the range (exclusive)."))
        .param(int_in("step", min_int, max_int, "Increment between values; must be non-zero."))
        .cross("step_nonzero", "step != 0", step_nonzero)
        .cross(
            "non_empty_range",
            "range(start, stop, step) contains at least one value",
            range_non_empty,
        ),
        OperationContract::new(
            "random_float",
            "Return a random float uniformly distributed in [lower_limit, upper_bound).",
            ResultKind::Float,
            |engine, args| {
                Ok(Sample::Float(engine.random_float(
                    args.float("lower_limit")?,
                    args.float("upper_bound")?,
                )?))
            },
        )
        .param(float_in("lower_limit", min_float, max_float, "Inclusive lower bound."))
        .param(float_in("upper_bound", min_float, max_float, "Exclusive upper bound."))
        .cross(
            "lower_below_upper",
            "lower_limit < upper_bound",
            lower_below_upper,
        ),
        OperationContract::new(
            "triangular",
            "Return a random float from the triangular distribution between two limits with the given mode.",
            ResultKind::Float,
            |engine, args| {
                Ok(Sample::Float(engine.triangular(
                    args.float("lower_limit")?,
                    args.float("upper_limit")?,
                    args.float("mode")?,
                )?))
            },
        )
        .param(float_in("lower_limit", min_float, max_float, "Lower limit of the distribution."))
        .param(float_in("upper_limit", min_float, max_float, "Upper limit of the distribution."))
        .param(float_in("mode", min_float, max_float, "Most likely value."))
        .cross(
            "mode_within_limits",
            "lower_limit <= mode <= upper_limit",
            mode_within_limits,
        ),
        OperationContract::new(
            "bernoulli_variate",
            "Return true with probability ratio_of_truth, false otherwise.",
            ResultKind::Boolean,
            |engine, args| {
                Ok(Sample::Int(engine.bernoulli_variate(args.float("ratio_of_truth")?)?))
            },
        )
        .param(probability("ratio_of_truth", "Probability of returning true (0 <= p <= 1).")),
        OperationContract::new(
            "binomial_variate",
            "Return the number of successes in a series of independent trials.",
            ResultKind::Integer,
            |engine, args| {
                Ok(Sample::Int(engine.binomial_variate(
                    args.int("number_of_trials")?,
                    args.float("probability")?,
                )?))
            },
        )
        .param(int_in("number_of_trials", 1, max_int, "Number of trials."))
        .param(probability("probability", "Probability of success per trial.")),
        OperationContract::new(
            "negative_binomial_variate",
            "Return the number of failures before the requested number of successes.",
            ResultKind::Integer,
            |engine, args| {
                Ok(Sample::Int(engine.negative_binomial_variate(
                    args.int("number_of_trials")?,
                    args.float("probability")?,
                )?))
            },
        )
        .param(int_in("number_of_trials", 1, max_int, "Number of successes to reach."))
        .param(probability("probability", "Probability of success per trial.")),
        OperationContract::new(
            "geometric_variate",
            "Return the number of failures before the first success.",
            ResultKind::Integer,
            |engine, args| Ok(Sample::Int(engine.geometric_variate(args.float("probability")?)?)),
        )
        .param(positive_float("probability", 1.0, "Probability of success per trial (0 < p <= 1).")),
        OperationContract::new(
            "poisson_variate",
            "Return the number of events in a fixed interval for the given mean rate.",
            ResultKind::Integer,
            |engine, args| Ok(Sample::Int(engine.poisson_variate(args.float("mean")?)?)),
        )
        .param(positive_float("mean", max_float, "Expected number of events.")),
        OperationContract::new(
            "beta_variate",
            "Return a random float in [0, 1] from the beta distribution.",
            ResultKind::Float,
            |engine, args| {
                Ok(Sample::Float(
                    engine.beta_variate(args.float("alpha")?, args.float("beta")?)?,
                ))
            },
        )
        .param(positive_float("alpha", max_float, "First shape parameter."))
        .param(positive_float("beta", max_float, "Second shape parameter.")),
        OperationContract::new(
            "pareto_variate",
            "Return a random float of at least 1 from the Pareto distribution.",
            ResultKind::Float,
            |engine, args| Ok(Sample::Float(engine.pareto_variate(args.float("alpha")?)?)),
        )
        .param(positive_float("alpha", max_float, "Shape parameter.")),
        OperationContract::new(
            "vonmises_variate",
            "Return a random angle in radians in [0, 2π) from the von Mises distribution.",
            ResultKind::Float,
            |engine, args| {
                Ok(Sample::Float(
                    engine.vonmises_variate(args.float("mu")?, args.float("kappa")?)?,
                ))
            },
        )
        .param(float_in("mu", min_float, max_float, "Mean angle in radians."))
        .param(float_in("kappa", 0.0, max_float, "Concentration; 0 gives a uniform angle.")),
        OperationContract::new(
            "exponential_variate",
            "Return a random float from the exponential distribution.",
            ResultKind::Float,
            |engine, args| {
                Ok(Sample::Float(engine.exponential_variate(args.float("lambda_rate")?)?))
            },
        )
        .param(positive_float("lambda_rate", max_float, "Rate parameter.")),
        OperationContract::new(
            "gamma_variate",
            "Return a random float from the gamma distribution.",
            ResultKind::Float,
            |engine, args| {
                Ok(Sample::Float(
                    engine.gamma_variate(args.float("shape")?, args.float("scale")?)?,
                ))
            },
        )
        .param(positive_float("shape", max_float, "Shape parameter."))
        .param(positive_float("scale", max_float, "Scale parameter.")),
        OperationContract::new(
            "weibull_variate",
            "Return a random float from the Weibull distribution.",
            ResultKind::Float,
            |engine, args| {
                Ok(Sample::Float(
                    engine.weibull_variate(args.float("shape")?, args.float("scale")?)?,
                ))
            },
        )
        .param(positive_float("shape", max_float, "Shape parameter."))
        .param(positive_float("scale", max_float, "Scale parameter.")),
        OperationContract::new(
            "normal_variate",
            "Return a random float from the normal (Gaussian) distribution.",
            ResultKind::Float,
            |engine, args| {
                Ok(Sample::Float(
                    engine.normal_variate(args.float("mean")?, args.float("std_dev")?)?,
                ))
            },
        )
        .param(float_in("mean", min_float, max_float, "Mean of the distribution."))
        .param(positive_float("std_dev", max_float, "Standard deviation.")),
        OperationContract::new(
            "log_normal_variate",
            "Return a random positive float whose logarithm is normally distributed.",
            ResultKind::Float,
            |engine, args| {
                Ok(Sample::Float(engine.log_normal_variate(
                    args.float("log_mean")?,
                    args.float("log_deviation")?,
                )?))
            },
        )
        .param(float_in("log_mean", min_float, max_float, "Mean of the underlying normal."))
        .param(positive_float(
            "log_deviation",
            max_float,
            "Standard deviation of the underlying normal.",
        )),
        OperationContract::new(
            "extreme_value_variate",
            "Return a random float from the extreme value (Gumbel) distribution.",
            ResultKind::Float,
            |engine, args| {
                Ok(Sample::Float(
                    engine.extreme_value_variate(args.float("location")?, args.float("scale")?)?,
                ))
            },
        )
        .param(float_in("location", min_float, max_float, "Location parameter."))
        .param(positive_float("scale", max_float, "Scale parameter.")),
        OperationContract::new(
            "chi_squared_variate",
            "Return a random float from the chi-squared distribution.",
            ResultKind::Float,
            |engine, args| {
                Ok(Sample::Float(
                    engine.chi_squared_variate(args.float("degrees_of_freedom")?)?,
                ))
            },
        )
        .param(positive_float("degrees_of_freedom", max_float, "Degrees of freedom.")),
        OperationContract::new(
            "cauchy_variate",
            "Return a random float from the Cauchy distribution.",
            ResultKind::Float,
            |engine, args| {
                Ok(Sample::Float(
                    engine.cauchy_variate(args.float("location")?, args.float("scale")?)?,
                ))
            },
        )
        .param(float_in("location", min_float, max_float, "Location (median)."))
        .param(positive_float("scale", max_float, "Scale parameter.")),
        OperationContract::new(
            "fisher_f_variate",
            "Return a random float from the Fisher F distribution.",
            ResultKind::Float,
            |engine, args| {
                Ok(Sample::Float(engine.fisher_f_variate(
                    args.float("degrees_of_freedom_1")?,
                    args.float("degrees_of_freedom_2")?,
                )?))
            },
        )
        .param(positive_float("degrees_of_freedom_1", max_float, "Numerator degrees of freedom."))
        .param(positive_float(
            "degrees_of_freedom_2",
            max_float,
            "Denominator degrees of freedom.",
        )),
        OperationContract::new(
            "student_t_variate",
            "Return a random float from Student's t distribution.",
            ResultKind::Float,
            |engine, args| {
                Ok(Sample::Float(
                    engine.student_t_variate(args.float("degrees_of_freedom")?)?,
                ))
            },
        )
        .param(positive_float("degrees_of_freedom", max_float, "Degrees of freedom.")),
    ]
}

/// Text returned by `fortuna_info`.
pub fn info_text(engine_name: &str, engine_version: &str) -> String {
    format!(
        "\
### FortunaMCP v{service}: MCP Server
FortunaMCP is a random number generator (RNG) model context protocol (MCP) server.
It bridges the gap where large language models fall short in delivering true randomness,
giving AI agents high-quality random distributions for simulations, modeling and creative tasks.
Every tool validates its arguments against a strict contract before any value is drawn.

### Engine: {engine} ({engine_version})
Values are drawn from a thread-local ChaCha generator seeded from operating system entropy
and reseeded periodically, so concurrent requests never share generator state.
The engine provides dice, ranges, uniform floats and twenty statistical distributions.",
        service = SERVICE_VERSION,
        engine = engine_name,
        engine_version = engine_version,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalogue() -> Vec<OperationContract> {
        standard_catalogue(&EngineLimits::default())
    }

    fn contract(name: &str) -> OperationContract {
        catalogue()
            .into_iter()
            .find(|c| c.name == name)
            .unwrap_or_else(|| panic!("missing contract {}", name))
    }

    #[test]
    fn test_catalogue_size_and_names() {
        let names: Vec<_> = catalogue().iter().map(|c| c.name).collect();
        assert_eq!(names.len(), 23);
        for expected in [
            "fortuna_info",
            "dice",
            "random_range",
            "random_float",
            "triangular",
            "bernoulli_variate",
            "binomial_variate",
            "negative_binomial_variate",
            "geometric_variate",
            "poisson_variate",
            "beta_variate",
            "pareto_variate",
            "vonmises_variate",
            "exponential_variate",
            "gamma_variate",
            "weibull_variate",
            "normal_variate",
            "log_normal_variate",
            "extreme_value_variate",
            "chi_squared_variate",
            "cauchy_variate",
            "fisher_f_variate",
            "student_t_variate",
        ] {
            assert!(names.contains(&expected), "missing {}", expected);
        }
    }

    #[test]
    fn test_bounds_never_exceed_engine_limits() {
        let limits = EngineLimits::default();
        for contract in catalogue() {
            for p in &contract.parameters {
                let (lo, hi) = match &p.constraint {
                    Constraint::Closed { lo, hi } | Constraint::OpenLower { lo, hi } => (*lo, *hi),
                    _ => continue,
                };
                match (lo, hi) {
                    (Number::Int(lo), Number::Int(hi)) => {
                        assert!(lo >= limits.min_int && hi <= limits.max_int, "{}", p.name);
                    }
                    (Number::Float(lo), Number::Float(hi)) => {
                        assert!(lo >= limits.min_float && hi <= limits.max_float, "{}", p.name);
                    }
                    _ => panic!("mixed bound types on {}.{}", contract.name, p.name),
                }
            }
        }
    }

    #[test]
    fn test_dice_contract() {
        let dice = contract("dice");
        assert_eq!(dice.parameters[0].name, "rolls");
        assert_eq!(
            dice.parameters[0].constraint,
            Constraint::Closed {
                lo: Number::Int(1),
                hi: Number::Int(100)
            }
        );
        assert_eq!(dice.parameters[1].constraint, Constraint::OneOf(POLYHEDRA));
        assert_eq!(dice.result_kind, ResultKind::Integer);
    }

    #[test]
    fn test_geometric_probability_excludes_zero() {
        let geometric = contract("geometric_variate");
        assert_eq!(
            geometric.parameters[0].constraint,
            Constraint::OpenLower {
                lo: Number::Float(0.0),
                hi: Number::Float(1.0)
            }
        );
    }

    #[test]
    fn test_vonmises_kappa_includes_zero() {
        let vonmises = contract("vonmises_variate");
        assert_eq!(
            vonmises.parameters[1].constraint,
            Constraint::Closed {
                lo: Number::Float(0.0),
                hi: Number::Float(f64::MAX)
            }
        );
    }

    #[test]
    fn test_fortuna_info_has_no_parameters() {
        let info = contract("fortuna_info");
        assert!(info.parameters.is_empty());
        assert_eq!(info.result_kind, ResultKind::Text);
    }

    #[test]
    fn test_info_text_interpolates_versions() {
        let text = info_text("rand_distr", "rand 0.8 / rand_distr 0.4");
        assert!(text.contains(&format!("FortunaMCP v{}", SERVICE_VERSION)));
        assert!(text.contains("rand 0.8 / rand_distr 0.4"));
    }
}
