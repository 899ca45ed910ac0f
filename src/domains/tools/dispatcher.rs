//! Dispatcher - the single entry point for every tool call.
//!
//! A call is resolved against the [`ContractRegistry`], validated field by
//! field and then across fields (fail-fast, declaration order), forwarded to
//! the engine and finally coerced to the contract's result kind.

use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::{debug, error, instrument, warn};

use crate::engine::RandomEngine;

use super::contract::{Arguments, OperationContract, ToolValue};
use super::error::{ToolError, ValidationFailure};
use super::registry::ContractRegistry;

/// Validates tool calls and forwards them to the engine.
#[derive(Clone)]
pub struct Dispatcher {
    registry: Arc<ContractRegistry>,
    engine: Arc<dyn RandomEngine>,
}

impl Dispatcher {
    pub fn new(registry: Arc<ContractRegistry>, engine: Arc<dyn RandomEngine>) -> Self {
        Self { registry, engine }
    }

    /// Dispatcher over the standard catalogue for `engine`.
    pub fn standard(engine: Arc<dyn RandomEngine>) -> Result<Self, ToolError> {
        let registry = ContractRegistry::standard(&engine.limits())?;
        Ok(Self::new(Arc::new(registry), engine))
    }

    pub fn registry(&self) -> &ContractRegistry {
        &self.registry
    }

    pub fn engine(&self) -> &dyn RandomEngine {
        self.engine.as_ref()
    }

    /// Invoke `operation` with raw `arguments`.
    #[instrument(skip(self, arguments))]
    pub fn invoke(
        &self,
        operation: &str,
        arguments: &Map<String, Value>,
    ) -> Result<ToolValue, ToolError> {
        let contract = self.registry.lookup(operation).inspect_err(|_| {
            warn!("Unknown operation requested: {}", operation);
        })?;

        let args = validate(contract, arguments).inspect_err(|failure| {
            warn!("Rejected {} call: {}", operation, failure);
        })?;

        let sample = (contract.binding)(self.engine.as_ref(), &args)
            .and_then(|sample| contract.result_kind.coerce(sample))
            .map_err(|e| {
                error!("Engine failure in {}: {}", operation, e);
                ToolError::engine(operation, e)
            })?;

        debug!("{} -> {:?}", operation, sample);
        Ok(sample)
    }
}

/// Validate `raw` against `contract`, returning the typed arguments.
pub fn validate(
    contract: &OperationContract,
    raw: &Map<String, Value>,
) -> Result<Arguments, ToolError> {
    let mut args = Arguments::new();
    for parameter in &contract.parameters {
        let arg = parameter.validate(raw.get(parameter.name))?;
        args.push(parameter.name, arg);
    }

    for extra in raw
        .keys()
        .filter(|k| !contract.parameters.iter().any(|p| p.name == k.as_str()))
    {
        debug!("Ignoring undeclared argument '{}' for {}", extra, contract.name);
    }

    for constraint in &contract.cross_constraints {
        let holds = (constraint.holds)(&args).map_err(|e| {
            ToolError::internal(format!(
                "constraint '{}' of {} could not be evaluated: {}",
                constraint.name, contract.name, e
            ))
        })?;
        if !holds {
            return Err(ValidationFailure::constraint(constraint.name, constraint.rule).into());
        }
    }

    Ok(args)
}
