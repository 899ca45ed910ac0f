//! Contract Registry - the authoritative table of operation contracts.
//!
//! The registry is populated once at startup and only read afterwards, so it
//! is shared behind an `Arc` without any locking.

use std::collections::HashMap;

use rmcp::model::Tool;
use tracing::debug;

use crate::engine::EngineLimits;

use super::catalogue::standard_catalogue;
use super::contract::OperationContract;
use super::error::ToolError;

/// Registry of every operation the server exposes.
#[derive(Debug, Default)]
pub struct ContractRegistry {
    contracts: Vec<OperationContract>,
    index: HashMap<&'static str, usize>,
}

impl ContractRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the full catalogue for an engine with `limits`.
    pub fn standard(limits: &EngineLimits) -> Result<Self, ToolError> {
        let mut registry = Self::new();
        for contract in standard_catalogue(limits) {
            registry.register(contract)?;
        }
        Ok(registry)
    }

    /// Add a contract; names must be unique.
    pub fn register(&mut self, contract: OperationContract) -> Result<(), ToolError> {
        if self.index.contains_key(contract.name) {
            return Err(ToolError::duplicate_operation(contract.name));
        }
        debug!(operation = contract.name, "Registering operation contract");
        self.index.insert(contract.name, self.contracts.len());
        self.contracts.push(contract);
        Ok(())
    }

    /// Find the contract for `name`.
    pub fn lookup(&self, name: &str) -> Result<&OperationContract, ToolError> {
        self.index
            .get(name)
            .map(|&i| &self.contracts[i])
            .ok_or_else(|| ToolError::unknown_operation(name))
    }

    /// All contracts, in registration order.
    pub fn contracts(&self) -> &[OperationContract] {
        &self.contracts
    }

    /// All operation names, in registration order.
    pub fn names(&self) -> Vec<&'static str> {
        self.contracts.iter().map(|c| c.name).collect()
    }

    /// Tool metadata for every operation.
    pub fn tools(&self) -> Vec<Tool> {
        self.contracts.iter().map(OperationContract::to_tool).collect()
    }

    pub fn len(&self) -> usize {
        self.contracts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contracts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tools::contract::ResultKind;
    use crate::engine::Sample;

    fn noop(name: &'static str) -> OperationContract {
        OperationContract::new(name, "No-op.", ResultKind::Integer, |_, _| Ok(Sample::Int(0)))
    }

    #[test]
    fn test_register_and_lookup() {
        let mut registry = ContractRegistry::new();
        registry.register(noop("first")).unwrap();
        registry.register(noop("second")).unwrap();

        assert_eq!(registry.lookup("second").unwrap().name, "second");
        assert_eq!(registry.names(), vec!["first", "second"]);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_register_duplicate() {
        let mut registry = ContractRegistry::new();
        registry.register(noop("dice")).unwrap();
        let err = registry.register(noop("dice")).unwrap_err();
        assert!(matches!(err, ToolError::DuplicateOperation(name) if name == "dice"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_lookup_unknown() {
        let registry = ContractRegistry::new();
        assert!(matches!(
            registry.lookup("coin_flip"),
            Err(ToolError::UnknownOperation(name)) if name == "coin_flip"
        ));
    }

    #[test]
    fn test_standard_registry() {
        let registry = ContractRegistry::standard(&EngineLimits::default()).unwrap();
        assert_eq!(registry.len(), 23);
        assert!(registry.lookup("dice").is_ok());
        assert!(registry.lookup("student_t_variate").is_ok());
    }

    #[test]
    fn test_tools_carry_schemas() {
        let registry = ContractRegistry::standard(&EngineLimits::default()).unwrap();
        let tools = registry.tools();
        assert_eq!(tools.len(), registry.len());

        let dice = tools.iter().find(|t| t.name == "dice").unwrap();
        let sides = &dice.input_schema["properties"]["sides"];
        assert_eq!(sides["enum"], serde_json::json!([2, 4, 6, 8, 10, 12, 20, 30, 100]));
    }
}
