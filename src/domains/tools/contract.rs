//! Operation contracts.
//!
//! A contract declares everything the dispatcher needs to know about one
//! operation: its parameters with their kinds and bounds, the cross-field
//! rules checked after the per-field ones, the engine method it forwards to
//! and how the engine's raw sample is turned into the tool result.

use std::fmt;
use std::sync::Arc;

use rmcp::model::{JsonObject, Tool};
use serde::Serialize;
use serde_json::{Value, json};

use crate::engine::{EngineError, EngineResult, RandomEngine, Sample};

use super::error::ValidationFailure;

// ============================================================================
// Parameters
// ============================================================================

/// Wire type of a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamKind {
    Integer,
    Float,
    Boolean,
    /// An integer restricted to a fixed set of values.
    Enum,
}

impl ParamKind {
    fn expected(self) -> &'static str {
        match self {
            Self::Integer | Self::Enum => "an integer",
            Self::Float => "a number",
            Self::Boolean => "a boolean",
        }
    }

    fn json_type(self) -> &'static str {
        match self {
            Self::Integer | Self::Enum => "integer",
            Self::Float => "number",
            Self::Boolean => "boolean",
        }
    }
}

/// A numeric bound. Integer parameters carry integer bounds so that the
/// full `i64` domain is compared exactly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    fn to_json(self) -> Value {
        match self {
            Self::Int(i) => json!(i),
            Self::Float(f) => json!(f),
        }
    }

    fn le(self, other: Number) -> bool {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => a <= b,
            (a, b) => a.as_f64() <= b.as_f64(),
        }
    }

    fn lt(self, other: Number) -> bool {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => a < b,
            (a, b) => a.as_f64() < b.as_f64(),
        }
    }

    fn as_f64(self) -> f64 {
        match self {
            Self::Int(i) => i as f64,
            Self::Float(f) => f,
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // JSON rendering keeps 1.7976931348623157e308 readable.
        write!(f, "{}", self.to_json())
    }
}

/// Single-field constraint on a parameter value.
#[derive(Debug, Clone, PartialEq)]
pub enum Constraint {
    /// `lo <= value <= hi`
    Closed { lo: Number, hi: Number },
    /// `lo < value <= hi`
    OpenLower { lo: Number, hi: Number },
    /// `value` is one of the listed integers.
    OneOf(&'static [i64]),
    Unconstrained,
}

impl Constraint {
    fn admits(&self, value: Number) -> bool {
        match self {
            Self::Closed { lo, hi } => lo.le(value) && value.le(*hi),
            Self::OpenLower { lo, hi } => lo.lt(value) && value.le(*hi),
            Self::OneOf(choices) => matches!(value, Number::Int(v) if choices.contains(&v)),
            Self::Unconstrained => true,
        }
    }

    fn describe_schema(&self, schema: &mut JsonObject) {
        match self {
            Self::Closed { lo, hi } => {
                schema.insert("minimum".into(), lo.to_json());
                schema.insert("maximum".into(), hi.to_json());
            }
            Self::OpenLower { lo, hi } => {
                schema.insert("exclusiveMinimum".into(), lo.to_json());
                schema.insert("maximum".into(), hi.to_json());
            }
            Self::OneOf(choices) => {
                schema.insert("enum".into(), json!(choices));
            }
            Self::Unconstrained => {}
        }
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Closed { lo, hi } => write!(f, "must be in [{}, {}]", lo, hi),
            Self::OpenLower { lo, hi } => write!(f, "must be in ({}, {}]", lo, hi),
            Self::OneOf(choices) => {
                let listed: Vec<String> = choices.iter().map(i64::to_string).collect();
                write!(f, "must be one of {{{}}}", listed.join(", "))
            }
            Self::Unconstrained => write!(f, "is unconstrained"),
        }
    }
}

/// One declared parameter of an operation.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub name: &'static str,
    pub kind: ParamKind,
    pub constraint: Constraint,
    pub description: &'static str,
}

impl Parameter {
    /// Check presence, type and the single-field constraint.
    pub fn validate(&self, raw: Option<&Value>) -> Result<Arg, ValidationFailure> {
        let raw = raw.ok_or_else(|| ValidationFailure::parameter(self.name, "is required"))?;

        let arg = match self.kind {
            ParamKind::Integer | ParamKind::Enum => raw.as_i64().map(Arg::Int),
            ParamKind::Float => raw.as_f64().map(Arg::Float),
            ParamKind::Boolean => raw.as_bool().map(Arg::Bool),
        }
        .ok_or_else(|| {
            ValidationFailure::parameter(
                self.name,
                format!("must be {}, got {}", self.kind.expected(), raw),
            )
        })?;

        if let Some(value) = arg.number() {
            if !self.constraint.admits(value) {
                return Err(ValidationFailure::parameter(
                    self.name,
                    format!("{}, got {}", self.constraint, value),
                ));
            }
        }
        Ok(arg)
    }

    fn schema(&self) -> Value {
        let mut schema = JsonObject::new();
        schema.insert("type".into(), json!(self.kind.json_type()));
        schema.insert("description".into(), json!(self.description));
        self.constraint.describe_schema(&mut schema);
        Value::Object(schema)
    }
}

// ============================================================================
// Validated arguments
// ============================================================================

/// A validated argument value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Arg {
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl Arg {
    fn number(self) -> Option<Number> {
        match self {
            Self::Int(i) => Some(Number::Int(i)),
            Self::Float(f) => Some(Number::Float(f)),
            Self::Bool(_) => None,
        }
    }
}

/// Arguments that passed every per-field check, in declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Arguments {
    values: Vec<(&'static str, Arg)>,
}

impl Arguments {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: &'static str, arg: Arg) {
        self.values.push((name, arg));
    }

    pub fn get(&self, name: &str) -> Option<Arg> {
        self.values
            .iter()
            .find(|(declared, _)| *declared == name)
            .map(|(_, arg)| *arg)
    }

    /// Integer argument `name`.
    pub fn int(&self, name: &'static str) -> EngineResult<i64> {
        match self.get(name) {
            Some(Arg::Int(i)) => Ok(i),
            _ => Err(EngineError::MissingArgument(name)),
        }
    }

    /// Float argument `name`.
    pub fn float(&self, name: &'static str) -> EngineResult<f64> {
        match self.get(name) {
            Some(Arg::Float(f)) => Ok(f),
            Some(Arg::Int(i)) => Ok(i as f64),
            _ => Err(EngineError::MissingArgument(name)),
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

// ============================================================================
// Cross-field constraints and engine binding
// ============================================================================

/// A predicate over several validated parameters.
#[derive(Debug, Clone)]
pub struct CrossConstraint {
    pub name: &'static str,
    /// Human-readable rule, reported on violation.
    pub rule: &'static str,
    pub holds: fn(&Arguments) -> EngineResult<bool>,
}

/// Forwards validated arguments to an engine method, in the engine's order.
pub type EngineBinding = fn(&dyn RandomEngine, &Arguments) -> EngineResult<Sample>;

/// Type of the value handed back to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultKind {
    Integer,
    Float,
    Boolean,
    Text,
}

impl ResultKind {
    /// Coerce a raw engine sample into this result kind.
    pub fn coerce(self, sample: Sample) -> EngineResult<ToolValue> {
        match (self, sample) {
            (Self::Integer, Sample::Int(i)) => Ok(ToolValue::Integer(i)),
            (Self::Boolean, Sample::Int(0)) => Ok(ToolValue::Boolean(false)),
            (Self::Boolean, Sample::Int(1)) => Ok(ToolValue::Boolean(true)),
            (Self::Float, Sample::Float(f)) if f.is_finite() => Ok(ToolValue::Float(f)),
            (Self::Float, Sample::Float(f)) => Err(EngineError::NonFinite(f)),
            (Self::Text, Sample::Text(s)) => Ok(ToolValue::Text(s)),
            (Self::Boolean, Sample::Int(i)) => Err(EngineError::unexpected("0 or 1", i.to_string())),
            (kind, other) => Err(EngineError::unexpected(kind.name(), other.kind())),
        }
    }

    fn name(self) -> &'static str {
        match self {
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Boolean => "boolean",
            Self::Text => "text",
        }
    }
}

/// The scalar returned by a tool call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ToolValue {
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Text(String),
}

impl ToolValue {
    /// Text shown to clients: raw for strings, JSON for scalars.
    pub fn to_text(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::Integer(i) => i.to_string(),
            Self::Boolean(b) => b.to_string(),
            Self::Float(f) => json!(f).to_string(),
        }
    }
}

// ============================================================================
// Operation contract
// ============================================================================

/// The full declaration of one operation.
#[derive(Debug, Clone)]
pub struct OperationContract {
    pub name: &'static str,
    pub description: &'static str,
    pub parameters: Vec<Parameter>,
    pub cross_constraints: Vec<CrossConstraint>,
    pub binding: EngineBinding,
    pub result_kind: ResultKind,
}

impl OperationContract {
    pub fn new(
        name: &'static str,
        description: &'static str,
        result_kind: ResultKind,
        binding: EngineBinding,
    ) -> Self {
        Self {
            name,
            description,
            parameters: Vec::new(),
            cross_constraints: Vec::new(),
            binding,
            result_kind,
        }
    }

    /// Append a parameter.
    pub fn param(mut self, parameter: Parameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Append a cross-field constraint.
    pub fn cross(
        mut self,
        name: &'static str,
        rule: &'static str,
        holds: fn(&Arguments) -> EngineResult<bool>,
    ) -> Self {
        self.cross_constraints
            .push(CrossConstraint { name, rule, holds });
        self
    }

    /// JSON schema for the tool's input object.
    pub fn input_schema(&self) -> JsonObject {
        let properties: JsonObject = self
            .parameters
            .iter()
            .map(|p| (p.name.to_string(), p.schema()))
            .collect();
        let required: Vec<&str> = self.parameters.iter().map(|p| p.name).collect();

        let mut schema = JsonObject::new();
        schema.insert("type".into(), json!("object"));
        schema.insert("properties".into(), Value::Object(properties));
        schema.insert("required".into(), json!(required));
        schema
    }

    /// Description including the cross-field rules.
    pub fn full_description(&self) -> String {
        if self.cross_constraints.is_empty() {
            return self.description.to_string();
        }
        let rules: Vec<&str> = self.cross_constraints.iter().map(|c| c.rule).collect();
        format!("{} Requires: {}.", self.description, rules.join("; "))
    }

    /// Create a Tool model for this operation (metadata).
    pub fn to_tool(&self) -> Tool {
        Tool {
            name: self.name.into(),
            description: Some(self.full_description().into()),
            input_schema: Arc::new(self.input_schema()),
            annotations: None,
            output_schema: None,
            icons: None,
            meta: None,
            title: None,
        }
    }
}
