//! End-to-end tool calls through the public dispatcher and server API.

use std::sync::Arc;

use fortuna_mcp::core::{Config, McpServer};
use fortuna_mcp::domains::tools::{Dispatcher, FailureTarget, ToolError, ToolValue};
use fortuna_mcp::engine::ThreadRngEngine;
use serde_json::{Map, Value, json};

fn dispatcher() -> Dispatcher {
    Dispatcher::standard(Arc::new(ThreadRngEngine::new())).unwrap()
}

fn args(value: Value) -> Map<String, Value> {
    value.as_object().cloned().unwrap_or_default()
}

#[test]
fn test_listing_starts_with_info() {
    let names = dispatcher().registry().names();
    assert_eq!(names.len(), 23);
    assert_eq!(names[0], "fortuna_info");
    assert!(names.contains(&"student_t_variate"));
}

#[test]
fn test_dice_sum_is_within_faces() {
    let dispatcher = dispatcher();
    for _ in 0..100 {
        match dispatcher.invoke("dice", &args(json!({"rolls": 4, "sides": 20}))) {
            Ok(ToolValue::Integer(total)) => assert!((4..=80).contains(&total)),
            other => panic!("unexpected outcome: {:?}", other),
        }
    }
}

#[test]
fn test_random_range_respects_step() {
    let dispatcher = dispatcher();
    for _ in 0..100 {
        let value = dispatcher
            .invoke("random_range", &args(json!({"start": 10, "stop": -10, "step": -5})))
            .unwrap();
        match value {
            ToolValue::Integer(v) => assert!([10, 5, 0, -5].contains(&v)),
            other => panic!("expected integer, got {:?}", other),
        }
    }
}

#[test]
fn test_field_failure_names_the_parameter() {
    let err = dispatcher()
        .invoke("dice", &args(json!({"rolls": 101, "sides": 6})))
        .unwrap_err();
    match err {
        ToolError::Validation(failure) => {
            assert_eq!(failure.target, FailureTarget::Parameter("rolls".to_string()));
        }
        other => panic!("expected validation failure, got {:?}", other),
    }
}

#[test]
fn test_cross_failure_names_the_constraint() {
    let err = dispatcher()
        .invoke(
            "triangular",
            &args(json!({"lower_limit": 0.0, "upper_limit": 1.0, "mode": 2.0})),
        )
        .unwrap_err();
    match err {
        ToolError::Validation(failure) => {
            assert_eq!(failure.constraint_name(), Some("mode_within_limits"));
        }
        other => panic!("expected validation failure, got {:?}", other),
    }
}

#[test]
fn test_field_checks_run_before_cross_checks() {
    // `step` is missing, so the range rules are never evaluated.
    let err = dispatcher()
        .invoke("random_range", &args(json!({"start": 5, "stop": 1})))
        .unwrap_err();
    match err {
        ToolError::Validation(failure) => assert_eq!(failure.parameter_name(), Some("step")),
        other => panic!("expected validation failure, got {:?}", other),
    }
}

#[test]
fn test_unknown_operation_is_rejected() {
    assert!(matches!(
        dispatcher().invoke("coin_flip", &Map::new()),
        Err(ToolError::UnknownOperation(name)) if name == "coin_flip"
    ));
}

#[test]
fn test_server_wraps_results_for_clients() {
    let server = McpServer::new(Config::default()).unwrap();

    let ok = server
        .call_tool("bernoulli_variate", &args(json!({"ratio_of_truth": 1.0})))
        .unwrap();
    assert_eq!(ok["structuredContent"]["result"], true);

    let rejected = server
        .call_tool("geometric_variate", &args(json!({"probability": 0.0})))
        .unwrap();
    assert_eq!(rejected["isError"], true);
    assert_eq!(rejected["structuredContent"]["error"]["target"]["kind"], "parameter");
    assert_eq!(rejected["structuredContent"]["error"]["target"]["name"], "probability");
}

#[test]
fn test_info_reports_service_version() {
    let value = dispatcher().invoke("fortuna_info", &Map::new()).unwrap();
    match value {
        ToolValue::Text(text) => {
            assert!(text.contains(&format!("FortunaMCP v{}", env!("CARGO_PKG_VERSION"))));
        }
        other => panic!("expected text, got {:?}", other),
    }
}

#[test]
fn test_largest_accepted_inputs_return_finite_values() {
    let dispatcher = dispatcher();
    let cases = [
        ("beta_variate", json!({"alpha": f64::MAX, "beta": f64::MAX})),
        ("pareto_variate", json!({"alpha": 5e-324})),
        ("exponential_variate", json!({"lambda_rate": 5e-324})),
        ("gamma_variate", json!({"shape": f64::MAX, "scale": f64::MAX})),
        ("normal_variate", json!({"mean": f64::MAX, "std_dev": f64::MAX})),
        ("log_normal_variate", json!({"log_mean": f64::MAX, "log_deviation": f64::MAX})),
        ("extreme_value_variate", json!({"location": f64::MIN, "scale": f64::MAX})),
        ("chi_squared_variate", json!({"degrees_of_freedom": 5e-324})),
        ("cauchy_variate", json!({"location": 0.0, "scale": f64::MAX})),
        ("student_t_variate", json!({"degrees_of_freedom": 5e-324})),
    ];
    for (operation, arguments) in cases {
        for _ in 0..20 {
            match dispatcher.invoke(operation, &args(arguments.clone())) {
                Ok(ToolValue::Float(value)) => assert!(value.is_finite()),
                other => panic!("{}({}) gave {:?}", operation, arguments, other),
            }
        }
    }
}
