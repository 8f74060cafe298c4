use std::collections::HashMap;

use udf_registry::{
    ExecutionContext, FunctionRegistry, InvocationError, Session, Value, udf::builtins,
};

fn session() -> Session {
    let mut registry = FunctionRegistry::new();
    builtins::register_all(&mut registry).unwrap();
    Session::with_registry(ExecutionContext::new("builtins-tests"), registry)
}

fn call(name: &str, args: &[Value]) -> Value {
    session().call(name, args).unwrap()
}

#[test]
fn test_builtins_register_without_conflicts() {
    let mut registry = FunctionRegistry::new();
    builtins::register_all(&mut registry).unwrap();
    assert!(registry.contains("sum"));
    assert!(registry.contains("ROUND"));
    assert!(builtins::register_all(&mut registry).is_err());
}

#[test]
fn test_abs() {
    assert_eq!(call("abs", &[Value::Integer(-4)]), Value::Integer(4));
    assert_eq!(call("abs", &[Value::Float(-1.5)]), Value::Float(1.5));
    assert_eq!(call("abs", &[Value::Null]), Value::Null);
}

#[test]
fn test_round_overloads() {
    assert_eq!(call("round", &[Value::Float(2.5)]), Value::Float(3.0));
    assert_eq!(call("round", &[Value::Float(-2.5)]), Value::Float(-3.0));
    assert_eq!(
        call("round", &[Value::Float(1.2345), Value::Integer(2)]),
        Value::Float(1.23)
    );
    assert_eq!(call("round", &[Value::Integer(7)]), Value::Integer(7));
}

#[test]
fn test_string_functions() {
    assert_eq!(call("upper", &[Value::from("abc")]), Value::from("ABC"));
    assert_eq!(call("lower", &[Value::from("AbC")]), Value::from("abc"));
    assert_eq!(call("trim", &[Value::from("  x ")]), Value::from("x"));
    assert_eq!(
        call("concat", &[Value::from("a"), Value::Integer(1), Value::Null, Value::Boolean(true)]),
        Value::from("a1true")
    );
    assert_eq!(call("concat", &[]), Value::from(""));
}

#[test]
fn test_len() {
    assert_eq!(call("len", &[Value::from("héllo")]), Value::Integer(5));
    assert_eq!(
        call("len", &[Value::Array(vec![Value::Null, Value::Null])]),
        Value::Integer(2)
    );
    let mut obj = HashMap::new();
    obj.insert("k".to_string(), Value::Null);
    assert_eq!(call("len", &[Value::Object(obj)]), Value::Integer(1));
}

#[test]
fn test_clamp() {
    let args = |x| [Value::Integer(x), Value::Integer(0), Value::Integer(10)];
    assert_eq!(call("clamp", &args(-5)), Value::Integer(0));
    assert_eq!(call("clamp", &args(5)), Value::Integer(5));
    assert_eq!(call("clamp", &args(50)), Value::Integer(10));
    assert_eq!(
        call("clamp", &[Value::Float(1.5), Value::Integer(0), Value::Integer(1)]),
        Value::Float(1.0)
    );

    let err = session()
        .call("clamp", &[Value::Integer(1), Value::Integer(5), Value::Integer(0)])
        .unwrap_err();
    assert!(err.to_string().contains("lower bound"));
}

#[test]
fn test_regexp_match() {
    assert_eq!(
        call("regexp_match", &[Value::from("order-123"), Value::from(r"^order-\d+$")]),
        Value::Boolean(true)
    );
    assert_eq!(
        call("regexp_match", &[Value::Integer(1), Value::from("1")]),
        Value::Boolean(false)
    );
    let err = session()
        .call("regexp_match", &[Value::from("x"), Value::from("(")])
        .unwrap_err();
    assert!(err.to_string().contains("invalid regex"));
}

#[test]
fn test_coalesce_requires_one_argument() {
    assert_eq!(
        call("coalesce", &[Value::Null, Value::Integer(2), Value::Integer(3)]),
        Value::Integer(2)
    );
    assert_eq!(call("coalesce", &[Value::Null]), Value::Null);
    let err = session().call("coalesce", &[]).unwrap_err();
    assert_eq!(err.to_string(), "function `coalesce` does not accept 0 arguments");
}

#[test]
fn test_sum_keeps_integers_and_promotes_floats() {
    let ints = [Value::Integer(1), Value::Integer(2), Value::Integer(3)];
    assert_eq!(call("sum", &ints), Value::Integer(6));
    assert_eq!(call("sum", &[]), Value::Integer(0));
    assert_eq!(
        call("sum", &[Value::Float(0.1), Value::Float(0.2)]),
        Value::Float(0.3)
    );
    assert_eq!(
        call("sum", &[Value::Integer(1), Value::Float(0.5), Value::Integer(2)]),
        Value::Float(3.5)
    );
}

#[test]
fn test_sum_rejects_non_numeric() {
    let err = session()
        .call("sum", &[Value::Integer(1), Value::from("two")])
        .unwrap_err();
    match err {
        udf_registry::CallError::Invocation { name, source } => {
            assert_eq!(name, "sum");
            assert!(matches!(source, InvocationError::Type(_)));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_now_is_nullary() {
    match call("now", &[]) {
        Value::Float(secs) => assert!(secs > 0.0),
        other => panic!("expected float, got {other:?}"),
    }
    assert!(session().call("now", &[Value::Null]).is_err());
}

#[test]
fn test_sum_handles_floats_outside_decimal_range() {
    assert_eq!(call("sum", &[Value::Float(1e30)]), Value::Float(1e30));
    assert_eq!(
        call("sum", &[Value::Integer(1), Value::Float(-1e30)]),
        Value::Float(1.0 - 1e30)
    );
    assert_eq!(call("sum", &[Value::Float(1e-30)]), Value::Float(1e-30));
    assert_eq!(
        call("sum", &[Value::Float(0.1), Value::Float(1e-30)]),
        Value::Float(0.1 + 1e-30)
    );
}

#[test]
fn test_round_with_huge_digit_count_leaves_value_alone() {
    let digits = Value::Integer((1_i64 << 32) + 1);
    assert_eq!(
        call("round", &[Value::Float(1.23456), digits]),
        Value::Float(1.23456)
    );
    assert_eq!(
        call("round", &[Value::Float(1.23456), Value::Integer(40)]),
        Value::Float(1.23456)
    );
}
