//! Built-in function library registered into the global registry at startup.

use std::time::{SystemTime, UNIX_EPOCH};

use regex::Regex;
use rust_decimal::{
    Decimal, RoundingStrategy,
    prelude::{FromPrimitive, ToPrimitive},
};

use super::{FunctionRegistry, InvocationError, RegistrationError, Wrapper};
use crate::value::Value;

/// Registers every built-in function into `registry`.
pub fn register_all(registry: &mut FunctionRegistry) -> Result<(), RegistrationError> {
    registry.register("abs", Wrapper::unary(|_, v| abs(v)))?;
    registry.register("round", Wrapper::unary(|_, v| round(v, &Value::Integer(0))))?;
    registry.register("round", Wrapper::binary(|_, v, digits| round(v, digits)))?;
    registry.register("upper", Wrapper::unary(|_, v| map_str("upper", v, str::to_uppercase)))?;
    registry.register("lower", Wrapper::unary(|_, v| map_str("lower", v, str::to_lowercase)))?;
    registry.register("trim", Wrapper::unary(|_, v| map_str("trim", v, |s| s.trim().to_string())))?;
    registry.register("len", Wrapper::unary(|_, v| len(v)))?;
    registry.register("clamp", Wrapper::ternary(|_, v, lo, hi| clamp(v, lo, hi)))?;
    registry.register("regexp_match", Wrapper::binary(|_, s, p| regexp_match(s, p)))?;
    registry.register("concat", Wrapper::variadic(|_, args| Ok(concat(args))))?;
    registry.register("coalesce", Wrapper::variadic_min(1, |_, args| Ok(coalesce(args))))?;
    registry.register("sum", Wrapper::variadic(|_, args| sum(args)))?;
    registry.register("now", Wrapper::nullary(|_| now()))?;
    Ok(())
}

fn type_error(func: &str, expected: &str, got: &Value) -> InvocationError {
    InvocationError::Type(format!(
        "{}() requires {}, got {}",
        func,
        expected,
        got.type_name()
    ))
}

fn abs(v: &Value) -> Result<Value, InvocationError> {
    match v {
        Value::Integer(n) => n
            .checked_abs()
            .map(Value::Integer)
            .ok_or_else(|| InvocationError::Failed("abs() integer overflow".to_string())),
        Value::Float(n) => Ok(Value::Float(n.abs())),
        Value::Null => Ok(Value::Null),
        other => Err(type_error("abs", "number", other)),
    }
}

/// Decimal rounding with midpoints away from zero.
fn round(v: &Value, digits: &Value) -> Result<Value, InvocationError> {
    let digits = match digits {
        Value::Integer(d) if *d >= 0 => u32::try_from(*d).ok(),
        other => return Err(type_error("round", "non-negative integer digits", other)),
    };
    match v {
        Value::Integer(n) => Ok(Value::Integer(*n)),
        Value::Float(n) => {
            // More digits than a u32 holds means nothing to round away.
            let (Some(digits), Some(d)) = (digits, Decimal::from_f64(*n)) else {
                return Ok(Value::Float(*n));
            };
            let rounded = d.round_dp_with_strategy(digits, RoundingStrategy::MidpointAwayFromZero);
            Ok(rounded
                .to_f64()
                .map(Value::Float)
                .unwrap_or(Value::Float(*n)))
        }
        Value::Null => Ok(Value::Null),
        other => Err(type_error("round", "number", other)),
    }
}

fn map_str(func: &str, v: &Value, f: impl Fn(&str) -> String) -> Result<Value, InvocationError> {
    match v {
        Value::String(s) => Ok(Value::String(f(s))),
        Value::Null => Ok(Value::Null),
        other => Err(type_error(func, "string", other)),
    }
}

fn len(v: &Value) -> Result<Value, InvocationError> {
    match v {
        Value::String(s) => Ok(Value::Integer(s.chars().count() as i64)),
        Value::Array(arr) => Ok(Value::Integer(arr.len() as i64)),
        Value::Object(obj) => Ok(Value::Integer(obj.len() as i64)),
        other => Err(type_error("len", "string, array or object", other)),
    }
}

fn clamp(v: &Value, lo: &Value, hi: &Value) -> Result<Value, InvocationError> {
    match (v, lo, hi) {
        (Value::Integer(x), Value::Integer(l), Value::Integer(h)) => {
            if l > h {
                return Err(InvocationError::Failed(format!(
                    "clamp() lower bound {} exceeds upper bound {}",
                    l, h
                )));
            }
            Ok(Value::Integer((*x).clamp(*l, *h)))
        }
        _ => {
            let x = v.as_float().ok_or_else(|| type_error("clamp", "number", v))?;
            let l = lo.as_float().ok_or_else(|| type_error("clamp", "number", lo))?;
            let h = hi.as_float().ok_or_else(|| type_error("clamp", "number", hi))?;
            if l > h || l.is_nan() || h.is_nan() {
                return Err(InvocationError::Failed(format!(
                    "clamp() lower bound {} exceeds upper bound {}",
                    l, h
                )));
            }
            Ok(Value::Float(x.clamp(l, h)))
        }
    }
}

fn regexp_match(s: &Value, pattern: &Value) -> Result<Value, InvocationError> {
    let pattern = pattern
        .as_str()
        .ok_or_else(|| type_error("regexp_match", "string pattern", pattern))?;
    let re = Regex::new(pattern)
        .map_err(|e| InvocationError::Failed(format!("invalid regex: {e}")))?;
    match s {
        Value::String(s) => Ok(Value::Boolean(re.is_match(s))),
        _ => Ok(Value::Boolean(false)),
    }
}

fn concat(args: &[Value]) -> Value {
    Value::String(
        args.iter()
            .filter(|v| !v.is_null())
            .map(Value::to_text)
            .collect(),
    )
}

fn coalesce(args: &[Value]) -> Value {
    args.iter()
        .find(|v| !v.is_null())
        .cloned()
        .unwrap_or(Value::Null)
}

/// Integers sum exactly. Once a float appears the sum is kept twice: as a
/// decimal for exact results like `0.1 + 0.2`, and as a plain `f64` used when
/// some term has no faithful decimal form (too large, or too small in scale).
fn sum(args: &[Value]) -> Result<Value, InvocationError> {
    let mut sum_int: i64 = 0;
    let mut floats: Option<(f64, Option<Decimal>)> = None;

    for value in args {
        match value {
            Value::Null => {}
            Value::Integer(n) => match floats.as_mut() {
                Some((approx, exact)) => {
                    *approx += *n as f64;
                    *exact = exact.and_then(|acc| acc.checked_add(Decimal::from(*n)));
                }
                None => {
                    sum_int = sum_int.checked_add(*n).ok_or_else(|| {
                        InvocationError::Failed("sum() integer overflow".to_string())
                    })?;
                }
            },
            Value::Float(f) => {
                let (approx, exact) =
                    floats.get_or_insert_with(|| (sum_int as f64, Some(Decimal::from(sum_int))));
                *approx += *f;
                *exact = exact
                    .zip(exact_decimal(*f))
                    .and_then(|(acc, d)| acc.checked_add(d));
            }
            other => return Err(type_error("sum", "numeric values", other)),
        }
    }

    match floats {
        Some((approx, exact)) => {
            let exact = exact.and_then(|d| d.to_f64());
            Ok(Value::Float(exact.unwrap_or(approx)))
        }
        None => Ok(Value::Integer(sum_int)),
    }
}

/// Decimal form of `f`, only when it converts back to the same float.
fn exact_decimal(f: f64) -> Option<Decimal> {
    Decimal::from_f64(f).filter(|d| d.to_f64() == Some(f))
}

fn now() -> Result<Value, InvocationError> {
    let elapsed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| InvocationError::Failed(format!("system clock before epoch: {e}")))?;
    Ok(Value::Float(elapsed.as_secs_f64()))
}
