//! Predicate ⇄ query document.
//!
//! [`compile`] turns a [`Predicate`] into the engine's JSON query DSL;
//! [`parse`] maps a query document back onto a predicate tree. For every
//! predicate `p`, `parse(&compile(&p)) == Ok(p)`.
//!
//! | Predicate | Document |
//! |-----------|----------|
//! | `MatchAll` | `{"match_all":{}}` |
//! | `Equality` | `{"term":{F:v}}` |
//! | `Range` | `{"range":{F:{"gte"/"gt":lo,"lte"/"lt":hi}}}` |
//! | `And` | `{"bool":{"must":[…]}}` |
//! | `Or` | `{"bool":{"should":[…],"minimum_should_match":1}}` |

use crate::error::QueryParseError;
use crate::predicate::{Bound, Predicate, Scalar};
use serde_json::{json, Map, Value};

/// Compile a predicate into a query clause.
pub fn compile(predicate: &Predicate) -> Value {
    match predicate {
        Predicate::MatchAll => json!({ "match_all": {} }),
        Predicate::Equality { field, value } => {
            single("term", single(field, scalar_to_json(value)))
        }
        Predicate::Range { field, lower, upper } => {
            let mut bounds = Map::new();
            if let Some(lo) = lower {
                let op = if lo.inclusive { "gte" } else { "gt" };
                bounds.insert(op.to_string(), scalar_to_json(&lo.value));
            }
            if let Some(hi) = upper {
                let op = if hi.inclusive { "lte" } else { "lt" };
                bounds.insert(op.to_string(), scalar_to_json(&hi.value));
            }
            single("range", single(field, Value::Object(bounds)))
        }
        Predicate::And(clauses) => json!({
            "bool": { "must": clauses.iter().map(compile).collect::<Vec<_>>() }
        }),
        Predicate::Or(clauses) => json!({
            "bool": {
                "should": clauses.iter().map(compile).collect::<Vec<_>>(),
                "minimum_should_match": 1
            }
        }),
    }
}

/// Full search request body for a predicate.
pub fn request_body(predicate: &Predicate) -> Value {
    json!({ "query": compile(predicate) })
}

/// Parse a query clause back into a predicate.
///
/// Besides the forms [`compile`] emits, accepts the long `term` form
/// (`{"term":{F:{"value":v}}}`), single-field `match` on a scalar, and
/// `bool.filter` as a conjunction.
pub fn parse(clause: &Value) -> Result<Predicate, QueryParseError> {
    parse_at(clause, "query")
}

/// Parse a full request body (`{"query": …}`).
pub fn parse_request(body: &Value) -> Result<Predicate, QueryParseError> {
    let (key, clause) = only_entry(body, "$")?;
    if key != "query" {
        return Err(QueryParseError::UnsupportedClause { path: "$".into(), clause: key.into() });
    }
    parse(clause)
}

fn parse_at(clause: &Value, path: &str) -> Result<Predicate, QueryParseError> {
    let (kind, body) = only_entry(clause, path)?;
    let here = format!("{path}.{kind}");

    match kind {
        "match_all" => Ok(Predicate::MatchAll),
        "term" => {
            let (field, value) = only_entry(body, &here)?;
            let value = unwrap_long_form(value, "value");
            Ok(Predicate::Equality {
                field: field.to_string(),
                value: json_to_scalar(value, &format!("{here}.{field}"))?,
            })
        }
        "match" => {
            let (field, value) = only_entry(body, &here)?;
            let value = unwrap_long_form(value, "query");
            Ok(Predicate::Equality {
                field: field.to_string(),
                value: json_to_scalar(value, &format!("{here}.{field}"))?,
            })
        }
        "range" => {
            let (field, bounds) = only_entry(body, &here)?;
            parse_range(field, bounds, &format!("{here}.{field}"))
        }
        "bool" => parse_bool(body, &here),
        other => Err(QueryParseError::UnsupportedClause { path: path.to_string(), clause: other.into() }),
    }
}

fn parse_range(field: &str, bounds: &Value, path: &str) -> Result<Predicate, QueryParseError> {
    let bounds = bounds
        .as_object()
        .ok_or_else(|| QueryParseError::NotAnObject { path: path.to_string() })?;

    let mut lower = None;
    let mut upper = None;
    for (op, value) in bounds {
        let scalar = json_to_scalar(value, &format!("{path}.{op}"))?;
        match op.as_str() {
            "gte" => lower = Some(Bound::inclusive(scalar)),
            "gt" => lower = Some(Bound::exclusive(scalar)),
            "lte" => upper = Some(Bound::inclusive(scalar)),
            "lt" => upper = Some(Bound::exclusive(scalar)),
            other => {
                return Err(QueryParseError::UnsupportedClause {
                    path: path.to_string(),
                    clause: other.to_string(),
                })
            }
        }
    }

    Ok(Predicate::Range { field: field.to_string(), lower, upper })
}

fn parse_bool(body: &Value, path: &str) -> Result<Predicate, QueryParseError> {
    let body = body
        .as_object()
        .ok_or_else(|| QueryParseError::NotAnObject { path: path.to_string() })?;

    let conjunctive: Vec<&str> = ["must", "filter"]
        .into_iter()
        .filter(|k| body.contains_key(*k))
        .collect();
    let has_should = body.contains_key("should");

    for key in body.keys() {
        if !matches!(key.as_str(), "must" | "filter" | "should" | "minimum_should_match") {
            return Err(QueryParseError::UnsupportedClause { path: path.to_string(), clause: key.clone() });
        }
    }

    match (conjunctive.as_slice(), has_should) {
        ([key], false) => Ok(Predicate::And(parse_clauses(&body[*key], &format!("{path}.{key}"))?)),
        ([], true) => {
            // Without must/filter siblings the engine already requires one
            // should clause to match; anything other than 1 is not an OR.
            match body.get("minimum_should_match") {
                None => {}
                Some(v) if v.as_u64() == Some(1) || v.as_str() == Some("1") => {}
                Some(v) => {
                    return Err(QueryParseError::UnsupportedValue {
                        path: format!("{path}.minimum_should_match"),
                        value: v.to_string(),
                    })
                }
            }
            Ok(Predicate::Or(parse_clauses(&body["should"], &format!("{path}.should"))?))
        }
        _ => Err(QueryParseError::UnsupportedClause {
            path: path.to_string(),
            clause: body.keys().cloned().collect::<Vec<_>>().join("+"),
        }),
    }
}

fn parse_clauses(value: &Value, path: &str) -> Result<Vec<Predicate>, QueryParseError> {
    match value {
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(i, item)| parse_at(item, &format!("{path}[{i}]")))
            .collect(),
        // The DSL allows a lone clause in place of a one-element array.
        Value::Object(_) => Ok(vec![parse_at(value, path)?]),
        other => Err(QueryParseError::UnsupportedValue { path: path.to_string(), value: other.to_string() }),
    }
}

fn only_entry<'a>(value: &'a Value, path: &str) -> Result<(&'a str, &'a Value), QueryParseError> {
    let map = value
        .as_object()
        .ok_or_else(|| QueryParseError::NotAnObject { path: path.to_string() })?;
    let mut entries = map.iter();
    match (entries.next(), entries.next()) {
        (Some((k, v)), None) => Ok((k.as_str(), v)),
        _ => Err(QueryParseError::ClauseCount { path: path.to_string(), found: map.len() }),
    }
}

fn unwrap_long_form<'a>(value: &'a Value, key: &str) -> &'a Value {
    value.get(key).unwrap_or(value)
}

fn single(key: &str, value: Value) -> Value {
    let mut map = Map::new();
    map.insert(key.to_string(), value);
    Value::Object(map)
}

fn scalar_to_json(scalar: &Scalar) -> Value {
    match scalar {
        Scalar::Integer(v) => json!(v),
        Scalar::Float(v) => json!(v),
        Scalar::Boolean(v) => json!(v),
        Scalar::Text(v) => json!(v),
    }
}

fn json_to_scalar(value: &Value, path: &str) -> Result<Scalar, QueryParseError> {
    let unsupported = || QueryParseError::UnsupportedValue { path: path.to_string(), value: value.to_string() };
    match value {
        Value::Number(n) if n.is_i64() => n.as_i64().map(Scalar::Integer).ok_or_else(unsupported),
        Value::Number(n) if n.is_f64() => n.as_f64().map(Scalar::Float).ok_or_else(unsupported),
        Value::Bool(b) => Ok(Scalar::Boolean(*b)),
        Value::String(s) => Ok(Scalar::Text(s.clone())),
        _ => Err(unsupported()),
    }
}
