//! Decoding of engine response bodies.

use esbench_core::{ClusterInfo, EngineError, Replication, SearchResponse};
use serde::Deserialize;
use serde_json::Value;

// ---------------------------------------------------------------------------
// Error bodies
// ---------------------------------------------------------------------------

/// Turn a non-success reply into an [`EngineError`].
pub(crate) fn classify(status: u16, body: &[u8]) -> EngineError {
    if status == 401 || status == 403 {
        return EngineError::Unauthorized { status };
    }

    let parsed: Option<Value> = serde_json::from_slice(body).ok();
    let (kind, reason) = match parsed.as_ref().and_then(|v| v.get("error")) {
        Some(Value::Object(error)) => (
            error.get("type").and_then(Value::as_str).map(str::to_string),
            error
                .get("reason")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| "no reason given".into()),
        ),
        Some(Value::String(reason)) => (None, reason.clone()),
        _ => (None, String::from_utf8_lossy(body).trim().to_string()),
    };

    EngineError::Rejected { status, kind, reason }
}

// ---------------------------------------------------------------------------
// Success bodies
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct SearchBody {
    took: u64,
    #[serde(default)]
    hits: Option<Hits>,
}

#[derive(Deserialize)]
struct Hits {
    #[serde(default)]
    total: Option<Total>,
}

/// `hits.total` is an object on 7.x+ and a bare number before that.
#[derive(Deserialize)]
#[serde(untagged)]
enum Total {
    Count(u64),
    Object { value: u64 },
}

pub(crate) fn search(body: &[u8]) -> Result<SearchResponse, EngineError> {
    let raw: Value = serde_json::from_slice(body)
        .map_err(|e| EngineError::MalformedResponse(format!("search body is not JSON: {e}")))?;
    let parsed = SearchBody::deserialize(&raw)
        .map_err(|e| EngineError::MalformedResponse(format!("search body: {e}")))?;

    let hits = parsed.hits.and_then(|h| h.total).map(|total| match total {
        Total::Count(n) | Total::Object { value: n } => n,
    });

    Ok(SearchResponse { took_ms: parsed.took, hits, raw })
}

pub(crate) fn cluster_info(body: &[u8]) -> ClusterInfo {
    let Ok(raw) = serde_json::from_slice::<Value>(body) else {
        return ClusterInfo::default();
    };
    ClusterInfo {
        cluster_name: raw.get("cluster_name").and_then(Value::as_str).map(str::to_string),
        version: raw
            .pointer("/version/number")
            .and_then(Value::as_str)
            .map(str::to_string),
    }
}

/// Read shard and replica counts from a `GET /{index}/_settings` body.
///
/// The response is keyed by the concrete index name, which differs from the
/// requested name when that is an alias, so a lone entry is accepted too.
pub(crate) fn settings(index: &str, body: &[u8]) -> Result<Replication, EngineError> {
    let raw: Value = serde_json::from_slice(body)
        .map_err(|e| EngineError::MalformedResponse(format!("settings body is not JSON: {e}")))?;

    let entry = match raw.get(index) {
        Some(entry) => entry,
        None => match raw.as_object() {
            Some(map) if map.len() == 1 => map.values().next().unwrap_or(&Value::Null),
            _ => {
                return Err(EngineError::MalformedResponse(format!(
                    "settings response has no entry for `{index}`"
                )))
            }
        },
    };

    let settings = entry.pointer("/settings/index").ok_or_else(|| {
        EngineError::MalformedResponse("settings response has no `settings.index`".into())
    })?;

    Ok(Replication {
        shards: count(settings, "number_of_shards")?,
        replicas: count(settings, "number_of_replicas")?,
    })
}

/// Settings values are strings on the wire; tolerate numbers too.
fn count(settings: &Value, key: &str) -> Result<u32, EngineError> {
    let value = settings.get(key);
    value
        .and_then(|v| match v {
            Value::String(s) => s.parse().ok(),
            Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
            _ => None,
        })
        .ok_or_else(|| EngineError::MalformedResponse(format!("`{key}` missing or invalid: {value:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    fn bytes(v: Value) -> Vec<u8> {
        serde_json::to_vec(&v).unwrap()
    }

    #[rstest]
    #[case(json!({"took": 12, "hits": {"total": {"value": 1000, "relation": "eq"}}}), 12, Some(1000))]
    #[case(json!({"took": 3, "hits": {"total": 42}}), 3, Some(42))]
    #[case(json!({"took": 0, "hits": {"hits": []}}), 0, None)]
    #[case(json!({"took": 7}), 7, None)]
    fn search_bodies_decode(#[case] body: Value, #[case] took: u64, #[case] hits: Option<u64>) {
        let parsed = search(&bytes(body.clone())).unwrap();
        assert_eq!(parsed.took_ms, took);
        assert_eq!(parsed.hits, hits);
        assert_eq!(parsed.raw, body);
    }

    #[test]
    fn search_without_took_is_malformed() {
        let err = search(&bytes(json!({"hits": {}}))).unwrap_err();
        assert!(matches!(err, EngineError::MalformedResponse(_)));
    }

    #[test]
    fn structured_error_body_is_classified() {
        let body = bytes(json!({
            "error": {"type": "resource_already_exists_exception", "reason": "index [x/abc] already exists"},
            "status": 400
        }));
        let err = classify(400, &body);
        assert!(err.is_already_exists());
        assert_eq!(
            err,
            EngineError::Rejected {
                status: 400,
                kind: Some("resource_already_exists_exception".into()),
                reason: "index [x/abc] already exists".into(),
            }
        );
    }

    #[rstest]
    #[case(401)]
    #[case(403)]
    fn auth_failures_are_unauthorized(#[case] status: u16) {
        assert_eq!(classify(status, b""), EngineError::Unauthorized { status });
    }

    #[test]
    fn plain_text_error_keeps_body_as_reason() {
        let err = classify(502, b"Bad Gateway\n");
        assert_eq!(err, EngineError::Rejected { status: 502, kind: None, reason: "Bad Gateway".into() });
    }

    #[test]
    fn settings_strings_and_numbers() {
        let body = bytes(json!({
            "covid_data_index": {"settings": {"index": {"number_of_shards": "3", "number_of_replicas": 1}}}
        }));
        assert_eq!(settings("covid_data_index", &body).unwrap(), Replication { shards: 3, replicas: 1 });
    }

    #[test]
    fn settings_through_alias() {
        let body = bytes(json!({
            "covid-000001": {"settings": {"index": {"number_of_shards": "1", "number_of_replicas": "2"}}}
        }));
        assert_eq!(settings("covid", &body).unwrap(), Replication { shards: 1, replicas: 2 });
    }

    #[test]
    fn settings_without_counts_is_malformed() {
        let body = bytes(json!({"x": {"settings": {"index": {}}}}));
        assert!(matches!(settings("x", &body), Err(EngineError::MalformedResponse(_))));
    }

    #[test]
    fn cluster_info_tolerates_missing_fields() {
        let info = cluster_info(&bytes(json!({"cluster_name": "docker-cluster", "version": {"number": "8.11.1"}})));
        assert_eq!(info.cluster_name.as_deref(), Some("docker-cluster"));
        assert_eq!(info.version.as_deref(), Some("8.11.1"));
        assert_eq!(cluster_info(b"not json"), ClusterInfo::default());
    }
}
