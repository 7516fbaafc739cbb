//! HTTP transport with endpoint failover.
//!
//! Only connection failures move on to the next endpoint. Once a server has
//! answered, its answer (success or error status) is final and the request
//! is not repeated anywhere else.

use esbench_core::config::ConnectionConfig;
use esbench_core::EngineError;
use reqwest::{Method, StatusCode, Url};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// A completed HTTP exchange.
#[derive(Debug)]
pub(crate) struct Reply {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

pub(crate) struct Transport {
    client: reqwest::Client,
    endpoints: Vec<Url>,
    /// Index of the endpoint that answered last.
    active: AtomicUsize,
    username: Option<String>,
    password: Option<String>,
    timeout: Duration,
}

impl Transport {
    pub fn new(config: &ConnectionConfig) -> Result<Self, EngineError> {
        if config.endpoints.is_empty() {
            return Err(EngineError::InvalidEndpoint {
                endpoint: String::new(),
                reason: "no endpoints configured".into(),
            });
        }

        let endpoints = config
            .endpoints
            .iter()
            .map(|raw| parse_endpoint(raw))
            .collect::<Result<Vec<_>, _>>()?;

        let timeout = Duration::from_secs(config.timeout_secs.max(1));
        let mut builder = reqwest::Client::builder().timeout(timeout);
        if !config.verify_tls {
            tracing::warn!("TLS certificate verification is disabled");
            builder = builder.danger_accept_invalid_certs(true);
        }
        let client = builder.build().map_err(|e| EngineError::InvalidEndpoint {
            endpoint: config.endpoints.join(","),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            endpoints,
            active: AtomicUsize::new(0),
            username: config.username.clone(),
            password: config.password.clone(),
            timeout,
        })
    }

    /// The endpoint that will be tried first on the next request.
    pub fn active_endpoint(&self) -> &Url {
        &self.endpoints[self.active.load(Ordering::Relaxed) % self.endpoints.len()]
    }

    /// Send one request. `path` is relative to the endpoint base, without a
    /// leading slash.
    pub async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<Reply, EngineError> {
        let total = self.endpoints.len();
        let start = self.active.load(Ordering::Relaxed) % total;
        let mut last_reason = String::new();

        for offset in 0..total {
            let idx = (start + offset) % total;
            let base = &self.endpoints[idx];
            let url = base.join(path).map_err(|e| EngineError::InvalidEndpoint {
                endpoint: base.to_string(),
                reason: e.to_string(),
            })?;

            let mut request = self.client.request(method.clone(), url);
            if let Some(user) = &self.username {
                request = request.basic_auth(user, self.password.as_deref());
            }
            if let Some(body) = body {
                request = request.json(body);
            }

            tracing::trace!(%method, endpoint = %base, path, "sending request");
            match request.send().await {
                Ok(response) => {
                    if idx != start {
                        tracing::warn!(endpoint = %base, "switched to fallback endpoint");
                        self.active.store(idx, Ordering::Relaxed);
                    }
                    let status = response.status();
                    let body = response.bytes().await.map_err(|e| self.read_error(e))?;
                    return Ok(Reply { status, body: body.to_vec() });
                }
                Err(e) if e.is_connect() => {
                    tracing::warn!(endpoint = %base, error = %e, "endpoint unreachable");
                    last_reason = e.to_string();
                }
                Err(e) if e.is_timeout() => return Err(EngineError::Timeout(self.timeout)),
                Err(e) => {
                    return Err(EngineError::Unreachable { attempted: offset + 1, reason: e.to_string() })
                }
            }
        }

        Err(EngineError::Unreachable { attempted: total, reason: last_reason })
    }

    fn read_error(&self, err: reqwest::Error) -> EngineError {
        if err.is_timeout() {
            EngineError::Timeout(self.timeout)
        } else {
            EngineError::MalformedResponse(format!("reading body: {err}"))
        }
    }
}

fn parse_endpoint(raw: &str) -> Result<Url, EngineError> {
    let invalid = |reason: String| EngineError::InvalidEndpoint { endpoint: raw.to_string(), reason };

    let mut url = Url::parse(raw.trim()).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme `{}`", url.scheme())));
    }
    if url.host_str().is_none() {
        return Err(invalid("missing host".into()));
    }
    // Paths are joined relative to the base, which needs a trailing slash.
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}
