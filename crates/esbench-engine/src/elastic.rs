//! [`SearchEngine`] over the Elasticsearch REST API.

use crate::response;
use crate::transport::{Reply, Transport};
use esbench_core::config::ConnectionConfig;
use esbench_core::{ClusterInfo, EngineError, IndexConfig, Replication, SearchEngine, SearchResponse};
use reqwest::{Method, StatusCode};
use serde_json::{json, Map, Value};

/// A connection handle to one cluster.
///
/// Building the handle does not touch the network; the first call does.
pub struct HttpEngine {
    transport: Transport,
}

impl HttpEngine {
    pub fn connect(config: &ConnectionConfig) -> Result<Self, EngineError> {
        let transport = Transport::new(config)?;
        tracing::debug!(endpoint = %transport.active_endpoint(), "engine handle ready");
        Ok(Self { transport })
    }

    /// Base URL requests currently go to.
    pub fn endpoint(&self) -> String {
        self.transport.active_endpoint().to_string()
    }
}

/// Request body for `PUT /{index}`.
pub fn create_index_body(config: &IndexConfig) -> Value {
    let properties: Map<String, Value> = config
        .fields
        .iter()
        .map(|f| (f.name.clone(), json!({ "type": f.field_type.as_str() })))
        .collect();

    json!({
        "settings": {
            "number_of_shards": config.replication.shards,
            "number_of_replicas": config.replication.replicas,
        },
        "mappings": { "properties": properties },
    })
}

fn success(reply: Reply) -> Result<Vec<u8>, EngineError> {
    if reply.status.is_success() {
        Ok(reply.body)
    } else {
        Err(response::classify(reply.status.as_u16(), &reply.body))
    }
}

impl SearchEngine for HttpEngine {
    async fn ping(&self) -> Result<ClusterInfo, EngineError> {
        let body = success(self.transport.send(Method::GET, "", None).await?)?;
        let info = response::cluster_info(&body);
        tracing::info!(
            endpoint = %self.transport.active_endpoint(),
            cluster = info.cluster_name.as_deref().unwrap_or("?"),
            version = info.version.as_deref().unwrap_or("?"),
            "connected"
        );
        Ok(info)
    }

    async fn index_exists(&self, index: &str) -> Result<bool, EngineError> {
        let reply = self.transport.send(Method::HEAD, index, None).await?;
        match reply.status {
            StatusCode::NOT_FOUND => Ok(false),
            status if status.is_success() => Ok(true),
            _ => Err(response::classify(reply.status.as_u16(), &reply.body)),
        }
    }

    async fn create_index(&self, config: &IndexConfig) -> Result<(), EngineError> {
        let body = create_index_body(config);
        tracing::debug!(index = %config.name, body = %body, "creating index");
        success(self.transport.send(Method::PUT, &config.name, Some(&body)).await?)?;
        Ok(())
    }

    async fn search(&self, index: &str, body: &Value) -> Result<SearchResponse, EngineError> {
        let path = format!("{index}/_search");
        let reply = success(self.transport.send(Method::POST, &path, Some(body)).await?)?;
        response::search(&reply)
    }

    async fn index_settings(&self, index: &str) -> Result<Replication, EngineError> {
        let path = format!("{index}/_settings");
        let reply = success(self.transport.send(Method::GET, &path, None).await?)?;
        response::settings(index, &reply)
    }
}
