//! Index Schema Provisioner.
//!
//! [`ensure_index`] makes sure the target index exists. It creates it at most
//! once and never touches an index that is already there, whatever its
//! layout.

use crate::engine::SearchEngine;
use crate::error::{BenchError, EngineError};
use crate::types::IndexConfig;

/// What [`ensure_index`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provisioned {
    Created,
    AlreadyPresent,
}

/// Create `config.name` with the declared layout and mappings unless it
/// already exists.
///
/// A transport failure or refused credentials on either request is a
/// [`BenchError::Connection`]; any other creation failure except "already
/// exists" is a [`BenchError::Provisioning`]. Nothing is retried.
pub async fn ensure_index<E: SearchEngine>(
    engine: &E,
    config: &IndexConfig,
) -> Result<Provisioned, BenchError> {
    let exists = engine
        .index_exists(&config.name)
        .await
        .map_err(|source| provisioning_error(config, source))?;

    if exists {
        tracing::info!(index = %config.name, "index already present, leaving it untouched");
        return Ok(Provisioned::AlreadyPresent);
    }

    match engine.create_index(config).await {
        Ok(()) => {
            tracing::info!(
                index = %config.name,
                shards = config.replication.shards,
                replicas = config.replication.replicas,
                fields = config.fields.len(),
                "index created"
            );
            Ok(Provisioned::Created)
        }
        // Someone else created it between the check and the create.
        Err(err) if err.is_already_exists() => {
            tracing::info!(index = %config.name, "index appeared concurrently, leaving it untouched");
            Ok(Provisioned::AlreadyPresent)
        }
        Err(source) => {
            tracing::error!(index = %config.name, error = %source, "index creation failed");
            Err(provisioning_error(config, source))
        }
    }
}

fn provisioning_error(config: &IndexConfig, source: EngineError) -> BenchError {
    if source.is_connection_failure() {
        BenchError::Connection(source)
    } else {
        BenchError::Provisioning { index: config.name.clone(), source }
    }
}
