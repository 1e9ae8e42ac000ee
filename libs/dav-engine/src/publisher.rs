use std::sync::Arc;

use serde::Serialize;

use dav_api::{Config, DomainRecord, Registrar, RegistrarError, TopicId};

use crate::error::{CoordinatorError, Operation};

/// Registers records and filters with the network registrar.
#[derive(Clone)]
pub struct Publisher {
    registrar: Arc<dyn Registrar>,
    config: Arc<Config>,
    seed_url: String,
}

impl Publisher {
    pub fn new(
        registrar: Arc<dyn Registrar>,
        config: Arc<Config>,
    ) -> Result<Self, CoordinatorError> {
        let seed_url = config.api_seed_url()?.to_string();
        Ok(Self { registrar, config, seed_url })
    }

    /// `<seed>/<operation>/:<topic>`
    pub fn endpoint(&self, operation: Operation, topic: &TopicId) -> String {
        format!("{}/{}/:{}", self.seed_url, operation.as_str(), topic)
    }

    /// Post the params and build the record on success. The registrar's
    /// response body is ignored.
    pub async fn publish<R: DomainRecord>(
        &self,
        operation: Operation,
        topic: TopicId,
        params: R::Params,
    ) -> Result<R, CoordinatorError> {
        self.register_filter(operation, &topic, &params).await?;
        Ok(R::new(topic, params, self.config.clone()))
    }

    /// Post an arbitrary body (e.g. a need filter) without building a record.
    pub async fn register_filter<B: Serialize + ?Sized>(
        &self,
        operation: Operation,
        topic: &TopicId,
        body: &B,
    ) -> Result<(), CoordinatorError> {
        let body = serde_json::to_value(body).map_err(|e| CoordinatorError::Registration {
            operation,
            source: RegistrarError::from(e),
        })?;
        let url = self.endpoint(operation, topic);
        tracing::debug!(%operation, topic = %topic, %url, "posting to registrar");
        self.registrar.post(&url, body).await.map_err(|source| {
            tracing::warn!(%operation, topic = %topic, error = %source, "registration failed");
            CoordinatorError::Registration { operation, source }
        })
    }
}
