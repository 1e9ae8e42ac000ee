use std::sync::Arc;

use dav_api::{Config, MessageLog, TopicId, TopicSpec};

use crate::error::CoordinatorError;

/// Turns a `TopicSpec` into a topic that is ready for publish or subscribe.
#[derive(Clone)]
pub struct TopicResolver {
    log: Arc<dyn MessageLog>,
    config: Arc<Config>,
}

impl TopicResolver {
    pub fn new(log: Arc<dyn MessageLog>, config: Arc<Config>) -> Self {
        Self { log, config }
    }

    /// Explicit topics pass through without touching the log. Generated
    /// topics are minted and created before this returns.
    pub async fn resolve(&self, spec: TopicSpec) -> Result<TopicId, CoordinatorError> {
        match spec {
            TopicSpec::Explicit(topic) => {
                tracing::debug!(topic = %topic, "using caller-supplied topic");
                Ok(topic)
            }
            TopicSpec::Generated(kind) => {
                let topic = self.log.generate_topic_id(kind);
                tracing::debug!(topic = %topic, %kind, "creating topic");
                if let Err(e) = self.log.create_topic(&topic, &self.config).await {
                    tracing::warn!(topic = %topic, %kind, error = %e, "topic creation failed");
                    return Err(CoordinatorError::TopicProvisioning(e));
                }
                tracing::info!(topic = %topic, %kind, "topic provisioned");
                Ok(topic)
            }
        }
    }
}
