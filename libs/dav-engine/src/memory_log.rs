use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;

use tokio::sync::{RwLock, mpsc};

use dav_api::{Config, LogError, MessageLog, RawSubscription, RecordKind, TopicId};

type Item = Result<serde_json::Value, LogError>;

/// In-process message log: every topic fans out to a list of mpsc
/// subscribers. Nothing is persisted; late subscribers see only new items.
#[derive(Debug, Default)]
pub struct MemoryLog {
    topics: RwLock<HashMap<TopicId, Vec<mpsc::Sender<Item>>>>,
}

impl MemoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// All created topics, sorted.
    pub async fn topics(&self) -> Vec<TopicId> {
        let mut names: Vec<TopicId> = self.topics.read().await.keys().cloned().collect();
        names.sort();
        names
    }

    /// Live subscribers on `topic`.
    pub async fn subscriber_count(&self, topic: &TopicId) -> usize {
        self.topics
            .read()
            .await
            .get(topic)
            .map(|subs| subs.iter().filter(|tx| !tx.is_closed()).count())
            .unwrap_or(0)
    }

    /// Remove `topic`; its subscriptions complete after draining.
    pub async fn close_topic(&self, topic: &TopicId) {
        if self.topics.write().await.remove(topic).is_some() {
            tracing::info!(topic = %topic, "topic closed");
        }
    }

    /// Remove `topic`, ending every subscription with `error`.
    pub async fn fail_topic(&self, topic: &TopicId, error: LogError) {
        let subs = self.topics.write().await.remove(topic).unwrap_or_default();
        tracing::warn!(topic = %topic, error = %error, subscribers = subs.len(), "failing topic");
        for tx in subs {
            let _ = tx.send(Err(error.clone())).await;
        }
    }

    /// Snapshot of open senders, pruning closed ones.
    async fn live_senders(&self, topic: &TopicId) -> Result<Vec<mpsc::Sender<Item>>, LogError> {
        let mut topics = self.topics.write().await;
        let subs = topics
            .get_mut(topic)
            .ok_or_else(|| LogError::not_found(format!("topic '{topic}' not found")))?;
        subs.retain(|tx| !tx.is_closed());
        Ok(subs.clone())
    }
}

impl MessageLog for MemoryLog {
    fn generate_topic_id(&self, kind: RecordKind) -> TopicId {
        TopicId::new(format!("{kind}-{}", uuid::Uuid::new_v4()))
    }

    fn create_topic(
        &self,
        topic: &TopicId,
        _config: &Config,
    ) -> Pin<Box<dyn Future<Output = Result<(), LogError>> + Send + '_>> {
        let topic = topic.clone();
        Box::pin(async move {
            let mut topics = self.topics.write().await;
            if !topics.contains_key(&topic) {
                tracing::debug!(topic = %topic, "created topic");
                topics.insert(topic, Vec::new());
            }
            Ok(())
        })
    }

    fn subscribe_raw(
        &self,
        topic: &TopicId,
        config: &Config,
    ) -> Pin<Box<dyn Future<Output = Result<RawSubscription, LogError>> + Send + '_>> {
        let topic = topic.clone();
        let buffer = config.stream_buffer.max(1);
        Box::pin(async move {
            let (tx, rx) = mpsc::channel(buffer);
            {
                let mut topics = self.topics.write().await;
                let subs = topics
                    .get_mut(&topic)
                    .ok_or_else(|| LogError::not_found(format!("topic '{topic}' not found")))?;
                subs.push(tx);
            }
            let stream = futures_util::stream::unfold(rx, |mut rx| async move {
                rx.recv().await.map(|item| (item, rx))
            });
            Ok(Box::pin(stream) as RawSubscription)
        })
    }

    fn send_raw(
        &self,
        topic: &TopicId,
        value: serde_json::Value,
    ) -> Pin<Box<dyn Future<Output = Result<(), LogError>> + Send + '_>> {
        let topic = topic.clone();
        Box::pin(async move {
            // Senders are cloned out; no lock is held while sending.
            let subs = self.live_senders(&topic).await?;
            for tx in subs {
                if tx.send(Ok(value.clone())).await.is_err() {
                    tracing::debug!(topic = %topic, "subscriber went away during send");
                }
            }
            Ok(())
        })
    }
}
