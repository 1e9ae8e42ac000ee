use std::future::Future;
use std::pin::Pin;

use futures_util::{Stream, StreamExt};

use crate::config::Config;
use crate::error::LogError;
use crate::params::Params;
use crate::topic::{RecordKind, TopicId};

/// Subscription on a topic yielding raw JSON params in arrival order.
///
/// Ends when the topic is closed; a terminal failure is reported as an `Err`
/// item. Dropping the stream releases the subscription on the log.
pub type RawSubscription = Pin<Box<dyn Stream<Item = Result<serde_json::Value, LogError>> + Send>>;

/// `RawSubscription` with every item decoded into `P`.
pub type ParamsSubscription<P> = Pin<Box<dyn Stream<Item = Result<P, LogError>> + Send>>;

/// Client of the distributed message log.
///
/// Returned futures borrow only `self`; implementations copy whatever they
/// need from the other arguments before boxing.
pub trait MessageLog: Send + Sync {
    /// Mint a fresh topic id for a record kind. Pure, no broker access.
    fn generate_topic_id(&self, kind: RecordKind) -> TopicId;

    /// Create `topic` on the log. Safe to retry.
    fn create_topic(
        &self,
        topic: &TopicId,
        config: &Config,
    ) -> Pin<Box<dyn Future<Output = Result<(), LogError>> + Send + '_>>;

    /// Open a subscription on `topic`.
    fn subscribe_raw(
        &self,
        topic: &TopicId,
        config: &Config,
    ) -> Pin<Box<dyn Future<Output = Result<RawSubscription, LogError>> + Send + '_>>;

    /// Append one JSON payload to `topic`.
    fn send_raw(
        &self,
        topic: &TopicId,
        value: serde_json::Value,
    ) -> Pin<Box<dyn Future<Output = Result<(), LogError>> + Send + '_>>;
}

/// Typed access on top of any `MessageLog`.
pub trait MessageLogExt: MessageLog {
    /// Subscribe and decode every payload as `P`. A payload that does not
    /// decode surfaces as a `Decode` error item.
    fn subscribe<'a, P: Params>(
        &'a self,
        topic: &'a TopicId,
        config: &'a Config,
    ) -> Pin<Box<dyn Future<Output = Result<ParamsSubscription<P>, LogError>> + Send + 'a>> {
        Box::pin(async move {
            let raw = self.subscribe_raw(topic, config).await?;
            let typed = raw.map(|item| {
                item.and_then(|value| serde_json::from_value::<P>(value).map_err(LogError::from))
            });
            Ok(Box::pin(typed) as ParamsSubscription<P>)
        })
    }

    /// Encode `params` as JSON and append it to `topic`.
    fn send<'a, P: Params>(
        &'a self,
        topic: &'a TopicId,
        params: &P,
    ) -> Pin<Box<dyn Future<Output = Result<(), LogError>> + Send + 'a>> {
        let value = serde_json::to_value(params);
        Box::pin(async move { self.send_raw(topic, value?).await })
    }
}

impl<T: MessageLog + ?Sized> MessageLogExt for T {}
