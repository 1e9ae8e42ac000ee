use std::sync::Arc;

use futures_util::StreamExt;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use dav_api::{Config, DomainRecord, LogError, MessageLog, MessageLogExt, Params, TopicId};

use crate::stream::RecordStream;

/// Opens subscriptions and turns incoming params into domain records.
#[derive(Clone)]
pub(crate) struct StreamHydrator {
    log: Arc<dyn MessageLog>,
    config: Arc<Config>,
}

impl StreamHydrator {
    pub(crate) fn new(log: Arc<dyn MessageLog>, config: Arc<Config>) -> Self {
        Self { log, config }
    }

    /// Subscribe to `topic` and build an `R` from every params item.
    pub(crate) fn hydrate<R: DomainRecord>(&self, topic: TopicId) -> RecordStream<R> {
        self.hydrate_with(topic, |topic: &TopicId, params: R::Params, config: &Arc<Config>| {
            R::new(topic.clone(), params, config.clone())
        })
    }

    /// Subscribe to `topic` and map every params item through `hydrate`.
    ///
    /// Must be called inside a tokio runtime: the subscription is opened and
    /// relayed by a spawned task. Failing to open, or a failure mid-stream,
    /// arrives as the single final `Err` item, exactly as the log reported it.
    pub(crate) fn hydrate_with<P, R, F>(&self, topic: TopicId, hydrate: F) -> RecordStream<R>
    where
        P: Params,
        R: Send + 'static,
        F: Fn(&TopicId, P, &Arc<Config>) -> R + Send + 'static,
    {
        let (tx, rx) = mpsc::channel(self.config.stream_buffer.max(1));
        let token = CancellationToken::new();

        tokio::spawn(relay(
            self.log.clone(),
            self.config.clone(),
            topic.clone(),
            hydrate,
            tx,
            token.clone(),
        ));

        RecordStream::new(topic, rx, token)
    }
}

// ═══════════════════════════════════════════════════════════════
//  Relay task: log subscription to consumer channel
// ═══════════════════════════════════════════════════════════════

async fn relay<P, R, F>(
    log: Arc<dyn MessageLog>,
    config: Arc<Config>,
    topic: TopicId,
    hydrate: F,
    tx: mpsc::Sender<Result<R, LogError>>,
    token: CancellationToken,
) where
    P: Params,
    R: Send + 'static,
    F: Fn(&TopicId, P, &Arc<Config>) -> R + Send + 'static,
{
    let opened = tokio::select! {
        biased;
        _ = token.cancelled() => return,
        opened = log.subscribe::<P>(&topic, &config) => opened,
    };

    let mut upstream = match opened {
        Ok(upstream) => upstream,
        Err(e) => {
            tracing::warn!(topic = %topic, error = %e, "subscription failed to open");
            forward(&tx, &token, Err(e)).await;
            return;
        }
    };
    tracing::info!(topic = %topic, "subscribed");

    loop {
        let item = tokio::select! {
            biased;
            _ = token.cancelled() => break,
            item = upstream.next() => item,
        };

        match item {
            Some(Ok(params)) => {
                if token.is_cancelled() {
                    break;
                }
                let record = hydrate(&topic, params, &config);
                if !forward(&tx, &token, Ok(record)).await {
                    break;
                }
            }
            Some(Err(e)) => {
                tracing::warn!(topic = %topic, error = %e, "subscription failed");
                forward(&tx, &token, Err(e)).await;
                break;
            }
            None => {
                tracing::debug!(topic = %topic, "subscription completed");
                break;
            }
        }
    }

    // Dropping the upstream here releases the subscription on the log.
    drop(upstream);
    tracing::info!(topic = %topic, "unsubscribed");
}

/// Send one item to the consumer. `false` once the consumer is gone.
async fn forward<R>(
    tx: &mpsc::Sender<Result<R, LogError>>,
    token: &CancellationToken,
    item: Result<R, LogError>,
) -> bool {
    tokio::select! {
        biased;
        _ = token.cancelled() => false,
        sent = tx.send(item) => sent.is_ok(),
    }
}
