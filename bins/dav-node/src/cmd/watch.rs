use std::sync::Arc;
use std::time::Duration;

use futures_util::StreamExt;
use tokio::io::{AsyncBufReadExt, BufReader};

use dav_api::{DomainRecord, MessageLog, NeedFilterParams, TopicId};
use dav_engine::{MemoryLog, RecordStream};

use crate::config::{WatchArgs, WatchKind};
use crate::error::NodeError;

const SUBSCRIBE_POLL: Duration = Duration::from_millis(10);

pub async fn run(config_path: &str, args: WatchArgs) -> Result<(), NodeError> {
    let (coordinator, log) = super::bootstrap(config_path)?;
    let topic = args.topic.map(TopicId::from);

    match args.kind {
        WatchKind::Need => {
            let filter = NeedFilterParams { need_type: args.need_type, area: None, ttl: None };
            relay(coordinator.needs_for_type(filter, topic).await?, log).await
        }
        WatchKind::Bid => relay(coordinator.bids(topic).await?, log).await,
        WatchKind::Mission => relay(coordinator.missions(topic).await?, log).await,
        WatchKind::Message => relay(coordinator.messages(topic).await?, log).await,
    }
}

/// Log every record until Ctrl-C, the stream ends, or it fails.
async fn relay<R: DomainRecord>(
    mut stream: RecordStream<R>,
    log: Arc<MemoryLog>,
) -> Result<(), NodeError> {
    let topic = stream.topic().clone();
    tracing::info!(topic = %topic, "watching; send JSON params on stdin");
    let feeder = tokio::spawn(feed_stdin(log, topic.clone()));

    let result = loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!(topic = %topic, "interrupted");
                stream.unsubscribe();
                break Ok(());
            }
            item = stream.next() => match item {
                Some(Ok(record)) => {
                    tracing::info!(topic = %record.topic(), params = ?record.params(), "record");
                }
                Some(Err(e)) => break Err(NodeError::Stream(e)),
                None => break Ok(()),
            }
        }
    };

    feeder.abort();
    result
}

/// Send each stdin line, parsed as JSON, to `topic`. Reading starts once the
/// watch subscription is open.
async fn feed_stdin(log: Arc<MemoryLog>, topic: TopicId) -> Result<(), NodeError> {
    wait_for_subscriber(&log, &topic).await;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<serde_json::Value>(&line) {
            Ok(value) => {
                if let Err(e) = log.send_raw(&topic, value).await {
                    tracing::warn!(topic = %topic, error = %e, "send failed");
                }
            }
            Err(e) => tracing::warn!(error = %e, "skipping line that is not JSON"),
        }
    }
    tracing::debug!(topic = %topic, "stdin closed");
    Ok(())
}

async fn wait_for_subscriber(log: &MemoryLog, topic: &TopicId) {
    while log.subscriber_count(topic).await == 0 {
        tokio::time::sleep(SUBSCRIBE_POLL).await;
    }
    tracing::debug!(topic = %topic, "subscription open, reading stdin");
}
