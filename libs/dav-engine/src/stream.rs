use std::pin::Pin;
use std::task::{Context, Poll};

use futures_util::Stream;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use dav_api::{LogError, TopicId};

/// Consumer end of a hydrated subscription.
///
/// Yields records in arrival order. An `Err` item is terminal: the stream
/// ends right after it. Dropping the stream or calling `unsubscribe` tears
/// down the relay task and the log subscription behind it. The stream is not
/// restartable; subscribe again through the coordinator for a fresh one.
#[derive(Debug)]
pub struct RecordStream<R> {
    topic: TopicId,
    rx: mpsc::Receiver<Result<R, LogError>>,
    token: CancellationToken,
    done: bool,
}

impl<R> RecordStream<R> {
    pub(crate) fn new(
        topic: TopicId,
        rx: mpsc::Receiver<Result<R, LogError>>,
        token: CancellationToken,
    ) -> Self {
        Self { topic, rx, token, done: false }
    }

    /// Topic this stream is subscribed to.
    pub fn topic(&self) -> &TopicId {
        &self.topic
    }

    /// Stop delivery. Items already buffered are discarded.
    pub fn unsubscribe(&mut self) {
        if !self.done {
            tracing::debug!(topic = %self.topic, "unsubscribing");
        }
        self.done = true;
        self.token.cancel();
        self.rx.close();
    }

    pub fn is_unsubscribed(&self) -> bool {
        self.token.is_cancelled()
    }
}

impl<R> Stream for RecordStream<R> {
    type Item = Result<R, LogError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        if this.done {
            return Poll::Ready(None);
        }
        match this.rx.poll_recv(cx) {
            Poll::Ready(Some(Err(e))) => {
                this.done = true;
                Poll::Ready(Some(Err(e)))
            }
            Poll::Ready(None) => {
                this.done = true;
                Poll::Ready(None)
            }
            other => other,
        }
    }
}

impl<R> Drop for RecordStream<R> {
    fn drop(&mut self) {
        self.token.cancel();
    }
}
