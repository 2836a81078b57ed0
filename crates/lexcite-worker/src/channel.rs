//! Result channel between tasks and the coordinator
//!
//! Many tasks send, one coordinator receives. Messages from one sender arrive
//! in the order they were sent; messages from different tasks arrive in
//! completion order.

use crate::message::WorkResult;
use std::time::Duration;
use tokio::sync::mpsc::{self, error::TryRecvError};
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, warn};

/// Create a connected sender/receiver pair
pub fn result_channel() -> (ResultSender, ResultReceiver) {
    let (tx, rx) = mpsc::unbounded_channel();
    (ResultSender { tx }, ResultReceiver { rx, closed: false })
}

/// Sending half; clone one per task
#[derive(Debug, Clone)]
pub struct ResultSender {
    tx: mpsc::UnboundedSender<WorkResult>,
}

impl ResultSender {
    /// Post a message
    ///
    /// Returns `false` when the receiver is gone; the message is dropped.
    pub fn send(&self, result: WorkResult) -> bool {
        let kind = result.kind();
        match self.tx.send(result) {
            Ok(()) => {
                debug!("Posted {}", kind);
                true
            }
            Err(_) => {
                warn!("Result receiver dropped, discarding {}", kind);
                false
            }
        }
    }
}

/// Receiving half, owned by the coordinator
#[derive(Debug)]
pub struct ResultReceiver {
    rx: mpsc::UnboundedReceiver<WorkResult>,
    closed: bool,
}

impl ResultReceiver {
    /// Take every message that is ready without waiting
    ///
    /// An empty vector means nothing is pending.
    pub fn drain(&mut self) -> Vec<WorkResult> {
        let mut batch = Vec::new();
        loop {
            match self.rx.try_recv() {
                Ok(result) => batch.push(result),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    self.closed = true;
                    break;
                }
            }
        }
        batch
    }

    /// Wait for the next message
    ///
    /// Returns `None` once every sender is dropped and the channel is empty.
    pub async fn recv(&mut self) -> Option<WorkResult> {
        let next = self.rx.recv().await;
        if next.is_none() {
            self.closed = true;
        }
        next
    }

    /// Drain every `poll_interval` until at least one message arrives
    ///
    /// Returns an empty batch only when the channel is closed and empty.
    pub async fn poll(&mut self, poll_interval: Duration) -> Vec<WorkResult> {
        let mut ticker = interval(poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            let batch = self.drain();
            if !batch.is_empty() || self.closed {
                return batch;
            }
        }
    }

    /// True once every sender has been dropped and the buffer emptied
    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ingest_error(message: &str) -> WorkResult {
        WorkResult::IngestError {
            message: message.to_string(),
        }
    }

    #[tokio::test]
    async fn test_drain_empty_channel() {
        let (_tx, mut rx) = result_channel();
        assert!(rx.drain().is_empty());
        assert!(!rx.is_closed());
    }

    #[tokio::test]
    async fn test_drain_preserves_order() {
        let (tx, mut rx) = result_channel();
        for i in 0..5 {
            assert!(tx.send(ingest_error(&i.to_string())));
        }

        let messages: Vec<String> = rx
            .drain()
            .into_iter()
            .map(|r| match r {
                WorkResult::IngestError { message } => message,
                other => panic!("unexpected {:?}", other),
            })
            .collect();
        assert_eq!(messages, vec!["0", "1", "2", "3", "4"]);
        assert!(rx.drain().is_empty());
    }

    #[tokio::test]
    async fn test_poll_waits_for_message() {
        let (tx, mut rx) = result_channel();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(30)).await;
            tx.send(ingest_error("late"));
        });

        let batch = rx.poll(Duration::from_millis(5)).await;
        assert_eq!(batch, vec![ingest_error("late")]);
    }

    #[tokio::test]
    async fn test_poll_returns_when_closed() {
        let (tx, mut rx) = result_channel();
        drop(tx);

        assert!(rx.poll(Duration::from_millis(5)).await.is_empty());
        assert!(rx.is_closed());
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_send_after_receiver_dropped() {
        let (tx, rx) = result_channel();
        drop(rx);
        assert!(!tx.send(ingest_error("lost")));
    }
}
