use std::{future::Future, sync::Arc};
use tokio::{select, sync::watch};

// Cancellation signal shared between a caller and a running invocation.
// Clones observe the same signal.
#[derive(Clone, Debug)]
pub struct CancelToken {
    sender: Arc<watch::Sender<bool>>,
    receiver: watch::Receiver<bool>,
}

impl CancelToken {
    pub fn new() -> Self {
        let (sender, receiver) = watch::channel(false);
        Self {
            sender: Arc::new(sender),
            receiver,
        }
    }

    pub fn cancel(&self) {
        self.sender.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.receiver.borrow()
    }

    // Resolves once the token is cancelled
    pub async fn cancelled(&self) {
        let mut receiver = self.receiver.clone();
        loop {
            if *receiver.borrow_and_update() {
                return;
            }

            // The sender lives as long as any clone of the token
            if receiver.changed().await.is_err() {
                std::future::pending::<()>().await;
            }
        }
    }

    // Drive `future` to completion unless the token is cancelled first.
    // Returns `None` on cancellation, the future is dropped.
    pub async fn run<F: Future>(&self, future: F) -> Option<F::Output> {
        select! {
            biased;
            _ = self.cancelled() => None,
            output = future => Some(output),
        }
    }
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}
