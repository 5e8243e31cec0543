//! Debouncing of rapidly changing values.
//!
//! A [`Debouncer`] forwards the latest pushed value once no newer value has
//! arrived for the configured delay. Dropping or shutting down the debouncer
//! discards any pending value.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::sleep;

/// Delay applied to search input.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

/// Handle for pushing values into a debouncing task.
pub struct Debouncer<T> {
    tx: mpsc::UnboundedSender<T>,
    task: JoinHandle<()>,
}

impl<T> Debouncer<T>
where
    T: Clone + PartialEq + Send + 'static,
{
    /// Spawn the debouncing task.
    ///
    /// Returns the input handle and the receiver of settled values. Must be
    /// called from within a tokio runtime.
    pub fn spawn(delay: Duration) -> (Self, mpsc::UnboundedReceiver<T>) {
        let (tx, input) = mpsc::unbounded_channel();
        let (output, rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(run(input, output, delay));
        (Self { tx, task }, rx)
    }

    /// Replace the pending value and restart the quiet period.
    pub fn push(&self, value: T) {
        if self.tx.send(value).is_err() {
            tracing::debug!("Debouncer task has stopped, dropping value");
        }
    }

    /// Stop the task without emitting the pending value.
    pub fn shutdown(self) {
        self.task.abort();
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn run<T>(
    mut input: mpsc::UnboundedReceiver<T>,
    output: mpsc::UnboundedSender<T>,
    delay: Duration,
) where
    T: Clone + PartialEq + Send + 'static,
{
    let mut last_emitted: Option<T> = None;
    let mut pending: Option<T> = None;

    loop {
        match pending.take() {
            None => match input.recv().await {
                Some(value) => pending = Some(value),
                None => break,
            },
            Some(value) => {
                tokio::select! {
                    next = input.recv() => match next {
                        Some(newer) => pending = Some(newer),
                        // Input closed mid-wait: teardown drops the pending value.
                        None => break,
                    },
                    _ = sleep(delay) => {
                        if last_emitted.as_ref() == Some(&value) {
                            continue;
                        }
                        if output.send(value.clone()).is_err() {
                            break;
                        }
                        last_emitted = Some(value);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::advance;

    async fn settle() {
        // Let the debouncer task observe channel activity.
        for _ in 0..5 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_emits_after_quiet_period() {
        let (debouncer, mut rx) = Debouncer::spawn(Duration::from_millis(500));

        debouncer.push("bat".to_string());
        settle().await;
        advance(Duration::from_millis(499)).await;
        settle().await;
        assert!(rx.try_recv().is_err());

        advance(Duration::from_millis(2)).await;
        settle().await;
        assert_eq!(rx.try_recv().unwrap(), "bat");
    }

    #[tokio::test(start_paused = true)]
    async fn test_superseded_values_are_never_emitted() {
        let (debouncer, mut rx) = Debouncer::spawn(Duration::from_millis(500));

        for value in ["b", "ba", "bat", "batm", "batman"] {
            debouncer.push(value.to_string());
            settle().await;
            advance(Duration::from_millis(300)).await;
            settle().await;
        }
        advance(Duration::from_millis(300)).await;
        settle().await;

        assert_eq!(rx.try_recv().unwrap(), "batman");
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_identical_value_is_not_re_emitted() {
        let (debouncer, mut rx) = Debouncer::spawn(Duration::from_millis(100));

        debouncer.push(1u32);
        settle().await;
        advance(Duration::from_millis(150)).await;
        settle().await;
        assert_eq!(rx.try_recv().unwrap(), 1);

        debouncer.push(2);
        settle().await;
        debouncer.push(1);
        settle().await;
        advance(Duration::from_millis(150)).await;
        settle().await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_discards_pending_value() {
        let (debouncer, mut rx) = Debouncer::spawn(Duration::from_millis(100));

        debouncer.push("pending".to_string());
        settle().await;
        debouncer.shutdown();
        advance(Duration::from_millis(500)).await;
        settle().await;

        // Sender side is gone and nothing was emitted.
        assert!(rx.recv().await.is_none());
    }
}
