use parking_lot::Mutex;

use crate::models::RequestOutcome;

/// Append-only outcome store shared by the loops of one run.
#[derive(Debug, Default)]
pub struct OutcomeRecorder {
    outcomes: Mutex<Vec<RequestOutcome>>,
}

impl OutcomeRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, outcome: RequestOutcome) {
        self.outcomes.lock().push(outcome);
    }

    pub fn len(&self) -> usize {
        self.outcomes.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.lock().is_empty()
    }

    /// Moves the collected outcomes out, leaving the recorder empty.
    pub fn take(&self) -> Vec<RequestOutcome> {
        std::mem::take(&mut *self.outcomes.lock())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_record_loses_nothing() {
        let recorder = Arc::new(OutcomeRecorder::new());
        let mut handles = Vec::new();

        for i in 0..50 {
            let recorder = Arc::clone(&recorder);
            handles.push(tokio::spawn(async move {
                for _ in 0..200 {
                    if i % 2 == 0 {
                        recorder.record(RequestOutcome::response(200, 1.0));
                    } else {
                        recorder.record(RequestOutcome::transport_failure());
                    }
                    tokio::task::yield_now().await;
                }
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(recorder.len(), 50 * 200);
        let outcomes = recorder.take();
        assert_eq!(outcomes.iter().filter(|o| o.is_success()).count(), 25 * 200);
        assert!(recorder.is_empty());
    }
}
