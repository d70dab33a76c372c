use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

/// Serializes outbound call timing for one provider: `acquire` returns only
/// after at least `min_interval` has passed since the previous call through
/// this gate. The timestamp read-modify-write happens under a single lock so
/// concurrent callers cannot both observe a stale "can proceed" state.
#[derive(Clone)]
pub struct RateGate {
    last_call: Arc<Mutex<Option<Instant>>>,
    min_interval: Duration,
}

impl RateGate {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            last_call: Arc::new(Mutex::new(None)),
            min_interval,
        }
    }

    pub async fn acquire(&self) {
        let mut last = self.last_call.lock().await;
        if let Some(prev) = *last {
            let elapsed = prev.elapsed();
            if elapsed < self.min_interval {
                let wait = self.min_interval - elapsed;
                tracing::debug!("rate gate: waiting {:?} before next outbound call", wait);
                tokio::time::sleep(wait).await;
            }
        }
        *last = Some(Instant::now());
    }
}
