// Token-bucket rate limiter for monitoring-service calls.
// Injected into the collector and awaited before every volume-metric fetch;
// at the default 0.5 calls/sec consecutive acquires are 2 seconds apart.

use tokio::sync::Mutex;
use tokio::time::{Duration, Instant, sleep};

pub struct RateLimiter {
    calls_per_second: f64,
    burst: f64,
    state: Mutex<BucketState>,
}

struct BucketState {
    tokens: f64,
    last_refill: Instant,
}

impl RateLimiter {
    pub fn new(calls_per_second: f64) -> Self {
        Self::with_burst(calls_per_second, 1.0)
    }

    pub fn with_burst(calls_per_second: f64, burst: f64) -> Self {
        RateLimiter {
            calls_per_second,
            burst,
            state: Mutex::new(BucketState {
                tokens: burst,
                last_refill: Instant::now(),
            }),
        }
    }

    /// Waits until a token is available, then consumes it.
    pub async fn acquire(&self) {
        loop {
            let wait = {
                let mut state = self.state.lock().await;
                let now = Instant::now();
                let elapsed = now.duration_since(state.last_refill).as_secs_f64();
                state.tokens = (state.tokens + elapsed * self.calls_per_second).min(self.burst);
                state.last_refill = now;
                if state.tokens >= 1.0 {
                    state.tokens -= 1.0;
                    None
                } else {
                    Some(Duration::from_secs_f64(
                        (1.0 - state.tokens) / self.calls_per_second,
                    ))
                }
            };
            match wait {
                None => return,
                Some(delay) => sleep(delay).await,
            }
        }
    }
}
