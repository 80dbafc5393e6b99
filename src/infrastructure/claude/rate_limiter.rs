use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::time::sleep;

/// Token bucket rate limiter for API request throttling
///
/// Capacity equals the refill rate, so a full bucket allows a one-second
/// burst before requests are spaced out.
#[derive(Clone)]
pub struct TokenBucketRateLimiter {
    /// Current number of available tokens
    tokens: Arc<Mutex<f64>>,
    /// Maximum token capacity
    capacity: f64,
    /// Tokens added per second
    refill_rate: f64,
    /// Last time tokens were refilled
    last_refill: Arc<Mutex<Instant>>,
}

impl TokenBucketRateLimiter {
    /// Create a rate limiter allowing `requests_per_second`.
    ///
    /// Non-positive rates are rejected by config validation; they fall back
    /// to one request per second here.
    pub fn new(requests_per_second: f64) -> Self {
        let rate = if requests_per_second > 0.0 {
            requests_per_second
        } else {
            1.0
        };

        Self {
            tokens: Arc::new(Mutex::new(rate)),
            capacity: rate,
            refill_rate: rate,
            last_refill: Arc::new(Mutex::new(Instant::now())),
        }
    }

    /// Acquire a token from the bucket, waiting if necessary
    pub async fn acquire(&self) {
        loop {
            let mut tokens = self.tokens.lock().await;
            let mut last_refill = self.last_refill.lock().await;

            let now = Instant::now();
            let elapsed = now.duration_since(*last_refill).as_secs_f64();
            let available = (*tokens + elapsed * self.refill_rate).min(self.capacity);

            if available >= 1.0 {
                *tokens = available - 1.0;
                *last_refill = now;
                return;
            }

            let wait_secs = (1.0 - available) / self.refill_rate;
            let wait = Duration::from_secs_f64(wait_secs.max(0.01));

            // Release locks before sleeping
            drop(tokens);
            drop(last_refill);

            sleep(wait).await;
        }
    }

    /// Current number of available tokens
    pub async fn available_tokens(&self) -> f64 {
        let tokens = self.tokens.lock().await;
        let last_refill = self.last_refill.lock().await;

        let elapsed = Instant::now().duration_since(*last_refill).as_secs_f64();
        (*tokens + elapsed * self.refill_rate).min(self.capacity)
    }
}
