//! Token-bucket rate limiting for the trigger endpoints

use std::sync::Mutex;
use std::time::Instant;

struct Bucket {
    tokens: f64,
    last_refill: Instant,
}

/// Simple token bucket: `rate` tokens per second up to `burst`
pub struct RateLimiter {
    bucket: Mutex<Bucket>,
    rate: f64,
    burst: f64,
}

impl RateLimiter {
    pub fn new(rate: f64, burst: u32) -> Self {
        Self {
            bucket: Mutex::new(Bucket {
                tokens: burst as f64,
                last_refill: Instant::now(),
            }),
            rate,
            burst: burst as f64,
        }
    }

    /// Takes one token if available
    pub fn try_acquire(&self) -> bool {
        let mut bucket = self.bucket.lock().unwrap();
        let now = Instant::now();
        let elapsed = now.duration_since(bucket.last_refill).as_secs_f64();
        bucket.tokens = (bucket.tokens + elapsed * self.rate).min(self.burst);
        bucket.last_refill = now;

        if bucket.tokens >= 1.0 {
            bucket.tokens -= 1.0;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_burst_is_available_immediately() {
        let limiter = RateLimiter::new(1.0, 3);
        assert!(limiter.try_acquire());
        assert!(limiter.try_acquire());
        assert!(limiter.try_acquire());
        assert!(!limiter.try_acquire());
    }

    #[test]
    fn test_tokens_refill_over_time() {
        let limiter = RateLimiter::new(1000.0, 1);
        assert!(limiter.try_acquire());
        assert!(!limiter.try_acquire());
        std::thread::sleep(std::time::Duration::from_millis(10));
        assert!(limiter.try_acquire());
    }
}
