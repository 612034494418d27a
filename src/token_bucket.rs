use serde::Serialize;
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

/// Continuously refilled token counter. Starts full.
#[derive(Debug, Clone)]
pub struct TokenBucket {
    burst: u32,
    tokens: f64,
    refill_rate: f64, // tokens per second
    last_refill: Instant,
}

impl TokenBucket {
    pub fn new(burst: u32, refill_rate: f64) -> Self {
        Self::new_at(burst, refill_rate, Instant::now())
    }

    pub fn new_at(burst: u32, refill_rate: f64, now: Instant) -> Self {
        Self {
            burst,
            tokens: burst as f64,
            refill_rate,
            last_refill: now,
        }
    }

    /// Refill up to `now`, then take `tokens` if that many are available.
    pub fn consume_at(&mut self, tokens: u64, now: Instant) -> bool {
        self.refill(now);

        if self.tokens >= tokens as f64 {
            self.tokens -= tokens as f64;
            true
        } else {
            false
        }
    }

    pub fn available_tokens(&mut self) -> u32 {
        self.available_tokens_at(Instant::now())
    }

    pub fn available_tokens_at(&mut self, now: Instant) -> u32 {
        self.refill(now);
        self.tokens.floor() as u32
    }

    pub fn burst(&self) -> u32 {
        self.burst
    }

    pub fn refill_rate(&self) -> f64 {
        self.refill_rate
    }

    fn refill(&mut self, now: Instant) {
        let elapsed = now.saturating_duration_since(self.last_refill);

        if elapsed > Duration::from_millis(1) {
            let tokens_to_add = self.refill_rate * elapsed.as_secs_f64();

            // Never exceed the burst ceiling
            self.tokens = (self.tokens + tokens_to_add).min(self.burst as f64);
            self.last_refill = now;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BucketSnapshot {
    pub burst: u32,
    pub refill_rate: f64,
    pub available_tokens: u32,
}

/// Process-wide bucket. Refill, check and decrement happen under one lock,
/// so concurrent callers can never spend the same tokens twice.
#[derive(Debug)]
pub struct SharedTokenBucket {
    inner: Mutex<TokenBucket>,
}

impl SharedTokenBucket {
    pub fn new(burst: u32, refill_rate: f64) -> Self {
        Self::from_bucket(TokenBucket::new(burst, refill_rate))
    }

    pub fn from_bucket(bucket: TokenBucket) -> Self {
        Self {
            inner: Mutex::new(bucket),
        }
    }

    pub fn try_admit(&self, load: u64) -> bool {
        self.try_admit_at(load, Instant::now())
    }

    pub fn try_admit_at(&self, load: u64, now: Instant) -> bool {
        if load == 0 {
            return true;
        }
        self.lock().consume_at(load, now)
    }

    pub fn available_tokens(&self) -> u32 {
        self.lock().available_tokens()
    }

    pub fn available_tokens_at(&self, now: Instant) -> u32 {
        self.lock().available_tokens_at(now)
    }

    /// Parameters and occupancy read under a single lock
    pub fn snapshot(&self) -> BucketSnapshot {
        let mut bucket = self.lock();
        BucketSnapshot {
            burst: bucket.burst(),
            refill_rate: bucket.refill_rate(),
            available_tokens: bucket.available_tokens(),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, TokenBucket> {
        // consume_at only commits after its checks, a panic cannot leave it half-updated
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_token_bucket_creation() {
        let bucket = TokenBucket::new(10, 2.0);
        assert_eq!(bucket.burst(), 10);
        assert_eq!(bucket.refill_rate(), 2.0);
    }

    #[test]
    fn test_token_consumption() {
        let start = Instant::now();
        let mut bucket = TokenBucket::new_at(10, 2.0, start);
        assert!(bucket.consume_at(5, start));
        assert_eq!(bucket.available_tokens_at(start), 5);
        assert!(bucket.consume_at(5, start));
        assert_eq!(bucket.available_tokens_at(start), 0);
        assert!(!bucket.consume_at(1, start));
    }

    #[test]
    fn test_burst_overflow_prevention() {
        let start = Instant::now();
        let mut bucket = TokenBucket::new_at(5, 1000.0, start);
        bucket.consume_at(3, start);

        // Even with a high refill rate, tokens never exceed the burst
        let later = start + Duration::from_secs(10);
        assert_eq!(bucket.available_tokens_at(later), 5);
    }

    #[test]
    fn test_exact_consumption_then_reject() {
        let start = Instant::now();
        let bucket = SharedTokenBucket::from_bucket(TokenBucket::new_at(20, 10.0, start));

        assert!(bucket.try_admit_at(7, start));
        assert_eq!(bucket.available_tokens_at(start), 13);
        // 20 - 7 + 1
        assert!(!bucket.try_admit_at(14, start));
        assert_eq!(bucket.available_tokens_at(start), 13);
    }

    #[test]
    fn test_refill_makes_rejected_load_admissible() {
        let start = Instant::now();
        let bucket = SharedTokenBucket::from_bucket(TokenBucket::new_at(5, 10.0, start));

        assert!(bucket.try_admit_at(5, start));
        assert!(!bucket.try_admit_at(3, start));

        let later = start + Duration::from_millis(500);
        assert!(bucket.try_admit_at(3, later));
    }

    #[test]
    fn test_zero_load_is_free() {
        let start = Instant::now();
        let bucket = SharedTokenBucket::from_bucket(TokenBucket::new_at(4, 0.0, start));

        assert!(bucket.try_admit_at(4, start));
        assert!(bucket.try_admit_at(0, start));
        assert_eq!(bucket.available_tokens_at(start), 0);

        let full = SharedTokenBucket::from_bucket(TokenBucket::new_at(4, 0.0, start));
        assert!(full.try_admit_at(0, start));
        assert_eq!(full.available_tokens_at(start), 4);
    }

    #[test]
    fn test_snapshot_reports_parameters() {
        let bucket = SharedTokenBucket::new(12, 0.0);
        assert!(bucket.try_admit(5));
        assert_eq!(
            bucket.snapshot(),
            BucketSnapshot {
                burst: 12,
                refill_rate: 0.0,
                available_tokens: 7,
            }
        );
    }

    #[test]
    fn test_concurrent_admission_never_double_spends() {
        const THREADS: u64 = 16;
        const PER_REQUEST: u64 = 3;

        let bucket = Arc::new(SharedTokenBucket::new((THREADS * PER_REQUEST) as u32, 0.0));

        let handles: Vec<_> = (0..THREADS * 2)
            .map(|_| {
                let bucket = Arc::clone(&bucket);
                thread::spawn(move || bucket.try_admit(PER_REQUEST))
            })
            .collect();

        let admitted = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|ok| *ok)
            .count() as u64;

        assert_eq!(admitted, THREADS);
        assert_eq!(bucket.available_tokens(), 0);
    }
}
