//! Wayfare Request Gate
//! Copyright (c) 2026 The Wayfare Travel MCP Authors
//! Licensed and distributed under either of
//!   * MIT license (license terms at the root of the package or at http://opensource.org/licenses/MIT).
//!   * Apache v2 license (license terms at the root of the package or at http://www.apache.org/licenses/LICENSE-2.0).
//! at your option. This file may not be copied, modified, or distributed except according to those terms.

//! wayfare-internals/request-gate
//! An admission gate that bounds in-flight calls to an external service.
//!
//! Every call is attempted exactly once. Failures are handed back to the
//! caller untouched: the gate only decides *when* a call may start.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use thiserror::Error;
use tokio::sync::Semaphore;
use tokio::sync::{Mutex, Notify};
use tokio::time;

/// Errors raised by the gate itself, never by the gated call
#[derive(Debug, Error)]
pub enum GateError {
    #[error("request gate is closed")]
    Closed,
}

/// Admission mode
#[derive(Clone, Debug, Default)]
enum RateLimit {
    #[default]
    ConcurrencyOnly,
    Qps {
        limit: u64,
        tokens: Arc<AtomicU64>,
        last_refill: Arc<Mutex<Instant>>,
        refill_interval: Duration,
        notify: Arc<Notify>,
    },
}

/// Bounds concurrent (and optionally per-second) calls to a remote service.
///
/// Cloning is cheap; clones share the same permits.
///
/// # Examples
///
/// At most 4 requests in flight:
/// ```ignore
/// let gate = RequestGate::with_concurrency_limit(4);
/// let body = gate.run(|| async { fetch().await }).await?;
/// ```
///
/// At most 2 requests started per second:
/// ```ignore
/// let gate = RequestGate::with_qps_limit(2);
/// ```
#[derive(Clone, Debug)]
pub struct RequestGate {
    semaphore: Arc<Semaphore>,
    max_in_flight: usize,
    rate_limit: RateLimit,
}

impl Default for RequestGate {
    fn default() -> Self {
        Self::with_concurrency_limit(4)
    }
}

/// Semaphore sizes outside `1..=Semaphore::MAX_PERMITS` would panic
fn clamp_permits(requested: u64) -> usize {
    usize::try_from(requested)
        .unwrap_or(usize::MAX)
        .clamp(1, Semaphore::MAX_PERMITS)
}

impl RequestGate {
    /// Create a gate admitting at most `max_concurrent` calls at once
    pub fn with_concurrency_limit(max_concurrent: u64) -> Self {
        let max_concurrent = clamp_permits(max_concurrent);
        Self {
            semaphore: Arc::new(Semaphore::new(max_concurrent)),
            max_in_flight: max_concurrent,
            rate_limit: RateLimit::ConcurrencyOnly,
        }
    }

    /// Create a gate starting at most `qps_limit` calls per second
    pub fn with_qps_limit(qps_limit: u64) -> Self {
        let permits = clamp_permits(qps_limit);
        let qps_limit = permits as u64;
        Self {
            semaphore: Arc::new(Semaphore::new(permits)),
            max_in_flight: permits,
            rate_limit: RateLimit::Qps {
                limit: qps_limit,
                tokens: Arc::new(AtomicU64::new(qps_limit)),
                last_refill: Arc::new(Mutex::new(Instant::now())),
                refill_interval: Duration::from_secs(1),
                notify: Arc::new(Notify::new()),
            },
        }
    }

    /// Maximum number of calls admitted at the same time
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight
    }

    /// Number of calls that could start right now without waiting on a permit
    pub fn available_permits(&self) -> usize {
        self.semaphore.available_permits()
    }

    async fn refill_tokens(&self) {
        if let RateLimit::Qps {
            limit,
            tokens,
            last_refill,
            refill_interval,
            notify,
        } = &self.rate_limit
        {
            let mut last = last_refill.lock().await;
            let now = Instant::now();
            let elapsed = now.duration_since(*last);
            if elapsed >= *refill_interval {
                let new_tokens = (elapsed.as_secs_f64() * *limit as f64) as u64;
                if new_tokens > 0 {
                    let _ = tokens.fetch_update(Ordering::SeqCst, Ordering::SeqCst, |cur| {
                        Some(cur.saturating_add(new_tokens).min(*limit))
                    });
                    notify.notify_waiters();
                }
                *last = now;
            }
        }
    }

    async fn acquire_token(&self) {
        if let RateLimit::Qps { tokens, notify, .. } = &self.rate_limit {
            loop {
                self.refill_tokens().await;
                let available = tokens.load(Ordering::SeqCst);
                if available > 0 {
                    if tokens
                        .compare_exchange(
                            available,
                            available - 1,
                            Ordering::SeqCst,
                            Ordering::SeqCst,
                        )
                        .is_ok()
                    {
                        return;
                    }
                } else {
                    let _ = time::timeout(Duration::from_millis(100), notify.notified()).await;
                }
            }
        }
    }

    /// Run `f` once the gate admits it.
    ///
    /// `f` is invoked exactly once and its result is returned as-is. The
    /// permit is held until the returned future completes.
    pub async fn run<T, E, F, Fut>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: From<GateError>,
    {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| E::from(GateError::Closed))?;

        self.acquire_token().await;

        f().await
    }

    /// Stop admitting new calls. In-flight calls run to completion.
    pub fn close(&self) {
        self.semaphore.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[derive(Debug)]
    enum TestError {
        Gate,
        Call(&'static str),
    }

    impl From<GateError> for TestError {
        fn from(_: GateError) -> Self {
            TestError::Gate
        }
    }

    #[test]
    fn test_huge_limits_are_clamped() {
        assert_eq!(
            RequestGate::with_concurrency_limit(u64::MAX).max_in_flight(),
            Semaphore::MAX_PERMITS
        );
        assert_eq!(
            RequestGate::with_qps_limit(u64::MAX).available_permits(),
            Semaphore::MAX_PERMITS
        );
    }

    #[tokio::test]
    async fn test_run_returns_call_result() {
        let gate = RequestGate::with_concurrency_limit(2);
        let out: Result<u32, TestError> = gate.run(|| async { Ok(7) }).await;
        assert_eq!(out.unwrap(), 7);
    }

    #[tokio::test]
    async fn test_failure_is_not_retried() {
        let gate = RequestGate::with_concurrency_limit(2);
        let attempts = Arc::new(AtomicUsize::new(0));
        let counter = attempts.clone();
        let out: Result<(), TestError> = gate
            .run(|| async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Err(TestError::Call("boom"))
            })
            .await;
        assert!(matches!(out, Err(TestError::Call("boom"))));
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_concurrency_is_bounded() {
        let gate = RequestGate::with_concurrency_limit(2);
        let in_flight = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let gate = gate.clone();
            let in_flight = in_flight.clone();
            let peak = peak.clone();
            handles.push(tokio::spawn(async move {
                let _: Result<(), TestError> = gate
                    .run(|| async move {
                        let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                        peak.fetch_max(now, Ordering::SeqCst);
                        time::sleep(Duration::from_millis(20)).await;
                        in_flight.fetch_sub(1, Ordering::SeqCst);
                        Ok(())
                    })
                    .await;
            }));
        }
        for h in handles {
            h.await.unwrap();
        }

        assert!(peak.load(Ordering::SeqCst) <= 2);
        assert_eq!(gate.available_permits(), 2);
    }

    #[tokio::test]
    async fn test_closed_gate_rejects() {
        let gate = RequestGate::with_concurrency_limit(1);
        gate.close();
        let out: Result<(), TestError> = gate.run(|| async { Ok(()) }).await;
        assert!(matches!(out, Err(TestError::Gate)));
    }

    #[tokio::test]
    async fn test_qps_limit_paces_calls() {
        let gate = RequestGate::with_qps_limit(2);
        let start = Instant::now();
        for _ in 0..3 {
            let _: Result<(), TestError> = gate.run(|| async { Ok(()) }).await;
        }
        // Two tokens up front, the third waits for the next refill.
        assert!(start.elapsed() >= Duration::from_millis(900));
    }

    #[test]
    fn test_limits_are_clamped_to_one() {
        assert_eq!(RequestGate::with_concurrency_limit(0).max_in_flight(), 1);
        assert_eq!(RequestGate::with_qps_limit(0).max_in_flight(), 1);
    }
}
