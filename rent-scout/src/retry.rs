//! Pluggable retry wrapper for remote calls.
//!
//! A [`RetryPolicy`] is a higher-order wrapper composing around a remote
//! call expressed as a function value. [`Retrying`] applies a policy to a
//! whole source at construction time, so callers use the decorated source
//! through the same seams as the bare one. Every wrapped call is a pure
//! GET, so retrying is idempotent; which failures are worth retrying is the
//! error type's own business via [`Retryable`].

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{Coordinate, Journey, Listing};
use crate::journeys::{JourneyError, JourneySource, Origin};
use crate::listings::{ListingError, ListingSource, SearchQuery};

/// Classifies which failures a fresh attempt could fix.
pub trait Retryable {
    /// True when retrying could succeed.
    fn is_retryable(&self) -> bool;

    /// Service-provided wait hint, honoured over the backoff schedule.
    fn retry_after(&self) -> Option<Duration> {
        None
    }
}

impl Retryable for ListingError {
    fn is_retryable(&self) -> bool {
        match self {
            ListingError::Http(_) => true,
            ListingError::Api { status, .. } => *status >= 500,
            ListingError::Json { .. } => false,
        }
    }
}

impl Retryable for JourneyError {
    fn is_retryable(&self) -> bool {
        matches!(
            self,
            JourneyError::Http(_)
                | JourneyError::RateLimited { .. }
                | JourneyError::Server { .. }
                | JourneyError::Gateway { .. }
        )
    }

    fn retry_after(&self) -> Option<Duration> {
        match self {
            JourneyError::RateLimited {
                retry_after: Some(secs),
            } => Some(Duration::from_secs(*secs)),
            _ => None,
        }
    }
}

/// Retry schedule: bounded attempts with capped exponential backoff.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Retries allowed after the initial attempt.
    pub max_retries: u32,
    /// Backoff before the first retry.
    pub initial_backoff: Duration,
    /// Upper bound for any single backoff.
    pub max_backoff: Duration,
    /// Multiplier applied to the backoff per retry.
    pub multiplier: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_backoff: Duration::from_millis(500),
            max_backoff: Duration::from_secs(30),
            multiplier: 2.0,
        }
    }
}

impl RetryPolicy {
    /// Backoff before retry number `attempt` (0-based).
    fn backoff(&self, attempt: u32) -> Duration {
        let ms = (self.initial_backoff.as_millis() as f64 * self.multiplier.powi(attempt as i32))
            .min(self.max_backoff.as_millis() as f64);
        Duration::from_millis(ms as u64)
    }

    /// Run `op`, retrying retryable failures per the schedule.
    ///
    /// `op` produces one fresh attempt per call. Non-retryable failures and
    /// failures after the last allowed retry are returned as-is.
    pub async fn run<T, E, F, Fut>(&self, mut op: F) -> Result<T, E>
    where
        E: Retryable + std::fmt::Display,
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let mut attempt = 0;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(error) if attempt < self.max_retries && error.is_retryable() => {
                    let wait = error.retry_after().unwrap_or_else(|| self.backoff(attempt));
                    tracing::warn!(
                        %error,
                        attempt = attempt + 1,
                        wait_ms = wait.as_millis() as u64,
                        "retrying remote call"
                    );
                    tokio::time::sleep(wait).await;
                    attempt += 1;
                }
                Err(error) => return Err(error),
            }
        }
    }
}

/// A source decorated with a retry policy at construction time.
#[derive(Debug, Clone)]
pub struct Retrying<S> {
    inner: S,
    policy: RetryPolicy,
}

impl<S> Retrying<S> {
    pub fn new(inner: S, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }

    /// The wrapped source.
    pub fn inner(&self) -> &S {
        &self.inner
    }
}

#[async_trait]
impl<S: ListingSource> ListingSource for Retrying<S> {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<Listing>, ListingError> {
        self.policy.run(|| self.inner.search(query)).await
    }
}

#[async_trait]
impl<S: JourneySource> JourneySource for Retrying<S> {
    async fn journeys(
        &self,
        from: &Origin,
        to: Coordinate,
        arrive_by: Option<DateTime<Utc>>,
    ) -> Result<Vec<Journey>, JourneyError> {
        self.policy
            .run(|| self.inner.journeys(from, to, arrive_by))
            .await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;

    /// A policy that backs off for a negligible time, keeping tests fast.
    fn quick_policy(max_retries: u32) -> RetryPolicy {
        RetryPolicy {
            max_retries,
            initial_backoff: Duration::from_millis(1),
            max_backoff: Duration::from_millis(4),
            multiplier: 2.0,
        }
    }

    fn server_error() -> JourneyError {
        JourneyError::Server {
            message: "boom".into(),
        }
    }

    #[test]
    fn backoff_schedule_doubles_and_caps() {
        let policy = RetryPolicy {
            max_retries: 5,
            initial_backoff: Duration::from_millis(500),
            max_backoff: Duration::from_secs(3),
            multiplier: 2.0,
        };

        assert_eq!(policy.backoff(0), Duration::from_millis(500));
        assert_eq!(policy.backoff(1), Duration::from_secs(1));
        assert_eq!(policy.backoff(2), Duration::from_secs(2));
        // Capped
        assert_eq!(policy.backoff(3), Duration::from_secs(3));
        assert_eq!(policy.backoff(10), Duration::from_secs(3));
    }

    #[test]
    fn rate_limit_hint_wins_over_schedule() {
        let hinted = JourneyError::RateLimited {
            retry_after: Some(7),
        };
        assert_eq!(hinted.retry_after(), Some(Duration::from_secs(7)));

        let unhinted = JourneyError::RateLimited { retry_after: None };
        assert_eq!(unhinted.retry_after(), None);
        assert!(unhinted.is_retryable());
    }

    #[test]
    fn listing_error_classification() {
        assert!(
            ListingError::Api {
                status: 502,
                message: String::new()
            }
            .is_retryable()
        );
        assert!(
            !ListingError::Api {
                status: 404,
                message: String::new()
            }
            .is_retryable()
        );
        assert!(
            !ListingError::Json {
                message: String::new()
            }
            .is_retryable()
        );
    }

    #[test]
    fn journey_error_classification() {
        assert!(server_error().is_retryable());
        assert!(
            JourneyError::Gateway {
                message: String::new()
            }
            .is_retryable()
        );
        assert!(
            !JourneyError::PlaceNotFound {
                message: String::new()
            }
            .is_retryable()
        );
        assert!(
            !JourneyError::Json {
                message: String::new()
            }
            .is_retryable()
        );
    }

    #[tokio::test]
    async fn retries_until_success() {
        let attempts = AtomicU32::new(0);

        let result: Result<u32, JourneyError> = quick_policy(3)
            .run(|| {
                let attempt = attempts.fetch_add(1, Ordering::SeqCst);
                async move {
                    if attempt < 2 {
                        Err(server_error())
                    } else {
                        Ok(attempt)
                    }
                }
            })
            .await;

        assert_eq!(result.unwrap(), 2);
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn non_retryable_fails_immediately() {
        let attempts = AtomicU32::new(0);

        let result: Result<u32, JourneyError> = quick_policy(3)
            .run(|| {
                attempts.fetch_add(1, Ordering::SeqCst);
                async {
                    Err(JourneyError::PlaceNotFound {
                        message: "nowhere".into(),
                    })
                }
            })
            .await;

        assert!(matches!(result, Err(JourneyError::PlaceNotFound { .. })));
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn exhausted_retries_return_the_last_error() {
        let attempts = AtomicU32::new(0);

        let result: Result<u32, JourneyError> = quick_policy(2)
            .run(|| {
                attempts.fetch_add(1, Ordering::SeqCst);
                async { Err(server_error()) }
            })
            .await;

        assert!(matches!(result, Err(JourneyError::Server { .. })));
        // Initial attempt plus two retries
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    /// Journey source failing a fixed number of times before succeeding.
    struct Flaky {
        failures_left: Mutex<u32>,
        calls: AtomicU32,
    }

    #[async_trait]
    impl JourneySource for Flaky {
        async fn journeys(
            &self,
            _from: &Origin,
            _to: Coordinate,
            _arrive_by: Option<DateTime<Utc>>,
        ) -> Result<Vec<Journey>, JourneyError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let mut failures = self.failures_left.lock().unwrap();
            if *failures > 0 {
                *failures -= 1;
                return Err(server_error());
            }
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn retrying_source_hides_transient_failures() {
        let flaky = Flaky {
            failures_left: Mutex::new(2),
            calls: AtomicU32::new(0),
        };
        let source = Retrying::new(flaky, quick_policy(3));

        let journeys = source
            .journeys(
                &Origin::Place("Vauxhall".into()),
                Coordinate::new(51.5, -0.12),
                None,
            )
            .await
            .unwrap();

        assert!(journeys.is_empty());
        assert_eq!(source.inner().calls.load(Ordering::SeqCst), 3);
    }
}
