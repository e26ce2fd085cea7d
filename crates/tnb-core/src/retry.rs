//! Retry policy for node requests: which failures are retried and how long
//! to wait between attempts.

use std::time::Duration;

use crate::http_client::{HttpError, HttpErrorKind};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Backoff {
    Fixed {
        delay: Duration,
    },
    /// `base * factor^attempt`, capped at `max`, optionally jittered by up to
    /// half the delay in either direction.
    Exponential {
        base: Duration,
        factor: f64,
        max: Duration,
        jitter: bool,
    },
}

impl Default for Backoff {
    fn default() -> Self {
        Self::Exponential {
            base: Duration::from_millis(250),
            factor: 2.0,
            max: Duration::from_secs(4),
            jitter: true,
        }
    }
}

impl Backoff {
    /// Delay before retry number `attempt` (0-based).
    pub fn delay(self, attempt: u32) -> Duration {
        match self {
            Self::Fixed { delay } => delay,
            Self::Exponential {
                base,
                factor,
                max,
                jitter,
            } => {
                let exponent = i32::try_from(attempt).unwrap_or(i32::MAX);
                let capped = (base.as_secs_f64() * factor.powi(exponent)).min(max.as_secs_f64());
                if !jitter {
                    return Duration::from_secs_f64(capped);
                }
                // uniform in [0.5, 1.5)
                let scale = 0.5 + fastrand::f64();
                Duration::from_secs_f64(capped * scale)
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct RetryConfig {
    pub enabled: bool,
    /// Retries after the first attempt.
    pub max_retries: u32,
    pub backoff: Backoff,
    pub retry_on_status: Vec<u16>,
    pub retry_on_timeout: bool,
    /// Retry when the node refuses or drops the connection.
    pub retry_on_connect: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_retries: 3,
            backoff: Backoff::default(),
            retry_on_status: vec![429, 500, 502, 503, 504],
            retry_on_timeout: true,
            retry_on_connect: true,
        }
    }
}

impl RetryConfig {
    pub fn exponential(max_retries: u32) -> Self {
        Self {
            max_retries,
            ..Self::default()
        }
    }

    pub fn fixed(delay: Duration, max_retries: u32) -> Self {
        Self {
            max_retries,
            backoff: Backoff::Fixed { delay },
            ..Self::default()
        }
    }

    pub fn no_retry() -> Self {
        Self {
            enabled: false,
            max_retries: 0,
            ..Self::default()
        }
    }

    /// Whether another attempt is allowed after `attempt` failed ones.
    pub fn allows_retry(&self, attempt: u32) -> bool {
        self.enabled && attempt < self.max_retries
    }

    pub fn should_retry_status(&self, status: u16) -> bool {
        self.retry_on_status.contains(&status)
    }

    /// Timeouts and refused connections are transient; other transport
    /// failures (bad body, TLS, redirects) are not.
    pub fn should_retry_error(&self, error: &HttpError) -> bool {
        match error.kind() {
            HttpErrorKind::Timeout => self.retry_on_timeout,
            HttpErrorKind::Connect => self.retry_on_connect,
            HttpErrorKind::Other => false,
        }
    }

    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        self.backoff.delay(attempt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exponential_delay_doubles_until_the_cap() {
        let backoff = Backoff::Exponential {
            base: Duration::from_millis(250),
            factor: 2.0,
            max: Duration::from_secs(1),
            jitter: false,
        };

        let delays = (0..4).map(|attempt| backoff.delay(attempt)).collect::<Vec<_>>();
        assert_eq!(
            delays,
            vec![
                Duration::from_millis(250),
                Duration::from_millis(500),
                Duration::from_secs(1),
                Duration::from_secs(1),
            ]
        );
    }

    #[test]
    fn jittered_delay_stays_within_half_either_side() {
        let backoff = Backoff::Exponential {
            base: Duration::from_millis(400),
            factor: 1.0,
            max: Duration::from_secs(1),
            jitter: true,
        };

        for _ in 0..32 {
            let delay = backoff.delay(0);
            assert!(delay >= Duration::from_millis(200), "{delay:?}");
            assert!(delay < Duration::from_millis(600), "{delay:?}");
        }
    }

    #[test]
    fn retries_stop_after_the_budget() {
        let config = RetryConfig::fixed(Duration::from_millis(5), 2);

        assert!(config.allows_retry(0));
        assert!(config.allows_retry(1));
        assert!(!config.allows_retry(2));
        assert_eq!(config.delay_for_attempt(7), Duration::from_millis(5));
    }

    #[test]
    fn disabled_policy_never_retries() {
        let config = RetryConfig::no_retry();
        assert!(!config.allows_retry(0));
    }

    #[test]
    fn default_policy_retries_overload_statuses_only() {
        let config = RetryConfig::default();

        assert!(config.should_retry_status(503));
        assert!(config.should_retry_status(429));
        assert!(!config.should_retry_status(404));
        assert!(!config.should_retry_status(401));
    }

    #[test]
    fn only_timeouts_and_connect_failures_are_transient() {
        let config = RetryConfig::default();

        assert!(config.should_retry_error(&HttpError::timeout("slow")));
        assert!(config.should_retry_error(&HttpError::connect("refused")));
        assert!(!config.should_retry_error(&HttpError::new("could not read response body")));

        let config = RetryConfig {
            retry_on_connect: false,
            ..RetryConfig::default()
        };
        assert!(!config.should_retry_error(&HttpError::connect("refused")));
    }
}
