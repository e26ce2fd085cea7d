use std::env;
use std::str::FromStr;

use tracing::warn;

use crate::retry::RetryConfig;

pub const DEFAULT_USER_AGENT: &str = concat!("tnb/", env!("CARGO_PKG_VERSION"));
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;
pub const DEFAULT_PAGE_LIMIT: u32 = 100;

/// Settings shared by every request a node client makes.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub user_agent: String,
    pub timeout_ms: u64,
    pub retry: RetryConfig,
    /// Page size requested from list endpoints when a query does not set one.
    pub page_limit: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            retry: RetryConfig::default(),
            page_limit: DEFAULT_PAGE_LIMIT,
        }
    }
}

impl ClientConfig {
    /// Defaults overridden by `TNB_TIMEOUT_MS`, `TNB_USER_AGENT`,
    /// `TNB_PAGE_LIMIT` and `TNB_MAX_RETRIES`. Unparsable values are ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(user_agent) = lookup("TNB_USER_AGENT").filter(|value| !value.trim().is_empty()) {
            config.user_agent = user_agent;
        }
        if let Some(timeout_ms) = parse_var(&lookup, "TNB_TIMEOUT_MS") {
            config.timeout_ms = timeout_ms;
        }
        if let Some(page_limit) = parse_var::<u32>(&lookup, "TNB_PAGE_LIMIT").filter(|limit| *limit > 0) {
            config.page_limit = page_limit;
        }
        if let Some(max_retries) = parse_var(&lookup, "TNB_MAX_RETRIES") {
            config.retry = if max_retries == 0 {
                RetryConfig::no_retry()
            } else {
                RetryConfig::exponential(max_retries)
            };
        }

        config
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }
}

fn parse_var<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(key, value = %raw, "ignoring unparsable environment override");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect::<HashMap<_, _>>();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn overrides_apply_on_top_of_defaults() {
        let config = ClientConfig::from_lookup(lookup_from(&[
            ("TNB_TIMEOUT_MS", "2500"),
            ("TNB_USER_AGENT", "tnb-test/1"),
            ("TNB_PAGE_LIMIT", "20"),
            ("TNB_MAX_RETRIES", "0"),
        ]));

        assert_eq!(config.timeout_ms, 2_500);
        assert_eq!(config.user_agent, "tnb-test/1");
        assert_eq!(config.page_limit, 20);
        assert!(!config.retry.enabled);
    }

    #[test]
    fn unparsable_and_zero_values_fall_back() {
        let config = ClientConfig::from_lookup(lookup_from(&[
            ("TNB_TIMEOUT_MS", "soon"),
            ("TNB_PAGE_LIMIT", "0"),
        ]));

        assert_eq!(config.timeout_ms, DEFAULT_TIMEOUT_MS);
        assert_eq!(config.page_limit, DEFAULT_PAGE_LIMIT);
        assert!(config.user_agent.starts_with("tnb/"));
    }
}
