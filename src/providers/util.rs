use crate::core::config::HttpConfig;
use anyhow::Error;
use std::future::Future;
use std::time::Duration;
use tracing::debug;

pub const USER_AGENT: &str = "revchart/0.1";

/// Request policy shared by the HTTP backed providers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestPolicy {
    pub retries: usize,
    pub retry_delay_ms: u64,
    pub timeout: Duration,
}

impl Default for RequestPolicy {
    fn default() -> Self {
        RequestPolicy::from(&HttpConfig::default())
    }
}

impl From<&HttpConfig> for RequestPolicy {
    fn from(config: &HttpConfig) -> Self {
        RequestPolicy {
            retries: config.retries,
            retry_delay_ms: config.retry_delay_ms,
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }
}

impl RequestPolicy {
    pub fn client(&self) -> reqwest::Result<reqwest::Client> {
        reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(self.timeout)
            .build()
    }
}

/// Retries an async operation with configurable attempts and delays
///
/// # Parameters
/// - `operation`: Closure returning a future
/// - `retries`: Number of retry attempts (total runs = 1 initial + retries)
/// - `delay_ms`: Milliseconds between retry attempts
///
/// # Returns
/// Either the successful result or the error after all attempts
pub async fn with_retry<F, Fut, T>(
    mut operation: F,
    retries: usize,
    delay_ms: u64,
) -> Result<T, Error>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, reqwest::Error>>,
{
    let mut attempt = 1;
    loop {
        match operation().await.map_err(anyhow::Error::from) {
            Ok(val) => return Ok(val),
            Err(err) => {
                if attempt > retries {
                    return Err(err);
                }
                debug!(
                    "Attempt {}/{} failed: {}. Retrying...",
                    attempt, retries, err
                );
                attempt += 1;
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_from_config() {
        let config = HttpConfig {
            retries: 1,
            retry_delay_ms: 10,
            timeout_secs: 5,
        };
        let policy = RequestPolicy::from(&config);
        assert_eq!(policy.retries, 1);
        assert_eq!(policy.retry_delay_ms, 10);
        assert_eq!(policy.timeout, Duration::from_secs(5));
        assert_eq!(RequestPolicy::default().retries, 3);
    }

    #[tokio::test]
    async fn test_with_retry_gives_up_after_retries() {
        // Nothing listens on port 9 of the loopback interface
        let client = RequestPolicy::default().client().unwrap();
        let mut calls = 0;
        let result = with_retry(
            || {
                calls += 1;
                client.get("http://127.0.0.1:9/").send()
            },
            2,
            1,
        )
        .await;
        assert!(result.is_err());
        assert_eq!(calls, 3);
    }
}
