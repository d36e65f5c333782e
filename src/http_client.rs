//! Shared construction of the outbound HTTP clients

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};

const USER_AGENT: &str = concat!("farescan/", env!("CARGO_PKG_VERSION"));

/// Timeouts and retry budget for one provider
#[derive(Debug, Clone, Copy)]
pub struct ClientSettings {
    pub connect_timeout: Duration,
    pub timeout: Duration,
    pub max_retries: u32,
}

impl ClientSettings {
    #[must_use]
    pub fn new(connect_timeout_seconds: u32, timeout_seconds: u32, max_retries: u32) -> Self {
        Self {
            connect_timeout: Duration::from_secs(connect_timeout_seconds.into()),
            timeout: Duration::from_secs(timeout_seconds.into()),
            max_retries,
        }
    }
}

/// reqwest client with transient-error retries layered on top.
///
/// With `max_retries == 0` every request is sent exactly once.
pub fn build_client(settings: ClientSettings) -> Result<ClientWithMiddleware> {
    let client = reqwest::Client::builder()
        .connect_timeout(settings.connect_timeout)
        .timeout(settings.timeout)
        .user_agent(USER_AGENT)
        .build()
        .with_context(|| "Failed to create HTTP client")?;

    let retry_policy = ExponentialBackoff::builder().build_with_max_retries(settings.max_retries);

    Ok(ClientBuilder::new(client)
        .with(RetryTransientMiddleware::new_with_policy(retry_policy))
        .build())
}
