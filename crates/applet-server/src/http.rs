use anyhow::{Context, bail};
use reqwest::StatusCode;
use reqwest::blocking::{RequestBuilder, Response};
use reqwest::header::HeaderMap;
use std::thread;
use std::time::Duration;
use tracing::debug;

const MAX_ATTEMPTS: u32 = 3;
const MAX_RETRY_DELAY: Duration = Duration::from_secs(30);

pub(crate) fn send_with_retry<F>(mut build: F) -> anyhow::Result<Response>
where
    F: FnMut() -> RequestBuilder,
{
    for attempt in 1..=MAX_ATTEMPTS {
        let response = build().send().context("send request")?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        if is_retryable(status) && attempt < MAX_ATTEMPTS {
            let delay = retry_after(response.headers())
                .unwrap_or(Duration::from_secs(1))
                .min(MAX_RETRY_DELAY);
            debug!(%status, attempt, delay_secs = delay.as_secs(), "retrying request");
            thread::sleep(delay);
            continue;
        }
        let response = response
            .error_for_status()
            .with_context(|| format!("server returned {status}"))?;
        return Ok(response);
    }
    bail!("request failed after retries");
}

fn is_retryable(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::TOO_MANY_REQUESTS | StatusCode::SERVICE_UNAVAILABLE
    )
}

fn retry_after(headers: &HeaderMap) -> Option<Duration> {
    headers
        .get("retry-after")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
}
