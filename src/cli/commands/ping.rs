use std::time::{Duration, Instant};

use anyhow::Context;
use serde_json::{json, Value};

use crate::cli::utils::{output_error, output_success};
use crate::cli::OutputFormat;

pub async fn handle(url: &str, output_format: OutputFormat) -> anyhow::Result<()> {
    let health_url = format!("{}/health", url.trim_end_matches('/'));
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(5))
        .build()?;

    let started = Instant::now();
    let response = client
        .get(&health_url)
        .send()
        .await
        .with_context(|| format!("failed to reach {}", health_url))?;
    let elapsed_ms = started.elapsed().as_millis() as u64;

    let status = response.status();
    let body: Value = response.json().await.unwrap_or(Value::Null);
    let state = body["data"]["status"].as_str().unwrap_or("unknown").to_string();

    if status.is_success() {
        output_success(
            &output_format,
            &format!("{} is {} ({} ms)", url, state, elapsed_ms),
            Some(json!({ "url": url, "status": state, "response_ms": elapsed_ms })),
        )
    } else {
        output_error(
            &output_format,
            &format!("{} responded {} ({})", url, status.as_u16(), state),
            Some("SERVICE_UNAVAILABLE"),
        )?;
        anyhow::bail!("health check failed")
    }
}
