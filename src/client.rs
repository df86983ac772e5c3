//! HTTP client for communicating with calgrid-server

use std::process::{Command, Stdio};
use std::time::Duration;

use anyhow::{Context, Result};
use calgrid_core::layout::VisibleRange;
use calgrid_core::{CalgridConfig, Event, EventDraft, EventPatch};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

const MAX_RETRIES: u32 = 10;
const RETRY_DELAY_MS: u64 = 200;

/// HTTP client for calgrid-server
pub struct Client {
    http: reqwest::Client,
    base_url: String,
}

#[derive(Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl Client {
    /// Connect to the configured server, starting calgrid-server if it isn't running
    pub async fn connect(config: &CalgridConfig) -> Result<Self> {
        let client = Self::new(config);

        if client.health_check().await.is_ok() {
            return Ok(client);
        }

        debug!(url = %client.base_url, "server not reachable, starting calgrid-server");
        start_server(config.port)?;

        for _ in 0..MAX_RETRIES {
            tokio::time::sleep(Duration::from_millis(RETRY_DELAY_MS)).await;
            if client.health_check().await.is_ok() {
                return Ok(client);
            }
        }

        anyhow::bail!(
            "Failed to connect to calgrid-server at {} after starting it",
            client.base_url
        )
    }

    fn new(config: &CalgridConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.api_url(),
        }
    }

    async fn health_check(&self) -> Result<()> {
        self.http
            .get(format!("{}/health", self.base_url))
            .timeout(Duration::from_secs(2))
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    /// GET /events for every day touched by `range`
    pub async fn list_events(&self, range: &VisibleRange) -> Result<Vec<Event>> {
        let url = format!(
            "{}/events?start={}&end={}",
            self.base_url,
            range.start.format("%Y-%m-%d"),
            range.end.format("%Y-%m-%d")
        );
        let resp = self
            .http
            .get(url)
            .send()
            .await
            .context("Failed to connect to server")?;
        parse_response(resp).await
    }

    /// GET /events/:id
    pub async fn get_event(&self, id: &str) -> Result<Event> {
        let resp = self
            .http
            .get(format!("{}/events/{}", self.base_url, id))
            .send()
            .await
            .context("Failed to connect to server")?;
        parse_response(resp).await
    }

    /// POST /events
    pub async fn create_event(&self, draft: &EventDraft) -> Result<Event> {
        let resp = self
            .http
            .post(format!("{}/events", self.base_url))
            .json(draft)
            .send()
            .await
            .context("Failed to connect to server")?;
        parse_response(resp).await
    }

    /// PUT /events/:id
    pub async fn update_event(&self, id: &str, patch: &EventPatch) -> Result<Event> {
        let resp = self
            .http
            .put(format!("{}/events/{}", self.base_url, id))
            .json(patch)
            .send()
            .await
            .context("Failed to connect to server")?;
        parse_response(resp).await
    }

    /// DELETE /events/:id
    pub async fn delete_event(&self, id: &str) -> Result<String> {
        let resp = self
            .http
            .delete(format!("{}/events/{}", self.base_url, id))
            .send()
            .await
            .context("Failed to connect to server")?;
        let body: MessageResponse = parse_response(resp).await?;
        Ok(body.message)
    }
}

async fn parse_response<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T> {
    if !resp.status().is_success() {
        let status = resp.status();
        let err: ErrorResponse = resp
            .json()
            .await
            .with_context(|| format!("Server returned {}", status))?;
        anyhow::bail!("{}", err.error);
    }

    Ok(resp.json().await?)
}

/// Spawn calgrid-server on `port`, detached from our stdio.
fn start_server(port: u16) -> Result<()> {
    Command::new("calgrid-server")
        .arg("--port")
        .arg(port.to_string())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .context("Failed to start calgrid-server. Is it installed?")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_follows_configured_port() {
        let mut config = CalgridConfig::default();
        config.port = 4123;
        assert_eq!(Client::new(&config).base_url, "http://127.0.0.1:4123/api");

        config.server_url = Some("http://127.0.0.1:9000/api/".to_string());
        assert_eq!(Client::new(&config).base_url, "http://127.0.0.1:9000/api");
    }
}
