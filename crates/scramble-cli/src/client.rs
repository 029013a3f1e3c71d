//! Async HTTP client wrapping the scramblelist JSON API.

use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use reqwest::{Client, RequestBuilder, Response};
use scramble_core::{
  exchange::{Exchange, ExchangeSummary},
  participant::Participant,
};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use uuid::Uuid;

/// Connection settings for the scramblelist API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
  pub base_url: String,
  pub username: String,
  pub password: String,
}

/// Server status as reported by `GET /api/health`.
#[derive(Debug, Deserialize)]
pub struct Health {
  pub status: String,
  pub store:  String,
}

#[derive(Serialize)]
struct NewParticipantBody<'a> {
  name:  &'a str,
  email: Option<&'a str>,
}

/// Body for `POST /api/exchanges`.
#[derive(Debug, Default, Serialize)]
pub struct NewExchangeBody {
  pub title:           String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub description:     Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub participant_ids: Option<Vec<Uuid>>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub from_exchange:   Option<Uuid>,
}

#[derive(Deserialize)]
struct Cleared {
  removed: usize,
}

#[derive(Deserialize)]
struct ErrorBody {
  error: String,
}

/// Async HTTP client for the scramblelist JSON REST API.
///
/// Cheap to clone — the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct ApiClient {
  client: Client,
  config: ApiConfig,
}

impl ApiClient {
  pub fn new(config: ApiConfig) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .build()
      .context("failed to build HTTP client")?;
    Ok(Self { client, config })
  }

  fn url(&self, path: &str) -> String {
    format!(
      "{}/api{}",
      self.config.base_url.trim_end_matches('/'),
      path
    )
  }

  fn auth(&self, req: RequestBuilder) -> RequestBuilder {
    if self.config.username.is_empty() {
      req
    } else {
      req.basic_auth(&self.config.username, Some(&self.config.password))
    }
  }

  /// Send `req`, turning non-2xx statuses into errors carrying the server's
  /// `{"error": ...}` message when there is one.
  async fn send(&self, req: RequestBuilder, what: &str) -> Result<Response> {
    let resp = self
      .auth(req)
      .send()
      .await
      .with_context(|| format!("{what} failed"))?;

    let status = resp.status();
    if status.is_success() {
      return Ok(resp);
    }
    let detail = resp
      .json::<ErrorBody>()
      .await
      .map(|b| b.error)
      .unwrap_or_else(|_| status.canonical_reason().unwrap_or("error").to_owned());
    Err(anyhow!("{what} → {status}: {detail}"))
  }

  async fn json<T: DeserializeOwned>(&self, req: RequestBuilder, what: &str) -> Result<T> {
    self
      .send(req, what)
      .await?
      .json()
      .await
      .with_context(|| format!("deserialising response to {what}"))
  }

  // ── Health ────────────────────────────────────────────────────────────────

  /// `GET /api/health`
  pub async fn health(&self) -> Result<Health> {
    self
      .json(self.client.get(self.url("/health")), "GET /health")
      .await
  }

  // ── Participants ──────────────────────────────────────────────────────────

  /// `GET /api/participants`
  pub async fn list_participants(&self) -> Result<Vec<Participant>> {
    self
      .json(self.client.get(self.url("/participants")), "GET /participants")
      .await
  }

  /// `POST /api/participants`
  pub async fn add_participant(&self, name: &str, email: Option<&str>) -> Result<Participant> {
    let body = NewParticipantBody { name, email };
    self
      .json(
        self.client.post(self.url("/participants")).json(&body),
        "POST /participants",
      )
      .await
  }

  /// `DELETE /api/participants/{id}`
  pub async fn remove_participant(&self, id: Uuid) -> Result<()> {
    self
      .send(
        self.client.delete(self.url(&format!("/participants/{id}"))),
        "DELETE /participants/{id}",
      )
      .await?;
    Ok(())
  }

  /// `DELETE /api/participants`
  pub async fn clear_participants(&self) -> Result<usize> {
    let cleared: Cleared = self
      .json(self.client.delete(self.url("/participants")), "DELETE /participants")
      .await?;
    Ok(cleared.removed)
  }

  // ── Exchanges ─────────────────────────────────────────────────────────────

  /// `GET /api/exchanges`
  pub async fn list_exchanges(&self) -> Result<Vec<ExchangeSummary>> {
    self
      .json(self.client.get(self.url("/exchanges")), "GET /exchanges")
      .await
  }

  /// `GET /api/exchanges/{id}`
  pub async fn get_exchange(&self, id: Uuid) -> Result<Exchange> {
    self
      .json(
        self.client.get(self.url(&format!("/exchanges/{id}"))),
        "GET /exchanges/{id}",
      )
      .await
  }

  /// `POST /api/exchanges`
  pub async fn create_exchange(&self, body: &NewExchangeBody) -> Result<Exchange> {
    self
      .json(
        self.client.post(self.url("/exchanges")).json(body),
        "POST /exchanges",
      )
      .await
  }
}
