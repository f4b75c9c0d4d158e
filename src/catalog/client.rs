use color_eyre::{eyre::eyre, Result};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

use crate::config::Config;

use super::api_types::ApiItem;

/// Errors from a single catalog fetch.
///
/// The cache layer branches on these: transport failures fall back to the
/// stored rows, decode failures surface as opaque errors.
#[derive(Debug, Error)]
pub enum FetchError {
  /// Connection failures, timeouts, and anything else below the body.
  #[error("transport failure: {0}")]
  Transport(String),
  /// The endpoint answered successfully but the body did not parse.
  #[error("malformed catalog response: {0}")]
  Decode(String),
}

impl From<reqwest::Error> for FetchError {
  fn from(err: reqwest::Error) -> Self {
    if err.is_decode() {
      FetchError::Decode(err.to_string())
    } else {
      FetchError::Transport(err.to_string())
    }
  }
}

/// HTTP client for the remote catalog endpoint.
#[derive(Clone)]
pub struct CatalogClient {
  http: reqwest::Client,
  endpoint: Url,
}

impl CatalogClient {
  pub fn new(config: &Config) -> Result<Self> {
    let endpoint = Url::parse(&config.api.url)
      .map_err(|e| eyre!("Invalid catalog URL {}: {}", config.api.url, e))?;

    let timeout = Duration::from_secs(config.api.timeout_secs);
    let http = reqwest::Client::builder()
      .connect_timeout(timeout)
      .timeout(timeout)
      .build()
      .map_err(|e| eyre!("Failed to build HTTP client: {}", e))?;

    Ok(Self { http, endpoint })
  }

  /// Fetch the full catalog with one GET against the configured endpoint.
  ///
  /// Returns `Ok(None)` for a non-2xx status, an empty body, or a JSON
  /// `null` body; all three mean "no data", not an error.
  pub async fn fetch_items(&self) -> Result<Option<Vec<ApiItem>>, FetchError> {
    debug!(url = %self.endpoint, "fetching catalog");

    let response = self.http.get(self.endpoint.clone()).send().await?;

    let status = response.status();
    if !status.is_success() {
      warn!(%status, "catalog endpoint returned non-success status");
      return Ok(None);
    }

    let bytes = response.bytes().await?;
    decode_body(&bytes)
  }
}

/// Decode a successful response body. An absent body (e.g. 204 No Content)
/// means "no data", same as a JSON `null`; only a non-empty body goes
/// through the parser.
fn decode_body(bytes: &[u8]) -> Result<Option<Vec<ApiItem>>, FetchError> {
  if bytes.is_empty() {
    return Ok(None);
  }

  serde_json::from_slice(bytes).map_err(|e| FetchError::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
  use super::*;
  use tokio::io::{AsyncReadExt, AsyncWriteExt};
  use tokio::net::TcpListener;

  async fn serve_once(response: String) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
      let (mut socket, _) = listener.accept().await.unwrap();
      let mut buf = [0u8; 2048];
      let _ = socket.read(&mut buf).await;
      socket.write_all(response.as_bytes()).await.unwrap();
      socket.shutdown().await.ok();
    });
    format!("http://{}", addr)
  }

  fn http_response(status: &str, body: &str) -> String {
    format!(
      "HTTP/1.1 {}\r\nconnection: close\r\ncontent-type: application/json\r\ncontent-length: {}\r\n\r\n{}",
      status,
      body.len(),
      body
    )
  }

  fn client_for(url: &str) -> CatalogClient {
    let config = Config {
      api: crate::config::ApiConfig {
        url: url.to_string(),
        timeout_secs: 2,
      },
      ..Config::default()
    };
    CatalogClient::new(&config).unwrap()
  }

  #[tokio::test]
  async fn fetch_decodes_item_array() {
    let body = r#"[{"id":1,"title":"first","body":"one"},{"id":2,"title":"second","body":"two"}]"#;
    let url = serve_once(http_response("200 OK", body)).await;

    let items = client_for(&url).fetch_items().await.unwrap().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].id, 1);
    assert_eq!(items[1].subtitle, "two");
  }

  #[tokio::test]
  async fn empty_success_body_means_no_data() {
    let url = serve_once("HTTP/1.1 204 No Content\r\nconnection: close\r\n\r\n".to_string()).await;

    let result = client_for(&url).fetch_items().await.unwrap();
    assert!(result.is_none());
  }

  #[tokio::test]
  async fn null_body_means_no_data() {
    let url = serve_once(http_response("200 OK", "null")).await;

    let result = client_for(&url).fetch_items().await.unwrap();
    assert!(result.is_none());
  }

  #[tokio::test]
  async fn non_success_status_means_no_data() {
    let url = serve_once(http_response("500 Internal Server Error", "")).await;

    let result = client_for(&url).fetch_items().await.unwrap();
    assert!(result.is_none());
  }

  #[tokio::test]
  async fn malformed_body_is_a_decode_error() {
    let url = serve_once(http_response("200 OK", "{not json")).await;

    let err = client_for(&url).fetch_items().await.unwrap_err();
    assert!(matches!(err, FetchError::Decode(_)));
  }
}
