//! InfluxDB 1.x time-series driver.
//!
//! Only the single statement deletion needs: `DROP DATABASE`, sent to the
//! HTTP `/query` endpoint.

use crate::error::StoreError;
use crate::traits::{SeriesStore, StoreFuture};

/// InfluxDB HTTP client.
pub struct InfluxSeries {
    http: reqwest::Client,
    base_url: String,
}

impl InfluxSeries {
    /// Creates a client for `http://<host>:<port>`.
    pub fn new(host: &str, port: u16) -> Self {
        Self::with_client(reqwest::Client::new(), host, port)
    }

    /// Creates a client reusing an existing `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, host: &str, port: u16) -> Self {
        Self {
            http,
            base_url: format!("http://{host}:{port}"),
        }
    }

    async fn query(&self, statement: &str) -> Result<(), StoreError> {
        let url = format!("{}/query", self.base_url);
        let resp = self
            .http
            .post(&url)
            .query(&[("q", statement)])
            .send()
            .await
            .map_err(classify_transport_error)?;
        let status = resp.status();
        // A body cut off mid-read says nothing about the statement outcome.
        let body = resp
            .text()
            .await
            .map_err(|e| StoreError::Unavailable(format!("influx response unreadable: {e}")))?;

        if !status.is_success() {
            return Err(StoreError::Backend(format!(
                "influx returned status {}: {body}",
                status.as_u16()
            )));
        }

        check_statement_errors(&body)
    }
}

impl SeriesStore for InfluxSeries {
    fn drop_database<'a>(&'a self, name: &'a str) -> StoreFuture<'a, ()> {
        Box::pin(async move { self.query(&drop_statement(name)).await })
    }
}

/// Builds `DROP DATABASE "<name>"` with the identifier quoted.
fn drop_statement(name: &str) -> String {
    let escaped = name.replace('\\', "\\\\").replace('"', "\\\"");
    format!("DROP DATABASE \"{escaped}\"")
}

fn classify_transport_error(e: reqwest::Error) -> StoreError {
    if e.is_connect() || e.is_timeout() {
        StoreError::Unavailable(e.to_string())
    } else {
        StoreError::Backend(e.to_string())
    }
}

/// InfluxDB reports statement failures inside a 200 response body:
/// `{"results":[{"statement_id":0,"error":"..."}]}`.
///
/// Anything that is not such a body is an error, never a success.
fn check_statement_errors(body: &str) -> Result<(), StoreError> {
    let value = serde_json::from_str::<serde_json::Value>(body)
        .map_err(|e| StoreError::Backend(format!("unexpected influx response body: {e}")))?;
    if !value["results"].is_array() {
        return Err(StoreError::Backend(format!(
            "influx response has no results: {body}"
        )));
    }

    let statement_error = value["results"]
        .as_array()
        .into_iter()
        .flatten()
        .find_map(|r| r["error"].as_str());

    match statement_error {
        None => Ok(()),
        Some(msg) if msg.contains("database not found") => {
            Err(StoreError::NotFound(msg.to_string()))
        }
        Some(msg) => Err(StoreError::Backend(msg.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drop_statement_quotes_name() {
        assert_eq!(drop_statement("user.alice"), r#"DROP DATABASE "user.alice""#);
    }

    #[test]
    fn drop_statement_escapes_quotes() {
        assert_eq!(
            drop_statement(r#"user.a"b"#),
            r#"DROP DATABASE "user.a\"b""#
        );
    }

    #[test]
    fn base_url_from_host_and_port() {
        let influx = InfluxSeries::new("metrics.local", 8086);
        assert_eq!(influx.base_url, "http://metrics.local:8086");
    }

    #[test]
    fn statement_success_body() {
        assert!(check_statement_errors(r#"{"results":[{"statement_id":0}]}"#).is_ok());
    }

    #[test]
    fn statement_error_body() {
        let err = check_statement_errors(
            r#"{"results":[{"statement_id":0,"error":"error authorizing query"}]}"#,
        )
        .unwrap_err();
        assert_eq!(err, StoreError::Backend("error authorizing query".into()));
    }

    #[test]
    fn statement_database_not_found() {
        let err = check_statement_errors(
            r#"{"results":[{"statement_id":0,"error":"database not found: user.x"}]}"#,
        )
        .unwrap_err();
        assert!(err.is_not_found());
    }
    #[test]
    fn non_json_body_is_an_error() {
        let err = check_statement_errors("<html><body>proxy login</body></html>").unwrap_err();
        assert!(matches!(err, StoreError::Backend(_)));
    }

    #[test]
    fn json_without_results_is_an_error() {
        let err = check_statement_errors(r#"{"status":"ok"}"#).unwrap_err();
        assert!(matches!(err, StoreError::Backend(_)));
    }

    /// Serves one canned HTTP response on a local port, then closes.
    async fn serve_once(response: String) -> u16 {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 4096];
            let _ = socket.read(&mut buf).await;
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
        });
        port
    }

    #[tokio::test]
    async fn drop_succeeds_on_results_body() {
        let body = r#"{"results":[{"statement_id":0}]}"#;
        let port = serve_once(format!(
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        ))
        .await;

        InfluxSeries::new("127.0.0.1", port)
            .drop_database("user.alice")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn truncated_body_is_unavailable() {
        let port = serve_once(
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: 64\r\nConnection: close\r\n\r\n{\"results\":[".into(),
        )
        .await;

        let err = InfluxSeries::new("127.0.0.1", port)
            .drop_database("user.alice")
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Unavailable(_)), "{err:?}");
    }

    #[tokio::test]
    async fn html_page_with_200_is_not_a_drop() {
        let port = serve_once(
            "HTTP/1.1 200 OK\r\nContent-Type: text/html\r\nContent-Length: 13\r\nConnection: close\r\n\r\n<html></html>".into(),
        )
        .await;

        let err = InfluxSeries::new("127.0.0.1", port)
            .drop_database("user.alice")
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Backend(_)), "{err:?}");
    }
}
