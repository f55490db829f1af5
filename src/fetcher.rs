//! Historical data source fetching with ordered fallback
//!
//! Sources are attempted strictly in order. A source is abandoned on the first
//! problem (timeout, connection error, non-2xx status, unusable content) and the
//! next one is tried; there are no retries within a source. Nothing escapes as an
//! error: every failure becomes a [`SourceDiagnostic`].

use crate::config::FetchConfig;
use crate::error::{Error, RefreshFailure, Result, SourceDiagnostic, SourceError};
use tracing::{debug, info, warn};

/// Fetches page bodies from historical data sources
#[derive(Clone, Debug)]
pub struct SourceFetcher {
    /// HTTP client with the configured timeout and User-Agent
    http_client: reqwest::Client,
}

impl SourceFetcher {
    /// Create a fetcher from the fetch configuration
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created
    pub fn new(config: &FetchConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(Error::Network)?;

        Ok(Self { http_client })
    }

    /// Fetch one source and decode its body as UTF-8
    ///
    /// The declared charset is ignored: draw tables from these sources are UTF-8 even
    /// when headers claim otherwise, and invalid sequences are replaced rather than
    /// failing the whole page.
    ///
    /// # Errors
    /// Returns [`SourceError::Transport`] on timeout, connection failure, non-2xx
    /// status or an unreadable body.
    pub async fn fetch(&self, source: &str) -> std::result::Result<String, SourceError> {
        debug!(source, "Fetching historical data source");

        let response = self.http_client.get(source).send().await?;

        // Check HTTP status before reading the body
        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Transport(format!("HTTP {}", status.as_u16())));
        }

        let bytes = response.bytes().await?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Try each source in order until `accept` turns a body into a value
    ///
    /// `accept` decides whether a fetched body is usable; if it rejects the body the
    /// next source is attempted, exactly as for a transport failure.
    ///
    /// # Returns
    /// The first accepted source and value, or a [`RefreshFailure`] with one
    /// diagnostic per attempted source.
    pub async fn fetch_with_fallback<T, F>(
        &self,
        sources: &[String],
        mut accept: F,
    ) -> std::result::Result<(String, T), RefreshFailure>
    where
        F: FnMut(&str) -> std::result::Result<T, SourceError>,
    {
        let mut diagnostics = Vec::with_capacity(sources.len());

        for source in sources {
            let outcome = match self.fetch(source).await {
                Ok(body) => accept(&body),
                Err(e) => Err(e),
            };

            match outcome {
                Ok(value) => {
                    info!(
                        source = %source,
                        failed_before = diagnostics.len(),
                        "Historical data source accepted"
                    );
                    return Ok((source.clone(), value));
                }
                Err(e) => {
                    warn!(source = %source, error = %e, "Historical data source unusable, trying next");
                    diagnostics.push(SourceDiagnostic {
                        source: source.clone(),
                        error: e,
                    });
                }
            }
        }

        warn!(attempted = diagnostics.len(), "All historical data sources failed");
        Err(RefreshFailure { diagnostics })
    }
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Match, Mock, MockServer, Request, ResponseTemplate};

    /// Matches the whole User-Agent value; `matchers::header` splits it on commas
    struct UserAgentIs(String);

    impl Match for UserAgentIs {
        fn matches(&self, request: &Request) -> bool {
            request
                .headers
                .get("user-agent")
                .and_then(|value| value.to_str().ok())
                == Some(self.0.as_str())
        }
    }

    fn fetcher() -> SourceFetcher {
        SourceFetcher::new(&FetchConfig {
            timeout: Duration::from_millis(500),
            ..FetchConfig::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn fetch_sends_browser_user_agent() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/history"))
            .and(UserAgentIs(FetchConfig::default().user_agent))
            .respond_with(ResponseTemplate::new(200).set_body_string("<table></table>"))
            .expect(1)
            .mount(&mock_server)
            .await;

        let body = fetcher()
            .fetch(&format!("{}/history", mock_server.uri()))
            .await
            .unwrap();

        assert_eq!(body, "<table></table>");
    }

    #[tokio::test]
    async fn fetch_decodes_utf8_regardless_of_charset() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "text/html; charset=ISO-8859-1")
                    .set_body_bytes("期別 特別號".as_bytes()),
            )
            .mount(&mock_server)
            .await;

        let body = fetcher().fetch(&mock_server.uri()).await.unwrap();

        assert_eq!(body, "期別 特別號");
    }

    #[tokio::test]
    async fn fetch_rejects_non_success_status() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&mock_server)
            .await;

        let err = fetcher().fetch(&mock_server.uri()).await.unwrap_err();

        assert_eq!(err, SourceError::Transport("HTTP 503".to_string()));
    }

    #[tokio::test]
    async fn fetch_times_out() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
            .mount(&mock_server)
            .await;

        let err = fetcher().fetch(&mock_server.uri()).await.unwrap_err();

        assert!(err.is_transport());
    }

    #[tokio::test]
    async fn fallback_moves_past_failed_and_rejected_sources() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/down"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/empty"))
            .respond_with(ResponseTemplate::new(200).set_body_string("nothing here"))
            .expect(1)
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/good"))
            .respond_with(ResponseTemplate::new(200).set_body_string("draws"))
            .expect(1)
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/never"))
            .respond_with(ResponseTemplate::new(200).set_body_string("draws"))
            .expect(0)
            .mount(&mock_server)
            .await;

        let sources: Vec<String> = ["/down", "/empty", "/good", "/never"]
            .iter()
            .map(|p| format!("{}{}", mock_server.uri(), p))
            .collect();

        let (source, value) = fetcher()
            .fetch_with_fallback(&sources, |body| {
                if body == "draws" {
                    Ok(body.len())
                } else {
                    Err(SourceError::NoMatchingTable)
                }
            })
            .await
            .unwrap();

        assert_eq!(source, sources[2]);
        assert_eq!(value, 5);
    }

    #[tokio::test]
    async fn fallback_reports_every_attempted_source() {
        let sources = vec![
            // reserved port, connection refused
            "http://127.0.0.1:9/history".to_string(),
            "http://127.0.0.1:9/backup".to_string(),
        ];

        let failure = fetcher()
            .fetch_with_fallback(&sources, |_| Ok(()))
            .await
            .unwrap_err();

        assert_eq!(failure.attempted(), 2);
        assert_eq!(failure.diagnostics[0].source, sources[0]);
        assert_eq!(failure.diagnostics[1].source, sources[1]);
        assert!(failure.diagnostics.iter().all(|d| d.error.is_transport()));
    }
}
