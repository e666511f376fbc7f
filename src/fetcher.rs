//! HTTP retrieval of article pages.
//!
//! One shared [`reqwest::Client`] is built at startup and reused by every
//! concurrent fetch. Each fetch runs under its own deadline and is never
//! retried.

use crate::analyzer::{ProcessingError, Stage};
use reqwest::Client;
use std::error::Error;
use std::time::{Duration, Instant};
use tokio::time::timeout;
use tracing::{debug, instrument};

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Build the HTTP session shared by all fetches.
///
/// # Errors
///
/// Fails if the TLS backend or connection pool cannot be initialized.
pub fn build_client() -> Result<Client, Box<dyn Error>> {
    let client = Client::builder().user_agent(USER_AGENT).build()?;
    Ok(client)
}

/// Download the body of `url` as text within `deadline`.
///
/// The deadline covers connecting, the response headers and the full body.
/// A non-success status is a fetch error; running out of time is a
/// [`Stage::Fetch`] timeout.
#[instrument(level = "debug", skip_all, fields(%url))]
pub async fn fetch(client: &Client, url: &str, deadline: Duration) -> Result<String, ProcessingError> {
    let t0 = Instant::now();
    let request = async {
        let response = client.get(url).send().await?.error_for_status()?;
        response.text().await
    };

    let body = match timeout(deadline, request).await {
        Ok(Ok(body)) => body,
        Ok(Err(e)) if e.is_timeout() => return Err(ProcessingError::Timeout(Stage::Fetch)),
        Ok(Err(e)) => return Err(ProcessingError::Fetch(e)),
        Err(_elapsed) => return Err(ProcessingError::Timeout(Stage::Fetch)),
    };

    debug!(
        bytes = body.len(),
        elapsed_ms = t0.elapsed().as_millis() as u64,
        "Fetched page"
    );
    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn mock_page(path_str: &str, template: ResponseTemplate) -> (MockServer, String) {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(path_str))
            .respond_with(template)
            .mount(&server)
            .await;
        let url = format!("{}{}", server.uri(), path_str);
        (server, url)
    }

    #[tokio::test]
    async fn test_fetch_returns_body() {
        let (_server, url) =
            mock_page("/article.html", ResponseTemplate::new(200).set_body_string("<p>hi</p>")).await;
        let client = build_client().unwrap();

        let body = fetch(&client, &url, Duration::from_secs(2)).await.unwrap();
        assert_eq!(body, "<p>hi</p>");
    }

    #[tokio::test]
    async fn test_fetch_non_success_status_is_fetch_error() {
        let (_server, url) = mock_page("/not/exist.html", ResponseTemplate::new(404)).await;
        let client = build_client().unwrap();

        let err = fetch(&client, &url, Duration::from_secs(2)).await.unwrap_err();
        assert!(matches!(err, ProcessingError::Fetch(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn test_fetch_past_deadline_is_timeout() {
        let (_server, url) = mock_page(
            "/slow.html",
            ResponseTemplate::new(200)
                .set_body_string("late")
                .set_delay(Duration::from_millis(500)),
        )
        .await;
        let client = build_client().unwrap();

        let err = fetch(&client, &url, Duration::from_millis(100)).await.unwrap_err();
        assert!(matches!(err, ProcessingError::Timeout(Stage::Fetch)), "got {err:?}");
    }

    #[tokio::test]
    async fn test_fetch_connection_refused_is_fetch_error() {
        // Bind then drop a listener to get a port nobody is listening on.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let client = build_client().unwrap();

        let err = fetch(&client, &format!("http://{addr}/"), Duration::from_secs(2))
            .await
            .unwrap_err();
        assert!(matches!(err, ProcessingError::Fetch(_)), "got {err:?}");
    }
}
