//! Request execution and response normalization
//!
//! The response body is buffered once at request time; `json()` parses it
//! only when invoked, so a malformed body never fails a call whose caller
//! only wanted the status or a header.

use std::collections::HashMap;

use reqwest::Method;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{Error, Result};

/// Method and headers for a wrapped request.
#[derive(Debug, Clone)]
pub struct RequestSpec {
    pub method: Method,
    pub headers: Vec<(String, String)>,
}

impl RequestSpec {
    /// A GET with no headers — the common case for registry reads.
    pub fn get() -> Self {
        Self {
            method: Method::GET,
            headers: Vec::new(),
        }
    }

    /// Append a header. Later entries with the same name are sent after
    /// earlier ones.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

impl Default for RequestSpec {
    fn default() -> Self {
        Self::get()
    }
}

/// Normalized response shape.
///
/// Header names are lowercased; when the server sends a name twice, the
/// later value wins in the flattened map.
#[derive(Debug)]
pub struct HttpResponse {
    pub url: String,
    pub status: u16,
    pub status_text: String,
    pub headers: HashMap<String, String>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Whether the status is in the 2xx range.
    pub fn succeeded(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_ascii_lowercase()).map(String::as_str)
    }

    /// Parse the buffered body as JSON. Only fails when actually invoked
    /// on a body that is not valid JSON for `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_slice(&self.body)
            .map_err(|e| Error::BodyParse(format!("{} ({e})", self.url)))
    }
}

/// Wrapped HTTP client shared by the auth provider and the registry
/// client.
#[derive(Debug, Clone, Default)]
pub struct HttpClient {
    inner: reqwest::Client,
}

impl HttpClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap a pre-configured reqwest client (timeouts, proxies).
    pub fn with_client(inner: reqwest::Client) -> Self {
        Self { inner }
    }

    /// Execute a request, failing with [`Error::Unauthorized`] on 401.
    pub async fn request(&self, url: &str, spec: RequestSpec) -> Result<HttpResponse> {
        self.request_with(url, spec, true).await
    }

    /// Execute a request. When `raise_on_unauthorized` is false a 401
    /// comes back as a normal response with `succeeded() == false`, which
    /// lets callers read the challenge header off it.
    pub async fn request_with(
        &self,
        url: &str,
        spec: RequestSpec,
        raise_on_unauthorized: bool,
    ) -> Result<HttpResponse> {
        let mut builder = self.inner.request(spec.method.clone(), url);
        for (name, value) in &spec.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let response = builder.send().await?;

        let status = response.status();
        let status_text = status.canonical_reason().unwrap_or_default().to_string();

        let mut headers = HashMap::new();
        for (name, value) in response.headers() {
            headers.insert(
                name.as_str().to_string(),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            );
        }

        let body = response.bytes().await?.to_vec();

        debug!(url, status = status.as_u16(), "registry http response");

        if raise_on_unauthorized && status.as_u16() == 401 {
            return Err(Error::Unauthorized {
                url: url.to_string(),
            });
        }

        Ok(HttpResponse {
            url: url.to_string(),
            status: status.as_u16(),
            status_text,
            headers,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::MockServer;
    use httpmock::prelude::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Catalog {
        repositories: Vec<String>,
    }

    #[tokio::test]
    async fn normalizes_successful_response() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/v2/_catalog");
            then.status(200)
                .header("content-type", "application/json")
                .body(r#"{"repositories":["library/nginx"]}"#);
        });

        let client = HttpClient::new();
        let response = client
            .request(&format!("{}/v2/_catalog", server.base_url()), RequestSpec::get())
            .await
            .unwrap();

        assert_eq!(response.status, 200);
        assert_eq!(response.status_text, "OK");
        assert!(response.succeeded());
        assert_eq!(response.header("Content-Type"), Some("application/json"));

        let catalog: Catalog = response.json().unwrap();
        assert_eq!(catalog.repositories, vec!["library/nginx"]);
    }

    #[tokio::test]
    async fn raises_unauthorized_on_401_by_default() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/v2/");
            then.status(401);
        });

        let url = format!("{}/v2/", server.base_url());
        let err = HttpClient::new()
            .request(&url, RequestSpec::get())
            .await
            .unwrap_err();

        match err {
            Error::Unauthorized { url: failed } => assert_eq!(failed, url),
            other => panic!("expected Unauthorized, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn returns_401_normally_when_not_raising() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/v2/");
            then.status(401)
                .header("www-authenticate", r#"Bearer realm="https://auth.example/token", service="registry.example", scope="repository:x:pull""#);
        });

        let response = HttpClient::new()
            .request_with(&format!("{}/v2/", server.base_url()), RequestSpec::get(), false)
            .await
            .unwrap();

        assert_eq!(response.status, 401);
        assert!(!response.succeeded());
        assert!(
            response
                .header("WWW-Authenticate")
                .is_some_and(|h| h.starts_with("Bearer realm="))
        );
    }

    #[tokio::test]
    async fn other_non_2xx_statuses_are_not_raised() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/v2/_catalog");
            then.status(503);
        });

        let response = HttpClient::new()
            .request(&format!("{}/v2/_catalog", server.base_url()), RequestSpec::get())
            .await
            .unwrap();

        assert_eq!(response.status, 503);
        assert!(!response.succeeded());
    }

    #[tokio::test]
    async fn duplicate_headers_flatten_to_the_later_value() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/dup");
            then.status(200)
                .header("x-registry-hint", "first")
                .header("x-registry-hint", "second");
        });

        let response = HttpClient::new()
            .request(&format!("{}/dup", server.base_url()), RequestSpec::get())
            .await
            .unwrap();

        assert_eq!(response.header("x-registry-hint"), Some("second"));
    }

    #[tokio::test]
    async fn json_parse_fails_only_when_invoked() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/broken");
            then.status(200).body("not json at all");
        });

        let response = HttpClient::new()
            .request(&format!("{}/broken", server.base_url()), RequestSpec::get())
            .await
            .unwrap();

        // The call itself succeeded; only the accessor fails.
        assert!(response.succeeded());
        let err = response.json::<Catalog>().unwrap_err();
        assert!(matches!(err, Error::BodyParse(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn configured_headers_are_sent() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/v2/_catalog")
                .header("authorization", "Basic YWxpY2U6czNjcjN0");
            then.status(200).body("{}");
        });

        HttpClient::new()
            .request(
                &format!("{}/v2/_catalog", server.base_url()),
                RequestSpec::get().header("Authorization", "Basic YWxpY2U6czNjcjN0"),
            )
            .await
            .unwrap();

        mock.assert();
    }

    #[tokio::test]
    async fn transport_errors_pass_through() {
        // Nothing listens on this port.
        let err = HttpClient::new()
            .request("http://127.0.0.1:1/v2/", RequestSpec::get())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Transport(_)), "got {err:?}");
    }
}
