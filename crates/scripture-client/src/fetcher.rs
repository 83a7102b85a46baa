use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Method;
use reqwest::redirect::{Attempt, Policy};
use serde_json::Value;
use url::Url;

use crate::error::FetchError;

/// A single outbound request handed to a [`Fetcher`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    /// HTTP method
    pub method: Method,
    /// Fully built request URL
    pub url: String,
}

impl FetchRequest {
    /// Create a GET request
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: Method::GET,
            url: url.into(),
        }
    }
}

/// Successful response from a [`Fetcher`]
#[derive(Debug, Clone, PartialEq)]
pub struct FetchResponse {
    /// HTTP status code
    pub status: u16,
    /// Parsed JSON body, or a JSON string holding the raw text
    pub body: Value,
}

/// Network capability injected by the host
///
/// Implementations report non-success statuses as [`FetchError::Status`].
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Perform one request
    async fn fetch(&self, request: FetchRequest) -> Result<FetchResponse, FetchError>;
}

/// Settings for [`ReqwestFetcher`]
#[derive(Debug, Clone)]
pub struct FetcherOptions {
    /// Hosts (and their subdomains) requests may reach
    pub network_domains: Vec<String>,
    /// Whole-request timeout, none by default
    pub timeout: Option<Duration>,
    /// User-Agent header override
    pub user_agent: Option<String>,
}

impl Default for FetcherOptions {
    fn default() -> Self {
        Self {
            network_domains: vec![crate::NETWORK_DOMAIN.to_owned()],
            timeout: None,
            user_agent: None,
        }
    }
}

/// Redirect hops followed before giving up
const MAX_REDIRECTS: usize = 10;

/// Whether `host` is one of `network_domains` or a subdomain of one
pub fn is_allowed_host<S: AsRef<str>>(host: &str, network_domains: &[S]) -> bool {
    let host = host.to_ascii_lowercase();

    network_domains.iter().any(|domain| {
        let domain = domain.as_ref().to_ascii_lowercase();
        host == domain || host.ends_with(&format!(".{domain}"))
    })
}

/// [`Fetcher`] backed by `reqwest`, restricted to declared network domains
///
/// The restriction covers every redirect hop, not only the first URL.
#[derive(Clone)]
pub struct ReqwestFetcher {
    http: reqwest::Client,
    network_domains: Vec<String>,
}

impl ReqwestFetcher {
    /// Build the underlying HTTP client
    ///
    /// # Errors
    ///
    /// Returns an error if no network domain is declared or the client cannot be built
    pub fn new(options: FetcherOptions) -> Result<Self, FetchError> {
        if options.network_domains.is_empty() {
            return Err(FetchError::Config("at least one network domain is required".to_owned()));
        }

        let user_agent = options
            .user_agent
            .unwrap_or_else(|| format!("scripture/{}", env!("CARGO_PKG_VERSION")));

        let mut builder = reqwest::Client::builder()
            .user_agent(user_agent)
            .redirect(redirect_policy(options.network_domains.clone()));
        if let Some(timeout) = options.timeout {
            builder = builder.timeout(timeout);
        }

        let http = builder
            .build()
            .map_err(|e| FetchError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            network_domains: options.network_domains,
        })
    }

    /// Refuse hosts outside the declared network domains
    fn check_domain(&self, url: &Url) -> Result<(), FetchError> {
        let host = url
            .host_str()
            .ok_or_else(|| FetchError::Transport(format!("URL has no host: {url}")))?;

        if is_allowed_host(host, &self.network_domains) {
            Ok(())
        } else {
            Err(FetchError::DomainNotAllowed { host: host.to_owned() })
        }
    }
}

impl fmt::Debug for ReqwestFetcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReqwestFetcher")
            .field("network_domains", &self.network_domains)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Fetcher for ReqwestFetcher {
    async fn fetch(&self, request: FetchRequest) -> Result<FetchResponse, FetchError> {
        // Spaces and other characters illegal in a URL get percent-encoded here
        let url = Url::parse(&request.url)
            .map_err(|e| FetchError::Transport(format!("invalid URL '{}': {e}", request.url)))?;

        self.check_domain(&url)?;

        tracing::debug!(method = %request.method, %url, "sending request");

        let response = self
            .http
            .request(request.method, url)
            .send()
            .await
            .map_err(|e| {
                tracing::debug!("request failed: {e}");
                refused_redirect(&e).unwrap_or_else(|| FetchError::Transport(e.to_string()))
            })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| FetchError::Transport(format!("failed to read response body: {e}")))?;
        let body = parse_body(&text);

        if !status.is_success() {
            tracing::debug!(status = status.as_u16(), "remote returned an error status");
            return Err(FetchError::status(status.as_u16(), body));
        }

        Ok(FetchResponse {
            status: status.as_u16(),
            body,
        })
    }
}

/// Follow redirects only while they stay inside the declared network domains
fn redirect_policy(network_domains: Vec<String>) -> Policy {
    Policy::custom(move |attempt: Attempt<'_>| {
        if attempt.previous().len() >= MAX_REDIRECTS {
            return attempt.error("too many redirects");
        }

        let host = attempt.url().host_str().unwrap_or_default().to_owned();
        if is_allowed_host(&host, &network_domains) {
            attempt.follow()
        } else {
            tracing::debug!(%host, "refusing redirect to undeclared host");
            attempt.error(FetchError::DomainNotAllowed { host })
        }
    })
}

/// The domain refusal raised by [`redirect_policy`], if that is what failed
fn refused_redirect(error: &reqwest::Error) -> Option<FetchError> {
    let mut source = std::error::Error::source(error);

    while let Some(inner) = source {
        if let Some(refusal) = inner.downcast_ref::<FetchError>() {
            return Some(refusal.clone());
        }
        source = inner.source();
    }

    None
}

/// Parse a response body as JSON, keeping non-JSON text as a string value
fn parse_body(text: &str) -> Value {
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_owned()))
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn local_fetcher() -> ReqwestFetcher {
        ReqwestFetcher::new(FetcherOptions {
            network_domains: vec!["127.0.0.1".to_owned()],
            ..FetcherOptions::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn returns_json_body() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/john+3:16"))
            .and(query_param("translation", "kjv"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "reference": "John 3:16",
                "text": "For God so loved the world,\n"
            })))
            .mount(&server)
            .await;

        let url = format!("{}/john+3:16?translation=kjv", server.uri());
        let response = local_fetcher().fetch(FetchRequest::get(url)).await.unwrap();

        assert_eq!(response.status, 200);
        assert_eq!(response.body["text"], "For God so loved the world,\n");
    }

    #[tokio::test]
    async fn non_success_status_carries_body() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/nowhere+1:1"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "error": "not found" })))
            .mount(&server)
            .await;

        let url = format!("{}/nowhere+1:1", server.uri());
        let err = local_fetcher().fetch(FetchRequest::get(url)).await.unwrap_err();

        match err {
            FetchError::Status { status, body, message } => {
                assert_eq!(status, 404);
                assert_eq!(body, json!({ "error": "not found" }));
                assert_eq!(message, r#"404 - {"error":"not found"}"#);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn text_body_kept_as_string() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("plain text"))
            .mount(&server)
            .await;

        let response = local_fetcher()
            .fetch(FetchRequest::get(format!("{}/psalm+23", server.uri())))
            .await
            .unwrap();

        assert_eq!(response.body, Value::String("plain text".to_owned()));
    }

    #[tokio::test]
    async fn undeclared_host_is_refused() {
        let fetcher = ReqwestFetcher::new(FetcherOptions::default()).unwrap();

        let err = fetcher
            .fetch(FetchRequest::get("https://example.com/john 3:16"))
            .await
            .unwrap_err();

        assert_eq!(
            err,
            FetchError::DomainNotAllowed {
                host: "example.com".to_owned()
            }
        );
    }

    #[tokio::test]
    async fn redirect_to_undeclared_host_is_refused() {
        let server = MockServer::start().await;
        let port = server.address().port();

        Mock::given(method("GET"))
            .and(path("/john"))
            .respond_with(
                ResponseTemplate::new(302).insert_header("Location", format!("http://localhost:{port}/elsewhere")),
            )
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/elsewhere"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "text": "from undeclared host" })))
            .mount(&server)
            .await;

        let err = local_fetcher()
            .fetch(FetchRequest::get(format!("{}/john", server.uri())))
            .await
            .unwrap_err();

        assert_eq!(
            err,
            FetchError::DomainNotAllowed {
                host: "localhost".to_owned()
            }
        );
    }

    #[tokio::test]
    async fn redirect_within_declared_host_is_followed() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/jn+3:16"))
            .respond_with(ResponseTemplate::new(301).insert_header("Location", format!("{}/john+3:16", server.uri())))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/john+3:16"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "text": "For God so loved" })))
            .mount(&server)
            .await;

        let response = local_fetcher()
            .fetch(FetchRequest::get(format!("{}/jn+3:16", server.uri())))
            .await
            .unwrap();

        assert_eq!(response.body["text"], "For God so loved");
    }

    #[test]
    fn host_matching_ignores_case() {
        assert!(is_allowed_host("API.bible-api.com", &["Bible-API.com"]));
        assert!(is_allowed_host("bible-api.com", &["BIBLE-API.COM".to_owned()]));
        assert!(!is_allowed_host("notbible-api.com", &["bible-api.com"]));
        assert!(!is_allowed_host("bible-api.com.evil.net", &["bible-api.com"]));
    }

    #[test]
    fn subdomains_of_declared_hosts_are_allowed() {
        let fetcher = ReqwestFetcher::new(FetcherOptions::default()).unwrap();

        let sub = Url::parse("https://api.Bible-API.com/john").unwrap();
        assert!(fetcher.check_domain(&sub).is_ok());

        let lookalike = Url::parse("https://evilbible-api.com/john").unwrap();
        assert!(fetcher.check_domain(&lookalike).is_err());
    }

    #[test]
    fn requires_a_network_domain() {
        let err = ReqwestFetcher::new(FetcherOptions {
            network_domains: Vec::new(),
            ..FetcherOptions::default()
        })
        .unwrap_err();

        assert!(matches!(err, FetchError::Config(_)));
    }

    #[tokio::test]
    async fn invalid_url_is_a_transport_error() {
        let err = local_fetcher()
            .fetch(FetchRequest::get("not a url"))
            .await
            .unwrap_err();

        assert!(matches!(err, FetchError::Transport(_)));
    }
}
