use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::error::{DisplayError, Result, normalize};
use crate::fetcher::Fetcher;
use crate::request::{DEFAULT_BASE_URL, VerseRequest};
use crate::verses::get_verses;

/// Capabilities available to one formula invocation
#[derive(Clone)]
pub struct ExecutionContext {
    fetcher: Arc<dyn Fetcher>,
    base_url: String,
}

impl ExecutionContext {
    /// Create a context that reaches [`DEFAULT_BASE_URL`] through `fetcher`
    pub fn new(fetcher: Arc<dyn Fetcher>) -> Self {
        Self {
            fetcher,
            base_url: DEFAULT_BASE_URL.to_owned(),
        }
    }

    /// Point lookups at a different endpoint
    ///
    /// The base is concatenated with the verse reference and must end with `/`.
    /// Callers loading it from configuration get this checked by
    /// `scripture_config::Config::validate`.
    ///
    /// # Panics
    ///
    /// In debug builds, if `base_url` does not end with `/`
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        debug_assert!(base_url.ends_with('/'), "base URL '{base_url}' must end with '/'");

        self.base_url = base_url;
        self
    }

    pub fn fetcher(&self) -> &dyn Fetcher {
        self.fetcher.as_ref()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl fmt::Debug for ExecutionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExecutionContext")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

/// Run the `Bible` formula
///
/// Returns the passage text, or the message the user should see.
pub async fn execute(
    context: &ExecutionContext,
    verses: Option<&str>,
    translation: Option<&str>,
) -> std::result::Result<String, DisplayError> {
    lookup(context, verses, translation).await.map_err(|e| normalize(&e))
}

async fn lookup(context: &ExecutionContext, verses: Option<&str>, translation: Option<&str>) -> Result<String> {
    let request = VerseRequest::new(verses.unwrap_or_default(), translation)?;

    let response = get_verses(context.fetcher(), context.base_url(), &request).await?;

    match response.body.get("text").and_then(Value::as_str) {
        Some(text) => Ok(text.to_owned()),
        None => {
            tracing::warn!(verses = request.verses(), "response has no text field");
            Ok(String::new())
        }
    }
}
