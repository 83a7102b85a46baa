use crate::error::{BibleError, Result};

/// Endpoint every verse lookup is made against
pub const DEFAULT_BASE_URL: &str = "https://bible-api.com/";

/// Validated parameters of one verse lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerseRequest {
    verses: String,
    translation: Option<String>,
}

impl VerseRequest {
    /// Validate formula parameters
    ///
    /// An empty `verses` is rejected; an empty `translation` counts as absent.
    pub fn new(verses: &str, translation: Option<&str>) -> Result<Self> {
        if verses.is_empty() {
            return Err(BibleError::MissingParameter);
        }

        Ok(Self {
            verses: verses.to_owned(),
            translation: translation.filter(|t| !t.is_empty()).map(ToOwned::to_owned),
        })
    }

    pub fn verses(&self) -> &str {
        &self.verses
    }

    pub fn translation(&self) -> Option<&str> {
        self.translation.as_deref()
    }

    /// Request URL against [`DEFAULT_BASE_URL`]
    pub fn url(&self) -> String {
        self.url_from(DEFAULT_BASE_URL)
    }

    /// Request URL against `base_url`
    ///
    /// Values are appended verbatim, without percent-encoding.
    pub fn url_from(&self, base_url: &str) -> String {
        let mut url = format!("{base_url}{}", self.verses);

        if let Some(translation) = &self.translation {
            url.push_str("?translation=");
            url.push_str(translation);
        }

        url
    }
}

/// Build the lookup URL for a verse reference and optional translation
pub fn build_get_url(verses: &str, translation: Option<&str>) -> Result<String> {
    Ok(VerseRequest::new(verses, translation)?.url())
}
