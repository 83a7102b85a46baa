#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

//! Bible verse lookup exposed as the `Bible` formula
//!
//! The formula builds a `bible-api.com` URL from a verse reference and an
//! optional translation, performs a single GET through an injected
//! [`Fetcher`], and returns the `text` field of the response. Every failure
//! is reduced to a [`DisplayError`] meant to be shown to the end user as-is

mod definition;
pub mod error;
mod fetcher;
mod formula;
mod request;
mod verses;

pub use definition::{FormulaDefinition, ParameterDefinition, ValueType, definition};
pub use error::{BibleError, DisplayError, FetchError, Result, normalize};
pub use fetcher::{FetchRequest, FetchResponse, Fetcher, FetcherOptions, ReqwestFetcher, is_allowed_host};
pub use formula::{ExecutionContext, execute};
pub use request::{DEFAULT_BASE_URL, VerseRequest, build_get_url};
pub use verses::get_verses;

/// Name the formula is registered under
pub const FORMULA_NAME: &str = "Bible";

/// The only host the formula is allowed to reach
pub const NETWORK_DOMAIN: &str = "bible-api.com";
