use crate::error::Result;
use crate::fetcher::{FetchRequest, FetchResponse, Fetcher};
use crate::request::VerseRequest;

/// Fetch a passage with exactly one GET, returning the raw response
pub async fn get_verses(fetcher: &dyn Fetcher, base_url: &str, request: &VerseRequest) -> Result<FetchResponse> {
    let url = request.url_from(base_url);

    let response = fetcher.fetch(FetchRequest::get(url)).await?;

    Ok(response)
}
