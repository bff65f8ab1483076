//! Reading values out of redirect responses.

use reqwest::{Url, header};
use sdamgia_core::Error;

use super::FetchResponse;

/// Raw `Location` header of a response.
pub fn location(response: &FetchResponse) -> Result<&str, Error> {
    response
        .headers
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| Error::MissingLocation(response.url.to_string()))
}

/// Resolve a `Location` value against the subject origin.
pub fn resolve_location(origin: &Url, location: &str) -> Result<Url, Error> {
    origin
        .join(location)
        .map_err(|e| Error::InvalidRedirect(format!("{location}: {e}")))
}

/// Extract the numeric test id from a test-generation redirect.
///
/// The `id` query parameter must be present and consist of ASCII digits only.
pub fn test_id_from_location(origin: &Url, location: &str) -> Result<String, Error> {
    let url = resolve_location(origin, location)?;

    let id = url
        .query_pairs()
        .find(|(key, _)| key == "id")
        .map(|(_, value)| value.into_owned())
        .unwrap_or_default();

    if id.is_empty() || !id.chars().all(|c| c.is_ascii_digit()) {
        return Err(Error::InvalidRedirect(format!(
            "failed to parse generated test id from redirect: {location}"
        )));
    }

    Ok(id)
}
