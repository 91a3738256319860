//! Share URL helpers.

use url::Url;

use crate::error::{Result, ShareError};
use crate::types::SecretId;

/// Append `id` as the last path segment of `base`.
///
/// `https://burn.example/s` and `https://burn.example/s/` both yield
/// `https://burn.example/s/<id>`. Any query or fragment on `base` is dropped.
pub fn share_url(base: &Url, id: &SecretId) -> Result<Url> {
    let mut url = base.clone();
    url.set_query(None);
    url.set_fragment(None);
    url.path_segments_mut()
        .map_err(|_| ShareError::InvalidBaseUrl("URL cannot be a base".to_string()))?
        .pop_if_empty()
        .push(id.as_str());
    Ok(url)
}

/// Extract the share id from the last path segment of `url`.
pub fn id_from_url(url: &Url) -> Result<SecretId> {
    let segment = url
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .ok_or(ShareError::NotFound)?;
    SecretId::parse(segment)
}
