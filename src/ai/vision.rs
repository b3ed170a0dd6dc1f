use anyhow::{anyhow, Result};
use base64::Engine as _;
use futures_util::future::join_all;
use reqwest::header::CONTENT_TYPE;
use tracing::{debug, instrument, warn};

use crate::ai::common::Part;

pub const DEFAULT_IMAGE_MIME: &str = "image/jpeg";

/// Download an image and return it as an inline prompt part.
///
/// The MIME type comes from the response when it names an image type and
/// falls back to JPEG otherwise.
#[instrument(level = "trace", skip(http))]
pub async fn fetch_image_part(http: &reqwest::Client, url: &str) -> Result<Part> {
    let resp = http.get(url).send().await?;
    if !resp.status().is_success() {
        return Err(anyhow!("image fetch failed with status {}", resp.status()));
    }
    let mime = resp
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(str::trim)
        .filter(|v| v.starts_with("image/"))
        .unwrap_or(DEFAULT_IMAGE_MIME)
        .to_string();
    let bytes = resp.bytes().await?;
    debug!(url, mime = %mime, size = bytes.len(), "downloaded listing image");
    let encoded = base64::engine::general_purpose::STANDARD.encode(&bytes);
    Ok(Part::inline(mime, encoded))
}

/// Fetch all listing images, keeping their order and skipping failures.
pub async fn fetch_image_parts(http: &reqwest::Client, urls: &[String]) -> Vec<Part> {
    let results = join_all(urls.iter().map(|url| fetch_image_part(http, url))).await;
    results
        .into_iter()
        .zip(urls)
        .filter_map(|(res, url)| match res {
            Ok(part) => Some(part),
            Err(err) => {
                warn!(url = %url, error = %err, "skipping listing image");
                None
            }
        })
        .collect()
}
