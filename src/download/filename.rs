//! Filename derivation from response headers and URLs.
//!
//! Priority for general downloads:
//! 1. `Content-Disposition` filename parameter
//! 2. Trailing URL path segment
//! 3. `dataset_<YYYYMMDD_HHMMSS>.zip` timestamp fallback
//!
//! Dataset (bulk) downloads skip step 2.

use std::path::Path;

use chrono::{Local, NaiveDateTime};
use reqwest::header::{CONTENT_DISPOSITION, HeaderMap};
use tracing::debug;
use url::Url;

/// Resolves a destination filename for a general download.
#[must_use]
pub fn resolve_filename(headers: &HeaderMap, url: &str) -> String {
    disposition_filename(headers)
        .or_else(|| filename_from_url(url))
        .unwrap_or_else(dataset_fallback_filename)
}

/// Resolves a destination filename for a dataset download.
///
/// Only the `Content-Disposition` header is consulted; the URL path of a
/// dataset API call names the endpoint, not the file.
#[must_use]
pub fn resolve_dataset_filename(headers: &HeaderMap) -> String {
    disposition_filename(headers).unwrap_or_else(dataset_fallback_filename)
}

fn disposition_filename(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(CONTENT_DISPOSITION)?;
    match value.to_str() {
        Ok(text) => parse_content_disposition(text),
        Err(e) => {
            debug!(error = %e, "Content-Disposition is not valid ASCII; ignoring");
            None
        }
    }
}

/// Extracts the filename parameter from a `Content-Disposition` value.
///
/// Handles:
/// - `attachment; filename="example.pdf"`
/// - `attachment; filename=example.pdf`
/// - `attachment; filename*=UTF-8''example.pdf` (RFC 5987, used only when no
///   plain `filename=` is present)
///
/// The value is returned as sent apart from quote stripping.
#[must_use]
pub fn parse_content_disposition(header: &str) -> Option<String> {
    if let Some(pos) = header.rfind("filename=") {
        let value = header[pos + "filename=".len()..].trim();
        let raw = match value.strip_prefix('"') {
            Some(quoted) => quoted.find('"').map_or(quoted, |end| &quoted[..end]),
            None => value.split(';').next().unwrap_or(value),
        };
        let name = raw.trim().trim_matches('"');
        if !name.is_empty() {
            return Some(name.to_string());
        }
    }

    let pos = header.find("filename*=")?;
    let value = header[pos + "filename*=".len()..].trim();
    // Format: charset'language'encoded_value
    let encoded = &value[value.find("''")? + 2..];
    let encoded = encoded.split(';').next().unwrap_or(encoded).trim();
    let decoded = urlencoding::decode(encoded).ok()?;
    (!decoded.is_empty()).then(|| decoded.into_owned())
}

/// Returns the percent-decoded trailing path segment of `url`, if non-empty.
#[must_use]
pub fn filename_from_url(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let last = parsed.path_segments()?.next_back()?;
    if last.is_empty() {
        return None;
    }
    let decoded = urlencoding::decode(last).map_or_else(
        |e| {
            debug!(segment = %last, error = %e, "URL decoding failed, using raw segment");
            last.to_string()
        },
        std::borrow::Cow::into_owned,
    );
    Some(decoded)
}

/// Timestamp-based fallback name using the current local time.
#[must_use]
pub fn dataset_fallback_filename() -> String {
    fallback_filename_at(Local::now().naive_local())
}

pub(crate) fn fallback_filename_at(now: NaiveDateTime) -> String {
    format!("dataset_{}.zip", now.format("%Y%m%d_%H%M%S"))
}

/// Returns the extension of `name` including the leading dot.
#[must_use]
pub fn extension_of(name: &str) -> Option<String> {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty())
        .map(|ext| format!(".{ext}"))
}
