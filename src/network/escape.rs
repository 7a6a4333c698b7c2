//! Percent-encoding of URL query components

use crate::error::QueryError;

/// Escape text for embedding in a URL query component.
///
/// Unreserved characters (`A-Z a-z 0-9 - _ . ~`) are kept, every other byte of
/// the UTF-8 encoding becomes `%XX`.
pub fn escape(text: &str) -> String {
    urlencoding::encode(text).into_owned()
}

/// Reverse [`escape`]
pub fn unescape(text: &str) -> Result<String, QueryError> {
    urlencoding::decode(text)
        .map(|decoded| decoded.into_owned())
        .map_err(|e| QueryError::Decode(e.to_string()))
}
