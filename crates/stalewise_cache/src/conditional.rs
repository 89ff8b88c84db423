use http::{
    HeaderMap, HeaderValue, StatusCode,
    header::{IF_MODIFIED_SINCE, IF_NONE_MATCH},
};
use httpdate::fmt_http_date;

use crate::entry::CacheEntry;

/// Request headers that ask the origin whether `entry` is still current.
///
/// Empty when the entry carries no validator. An ETag that is not a valid
/// header value is left out.
pub fn conditional_headers<R, C>(entry: &CacheEntry<R, C>) -> HeaderMap {
    let mut headers = HeaderMap::new();

    if let Some(etag) = entry.etag.as_deref() {
        if let Ok(value) = HeaderValue::from_str(etag) {
            headers.insert(IF_NONE_MATCH, value);
        }
    }

    if let Some(last_modified) = entry.last_modified {
        if let Ok(value) = HeaderValue::from_str(&fmt_http_date(last_modified)) {
            headers.insert(IF_MODIFIED_SINCE, value);
        }
    }

    headers
}

/// Did the origin confirm the cached copy (304)?
pub fn is_not_modified(status: StatusCode) -> bool {
    status == StatusCode::NOT_MODIFIED
}

#[cfg(test)]
mod tests {
    use super::{conditional_headers, is_not_modified};
    use crate::entry::CacheEntry;
    use http::{
        StatusCode,
        header::{IF_MODIFIED_SINCE, IF_NONE_MATCH},
    };
    use std::time::{Duration, UNIX_EPOCH};

    #[test]
    fn no_validators_no_headers() {
        let entry = CacheEntry::new(());
        assert!(conditional_headers(&entry).is_empty());
    }

    #[test]
    fn both_validators_are_sent() {
        let mut entry = CacheEntry::new(());
        entry.etag = Some("W/\"42\"".to_string());
        entry.last_modified = Some(UNIX_EPOCH + Duration::from_secs(784_111_777));

        let headers = conditional_headers(&entry);
        assert_eq!(headers.get(IF_NONE_MATCH).expect("if-none-match"), "W/\"42\"");
        assert_eq!(
            headers.get(IF_MODIFIED_SINCE).expect("if-modified-since"),
            "Sun, 06 Nov 1994 08:49:37 GMT"
        );
    }

    #[test]
    fn invalid_etag_is_skipped() {
        let mut entry = CacheEntry::new(());
        entry.etag = Some("bad\nvalue".to_string());
        assert!(conditional_headers(&entry).get(IF_NONE_MATCH).is_none());
    }

    #[test]
    fn not_modified_status() {
        assert!(is_not_modified(StatusCode::NOT_MODIFIED));
        assert!(!is_not_modified(StatusCode::OK));
        assert!(!is_not_modified(StatusCode::BAD_GATEWAY));
    }
}
