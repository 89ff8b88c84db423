//! Extraction of caching metadata from origin response headers.
//!
//! Parsing is best-effort: malformed values are skipped (and logged) rather
//! than reported, so a bad header never prevents a response from being used.

use std::time::{Duration, SystemTime};

use http::{
    HeaderMap,
    header::{AGE, CACHE_CONTROL, CONTENT_LENGTH, ETAG, LAST_MODIFIED},
};
use tracing::debug;

use crate::{
    clock::{Clock, SystemClock},
    entry::CacheEntry,
};

/// The `Cache-Control` directives that drive entry decisions.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CacheControl {
    pub max_age: Option<i64>,
    pub no_cache: bool,
    pub must_revalidate: bool,
    pub no_store: bool,
}

impl CacheControl {
    /// Parse a (possibly combined) `Cache-Control` value.
    ///
    /// Unknown directives are ignored. A `max-age` that is not an integer is
    /// dropped; the last valid one wins. A digit string too large for `i64`
    /// saturates to `i64::MAX` (RFC 9111 §1.2.2).
    pub fn parse(value: &str) -> Self {
        let mut cc = CacheControl::default();

        for part in value.split(',') {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }

            let (name, arg) = match part.split_once('=') {
                Some((name, arg)) => (name.trim(), Some(unquote(arg.trim()))),
                None => (part, None),
            };

            if name.eq_ignore_ascii_case("max-age") {
                match arg.and_then(parse_delta_seconds) {
                    Some(secs) => cc.max_age = Some(secs),
                    None => debug!(
                        target: "stalewise::directives",
                        directive = %part,
                        "Ignoring malformed max-age"
                    ),
                }
            } else if name.eq_ignore_ascii_case("no-cache") {
                cc.no_cache = true;
            } else if name.eq_ignore_ascii_case("must-revalidate") {
                cc.must_revalidate = true;
            } else if name.eq_ignore_ascii_case("no-store") {
                cc.no_store = true;
            }
        }

        cc
    }
}

fn parse_delta_seconds(value: &str) -> Option<i64> {
    match value.parse::<i64>() {
        Ok(secs) => Some(secs),
        Err(_) if !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit()) => Some(i64::MAX),
        Err(_) => None,
    }
}

fn unquote(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}

/// Caching metadata read from a response's headers.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResponseMetadata {
    pub etag: Option<String>,
    pub last_modified: Option<SystemTime>,
    pub age: Option<Duration>,
    pub content_length: Option<u64>,
    /// `None` when the response carried no `Cache-Control` header at all.
    pub cache_control: Option<CacheControl>,
}

impl ResponseMetadata {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let etag = header_str(headers, ETAG)
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string);

        let last_modified = header_str(headers, LAST_MODIFIED).and_then(|raw| {
            match httpdate::parse_http_date(raw.trim()) {
                Ok(ts) => Some(ts),
                Err(_) => {
                    debug!(
                        target: "stalewise::directives",
                        value = %raw,
                        "Ignoring unparsable Last-Modified"
                    );
                    None
                }
            }
        });

        let age = parse_u64(headers, AGE).map(Duration::from_secs);
        let content_length = parse_u64(headers, CONTENT_LENGTH);

        let mut combined = String::new();
        for value in headers.get_all(CACHE_CONTROL) {
            let Ok(value) = value.to_str() else {
                continue;
            };
            if !combined.is_empty() {
                combined.push(',');
            }
            combined.push_str(value);
        }
        let cache_control = if headers.contains_key(CACHE_CONTROL) {
            Some(CacheControl::parse(&combined))
        } else {
            None
        };

        Self {
            etag,
            last_modified,
            age,
            content_length,
            cache_control,
        }
    }

    pub fn has_validator(&self) -> bool {
        self.etag.is_some() || self.last_modified.is_some()
    }

    /// The freshness lifetime to apply: `max-age` when given, else `default_max_age`.
    pub fn max_age_or(&self, default_max_age: i64) -> i64 {
        self.cache_control
            .as_ref()
            .and_then(|cc| cc.max_age)
            .unwrap_or(default_max_age)
    }

    /// Copy validators and directives onto `entry`, then set its max-age.
    pub fn apply<R, C: Clock>(&self, entry: &mut CacheEntry<R, C>, default_max_age: i64) {
        entry.etag = self.etag.clone();
        entry.last_modified = self.last_modified;
        entry.age = self.age;
        entry.content_length = self.content_length;

        if let Some(cc) = &self.cache_control {
            entry.no_cache = cc.no_cache;
            entry.must_revalidate = cc.must_revalidate;
        }

        entry.set_max_age(self.max_age_or(default_max_age));
    }
}

fn header_str(headers: &HeaderMap, name: http::header::HeaderName) -> Option<&str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

fn parse_u64(headers: &HeaderMap, name: http::header::HeaderName) -> Option<u64> {
    let raw = header_str(headers, name.clone())?;
    match raw.trim().parse::<u64>() {
        Ok(n) => Some(n),
        Err(_) => {
            debug!(
                target: "stalewise::directives",
                header = %name,
                value = %raw,
                "Ignoring non-numeric header"
            );
            None
        }
    }
}

impl<R> CacheEntry<R, SystemClock> {
    /// Build an entry for `response` from its headers, using max-age 0 when
    /// `Cache-Control` gives none.
    pub fn from_response(response: R, headers: &HeaderMap) -> Self {
        let mut entry = CacheEntry::new(response);
        ResponseMetadata::from_headers(headers).apply(&mut entry, 0);
        entry
    }
}
