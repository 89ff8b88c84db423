use std::fmt::{self, Write as _};

use anyhow::Context;
use http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode};
use httpdate::fmt_http_date;
use stalewise_cache::{CacheEntry, CachePolicy, Clock, conditional_headers};
use tracing::debug;

/// Status line and headers of an origin response.
#[derive(Debug)]
pub struct ResponseHead {
    pub status: StatusCode,
    pub headers: HeaderMap,
}

/// Parse a raw HTTP/1.x response head. Anything after the blank line is ignored.
pub fn parse_response_head(bytes: &[u8]) -> anyhow::Result<ResponseHead> {
    let mut headers = [httparse::EMPTY_HEADER; 64];
    let mut resp = httparse::Response::new(&mut headers);
    let parsed = resp.parse(bytes).context("parse http/1 response head")?;
    if parsed.is_partial() {
        anyhow::bail!("incomplete http/1 response head");
    }

    let code = resp.code.context("response has no status code")?;
    let status = StatusCode::from_u16(code).with_context(|| format!("invalid status {code}"))?;

    let mut header_map = HeaderMap::new();
    for header in resp.headers.iter() {
        match (
            HeaderName::from_bytes(header.name.as_bytes()),
            HeaderValue::from_bytes(header.value),
        ) {
            (Ok(name), Ok(value)) => {
                header_map.append(name, value);
            }
            _ => debug!(target: "stalewise::inspect", header = %header.name, "Skipping invalid header"),
        }
    }

    Ok(ResponseHead {
        status,
        headers: header_map,
    })
}

/// Build the entry the policy would store for `head` and describe its decisions.
pub fn describe<C: Clock>(
    policy: &CachePolicy,
    method: &Method,
    head: &ResponseHead,
    clock: C,
) -> Result<String, fmt::Error> {
    let mut out = String::new();
    writeln!(out, "status            = {}", head.status)?;

    if !head.status.is_success() {
        writeln!(out, "stored            = false (status is not 2xx)")?;
        return Ok(out);
    }

    let Some(entry) = policy.build_entry_with_clock(method, (), &head.headers, clock) else {
        writeln!(out, "stored            = false (policy declined)")?;
        return Ok(out);
    };

    writeln!(out, "stored            = true")?;
    write_entry(&mut out, policy, &entry)?;
    Ok(out)
}

fn write_entry<C: Clock>(
    out: &mut String,
    policy: &CachePolicy,
    entry: &CacheEntry<(), C>,
) -> fmt::Result {
    writeln!(out, "etag              = {}", entry.etag.as_deref().unwrap_or("-"))?;
    writeln!(
        out,
        "last_modified     = {}",
        entry.last_modified.map(fmt_http_date).unwrap_or_else(|| "-".into())
    )?;
    writeln!(out, "max_age           = {}s", entry.max_age())?;
    writeln!(out, "expires           = {}", fmt_http_date(entry.expires()))?;
    writeln!(out, "no_cache          = {}", entry.no_cache)?;
    writeln!(out, "must_revalidate   = {}", entry.must_revalidate)?;
    writeln!(out, "freshness         = {}", entry.freshness().as_str())?;
    writeln!(out, "has_expired       = {}", entry.has_expired())?;
    writeln!(out, "should_revalidate = {}", entry.should_revalidate())?;
    writeln!(out, "can_use_on_error  = {}", entry.can_use_on_error())?;
    writeln!(out, "on_request        = {:?}", policy.on_request(entry))?;
    writeln!(out, "on_origin_error   = {:?}", policy.on_failure(entry, false))?;

    for (name, value) in conditional_headers(entry).iter() {
        writeln!(
            out,
            "conditional       = {}: {}",
            name,
            value.to_str().unwrap_or("<binary>")
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{describe, parse_response_head};
    use http::{Method, StatusCode};
    use stalewise_cache::{CachePolicy, ManualClock};
    use std::time::{Duration, UNIX_EPOCH};

    const HEAD: &[u8] = b"HTTP/1.1 200 OK\r\n\
ETag: \"v1\"\r\n\
Last-Modified: Sun, 06 Nov 1994 08:49:37 GMT\r\n\
Cache-Control: max-age=300, must-revalidate\r\n\
Content-Length: 5\r\n\
\r\n\
hello";

    fn clock() -> ManualClock {
        ManualClock::new(UNIX_EPOCH + Duration::from_secs(1_700_000_000))
    }

    #[test]
    fn parses_status_and_headers() {
        let head = parse_response_head(HEAD).expect("valid head");
        assert_eq!(head.status, StatusCode::OK);
        assert_eq!(head.headers.get("etag").expect("etag"), "\"v1\"");
        assert_eq!(head.headers.len(), 4);
    }

    #[test]
    fn incomplete_head_is_an_error() {
        assert!(parse_response_head(b"HTTP/1.1 200 OK\r\nETag: \"v1\"\r\n").is_err());
    }

    #[test]
    fn describes_fresh_entry() {
        let head = parse_response_head(HEAD).expect("valid head");
        let out = describe(&CachePolicy::default(), &Method::GET, &head, clock()).expect("report");

        assert!(out.contains("stored            = true"));
        assert!(out.contains("freshness         = fresh"));
        assert!(out.contains("should_revalidate = false"));
        assert!(out.contains("can_use_on_error  = true"));
        assert!(out.contains("on_request        = ServeCached"));
        assert!(out.contains("if-none-match: \"v1\""));
        assert!(out.contains("if-modified-since: Sun, 06 Nov 1994 08:49:37 GMT"));
    }

    #[test]
    fn declines_post_and_errors() {
        let head = parse_response_head(HEAD).expect("valid head");
        let out = describe(&CachePolicy::default(), &Method::POST, &head, clock()).expect("report");
        assert!(out.contains("stored            = false (policy declined)"));

        let failed = parse_response_head(b"HTTP/1.1 503 Service Unavailable\r\n\r\n")
            .expect("valid head");
        let out = describe(&CachePolicy::default(), &Method::GET, &failed, clock()).expect("report");
        assert!(out.contains("status is not 2xx"));
    }
}
