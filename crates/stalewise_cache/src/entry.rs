use std::{
    mem,
    time::{Duration, SystemTime, UNIX_EPOCH},
};

use crate::clock::{Clock, SystemClock};

/// Largest freshness lifetime honoured, in seconds (2^31, RFC 9111 §1.2.2).
pub const MAX_FRESHNESS_SECS: u64 = 2_147_483_648;

/// Whether an entry is still inside its freshness window.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Freshness {
    Fresh,
    Stale,
}

impl Freshness {
    pub fn as_str(self) -> &'static str {
        match self {
            Freshness::Fresh => "fresh",
            Freshness::Stale => "stale",
        }
    }
}

/// A cached response plus the metadata needed to decide how it may be used.
///
/// The three decision queries ([`has_expired`](Self::has_expired),
/// [`can_use_on_error`](Self::can_use_on_error) and
/// [`should_revalidate`](Self::should_revalidate)) are recomputed from the
/// stored fields and the clock on every call. Nothing caches a "current state",
/// so an entry only ever moves from fresh to stale.
///
/// Validators and directives are plain fields and may be assigned by the
/// owner once it knows them. `created`, `max_age` and `expires` are private:
/// `expires` is always derived from `created` and the last
/// [`set_max_age`](Self::set_max_age) call.
#[derive(Clone, Debug)]
pub struct CacheEntry<R, C = SystemClock> {
    created: SystemTime,
    response: R,
    /// Entity tag as sent by the origin, quotes and weak prefix included.
    pub etag: Option<String>,
    pub last_modified: Option<SystemTime>,
    /// Once stale, the entry must not be served on error without revalidation.
    pub must_revalidate: bool,
    /// The entry must be revalidated before every use.
    pub no_cache: bool,
    /// Informational only; never consulted by the decisions.
    pub age: Option<Duration>,
    max_age: i64,
    expires: SystemTime,
    pub content_length: Option<u64>,
    clock: C,
}

impl<R> CacheEntry<R, SystemClock> {
    /// Wrap `response`, stamping `created` from the system clock.
    ///
    /// Until [`set_max_age`](Self::set_max_age) is called the entry reports
    /// itself as expired.
    pub fn new(response: R) -> Self {
        Self::with_clock(response, SystemClock)
    }
}

impl<R, C: Clock> CacheEntry<R, C> {
    pub fn with_clock(response: R, clock: C) -> Self {
        Self {
            created: clock.now(),
            response,
            etag: None,
            last_modified: None,
            must_revalidate: false,
            no_cache: false,
            age: None,
            max_age: 0,
            expires: UNIX_EPOCH,
            content_length: None,
            clock,
        }
    }

    /// Record the origin's freshness lifetime and recompute `expires`.
    ///
    /// A non-positive lifetime means "never fresh": `expires` is pinned one
    /// second before `created`.
    pub fn set_max_age(&mut self, seconds: i64) {
        self.max_age = seconds;
        self.expires = if seconds > 0 {
            let secs = (seconds as u64).min(MAX_FRESHNESS_SECS);
            self.created
                .checked_add(Duration::from_secs(secs))
                .unwrap_or(self.created)
        } else {
            self.created
                .checked_sub(Duration::from_secs(1))
                .unwrap_or(UNIX_EPOCH)
        };
    }

    /// True once the clock is strictly past `expires`.
    pub fn has_expired(&self) -> bool {
        self.clock.now() > self.expires
    }

    /// May this entry be served as a fallback when the origin fails?
    ///
    /// `no-cache` entries never are. `must-revalidate` entries are only while
    /// still fresh. Everything else is a usable last-known-good copy.
    pub fn can_use_on_error(&self) -> bool {
        !self.no_cache && !(self.must_revalidate && self.has_expired())
    }

    /// Must the caller issue a conditional request before serving this entry?
    ///
    /// Independent of `must_revalidate`, which only matters on the error path.
    pub fn should_revalidate(&self) -> bool {
        self.no_cache || self.has_expired()
    }

    pub fn freshness(&self) -> Freshness {
        if self.has_expired() {
            Freshness::Stale
        } else {
            Freshness::Fresh
        }
    }

    /// How long the entry has been stale, or `None` while it is fresh.
    pub fn staleness(&self) -> Option<Duration> {
        let now = self.clock.now();
        if now > self.expires {
            now.duration_since(self.expires).ok()
        } else {
            None
        }
    }

    /// Time elapsed since the entry was created.
    pub fn current_age(&self) -> Duration {
        self.clock
            .now()
            .duration_since(self.created)
            .unwrap_or_default()
    }
}

impl<R, C> CacheEntry<R, C> {
    pub fn created(&self) -> SystemTime {
        self.created
    }

    pub fn expires(&self) -> SystemTime {
        self.expires
    }

    /// Last value passed to `set_max_age`, in seconds.
    pub fn max_age(&self) -> i64 {
        self.max_age
    }

    pub fn response(&self) -> &R {
        &self.response
    }

    /// Swap in a new payload, returning the previous one.
    pub fn replace_response(&mut self, response: R) -> R {
        mem::replace(&mut self.response, response)
    }

    pub fn into_response(self) -> R {
        self.response
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }
}
