use http::{HeaderMap, Method};
use stalewise_config::CacheConfig;
use tracing::{debug, warn};

use crate::{
    clock::{Clock, SystemClock},
    directives::ResponseMetadata,
    entry::CacheEntry,
};

/// What to do with a cached entry on the normal request path.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RequestAction {
    /// Fresh and cacheable: answer from the cache without contacting the origin.
    ServeCached,
    /// Send a conditional request built from the entry's validators.
    Revalidate,
}

/// What to do with a cached entry once the origin request did not succeed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailureAction {
    /// The origin answered 304; the cached copy is confirmed.
    ServeCached,
    /// The origin failed but the entry is an acceptable fallback.
    ServeStaleOnError,
    /// Nothing usable in the cache; surface the failure.
    Propagate,
}

/// Admission and lookup rules for response caching.
#[derive(Clone, Debug)]
pub struct CachePolicy {
    methods: Vec<Method>,
    require_validator: bool,
    require_cache_control: bool,
    default_max_age: i64,
    max_object_bytes: Option<u64>,
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self::new(&CacheConfig::default())
    }
}

impl CachePolicy {
    pub fn new(cfg: &CacheConfig) -> Self {
        let methods = cfg
            .cacheable_methods()
            .iter()
            .filter_map(|m| match Method::from_bytes(m.trim().as_bytes()) {
                Ok(method) => Some(method),
                Err(_) => {
                    warn!(target: "stalewise::policy", method = %m, "Skipping invalid cacheable method");
                    None
                }
            })
            .collect();

        Self {
            methods,
            require_validator: cfg.require_validator(),
            require_cache_control: cfg.require_cache_control(),
            default_max_age: cfg.default_max_age_secs(),
            max_object_bytes: cfg.max_object_bytes(),
        }
    }

    pub fn is_cacheable(&self, method: &Method) -> bool {
        self.methods.contains(method)
    }

    /// Should a response to `method` carrying `meta` be kept?
    pub fn should_store(&self, method: &Method, meta: &ResponseMetadata) -> bool {
        if !self.is_cacheable(method) {
            return false;
        }

        if self.require_validator && !meta.has_validator() {
            debug!(target: "stalewise::policy", "Cache skip: no validator");
            return false;
        }

        if meta.cache_control.as_ref().is_some_and(|cc| cc.no_store) {
            debug!(target: "stalewise::policy", "Cache skip: no-store");
            return false;
        }

        if self.require_cache_control && meta.cache_control.is_none() {
            debug!(target: "stalewise::policy", "Cache skip: no Cache-Control");
            return false;
        }

        if let (Some(max), Some(len)) = (self.max_object_bytes, meta.content_length) {
            if len > max {
                debug!(
                    target: "stalewise::policy",
                    bytes = len,
                    max_bytes = max,
                    "Cache skip: object too large"
                );
                return false;
            }
        }

        true
    }

    /// Build an entry for `response`, or `None` if it should not be cached.
    pub fn build_entry<R>(
        &self,
        method: &Method,
        response: R,
        headers: &HeaderMap,
    ) -> Option<CacheEntry<R, SystemClock>> {
        self.build_entry_with_clock(method, response, headers, SystemClock)
    }

    pub fn build_entry_with_clock<R, C: Clock>(
        &self,
        method: &Method,
        response: R,
        headers: &HeaderMap,
        clock: C,
    ) -> Option<CacheEntry<R, C>> {
        let meta = ResponseMetadata::from_headers(headers);
        if !self.should_store(method, &meta) {
            return None;
        }

        let mut entry = CacheEntry::with_clock(response, clock);
        meta.apply(&mut entry, self.default_max_age);
        debug!(
            target: "stalewise::policy",
            max_age = entry.max_age(),
            no_cache = entry.no_cache,
            must_revalidate = entry.must_revalidate,
            "Cached response"
        );
        Some(entry)
    }

    /// Normal path: serve from cache or revalidate first.
    pub fn on_request<R, C: Clock>(&self, entry: &CacheEntry<R, C>) -> RequestAction {
        if entry.should_revalidate() {
            RequestAction::Revalidate
        } else {
            RequestAction::ServeCached
        }
    }

    /// Error path: the origin replied 304 (`not_modified`) or failed outright.
    pub fn on_failure<R, C: Clock>(
        &self,
        entry: &CacheEntry<R, C>,
        not_modified: bool,
    ) -> FailureAction {
        if not_modified {
            FailureAction::ServeCached
        } else if entry.can_use_on_error() {
            FailureAction::ServeStaleOnError
        } else {
            FailureAction::Propagate
        }
    }
}
