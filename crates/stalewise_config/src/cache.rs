use serde::Deserialize;

// =======================================================
// CACHE CONFIG + DEFAULTS
// =======================================================
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Request methods whose responses may be stored.
    pub cacheable_methods: Vec<String>,
    /// Only store responses carrying an ETag or Last-Modified.
    pub require_validator: bool,
    /// Only store responses carrying a Cache-Control header.
    pub require_cache_control: bool,
    /// Freshness lifetime used when Cache-Control has no max-age.
    /// Zero or negative means "revalidate on every use".
    pub default_max_age_secs: i64,
    /// Skip responses whose Content-Length exceeds this (optional).
    pub max_object_bytes: Option<u64>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            cacheable_methods: vec!["GET".into()],
            require_validator: true,
            require_cache_control: true,
            default_max_age_secs: 0,
            max_object_bytes: None,
        }
    }
}

impl CacheConfig {
    pub fn cacheable_methods(&self) -> &[String] {
        &self.cacheable_methods
    }

    pub fn require_validator(&self) -> bool {
        self.require_validator
    }

    pub fn require_cache_control(&self) -> bool {
        self.require_cache_control
    }

    pub fn default_max_age_secs(&self) -> i64 {
        self.default_max_age_secs
    }

    pub fn max_object_bytes(&self) -> Option<u64> {
        self.max_object_bytes
    }

    pub(crate) fn apply_defaults_from(&mut self, defaults: &CacheConfig) {
        self.cacheable_methods.retain(|m| !m.trim().is_empty());
        if self.cacheable_methods.is_empty() {
            self.cacheable_methods = defaults.cacheable_methods.clone();
        }
        for method in &mut self.cacheable_methods {
            *method = method.trim().to_ascii_uppercase();
        }
    }
}
