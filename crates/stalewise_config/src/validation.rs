use std::fmt;

use crate::StalewiseConfig;

/// Findings from checking a loaded config. Errors make the config unusable;
/// warnings flag settings that work but are probably not what was meant.
#[derive(Debug, Default)]
pub struct ConfigReport {
    warnings: Vec<String>,
    errors: Vec<String>,
}

impl ConfigReport {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty()
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    fn warn(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    fn error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }
}

/// One finding per line, errors first: `error: ...` / `warning: ...`.
impl fmt::Display for ConfigReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for err in &self.errors {
            writeln!(f, "  error: {err}")?;
        }
        for warn in &self.warnings {
            writeln!(f, "  warning: {warn}")?;
        }
        Ok(())
    }
}

/// Validate a stalewise configuration and return a report of issues.
pub(crate) fn validate(cfg: &StalewiseConfig) -> ConfigReport {
    let mut report = ConfigReport::default();

    validate_methods(cfg, &mut report);
    validate_freshness(cfg, &mut report);

    report
}

fn validate_methods(cfg: &StalewiseConfig, report: &mut ConfigReport) {
    for method in &cfg.cache.cacheable_methods {
        if method.is_empty() || !method.bytes().all(is_tchar) {
            report.error(format!(
                "cache.cacheable_methods entry '{method}' is not a valid HTTP method"
            ));
        } else if !matches!(method.as_str(), "GET" | "HEAD") {
            report.warn(format!(
                "cache.cacheable_methods includes '{method}'; responses to it are rarely cacheable"
            ));
        }
    }
}

fn validate_freshness(cfg: &StalewiseConfig, report: &mut ConfigReport) {
    if cfg.cache.default_max_age_secs < 0 {
        report.warn(format!(
            "cache.default_max_age_secs is {}; entries without max-age will never be fresh",
            cfg.cache.default_max_age_secs
        ));
    }

    if cfg.cache.max_object_bytes == Some(0) {
        report.warn("cache.max_object_bytes is 0; any response with a body will be skipped");
    }

    if !cfg.cache.require_validator && cfg.cache.default_max_age_secs <= 0 {
        report.warn(
            "cache.require_validator is false and default_max_age_secs <= 0; \
             entries without validators can never be revalidated",
        );
    }
}

/// RFC 9110 token character.
fn is_tchar(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b"!#$%&'*+-.^_`|~".contains(&b)
}

#[cfg(test)]
mod tests {
    use crate::StalewiseConfig;

    #[test]
    fn default_config_is_clean() {
        let report = StalewiseConfig::default().validate();
        assert!(report.is_ok());
        assert!(report.warnings().is_empty());
        assert!(report.is_empty());
        assert!(report.to_string().is_empty());
    }

    #[test]
    fn unusual_settings_warn() {
        let mut cfg = StalewiseConfig::default();
        cfg.cache.cacheable_methods.push("POST".into());
        cfg.cache.default_max_age_secs = -1;
        cfg.cache.max_object_bytes = Some(0);

        let report = cfg.validate();
        assert!(report.is_ok());
        assert_eq!(report.warnings().len(), 3);
        assert!(report.to_string().starts_with("  warning: "));
    }

    #[test]
    fn bad_method_is_an_error() {
        let mut cfg = StalewiseConfig::default();
        cfg.cache.cacheable_methods = vec!["G(ET".into()];

        let report = cfg.validate();
        assert!(report.has_errors());
        assert!(report.to_string().starts_with("  error: "));
        assert!(report.to_string().contains("G(ET"));
    }

    #[test]
    fn relaxed_validator_without_freshness_warns() {
        let mut cfg = StalewiseConfig::default();
        cfg.cache.require_validator = false;

        let report = cfg.validate();
        assert!(report.is_ok());
        assert_eq!(report.warnings().len(), 1);
        assert!(report.warnings()[0].contains("require_validator is false"));

        cfg.cache.default_max_age_secs = 60;
        assert!(cfg.validate().is_empty());
    }
}
