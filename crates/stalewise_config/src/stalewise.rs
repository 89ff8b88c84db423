use serde::Deserialize;

use crate::error::ConfigLoadError;
use crate::validation::{ConfigReport, validate};
use crate::{CacheConfig, GlobalConfig};

// =======================================================
// STALEWISE CONFIG: main config
// =======================================================
#[derive(Debug, Deserialize)]
pub struct StalewiseConfig {
    #[serde(default)]
    pub global: GlobalConfig,

    #[serde(default)]
    pub cache: CacheConfig,
}

impl Default for StalewiseConfig {
    fn default() -> Self {
        let mut cfg = Self {
            global: GlobalConfig::default(),
            cache: CacheConfig::default(),
        };
        cfg.apply_defaults();
        cfg
    }
}

impl StalewiseConfig {
    pub fn global(&self) -> &GlobalConfig {
        &self.global
    }

    pub fn cache(&self) -> &CacheConfig {
        &self.cache
    }

    /// Validate the configuration and return a report of warnings and errors.
    pub fn validate(&self) -> ConfigReport {
        validate(self)
    }

    /// Load a TOML config file. A missing file yields the defaults.
    pub fn from_file(file_name: &str) -> Result<Self, ConfigLoadError> {
        let built = config::Config::builder()
            .add_source(config::File::new(file_name, config::FileFormat::Toml).required(false))
            .build()?;

        Self::from_config(built)
    }

    /// Parse configuration from an in-memory TOML document.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigLoadError> {
        let built = config::Config::builder()
            .add_source(config::File::from_str(contents, config::FileFormat::Toml))
            .build()?;

        Self::from_config(built)
    }

    fn from_config(built: config::Config) -> Result<Self, ConfigLoadError> {
        let mut cfg: StalewiseConfig = built.try_deserialize()?;
        cfg.apply_defaults();

        let report = cfg.validate();
        if report.has_errors() {
            return Err(ConfigLoadError::Invalid(report));
        }
        Ok(cfg)
    }

    pub fn from_file_or_default(file_name: &str) -> Self {
        match Self::from_file(file_name) {
            Ok(cfg) => {
                let report = cfg.validate();
                if !report.warnings().is_empty() {
                    eprintln!("Config warnings in '{file_name}':");
                    eprint!("{report}");
                }
                cfg
            }
            Err(e) => {
                eprintln!("Error reading config '{file_name}': {e}");
                eprintln!("Using default config (in-memory)...");
                StalewiseConfig::default()
            }
        }
    }

    fn apply_defaults(&mut self) {
        let def_global = GlobalConfig::default();
        self.global.apply_defaults_from(&def_global);

        let def_cache = CacheConfig::default();
        self.cache.apply_defaults_from(&def_cache);
    }

    pub fn print(&self) {
        println!("============== STALEWISE CONFIG ==============");
        println!("\n[global]");
        println!("  log_level             = {}", self.global.log_level);
        println!("\n[cache]");
        println!("  cacheable_methods     = {:?}", self.cache.cacheable_methods);
        println!("  require_validator     = {}", self.cache.require_validator);
        println!("  require_cache_control = {}", self.cache.require_cache_control);
        println!("  default_max_age_secs  = {}", self.cache.default_max_age_secs);
        println!("  max_object_bytes      = {:?}", self.cache.max_object_bytes);
        println!("==============================================");
    }
}
