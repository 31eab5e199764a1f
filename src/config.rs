//! Configuration management for the resolver
//!
//! Storage layout conventions used by broad-access probing and consent
//! requests, plus the grant table the probe binary hands to its local host.

use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::PathBuf;

/// Complete resolver configuration
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ResolverConfig {
    // ═══ STORAGE LAYOUT ═══
    /// Directory under a storage root holding per-application data
    pub app_data_dir: String,

    /// Canonical storage root, probed first under broad access
    /// Environment: SAF__PRIMARY_STORAGE_ROOT
    pub primary_storage_root: String,

    /// Alternate mount conventions, probed in order after the canonical root
    pub alternate_storage_roots: Vec<String>,

    // ═══ CONSENT REQUESTS ═══
    /// Storage volume named in tree identifiers
    pub volume: String,

    /// Authority of the host's documents provider
    pub documents_authority: String,

    // ═══ LOCAL HOST (probe binary only) ═══
    /// Whether the local host reports broad filesystem access
    /// Environment: SAF__BROAD_ACCESS
    pub broad_access: bool,

    /// Grants the local host reports as persisted
    pub grants: Vec<GrantConfig>,
}

/// A persisted grant and the local directory its tree opens
#[derive(Debug, Deserialize, Clone)]
pub struct GrantConfig {
    pub key: String,
    pub root: String,
    #[serde(default = "default_true")]
    pub read: bool,
    #[serde(default = "default_true")]
    pub write: bool,
}

fn default_true() -> bool {
    true
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            app_data_dir: "Android/data".to_string(),
            primary_storage_root: "/storage/emulated/0".to_string(),
            alternate_storage_roots: vec!["/sdcard".to_string()],
            volume: "primary".to_string(),
            documents_authority: "com.android.externalstorage.documents".to_string(),
            broad_access: false,
            grants: Vec::new(),
        }
    }
}

impl ResolverConfig {
    /// Load configuration from config.toml with environment overrides
    ///
    /// Every file is optional; missing values fall back to the defaults.
    pub fn load() -> Result<Self, config::ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("saf-resolver/config").required(false))
            .add_source(File::with_name("config").required(false))
            .add_source(Environment::with_prefix("SAF").separator("__"))
            .build()?;

        let config: ResolverConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from an explicit file, still honouring the environment
    pub fn load_from(path: &str) -> Result<Self, config::ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name(path))
            .add_source(Environment::with_prefix("SAF").separator("__"))
            .build()?;

        let config: ResolverConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validation for all configuration values
    pub fn validate(&self) -> Result<(), config::ConfigError> {
        if self.app_data_dir.trim_matches('/').is_empty() {
            return Err(config::ConfigError::Message(
                "app_data_dir cannot be empty".into(),
            ));
        }

        if self.primary_storage_root.is_empty() {
            return Err(config::ConfigError::Message(
                "primary_storage_root cannot be empty".into(),
            ));
        }

        if self.volume.is_empty() || self.volume.contains(':') {
            return Err(config::ConfigError::Message(
                "volume must be a non-empty name without ':'".into(),
            ));
        }

        if self.documents_authority.is_empty() {
            return Err(config::ConfigError::Message(
                "documents_authority cannot be empty".into(),
            ));
        }

        for grant in &self.grants {
            if grant.key.is_empty() || grant.root.is_empty() {
                return Err(config::ConfigError::Message(
                    "grant entries need both key and root".into(),
                ));
            }
        }

        Ok(())
    }

    /// Storage roots to probe, canonical first, without duplicates
    pub fn storage_roots(&self) -> Vec<PathBuf> {
        let mut roots: Vec<PathBuf> = Vec::new();
        let candidates = std::iter::once(&self.primary_storage_root)
            .chain(self.alternate_storage_roots.iter());
        for root in candidates {
            let root = PathBuf::from(root);
            if !root.as_os_str().is_empty() && !roots.contains(&root) {
                roots.push(root);
            }
        }
        roots
    }
}
