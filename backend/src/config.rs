//! Service configuration, read from a TOML file.

use std::{fs, path::Path};

use serde::Deserialize;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub service: Service,
    pub solr: Solr,
    pub report: Report,
    #[serde(default)]
    pub search: Search,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Service {
    pub http_bind: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Sent along with every report as the data release the index was built from.
    #[serde(default)]
    pub release_version: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Solr {
    pub url: String,
    pub core: String,
    #[serde(default = "default_target_core")]
    pub target_core: String,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Report {
    #[serde(default = "default_true")]
    pub enabled: bool,
    pub url: String,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Search {
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    #[serde(default = "default_true")]
    pub grouped: bool,
}

impl Default for Search {
    fn default() -> Self {
        Self { page_size: default_page_size(), grouped: true }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_target_core() -> String {
    "target".to_string()
}

fn default_timeout_ms() -> u64 {
    10_000
}

fn default_page_size() -> u32 {
    common::search_const::DEFAULT_PAGE_SIZE
}

fn default_true() -> bool {
    true
}

pub fn load(path: &Path) -> Result<Config> {
    let raw = fs::read_to_string(path)
        .map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

    let mut cfg: Config = toml::from_str(&raw)
        .map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

    apply_env_overrides(&mut cfg);
    normalize(&mut cfg);

    validate(&cfg)?;

    Ok(cfg)
}

/// `SOLR_URL` and `REPORT_URL` win over the file.
fn apply_env_overrides(cfg: &mut Config) {
    if let Ok(url) = std::env::var("SOLR_URL") {
        cfg.solr.url = url;
    }
    if let Ok(url) = std::env::var("REPORT_URL") {
        cfg.report.url = url;
    }
}

fn normalize(cfg: &mut Config) {
    let solr_url = cfg.solr.url.trim().trim_end_matches('/').to_string();
    cfg.solr.url = solr_url;
    let report_url = cfg.report.url.trim().trim_end_matches('/').to_string();
    cfg.report.url = report_url;
    cfg.solr.core = cfg.solr.core.trim().trim_matches('/').to_string();
    cfg.solr.target_core = cfg.solr.target_core.trim().trim_matches('/').to_string();
}

pub fn validate(cfg: &Config) -> Result<()> {
    if cfg.service.http_bind.trim().is_empty() {
        return Err(Error::Validation {
            message: "service.http_bind must be non-empty.".to_string(),
        });
    }
    if !is_http_url(&cfg.solr.url) {
        return Err(Error::Validation {
            message: "solr.url must be an http or https URL.".to_string(),
        });
    }
    if cfg.solr.core.is_empty() {
        return Err(Error::Validation { message: "solr.core must be non-empty.".to_string() });
    }
    if cfg.solr.target_core.is_empty() {
        return Err(Error::Validation {
            message: "solr.target_core must be non-empty.".to_string(),
        });
    }
    if cfg.solr.timeout_ms == 0 {
        return Err(Error::Validation {
            message: "solr.timeout_ms must be greater than zero.".to_string(),
        });
    }
    if cfg.report.enabled && !is_http_url(&cfg.report.url) {
        return Err(Error::Validation {
            message: "report.url must be an http or https URL when reporting is enabled."
                .to_string(),
        });
    }
    if cfg.search.page_size == 0 {
        return Err(Error::Validation {
            message: "search.page_size must be greater than zero.".to_string(),
        });
    }

    Ok(())
}

fn is_http_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}
