//! Backend selection for the catalog client.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use url::Url;

/// Which backend response format the client talks to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// JSON records under `/images` and `/tags`.
    #[default]
    Structured,
    /// Server-rendered HTML gallery and view pages.
    Markup,
}

impl Dialect {
    pub fn default_base_url(self) -> &'static str {
        match self {
            Dialect::Structured => "http://localhost:8080/api",
            Dialect::Markup => "http://localhost:8080",
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dialect::Structured => f.write_str("structured"),
            Dialect::Markup => f.write_str("markup"),
        }
    }
}

impl FromStr for Dialect {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "structured" | "json" => Ok(Dialect::Structured),
            "markup" | "html" => Ok(Dialect::Markup),
            other => Err(ConfigError::UnknownDialect(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("unknown backend dialect '{0}' (expected 'structured' or 'markup')")]
    UnknownDialect(String),
    #[error("invalid base url '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
    #[error("invalid configuration: {0}")]
    Malformed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogConfig {
    #[serde(default)]
    pub dialect: Dialect,
    /// Prefix every request path is appended to. No trailing slash needed.
    pub base_url: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self::for_dialect(Dialect::default())
    }
}

impl CatalogConfig {
    pub fn for_dialect(dialect: Dialect) -> Self {
        Self {
            dialect,
            base_url: dialect.default_base_url().to_string(),
        }
    }

    /// Builds a configuration from optional string settings, such as
    /// build-time environment values. Missing settings take the dialect's
    /// defaults; blank ones count as missing.
    pub fn from_values(dialect: Option<&str>, base_url: Option<&str>) -> Result<Self, ConfigError> {
        let dialect = match dialect.filter(|d| !d.trim().is_empty()) {
            Some(value) => value.parse()?,
            None => Dialect::default(),
        };
        let mut config = Self::for_dialect(dialect);
        if let Some(url) = base_url.map(str::trim).filter(|u| !u.is_empty()) {
            config.base_url = url.to_string();
        }
        config.validate()?;
        Ok(config)
    }

    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: CatalogConfig =
            serde_json::from_str(raw).map_err(|e| ConfigError::Malformed(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.parsed_base_url().map(|_| ())
    }

    pub fn parsed_base_url(&self) -> Result<Url, ConfigError> {
        Url::parse(&self.base_url).map_err(|e| ConfigError::InvalidBaseUrl {
            url: self.base_url.clone(),
            reason: e.to_string(),
        })
    }

    /// Absolute URL for a request path such as `/images/42`.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }
}
