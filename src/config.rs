//! Configuration types for lotto-draw

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// HTTP behavior for historical data sources
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Per-source request timeout (default: 10 seconds)
    ///
    /// A timeout moves the refresh on to the next source immediately; there are no
    /// retries within a single source.
    #[serde(default = "default_timeout", with = "duration_serde")]
    pub timeout: Duration,

    /// User-Agent header sent with every request
    ///
    /// Lottery result sites commonly reject non-browser clients, so the default
    /// identifies as a desktop browser.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout: default_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

/// Table selection and number extraction settings
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// Keywords that mark a table as draw history (default: "特別號", "期別")
    ///
    /// A table qualifies if its text contains at least one of them.
    #[serde(default = "default_keywords")]
    pub keywords: Vec<String>,

    /// A qualifying table must have strictly more rows than this (default: 5)
    #[serde(default = "default_min_rows")]
    pub min_rows: usize,

    /// Minimum number of valid numbers a source must yield (default: 50)
    #[serde(default = "default_min_sample")]
    pub min_sample: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            keywords: default_keywords(),
            min_rows: default_min_rows(),
            min_sample: default_min_sample(),
        }
    }
}

/// Draw sampling settings
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SamplingConfig {
    /// Weighted attempts before falling back to uniform fill (default: 100)
    #[serde(default = "default_retry_budget")]
    pub retry_budget: u32,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            retry_budget: default_retry_budget(),
        }
    }
}

/// Main configuration for [`DrawEngine`](crate::DrawEngine)
///
/// Every field has a default, so a JSON document only needs to list what it
/// overrides. `sources` has no useful default and must be provided.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Config {
    /// Historical draw sources, attempted in order (at least one required)
    #[serde(default)]
    pub sources: Vec<String>,

    /// HTTP behavior
    #[serde(default)]
    pub fetch: FetchConfig,

    /// Table selection and number extraction
    #[serde(default)]
    pub extraction: ExtractionConfig,

    /// Draw sampling
    #[serde(default)]
    pub sampling: SamplingConfig,
}

impl Config {
    /// Create a configuration with the given sources and defaults elsewhere
    pub fn with_sources<I, S>(sources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            sources: sources.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    /// Parse a configuration from a JSON document
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(json)?;
        Ok(config)
    }

    /// Load a configuration from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "Loading configuration");
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Check the configuration for values the engine cannot work with
    ///
    /// # Errors
    /// Returns [`Error::Config`] naming the offending key if:
    /// - no source is configured
    /// - a source is not an absolute http(s) URL
    /// - the timeout is zero
    /// - the user agent or keyword list is empty
    /// - the retry budget is zero
    pub fn validate(&self) -> Result<()> {
        if self.sources.is_empty() {
            return Err(Error::config(
                "sources",
                "at least one historical data source is required",
            ));
        }

        for source in &self.sources {
            let url = url::Url::parse(source).map_err(|e| {
                Error::config("sources", format!("invalid source URL '{}': {}", source, e))
            })?;
            if !matches!(url.scheme(), "http" | "https") {
                return Err(Error::config(
                    "sources",
                    format!("unsupported scheme '{}' in '{}'", url.scheme(), source),
                ));
            }
        }

        if self.fetch.timeout.is_zero() {
            return Err(Error::config("fetch.timeout", "timeout must be non-zero"));
        }

        if self.fetch.user_agent.trim().is_empty() {
            return Err(Error::config(
                "fetch.user_agent",
                "a browser-like user agent is required",
            ));
        }

        if self.extraction.keywords.iter().all(|k| k.trim().is_empty()) {
            return Err(Error::config(
                "extraction.keywords",
                "at least one table keyword is required",
            ));
        }

        if self.sampling.retry_budget == 0 {
            return Err(Error::config(
                "sampling.retry_budget",
                "retry budget must be at least 1",
            ));
        }

        Ok(())
    }
}

fn default_timeout() -> Duration {
    Duration::from_secs(10)
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) \
     Chrome/120.0.0.0 Safari/537.36"
        .to_string()
}

fn default_keywords() -> Vec<String> {
    vec!["特別號".to_string(), "期別".to_string()]
}

fn default_min_rows() -> usize {
    5
}

fn default_min_sample() -> usize {
    50
}

fn default_retry_budget() -> u32 {
    100
}

// Duration serialization helper (whole seconds)
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}
