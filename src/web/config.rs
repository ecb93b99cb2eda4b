use serde::{Deserialize, Deserializer};
use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub web: WebConfig,
    pub store: StoreConfig,
    #[serde(default)]
    pub elements: ElementsConfig,
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    pub api_keys: Vec<ApiKey>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

fn default_bind() -> String {
    "0.0.0.0:8080".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    pub base_folder: PathBuf,
}

/// Where the two-line element text comes from.
#[derive(Debug, Clone, Deserialize)]
pub struct ElementsConfig {
    #[serde(default = "default_source_url")]
    pub source_url: String,
    #[serde(
        default = "default_fetch_timeout",
        deserialize_with = "deserialize_duration"
    )]
    pub fetch_timeout: Duration,
}

impl Default for ElementsConfig {
    fn default() -> Self {
        Self {
            source_url: default_source_url(),
            fetch_timeout: default_fetch_timeout(),
        }
    }
}

fn default_source_url() -> String {
    "https://live.ariss.org/iss.txt".to_string()
}

fn default_fetch_timeout() -> Duration {
    Duration::from_secs(10)
}

/// Per-half timeouts of the combined retrieval response.
#[derive(Debug, Clone, Deserialize)]
pub struct RetrievalConfig {
    #[serde(
        default = "default_current_timeout",
        deserialize_with = "deserialize_duration"
    )]
    pub current_timeout: Duration,
    #[serde(
        default = "default_historical_timeout",
        deserialize_with = "deserialize_duration"
    )]
    pub historical_timeout: Duration,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            current_timeout: default_current_timeout(),
            historical_timeout: default_historical_timeout(),
        }
    }
}

fn default_current_timeout() -> Duration {
    Duration::from_secs(10)
}

fn default_historical_timeout() -> Duration {
    Duration::from_secs(8)
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiKey {
    pub key: String,
    pub name: String,
    pub permissions: HashSet<Permission>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    GeneratePredictions,
    ListPredictions,
}

impl Config {
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    pub fn find_api_key(&self, key: &str) -> Option<&ApiKey> {
        self.api_keys.iter().find(|k| k.key == key)
    }
}

fn deserialize_duration<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    humantime::parse_duration(s.trim()).map_err(serde::de::Error::custom)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_config_parses() {
        let yaml = r#"
web:
  bind: "127.0.0.1:9000"
store:
  base_folder: /var/lib/orbitcast
elements:
  source_url: "https://example.org/elements.txt"
  fetch_timeout: 5s
retrieval:
  current_timeout: 12s
  historical_timeout: 6s
api_keys:
  - key: secret
    name: web-frontend
    permissions: [list_predictions]
  - key: internal
    name: ingest
    permissions: [generate_predictions, list_predictions]
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.web.bind, "127.0.0.1:9000");
        assert_eq!(config.elements.fetch_timeout, Duration::from_secs(5));
        assert_eq!(config.retrieval.current_timeout, Duration::from_secs(12));
        assert_eq!(config.retrieval.historical_timeout, Duration::from_secs(6));

        let key = config.find_api_key("internal").unwrap();
        assert!(key.permissions.contains(&Permission::GeneratePredictions));
        assert!(config.find_api_key("wrong").is_none());
    }

    #[test]
    fn omitted_sections_use_defaults() {
        let yaml = r#"
web: {}
store:
  base_folder: ./data
api_keys: []
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.web.bind, "0.0.0.0:8080");
        assert_eq!(config.elements.source_url, "https://live.ariss.org/iss.txt");
        assert_eq!(config.retrieval.current_timeout, Duration::from_secs(10));
        assert_eq!(config.retrieval.historical_timeout, Duration::from_secs(8));
    }

    #[test]
    fn malformed_duration_is_rejected() {
        let yaml = r#"
web: {}
store:
  base_folder: ./data
retrieval:
  current_timeout: soon
api_keys: []
"#;
        assert!(serde_yaml::from_str::<Config>(yaml).is_err());
    }
}
