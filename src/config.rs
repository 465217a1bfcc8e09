use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// URL of the starred-items RSS export to republish
    #[serde(default = "default_feed_url")]
    pub feed_url: String,
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
    /// Directory served for unmatched paths
    #[serde(default = "default_public_dir")]
    pub public_dir: String,
    /// How long a fetched feed body is reused before refetching, in seconds
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
}

fn default_feed_url() -> String {
    "https://feedbin.com/starred/4e98e7608d29f0b94f21a0dad25f3a7f.xml".to_string()
}

fn default_bind_addr() -> String {
    "0.0.0.0:3000".to_string()
}

fn default_public_dir() -> String {
    "public".to_string()
}

fn default_cache_ttl_secs() -> u64 {
    300
}

impl Default for Config {
    fn default() -> Self {
        Self {
            feed_url: default_feed_url(),
            bind_addr: default_bind_addr(),
            public_dir: default_public_dir(),
            cache_ttl_secs: default_cache_ttl_secs(),
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load from a TOML file, falling back to defaults when the file is absent.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse config from a TOML string (useful for testing)
    pub fn from_str(content: &str) -> anyhow::Result<Self> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }
}
