use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Catalog service base URL
    #[serde(default = "default_catalog_api_url")]
    pub catalog_api_url: String,

    /// Optional proxy prefix; requests go to `{proxy}{catalog_api_url}{endpoint}`
    #[serde(default)]
    pub proxy_url: Option<String>,

    /// Language used for localized catalog content
    #[serde(default = "default_content_language")]
    pub content_language: String,
}

fn default_catalog_api_url() -> String {
    "https://apis.justwatch.com".to_string()
}

fn default_content_language() -> String {
    "en".to_string()
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog_api_url: default_catalog_api_url(),
            proxy_url: None,
            content_language: default_content_language(),
        }
    }
}
