use std::sync::OnceLock;

use serde::Deserialize;

#[derive(Deserialize, Debug, Clone)]
pub struct Config {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_database_url")]
    pub database_url: String,

    /// Allowed CORS origin, any origin when unset
    pub cors_origin: Option<String>,
    #[serde(default)]
    pub log_json: bool,

    // build
    #[serde(default = "default_local")]
    pub source: String,
    #[serde(default = "default_local")]
    pub git_commit: String,
    #[serde(default = "default_local")]
    pub pipeline_id: String,
    #[serde(default = "default_local")]
    pub version: String,
}

fn default_host() -> String {
    "127.0.0.1".into()
}

fn default_port() -> u16 {
    8000
}

fn default_database_url() -> String {
    "noteful.db".into()
}

fn default_local() -> String {
    "local".into()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            database_url: default_database_url(),
            cors_origin: None,
            log_json: false,
            source: default_local(),
            git_commit: default_local(),
            pipeline_id: default_local(),
            version: default_local(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();
        envy::from_env::<Self>()
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

static CONFIG: OnceLock<Config> = OnceLock::new();

/// Reads the environment once at startup. Later calls return the first result.
pub fn load() -> crate::Result<&'static Config> {
    if let Some(config) = CONFIG.get() {
        return Ok(config);
    }
    let config = Config::from_env()?;
    Ok(CONFIG.get_or_init(|| config))
}

pub fn config() -> &'static Config {
    CONFIG.get_or_init(Config::default)
}

#[cfg(test)]
pub fn config_override<F>(override_config: F) -> &'static Config
where
    F: FnOnce(Config) -> Config,
{
    CONFIG.get_or_init(|| override_config(Config::default()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_env_is_empty() {
        let config = envy::from_iter::<_, Config>(Vec::<(String, String)>::new()).unwrap();

        assert_eq!(config.port, 8000);
        assert_eq!(config.database_url, "noteful.db");
        assert_eq!(config.cors_origin, None);
        assert!(!config.log_json);
        assert_eq!(config.addr(), "127.0.0.1:8000");
    }

    #[test]
    fn reads_values_from_env() {
        let config = envy::from_iter::<_, Config>(vec![
            ("PORT".to_string(), "9090".to_string()),
            ("DATABASE_URL".to_string(), "/tmp/noteful.db".to_string()),
            ("CORS_ORIGIN".to_string(), "http://localhost:3000".to_string()),
            ("LOG_JSON".to_string(), "true".to_string()),
        ])
        .unwrap();

        assert_eq!(config.port, 9090);
        assert_eq!(config.database_url, "/tmp/noteful.db");
        assert_eq!(config.cors_origin.as_deref(), Some("http://localhost:3000"));
        assert!(config.log_json);
    }

    #[test]
    fn rejects_invalid_port() {
        let result = envy::from_iter::<_, Config>(vec![("PORT".to_string(), "not-a-port".to_string())]);

        assert!(result.is_err());
    }
}
