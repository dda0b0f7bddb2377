use serde::Deserialize;

/// Complete fleetstate configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub cache: CacheConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_port() -> u16 {
    3001
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
        }
    }
}

/// Backing store configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file
    #[serde(default = "default_database_path")]
    pub path: String,
}

fn default_database_path() -> String {
    "fleetstate.db".to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_database_path(),
        }
    }
}

/// Result cache configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    /// How long a cached resolution stays valid (seconds)
    #[serde(default = "default_ttl_seconds")]
    pub ttl_seconds: u64,
    /// How often the background sweep evicts expired entries (seconds)
    #[serde(default = "default_sweep_interval_seconds")]
    pub sweep_interval_seconds: u64,
}

fn default_ttl_seconds() -> u64 {
    60
}

fn default_sweep_interval_seconds() -> u64 {
    30
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: default_ttl_seconds(),
            sweep_interval_seconds: default_sweep_interval_seconds(),
        }
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            database: DatabaseConfig::default(),
            cache: CacheConfig::default(),
        }
    }
}

impl ServiceConfig {
    /// Apply FLEETSTATE_* env var overrides on top of file/default values.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(v) = std::env::var("FLEETSTATE_PORT") {
            if let Ok(n) = v.parse::<u16>() {
                self.server.port = n;
            }
        }
        if let Ok(v) = std::env::var("FLEETSTATE_DATABASE_PATH") {
            if !v.is_empty() {
                self.database.path = v;
            }
        }
        if let Ok(v) = std::env::var("FLEETSTATE_CACHE_TTL_SECONDS") {
            if let Ok(n) = v.parse::<u64>() {
                self.cache.ttl_seconds = n;
            }
        }
        if let Ok(v) = std::env::var("FLEETSTATE_CACHE_SWEEP_INTERVAL_SECONDS") {
            if let Ok(n) = v.parse::<u64>() {
                self.cache.sweep_interval_seconds = n;
            }
        }

        self
    }
}

/// Load configuration from TOML file
pub fn load_config(path: &str) -> Result<ServiceConfig, Box<dyn std::error::Error>> {
    let contents = std::fs::read_to_string(path)?;
    let config: ServiceConfig = toml::from_str(&contents)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ServiceConfig::default();
        assert_eq!(config.server.port, 3001);
        assert_eq!(config.database.path, "fleetstate.db");
        assert_eq!(config.cache.ttl_seconds, 60);
        assert_eq!(config.cache.sweep_interval_seconds, 30);
    }

    #[test]
    fn test_config_deserialization() {
        let toml = r#"
            [server]
            port = 8080

            [database]
            path = "/var/lib/fleetstate/state.db"

            [cache]
            ttl_seconds = 120
            sweep_interval_seconds = 15
        "#;

        let config: ServiceConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.database.path, "/var/lib/fleetstate/state.db");
        assert_eq!(config.cache.ttl_seconds, 120);
        assert_eq!(config.cache.sweep_interval_seconds, 15);
    }

    #[test]
    fn test_partial_config() {
        // Missing sections use defaults
        let toml = r#"
            [cache]
            ttl_seconds = 5
        "#;

        let config: ServiceConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.cache.ttl_seconds, 5);
        assert_eq!(config.cache.sweep_interval_seconds, 30); // Default
        assert_eq!(config.server.port, 3001); // Default
        assert_eq!(config.database.path, "fleetstate.db"); // Default
    }
}
