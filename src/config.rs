use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub store: StoreConfig,
    #[serde(default)]
    pub draw: DrawConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Remote raffle data store (the authoritative API this service fronts).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    pub base_url: String,
    #[serde(default = "default_store_timeout")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DrawConfig {
    /// Minimum time (ms) the drawing animation runs before the winner is revealed.
    #[serde(default = "default_animation_ms")]
    pub animation_ms: u64,
}

impl Default for DrawConfig {
    fn default() -> Self {
        DrawConfig {
            animation_ms: default_animation_ms(),
        }
    }
}

fn default_store_timeout() -> u64 {
    10
}

fn default_animation_ms() -> u64 {
    // ~2s rolling animation + 0.1s with the winning number held still
    2100
}

impl Config {
    pub fn from_toml() -> Result<Self, Box<dyn std::error::Error>> {
        let config_path = env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
        use std::io::ErrorKind;

        let config_result = std::fs::read_to_string(&config_path);

        let mut config: Config = match config_result {
            Ok(config_str) => {
                // File present: parse it, env vars still override below
                toml::from_str(&config_str)
                    .map_err(|e| format!("Failed to parse config file: {e}"))?
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                // No file: build from env vars and defaults
                fn get_env(name: &str) -> Option<String> {
                    env::var(name).ok()
                }
                fn get_env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
                    env::var(name)
                        .ok()
                        .and_then(|v| v.parse::<T>().ok())
                        .unwrap_or(default)
                }

                // The store URL is the one thing we cannot default
                let base_url = get_env("STORE_BASE_URL")
                    .ok_or("Missing STORE_BASE_URL env var and no config.toml found")?;

                Config {
                    server: ServerConfig {
                        host: get_env("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
                        port: get_env_parse("SERVER_PORT", 8080u16),
                    },
                    store: StoreConfig {
                        base_url,
                        timeout_secs: get_env_parse("STORE_TIMEOUT_SECS", default_store_timeout()),
                    },
                    draw: DrawConfig {
                        animation_ms: get_env_parse("DRAW_ANIMATION_MS", default_animation_ms()),
                    },
                }
            }
            Err(e) => {
                return Err(format!("Cannot read config file {config_path}: {e}").into());
            }
        };

        // Env overrides (applied even when the file exists)
        if let Ok(v) = env::var("SERVER_HOST") {
            config.server.host = v;
        }
        if let Ok(v) = env::var("SERVER_PORT")
            && let Ok(p) = v.parse()
        {
            config.server.port = p;
        }
        if let Ok(v) = env::var("STORE_BASE_URL") {
            config.store.base_url = v;
        }
        if let Ok(v) = env::var("STORE_TIMEOUT_SECS")
            && let Ok(n) = v.parse()
        {
            config.store.timeout_secs = n;
        }
        if let Ok(v) = env::var("DRAW_ANIMATION_MS")
            && let Ok(n) = v.parse()
        {
            config.draw.animation_ms = n;
        }

        Ok(config)
    }
}
