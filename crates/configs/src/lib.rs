use anyhow::{anyhow, Context, Result};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: default_host(), port: default_port(), worker_threads: Some(4) }
    }
}

fn default_host() -> String { "127.0.0.1".into() }
fn default_port() -> u16 { 8000 }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_format")]
    pub format: String,
    /// `EnvFilter` directives used when `RUST_LOG` is unset.
    #[serde(default)]
    pub filter: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { format: default_log_format(), filter: None }
    }
}

fn default_log_format() -> String { "compact".into() }

fn config_path() -> String {
    std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string())
}

pub fn parse(content: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(content)?;
    Ok(cfg)
}

impl AppConfig {
    /// Load the file at `CONFIG_PATH` (default `config.toml`). Only a missing
    /// file falls back to the environment; a file that exists but does not
    /// parse, or any invalid value, is an error.
    pub fn load() -> Result<Self> {
        Self::load_with(&config_path(), |key| std::env::var(key).ok())
    }

    pub fn load_with<F>(path: &str, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = match std::fs::read_to_string(path) {
            Ok(content) => parse(&content).with_context(|| format!("parsing config file {path}"))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Self::from_env_with(lookup)?,
            Err(e) => return Err(anyhow!("reading config file {path}: {e}")),
        };
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    /// Build a config from `SERVER_HOST`, `SERVER_PORT`, `TOKIO_WORKER_THREADS`,
    /// `LOG_FORMAT` and `LOG_FILTER`. Unset variables keep their defaults; a
    /// set but unparsable one is an error.
    pub fn from_env_with<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = AppConfig::default();
        if let Some(host) = lookup("SERVER_HOST") {
            cfg.server.host = host;
        }
        if let Some(port) = lookup("SERVER_PORT") {
            cfg.server.port = port
                .trim()
                .parse()
                .with_context(|| format!("SERVER_PORT must be a port number, got `{port}`"))?;
        }
        if let Some(w) = lookup("TOKIO_WORKER_THREADS") {
            cfg.server.worker_threads = Some(
                w.trim()
                    .parse()
                    .with_context(|| format!("TOKIO_WORKER_THREADS must be a number, got `{w}`"))?,
            );
        }
        if let Some(format) = lookup("LOG_FORMAT") {
            cfg.logging.format = format;
        }
        if let Some(filter) = lookup("LOG_FILTER") {
            cfg.logging.filter = Some(filter);
        }
        Ok(cfg)
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        self.logging.validate()?;
        Ok(())
    }
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = default_host();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be within 1..=65535"));
        }
        match self.worker_threads {
            Some(0) | None => self.worker_threads = Some(4),
            Some(_) => {}
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl LoggingConfig {
    pub fn is_json(&self) -> bool {
        self.format.eq_ignore_ascii_case("json")
    }

    fn validate(&self) -> Result<()> {
        let f = self.format.to_ascii_lowercase();
        if f != "compact" && f != "json" {
            return Err(anyhow!("logging.format must be `compact` or `json`, got `{}`", self.format));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        let mut cfg = parse("").unwrap();
        cfg.normalize_and_validate().unwrap();
        assert_eq!(cfg.server.bind_addr(), "127.0.0.1:8000");
        assert_eq!(cfg.server.worker_threads, Some(4));
        assert!(!cfg.logging.is_json());
    }

    #[test]
    fn partial_server_section() {
        let mut cfg = parse("[server]\nport = 9000\n\n[logging]\nformat = \"JSON\"\n").unwrap();
        cfg.normalize_and_validate().unwrap();
        assert_eq!(cfg.server.host, "127.0.0.1");
        assert_eq!(cfg.server.port, 9000);
        assert!(cfg.logging.is_json());
    }

    #[test]
    fn blank_host_and_zero_workers_are_normalized() {
        let mut cfg = parse("[server]\nhost = \"  \"\nport = 8080\nworker_threads = 0\n").unwrap();
        cfg.normalize_and_validate().unwrap();
        assert_eq!(cfg.server.host, "127.0.0.1");
        assert_eq!(cfg.server.worker_threads, Some(4));
    }

    #[test]
    fn rejects_zero_port_and_unknown_format() {
        let mut cfg = parse("[server]\nport = 0\n").unwrap();
        assert!(cfg.normalize_and_validate().is_err());

        let mut cfg = parse("[logging]\nformat = \"xml\"\n").unwrap();
        assert!(cfg.normalize_and_validate().is_err());
    }

    fn env<'a>(pairs: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |key: &str| pairs.iter().find(|(k, _)| *k == key).map(|(_, v)| v.to_string())
    }

    #[test]
    fn missing_file_reads_environment() {
        let cfg = AppConfig::load_with(
            "/nonexistent/item-store.toml",
            env(&[("SERVER_PORT", "9001"), ("SERVER_HOST", "0.0.0.0"), ("LOG_FORMAT", "json")]),
        )
        .unwrap();
        assert_eq!(cfg.server.bind_addr(), "0.0.0.0:9001");
        assert!(cfg.logging.is_json());
    }

    #[test]
    fn invalid_env_value_is_an_error_not_a_silent_default() {
        let err = AppConfig::load_with(
            "/nonexistent/item-store.toml",
            env(&[("SERVER_PORT", "9001"), ("LOG_FORMAT", "xml")]),
        )
        .unwrap_err();
        assert!(err.to_string().contains("logging.format"));

        let err = AppConfig::load_with("/nonexistent/item-store.toml", env(&[("SERVER_PORT", "eighty")]))
            .unwrap_err();
        assert!(err.to_string().contains("SERVER_PORT"));
    }

    #[test]
    fn broken_config_file_is_reported() {
        let path = std::env::temp_dir().join(format!("item_store_cfg_{}.toml", std::process::id()));
        std::fs::write(&path, "[server\nport = ").unwrap();
        let res = AppConfig::load_with(path.to_str().unwrap(), env(&[("SERVER_PORT", "9001")]));
        let _ = std::fs::remove_file(&path);
        assert!(res.unwrap_err().to_string().contains("parsing config file"));
    }
}
