use anyhow::{anyhow, Context, Result};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default = "default_graphql")]
    pub graphql: ListenConfig,
    #[serde(default = "default_gateway")]
    pub gateway: ListenConfig,
    #[serde(default = "default_worker")]
    pub worker: ListenConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

/// REST cats service binding and runtime sizing.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "127.0.0.1".into(), port: 3000, worker_threads: Some(4) }
    }
}

/// Plain host/port pair used by the graphql, gateway and worker processes.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ListenConfig {
    pub host: String,
    pub port: u16,
}

impl ListenConfig {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn default_graphql() -> ListenConfig { ListenConfig { host: "127.0.0.1".into(), port: 3001 } }
fn default_gateway() -> ListenConfig { ListenConfig { host: "127.0.0.1".into(), port: 3002 } }
fn default_worker() -> ListenConfig { ListenConfig { host: "127.0.0.1".into(), port: 8877 } }

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    #[serde(default = "default_token")]
    pub token: String,
}

fn default_token() -> String { "valid-token".into() }

impl Default for AuthConfig {
    fn default() -> Self {
        Self { token: default_token() }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Memory,
    Json,
}

/// Backing store for the cats services.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StoreBackend,
    #[serde(default)]
    pub path: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::with_defaults()
    }
}

fn config_path() -> String {
    std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string())
}

pub fn load_default() -> Result<AppConfig> {
    load_from_file(&config_path())
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    parse(&content).with_context(|| format!("invalid config file {path}"))
}

/// Like [`load_from_file`], but a missing file yields `None`. Any other read
/// or parse error is returned.
pub fn load_optional(path: &str) -> Result<Option<AppConfig>> {
    match std::fs::read_to_string(path) {
        Ok(content) => parse(&content)
            .with_context(|| format!("invalid config file {path}"))
            .map(Some),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e).with_context(|| format!("cannot read config file {path}")),
    }
}

pub fn parse(content: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(content)?;
    Ok(cfg)
}

impl AppConfig {
    /// Config file if present, otherwise defaults; then env overrides, then validation.
    pub fn load_and_validate() -> Result<Self> {
        Self::load_and_validate_from(&config_path(), |key| std::env::var(key).ok())
    }

    /// A missing file falls back to defaults; a file that fails to parse is an error.
    pub fn load_and_validate_from<F>(path: &str, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = load_optional(path)?.unwrap_or_else(Self::with_defaults);
        cfg.apply_env_overrides(lookup);
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn with_defaults() -> Self {
        Self {
            server: ServerConfig::default(),
            graphql: default_graphql(),
            gateway: default_gateway(),
            worker: default_worker(),
            auth: AuthConfig::default(),
            storage: StorageConfig::default(),
        }
    }

    /// Overlay values from the environment; `lookup` abstracts `std::env::var`.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = |key: &str| lookup(key).and_then(|p| p.parse::<u16>().ok());

        if let Some(host) = lookup("SERVER_HOST") { self.server.host = host; }
        if let Some(p) = port("SERVER_PORT") { self.server.port = p; }
        if let Some(w) = lookup("TOKIO_WORKER_THREADS").and_then(|v| v.parse::<usize>().ok()) {
            self.server.worker_threads = Some(w);
        }
        if let Some(p) = port("GRAPHQL_PORT") { self.graphql.port = p; }
        if let Some(p) = port("GATEWAY_PORT") { self.gateway.port = p; }
        if let Some(host) = lookup("WORKER_HOST") { self.worker.host = host; }
        if let Some(p) = port("WORKER_PORT") { self.worker.port = p; }
        if let Some(token) = lookup("AUTH_TOKEN") { self.auth.token = token; }
        match lookup("CAT_STORE").as_deref() {
            Some("json") => self.storage.backend = StoreBackend::Json,
            Some("memory") => self.storage.backend = StoreBackend::Memory,
            _ => {}
        }
        if let Some(path) = lookup("CAT_STORE_PATH") { self.storage.path = Some(path); }
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        for (name, listen) in [("graphql", &mut self.graphql), ("gateway", &mut self.gateway), ("worker", &mut self.worker)] {
            listen.normalize(name)?;
        }
        if self.auth.token.trim().is_empty() {
            return Err(anyhow!("auth.token must not be empty"));
        }
        self.storage.validate()?;
        Ok(())
    }
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = "127.0.0.1".to_string();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be in 1..=65535"));
        }
        match self.worker_threads {
            Some(0) | None => self.worker_threads = Some(4),
            Some(_) => {}
        }
        Ok(())
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl ListenConfig {
    fn normalize(&mut self, section: &str) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = "127.0.0.1".to_string();
        }
        if self.port == 0 {
            return Err(anyhow!("{section}.port must be in 1..=65535"));
        }
        Ok(())
    }
}

impl StorageConfig {
    pub fn validate(&self) -> Result<()> {
        if self.backend == StoreBackend::Json
            && self.path.as_deref().map(str::trim).unwrap_or_default().is_empty()
        {
            return Err(anyhow!("storage.path is required when storage.backend = \"json\""));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn parses_partial_file_with_defaults() -> Result<()> {
        let cfg = parse(
            r#"
            [server]
            host = "0.0.0.0"
            port = 8080

            [auth]
            token = "s3cret"
            "#,
        )?;
        assert_eq!(cfg.server.addr(), "0.0.0.0:8080");
        assert_eq!(cfg.auth.token, "s3cret");
        assert_eq!(cfg.worker.addr(), "127.0.0.1:8877");
        assert_eq!(cfg.storage.backend, StoreBackend::Memory);
        Ok(())
    }

    #[test]
    fn env_overrides_win_over_file() -> Result<()> {
        let mut cfg = AppConfig::with_defaults();
        let env: HashMap<&str, &str> = HashMap::from([
            ("SERVER_PORT", "9000"),
            ("WORKER_PORT", "9900"),
            ("AUTH_TOKEN", "other"),
            ("CAT_STORE", "json"),
            ("CAT_STORE_PATH", "data/cats.json"),
            ("GATEWAY_PORT", "not-a-port"),
        ]);
        cfg.apply_env_overrides(|k| env.get(k).map(|v| v.to_string()));
        cfg.normalize_and_validate()?;
        assert_eq!(cfg.server.port, 9000);
        assert_eq!(cfg.worker.port, 9900);
        assert_eq!(cfg.gateway.port, 3002);
        assert_eq!(cfg.auth.token, "other");
        assert_eq!(cfg.storage.backend, StoreBackend::Json);
        Ok(())
    }

    #[test]
    fn rejects_invalid_values() {
        let mut cfg = AppConfig::with_defaults();
        cfg.auth.token = "  ".into();
        assert!(cfg.normalize_and_validate().is_err());

        let mut cfg = AppConfig::with_defaults();
        cfg.storage.backend = StoreBackend::Json;
        assert!(cfg.normalize_and_validate().is_err());

        let mut cfg = AppConfig::with_defaults();
        cfg.worker.port = 0;
        assert!(cfg.normalize_and_validate().is_err());
    }

    fn temp_config(name: &str, content: &str) -> Result<String> {
        let path = std::env::temp_dir().join(format!("configs_{}_{}.toml", name, std::process::id()));
        std::fs::write(&path, content)?;
        Ok(path.to_string_lossy().into_owned())
    }

    #[test]
    fn malformed_file_is_an_error_not_defaults() -> Result<()> {
        let path = temp_config("malformed", "[auth]\ntoken = \n")?;
        let res = AppConfig::load_and_validate_from(&path, |_| None);
        std::fs::remove_file(&path)?;
        let err = match res {
            Ok(cfg) => panic!("expected an error, loaded token {:?}", cfg.auth.token),
            Err(e) => e,
        };
        assert!(err.to_string().contains("invalid config file"));
        Ok(())
    }

    #[test]
    fn mistyped_value_is_an_error() -> Result<()> {
        let path = temp_config("mistyped", "[server]\nhost = \"0.0.0.0\"\nport = \"http\"\n")?;
        let res = AppConfig::load_and_validate_from(&path, |_| None);
        std::fs::remove_file(&path)?;
        assert!(res.is_err());
        Ok(())
    }

    #[test]
    fn missing_file_falls_back_to_defaults() -> Result<()> {
        let path = std::env::temp_dir().join(format!("configs_absent_{}.toml", std::process::id()));
        let cfg = AppConfig::load_and_validate_from(&path.to_string_lossy(), |_| None)?;
        assert_eq!(cfg.server.addr(), "127.0.0.1:3000");
        assert_eq!(cfg.auth.token, "valid-token");
        Ok(())
    }

    #[test]
    fn zero_worker_threads_fall_back() -> Result<()> {
        let mut cfg = AppConfig::with_defaults();
        cfg.server.worker_threads = Some(0);
        cfg.normalize_and_validate()?;
        assert_eq!(cfg.server.worker_threads, Some(4));
        Ok(())
    }
}
