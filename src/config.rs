use anyhow::Context;
use serde::Deserialize;
use std::fs;
use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

pub const DEFAULT_CONFIG_FILE: &str = "fileserver.toml";

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct Config {
    pub env_prefix: String,
    pub server: Server,
    pub storage: Storage,
    pub logging: Logging,
    pub limits: Limits,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            env_prefix: "FS_".to_string(),
            server: Server::default(),
            storage: Storage::default(),
            logging: Logging::default(),
            limits: Limits::default(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct Server {
    pub bind_addr: String,
    pub port: u16,
}
impl Default for Server {
    fn default() -> Self { Self { bind_addr: "127.0.0.1".to_string(), port: 8080 } }
}

/// Initial working directory; the launch directory when unset.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Storage { pub directory: Option<PathBuf> }

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct Logging {
    pub level: String,
    pub file: Option<PathBuf>,
}
impl Default for Logging {
    fn default() -> Self { Self { level: "info".to_string(), file: None } }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct Limits { pub max_request_kb: usize }
impl Default for Limits { fn default() -> Self { Self { max_request_kb: 10 * 1024 } } }

/// Values given on the command line; each one overrides every other layer.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub directory: Option<PathBuf>,
    pub bind_addr: Option<String>,
    pub port: Option<u16>,
    pub log_level: Option<String>,
    pub log_file: Option<PathBuf>,
}

impl Config {
    /// An explicit path must exist; otherwise `fileserver.toml` is read when present.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None if Path::new(DEFAULT_CONFIG_FILE).is_file() => Self::from_file(Path::new(DEFAULT_CONFIG_FILE)),
            None => Ok(Self::default()),
        }
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let raw = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        if path.extension().map(|e| e == "json").unwrap_or(false) {
            Ok(serde_json::from_str(&raw)?)
        } else {
            Ok(toml::from_str(&raw)?)
        }
    }

    /// Applies `<prefix>DIRECTORY`, `<prefix>BIND_ADDR`, `<prefix>PORT`,
    /// `<prefix>LOGLEVEL` and `<prefix>LOGFILE`.
    pub fn apply_env(&mut self, vars: impl IntoIterator<Item = (String, String)>) -> anyhow::Result<()> {
        let prefix = self.env_prefix.clone();
        for (key, value) in vars {
            let Some(name) = key.strip_prefix(&prefix) else { continue };
            match name {
                "DIRECTORY" => self.storage.directory = Some(PathBuf::from(value)),
                "BIND_ADDR" => self.server.bind_addr = value,
                "PORT" => {
                    self.server.port = value.parse().with_context(|| format!("{key} is not a port: {value}"))?
                }
                "LOGLEVEL" => self.logging.level = value,
                "LOGFILE" => self.logging.file = Some(PathBuf::from(value)),
                _ => {}
            }
        }
        Ok(())
    }

    pub fn apply_overrides(&mut self, o: Overrides) {
        if let Some(d) = o.directory { self.storage.directory = Some(d); }
        if let Some(b) = o.bind_addr { self.server.bind_addr = b; }
        if let Some(p) = o.port { self.server.port = p; }
        if let Some(l) = o.log_level { self.logging.level = l; }
        if let Some(f) = o.log_file { self.logging.file = Some(f); }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.server.bind_addr.parse::<IpAddr>().is_err() {
            anyhow::bail!("bind_addr is not an IP address: {}", self.server.bind_addr);
        }
        if EnvFilter::try_new(&self.logging.level).is_err() {
            anyhow::bail!("invalid log level: {}", self.logging.level);
        }
        if self.limits.max_request_kb == 0 { anyhow::bail!("max_request_kb must be > 0"); }
        if let Some(dir) = &self.storage.directory {
            if dir.as_os_str().is_empty() { anyhow::bail!("directory must not be empty"); }
        }
        Ok(())
    }

    pub fn addr(&self) -> anyhow::Result<SocketAddr> {
        let ip: IpAddr = self.server.bind_addr.parse().context("parsing bind_addr")?;
        Ok(SocketAddr::new(ip, self.server.port))
    }
}
