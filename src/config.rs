// Configuration loading, validation, and default generation
use std::fs;
use std::net::SocketAddr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::http::DEFAULT_BUFFER_SIZE;

pub const DEFAULT_PATH: &str = "config.toml";
pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:42069";

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub server: Srv,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Srv {
    pub listen_addr: String,
    /// Initial size of each connection's parse buffer; it doubles as needed.
    pub buffer_size: usize,
    pub log_level: String,
    pub logging: bool,
}

impl Default for Srv {
    fn default() -> Self {
        Srv {
            listen_addr: DEFAULT_LISTEN_ADDR.to_string(),
            buffer_size: DEFAULT_BUFFER_SIZE,
            log_level: "info".to_string(),
            logging: true,
        }
    }
}

impl Srv {
    /// Repair invalid fields in place. Returns false if something had to be replaced
    /// because it could not be used at all.
    pub fn validate(&mut self) -> bool {
        let mut valid = true;

        if self.listen_addr.parse::<SocketAddr>().is_err() {
            tracing::error!(
                listen_addr = %self.listen_addr,
                fallback = DEFAULT_LISTEN_ADDR,
                "listen_addr is not a valid address (expected ip:port)"
            );
            self.listen_addr = DEFAULT_LISTEN_ADDR.to_string();
            valid = false;
        }
        if self.buffer_size == 0 {
            tracing::warn!("buffer_size is 0, using {DEFAULT_BUFFER_SIZE}");
            self.buffer_size = DEFAULT_BUFFER_SIZE;
        }
        let lvl = self.log_level.to_lowercase();
        if !matches!(lvl.as_str(), "trace" | "debug" | "info" | "warn" | "warning" | "error" | "off") {
            tracing::warn!(log_level = %self.log_level, "unknown log_level, using info");
            self.log_level = "info".to_string();
        }

        valid
    }
}

/// Where the loaded configuration came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    File(String),
    Generated(String),
}

fn atomic_write(path: &str, content: &str) -> std::io::Result<()> {
    let tmp = format!("{path}.tmp");
    fs::write(&tmp, content)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

/// Load `path`, writing a default file first if it does not exist.
pub fn load(path: &str) -> Result<(Config, Source), ConfigError> {
    match fs::read_to_string(path) {
        Ok(txt) => {
            let cfg = parse(&txt).map_err(|source| ConfigError::Parse { path: path.to_string(), source })?;
            Ok((cfg, Source::File(path.to_string())))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            let cfg = Config::default();
            let content = generate(&cfg)?;
            atomic_write(path, &content).map_err(|source| ConfigError::Write { path: path.to_string(), source })?;
            Ok((cfg, Source::Generated(path.to_string())))
        }
        Err(source) => Err(ConfigError::Read { path: path.to_string(), source }),
    }
}

pub fn parse(txt: &str) -> Result<Config, toml::de::Error> {
    toml::from_str(txt)
}

pub fn generate(cfg: &Config) -> Result<String, ConfigError> {
    Ok(toml::to_string_pretty(cfg)?)
}

/// Config path from `--config <path>` in `args`, else the default.
pub fn path(args: &[String]) -> String {
    args.windows(2)
        .find(|w| w[0] == "--config")
        .map(|w| w[1].clone())
        .unwrap_or_else(|| DEFAULT_PATH.to_string())
}
