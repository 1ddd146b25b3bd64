use std::fmt::{self, Display};
use std::net::Ipv4Addr;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Error, Result};

const PRODUCTION_URL: &str = "https://api.namecheap.com/xml.response";
const DEVELOPMENT_URL: &str = "https://api.sandbox.namecheap.com/xml.response";

/// Which Namecheap deployment requests are sent to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Production,
    /// The sandbox at `api.sandbox.namecheap.com`.
    Development,
}

impl Environment {
    pub fn endpoint(self) -> &'static str {
        match self {
            Environment::Production => PRODUCTION_URL,
            Environment::Development => DEVELOPMENT_URL,
        }
    }
}

impl Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Environment::Production => "production",
            Environment::Development => "development",
        })
    }
}

/// Validated API credentials and connection settings. Immutable once built.
#[derive(Clone)]
pub struct Config {
    environment: Environment,
    api_key: String,
    api_username: String,
    username: Option<String>,
    client_ip: Ipv4Addr,
    ca_bundle_path: Option<PathBuf>,
}

/// On-disk form of [`Config`]. Unknown keys are rejected outright.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    environment: Environment,
    api_key: String,
    api_username: String,
    username: Option<String>,
    client_ip: String,
    ca_bundle_path: Option<PathBuf>,
}

impl Config {
    /// Builds a configuration from its four required settings.
    pub fn new(
        environment: Environment,
        api_key: impl Into<String>,
        api_username: impl Into<String>,
        client_ip: &str,
    ) -> Result<Self> {
        let api_key = non_empty("api_key", api_key.into())?;
        let api_username = non_empty("api_username", api_username.into())?;
        let client_ip = parse_client_ip(client_ip)?;

        Ok(Self {
            environment,
            api_key,
            api_username,
            username: None,
            client_ip,
            ca_bundle_path: None,
        })
    }

    /// Acts on behalf of a different Namecheap user than the one owning the API key.
    pub fn with_username(mut self, username: impl Into<String>) -> Result<Self> {
        self.username = Some(non_empty("username", username.into())?);
        Ok(self)
    }

    /// Verifies TLS against the certificates in the given PEM bundle instead of the platform trust store.
    pub fn with_ca_bundle(mut self, path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if !path.is_file() {
            return Err(Error::Configuration(format!("CA bundle not found at `{}`", path.display())));
        }
        self.ca_bundle_path = Some(path);
        Ok(self)
    }

    /// Parses and validates a TOML configuration document.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let file: ConfigFile = toml::from_str(text).map_err(|err| Error::Configuration(err.to_string()))?;

        let mut config = Config::new(file.environment, file.api_key, file.api_username, &file.client_ip)?;
        if let Some(username) = file.username {
            config = config.with_username(username)?;
        }
        if let Some(path) = file.ca_bundle_path {
            config = config.with_ca_bundle(path)?;
        }

        Ok(config)
    }

    /// Reads and validates a TOML configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        log::trace!("Reading configuration from {}", path.display());

        let text = std::fs::read_to_string(path)
            .map_err(|err| Error::Configuration(format!("failed to read `{}`: {err}", path.display())))?;
        Self::from_toml_str(&text)
    }

    pub fn environment(&self) -> Environment {
        self.environment
    }

    pub fn endpoint(&self) -> &'static str {
        self.environment.endpoint()
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn api_username(&self) -> &str {
        &self.api_username
    }

    /// The user commands act on; falls back to the API user.
    pub fn username(&self) -> &str {
        self.username.as_deref().unwrap_or(&self.api_username)
    }

    pub fn client_ip(&self) -> Ipv4Addr {
        self.client_ip
    }

    pub fn ca_bundle_path(&self) -> Option<&Path> {
        self.ca_bundle_path.as_deref()
    }
}

// Keep the API key out of debug output.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("environment", &self.environment)
            .field("api_key", &"<redacted>")
            .field("api_username", &self.api_username)
            .field("username", &self.username)
            .field("client_ip", &self.client_ip)
            .field("ca_bundle_path", &self.ca_bundle_path)
            .finish()
    }
}

fn non_empty(key: &str, value: String) -> Result<String> {
    if value.trim().is_empty() {
        Err(Error::Configuration(format!("`{key}` may not be empty")))
    } else {
        Ok(value)
    }
}

fn parse_client_ip(value: &str) -> Result<Ipv4Addr> {
    value
        .parse::<Ipv4Addr>()
        .map_err(|_| Error::Configuration(format!("`{value}` is not a valid IPv4 address for `client_ip`")))
}
