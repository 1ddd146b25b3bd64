use std::fmt::Display;

use crate::config::Config;
use crate::error::{Error, Result};

/// Parameter names filled in from the [`Config`] on every call. Callers may not supply these themselves.
pub const RESERVED_PARAMS: [&str; 5] = ["ApiUser", "ApiKey", "Username", "ClientIp", "Command"];

/// Command-specific request parameters, kept in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params(Vec<(String, String)>);

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a parameter. A key that is already present keeps its position and takes the new value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Display) -> &mut Self {
        let key = key.into();
        let value = value.to_string();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.0.push((key, value)),
        }
        self
    }

    /// Builder-style [`insert`][Self::insert].
    pub fn with(mut self, key: impl Into<String>, value: impl Display) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| &v[..])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (&k[..], &v[..]))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Extend<(String, String)> for Params {
    fn extend<I: IntoIterator<Item = (String, String)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<K: Into<String>, V: Display> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Params::new();
        for (key, value) in iter {
            params.insert(key, value);
        }
        params
    }
}

/// Flattens a command into the URL-encoded form body Namecheap expects.
///
/// Authentication parameters always come first, in the order of [`RESERVED_PARAMS`], followed by `extra` in insertion
/// order.
pub fn build_query(config: &Config, command: &str, extra: &Params) -> Result<String> {
    if command.trim().is_empty() {
        return Err(Error::InvalidParameter {
            name: "Command".to_string(),
            reason: "command name may not be empty",
        });
    }

    if let Some((key, _)) = extra.iter().find(|(key, _)| RESERVED_PARAMS.contains(key)) {
        return Err(Error::InvalidParameter {
            name: key.to_string(),
            reason: "cannot redeclare an authentication parameter",
        });
    }

    let client_ip = config.client_ip().to_string();
    let auth = [
        ("ApiUser", config.api_username()),
        ("ApiKey", config.api_key()),
        ("Username", config.username()),
        ("ClientIp", &client_ip[..]),
        ("Command", command),
    ];

    let pairs = auth.into_iter().chain(extra.iter());
    let query = pairs
        .map(|(key, value)| format!("{}={}", urlencoding::encode(key), urlencoding::encode(value)))
        .collect::<Vec<_>>()
        .join("&");

    Ok(query)
}
