use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::redirect::Policy;

use crate::config::Config;
use crate::error::{Error, Result};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(8);
const TOTAL_TIMEOUT: Duration = Duration::from_secs(120);
const MAX_REDIRECTS: usize = 3;

/// Sends a URL-encoded form body to Namecheap and hands back the raw response text.
///
/// [`HttpTransport`] is the real implementation; tests substitute their own.
pub trait Transport: Send + Sync {
    fn post_form(&self, url: &str, body: &str) -> Result<String>;
}

/// Blocking HTTPS transport built on [`reqwest`].
#[derive(Debug, Clone)]
pub struct HttpTransport {
    reqwest: Client,
}

impl HttpTransport {
    /// Builds the HTTP client, trusting only the configured CA bundle if one was given.
    pub fn new(config: &Config) -> Result<Self> {
        let ua_str = format!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
        let ua = HeaderValue::from_str(&ua_str)
            .map_err(|_| Error::Configuration(format!("invalid user agent `{ua_str}`")))?;

        let mut builder = Client::builder()
            .default_headers(HeaderMap::from_iter([
                (reqwest::header::ACCEPT, HeaderValue::from_static("text/xml")),
                (reqwest::header::USER_AGENT, ua),
            ]))
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(TOTAL_TIMEOUT)
            .redirect(Policy::limited(MAX_REDIRECTS))
            .https_only(true);

        if let Some(path) = config.ca_bundle_path() {
            let pem = std::fs::read(path)
                .map_err(|err| Error::Configuration(format!("failed to read CA bundle `{}`: {err}", path.display())))?;
            let certs = reqwest::Certificate::from_pem_bundle(&pem)
                .map_err(|err| Error::Configuration(format!("invalid CA bundle `{}`: {err}", path.display())))?;
            if certs.is_empty() {
                return Err(Error::Configuration(format!("no certificates found in `{}`", path.display())));
            }

            builder = builder.tls_built_in_root_certs(false);
            for cert in certs {
                builder = builder.add_root_certificate(cert);
            }
        }

        let reqwest = builder
            .build()
            .map_err(|err| Error::Configuration(format!("failed to set up HTTP client: {err}")))?;
        Ok(Self { reqwest })
    }
}

impl Transport for HttpTransport {
    fn post_form(&self, url: &str, body: &str) -> Result<String> {
        let res = self
            .reqwest
            .post(url)
            .header(reqwest::header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(body.to_string())
            .send()?
            .error_for_status()?;

        Ok(res.text()?)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::config::Environment;

    fn config() -> Config {
        Config::new(Environment::Development, "key", "user", "10.0.0.1").unwrap()
    }

    #[test]
    fn builds_with_platform_roots() {
        assert!(HttpTransport::new(&config()).is_ok());
    }

    #[test]
    fn garbage_ca_bundle_is_a_configuration_error() {
        let mut bundle = tempfile::NamedTempFile::new().unwrap();
        writeln!(bundle, "-----BEGIN CERTIFICATE-----\nnot base64 !!!\n-----END CERTIFICATE-----").unwrap();
        let config = config().with_ca_bundle(bundle.path()).unwrap();

        match HttpTransport::new(&config) {
            Err(Error::Configuration(message)) => assert!(message.contains("CA bundle")),
            other => panic!("expected a configuration error, got {other:?}"),
        }
    }

    #[test]
    fn empty_ca_bundle_is_a_configuration_error() {
        let bundle = tempfile::NamedTempFile::new().unwrap();
        let config = config().with_ca_bundle(bundle.path()).unwrap();
        assert!(matches!(HttpTransport::new(&config), Err(Error::Configuration(_))));
    }
}
