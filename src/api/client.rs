use std::fmt;
use std::sync::Arc;

use super::{Body, Element, HttpTransport, Params, Response, Transport, build_query, parse_response};
use crate::config::Config;
use crate::error::{Error, Result};

/// Most of a response body that ends up in trace logs.
const LOG_BODY_LIMIT: usize = 512;

/// The access point to the Namecheap API: credentials plus a [`Transport`] to send commands over.
///
/// Cheap to clone; every functional handle holds one.
#[derive(Clone)]
pub struct NamecheapClient {
    config: Arc<Config>,
    transport: Arc<dyn Transport>,
}

impl NamecheapClient {
    /// Connects over HTTPS using the settings in `config`.
    pub fn new(config: Config) -> Result<Self> {
        let transport = HttpTransport::new(&config)?;
        Ok(Self::with_transport(config, transport))
    }

    /// Uses a caller-provided transport instead of HTTPS.
    pub fn with_transport(config: Config, transport: impl Transport + 'static) -> Self {
        Self {
            config: Arc::new(config),
            transport: Arc::new(transport),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Sends one command and returns its `CommandResponse` element.
    ///
    /// A response with `Status="ERROR"` becomes [`Error::Provider`], carrying the whole parsed response.
    pub fn request(&self, command: &str, params: &Params) -> Result<Response<Element>> {
        let url = self.config.endpoint();
        let body = build_query(&self.config, command, params)?;

        log::debug!("POST {url} {command} ({})", redact_api_key(&body));

        let text = self.transport.post_form(url, &body)?;
        log::trace!("{command} response: {}", truncate_for_log(&text));

        let response = parse_response(&text, url, &body)?;
        match response.body {
            Body::Command(element) => Ok(Response {
                status: response.status,
                request_info: response.request_info,
                body: element,
            }),
            Body::Error {
                ref error_code,
                ref error_message,
            } => {
                log::warn!("{command} failed with error {error_code}: {error_message}");
                Err(Error::Provider {
                    code: error_code.clone(),
                    message: error_message.clone(),
                    response: Box::new(response),
                })
            },
        }
    }
}

impl fmt::Debug for NamecheapClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NamecheapClient").field("config", &self.config).finish_non_exhaustive()
    }
}

/// Replaces the value of the `ApiKey` parameter in a form body.
fn redact_api_key(body: &str) -> String {
    body.split('&')
        .map(|pair| if pair.starts_with("ApiKey=") { "ApiKey=<redacted>" } else { pair })
        .collect::<Vec<_>>()
        .join("&")
}

fn truncate_for_log(text: &str) -> String {
    if text.len() <= LOG_BODY_LIMIT {
        return text.to_string();
    }

    let mut end = LOG_BODY_LIMIT;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}... [{} bytes total]", &text[..end], text.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_key_is_redacted() {
        let body = "ApiUser=me&ApiKey=abc123&Username=me&Command=x";
        assert_eq!(redact_api_key(body), "ApiUser=me&ApiKey=<redacted>&Username=me&Command=x");
    }

    #[test]
    fn long_bodies_are_truncated_on_char_boundary() {
        let text = "é".repeat(LOG_BODY_LIMIT);
        let out = truncate_for_log(&text);
        assert!(out.ends_with(&format!("[{} bytes total]", text.len())));
        assert!(truncate_for_log("short") == "short");
    }
}
