use thiserror::Error;

use crate::api::{Body, Response};

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Everything that can go wrong while talking to Namecheap.
///
/// All of these are raised synchronously at the call site; nothing is retried.
#[derive(Debug, Error)]
pub enum Error {
    /// Missing, unknown, or malformed configuration. Raised while building a [`Config`][crate::Config].
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// A caller-supplied parameter name was unknown or tried to override one of the authentication parameters.
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: String, reason: &'static str },

    /// The HTTP request itself failed (DNS, TLS, timeouts, non-2xx statuses).
    #[error("request to Namecheap failed")]
    Transport(#[from] reqwest::Error),

    /// Namecheap answered with `Status="ERROR"`. The full parsed response is kept for inspection.
    #[error("Namecheap API returned error {code}: {message}")]
    Provider {
        code: String,
        message: String,
        response: Box<Response<Body>>,
    },

    /// The response body was not one of the two document shapes Namecheap is known to send.
    #[error("unable to parse Namecheap response: {0}")]
    UnparsableResponse(String),

    /// A host record handed to a write operation is missing one of its required fields.
    #[error("host record is missing required field `{0}`")]
    MissingField(&'static str),

    /// A host record of the wrong kind was handed to a partitioned write (MX vs. everything else).
    #[error("cannot use record of type {record_type} with {operation}; use {instead} instead")]
    InvalidType {
        record_type: String,
        operation: &'static str,
        instead: &'static str,
    },

    /// A domain name that cannot be split into its SLD and TLD.
    #[error("unable to split `{0}` into second-level and top-level domain")]
    InvalidDomain(String),
}

impl Error {
    /// The provider's numeric error code, if this error came from Namecheap itself.
    pub fn provider_code(&self) -> Option<&str> {
        match self {
            Error::Provider { code, .. } => Some(code),
            _ => None,
        }
    }

    /// The full response attached to a provider error.
    pub fn provider_response(&self) -> Option<&Response<Body>> {
        match self {
            Error::Provider { response, .. } => Some(response),
            _ => None,
        }
    }
}
