mod client;
pub mod model;
mod request;
mod response;
mod transport;

use serde::Serialize;

pub use self::client::NamecheapClient;
pub use self::request::{Params, RESERVED_PARAMS, build_query};
pub use self::response::{Element, parse_response};
pub use self::transport::{HttpTransport, Transport};

/// Outcome reported by the `Status` attribute of every Namecheap response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Ok,
    Error,
}

/// Diagnostics Namecheap attaches to a response, plus where the request went.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequestInfo {
    pub server: Option<String>,
    pub gmt_time_difference: Option<String>,
    pub execution_time: Option<String>,
    pub url: String,
    /// The URL-encoded form body that was sent, including credentials.
    #[serde(skip)]
    pub request_body: String,
}

/// A single parsed API response.
///
/// `T` starts out as the raw [`Body`] and is mapped into a typed record by the functional handles.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Response<T> {
    pub status: Status,
    pub request_info: Option<RequestInfo>,
    pub body: T,
}

impl<T> Response<T> {
    /// Replaces the body while keeping the status and request information.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Response<U> {
        Response {
            status: self.status,
            request_info: self.request_info,
            body: f(self.body),
        }
    }

    /// Fallible version of [`map`][Self::map].
    pub fn try_map<U, E>(self, f: impl FnOnce(T) -> Result<U, E>) -> Result<Response<U>, E> {
        Ok(Response {
            status: self.status,
            request_info: self.request_info,
            body: f(self.body)?,
        })
    }

    pub fn is_ok(&self) -> bool {
        self.status == Status::Ok
    }
}

/// The two shapes a response body can take.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Body {
    /// The `CommandResponse` element of a successful call.
    Command(Element),
    /// The first entry of `Errors` from a failed call.
    Error { error_code: String, error_message: String },
}
