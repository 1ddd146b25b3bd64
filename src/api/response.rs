use std::collections::BTreeMap;

use serde::Serialize;

use super::{Body, RequestInfo, Response, Status};
use crate::error::{Error, Result};

/// An owned copy of one XML element from a response document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Element {
    pub name: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub text: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Element>,
}

impl Element {
    fn from_node(node: roxmltree::Node<'_, '_>) -> Self {
        let attributes = node
            .attributes()
            .map(|attr| (attr.name().to_string(), attr.value().to_string()))
            .collect();

        let text = node
            .children()
            .filter(|child| child.is_text())
            .filter_map(|child| child.text())
            .collect::<String>()
            .trim()
            .to_string();

        let children = node.children().filter(|child| child.is_element()).map(Element::from_node).collect();

        Element {
            name: node.tag_name().name().to_string(),
            attributes,
            text,
            children,
        }
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(|v| &v[..])
    }

    /// Attribute value, or an empty string when absent.
    pub fn attr_or_empty(&self, name: &str) -> &str {
        self.attr(name).unwrap_or("")
    }

    /// The first child element with the given name.
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|child| child.name == name)
    }

    /// All child elements with the given name, in document order.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter(move |child| child.name == name)
    }

    /// Like [`child`][Self::child], but a missing element means the response was not what the command should return.
    pub fn require_child(&self, name: &str) -> Result<&Element> {
        self.child(name)
            .ok_or_else(|| Error::UnparsableResponse(format!("`{}` has no `{name}` element", self.name)))
    }

    /// Like [`attr`][Self::attr], but required.
    pub fn require_attr(&self, name: &str) -> Result<&str> {
        self.attr(name)
            .ok_or_else(|| Error::UnparsableResponse(format!("`{}` has no `{name}` attribute", self.name)))
    }
}

/// Turns the raw text of a Namecheap response into a [`Response`].
///
/// Both `Status="OK"` and `Status="ERROR"` documents parse successfully; deciding what to do with an error status is
/// left to the caller. Anything else is [`Error::UnparsableResponse`].
pub fn parse_response(text: &str, url: &str, request_body: &str) -> Result<Response<Body>> {
    let doc = roxmltree::Document::parse(text).map_err(|err| Error::UnparsableResponse(err.to_string()))?;
    let root = doc.root_element();

    let (status, body) = match root.attribute("Status") {
        Some("ERROR") => {
            let error = child_element(root, "Errors")
                .and_then(|errors| child_element(errors, "Error"))
                .ok_or_else(|| Error::UnparsableResponse("error response without `Errors/Error`".into()))?;

            let body = Body::Error {
                error_code: error
                    .attribute("Number")
                    .ok_or_else(|| Error::UnparsableResponse("`Error` element has no `Number` attribute".into()))?
                    .to_string(),
                error_message: error.text().unwrap_or_default().trim().to_string(),
            };
            (Status::Error, body)
        },
        Some("OK") => {
            let command = child_element(root, "CommandResponse")
                .ok_or_else(|| Error::UnparsableResponse("OK response without `CommandResponse`".into()))?;
            (Status::Ok, Body::Command(Element::from_node(command)))
        },
        Some(other) => return Err(Error::UnparsableResponse(format!("unknown response status `{other}`"))),
        None => return Err(Error::UnparsableResponse("response has no `Status` attribute".into())),
    };

    Ok(Response {
        status,
        request_info: request_info(root, url, request_body),
        body,
    })
}

fn child_element<'a, 'input>(node: roxmltree::Node<'a, 'input>, name: &str) -> Option<roxmltree::Node<'a, 'input>> {
    node.children().find(|child| child.is_element() && child.tag_name().name() == name)
}

fn request_info(root: roxmltree::Node<'_, '_>, url: &str, request_body: &str) -> Option<RequestInfo> {
    let text_of = |name: &str| {
        child_element(root, name).map(|node| node.text().unwrap_or_default().trim().to_string())
    };

    let server = text_of("Server");
    let gmt_time_difference = text_of("GMTTimeDifference");
    let execution_time = text_of("ExecutionTime");

    if server.is_none() && gmt_time_difference.is_none() && execution_time.is_none() {
        return None;
    }

    Some(RequestInfo {
        server,
        gmt_time_difference,
        execution_time,
        url: url.to_string(),
        request_body: request_body.to_string(),
    })
}
