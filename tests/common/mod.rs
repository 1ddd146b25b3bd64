//! Shared fixtures for driving the client without a network.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use namecheap::{Config, Environment, Error, Namecheap, Result, Transport};

/// One request captured by [`MockTransport`].
#[derive(Debug, Clone)]
pub struct Sent {
    pub url: String,
    pub params: Vec<(String, String)>,
}

impl Sent {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.params.iter().find(|(k, _)| k == key).map(|(_, v)| &v[..])
    }

    pub fn command(&self) -> &str {
        self.get("Command").unwrap_or_default()
    }

    /// Parameters after the five authentication parameters.
    pub fn extra(&self) -> Vec<(&str, &str)> {
        self.params.iter().skip(5).map(|(k, v)| (&k[..], &v[..])).collect()
    }
}

#[derive(Debug, Default)]
struct Inner {
    responses: VecDeque<String>,
    sent: Vec<Sent>,
}

/// Replays canned response documents in order and records every request it is given.
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    inner: Arc<Mutex<Inner>>,
}

impl MockTransport {
    pub fn new<S: Into<String>>(responses: impl IntoIterator<Item = S>) -> Self {
        let inner = Inner {
            responses: responses.into_iter().map(Into::into).collect(),
            sent: Vec::new(),
        };
        Self {
            inner: Arc::new(Mutex::new(inner)),
        }
    }

    pub fn sent(&self) -> Vec<Sent> {
        self.inner.lock().unwrap().sent.clone()
    }

    pub fn commands(&self) -> Vec<String> {
        self.sent().iter().map(|s| s.command().to_string()).collect()
    }
}

impl Transport for MockTransport {
    fn post_form(&self, url: &str, body: &str) -> Result<String> {
        let params = body
            .split('&')
            .filter_map(|pair| pair.split_once('='))
            .map(|(k, v)| {
                let k = urlencoding::decode(k).unwrap().into_owned();
                let v = urlencoding::decode(v).unwrap().into_owned();
                (k, v)
            })
            .collect();

        let mut inner = self.inner.lock().unwrap();
        inner.sent.push(Sent {
            url: url.to_string(),
            params,
        });
        inner
            .responses
            .pop_front()
            .ok_or_else(|| Error::UnparsableResponse("mock transport ran out of responses".into()))
    }
}

pub fn config() -> Config {
    Config::new(Environment::Development, "7fyhd879hs87hf897dhfds445", "myusername", "112.112.112.112").unwrap()
}

/// A facade wired to a fresh mock, plus a handle on the mock for inspection.
pub fn namecheap<S: Into<String>>(responses: impl IntoIterator<Item = S>) -> (Namecheap, MockTransport) {
    let transport = MockTransport::new(responses);
    (Namecheap::with_transport(config(), transport.clone()), transport)
}

/// Wraps `inner` in a successful response document.
pub fn ok(command: &str, inner: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="utf-8"?>
<ApiResponse Status="OK" xmlns="http://api.namecheap.com/xml.response">
  <Errors />
  <Warnings />
  <RequestedCommand>{command}</RequestedCommand>
  <CommandResponse Type="{command}">
    {inner}
  </CommandResponse>
  <Server>PHX01SBAPIEXT05</Server>
  <GMTTimeDifference>--4:00</GMTTimeDifference>
  <ExecutionTime>0.011</ExecutionTime>
</ApiResponse>"#
    )
}

/// A failed response document with a single error.
pub fn error(number: &str, message: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="utf-8"?>
<ApiResponse Status="ERROR" xmlns="http://api.namecheap.com/xml.response">
  <Errors>
    <Error Number="{number}">{message}</Error>
  </Errors>
  <Warnings />
  <RequestedCommand>namecheap.domains.dns.gethosts</RequestedCommand>
  <Server>PHX01SBAPIEXT05</Server>
  <GMTTimeDifference>--4:00</GMTTimeDifference>
  <ExecutionTime>0.004</ExecutionTime>
</ApiResponse>"#
    )
}

pub fn domain_list(domains: &[&str], total: u32, page: u32, page_size: u32) -> String {
    let entries: String = domains
        .iter()
        .enumerate()
        .map(|(i, name)| {
            format!(
                r#"<Domain ID="{id}" Name="{name}" User="myusername" Created="02/15/2016" Expires="02/15/2027" IsExpired="false" IsLocked="{locked}" AutoRenew="true" WhoisGuard="ENABLED" IsPremium="false" IsOurDNS="true"/>"#,
                id = 100 + i,
                locked = i % 2 == 0,
            )
        })
        .collect();

    ok(
        "namecheap.domains.getList",
        &format!(
            "<DomainGetListResult>{entries}</DomainGetListResult>\
             <Paging><TotalItems>{total}</TotalItems><CurrentPage>{page}</CurrentPage><PageSize>{page_size}</PageSize></Paging>"
        ),
    )
}

pub fn nameserver_list(domain: &str, nameservers: &[&str]) -> String {
    let entries: String = nameservers.iter().map(|ns| format!("<Nameserver>{ns}</Nameserver>")).collect();
    ok(
        "namecheap.domains.dns.getList",
        &format!(r#"<DomainDNSGetListResult Domain="{domain}" IsUsingOurDNS="false">{entries}</DomainDNSGetListResult>"#),
    )
}

/// `(name, type, address, mx_pref)` tuples as a `getHosts` result.
pub fn host_list(domain: &str, hosts: &[(&str, &str, &str, &str)]) -> String {
    let entries: String = hosts
        .iter()
        .enumerate()
        .map(|(i, (name, typ, address, pref))| {
            format!(
                r#"<host HostId="{id}" Name="{name}" Type="{typ}" Address="{address}" MXPref="{pref}" TTL="1800" AssociatedAppTitle="" FriendlyName="" IsActive="true" IsDDNSEnabled="false"/>"#,
                id = 1000 + i,
            )
        })
        .collect();

    ok(
        "namecheap.domains.dns.getHosts",
        &format!(r#"<DomainDNSGetHostsResult Domain="{domain}" EmailType="MX" IsUsingOurDNS="true">{entries}</DomainDNSGetHostsResult>"#),
    )
}

pub fn flag_result(command: &str, element: &str, attr: &str, domain: &str) -> String {
    ok(command, &format!(r#"<{element} Domain="{domain}" {attr}="true"/>"#))
}
