//! Host and mail record management.
//!
//! Namecheap only offers a single write primitive for DNS records, `namecheap.domains.dns.setHosts`, which replaces
//! the domain's entire record set. Every change here is therefore a read of the full set, a local edit, and a write
//! of the full set back. Records are split into two partitions that are edited independently: mail records (`MX` and
//! `MXE`) and everything else.

use std::collections::HashMap;

use crate::api::model::{Domain, HostRecord, RecordType, parse_bool};
use crate::api::{NamecheapClient, Params, Response};
use crate::error::{Error, Result};

const GET_HOSTS: &str = "namecheap.domains.dns.getHosts";
const SET_HOSTS: &str = "namecheap.domains.dns.setHosts";

/// Preference sent for `MX` records that don't specify one.
const DEFAULT_MX_PREF: u32 = 10;

/// A domain's records split into mail and non-mail partitions, each in the order Namecheap returned them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostPartitions {
    pub mx: Vec<HostRecord>,
    pub other: Vec<HostRecord>,
}

impl HostPartitions {
    pub fn split(records: Vec<HostRecord>) -> Self {
        let (mx, other) = records.into_iter().partition(HostRecord::is_mail);
        Self { mx, other }
    }
}

/// DNS host records for individual domains.
#[derive(Debug, Clone)]
pub struct Hosts {
    client: NamecheapClient,
}

impl Hosts {
    pub fn new(client: NamecheapClient) -> Self {
        Self { client }
    }

    /// Gets every host record on the domain, mail records included.
    pub fn get_all(&self, domain: &Domain) -> Result<Response<Vec<HostRecord>>> {
        let response = self.client.request(GET_HOSTS, &domain.request_params())?;
        response.try_map(|command| {
            let result = command.require_child("DomainDNSGetHostsResult")?;
            Ok(result.children_named("host").map(HostRecord::from_element).collect())
        })
    }

    /// Gets only the `MX` and `MXE` records.
    pub fn mx_records(&self, domain: &Domain) -> Result<Response<Vec<HostRecord>>> {
        Ok(self.partitions(domain)?.map(|parts| parts.mx))
    }

    /// Gets every record except `MX` and `MXE`.
    pub fn host_records(&self, domain: &Domain) -> Result<Response<Vec<HostRecord>>> {
        Ok(self.partitions(domain)?.map(|parts| parts.other))
    }

    fn partitions(&self, domain: &Domain) -> Result<Response<HostPartitions>> {
        Ok(self.get_all(domain)?.map(HostPartitions::split))
    }

    /// Adds or replaces mail records, matched by host name. Non-mail records are left as they are.
    pub fn set_mx_records(&self, domain: &Domain, hosts: &[HostRecord]) -> Result<Response<bool>> {
        for host in hosts {
            validate(host)?;
            if !host.is_mail() {
                return Err(Error::InvalidType {
                    record_type: host.record_type.to_string(),
                    operation: "set_mx_records",
                    instead: "set_host_records",
                });
            }
        }

        let HostPartitions { mut mx, other } = self.partitions(domain)?.body;
        upsert_by_name(&mut mx, hosts);
        mx.extend(other);
        self.write(domain, &mx)
    }

    /// Adds or replaces non-mail records, matched by host name. Mail records are left as they are.
    pub fn set_host_records(&self, domain: &Domain, hosts: &[HostRecord]) -> Result<Response<bool>> {
        for host in hosts {
            validate(host)?;
            if host.is_mail() {
                return Err(Error::InvalidType {
                    record_type: host.record_type.to_string(),
                    operation: "set_host_records",
                    instead: "set_mx_records",
                });
            }
        }

        let HostPartitions { mx, mut other } = self.partitions(domain)?.body;
        upsert_by_name(&mut other, hosts);
        other.extend(mx);
        self.write(domain, &other)
    }

    /// Removes every mail record whose host name is in `names`.
    pub fn delete_mx_hosts(&self, domain: &Domain, names: &[String]) -> Result<Response<bool>> {
        let HostPartitions { mut mx, other } = self.partitions(domain)?.body;
        mx.retain(|host| !names.contains(&host.host_name));
        mx.extend(other);
        self.write(domain, &mx)
    }

    /// Removes every non-mail record whose host name is in `names`.
    pub fn delete_host_records(&self, domain: &Domain, names: &[String]) -> Result<Response<bool>> {
        let HostPartitions { mx, mut other } = self.partitions(domain)?.body;
        other.retain(|host| !names.contains(&host.host_name));
        other.extend(mx);
        self.write(domain, &other)
    }

    /// Replaces the domain's whole record set with `hosts`.
    fn write(&self, domain: &Domain, hosts: &[HostRecord]) -> Result<Response<bool>> {
        let mut params = domain.request_params();
        params.extend(host_params(hosts)?.iter().map(|(k, v)| (k.to_string(), v.to_string())));

        log::info!("Writing {} host records for {domain}", hosts.len());
        let response = self.client.request(SET_HOSTS, &params)?;
        response.try_map(|command| {
            let result = command.require_child("DomainDNSSetHostsResult")?;
            Ok(parse_bool(result.require_attr("IsSuccess")?))
        })
    }
}

/// Overwrites records in `current` that share a host name with one in `incoming`, appending the rest.
///
/// When `current` holds several records with the same host name, the last of them is the one replaced.
fn upsert_by_name(current: &mut Vec<HostRecord>, incoming: &[HostRecord]) {
    let index: HashMap<String, usize> =
        current.iter().enumerate().map(|(i, host)| (host.host_name.clone(), i)).collect();

    for host in incoming {
        match index.get(&host.host_name) {
            Some(&i) => current[i] = host.clone(),
            None => current.push(host.clone()),
        }
    }
}

fn validate(host: &HostRecord) -> Result<()> {
    if host.host_name.trim().is_empty() {
        return Err(Error::MissingField("host_name"));
    }
    if host.record_type.as_str().is_empty() {
        return Err(Error::MissingField("type"));
    }
    if host.address.trim().is_empty() {
        return Err(Error::MissingField("address"));
    }
    Ok(())
}

/// Flattens records into `setHosts` parameters, numbered by their zero-based position in `hosts`.
pub fn host_params(hosts: &[HostRecord]) -> Result<Params> {
    let mut params = Params::new();
    for (i, host) in hosts.iter().enumerate() {
        validate(host)?;

        params.insert(format!("HostName{i}"), &host.host_name);
        params.insert(format!("RecordType{i}"), &host.record_type);
        params.insert(format!("Address{i}"), &host.address);

        if host.record_type == RecordType::MX {
            params.insert(format!("MXPref{i}"), host.mx_pref.unwrap_or(DEFAULT_MX_PREF));
        }
        if let Some(email_type) = &host.email_type {
            params.insert(format!("EmailType{i}"), email_type);
        }
        if let Some(ttl) = host.ttl {
            params.insert(format!("TTL{i}"), ttl);
        }
    }

    Ok(params)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn host(name: &str, typ: RecordType, address: &str) -> HostRecord {
        HostRecord::new(name, typ, address)
    }

    #[test]
    fn split_preserves_order() {
        let parts = HostPartitions::split(vec![
            host("@", RecordType::A, "1.2.3.4"),
            host("@", RecordType::MX, "mx1.example.net"),
            host("www", RecordType::CNAME, "example.com."),
            host("mail", RecordType::MXE, "5.6.7.8"),
        ]);

        let mx: Vec<_> = parts.mx.iter().map(|h| &h.address[..]).collect();
        let other: Vec<_> = parts.other.iter().map(|h| &h.address[..]).collect();
        assert_eq!(mx, ["mx1.example.net", "5.6.7.8"]);
        assert_eq!(other, ["1.2.3.4", "example.com."]);
    }

    #[test]
    fn upsert_replaces_by_name_and_appends_new() {
        let mut current = vec![host("@", RecordType::A, "1.1.1.1"), host("www", RecordType::CNAME, "example.com.")];
        upsert_by_name(&mut current, &[
            host("www", RecordType::A, "2.2.2.2"),
            host("blog", RecordType::CNAME, "ghs.example.net."),
        ]);

        let flat: Vec<_> = current.iter().map(|h| (&h.host_name[..], &h.address[..])).collect();
        assert_eq!(flat, [("@", "1.1.1.1"), ("www", "2.2.2.2"), ("blog", "ghs.example.net.")]);
    }

    #[test]
    fn params_are_indexed_from_zero() {
        let params = host_params(&[
            host("@", RecordType::A, "1.2.3.4").with_ttl(1800),
            host("@", RecordType::MX, "mx.example.net"),
            host("alt", RecordType::MX, "mx2.example.net").with_mx_pref(20),
            HostRecord {
                email_type: Some("MX".into()),
                ..host("mail", RecordType::MXE, "5.6.7.8")
            },
        ])
        .unwrap();

        assert_eq!(params.get("HostName0"), Some("@"));
        assert_eq!(params.get("RecordType0"), Some("A"));
        assert_eq!(params.get("TTL0"), Some("1800"));
        assert_eq!(params.get("MXPref0"), None);
        assert_eq!(params.get("MXPref1"), Some("10"));
        assert_eq!(params.get("MXPref2"), Some("20"));
        assert_eq!(params.get("RecordType3"), Some("MXE"));
        assert_eq!(params.get("MXPref3"), None);
        assert_eq!(params.get("EmailType3"), Some("MX"));
        for i in 0..3 {
            assert_eq!(params.get(&format!("EmailType{i}")), None);
        }
        assert_eq!(params.get("HostName4"), None);
    }

    #[test]
    fn params_require_name_type_and_address() {
        let missing_name = host("", RecordType::A, "1.2.3.4");
        let missing_type = host("@", RecordType::Other(String::new()), "1.2.3.4");
        let missing_address = host("@", RecordType::A, " ");

        assert!(matches!(host_params(&[missing_name]), Err(Error::MissingField("host_name"))));
        assert!(matches!(host_params(&[missing_type]), Err(Error::MissingField("type"))));
        assert!(matches!(host_params(&[missing_address]), Err(Error::MissingField("address"))));
    }
}
