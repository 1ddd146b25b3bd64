use crate::api::model::{Domain, NameserverSet, parse_bool};
use crate::api::{NamecheapClient, Response};
use crate::error::{Error, Result};

const GET_LIST: &str = "namecheap.domains.dns.getList";
const SET_DEFAULT: &str = "namecheap.domains.dns.setDefault";
const SET_CUSTOM: &str = "namecheap.domains.dns.setCustom";

/// Nameserver delegation for individual domains.
#[derive(Debug, Clone)]
pub struct Nameservers {
    client: NamecheapClient,
}

impl Nameservers {
    pub fn new(client: NamecheapClient) -> Self {
        Self { client }
    }

    /// Gets the nameservers the domain currently uses.
    pub fn get(&self, domain: &Domain) -> Result<Response<NameserverSet>> {
        let response = self.client.request(GET_LIST, &domain.request_params())?;
        response.try_map(|command| Ok(NameserverSet::from_element(command.require_child("DomainDNSGetListResult")?)))
    }

    /// Points the domain back at Namecheap's own DNS.
    pub fn set_default(&self, domain: &Domain) -> Result<Response<bool>> {
        log::info!("Reverting {domain} to default nameservers");
        let response = self.client.request(SET_DEFAULT, &domain.request_params())?;
        response.try_map(|command| {
            let result = command.require_child("DomainDNSSetDefaultResult")?;
            Ok(parse_bool(result.require_attr("Updated")?))
        })
    }

    /// Delegates the domain to custom nameservers.
    ///
    /// With `overwrite` set the given list replaces the current one. Otherwise any current nameserver missing from
    /// `nameservers` is appended, so the write is a union of both. An empty result is rejected before anything is
    /// sent; use [`set_default`][Self::set_default] instead.
    pub fn set_custom(&self, domain: &Domain, nameservers: &[String], overwrite: bool) -> Result<Response<bool>> {
        let mut nameservers = nameservers.to_vec();
        if !overwrite {
            let current = self.get(domain)?.body;
            merge_nameservers(&mut nameservers, current.nameservers);
        }
        if nameservers.is_empty() {
            return Err(Error::InvalidParameter {
                name: "Nameservers".to_string(),
                reason: "a custom nameserver set needs at least one entry",
            });
        }

        log::info!("Setting {domain} nameservers to {}", nameservers.join(", "));
        let params = domain.request_params().with("Nameservers", nameservers.join(","));
        let response = self.client.request(SET_CUSTOM, &params)?;
        response.try_map(|command| {
            let result = command.require_child("DomainDNSSetCustomResult")?;
            Ok(parse_bool(result.require_attr("Updated")?))
        })
    }

    /// Removes nameservers from the domain's custom set.
    ///
    /// Namecheap does not accept an empty custom set, so removing every nameserver reverts the domain to
    /// [default DNS][Self::set_default] instead. A domain already on default DNS has no custom set to remove from,
    /// so that case fails without writing anything.
    pub fn delete(&self, domain: &Domain, nameservers: &[String]) -> Result<Response<bool>> {
        let current = self.get(domain)?.body;
        if current.using_provider_dns {
            return Err(Error::InvalidParameter {
                name: "Nameservers".to_string(),
                reason: "domain uses Namecheap's default DNS and has no custom nameservers",
            });
        }

        let mut remaining = current.nameservers;
        remaining.retain(|ns| !nameservers.contains(ns));

        if remaining.is_empty() {
            self.set_default(domain)
        } else {
            self.set_custom(domain, &remaining, true)
        }
    }
}

/// Appends every entry of `current` not already in `wanted`.
fn merge_nameservers(wanted: &mut Vec<String>, current: Vec<String>) {
    for ns in current {
        if !wanted.contains(&ns) {
            wanted.push(ns);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_keeps_caller_order_first() {
        let mut wanted = vec!["ns3.example.net".to_string(), "ns1.example.net".to_string()];
        merge_nameservers(&mut wanted, vec!["ns1.example.net".into(), "ns2.example.net".into()]);
        assert_eq!(wanted, ["ns3.example.net", "ns1.example.net", "ns2.example.net"]);
    }
}
