use crate::api::model::{Domain, EmailForward, parse_bool};
use crate::api::{NamecheapClient, Params, Response};
use crate::error::Result;

const GET_FORWARDING: &str = "namecheap.domains.dns.getEmailForwarding";
const SET_FORWARDING: &str = "namecheap.domains.dns.setEmailForwarding";

/// Email forwarding rules for individual domains.
#[derive(Debug, Clone)]
pub struct EmailForwarding {
    client: NamecheapClient,
}

impl EmailForwarding {
    pub fn new(client: NamecheapClient) -> Self {
        Self { client }
    }

    pub fn get(&self, domain: &Domain) -> Result<Response<Vec<EmailForward>>> {
        let params = Params::new().with("DomainName", &domain.name);
        let response = self.client.request(GET_FORWARDING, &params)?;
        response.try_map(|command| {
            let result = command.require_child("DomainDNSGetEmailForwardingResult")?;
            Ok(result.children_named("Forward").map(EmailForward::from_element).collect())
        })
    }

    /// Adds or updates forwarding rules. Mailboxes not mentioned in `entries` keep their current rules.
    pub fn set(&self, domain: &Domain, entries: &[EmailForward]) -> Result<Response<bool>> {
        log::info!("Setting {} forwarding rules for {domain}", entries.len());
        let response = self.client.request(SET_FORWARDING, &forwarding_params(domain, entries))?;
        response.try_map(|command| {
            let result = command.require_child("DomainDNSSetEmailForwardingResult")?;
            Ok(parse_bool(result.require_attr("IsSuccess")?))
        })
    }

    /// Drops every rule whose mailbox is in `mailboxes` or whose target address is in `emails`, then writes back
    /// the rules that are left.
    pub fn remove(&self, domain: &Domain, mailboxes: &[String], emails: &[String]) -> Result<Response<bool>> {
        let mut entries = self.get(domain)?.body;
        entries.retain(|entry| !mailboxes.contains(&entry.mailbox) && !emails.contains(&entry.forwarding_email));
        self.set(domain, &entries)
    }
}

/// `MailBox{i}`/`ForwardTo{i}` pairs, numbered from 1.
fn forwarding_params(domain: &Domain, entries: &[EmailForward]) -> Params {
    let mut params = Params::new().with("DomainName", &domain.name);
    for (i, entry) in (1..).zip(entries) {
        params.insert(format!("MailBox{i}"), &entry.mailbox);
        params.insert(format!("ForwardTo{i}"), &entry.forwarding_email);
    }
    params
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn params_are_numbered_from_one() {
        let domain = Domain::new("example.com").unwrap();
        let params = forwarding_params(&domain, &[
            EmailForward::new("info", "me@example.org"),
            EmailForward::new("sales", "team@example.org"),
        ]);

        let flat: Vec<_> = params.iter().collect();
        assert_eq!(flat, [
            ("DomainName", "example.com"),
            ("MailBox1", "info"),
            ("ForwardTo1", "me@example.org"),
            ("MailBox2", "sales"),
            ("ForwardTo2", "team@example.org"),
        ]);
    }
}
