//! A client for the [Namecheap API](https://www.namecheap.com/support/api/intro/).
//!
//! Every call is one or more blocking request/response round trips; nothing is cached or retried.
//!
//! ```no_run
//! use namecheap::{Config, Environment, Namecheap};
//!
//! # fn main() -> namecheap::Result<()> {
//! let config = Config::new(Environment::Development, "api-key", "api-user", "203.0.113.7")?;
//! let namecheap = Namecheap::new(config)?;
//!
//! if let Some(domain) = namecheap.domains().get("example.com")?.body {
//!     let nameservers = namecheap.nameservers().get(&domain)?.body;
//!     println!("{domain}: {:?}", nameservers.nameservers);
//! }
//! # Ok(())
//! # }
//! ```

pub mod account;
pub mod api;
pub mod config;
pub mod domains;
pub mod email_forwarding;
pub mod error;
pub mod hosts;
pub mod nameservers;

pub use self::account::Account;
pub use self::api::model::{Balances, Domain, DomainList, EmailForward, HostRecord, NameserverSet, Pagination, RecordType};
pub use self::api::{NamecheapClient, Response, Status, Transport};
pub use self::config::{Config, Environment};
pub use self::domains::{Domains, ListFilters};
pub use self::email_forwarding::EmailForwarding;
pub use self::error::{Error, Result};
pub use self::hosts::Hosts;
pub use self::nameservers::Nameservers;

/// Entry point holding one handle per functional area, all sharing a single client.
#[derive(Debug, Clone)]
pub struct Namecheap {
    domains: Domains,
    nameservers: Nameservers,
    hosts: Hosts,
    email_forwarding: EmailForwarding,
    account: Account,
}

impl Namecheap {
    /// Connects to Namecheap over HTTPS.
    pub fn new(config: Config) -> Result<Self> {
        Ok(Self::from_client(NamecheapClient::new(config)?))
    }

    /// Sends requests through the given transport instead of HTTPS.
    pub fn with_transport(config: Config, transport: impl Transport + 'static) -> Self {
        Self::from_client(NamecheapClient::with_transport(config, transport))
    }

    pub fn from_client(client: NamecheapClient) -> Self {
        Self {
            domains: Domains::new(client.clone()),
            nameservers: Nameservers::new(client.clone()),
            hosts: Hosts::new(client.clone()),
            email_forwarding: EmailForwarding::new(client.clone()),
            account: Account::new(client),
        }
    }

    pub fn domains(&self) -> &Domains {
        &self.domains
    }

    pub fn nameservers(&self) -> &Nameservers {
        &self.nameservers
    }

    pub fn hosts(&self) -> &Hosts {
        &self.hosts
    }

    pub fn email_forwarding(&self) -> &EmailForwarding {
        &self.email_forwarding
    }

    pub fn account(&self) -> &Account {
        &self.account
    }
}
