use std::fmt::{self, Display};
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Serialize, Serializer};

use super::{Element, Params};
use crate::error::{Error, Result};

/// Date format Namecheap uses for `Created` and `Expires`.
const DATE_FMT: &str = "%m/%d/%Y";

/// Coerces one of Namecheap's textual booleans.
///
/// `true`, `1`, `yes` and `on` (in any case) are true; everything else, including an empty string, is false.
pub fn parse_bool(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "true" | "1" | "yes" | "on")
}

/// Parses an optional number, treating empty or garbled values as absent.
fn parse_opt_u32(value: Option<&str>) -> Option<u32> {
    value.map(str::trim).filter(|v| !v.is_empty()).and_then(|v| v.parse().ok())
}

/// A domain registered to the account, as returned by `namecheap.domains.getList`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Domain {
    pub id: String,
    pub name: String,
    pub username: String,
    pub created: String,
    pub expires: String,
    pub whois_guard: String,
    pub is_expired: bool,
    pub is_locked: bool,
    pub auto_renew: bool,
    sld: String,
    tld: String,
}

impl Domain {
    /// Creates a bare domain record from just its name; every other field is left empty.
    ///
    /// Fails when the name cannot be split into an SLD and TLD.
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        let (sld, tld) = split_domain(&name)?;
        Ok(Self {
            id: String::new(),
            username: String::new(),
            created: String::new(),
            expires: String::new(),
            whois_guard: String::new(),
            is_expired: false,
            is_locked: false,
            auto_renew: false,
            sld: sld.to_string(),
            tld: tld.to_string(),
            name,
        })
    }

    /// Builds a domain from a `<Domain>` element of a `DomainGetListResult`.
    pub fn from_element(el: &Element) -> Result<Self> {
        let mut domain = Domain::new(el.require_attr("Name")?)?;
        domain.id = el.attr_or_empty("ID").to_string();
        domain.username = el.attr_or_empty("User").to_string();
        domain.created = el.attr_or_empty("Created").to_string();
        domain.expires = el.attr_or_empty("Expires").to_string();
        domain.whois_guard = el.attr_or_empty("WhoisGuard").to_string();
        domain.is_expired = parse_bool(el.attr_or_empty("IsExpired"));
        domain.is_locked = parse_bool(el.attr_or_empty("IsLocked"));
        domain.auto_renew = parse_bool(el.attr_or_empty("AutoRenew"));
        Ok(domain)
    }

    /// The second-level label, e.g. `example` for `example.co.uk`.
    pub fn sld(&self) -> &str {
        &self.sld
    }

    /// Everything after the first dot, e.g. `co.uk` for `example.co.uk`.
    pub fn tld(&self) -> &str {
        &self.tld
    }

    /// The `SLD`/`TLD` pair every per-domain DNS command starts with.
    pub fn request_params(&self) -> Params {
        Params::new().with("SLD", &self.sld).with("TLD", &self.tld)
    }

    pub fn created_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.created, DATE_FMT).ok()
    }

    pub fn expires_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.expires, DATE_FMT).ok()
    }
}

impl Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

fn split_domain(name: &str) -> Result<(&str, &str)> {
    match name.split_once('.') {
        Some((sld, tld)) if !sld.is_empty() && !tld.is_empty() => Ok((sld, tld)),
        _ => Err(Error::InvalidDomain(name.to_string())),
    }
}

/// Paging information reported alongside a domain list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub total_domains: u32,
    pub current_page: u32,
    pub num_items_on_page: u32,
    pub total_pages: u32,
}

impl Pagination {
    pub fn new(total_domains: u32, current_page: u32, num_items_on_page: u32) -> Self {
        let total_pages = if num_items_on_page == 0 {
            0
        } else {
            total_domains.div_ceil(num_items_on_page)
        };

        Self {
            total_domains,
            current_page,
            num_items_on_page,
            total_pages,
        }
    }

    pub fn from_element(el: &Element) -> Self {
        let field = |name: &str| {
            el.child(name)
                .and_then(|child| parse_opt_u32(Some(child.text.as_str())))
                .unwrap_or(0)
        };
        Self::new(field("TotalItems"), field("CurrentPage"), field("PageSize"))
    }
}

/// One page of domains.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DomainList {
    pub pagination: Pagination,
    pub domains: Vec<Domain>,
}

/// The nameservers a domain is delegated to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NameserverSet {
    /// Whether the domain uses Namecheap's own DNS rather than custom nameservers.
    pub using_provider_dns: bool,
    pub nameservers: Vec<String>,
}

impl NameserverSet {
    /// Builds the set from a `DomainDNSGetListResult` element.
    pub fn from_element(el: &Element) -> Self {
        Self {
            using_provider_dns: parse_bool(el.attr_or_empty("IsUsingOurDNS")),
            nameservers: el.children_named("Nameserver").map(|ns| ns.text.clone()).collect(),
        }
    }
}

/// Type of a host record.
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RecordType {
    A,
    AAAA,
    ALIAS,
    CAA,
    CNAME,
    MX,
    MXE,
    NS,
    TXT,
    URL,
    URL301,
    FRAME,
    /// Anything Namecheap adds later; passed through untouched.
    Other(String),
}

impl RecordType {
    pub fn as_str(&self) -> &str {
        match self {
            RecordType::A => "A",
            RecordType::AAAA => "AAAA",
            RecordType::ALIAS => "ALIAS",
            RecordType::CAA => "CAA",
            RecordType::CNAME => "CNAME",
            RecordType::MX => "MX",
            RecordType::MXE => "MXE",
            RecordType::NS => "NS",
            RecordType::TXT => "TXT",
            RecordType::URL => "URL",
            RecordType::URL301 => "URL301",
            RecordType::FRAME => "FRAME",
            RecordType::Other(s) => s,
        }
    }

    /// Mail records live in their own partition of a domain's host set.
    pub fn is_mail(&self) -> bool {
        matches!(self, RecordType::MX | RecordType::MXE)
    }
}

impl FromStr for RecordType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        #[rustfmt::skip]
        let typ = match &s.trim().to_ascii_uppercase()[..] {
            "A"      => RecordType::A,
            "AAAA"   => RecordType::AAAA,
            "ALIAS"  => RecordType::ALIAS,
            "CAA"    => RecordType::CAA,
            "CNAME"  => RecordType::CNAME,
            "MX"     => RecordType::MX,
            "MXE"    => RecordType::MXE,
            "NS"     => RecordType::NS,
            "TXT"    => RecordType::TXT,
            "URL"    => RecordType::URL,
            "URL301" => RecordType::URL301,
            "FRAME"  => RecordType::FRAME,
            _        => RecordType::Other(s.trim().to_string()),
        };
        Ok(typ)
    }
}

impl Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for RecordType {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(self.as_str())
    }
}

/// A single DNS host record.
///
/// Records read from Namecheap have every field populated that Namecheap reports. Records passed to write operations
/// need `host_name`, `record_type` and `address`; everything else is optional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HostRecord {
    pub id: String,
    pub host_name: String,
    #[serde(rename = "type")]
    pub record_type: RecordType,
    pub address: String,
    pub mx_pref: Option<u32>,
    pub ttl: Option<u32>,
    pub email_type: Option<String>,
    pub associated_app_title: String,
    pub friendly_name: String,
    pub is_active: bool,
    pub is_ddns_enabled: bool,
}

impl HostRecord {
    /// A record with just the three fields every write needs.
    pub fn new(host_name: impl Into<String>, record_type: RecordType, address: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            host_name: host_name.into(),
            record_type,
            address: address.into(),
            mx_pref: None,
            ttl: None,
            email_type: None,
            associated_app_title: String::new(),
            friendly_name: String::new(),
            is_active: true,
            is_ddns_enabled: false,
        }
    }

    pub fn with_ttl(mut self, ttl: u32) -> Self {
        self.ttl = Some(ttl);
        self
    }

    pub fn with_mx_pref(mut self, pref: u32) -> Self {
        self.mx_pref = Some(pref);
        self
    }

    /// Builds a record from a `<host>` element of a `DomainDNSGetHostsResult`.
    pub fn from_element(el: &Element) -> Self {
        let Ok(record_type) = el.attr_or_empty("Type").parse::<RecordType>();
        Self {
            id: el.attr_or_empty("HostId").to_string(),
            host_name: el.attr_or_empty("Name").to_string(),
            record_type,
            address: el.attr_or_empty("Address").to_string(),
            mx_pref: parse_opt_u32(el.attr("MXPref")),
            ttl: parse_opt_u32(el.attr("TTL")),
            email_type: None,
            associated_app_title: el.attr_or_empty("AssociatedAppTitle").to_string(),
            friendly_name: el.attr_or_empty("FriendlyName").to_string(),
            is_active: parse_bool(el.attr_or_empty("IsActive")),
            is_ddns_enabled: parse_bool(el.attr_or_empty("IsDDNSEnabled")),
        }
    }

    pub fn is_mail(&self) -> bool {
        self.record_type.is_mail()
    }
}

/// One mailbox forwarding rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmailForward {
    pub mailbox: String,
    pub forwarding_email: String,
}

impl EmailForward {
    pub fn new(mailbox: impl Into<String>, forwarding_email: impl Into<String>) -> Self {
        Self {
            mailbox: mailbox.into(),
            forwarding_email: forwarding_email.into(),
        }
    }

    /// Builds a rule from a `<Forward mailbox="...">address</Forward>` element.
    pub fn from_element(el: &Element) -> Self {
        Self::new(el.attr_or_empty("mailbox"), el.text.clone())
    }
}

/// Account funds, as returned by `namecheap.users.getBalances`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Balances {
    pub currency: String,
    pub available_balance: String,
    pub account_balance: String,
    pub earned_amount: String,
    pub withdrawable_amount: String,
    pub funds_required_for_auto_renew: String,
}

impl Balances {
    pub fn from_element(el: &Element) -> Self {
        let field = |name: &str| el.attr_or_empty(name).to_string();
        Self {
            currency: field("Currency"),
            available_balance: field("AvailableBalance"),
            account_balance: field("AccountBalance"),
            earned_amount: field("EarnedAmount"),
            withdrawable_amount: field("WithdrawableAmount"),
            funds_required_for_auto_renew: field("FundsRequiredForAutoRenew"),
        }
    }
}
