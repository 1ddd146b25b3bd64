use std::fmt::{self, Display};
use std::str::FromStr;

use crate::api::model::{Domain, DomainList, Pagination};
use crate::api::{NamecheapClient, Params, Response};
use crate::error::{Error, Result};

const GET_LIST: &str = "namecheap.domains.getList";

/// Which domains `namecheap.domains.getList` returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListType {
    All,
    Expiring,
    Expired,
}

/// Sort order for `namecheap.domains.getList`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortBy {
    Name,
    NameDesc,
    ExpireDate,
    ExpireDateDesc,
    CreateDate,
    CreateDateDesc,
}

impl Display for ListType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ListType::All => "ALL",
            ListType::Expiring => "EXPIRING",
            ListType::Expired => "EXPIRED",
        })
    }
}

impl FromStr for ListType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match &s.to_ascii_uppercase()[..] {
            "ALL" => Ok(ListType::All),
            "EXPIRING" => Ok(ListType::Expiring),
            "EXPIRED" => Ok(ListType::Expired),
            _ => Err(invalid_value("list_type")),
        }
    }
}

impl Display for SortBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SortBy::Name => "NAME",
            SortBy::NameDesc => "NAME_DESC",
            SortBy::ExpireDate => "EXPIREDATE",
            SortBy::ExpireDateDesc => "EXPIREDATE_DESC",
            SortBy::CreateDate => "CREATEDATE",
            SortBy::CreateDateDesc => "CREATEDATE_DESC",
        })
    }
}

impl FromStr for SortBy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match &s.to_ascii_uppercase()[..] {
            "NAME" => Ok(SortBy::Name),
            "NAME_DESC" => Ok(SortBy::NameDesc),
            "EXPIREDATE" => Ok(SortBy::ExpireDate),
            "EXPIREDATE_DESC" => Ok(SortBy::ExpireDateDesc),
            "CREATEDATE" => Ok(SortBy::CreateDate),
            "CREATEDATE_DESC" => Ok(SortBy::CreateDateDesc),
            _ => Err(invalid_value("sort_by")),
        }
    }
}

fn invalid_value(name: &str) -> Error {
    Error::InvalidParameter {
        name: name.to_string(),
        reason: "unrecognized value",
    }
}

/// Optional filters for [`Domains::list`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListFilters {
    pub list_type: Option<ListType>,
    pub search_term: Option<String>,
    pub page: Option<u32>,
    pub num_domains: Option<u32>,
    pub sort_by: Option<SortBy>,
}

impl ListFilters {
    /// Keys accepted by [`from_pairs`][Self::from_pairs].
    pub const KEYS: [&'static str; 5] = ["list_type", "search_term", "page", "num_domains", "sort_by"];

    /// Builds filters from loosely-typed key/value pairs, e.g. `page=2` from a command line.
    ///
    /// Keys outside [`KEYS`][Self::KEYS] are rejected.
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Result<Self> {
        let number = |key: &str, value: &str| {
            value.parse::<u32>().map_err(|_| Error::InvalidParameter {
                name: key.to_string(),
                reason: "expected a positive integer",
            })
        };

        let mut filters = ListFilters::default();
        for (key, value) in pairs {
            match key {
                "list_type" => filters.list_type = Some(value.parse()?),
                "search_term" => filters.search_term = Some(value.to_string()),
                "page" => filters.page = Some(number(key, value)?),
                "num_domains" => filters.num_domains = Some(number(key, value)?),
                "sort_by" => filters.sort_by = Some(value.parse()?),
                other => {
                    return Err(Error::InvalidParameter {
                        name: other.to_string(),
                        reason: "not a recognized domain list filter",
                    });
                },
            }
        }

        Ok(filters)
    }

    fn to_params(&self) -> Params {
        let mut params = Params::new();
        if let Some(list_type) = self.list_type {
            params.insert("ListType", list_type);
        }
        if let Some(term) = &self.search_term {
            params.insert("SearchTerm", term);
        }
        if let Some(page) = self.page {
            params.insert("Page", page);
        }
        if let Some(size) = self.num_domains {
            params.insert("PageSize", size);
        }
        if let Some(sort_by) = self.sort_by {
            params.insert("SortBy", sort_by);
        }
        params
    }
}

/// Account-wide domain listing and lookup.
#[derive(Debug, Clone)]
pub struct Domains {
    client: NamecheapClient,
}

impl Domains {
    pub fn new(client: NamecheapClient) -> Self {
        Self { client }
    }

    /// Lists the domains on the account, one page at a time.
    pub fn list(&self, filters: &ListFilters) -> Result<Response<DomainList>> {
        let response = self.client.request(GET_LIST, &filters.to_params())?;
        response.try_map(|command| {
            let result = command.require_child("DomainGetListResult")?;
            let domains = result.children_named("Domain").map(Domain::from_element).collect::<Result<_>>()?;
            let pagination = command.child("Paging").map(Pagination::from_element).unwrap_or(Pagination::new(0, 0, 0));

            Ok(DomainList { pagination, domains })
        })
    }

    /// Finds a single domain by its exact name.
    ///
    /// Searches the domain list for `name`, walking every page of matches until the exact name turns up. A missing
    /// domain is `Ok` with a `None` body, carrying the last page's response details.
    pub fn get(&self, name: &str) -> Result<Response<Option<Domain>>> {
        let mut filters = ListFilters {
            search_term: Some(name.to_string()),
            page: Some(1),
            ..ListFilters::default()
        };

        loop {
            let page = filters.page.unwrap_or(1);
            let response = self.list(&filters)?;
            let total_pages = response.body.pagination.total_pages;

            let response = response.map(|list| list.domains.into_iter().find(|domain| domain.name == name));
            if response.body.is_some() || page >= total_pages {
                return Ok(response);
            }

            log::debug!("{name} not on page {page} of {total_pages}, trying the next");
            filters.page = Some(page + 1);
        }
    }
}
