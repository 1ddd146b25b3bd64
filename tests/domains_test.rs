mod common;

use common::{domain_list, error, namecheap};
use namecheap::{Error, ListFilters, Status};

#[test]
fn list_maps_domains_and_pagination() {
    let (nc, transport) = namecheap([domain_list(&["example.com", "other.com", "shop.co.uk"], 25, 1, 10)]);

    let response = nc.domains().list(&ListFilters::default()).unwrap();
    assert_eq!(response.status, Status::Ok);

    let list = response.body;
    assert_eq!(list.pagination.total_domains, 25);
    assert_eq!(list.pagination.current_page, 1);
    assert_eq!(list.pagination.num_items_on_page, 10);
    assert_eq!(list.pagination.total_pages, 3);
    assert_eq!(list.domains.len(), 3);

    let first = &list.domains[0];
    assert_eq!(first.id, "100");
    assert_eq!(first.name, "example.com");
    assert_eq!(first.username, "myusername");
    assert_eq!(first.created, "02/15/2016");
    assert_eq!(first.expires, "02/15/2027");
    assert_eq!(first.whois_guard, "ENABLED");
    assert!(!first.is_expired);
    assert!(first.is_locked);
    assert!(first.auto_renew);
    assert!(!list.domains[1].is_locked);

    let uk = &list.domains[2];
    assert_eq!(uk.sld(), "shop");
    assert_eq!(uk.tld(), "co.uk");

    let sent = transport.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].command(), "namecheap.domains.getList");
    assert_eq!(sent[0].url, "https://api.sandbox.namecheap.com/xml.response");
    assert!(sent[0].extra().is_empty());
}

#[test]
fn list_sends_filters() {
    let (nc, transport) = namecheap([domain_list(&[], 0, 2, 50)]);
    let filters = ListFilters::from_pairs([("page", "2"), ("num_domains", "50"), ("sort_by", "name")]).unwrap();

    let list = nc.domains().list(&filters).unwrap().body;
    assert!(list.domains.is_empty());
    assert_eq!(list.pagination.total_pages, 0);
    assert_eq!(transport.sent()[0].extra(), [("Page", "2"), ("PageSize", "50"), ("SortBy", "NAME")]);
}

#[test]
fn list_keeps_request_info() {
    let (nc, _) = namecheap([domain_list(&["example.com"], 1, 1, 20)]);
    let info = nc.domains().list(&ListFilters::default()).unwrap().request_info.unwrap();

    assert_eq!(info.server.as_deref(), Some("PHX01SBAPIEXT05"));
    assert_eq!(info.gmt_time_difference.as_deref(), Some("--4:00"));
    assert_eq!(info.execution_time.as_deref(), Some("0.011"));
    assert!(info.request_body.contains("Command=namecheap.domains.getList"));
}

#[test]
fn get_returns_exact_match_only() {
    let (nc, transport) = namecheap([domain_list(&["myexample.com", "example.com", "other.com"], 3, 1, 20)]);

    let domain = nc.domains().get("example.com").unwrap().body.unwrap();
    assert_eq!(domain.name, "example.com");
    assert_eq!(domain.id, "101");
    assert_eq!(transport.sent()[0].get("SearchTerm"), Some("example.com"));
}

#[test]
fn get_without_match_is_empty_success() {
    let (nc, _) = namecheap([domain_list(&["other.com"], 1, 1, 20)]);

    let response = nc.domains().get("example.com").unwrap();
    assert!(response.is_ok());
    assert!(response.body.is_none());
}

#[test]
fn provider_errors_carry_the_response() {
    let (nc, _) = namecheap([error("1011150", "Domain not found")]);

    let err = nc.domains().list(&ListFilters::default()).unwrap_err();
    assert_eq!(err.provider_code(), Some("1011150"));

    let Error::Provider { message, response, .. } = err else {
        panic!("expected provider error");
    };
    assert_eq!(message, "Domain not found");
    assert_eq!(response.status, Status::Error);
    assert!(response.request_info.is_some());
}

#[test]
fn garbage_response_is_unparsable() {
    let (nc, _) = namecheap(["<html><body>502 Bad Gateway</body></html>"]);
    assert!(matches!(nc.domains().list(&ListFilters::default()), Err(Error::UnparsableResponse(_))));
}

#[test]
fn unknown_filter_fails_before_any_request() {
    let (_, transport) = namecheap(Vec::<String>::new());
    assert!(matches!(ListFilters::from_pairs([("Username", "someone")]), Err(Error::InvalidParameter { .. })));
    assert!(transport.sent().is_empty());
}

#[test]
fn get_walks_later_pages_of_matches() {
    let (nc, transport) = namecheap([
        domain_list(&["myexample.com"], 2, 1, 1),
        domain_list(&["example.com"], 2, 2, 1),
    ]);

    let domain = nc.domains().get("example.com").unwrap().body.unwrap();
    assert_eq!(domain.name, "example.com");

    let sent = transport.sent();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0].get("Page"), Some("1"));
    assert_eq!(sent[1].get("Page"), Some("2"));
    assert_eq!(sent[1].get("SearchTerm"), Some("example.com"));
}
