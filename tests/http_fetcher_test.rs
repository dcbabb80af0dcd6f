/// End-to-end tests of lazy promotion and batch search over a loopback HTTP server
mod common;

use civic_core::{
    config::ClientConfig,
    fetch::{get_assertions, get_record, HttpFetcher},
    record::Record,
    schema::RecordKind,
    CivicError,
};
use common::{full_payload, ids, id_stub, OneShotServer};
use serde_json::json;
use test_log::test;

fn fetcher_for(server: &OneShotServer) -> HttpFetcher {
    let config = ClientConfig::from_toml_str(&format!(
        "api_url = \"{}\"\ntimeout_secs = 5",
        server.base_url
    ))
    .expect("valid test config");
    HttpFetcher::new(&config).expect("client builds")
}

#[test]
fn test_lazy_access_fetches_the_pluralized_endpoint() {
    let server = OneShotServer::respond(
        200,
        json!({
            "id": 5,
            "type": "gene",
            "name": "BRAF",
            "entrez_id": 673,
            "description": "BRAF mutations are found in many cancers.",
            "aliases": ["BRAF1"],
            "errors": {},
            "lifecycle_actions": {},
            "provisional_values": {},
            "sources": [],
            "variants": [id_stub(RecordKind::Variant, 12), id_stub(RecordKind::Variant, 17)],
        }),
    );
    let fetcher = fetcher_for(&server);

    let mut gene = Record::from_value(
        RecordKind::Gene,
        json!({"id": 5, "type": "gene", "name": "BRAF", "entrez_id": 673, "description": "d"}),
        true,
    )
    .unwrap();
    assert!(gene.is_partial());

    let variants: Vec<_> = gene
        .get("variants", &fetcher)
        .unwrap()
        .as_complex()
        .unwrap()
        .records()
        .map(|v| (v.kind(), v.id(), v.is_partial()))
        .collect();
    assert_eq!(
        variants,
        vec![
            (RecordKind::Variant, Some(12), true),
            (RecordKind::Variant, Some(17), true)
        ]
    );
    assert!(!gene.is_partial());

    let request = server.request();
    assert_eq!(request.method, "GET");
    assert_eq!(request.url, "/api/genes/5");
}

#[test]
fn test_evidence_is_routed_to_evidence_items() {
    let server = OneShotServer::respond(200, full_payload(RecordKind::Evidence, 3));
    let fetcher = fetcher_for(&server);

    let evidence = get_record(&fetcher, RecordKind::Evidence, 3).unwrap();
    assert!(!evidence.is_partial());
    assert_eq!(evidence.to_string(), "<CIViC evidence 3>");
    assert_eq!(server.request().url, "/api/evidence_items/3");
}

#[test]
fn test_non_success_status_is_a_transport_error() {
    let server = OneShotServer::respond(404, json!({"error": "not found"}));
    let fetcher = fetcher_for(&server);

    let mut variant = Record::from_value(
        RecordKind::Variant,
        json!({"id": 404, "type": "variant"}),
        true,
    )
    .unwrap();
    let before = variant.clone();
    let err = variant.get("name", &fetcher).unwrap_err();
    match err {
        CivicError::Transport { status, .. } => assert_eq!(status, Some(404)),
        other => panic!("expected a transport error, got {other:?}"),
    }
    assert_eq!(variant, before);
    assert!(variant.is_partial());
    server.request();
}

#[test]
fn test_assertions_are_fetched_with_one_or_search() {
    let server = OneShotServer::respond(
        200,
        json!({
            "results": [
                full_payload(RecordKind::Assertion, 1),
                full_payload(RecordKind::Assertion, 2),
            ]
        }),
    );
    let fetcher = fetcher_for(&server);

    let assertions = get_assertions(&fetcher, &[1, 2]).unwrap();
    assert_eq!(ids(&assertions), vec![Some(1), Some(2)]);

    let request = server.request();
    assert_eq!(request.method, "POST");
    assert_eq!(request.url, "/api/assertions/search");
    let body: serde_json::Value = serde_json::from_str(&request.body).unwrap();
    assert_eq!(
        body,
        json!({
            "operator": "OR",
            "queries": [
                {"field": "id", "condition": {"name": "is_equal_to", "parameters": [1]}},
                {"field": "id", "condition": {"name": "is_equal_to", "parameters": [2]}},
            ]
        })
    );
}

#[test]
fn test_connection_failure_is_a_transport_error() {
    // Bind then drop a listener to get a port nothing is listening on.
    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();
    let config =
        ClientConfig::from_toml_str(&format!("api_url = \"http://127.0.0.1:{port}/api\""))
            .unwrap();
    let fetcher = HttpFetcher::new(&config).unwrap();

    let err = get_record(&fetcher, RecordKind::Gene, 1).unwrap_err();
    assert!(err.is_transport(), "unexpected error {err:?}");
}
