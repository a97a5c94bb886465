//! End-to-end lifecycle tests against a mocked firewall API.
//!
//! Exercises the real HTTP client together with the controller, including
//! rule reconciliation of a drifted remote response loaded from fixtures.

use firewall_api::FirewallApiClient;
use firewall_core::config::ProviderConfig;
use firewall_core::FirewallId;
use firewall_resource::{
    FirewallConfig, FirewallController, FirewallResource, Lifecycle, PartySet, ResourceError,
    RuleConfig,
};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::fs;
use std::path::PathBuf;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const FIXTURE_ID: &str = "bb4b2611-3d72-467b-8602-280330ecd65c";

/// Load a JSON fixture from `tests/fixtures`.
fn load_fixture(name: &str) -> Value {
    let fixture_path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name);
    let raw = fs::read_to_string(&fixture_path).unwrap_or_else(|e| {
        panic!(
            "Failed to read fixture at {}: {}",
            fixture_path.display(),
            e
        )
    });
    serde_json::from_str(&raw).unwrap()
}

fn controller(server: &MockServer) -> FirewallController<FirewallApiClient> {
    let config = ProviderConfig::new(server.uri())
        .unwrap()
        .with_token("do-token");
    FirewallController::new(FirewallApiClient::from_config(&config).unwrap())
}

fn web_config() -> FirewallConfig {
    FirewallConfig {
        name: "web".into(),
        instance_ids: vec!["8043964".into()],
        inbound_rules: vec![RuleConfig::new("tcp", "80").with_parties(PartySet {
            addresses: vec!["0.0.0.0/0".into(), "::/0".into()],
            ..PartySet::default()
        })],
        ..FirewallConfig::default()
    }
}

#[tokio::test]
async fn create_reconciles_drifted_remote_rules() {
    let server = MockServer::start().await;
    let created = json!({
        "firewall": {
            "id": FIXTURE_ID,
            "name": "web",
            "status": "waiting",
            "inbound_rules": [
                {"protocol": "tcp", "ports": "80", "sources": {"addresses": ["0.0.0.0/0", "::/0"]}}
            ],
            "outbound_rules": [],
            "droplet_ids": [8043964],
            "tags": []
        }
    });

    Mock::given(method("POST"))
        .and(path("/v2/firewalls"))
        .and(header("authorization", "Bearer do-token"))
        .respond_with(ResponseTemplate::new(202).set_body_json(created))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/v2/firewalls/{FIXTURE_ID}")))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(load_fixture("firewall_drifted.json")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let controller = controller(&server);
    let mut resource = FirewallResource::new(web_config());
    controller.create(&mut resource).await.unwrap();

    assert_eq!(resource.id, Some(FirewallId::parse_str(FIXTURE_ID).unwrap()));
    assert_eq!(resource.lifecycle, Lifecycle::Present);

    let inbound = &resource.config.inbound_rules;
    assert_eq!(inbound.len(), 2);
    assert_eq!(inbound[0], web_config().inbound_rules[0]);
    assert_eq!(
        inbound[1],
        RuleConfig::new("tcp", "22").with_parties(PartySet {
            addresses: vec!["10.0.0.0/8".into()],
            ..PartySet::default()
        })
    );
    assert_eq!(resource.config.outbound_rules.len(), 1);
    assert_eq!(resource.config.outbound_rules[0].protocol, "icmp");
    assert!(resource.config.tags.is_empty());
    assert_eq!(resource.config.instance_ids, vec!["8043964"]);

    assert_eq!(resource.computed.status, "succeeded");
    assert_eq!(resource.computed.created_at, "2017-05-23T21:24:00+00:00");
    assert_eq!(resource.computed.pending_changes.len(), 1);
    assert_eq!(resource.computed.pending_changes[0].instance_id, 8_043_964);
}

#[tokio::test]
async fn read_of_deleted_firewall_clears_identity() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/v2/firewalls/{FIXTURE_ID}")))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "id": "not_found",
            "message": "The resource you were accessing could not be found."
        })))
        .mount(&server)
        .await;

    let controller = controller(&server);
    let mut resource = FirewallResource::with_id(FirewallId::parse_str(FIXTURE_ID).unwrap());
    resource.config = web_config();

    controller.read(&mut resource).await.unwrap();
    assert!(resource.id.is_none());
    assert_eq!(resource.lifecycle, Lifecycle::Absent);
    assert!(!controller.exists(&mut resource).await.unwrap());
}

#[tokio::test]
async fn delete_is_idempotent() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path(format!("/v2/firewalls/{FIXTURE_ID}")))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let controller = controller(&server);
    let mut resource = FirewallResource::with_id(FirewallId::parse_str(FIXTURE_ID).unwrap());

    controller.delete(&mut resource).await.unwrap();
    assert!(resource.id.is_none());

    // No id left, so no second request goes out.
    controller.delete(&mut resource).await.unwrap();
}

#[tokio::test]
async fn update_failure_surfaces_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path(format!("/v2/firewalls/{FIXTURE_ID}")))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "id": "unprocessable_entity",
            "message": "invalid port range"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let controller = controller(&server);
    let mut resource = FirewallResource::with_id(FirewallId::parse_str(FIXTURE_ID).unwrap());
    resource.config = web_config();

    let err = controller.update(&mut resource).await.unwrap_err();
    assert!(matches!(err, ResourceError::Update(_)));
    assert!(err.to_string().starts_with("Error updating firewall:"));
    assert_eq!(resource.config, web_config());
}

#[tokio::test]
async fn import_adopts_remote_firewall() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/v2/firewalls/{FIXTURE_ID}")))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(load_fixture("firewall_drifted.json")),
        )
        .mount(&server)
        .await;

    let resource = controller(&server).import(FIXTURE_ID).await.unwrap();
    let ports: Vec<_> = resource
        .config
        .inbound_rules
        .iter()
        .map(|rule| rule.port_range.as_str())
        .collect();
    assert_eq!(ports, vec!["22", "80"]);
    assert_eq!(
        resource.config.inbound_rules[1].parties.addresses,
        vec!["::/0", "0.0.0.0/0"]
    );
}
