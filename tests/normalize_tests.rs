// tests/normalize_tests.rs
//
// The normalizer is pure, so these tests feed it JSON bundles straight from
// serde and inspect the derived sections, plus the styled lines the dashboard
// builds from them.

use tracelens::core::models::{ResultBundle, RiskLevel};
use tracelens::core::normalizer::{normalize, BreachReport, FaceAnnotation, Section};
use tracelens::ui::widgets::dashboard::section_lines;

fn bundle(json: &str) -> ResultBundle {
    serde_json::from_str(json).expect("bundle parses")
}

fn regions(sections: &[Section]) -> Vec<&'static str> {
    sections.iter().map(|s| s.region()).collect()
}

#[test]
fn empty_bundle_renders_nothing() {
    assert!(normalize(&ResultBundle::default()).is_empty());
    assert!(section_lines(&[]).is_empty());
}

#[test]
fn section_order_is_fixed_regardless_of_key_order() {
    // Keys deliberately listed back to front.
    let sections = normalize(&bundle(
        r#"{
            "social_profile": {"overall_confidence": 40, "platforms": []},
            "hibp": {"found": false, "message": "all clear"},
            "whois": {"registrar": "Example Registrar"},
            "ip_rir": {"network": {"cidr": "203.0.113.0/24"}},
            "threat_score": {"risk_level": "medium"}
        }"#,
    ));
    assert_eq!(
        regions(&sections),
        vec!["summary", "network", "domain", "email", "identity"]
    );
}

#[test]
fn missing_sources_omit_their_sections_without_failing() {
    let sections = normalize(&bundle(r#"{"whois": {"registrar": "Example"}}"#));
    assert_eq!(regions(&sections), vec!["domain"]);

    let sections = normalize(&bundle(r#"{"hibp": {"found": false, "message": "clean"}}"#));
    assert_eq!(regions(&sections), vec!["email"]);
}

#[test]
fn summary_defaults_survive_empty_payloads() {
    // Sources present but hollow: every counter falls back to zero and the
    // risk level to unknown.
    let sections = normalize(&bundle(r#"{"vt": {}, "abuseipdb": {}, "shodan": {}}"#));
    match &sections[0] {
        Section::Summary(summary) => {
            assert_eq!(summary.risk, RiskLevel::Unknown);
            assert_eq!(summary.vt_malicious, 0);
            assert_eq!(summary.abuse_confidence, 0);
            assert!(summary.open_ports.is_empty());
        }
        other => panic!("expected summary, got {other:?}"),
    }
}

#[test]
fn uppercase_risk_label_parses_to_canonical_level() {
    let sections = normalize(&bundle(r#"{"threat_score": {"risk_level": "HIGH"}}"#));
    match &sections[0] {
        Section::Summary(summary) => {
            assert_eq!(summary.risk.badge(), "HIGH");
            assert_eq!(summary.risk.class(), "high");
        }
        other => panic!("expected summary, got {other:?}"),
    }
}

#[test]
fn whois_emails_join_the_same_for_scalar_and_list() {
    let scalar = normalize(&bundle(r#"{"whois": {"emails": "a@x.com"}}"#));
    let Section::Domain(domain) = &scalar[0] else {
        panic!("expected domain");
    };
    assert_eq!(domain.emails_joined(), "a@x.com");

    let list = normalize(&bundle(r#"{"whois": {"emails": ["a@x.com", "b@x.com"]}}"#));
    let Section::Domain(domain) = &list[0] else {
        panic!("expected domain");
    };
    assert_eq!(domain.emails_joined(), "a@x.com, b@x.com");
}

#[test]
fn certificates_reduce_to_name_and_issuer() {
    let sections = normalize(&bundle(
        r#"{"crtsh": [
            {"name_value": "example.com", "issuer_name": "C=US, O=Let's Encrypt"},
            {"name_value": "www.example.com", "issuer_name": "C=US, O=Let's Encrypt"}
        ]}"#,
    ));
    let Section::Domain(domain) = &sections[0] else {
        panic!("expected domain");
    };
    assert_eq!(domain.certificates.len(), 2);
    assert_eq!(domain.certificates[0].name, "example.com");
    assert_eq!(domain.certificates[0].issuer, "C=US, O=Let's Encrypt");
}

#[test]
fn breach_entries_join_data_classes() {
    let sections = normalize(&bundle(
        r#"{"hibp": {"found": true, "data": [{
            "Name": "ExampleCo",
            "Domain": "example.co",
            "BreachDate": "2019-07-02",
            "DataClasses": ["Emails", "Passwords"]
        }]}}"#,
    ));
    let Section::Email(email) = &sections[0] else {
        panic!("expected email");
    };
    let Some(BreachReport::Breaches(breaches)) = &email.breaches else {
        panic!("expected breaches");
    };
    assert_eq!(breaches[0].title, "ExampleCo");
    assert_eq!(breaches[0].data_classes, "Emails, Passwords");
    assert_eq!(breaches[0].date, "2019-07-02");
}

#[test]
fn clean_and_unavailable_breach_lookups_stay_distinct() {
    let clean = normalize(&bundle(
        r#"{"hibp": {"found": false, "message": "No breaches found"}}"#,
    ));
    let Section::Email(email) = &clean[0] else {
        panic!("expected email");
    };
    assert!(matches!(
        &email.breaches,
        Some(BreachReport::Clean { message }) if message == "No breaches found"
    ));

    let unavailable = normalize(&bundle(
        r#"{"hibp": {"found": false, "status": 401, "error": "no API key configured"}}"#,
    ));
    let Section::Email(email) = &unavailable[0] else {
        panic!("expected email");
    };
    assert!(matches!(
        &email.breaches,
        Some(BreachReport::Unavailable { detail }) if detail.contains("no API key configured")
    ));
}

#[test]
fn enhanced_identity_payload_supersedes_legacy_entirely() {
    let sections = normalize(&bundle(
        r#"{
            "social": {"confidence": 99, "platforms": [{"platform": "legacynet", "exists": true}]},
            "social_profile": {"overall_confidence": 72, "platforms": [
                {"platform": "github", "exists": true, "confidence": 85,
                 "evidence": ["avatar match", "bio keyword"],
                 "face_detection": {"detected": true, "count": 1}},
                {"platform": "mastodon", "exists": true, "confidence": 40,
                 "face_detection": {"detected": false, "count": 0}},
                {"platform": "imgur", "exists": false}
            ]}
        }"#,
    ));
    let Section::Identity(identity) = &sections[0] else {
        panic!("expected identity");
    };

    // No trace of the legacy payload: full precedence, no field merge.
    assert_eq!(identity.overall_confidence, 72);
    assert!(identity.platforms.iter().all(|p| p.platform != "legacynet"));

    assert_eq!(identity.platforms[0].face, FaceAnnotation::Detected(1));
    assert_eq!(identity.platforms[0].evidence, vec!["avatar match", "bio keyword"]);
    assert_eq!(identity.platforms[1].face, FaceAnnotation::NotDetected);
    assert_eq!(identity.platforms[2].face, FaceAnnotation::NotEvaluated);
}

#[test]
fn legacy_identity_payload_still_renders_alone() {
    let sections = normalize(&bundle(
        r#"{"social": {"confidence": 55, "platforms": [
            {"platform": "github", "exists": true},
            {"platform": "imgur", "exists": false}
        ]}}"#,
    ));
    let Section::Identity(identity) = &sections[0] else {
        panic!("expected identity");
    };
    assert_eq!(identity.overall_confidence, 55);
    assert_eq!(identity.platforms.len(), 2);
    assert!(identity
        .platforms
        .iter()
        .all(|p| p.face == FaceAnnotation::NotEvaluated));
}

#[test]
fn network_section_tolerates_missing_geolocation() {
    let without = normalize(&bundle(
        r#"{"ip_rir": {"network": {"cidr": "198.51.100.0/24", "name": "TEST-NET-2"}}}"#,
    ));
    let Section::Network(network) = &without[0] else {
        panic!("expected network");
    };
    assert_eq!(network.network_range.as_deref(), Some("198.51.100.0/24"));
    assert_eq!(network.coordinates, None);

    let with = normalize(&bundle(
        r#"{
            "ip_rir": {"asn_description": "EXAMPLE-AS"},
            "shodan": {"host": {"latitude": 48.85, "longitude": 2.35, "ports": [22, 443]}}
        }"#,
    ));
    let Section::Network(network) = &with[1] else {
        panic!("expected network");
    };
    assert_eq!(network.organization.as_deref(), Some("EXAMPLE-AS"));
    assert_eq!(network.coordinates, Some((48.85, 2.35)));
}

#[test]
fn rendering_the_same_bundle_twice_is_identical() {
    let bundle = bundle(
        r#"{
            "threat_score": {"risk_level": "high"},
            "whois": {"registrar": "Example", "emails": "a@x.com"},
            "hibp": {"found": true, "data": [{"Title": "Breach", "DataClasses": ["Emails"]}]},
            "social_profile": {"overall_confidence": 30, "platforms": [
                {"platform": "github", "exists": true, "confidence": 50}
            ]}
        }"#,
    );

    let first = normalize(&bundle);
    let second = normalize(&bundle);
    assert_eq!(first, second);

    // The line builder is pure too: a redraw never accumulates content.
    assert_eq!(section_lines(&first), section_lines(&second));
}
