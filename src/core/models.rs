// src/core/models.rs

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use strum::{Display, EnumIter, EnumString};

// --- Lookup request ---

/// The kind of identifier a scan is run against. Serialized lowercase on the
/// wire (`{"source": "ip"}` etc.), matching the backend contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumIter, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum LookupSource {
    Ip,
    Email,
    Username,
    Domain,
}

static DOMAIN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([a-zA-Z0-9]([a-zA-Z0-9-]*[a-zA-Z0-9])?\.)+[a-zA-Z]{2,}$").unwrap()
});

impl LookupSource {
    /// Guesses the lookup source from the raw query text. An IP literal wins
    /// over the domain pattern; anything unrecognized is treated as a
    /// username, which is the backend's own fallback.
    pub fn infer(query: &str) -> Self {
        let q = query.trim();
        if q.parse::<IpAddr>().is_ok() {
            LookupSource::Ip
        } else if q.contains('@') {
            LookupSource::Email
        } else if DOMAIN_RE.is_match(q) {
            LookupSource::Domain
        } else {
            LookupSource::Username
        }
    }
}

/// One scan submission. Immutable once built; the session owns it for the
/// whole submit-poll-render cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanRequest {
    pub query: String,
    pub source: LookupSource,
}

impl ScanRequest {
    pub fn new(query: impl Into<String>, source: LookupSource) -> Self {
        Self { query: query.into(), source }
    }
}

/// Backend-issued job identifier, the poll key for one scan session.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ScanHandle {
    pub id: String,
}

// --- Poll status ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusKind {
    Queued,
    Running,
    Done,
    Failed,
}

/// Raw shape of `GET /search/status/{id}`. Everything beyond `status` is
/// optional; the backend attaches `results` only once the scan is done and
/// `error` only when it failed.
#[derive(Debug, Clone, Deserialize)]
pub struct StatusResponse {
    pub status: StatusKind,
    #[serde(default)]
    pub results: Option<ResultBundle>,
    #[serde(default)]
    pub error: Option<String>,
}

/// One observed scan state. `Done` and `Failed` are terminal: the poll loop
/// must not issue another request after emitting either.
#[derive(Debug, Clone, PartialEq)]
pub enum ScanStatus {
    Queued,
    Running,
    Done(ResultBundle),
    Failed(String),
}

impl ScanStatus {
    /// Decodes one status body. A body that does not parse as a known status
    /// shape is an error here, which the poll loop treats as a non-terminal
    /// tick rather than a failure.
    pub fn decode(raw: &str) -> Result<Self, serde_json::Error> {
        let response: StatusResponse = serde_json::from_str(raw)?;
        Ok(response.into())
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, ScanStatus::Done(_) | ScanStatus::Failed(_))
    }
}

impl From<StatusResponse> for ScanStatus {
    fn from(response: StatusResponse) -> Self {
        match response.status {
            StatusKind::Queued => ScanStatus::Queued,
            StatusKind::Running => ScanStatus::Running,
            // A done scan with no results still renders, as an empty bundle.
            StatusKind::Done => ScanStatus::Done(response.results.unwrap_or_default()),
            StatusKind::Failed => ScanStatus::Failed(
                response
                    .error
                    .unwrap_or_else(|| "backend reported failure without detail".to_string()),
            ),
        }
    }
}

// --- Risk classification ---

/// Overall verdict derived from the backend's `threat_score`. Displays as the
/// lowercase canonical name; `badge()` is the uppercase dashboard form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum RiskLevel {
    #[default]
    Unknown,
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Case-insensitive parse with `Unknown` as the documented fallback for
    /// absent or unrecognized values. Absence of scoring is not treated as
    /// evidence of a benign target.
    pub fn from_label(label: Option<&str>) -> Self {
        label
            .and_then(|l| l.trim().parse().ok())
            .unwrap_or(RiskLevel::Unknown)
    }

    pub fn badge(&self) -> String {
        self.to_string().to_uppercase()
    }

    /// Canonical lowercase key used to pick the badge style.
    pub fn class(&self) -> &'static str {
        match self {
            RiskLevel::Unknown => "unknown",
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
        }
    }
}

// --- Result bundle ---

/// Everything the backend collected for one scan, keyed by source. Every key
/// is optional: a scan may have any subset depending on the lookup source and
/// which connectors were configured. Each payload is decoded once here, with
/// defaults, so the normalizer never touches loose JSON.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ResultBundle {
    pub threat_score: Option<ThreatScore>,
    pub vt: Option<VtPayload>,
    pub abuseipdb: Option<AbuseIpdbPayload>,
    pub shodan: Option<ShodanPayload>,
    pub ip_rir: Option<IpRirPayload>,
    pub whois: Option<WhoisPayload>,
    pub crtsh: Option<Vec<CertLogEntry>>,
    pub gravatar: Option<GravatarPayload>,
    pub hibp: Option<HibpPayload>,
    pub social: Option<SocialPayload>,
    pub social_profile: Option<SocialProfilePayload>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ThreatScore {
    pub risk_level: Option<String>,
    pub score: Option<f64>,
}

// VirusTotal wraps its API response twice: the backend stores the whole HTTP
// body under `data`, and the API itself nests the object under `data` again.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct VtPayload {
    pub data: Option<VtEnvelope>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct VtEnvelope {
    pub data: Option<VtObject>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct VtObject {
    pub attributes: Option<VtAttributes>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct VtAttributes {
    pub last_analysis_stats: Option<VtAnalysisStats>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct VtAnalysisStats {
    pub malicious: u64,
    pub suspicious: u64,
    pub harmless: u64,
    pub undetected: u64,
}

impl VtPayload {
    pub fn malicious_count(&self) -> u64 {
        self.data
            .as_ref()
            .and_then(|e| e.data.as_ref())
            .and_then(|o| o.attributes.as_ref())
            .and_then(|a| a.last_analysis_stats.as_ref())
            .map(|s| s.malicious)
            .unwrap_or(0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AbuseIpdbPayload {
    pub data: Option<AbuseIpdbData>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AbuseIpdbData {
    #[serde(rename = "abuseConfidenceScore")]
    pub abuse_confidence_score: u64,
    #[serde(rename = "totalReports")]
    pub total_reports: u64,
}

impl AbuseIpdbPayload {
    pub fn confidence(&self) -> u64 {
        self.data.as_ref().map(|d| d.abuse_confidence_score).unwrap_or(0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ShodanPayload {
    pub host: Option<ShodanHost>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ShodanHost {
    pub ports: Vec<u16>,
    pub org: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl ShodanPayload {
    pub fn open_ports(&self) -> Vec<u16> {
        self.host.as_ref().map(|h| h.ports.clone()).unwrap_or_default()
    }

    /// Map coordinates, only when the host record carries both halves.
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        let host = self.host.as_ref()?;
        Some((host.latitude?, host.longitude?))
    }
}

/// Regional internet registry data (RDAP-shaped).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct IpRirPayload {
    pub network: Option<RirNetwork>,
    pub asn_description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RirNetwork {
    pub cidr: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct WhoisPayload {
    pub registrar: Option<String>,
    pub creation_date: Option<String>,
    pub expiration_date: Option<String>,
    // WHOIS libraries emit a bare string for one contact and a list for
    // several; both arrive here as a list.
    #[serde(deserialize_with = "one_or_many")]
    pub emails: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CertLogEntry {
    pub name_value: String,
    pub issuer_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct GravatarPayload {
    pub found: bool,
    pub url: Option<String>,
}

/// Breach lookup envelope. The backend keeps "no breaches" distinct from
/// "lookup did not run": `{found: true, data}` vs `{found: false, message}`
/// vs `{found: false, status, error}`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct HibpPayload {
    pub found: bool,
    pub data: Option<Vec<BreachRecord>>,
    pub message: Option<String>,
    pub status: Option<u16>,
    pub error: Option<String>,
}

/// One breach as reported upstream (PascalCase fields).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct BreachRecord {
    #[serde(rename = "Title")]
    pub title: Option<String>,
    #[serde(rename = "Name")]
    pub name: Option<String>,
    #[serde(rename = "Domain")]
    pub domain: Option<String>,
    #[serde(rename = "BreachDate")]
    pub breach_date: Option<String>,
    #[serde(rename = "DataClasses")]
    pub data_classes: Vec<String>,
}

/// Legacy identity-probe payload: bare existence flags per platform.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SocialPayload {
    pub confidence: Option<f64>,
    pub platforms: Vec<SocialEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SocialEntry {
    pub platform: String,
    pub exists: bool,
}

/// Enhanced identity-probe payload. When present alongside `social` it wins
/// outright; the two are never merged field by field.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SocialProfilePayload {
    pub overall_confidence: Option<f64>,
    pub platforms: Vec<ProfileEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ProfileEntry {
    pub platform: String,
    pub exists: bool,
    pub confidence: Option<f64>,
    pub evidence: Option<Vec<String>>,
    // Absent entirely when the avatar was never analyzed; present with
    // detected=false when analysis ran and found nothing.
    pub face_detection: Option<FaceDetectionRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct FaceDetectionRecord {
    pub detected: bool,
    pub count: u32,
}

/// Accepts `"a@x.com"`, `["a@x.com", "b@x.com"]`, or nothing at all, always
/// producing a list.
fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    match Option::<OneOrMany>::deserialize(deserializer)? {
        Some(OneOrMany::One(value)) => Ok(vec![value]),
        Some(OneOrMany::Many(values)) => Ok(values),
        None => Ok(Vec::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infer_classifies_common_shapes() {
        assert_eq!(LookupSource::infer("8.8.8.8"), LookupSource::Ip);
        assert_eq!(LookupSource::infer("2001:db8::1"), LookupSource::Ip);
        assert_eq!(LookupSource::infer("a@x.com"), LookupSource::Email);
        assert_eq!(LookupSource::infer("example.com"), LookupSource::Domain);
        assert_eq!(LookupSource::infer("shadow_rat"), LookupSource::Username);
    }

    #[test]
    fn risk_level_parses_any_case_and_defaults_unknown() {
        assert_eq!(RiskLevel::from_label(Some("HIGH")), RiskLevel::High);
        assert_eq!(RiskLevel::from_label(Some("Medium")), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_label(Some("nonsense")), RiskLevel::Unknown);
        assert_eq!(RiskLevel::from_label(None), RiskLevel::Unknown);
    }

    #[test]
    fn risk_badge_is_uppercase_with_lowercase_class() {
        let level = RiskLevel::from_label(Some("hIgH"));
        assert_eq!(level.badge(), "HIGH");
        assert_eq!(level.class(), "high");
        assert_eq!(level.to_string(), "high");
    }

    #[test]
    fn status_decode_handles_all_states() {
        assert_eq!(
            ScanStatus::decode(r#"{"status":"queued"}"#).unwrap(),
            ScanStatus::Queued
        );
        assert_eq!(
            ScanStatus::decode(r#"{"status":"running"}"#).unwrap(),
            ScanStatus::Running
        );
        let done = ScanStatus::decode(r#"{"status":"done","results":{}}"#).unwrap();
        assert!(matches!(done, ScanStatus::Done(_)));
        let failed = ScanStatus::decode(r#"{"status":"failed","error":"api quota"}"#).unwrap();
        assert_eq!(failed, ScanStatus::Failed("api quota".to_string()));
    }

    #[test]
    fn status_decode_rejects_unknown_shapes() {
        assert!(ScanStatus::decode(r#"{"status":"exploded"}"#).is_err());
        assert!(ScanStatus::decode("not json at all").is_err());
    }

    #[test]
    fn done_without_results_yields_empty_bundle() {
        let status = ScanStatus::decode(r#"{"status":"done"}"#).unwrap();
        assert_eq!(status, ScanStatus::Done(ResultBundle::default()));
    }

    #[test]
    fn whois_emails_accept_scalar_and_list() {
        let scalar: WhoisPayload = serde_json::from_str(r#"{"emails":"a@x.com"}"#).unwrap();
        assert_eq!(scalar.emails, vec!["a@x.com"]);

        let list: WhoisPayload =
            serde_json::from_str(r#"{"emails":["a@x.com","b@x.com"]}"#).unwrap();
        assert_eq!(list.emails, vec!["a@x.com", "b@x.com"]);

        let missing: WhoisPayload = serde_json::from_str("{}").unwrap();
        assert!(missing.emails.is_empty());
    }

    #[test]
    fn vt_count_survives_any_missing_layer() {
        let empty = VtPayload::default();
        assert_eq!(empty.malicious_count(), 0);

        let full: VtPayload = serde_json::from_str(
            r#"{"data":{"data":{"attributes":{"last_analysis_stats":{"malicious":7}}}}}"#,
        )
        .unwrap();
        assert_eq!(full.malicious_count(), 7);
    }

    #[test]
    fn shodan_coordinates_require_both_halves() {
        let partial: ShodanPayload =
            serde_json::from_str(r#"{"host":{"latitude":48.85}}"#).unwrap();
        assert_eq!(partial.coordinates(), None);

        let full: ShodanPayload =
            serde_json::from_str(r#"{"host":{"latitude":48.85,"longitude":2.35}}"#).unwrap();
        assert_eq!(full.coordinates(), Some((48.85, 2.35)));
    }
}
