// src/core/normalizer.rs

use crate::core::models::{
    BreachRecord, HibpPayload, ResultBundle, RiskLevel, SocialPayload, SocialProfilePayload,
};
use chrono::{DateTime, NaiveDate, NaiveDateTime};

// --- Section data ---
// Sections are plain data handed to whatever renderer is in front; nothing in
// this module knows about the terminal.

/// One self-contained dashboard unit. `normalize` emits these in the fixed
/// analyst reading order: verdict first, then network and domain attribution,
/// then personal/identity correlation.
#[derive(Debug, Clone, PartialEq)]
pub enum Section {
    Summary(SummarySection),
    Network(NetworkSection),
    Domain(DomainSection),
    Email(EmailSection),
    Identity(IdentitySection),
}

impl Section {
    /// The display region this section populates.
    pub fn region(&self) -> &'static str {
        match self {
            Section::Summary(_) => "summary",
            Section::Network(_) => "network",
            Section::Domain(_) => "domain",
            Section::Email(_) => "email",
            Section::Identity(_) => "identity",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Section::Summary(_) => "Summary",
            Section::Network(_) => "Network / IP",
            Section::Domain(_) => "Domain",
            Section::Email(_) => "Email",
            Section::Identity(_) => "Identity",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SummarySection {
    pub risk: RiskLevel,
    pub vt_malicious: u64,
    pub abuse_confidence: u64,
    pub open_ports: Vec<u16>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NetworkSection {
    pub network_range: Option<String>,
    pub organization: Option<String>,
    /// (latitude, longitude) when a reputation payload carried both.
    pub coordinates: Option<(f64, f64)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DomainSection {
    pub registrar: Option<String>,
    pub created: Option<String>,
    pub expires: Option<String>,
    pub emails: Vec<String>,
    pub certificates: Vec<Certificate>,
}

impl DomainSection {
    pub fn emails_joined(&self) -> String {
        self.emails.join(", ")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Certificate {
    pub name: String,
    pub issuer: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EmailSection {
    pub avatar: Option<AvatarProfile>,
    pub breaches: Option<BreachReport>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AvatarProfile {
    pub found: bool,
    pub url: Option<String>,
}

/// Outcome of the breach lookup. "Nothing found" and "the lookup never ran"
/// carry different security weight, so they stay separate values all the way
/// to the screen.
#[derive(Debug, Clone, PartialEq)]
pub enum BreachReport {
    Breaches(Vec<BreachSummary>),
    Clean { message: String },
    Unavailable { detail: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct BreachSummary {
    pub title: String,
    pub domain: String,
    pub date: String,
    /// Comma-joined category list, e.g. "Emails, Passwords".
    pub data_classes: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IdentitySection {
    /// 0-100, clamped.
    pub overall_confidence: u8,
    pub platforms: Vec<PlatformPresence>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlatformPresence {
    pub platform: String,
    pub exists: bool,
    /// 0-100, clamped.
    pub confidence: u8,
    pub evidence: Vec<String>,
    pub face: FaceAnnotation,
}

/// Avatar face-detection outcome. Three states, not a boolean: analysis that
/// never ran is not the same claim as analysis that found no face.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaceAnnotation {
    NotEvaluated,
    NotDetected,
    Detected(u32),
}

// --- Derivation ---

/// Maps one result bundle to its dashboard sections. Pure: no I/O, no
/// side effects, same bundle in, same sections out. A source key missing from
/// the bundle simply produces no section; the order of the emitted sections
/// is fixed regardless of which keys are present.
pub fn normalize(bundle: &ResultBundle) -> Vec<Section> {
    [
        summary_section(bundle).map(Section::Summary),
        network_section(bundle).map(Section::Network),
        domain_section(bundle).map(Section::Domain),
        email_section(bundle).map(Section::Email),
        identity_section(bundle).map(Section::Identity),
    ]
    .into_iter()
    .flatten()
    .collect()
}

fn summary_section(bundle: &ResultBundle) -> Option<SummarySection> {
    if bundle.threat_score.is_none()
        && bundle.vt.is_none()
        && bundle.abuseipdb.is_none()
        && bundle.shodan.is_none()
    {
        return None;
    }

    let risk = RiskLevel::from_label(
        bundle
            .threat_score
            .as_ref()
            .and_then(|t| t.risk_level.as_deref()),
    );

    Some(SummarySection {
        risk,
        vt_malicious: bundle.vt.as_ref().map(|v| v.malicious_count()).unwrap_or(0),
        abuse_confidence: bundle
            .abuseipdb
            .as_ref()
            .map(|a| a.confidence())
            .unwrap_or(0),
        open_ports: bundle
            .shodan
            .as_ref()
            .map(|s| s.open_ports())
            .unwrap_or_default(),
    })
}

fn network_section(bundle: &ResultBundle) -> Option<NetworkSection> {
    let coordinates = bundle.shodan.as_ref().and_then(|s| s.coordinates());
    let rir = bundle.ip_rir.as_ref();
    if rir.is_none() && coordinates.is_none() {
        return None;
    }

    let network = rir.and_then(|r| r.network.as_ref());
    Some(NetworkSection {
        network_range: network.and_then(|n| n.cidr.clone()),
        // Registries describe the holder in the ASN text more often than in
        // the network name; take whichever is present.
        organization: rir
            .and_then(|r| r.asn_description.clone())
            .or_else(|| network.and_then(|n| n.name.clone())),
        coordinates,
    })
}

fn domain_section(bundle: &ResultBundle) -> Option<DomainSection> {
    if bundle.whois.is_none() && bundle.crtsh.is_none() {
        return None;
    }

    let whois = bundle.whois.as_ref();
    Some(DomainSection {
        registrar: whois.and_then(|w| w.registrar.clone()),
        created: whois.and_then(|w| w.creation_date.as_deref().map(format_date)),
        expires: whois.and_then(|w| w.expiration_date.as_deref().map(format_date)),
        emails: whois.map(|w| w.emails.clone()).unwrap_or_default(),
        certificates: bundle
            .crtsh
            .as_ref()
            .map(|entries| {
                entries
                    .iter()
                    .map(|e| Certificate {
                        name: e.name_value.clone(),
                        issuer: e.issuer_name.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default(),
    })
}

fn email_section(bundle: &ResultBundle) -> Option<EmailSection> {
    if bundle.gravatar.is_none() && bundle.hibp.is_none() {
        return None;
    }

    Some(EmailSection {
        avatar: bundle.gravatar.as_ref().map(|g| AvatarProfile {
            found: g.found,
            url: g.url.clone(),
        }),
        breaches: bundle.hibp.as_ref().map(breach_report),
    })
}

fn breach_report(payload: &HibpPayload) -> BreachReport {
    if payload.found {
        let breaches = payload
            .data
            .as_deref()
            .unwrap_or_default()
            .iter()
            .map(breach_summary)
            .collect();
        return BreachReport::Breaches(breaches);
    }

    // Not found splits on whether the lookup actually ran.
    let failure = match (&payload.error, payload.status) {
        (Some(error), Some(status)) => Some(format!("{error} (HTTP {status})")),
        (Some(error), None) => Some(error.clone()),
        (None, Some(status)) => Some(format!("lookup failed with HTTP {status}")),
        (None, None) => None,
    };
    match failure {
        Some(detail) => BreachReport::Unavailable { detail },
        None => BreachReport::Clean {
            message: payload
                .message
                .clone()
                .unwrap_or_else(|| "No breaches found".to_string()),
        },
    }
}

fn breach_summary(record: &BreachRecord) -> BreachSummary {
    BreachSummary {
        title: record
            .title
            .clone()
            .or_else(|| record.name.clone())
            .unwrap_or_else(|| "Unnamed breach".to_string()),
        domain: record.domain.clone().unwrap_or_default(),
        date: record
            .breach_date
            .as_deref()
            .map(format_date)
            .unwrap_or_default(),
        data_classes: record.data_classes.join(", "),
    }
}

fn identity_section(bundle: &ResultBundle) -> Option<IdentitySection> {
    // The enhanced payload supersedes the legacy one outright; no field-level
    // merging between the two.
    if let Some(profile) = &bundle.social_profile {
        return Some(from_profile(profile));
    }
    bundle.social.as_ref().map(from_legacy_social)
}

fn from_profile(payload: &SocialProfilePayload) -> IdentitySection {
    IdentitySection {
        overall_confidence: clamp_percent(payload.overall_confidence),
        platforms: payload
            .platforms
            .iter()
            .map(|p| PlatformPresence {
                platform: p.platform.clone(),
                exists: p.exists,
                confidence: clamp_percent(p.confidence),
                evidence: p.evidence.clone().unwrap_or_default(),
                face: match &p.face_detection {
                    None => FaceAnnotation::NotEvaluated,
                    Some(face) if face.detected => FaceAnnotation::Detected(face.count),
                    Some(_) => FaceAnnotation::NotDetected,
                },
            })
            .collect(),
    }
}

fn from_legacy_social(payload: &SocialPayload) -> IdentitySection {
    IdentitySection {
        overall_confidence: clamp_percent(payload.confidence),
        platforms: payload
            .platforms
            .iter()
            .map(|p| PlatformPresence {
                platform: p.platform.clone(),
                exists: p.exists,
                confidence: 0,
                evidence: Vec::new(),
                face: FaceAnnotation::NotEvaluated,
            })
            .collect(),
    }
}

fn clamp_percent(value: Option<f64>) -> u8 {
    value.unwrap_or(0.0).clamp(0.0, 100.0).round() as u8
}

/// Normalizes the assorted date strings sources emit to `YYYY-MM-DD`,
/// keeping the raw text when nothing recognizable parses.
fn format_date(raw: &str) -> String {
    let trimmed = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return dt.date_naive().to_string();
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S") {
        return dt.date().to_string();
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S") {
        return dt.date().to_string();
    }
    if let Ok(d) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return d.to_string();
    }
    trimmed.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_bundle_yields_no_sections() {
        assert!(normalize(&ResultBundle::default()).is_empty());
    }

    #[test]
    fn format_date_normalizes_known_shapes_and_keeps_the_rest() {
        assert_eq!(format_date("2021-03-04T12:00:00"), "2021-03-04");
        assert_eq!(format_date("2021-03-04 12:00:00"), "2021-03-04");
        assert_eq!(format_date("2021-03-04T12:00:00+02:00"), "2021-03-04");
        assert_eq!(format_date("2021-03-04"), "2021-03-04");
        assert_eq!(format_date("4th of March 2021"), "4th of March 2021");
    }

    #[test]
    fn clamp_percent_bounds_and_defaults() {
        assert_eq!(clamp_percent(None), 0);
        assert_eq!(clamp_percent(Some(-3.0)), 0);
        assert_eq!(clamp_percent(Some(240.0)), 100);
        assert_eq!(clamp_percent(Some(87.4)), 87);
    }
}
