// src/ui/widgets/dashboard.rs

use crate::app::{App, AppState, SPINNER_CHARS};
use crate::core::models::RiskLevel;
use crate::core::normalizer::{
    BreachReport, DomainSection, EmailSection, FaceAnnotation, IdentitySection, NetworkSection,
    Section, SummarySection,
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, Wrap},
};

/// Renders the main dashboard panel: placeholder text before and during a
/// scan, the normalized sections once one is done.
pub fn render_dashboard(frame: &mut Frame, app: &mut App, area: Rect) {
    let main_block = Block::default()
        .borders(Borders::ALL)
        .title("Risk Dashboard (scroll with ↑ ↓)");

    match app.state {
        AppState::Idle => {
            let mut lines = vec![
                Line::from("Type an IP, email, username or domain and press Enter."),
                Line::from("Tab cycles the lookup source; Esc quits."),
            ];
            if let Some(error) = &app.last_error {
                lines.push(Line::from(""));
                lines.push(Line::from(Span::styled(
                    error.as_str(),
                    Style::default().fg(Color::Red),
                )));
            }
            let placeholder = Paragraph::new(lines)
                .block(main_block)
                .wrap(Wrap { trim: true });
            frame.render_widget(placeholder, area);
        }
        AppState::Submitting | AppState::Polling => {
            let spinner_char = SPINNER_CHARS[app.spinner_frame];
            let label = if app.state == AppState::Submitting {
                "Submitting scan..."
            } else {
                "Scan in progress..."
            };
            let waiting = Paragraph::new(Line::from(vec![
                Span::styled(
                    format!("{spinner_char} "),
                    Style::default().fg(Color::Cyan),
                ),
                Span::raw(label),
            ]))
            .block(main_block)
            .alignment(Alignment::Center);
            frame.render_widget(waiting, area);
        }
        AppState::Failed => {
            let error = app.last_error.as_deref().unwrap_or("scan failed");
            let failed = Paragraph::new(Line::from(Span::styled(
                error,
                Style::default().fg(Color::Red),
            )))
            .block(main_block)
            .wrap(Wrap { trim: true });
            frame.render_widget(failed, area);
        }
        AppState::Done => {
            let lines = section_lines(&app.sections);
            let line_count = lines.len();
            app.dashboard_scroll_state = app
                .dashboard_scroll_state
                .content_length(line_count)
                .position(app.scroll_offset);

            let dashboard = Paragraph::new(lines)
                .block(main_block)
                .wrap(Wrap { trim: false })
                .scroll((app.scroll_offset as u16, 0));
            frame.render_widget(dashboard, area);

            let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight);
            frame.render_stateful_widget(scrollbar, area, &mut app.dashboard_scroll_state);
        }
    }
}

/// Turns the normalized sections into styled text. Pure: same sections in,
/// same lines out, so redrawing a frame can never accumulate content. The
/// sections arrive already ordered; this function preserves that order.
pub fn section_lines(sections: &[Section]) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for section in sections {
        if !lines.is_empty() {
            lines.push(Line::from(""));
        }
        lines.push(Line::from(Span::styled(
            section.title().to_string(),
            Style::default().bold().underlined(),
        )));
        match section {
            Section::Summary(summary) => build_summary(&mut lines, summary),
            Section::Network(network) => build_network(&mut lines, network),
            Section::Domain(domain) => build_domain(&mut lines, domain),
            Section::Email(email) => build_email(&mut lines, email),
            Section::Identity(identity) => build_identity(&mut lines, identity),
        }
    }
    lines
}

fn risk_style(level: RiskLevel) -> Style {
    // Keyed on the canonical lowercase class, same as the badge itself.
    match level.class() {
        "high" => Style::default().fg(Color::Red).bold(),
        "medium" => Style::default().fg(Color::Yellow),
        "low" => Style::default().fg(Color::Green),
        _ => Style::default().fg(Color::DarkGray),
    }
}

fn build_summary(lines: &mut Vec<Line<'static>>, summary: &SummarySection) {
    lines.push(Line::from(vec![
        Span::raw("Risk level: "),
        Span::styled(summary.risk.badge(), risk_style(summary.risk)),
    ]));
    lines.push(Line::from(format!(
        "VirusTotal detections: {}",
        summary.vt_malicious
    )));
    lines.push(Line::from(format!(
        "AbuseIPDB confidence: {}%",
        summary.abuse_confidence
    )));
    if !summary.open_ports.is_empty() {
        let ports = summary
            .open_ports
            .iter()
            .map(|p| p.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        lines.push(Line::from(format!("Open ports: {ports}")));
    }
}

fn build_network(lines: &mut Vec<Line<'static>>, network: &NetworkSection) {
    if let Some(range) = &network.network_range {
        lines.push(Line::from(format!("Network range: {range}")));
    }
    if let Some(org) = &network.organization {
        lines.push(Line::from(format!("Organization: {org}")));
    }
    if let Some((lat, lon)) = network.coordinates {
        lines.push(Line::from(format!("Location: {lat:.4}, {lon:.4}")));
    }
}

fn build_domain(lines: &mut Vec<Line<'static>>, domain: &DomainSection) {
    if let Some(registrar) = &domain.registrar {
        lines.push(Line::from(format!("Registrar: {registrar}")));
    }
    if let Some(created) = &domain.created {
        lines.push(Line::from(format!("Created: {created}")));
    }
    if let Some(expires) = &domain.expires {
        lines.push(Line::from(format!("Expires: {expires}")));
    }
    if !domain.emails.is_empty() {
        lines.push(Line::from(format!("Contacts: {}", domain.emails_joined())));
    }
    if !domain.certificates.is_empty() {
        lines.push(Line::from(format!(
            "Certificates ({}):",
            domain.certificates.len()
        )));
        for cert in &domain.certificates {
            lines.push(Line::from(vec![
                Span::raw(format!("  {} ", cert.name)),
                Span::styled(
                    format!("({})", cert.issuer),
                    Style::default().fg(Color::DarkGray),
                ),
            ]));
        }
    }
}

fn build_email(lines: &mut Vec<Line<'static>>, email: &EmailSection) {
    if let Some(avatar) = &email.avatar {
        if avatar.found {
            let mut spans = vec![Span::styled(
                "Gravatar profile found",
                Style::default().fg(Color::Cyan),
            )];
            if let Some(url) = &avatar.url {
                spans.push(Span::raw(format!(": {url}")));
            }
            lines.push(Line::from(spans));
        } else {
            lines.push(Line::from("No Gravatar profile."));
        }
    }
    match &email.breaches {
        Some(BreachReport::Breaches(breaches)) => {
            lines.push(Line::from(Span::styled(
                format!("Found in {} breach(es):", breaches.len()),
                Style::default().fg(Color::Red),
            )));
            for breach in breaches {
                lines.push(Line::from(format!(
                    "  {} ({}, {})",
                    breach.title, breach.domain, breach.date
                )));
                if !breach.data_classes.is_empty() {
                    lines.push(Line::from(Span::styled(
                        format!("    Exposed: {}", breach.data_classes),
                        Style::default().fg(Color::DarkGray),
                    )));
                }
            }
        }
        Some(BreachReport::Clean { message }) => {
            lines.push(Line::from(Span::styled(
                format!("✓ {message}"),
                Style::default().fg(Color::Green),
            )));
        }
        // A lookup that never ran is not a clean bill of health; it gets its
        // own visual treatment so the two can't be confused.
        Some(BreachReport::Unavailable { detail }) => {
            lines.push(Line::from(Span::styled(
                format!("Breach lookup unavailable: {detail}"),
                Style::default().fg(Color::Yellow),
            )));
        }
        None => {}
    }
}

fn build_identity(lines: &mut Vec<Line<'static>>, identity: &IdentitySection) {
    lines.push(Line::from(format!(
        "Overall match confidence: {}%",
        identity.overall_confidence
    )));
    for platform in &identity.platforms {
        let (icon, icon_style) = if platform.exists {
            ("✓", Style::default().fg(Color::Green))
        } else {
            ("✗", Style::default().fg(Color::DarkGray))
        };
        let mut spans = vec![
            Span::styled(format!("{icon} "), icon_style),
            Span::raw(platform.platform.clone()),
        ];
        if platform.exists {
            spans.push(Span::raw(format!("  {}%", platform.confidence)));
        }
        match platform.face {
            FaceAnnotation::Detected(count) => spans.push(Span::styled(
                format!("  face detected ({count})"),
                Style::default().fg(Color::Cyan),
            )),
            FaceAnnotation::NotDetected => spans.push(Span::styled(
                "  no face detected".to_string(),
                Style::default().fg(Color::DarkGray),
            )),
            FaceAnnotation::NotEvaluated => {}
        }
        lines.push(Line::from(spans));
        if !platform.evidence.is_empty() {
            lines.push(Line::from(Span::styled(
                format!("    evidence: {}", platform.evidence.join(", ")),
                Style::default().fg(Color::DarkGray),
            )));
        }
    }
}
