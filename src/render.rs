use crate::dashboard::DashboardView;
use crate::form::{LocationStatus, StatusKind};
use crate::views::{RequestCard, RequestDetail, Stats};
use std::fmt::Write;

pub const EMPTY_STATE: &str = "No rescue requests found";

pub fn render_stats(stats: &Stats) -> String {
    format!(
        "Total: {}  Pending: {}  In Progress: {}  Rescued: {}",
        stats.total, stats.pending, stats.in_progress, stats.rescued
    )
}

pub fn render_card(card: &RequestCard) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}  [{}] [{}]", card.id, card.status, card.urgency);
    let _ = writeln!(out, "  {}", card.headline);
    let _ = writeln!(out, "  {}", card.details);
    let _ = writeln!(out, "  @ {}", card.location);
    let _ = writeln!(out, "  {}  ({})", card.reporter, card.reported);
    for action in &card.actions {
        let _ = writeln!(out, "  -> {} ({})", action.action, action.to);
    }
    out
}

pub fn render_list(cards: &[RequestCard]) -> String {
    if cards.is_empty() {
        return format!("{}\n", EMPTY_STATE);
    }
    cards.iter().map(render_card).collect::<Vec<_>>().join("\n")
}

pub fn render_dashboard(view: &DashboardView) -> String {
    format!("{}\n\n{}", render_stats(&view.stats), render_list(&view.cards))
}

pub fn render_detail(detail: &RequestDetail) -> String {
    let mut out = format!("Request {}\n\n", detail.id);
    for section in &detail.sections {
        let _ = writeln!(out, "{}", section.title);
        for (label, value) in &section.rows {
            let _ = writeln!(out, "  {:<12} {}", format!("{}:", label), value);
        }
        out.push('\n');
    }
    if !detail.actions.is_empty() {
        let _ = writeln!(out, "Actions");
        for action in &detail.actions {
            let _ = writeln!(out, "  {} -> {}", action.action, action.to);
        }
    }
    out
}

pub fn render_confirmation(id: &str) -> String {
    format!(
        "Rescue request submitted.\nRequest ID: {}\nKeep this ID to follow up on the rescue.",
        id
    )
}

pub fn render_location_status(status: &LocationStatus) -> String {
    match status.kind {
        StatusKind::Success => status.message.clone(),
        StatusKind::Error => format!("! {}", status.message),
    }
}
