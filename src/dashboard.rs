use crate::record::{RescueRequest, Status};
use crate::sample::sample_requests;
use crate::store::{Store, StoreError};
use crate::views::{
    ListFilters, RequestCard, RequestDetail, Stats, apply_filters, card_view, compute_stats,
    detail_view,
};
use csv::Writer;
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info};
use serde::Serialize;
use std::io::Write;
use std::time::Duration;
use thiserror::Error;
use tokio::time::sleep;

pub const CLEAR_PROMPT: &str =
    "Are you sure you want to clear all rescue requests? This action cannot be undone.";

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("request {id} cannot move from {from} to {to}")]
    IllegalTransition { id: String, from: Status, to: Status },
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("failed to export requests: {0}")]
    Csv(#[from] csv::Error),
}

/// Counters plus the current list, everything one render needs.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub stats: Stats,
    pub cards: Vec<RequestCard>,
}

pub struct Dashboard<'a, S: Store> {
    store: &'a S,
    refresh_delay: Duration,
}

impl<'a, S: Store> Dashboard<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self {
            store,
            refresh_delay: Duration::from_millis(500),
        }
    }

    pub fn with_refresh_delay(mut self, delay_ms: u64) -> Self {
        self.refresh_delay = Duration::from_millis(delay_ms);
        self
    }

    pub fn stats(&self) -> Stats {
        compute_stats(&self.store.load())
    }

    /// Fresh read of the slot with the filter controls applied.
    pub fn requests(&self, filters: &ListFilters) -> Vec<RescueRequest> {
        let requests = apply_filters(self.store.load(), filters);
        debug!("{} requests match {:?}", requests.len(), filters);
        requests
    }

    pub fn view(&self, filters: &ListFilters, now: i64) -> DashboardView {
        DashboardView {
            stats: self.stats(),
            cards: self
                .requests(filters)
                .iter()
                .map(|r| card_view(r, now))
                .collect(),
        }
    }

    pub fn details(&self, id: &str) -> Option<RequestDetail> {
        self.store
            .load()
            .iter()
            .find(|r| r.id == id)
            .map(detail_view)
    }

    /// Moves a request along the transition table. An unknown id is a no-op
    /// returning `false`.
    pub fn change_status(&self, id: &str, next: Status) -> Result<bool, DashboardError> {
        let Some(current) = self.store.load().into_iter().find(|r| r.id == id) else {
            debug!("Ignoring status change for unknown request {}", id);
            return Ok(false);
        };
        if !current.status.can_transition_to(next) {
            return Err(DashboardError::IllegalTransition {
                id: id.to_string(),
                from: current.status,
                to: next,
            });
        }
        Ok(self.store.update_status(id, next)?)
    }

    /// Same as `view`, behind a short cosmetic "Refreshing..." spinner.
    pub async fn refresh(&self, filters: &ListFilters, now: i64) -> DashboardView {
        let view = self.view(filters, now);

        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner} {msg}") {
            spinner.set_style(style);
        }
        spinner.set_message("Refreshing...");
        spinner.enable_steady_tick(Duration::from_millis(80));
        sleep(self.refresh_delay).await;
        spinner.finish_and_clear();

        view
    }

    /// Empties the store once `confirm` agrees. Returns whether it did.
    pub fn clear_all<F>(&self, confirm: F) -> Result<bool, DashboardError>
    where
        F: FnOnce(&str) -> bool,
    {
        if !confirm(CLEAR_PROMPT) {
            info!("Clear cancelled");
            return Ok(false);
        }
        self.store.clear()?;
        Ok(true)
    }

    pub fn seed_samples(&self, now: i64) -> Result<usize, DashboardError> {
        let samples = sample_requests(now);
        let count = samples.len();
        for request in samples {
            self.store.append(request)?;
        }
        info!("Sample data added: {} requests", count);
        Ok(count)
    }
}

/// Flat CSV shape of a request.
#[derive(Debug, Serialize)]
struct RequestRow<'r> {
    id: &'r str,
    timestamp: i64,
    updated_at: i64,
    status: &'static str,
    urgency: &'r str,
    animal_type: &'r str,
    condition: &'r str,
    description: &'r str,
    address: &'r str,
    city: &'r str,
    pincode: &'r str,
    latitude: &'r str,
    longitude: &'r str,
    reporter_name: &'r str,
    phone: &'r str,
    email: &'r str,
}

impl<'r> From<&'r RescueRequest> for RequestRow<'r> {
    fn from(r: &'r RescueRequest) -> Self {
        Self {
            id: &r.id,
            timestamp: r.timestamp,
            updated_at: r.updated_at,
            status: r.status.as_str(),
            urgency: r.animal.urgency.as_str(),
            animal_type: &r.animal.kind,
            condition: &r.animal.condition,
            description: r.animal.description.as_deref().unwrap_or_default(),
            address: &r.location.address,
            city: &r.location.city,
            pincode: &r.location.pincode,
            latitude: r.location.latitude.as_deref().unwrap_or_default(),
            longitude: r.location.longitude.as_deref().unwrap_or_default(),
            reporter_name: &r.reporter.name,
            phone: &r.reporter.phone,
            email: r.reporter.email.as_deref().unwrap_or_default(),
        }
    }
}

/// Writes `requests` as CSV with a header row.
pub fn write_csv<W: Write>(requests: &[RescueRequest], out: W) -> Result<(), DashboardError> {
    let mut writer = Writer::from_writer(out);
    for request in requests {
        writer.serialize(RequestRow::from(request))?;
    }
    writer.flush().map_err(csv::Error::from)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{Urgency, fixture};
    use crate::store::MemoryStore;
    use crate::views::{SortMode, StatusFilter};

    fn seeded() -> MemoryStore {
        let store = MemoryStore::new();
        store
            .append(fixture("RQ1", Status::Pending, Urgency::Medium, 100))
            .unwrap();
        store
            .append(fixture("RQ2", Status::InProgress, Urgency::Critical, 200))
            .unwrap();
        store
            .append(fixture("RQ3", Status::Rescued, Urgency::High, 300))
            .unwrap();
        store
    }

    #[test]
    fn test_view_counts_and_orders() {
        let store = seeded();
        let dashboard = Dashboard::new(&store);
        let filters = ListFilters {
            sort: SortMode::Urgency,
            ..ListFilters::default()
        };
        let view = dashboard.view(&filters, 1_000);
        assert_eq!(view.stats.total, 3);
        let ids: Vec<&str> = view.cards.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, ["RQ2", "RQ3", "RQ1"]);
    }

    #[test]
    fn test_view_survives_extreme_timestamps() {
        let store = MemoryStore::new();
        store
            .append(fixture("RQ1", Status::Pending, Urgency::High, i64::MIN))
            .unwrap();
        store
            .append(fixture("RQ2", Status::Pending, Urgency::High, i64::MAX))
            .unwrap();
        let view = Dashboard::new(&store).view(&ListFilters::default(), 1_000);
        assert_eq!(view.stats.total, 2);
        assert_eq!(view.cards[0].id, "RQ2");
        assert_eq!(view.cards[1].reported, i64::MIN.to_string());
    }

    #[test]
    fn test_status_change_follows_table() {
        let store = seeded();
        let dashboard = Dashboard::new(&store);

        assert!(dashboard.change_status("RQ1", Status::InProgress).unwrap());
        assert!(dashboard.change_status("RQ2", Status::Pending).unwrap());
        assert_eq!(dashboard.stats().pending, 1);
        assert_eq!(dashboard.stats().in_progress, 1);

        let pending = dashboard.requests(&ListFilters {
            status: StatusFilter::Pending,
            ..ListFilters::default()
        });
        assert_eq!(pending[0].id, "RQ2");
    }

    #[test]
    fn test_illegal_transition_rejected() {
        let store = seeded();
        let raw = store.raw();
        let dashboard = Dashboard::new(&store);

        let err = dashboard.change_status("RQ3", Status::Pending).unwrap_err();
        assert!(matches!(
            err,
            DashboardError::IllegalTransition {
                from: Status::Rescued,
                to: Status::Pending,
                ..
            }
        ));
        assert!(dashboard.change_status("RQ1", Status::Rescued).is_err());
        assert_eq!(store.raw(), raw);
    }

    #[test]
    fn test_unknown_id_is_silent() {
        let store = seeded();
        let dashboard = Dashboard::new(&store);
        assert!(!dashboard.change_status("RQ9", Status::Rescued).unwrap());
        assert!(dashboard.details("RQ9").is_none());
        assert_eq!(dashboard.details("RQ2").unwrap().actions.len(), 2);
        assert!(dashboard.details("RQ3").unwrap().actions.is_empty());
    }

    #[test]
    fn test_clear_requires_confirmation() {
        let store = seeded();
        let dashboard = Dashboard::new(&store);

        assert!(!dashboard.clear_all(|_| false).unwrap());
        assert_eq!(dashboard.stats().total, 3);

        let mut asked = String::new();
        assert!(
            dashboard
                .clear_all(|prompt| {
                    asked = prompt.to_string();
                    true
                })
                .unwrap()
        );
        assert_eq!(asked, CLEAR_PROMPT);
        assert_eq!(dashboard.stats(), Stats::default());
    }

    #[test]
    fn test_seed_samples() {
        let store = MemoryStore::new();
        let dashboard = Dashboard::new(&store);
        assert_eq!(dashboard.seed_samples(10_000_000_000).unwrap(), 3);
        let stats = dashboard.stats();
        assert_eq!((stats.total, stats.rescued), (3, 1));
    }

    #[tokio::test]
    async fn test_refresh_matches_view() {
        let store = seeded();
        let dashboard = Dashboard::new(&store).with_refresh_delay(10);
        let filters = ListFilters::default();
        let refreshed = dashboard.refresh(&filters, 1_000).await;
        assert_eq!(refreshed, dashboard.view(&filters, 1_000));
    }

    #[test]
    fn test_write_csv() {
        let store = seeded();
        let dashboard = Dashboard::new(&store);
        let mut out = Vec::new();
        write_csv(&dashboard.requests(&ListFilters::default()), &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("id,timestamp,updated_at,status,urgency"));
        assert!(lines[1].starts_with("RQ3,300,300,rescued,high,dog"));
    }
}
