use crate::record::{RescueRequest, Status, Transition, Urgency};
use crate::util::{format_datetime, format_timestamp};
use clap::ValueEnum;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum StatusFilter {
    #[default]
    All,
    Pending,
    InProgress,
    Rescued,
}

impl StatusFilter {
    fn matches(&self, status: Status) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Pending => status == Status::Pending,
            StatusFilter::InProgress => status == Status::InProgress,
            StatusFilter::Rescued => status == Status::Rescued,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum UrgencyFilter {
    #[default]
    All,
    Critical,
    High,
    Medium,
}

impl UrgencyFilter {
    fn matches(&self, urgency: &Urgency) -> bool {
        match self {
            UrgencyFilter::All => true,
            UrgencyFilter::Critical => *urgency == Urgency::Critical,
            UrgencyFilter::High => *urgency == Urgency::High,
            UrgencyFilter::Medium => *urgency == Urgency::Medium,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum SortMode {
    #[default]
    Newest,
    Oldest,
    Urgency,
}

/// The three dashboard filter controls.
#[derive(Debug, Clone, Copy, Default)]
pub struct ListFilters {
    pub status: StatusFilter,
    pub urgency: UrgencyFilter,
    pub sort: SortMode,
}

pub fn filter_by_status(requests: Vec<RescueRequest>, filter: StatusFilter) -> Vec<RescueRequest> {
    requests
        .into_iter()
        .filter(|r| filter.matches(r.status))
        .collect()
}

pub fn filter_by_urgency(requests: Vec<RescueRequest>, filter: UrgencyFilter) -> Vec<RescueRequest> {
    requests
        .into_iter()
        .filter(|r| filter.matches(&r.animal.urgency))
        .collect()
}

/// Returns a sorted copy; `sort_by_key` is stable so ties keep input order.
pub fn sort_requests(requests: &[RescueRequest], mode: SortMode) -> Vec<RescueRequest> {
    let mut sorted = requests.to_vec();
    match mode {
        SortMode::Newest => sorted.sort_by(|a, b| b.timestamp.cmp(&a.timestamp)),
        SortMode::Oldest => sorted.sort_by_key(|r| r.timestamp),
        SortMode::Urgency => sorted.sort_by_key(|r| r.animal.urgency.rank()),
    }
    sorted
}

/// Filters then sorts, the order the dashboard applies its controls in.
pub fn apply_filters(requests: Vec<RescueRequest>, filters: &ListFilters) -> Vec<RescueRequest> {
    let requests = filter_by_status(requests, filters.status);
    let requests = filter_by_urgency(requests, filters.urgency);
    sort_requests(&requests, filters.sort)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stats {
    pub total: usize,
    pub pending: usize,
    pub in_progress: usize,
    pub rescued: usize,
}

pub fn compute_stats(requests: &[RescueRequest]) -> Stats {
    let count = |status: Status| requests.iter().filter(|r| r.status == status).count();
    Stats {
        total: requests.len(),
        pending: count(Status::Pending),
        in_progress: count(Status::InProgress),
        rescued: count(Status::Rescued),
    }
}

/// Display-ready summary of one request in the list.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestCard {
    pub id: String,
    pub status: String,
    pub urgency: String,
    pub headline: String,
    pub details: String,
    pub location: String,
    pub reporter: String,
    pub reported: String,
    pub actions: Vec<Transition>,
}

pub fn card_view(request: &RescueRequest, now: i64) -> RequestCard {
    let location = &request.location;
    RequestCard {
        id: request.id.clone(),
        status: request.status.label(),
        urgency: request.animal.urgency.to_string(),
        headline: format!("{} - {}", request.animal.kind, request.animal.condition),
        details: non_blank(&request.animal.description)
            .unwrap_or("No additional details provided")
            .to_string(),
        location: format!("{}, {} - {}", location.address, location.city, location.pincode),
        reporter: format!("{} • {}", request.reporter.name, request.reporter.phone),
        reported: format_timestamp(request.timestamp, now),
        // Only the forward step is offered on the card; the detail view has all of them.
        actions: request.status.transitions().iter().take(1).copied().collect(),
    }
}

/// Full record, laid out in titled sections.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestDetail {
    pub id: String,
    pub sections: Vec<DetailSection>,
    pub actions: Vec<Transition>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DetailSection {
    pub title: &'static str,
    pub rows: Vec<(&'static str, String)>,
}

pub fn detail_view(request: &RescueRequest) -> RequestDetail {
    let location = &request.location;
    let mut location_rows = vec![
        ("Address", location.address.clone()),
        ("City", location.city.clone()),
        ("Pincode", location.pincode.clone()),
    ];
    if let Some((lat, lng)) = location.coordinates() {
        location_rows.push(("Coordinates", format!("{}, {}", lat, lng)));
    }

    let mut reporter_rows = vec![
        ("Name", request.reporter.name.clone()),
        ("Phone", request.reporter.phone.clone()),
    ];
    if let Some(email) = non_blank(&request.reporter.email) {
        reporter_rows.push(("Email", email.to_string()));
    }

    RequestDetail {
        id: request.id.clone(),
        sections: vec![
            DetailSection {
                title: "Request Information",
                rows: vec![
                    ("Request ID", request.id.clone()),
                    ("Status", request.status.label()),
                    ("Urgency", request.animal.urgency.to_string()),
                    ("Reported", format_datetime(request.timestamp)),
                ],
            },
            DetailSection {
                title: "Animal Details",
                rows: vec![
                    ("Type", request.animal.kind.clone()),
                    ("Condition", request.animal.condition.clone()),
                    (
                        "Description",
                        non_blank(&request.animal.description)
                            .unwrap_or("None provided")
                            .to_string(),
                    ),
                ],
            },
            DetailSection {
                title: "Location",
                rows: location_rows,
            },
            DetailSection {
                title: "Reporter Information",
                rows: reporter_rows,
            },
        ],
        actions: request.status.transitions().to_vec(),
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::fixture;

    fn urgencies(requests: &[RescueRequest]) -> Vec<String> {
        requests.iter().map(|r| r.animal.urgency.to_string()).collect()
    }

    fn ids(requests: &[RescueRequest]) -> Vec<&str> {
        requests.iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn test_urgency_sort_is_stable() {
        let input = vec![
            fixture("a", Status::Pending, Urgency::Medium, 1),
            fixture("b", Status::Pending, Urgency::Critical, 2),
            fixture("c", Status::Pending, Urgency::High, 3),
            fixture("d", Status::Pending, Urgency::Critical, 4),
        ];
        let sorted = sort_requests(&input, SortMode::Urgency);
        assert_eq!(urgencies(&sorted), ["critical", "critical", "high", "medium"]);
        assert_eq!(ids(&sorted), ["b", "d", "c", "a"]);
        // input untouched
        assert_eq!(ids(&input), ["a", "b", "c", "d"]);
    }

    #[test]
    fn test_unknown_urgency_sorts_last() {
        let input = vec![
            fixture("a", Status::Pending, Urgency::Other("low".to_string()), 1),
            fixture("b", Status::Pending, Urgency::Medium, 2),
        ];
        assert_eq!(ids(&sort_requests(&input, SortMode::Urgency)), ["b", "a"]);
    }

    #[test]
    fn test_sort_by_time() {
        let input = vec![
            fixture("mid", Status::Pending, Urgency::High, 20),
            fixture("old", Status::Pending, Urgency::High, 10),
            fixture("new", Status::Pending, Urgency::High, 30),
        ];
        assert_eq!(ids(&sort_requests(&input, SortMode::Newest)), ["new", "mid", "old"]);
        assert_eq!(ids(&sort_requests(&input, SortMode::Oldest)), ["old", "mid", "new"]);
    }

    #[test]
    fn test_filter_by_status_keeps_order() {
        let input = vec![
            fixture("p1", Status::Pending, Urgency::High, 1),
            fixture("r1", Status::Rescued, Urgency::High, 2),
            fixture("p2", Status::Pending, Urgency::High, 3),
        ];
        let pending = filter_by_status(input.clone(), StatusFilter::Pending);
        assert_eq!(ids(&pending), ["p1", "p2"]);
        assert_eq!(filter_by_status(input.clone(), StatusFilter::All), input);
    }

    #[test]
    fn test_filter_by_urgency() {
        let input = vec![
            fixture("a", Status::Pending, Urgency::High, 1),
            fixture("b", Status::Pending, Urgency::Critical, 2),
            fixture("c", Status::Pending, Urgency::Other("low".to_string()), 3),
        ];
        assert_eq!(ids(&filter_by_urgency(input.clone(), UrgencyFilter::Critical)), ["b"]);
        assert_eq!(filter_by_urgency(input.clone(), UrgencyFilter::All).len(), 3);
    }

    #[test]
    fn test_apply_filters_combines_controls() {
        let input = vec![
            fixture("a", Status::Pending, Urgency::High, 1),
            fixture("b", Status::Pending, Urgency::High, 3),
            fixture("c", Status::Rescued, Urgency::High, 2),
            fixture("d", Status::Pending, Urgency::Medium, 4),
        ];
        let filters = ListFilters {
            status: StatusFilter::Pending,
            urgency: UrgencyFilter::High,
            sort: SortMode::Newest,
        };
        assert_eq!(ids(&apply_filters(input, &filters)), ["b", "a"]);
    }

    #[test]
    fn test_compute_stats() {
        assert_eq!(compute_stats(&[]), Stats::default());
        let input = vec![
            fixture("a", Status::Pending, Urgency::High, 1),
            fixture("b", Status::InProgress, Urgency::High, 2),
            fixture("c", Status::Rescued, Urgency::High, 3),
        ];
        assert_eq!(
            compute_stats(&input),
            Stats {
                total: 3,
                pending: 1,
                in_progress: 1,
                rescued: 1
            }
        );
    }

    #[test]
    fn test_card_view() {
        let request = fixture("RQ1", Status::InProgress, Urgency::Critical, 0);
        let card = card_view(&request, 30 * 60_000);
        assert_eq!(card.status, "in progress");
        assert_eq!(card.headline, "dog - injured");
        assert_eq!(card.details, "No additional details provided");
        assert_eq!(card.location, "12 Lake Road, Pune - 411001");
        assert_eq!(card.reported, "30 min ago");
        assert_eq!(card.actions.len(), 1);
        assert_eq!(card.actions[0].to, Status::Rescued);

        let rescued = fixture("RQ2", Status::Rescued, Urgency::Critical, 0);
        assert!(card_view(&rescued, 0).actions.is_empty());
    }

    #[test]
    fn test_detail_view_optional_rows() {
        let mut request = fixture("RQ1", Status::InProgress, Urgency::High, 0);
        let detail = detail_view(&request);
        let labels: Vec<&str> = detail.sections[2].rows.iter().map(|(l, _)| *l).collect();
        assert_eq!(labels, ["Address", "City", "Pincode"]);
        assert_eq!(detail.sections[3].rows.len(), 2);
        assert_eq!(detail.actions.len(), 2);

        request.location.latitude = Some("19.076".to_string());
        request.location.longitude = Some("72.8777".to_string());
        request.reporter.email = Some("asha@example.com".to_string());
        let detail = detail_view(&request);
        assert_eq!(
            detail.sections[2].rows.last().unwrap(),
            &("Coordinates", "19.076, 72.8777".to_string())
        );
        assert_eq!(detail.sections[3].rows.len(), 3);
    }
}
