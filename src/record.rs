use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// Lifecycle stage of a rescue request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    Pending,
    InProgress,
    Rescued,
}

impl Status {
    pub const ALL: [Status; 3] = [Status::Pending, Status::InProgress, Status::Rescued];

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Pending => "pending",
            Status::InProgress => "in-progress",
            Status::Rescued => "rescued",
        }
    }

    /// Human label, `in-progress` becomes `in progress`.
    pub fn label(&self) -> String {
        self.as_str().replacen('-', " ", 1)
    }

    /// Statuses reachable from `self`. `Rescued` is terminal.
    pub fn transitions(&self) -> &'static [Transition] {
        match self {
            Status::Pending => &[Transition {
                to: Status::InProgress,
                action: "Start Rescue",
            }],
            Status::InProgress => &[
                Transition {
                    to: Status::Rescued,
                    action: "Mark as Rescued",
                },
                Transition {
                    to: Status::Pending,
                    action: "Move to Pending",
                },
            ],
            Status::Rescued => &[],
        }
    }

    pub fn can_transition_to(&self, next: Status) -> bool {
        self.transitions().iter().any(|t| t.to == next)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Status {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Status::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| format!("unknown status '{}'", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub to: Status,
    pub action: &'static str,
}

/// Severity classification. Values outside the known three are kept verbatim
/// so that a hand-edited slot still round-trips.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Urgency {
    Critical,
    High,
    Medium,
    Other(String),
}

impl Urgency {
    pub fn as_str(&self) -> &str {
        match self {
            Urgency::Critical => "critical",
            Urgency::High => "high",
            Urgency::Medium => "medium",
            Urgency::Other(value) => value,
        }
    }

    /// Triage rank, lower is more urgent. Unknown values rank after `medium`.
    pub fn rank(&self) -> u8 {
        match self {
            Urgency::Critical => 0,
            Urgency::High => 1,
            Urgency::Medium => 2,
            Urgency::Other(_) => 3,
        }
    }
}

impl Default for Urgency {
    fn default() -> Self {
        Urgency::Medium
    }
}

impl From<String> for Urgency {
    fn from(value: String) -> Self {
        match value.as_str() {
            "critical" => Urgency::Critical,
            "high" => Urgency::High,
            "medium" => Urgency::Medium,
            _ => Urgency::Other(value),
        }
    }
}

impl From<Urgency> for String {
    fn from(value: Urgency) -> Self {
        match value {
            Urgency::Other(value) => value,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Urgency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Location {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<String>,
    pub address: String,
    pub city: String,
    pub pincode: String,
}

impl Location {
    /// Both coordinates, only when both are present and non-blank.
    pub fn coordinates(&self) -> Option<(&str, &str)> {
        let lat = self.latitude.as_deref().filter(|v| !v.trim().is_empty())?;
        let lng = self.longitude.as_deref().filter(|v| !v.trim().is_empty())?;
        Some((lat, lng))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Animal {
    #[serde(rename = "type")]
    pub kind: String,
    pub condition: String,
    pub urgency: Urgency,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Reporter {
    pub name: String,
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RescueRequest {
    pub id: String,
    pub timestamp: i64,
    pub status: Status,
    pub location: Location,
    pub animal: Animal,
    pub reporter: Reporter,
    pub updated_at: i64,
}

impl RescueRequest {
    /// A fresh `pending` request stamped with `now`.
    pub fn new(location: Location, animal: Animal, reporter: Reporter, now: i64) -> Self {
        Self {
            id: generate_request_id(now),
            timestamp: now,
            status: Status::Pending,
            location,
            animal,
            reporter,
            updated_at: now,
        }
    }
}

/// `RQ` followed by the epoch millis and a random suffix below 10000.
pub fn generate_request_id(now: i64) -> String {
    let suffix: u32 = rand::rng().random_range(0..10000);
    format!("RQ{}{}", now, suffix)
}

pub fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or_default()
}

#[cfg(test)]
pub(crate) fn fixture(id: &str, status: Status, urgency: Urgency, timestamp: i64) -> RescueRequest {
    RescueRequest {
        id: id.to_string(),
        timestamp,
        status,
        location: Location {
            latitude: None,
            longitude: None,
            address: "12 Lake Road".to_string(),
            city: "Pune".to_string(),
            pincode: "411001".to_string(),
        },
        animal: Animal {
            kind: "dog".to_string(),
            condition: "injured".to_string(),
            urgency,
            description: None,
        },
        reporter: Reporter {
            name: "Asha".to_string(),
            phone: "+91 90000 00000".to_string(),
            email: None,
        },
        updated_at: timestamp,
    }
}
