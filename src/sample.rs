use crate::record::{
    Animal, Location, RescueRequest, Reporter, Status, Urgency, generate_request_id,
};

const HOUR_MS: i64 = 3_600_000;

/// One demo request per status, for trying the dashboard out.
pub fn sample_requests(now: i64) -> Vec<RescueRequest> {
    vec![
        RescueRequest {
            id: generate_request_id(now),
            timestamp: now - HOUR_MS,
            status: Status::Pending,
            location: Location {
                latitude: Some("19.0760".to_string()),
                longitude: Some("72.8777".to_string()),
                address: "Near Marine Drive Beach".to_string(),
                city: "Mumbai".to_string(),
                pincode: "400020".to_string(),
            },
            animal: Animal {
                kind: "dog".to_string(),
                condition: "injured".to_string(),
                urgency: Urgency::Critical,
                description: Some("Hit by vehicle, bleeding from leg, unable to move".to_string()),
            },
            reporter: Reporter {
                name: "Priya Sharma".to_string(),
                phone: "+91 98765 43210".to_string(),
                email: Some("priya@example.com".to_string()),
            },
            updated_at: now - HOUR_MS,
        },
        RescueRequest {
            id: generate_request_id(now),
            timestamp: now - 2 * HOUR_MS,
            status: Status::InProgress,
            location: Location {
                latitude: Some("28.7041".to_string()),
                longitude: Some("77.1025".to_string()),
                address: "Connaught Place Metro Station".to_string(),
                city: "New Delhi".to_string(),
                pincode: "110001".to_string(),
            },
            animal: Animal {
                kind: "cat".to_string(),
                condition: "trapped".to_string(),
                urgency: Urgency::High,
                description: Some("Stuck in drainage pipe, meowing continuously".to_string()),
            },
            reporter: Reporter {
                name: "Rahul Verma".to_string(),
                phone: "+91 98765 43211".to_string(),
                email: None,
            },
            updated_at: now - HOUR_MS / 2,
        },
        RescueRequest {
            id: generate_request_id(now),
            timestamp: now - 24 * HOUR_MS,
            status: Status::Rescued,
            location: Location {
                latitude: Some("12.9716".to_string()),
                longitude: Some("77.5946".to_string()),
                address: "Indiranagar Metro".to_string(),
                city: "Bangalore".to_string(),
                pincode: "560038".to_string(),
            },
            animal: Animal {
                kind: "bird".to_string(),
                condition: "sick".to_string(),
                urgency: Urgency::Medium,
                description: Some("Pigeon with injured wing, unable to fly".to_string()),
            },
            reporter: Reporter {
                name: "Anjali Reddy".to_string(),
                phone: "+91 98765 43212".to_string(),
                email: Some("anjali@example.com".to_string()),
            },
            updated_at: now - 12 * HOUR_MS,
        },
    ]
}
