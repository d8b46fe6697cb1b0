use crate::geo::{GeoError, Locator};
use crate::record::{Animal, Location, RescueRequest, Reporter, Urgency, now_millis};
use crate::store::{Store, StoreError};
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FormError {
    #[error("{0} is required")]
    Missing(&'static str),
    #[error("{field} must be a number, got '{value}'")]
    BadCoordinate { field: &'static str, value: String },
    #[error("latitude and longitude must be given together")]
    HalfCoordinate,
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Raw values as entered, keyed like the form's fields.
#[derive(Debug, Clone, Default)]
pub struct FormInput {
    pub latitude: Option<String>,
    pub longitude: Option<String>,
    pub address: String,
    pub city: String,
    pub pincode: String,
    pub animal_type: String,
    pub condition: String,
    pub urgency: Option<Urgency>,
    pub description: Option<String>,
    pub reporter_name: String,
    pub phone: String,
    pub email: Option<String>,
}

impl FormInput {
    /// Typed coordinates, blank entries counting as absent.
    fn typed_coordinates(&self) -> (Option<&str>, Option<&str>) {
        fn typed(value: &Option<String>) -> Option<&str> {
            value.as_deref().filter(|v| !v.trim().is_empty())
        }
        (typed(&self.latitude), typed(&self.longitude))
    }

    fn validate(&self) -> Result<(), FormError> {
        let required = [
            ("address", &self.address),
            ("city", &self.city),
            ("pincode", &self.pincode),
            ("animalType", &self.animal_type),
            ("condition", &self.condition),
            ("reporterName", &self.reporter_name),
            ("phone", &self.phone),
        ];
        if let Some((field, _)) = required.iter().find(|(_, v)| v.trim().is_empty()) {
            return Err(FormError::Missing(*field));
        }

        let (latitude, longitude) = self.typed_coordinates();
        for (field, value) in [("latitude", latitude), ("longitude", longitude)] {
            if let Some(value) = value {
                if value.trim().parse::<f64>().is_err() {
                    return Err(FormError::BadCoordinate {
                        field,
                        value: value.to_string(),
                    });
                }
            }
        }
        if latitude.is_some() != longitude.is_some() {
            return Err(FormError::HalfCoordinate);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormState {
    Idle,
    Locating,
    Located,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Success,
    Error,
}

/// Message shown under the location button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationStatus {
    pub message: String,
    pub kind: StatusKind,
}

pub struct FormController<'a, S: Store> {
    store: &'a S,
    locator: Option<&'a dyn Locator>,
    state: FormState,
    latitude: Option<String>,
    longitude: Option<String>,
}

impl<'a, S: Store> FormController<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self {
            store,
            locator: None,
            state: FormState::Idle,
            latitude: None,
            longitude: None,
        }
    }

    pub fn with_locator(mut self, locator: &'a dyn Locator) -> Self {
        self.locator = Some(locator);
        self
    }

    pub fn state(&self) -> FormState {
        self.state
    }

    /// One location lookup. Failure leaves the form usable for manual entry.
    pub async fn locate(&mut self) -> LocationStatus {
        let Some(locator) = self.locator else {
            return LocationStatus {
                message: GeoError::Unsupported.to_string(),
                kind: StatusKind::Error,
            };
        };

        self.state = FormState::Locating;
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner} {msg}") {
            spinner.set_style(style);
        }
        spinner.set_message("Detecting Location...");
        spinner.enable_steady_tick(Duration::from_millis(80));

        let result = locator.current_position().await;
        spinner.finish_and_clear();

        match result {
            Ok(coords) => {
                self.latitude = Some(coords.latitude.to_string());
                self.longitude = Some(coords.longitude.to_string());
                self.state = FormState::Located;
                info!("Location detected at {}, {}", coords.latitude, coords.longitude);
                LocationStatus {
                    message: format!(
                        "✓ Location detected: {:.6}, {:.6}",
                        coords.latitude, coords.longitude
                    ),
                    kind: StatusKind::Success,
                }
            }
            Err(e) => {
                self.state = FormState::Idle;
                warn!("Location lookup failed: {:?}", e);
                LocationStatus {
                    message: format!("Unable to retrieve location. {}", e),
                    kind: StatusKind::Error,
                }
            }
        }
    }

    /// Builds a `pending` request from `input`, persists it and returns its id.
    /// A typed coordinate pair wins over a detected fix; the two are never mixed.
    pub fn submit(&self, input: FormInput) -> Result<String, FormError> {
        input.validate()?;

        let (latitude, longitude) = match input.typed_coordinates() {
            (Some(lat), Some(lng)) => (Some(lat.to_string()), Some(lng.to_string())),
            _ => (self.latitude.clone(), self.longitude.clone()),
        };

        let request = RescueRequest::new(
            Location {
                latitude,
                longitude,
                address: input.address,
                city: input.city,
                pincode: input.pincode,
            },
            Animal {
                kind: input.animal_type,
                condition: input.condition,
                urgency: input.urgency.unwrap_or_default(),
                description: input.description,
            },
            Reporter {
                name: input.reporter_name,
                phone: input.phone,
                email: input.email,
            },
            now_millis(),
        );

        let id = request.id.clone();
        self.store.append(request)?;
        info!("Submitted rescue request {}", id);
        Ok(id)
    }
}
