use crate::record::{RescueRequest, Status, now_millis};
use log::{debug, error, info, warn};
#[cfg(test)]
use std::cell::RefCell;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to serialize requests: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Persistence for the whole request collection. Every mutation is a full
/// read, modify and write of the collection.
pub trait Store {
    /// Persisted requests in append order. Absent or malformed content loads
    /// as an empty collection.
    fn load(&self) -> Vec<RescueRequest>;

    fn append(&self, request: RescueRequest) -> Result<(), StoreError>;

    /// Sets `status` and refreshes `updated_at` on the request with `id`.
    /// Returns `false`, leaving the slot untouched, when no such request exists.
    fn update_status(&self, id: &str, status: Status) -> Result<bool, StoreError>;

    /// Irreversibly drops every request.
    fn clear(&self) -> Result<(), StoreError>;
}

/// Outcome of reading the raw slot.
enum Slot {
    Empty,
    Valid(Vec<RescueRequest>),
    Malformed(serde_json::Error),
}

fn parse_slot(text: &str) -> Slot {
    if text.trim().is_empty() {
        return Slot::Empty;
    }
    match serde_json::from_str::<Vec<RescueRequest>>(text) {
        Ok(requests) => Slot::Valid(requests),
        Err(e) => Slot::Malformed(e),
    }
}

fn apply_status(requests: &mut [RescueRequest], id: &str, status: Status) -> bool {
    match requests.iter_mut().find(|r| r.id == id) {
        Some(request) => {
            request.status = status;
            request.updated_at = now_millis();
            true
        }
        None => false,
    }
}

/// A single JSON file holding the collection as an array.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn read_slot(&self) -> Result<Slot, StoreError> {
        match fs::read_to_string(&self.path) {
            Ok(text) => Ok(parse_slot(&text)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Slot::Empty),
            Err(e) => Err(self.io_error(e)),
        }
    }

    /// Current collection for a mutation. A malformed file is moved aside
    /// before the caller overwrites it.
    fn read_for_write(&self) -> Result<Vec<RescueRequest>, StoreError> {
        match self.read_slot()? {
            Slot::Empty => Ok(Vec::new()),
            Slot::Valid(requests) => Ok(requests),
            Slot::Malformed(e) => {
                let backup = self.quarantine_path();
                fs::rename(&self.path, &backup).map_err(|e| self.io_error(e))?;
                warn!(
                    "Malformed store {} ({}), moved to {}",
                    self.path.display(),
                    e,
                    backup.display()
                );
                Ok(Vec::new())
            }
        }
    }

    fn quarantine_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_os_string();
        name.push(format!(".corrupt-{}", now_millis()));
        PathBuf::from(name)
    }

    /// Writes to a sibling temp file and renames it over the slot.
    fn write_all(&self, requests: &[RescueRequest]) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(requests)?;

        let mut tmp_name = self.path.as_os_str().to_os_string();
        tmp_name.push(".tmp");
        let tmp_path = PathBuf::from(tmp_name);

        let mut file = fs::File::create(&tmp_path).map_err(|e| self.io_error(e))?;
        file.write_all(json.as_bytes())
            .and_then(|_| file.flush())
            .map_err(|e| self.io_error(e))?;
        fs::rename(&tmp_path, &self.path).map_err(|e| self.io_error(e))?;

        debug!("Wrote {} requests to {}", requests.len(), self.path.display());
        Ok(())
    }
}

impl Store for JsonFileStore {
    fn load(&self) -> Vec<RescueRequest> {
        match self.read_slot() {
            Ok(Slot::Empty) => Vec::new(),
            Ok(Slot::Valid(requests)) => requests,
            Ok(Slot::Malformed(e)) => {
                warn!("Ignoring malformed store {}: {}", self.path.display(), e);
                Vec::new()
            }
            Err(e) => {
                error!("{}", e);
                Vec::new()
            }
        }
    }

    fn append(&self, request: RescueRequest) -> Result<(), StoreError> {
        let mut requests = self.read_for_write()?;
        info!("Saving request {}", request.id);
        requests.push(request);
        self.write_all(&requests)
    }

    fn update_status(&self, id: &str, status: Status) -> Result<bool, StoreError> {
        let mut requests = match self.read_slot()? {
            Slot::Valid(requests) => requests,
            Slot::Empty | Slot::Malformed(_) => return Ok(false),
        };
        if !apply_status(&mut requests, id, status) {
            return Ok(false);
        }
        self.write_all(&requests)?;
        info!("Request {} is now {}", id, status);
        Ok(true)
    }

    fn clear(&self) -> Result<(), StoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                info!("Cleared all requests in {}", self.path.display());
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.io_error(e)),
        }
    }
}

/// In-process slot holding the same JSON text a file would.
#[cfg(test)]
#[derive(Default)]
pub struct MemoryStore {
    slot: RefCell<Option<String>>,
}

#[cfg(test)]
impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from raw slot text, valid or not.
    pub fn with_raw(text: &str) -> Self {
        Self {
            slot: RefCell::new(Some(text.to_string())),
        }
    }

    pub fn raw(&self) -> Option<String> {
        self.slot.borrow().clone()
    }

    fn read_slot(&self) -> Slot {
        match self.slot.borrow().as_deref() {
            Some(text) => parse_slot(text),
            None => Slot::Empty,
        }
    }

    fn write_all(&self, requests: &[RescueRequest]) -> Result<(), StoreError> {
        let json = serde_json::to_string(requests)?;
        *self.slot.borrow_mut() = Some(json);
        Ok(())
    }
}

#[cfg(test)]
impl Store for MemoryStore {
    fn load(&self) -> Vec<RescueRequest> {
        match self.read_slot() {
            Slot::Valid(requests) => requests,
            Slot::Empty => Vec::new(),
            Slot::Malformed(e) => {
                warn!("Ignoring malformed in-memory store: {}", e);
                Vec::new()
            }
        }
    }

    fn append(&self, request: RescueRequest) -> Result<(), StoreError> {
        let mut requests = self.load();
        requests.push(request);
        self.write_all(&requests)
    }

    fn update_status(&self, id: &str, status: Status) -> Result<bool, StoreError> {
        let mut requests = self.load();
        if !apply_status(&mut requests, id, status) {
            return Ok(false);
        }
        self.write_all(&requests)?;
        Ok(true)
    }

    fn clear(&self) -> Result<(), StoreError> {
        *self.slot.borrow_mut() = None;
        Ok(())
    }
}
