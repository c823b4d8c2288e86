//! Profile records and the whole-file JSON store.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use chrono::Local;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when reading or writing the profile store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to read profile store: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse profile store: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Outcome of a recorded weather query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryOutcome {
    /// The provider resolved the city.
    Success,
    /// The lookup failed (unknown city or provider failure).
    Failed,
}

/// A single recorded weather query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Normalized city name as submitted.
    pub query: String,

    /// Local timestamp of the query, second precision.
    pub datetime: String,

    /// Whether the lookup resolved a known city.
    pub outcome: QueryOutcome,
}

impl HistoryEntry {
    /// Creates an entry timestamped with the current local time.
    #[must_use]
    pub fn now(query: impl Into<String>, outcome: QueryOutcome) -> Self {
        Self {
            query: query.into(),
            datetime: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            outcome,
        }
    }
}

/// Persisted per-user record.
///
/// Empty `name`/`city` strings mean "unset". History is append-only and
/// unbounded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Display name, empty when unset.
    #[serde(default)]
    pub name: String,

    /// Pinned home city, empty when unset.
    #[serde(default)]
    pub city: String,

    /// Weather queries in chronological order.
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
}

/// Mapping from user identifier to profile; the whole map is the unit
/// of persistence.
pub type ProfileMap = HashMap<String, UserProfile>;

/// Creates a default-valued profile for the user if absent.
///
/// Returns `true` when a new profile was created. Idempotent: an
/// already-populated profile is never reset.
pub fn ensure(profiles: &mut ProfileMap, user_id: &str) -> bool {
    if profiles.contains_key(user_id) {
        false
    } else {
        profiles.insert(user_id.to_owned(), UserProfile::default());
        true
    }
}

/// Whole-file JSON store for user profiles.
#[derive(Debug, Clone)]
pub struct UserStore {
    /// Path to the backing JSON file.
    path: PathBuf,
}

impl UserStore {
    /// Creates a store backed by the given file path.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the backing file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads all profiles. A missing backing file yields an empty map.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_all(&self) -> Result<ProfileMap, StoreError> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(ProfileMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    /// Overwrites the backing file with the given profiles.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn save_all(&self, profiles: &ProfileMap) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(profiles)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }
}
