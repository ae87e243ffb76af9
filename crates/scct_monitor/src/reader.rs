use std::path::{Path, PathBuf};

use prediction_engine::{MatchField, RawFields};
use tracing::debug;

use crate::error::ScctError;
use crate::profile::Profile;

/// Reads the per-field text files SCCT exports into each profile directory.
#[derive(Debug, Clone)]
pub struct CastingDataReader {
    profiles_dir: PathBuf,
}

impl CastingDataReader {
    pub fn new(profiles_dir: impl Into<PathBuf>) -> Self {
        Self { profiles_dir: profiles_dir.into() }
    }

    pub fn profiles_dir(&self) -> &Path {
        &self.profiles_dir
    }

    pub fn field_path(&self, profile: &Profile, field: MatchField) -> PathBuf {
        self.profiles_dir.join(profile.id()).join(format!("{}.txt", field.name()))
    }

    /// Whole file contents, untouched. Missing or unreadable = error, never a default.
    pub async fn read(&self, profile: &Profile, field: MatchField) -> Result<String, ScctError> {
        let path = self.field_path(profile, field);
        tokio::fs::read_to_string(&path)
            .await
            .map_err(|source| ScctError::FieldUnavailable { field, profile: profile.id().to_string(), source })
    }

    /// All six fields in validation order; stops at the first missing one.
    pub async fn read_all(&self, profile: &Profile) -> Result<RawFields, ScctError> {
        let mut raw = RawFields::default();
        for field in MatchField::ALL {
            let value = self.read(profile, field).await?;
            debug!(profile = profile.id(), field = field.name(), value = value.trim(), "SCCT field read");
            raw.set(field, value);
        }
        Ok(raw)
    }
}
