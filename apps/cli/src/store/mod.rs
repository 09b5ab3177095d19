//! Profile Store: the single JSON document holding the user's profile.
//!
//! Writes go to a temp file in the target directory and are renamed over
//! the old document, so a load never observes a half-written profile.

pub mod validation;

use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::errors::AppError;
use crate::models::Profile;

pub use validation::validate_profile;

#[derive(Debug, Clone)]
pub struct ProfileStore {
    path: PathBuf,
}

impl ProfileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Loads and validates the stored profile.
    pub fn load(&self) -> Result<Profile, AppError> {
        let raw = std::fs::read_to_string(&self.path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AppError::NotFound(format!("no profile at {}", self.path.display()))
            } else {
                AppError::io(&self.path, e)
            }
        })?;

        let profile: Profile = serde_json::from_str(&raw).map_err(|e| {
            AppError::Validation(format!("{}: {e}", self.path.display()))
        })?;
        validate_profile(&profile)?;

        debug!(
            "Loaded profile from {} ({} jobs)",
            self.path.display(),
            profile.job_experience.len()
        );
        Ok(profile)
    }

    /// Validates, then atomically replaces the stored profile.
    pub fn save(&self, profile: &Profile) -> Result<(), AppError> {
        validate_profile(profile)?;

        let mut json = serde_json::to_string_pretty(profile)
            .map_err(|e| AppError::Validation(format!("profile is not serializable: {e}")))?;
        json.push('\n');

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&dir).map_err(|e| AppError::io(&dir, e))?;

        let mut temp = NamedTempFile::new_in(&dir).map_err(|e| AppError::io(&dir, e))?;
        if let Err(e) = write_fully(&mut temp, json.as_bytes()) {
            return Err(AppError::io(temp.path(), e));
        }
        temp.persist(&self.path)
            .map_err(|e| AppError::io(&self.path, e.error))?;

        info!("Profile saved to {}", self.path.display());
        Ok(())
    }
}

/// Writes, flushes, and syncs the temp file before it may be renamed into place.
pub(crate) fn write_fully(temp: &mut NamedTempFile, bytes: &[u8]) -> std::io::Result<()> {
    temp.write_all(bytes)?;
    temp.flush()?;
    temp.as_file().sync_all()
}
