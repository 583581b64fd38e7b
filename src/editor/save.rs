// src/editor/save.rs
// =============================================================================
// Sends an edited business to the server in as few requests as possible.
//
// The sequence:
// 1. One JSON request with the scalar fields and the whole link list:
//    POST (new business) or PUT keyed by the path it was loaded with
// 2. Only if that worked and a logo change is pending: one multipart PATCH,
//    addressed to the path the server returned in step 1
//
// The two cannot be merged: the logo is multipart/form-data, the rest is JSON.
//
// Failure handling:
// - Step 1 fails: nothing was written, the logo request never goes out
// - Step 2 fails: the business IS saved, only the logo is not. That is a
//   PartialSave, reported separately so it is never mistaken for success.
// - A save while another is still running is refused with InFlight
//
// Rust concepts:
// - AtomicBool + a Drop guard: the in-flight flag is cleared on every exit path
// - thiserror: SaveError says which step failed and what was saved
// =============================================================================

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

use crate::api::{ApiError, BusinessApi, LogoChange, PathError, Profile, ProfilePayload};

/// Whether the save creates a new business or replaces an existing one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveTarget {
    Create,
    /// Replace the business currently stored at `path`
    Replace { path: String },
}

/// Everything one save needs, captured from the editor at the moment the
/// user pressed save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveRequest {
    pub target: SaveTarget,
    pub payload: ProfilePayload,
    pub logo: Option<LogoChange>,
}

#[derive(Debug, Error)]
pub enum SaveError {
    /// Caught locally, before any request
    #[error("invalid path: {0}")]
    InvalidPath(#[from] PathError),

    #[error("the path '{path}' is already taken, choose another one")]
    PathConflict { path: String, message: String },

    #[error("the server rejected the business: {0}")]
    Validation(String),

    #[error("not authorized, please log in again")]
    Unauthorized,

    /// The business and its links were saved; the logo change was not
    #[error("business saved, but the logo change failed: {source}")]
    PartialSave {
        profile: Box<Profile>,
        #[source]
        source: ApiError,
    },

    #[error("could not save the business: {0}")]
    Network(#[source] ApiError),

    #[error("a save is already in progress")]
    InFlight,
}

impl SaveError {
    fn from_api(error: ApiError, path: &str) -> Self {
        match error {
            ApiError::PathConflict(message) => SaveError::PathConflict {
                path: path.to_string(),
                message,
            },
            ApiError::Validation(message) => SaveError::Validation(message),
            ApiError::Unauthorized => SaveError::Unauthorized,
            other => SaveError::Network(other),
        }
    }
}

pub struct SaveOrchestrator {
    api: Arc<dyn BusinessApi>,
    in_flight: AtomicBool,
}

// Clears the in-flight flag on every way out of `save`, including when the
// save future is dropped halfway
struct InFlightGuard<'a>(&'a AtomicBool);

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| InFlightGuard(flag))
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl SaveOrchestrator {
    pub fn new(api: Arc<dyn BusinessApi>) -> Self {
        SaveOrchestrator {
            api,
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn is_saving(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    // Runs the save sequence
    //
    // Parameters:
    //   request: target (create or replace), JSON payload, optional logo change
    //
    // Returns: the server's final view of the business (after the logo change,
    // when there was one), or the SaveError of the first step that failed
    pub async fn save(&self, request: &SaveRequest) -> Result<Profile, SaveError> {
        let _guard = InFlightGuard::acquire(&self.in_flight).ok_or(SaveError::InFlight)?;
        let payload = &request.payload;

        let saved = match &request.target {
            SaveTarget::Create => self.api.create_business(payload).await,
            SaveTarget::Replace { path } => self.api.replace_business(path, payload).await,
        }
        .map_err(|e| SaveError::from_api(e, &payload.path))?;

        info!(path = %saved.path, links = saved.links.len(), "business saved");

        let Some(change) = &request.logo else {
            return Ok(saved);
        };

        // The server may have adjusted the path, so use the one it returned
        match self.api.update_business_asset(&saved.path, change).await {
            Ok(profile) => {
                info!(path = %profile.path, "logo updated");
                Ok(profile)
            }
            Err(source) => {
                warn!(path = %saved.path, error = %source, "logo update failed after save");
                Err(SaveError::PartialSave {
                    profile: Box::new(saved),
                    source,
                })
            }
        }
    }
}
