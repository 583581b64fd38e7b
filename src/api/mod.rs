// src/api/mod.rs
// =============================================================================
// The business API as the editor sees it.
//
// The editor only talks to the `BusinessApi` trait. `HttpApi` is the reqwest
// implementation used by the CLI; tests plug in an in-memory fake instead.
//
// Submodules:
// - client: HttpApi, the HTTP implementation (plus the login endpoints)
// - error: ApiError and the status/body classification
// - types: request and response shapes, validated paths, logo files
// =============================================================================

mod client;
mod error;
mod types;

use async_trait::async_trait;

pub use client::{HttpApi, DEFAULT_BASE_URL};
pub use error::ApiError;
pub use types::{
    sanitize_path, BusinessPath, LinkPayload, LinkRecord, LogoChange, LogoError, LogoFile,
    PathError, Profile, ProfilePayload, MAX_PATH_LEN,
};

/// Everything the editor needs from the backend.
///
/// `Send + Sync` so a shared handle can be moved into the debounced
/// path-probe task.
#[async_trait]
pub trait BusinessApi: Send + Sync {
    /// Fetches the owner's business at `path`. `ApiError::NotFound` when
    /// there is none, which is also what makes a path "available".
    async fn business_by_path(&self, path: &str) -> Result<Profile, ApiError>;

    async fn create_business(&self, payload: &ProfilePayload) -> Result<Profile, ApiError>;

    /// Replaces the scalars and the whole link list of the business that is
    /// currently at `path`.
    async fn replace_business(&self, path: &str, payload: &ProfilePayload)
        -> Result<Profile, ApiError>;

    async fn update_business_asset(&self, path: &str, change: &LogoChange)
        -> Result<Profile, ApiError>;

    async fn list_businesses(&self) -> Result<Vec<Profile>, ApiError>;

    /// Unauthenticated read used for the visitor-facing page.
    async fn public_business(&self, path: &str) -> Result<Profile, ApiError>;
}
