// src/testing.rs
// =============================================================================
// An in-memory BusinessApi for unit tests.
//
// It behaves like the real server where the editor can tell the difference:
// paths are unique, a replace can move a business to a new path, links get
// server ids, and logo changes update the stored profile. Every call is
// recorded so tests can assert exactly which requests went out.
// =============================================================================

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use crate::api::{ApiError, BusinessApi, LinkRecord, LogoChange, Profile, ProfilePayload};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Get(String),
    Create(ProfilePayload),
    Replace(String, ProfilePayload),
    Asset(String, LogoChange),
    List,
    Public(String),
}

#[derive(Default)]
pub struct FakeApi {
    profiles: Mutex<HashMap<String, Profile>>,
    calls: Mutex<Vec<Call>>,
    latency: Mutex<Duration>,
    fail_probes: AtomicBool,
    next_save_error: Mutex<Option<ApiError>>,
    next_asset_error: Mutex<Option<ApiError>>,
    next_get_error: Mutex<Option<ApiError>>,
    // When set, the server stores paths with this suffix appended
    rename_suffix: Mutex<Option<String>>,
    next_id: AtomicU64,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_profiles(profiles: Vec<Profile>) -> Self {
        let api = Self::default();
        {
            let mut stored = api.profiles.lock().unwrap();
            for profile in profiles {
                stored.insert(profile.path.clone(), profile);
            }
        }
        api
    }

    pub fn set_latency(&self, latency: Duration) {
        *self.latency.lock().unwrap() = latency;
    }

    /// Probes (GET by path) fail with 401 instead of answering.
    pub fn fail_probes_with_unauthorized(&self) {
        self.fail_probes.store(true, Ordering::SeqCst);
    }

    pub fn fail_next_save(&self, error: ApiError) {
        *self.next_save_error.lock().unwrap() = Some(error);
    }

    pub fn fail_next_asset(&self, error: ApiError) {
        *self.next_asset_error.lock().unwrap() = Some(error);
    }

    pub fn fail_next_get(&self, error: ApiError) {
        *self.next_get_error.lock().unwrap() = Some(error);
    }

    pub fn rename_saved_paths(&self, suffix: &str) {
        *self.rename_suffix.lock().unwrap() = Some(suffix.to_string());
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// Paths that were looked up with GET businesses/<path>/.
    pub fn probes(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Get(path) => Some(path),
                _ => None,
            })
            .collect()
    }

    pub fn asset_calls(&self) -> Vec<(String, LogoChange)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Asset(path, change) => Some((path, change)),
                _ => None,
            })
            .collect()
    }

    pub fn stored(&self, path: &str) -> Option<Profile> {
        self.profiles.lock().unwrap().get(path).cloned()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    async fn delay(&self) {
        let latency = *self.latency.lock().unwrap();
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }
    }

    fn build_profile(&self, payload: &ProfilePayload, previous: Option<&Profile>) -> Profile {
        let suffix = self.rename_suffix.lock().unwrap().clone().unwrap_or_default();
        let links = payload
            .links
            .iter()
            .map(|link| LinkRecord {
                id: Some(self.next_id.fetch_add(1, Ordering::SeqCst) + 1),
                title: link.title.clone(),
                url: link.url.clone(),
                icon_type: link.icon_type,
                order: link.order,
            })
            .collect();

        Profile {
            id: previous.and_then(|p| p.id).or(Some(1)),
            path: format!("{}{}", payload.path, suffix),
            name: payload.name.clone(),
            description: payload.description.clone(),
            logo: previous.and_then(|p| p.logo.clone()),
            created_at: None,
            links,
        }
    }
}

#[async_trait]
impl BusinessApi for FakeApi {
    async fn business_by_path(&self, path: &str) -> Result<Profile, ApiError> {
        self.record(Call::Get(path.to_string()));
        self.delay().await;

        if self.fail_probes.load(Ordering::SeqCst) {
            return Err(ApiError::Unauthorized);
        }
        if let Some(error) = self.next_get_error.lock().unwrap().take() {
            return Err(error);
        }
        self.stored(path).ok_or(ApiError::NotFound)
    }

    async fn create_business(&self, payload: &ProfilePayload) -> Result<Profile, ApiError> {
        self.record(Call::Create(payload.clone()));
        self.delay().await;

        if let Some(error) = self.next_save_error.lock().unwrap().take() {
            return Err(error);
        }

        let profile = self.build_profile(payload, None);
        let mut profiles = self.profiles.lock().unwrap();
        if profiles.contains_key(&profile.path) {
            return Err(ApiError::PathConflict(
                "business with this path already exists.".to_string(),
            ));
        }
        profiles.insert(profile.path.clone(), profile.clone());
        Ok(profile)
    }

    async fn replace_business(
        &self,
        path: &str,
        payload: &ProfilePayload,
    ) -> Result<Profile, ApiError> {
        self.record(Call::Replace(path.to_string(), payload.clone()));
        self.delay().await;

        if let Some(error) = self.next_save_error.lock().unwrap().take() {
            return Err(error);
        }

        let mut profiles = self.profiles.lock().unwrap();
        let previous = profiles.get(path).cloned().ok_or(ApiError::NotFound)?;
        let profile = self.build_profile(payload, Some(&previous));
        if profile.path != path && profiles.contains_key(&profile.path) {
            return Err(ApiError::PathConflict(
                "business with this path already exists.".to_string(),
            ));
        }
        profiles.remove(path);
        profiles.insert(profile.path.clone(), profile.clone());
        Ok(profile)
    }

    async fn update_business_asset(
        &self,
        path: &str,
        change: &LogoChange,
    ) -> Result<Profile, ApiError> {
        self.record(Call::Asset(path.to_string(), change.clone()));
        self.delay().await;

        if let Some(error) = self.next_asset_error.lock().unwrap().take() {
            return Err(error);
        }

        let mut profiles = self.profiles.lock().unwrap();
        let profile = profiles.get_mut(path).ok_or(ApiError::NotFound)?;
        profile.logo = match change {
            LogoChange::Upload(file) => Some(format!("https://cdn.test/logos/{}", file.file_name)),
            LogoChange::Remove => None,
        };
        Ok(profile.clone())
    }

    async fn list_businesses(&self) -> Result<Vec<Profile>, ApiError> {
        self.record(Call::List);
        self.delay().await;

        let mut profiles: Vec<Profile> = self.profiles.lock().unwrap().values().cloned().collect();
        profiles.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(profiles)
    }

    async fn public_business(&self, path: &str) -> Result<Profile, ApiError> {
        self.record(Call::Public(path.to_string()));
        self.delay().await;
        self.stored(path).ok_or(ApiError::NotFound)
    }
}
