// src/editor/form.rs
// =============================================================================
// BusinessEditor: one editing session for one business.
//
// It owns:
// - the scalar fields (path, name, description)
// - the link list (LinkCollection)
// - the logo currently on the server and an optional pending change
// - the path availability checker fed from the path field
// - the save orchestrator
//
// Local state is never trusted after a save: the editor reloads from what
// the server says, since the server may adjust fields on its own.
// =============================================================================

use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

use super::links::LinkCollection;
use super::path_check::{CheckState, PathChecker, PathStatus};
use super::save::{SaveError, SaveOrchestrator, SaveRequest, SaveTarget};
use crate::api::{
    sanitize_path, ApiError, BusinessApi, BusinessPath, LogoChange, LogoError, LogoFile, Profile,
    ProfilePayload,
};
use crate::preview::{DraftView, Preview};

/// Whether this session is creating a business or editing a stored one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditMode {
    New,
    /// `path` is where the business was when it was last loaded; saves
    /// replace the business stored there
    Existing { path: String },
}

pub struct BusinessEditor {
    api: Arc<dyn BusinessApi>,
    mode: EditMode,
    path: String,
    name: String,
    description: String,
    logo: Option<String>,
    pending_logo: Option<LogoChange>,
    links: LinkCollection,
    path_checker: PathChecker,
    saver: SaveOrchestrator,
}

impl BusinessEditor {
    /// Starts an empty editor for a business that does not exist yet.
    pub fn new_business(api: Arc<dyn BusinessApi>) -> Self {
        BusinessEditor {
            path_checker: PathChecker::new(Arc::clone(&api)),
            saver: SaveOrchestrator::new(Arc::clone(&api)),
            api,
            mode: EditMode::New,
            path: String::new(),
            name: String::new(),
            description: String::new(),
            logo: None,
            pending_logo: None,
            links: LinkCollection::new(),
        }
    }

    /// Fetches the business at `path` and opens it for editing.
    pub async fn open(api: Arc<dyn BusinessApi>, path: &str) -> Result<Self, ApiError> {
        let profile = api.business_by_path(path).await?;
        let mut editor = Self::new_business(api);
        editor.load(&profile);
        Ok(editor)
    }

    // Replaces the form with the server's view. A pending logo change is
    // left alone: it only goes away once it has been applied.
    fn load(&mut self, profile: &Profile) {
        self.mode = EditMode::Existing {
            path: profile.path.clone(),
        };
        self.path = profile.path.clone();
        self.name = profile.name.clone();
        self.description = profile.description.clone();
        self.logo = profile.logo.clone();
        self.links.load(&profile.links);
    }

    pub fn mode(&self) -> &EditMode {
        &self.mode
    }

    pub fn is_new(&self) -> bool {
        self.mode == EditMode::New
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn logo(&self) -> Option<&str> {
        self.logo.as_deref()
    }

    pub fn pending_logo(&self) -> Option<&LogoChange> {
        self.pending_logo.as_ref()
    }

    /// Sets the path field, sanitized the way the input field does it, and
    /// schedules an availability check for the result.
    pub fn set_path(&mut self, raw: &str) -> &str {
        self.path = sanitize_path(raw);
        self.path_checker.input(&self.path);
        &self.path
    }

    pub fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
    }

    pub fn set_description(&mut self, description: &str) {
        self.description = description.to_string();
    }

    pub fn links(&self) -> &LinkCollection {
        &self.links
    }

    pub fn links_mut(&mut self) -> &mut LinkCollection {
        &mut self.links
    }

    pub fn path_status(&self) -> Option<PathStatus> {
        self.path_checker.status()
    }

    pub fn path_check(&self) -> CheckState {
        self.path_checker.state()
    }

    /// Waits for a scheduled path check to finish.
    pub async fn settle_path_check(&mut self) -> Option<PathStatus> {
        self.path_checker.settle().await
    }

    /// Reads an image from disk and queues it as the new logo.
    pub async fn set_logo_file(&mut self, path: &Path) -> Result<(), LogoError> {
        let file = LogoFile::from_path(path).await?;
        self.set_logo(file);
        Ok(())
    }

    pub fn set_logo(&mut self, file: LogoFile) {
        self.pending_logo = Some(LogoChange::Upload(file));
    }

    /// Queues removal of the stored logo. If there is none, this just drops
    /// a pending upload.
    pub fn remove_logo(&mut self) {
        self.pending_logo = if self.logo.is_some() {
            Some(LogoChange::Remove)
        } else {
            None
        };
    }

    /// Snapshot of what a save would send right now.
    pub fn save_request(&self) -> Result<SaveRequest, SaveError> {
        let path = BusinessPath::parse(&self.path)?;
        let target = match &self.mode {
            EditMode::New => SaveTarget::Create,
            EditMode::Existing { path } => SaveTarget::Replace { path: path.clone() },
        };

        Ok(SaveRequest {
            target,
            payload: ProfilePayload {
                path: path.to_string(),
                name: self.name.clone(),
                description: self.description.clone(),
                links: self.links.to_payload(),
            },
            logo: self.pending_logo.clone(),
        })
    }

    /// Saves, then refreshes the whole form from the server.
    ///
    /// On `PartialSave` the form is refreshed from the saved business too,
    /// and the logo change stays pending so the next save retries it.
    pub async fn save(&mut self) -> Result<Profile, SaveError> {
        let request = self.save_request()?;

        match self.saver.save(&request).await {
            Ok(saved) => {
                self.pending_logo = None;
                Ok(self.refresh(saved).await)
            }
            Err(SaveError::PartialSave { profile, source }) => {
                self.load(&profile);
                Err(SaveError::PartialSave { profile, source })
            }
            Err(e) => Err(e),
        }
    }

    // Re-fetches by the path the server returned. If that fails the save
    // response is the next best thing.
    async fn refresh(&mut self, saved: Profile) -> Profile {
        match self.api.business_by_path(&saved.path).await {
            Ok(fresh) => {
                info!(path = %fresh.path, "reloaded business after save");
                self.load(&fresh);
                fresh
            }
            Err(e) => {
                warn!(path = %saved.path, error = %e, "reload after save failed, using save response");
                self.load(&saved);
                saved
            }
        }
    }

    /// What the page would look like with the current, unsaved edits.
    pub fn preview(&self) -> Preview {
        Preview::from_draft(&DraftView {
            is_new: self.is_new(),
            name: &self.name,
            description: &self.description,
            logo: self.logo.as_deref(),
            pending_logo: self.pending_logo.as_ref(),
            links: self.links.entries(),
        })
    }
}
