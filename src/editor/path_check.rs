// src/editor/path_check.rs
// =============================================================================
// Tells the user, while they type, whether the path they want is still free.
//
// How it works:
// 1. Every input bumps a generation counter and resets the status
// 2. The previous pending probe (if any) is aborted
// 3. A new task sleeps for the debounce delay, then probes the API
// 4. The probe's result is only published if its generation is still current
//
// Step 4 matters even with step 2 in place: an aborted task can already be past
// its last await point, and on a multi-threaded runtime it may finish after a
// newer input arrived.
//
// The answer is advisory. Another session can claim the path between the probe
// and the save; the save request is what actually decides.
//
// Rust concepts:
// - Handle::try_current + JoinHandle::abort: one pending probe task at a time
// - tokio::sync::watch: subscribers always see the latest state
// - Arc: the task and the checker share the API and the sender
// =============================================================================

use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::api::BusinessApi;

/// Quiet period after the last keystroke before a probe goes out.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

/// Shorter candidates are never probed.
pub const MIN_CANDIDATE_LEN: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathStatus {
    Checking,
    Available,
    Taken,
}

/// What the checker currently knows, always about `candidate`.
/// `status == None` means "nothing to say": too short, not probed yet, or the
/// probe failed in a way that does not tell us anything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckState {
    pub candidate: String,
    pub status: Option<PathStatus>,
    generation: u64,
}

pub struct PathChecker {
    api: Arc<dyn BusinessApi>,
    delay: Duration,
    state: Arc<watch::Sender<CheckState>>,
    pending: Option<JoinHandle<()>>,
}

impl PathChecker {
    pub fn new(api: Arc<dyn BusinessApi>) -> Self {
        Self::with_delay(api, DEFAULT_DEBOUNCE)
    }

    pub fn with_delay(api: Arc<dyn BusinessApi>, delay: Duration) -> Self {
        let (state, _) = watch::channel(CheckState::default());
        PathChecker {
            api,
            delay,
            state: Arc::new(state),
            pending: None,
        }
    }

    // Feeds the latest value of the path field
    //
    // The delayed probe runs as a task on the current tokio runtime. Outside
    // a runtime the candidate is recorded but never probed, so the status
    // stays None.
    //
    // Parameters:
    //   candidate: the sanitized path as it is now; replaces any earlier one
    pub fn input(&mut self, candidate: &str) {
        if let Some(pending) = self.pending.take() {
            pending.abort();
        }

        let mut generation = 0;
        self.state.send_modify(|state| {
            state.generation += 1;
            state.candidate = candidate.to_string();
            state.status = None;
            generation = state.generation;
        });

        if candidate.chars().count() < MIN_CANDIDATE_LEN {
            return;
        }

        let runtime = match Handle::try_current() {
            Ok(runtime) => runtime,
            Err(e) => {
                warn!(%candidate, error = %e, "no tokio runtime, path will not be checked");
                return;
            }
        };

        let api = Arc::clone(&self.api);
        let state = Arc::clone(&self.state);
        let delay = self.delay;
        let candidate = candidate.to_string();

        self.pending = Some(runtime.spawn(async move {
            tokio::time::sleep(delay).await;

            if !publish(&state, generation, Some(PathStatus::Checking)) {
                return;
            }

            debug!(%candidate, "probing path availability");
            let status = match api.business_by_path(&candidate).await {
                Ok(_) => Some(PathStatus::Taken),
                Err(e) if e.is_not_found() => Some(PathStatus::Available),
                Err(e) => {
                    // Unknown is not the same as free
                    warn!(%candidate, error = %e, "path probe failed");
                    None
                }
            };

            publish(&state, generation, status);
        }));
    }

    /// The current status for the latest candidate.
    pub fn status(&self) -> Option<PathStatus> {
        self.state.borrow().status
    }

    pub fn state(&self) -> CheckState {
        self.state.borrow().clone()
    }

    /// A receiver that sees every published state change.
    pub fn subscribe(&self) -> watch::Receiver<CheckState> {
        self.state.subscribe()
    }

    /// Waits for the pending probe (if any) to finish and returns the final
    /// status for the latest candidate.
    pub async fn settle(&mut self) -> Option<PathStatus> {
        if let Some(pending) = self.pending.take() {
            // A JoinError here means the task was aborted or panicked;
            // either way the published state is what we report
            if let Err(e) = pending.await {
                debug!(error = %e, "path probe task ended early");
            }
        }
        self.status()
    }
}

impl Drop for PathChecker {
    fn drop(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.abort();
        }
    }
}

// Writes `status` only if no newer input has arrived since `generation`.
// Returns false when the result is stale.
fn publish(state: &watch::Sender<CheckState>, generation: u64, status: Option<PathStatus>) -> bool {
    state.send_if_modified(|current| {
        if current.generation != generation {
            return false;
        }
        current.status = status;
        true
    })
}
