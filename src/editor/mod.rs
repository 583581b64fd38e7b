// src/editor/mod.rs
// =============================================================================
// The business editor: the state behind the "edit" screen and the logic that
// keeps it in line with the server.
//
// Submodules:
// - links: the ordered, reorderable link list
// - path_check: debounced "is this path free?" probing
// - save: the create/replace + logo request sequence
// - form: BusinessEditor, which ties the three together
// =============================================================================

mod form;
mod links;
mod path_check;
mod save;

pub use form::{BusinessEditor, EditMode};
pub use links::{LinkCollection, LinkEntry, LinkField, LinkId};
pub use path_check::{CheckState, PathChecker, PathStatus, DEFAULT_DEBOUNCE, MIN_CANDIDATE_LEN};
pub use save::{SaveError, SaveOrchestrator, SaveRequest, SaveTarget};
