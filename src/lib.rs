// src/lib.rs
// =============================================================================
// mylink: editor core for link-in-bio business pages.
//
// Modules:
// - platform: URL -> platform detection and URL normalization (pure)
// - api: the BusinessApi trait, its reqwest implementation, wire types
// - editor: link list, debounced path check, save sequence, BusinessEditor
// - preview: text rendering of a page, from edits or from the public API
// - session: persisted auth token and theme
// - auth: phone number handling for the SMS login
// =============================================================================

pub mod api;
pub mod auth;
pub mod editor;
pub mod platform;
pub mod preview;
pub mod session;

#[cfg(test)]
mod testing;
