// src/platform/mod.rs
// =============================================================================
// Everything that can be said about a link by looking at its URL alone.
//
// Submodules:
// - detect: classifies a URL into a Platform (telegram, instagram, ...)
// - normalize: turns what the user typed into something a browser can open
//
// Both are pure, total functions: they never fail and never touch the network.
// =============================================================================

mod detect;
mod normalize;

pub use detect::{detect, Platform};
pub use normalize::{is_bare_phone, normalize_url};
