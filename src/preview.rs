// src/preview.rs
// =============================================================================
// Renders a business page the way a visitor would see it, as plain text.
//
// Two sources:
// - The editor's in-memory state (unsaved edits included). A brand new
//   business with nothing filled in shows sample content instead of a blank
//   page, so the owner can see what they are building.
// - A Profile fetched from the public endpoint (the landing page itself)
//
// Each link's platform is re-derived from its URL at render time, never taken
// from a stored tag.
// =============================================================================

use std::fmt::Write as _;

use crate::api::{LogoChange, Profile};
use crate::editor::LinkEntry;
use crate::platform::{detect, Platform};
use crate::session::Theme;

const SAMPLE_NAME: &str = "My business";
const SAMPLE_DESCRIPTION: &str = "Your business description goes here";
const SAMPLE_LINKS: [(&str, &str); 2] = [
    ("Telegram channel", "https://t.me/example"),
    ("Instagram page", "https://instagram.com/example"),
];
const PLACEHOLDER_NAME: &str = "Business name";
const WIDTH: usize = 48;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogoPreview {
    /// Logo already on the server
    Url(String),
    /// A file picked locally, not uploaded yet
    Pending(String),
    /// No logo: show the first letter of the name
    Initial(char),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewLink {
    pub title: String,
    pub url: String,
    pub platform: Platform,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preview {
    pub name: String,
    pub description: String,
    pub logo: LogoPreview,
    pub links: Vec<PreviewLink>,
}

/// The editor state a preview is built from.
pub struct DraftView<'a> {
    pub is_new: bool,
    pub name: &'a str,
    pub description: &'a str,
    pub logo: Option<&'a str>,
    pub pending_logo: Option<&'a LogoChange>,
    pub links: &'a [LinkEntry],
}

impl Preview {
    pub fn from_draft(draft: &DraftView<'_>) -> Self {
        let name = match (draft.name.trim().is_empty(), draft.is_new) {
            (false, _) => draft.name.to_string(),
            (true, true) => SAMPLE_NAME.to_string(),
            (true, false) => PLACEHOLDER_NAME.to_string(),
        };

        let description = if draft.description.trim().is_empty() && draft.is_new {
            SAMPLE_DESCRIPTION.to_string()
        } else {
            draft.description.to_string()
        };

        let links = if draft.links.is_empty() && draft.is_new {
            SAMPLE_LINKS
                .iter()
                .map(|(title, url)| preview_link(title, url))
                .collect()
        } else {
            draft
                .links
                .iter()
                .map(|entry| preview_link(&entry.title, &entry.url))
                .collect()
        };

        // A pending change wins over what the server has
        let logo = match draft.pending_logo {
            Some(LogoChange::Upload(file)) => LogoPreview::Pending(file.file_name.clone()),
            Some(LogoChange::Remove) => LogoPreview::Initial(initial(&name)),
            None => match draft.logo {
                Some(url) => LogoPreview::Url(url.to_string()),
                None => LogoPreview::Initial(initial(&name)),
            },
        };

        Preview {
            name,
            description,
            logo,
            links,
        }
    }

    pub fn from_profile(profile: &Profile) -> Self {
        let mut records: Vec<_> = profile.links.iter().collect();
        records.sort_by_key(|record| record.order);

        Preview {
            name: profile.name.clone(),
            description: profile.description.clone(),
            logo: match &profile.logo {
                Some(url) => LogoPreview::Url(url.clone()),
                None => LogoPreview::Initial(initial(&profile.name)),
            },
            links: records
                .into_iter()
                .map(|record| preview_link(&record.title, &record.url))
                .collect(),
        }
    }

    /// Draws the page inside a frame. The dark theme uses heavy rules.
    pub fn render(&self, theme: Theme) -> String {
        let rule = match theme {
            Theme::Light => "─",
            Theme::Dark => "━",
        }
        .repeat(WIDTH);

        let mut out = String::new();
        // Writing into a String cannot fail
        let _ = writeln!(out, "{}", rule);

        let logo = match &self.logo {
            LogoPreview::Url(url) => format!("[logo] {}", url),
            LogoPreview::Pending(file) => format!("[logo] {} (not uploaded yet)", file),
            LogoPreview::Initial(letter) => format!("( {} )", letter),
        };
        let _ = writeln!(out, "  {}", logo);
        let _ = writeln!(out, "  {}", self.name);
        if !self.description.is_empty() {
            let _ = writeln!(out, "  {}", self.description);
        }
        let _ = writeln!(out);

        if self.links.is_empty() {
            let _ = writeln!(out, "  (no links yet)");
        }
        for link in &self.links {
            let title = if link.title.is_empty() { &link.url } else { &link.title };
            let _ = writeln!(out, "  [{:<11}] {}  ->  {}", link.platform.label(), title, link.url);
        }

        let _ = writeln!(out);
        let _ = writeln!(out, "  Powered by MyLink");
        let _ = writeln!(out, "{}", rule);
        out
    }
}

fn preview_link(title: &str, url: &str) -> PreviewLink {
    PreviewLink {
        title: title.to_string(),
        url: url.to_string(),
        platform: detect(url),
    }
}

fn initial(name: &str) -> char {
    name.trim()
        .chars()
        .next()
        .and_then(|c| c.to_uppercase().next())
        .unwrap_or('?')
}
