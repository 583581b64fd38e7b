// src/editor/links.rs
// =============================================================================
// The ordered list of links being edited.
//
// Invariants this type keeps:
// - The Vec order IS the display order and the saved order. `order` only
//   exists in the payload, computed from the index at save time.
// - `icon_type` always matches the current URL: it is recomputed on every URL
//   edit, and again at save time after normalization.
// - Every entry has an identity that is never handed out twice, so a UI can
//   track an entry across reorders.
// - Out-of-range positions are ignored instead of panicking. Positions come
//   from UI events that may be stale.
//
// Rust concepts:
// - Vec::remove + Vec::insert: reordering without cloning entries
// - let-else: early return on an out-of-range position
// =============================================================================

use std::fmt;

use crate::api::{LinkPayload, LinkRecord};
use crate::platform::{detect, normalize_url, Platform};

/// Identity of a link entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkId {
    /// Assigned by the server
    Saved(u64),
    /// Placeholder for an entry that has not been saved yet
    Draft(u64),
}

impl fmt::Display for LinkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkId::Saved(id) => write!(f, "#{}", id),
            LinkId::Draft(id) => write!(f, "new-{}", id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkEntry {
    pub id: LinkId,
    pub title: String,
    pub url: String,
    pub icon_type: Platform,
}

/// The user-editable fields of a link. `icon_type` is not one of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkField {
    Title,
    Url,
}

#[derive(Debug, Clone, Default)]
pub struct LinkCollection {
    entries: Vec<LinkEntry>,
    // Only ever goes up, so draft ids are never reused, even across load()
    next_draft: u64,
}

impl LinkCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the list with what the server has, in the server's order.
    pub fn load(&mut self, records: &[LinkRecord]) {
        let mut records: Vec<&LinkRecord> = records.iter().collect();
        // Stable sort: ties keep the order the server listed them in
        records.sort_by_key(|record| record.order);

        let entries: Vec<LinkEntry> = records
            .into_iter()
            .map(|record| {
                let id = match record.id {
                    Some(id) => LinkId::Saved(id),
                    None => self.fresh_id(),
                };
                LinkEntry {
                    id,
                    title: record.title.clone(),
                    url: record.url.clone(),
                    icon_type: detect(&record.url),
                }
            })
            .collect();
        self.entries = entries;
    }

    pub fn entries(&self) -> &[LinkEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Adds an empty link at the end and returns its identity.
    pub fn append(&mut self) -> LinkId {
        let id = self.fresh_id();
        self.entries.push(LinkEntry {
            id,
            title: String::new(),
            url: String::new(),
            icon_type: Platform::Website,
        });
        id
    }

    /// Deletes the link at `position`. Out of range: nothing happens.
    pub fn remove_at(&mut self, position: usize) -> Option<LinkEntry> {
        if position < self.entries.len() {
            Some(self.entries.remove(position))
        } else {
            None
        }
    }

    /// Sets one field of the link at `position`.
    ///
    /// Editing the URL re-detects the platform from the raw value, so it has
    /// to cope with what people actually type ("instagram.com/shop", no
    /// scheme). Returns false if `position` is out of range.
    pub fn update_field(&mut self, position: usize, field: LinkField, value: &str) -> bool {
        let Some(entry) = self.entries.get_mut(position) else {
            return false;
        };

        match field {
            LinkField::Title => entry.title = value.to_string(),
            LinkField::Url => {
                entry.url = value.to_string();
                entry.icon_type = detect(value);
            }
        }
        true
    }

    /// Moves the link at `from` so that it ends up at `to`, shifting the ones
    /// in between. Out of range or `from == to`: nothing happens.
    pub fn reorder(&mut self, from: usize, to: usize) -> bool {
        let len = self.entries.len();
        if from == to || from >= len || to >= len {
            return false;
        }

        let entry = self.entries.remove(from);
        self.entries.insert(to, entry);
        true
    }

    /// The save-time view of the list.
    ///
    /// Returns: one payload per entry with a non-blank URL, in list order,
    /// with the URL normalized, the platform re-detected from it and `order`
    /// numbered from 0.
    pub fn to_payload(&self) -> Vec<LinkPayload> {
        self.entries
            .iter()
            .filter(|entry| !entry.url.trim().is_empty())
            .enumerate()
            .map(|(index, entry)| {
                let url = normalize_url(&entry.url);
                LinkPayload {
                    title: entry.title.clone(),
                    icon_type: detect(&url),
                    url,
                    order: index as u32,
                }
            })
            .collect()
    }

    fn fresh_id(&mut self) -> LinkId {
        self.next_draft += 1;
        LinkId::Draft(self.next_draft)
    }
}
