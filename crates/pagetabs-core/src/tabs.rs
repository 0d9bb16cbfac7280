//! Tab entries shown in the tab row
//!
//! The tab set is fixed for the lifetime of a screen. It is built from
//! configuration and handed to the screen, never held globally.

use std::collections::HashSet;
use std::fmt;

use url::Url;

use crate::config::TabConfig;
use crate::{Error, Result};

/// Unique identity of a tab
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TabKey(String);

impl TabKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TabKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single tab: label in the tab row plus the image on its page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabEntry {
    pub key: TabKey,
    pub title: String,
    pub image: Url,
}

impl TabEntry {
    /// Label as drawn in the tab row
    pub fn label(&self) -> String {
        self.title.to_uppercase()
    }
}

/// Ordered, non-empty set of tabs with unique keys
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabSet {
    entries: Vec<TabEntry>,
}

impl TabSet {
    /// Build a tab set, rejecting empty sets and duplicate keys
    pub fn new(entries: Vec<TabEntry>) -> Result<Self> {
        if entries.is_empty() {
            return Err(Error::EmptyTabSet);
        }

        let mut seen = HashSet::new();
        for entry in &entries {
            if !seen.insert(&entry.key) {
                return Err(Error::DuplicateTab(entry.key.to_string()));
            }
        }

        Ok(Self { entries })
    }

    /// Build a tab set from the `[[tabs]]` configuration section
    pub fn from_config(tabs: &[TabConfig]) -> Result<Self> {
        let entries = tabs
            .iter()
            .map(|tab| {
                Ok(TabEntry {
                    key: TabKey::new(tab.key.clone()),
                    title: tab.title.clone().unwrap_or_else(|| tab.key.clone()),
                    image: Url::parse(&tab.image)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Self::new(entries)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&TabEntry> {
        self.entries.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TabEntry> {
        self.entries.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &TabKey> {
        self.entries.iter().map(|entry| &entry.key)
    }

    /// Position of a tab in display order
    pub fn index_of(&self, key: &TabKey) -> Option<usize> {
        self.entries.iter().position(|entry| &entry.key == key)
    }
}

impl<'a> IntoIterator for &'a TabSet {
    type Item = &'a TabEntry;
    type IntoIter = std::slice::Iter<'a, TabEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
