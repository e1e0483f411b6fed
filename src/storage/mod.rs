//! Storage module for the page index
//!
//! This module owns the uniform page record shape produced by every source
//! adapter, the policy for merging two records that share a link, and the
//! JSON file store that persists the index between runs.

mod json;
mod merge;
mod traits;

pub use json::JsonIndexStore;
pub use merge::{merge_records, ScalarMerge};
pub use traits::{IndexStore, StorageError, StorageResult, UpsertOutcome};

use serde::{Deserialize, Deserializer, Serialize};

/// A single indexed page
///
/// A leaf record carries its own title and description; a container record
/// (a repository root) carries child references in `pages` instead. The
/// `link` is the identity key of the index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRecord {
    pub link: String,

    #[serde(
        default,
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub title: Option<String>,

    #[serde(
        default,
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pages: Vec<ChildPage>,
}

/// A reference from a container record to one of its children
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChildPage {
    pub link: String,

    #[serde(
        default,
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub title: Option<String>,
}

impl PageRecord {
    /// Creates a leaf record; empty title or description become absent
    pub fn leaf(
        link: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            link: link.into(),
            title: non_empty(title.into()),
            description: non_empty(description.into()),
            pages: Vec::new(),
        }
    }

    /// Creates a container record with no title or description of its own
    pub fn container(link: impl Into<String>, pages: Vec<ChildPage>) -> Self {
        Self {
            link: link.into(),
            title: None,
            description: None,
            pages,
        }
    }

    /// Title, or `""` when absent
    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or_default()
    }

    /// Description, or `""` when absent
    pub fn description(&self) -> &str {
        self.description.as_deref().unwrap_or_default()
    }

    pub fn is_container(&self) -> bool {
        !self.pages.is_empty()
    }
}

impl ChildPage {
    pub fn new(link: impl Into<String>) -> Self {
        Self {
            link: link.into(),
            title: None,
        }
    }

    pub fn with_title(link: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            link: link.into(),
            title: non_empty(title.into()),
        }
    }
}

/// Maps an empty string to `None`
pub(crate) fn non_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.and_then(non_empty))
}
