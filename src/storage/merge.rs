//! Merge policy for records that share a link

use crate::storage::PageRecord;
use serde::Deserialize;

/// How scalar fields (`title`, `description`) behave when records merge
///
/// Child references always concatenate; only scalars are governed here.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScalarMerge {
    /// Scalars of the existing record never change
    Preserve,
    /// Absent scalars of the existing record are filled from the incoming one
    #[default]
    FillEmpty,
}

/// Merges `incoming` into `existing`
///
/// `existing.pages` is extended with `incoming.pages` in order, without
/// de-duplication. Non-empty scalars already present are never replaced.
pub fn merge_records(existing: &mut PageRecord, incoming: PageRecord, policy: ScalarMerge) {
    debug_assert_eq!(existing.link, incoming.link);

    existing.pages.extend(incoming.pages);

    if policy == ScalarMerge::FillEmpty {
        if existing.title.is_none() {
            existing.title = incoming.title;
        }
        if existing.description.is_none() {
            existing.description = incoming.description;
        }
    }
}
