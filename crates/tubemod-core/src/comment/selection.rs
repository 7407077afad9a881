//! Selection bookkeeping for batch moderation

use crate::types::CommentId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Comment identifiers currently marked for a batch action.
///
/// Selections are deliberately kept across page changes: an operator may
/// select on one page, paginate, and submit. Entries are only dropped by an
/// explicit clear, a classifier replacement, or a successful moderation
/// command for those identifiers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SelectionSet {
    ids: BTreeSet<CommentId>,
}

impl SelectionSet {
    /// Create an empty selection
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `id` when `checked`, remove it otherwise. Returns true if the set changed.
    pub fn toggle(&mut self, id: CommentId, checked: bool) -> bool {
        if checked {
            self.ids.insert(id)
        } else {
            self.ids.remove(&id)
        }
    }

    /// Discard the current selection and select exactly `ids`
    pub fn replace_all(&mut self, ids: impl IntoIterator<Item = CommentId>) {
        self.ids = ids.into_iter().collect();
    }

    /// Add every id, keeping existing members
    pub fn extend(&mut self, ids: impl IntoIterator<Item = CommentId>) {
        self.ids.extend(ids);
    }

    /// Empty the selection
    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Drop the given ids, leaving other selections in place. Returns how many were removed.
    pub fn remove_many<'a>(&mut self, ids: impl IntoIterator<Item = &'a CommentId>) -> usize {
        ids.into_iter().filter(|id| self.ids.remove(*id)).count()
    }

    /// Membership query
    pub fn contains(&self, id: &CommentId) -> bool {
        self.ids.contains(id)
    }

    /// Number of selected comments
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether nothing is selected
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Selected ids in sorted order
    pub fn ids(&self) -> Vec<CommentId> {
        self.ids.iter().cloned().collect()
    }

    /// Iterate over selected ids in sorted order
    pub fn iter(&self) -> impl Iterator<Item = &CommentId> {
        self.ids.iter()
    }
}

impl FromIterator<CommentId> for SelectionSet {
    fn from_iter<I: IntoIterator<Item = CommentId>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().collect(),
        }
    }
}
