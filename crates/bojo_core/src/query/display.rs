//! Display lists and display-number resolution.
//!
//! # Invariants
//! - Positions are 1-based and follow entry order.
//! - A list is explicit context: callers pass it from the listing step to the
//!   resolving step.

use crate::model::item::{Item, ItemId};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Display number was outside the last shown list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeError {
    pub requested: usize,
    pub len: usize,
}

impl Display for RangeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.len == 0 {
            write!(f, "item number {} is out of range; no items listed", self.requested)
        } else {
            write!(
                f,
                "item number {} is out of range; expected 1..={}",
                self.requested, self.len
            )
        }
    }
}

impl Error for RangeError {}

/// Maps a 1-based display number to the id shown at that position.
pub fn resolve_display_number(ids: &[ItemId], n: usize) -> Result<ItemId, RangeError> {
    n.checked_sub(1)
        .and_then(|index| ids.get(index))
        .copied()
        .ok_or(RangeError {
            requested: n,
            len: ids.len(),
        })
}

/// One rendered row. `depth > 0` marks a sub-item shown under its parent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayEntry {
    pub item: Item,
    pub depth: usize,
}

/// A titled list as shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayList {
    pub title: String,
    pub entries: Vec<DisplayEntry>,
}

impl DisplayList {
    /// Flat list, every entry at depth 0.
    pub fn flat(title: impl Into<String>, items: Vec<Item>) -> Self {
        Self {
            title: title.into(),
            entries: items
                .into_iter()
                .map(|item| DisplayEntry { item, depth: 0 })
                .collect(),
        }
    }

    /// List with pre-computed depths, e.g. from `views::with_children`.
    pub fn nested(title: impl Into<String>, rows: Vec<(Item, usize)>) -> Self {
        Self {
            title: title.into(),
            entries: rows
                .into_iter()
                .map(|(item, depth)| DisplayEntry { item, depth })
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn item_ids(&self) -> Vec<ItemId> {
        self.entries.iter().map(|entry| entry.item.id).collect()
    }

    pub fn resolve(&self, n: usize) -> Result<ItemId, RangeError> {
        resolve_display_number(&self.item_ids(), n)
    }

    pub fn snapshot(&self) -> DisplaySnapshot {
        DisplaySnapshot {
            title: self.title.clone(),
            item_ids: self.item_ids(),
        }
    }
}

/// Persistable form of a display list: title plus ids in position order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisplaySnapshot {
    pub title: String,
    pub item_ids: Vec<ItemId>,
}

impl DisplaySnapshot {
    pub fn resolve(&self, n: usize) -> Result<ItemId, RangeError> {
        resolve_display_number(&self.item_ids, n)
    }
}
