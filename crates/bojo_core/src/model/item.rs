//! Item domain model.
//!
//! # Responsibility
//! - Define the canonical journal entry record.
//! - Validate caller-supplied fields before persistence.
//!
//! # Invariants
//! - `id` is assigned by storage, starts at 1 and is never reused.
//! - `created_at` never changes after creation.
//! - `description` is never blank.

use crate::model::marker::{ItemState, Signifier};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Stable item identifier allocated by the item store.
pub type ItemId = i64;

/// One journal entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub description: String,
    pub state: ItemState,
    pub signifier: Option<Signifier>,
    /// Containing item. `None` means top-level.
    pub parent_id: Option<ItemId>,
    /// Unix epoch milliseconds. `None` means unscheduled.
    pub scheduled_at: Option<i64>,
    /// Unix epoch milliseconds.
    pub created_at: i64,
    /// Unix epoch milliseconds of the last mutation.
    pub updated_at: i64,
}

impl Item {
    pub fn is_complete(&self) -> bool {
        self.state == ItemState::Complete
    }

    pub fn is_scheduled(&self) -> bool {
        self.scheduled_at.is_some()
    }
}

/// Creation request for the item store. Storage assigns id and timestamps.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewItem {
    pub description: String,
    pub state: ItemState,
    pub signifier: Option<Signifier>,
    pub parent_id: Option<ItemId>,
    pub scheduled_at: Option<i64>,
}

impl NewItem {
    /// Unmarked, unscheduled top-level item.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            ..Self::default()
        }
    }

    pub fn with_state(mut self, state: ItemState) -> Self {
        self.state = state;
        self
    }

    pub fn with_signifier(mut self, signifier: Option<Signifier>) -> Self {
        self.signifier = signifier;
        self
    }

    pub fn with_parent(mut self, parent_id: Option<ItemId>) -> Self {
        self.parent_id = parent_id;
        self
    }

    pub fn with_schedule(mut self, scheduled_at: Option<i64>) -> Self {
        self.scheduled_at = scheduled_at;
        self
    }

    /// Checks field-level invariants that do not need storage access.
    pub fn validate(&self) -> Result<(), ItemValidationError> {
        if self.description.trim().is_empty() {
            return Err(ItemValidationError::EmptyDescription);
        }
        if let Some(parent_id) = self.parent_id {
            if parent_id < 1 {
                return Err(ItemValidationError::UnknownParent(parent_id));
            }
        }
        Ok(())
    }
}

/// Field-level validation failures for item writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemValidationError {
    EmptyDescription,
    /// Parent reference does not point at a stored item.
    UnknownParent(ItemId),
}

impl Display for ItemValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyDescription => write!(f, "item description cannot be empty"),
            Self::UnknownParent(id) => write!(f, "parent item {id} does not exist"),
        }
    }
}

impl Error for ItemValidationError {}

#[cfg(test)]
mod tests {
    use super::{ItemValidationError, NewItem};
    use crate::model::marker::ItemState;

    #[test]
    fn new_item_defaults_to_unmarked_top_level() {
        let item = NewItem::new("water plants");
        assert_eq!(item.state, ItemState::Incomplete);
        assert!(item.signifier.is_none());
        assert!(item.parent_id.is_none());
        assert!(item.scheduled_at.is_none());
    }

    #[test]
    fn validate_rejects_blank_description() {
        let err = NewItem::new("   ").validate().expect_err("blank must fail");
        assert_eq!(err, ItemValidationError::EmptyDescription);
    }

    #[test]
    fn validate_rejects_non_positive_parent() {
        let err = NewItem::new("child")
            .with_parent(Some(0))
            .validate()
            .expect_err("id 0 is never allocated");
        assert_eq!(err, ItemValidationError::UnknownParent(0));
    }
}
