//! Journal use-case service.
//!
//! # Responsibility
//! - Provide the add/mark/delete/list entry points used by the CLI.
//! - Thread the last display list from listing calls into reference
//!   resolution through the display store.
//!
//! # Invariants
//! - Every list call replaces the stored display snapshot.
//! - Display numbers resolve against the stored snapshot only.
//! - Service layer remains storage-agnostic.

use crate::model::item::{Item, ItemId, NewItem};
use crate::model::marker::{ItemState, Marker, Signifier};
use crate::query::display::DisplayList;
use crate::query::views;
use crate::repo::display_repo::DisplayStore;
use crate::repo::item_repo::{now_epoch_ms, ExportedItem, ItemStore};
use crate::service::error::{JournalError, JournalResult};
use crate::service::schedule::TimeResolver;
use log::info;

/// How the user addressed an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemRef {
    /// 1-based position in the last shown list.
    Display(usize),
    /// Raw stable id.
    Id(ItemId),
}

/// Caller input for creating an item. Markers are already parsed; the
/// schedule is still free text for the injected resolver.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddItem {
    pub description: String,
    pub state: ItemState,
    pub signifier: Option<Signifier>,
    pub parent: Option<ItemRef>,
    pub when: Option<String>,
}

/// Named list views offered by `list`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListView {
    /// Last `n` items in creation order.
    Recent,
    /// Newest first, optionally filtered by marker.
    All(Marker),
    /// Scheduled, not complete, from now on, optionally filtered by marker.
    Upcoming(Marker),
    Priority,
    Completed,
}

/// Use-case facade over an item store, a display store and a time resolver.
pub struct JournalService<S, D, T> {
    items: S,
    display: D,
    resolver: T,
    clock: fn() -> i64,
}

impl<S, D, T> JournalService<S, D, T>
where
    S: ItemStore,
    D: DisplayStore,
    T: TimeResolver,
{
    pub fn new(items: S, display: D, resolver: T) -> Self {
        Self {
            items,
            display,
            resolver,
            clock: now_epoch_ms,
        }
    }

    /// Replaces the wall clock used for "now".
    pub fn with_clock(mut self, clock: fn() -> i64) -> Self {
        self.clock = clock;
        self
    }

    /// Resolves references and free-text time into a creation request.
    ///
    /// Nothing is written; callers use this to echo the item before
    /// confirming.
    pub fn prepare_add(&self, input: &AddItem) -> JournalResult<NewItem> {
        let parent_id = input.parent.map(|parent| self.resolve(parent)).transpose()?;
        let scheduled_at = match input.when.as_deref().map(str::trim) {
            Some(text) if !text.is_empty() => Some(self.resolver.resolve(text, (self.clock)())?),
            _ => None,
        };

        let item = NewItem::new(input.description.clone())
            .with_state(input.state)
            .with_signifier(input.signifier)
            .with_parent(parent_id)
            .with_schedule(scheduled_at);
        item.validate()
            .map_err(|err| JournalError::Validation(err.to_string()))?;
        Ok(item)
    }

    /// Persists a prepared item.
    pub fn create(&self, item: &NewItem) -> JournalResult<Item> {
        Ok(self.items.create(item)?)
    }

    pub fn add(&self, input: &AddItem) -> JournalResult<Item> {
        let item = self.prepare_add(input)?;
        self.create(&item)
    }

    /// Maps a user reference to an item id without checking existence.
    pub fn resolve(&self, item_ref: ItemRef) -> JournalResult<ItemId> {
        match item_ref {
            ItemRef::Id(id) => Ok(id),
            ItemRef::Display(n) => Ok(self.display.load()?.resolve(n)?),
        }
    }

    /// Loads one referenced item.
    pub fn get(&self, item_ref: ItemRef) -> JournalResult<Item> {
        let id = self.resolve(item_ref)?;
        self.items.get(id)?.ok_or(JournalError::NotFound(id))
    }

    /// Applies a state, a signifier, or clears the signifier.
    pub fn mark(&self, item_ref: ItemRef, marker: Marker) -> JournalResult<Item> {
        let id = self.resolve(item_ref)?;
        let item = match marker {
            Marker::State(state) => self.items.set_state(id, state)?,
            Marker::Signifier(signifier) => self.items.set_signifier(id, Some(signifier))?,
            Marker::Clear => self.items.set_signifier(id, None)?,
        };
        Ok(item)
    }

    /// Marks several items, checking every reference before changing any.
    pub fn mark_all(&self, refs: &[ItemRef], marker: Marker) -> JournalResult<Vec<Item>> {
        let targets = refs
            .iter()
            .map(|item_ref| self.get(*item_ref))
            .collect::<JournalResult<Vec<_>>>()?;
        let marked = targets
            .iter()
            .map(|item| self.mark(ItemRef::Id(item.id), marker))
            .collect::<JournalResult<Vec<_>>>()?;
        info!(
            "event=items_marked module=service status=ok count={}",
            marked.len()
        );
        Ok(marked)
    }

    pub fn delete(&self, item_ref: ItemRef) -> JournalResult<Item> {
        let id = self.resolve(item_ref)?;
        Ok(self.items.delete(id)?)
    }

    /// Items `complete_past` would change, for confirmation prompts.
    pub fn past_incomplete(&self) -> JournalResult<Vec<Item>> {
        let now = (self.clock)();
        Ok(self
            .items
            .list_all()?
            .into_iter()
            .filter(|item| !item.is_complete())
            .filter(|item| item.scheduled_at.is_some_and(|at| at < now))
            .collect())
    }

    pub fn complete_past(&self) -> JournalResult<Vec<Item>> {
        Ok(self.items.complete_past((self.clock)())?)
    }

    /// Builds a list view, stores it as the current display context and
    /// returns it.
    pub fn list(&self, view: ListView, n: usize) -> JournalResult<DisplayList> {
        let all = self.items.list_all()?;
        let list = match view {
            ListView::Recent => DisplayList::flat("Recent items", views::recent(&all, n)),
            ListView::All(marker) => {
                let filtered = views::filter_marker(&all, marker);
                DisplayList::flat(
                    title_for("All", marker, "items"),
                    views::newest_first(&filtered, n),
                )
            }
            ListView::Upcoming(marker) => {
                let now = (self.clock)();
                let mut selected = views::filter_marker(&views::upcoming(&all, now), marker);
                selected.truncate(n);
                DisplayList::nested(
                    title_for("Upcoming", marker, "items"),
                    views::with_children(&all, &selected, |child| {
                        !child.is_complete() && child.scheduled_at.is_some_and(|at| at >= now)
                    }),
                )
            }
            ListView::Priority => DisplayList::nested(
                "Priority items",
                views::with_children(&all, &views::priority(&all, n), |child| {
                    !child.is_complete()
                }),
            ),
            ListView::Completed => DisplayList::flat("Completed items", views::completed(&all, n)),
        };
        self.remember(&list)?;
        Ok(list)
    }

    /// Substring search, stored as the current display context.
    pub fn search(&self, text: &str, include_complete: bool) -> JournalResult<DisplayList> {
        let all = self.items.list_all()?;
        let list = DisplayList::flat(
            "Matching items",
            views::search(&all, text, include_complete),
        );
        self.remember(&list)?;
        Ok(list)
    }

    /// Serializes every item, in creation order, as pretty JSON.
    pub fn export_json(&self) -> JournalResult<String> {
        let exported: Vec<ExportedItem> =
            self.items.list_all()?.iter().map(ExportedItem::from).collect();
        serde_json::to_string_pretty(&exported)
            .map_err(|err| JournalError::Validation(format!("cannot encode export: {err}")))
    }

    /// Imports items produced by `export_json` as new items.
    pub fn import_json(&self, text: &str) -> JournalResult<Vec<Item>> {
        let parsed: Vec<ExportedItem> = serde_json::from_str(text)
            .map_err(|err| JournalError::Validation(format!("invalid import data: {err}")))?;
        Ok(self.items.import(&parsed)?)
    }

    fn remember(&self, list: &DisplayList) -> JournalResult<()> {
        self.display.save(&list.snapshot())?;
        info!(
            "event=display_saved module=service status=ok rows={}",
            list.len()
        );
        Ok(())
    }
}

fn title_for(prefix: &str, marker: Marker, fallback: &str) -> String {
    match marker {
        Marker::State(state) => format!("{prefix} {}", state.name()),
        Marker::Signifier(signifier) => format!("{prefix} {}", signifier.name()),
        Marker::Clear => format!("{prefix} {fallback}"),
    }
}
