//! State and signifier vocabularies.
//!
//! # Responsibility
//! - Own the fixed glyph tables for item states and signifiers.
//! - Parse user text into markers without touching storage.
//!
//! # Invariants
//! - Each glyph maps to exactly one variant and back.
//! - Parsing is case-insensitive and whitespace-tolerant.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Literal accepted wherever "no signifier" or "no filter" is meant.
pub const NONE_LITERAL: &str = "none";
/// Literal accepted as "no filter" by list views.
pub const ALL_LITERAL: &str = "all";

/// Completion/disposition marker of an item.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemState {
    /// Unmarked default.
    #[default]
    Incomplete,
    Complete,
    Migrated,
    Scheduled,
    Irrelevant,
    Note,
    Event,
}

impl ItemState {
    /// Glyph table order, also used for the legend.
    pub const ALL: [ItemState; 7] = [
        ItemState::Incomplete,
        ItemState::Complete,
        ItemState::Migrated,
        ItemState::Scheduled,
        ItemState::Irrelevant,
        ItemState::Note,
        ItemState::Event,
    ];

    pub fn glyph(self) -> char {
        match self {
            Self::Incomplete => '.',
            Self::Complete => 'x',
            Self::Migrated => '<',
            Self::Scheduled => '>',
            Self::Irrelevant => 'i',
            Self::Note => '-',
            Self::Event => 'o',
        }
    }

    pub fn from_glyph(glyph: char) -> Option<Self> {
        Self::ALL.into_iter().find(|state| state.glyph() == glyph)
    }

    /// Stable lowercase name, also the persisted value.
    pub fn name(self) -> &'static str {
        match self {
            Self::Incomplete => "incomplete",
            Self::Complete => "complete",
            Self::Migrated => "migrated",
            Self::Scheduled => "scheduled",
            Self::Irrelevant => "irrelevant",
            Self::Note => "note",
            Self::Event => "event",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|state| state.name() == name)
    }
}

impl Display for ItemState {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Type tag of an item, orthogonal to its state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Signifier {
    Priority,
    Inspiration,
}

impl Signifier {
    pub const ALL: [Signifier; 2] = [Signifier::Priority, Signifier::Inspiration];

    pub fn glyph(self) -> char {
        match self {
            Self::Priority => '*',
            Self::Inspiration => '!',
        }
    }

    pub fn from_glyph(glyph: char) -> Option<Self> {
        Self::ALL.into_iter().find(|signifier| signifier.glyph() == glyph)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Priority => "priority",
            Self::Inspiration => "inspiration",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|signifier| signifier.name() == name)
    }
}

impl Display for Signifier {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Either axis of an item, or an explicit clear.
///
/// Used by `mark` (what to change) and by list filters (what to keep).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    State(ItemState),
    Signifier(Signifier),
    /// `none`/`all`: clears the signifier when marking, disables filtering
    /// when listing.
    Clear,
}

/// Input text did not name a known state, signifier or marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerParseError {
    pub kind: &'static str,
    pub input: String,
    pub options: String,
}

impl Display for MarkerParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid {} `{}`; options are: {}",
            self.kind, self.input, self.options
        )
    }
}

impl Error for MarkerParseError {}

/// Parses a state from its glyph or full name.
pub fn parse_state(text: &str) -> Result<ItemState, MarkerParseError> {
    let normalized = normalize(text);
    single_glyph(&normalized)
        .and_then(ItemState::from_glyph)
        .or_else(|| ItemState::from_name(&normalized))
        .ok_or_else(|| MarkerParseError {
            kind: "state",
            input: normalized,
            options: state_options(),
        })
}

/// Parses an optional signifier; `none` yields `Ok(None)`.
pub fn parse_signifier(text: &str) -> Result<Option<Signifier>, MarkerParseError> {
    let normalized = normalize(text);
    if normalized == NONE_LITERAL {
        return Ok(None);
    }
    single_glyph(&normalized)
        .and_then(Signifier::from_glyph)
        .or_else(|| Signifier::from_name(&normalized))
        .map(Some)
        .ok_or_else(|| MarkerParseError {
            kind: "signifier",
            input: normalized,
            options: signifier_options(),
        })
}

/// Parses a state or signifier, accepting unique prefixes of three or more
/// characters. States win over signifiers on ambiguous prefixes.
pub fn parse_marker(text: &str) -> Result<Marker, MarkerParseError> {
    let normalized = normalize(text);
    if normalized == NONE_LITERAL || normalized == ALL_LITERAL {
        return Ok(Marker::Clear);
    }

    if let Some(glyph) = single_glyph(&normalized) {
        if let Some(state) = ItemState::from_glyph(glyph) {
            return Ok(Marker::State(state));
        }
        if let Some(signifier) = Signifier::from_glyph(glyph) {
            return Ok(Marker::Signifier(signifier));
        }
    }
    if let Some(state) = ItemState::from_name(&normalized) {
        return Ok(Marker::State(state));
    }
    if let Some(signifier) = Signifier::from_name(&normalized) {
        return Ok(Marker::Signifier(signifier));
    }

    if normalized.chars().count() >= 3 {
        if let Some(state) = ItemState::ALL
            .into_iter()
            .find(|state| state.name().starts_with(normalized.as_str()))
        {
            return Ok(Marker::State(state));
        }
        if let Some(signifier) = Signifier::ALL
            .into_iter()
            .find(|signifier| signifier.name().starts_with(normalized.as_str()))
        {
            return Ok(Marker::Signifier(signifier));
        }
    }

    Err(MarkerParseError {
        kind: "marker",
        input: normalized,
        options: format!("{}, {}, {NONE_LITERAL}", state_options(), signifier_options()),
    })
}

fn normalize(text: &str) -> String {
    text.trim().to_lowercase().replace('\n', " ")
}

fn single_glyph(text: &str) -> Option<char> {
    let mut chars = text.chars();
    match (chars.next(), chars.next()) {
        (Some(glyph), None) => Some(glyph),
        _ => None,
    }
}

fn state_options() -> String {
    ItemState::ALL
        .iter()
        .map(|state| format!("[{}] {}", state.glyph(), state.name()))
        .collect::<Vec<_>>()
        .join(", ")
}

fn signifier_options() -> String {
    Signifier::ALL
        .iter()
        .map(|signifier| format!("[{}] {}", signifier.glyph(), signifier.name()))
        .collect::<Vec<_>>()
        .join(", ")
}
