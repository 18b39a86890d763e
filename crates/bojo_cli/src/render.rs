//! Terminal presentation of items, lists and the marker legend.

use bojo_core::config::VERBOSE_ENV;
use bojo_core::{DisplayEntry, DisplayList, Item, ItemState, NewItem, Signifier};
use chrono::{Local, TimeZone};
use yansi::{Color, Paint};

const INDENT: &str = "  ";

fn state_color(state: ItemState) -> Color {
    match state {
        ItemState::Incomplete => Color::Red,
        ItemState::Complete => Color::Green,
        ItemState::Migrated => Color::Blue,
        ItemState::Scheduled => Color::Cyan,
        ItemState::Irrelevant => Color::White,
        ItemState::Note => Color::Magenta,
        ItemState::Event => Color::Yellow,
    }
}

/// `Thursday, June 11, 2026 at 6:00 PM` in local time.
pub fn format_time(epoch_ms: i64) -> String {
    match Local.timestamp_millis_opt(epoch_ms).single() {
        Some(at) => at.format("%A, %B %-d, %Y at %-I:%M %p").to_string(),
        None => format!("@{epoch_ms}"),
    }
}

fn body(
    description: &str,
    state: ItemState,
    signifier: Option<Signifier>,
    scheduled_at: Option<i64>,
    verbose: bool,
) -> String {
    let mut glyph = state.glyph().to_string();
    if verbose {
        glyph = format!("{glyph} ({state})");
    }
    let mut line = format!("{glyph} {}", state_color(state).paint(description));

    if let Some(signifier) = signifier {
        let mut symbol = signifier.glyph().to_string();
        if verbose {
            symbol = format!("{symbol} ({signifier})");
        }
        line = format!("{symbol} {line}");
        if signifier == Signifier::Priority {
            line = Paint::new(line).bold().to_string();
        }
    }

    if let Some(at) = scheduled_at {
        line = format!("{line} {}", Paint::new(format_time(at)).dimmed());
    }
    line
}

/// One numbered row of a display list.
pub fn render_entry(position: usize, entry: &DisplayEntry, verbose: bool) -> String {
    let item = &entry.item;
    format!(
        "{}{} {}",
        INDENT.repeat(entry.depth),
        Paint::new(position).underline(),
        body(
            &item.description,
            item.state,
            item.signifier,
            item.scheduled_at,
            verbose
        )
    )
}

/// Title plus numbered rows, or `empty` when the list has no rows.
pub fn render_list(list: &DisplayList, empty: &str, verbose: bool) -> String {
    if list.is_empty() {
        return empty.to_string();
    }
    let mut lines = Vec::with_capacity(list.len() + 1);
    lines.push(format!("{}:", Paint::new(&list.title).underline()));
    for (index, entry) in list.entries.iter().enumerate() {
        lines.push(render_entry(index + 1, entry, verbose));
    }
    lines.join("\n")
}

/// Single item echo keyed by its stable id, e.g. before a confirmation.
pub fn render_item(item: &Item, verbose: bool) -> String {
    format!(
        "#{} {}",
        item.id,
        body(
            &item.description,
            item.state,
            item.signifier,
            item.scheduled_at,
            verbose
        )
    )
}

/// Echo of an item that has not been stored yet.
pub fn render_new_item(item: &NewItem, verbose: bool) -> String {
    let mut line = body(
        item.description.trim(),
        item.state,
        item.signifier,
        item.scheduled_at,
        verbose,
    );
    if let Some(parent_id) = item.parent_id {
        line = format!("{line} (under #{parent_id})");
    }
    line
}

/// Legend of state and signifier glyphs, plus verbose mode status.
pub fn legend(verbose: bool) -> String {
    let mut lines = vec![Paint::new("States").underline().to_string()];
    for state in ItemState::ALL {
        lines.push(format!("{} {}", state.glyph(), state_color(state).paint(state)));
    }

    lines.push(String::new());
    lines.push(Paint::new("Signifiers").underline().to_string());
    for signifier in Signifier::ALL {
        let name = if signifier == Signifier::Priority {
            Paint::new(signifier.name()).bold().to_string()
        } else {
            signifier.name().to_string()
        };
        lines.push(format!("{} {name}", signifier.glyph()));
    }

    lines.push(String::new());
    lines.push(Paint::new("Verbose Mode").underline().to_string());
    let env_var = Paint::green(VERBOSE_ENV);
    if verbose {
        lines.push(format!("Verbose mode is {}.", Paint::green("ENABLED")));
        lines.push(format!("Disable it by unsetting the {env_var} environment variable:"));
        lines.push(format!("  unset {VERBOSE_ENV}"));
    } else {
        lines.push(format!("Verbose mode is {}.", Paint::red("DISABLED")));
        lines.push(format!("Enable it by setting the {env_var} environment variable:"));
        lines.push(format!("  export {VERBOSE_ENV}=1"));
    }
    lines.join("\n")
}
