//! Command-line surface.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "bojo", version, about = "A command-line bullet journal")]
pub struct Cli {
    /// Treat item references as stable ids instead of list numbers.
    #[arg(long, global = true)]
    pub id: bool,

    /// Show marker names next to glyphs (same as setting BOJO_VERBOSE).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output.
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Add a new item.
    Add {
        /// Description of the item.
        #[arg(short, long)]
        description: String,

        /// State glyph or name, e.g. `.`, `x`, `event`.
        #[arg(short, long, default_value = "incomplete")]
        state: String,

        /// Signifier glyph or name, or `none`.
        #[arg(long, default_value = "none")]
        signifier: String,

        /// Parent item reference.
        #[arg(short, long)]
        parent: Option<u64>,

        /// When the item happens, e.g. "tomorrow at 6pm".
        #[arg(short, long)]
        time: Option<String>,

        /// Skip the confirmation prompt.
        #[arg(short, long)]
        yes: bool,
    },

    /// Set an item's state or signifier (`none` clears the signifier).
    ///
    /// Every reference is checked first; nothing changes if any is invalid.
    Mark {
        /// State or signifier glyph, name or unique prefix.
        marker: String,

        /// Item references from the last list.
        #[arg(required = true, num_args = 1..)]
        items: Vec<u64>,
    },

    /// Delete an item forever.
    Delete {
        /// Item reference from the last list.
        item: u64,

        /// Skip the confirmation prompt.
        #[arg(short, long)]
        yes: bool,
    },

    /// Mark past scheduled items as complete.
    Complete {
        /// Skip the confirmation prompt.
        #[arg(short, long)]
        yes: bool,
    },

    /// List items.
    List {
        /// Number of items to show; defaults to BOJO_NUM_ITEMS or 10.
        #[arg(short, long, allow_negative_numbers = true)]
        num_items: Option<i64>,

        #[command(subcommand)]
        view: Option<ListCommand>,
    },

    /// Search item descriptions.
    Query {
        /// Case-insensitive text to look for.
        text: String,

        /// Include completed items.
        #[arg(short, long)]
        show_complete: bool,
    },

    /// Explain state and signifier glyphs.
    Info,

    /// Export all items as JSON.
    Export {
        /// Output file, `-` for stdout.
        #[arg(default_value = "-")]
        file: PathBuf,
    },

    /// Import items from JSON produced by `export`.
    Import {
        /// Input file, `-` for stdin.
        #[arg(default_value = "-")]
        file: PathBuf,
    },
}

#[derive(Debug, Clone, Subcommand)]
pub enum ListCommand {
    /// Most recently created items (default).
    Recent,
    /// All items, newest first.
    All {
        /// Optional state or signifier filter.
        #[arg(default_value = "all")]
        marker: String,
    },
    /// Scheduled items from now on, soonest first.
    Upcoming {
        /// Optional state or signifier filter.
        #[arg(default_value = "all")]
        marker: String,
    },
    /// Priority items.
    Pri,
    /// Completed items, most recent first.
    Complete,
}
