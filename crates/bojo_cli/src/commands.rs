//! Command dispatch from parsed arguments to journal use cases.

use crate::cli::{Command, ListCommand};
use crate::prompt::confirm;
use crate::render::{render_item, render_list, render_new_item};
use bojo_core::{
    parse_marker, parse_signifier, parse_state, AddItem, DisplayStore, ItemRef, ItemStore,
    JournalError, JournalService, ListView, Marker, TimeResolver,
};
use log::info;
use std::fmt::{Display, Formatter};
use std::io::Read;
use std::path::Path;

/// Why a command stopped early.
#[derive(Debug)]
pub enum CliError {
    Journal(JournalError),
    /// User declined a confirmation prompt.
    Aborted,
}

impl CliError {
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Journal(err) => err.exit_code(),
            Self::Aborted => 1,
        }
    }
}

impl Display for CliError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Journal(err) => write!(f, "{err}"),
            Self::Aborted => write!(f, "aborted"),
        }
    }
}

impl From<JournalError> for CliError {
    fn from(value: JournalError) -> Self {
        Self::Journal(value)
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Journal(JournalError::Io(value))
    }
}

/// Per-invocation presentation and addressing options.
#[derive(Debug, Clone, Copy)]
pub struct Options {
    pub by_id: bool,
    pub verbose: bool,
    pub default_count: usize,
}

impl Options {
    fn item_ref(&self, raw: u64) -> Result<ItemRef, CliError> {
        if self.by_id {
            let id = i64::try_from(raw)
                .map_err(|_| JournalError::Validation(format!("item id {raw} is too large")))?;
            Ok(ItemRef::Id(id))
        } else {
            let position = usize::try_from(raw)
                .map_err(|_| JournalError::Validation(format!("item number {raw} is too large")))?;
            Ok(ItemRef::Display(position))
        }
    }
}

pub fn run<S, D, T>(
    service: &JournalService<S, D, T>,
    command: Command,
    options: Options,
) -> Result<(), CliError>
where
    S: ItemStore,
    D: DisplayStore,
    T: TimeResolver,
{
    match command {
        Command::Add {
            description,
            state,
            signifier,
            parent,
            time,
            yes,
        } => {
            let input = AddItem {
                description,
                state: parse_state(&state).map_err(JournalError::from)?,
                signifier: parse_signifier(&signifier).map_err(JournalError::from)?,
                parent: parent.map(|raw| options.item_ref(raw)).transpose()?,
                when: time,
            };
            let prepared = service.prepare_add(&input)?;
            println!("{}", render_new_item(&prepared, options.verbose));
            ensure_confirmed("Do you want to add this item?", yes)?;

            let item = service.create(&prepared)?;
            info!("event=cli_add module=cli status=ok item_id={}", item.id);
            println!("Added item #{}", item.id);
        }
        Command::Mark { marker, items } => {
            let marker = parse_marker(&marker).map_err(JournalError::from)?;
            let refs = items
                .into_iter()
                .map(|raw| options.item_ref(raw))
                .collect::<Result<Vec<_>, _>>()?;
            for item in service.mark_all(&refs, marker)? {
                println!("{}", render_item(&item, options.verbose));
                match marker {
                    Marker::State(state) => println!("Marked item #{} as {state}", item.id),
                    Marker::Signifier(signifier) => {
                        println!("Marked item #{} as {signifier}", item.id)
                    }
                    Marker::Clear => println!("Cleared signifier for item #{}", item.id),
                }
            }
        }
        Command::Delete { item, yes } => {
            let item_ref = options.item_ref(item)?;
            let target = service.get(item_ref)?;
            println!("{}", render_item(&target, options.verbose));
            ensure_confirmed("Do you want to delete this item?", yes)?;

            service.delete(ItemRef::Id(target.id))?;
            println!("Deleted item #{}", target.id);
        }
        Command::Complete { yes } => {
            let pending = service.past_incomplete()?;
            if pending.is_empty() {
                println!("All past items are complete");
                return Ok(());
            }
            ensure_confirmed(&format!("Mark {} items as complete?", pending.len()), yes)?;
            let completed = service.complete_past()?;
            println!("Completed {} items", completed.len());
        }
        Command::List { num_items, view } => {
            let count = num_items.map_or(options.default_count, |n| usize::try_from(n).unwrap_or(0));
            let (view, empty) = list_view(view.unwrap_or(ListCommand::Recent))?;
            let list = service.list(view, count)?;
            println!("{}", render_list(&list, &empty, options.verbose));
        }
        Command::Query {
            text,
            show_complete,
        } => {
            let list = service.search(&text, show_complete)?;
            println!(
                "{}",
                render_list(&list, "No matching items found", options.verbose)
            );
        }
        Command::Info => println!("{}", crate::render::legend(options.verbose)),
        Command::Export { file } => {
            let json = service.export_json()?;
            if is_stdio(&file) {
                println!("{json}");
            } else {
                std::fs::write(&file, json + "\n")?;
                println!("Exported items to {}", file.display());
            }
        }
        Command::Import { file } => {
            let mut text = String::new();
            if is_stdio(&file) {
                std::io::stdin().read_to_string(&mut text)?;
            } else {
                text = std::fs::read_to_string(&file)?;
            }
            let imported = service.import_json(&text)?;
            println!("Added {} items", imported.len());
        }
    }
    Ok(())
}

fn ensure_confirmed(question: &str, assume_yes: bool) -> Result<(), CliError> {
    if confirm(question, assume_yes)? {
        Ok(())
    } else {
        Err(CliError::Aborted)
    }
}

fn is_stdio(path: &Path) -> bool {
    path.as_os_str() == "-"
}

fn list_view(command: ListCommand) -> Result<(ListView, String), CliError> {
    let view = match command {
        ListCommand::Recent => return Ok((ListView::Recent, "No items".to_string())),
        ListCommand::Pri => return Ok((ListView::Priority, "No priority items".to_string())),
        ListCommand::Complete => {
            return Ok((ListView::Completed, "No completed items".to_string()))
        }
        ListCommand::All { marker } => {
            let marker = parse_marker(&marker).map_err(JournalError::from)?;
            (ListView::All(marker), format!("No {}", marker_label(marker, "items")))
        }
        ListCommand::Upcoming { marker } => {
            let marker = parse_marker(&marker).map_err(JournalError::from)?;
            (
                ListView::Upcoming(marker),
                format!("No upcoming {}", marker_label(marker, "items")),
            )
        }
    };
    Ok(view)
}

fn marker_label(marker: Marker, fallback: &str) -> String {
    match marker {
        Marker::State(state) => state.name().to_string(),
        Marker::Signifier(signifier) => signifier.name().to_string(),
        Marker::Clear => fallback.to_string(),
    }
}
