//! Meetbook command-line host.
//!
//! # Responsibility
//! - Load the meeting store from the configured SQLite slot.
//! - Render the sorted meeting view and route every add/edit through an
//!   `EditSession`, so the CLI never mutates records directly.

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use log::info;
use meetbook_core::db::open_db;
use meetbook_core::{
    init_from_config, present, CoreConfig, DraftField, EditSession, MeetingId, MeetingRow,
    MeetingStore, PersistenceBridge, SlotStorage, SqliteSlotStorage,
};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "meetbook", version, about = "Schedule and manage your meetings")]
struct Cli {
    /// SQLite file holding meetings (overrides MEETBOOK_DB_PATH)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List meetings in chronological order
    List,
    /// Schedule a new meeting
    Add(AddArgs),
    /// Edit an existing meeting; omitted fields keep their value
    Edit(EditArgs),
    /// Delete a meeting (no-op when the id is unknown)
    Delete { id: MeetingId },
    /// Print core linkage info
    Ping,
}

#[derive(Args, Debug)]
struct AddArgs {
    #[arg(long)]
    title: String,
    /// Date as YYYY-MM-DD
    #[arg(long)]
    date: String,
    /// Time as HH:MM
    #[arg(long)]
    time: String,
    /// Team, Department or Company
    #[arg(long, default_value = "Team")]
    level: String,
    /// Participant email (repeatable)
    #[arg(long = "participant", required = true)]
    participants: Vec<String>,
    #[arg(long)]
    description: String,
}

#[derive(Args, Debug)]
struct EditArgs {
    id: MeetingId,
    #[arg(long)]
    title: Option<String>,
    #[arg(long)]
    date: Option<String>,
    #[arg(long)]
    time: Option<String>,
    #[arg(long)]
    level: Option<String>,
    /// Replaces the whole participant list when given (repeatable)
    #[arg(long = "participant")]
    participants: Vec<String>,
    #[arg(long)]
    description: Option<String>,
}

impl Command {
    fn name(&self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Add(_) => "add",
            Self::Edit(_) => "edit",
            Self::Delete { .. } => "delete",
            Self::Ping => "ping",
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = CoreConfig::from_env()?;
    if let Some(db) = cli.db {
        config.db_path = db;
    }
    init_from_config(&config)?;

    if let Command::Ping = cli.command {
        println!("meetbook_core ping={}", meetbook_core::ping());
        println!("meetbook_core version={}", meetbook_core::core_version());
        return Ok(());
    }

    let conn = open_db(&config.db_path)
        .with_context(|| format!("failed to open {}", config.db_path.display()))?;
    let bridge = PersistenceBridge::with_key(SqliteSlotStorage::new(&conn), config.slot_key);
    let mut store = MeetingStore::open(bridge);
    info!(
        "event=cli_command module=cli status=start command={} records={}",
        cli.command.name(),
        store.len()
    );

    match cli.command {
        Command::List => print_rows(&present(store.list())),
        Command::Add(args) => add(&mut store, args)?,
        Command::Edit(args) => edit(&mut store, args)?,
        Command::Delete { id } => {
            if store.delete(id) {
                println!("Deleted meeting {id}");
            } else {
                println!("No meeting with id {id}");
            }
        }
        Command::Ping => {}
    }

    if let Some(err) = store.persistence_error() {
        eprintln!("warning: changes kept in memory only: {err}");
    }
    Ok(())
}

fn add<S: SlotStorage>(store: &mut MeetingStore<S>, args: AddArgs) -> Result<()> {
    let mut session = EditSession::opened(None);
    session.edit_field(DraftField::Title, args.title)?;
    session.edit_field(DraftField::Date, args.date)?;
    session.edit_field(DraftField::Time, args.time)?;
    session.edit_field(DraftField::Level, args.level)?;
    session.edit_field(DraftField::Description, args.description)?;
    session.set_participants(args.participants)?;

    let record = session.commit(store)?;
    println!("Scheduled meeting {} on {} at {}", record.id, record.date, record.time);
    Ok(())
}

fn edit<S: SlotStorage>(store: &mut MeetingStore<S>, args: EditArgs) -> Result<()> {
    let Some(existing) = store.get(args.id) else {
        bail!("no meeting with id {}", args.id);
    };
    let mut session = EditSession::opened(Some(existing));

    let fields = [
        (DraftField::Title, args.title),
        (DraftField::Date, args.date),
        (DraftField::Time, args.time),
        (DraftField::Level, args.level),
        (DraftField::Description, args.description),
    ];
    for (field, value) in fields {
        if let Some(value) = value {
            session.edit_field(field, value)?;
        }
    }
    if !args.participants.is_empty() {
        session.set_participants(args.participants)?;
    }

    let record = session.commit(store)?;
    println!("Updated meeting {}", record.id);
    Ok(())
}

fn print_rows(rows: &[MeetingRow<'_>]) {
    if rows.is_empty() {
        println!("No meetings scheduled.");
        return;
    }

    let title_width = rows
        .iter()
        .map(|row| row.record.title.chars().count())
        .max()
        .unwrap_or(0)
        .max("TITLE".len());
    println!(
        "{:<15} {:<13} {:<6} {:<10} {:<title_width$} PARTICIPANTS",
        "ID", "DATE", "TIME", "LEVEL", "TITLE"
    );
    for row in rows {
        println!(
            "{:<15} {:<13} {:<6} {:<10} {:<title_width$} {}",
            row.record.id,
            row.date_label,
            row.record.time,
            row.record.level,
            row.record.title,
            row.participants_label
        );
        println!("{:>15} {}", "", row.record.description);
    }
}
