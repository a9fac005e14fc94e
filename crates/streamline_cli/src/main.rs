//! Command line front end for a local StreamLine database.
//!
//! # Responsibility
//! - Offer the list, add, detail, delete and calendar flows without the
//!   mobile shell, for inspection and scripting.
//! - Keep output plain text and deterministic for a given database.

use anyhow::{anyhow, bail, Context, Result};
use chrono::{Datelike, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};
use clap::{Parser, Subcommand};
use log::debug;
use std::path::PathBuf;
use streamline_core::db::open_db;
use streamline_core::{
    build_month_grid, event_emojis, has_events, init_logging, CalendarConfig, DayCell, Event,
    EventStore, NewEvent, SqliteEventRepository, DEFAULT_EMOJI, EMOJI_PALETTE,
};
use uuid::Uuid;

const DB_FILE_NAME: &str = "streamline.sqlite3";
const INPUT_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";
const DISPLAY_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Parser)]
#[command(name = "streamline", version, about = "Track emoji-tagged events")]
struct Cli {
    /// SQLite database file.
    #[arg(long, global = true, env = "STREAMLINE_DB_PATH")]
    db: Option<PathBuf>,

    /// Write rolling logs into this absolute directory.
    #[arg(long, global = true, env = "STREAMLINE_LOG_DIR")]
    log_dir: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List all events in insertion order
    List,
    /// Add an event
    Add {
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        description: String,
        /// One of the palette emojis, see `streamline palette`
        #[arg(long, default_value = DEFAULT_EMOJI)]
        emoji: String,
        /// Local time as "YYYY-MM-DD HH:MM"; defaults to now
        #[arg(long)]
        at: Option<String>,
    },
    /// Show one event in full
    Show { id: Uuid },
    /// Delete events by ID
    Delete {
        #[arg(required = true)]
        ids: Vec<Uuid>,
    },
    /// Print a month grid, Monday first ("YYYY-MM", defaults to this month)
    Month { month: Option<String> },
    /// List the events of one day ("YYYY-MM-DD", defaults to today)
    Day { date: Option<String> },
    /// Print the emoji palette
    Palette,
    /// Print core linkage info
    Version,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(log_dir) = cli.log_dir.as_deref() {
        init_logging(streamline_core::default_log_level().as_str(), log_dir)
            .context("failed to initialize logging")?;
    }

    match cli.command {
        Command::Palette => println!("{}", EMOJI_PALETTE.join(" ")),
        Command::Version => {
            println!("streamline_core ping={}", streamline_core::ping());
            println!("streamline_core version={}", streamline_core::core_version());
        }
        command => {
            let db_path = cli
                .db
                .unwrap_or_else(|| std::env::temp_dir().join(DB_FILE_NAME));
            debug!("event=cli_start module=cli db_path={}", db_path.display());
            let conn = open_db(&db_path)
                .with_context(|| format!("failed to open database `{}`", db_path.display()))?;
            let store = EventStore::new(SqliteEventRepository::try_new(&conn)?);
            run_store_command(command, &store)?;
        }
    }

    Ok(())
}

fn run_store_command(
    command: Command,
    store: &EventStore<SqliteEventRepository<'_>>,
) -> Result<()> {
    let calendar = CalendarConfig::local_monday();

    match command {
        Command::List => {
            for event in store.all()? {
                print_summary(&event);
            }
        }
        Command::Add {
            title,
            description,
            emoji,
            at,
        } => {
            let mut draft = NewEvent::titled(title).description(description).emoji(emoji);
            if let Some(at) = at.as_deref() {
                draft = draft.at(parse_local_time(at)?);
            }
            if !draft.can_save() {
                bail!("title cannot be empty");
            }
            let event = store.add(draft)?;
            println!("{}", event.id);
        }
        Command::Show { id } => {
            let event = store
                .get(id)?
                .ok_or_else(|| anyhow!("event not found: {id}"))?;
            print_detail(&event);
        }
        Command::Delete { ids } => {
            let removed = store.delete(&ids)?;
            println!("deleted {} of {} event(s)", removed.len(), ids.len());
        }
        Command::Month { month } => {
            let anchor = match month.as_deref() {
                Some(raw) => NaiveDate::parse_from_str(&format!("{raw}-01"), "%Y-%m-%d")
                    .with_context(|| format!("invalid month `{raw}`, expected YYYY-MM"))?,
                None => Local::now().date_naive(),
            };
            let events = store.all()?;
            print_month(anchor, &events, &calendar);
        }
        Command::Day { date } => {
            let day = match date.as_deref() {
                Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                    .with_context(|| format!("invalid date `{raw}`, expected YYYY-MM-DD"))?,
                None => Local::now().date_naive(),
            };
            let events = store.events_on(day, &calendar)?;
            if events.is_empty() {
                println!("no events on {day}");
            }
            for event in events {
                print_summary(&event);
            }
        }
        // Answered in `main` without a database.
        Command::Palette | Command::Version => {}
    }

    Ok(())
}

fn parse_local_time(raw: &str) -> Result<chrono::DateTime<Utc>> {
    let naive = NaiveDateTime::parse_from_str(raw, INPUT_TIME_FORMAT)
        .with_context(|| format!("invalid time `{raw}`, expected YYYY-MM-DD HH:MM"))?;
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|local| local.with_timezone(&Utc))
        .ok_or_else(|| anyhow!("`{raw}` does not exist in the local timezone"))
}

fn print_summary(event: &Event) {
    println!(
        "{}  {}  {}  {}",
        event.id,
        event.timestamp.with_timezone(&Local).format(DISPLAY_TIME_FORMAT),
        event.emoji,
        event.title
    );
}

fn print_detail(event: &Event) {
    println!("{} {}", event.emoji, event.title);
    println!(
        "{}",
        event
            .timestamp
            .with_timezone(&Local)
            .format("%A, %B %-d, %Y %H:%M:%S")
    );
    println!();
    println!("{}", event.description);
}

fn print_month(anchor: NaiveDate, events: &[Event], calendar: &CalendarConfig<Local>) {
    let grid = build_month_grid(anchor, calendar.first_weekday());
    println!("{:04}-{:02}", grid.year(), grid.month());
    let headers = grid
        .weekday_headers()
        .iter()
        .map(|weekday| format!("{:>4}", weekday.to_string()))
        .collect::<String>();
    println!("{headers}");

    for week in grid.weeks() {
        let row = week
            .iter()
            .map(|cell| match cell {
                DayCell::Blank => "    ".to_string(),
                DayCell::Day(date) => {
                    let marker = if has_events(events, *date, calendar) {
                        '*'
                    } else {
                        ' '
                    };
                    format!("{:>3}{marker}", date.day())
                }
            })
            .collect::<String>();
        println!("{}", row.trim_end());
    }

    for cell in grid.cells() {
        if let Some(date) = cell.date() {
            let emojis = event_emojis(events, date, calendar);
            if !emojis.is_empty() {
                println!("{date}: {}", emojis.join(" "));
            }
        }
    }
}
