//! CLI binary for sukhii.

use std::path::PathBuf;

use anyhow::Context;
use chrono::{Datelike, Days, Local, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use sukhii::activity::WEEKDAY_LABELS;
use sukhii::tracker::CalendarView;
use sukhii::{
    ActivityEdit, ActivityStore, AgendaFilter, CompletionNote, JsonlLedger, NewActivity,
    ScheduleKind, Tracker, TrackerConfig,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Sukhii: track recurring maintenance activities.
#[derive(Parser)]
#[command(name = "sukhii", version, about)]
struct Cli {
    /// Path to TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the data directory.
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Option<Command>,
}

/// Available commands.
#[derive(Subcommand)]
enum Command {
    /// Show activities due or overdue today.
    Agenda {
        /// Evaluate as of this date instead of today.
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Only activities of this schedule kind.
        #[arg(long)]
        schedule: Option<ScheduleKind>,
        /// Case-insensitive search over name and description.
        #[arg(long)]
        search: Option<String>,
        /// Only overdue activities.
        #[arg(long)]
        overdue: bool,
    },

    /// Create an activity.
    Add {
        name: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long, default_value_t = ScheduleKind::Daily)]
        schedule: ScheduleKind,
        /// Weekdays (Mon=0..Sun=6) or days of month, comma-separated.
        #[arg(long, value_delimiter = ',')]
        days: Vec<u8>,
        #[arg(long, value_delimiter = ',')]
        tags: Vec<String>,
        /// Names of activities that must be completed first each day.
        #[arg(long = "depends-on", value_delimiter = ',')]
        depends_on: Vec<String>,
    },

    /// Edit an activity's name, description, tags, or dependencies.
    Edit {
        /// Activity id or exact name.
        activity: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long, value_delimiter = ',')]
        tags: Option<Vec<String>>,
        #[arg(long = "depends-on", value_delimiter = ',')]
        depends_on: Option<Vec<String>>,
    },

    /// Delete an activity. Its ledger history is kept.
    Delete {
        /// Activity id or exact name.
        activity: String,
    },

    /// Mark an activity complete, backfilling missed days.
    Complete {
        /// Activity id or exact name.
        activity: String,
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Link or reference to evidence of the work.
        #[arg(long, default_value = "")]
        evidence: String,
        #[arg(long, default_value = "")]
        comments: String,
        /// Attribution (defaults to the configured user).
        #[arg(long)]
        user: Option<String>,
    },

    /// Show completion history, newest first.
    History {
        /// Activity id or exact name.
        activity: String,
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Show a completion grid for recent days.
    Calendar {
        #[arg(long)]
        days: Option<u32>,
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Only activities of this schedule kind.
        #[arg(long)]
        schedule: Option<ScheduleKind>,
        /// Case-insensitive search over name and description.
        #[arg(long)]
        search: Option<String>,
    },

    /// Count completions per activity over a look-back window.
    Stats {
        #[arg(long)]
        days: Option<u32>,
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// List dependency edges.
    Deps,

    /// Move old ledger entries to the archive file.
    Archive {
        /// Archive entries older than this many days (defaults to the
        /// configured retention).
        #[arg(long)]
        older_than: Option<u32>,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("sukhii=info")),
        )
        .init();

    let cli = Cli::parse();

    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(TrackerConfig::default_config_path);
    let mut config = TrackerConfig::load_or_default(&config_path)
        .with_context(|| format!("loading config from {}", config_path.display()))?;
    if let Some(dir) = cli.data_dir {
        config.storage.data_dir = Some(dir);
    }

    let today = Local::now().date_naive();
    match cli.command.unwrap_or(Command::Agenda {
        date: None,
        schedule: None,
        search: None,
        overdue: false,
    }) {
        Command::Agenda {
            date,
            schedule,
            search,
            overdue,
        } => {
            let filter = AgendaFilter {
                schedule,
                search,
                overdue_only: overdue,
            };
            show_agenda(&config, date.unwrap_or(today), &filter)
        }
        Command::Add {
            name,
            description,
            schedule,
            days,
            tags,
            depends_on,
        } => {
            let mut store = open_store(&config)?;
            let activity = store.add(NewActivity {
                name,
                description,
                schedule_kind: schedule,
                days,
                tags,
                dependencies: depends_on,
            })?;
            println!("added {} ({})", activity.name, activity.id);
            Ok(())
        }
        Command::Edit {
            activity,
            name,
            description,
            tags,
            depends_on,
        } => {
            let mut store = open_store(&config)?;
            let id = resolve_id(&store, &activity)?;
            let updated = store.update(
                &id,
                ActivityEdit {
                    name,
                    description,
                    tags,
                    dependencies: depends_on,
                },
            )?;
            println!("updated {} ({})", updated.name, updated.id);
            Ok(())
        }
        Command::Delete { activity } => {
            let mut store = open_store(&config)?;
            let id = resolve_id(&store, &activity)?;
            if store.remove(&id)? {
                println!("deleted {id}");
            }
            Ok(())
        }
        Command::Complete {
            activity,
            date,
            evidence,
            comments,
            user,
        } => {
            let note = CompletionNote {
                evidence_link: evidence,
                comments,
                user: user.unwrap_or_else(|| config.user.clone()),
            };
            let mut tracker = open_tracker(&config)?;
            let entries = tracker.complete(&activity, &note, date.unwrap_or(today), Utc::now())?;
            for entry in &entries {
                let marker = if entry.was_backfilled { " (backfilled)" } else { "" };
                println!("logged {}{marker}", entry.date);
            }
            Ok(())
        }
        Command::History { activity, limit } => {
            let tracker = open_tracker(&config)?;
            let limit = limit.unwrap_or_else(|| config.display.history_limit());
            let entries = tracker.history(&activity, limit)?;
            if entries.is_empty() {
                println!("no completions recorded");
            }
            for entry in entries {
                println!(
                    "{}\t{}\t{}\t{}{}",
                    entry.date,
                    entry.user,
                    entry.evidence_link,
                    entry.comments,
                    if entry.was_backfilled { "\t(backfilled)" } else { "" }
                );
            }
            Ok(())
        }
        Command::Calendar {
            days,
            date,
            schedule,
            search,
        } => {
            let tracker = open_tracker(&config)?;
            let filter = AgendaFilter {
                schedule,
                search,
                overdue_only: false,
            };
            let view = tracker.calendar(
                date.unwrap_or(today),
                days.unwrap_or(config.display.calendar_days),
                &filter,
            );
            print_calendar(&view);
            Ok(())
        }
        Command::Stats { days, date } => {
            let tracker = open_tracker(&config)?;
            let window = days.unwrap_or(config.display.analytics_days);
            let counts = tracker.completion_counts(date.unwrap_or(today), window);
            if counts.is_empty() {
                println!("no completions in the last {window} days");
            }
            for count in counts {
                println!("{:>5}  {}", count.count, count.name);
            }
            Ok(())
        }
        Command::Deps => {
            let tracker = open_tracker(&config)?;
            for edge in tracker.dependency_edges() {
                let note = if edge.resolved { "" } else { "  (no such activity)" };
                println!("{} -> {}{note}", edge.dependency, edge.activity);
            }
            Ok(())
        }
        Command::Archive { older_than } => {
            let Some(days) = older_than.or(config.retention.archive_after_days) else {
                anyhow::bail!("no retention window: pass --older-than or set retention.archive_after_days");
            };
            let cutoff = today
                .checked_sub_days(Days::new(u64::from(days)))
                .context("retention window reaches before the calendar start")?;
            let mut ledger = JsonlLedger::open(config.storage.ledger_path())?;
            let moved = ledger.archive_before(cutoff, &config.storage.archive_path())?;
            println!("archived {moved} entries dated before {cutoff}");
            Ok(())
        }
    }
}

fn open_store(config: &TrackerConfig) -> anyhow::Result<ActivityStore> {
    let path = config.storage.activities_path();
    ActivityStore::open(path.clone())
        .with_context(|| format!("opening activity table {}", path.display()))
}

fn open_tracker(config: &TrackerConfig) -> anyhow::Result<Tracker<JsonlLedger>> {
    let store = open_store(config)?;
    let ledger_path = config.storage.ledger_path();
    let ledger = JsonlLedger::open(ledger_path.clone())
        .with_context(|| format!("opening ledger {}", ledger_path.display()))?;
    info!(
        "loaded {} activities and {} ledger entries",
        store.activities().len(),
        ledger.entries().len()
    );
    Ok(Tracker::new(store.into_activities(), ledger))
}

fn resolve_id(store: &ActivityStore, key: &str) -> anyhow::Result<String> {
    store
        .find(key)
        .map(|a| a.id.clone())
        .ok_or_else(|| sukhii::TrackerError::ActivityNotFound(key.to_owned()).into())
}

fn show_agenda(config: &TrackerConfig, today: NaiveDate, filter: &AgendaFilter) -> anyhow::Result<()> {
    let tracker = open_tracker(config)?;
    let items = tracker.agenda(today, filter);
    if items.is_empty() {
        println!("nothing due on {today}");
        return Ok(());
    }

    for item in items {
        let state = if item.status.done_today {
            "done"
        } else if !item.status.can_complete() {
            "blocked"
        } else if item.status.overdue {
            "overdue"
        } else {
            "due"
        };
        let rule = item
            .activity
            .recurrence
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default();
        println!("[{state:>7}] {}  ({rule})", item.activity.name);
        if let Some(last) = item.status.last_completed {
            println!("          last done {last}");
        }
        if !item.status.pending_dependencies.is_empty() {
            println!(
                "          waiting on {}",
                item.status.pending_dependencies.join(", ")
            );
        }
    }
    Ok(())
}

fn print_calendar(view: &CalendarView) {
    if view.dates.is_empty() {
        return;
    }
    let width = view.rows.iter().map(|r| r.name.len()).max().unwrap_or(0);
    let header: String = view
        .dates
        .iter()
        .map(|d| {
            usize::try_from(d.weekday().num_days_from_monday())
                .ok()
                .and_then(|idx| WEEKDAY_LABELS.get(idx))
                .and_then(|label| label.chars().next())
                .unwrap_or(' ')
        })
        .collect();
    println!("{:width$}  {header}", "");
    for row in &view.rows {
        let cells: String = row.done.iter().map(|d| if *d { '#' } else { '.' }).collect();
        println!("{:width$}  {cells}", row.name);
    }
}
