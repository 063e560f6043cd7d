//! `jobtrack` command-line front end.
//!
//! # Responsibility
//! - Build a `TrackerConfig` from flags and environment.
//! - Start file logging, open the store and run one tracker operation.
//! - Render results as plain text on stdout.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use chrono::{Local, NaiveDateTime};
use clap::{Args, Parser, Subcommand, ValueEnum};
use jobtrack_core::datetime::FOLLOW_UP_FORMAT;
use jobtrack_core::transfer::csv::CSV_FILE_NAME;
use jobtrack_core::transfer::json::JSON_FILE_NAME;
use jobtrack_core::{
    default_log_level, init_logging, open_store, parse_backend_preference, BackendPreference,
    Item, ItemDraft, ItemStore, JobTracker, Priority, Status, TrackerConfig,
};
use log::info;

type Tracker = JobTracker<Box<dyn ItemStore>>;

/// Command-line arguments for jobtrack
#[derive(Parser, Debug)]
#[command(name = "jobtrack")]
#[command(about = "Track job applications, follow-ups and priorities")]
#[command(version)]
struct Cli {
    /// Directory holding the collection and logs
    #[arg(long, default_value = ".jobtrack", env = "JOBTRACK_DATA_DIR")]
    data_dir: PathBuf,

    /// Log level (trace|debug|info|warn|error)
    #[arg(long, env = "JOBTRACK_LOG_LEVEL")]
    log_level: Option<String>,

    /// Storage backend (auto|host|file)
    #[arg(long, default_value = "auto", env = "JOBTRACK_BACKEND", value_parser = parse_backend_preference)]
    backend: BackendPreference,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Add an application
    Add {
        company: String,
        position: String,
        #[command(flatten)]
        form: FormArgs,
    },
    /// Edit fields of an existing application
    Edit {
        id: String,
        #[arg(long)]
        company: Option<String>,
        #[arg(long)]
        position: Option<String>,
        #[command(flatten)]
        form: FormArgs,
    },
    /// Delete an application
    Delete {
        id: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Mark the follow-up of an application as done
    Done { id: String },
    /// List applications matching an optional search query
    List { query: Option<String> },
    /// Show the priority board
    Board { query: Option<String> },
    /// Show follow-ups scheduled this week
    Upcoming,
    /// Show priority totals
    Stats,
    /// Import a .csv, .json, .txt or .md file
    Import { path: PathBuf },
    /// Export the collection
    Export {
        #[arg(long, value_enum, default_value_t = ExportFormat::Csv)]
        format: ExportFormat,
        /// Output file, `-` for stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ExportFormat {
    Csv,
    Json,
}

#[derive(Debug, Args)]
struct FormArgs {
    #[arg(long)]
    contact: Option<String>,
    #[arg(long)]
    channel: Option<String>,
    #[arg(long, value_parser = parse_status)]
    status: Option<Status>,
    #[arg(long)]
    next_step: Option<String>,
    /// Follow-up as YYYY-MM-DDTHH:MM, empty to clear
    #[arg(long, value_parser = parse_follow_up)]
    follow_up: Option<String>,
    #[arg(long, value_parser = parse_priority)]
    priority: Option<Priority>,
    #[arg(long)]
    notes: Option<String>,
}

impl FormArgs {
    fn apply(self, draft: &mut ItemDraft) {
        if let Some(contact) = self.contact {
            draft.contact = contact;
        }
        if let Some(channel) = self.channel {
            draft.channel = channel;
        }
        if let Some(status) = self.status {
            draft.status = status;
        }
        if let Some(next_step) = self.next_step {
            draft.next_step = next_step;
        }
        if let Some(follow_up) = self.follow_up {
            draft.follow_up = follow_up;
        }
        if let Some(priority) = self.priority {
            draft.priority = priority;
        }
        if let Some(notes) = self.notes {
            draft.notes = notes;
        }
    }
}

fn parse_status(value: &str) -> Result<Status, String> {
    let wanted = value.trim().to_lowercase();
    Status::known()
        .into_iter()
        .find(|status| status.as_str().to_lowercase() == wanted || status.slug() == wanted)
        .ok_or_else(|| {
            let known = Status::known();
            let labels: Vec<&str> = known.iter().map(Status::as_str).collect();
            format!("expected one of: {}", labels.join(", "))
        })
}

fn parse_priority(value: &str) -> Result<Priority, String> {
    let wanted = value.trim().to_lowercase();
    Priority::known()
        .into_iter()
        .find(|priority| priority.slug() == wanted)
        .ok_or_else(|| "expected one of: High, Medium, Low".to_string())
}

fn parse_follow_up(value: &str) -> Result<String, String> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(String::new());
    }
    NaiveDateTime::parse_from_str(value, FOLLOW_UP_FORMAT)
        .map(|_| value.to_string())
        .map_err(|err| format!("expected YYYY-MM-DDTHH:MM ({err})"))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let data_dir = if cli.data_dir.is_absolute() {
        cli.data_dir.clone()
    } else {
        std::env::current_dir()
            .context("Failed to resolve current directory")?
            .join(&cli.data_dir)
    };
    let mut config = TrackerConfig::new(data_dir).with_backend(cli.backend);
    config.log_level = cli
        .log_level
        .clone()
        .unwrap_or_else(|| default_log_level().to_string());

    init_logging(&config.log_level, config.log_dir())
        .map_err(|err| anyhow!("Failed to initialize logging: {err}"))?;
    info!(
        "event=cli_start module=cli status=ok backend={} data_dir={}",
        config.backend.as_str(),
        config.data_dir.display()
    );

    let store = open_store(&config).context("Failed to open application store")?;
    let mut tracker = JobTracker::open(store);

    run(&mut tracker, cli.command)
}

fn run(tracker: &mut Tracker, command: Command) -> Result<()> {
    match command {
        Command::Add {
            company,
            position,
            form,
        } => {
            let mut draft = ItemDraft::new(company, position);
            form.apply(&mut draft);
            let id = tracker.add(draft)?;
            println!("Added application {id}");
        }
        Command::Edit {
            id,
            company,
            position,
            form,
        } => {
            let item = tracker
                .get(&id)
                .ok_or_else(|| anyhow!("application not found: {id}"))?;
            let mut draft = ItemDraft::from_item(item);
            if let Some(company) = company {
                draft.company = company;
            }
            if let Some(position) = position {
                draft.position = position;
            }
            form.apply(&mut draft);
            tracker.update(&id, draft)?;
            println!("Updated application {id}");
        }
        Command::Delete { id, yes } => {
            let item = tracker
                .get(&id)
                .ok_or_else(|| anyhow!("application not found: {id}"))?;
            let prompt = format!(
                "Delete application {} at {}? [y/N] ",
                item.position, item.company
            );
            if !yes && !confirm(&prompt)? {
                println!("Cancelled");
                return Ok(());
            }
            tracker.delete(&id)?;
            println!("Deleted application {id}");
        }
        Command::Done { id } => {
            tracker.mark_done(&id)?;
            println!("Follow-up done for {id}");
        }
        Command::List { query } => {
            let query = query.unwrap_or_default();
            let matches = jobtrack_core::filter_items(tracker.items(), &query);
            if matches.is_empty() {
                println!("No applications found");
            }
            for item in matches {
                println!("{}", list_row(item));
            }
        }
        Command::Board { query } => print_board(tracker, &query.unwrap_or_default()),
        Command::Upcoming => print_upcoming(tracker),
        Command::Stats => {
            let counts = tracker.counts();
            println!("Total   {}", tracker.items().len());
            println!("High    {}", counts.high);
            println!("Medium  {}", counts.medium);
            println!("Low     {}", counts.low);
        }
        Command::Import { path } => {
            let count = tracker.import_file(&path)?;
            println!("Imported {count} applications from {}", path.display());
        }
        Command::Export { format, output } => {
            let (content, default_name) = match format {
                ExportFormat::Csv => (tracker.export_csv(), CSV_FILE_NAME),
                ExportFormat::Json => (tracker.export_json()?, JSON_FILE_NAME),
            };
            let output = output.unwrap_or_else(|| PathBuf::from(default_name));
            write_export(&output, &content)?;
        }
    }
    Ok(())
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{prompt}");
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}

fn list_row(item: &Item) -> String {
    let follow_up = if item.follow_up.is_empty() {
        "-"
    } else {
        item.follow_up.as_str()
    };
    format!(
        "{:<12} {:<24} {:<24} {:<13} {:<7} {}",
        item.id,
        item.company,
        item.position,
        item.status.as_str(),
        item.priority.as_str(),
        follow_up
    )
}

fn print_board(tracker: &Tracker, query: &str) {
    let board = tracker.board(query);
    for priority in Priority::known() {
        let column = board.column(&priority);
        println!("== {} ({}) ==", priority.as_str(), column.len());
        for item in column {
            println!(
                "  [{}] {} / {} ({})",
                item.status.slug(),
                item.company,
                item.position,
                item.id
            );
            if !item.next_step.is_empty() {
                println!("      next: {}", item.next_step);
            }
        }
    }
}

fn print_upcoming(tracker: &Tracker) {
    let upcoming = tracker.upcoming(&Local::now());
    if upcoming.is_empty() {
        println!("No follow-ups this week");
        return;
    }
    for entry in upcoming {
        let marker = if entry.is_today {
            " (today)"
        } else if entry.is_tomorrow {
            " (tomorrow)"
        } else {
            ""
        };
        println!(
            "{} {} {}  {} / {}{}",
            entry.day_name,
            entry.date_str,
            entry.time_str,
            entry.item.company,
            entry.item.position,
            marker
        );
    }
}

fn write_export(output: &Path, content: &str) -> Result<()> {
    if output == Path::new("-") {
        println!("{content}");
        return Ok(());
    }
    if output.exists() && output.is_dir() {
        bail!("export target is a directory: {}", output.display());
    }
    std::fs::write(output, content)
        .with_context(|| format!("Failed to write export to {}", output.display()))?;
    println!("Exported to {}", output.display());
    Ok(())
}
