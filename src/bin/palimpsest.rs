//! # Palimpsest CLI - interactive revision tracking
//!
//! A line-oriented command shell over the palimpsest store. The shell owns
//! all parsing and rendering; every accepted command becomes exactly one
//! typed call into the library.
//!
//! ## Commands
//! ```text
//! CREATE <file>                  create a file
//! READ <file>                    print the checked-out revision's content
//! INSERT <file> <content>        append content to the current revision
//! UPDATE <file> <content>        replace the current revision's content
//! SNAPSHOT <file> [message]      freeze the current revision
//! ROLLBACK <file> [versionId]    check out a snapshot (parent if no id)
//! HISTORY <file>                 list snapshots along the current branch
//! RECENT_FILES <n>               n most recently edited files
//! BIGGEST_TREES <n>              n files with the most versions
//! HELP                           show this list
//! EXIT                           quit
//! ```

use anyhow::Context;
use clap::Parser;
use colored::Colorize;
use palimpsest::{
    EditMode, Palimpsest, PalimpsestBuilder, PalimpsestError, VersionId, DEFAULT_BUCKETS,
};
use std::io::{self, BufRead, Write};

/// Palimpsest - branching revision histories for named files
#[derive(Parser)]
#[command(name = "palimpsest")]
#[command(version)]
#[command(about = "Track branching revision histories of named files in memory")]
struct Cli {
    /// Bucket count of the file-name registry index
    #[arg(long, default_value_t = DEFAULT_BUCKETS)]
    file_buckets: usize,

    /// Bucket count of each file's version-id index
    #[arg(long, default_value_t = DEFAULT_BUCKETS)]
    version_buckets: usize,

    /// Print query results as JSON instead of text
    #[arg(long)]
    json: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging
    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
            )
            .with_writer(io::stderr)
            .init();
    }

    // Disable colors if needed
    if std::env::var("NO_COLOR").is_ok() {
        colored::control::set_override(false);
    }

    let mut store = PalimpsestBuilder::new()
        .file_buckets(cli.file_buckets)
        .version_buckets(cli.version_buckets)
        .build();

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        line.clear();
        let bytes = stdin
            .lock()
            .read_line(&mut line)
            .context("failed to read command line from stdin")?;
        if bytes == 0 {
            break; // EOF
        }

        match dispatch(&mut store, line.trim(), cli.json) {
            Action::Continue => {}
            Action::Quit => break,
        }
        io::stdout().flush().context("failed to flush stdout")?;
    }

    Ok(())
}

enum Action {
    Continue,
    Quit,
}

/// Parse one input line and run the command it names
fn dispatch(store: &mut Palimpsest, line: &str, json: bool) -> Action {
    if line.is_empty() {
        return Action::Continue;
    }

    let (command, rest) = match line.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest.trim()),
        None => (line, ""),
    };

    match command {
        "CREATE" => cmd_create(store, rest),
        "READ" => cmd_read(store, rest, json),
        "INSERT" => cmd_input(store, rest, EditMode::Append, "INSERT"),
        "UPDATE" => cmd_input(store, rest, EditMode::Replace, "UPDATE"),
        "SNAPSHOT" => cmd_snapshot(store, rest),
        "ROLLBACK" => cmd_rollback(store, rest),
        "HISTORY" => cmd_history(store, rest, json),
        "RECENT_FILES" => cmd_recent(store, rest, json),
        "BIGGEST_TREES" => cmd_biggest(store, rest, json),
        "HELP" => print_help(),
        "EXIT" | "QUIT" => return Action::Quit,
        _ => print_error("Invalid command, try HELP"),
    }

    Action::Continue
}

fn cmd_create(store: &mut Palimpsest, rest: &str) {
    let Some(name) = single_token(rest) else {
        return print_usage("CREATE <filename>");
    };
    match store.create_file(name) {
        Ok(()) => println!("File with name '{}' created successfully", name),
        Err(e) => print_store_error(&e),
    }
}

fn cmd_read(store: &Palimpsest, rest: &str, json: bool) {
    let Some(name) = single_token(rest) else {
        return print_usage("READ <filename>");
    };
    match store.read(name) {
        Ok(content) if json => println!("{}", serde_json::json!({ "content": content })),
        Ok(content) => println!("{}", content),
        Err(e) => print_store_error(&e),
    }
}

fn cmd_input(store: &mut Palimpsest, rest: &str, mode: EditMode, verb: &str) {
    let Some((name, content)) = rest.split_once(char::is_whitespace) else {
        return print_usage(&format!("{} <filename> <content>", verb));
    };
    match store.input(name, content.trim_start(), mode) {
        Ok(id) => println!("Version {} of {} is now current", id, name),
        Err(e) => print_store_error(&e),
    }
}

fn cmd_snapshot(store: &mut Palimpsest, rest: &str) {
    let (name, message) = match rest.split_once(char::is_whitespace) {
        Some((name, message)) => (name, message.trim_start()),
        None if !rest.is_empty() => (rest, ""),
        None => return print_usage("SNAPSHOT <filename> [message]"),
    };
    match store.snapshot(name, message) {
        Ok(id) => println!("Snapshot created for version {} of {}", id, name),
        Err(e) => print_store_error(&e),
    }
}

fn cmd_rollback(store: &mut Palimpsest, rest: &str) {
    let (name, id_text) = match rest.split_once(char::is_whitespace) {
        Some((name, id_text)) => (name, Some(id_text.trim())),
        None if !rest.is_empty() => (rest, None),
        None => return print_usage("ROLLBACK <filename> [versionId]"),
    };

    let target: Option<VersionId> = match id_text {
        Some(text) => match text.parse() {
            Ok(id) => Some(id),
            Err(_) => return print_usage("ROLLBACK <filename> [versionId]"),
        },
        None => None,
    };

    match store.rollback(name, target) {
        Ok(id) => println!("Rolled back {} to version {}", name, id),
        Err(e) => print_store_error(&e),
    }
}

fn cmd_history(store: &Palimpsest, rest: &str, json: bool) {
    let Some(name) = single_token(rest) else {
        return print_usage("HISTORY <filename>");
    };
    let history = match store.history(name) {
        Ok(history) => history,
        Err(e) => return print_store_error(&e),
    };

    if json {
        println!("{}", render_json(&history));
        return;
    }
    if history.is_empty() {
        println!("No snapshots prior to the current version of {}", name);
        return;
    }

    println!("Snapshot history of {}:", name);
    for entry in history {
        println!(
            "  {} {} ({})",
            format!("[{}]", entry.version_id).bold(),
            entry.message,
            entry.snapshot_at.format("%c")
        );
    }
}

fn cmd_recent(store: &Palimpsest, rest: &str, json: bool) {
    let Some(n) = parse_count(rest) else {
        return print_usage("RECENT_FILES <positive integer>");
    };
    match store.top_recently_edited(n) {
        Ok(rows) if json => println!("{}", render_json(&rows)),
        Ok(rows) => {
            println!("Most recently edited {} files:", n);
            for row in rows {
                println!(
                    "  {} (last edited {})",
                    row.name.bold(),
                    row.last_edited_at.format("%c")
                );
            }
        }
        Err(e) => print_store_error(&e),
    }
}

fn cmd_biggest(store: &Palimpsest, rest: &str, json: bool) {
    let Some(n) = parse_count(rest) else {
        return print_usage("BIGGEST_TREES <positive integer>");
    };
    match store.top_by_version_count(n) {
        Ok(rows) if json => println!("{}", render_json(&rows)),
        Ok(rows) => {
            println!("Top {} files with the most versions:", n);
            for row in rows {
                println!("  {} ({} versions)", row.name.bold(), row.versions);
            }
        }
        Err(e) => print_store_error(&e),
    }
}

/// Accept exactly one whitespace-free token
fn single_token(rest: &str) -> Option<&str> {
    if rest.is_empty() || rest.contains(char::is_whitespace) {
        return None;
    }
    Some(rest)
}

/// Accept a single positive integer
fn parse_count(rest: &str) -> Option<usize> {
    single_token(rest)?.parse().ok().filter(|n| *n > 0)
}

fn render_json<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|e| format!("{{\"error\":\"{}\"}}", e))
}

fn print_store_error(error: &PalimpsestError) {
    println!("{} {}", "error:".red().bold(), error.user_message());
}

fn print_error(message: &str) {
    println!("{} {}", "error:".red().bold(), message);
}

fn print_usage(usage: &str) {
    print_error(&format!("Invalid command, usage: {}", usage));
}

fn print_help() {
    println!("Commands:");
    println!("  CREATE <file>                create a file");
    println!("  READ <file>                  print the checked-out revision's content");
    println!("  INSERT <file> <content>      append content to the current revision");
    println!("  UPDATE <file> <content>      replace the current revision's content");
    println!("  SNAPSHOT <file> [message]    freeze the current revision");
    println!("  ROLLBACK <file> [versionId]  check out a snapshot (parent if no id)");
    println!("  HISTORY <file>               list snapshots along the current branch");
    println!("  RECENT_FILES <n>             n most recently edited files");
    println!("  BIGGEST_TREES <n>            n files with the most versions");
    println!("  EXIT                         quit");
}
