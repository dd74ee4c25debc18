use crate::config::Config;
use crate::project::{read_project, write_project};
use anyhow::{anyhow, Result};
use chrono::Utc;
use clap::{Args, Subcommand};
use colored::Colorize;
use pagesmith_store::{import_project, Exporter, ProjectRecord, WriterSink};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct StoreArgs {
    #[command(subcommand)]
    pub command: StoreCommand,
}

#[derive(Debug, Subcommand)]
pub enum StoreCommand {
    /// List saved projects, most recently updated first
    List,

    /// Find projects by name, description or tag
    Search { query: String },

    /// Show record count and space used
    Stats,

    /// Save a project file into the store
    Save { file: String },

    /// Write a stored project out as a project file
    Load {
        id: String,

        /// Destination file (defaults to <id>.page.json)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Remove a stored project
    Delete { id: String },

    /// Back up a stored project
    Export {
        id: String,

        /// Backup directory
        #[arg(short, long, default_value = "backups")]
        dir: String,

        /// Write the JSON to stdout instead
        #[arg(long)]
        stdout: bool,
    },

    /// Restore a backup (JSON or base64 data URI) into the store
    Import { file: String },
}

fn print_record(record: &ProjectRecord) {
    let tags = if record.tags.is_empty() {
        String::new()
    } else {
        format!(" [{}]", record.tags.join(", "))
    };
    println!(
        "  {} {} v{} · {} elements · updated {}{}",
        record.id.dimmed(),
        record.name.bright_white(),
        record.version,
        record.element_count(),
        record.updated_at.format("%Y-%m-%d %H:%M"),
        tags.cyan()
    );
}

pub fn store(args: StoreArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let mut store = config.open_store(cwd)?;

    match args.command {
        StoreCommand::List => {
            let records = store.list()?;
            if records.is_empty() {
                println!("{}", "No saved projects".dimmed());
            }
            for record in &records {
                print_record(record);
            }
        }

        StoreCommand::Search { query } => {
            let records = store.search(&query)?;
            println!("Found {} projects matching {:?}", records.len(), query);
            for record in &records {
                print_record(record);
            }
        }

        StoreCommand::Stats => {
            let stats = store.stats()?;
            let percent = if stats.byte_budget == 0 {
                0.0
            } else {
                stats.total_bytes as f64 * 100.0 / stats.byte_budget as f64
            };
            println!("Projects:      {}", stats.count);
            println!("Updated (7d):  {}", stats.recent);
            println!(
                "Space used:    {} / {} bytes ({:.1}%)",
                stats.total_bytes, stats.byte_budget, percent
            );
        }

        StoreCommand::Save { file } => {
            let record = read_project(&PathBuf::from(cwd).join(&file))?;
            let saved = store.save(&record)?;
            println!(
                "{} Saved {} as {} (v{})",
                "✓".green(),
                saved.name.bright_white(),
                saved.id,
                saved.version
            );
        }

        StoreCommand::Load { id, output } => {
            let record = store
                .load(&id)?
                .ok_or_else(|| anyhow!("No saved project with id {}", id))?;
            let output = PathBuf::from(cwd).join(output.unwrap_or_else(|| format!("{}.page.json", id)));
            write_project(&output, &record)?;
            println!("{} Wrote {}", "✓".green(), output.display());
        }

        StoreCommand::Delete { id } => {
            if store.delete(&id)? {
                println!("{} Deleted {}", "✓".green(), id);
            } else {
                println!("{} No saved project with id {}", "⚠️".yellow(), id);
            }
        }

        StoreCommand::Export { id, dir, stdout } => {
            let record = store
                .load(&id)?
                .ok_or_else(|| anyhow!("No saved project with id {}", id))?;
            let mut exporter = if stdout {
                Exporter::new().with_sink(WriterSink::new(std::io::stdout(), "stdout"))
            } else {
                // stdout is the last resort when neither file can be written
                Exporter::to_dir(PathBuf::from(cwd).join(dir))
                    .with_sink(WriterSink::new(std::io::stdout(), "stdout"))
            };
            let delivery = exporter.export(&record, Utc::now())?;
            if !stdout {
                println!(
                    "{} Exported via {} → {}",
                    "✓".green(),
                    delivery.sink,
                    delivery.location
                );
            }
        }

        StoreCommand::Import { file } => {
            let text = fs::read_to_string(PathBuf::from(cwd).join(&file))?;
            let record = import_project(&text)?;
            let saved = store.save(&record)?;
            println!(
                "{} Imported {} as {}",
                "✓".green(),
                saved.name.bright_white(),
                saved.id
            );
        }
    }

    Ok(())
}
