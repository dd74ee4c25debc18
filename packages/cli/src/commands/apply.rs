use crate::config::Config;
use crate::project::{read_project, write_project};
use anyhow::{anyhow, Result};
use clap::Args;
use colored::Colorize;
use pagesmith_editor::{Command, Editor, Outcome};
use std::fs;
use std::io::Read;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct ApplyArgs {
    /// Project file to edit
    pub project: String,

    /// Commands as a JSON array or one JSON command per line ("-" for stdin)
    pub commands: String,

    /// Write the result here instead of back into the project file
    #[arg(short, long)]
    pub output: Option<String>,

    /// Show what would happen without writing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Apply identical adds even when they arrive back to back
    #[arg(long)]
    pub no_debounce: bool,
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct ApplySummary {
    pub applied: usize,
    pub unchanged: usize,
    pub debounced: usize,
    pub rejected: usize,
}

/// Split a command script into individual payloads
pub fn split_payloads(script: &str) -> Result<Vec<String>> {
    let trimmed = script.trim();
    if trimmed.starts_with('[') {
        let items: Vec<serde_json::Value> = serde_json::from_str(trimmed)?;
        Ok(items.iter().map(|item| item.to_string()).collect())
    } else {
        Ok(trimmed
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with("//"))
            .map(str::to_string)
            .collect())
    }
}

/// Dispatch every payload in order, reporting each outcome
pub fn run_payloads(editor: &mut Editor, payloads: &[String]) -> ApplySummary {
    let mut summary = ApplySummary::default();

    for (index, payload) in payloads.iter().enumerate() {
        let step = format!("#{}", index + 1).dimmed();
        match editor.dispatch_payload(payload) {
            Ok(Outcome::Applied) => {
                summary.applied += 1;
                println!("  {} {} applied", "✓".green(), step);
            }
            Ok(Outcome::Unchanged) => {
                summary.unchanged += 1;
                println!("  {} {} no change", "·".dimmed(), step);
            }
            Ok(Outcome::Debounced) => {
                summary.debounced += 1;
                println!("  {} {} duplicate add ignored", "·".yellow(), step);
            }
            Err(e) => {
                summary.rejected += 1;
                eprintln!("  {} {} {}", "✗".red(), step, e.to_string().red());
            }
        }
    }

    summary
}

pub fn apply(args: ApplyArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let project_path = PathBuf::from(cwd).join(&args.project);
    let mut project = read_project(&project_path)?;

    let script = if args.commands == "-" {
        let mut buffer = String::new();
        std::io::stdin().read_to_string(&mut buffer)?;
        buffer
    } else {
        fs::read_to_string(PathBuf::from(cwd).join(&args.commands))?
    };
    let payloads = split_payloads(&script)?;
    if payloads.is_empty() {
        return Err(anyhow!("No commands found in {}", args.commands));
    }

    let mut editor_config = config.editor.clone();
    if args.no_debounce {
        editor_config.add_debounce_ms = 0;
    }
    let mut editor = Editor::new(editor_config);
    editor.dispatch(Command::LoadProject {
        sections: project.sections.clone(),
        active_section: None,
    })?;

    println!(
        "{} {} commands to {}",
        "✏️".bright_blue(),
        payloads.len(),
        project.name.bright_white()
    );
    let summary = run_payloads(&mut editor, &payloads);

    println!();
    println!(
        "{} applied, {} unchanged, {} ignored, {} rejected",
        summary.applied.to_string().green(),
        summary.unchanged,
        summary.debounced,
        summary.rejected.to_string().red()
    );

    if args.dry_run {
        println!("{}", "(dry run, nothing written)".dimmed());
        return Ok(());
    }

    project.sections = editor.sections().clone();
    let output = match &args.output {
        Some(path) => PathBuf::from(cwd).join(path),
        None => project_path,
    };
    write_project(&output, &project)?;
    println!("{} Wrote {}", "✅".green(), output.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagesmith_editor::EditorConfig;
    use pagesmith_model::{Section, Sections};

    fn editor() -> Editor {
        let mut editor = Editor::new(EditorConfig::default().with_session_key("apply-test"));
        let home = Section::home("home", "Home");
        let sections: Sections = [(home.id.clone(), home)].into_iter().collect();
        editor
            .dispatch(Command::LoadProject {
                sections,
                active_section: None,
            })
            .unwrap();
        editor
    }

    #[test]
    fn test_split_array_and_lines() {
        let array = split_payloads(r#"[{"type":"undo"},{"type":"redo"}]"#).unwrap();
        assert_eq!(array, vec![r#"{"type":"undo"}"#, r#"{"type":"redo"}"#]);

        let lines = split_payloads("{\"type\":\"undo\"}\n\n// comment\n{\"type\":\"redo\"}\n").unwrap();
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn test_run_reports_each_outcome() {
        let mut editor = editor();
        let add = r#"{"type":"addElement","element":{"id":"x","type":"heading","props":{"content":"Hi"}}}"#;
        let payloads = vec![
            add.to_string(),
            add.to_string(),
            r#"{"type":"deleteElement","id":"missing"}"#.to_string(),
            "not json".to_string(),
        ];

        let summary = run_payloads(&mut editor, &payloads);
        assert_eq!(
            summary,
            ApplySummary {
                applied: 1,
                unchanged: 1,
                debounced: 1,
                rejected: 1,
            }
        );
        assert_eq!(editor.elements().len(), 1);
    }
}
