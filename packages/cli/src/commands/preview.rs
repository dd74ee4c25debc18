use crate::config::Config;
use crate::project::read_project;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use pagesmith_compiler_html::preview as write_preview;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct PreviewArgs {
    /// Project file to preview
    pub file: String,
}

pub fn preview(args: PreviewArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let project = read_project(&PathBuf::from(cwd).join(&args.file))?;

    let path = write_preview(&project.sections, &config.export.options(&project.name))?;

    println!("{} Preview written", "👀".bright_blue());
    println!("   {}", path.display().to_string().bright_white());
    println!("   Open it in a browser to try the exported page.");
    Ok(())
}
