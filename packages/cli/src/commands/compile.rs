use crate::config::Config;
use crate::project::{find_project_files, is_project_file, project_stem, read_project};
use anyhow::{anyhow, Result};
use clap::Args;
use colored::Colorize;
use pagesmith_compiler_html::compile_document;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Args)]
pub struct CompileArgs {
    /// Project file or directory (defaults to the configured source directory)
    pub path: Option<String>,

    /// Output to stdout instead of files
    #[arg(long)]
    pub stdout: bool,

    /// Output directory (overrides config)
    #[arg(short, long)]
    pub out_dir: Option<String>,

    /// Emit compact HTML without indentation
    #[arg(long)]
    pub minify: bool,
}

pub fn compile(args: CompileArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let input = match &args.path {
        Some(path) => PathBuf::from(cwd).join(path),
        None => config.get_src_dir(cwd),
    };

    if !input.exists() {
        return Err(anyhow!("Path does not exist: {:?}", input));
    }

    let project_files = if input.is_file() {
        vec![input.clone()]
    } else {
        find_project_files(&input)?
    };

    if project_files.is_empty() {
        println!("{}", "⚠️  No .page.json files found".yellow());
        return Ok(());
    }

    if !args.stdout {
        println!("{}", "🔨 Compiling Pagesmith projects...".bright_blue().bold());
        println!("Found {} files", project_files.len());
    }

    let out_dir = match &args.out_dir {
        Some(dir) => PathBuf::from(cwd).join(dir),
        None => config.get_out_dir(cwd),
    };

    let mut success_count = 0;
    let mut error_count = 0;

    for project_file in &project_files {
        let relative_path = project_file.strip_prefix(&input).unwrap_or(project_file);
        match compile_file(project_file, &args, &config, &out_dir) {
            Ok(output_path) => {
                success_count += 1;
                if !args.stdout {
                    println!(
                        "  {} {} → {}",
                        "✓".green(),
                        relative_path.display(),
                        output_path
                    );
                }
            }
            Err(e) => {
                error_count += 1;
                eprintln!(
                    "  {} {} - {}",
                    "✗".red(),
                    relative_path.display(),
                    e.to_string().red()
                );
            }
        }
    }

    if args.stdout {
        return if error_count == 0 {
            Ok(())
        } else {
            Err(anyhow!("{} projects failed to compile", error_count))
        };
    }

    println!();
    if error_count == 0 {
        println!(
            "{} Compiled {} projects successfully",
            "✅".green(),
            success_count
        );
        Ok(())
    } else {
        println!(
            "{} Compiled {} projects, {} errors",
            "⚠️".yellow(),
            success_count,
            error_count
        );
        Err(anyhow!("{} projects failed to compile", error_count))
    }
}

fn compile_file(path: &Path, args: &CompileArgs, config: &Config, out_dir: &Path) -> Result<String> {
    if !is_project_file(path) && path.extension().map_or(true, |e| e != "json") {
        return Err(anyhow!("not a project file"));
    }

    let project = read_project(path)?;
    let mut options = config.export.options(&project.name);
    options.pretty = !args.minify;

    let html = compile_document(&project.sections, &options)?;

    if args.stdout {
        println!("{}", html);
        return Ok("stdout".to_string());
    }

    fs::create_dir_all(out_dir)?;
    let output_path = out_dir.join(format!("{}.html", project_stem(path)));
    fs::write(&output_path, html)?;
    Ok(output_path.display().to_string())
}
