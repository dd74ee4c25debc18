use crate::config::{Config, DEFAULT_CONFIG_NAME, PROJECT_SUFFIX};
use crate::project::write_project;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use pagesmith_model::{Element, ElementType, Section, Sections, Size};
use pagesmith_store::ProjectRecord;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Name of the starter project
    #[arg(short, long, default_value = "My Site")]
    pub name: String,

    /// Directory for project files
    #[arg(short, long, default_value = "pages")]
    pub src_dir: String,

    /// Force overwrite existing config
    #[arg(short, long)]
    pub force: bool,
}

fn starter_project(name: &str) -> ProjectRecord {
    let home = Section::home("home", "Home").with_elements(vec![
        Arc::new(
            Element::new("home-heading", ElementType::Heading)
                .with_prop("content", "Hello World")
                .with_prop("level", 1)
                .with_position(80.0, 80.0)
                .with_size(Size::auto()),
        ),
        Arc::new(
            Element::new("home-cta", ElementType::Button)
                .with_prop("text", "Contact us")
                .with_prop("sectionId", "contact")
                .with_position(80.0, 200.0),
        ),
    ]);
    let contact = Section::new("contact", "Contact").with_elements(vec![Arc::new(
        Element::new("contact-form", ElementType::ContactForm)
            .with_prop("title", "Get in touch")
            .with_position(80.0, 80.0),
    )]);

    let sections: Sections = [home, contact]
        .into_iter()
        .map(|section| (section.id.clone(), section))
        .collect();
    ProjectRecord::new(name, sections)
}

pub fn init(args: InitArgs, cwd: &str) -> Result<()> {
    let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

    // Check if config already exists
    if config_path.exists() && !args.force {
        println!(
            "{} {} already exists",
            "⚠️".yellow(),
            DEFAULT_CONFIG_NAME.bright_white()
        );
        println!("Use --force to overwrite");
        return Ok(());
    }

    println!(
        "{}",
        "📝 Initializing Pagesmith project...".bright_blue().bold()
    );

    let config = Config {
        src_dir: args.src_dir.clone(),
        ..Config::default()
    };

    let src_dir = config.get_src_dir(cwd);
    if !src_dir.exists() {
        fs::create_dir_all(&src_dir)?;
        println!("  {} Created {}/", "✓".green(), args.src_dir);
    }

    let project_file = src_dir.join(format!("home{}", PROJECT_SUFFIX));
    if !project_file.exists() {
        write_project(&project_file, &starter_project(&args.name))?;
        println!("  {} Created home{}", "✓".green(), PROJECT_SUFFIX);
    }

    let config_json = serde_json::to_string_pretty(&config)?;
    fs::write(&config_path, config_json)?;

    println!("  {} Created {}", "✓".green(), DEFAULT_CONFIG_NAME);
    println!();
    println!("{}", "✅ Project initialized!".green().bold());
    println!();
    println!("Next steps:");
    println!("  1. Edit {}/home{}", args.src_dir, PROJECT_SUFFIX);
    println!("  2. Run: pagesmith compile");
    println!("  3. Check output in {}/", config.out_dir);

    Ok(())
}
