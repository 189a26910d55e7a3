use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use dialoguer::{Confirm, Input};
use dirsort::{
    config::{Config, MeasureKind},
    logging, utils, OrganizeError, Organizer,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "dirsort")]
#[command(about = "Sort a directory into folders by file extension and group similar images")]
#[command(version)]
struct Cli {
    /// Directory to organize (prompted for when omitted)
    #[arg(long, value_name = "DIR")]
    dir: Option<String>,

    /// Configuration file (TOML, or JSON with a .json extension)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Dry run (preview only, don't move files)
    #[arg(long)]
    dry_run: bool,

    /// Skip confirmation prompt
    #[arg(short, long)]
    yes: bool,

    /// Don't group images by similarity
    #[arg(long)]
    no_group: bool,

    /// Similarity threshold between 0 and 1 (overrides config)
    #[arg(long)]
    threshold: Option<f64>,

    /// Image comparison measure (overrides config)
    #[arg(long, value_enum)]
    measure: Option<MeasureKind>,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Print the built-in configuration and exit
    #[arg(long)]
    print_default_config: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logger(cli.verbose);

    if cli.print_default_config {
        print!("{}", Config::default().to_toml_string()?);
        return Ok(());
    }

    // Load configuration (falls back to built-in rules if none is found)
    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::load()?,
    };
    if let Some(threshold) = cli.threshold {
        config = config.with_threshold(threshold)?;
    }
    if let Some(measure) = cli.measure {
        config.grouping.measure = measure;
    }

    let dry_run = cli.dry_run || config.organizer.dry_run_default;
    let skip_confirmation = cli.yes || config.organizer.skip_confirmation;

    // Validate the configuration before asking for anything else
    let organizer = Organizer::new(config, !cli.no_group)?;

    let raw_dir = match cli.dir {
        Some(dir) => dir,
        None => Input::<String>::new()
            .with_prompt("Directory to organize")
            .interact_text()
            .map_err(OrganizeError::prompt)?,
    };
    let dir = utils::expand_path(&raw_dir)?;

    if !cli.json {
        println!("Organizing directory: {}", dir.display());
        if organizer.grouping_enabled() {
            println!(
                "🔍 Grouping images by similarity ({:?}, threshold {})",
                organizer.config().grouping.measure,
                organizer.config().grouping.threshold
            );
        }
    }

    let pb = if cli.json {
        ProgressBar::hidden()
    } else {
        let pb = ProgressBar::new(0);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} images ({msg})")
                .context("Invalid progress bar template")?
                .progress_chars("#>-"),
        );
        pb
    };

    let plan = organizer.plan(&dir, &pb)?;

    if plan.is_empty() {
        if !cli.json {
            println!("\n✓ Nothing to move.");
        }
    } else if !cli.json {
        println!("\n{}", plan);
    }

    // Confirm if not auto-yes
    if !plan.is_empty() && !skip_confirmation && !dry_run {
        let proceed = Confirm::new()
            .with_prompt("Proceed with file reorganization?")
            .default(false)
            .interact()
            .map_err(OrganizeError::prompt)?;

        if !proceed {
            println!("Cancelled.");
            return Ok(());
        }
    }

    let report = organizer.execute(&plan, dry_run)?;

    if cli.json {
        println!("{}", report.to_json()?);
    } else {
        println!("\n{}", report);
        if dry_run {
            println!("Dry run completed. No files were moved.");
        } else if report.has_failures() {
            println!("Finished with some files left in place.");
        } else {
            println!("Files organized successfully!");
        }
    }

    Ok(())
}
