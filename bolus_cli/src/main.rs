use clap::Parser;
use eyre::Result;

mod cli;
mod dose;
mod error_fmt;
mod logging;

use bolus_core::DosingSettings;
use cli::{Cli, Commands, JSON_MODE};
use error_fmt::{exit_code_for_error, format_error_json, humanize};

fn main() {
    if let Err(e) = color_eyre::install() {
        eprintln!("failed to install error handler: {e}");
    }
    let cli = Cli::parse();
    let _ = JSON_MODE.set(cli.json);

    if let Err(err) = run(cli) {
        if JSON_MODE.get().copied().unwrap_or(false) {
            eprintln!("{}", format_error_json(&err));
        } else {
            eprintln!("{}", humanize(&err));
        }
        std::process::exit(exit_code_for_error(&err));
    }
}

fn run(cli: Cli) -> Result<()> {
    let cfg = match &cli.config {
        Some(path) => bolus_config::load_file(path)?,
        None => bolus_config::Config::default(),
    };
    // Held until the command finishes so the file layer flushes.
    let _log_guard = logging::init(cli.json, cli.log_level.as_deref(), &cfg.logging)?;
    tracing::debug!(config = ?cli.config, "profile loaded");

    cfg.validate()?;
    let settings = DosingSettings::try_from(&cfg)?;
    settings.validate()?;

    let rendered = match cli.cmd {
        Commands::Dose {
            meal,
            carbs,
            bg,
            iob,
            high_fat_protein,
            tags,
        } => dose::run_dose(&settings, meal, carbs, bg, iob, high_fat_protein, tags)?,
        Commands::Correction { bg, iob } => dose::run_correction(&settings, bg, iob)?,
        Commands::Isf { tdd, unit } => dose::run_isf(tdd, unit.unwrap_or(settings.unit_mode))?,
        Commands::Carbs {
            per_100,
            portion,
            alcohol,
        } => dose::run_carbs(per_100, portion, alcohol),
        Commands::SelfCheck => dose::run_self_check(&settings),
    };

    let out = rendered.into_output(cli.json);
    if cli.json {
        println!("{out}");
    } else {
        print!("{out}");
    }
    Ok(())
}
