use crate::config::Config;
use crate::dates::DisplayFormat;
use crate::model::{Role, SystemClock};
use crate::session::Session;
use clap::{ArgAction, Parser};
use eyre::{Result, WrapErr};
use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;
use tracing::{Level, info};

mod checks;
mod config;
mod dates;
mod display;
mod model;
mod seed;
mod session;
mod stats;
mod transitions;
mod views;

#[derive(Parser)]
#[command(version, about)]
struct Args {
    /// Use FILE instead of projectflow.toml
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Read commands from FILE instead of the standard input
    #[arg(short, long, value_name = "FILE")]
    script: Option<PathBuf>,
    /// Start the session as ROLE
    #[arg(short, long)]
    role: Option<Role>,
    /// Override the configured date format
    #[arg(long, value_enum)]
    date_format: Option<DisplayFormat>,
    /// Set verbosity level
    #[arg(short, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();
    let level = match args.verbose {
        0 => Level::ERROR,
        1 => Level::WARN,
        2 => Level::INFO,
        3 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();
    let mut config = Config::load_or_default(args.config.as_deref())?;
    if let Some(role) = args.role {
        config.session.initial_role = role;
    }
    if let Some(format) = args.date_format {
        config.display.date_format = format;
    }
    let mut session = Session::new(config, Box::new(SystemClock));
    info!(role = %session.current_role(), "session started");
    let mut out = io::stdout().lock();
    match &args.script {
        Some(path) => {
            let file = File::open(path)
                .wrap_err_with(|| format!("cannot open script {}", path.display()))?;
            session.run(BufReader::new(file), &mut out)?;
        }
        None => session.run(io::stdin().lock(), &mut out)?,
    }
    info!(
        projects = session.store().list().len(),
        role = %session.current_role(),
        "session ended"
    );
    Ok(())
}
