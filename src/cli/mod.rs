pub mod projects;
pub mod run;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use projects::{process_add_command, process_stats_command, StatsCommand};
use run::{process_run_command, RunCommand};
use tracing::level_filters::LevelFilter;

use crate::utils::{
    dir::{create_application_default_path, create_dir},
    logging::{enable_logging, LOG_PREFIX},
};

#[derive(Parser, Debug)]
#[command(name = "pomotrack", version, long_about = None)]
#[command(about = "Pomodoro timer that tracks time spent per project", long_about = None)]
pub struct Args {
    #[command(subcommand)]
    commands: Commands,
    #[arg(long, global = true, help = "Enable trace logging and mirror it to stdout")]
    log: bool,
    #[arg(
        long,
        global = true,
        help = "Application directory. By default tries to save into $XDG_STATE_HOME or $HOME/.local/state"
    )]
    dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(about = "Start an interactive pomodoro session")]
    Run {
        #[command(flatten)]
        command: RunCommand,
    },
    #[command(about = "Create a new project")]
    Add {
        #[arg(help = "Name of the project")]
        name: String,
    },
    #[command(about = "Show hours spent on every project")]
    Stats {
        #[command(flatten)]
        command: StatsCommand,
    },
}

pub async fn run_cli() -> Result<()> {
    let args = Args::parse();

    let app_dir = args
        .dir
        .map_or_else(create_application_default_path, create_dir)?;

    let logging_level = if args.log {
        Some(LevelFilter::TRACE)
    } else {
        None
    };
    enable_logging(LOG_PREFIX, &app_dir, logging_level, args.log)?;

    match args.commands {
        Commands::Run { command } => process_run_command(command, app_dir).await,
        Commands::Add { name } => process_add_command(&name, app_dir).await,
        Commands::Stats { command } => process_stats_command(command, app_dir).await,
    }
}
