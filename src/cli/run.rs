use std::{path::PathBuf, sync::Arc};

use anyhow::Result;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::{
    chart::{terminal::TerminalChart, Visualizer},
    projects::{registry::ProjectRegistry, store::FileStore},
    session::{
        attention::TerminalAttention, confirmation::PromptConfirmation,
        countdown::TerminalCountdown, input::LineInput, shutdown::detect_shutdown, Session,
    },
    timer::{IntervalTimer, TimerConfig, DEFAULT_BREAK_MINUTES, DEFAULT_WORK_MINUTES},
    utils::clock::DefaultClock,
};

#[derive(Debug, clap::Args)]
pub struct RunCommand {
    #[arg(long, short, help = "Project to record time for. Defaults to the first project")]
    pub project: Option<String>,
    #[arg(
        long,
        short,
        default_value_t = DEFAULT_WORK_MINUTES,
        value_parser = clap::value_parser!(u32).range(1..),
        help = "Length of a work session in minutes"
    )]
    pub work_minutes: u32,
    #[arg(
        long,
        short,
        default_value_t = DEFAULT_BREAK_MINUTES,
        value_parser = clap::value_parser!(u32).range(1..),
        help = "Length of a break in minutes"
    )]
    pub break_minutes: u32,
    #[arg(long, help = "Disable colors in the chart")]
    pub no_color: bool,
    #[arg(long, help = "Show a desktop notification when a session ends")]
    pub desktop_notify: bool,
}

/// Runs an interactive session on stdin/stdout until the user quits.
pub async fn process_run_command(
    RunCommand {
        project,
        work_minutes,
        break_minutes,
        no_color,
        desktop_notify,
    }: RunCommand,
    app_dir: PathBuf,
) -> Result<()> {
    let mut registry = ProjectRegistry::load(FileStore::new(app_dir)?).await?;
    match project {
        Some(name) => {
            if !registry.totals().contains(&name) {
                warn!("Project {name:?} doesn't exist");
                println!("Project {name:?} doesn't exist yet, use `add {name}` to create it");
            }
            registry.select_active(name);
        }
        None => registry.select_default(),
    }

    let config = TimerConfig::from_minutes(work_minutes, break_minutes);
    info!("Starting session with {config:?}");

    let input = Arc::new(LineInput::stdin());
    let chart = TerminalChart::new(std::io::stdout())
        .with_color(!no_color)
        .with_clear_screen(true);

    let mut session = Session::new(
        registry,
        IntervalTimer::new(config),
        Visualizer::new(chart),
        Box::new(PromptConfirmation::new(input.clone())),
        Box::new(TerminalAttention::new(desktop_notify)),
        Box::new(TerminalCountdown::new(std::io::stdout())),
        Arc::new(DefaultClock),
    );
    session.print_help();

    let shutdown = CancellationToken::new();
    tokio::spawn(detect_shutdown(shutdown.clone()));

    let result = session.run(input, shutdown.clone()).await;
    shutdown.cancel();
    result
}
