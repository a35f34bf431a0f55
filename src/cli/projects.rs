use std::path::PathBuf;

use anyhow::Result;

use crate::{
    chart::{terminal::TerminalChart, Visualizer},
    projects::{registry::ProjectRegistry, store::FileStore},
};

#[derive(Debug, clap::Args)]
pub struct StatsCommand {
    #[arg(long, help = "Disable colors in the chart")]
    pub no_color: bool,
}

/// Creates a project without starting a session. Existing projects are left as they are.
pub async fn process_add_command(name: &str, app_dir: PathBuf) -> Result<()> {
    let mut registry = ProjectRegistry::load(FileStore::new(app_dir)?).await?;
    if registry.totals().contains(name) {
        println!("Project {name:?} already exists");
        return Ok(());
    }
    registry.add_project(name).await?;
    println!("Added project {name:?}");
    Ok(())
}

/// Prints the hours chart once.
pub async fn process_stats_command(
    StatsCommand { no_color }: StatsCommand,
    app_dir: PathBuf,
) -> Result<()> {
    let registry = ProjectRegistry::load(FileStore::new(app_dir)?).await?;
    let chart = TerminalChart::new(std::io::stdout()).with_color(!no_color);
    Visualizer::new(chart).render(registry.totals())
}
