mod commands;
mod config;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use config::Config;

#[derive(Debug, Parser)]
#[command(name = "loco", about = "Loco: layered skills, agents, hooks, and plans")]
struct Cli {
    /// Project root; defaults to the current directory
    #[arg(long, global = true)]
    project: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List discovered skills across all layers
    Skills,
    /// List discovered agents across all layers
    Agents,
    /// Inspect or run configured lifecycle hooks
    Hooks {
        #[command(subcommand)]
        command: HooksCommand,
    },
    /// List saved plans
    Plans,
    /// Show one plan
    Plan {
        /// Plan id
        id: String,
    },
    /// Print the commit message prompt for current changes
    CommitPrompt,
    /// Print the PR description prompt for the current branch
    PrPrompt {
        /// Base branch to diff against (defaults to config)
        #[arg(long)]
        base: Option<String>,
    },
    /// Render a markdown report from a saved cost profile
    UsageReport {
        /// Path to a profile JSON file
        path: PathBuf,
    },
}

#[derive(Debug, Subcommand)]
enum HooksCommand {
    /// List configured hooks per event
    List,
    /// Run the hooks for a session event
    Run {
        /// Which session event to fire
        #[arg(value_enum)]
        event: SessionEvent,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SessionEvent {
    Start,
    End,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load()?;
    loco_logging::init_logging(&config.logging.level, config.logging.json)?;

    let project_root = match cli.project {
        Some(path) => path,
        None => std::env::current_dir()?,
    };

    match cli.command {
        Commands::Skills => commands::list_skills(&project_root),
        Commands::Agents => commands::list_agents(&project_root),
        Commands::Hooks { command } => match command {
            HooksCommand::List => commands::list_hooks(&project_root),
            HooksCommand::Run { event } => {
                let event = match event {
                    SessionEvent::Start => loco_hooks::HookEvent::SessionStart,
                    SessionEvent::End => loco_hooks::HookEvent::SessionEnd,
                };
                commands::run_session_hooks(&project_root, event).await
            }
        },
        Commands::Plans => commands::list_plans(),
        Commands::Plan { id } => commands::show_plan(&id),
        Commands::CommitPrompt => commands::commit_prompt(&project_root),
        Commands::PrPrompt { base } => {
            let base = base.unwrap_or(config.git.base_branch);
            commands::pr_prompt(&project_root, &base)
        }
        Commands::UsageReport { path } => commands::usage_report(&path),
    }
}
