mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use cmd::{config::ConfigSubcommand, hook::HookSubcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "harness",
    about = "Agent harness hooks: one-feature-at-a-time enforcement, session context and checkpoint reminders",
    version,
    propagate_version = true
)]
struct Cli {
    /// Working directory (default: current directory)
    #[arg(long, global = true, env = "CLAUDE_WORKING_DIRECTORY")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a lifecycle hook: reads the event payload on stdin, writes the response on stdout
    Hook {
        #[command(subcommand)]
        event: HookSubcommand,
    },

    /// Show harness state and the feature checklist
    Status,

    /// Inspect the harness configuration
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
}

fn main() {
    let cli = Cli::parse();

    // stdout is the hook response channel; logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let root = root::resolve_root(cli.root.as_deref());

    let result = match cli.command {
        Commands::Hook { event } => {
            // The host reads the payload, never the exit status.
            if let Err(e) = cmd::hook::run(&root, event) {
                tracing::error!("hook output failed: {e:#}");
            }
            return;
        }
        Commands::Status => cmd::status::run(&root, cli.json),
        Commands::Config { subcommand } => cmd::config::run(&root, subcommand, cli.json),
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
