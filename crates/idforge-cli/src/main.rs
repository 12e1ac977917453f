mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use cmd::{
    activity::ActivitySubcommand, config::ConfigSubcommand, ibo::IboSubcommand,
    persona::PersonaSubcommand, session::SessionSubcommand,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "idforge",
    about = "Instructional design authoring: personas, sessions, IBO outlines, and 4C activities",
    version,
    propagate_version = true
)]
struct Cli {
    /// Project root (default: auto-detect from .idforge/ or .git/)
    #[arg(long, global = true, env = "IDFORGE_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize idforge in the current project
    Init {
        /// Project name (defaults to the root directory name)
        #[arg(long)]
        name: Option<String>,
    },

    /// Manage learner personas
    Persona {
        #[command(subcommand)]
        subcommand: PersonaSubcommand,
    },

    /// Manage training sessions and step through the design workflow
    Session {
        #[command(subcommand)]
        subcommand: SessionSubcommand,
    },

    /// Format, explain, and draft Intended Business Outcomes
    Ibo {
        #[command(subcommand)]
        subcommand: IboSubcommand,
    },

    /// Manage 4C activities on a session
    Activity {
        #[command(subcommand)]
        subcommand: ActivitySubcommand,
    },

    /// Validate the project configuration
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
}

fn main() {
    let cli = Cli::parse();

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
        Commands::Init { name } => cmd::init::run(&root, name.as_deref(), cli.json),
        Commands::Persona { subcommand } => cmd::persona::run(&root, subcommand, cli.json),
        Commands::Session { subcommand } => cmd::session::run(&root, subcommand, cli.json),
        Commands::Ibo { subcommand } => cmd::ibo::run(&root, subcommand, cli.json),
        Commands::Activity { subcommand } => cmd::activity::run(&root, subcommand, cli.json),
        Commands::Config { subcommand } => cmd::config::run(&root, subcommand, cli.json),
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
