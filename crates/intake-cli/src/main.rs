mod cmd;
mod output;
mod root;

use anyhow::Context;
use clap::{Parser, Subcommand};
use cmd::config::ConfigSubcommand;
use intake_core::catalog::{BrowseQuery, BrowseSort};
use intake_core::config::EngineConfig;
use intake_core::session::SessionContext;
use intake_core::types::{AccountType, ServiceCategory};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(
    name = "intake",
    about = "Service request intake: score how well-specified a request is, by form or by chat",
    version,
    propagate_version = true
)]
struct Cli {
    /// Engine config file (default: nearest .intake/config.yaml, else built-in defaults)
    #[arg(long, global = true, env = "INTAKE_CONFIG")]
    config: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    /// Display name used when greeting
    #[arg(long, global = true, env = "INTAKE_USER_NAME", default_value = "")]
    name: String,

    /// Account type: buyer or provider
    #[arg(long, global = true, default_value = "buyer")]
    account: AccountType,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Talk to the request assistant (reads messages from stdin)
    Chat {
        /// Deliver replies immediately instead of simulating typing
        #[arg(long)]
        no_delay: bool,
    },

    /// Send a single message to the assistant and print the reply
    Ask {
        /// Message text (may be empty when attaching files)
        #[arg(default_value = "")]
        text: String,

        /// Starting completeness score
        #[arg(long, default_value_t = 0, value_parser = clap::value_parser!(u8).range(0..=100))]
        score: u8,

        /// Attach a file (repeatable)
        #[arg(long = "attach")]
        attach: Vec<PathBuf>,
    },

    /// Fill in a request form and compute its completeness
    Form {
        /// Set a field, e.g. --set title="Leaking pipe" (repeatable)
        #[arg(long = "set", value_name = "FIELD=VALUE")]
        set: Vec<String>,

        /// Pick the category from the standard list
        #[arg(long)]
        category: Option<ServiceCategory>,

        /// Attach a file (repeatable)
        #[arg(long = "attach")]
        attach: Vec<PathBuf>,

        /// Remove the attachment at this position after attaching (repeatable)
        #[arg(long = "detach", value_name = "INDEX")]
        detach: Vec<usize>,

        /// Print the request summary
        #[arg(long)]
        analyze: bool,

        /// Write the finished request to this YAML file
        #[arg(long)]
        submit: Option<PathBuf>,
    },

    /// Browse service providers
    Browse {
        /// Search name, description, and category
        #[arg(long)]
        query: Option<String>,

        /// Exact category, e.g. "Home Repair"
        #[arg(long)]
        category: Option<String>,

        /// Only verified providers
        #[arg(long)]
        verified: bool,

        /// relevance, rating-high, price-low, price-high, or distance
        #[arg(long, default_value = "relevance")]
        sort: BrowseSort,

        /// Catalog YAML (default: bundled sample data)
        #[arg(long)]
        catalog: Option<PathBuf>,
    },

    /// Show one provider's details
    Provider {
        id: String,

        #[arg(long)]
        catalog: Option<PathBuf>,
    },

    /// List conversations with providers, or open one by id (reads messages from stdin)
    Messages {
        /// Conversation to open
        id: Option<String>,

        #[arg(long, conflicts_with = "id")]
        query: Option<String>,

        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Deliver replies immediately instead of simulating typing
        #[arg(long)]
        no_delay: bool,
    },

    /// List match candidates by compatibility
    Matches {
        #[arg(long)]
        catalog: Option<PathBuf>,
    },

    /// Inspect and validate the engine configuration
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = match &cli.command {
        Commands::Chat { .. } => tracing::Level::INFO,
        _ => tracing::Level::WARN,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli) {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

fn load_config(path: &Path) -> anyhow::Result<EngineConfig> {
    EngineConfig::load_or_default(path)
        .with_context(|| format!("failed to load config from {}", path.display()))
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config_path = root::resolve_config_path(cli.config.as_deref());
    let session = SessionContext::new(cli.name, cli.account);

    match cli.command {
        Commands::Chat { no_delay } => {
            cmd::chat::run(load_config(&config_path)?, session, no_delay, cli.json)
        }
        Commands::Ask {
            text,
            score,
            attach,
        } => cmd::ask::run(
            load_config(&config_path)?,
            session,
            &text,
            score,
            &attach,
            cli.json,
        ),
        Commands::Form {
            set,
            category,
            attach,
            detach,
            analyze,
            submit,
        } => cmd::form::run(
            load_config(&config_path)?,
            cmd::form::FormArgs {
                set,
                category,
                attach,
                detach,
                analyze,
                submit,
            },
            cli.json,
        ),
        Commands::Browse {
            query,
            category,
            verified,
            sort,
            catalog,
        } => cmd::browse::run_browse(
            catalog.as_deref(),
            BrowseQuery {
                text: query,
                category,
                verified_only: verified,
                sort,
            },
            cli.json,
        ),
        Commands::Provider { id, catalog } => {
            cmd::browse::run_provider(catalog.as_deref(), &id, cli.json)
        }
        Commands::Messages {
            id: Some(id),
            catalog,
            no_delay,
            ..
        } => cmd::browse::run_thread(
            catalog.as_deref(),
            &id,
            load_config(&config_path)?,
            no_delay,
            cli.json,
        ),
        Commands::Messages {
            id: None,
            query,
            catalog,
            ..
        } => cmd::browse::run_messages(catalog.as_deref(), query.as_deref(), cli.json),
        Commands::Matches { catalog } => cmd::browse::run_matches(catalog.as_deref(), cli.json),
        Commands::Config { subcommand } => cmd::config::run(&config_path, subcommand, cli.json),
    }
}
