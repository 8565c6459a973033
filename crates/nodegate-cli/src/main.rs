//! nodegate CLI - encode, decode and resolve opaque global IDs.

use clap::{Parser, Subcommand};
use nodegate_canonical::Namespace;

mod commands;
mod config;
mod output;

use commands::fetch::FetchArgs;
use commands::{decode, encode, fetch, kinds};
use config::{Config, DEFAULT_LOG_LEVEL};

#[derive(Parser)]
#[command(name = "nodegate")]
#[command(about = "Global object identification and capability-gated node resolution")]
struct Cli {
    /// Log filter, e.g. "nodegate_graph=debug" (overrides NODEGATE_LOG)
    #[arg(long, global = true)]
    log: Option<String>,
    /// Log format: text or json (overrides NODEGATE_LOG_FORMAT)
    #[arg(long, global = true)]
    log_format: Option<String>,
    /// Longest accepted global ID (overrides NODEGATE_MAX_ID_LEN)
    #[arg(long, global = true)]
    max_id_len: Option<usize>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode a resource tag and components into a global ID
    Encode {
        /// Resource tag, e.g. "check"
        tag: String,
        /// Natural key components, in order
        components: Vec<String>,
        /// Namespace of the object
        #[arg(long, default_value = Namespace::DEFAULT)]
        namespace: String,
    },
    /// Decode a global ID
    Decode {
        /// Opaque global ID
        id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List registered node kinds
    Kinds {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Fetch a node from a fixture as a given user
    Fetch {
        /// Fixture JSON file (entities, checks, events, role_bindings)
        fixture: String,
        /// Opaque global ID
        id: String,
        /// Username of the caller
        #[arg(long)]
        user: String,
        /// Group of the caller (repeatable)
        #[arg(long = "group")]
        groups: Vec<String>,
        /// Print the stored object instead of its resolved fields
        #[arg(long)]
        raw: bool,
        /// Abandon the request after this many milliseconds
        #[arg(long)]
        timeout_ms: Option<u64>,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = Config::from_env()
        .and_then(|config| config.with_overrides(cli.log, cli.log_format, cli.max_id_len))
        .map_err(Box::<dyn std::error::Error>::from)
        .and_then(|config| {
            init_tracing(&config);
            run(cli.command, &config)
        });

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(command: Commands, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::Encode {
            tag,
            components,
            namespace,
        } => encode::run(tag, components, namespace),
        Commands::Decode { id, json } => decode::run(id, json, config),
        Commands::Kinds { json } => kinds::run(json, config),
        Commands::Fetch {
            fixture,
            id,
            user,
            groups,
            raw,
            timeout_ms,
        } => fetch::run(
            FetchArgs {
                fixture,
                id,
                user,
                groups,
                raw,
                timeout_ms,
            },
            config,
        ),
    }
}

fn init_tracing(config: &Config) {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let directive = config.log_directive(std::env::var(EnvFilter::DEFAULT_ENV).ok());
    let filter = EnvFilter::try_new(&directive)
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL));

    let subscriber = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_writer(std::io::stderr);

    if config.log_format == "json" {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
}
