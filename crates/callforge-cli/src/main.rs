//! # callforge
//!
//! Command-line front end for contract call preparation.
//!
//! ## Usage
//!
//! ```bash
//! # Offline ABI helpers
//! callforge selector "transfer(address,uint256)"
//! callforge encode "transfer(address,uint256)" 0x742d35Cc6634C0532925a3b844Bc9e7595f0aB3d 1000
//! callforge decode "(uint256,string)" 0x...
//!
//! # Capability probe
//! callforge supports balanceOf 0x70a08231 0x18160ddd
//!
//! # Read-only call
//! callforge call 0x... "balanceOf(address)(uint256)" 0x...
//! ```

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;
mod config;
mod error;
mod output;

pub use config::Config;
pub use error::CliError;
pub use output::Output;

/// Callforge CLI
#[derive(Parser, Debug)]
#[command(name = "callforge")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    json: bool,

    /// RPC endpoint URL
    #[arg(long, global = true)]
    rpc_url: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

/// CLI commands
#[derive(Debug, Subcommand)]
enum Commands {
    /// Compute a function selector
    Selector(commands::abi::SelectorArgs),
    /// ABI-encode arguments for a function
    Encode(commands::abi::EncodeArgs),
    /// Decode ABI data
    Decode(commands::abi::DecodeArgs),
    /// Execute a read-only contract call
    Call(commands::call::CallArgs),
    /// Check whether a method is in a selector list
    Supports(commands::supports::SupportsArgs),
    /// Show or edit configuration
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,
        /// Set RPC URL
        #[arg(long)]
        set_rpc: Option<String>,
        /// Set chain ID
        #[arg(long)]
        set_chain_id: Option<u64>,
        /// Set default block for calls
        #[arg(long)]
        set_block: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    // Load config
    let mut config = Config::load();

    // Override RPC URL if provided
    if let Some(rpc_url) = cli.rpc_url {
        config.rpc_url = rpc_url;
    }

    let result = match cli.command {
        Commands::Selector(args) => commands::abi::selector(args, cli.json),
        Commands::Encode(args) => commands::abi::encode_args(args, cli.json),
        Commands::Decode(args) => commands::abi::decode_data(args, cli.json),
        Commands::Call(args) => commands::call::execute(args, &config, cli.json).await,
        Commands::Supports(args) => commands::supports::execute(args, cli.json),
        Commands::Config {
            show,
            set_rpc,
            set_chain_id,
            set_block,
        } => handle_config(&mut config, show, set_rpc, set_chain_id, set_block, cli.json),
    };

    if let Err(e) = result {
        Output::error(cli.json, &e);
        std::process::exit(1);
    }
}

fn handle_config(
    config: &mut Config,
    show: bool,
    set_rpc: Option<String>,
    set_chain_id: Option<u64>,
    set_block: Option<String>,
    json: bool,
) -> Result<(), CliError> {
    let mut modified = false;

    if let Some(rpc) = set_rpc {
        config.rpc_url = rpc;
        modified = true;
    }

    if let Some(chain_id) = set_chain_id {
        config.chain_id = chain_id;
        modified = true;
    }

    if let Some(block) = set_block {
        block
            .parse::<callforge_sdk::types::BlockId>()
            .map_err(|_| CliError::Config(format!("invalid block: {}", block)))?;
        config.block = block;
        modified = true;
    }

    if modified {
        config.save()?;
        Output::new(json)
            .field("status", "saved")
            .line("Configuration saved")
            .print();
    } else if show {
        Output::new(json)
            .field("rpc_url", &config.rpc_url)
            .field_u64("chain_id", config.chain_id)
            .field("block", &config.block)
            .line(&format!(
                "RPC URL: {}\nChain ID: {}\nBlock: {}",
                config.rpc_url, config.chain_id, config.block
            ))
            .print();
    } else {
        Output::new(json)
            .line("Use --show to display config, or --set-rpc/--set-chain-id/--set-block to modify")
            .print();
    }

    Ok(())
}
