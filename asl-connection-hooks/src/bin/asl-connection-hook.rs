//! asl-connection-hook: called by app_rpt on node connect/disconnect
//!
//! Usage:
//!   asl-connection-hook [--debug] [--config PATH] <conn_status> <my_node> <their_node>

use asl_connection_hooks::config::DEFAULT_CONFIG_PATH;
use asl_connection_hooks::{
    AsteriskController, Config, ConfigError, ConnectionEvent, ConnectionEventProcessor,
    ConnectionStatus, EventOutcome, NodeDirectory, NodeId, PushoverNotifier,
};
use clap::Parser;
use log::{debug, error};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(version, about = "AllStar Node Connection Monitor")]
struct Args {
    /// Connection status (1=connected, 0=disconnected)
    #[arg(value_parser = parse_status)]
    conn_status: ConnectionStatus,

    /// Local node number
    my_node: NodeId,

    /// Remote node number
    their_node: NodeId,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,

    /// Path to config file
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,
}

fn parse_status(s: &str) -> Result<ConnectionStatus, String> {
    s.parse::<u8>()
        .ok()
        .and_then(ConnectionStatus::from_flag)
        .ok_or_else(|| format!("expected 0 or 1, got {:?}", s))
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Args::parse();

    let level = if args.debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_millis()
        .init();

    match run(args).await {
        Ok(outcome) => {
            debug!("Outcome: {:?}", outcome);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Application error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Load the config and handle the one event. Only configuration problems
/// are errors; lookup, notify and controller failures are absorbed below.
async fn run(args: Args) -> Result<EventOutcome, ConfigError> {
    let config = Config::load(&args.config)?;

    let processor = ConnectionEventProcessor::new(
        config.classification(),
        NodeDirectory::with_format(&config.paths.node_db, config.directory),
        Box::new(PushoverNotifier::new(config.pushover.clone())),
        Box::new(AsteriskController::new(config.controller.command.clone())),
    );

    let event = ConnectionEvent::new(args.conn_status, args.my_node, args.their_node);
    Ok(processor.handle(event).await)
}
