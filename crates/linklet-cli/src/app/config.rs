use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use core::time::Duration;
use linklet::{LINKLET_EPOCH_MS, SnowflakeLayout, WallClock};
use std::path::PathBuf;

/// Runtime configuration for the `linklet` binary.
///
/// All values are parsed from CLI arguments or environment variables (a
/// `.env` file is loaded first), with defaults matching the 41/10/12 Twitter
/// layout anchored at 2024-01-01.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "linklet",
    version,
    about = "Create, resolve and inspect Snowflake-backed short codes"
)]
pub struct CliArgs {
    /// Custom epoch in milliseconds since 1970-01-01 UTC.
    ///
    /// Every generated timestamp is relative to this instant. Changing it on a
    /// live deployment breaks ordering with previously issued codes.
    ///
    /// Environment variable: `EPOCH_MS`
    #[arg(long, env = "EPOCH_MS", default_value_t = LINKLET_EPOCH_MS, global = true)]
    pub epoch_ms: u64,

    /// Bits allocated to the timestamp field.
    ///
    /// Environment variable: `TIMESTAMP_BITS`
    #[arg(long, env = "TIMESTAMP_BITS", default_value_t = 41, global = true)]
    pub timestamp_bits: u32,

    /// Bits allocated to the node ID field.
    ///
    /// Environment variable: `NODE_BITS`
    #[arg(long, env = "NODE_BITS", default_value_t = 10, global = true)]
    pub node_bits: u32,

    /// Bits allocated to the per-millisecond sequence field.
    ///
    /// The three widths must sum to 63.
    ///
    /// Environment variable: `SEQUENCE_BITS`
    #[arg(long, env = "SEQUENCE_BITS", default_value_t = 12, global = true)]
    pub sequence_bits: u32,

    /// Explicit node ID for this process.
    ///
    /// When unset, the ID is hashed from the host name, or drawn at random if
    /// no host identity is available.
    ///
    /// Environment variable: `NODE_ID`
    #[arg(long, env = "NODE_ID", global = true)]
    pub node_id: Option<u64>,

    /// Time-to-live for cached lookups, in seconds.
    ///
    /// Environment variable: `CACHE_TTL_SECS`
    #[arg(long, env = "CACHE_TTL_SECS", default_value_t = 86_400, global = true)]
    pub cache_ttl_secs: u64,

    /// Path to the JSON-lines file holding mapping records.
    ///
    /// Environment variable: `STORE_PATH`
    #[arg(long, env = "STORE_PATH", default_value = "linklet.jsonl", global = true)]
    pub store_path: PathBuf,

    /// Emit logs as JSON instead of human-readable text.
    ///
    /// Environment variable: `LOG_JSON`
    #[arg(long, env = "LOG_JSON", default_value_t = false, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Shorten a target and print its code.
    Shorten {
        target: String,
        /// Record the mapping as created by this owner.
        #[arg(long)]
        owner: Option<String>,
    },
    /// Print the target a code maps to.
    Resolve { code: String },
    /// Decode a code into its timestamp, node ID and sequence.
    Inspect { code: String },
    /// List the mappings created by an owner, newest first.
    History { owner: String },
    /// Print the node ID this process would use.
    NodeId,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub epoch: Duration,
    pub layout: SnowflakeLayout,
    pub node_id: Option<u64>,
    pub cache_ttl: Duration,
    pub store_path: PathBuf,
    pub log_json: bool,
    pub command: Command,
}

impl AppConfig {
    pub const fn epoch_ms(&self) -> u64 {
        self.epoch.as_millis() as u64
    }
}

impl TryFrom<CliArgs> for AppConfig {
    type Error = anyhow::Error;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        let layout = SnowflakeLayout::new(args.timestamp_bits, args.node_bits, args.sequence_bits)
            .context("invalid TIMESTAMP_BITS/NODE_BITS/SEQUENCE_BITS")?;

        if let Some(node_id) = args.node_id {
            if node_id > layout.max_node_id() {
                bail!(
                    "NODE_ID ({}) exceeds available node ID space (max = {})",
                    node_id,
                    layout.max_node_id()
                );
            }
        }

        if args.cache_ttl_secs == 0 {
            bail!("CACHE_TTL_SECS must be greater than 0");
        }

        if args.epoch_ms > WallClock::unix_millis() {
            bail!("EPOCH_MS ({}) is in the future", args.epoch_ms);
        }

        Ok(Self {
            epoch: Duration::from_millis(args.epoch_ms),
            layout,
            node_id: args.node_id,
            cache_ttl: Duration::from_secs(args.cache_ttl_secs),
            store_path: args.store_path,
            log_json: args.log_json,
            command: args.command,
        })
    }
}
