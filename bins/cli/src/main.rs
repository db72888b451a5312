//! SplitLedger snapshot CLI
//!
//! Computes balances from a JSON snapshot of expense and settlement records.
//!
//! Usage:
//!   splitledger user  <snapshot.json> <user-id>
//!   splitledger group <snapshot.json> <group-id>

mod snapshot;

use std::path::PathBuf;

use anyhow::{Context, bail};
use splitledger_core::balance::UngroupedPolicy;
use splitledger_shared::AppConfig;
use splitledger_shared::types::{GroupId, UserId};
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::snapshot::Snapshot;

const USAGE: &str = "usage: splitledger <user|group> <snapshot.json> <id>";

/// A parsed command line.
#[derive(Debug, PartialEq, Eq)]
enum Command {
    User { snapshot: PathBuf, user_id: UserId },
    Group { snapshot: PathBuf, group_id: GroupId },
}

impl Command {
    fn parse(args: &[String]) -> anyhow::Result<Self> {
        let [kind, snapshot, id] = args else {
            bail!(USAGE);
        };
        let snapshot = PathBuf::from(snapshot);

        match kind.as_str() {
            "user" => Ok(Self::User {
                snapshot,
                user_id: id.parse().with_context(|| format!("Invalid user id {id}"))?,
            }),
            "group" => Ok(Self::Group {
                snapshot,
                group_id: id.parse().with_context(|| format!("Invalid group id {id}"))?,
            }),
            other => bail!("Unknown command {other}; {USAGE}"),
        }
    }
}

fn init_tracing(config: &AppConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| config.log.filter.as_str().into());

    // stdout carries the report, so logs go to stderr
    let json_layer = config.log.json.then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
    });
    let text_layer = (!config.log.json)
        .then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(filter)
        .with(json_layer)
        .with(text_layer)
        .init();
}

fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;
    init_tracing(&config);

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = Command::parse(&args)?;
    debug!(?command, "Parsed command");

    let report = match command {
        Command::User { snapshot, user_id } => {
            let policy = UngroupedPolicy::from(&config.ledger);
            Snapshot::load(&snapshot)?.user_report(user_id, policy)?
        }
        Command::Group { snapshot, group_id } => Snapshot::load(&snapshot)?.group_report(group_id)?,
    };

    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
