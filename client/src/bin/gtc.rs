#![deny(
    clippy::expect_used,
    clippy::panic,
    clippy::todo,
    clippy::unimplemented,
    clippy::unwrap_used
)]
#![allow(clippy::print_stdout)]

//! Render or run an operation described in a JSON file.
//!
//! The file holds a field tree:
//!
//! ```json
//! {
//!   "name": "user",
//!   "args": {"id": {"$variable": {"name": "id", "type": "ID!", "value": "42"}}},
//!   "children": [{"name": "id"}, {"name": "email"}]
//! }
//! ```

use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use graphql_test_client::{
    check_fields, logging, render_mutation, render_query, ClientConfig, Field, GraphQlClient,
};

#[derive(Parser)]
#[command(name = "gtc", version, about = "Render and run GraphQL operations from field trees")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the request payload for an operation
    Render(OperationArgs),
    /// Execute an operation and print the composed response
    Run {
        #[command(flatten)]
        operation: OperationArgs,

        /// Configuration file (defaults to gtc.yaml; GTC_* variables override it)
        #[arg(long, default_value = "gtc.yaml")]
        config: String,

        /// Check the response against the operation's own selection
        #[arg(long)]
        check: bool,

        /// Check the response against the selection in this file
        #[arg(long, value_name = "FILE")]
        expect: Option<PathBuf>,
    },
}

#[derive(Args)]
struct OperationArgs {
    /// JSON file describing the operation root
    file: PathBuf,

    /// Send as a mutation instead of a query
    #[arg(long)]
    mutation: bool,
}

fn read_field(path: &Path) -> anyhow::Result<Field> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("{} is not a valid field description", path.display()))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Render(operation) => {
            let root = read_field(&operation.file)?;
            let document = if operation.mutation {
                render_mutation(&root)?
            } else {
                render_query(&root)?
            };
            println!("{}", serde_json::to_string_pretty(&document.to_json())?);
        }
        Command::Run {
            operation,
            config,
            check,
            expect,
        } => {
            let config = ClientConfig::load_from(&config)?;
            logging::init(&config.logging);

            let root = read_field(&operation.file)?;
            let client = GraphQlClient::from_config(&config)?;
            tracing::info!(
                version = env!("CARGO_PKG_VERSION"),
                endpoint = client.transport().endpoint(),
                operation = root.name(),
                "running operation"
            );

            let response = if operation.mutation {
                client.mutate(&root, None).await?
            } else {
                client.query(&root).await?
            };
            println!("{}", serde_json::to_string_pretty(&response)?);

            let expected = match expect {
                Some(path) => Some(read_field(&path)?),
                None if check => Some(root),
                None => None,
            };
            if let Some(expected) = expected {
                let data = response.data().cloned().unwrap_or_default();
                if let Err(mismatch) = check_fields(expected.child_fields(), &data) {
                    bail!("Response shape mismatch: {mismatch}");
                }
                tracing::info!("response shape matches");
            }
        }
    }

    Ok(())
}
