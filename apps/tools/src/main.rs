use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use policy_core::{HttpPolicyClient, SyncPolicyController};
use url::Url;

#[derive(Parser, Debug)]
struct Cli {
    /// Base URL of the replication management API.
    #[arg(long, default_value = "http://127.0.0.1:8000")]
    endpoint: Url,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List sync policy groups across all scopes.
    List,
    /// Bulk-delete the named policy groups.
    Delete {
        group_names: Vec<String>,
        /// Restrict the delete to groups scoped to this bucket.
        #[arg(long)]
        bucket: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let controller = SyncPolicyController::new(Arc::new(HttpPolicyClient::new(cli.endpoint)));

    match cli.command {
        Command::List => {
            let rows = controller.refresh().await?;
            for row in rows {
                println!(
                    "{}\t{}\t{}\t{}",
                    row.group_name,
                    row.display_status(),
                    row.display_zonegroup(),
                    row.display_bucket()
                );
            }
        }
        Command::Delete {
            group_names,
            bucket,
        } => {
            let rows = controller.refresh().await?;
            let scope = bucket.as_deref().unwrap_or("");
            let unique_ids: Vec<String> = rows
                .iter()
                .filter(|row| {
                    group_names.iter().any(|name| name == &row.group_name)
                        && row.bucket.as_deref().unwrap_or("") == scope
                })
                .map(|row| row.unique_id.clone())
                .collect();
            if unique_ids.is_empty() {
                anyhow::bail!("no matching policy groups for {group_names:?}");
            }

            controller.set_selection(unique_ids).await;
            let outcome = controller.delete_selected().await;
            if outcome.is_success() {
                println!("deleted {} policy group(s)", outcome.attempted.len());
            } else {
                for failure in &outcome.failed {
                    eprintln!("failed to delete {}: {}", failure.group_name, failure.error);
                }
                anyhow::bail!(
                    "{} of {} deletions failed",
                    outcome.failed.len(),
                    outcome.attempted.len()
                );
            }
        }
    }

    Ok(())
}
