//! Action Log Commands

use anyhow::Result;
use clap::Parser;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use clouddeck_client::{ApiClient, ResourceWatcher};
use clouddeck_common::types::ActionLogEntry;
use serde::Serialize;

use crate::commands::{opt, opt_time};
use crate::output::{print_info, print_list, OutputFormat, TableDisplay};

#[derive(Parser)]
pub struct LogsArgs {
    /// Entries to skip
    #[arg(long, default_value = "0")]
    pub skip: u32,

    /// Maximum entries to fetch
    #[arg(short, long, default_value = "50")]
    pub limit: u32,

    /// Keep polling for new entries until interrupted
    #[arg(short, long)]
    pub follow: bool,

    /// Poll interval in seconds when following
    #[arg(long, default_value = "5")]
    pub interval: u64,
}

/// Log entry display wrapper for serialization
#[derive(Serialize)]
pub struct LogDisplay {
    pub id: i64,
    pub time: String,
    pub action: String,
    pub status: String,
    pub details: String,
}

impl From<ActionLogEntry> for LogDisplay {
    fn from(entry: ActionLogEntry) -> Self {
        Self {
            id: entry.id,
            time: opt_time(&entry.created_at),
            action: entry.action,
            status: entry.status,
            details: opt(&entry.details),
        }
    }
}

impl TableDisplay for LogDisplay {
    fn headers() -> Vec<&'static str> {
        vec!["ID", "Time", "Action", "Status", "Details"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.time.clone(),
            self.action.clone(),
            self.status.clone(),
            self.details.clone(),
        ]
    }
}

fn print_follow_line(entry: &ActionLogEntry) {
    println!(
        "{} {:>7} {:<24} {}",
        opt_time(&entry.created_at),
        entry.status,
        entry.action,
        entry.details.as_deref().unwrap_or("")
    );
}

pub async fn execute(
    args: LogsArgs,
    client: ApiClient,
    project: i64,
    format: OutputFormat,
) -> Result<()> {
    let entries = client.list_logs(project, args.skip, args.limit).await?;
    let newest_id = entries.iter().map(|e| e.id).max().unwrap_or(0);
    let display: Vec<LogDisplay> = entries.into_iter().map(Into::into).collect();
    print_list(&display, format);

    if !args.follow {
        return Ok(());
    }

    print_info("Following action log (Ctrl-C to stop)");

    let client = Arc::new(client);
    let last_seen = Arc::new(AtomicI64::new(newest_id));
    let watcher = {
        let client = client.clone();
        let last_seen = last_seen.clone();
        ResourceWatcher::spawn(
            "action-log",
            Duration::from_secs(args.interval.max(1)),
            move || {
                let client = client.clone();
                let last_seen = last_seen.clone();
                async move {
                    let entries = client.list_logs(project, 0, 50).await?;
                    let mut fresh: Vec<ActionLogEntry> = entries
                        .into_iter()
                        .filter(|e| e.id > last_seen.load(Ordering::SeqCst))
                        .collect();
                    fresh.sort_by_key(|e| e.id);
                    for entry in &fresh {
                        print_follow_line(entry);
                        last_seen.fetch_max(entry.id, Ordering::SeqCst);
                    }
                    Ok(())
                }
            },
        )
    };

    tokio::signal::ctrl_c().await?;
    watcher.stop().await;

    Ok(())
}
