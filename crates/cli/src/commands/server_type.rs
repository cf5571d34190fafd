//! Server Type Commands

use anyhow::Result;
use clap::Subcommand;
use serde::Serialize;

use clouddeck_client::ApiClient;
use clouddeck_common::types::ServerType;

use crate::commands::opt;
use crate::output::{print_list, OutputFormat, TableDisplay};

#[derive(Subcommand)]
pub enum ServerTypeCommands {
    /// List server types with pricing
    List,
}

/// Server type display wrapper for serialization
#[derive(Serialize)]
pub struct ServerTypeDisplay {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub cores: u32,
    pub memory_gb: f64,
    pub disk_gb: u64,
    pub monthly_from: String,
}

impl From<ServerType> for ServerTypeDisplay {
    fn from(st: ServerType) -> Self {
        // Cheapest location's monthly gross price, when any is known.
        let monthly_from = st
            .prices
            .iter()
            .filter_map(|p| {
                p.price_monthly
                    .as_ref()
                    .and_then(|m| m.parse::<f64>().ok())
            })
            .min_by(|a, b| a.total_cmp(b))
            .map(|m| format!("{:.2}", m))
            .unwrap_or_else(|| "-".to_string());
        Self {
            id: st.id,
            name: st.name,
            description: opt(&st.description),
            cores: st.cores,
            memory_gb: st.memory,
            disk_gb: st.disk,
            monthly_from,
        }
    }
}

impl TableDisplay for ServerTypeDisplay {
    fn headers() -> Vec<&'static str> {
        vec!["ID", "Name", "Description", "Cores", "Memory (GB)", "Disk (GB)", "Monthly from"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone(),
            self.description.clone(),
            self.cores.to_string(),
            self.memory_gb.to_string(),
            self.disk_gb.to_string(),
            self.monthly_from.clone(),
        ]
    }
}

pub async fn execute(
    cmd: ServerTypeCommands,
    client: ApiClient,
    project: i64,
    format: OutputFormat,
) -> Result<()> {
    match cmd {
        ServerTypeCommands::List => {
            let types = client.list_server_types(project).await?;
            let display: Vec<ServerTypeDisplay> = types.into_iter().map(Into::into).collect();
            print_list(&display, format);
        }
    }

    Ok(())
}
