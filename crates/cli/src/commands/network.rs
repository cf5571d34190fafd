//! Network Commands

use anyhow::Result;
use clap::Subcommand;
use serde::Serialize;

use clouddeck_client::ApiClient;
use clouddeck_common::types::{NetworkCreateRequest, NetworkInfo, Subnet};

use crate::commands::opt_time;
use crate::output::{print_item, print_list, print_success, OutputFormat, TableDisplay};

#[derive(Subcommand)]
pub enum NetworkCommands {
    /// List all networks
    List,

    /// Get network details
    Get {
        /// Network ID
        id: i64,
    },

    /// Create a new network
    Create {
        /// Network name
        #[arg(short, long)]
        name: String,

        /// IP range in CIDR notation (e.g. 10.0.0.0/16)
        #[arg(long)]
        ip_range: String,

        /// Subnet ranges to carve out of the network
        #[arg(long = "subnet")]
        subnets: Vec<String>,

        /// Network zone for the subnets (e.g. eu-central)
        #[arg(long, default_value = "eu-central")]
        network_zone: String,
    },

    /// Rename a network
    Rename {
        /// Network ID
        id: i64,

        /// New name
        name: String,
    },

    /// Delete a network
    Delete {
        /// Network ID
        id: i64,
    },
}

/// Network display wrapper for serialization
#[derive(Serialize)]
pub struct NetworkDisplay {
    pub id: i64,
    pub name: String,
    pub ip_range: String,
    pub subnets: usize,
    pub servers: usize,
    pub created: String,
}

impl From<NetworkInfo> for NetworkDisplay {
    fn from(n: NetworkInfo) -> Self {
        Self {
            id: n.id,
            name: n.name,
            ip_range: n.ip_range,
            subnets: n.subnets.len(),
            servers: n.servers.len(),
            created: opt_time(&n.created),
        }
    }
}

impl TableDisplay for NetworkDisplay {
    fn headers() -> Vec<&'static str> {
        vec!["ID", "Name", "IP Range", "Subnets", "Servers", "Created"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone(),
            self.ip_range.clone(),
            self.subnets.to_string(),
            self.servers.to_string(),
            self.created.clone(),
        ]
    }
}

pub async fn execute(
    cmd: NetworkCommands,
    client: ApiClient,
    project: i64,
    format: OutputFormat,
) -> Result<()> {
    match cmd {
        NetworkCommands::List => {
            let networks = client.list_networks(project).await?;
            let display: Vec<NetworkDisplay> = networks.into_iter().map(Into::into).collect();
            print_list(&display, format);
        }
        NetworkCommands::Get { id } => {
            let network = client.get_network(project, id).await?;
            print_item(&NetworkDisplay::from(network), format);
        }
        NetworkCommands::Create {
            name,
            ip_range,
            subnets,
            network_zone,
        } => {
            let subnets = subnets
                .into_iter()
                .map(|ip_range| Subnet {
                    ip_range,
                    subnet_type: Some("cloud".to_string()),
                    network_zone: Some(network_zone.clone()),
                })
                .collect();
            let network = client
                .create_network(
                    project,
                    &NetworkCreateRequest {
                        name,
                        ip_range,
                        subnets,
                    },
                )
                .await?;
            print_success(&format!("Network '{}' created (ID {})", network.name, network.id));
        }
        NetworkCommands::Rename { id, name } => {
            let network = client.update_network(project, id, &name).await?;
            print_success(&format!("Network {} renamed to '{}'", id, network.name));
        }
        NetworkCommands::Delete { id } => {
            client.delete_network(project, id).await?;
            print_success(&format!("Network {} deleted", id));
        }
    }

    Ok(())
}
