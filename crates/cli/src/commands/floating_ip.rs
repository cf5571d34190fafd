//! Floating IP Commands

use anyhow::Result;
use clap::Subcommand;
use serde::Serialize;

use clouddeck_client::ApiClient;
use clouddeck_common::types::{FloatingIp, FloatingIpCreateRequest};

use crate::commands::{opt, opt_time};
use crate::output::{print_item, print_list, print_success, OutputFormat, TableDisplay};

#[derive(Subcommand)]
pub enum FloatingIpCommands {
    /// List all floating IPs
    List,

    /// Get floating IP details
    Get {
        /// Floating IP ID
        id: i64,
    },

    /// Create a new floating IP
    Create {
        /// Address family (ipv4 or ipv6)
        #[arg(short = 't', long, default_value = "ipv4")]
        ip_type: String,

        /// Description
        #[arg(short, long)]
        description: Option<String>,

        /// Server ID to assign to on creation
        #[arg(long)]
        server: Option<i64>,

        /// Home location when not assigning to a server
        #[arg(short, long)]
        location: Option<String>,
    },

    /// Assign a floating IP to a server
    Assign {
        /// Floating IP ID
        id: i64,

        /// Server ID
        server: i64,
    },

    /// Unassign a floating IP
    Unassign {
        /// Floating IP ID
        id: i64,
    },

    /// Delete a floating IP
    Delete {
        /// Floating IP ID
        id: i64,
    },
}

/// Floating IP display wrapper for serialization
#[derive(Serialize)]
pub struct FloatingIpDisplay {
    pub id: i64,
    pub ip: String,
    pub ip_type: String,
    pub description: String,
    pub server: String,
    pub location: String,
    pub created: String,
}

impl From<FloatingIp> for FloatingIpDisplay {
    fn from(fip: FloatingIp) -> Self {
        Self {
            id: fip.id,
            ip: fip.ip,
            ip_type: opt(&fip.ip_type),
            description: opt(&fip.description),
            server: fip
                .server
                .map(|s| s.to_string())
                .unwrap_or_else(|| "-".to_string()),
            location: opt(&fip.location),
            created: opt_time(&fip.created),
        }
    }
}

impl TableDisplay for FloatingIpDisplay {
    fn headers() -> Vec<&'static str> {
        vec!["ID", "IP", "Type", "Description", "Server", "Location", "Created"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.ip.clone(),
            self.ip_type.clone(),
            self.description.clone(),
            self.server.clone(),
            self.location.clone(),
            self.created.clone(),
        ]
    }
}

pub async fn execute(
    cmd: FloatingIpCommands,
    client: ApiClient,
    project: i64,
    format: OutputFormat,
) -> Result<()> {
    match cmd {
        FloatingIpCommands::List => {
            let ips = client.list_floating_ips(project).await?;
            let display: Vec<FloatingIpDisplay> = ips.into_iter().map(Into::into).collect();
            print_list(&display, format);
        }
        FloatingIpCommands::Get { id } => {
            let ip = client.get_floating_ip(project, id).await?;
            print_item(&FloatingIpDisplay::from(ip), format);
        }
        FloatingIpCommands::Create {
            ip_type,
            description,
            server,
            location,
        } => {
            let ip = client
                .create_floating_ip(
                    project,
                    &FloatingIpCreateRequest {
                        ip_type,
                        description,
                        server,
                        location,
                    },
                )
                .await?;
            print_success(&format!("Floating IP {} created (ID {})", ip.ip, ip.id));
        }
        FloatingIpCommands::Assign { id, server } => {
            client.assign_floating_ip(project, id, server).await?;
            print_success(&format!("Floating IP {} assigned to server {}", id, server));
        }
        FloatingIpCommands::Unassign { id } => {
            client.unassign_floating_ip(project, id).await?;
            print_success(&format!("Floating IP {} unassigned", id));
        }
        FloatingIpCommands::Delete { id } => {
            client.delete_floating_ip(project, id).await?;
            print_success(&format!("Floating IP {} deleted", id));
        }
    }

    Ok(())
}
