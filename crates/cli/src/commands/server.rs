//! Server Commands

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;
use serde::Serialize;

use clouddeck_client::ApiClient;
use clouddeck_common::types::{Server, ServerCreateRequest, ServerStatus};

use crate::commands::{opt, opt_time};
use crate::output::{print_item, print_list, print_success, print_warning, OutputFormat, TableDisplay};

#[derive(Subcommand)]
pub enum ServerCommands {
    /// List all servers
    List,

    /// Get server details
    Get {
        /// Server ID
        id: i64,
    },

    /// Create a new server
    Create {
        /// Server name
        #[arg(short, long)]
        name: String,

        /// Server type (e.g. cx22)
        #[arg(short = 't', long)]
        server_type: String,

        /// Image name or ID (e.g. debian-12)
        #[arg(short, long)]
        image: String,

        /// Location (e.g. fsn1)
        #[arg(short, long)]
        location: Option<String>,

        /// SSH key names to install
        #[arg(long = "ssh-key")]
        ssh_keys: Vec<String>,
    },

    /// Delete a server
    Delete {
        /// Server ID
        id: i64,
    },

    /// Power a server on
    PowerOn {
        /// Server ID
        id: i64,
    },

    /// Power a server off
    PowerOff {
        /// Server ID
        id: i64,
    },

    /// Reboot a server
    Reboot {
        /// Server ID
        id: i64,
    },
}

fn colorize_status(status: ServerStatus) -> String {
    let text = status.to_string();
    match status {
        ServerStatus::Running => text.green().to_string(),
        ServerStatus::Off => text.red().to_string(),
        ServerStatus::Initializing | ServerStatus::Starting | ServerStatus::Stopping => {
            text.yellow().to_string()
        }
        _ => text,
    }
}

/// Server display wrapper for serialization
#[derive(Serialize)]
pub struct ServerDisplay {
    pub id: i64,
    pub name: String,
    pub status: String,
    #[serde(skip)]
    status_colored: String,
    pub ip: String,
    pub location: String,
    pub server_type: String,
    pub image: String,
    pub created: String,
}

impl From<Server> for ServerDisplay {
    fn from(server: Server) -> Self {
        Self {
            id: server.id,
            name: server.name,
            status: server.status.to_string(),
            status_colored: colorize_status(server.status),
            ip: opt(&server.ip),
            location: opt(&server.location),
            server_type: opt(&server.server_type),
            image: opt(&server.image),
            created: opt_time(&server.created),
        }
    }
}

impl TableDisplay for ServerDisplay {
    fn headers() -> Vec<&'static str> {
        vec!["ID", "Name", "Status", "IP", "Location", "Type", "Image", "Created"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone(),
            self.status_colored.clone(),
            self.ip.clone(),
            self.location.clone(),
            self.server_type.clone(),
            self.image.clone(),
            self.created.clone(),
        ]
    }
}

pub async fn execute(
    cmd: ServerCommands,
    client: ApiClient,
    project: i64,
    format: OutputFormat,
) -> Result<()> {
    match cmd {
        ServerCommands::List => {
            let servers = client.list_servers(project).await?;
            let display: Vec<ServerDisplay> = servers.into_iter().map(Into::into).collect();
            print_list(&display, format);
        }
        ServerCommands::Get { id } => {
            let server = client.get_server(project, id).await?;
            print_item(&ServerDisplay::from(server), format);
        }
        ServerCommands::Create {
            name,
            server_type,
            image,
            location,
            ssh_keys,
        } => {
            let created = client
                .create_server(
                    project,
                    &ServerCreateRequest {
                        name,
                        server_type,
                        image,
                        location,
                        ssh_keys,
                    },
                )
                .await?;
            print_success(&format!(
                "Server '{}' created (ID {})",
                created.server.name, created.server.id
            ));
            match created.root_password {
                Some(password) => {
                    print_warning("Root password (shown only once):");
                    println!("{}", password);
                }
                None => {
                    print_warning("No root password returned; login uses the installed SSH keys");
                }
            }
        }
        ServerCommands::Delete { id } => {
            client.delete_server(project, id).await?;
            print_success(&format!("Server {} deleted", id));
        }
        ServerCommands::PowerOn { id } => {
            client.power_on(project, id).await?;
            print_success(&format!("Server {} powering on", id));
        }
        ServerCommands::PowerOff { id } => {
            client.power_off(project, id).await?;
            print_success(&format!("Server {} powering off", id));
        }
        ServerCommands::Reboot { id } => {
            client.reboot(project, id).await?;
            print_success(&format!("Server {} rebooting", id));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_substitutes_missing_fields() {
        let server = Server {
            id: 5,
            name: "db-1".to_string(),
            status: ServerStatus::Off,
            ip: None,
            location: None,
            server_type: None,
            image: None,
            created: None,
        };
        let display = ServerDisplay::from(server);
        assert_eq!(display.ip, "-");
        assert_eq!(display.status, "off");
        assert_eq!(display.row().len(), ServerDisplay::headers().len());
    }
}
