//! Volume Commands

use anyhow::Result;
use clap::Subcommand;
use serde::Serialize;

use clouddeck_client::ApiClient;
use clouddeck_common::types::{Volume, VolumeCreateRequest};

use crate::commands::{opt, opt_time};
use crate::output::{print_item, print_list, print_success, OutputFormat, TableDisplay};

#[derive(Subcommand)]
pub enum VolumeCommands {
    /// List all volumes
    List,

    /// Get volume details
    Get {
        /// Volume ID
        id: i64,
    },

    /// Create a new volume
    Create {
        /// Volume name
        #[arg(short, long)]
        name: String,

        /// Size in GB
        #[arg(short, long)]
        size: u64,

        /// Location (e.g. fsn1)
        #[arg(short, long)]
        location: Option<String>,

        /// Server ID to attach to on creation
        #[arg(long)]
        server: Option<i64>,
    },

    /// Rename a volume
    Rename {
        /// Volume ID
        id: i64,

        /// New name
        name: String,
    },

    /// Delete a volume
    Delete {
        /// Volume ID
        id: i64,
    },

    /// Grow a volume
    Resize {
        /// Volume ID
        id: i64,

        /// New size in GB (must be larger than the current size)
        size: u64,
    },

    /// Attach a volume to a server
    Attach {
        /// Volume ID
        id: i64,

        /// Server ID
        server: i64,

        /// Skip automatic mounting
        #[arg(long)]
        no_automount: bool,
    },

    /// Detach a volume from its server
    Detach {
        /// Volume ID
        id: i64,
    },
}

/// Volume display wrapper for serialization
#[derive(Serialize)]
pub struct VolumeDisplay {
    pub id: i64,
    pub name: String,
    pub size_gb: u64,
    pub location: String,
    pub server: String,
    pub status: String,
    pub created: String,
}

impl From<Volume> for VolumeDisplay {
    fn from(v: Volume) -> Self {
        Self {
            id: v.id,
            name: v.name,
            size_gb: v.size,
            location: opt(&v.location),
            server: v.server.map(|s| s.to_string()).unwrap_or_else(|| "-".to_string()),
            status: opt(&v.status),
            created: opt_time(&v.created),
        }
    }
}

impl TableDisplay for VolumeDisplay {
    fn headers() -> Vec<&'static str> {
        vec!["ID", "Name", "Size (GB)", "Location", "Server", "Status", "Created"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone(),
            self.size_gb.to_string(),
            self.location.clone(),
            self.server.clone(),
            self.status.clone(),
            self.created.clone(),
        ]
    }
}

pub async fn execute(
    cmd: VolumeCommands,
    client: ApiClient,
    project: i64,
    format: OutputFormat,
) -> Result<()> {
    match cmd {
        VolumeCommands::List => {
            let volumes = client.list_volumes(project).await?;
            let display: Vec<VolumeDisplay> = volumes.into_iter().map(Into::into).collect();
            print_list(&display, format);
        }
        VolumeCommands::Get { id } => {
            let volume = client.get_volume(project, id).await?;
            print_item(&VolumeDisplay::from(volume), format);
        }
        VolumeCommands::Create {
            name,
            size,
            location,
            server,
        } => {
            let volume = client
                .create_volume(
                    project,
                    &VolumeCreateRequest {
                        name,
                        size,
                        location,
                        server,
                    },
                )
                .await?;
            print_success(&format!("Volume '{}' created (ID {})", volume.name, volume.id));
        }
        VolumeCommands::Rename { id, name } => {
            let volume = client.update_volume(project, id, &name).await?;
            print_success(&format!("Volume {} renamed to '{}'", id, volume.name));
        }
        VolumeCommands::Delete { id } => {
            client.delete_volume(project, id).await?;
            print_success(&format!("Volume {} deleted", id));
        }
        VolumeCommands::Resize { id, size } => {
            let volume = client.resize_volume(project, id, size).await?;
            print_success(&format!("Volume {} resized to {} GB", id, volume.size));
        }
        VolumeCommands::Attach {
            id,
            server,
            no_automount,
        } => {
            client
                .attach_volume(project, id, server, !no_automount)
                .await?;
            print_success(&format!("Volume {} attached to server {}", id, server));
        }
        VolumeCommands::Detach { id } => {
            client.detach_volume(project, id).await?;
            print_success(&format!("Volume {} detached", id));
        }
    }

    Ok(())
}
