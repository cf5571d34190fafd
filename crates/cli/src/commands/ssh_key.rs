//! SSH Key Commands

use anyhow::{Context, Result};
use clap::Subcommand;
use serde::Serialize;
use std::path::PathBuf;

use clouddeck_client::ApiClient;
use clouddeck_common::types::{SshKey, SshKeyCreateRequest};

use crate::commands::opt_time;
use crate::output::{print_item, print_list, print_success, OutputFormat, TableDisplay};

#[derive(Subcommand)]
pub enum SshKeyCommands {
    /// List all SSH keys
    List,

    /// Get SSH key details
    Get {
        /// SSH key ID
        id: i64,
    },

    /// Register an SSH public key
    Create {
        /// Key name
        #[arg(short, long)]
        name: String,

        /// Path to the public key file (e.g. ~/.ssh/id_ed25519.pub)
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Rename an SSH key
    Rename {
        /// SSH key ID
        id: i64,

        /// New name
        name: String,
    },

    /// Delete an SSH key
    Delete {
        /// SSH key ID
        id: i64,
    },
}

/// SSH key display wrapper for serialization
#[derive(Serialize)]
pub struct SshKeyDisplay {
    pub id: i64,
    pub name: String,
    pub fingerprint: String,
    pub created: String,
}

impl From<SshKey> for SshKeyDisplay {
    fn from(key: SshKey) -> Self {
        Self {
            id: key.id,
            name: key.name,
            fingerprint: key.fingerprint,
            created: opt_time(&key.created),
        }
    }
}

impl TableDisplay for SshKeyDisplay {
    fn headers() -> Vec<&'static str> {
        vec!["ID", "Name", "Fingerprint", "Created"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone(),
            self.fingerprint.clone(),
            self.created.clone(),
        ]
    }
}

pub async fn execute(
    cmd: SshKeyCommands,
    client: ApiClient,
    project: i64,
    format: OutputFormat,
) -> Result<()> {
    match cmd {
        SshKeyCommands::List => {
            let keys = client.list_ssh_keys(project).await?;
            let display: Vec<SshKeyDisplay> = keys.into_iter().map(Into::into).collect();
            print_list(&display, format);
        }
        SshKeyCommands::Get { id } => {
            let key = client.get_ssh_key(project, id).await?;
            print_item(&SshKeyDisplay::from(key), format);
        }
        SshKeyCommands::Create { name, file } => {
            let public_key = std::fs::read_to_string(&file)
                .with_context(|| format!("reading public key from {}", file.display()))?
                .trim()
                .to_string();
            let key = client
                .create_ssh_key(project, &SshKeyCreateRequest { name, public_key })
                .await?;
            print_success(&format!("SSH key '{}' registered (ID {})", key.name, key.id));
        }
        SshKeyCommands::Rename { id, name } => {
            let key = client.update_ssh_key(project, id, &name).await?;
            print_success(&format!("SSH key {} renamed to '{}'", id, key.name));
        }
        SshKeyCommands::Delete { id } => {
            client.delete_ssh_key(project, id).await?;
            print_success(&format!("SSH key {} deleted", id));
        }
    }

    Ok(())
}
