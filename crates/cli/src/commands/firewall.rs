//! Firewall Commands

use anyhow::Result;
use clap::Subcommand;
use serde::Serialize;

use clouddeck_client::ApiClient;
use clouddeck_common::types::{Firewall, FirewallCreateRequest, FirewallRule, RuleDirection};

use crate::commands::opt_time;
use crate::output::{print_item, print_list, print_success, OutputFormat, TableDisplay};

#[derive(Subcommand)]
pub enum FirewallCommands {
    /// List all firewalls
    List,

    /// Get firewall details including rules
    Get {
        /// Firewall ID
        id: i64,
    },

    /// Create a new firewall
    Create {
        /// Firewall name
        #[arg(short, long)]
        name: String,

        /// Inbound TCP ports to allow from anywhere (e.g. 22, 443)
        #[arg(long = "allow-tcp")]
        allow_tcp: Vec<String>,
    },

    /// Delete a firewall
    Delete {
        /// Firewall ID
        id: i64,
    },
}

/// Firewall display wrapper for serialization
#[derive(Serialize)]
pub struct FirewallDisplay {
    pub id: i64,
    pub name: String,
    pub rules: usize,
    pub applied_to: usize,
    pub created: String,
}

impl From<Firewall> for FirewallDisplay {
    fn from(fw: Firewall) -> Self {
        Self {
            id: fw.id,
            name: fw.name,
            rules: fw.rules.len(),
            applied_to: fw.applied_to.len(),
            created: opt_time(&fw.created),
        }
    }
}

impl TableDisplay for FirewallDisplay {
    fn headers() -> Vec<&'static str> {
        vec!["ID", "Name", "Rules", "Applied To", "Created"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone(),
            self.rules.to_string(),
            self.applied_to.to_string(),
            self.created.clone(),
        ]
    }
}

/// Rule display wrapper for the `get` subcommand
#[derive(Serialize)]
pub struct RuleDisplay {
    pub direction: String,
    pub protocol: String,
    pub port: String,
    pub source_ips: String,
}

impl From<FirewallRule> for RuleDisplay {
    fn from(rule: FirewallRule) -> Self {
        Self {
            direction: rule.direction.to_string(),
            protocol: rule.protocol,
            port: rule.port.unwrap_or_else(|| "-".to_string()),
            source_ips: rule.source_ips.join(", "),
        }
    }
}

impl TableDisplay for RuleDisplay {
    fn headers() -> Vec<&'static str> {
        vec!["Direction", "Protocol", "Port", "Source IPs"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.direction.clone(),
            self.protocol.clone(),
            self.port.clone(),
            self.source_ips.clone(),
        ]
    }
}

pub async fn execute(
    cmd: FirewallCommands,
    client: ApiClient,
    project: i64,
    format: OutputFormat,
) -> Result<()> {
    match cmd {
        FirewallCommands::List => {
            let firewalls = client.list_firewalls(project).await?;
            let display: Vec<FirewallDisplay> = firewalls.into_iter().map(Into::into).collect();
            print_list(&display, format);
        }
        FirewallCommands::Get { id } => {
            let firewall = client.get_firewall(project, id).await?;
            let rules: Vec<RuleDisplay> = firewall.rules.clone().into_iter().map(Into::into).collect();
            print_item(&FirewallDisplay::from(firewall), format);
            if !rules.is_empty() {
                print_list(&rules, format);
            }
        }
        FirewallCommands::Create { name, allow_tcp } => {
            let rules = allow_tcp
                .into_iter()
                .map(|port| FirewallRule {
                    direction: RuleDirection::In,
                    protocol: "tcp".to_string(),
                    port: Some(port),
                    source_ips: vec!["0.0.0.0/0".to_string(), "::/0".to_string()],
                    destination_ips: Vec::new(),
                    description: None,
                })
                .collect();
            let firewall = client
                .create_firewall(project, &FirewallCreateRequest { name, rules })
                .await?;
            print_success(&format!(
                "Firewall '{}' created (ID {})",
                firewall.name, firewall.id
            ));
        }
        FirewallCommands::Delete { id } => {
            client.delete_firewall(project, id).await?;
            print_success(&format!("Firewall {} deleted", id));
        }
    }

    Ok(())
}
