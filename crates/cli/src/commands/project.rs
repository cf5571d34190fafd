//! Project Commands

use anyhow::Result;
use clap::Subcommand;
use serde::Serialize;

use clouddeck_client::ApiClient;
use clouddeck_common::types::{Project, ProjectCreateRequest, ProjectUpdateRequest};

use crate::commands::{opt, opt_time};
use crate::output::{print_item, print_list, print_success, OutputFormat, TableDisplay};

#[derive(Subcommand)]
pub enum ProjectCommands {
    /// List all projects
    List,

    /// Get project details
    Get {
        /// Project ID
        id: i64,
    },

    /// Create a new project
    Create {
        /// Project name
        #[arg(short, long)]
        name: String,

        /// Hetzner Cloud API key for the project
        #[arg(long)]
        api_key: String,

        /// Description
        #[arg(short, long)]
        description: Option<String>,
    },

    /// Update a project
    Update {
        /// Project ID
        id: i64,

        /// New name
        #[arg(short, long)]
        name: Option<String>,

        /// New description
        #[arg(short, long)]
        description: Option<String>,

        /// Replacement API key
        #[arg(long)]
        api_key: Option<String>,
    },

    /// Delete a project
    Delete {
        /// Project ID
        id: i64,
    },
}

/// Project display wrapper for serialization
#[derive(Serialize)]
pub struct ProjectDisplay {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub created_at: String,
}

impl From<Project> for ProjectDisplay {
    fn from(p: Project) -> Self {
        Self {
            id: p.id,
            name: p.name,
            description: opt(&p.description),
            created_at: opt_time(&p.created_at),
        }
    }
}

impl TableDisplay for ProjectDisplay {
    fn headers() -> Vec<&'static str> {
        vec!["ID", "Name", "Description", "Created"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone(),
            self.description.clone(),
            self.created_at.clone(),
        ]
    }
}

pub async fn execute(cmd: ProjectCommands, client: ApiClient, format: OutputFormat) -> Result<()> {
    match cmd {
        ProjectCommands::List => {
            let projects = client.list_projects().await?;
            let display: Vec<ProjectDisplay> = projects.into_iter().map(Into::into).collect();
            print_list(&display, format);
        }
        ProjectCommands::Get { id } => {
            let project = client.get_project(id).await?;
            print_item(&ProjectDisplay::from(project), format);
        }
        ProjectCommands::Create {
            name,
            api_key,
            description,
        } => {
            let project = client
                .create_project(&ProjectCreateRequest {
                    name,
                    api_key,
                    description,
                })
                .await?;
            print_success(&format!("Project '{}' created (ID {})", project.name, project.id));
        }
        ProjectCommands::Update {
            id,
            name,
            description,
            api_key,
        } => {
            let project = client
                .update_project(
                    id,
                    &ProjectUpdateRequest {
                        name,
                        description,
                        api_key,
                    },
                )
                .await?;
            print_success(&format!("Project '{}' updated", project.name));
        }
        ProjectCommands::Delete { id } => {
            client.delete_project(id).await?;
            print_success(&format!("Project {} deleted", id));
        }
    }

    Ok(())
}
