//! Image Commands

use anyhow::Result;
use clap::Subcommand;
use serde::Serialize;

use clouddeck_client::ApiClient;
use clouddeck_common::types::Image;

use crate::commands::opt;
use crate::output::{print_list, print_success, OutputFormat, TableDisplay};

#[derive(Subcommand)]
pub enum ImageCommands {
    /// List available images
    List {
        /// Only list snapshots
        #[arg(long)]
        snapshots: bool,
    },

    /// Delete an image or snapshot
    Delete {
        /// Image ID
        id: i64,
    },
}

/// Image display wrapper for serialization
#[derive(Serialize)]
pub struct ImageDisplay {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub image_type: String,
    pub os_flavor: String,
}

impl From<Image> for ImageDisplay {
    fn from(image: Image) -> Self {
        Self {
            id: image.id,
            name: opt(&image.name),
            description: opt(&image.description),
            image_type: opt(&image.image_type),
            os_flavor: opt(&image.os_flavor),
        }
    }
}

impl TableDisplay for ImageDisplay {
    fn headers() -> Vec<&'static str> {
        vec!["ID", "Name", "Description", "Type", "OS"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone(),
            self.description.clone(),
            self.image_type.clone(),
            self.os_flavor.clone(),
        ]
    }
}

pub async fn execute(
    cmd: ImageCommands,
    client: ApiClient,
    project: i64,
    format: OutputFormat,
) -> Result<()> {
    match cmd {
        ImageCommands::List { snapshots } => {
            let filter = if snapshots { Some("snapshot") } else { None };
            let images = client.list_images(project, filter).await?;
            let display: Vec<ImageDisplay> = images.into_iter().map(Into::into).collect();
            print_list(&display, format);
        }
        ImageCommands::Delete { id } => {
            client.delete_image(project, id).await?;
            print_success(&format!("Image {} deleted", id));
        }
    }

    Ok(())
}
