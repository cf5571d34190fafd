//! Console Commands

use anyhow::Result;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use url::Url;

use clouddeck_client::ApiClient;
use clouddeck_console::{ConsoleBridge, DEFAULT_VIEWER_PATH};

use crate::output::{print_info, print_success, print_warning};

#[derive(Parser)]
pub struct ConsoleArgs {
    /// Server ID
    pub server_id: i64,

    /// Open the viewer in the default browser
    #[arg(short, long)]
    pub open: bool,

    /// Just print the viewer launch URL
    #[arg(short, long)]
    pub url_only: bool,

    /// Viewer page base URL (defaults to the backend host's noVNC page)
    #[arg(long)]
    pub viewer_base: Option<String>,
}

/// Derive the viewer page location from the backend API URL: same origin,
/// default viewer path.
fn default_viewer_base(api_url: &str) -> Result<String> {
    let url = Url::parse(api_url)?;
    let origin = url.origin().ascii_serialization();
    Ok(format!("{}{}", origin, DEFAULT_VIEWER_PATH))
}

pub async fn execute(args: ConsoleArgs, client: ApiClient, project: i64) -> Result<()> {
    let viewer_base = match args.viewer_base {
        Some(base) => base,
        None => default_viewer_base(client.context().base_url())?,
    };

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner());
    spinner.set_message("Requesting console access...");
    spinner.enable_steady_tick(Duration::from_millis(120));

    let mut bridge = ConsoleBridge::new();
    let requested = bridge
        .request_session(&client, project, args.server_id)
        .await;
    spinner.finish_and_clear();
    requested?;

    if args.url_only {
        println!("{}", bridge.embed()?);
        bridge.close();
        return Ok(());
    }

    if let Some(session) = bridge.session() {
        print_info("Console connection information (password shown only once):");
        println!("WebSocket URL: {}", session.signaling_url());
        println!("Password:      {}", session.credential().reveal());
        match session.expires_at() {
            Some(at) => println!("Expires:       {}", at.format("%Y-%m-%d %H:%M:%S UTC")),
            None => print_warning("No expiry reported; treat the session as short-lived"),
        }
    }

    if args.open {
        bridge.launch_external(&viewer_base)?;
        print_success("Opened console in browser");
    } else {
        println!();
        println!(
            "To open in browser, use: clouddeck console {} --open",
            args.server_id
        );
        bridge.close();
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_viewer_base_derived_from_api_origin() {
        let base = default_viewer_base("https://deck.example.com/api").unwrap();
        assert_eq!(base, "https://deck.example.com/novnc/vnc.html");

        let base = default_viewer_base("http://127.0.0.1:8000/api").unwrap();
        assert_eq!(base, "http://127.0.0.1:8000/novnc/vnc.html");
    }
}
