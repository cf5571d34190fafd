//! CloudDeck CLI - Main Entry Point
//!
//! Command-line interface for a CloudDeck backend: projects, servers,
//! volumes, networks, firewalls, floating IPs, SSH keys, images, action
//! logs, and remote console access.

use anyhow::anyhow;
use clap::{Parser, Subcommand};

mod commands;
mod config;
mod output;

use commands::{
    console, firewall, floating_ip, image, logs, network, project, server, server_type, ssh_key,
    volume,
};
use config::CliConfig;
use output::{print_error, print_success};

use clouddeck_client::{ApiClient, ApiContext};

/// CloudDeck CLI - Hetzner Cloud Management Console
#[derive(Parser)]
#[command(name = "clouddeck")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Backend API URL (overrides the configured one)
    #[arg(long, global = true, env = "CLOUDDECK_API_URL")]
    api_url: Option<String>,

    /// Project ID (overrides the configured default)
    #[arg(short, long, global = true)]
    project: Option<i64>,

    /// Output format
    #[arg(long, default_value = "table", global = true)]
    format: output::OutputFormat,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and store the session token
    Login {
        /// Username
        #[arg(short, long)]
        username: String,

        /// Password
        #[arg(long, env = "CLOUDDECK_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Manage projects
    #[command(subcommand)]
    Project(project::ProjectCommands),

    /// Manage servers
    #[command(subcommand)]
    Server(server::ServerCommands),

    /// Manage volumes
    #[command(subcommand)]
    Volume(volume::VolumeCommands),

    /// Manage private networks
    #[command(subcommand)]
    Network(network::NetworkCommands),

    /// Manage firewalls
    #[command(subcommand)]
    Firewall(firewall::FirewallCommands),

    /// Manage floating IPs
    #[command(subcommand, name = "floating-ip")]
    FloatingIp(floating_ip::FloatingIpCommands),

    /// Manage SSH keys
    #[command(subcommand, name = "ssh-key")]
    SshKey(ssh_key::SshKeyCommands),

    /// Manage images and snapshots
    #[command(subcommand)]
    Image(image::ImageCommands),

    /// List server types with pricing
    #[command(subcommand, name = "server-type")]
    ServerType(server_type::ServerTypeCommands),

    /// Access a server's remote console
    Console(console::ConsoleArgs),

    /// View the project action log
    Logs(logs::LogsArgs),

    /// Check backend connectivity and authentication
    Status,

    /// Show version information
    Version,
}

fn build_client(config: &CliConfig) -> anyhow::Result<ApiClient> {
    let mut ctx = ApiContext::new(&config.api_url);
    if let Some(token) = &config.token {
        ctx = ctx.with_token(token);
    }
    Ok(ApiClient::new(ctx)?)
}

fn require_project(project: Option<i64>) -> anyhow::Result<i64> {
    project.ok_or_else(|| {
        anyhow!("no project selected; pass --project or set default_project in the config file")
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_target(false)
        .init();

    let config_path = clouddeck_common::default_config_path();
    let mut config = CliConfig::load(&config_path)?;
    tracing::debug!("Using backend at {}", config.api_url);
    if let Some(url) = &cli.api_url {
        config.api_url = url.clone();
    }

    let project = cli.project.or(config.default_project);

    match cli.command {
        Commands::Login { username, password } => {
            let anonymous = ApiClient::new(ApiContext::new(&config.api_url))?;
            let session = anonymous.login(&username, &password).await?;
            config.token = Some(session.access_token);

            let user = build_client(&config)?.current_user().await?;
            config.save(&config_path)?;
            print_success(&format!(
                "Logged in as {} ({})",
                user.username, config.api_url
            ));
        }
        Commands::Project(cmd) => {
            project::execute(cmd, build_client(&config)?, cli.format).await?
        }
        Commands::Server(cmd) => {
            server::execute(cmd, build_client(&config)?, require_project(project)?, cli.format)
                .await?
        }
        Commands::Volume(cmd) => {
            volume::execute(cmd, build_client(&config)?, require_project(project)?, cli.format)
                .await?
        }
        Commands::Network(cmd) => {
            network::execute(cmd, build_client(&config)?, require_project(project)?, cli.format)
                .await?
        }
        Commands::Firewall(cmd) => {
            firewall::execute(cmd, build_client(&config)?, require_project(project)?, cli.format)
                .await?
        }
        Commands::FloatingIp(cmd) => {
            floating_ip::execute(cmd, build_client(&config)?, require_project(project)?, cli.format)
                .await?
        }
        Commands::SshKey(cmd) => {
            ssh_key::execute(cmd, build_client(&config)?, require_project(project)?, cli.format)
                .await?
        }
        Commands::Image(cmd) => {
            image::execute(cmd, build_client(&config)?, require_project(project)?, cli.format)
                .await?
        }
        Commands::ServerType(cmd) => {
            server_type::execute(cmd, build_client(&config)?, require_project(project)?, cli.format)
                .await?
        }
        Commands::Console(args) => {
            console::execute(args, build_client(&config)?, require_project(project)?).await?
        }
        Commands::Logs(args) => {
            logs::execute(args, build_client(&config)?, require_project(project)?, cli.format)
                .await?
        }
        Commands::Status => match build_client(&config)?.current_user().await {
            Ok(user) => {
                print_success(&format!(
                    "Authenticated as {} at {}",
                    user.username, config.api_url
                ));
            }
            Err(e) => {
                print_error(&format!("Cannot reach backend at {}: {}", config.api_url, e));
                std::process::exit(1);
            }
        },
        Commands::Version => {
            println!("CloudDeck CLI v{}", env!("CARGO_PKG_VERSION"));
            println!("Management console for Hetzner Cloud projects");
        }
    }

    Ok(())
}
