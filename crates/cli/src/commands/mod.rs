//! CLI command modules

pub mod console;
pub mod firewall;
pub mod floating_ip;
pub mod image;
pub mod logs;
pub mod network;
pub mod project;
pub mod server;
pub mod server_type;
pub mod ssh_key;
pub mod volume;

/// Shorten an optional field for table display
pub(crate) fn opt(value: &Option<String>) -> String {
    value.clone().unwrap_or_else(|| "-".to_string())
}

/// Format an optional timestamp for table display
pub(crate) fn opt_time(value: &Option<chrono::DateTime<chrono::Utc>>) -> String {
    value
        .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "-".to_string())
}
