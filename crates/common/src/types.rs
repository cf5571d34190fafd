//! Core types for CloudDeck
//!
//! Typed schemas for the backend's REST payloads. Optional backend fields
//! are explicit `Option`s with defaults applied here, at the
//! deserialization boundary, not in view logic.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Server lifecycle state as reported by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServerStatus {
    Running,
    Initializing,
    Starting,
    Stopping,
    Off,
    Deleting,
    Migrating,
    Rebuilding,
    #[serde(other)]
    Unknown,
}

impl Default for ServerStatus {
    fn default() -> Self {
        Self::Unknown
    }
}

impl std::fmt::Display for ServerStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServerStatus::Running => write!(f, "running"),
            ServerStatus::Initializing => write!(f, "initializing"),
            ServerStatus::Starting => write!(f, "starting"),
            ServerStatus::Stopping => write!(f, "stopping"),
            ServerStatus::Off => write!(f, "off"),
            ServerStatus::Deleting => write!(f, "deleting"),
            ServerStatus::Migrating => write!(f, "migrating"),
            ServerStatus::Rebuilding => write!(f, "rebuilding"),
            ServerStatus::Unknown => write!(f, "unknown"),
        }
    }
}

/// A project groups backend resources under one API credential
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Cloud server summary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Server {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub status: ServerStatus,
    #[serde(default)]
    pub ip: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub server_type: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub created: Option<DateTime<Utc>>,
}

/// Response to server creation. The root password is only present on
/// initial creation and never retrievable again.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedServer {
    pub server: Server,
    #[serde(default)]
    pub root_password: Option<String>,
}

/// Request body for server creation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerCreateRequest {
    pub name: String,
    pub server_type: String,
    pub image: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub ssh_keys: Vec<String>,
}

/// OS image or snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Image {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "type", default)]
    pub image_type: Option<String>,
    #[serde(default)]
    pub os_flavor: Option<String>,
}

/// Per-location price for a server type. The backend forwards gross
/// prices as decimal strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerTypePrice {
    pub location: String,
    #[serde(default)]
    pub price_monthly: Option<String>,
}

/// Server type (machine size) with pricing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerType {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub cores: u32,
    pub memory: f64,
    pub disk: u64,
    #[serde(default)]
    pub prices: Vec<ServerTypePrice>,
}

/// Block storage volume
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Volume {
    pub id: i64,
    pub name: String,
    pub size: u64,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub server: Option<i64>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub created: Option<DateTime<Utc>>,
}

/// Request body for volume creation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VolumeCreateRequest {
    pub name: String,
    pub size: u64,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub server: Option<i64>,
}

/// Subnet inside a private network
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subnet {
    pub ip_range: String,
    #[serde(rename = "type", default)]
    pub subnet_type: Option<String>,
    #[serde(default)]
    pub network_zone: Option<String>,
}

/// Private network
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkInfo {
    pub id: i64,
    pub name: String,
    pub ip_range: String,
    #[serde(default)]
    pub subnets: Vec<Subnet>,
    #[serde(default)]
    pub servers: Vec<i64>,
    #[serde(default)]
    pub created: Option<DateTime<Utc>>,
}

/// Firewall rule direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleDirection {
    In,
    Out,
}

impl std::fmt::Display for RuleDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RuleDirection::In => write!(f, "in"),
            RuleDirection::Out => write!(f, "out"),
        }
    }
}

/// Single firewall rule
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FirewallRule {
    pub direction: RuleDirection,
    pub protocol: String,
    #[serde(default)]
    pub port: Option<String>,
    #[serde(default)]
    pub source_ips: Vec<String>,
    #[serde(default)]
    pub destination_ips: Vec<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Firewall with its rule set
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Firewall {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub rules: Vec<FirewallRule>,
    #[serde(default)]
    pub applied_to: Vec<i64>,
    #[serde(default)]
    pub created: Option<DateTime<Utc>>,
}

/// Floating IP
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FloatingIp {
    pub id: i64,
    pub ip: String,
    #[serde(rename = "type", default)]
    pub ip_type: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub server: Option<i64>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub blocked: bool,
    #[serde(default)]
    pub dns_ptr: Option<String>,
    #[serde(default)]
    pub created: Option<DateTime<Utc>>,
}

/// SSH public key registered with the backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SshKey {
    pub id: i64,
    pub name: String,
    pub fingerprint: String,
    #[serde(default)]
    pub public_key: Option<String>,
    #[serde(default)]
    pub created: Option<DateTime<Utc>>,
}

/// Action log entry recorded by the backend for each operation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionLogEntry {
    pub id: i64,
    pub action: String,
    #[serde(default)]
    pub details: Option<String>,
    pub status: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Console bootstrap response: a signaling endpoint plus a one-time
/// credential. Wire form only; the console crate owns the session
/// lifecycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsoleGrant {
    pub wss_url: String,
    pub password: String,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

/// Bearer token issued on login
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionToken {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
}

/// Authenticated console user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
}

/// Request body for project creation. The API key is validated by the
/// backend before the project is stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectCreateRequest {
    pub name: String,
    pub api_key: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Partial project update; omitted fields are left unchanged
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectUpdateRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

/// Request body for network creation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkCreateRequest {
    pub name: String,
    pub ip_range: String,
    #[serde(default)]
    pub subnets: Vec<Subnet>,
}

/// Request body for firewall creation and replacement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FirewallCreateRequest {
    pub name: String,
    #[serde(default)]
    pub rules: Vec<FirewallRule>,
}

/// Request body for floating IP creation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FloatingIpCreateRequest {
    #[serde(rename = "type")]
    pub ip_type: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

/// Request body for SSH key registration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SshKeyCreateRequest {
    pub name: String,
    pub public_key: String,
}

// List wrappers. The backend nests collections under a resource key;
// projects and logs come back as bare arrays.

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerList {
    pub servers: Vec<Server>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageList {
    pub images: Vec<Image>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerTypeList {
    pub server_types: Vec<ServerType>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VolumeList {
    pub volumes: Vec<Volume>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkList {
    pub networks: Vec<NetworkInfo>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FirewallList {
    pub firewalls: Vec<Firewall>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FloatingIpList {
    pub floating_ips: Vec<FloatingIp>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SshKeyList {
    pub ssh_keys: Vec<SshKey>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_deserializes_with_null_fields() {
        let json = r#"{
            "id": 42,
            "name": "web-1",
            "status": "running",
            "ip": null,
            "location": "fsn1",
            "server_type": "cx22",
            "image": null,
            "created": "2025-03-01T12:00:00Z"
        }"#;
        let server: Server = serde_json::from_str(json).unwrap();
        assert_eq!(server.id, 42);
        assert_eq!(server.status, ServerStatus::Running);
        assert!(server.ip.is_none());
        assert_eq!(server.location.as_deref(), Some("fsn1"));
    }

    #[test]
    fn test_unknown_status_falls_back() {
        let json = r#"{"id": 1, "name": "x", "status": "some_new_state"}"#;
        let server: Server = serde_json::from_str(json).unwrap();
        assert_eq!(server.status, ServerStatus::Unknown);
    }

    #[test]
    fn test_missing_optional_fields_default() {
        let json = r#"{"id": 1, "name": "x"}"#;
        let server: Server = serde_json::from_str(json).unwrap();
        assert_eq!(server.status, ServerStatus::Unknown);
        assert!(server.ip.is_none());
        assert!(server.created.is_none());
    }

    #[test]
    fn test_console_grant_expiry_optional() {
        let json = r#"{"wss_url": "wss://c.example.com/ws", "password": "s3cret"}"#;
        let grant: ConsoleGrant = serde_json::from_str(json).unwrap();
        assert!(grant.expires_at.is_none());

        let json = r#"{
            "wss_url": "wss://c.example.com/ws",
            "password": "s3cret",
            "expires_at": "2025-03-01T13:00:00Z"
        }"#;
        let grant: ConsoleGrant = serde_json::from_str(json).unwrap();
        assert!(grant.expires_at.is_some());
    }

    #[test]
    fn test_created_server_root_password_only_on_create() {
        let json = r#"{
            "server": {"id": 7, "name": "db-1", "status": "initializing", "ip": "203.0.113.5"},
            "root_password": "initial-pw"
        }"#;
        let created: CreatedServer = serde_json::from_str(json).unwrap();
        assert_eq!(created.root_password.as_deref(), Some("initial-pw"));

        let json = r#"{"server": {"id": 7, "name": "db-1"}}"#;
        let created: CreatedServer = serde_json::from_str(json).unwrap();
        assert!(created.root_password.is_none());
    }
}
