//! Backend REST Client

use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use clouddeck_common::types::*;
use clouddeck_common::{Error, Result};

use crate::context::ApiContext;

/// Error body shape used by the backend for all rejected requests
#[derive(Deserialize)]
struct ErrorBody {
    detail: String,
}

/// Client for communicating with the CloudDeck backend
pub struct ApiClient {
    http: reqwest::Client,
    ctx: ApiContext,
}

impl ApiClient {
    /// Create a new API client
    pub fn new(ctx: ApiContext) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| Error::Network(e.to_string()))?;
        Ok(Self { http, ctx })
    }

    /// The context this client was built with
    pub fn context(&self) -> &ApiContext {
        &self.ctx
    }

    fn builder(&self, method: Method, path: &str) -> RequestBuilder {
        let url = self.ctx.endpoint(path);
        debug!("{} {}", method, url);
        let mut req = self.http.request(method, url);
        if let Some(token) = self.ctx.token() {
            req = req.bearer_auth(token);
        }
        req
    }

    /// Send a request and decode the response, surfacing the backend's
    /// `detail` message on any non-success status.
    async fn send<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T> {
        let resp = req.send().await.map_err(|e| Error::Network(e.to_string()))?;
        let status = resp.status();
        if status.is_success() {
            resp.json::<T>()
                .await
                .map_err(|e| Error::Network(format!("invalid response body: {}", e)))
        } else {
            Err(Self::api_error(status, resp).await)
        }
    }

    async fn api_error(status: StatusCode, resp: reqwest::Response) -> Error {
        let detail = match resp.json::<ErrorBody>().await {
            Ok(body) => body.detail,
            Err(_) => status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string(),
        };
        Error::Api {
            status: status.as_u16(),
            detail,
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.send(self.builder(Method::GET, path)).await
    }

    async fn post_json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        self.send(self.builder(Method::POST, path).json(body)).await
    }

    async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.send(self.builder(Method::POST, path)).await
    }

    async fn put_json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        self.send(self.builder(Method::PUT, path).json(body)).await
    }

    async fn delete(&self, path: &str) -> Result<()> {
        let resp = self
            .builder(Method::DELETE, path)
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;
        let status = resp.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(Self::api_error(status, resp).await)
        }
    }

    // Auth operations

    /// Log in and obtain a bearer token. Form-encoded for OAuth2
    /// compatibility with the backend's token endpoint.
    pub async fn login(&self, username: &str, password: &str) -> Result<SessionToken> {
        let req = self
            .builder(Method::POST, "/auth/token")
            .form(&[("username", username), ("password", password)]);
        self.send(req).await
    }

    /// Fetch the authenticated user
    pub async fn current_user(&self) -> Result<User> {
        self.get_json("/auth/me").await
    }

    // Project operations

    /// List all projects
    pub async fn list_projects(&self) -> Result<Vec<Project>> {
        self.get_json("/projects").await
    }

    /// Get a project by ID
    pub async fn get_project(&self, id: i64) -> Result<Project> {
        self.get_json(&format!("/projects/{}", id)).await
    }

    /// Create a project
    pub async fn create_project(&self, req: &ProjectCreateRequest) -> Result<Project> {
        self.post_json("/projects", req).await
    }

    /// Update a project
    pub async fn update_project(&self, id: i64, req: &ProjectUpdateRequest) -> Result<Project> {
        self.put_json(&format!("/projects/{}", id), req).await
    }

    /// Delete a project
    pub async fn delete_project(&self, id: i64) -> Result<()> {
        self.delete(&format!("/projects/{}", id)).await
    }

    // Server operations

    /// List servers in a project
    pub async fn list_servers(&self, project: i64) -> Result<Vec<Server>> {
        let list: ServerList = self
            .get_json(&format!("/projects/{}/servers", project))
            .await?;
        Ok(list.servers)
    }

    /// Get a server by ID
    pub async fn get_server(&self, project: i64, id: i64) -> Result<Server> {
        self.get_json(&format!("/projects/{}/servers/{}", project, id))
            .await
    }

    /// Create a server. The response carries the root password exactly
    /// once; it cannot be fetched again.
    pub async fn create_server(
        &self,
        project: i64,
        req: &ServerCreateRequest,
    ) -> Result<CreatedServer> {
        self.post_json(&format!("/projects/{}/servers", project), req)
            .await
    }

    /// Delete a server
    pub async fn delete_server(&self, project: i64, id: i64) -> Result<()> {
        self.delete(&format!("/projects/{}/servers/{}", project, id))
            .await
    }

    /// Power a server on
    pub async fn power_on(&self, project: i64, id: i64) -> Result<()> {
        let _: serde_json::Value = self
            .post_empty(&format!("/projects/{}/servers/{}/power_on", project, id))
            .await?;
        Ok(())
    }

    /// Power a server off
    pub async fn power_off(&self, project: i64, id: i64) -> Result<()> {
        let _: serde_json::Value = self
            .post_empty(&format!("/projects/{}/servers/{}/power_off", project, id))
            .await?;
        Ok(())
    }

    /// Reboot a server
    pub async fn reboot(&self, project: i64, id: i64) -> Result<()> {
        let _: serde_json::Value = self
            .post_empty(&format!("/projects/{}/servers/{}/reboot", project, id))
            .await?;
        Ok(())
    }

    /// Request a remote-console grant for a server.
    ///
    /// Issues exactly one request and never retries: grants are single-use
    /// and blind retry can exhaust rate limits on the hypervisor API.
    pub async fn request_console(&self, project: i64, id: i64) -> Result<ConsoleGrant> {
        self.post_empty(&format!(
            "/projects/{}/servers/{}/request_console",
            project, id
        ))
        .await
    }

    // Image operations

    /// List images, optionally filtered by type (e.g. "snapshot")
    pub async fn list_images(&self, project: i64, image_type: Option<&str>) -> Result<Vec<Image>> {
        let path = match image_type {
            Some(t) => format!("/projects/{}/images?type={}", project, t),
            None => format!("/projects/{}/images", project),
        };
        let list: ImageList = self.get_json(&path).await?;
        Ok(list.images)
    }

    /// Delete an image or snapshot
    pub async fn delete_image(&self, project: i64, id: i64) -> Result<()> {
        self.delete(&format!("/projects/{}/images/{}", project, id))
            .await
    }

    /// List server types with pricing
    pub async fn list_server_types(&self, project: i64) -> Result<Vec<ServerType>> {
        let list: ServerTypeList = self
            .get_json(&format!("/projects/{}/server_types", project))
            .await?;
        Ok(list.server_types)
    }

    // Volume operations

    /// List volumes in a project
    pub async fn list_volumes(&self, project: i64) -> Result<Vec<Volume>> {
        let list: VolumeList = self
            .get_json(&format!("/projects/{}/volumes", project))
            .await?;
        Ok(list.volumes)
    }

    /// Get a volume by ID
    pub async fn get_volume(&self, project: i64, id: i64) -> Result<Volume> {
        self.get_json(&format!("/projects/{}/volumes/{}", project, id))
            .await
    }

    /// Create a volume
    pub async fn create_volume(&self, project: i64, req: &VolumeCreateRequest) -> Result<Volume> {
        self.post_json(&format!("/projects/{}/volumes", project), req)
            .await
    }

    /// Rename a volume
    pub async fn update_volume(&self, project: i64, id: i64, name: &str) -> Result<Volume> {
        self.put_json(
            &format!("/projects/{}/volumes/{}", project, id),
            &serde_json::json!({ "name": name }),
        )
        .await
    }

    /// Delete a volume
    pub async fn delete_volume(&self, project: i64, id: i64) -> Result<()> {
        self.delete(&format!("/projects/{}/volumes/{}", project, id))
            .await
    }

    /// Grow a volume. Shrinking is not supported by the backend.
    pub async fn resize_volume(&self, project: i64, id: i64, size: u64) -> Result<Volume> {
        self.post_json(
            &format!("/projects/{}/volumes/{}/resize", project, id),
            &serde_json::json!({ "size": size }),
        )
        .await
    }

    /// Attach a volume to a server
    pub async fn attach_volume(
        &self,
        project: i64,
        id: i64,
        server: i64,
        automount: bool,
    ) -> Result<Volume> {
        self.post_json(
            &format!("/projects/{}/volumes/{}/attach", project, id),
            &serde_json::json!({ "server": server, "automount": automount }),
        )
        .await
    }

    /// Detach a volume from its server
    pub async fn detach_volume(&self, project: i64, id: i64) -> Result<Volume> {
        self.post_empty(&format!("/projects/{}/volumes/{}/detach", project, id))
            .await
    }

    // Network operations

    /// List private networks
    pub async fn list_networks(&self, project: i64) -> Result<Vec<NetworkInfo>> {
        let list: NetworkList = self
            .get_json(&format!("/projects/{}/networks", project))
            .await?;
        Ok(list.networks)
    }

    /// Get a network by ID
    pub async fn get_network(&self, project: i64, id: i64) -> Result<NetworkInfo> {
        self.get_json(&format!("/projects/{}/networks/{}", project, id))
            .await
    }

    /// Create a network
    pub async fn create_network(
        &self,
        project: i64,
        req: &NetworkCreateRequest,
    ) -> Result<NetworkInfo> {
        self.post_json(&format!("/projects/{}/networks", project), req)
            .await
    }

    /// Rename a network
    pub async fn update_network(&self, project: i64, id: i64, name: &str) -> Result<NetworkInfo> {
        self.put_json(
            &format!("/projects/{}/networks/{}", project, id),
            &serde_json::json!({ "name": name }),
        )
        .await
    }

    /// Delete a network
    pub async fn delete_network(&self, project: i64, id: i64) -> Result<()> {
        self.delete(&format!("/projects/{}/networks/{}", project, id))
            .await
    }

    // Firewall operations

    /// List firewalls
    pub async fn list_firewalls(&self, project: i64) -> Result<Vec<Firewall>> {
        let list: FirewallList = self
            .get_json(&format!("/projects/{}/firewalls", project))
            .await?;
        Ok(list.firewalls)
    }

    /// Get a firewall by ID
    pub async fn get_firewall(&self, project: i64, id: i64) -> Result<Firewall> {
        self.get_json(&format!("/projects/{}/firewalls/{}", project, id))
            .await
    }

    /// Create a firewall
    pub async fn create_firewall(
        &self,
        project: i64,
        req: &FirewallCreateRequest,
    ) -> Result<Firewall> {
        self.post_json(&format!("/projects/{}/firewalls", project), req)
            .await
    }

    /// Replace a firewall's name and rule set
    pub async fn update_firewall(
        &self,
        project: i64,
        id: i64,
        req: &FirewallCreateRequest,
    ) -> Result<Firewall> {
        self.put_json(&format!("/projects/{}/firewalls/{}", project, id), req)
            .await
    }

    /// Delete a firewall
    pub async fn delete_firewall(&self, project: i64, id: i64) -> Result<()> {
        self.delete(&format!("/projects/{}/firewalls/{}", project, id))
            .await
    }

    // Floating IP operations

    /// List floating IPs
    pub async fn list_floating_ips(&self, project: i64) -> Result<Vec<FloatingIp>> {
        let list: FloatingIpList = self
            .get_json(&format!("/projects/{}/floating_ips", project))
            .await?;
        Ok(list.floating_ips)
    }

    /// Get a floating IP by ID
    pub async fn get_floating_ip(&self, project: i64, id: i64) -> Result<FloatingIp> {
        self.get_json(&format!("/projects/{}/floating_ips/{}", project, id))
            .await
    }

    /// Create a floating IP
    pub async fn create_floating_ip(
        &self,
        project: i64,
        req: &FloatingIpCreateRequest,
    ) -> Result<FloatingIp> {
        self.post_json(&format!("/projects/{}/floating_ips", project), req)
            .await
    }

    /// Update a floating IP's description
    pub async fn update_floating_ip(
        &self,
        project: i64,
        id: i64,
        description: &str,
    ) -> Result<FloatingIp> {
        self.put_json(
            &format!("/projects/{}/floating_ips/{}", project, id),
            &serde_json::json!({ "description": description }),
        )
        .await
    }

    /// Delete a floating IP
    pub async fn delete_floating_ip(&self, project: i64, id: i64) -> Result<()> {
        self.delete(&format!("/projects/{}/floating_ips/{}", project, id))
            .await
    }

    /// Assign a floating IP to a server
    pub async fn assign_floating_ip(
        &self,
        project: i64,
        id: i64,
        server: i64,
    ) -> Result<FloatingIp> {
        self.post_json(
            &format!("/projects/{}/floating_ips/{}/assign", project, id),
            &serde_json::json!({ "server": server }),
        )
        .await
    }

    /// Unassign a floating IP
    pub async fn unassign_floating_ip(&self, project: i64, id: i64) -> Result<FloatingIp> {
        self.post_empty(&format!("/projects/{}/floating_ips/{}/unassign", project, id))
            .await
    }

    // SSH key operations

    /// List SSH keys
    pub async fn list_ssh_keys(&self, project: i64) -> Result<Vec<SshKey>> {
        let list: SshKeyList = self
            .get_json(&format!("/projects/{}/ssh_keys", project))
            .await?;
        Ok(list.ssh_keys)
    }

    /// Get an SSH key by ID
    pub async fn get_ssh_key(&self, project: i64, id: i64) -> Result<SshKey> {
        self.get_json(&format!("/projects/{}/ssh_keys/{}", project, id))
            .await
    }

    /// Register an SSH public key
    pub async fn create_ssh_key(&self, project: i64, req: &SshKeyCreateRequest) -> Result<SshKey> {
        self.post_json(&format!("/projects/{}/ssh_keys", project), req)
            .await
    }

    /// Rename an SSH key
    pub async fn update_ssh_key(&self, project: i64, id: i64, name: &str) -> Result<SshKey> {
        self.put_json(
            &format!("/projects/{}/ssh_keys/{}", project, id),
            &serde_json::json!({ "name": name }),
        )
        .await
    }

    /// Delete an SSH key
    pub async fn delete_ssh_key(&self, project: i64, id: i64) -> Result<()> {
        self.delete(&format!("/projects/{}/ssh_keys/{}", project, id))
            .await
    }

    // Action log operations

    /// Fetch action log entries, newest first
    pub async fn list_logs(
        &self,
        project: i64,
        skip: u32,
        limit: u32,
    ) -> Result<Vec<ActionLogEntry>> {
        self.get_json(&format!(
            "/projects/{}/logs?skip={}&limit={}",
            project, skip, limit
        ))
        .await
    }
}
