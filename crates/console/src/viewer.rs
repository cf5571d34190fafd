//! Signaling URL to viewer descriptor transform
//!
//! Pure and synchronous: the only networked step of a console session is
//! the bootstrap request, which lives in the client crate. Everything here
//! is independently testable string work.

use url::Url;

use clouddeck_common::{Error, Result};

/// Default path of the embedded viewer page
pub const DEFAULT_VIEWER_PATH: &str = "/novnc/vnc.html";

/// Connection parameters for the embedded remote-display viewer, decomposed
/// from a signaling URL. The credential is not part of the descriptor; it
/// is attached at launch time from the owning session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewerDescriptor {
    pub host: String,
    pub port: u16,
    pub encrypted: bool,
    /// Original pathname plus query string, percent-encoding preserved
    pub path: String,
}

/// Decompose a signaling URL into viewer connection parameters.
///
/// The port always resolves to a concrete value: an explicit port wins,
/// otherwise 443 for encrypted transport and 80 for plaintext. The path
/// keeps the URL's own percent-encoding; it is never decoded here.
pub fn parse_signaling_url(raw: &str) -> Result<ViewerDescriptor> {
    let url = Url::parse(raw).map_err(|e| Error::MalformedUrl(e.to_string()))?;

    let host = url
        .host_str()
        .filter(|h| !h.is_empty())
        .ok_or(Error::MissingHost)?
        .to_string();

    let encrypted = match url.scheme() {
        "wss" => true,
        "ws" => false,
        other => {
            return Err(Error::UnsupportedScheme {
                scheme: other.to_string(),
            })
        }
    };

    let port = url.port().unwrap_or(if encrypted { 443 } else { 80 });

    let mut path = url.path().to_string();
    if let Some(query) = url.query() {
        path.push('?');
        path.push_str(query);
    }

    Ok(ViewerDescriptor {
        host,
        port,
        encrypted,
        path,
    })
}

/// Build the viewer launch target for a descriptor.
///
/// `host`, `path` and the credential are percent-encoded independently
/// before concatenation; the composed string is not re-encoded. `port` is
/// a literal decimal and `encrypt` a literal `0`/`1` token, matching what
/// the viewer expects.
pub fn build_viewer_launch_target(descriptor: &ViewerDescriptor, credential: &str) -> String {
    build_viewer_launch_target_with_base(DEFAULT_VIEWER_PATH, descriptor, credential)
}

/// Same as [`build_viewer_launch_target`] with an explicit viewer base,
/// e.g. an absolute URL for an external browser launch.
pub fn build_viewer_launch_target_with_base(
    viewer_base: &str,
    descriptor: &ViewerDescriptor,
    credential: &str,
) -> String {
    format!(
        "{}?autoconnect=true&host={}&port={}&encrypt={}&path={}&password={}",
        viewer_base,
        urlencoding::encode(&descriptor.host),
        descriptor.port,
        if descriptor.encrypted { "1" } else { "0" },
        urlencoding::encode(&descriptor.path),
        urlencoding::encode(credential),
    )
}
