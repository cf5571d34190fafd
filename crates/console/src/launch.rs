//! External viewer launch

use std::process::Command;
use tracing::debug;

use clouddeck_common::{Error, Result};

/// Open a URL in the default browser.
///
/// The URL embeds the one-time credential, so it is never logged. A spawn
/// failure maps to [`Error::LaunchBlocked`]; callers surface it instead of
/// failing silently.
pub fn open_in_browser(url: &str) -> Result<()> {
    debug!("Opening console viewer in browser");

    #[cfg(target_os = "macos")]
    let spawned = Command::new("open").arg(url).spawn();

    #[cfg(target_os = "linux")]
    let spawned = Command::new("xdg-open").arg(url).spawn();

    #[cfg(target_os = "windows")]
    let spawned = Command::new("cmd").args(["/C", "start", url]).spawn();

    #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
    let spawned: std::io::Result<std::process::Child> = Err(std::io::Error::new(
        std::io::ErrorKind::Unsupported,
        "no browser opener on this platform",
    ));

    spawned
        .map(|_| ())
        .map_err(|e| Error::LaunchBlocked(e.to_string()))
}
