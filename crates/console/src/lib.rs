//! CloudDeck console session bridge
//!
//! Turns a backend console grant into parameters for an embedded
//! remote-display viewer and manages the credential's exposure window:
//! surfaced once, time-boxed, wiped on close.
//!
//! The bootstrap request is the only networked step; the URL-to-descriptor
//! transform and launch-target assembly are pure functions.

mod bridge;
mod launch;
mod session;
mod viewer;

pub use bridge::{ConsoleBridge, ConsolePhase};
pub use launch::open_in_browser;
pub use session::{ConsoleSession, Credential};
pub use viewer::{
    build_viewer_launch_target, build_viewer_launch_target_with_base, parse_signaling_url,
    ViewerDescriptor, DEFAULT_VIEWER_PATH,
};
