//! Console session lifecycle
//!
//! One bridge instance manages one console view, from bootstrap request to
//! close. Opening a console for another target means another bridge; there
//! is no shared state between instances.

use chrono::Utc;
use tracing::{debug, warn};

use clouddeck_client::ApiClient;
use clouddeck_common::types::ConsoleGrant;
use clouddeck_common::{Error, Result};

use crate::launch;
use crate::session::ConsoleSession;
use crate::viewer::{self, ViewerDescriptor};

/// UI-observable lifecycle phase of a console session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsolePhase {
    Idle,
    Requesting,
    Ready,
    Embedded,
    ExternallyLaunched,
    Closed,
}

impl std::fmt::Display for ConsolePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConsolePhase::Idle => write!(f, "idle"),
            ConsolePhase::Requesting => write!(f, "requesting"),
            ConsolePhase::Ready => write!(f, "ready"),
            ConsolePhase::Embedded => write!(f, "embedded"),
            ConsolePhase::ExternallyLaunched => write!(f, "externally_launched"),
            ConsolePhase::Closed => write!(f, "closed"),
        }
    }
}

/// Bridge between the backend's console bootstrap and the embedded viewer
pub struct ConsoleBridge {
    phase: ConsolePhase,
    session: Option<ConsoleSession>,
    descriptor: Option<ViewerDescriptor>,
}

impl Default for ConsoleBridge {
    fn default() -> Self {
        Self::new()
    }
}

impl ConsoleBridge {
    pub fn new() -> Self {
        Self {
            phase: ConsolePhase::Idle,
            session: None,
            descriptor: None,
        }
    }

    pub fn phase(&self) -> ConsolePhase {
        self.phase
    }

    pub fn session(&self) -> Option<&ConsoleSession> {
        self.session.as_ref()
    }

    pub fn descriptor(&self) -> Option<&ViewerDescriptor> {
        self.descriptor.as_ref()
    }

    fn expect_phase(&self, want: ConsolePhase, to: ConsolePhase) -> Result<()> {
        if self.phase == want {
            Ok(())
        } else {
            Err(Error::InvalidStateTransition {
                from: self.phase.to_string(),
                to: to.to_string(),
            })
        }
    }

    /// Request a console session for one server.
    ///
    /// Legal only from `Idle`; concurrent requests for the same target are
    /// a caller bug and rejected structurally. Exactly one backend call,
    /// never retried. Any failure (transport, backend rejection, unusable
    /// signaling URL) is terminal: the bridge lands in `Closed` and the
    /// error is surfaced as-is.
    pub async fn request_session(
        &mut self,
        client: &ApiClient,
        project: i64,
        server: i64,
    ) -> Result<()> {
        self.expect_phase(ConsolePhase::Idle, ConsolePhase::Requesting)?;
        self.phase = ConsolePhase::Requesting;

        let outcome = client.request_console(project, server).await;
        self.complete_request(outcome)
    }

    /// Resolve an in-flight request. Split from the network call so the
    /// transition logic is testable without a backend.
    fn complete_request(&mut self, outcome: Result<ConsoleGrant>) -> Result<()> {
        if self.phase == ConsolePhase::Closed {
            // View was torn down while the request was in flight; the
            // response is discarded without side effects.
            debug!("Discarding console grant for a closed view");
            return Err(Error::SessionClosed);
        }

        match outcome {
            Ok(grant) => match viewer::parse_signaling_url(&grant.wss_url) {
                Ok(descriptor) => {
                    debug!(
                        "Console session ready: {}:{} (encrypted: {})",
                        descriptor.host, descriptor.port, descriptor.encrypted
                    );
                    self.descriptor = Some(descriptor);
                    self.session = Some(ConsoleSession::from(grant));
                    self.phase = ConsolePhase::Ready;
                    Ok(())
                }
                Err(e) => {
                    warn!("Console signaling URL unusable");
                    self.phase = ConsolePhase::Closed;
                    Err(e)
                }
            },
            Err(e) => {
                self.phase = ConsolePhase::Closed;
                Err(e)
            }
        }
    }

    /// Launch target for the current session
    fn build_target(&self, viewer_base: Option<&str>) -> Result<String> {
        let session = self.session.as_ref().ok_or(Error::SessionClosed)?;
        let descriptor = self.descriptor.as_ref().ok_or(Error::SessionClosed)?;
        let credential = session.credential().reveal();
        Ok(match viewer_base {
            Some(base) => {
                viewer::build_viewer_launch_target_with_base(base, descriptor, credential)
            }
            None => viewer::build_viewer_launch_target(descriptor, credential),
        })
    }

    /// Move to the inline viewer, yielding its launch target
    pub fn embed(&mut self) -> Result<String> {
        self.expect_phase(ConsolePhase::Ready, ConsolePhase::Embedded)?;
        self.ensure_live()?;
        let target = self.build_target(None)?;
        self.phase = ConsolePhase::Embedded;
        Ok(target)
    }

    /// Open the viewer in the platform browser.
    ///
    /// A blocked launch closes the bridge and surfaces the error; there is
    /// no silent fallback.
    pub fn launch_external(&mut self, viewer_base: &str) -> Result<()> {
        self.expect_phase(ConsolePhase::Ready, ConsolePhase::ExternallyLaunched)?;
        self.ensure_live()?;
        let target = self.build_target(Some(viewer_base))?;

        match launch::open_in_browser(&target) {
            Ok(()) => {
                self.phase = ConsolePhase::ExternallyLaunched;
                Ok(())
            }
            Err(e) => {
                warn!("External console launch blocked");
                self.close();
                Err(e)
            }
        }
    }

    /// Close the view: wipe the credential and drop the session. A closed
    /// credential is never offered again. Idempotent.
    pub fn close(&mut self) {
        if self.phase == ConsolePhase::Closed {
            return;
        }
        if let Some(session) = &mut self.session {
            session.wipe();
        }
        self.session = None;
        self.descriptor = None;
        self.phase = ConsolePhase::Closed;
    }

    /// Advisory expiry check. The bridge never polls for expiry; it only
    /// refuses to hand out a credential it observed to be dead.
    fn ensure_live(&mut self) -> Result<()> {
        let expired = self
            .session
            .as_ref()
            .map(|s| s.is_expired(Utc::now()))
            .unwrap_or(true);
        if expired {
            self.close();
            return Err(Error::SessionClosed);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn grant(wss_url: &str) -> ConsoleGrant {
        ConsoleGrant {
            wss_url: wss_url.to_string(),
            password: "one-time-pw".to_string(),
            expires_at: Some(Utc::now() + Duration::hours(1)),
        }
    }

    fn ready_bridge() -> ConsoleBridge {
        let mut bridge = ConsoleBridge::new();
        bridge.phase = ConsolePhase::Requesting;
        bridge
            .complete_request(Ok(grant("wss://console.example.com:6080/websockify?token=abc")))
            .unwrap();
        bridge
    }

    #[test]
    fn test_starts_idle() {
        let bridge = ConsoleBridge::new();
        assert_eq!(bridge.phase(), ConsolePhase::Idle);
        assert!(bridge.session().is_none());
    }

    #[test]
    fn test_successful_bootstrap_reaches_ready() {
        let bridge = ready_bridge();
        assert_eq!(bridge.phase(), ConsolePhase::Ready);
        let descriptor = bridge.descriptor().unwrap();
        assert_eq!(descriptor.host, "console.example.com");
        assert_eq!(descriptor.port, 6080);
        assert!(descriptor.encrypted);
        assert_eq!(bridge.session().unwrap().credential().reveal(), "one-time-pw");
    }

    #[test]
    fn test_backend_failure_closes_without_ready() {
        let mut bridge = ConsoleBridge::new();
        bridge.phase = ConsolePhase::Requesting;
        let err = bridge
            .complete_request(Err(Error::Api {
                status: 404,
                detail: "Server not found: 999".to_string(),
            }))
            .unwrap_err();
        assert!(err.to_string().contains("Server not found"));
        assert_eq!(bridge.phase(), ConsolePhase::Closed);
        assert!(bridge.session().is_none());
    }

    #[test]
    fn test_unusable_signaling_url_closes() {
        let mut bridge = ConsoleBridge::new();
        bridge.phase = ConsolePhase::Requesting;
        let err = bridge
            .complete_request(Ok(grant("ftp://console.example.com/ws")))
            .unwrap_err();
        assert!(err.is_url_parse_error());
        assert_eq!(err.to_string(), "invalid console URL format");
        assert_eq!(bridge.phase(), ConsolePhase::Closed);
    }

    #[test]
    fn test_response_after_close_is_discarded() {
        let mut bridge = ConsoleBridge::new();
        bridge.phase = ConsolePhase::Requesting;
        bridge.close();
        let err = bridge
            .complete_request(Ok(grant("wss://console.example.com/ws")))
            .unwrap_err();
        assert!(matches!(err, Error::SessionClosed));
        assert!(bridge.session().is_none());
        assert_eq!(bridge.phase(), ConsolePhase::Closed);
    }

    #[test]
    fn test_embed_yields_target_with_credential() {
        let mut bridge = ready_bridge();
        let target = bridge.embed().unwrap();
        assert_eq!(bridge.phase(), ConsolePhase::Embedded);
        assert!(target.contains("password=one-time-pw"));
        assert!(target.contains("host=console.example.com"));
    }

    #[test]
    fn test_embed_requires_ready() {
        let mut bridge = ConsoleBridge::new();
        match bridge.embed() {
            Err(Error::InvalidStateTransition { from, to }) => {
                assert_eq!(from, "idle");
                assert_eq!(to, "embedded");
            }
            other => panic!("expected InvalidStateTransition, got {:?}", other.is_ok()),
        }
    }

    #[test]
    fn test_request_only_legal_from_idle() {
        let bridge = ready_bridge();
        let err = bridge
            .expect_phase(ConsolePhase::Idle, ConsolePhase::Requesting)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidStateTransition { .. }));
    }

    #[test]
    fn test_close_wipes_credential_and_refuses_reuse() {
        let mut bridge = ready_bridge();
        bridge.close();
        assert_eq!(bridge.phase(), ConsolePhase::Closed);
        assert!(bridge.session().is_none());
        assert!(matches!(bridge.embed(), Err(Error::InvalidStateTransition { .. })));
        // Idempotent.
        bridge.close();
        assert_eq!(bridge.phase(), ConsolePhase::Closed);
    }

    #[test]
    fn test_expired_session_refused_and_closed() {
        let mut bridge = ConsoleBridge::new();
        bridge.phase = ConsolePhase::Requesting;
        bridge
            .complete_request(Ok(ConsoleGrant {
                wss_url: "wss://console.example.com/ws".to_string(),
                password: "pw".to_string(),
                expires_at: Some(Utc::now() - Duration::minutes(5)),
            }))
            .unwrap();
        assert_eq!(bridge.phase(), ConsolePhase::Ready);

        match bridge.embed() {
            Err(Error::SessionClosed) => {}
            other => panic!("expected SessionClosed, got {:?}", other.is_ok()),
        }
        assert_eq!(bridge.phase(), ConsolePhase::Closed);
    }
}
