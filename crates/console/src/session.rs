//! Console session state
//!
//! A session holds exactly one short-lived remote-console grant. The
//! credential is a one-time secret: it never reaches logs or debug output,
//! and its buffer is wiped when the session closes or drops.

use chrono::{DateTime, Duration, Utc};

use clouddeck_common::types::ConsoleGrant;

/// One-time console credential
pub struct Credential(String);

impl Credential {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    /// Read the secret. Callers surface it to the user exactly once.
    pub fn reveal(&self) -> &str {
        &self.0
    }

    /// Overwrite the secret in place, then empty it
    pub fn wipe(&mut self) {
        // SAFETY: NUL bytes are valid single-byte UTF-8, so overwriting
        // every byte keeps the string well-formed.
        unsafe {
            for b in self.0.as_bytes_mut() {
                *b = 0;
            }
        }
        self.0.clear();
    }

    pub fn is_wiped(&self) -> bool {
        self.0.is_empty()
    }
}

impl Drop for Credential {
    fn drop(&mut self) {
        self.wipe();
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Credential([redacted])")
    }
}

impl std::fmt::Display for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("[redacted]")
    }
}

/// A granted remote-console credential, held in memory only
#[derive(Debug)]
pub struct ConsoleSession {
    signaling_url: String,
    credential: Credential,
    expires_at: Option<DateTime<Utc>>,
}

impl ConsoleSession {
    /// Signaling endpoint the viewer will connect to
    pub fn signaling_url(&self) -> &str {
        &self.signaling_url
    }

    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    /// Absolute expiry, when the backend reported one
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    /// Whether the grant has expired. Expiry is advisory; the proxy
    /// enforces it, this only stops offering a dead credential.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        match self.expires_at {
            Some(at) => now >= at,
            None => false,
        }
    }

    /// An unknown expiry is treated as already near expiry
    pub fn is_near_expiry(&self, now: DateTime<Utc>) -> bool {
        match self.expires_at {
            Some(at) => now + Duration::seconds(60) >= at,
            None => true,
        }
    }

    /// Wipe the credential. The session stays allocated but unusable.
    pub fn wipe(&mut self) {
        self.credential.wipe();
    }
}

impl From<ConsoleGrant> for ConsoleSession {
    fn from(grant: ConsoleGrant) -> Self {
        Self {
            signaling_url: grant.wss_url,
            credential: Credential::new(grant.password),
            expires_at: grant.expires_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grant(expires_at: Option<DateTime<Utc>>) -> ConsoleGrant {
        ConsoleGrant {
            wss_url: "wss://console.example.com/ws".to_string(),
            password: "one-time-pw".to_string(),
            expires_at,
        }
    }

    #[test]
    fn test_credential_never_in_debug_output() {
        let session = ConsoleSession::from(grant(None));
        let rendered = format!("{:?}", session);
        assert!(!rendered.contains("one-time-pw"));
        assert!(rendered.contains("redacted"));
    }

    #[test]
    fn test_wipe_clears_secret() {
        let mut session = ConsoleSession::from(grant(None));
        assert_eq!(session.credential().reveal(), "one-time-pw");
        session.wipe();
        assert!(session.credential().is_wiped());
        assert_eq!(session.credential().reveal(), "");
    }

    #[test]
    fn test_expiry_is_advisory() {
        let now = Utc::now();
        let session = ConsoleSession::from(grant(Some(now + Duration::hours(1))));
        assert!(!session.is_expired(now));
        assert!(session.is_expired(now + Duration::hours(2)));
    }

    #[test]
    fn test_unknown_expiry_treated_as_near() {
        let now = Utc::now();
        let session = ConsoleSession::from(grant(None));
        assert!(!session.is_expired(now));
        assert!(session.is_near_expiry(now));

        let session = ConsoleSession::from(grant(Some(now + Duration::hours(1))));
        assert!(!session.is_near_expiry(now));
        assert!(session.is_near_expiry(now + Duration::minutes(59) + Duration::seconds(30)));
    }
}
