//! Login session and the gate in front of the document commands
//!
//! The session is an explicit value: created at login, cleared at logout,
//! and handed to [`AuthGate::require`] by whoever needs to check it. Callers
//! decide where (if anywhere) it lives between runs.

use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use chrono::{DateTime, Utc};
use rand_core::OsRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::AuthConfig;
use crate::error::{Error, Result};

/// Username and password as entered
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

/// A logged-in user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub username: String,
    pub logged_in_at: DateTime<Utc>,
}

/// Current login state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    user: Option<SessionUser>,
}

impl Session {
    /// A session with nobody logged in
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Verify credentials and start the session
    ///
    /// A failed attempt leaves the session as it was.
    pub fn login(&mut self, credentials: &Credentials, auth: &AuthConfig) -> Result<()> {
        verify_credentials(credentials, auth)?;
        info!(username = %credentials.username, "Logged in");
        self.user = Some(SessionUser {
            username: credentials.username.clone(),
            logged_in_at: Utc::now(),
        });
        Ok(())
    }

    pub fn logout(&mut self) {
        if let Some(user) = self.user.take() {
            info!(username = %user.username, "Logged out");
        }
    }

    pub fn is_logged_in(&self) -> bool {
        self.user.is_some()
    }

    pub fn user(&self) -> Option<&SessionUser> {
        self.user.as_ref()
    }
}

/// Access check for the document commands
#[derive(Debug, Clone)]
pub struct AuthGate {
    auth: AuthConfig,
}

impl AuthGate {
    pub fn new(auth: AuthConfig) -> Self {
        Self { auth }
    }

    /// Whether a login is needed at all
    pub fn is_enabled(&self) -> bool {
        self.auth.username.is_some()
    }

    /// Allow the caller through, or fail with `NotAuthenticated`
    ///
    /// When no user is configured the gate is open. A session for a user
    /// other than the configured one is rejected as well.
    pub fn require(&self, session: &Session) -> Result<()> {
        let Some(expected) = self.auth.username.as_deref() else {
            return Ok(());
        };
        match session.user() {
            Some(user) if user.username == expected => Ok(()),
            _ => {
                debug!("Rejected request without a valid session");
                Err(Error::NotAuthenticated)
            }
        }
    }
}

/// Produce an argon2 PHC string for the `auth.password_hash` setting
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| Error::PasswordHash(e.to_string()))
}

fn verify_credentials(credentials: &Credentials, auth: &AuthConfig) -> Result<()> {
    let (Some(username), Some(password_hash)) =
        (auth.username.as_deref(), auth.password_hash.as_deref())
    else {
        return Err(Error::AuthNotConfigured);
    };

    if credentials.username != username {
        return Err(Error::InvalidCredentials);
    }

    let parsed = PasswordHash::new(password_hash).map_err(|_| Error::AuthNotConfigured)?;
    Argon2::default()
        .verify_password(credentials.password.as_bytes(), &parsed)
        .map_err(|_| Error::InvalidCredentials)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn auth(password: &str) -> AuthConfig {
        AuthConfig {
            username: Some("admin".to_string()),
            password_hash: Some(hash_password(password).unwrap()),
        }
    }

    #[test]
    fn test_login_and_logout() {
        let auth = auth("s3cret");
        let mut session = Session::anonymous();
        assert!(!session.is_logged_in());

        session
            .login(&Credentials::new("admin", "s3cret"), &auth)
            .unwrap();
        assert!(session.is_logged_in());
        assert_eq!(session.user().unwrap().username, "admin");

        session.logout();
        assert!(!session.is_logged_in());
    }

    #[test]
    fn test_wrong_password_keeps_session() {
        let auth = auth("s3cret");
        let mut session = Session::anonymous();

        let err = session
            .login(&Credentials::new("admin", "guess"), &auth)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidCredentials));
        assert!(!session.is_logged_in());

        let err = session
            .login(&Credentials::new("root", "s3cret"), &auth)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidCredentials));
    }

    #[test]
    fn test_login_without_config() {
        let mut session = Session::anonymous();
        let err = session
            .login(&Credentials::new("admin", "x"), &AuthConfig::default())
            .unwrap_err();
        assert!(matches!(err, Error::AuthNotConfigured));
    }

    #[test]
    fn test_gate_open_without_username() {
        let gate = AuthGate::new(AuthConfig::default());
        assert!(!gate.is_enabled());
        assert!(gate.require(&Session::anonymous()).is_ok());
    }

    #[test]
    fn test_gate_requires_matching_session() {
        let auth = auth("pw");
        let gate = AuthGate::new(auth.clone());

        let mut session = Session::anonymous();
        assert!(matches!(
            gate.require(&session),
            Err(Error::NotAuthenticated)
        ));

        session.login(&Credentials::new("admin", "pw"), &auth).unwrap();
        assert!(gate.require(&session).is_ok());

        let stale = Session {
            user: Some(SessionUser {
                username: "someone-else".to_string(),
                logged_in_at: Utc::now(),
            }),
        };
        assert!(gate.require(&stale).is_err());
    }

    #[test]
    fn test_credentials_debug_hides_password() {
        let creds = Credentials::new("admin", "hunter2");
        assert!(!format!("{:?}", creds).contains("hunter2"));
    }

    #[test]
    fn test_session_serialization() {
        let auth = auth("pw");
        let mut session = Session::anonymous();
        session.login(&Credentials::new("admin", "pw"), &auth).unwrap();

        let json = serde_json::to_string(&session).unwrap();
        let restored: Session = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, session);
    }
}
