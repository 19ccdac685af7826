//! Mocked authentication session.
//!
//! Sign-in never contacts a server. A fixed mock token is stored under
//! `userToken` and its presence is what `check` treats as "signed in".

use crate::model::user::{User, UserPatch};
use crate::repo::kv_repo::KeyValueStore;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Storage key holding the session token.
pub const TOKEN_KEY: &str = "userToken";
/// Token issued by every successful mock sign-in.
pub const MOCK_TOKEN: &str = "mock-jwt-token";

const MOCK_USER_ID: &str = "1";
const MOCK_USERNAME: &str = "testuser";
const MOCK_EMAIL: &str = "test@example.com";

/// Session flow errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// A required credential field is blank.
    MissingField(&'static str),
    /// Token could not be read or written.
    Storage(String),
    /// No token on record.
    NoToken,
}

impl Display for SessionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingField(field) => write!(f, "{field} is required"),
            Self::Storage(message) => write!(f, "session storage failed: {message}"),
            Self::NoToken => write!(f, "no token found"),
        }
    }
}

impl Error for SessionError {}

pub struct SessionStore<S: KeyValueStore> {
    kv: S,
    user: Option<User>,
    token: Option<String>,
    error: Option<String>,
}

impl<S: KeyValueStore> SessionStore<S> {
    pub fn new(kv: S) -> Self {
        Self {
            kv,
            user: None,
            token: None,
            error: None,
        }
    }

    /// Signs in with any non-blank credentials.
    pub fn login(&mut self, email: &str, password: &str) -> Result<&User, SessionError> {
        self.error = None;
        let result = require("email", email)
            .and_then(|()| require("password", password))
            .and_then(|()| self.store_token());
        if let Err(err) = result {
            return Err(self.fail(err));
        }

        Ok(self.sign_in(User {
            id: MOCK_USER_ID.to_string(),
            username: MOCK_USERNAME.to_string(),
            email: email.trim().to_string(),
            profile_image: None,
        }))
    }

    /// Registers and signs in with any non-blank fields.
    pub fn register(
        &mut self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<&User, SessionError> {
        self.error = None;
        let result = require("username", username)
            .and_then(|()| require("email", email))
            .and_then(|()| require("password", password))
            .and_then(|()| self.store_token());
        if let Err(err) = result {
            return Err(self.fail(err));
        }

        Ok(self.sign_in(User {
            id: MOCK_USER_ID.to_string(),
            username: username.trim().to_string(),
            email: email.trim().to_string(),
            profile_image: None,
        }))
    }

    /// Drops the token and signs out, even when the token delete fails.
    pub fn logout(&mut self) {
        if let Err(err) = self.kv.remove(TOKEN_KEY) {
            warn!("event=session_logout module=session status=error error={err}");
        }
        self.user = None;
        self.token = None;
        info!("event=session_logout module=session status=ok");
    }

    /// Restores the session from a stored token.
    pub fn check(&mut self) -> Result<&User, SessionError> {
        let token = match self.kv.get(TOKEN_KEY) {
            Ok(Some(token)) if !token.trim().is_empty() => token,
            Ok(_) => {
                self.user = None;
                self.token = None;
                return Err(SessionError::NoToken);
            }
            Err(err) => {
                self.user = None;
                self.token = None;
                return Err(SessionError::Storage(err.to_string()));
            }
        };

        self.token = Some(token);
        let user = self.user.get_or_insert_with(|| User {
            id: MOCK_USER_ID.to_string(),
            username: MOCK_USERNAME.to_string(),
            email: MOCK_EMAIL.to_string(),
            profile_image: None,
        });
        Ok(&*user)
    }

    /// Edits the signed-in profile. No-op when signed out.
    pub fn update_user(&mut self, patch: &UserPatch) -> Option<&User> {
        let user = self.user.as_mut()?;
        user.apply_patch(patch);
        Some(&*user)
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn is_signed_in(&self) -> bool {
        self.token.is_some()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    fn store_token(&mut self) -> Result<(), SessionError> {
        self.kv
            .set(TOKEN_KEY, MOCK_TOKEN)
            .map_err(|err| SessionError::Storage(err.to_string()))
    }

    fn sign_in(&mut self, user: User) -> &User {
        self.token = Some(MOCK_TOKEN.to_string());
        info!("event=session_login module=session status=ok");
        self.user.insert(user)
    }

    fn fail(&mut self, err: SessionError) -> SessionError {
        warn!("event=session_login module=session status=error");
        self.error = Some(err.to_string());
        err
    }
}

fn require(field: &'static str, value: &str) -> Result<(), SessionError> {
    if value.trim().is_empty() {
        return Err(SessionError::MissingField(field));
    }
    Ok(())
}
