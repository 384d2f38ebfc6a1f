//! Login gate: a static user/PIN check producing an explicit session value.
//!
//! The engine takes the session as a parameter; no ambient mutable login
//! state exists anywhere in the crate.

use crate::error::{CashError, Result};
use std::env;

/// Operator credentials, supplied out of band.
#[derive(Debug, Clone)]
pub struct Credentials {
    user: String,
    pin: String,
}

impl Credentials {
    pub fn new(user: impl Into<String>, pin: impl Into<String>) -> Self {
        Credentials {
            user: user.into(),
            pin: pin.into(),
        }
    }

    /// Reads credentials from `CASHBOX_USER` / `CASHBOX_PIN`. Returns
    /// `None` when either is unset, meaning no login gate is configured.
    pub fn from_env() -> Option<Self> {
        let user = env::var("CASHBOX_USER").ok()?;
        let pin = env::var("CASHBOX_PIN").ok()?;
        Some(Credentials { user, pin })
    }

    /// Checks the supplied user and PIN, opening a session on match.
    pub fn verify(&self, user: &str, pin: &str) -> Result<Session> {
        if user == self.user && pin == self.pin {
            Ok(Session {
                user: user.to_string(),
            })
        } else {
            Err(CashError::InvalidCredentials)
        }
    }
}

/// Proof that the operator passed the login gate, or that none is
/// configured.
#[derive(Debug, Clone)]
pub struct Session {
    user: String,
}

impl Session {
    /// Session for single-operator local use with no credentials configured.
    pub fn local() -> Self {
        Session {
            user: "local".to_string(),
        }
    }

    /// The operator this session belongs to.
    pub fn user(&self) -> &str {
        &self.user
    }
}
