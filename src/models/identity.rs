use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Opaque token naming the signed-in user. The empty token means signed out.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identity(String);

impl Identity {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_authenticated(&self) -> bool {
        !self.0.is_empty()
    }

    /// Returns the owner key for store scoping, or `Unauthenticated`.
    pub fn require(&self) -> Result<&str> {
        if self.is_authenticated() {
            Ok(&self.0)
        } else {
            Err(Error::Unauthenticated)
        }
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Identity {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Identity {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_token_is_signed_out() {
        let anon = Identity::anonymous();
        assert!(!anon.is_authenticated());
        assert!(matches!(anon.require(), Err(Error::Unauthenticated)));

        let user = Identity::from("user-1");
        assert!(user.is_authenticated());
        assert_eq!(user.require().unwrap(), "user-1");
    }
}
