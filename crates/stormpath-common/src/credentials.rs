use std::fmt;

use secrecy::{ExposeSecret, SecretString};

/// Environment variable holding the API key id.
pub const API_KEY_ID_ENV: &str = "STORMPATH_API_KEY_ID";
/// Environment variable holding the API key secret.
pub const API_KEY_SECRET_ENV: &str = "STORMPATH_API_KEY_SECRET";

/// An API key id/secret pair used to authenticate every request.
///
/// The pair is immutable once constructed. The secret is stored as a
/// [`SecretString`], which zeroes its memory on drop and is never printed
/// by the `Debug` implementation.
///
/// # Examples
///
/// ```
/// use stormpath_common::ApiKeyPair;
///
/// let keypair = ApiKeyPair::new("id", "hunter2");
/// assert_eq!(keypair.id(), "id");
/// assert!(!format!("{keypair:?}").contains("hunter2"));
/// ```
#[derive(Clone)]
pub struct ApiKeyPair {
    id: String,
    secret: SecretString,
}

impl ApiKeyPair {
    /// Creates a key pair from an id and a secret.
    pub fn new(id: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            secret: SecretString::new(secret.into().into()),
        }
    }

    /// Reads the key pair from `STORMPATH_API_KEY_ID` and `STORMPATH_API_KEY_SECRET`.
    ///
    /// # Errors
    ///
    /// Returns an error naming the variable if either one is unset or empty.
    pub fn from_env() -> anyhow::Result<Self> {
        let id = read_env(API_KEY_ID_ENV)?;
        let secret = read_env(API_KEY_SECRET_ENV)?;
        Ok(Self::new(id, secret))
    }

    /// The API key id.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The API key secret.
    ///
    /// Callers must go through [`ExposeSecret`] to read it.
    #[must_use]
    pub const fn secret(&self) -> &SecretString {
        &self.secret
    }

    /// Borrows the id and exposed secret, in the order HTTP basic auth wants them.
    #[must_use]
    pub fn basic_auth(&self) -> (&str, &str) {
        (&self.id, self.secret.expose_secret())
    }
}

impl fmt::Debug for ApiKeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiKeyPair")
            .field("id", &self.id)
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

fn read_env(name: &str) -> anyhow::Result<String> {
    match std::env::var(name) {
        Ok(value) if !value.is_empty() => Ok(value),
        Ok(_) => anyhow::bail!("{name} is set but empty"),
        Err(_) => anyhow::bail!("{name} not set in the environment"),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_basic_auth_exposes_pair() {
        let keypair = ApiKeyPair::new("abc", "xyz");
        assert_eq!(keypair.basic_auth(), ("abc", "xyz"));
        assert_eq!(keypair.secret().expose_secret(), "xyz");
    }

    #[test]
    fn test_debug_redacts_secret() {
        let keypair = ApiKeyPair::new("abc", "super-secret-value");
        let debug = format!("{keypair:?}");
        assert!(debug.contains("abc"));
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("super-secret-value"));
    }

    #[test]
    fn test_read_env_missing_names_variable() {
        let err = read_env("STORMPATH_TEST_SURELY_UNSET_VARIABLE").unwrap_err();
        assert!(err.to_string().contains("STORMPATH_TEST_SURELY_UNSET_VARIABLE"));
    }
}
