//! Secure credential handling for providers.
//!
//! Keys are wrapped in [`SecretString`] the moment they are read, never
//! appear in `Debug`/`Display` output, and are exposed only at the point
//! of use (an HTTP header).

use secrecy::{ExposeSecret, SecretString};
use std::fmt;

use super::ProviderError;

/// Where a credential was loaded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialSource {
    /// Loaded from environment variable
    Environment,
    /// Provided programmatically
    Programmatic,
}

impl fmt::Display for CredentialSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialSource::Environment => write!(f, "environment"),
            CredentialSource::Programmatic => write!(f, "programmatic"),
        }
    }
}

/// A securely-stored API credential.
pub struct ApiCredential {
    value: SecretString,
    source: CredentialSource,
    name: &'static str,
}

impl ApiCredential {
    pub fn new(value: impl Into<String>, source: CredentialSource, name: &'static str) -> Self {
        Self {
            value: SecretString::from(value.into()),
            source,
            name,
        }
    }

    /// Load credential from an environment variable.
    ///
    /// An unset or blank variable is a configuration error.
    pub fn from_env(env_var: &str, name: &'static str) -> Result<Self, ProviderError> {
        Self::from_lookup(env_var, name, |key| std::env::var(key).ok())
    }

    fn from_lookup(
        env_var: &str,
        name: &'static str,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ProviderError> {
        match lookup(env_var) {
            Some(value) if !value.trim().is_empty() => {
                Ok(Self::new(value, CredentialSource::Environment, name))
            }
            _ => Err(ProviderError::NotConfigured(format!(
                "{} not set: configure '{}' environment variable",
                name, env_var
            ))),
        }
    }

    /// Expose the credential value. Call only where the key is sent.
    pub fn expose(&self) -> &str {
        self.value.expose_secret()
    }

    pub fn is_empty(&self) -> bool {
        self.value.expose_secret().is_empty()
    }

    pub fn source(&self) -> CredentialSource {
        self.source
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl fmt::Debug for ApiCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiCredential")
            .field("value", &"[REDACTED]")
            .field("source", &self.source)
            .field("name", &self.name)
            .finish()
    }
}

impl fmt::Display for ApiCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} from {} [REDACTED]", self.name, self.source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credential_redacted_in_debug_and_display() {
        let secret = "sk-super-secret-key-12345";
        let cred = ApiCredential::new(secret, CredentialSource::Programmatic, "Test API key");

        let debug = format!("{:?}", cred);
        assert!(!debug.contains(secret), "Secret exposed in Debug!");
        assert!(debug.contains("[REDACTED]"));

        let display = format!("{}", cred);
        assert!(!display.contains(secret), "Secret exposed in Display!");
        assert!(display.contains("Test API key from programmatic"));
    }

    #[test]
    fn test_credential_expose() {
        let cred = ApiCredential::new("key-1", CredentialSource::Programmatic, "Test");
        assert_eq!(cred.expose(), "key-1");
        assert!(!cred.is_empty());
    }

    #[test]
    fn test_lookup_reads_environment_source() {
        let cred = ApiCredential::from_lookup("LEXEVAL_TEST_KEY", "Test key", |_| {
            Some("env-key".to_string())
        })
        .unwrap();
        assert_eq!(cred.expose(), "env-key");
        assert_eq!(cred.source(), CredentialSource::Environment);
    }

    #[test]
    fn test_missing_or_blank_variable_is_not_configured() {
        for value in [None, Some("   ".to_string())] {
            let result = ApiCredential::from_lookup("LEXEVAL_TEST_KEY", "Test key", |_| {
                value.clone()
            });
            let err = result.unwrap_err();
            assert!(matches!(err, ProviderError::NotConfigured(_)));
            assert!(err.to_string().contains("LEXEVAL_TEST_KEY"));
        }
    }
}
