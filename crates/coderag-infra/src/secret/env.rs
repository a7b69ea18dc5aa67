//! Environment variable secret lookup.

use secrecy::SecretString;

/// Read an API key from the environment variable `env_name`.
///
/// Unset, empty and non-Unicode values all count as "no key".
pub fn resolve_api_key(env_name: &str) -> Option<SecretString> {
    match std::env::var(env_name) {
        Ok(val) if !val.trim().is_empty() => Some(SecretString::from(val)),
        Ok(_) => {
            tracing::debug!(env = env_name, "API key variable is empty");
            None
        }
        Err(std::env::VarError::NotPresent) => None,
        Err(std::env::VarError::NotUnicode(_)) => {
            tracing::warn!(env = env_name, "API key variable is not valid Unicode, ignoring");
            None
        }
    }
}
