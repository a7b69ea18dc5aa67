//! API key lookup.
//!
//! Keys only ever come from environment variables and are wrapped in
//! [`secrecy::SecretString`] as soon as they are read.

pub mod env;

pub use self::env::resolve_api_key;
