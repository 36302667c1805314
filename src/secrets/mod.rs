//! Credential handling for tool providers.
//!
//! Credentials arrive from the dispatcher as a flat key/value mapping
//! (`appid`, `api_key`, ...). Values are held as [`SecretString`] so they
//! never show up in `Debug` output or logs.

mod credentials;

pub use credentials::Credentials;
pub use secrecy::SecretString;
