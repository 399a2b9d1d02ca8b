//! Secure handling of the data-source application token
//!
//! The Socrata app token is held in a `secrecy::Secret` so it is zeroed on drop
//! and redacted from `Debug` output. Call `expose_secret()` only at the point the
//! request header is built.
//!
//! # Example
//!
//! ```rust
//! use permit_etl::config::secret_string;
//! use secrecy::ExposeSecret;
//!
//! let token = secret_string("app-token".to_string());
//! assert_eq!(token.expose_secret().as_ref(), "app-token");
//! println!("{:?}", token); // Secret([REDACTED ...])
//! ```

use secrecy::{CloneableSecret, DebugSecret, Secret, SerializableSecret};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use zeroize::Zeroize;

/// Newtype wrapper for String that implements the required traits for Secret
#[derive(Clone, Debug, Zeroize)]
#[zeroize(drop)]
pub struct SecretValue(String);

impl CloneableSecret for SecretValue {}
impl DebugSecret for SecretValue {}
impl SerializableSecret for SecretValue {}

impl From<String> for SecretValue {
    fn from(s: String) -> Self {
        SecretValue(s)
    }
}

impl AsRef<str> for SecretValue {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl SecretValue {
    /// Check if the secret value is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for SecretValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for SecretValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        String::deserialize(deserializer).map(SecretValue)
    }
}

/// Secret string: zeroed on drop, redacted in Debug, explicit `expose_secret()`
pub type SecretString = Secret<SecretValue>;

/// Wrap a String in a [`SecretString`]
#[inline]
pub fn secret_string(value: String) -> SecretString {
    Secret::new(SecretValue::from(value))
}
