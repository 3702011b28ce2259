//! Secret wrapper for the static AWS secret access key
//!
//! The key is zeroed on drop and redacted from `Debug` output. It is only
//! exposed when the credentials provider is built.
//!
//! ```rust
//! use landsat_cog::config::secret_string;
//! use secrecy::ExposeSecret;
//!
//! let key = secret_string("wJalrXUtnFEMI".to_string());
//! assert_eq!(key.expose_secret().as_ref(), "wJalrXUtnFEMI");
//! assert!(!format!("{key:?}").contains("wJalrXUtnFEMI"));
//! ```

use secrecy::{CloneableSecret, DebugSecret, Secret, SerializableSecret};
use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

/// Raw secret text
#[derive(Clone, Zeroize, Serialize, Deserialize)]
#[serde(transparent)]
#[zeroize(drop)]
pub struct SecretValue(String);

impl CloneableSecret for SecretValue {}
impl DebugSecret for SecretValue {}
impl SerializableSecret for SecretValue {}

impl AsRef<str> for SecretValue {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Secret string as held in [`AwsConfig`](super::AwsConfig)
pub type SecretString = Secret<SecretValue>;

/// Wrap a plain string read from the environment
pub fn secret_string(value: String) -> SecretString {
    Secret::new(SecretValue(value))
}
