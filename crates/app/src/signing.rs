//! Keyed HMAC-SHA256 signing with hex output.

use std::fmt;

use hmac::{Hmac, Mac, digest::InvalidLength};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Signs and checks inputs with a server-held key.
#[derive(Clone)]
pub struct HmacSigner {
    keyed: HmacSha256,
}

impl fmt::Debug for HmacSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("HmacSigner(**redacted**)")
    }
}

impl HmacSigner {
    /// Key a signer with `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the MAC rejects the key length.
    pub fn new(key: &[u8]) -> Result<Self, InvalidLength> {
        Ok(Self {
            keyed: HmacSha256::new_from_slice(key)?,
        })
    }

    /// Hex-encoded signature of `input`.
    #[must_use]
    pub fn sign(&self, input: &[u8]) -> String {
        let mut mac = self.keyed.clone();

        mac.update(input);

        hex::encode(mac.finalize().into_bytes())
    }

    /// Constant-time check of `input` against a hex signature.
    #[must_use]
    pub fn verify(&self, input: &[u8], signature: &str) -> bool {
        let Ok(expected) = hex::decode(signature) else {
            return false;
        };

        let mut mac = self.keyed.clone();

        mac.update(input);

        mac.verify_slice(&expected).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signer(key: &str) -> HmacSigner {
        HmacSigner::new(key.as_bytes()).expect("hmac accepts any key length")
    }

    #[test]
    fn verify_accepts_own_signature() {
        let signer = signer("pepper");
        let signature = signer.sign(b"input");

        assert!(signer.verify(b"input", &signature));
    }

    #[test]
    fn verify_rejects_other_key() {
        let signature = signer("pepper").sign(b"input");

        assert!(!signer("other").verify(b"input", &signature));
    }

    #[test]
    fn verify_rejects_non_hex_signature() {
        assert!(!signer("pepper").verify(b"input", "zz"));
    }
}
