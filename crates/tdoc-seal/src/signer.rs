//! # Seal Signers
//!
//! The signature zone is produced by a [`SealSigner`]. No real signature
//! scheme is implemented here: [`StubSigner`] fills the zone with random
//! bytes for specimen documents, and [`ZeroSigner`] writes the all-zero
//! placeholder an unsigned seal carries.
//!
//! A production deployment plugs an ECDSA signer in behind the same trait.

use rand::RngCore;

/// Length of the placeholder signature (an ECDSA P-256 `r || s`).
pub const DEFAULT_SIGNATURE_LEN: usize = 64;

/// Produces the signature zone contents for an unsigned seal.
pub trait SealSigner: Send + Sync {
    /// Sign `unsigned_seal` (header zone followed by message zone).
    fn sign(&self, unsigned_seal: &[u8]) -> Vec<u8>;
}

/// Random-byte signature for specimens.
#[derive(Debug, Clone, Copy)]
pub struct StubSigner {
    length: usize,
}

impl StubSigner {
    /// A stub producing `length` random bytes.
    pub fn new(length: usize) -> Self {
        Self { length }
    }
}

impl Default for StubSigner {
    fn default() -> Self {
        Self::new(DEFAULT_SIGNATURE_LEN)
    }
}

impl SealSigner for StubSigner {
    fn sign(&self, _unsigned_seal: &[u8]) -> Vec<u8> {
        let mut signature = vec![0u8; self.length];
        rand::rngs::OsRng.fill_bytes(&mut signature);
        signature
    }
}

/// All-zero signature.
#[derive(Debug, Clone, Copy)]
pub struct ZeroSigner {
    length: usize,
}

impl ZeroSigner {
    /// A signer producing `length` zero bytes.
    pub fn new(length: usize) -> Self {
        Self { length }
    }
}

impl Default for ZeroSigner {
    fn default() -> Self {
        Self::new(DEFAULT_SIGNATURE_LEN)
    }
}

impl SealSigner for ZeroSigner {
    fn sign(&self, _unsigned_seal: &[u8]) -> Vec<u8> {
        vec![0u8; self.length]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stub_length_and_randomness() {
        let signer = StubSigner::default();
        let a = signer.sign(b"seal");
        let b = signer.sign(b"seal");
        assert_eq!(a.len(), 64);
        // Two 64-byte random draws colliding is not a realistic outcome.
        assert_ne!(a, b);
        assert_eq!(StubSigner::new(72).sign(&[]).len(), 72);
    }

    #[test]
    fn zero_signer() {
        assert_eq!(ZeroSigner::default().sign(b"x"), vec![0u8; 64]);
    }

    #[test]
    fn signers_are_object_safe() {
        let signers: Vec<Box<dyn SealSigner>> =
            vec![Box::new(StubSigner::default()), Box::new(ZeroSigner::new(8))];
        assert_eq!(signers[1].sign(&[]).len(), 8);
    }
}
