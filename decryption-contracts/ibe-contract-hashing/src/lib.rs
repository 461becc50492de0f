//! Hash-to-scalar and ciphertext consistency check for distIBE.
//!
//! After the IBE layer unmasks `sigma` and the message, the ephemeral point
//! `U` carried by the ciphertext must equal `H3(sigma, msg) · G1`. A mismatch
//! means the ciphertext was not produced by an honest encryptor under the
//! key used for decryption.

use ic_bls12_381::{G1Affine, G1Projective, Scalar};
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Length of `sigma` and of the masked message.
pub const BLOCK_SIZE: usize = 32;

const H3_DOMAIN: &[u8] = b"IBE-H3";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HashingError {
    #[error("invalid input length: sigma {sigma}, msg {msg}")]
    InvalidInputLength { sigma: usize, msg: usize },

    #[error("no canonical scalar found while hashing")]
    ScalarNotFound,
}

/// Calculates `H3(sigma, msg)`, the scalar the encryptor used for `U = r · G1`.
///
/// The initial digest is rehashed with a little-endian counter until the
/// result, with its top bit cleared and byte order reversed, is a canonical
/// scalar.
pub fn h3(sigma: &[u8], msg: &[u8]) -> Result<Scalar, HashingError> {
    let mut hasher = Sha256::new();
    hasher.update(H3_DOMAIN);
    hasher.update(sigma);
    hasher.update(msg);
    let initial_hash = hasher.finalize_reset();

    for i in 1..=u16::MAX {
        hasher.update(i.to_le_bytes());
        hasher.update(&initial_hash);
        let mut hashed: [u8; 32] = hasher.finalize_reset().into();

        hashed[0] /= 2;
        hashed.reverse();

        if let Some(scalar) = Option::<Scalar>::from(Scalar::from_bytes(&hashed)) {
            return Ok(scalar);
        }
    }

    Err(HashingError::ScalarNotFound)
}

/// Recomputes `H3(sigma, msg) · G1` and compares it with `cu`.
pub fn verify(sigma: &[u8], msg: &[u8], cu: &G1Affine) -> Result<bool, HashingError> {
    if sigma.len() != BLOCK_SIZE || msg.len() != BLOCK_SIZE {
        return Err(HashingError::InvalidInputLength {
            sigma: sigma.len(),
            msg: msg.len(),
        });
    }

    let r = h3(sigma, msg)?;
    let r_g = G1Affine::from(G1Projective::generator() * r);

    Ok(r_g == *cu)
}
