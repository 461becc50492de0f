//! distIBE key decoding and file-key unwrapping over BLS12-381.
//!
//! A `distIBE` stanza body is `U ‖ V ‖ W`:
//!
//! - `U`: compressed G1 point, `r · G1`
//! - `V`: `sigma ⊕ H2(e(U, sk))`
//! - `W`: `msg ⊕ H4(sigma)`
//!
//! Decryption recovers `msg` (the age file key) from `V`, `W` and the pairing
//! `e(U, sk)`, and checks that `U` was derived from `H3(sigma, msg)`.

use distibe_hashing::{HashingError, BLOCK_SIZE};
use ic_bls12_381::{G1Affine, G2Affine, Gt};
use sha2::{Digest, Sha256};
use thiserror::Error;
use zeroize::Zeroizing;

pub const G1_COMPRESSED_LEN: usize = 48;
pub const G2_COMPRESSED_LEN: usize = 96;

pub const CIPHER_U_LEN: usize = G1_COMPRESSED_LEN;
pub const CIPHER_V_LEN: usize = BLOCK_SIZE;
pub const CIPHER_W_LEN: usize = BLOCK_SIZE;

/// Exact size of a `distIBE` stanza body.
pub const STANZA_BODY_LEN: usize = CIPHER_U_LEN + CIPHER_V_LEN + CIPHER_W_LEN;

const H2_DOMAIN: &[u8] = b"IBE-H2";
const H4_DOMAIN: &[u8] = b"IBE-H4";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IbeError {
    #[error("invalid length: expected {expected} bytes, got {got}")]
    InvalidLength { expected: usize, got: usize },

    #[error("invalid compressed G1Affine")]
    InvalidG1Point,

    #[error("invalid compressed G2Affine")]
    InvalidG2Point,

    #[error("verification failed")]
    VerificationFailed,

    #[error(transparent)]
    Hashing(#[from] HashingError),
}

/// Decodes a compressed G1 point, rejecting the identity.
pub fn decompress_g1(bytes: &[u8]) -> Result<G1Affine, IbeError> {
    let bytes: &[u8; G1_COMPRESSED_LEN] =
        bytes.try_into().map_err(|_| IbeError::InvalidLength {
            expected: G1_COMPRESSED_LEN,
            got: bytes.len(),
        })?;

    let point: Option<G1Affine> = G1Affine::from_compressed(bytes).into();
    match point {
        Some(p) if !bool::from(p.is_identity()) => Ok(p),
        _ => Err(IbeError::InvalidG1Point),
    }
}

/// Decodes a compressed G2 point, rejecting the identity.
pub fn decompress_g2(bytes: &[u8]) -> Result<G2Affine, IbeError> {
    let bytes: &[u8; G2_COMPRESSED_LEN] =
        bytes.try_into().map_err(|_| IbeError::InvalidLength {
            expected: G2_COMPRESSED_LEN,
            got: bytes.len(),
        })?;

    let point: Option<G2Affine> = G2Affine::from_compressed(bytes).into();
    match point {
        Some(p) if !bool::from(p.is_identity()) => Ok(p),
        _ => Err(IbeError::InvalidG2Point),
    }
}

/// Performs the IBE decryption given the pairing `r_gid = e(cu, sk)`.
///
/// Returns the unmasked message only if `cu` matches `H3(sigma, msg) · G1`.
pub fn decrypt(
    r_gid: &Gt,
    cv: &[u8],
    cw: &[u8],
    cu: &G1Affine,
) -> Result<Zeroizing<Vec<u8>>, IbeError> {
    if cv.len() != CIPHER_V_LEN {
        return Err(IbeError::InvalidLength {
            expected: CIPHER_V_LEN,
            got: cv.len(),
        });
    }
    if cw.len() != CIPHER_W_LEN {
        return Err(IbeError::InvalidLength {
            expected: CIPHER_W_LEN,
            got: cw.len(),
        });
    }

    let sigma = Zeroizing::new(xor(&h2(r_gid), cv));
    let msg = Zeroizing::new(xor(&h4(&sigma), cw));

    if !distibe_hashing::verify(&sigma, &msg, cu)? {
        return Err(IbeError::VerificationFailed);
    }

    Ok(msg)
}

fn h2(r_gid: &Gt) -> [u8; BLOCK_SIZE] {
    let mut hash = Sha256::new();
    hash.update(H2_DOMAIN);
    hash.update(r_gid.to_bytes());
    hash.finalize().into()
}

fn h4(sigma: &[u8]) -> [u8; BLOCK_SIZE] {
    let mut hash = Sha256::new();
    hash.update(H4_DOMAIN);
    hash.update(sigma);
    hash.finalize().into()
}

fn xor(a: &[u8], b: &[u8]) -> Vec<u8> {
    a.iter().zip(b.iter()).map(|(a, b)| a ^ b).collect()
}
