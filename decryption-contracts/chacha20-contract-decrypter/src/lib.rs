//! age payload decryption: ChaCha20-Poly1305 in STREAM mode.
//!
//! The payload key is `HKDF-SHA256(salt = nonce, ikm = file_key, "payload")`.
//! Plaintext is cut into 64 KiB chunks; each chunk nonce is an 11-byte
//! big-endian counter followed by a flag byte set to 1 on the last chunk.

use chacha20poly1305::{
    aead::{Aead, KeyInit},
    ChaCha20Poly1305, Key, Nonce,
};
use hkdf::Hkdf;
use sha2::Sha256;
use thiserror::Error;
use zeroize::Zeroizing;

pub const KEY_LEN: usize = 32;
pub const NONCE_LEN: usize = 16;
pub const CHUNK_SIZE: usize = 64 * 1024;
pub const TAG_LEN: usize = 16;
pub const ENCRYPTED_CHUNK_SIZE: usize = CHUNK_SIZE + TAG_LEN;

const PAYLOAD_KEY_LABEL: &[u8] = b"payload";
const LAST_CHUNK_FLAG: u8 = 0x01;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StreamError {
    #[error("wrong input length")]
    WrongInputLength,

    #[error("payload is truncated")]
    Truncated,

    #[error("decryption error in chunk {0}")]
    Chunk(u64),

    #[error("last chunk is empty")]
    EmptyLastChunk,

    #[error("chunk counter overflow")]
    CounterOverflow,
}

/// Derives the STREAM key for a payload.
pub fn stream_key(key: &[u8], nonce: &[u8]) -> Result<Zeroizing<[u8; KEY_LEN]>, StreamError> {
    if key.len() != KEY_LEN || nonce.len() != NONCE_LEN {
        return Err(StreamError::WrongInputLength);
    }

    let h = Hkdf::<Sha256>::new(Some(nonce), key);
    let mut stream_key = Zeroizing::new([0u8; KEY_LEN]);
    h.expand(PAYLOAD_KEY_LABEL, &mut stream_key[..])
        .map_err(|_| StreamError::WrongInputLength)?;

    Ok(stream_key)
}

fn chunk_nonce(counter: u64, last: bool) -> [u8; 12] {
    let mut n = [0u8; 12];
    n[3..11].copy_from_slice(&counter.to_be_bytes());
    if last {
        n[11] = LAST_CHUNK_FLAG;
    }
    n
}

/// Decrypts a whole payload body (`ciphertext` excludes the nonce).
///
/// Nothing is returned unless every chunk authenticates.
pub fn decrypter(key: &[u8], nonce: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>, StreamError> {
    if ciphertext.len() < TAG_LEN {
        return Err(StreamError::Truncated);
    }

    let key = stream_key(key, nonce)?;
    let chacha20 = ChaCha20Poly1305::new(Key::from_slice(&key[..]));

    let chunks: Vec<&[u8]> = ciphertext.chunks(ENCRYPTED_CHUNK_SIZE).collect();
    let mut plaintext = Vec::with_capacity(ciphertext.len());

    for (i, chunk) in chunks.iter().enumerate() {
        let counter = u64::try_from(i).map_err(|_| StreamError::CounterOverflow)?;
        let last = i + 1 == chunks.len();

        if chunk.len() < TAG_LEN {
            return Err(StreamError::Truncated);
        }
        if last && chunk.len() == TAG_LEN && i > 0 {
            return Err(StreamError::EmptyLastChunk);
        }

        let nonce = chunk_nonce(counter, last);
        let plain = chacha20
            .decrypt(Nonce::from_slice(&nonce), *chunk)
            .map_err(|_| StreamError::Chunk(counter))?;
        plaintext.extend_from_slice(&plain);
    }

    Ok(plaintext)
}
