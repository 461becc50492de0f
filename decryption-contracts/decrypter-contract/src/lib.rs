//! Sandboxed decryption of distributed-IBE (distIBE) ciphertexts.
//!
//! The call input is `header ‖ pk ‖ sk ‖ ciphertext` (see [`layout`]). The
//! ciphertext is an age v1 file with a single `distIBE` recipient stanza whose
//! file key is recovered with a BLS12-381 pairing against the decryption key.
//! On success the guest writes the plaintext and exits with `0`; otherwise it
//! writes the error text and exits with `-1`.

pub mod config;
pub mod decrypter;
pub mod error;
pub mod format;
pub mod host;
pub mod interfaces;
pub mod layout;

#[cfg(target_arch = "wasm32")]
pub mod sandbox;

#[cfg(test)]
mod fixtures;

pub use decrypter::{decrypt, Decrypter};
pub use error::{DecodeError, DecryptError, GuestError};
pub use host::{handle_request, process, run, HostChannel};
pub use interfaces::{HeaderMac, PairingCurve, PayloadDecrypter};
pub use layout::{decode, DecodedInput, WireLayout, INPUT_LAYOUT};
