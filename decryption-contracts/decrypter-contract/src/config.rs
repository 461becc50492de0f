//! Protocol constants of the deployed wire format.
//!
//! Changing any length here is a breaking wire-format change.

/// Reserved region at the start of the call input, consumed by the protocol
/// layer and ignored here.
pub const HEADER_LEN: usize = 374;

/// Compressed G1 public key.
pub const PK_LEN: usize = distibe_ibe::G1_COMPRESSED_LEN;

/// Compressed G2 decryption key.
pub const SK_LEN: usize = distibe_ibe::G2_COMPRESSED_LEN;

/// Host input offset of the call data.
pub const INPUT_READ_OFFSET: u32 = 380;

pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILURE: i32 = -1;
