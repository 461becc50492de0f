//! The guest side of one sandbox invocation.

use tracing::{debug, warn};
use zeroize::Zeroizing;

use crate::config::{EXIT_FAILURE, EXIT_SUCCESS, INPUT_READ_OFFSET};
use crate::decrypter::decrypt;
use crate::error::GuestError;
use crate::layout::decode;

/// Host primitives available to the guest.
pub trait HostChannel {
    /// Byte length of the pending call input.
    fn input_size(&self) -> u32;

    /// Copies `target.len()` input bytes starting at `offset` into `target`.
    fn read_input(&self, target: &mut [u8], offset: u32);

    fn write_output(&mut self, data: &[u8]);

    /// Ends the invocation. The sandbox host never returns from this.
    fn terminate(&mut self, exit_code: i32);
}

/// Decodes and decrypts a call input of `input_size` meaningful bytes.
pub fn process(raw: &[u8], input_size: usize) -> Result<Vec<u8>, GuestError> {
    let input = decode(raw, input_size)?;
    Ok(decrypt(input.public_key, input.secret_key, input.ciphertext)?)
}

/// Stateless request handler over a complete call input.
pub fn handle_request(raw: &[u8]) -> Result<Vec<u8>, GuestError> {
    process(raw, raw.len())
}

/// Runs one invocation: read, decrypt, write once, terminate once.
pub fn run<H: HostChannel>(host: &mut H) {
    let input_size = host.input_size();
    let mut raw = Zeroizing::new(vec![0u8; input_size as usize]);
    host.read_input(&mut raw, INPUT_READ_OFFSET);
    debug!(input_size, "read call input");

    match process(&raw, raw.len()) {
        Ok(plaintext) => {
            host.write_output(&plaintext);
            host.terminate(EXIT_SUCCESS);
        }
        Err(err) => {
            warn!(error = %err, "decryption request failed");
            host.write_output(err.to_string().as_bytes());
            host.terminate(EXIT_FAILURE);
        }
    }
}
