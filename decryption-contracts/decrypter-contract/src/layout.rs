//! Declarative layout of the call input.

use tracing::{debug, trace};

use crate::config::{HEADER_LEN, PK_LEN, SK_LEN};
use crate::error::DecodeError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldLen {
    Fixed(usize),
    /// Whatever the fixed fields leave over. At most one per layout.
    Remainder,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    pub name: &'static str,
    pub len: FieldLen,
}

impl Field {
    pub const fn fixed(name: &'static str, len: usize) -> Self {
        Self {
            name,
            len: FieldLen::Fixed(len),
        }
    }

    pub const fn remainder(name: &'static str) -> Self {
        Self {
            name,
            len: FieldLen::Remainder,
        }
    }
}

/// An ordered list of adjacent, non-overlapping fields.
#[derive(Debug, Clone, Copy)]
pub struct WireLayout<const N: usize> {
    fields: [Field; N],
}

impl<const N: usize> WireLayout<N> {
    pub const fn new(fields: [Field; N]) -> Self {
        Self { fields }
    }

    /// Sum of the fixed field lengths; the shortest input that decodes.
    pub const fn min_len(&self) -> usize {
        let mut total = 0;
        let mut i = 0;
        while i < N {
            if let FieldLen::Fixed(len) = self.fields[i].len {
                total += len;
            }
            i += 1;
        }
        total
    }

    /// Slices the first `input_size` bytes of `raw` into one view per field.
    pub fn split<'a>(&self, raw: &'a [u8], input_size: usize) -> Result<[&'a [u8]; N], DecodeError> {
        let min_len = self.min_len();
        if input_size < min_len || raw.len() < input_size {
            return Err(DecodeError::TooShort {
                expected: min_len,
                got: input_size.min(raw.len()),
            });
        }

        let mut remainder = input_size - min_len;
        let mut out: [&'a [u8]; N] = [&raw[..0]; N];
        let mut rest = &raw[..input_size];

        for (slot, field) in out.iter_mut().zip(self.fields.iter()) {
            let len = match field.len {
                FieldLen::Fixed(len) => len,
                FieldLen::Remainder => core::mem::take(&mut remainder),
            };
            let (head, tail) = rest.split_at(len);
            trace!(field = field.name, len, "sliced field");
            *slot = head;
            rest = tail;
        }

        Ok(out)
    }
}

/// Call input layout of this protocol version.
pub const INPUT_LAYOUT: WireLayout<4> = WireLayout::new([
    Field::fixed("header", HEADER_LEN),
    Field::fixed("public_key", PK_LEN),
    Field::fixed("secret_key", SK_LEN),
    Field::remainder("ciphertext"),
]);

/// Borrowed views of the decoded call input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodedInput<'a> {
    pub header: &'a [u8],
    pub public_key: &'a [u8],
    pub secret_key: &'a [u8],
    pub ciphertext: &'a [u8],
}

/// Splits the call input into public key, secret key and ciphertext.
///
/// `input_size` is the host-reported length of meaningful data in `raw`.
pub fn decode(raw: &[u8], input_size: usize) -> Result<DecodedInput<'_>, DecodeError> {
    let [header, public_key, secret_key, ciphertext] = INPUT_LAYOUT.split(raw, input_size)?;
    debug!(input_size, ciphertext_len = ciphertext.len(), "decoded call input");

    Ok(DecodedInput {
        header,
        public_key,
        secret_key,
        ciphertext,
    })
}
