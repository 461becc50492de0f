//! age v1 header types and the header MAC.
//!
//! The MAC covers the header exactly as it is marshalled up to and including
//! the `---` footer prefix, keyed with `HKDF-SHA256(file_key, "header")`.

use std::io::{self, Write};

use base64::{engine::general_purpose, Engine};
use hkdf::Hkdf;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use thiserror::Error;
use zeroize::Zeroizing;

pub const INTRO: &str = "age-encryption.org/v1";
pub const RECIPIENT_PREFIX: &[u8] = b"->";
pub const FOOTER_PREFIX: &[u8] = b"---";
pub const COLUMNS_PER_LINE: usize = 64;
pub const BYTES_PER_LINE: usize = COLUMNS_PER_LINE / 4 * 3;
pub const MAC_LEN: usize = 32;

const HEADER_KEY_LABEL: &[u8] = b"header";

#[derive(Debug, Error)]
pub enum MacError {
    #[error("empty file key")]
    EmptyKey,

    #[error("key derivation failed")]
    KeyDerivation,

    #[error("header marshalling failed: {0}")]
    Marshal(#[from] io::Error),

    #[error("MACs not matching")]
    Mismatch,
}

/// A recipient stanza: `-> type args...` followed by a base64 body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stanza {
    pub type_: String,
    pub args: Vec<String>,
    pub body: Vec<u8>,
}

impl Stanza {
    pub fn marshal<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(RECIPIENT_PREFIX)?;
        write!(w, " {}", self.type_)?;
        for arg in &self.args {
            write!(w, " {}", arg)?;
        }
        writeln!(w)?;

        let encoded = general_purpose::STANDARD_NO_PAD.encode(&self.body);
        for chunk in encoded.as_bytes().chunks(COLUMNS_PER_LINE) {
            w.write_all(chunk)?;
            writeln!(w)?;
        }
        // A body ending on a full line is terminated by an empty one.
        if encoded.len() % COLUMNS_PER_LINE == 0 {
            writeln!(w)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Header {
    pub recipients: Vec<Stanza>,
    pub mac: Vec<u8>,
}

impl Header {
    pub fn marshal_without_mac<W: Write>(&self, w: &mut W) -> io::Result<()> {
        writeln!(w, "{}", INTRO)?;
        for r in &self.recipients {
            r.marshal(w)?;
        }
        w.write_all(FOOTER_PREFIX)
    }

    /// Full header including the `--- <mac>` line.
    pub fn marshal<W: Write>(&self, w: &mut W) -> io::Result<()> {
        self.marshal_without_mac(w)?;
        writeln!(w, " {}", general_purpose::STANDARD_NO_PAD.encode(&self.mac))
    }
}

struct HmacWriter(Hmac<Sha256>);

impl Write for HmacWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.update(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn header_hmac(key: &[u8], hdr: &Header) -> Result<Hmac<Sha256>, MacError> {
    if key.is_empty() {
        return Err(MacError::EmptyKey);
    }

    let h = Hkdf::<Sha256>::new(None, key);
    let mut hmac_key = Zeroizing::new([0u8; 32]);
    h.expand(HEADER_KEY_LABEL, &mut hmac_key[..])
        .map_err(|_| MacError::KeyDerivation)?;

    let hh = <Hmac<Sha256> as Mac>::new_from_slice(&hmac_key[..])
        .map_err(|_| MacError::KeyDerivation)?;
    let mut hmac_writer = HmacWriter(hh);
    hdr.marshal_without_mac(&mut hmac_writer)?;

    Ok(hmac_writer.0)
}

/// Calculates the header MAC for `hdr` under `key`.
pub fn header_mac(key: &[u8], hdr: &Header) -> Result<[u8; MAC_LEN], MacError> {
    Ok(header_hmac(key, hdr)?.finalize().into_bytes().into())
}

/// Checks `hdr.mac` in constant time.
pub fn verify_header_mac(key: &[u8], hdr: &Header) -> Result<(), MacError> {
    header_hmac(key, hdr)?
        .verify_slice(&hdr.mac)
        .map_err(|_| MacError::Mismatch)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(body: Vec<u8>) -> Header {
        Header {
            recipients: vec![Stanza {
                type_: "distIBE".to_string(),
                args: vec![],
                body,
            }],
            mac: vec![],
        }
    }

    #[test]
    fn marshals_stanza_in_64_column_lines() {
        let hdr = header(vec![0xab; 112]);
        let mut out = Vec::new();
        hdr.marshal_without_mac(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.split('\n').collect();

        assert_eq!(lines[0], INTRO);
        assert_eq!(lines[1], "-> distIBE");
        assert_eq!(lines[2].len(), 64);
        assert_eq!(lines[3].len(), 64);
        assert_eq!(lines[4].len(), 22);
        assert_eq!(lines[5], "---");
    }

    #[test]
    fn full_line_body_gets_empty_terminator() {
        let hdr = header(vec![1; BYTES_PER_LINE]);
        let mut out = Vec::new();
        hdr.marshal_without_mac(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.ends_with("\n\n---"));
    }

    #[test]
    fn verify_accepts_computed_mac() {
        let key = [5u8; 32];
        let mut hdr = header(vec![3; 112]);
        hdr.mac = header_mac(&key, &hdr).unwrap().to_vec();

        verify_header_mac(&key, &hdr).unwrap();
    }

    #[test]
    fn verify_rejects_wrong_key() {
        let mut hdr = header(vec![3; 112]);
        hdr.mac = header_mac(&[5u8; 32], &hdr).unwrap().to_vec();

        assert!(matches!(
            verify_header_mac(&[6u8; 32], &hdr),
            Err(MacError::Mismatch)
        ));
    }

    #[test]
    fn verify_rejects_modified_body() {
        let key = [5u8; 32];
        let mut hdr = header(vec![3; 112]);
        hdr.mac = header_mac(&key, &hdr).unwrap().to_vec();
        hdr.recipients[0].body[0] ^= 0x80;

        assert!(matches!(
            verify_header_mac(&key, &hdr),
            Err(MacError::Mismatch)
        ));
    }

    #[test]
    fn verify_rejects_truncated_mac() {
        let key = [5u8; 32];
        let mut hdr = header(vec![3; 112]);
        hdr.mac = header_mac(&key, &hdr).unwrap()[..16].to_vec();

        assert!(matches!(
            verify_header_mac(&key, &hdr),
            Err(MacError::Mismatch)
        ));
    }

    #[test]
    fn empty_key_is_rejected() {
        assert!(matches!(
            header_mac(&[], &header(vec![1])),
            Err(MacError::EmptyKey)
        ));
    }

    #[test]
    fn mac_ignores_the_mac_field() {
        let key = hex::decode("000102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f")
            .unwrap();
        let mut hdr = header(vec![0; 112]);
        let before = header_mac(&key, &hdr).unwrap();
        hdr.mac = vec![0xff; MAC_LEN];

        assert_eq!(header_mac(&key, &hdr).unwrap(), before);
    }
}
