//! Strict parser for the age v1 header that frames a distIBE ciphertext.
//!
//! The header is re-marshalled to check its MAC, so anything that would not
//! marshal back to the same bytes is rejected here.

use std::io::BufRead;

use base64::{engine::general_purpose, Engine};
use distibe_mac::{
    Header, Stanza, COLUMNS_PER_LINE, FOOTER_PREFIX, INTRO, MAC_LEN, RECIPIENT_PREFIX,
};
use thiserror::Error;

pub const STANZA_TYPE: &str = "distIBE";

#[derive(Debug, Error)]
pub enum FormatError {
    #[error("unexpected end of header")]
    UnexpectedEnd,

    #[error("malformed intro line")]
    MalformedIntro,

    #[error("malformed recipient line")]
    MalformedRecipient,

    #[error("malformed footer line")]
    MalformedFooter,

    #[error("unexpected header line")]
    UnexpectedLine,

    #[error("body line longer than 64 columns")]
    LineTooLong,

    #[error("invalid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("invalid header MAC length {0}")]
    MacLength(usize),

    #[error("expected exactly one distIBE recipient")]
    UnsupportedRecipients,

    #[error("header reading error: {0}")]
    Io(#[from] std::io::Error),
}

/// Reads one `\n`-terminated line, returned without the terminator.
fn read_line(src: &mut &[u8]) -> Result<Vec<u8>, FormatError> {
    let mut line = Vec::new();
    src.read_until(b'\n', &mut line)?;
    match line.pop() {
        Some(b'\n') => Ok(line),
        _ => Err(FormatError::UnexpectedEnd),
    }
}

fn split_args(line: &[u8]) -> Result<(String, Vec<String>), FormatError> {
    let rest = line
        .strip_prefix(RECIPIENT_PREFIX)
        .and_then(|r| r.strip_prefix(b" "))
        .ok_or(FormatError::MalformedRecipient)?;
    let rest = std::str::from_utf8(rest).map_err(|_| FormatError::MalformedRecipient)?;

    let mut parts = rest.split(' ').map(String::from);
    let type_ = parts.next().unwrap_or_default();
    let args: Vec<String> = parts.collect();
    if type_.is_empty() || args.iter().any(String::is_empty) {
        return Err(FormatError::MalformedRecipient);
    }

    Ok((type_, args))
}

fn read_body(src: &mut &[u8]) -> Result<Vec<u8>, FormatError> {
    let mut body = Vec::new();
    loop {
        let line = read_line(src)?;
        if line.len() > COLUMNS_PER_LINE {
            return Err(FormatError::LineTooLong);
        }
        body.extend(general_purpose::STANDARD_NO_PAD.decode(&line)?);
        if line.len() < COLUMNS_PER_LINE {
            return Ok(body);
        }
    }
}

fn parse_footer(line: &[u8]) -> Result<Vec<u8>, FormatError> {
    let encoded = line
        .strip_prefix(FOOTER_PREFIX)
        .and_then(|r| r.strip_prefix(b" "))
        .ok_or(FormatError::MalformedFooter)?;
    let mac = general_purpose::STANDARD_NO_PAD.decode(encoded)?;
    if mac.len() != MAC_LEN {
        return Err(FormatError::MacLength(mac.len()));
    }
    Ok(mac)
}

/// Parses the header and advances `src` to the first payload byte.
pub fn parse(src: &mut &[u8]) -> Result<Header, FormatError> {
    if read_line(src)? != INTRO.as_bytes() {
        return Err(FormatError::MalformedIntro);
    }

    let mut hdr = Header::default();
    loop {
        let line = read_line(src)?;

        if line.starts_with(FOOTER_PREFIX) {
            hdr.mac = parse_footer(&line)?;
            break;
        } else if line.starts_with(RECIPIENT_PREFIX) {
            let (type_, args) = split_args(&line)?;
            let body = read_body(src)?;
            hdr.recipients.push(Stanza { type_, args, body });
        } else {
            return Err(FormatError::UnexpectedLine);
        }
    }

    match hdr.recipients.as_slice() {
        [r] if r.type_ == STANZA_TYPE && r.args.is_empty() => Ok(hdr),
        _ => Err(FormatError::UnsupportedRecipients),
    }
}
