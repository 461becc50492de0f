//! The distIBE decryption engine.

use std::fmt::Display;

use distibe_ibe::{CIPHER_U_LEN, CIPHER_V_LEN, STANZA_BODY_LEN};
use distibe_stream::NONCE_LEN;
use tracing::{debug, warn};
use zeroize::Zeroizing;

use crate::error::DecryptError;
use crate::format;
use crate::interfaces::{
    Bls12381Ibe, DecrypterChacha20, HeaderMac, MacChacha20, PairingCurve, PayloadDecrypter,
};

fn failed(err: impl Display) -> DecryptError {
    DecryptError::DecryptionFailed(err.to_string())
}

/// Decrypts age files carrying a single `distIBE` recipient.
#[derive(Debug, Default, Clone)]
pub struct Decrypter<C = Bls12381Ibe, M = MacChacha20, P = DecrypterChacha20> {
    ibe: C,
    mac: M,
    chacha20: P,
}

impl<C, M, P> Decrypter<C, M, P>
where
    C: PairingCurve,
    M: HeaderMac,
    P: PayloadDecrypter,
{
    pub fn new(ibe: C, mac: M, chacha20: P) -> Self {
        Self { ibe, mac, chacha20 }
    }

    /// Decrypts `ciphertext` with the decryption key `sk`.
    ///
    /// Both keys are validated before any pairing is evaluated. Nothing but
    /// the complete plaintext is ever returned.
    pub fn decrypt(&self, pk: &[u8], sk: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>, DecryptError> {
        // The stanza carries no identity to check the share against, so the
        // public key is only validated.
        let _pk = self.ibe.decode_point1(pk).map_err(|e| {
            warn!(error = %e, "rejected public key");
            DecryptError::InvalidPublicKey
        })?;
        let sk = self.ibe.decode_point2(sk).map_err(|e| {
            warn!(error = %e, "rejected secret key");
            DecryptError::InvalidSecretKey
        })?;

        let mut payload = ciphertext;
        let hdr = format::parse(&mut payload).map_err(failed)?;
        debug!(payload_len = payload.len(), "parsed age header");

        let stanza = hdr
            .recipients
            .first()
            .ok_or_else(|| failed("missing recipient stanza"))?;
        let file_key = self.unwrap(&sk, &stanza.body)?;

        self.mac
            .verify_header_mac(&file_key, &hdr)
            .map_err(failed)?;

        if payload.len() < NONCE_LEN {
            return Err(failed("payload reading error"));
        }
        let (nonce, body) = payload.split_at(NONCE_LEN);

        let plaintext = self
            .chacha20
            .decrypt_payload(&file_key, nonce, body)
            .map_err(failed)?;
        debug!(plaintext_len = plaintext.len(), "decrypted payload");

        Ok(plaintext)
    }

    fn unwrap(&self, sk: &C::G2, body: &[u8]) -> Result<Zeroizing<Vec<u8>>, DecryptError> {
        if body.len() != STANZA_BODY_LEN {
            return Err(failed("wrong stanza body length"));
        }
        let kyber_point = &body[..CIPHER_U_LEN];
        let cipher_v = &body[CIPHER_U_LEN..CIPHER_U_LEN + CIPHER_V_LEN];
        let cipher_w = &body[CIPHER_U_LEN + CIPHER_V_LEN..];

        let u = self.ibe.decode_point1(kyber_point).map_err(failed)?;
        let r_gid = self.ibe.pair(&u, sk);

        self.ibe
            .unmask(&r_gid, cipher_v, cipher_w, &u)
            .map_err(failed)
    }
}

/// Decrypts with the BLS12-381 / ChaCha20-Poly1305 stack.
pub fn decrypt(pk: &[u8], sk: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>, DecryptError> {
    Decrypter::<Bls12381Ibe, MacChacha20, DecrypterChacha20>::default().decrypt(pk, sk, ciphertext)
}
