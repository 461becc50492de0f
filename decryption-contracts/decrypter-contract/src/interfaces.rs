//! Capabilities the decrypter delegates to.
//!
//! Each trait is one stage of the pipeline. The unit structs bind them to the
//! BLS12-381, header MAC and STREAM crates of this workspace.

use std::fmt::Display;

use distibe_ibe::IbeError;
use distibe_mac::{Header, MacError};
use distibe_stream::StreamError;
use ic_bls12_381::{pairing, G1Affine, G2Affine, Gt};
use zeroize::Zeroizing;

/// Group decoding, pairing, and the IBE unmasking step.
pub trait PairingCurve {
    type G1;
    type G2;
    type Gt;
    type Error: Display;

    fn decode_point1(&self, bytes: &[u8]) -> Result<Self::G1, Self::Error>;

    fn decode_point2(&self, bytes: &[u8]) -> Result<Self::G2, Self::Error>;

    fn pair(&self, p: &Self::G1, q: &Self::G2) -> Self::Gt;

    /// Recovers the file key from `r_gid = e(cu, sk)` and the masked parts.
    fn unmask(
        &self,
        r_gid: &Self::Gt,
        cv: &[u8],
        cw: &[u8],
        cu: &Self::G1,
    ) -> Result<Zeroizing<Vec<u8>>, Self::Error>;
}

pub trait HeaderMac {
    type Error: Display;

    fn verify_header_mac(&self, file_key: &[u8], hdr: &Header) -> Result<(), Self::Error>;
}

pub trait PayloadDecrypter {
    type Error: Display;

    fn decrypt_payload(
        &self,
        file_key: &[u8],
        nonce: &[u8],
        ciphertext: &[u8],
    ) -> Result<Vec<u8>, Self::Error>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct Bls12381Ibe;

impl PairingCurve for Bls12381Ibe {
    type G1 = G1Affine;
    type G2 = G2Affine;
    type Gt = Gt;
    type Error = IbeError;

    fn decode_point1(&self, bytes: &[u8]) -> Result<G1Affine, IbeError> {
        distibe_ibe::decompress_g1(bytes)
    }

    fn decode_point2(&self, bytes: &[u8]) -> Result<G2Affine, IbeError> {
        distibe_ibe::decompress_g2(bytes)
    }

    fn pair(&self, p: &G1Affine, q: &G2Affine) -> Gt {
        pairing(p, q)
    }

    fn unmask(
        &self,
        r_gid: &Gt,
        cv: &[u8],
        cw: &[u8],
        cu: &G1Affine,
    ) -> Result<Zeroizing<Vec<u8>>, IbeError> {
        distibe_ibe::decrypt(r_gid, cv, cw, cu)
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct MacChacha20;

impl HeaderMac for MacChacha20 {
    type Error = MacError;

    fn verify_header_mac(&self, file_key: &[u8], hdr: &Header) -> Result<(), MacError> {
        distibe_mac::verify_header_mac(file_key, hdr)
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct DecrypterChacha20;

impl PayloadDecrypter for DecrypterChacha20 {
    type Error = StreamError;

    fn decrypt_payload(
        &self,
        file_key: &[u8],
        nonce: &[u8],
        ciphertext: &[u8],
    ) -> Result<Vec<u8>, StreamError> {
        distibe_stream::decrypter(file_key, nonce, ciphertext)
    }
}
