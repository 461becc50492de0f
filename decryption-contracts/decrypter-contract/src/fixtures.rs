//! Test fixtures: keys, genuine distIBE ciphertexts and call inputs.

use chacha20poly1305::{
    aead::{Aead, KeyInit},
    ChaCha20Poly1305, Key, Nonce,
};
use distibe_mac::{Header, Stanza};
use distibe_stream::CHUNK_SIZE;
use ic_bls12_381::{pairing, G1Affine, G1Projective, G2Affine, G2Projective, Gt, Scalar};
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;
use sha2::{Digest, Sha256};

use crate::config::HEADER_LEN;
use crate::format::STANZA_TYPE;

pub struct KeyMaterial {
    pub pk: [u8; 48],
    pub sk: [u8; 96],
    pk_point: G1Affine,
    q_id: G2Affine,
}

fn random_scalar(rng: &mut ChaCha20Rng) -> Scalar {
    let mut bytes = [0u8; 64];
    rng.fill_bytes(&mut bytes);
    Scalar::from_bytes_wide(&bytes)
}

/// Master key `s`, identity point `Q`, `pk = s·G1`, `sk = s·Q`.
pub fn key_material(seed: u64) -> KeyMaterial {
    let mut rng = ChaCha20Rng::seed_from_u64(seed);
    let s = random_scalar(&mut rng);
    let q_id = G2Affine::from(G2Projective::generator() * random_scalar(&mut rng));
    let pk_point = G1Affine::from(G1Projective::generator() * s);
    let sk_point = G2Affine::from(G2Projective::from(q_id) * s);

    KeyMaterial {
        pk: pk_point.to_compressed(),
        sk: sk_point.to_compressed(),
        pk_point,
        q_id,
    }
}

fn hash(domain: &[u8], data: &[u8]) -> [u8; 32] {
    let mut h = Sha256::new();
    h.update(domain);
    h.update(data);
    h.finalize().into()
}

fn xor(a: &[u8], b: &[u8]) -> Vec<u8> {
    a.iter().zip(b).map(|(a, b)| a ^ b).collect()
}

fn stanza_body(keys: &KeyMaterial, file_key: &[u8; 32], rng: &mut ChaCha20Rng) -> Vec<u8> {
    let mut sigma = [0u8; 32];
    rng.fill_bytes(&mut sigma);

    let r = distibe_hashing::h3(&sigma, file_key).unwrap();
    let cu = G1Affine::from(G1Projective::generator() * r);
    let r_gid: Gt = pairing(&keys.pk_point, &keys.q_id) * r;

    let mut body = cu.to_compressed().to_vec();
    body.extend(xor(&hash(b"IBE-H2", &r_gid.to_bytes()), &sigma));
    body.extend(xor(&hash(b"IBE-H4", &sigma), file_key));
    body
}

fn seal_payload(file_key: &[u8; 32], nonce: &[u8; 16], plaintext: &[u8]) -> Vec<u8> {
    let key = distibe_stream::stream_key(file_key, nonce).unwrap();
    let aead = ChaCha20Poly1305::new(Key::from_slice(&key[..]));

    let mut chunks: Vec<&[u8]> = plaintext.chunks(CHUNK_SIZE).collect();
    if chunks.is_empty() {
        chunks.push(&[]);
    }

    let mut out = nonce.to_vec();
    for (i, chunk) in chunks.iter().enumerate() {
        let mut n = [0u8; 12];
        n[3..11].copy_from_slice(&(i as u64).to_be_bytes());
        n[11] = u8::from(i + 1 == chunks.len());
        out.extend(aead.encrypt(Nonce::from_slice(&n), *chunk).unwrap());
    }
    out
}

/// Encrypts `plaintext` to the identity behind `keys`.
pub fn encrypt(keys: &KeyMaterial, plaintext: &[u8], seed: u64) -> Vec<u8> {
    let mut rng = ChaCha20Rng::seed_from_u64(seed);
    let mut file_key = [0u8; 32];
    let mut nonce = [0u8; 16];
    rng.fill_bytes(&mut file_key);
    rng.fill_bytes(&mut nonce);

    let mut hdr = Header {
        recipients: vec![Stanza {
            type_: STANZA_TYPE.to_string(),
            args: vec![],
            body: stanza_body(keys, &file_key, &mut rng),
        }],
        mac: vec![],
    };
    hdr.mac = distibe_mac::header_mac(&file_key, &hdr).unwrap().to_vec();

    let mut out = Vec::new();
    hdr.marshal(&mut out).unwrap();
    out.extend(seal_payload(&file_key, &nonce, plaintext));
    out
}

/// Length of the age header, footer line included.
pub fn header_len(ciphertext: &[u8]) -> usize {
    let footer = ciphertext
        .windows(4)
        .position(|w| w == b"\n---")
        .unwrap();
    footer
        + 1
        + ciphertext[footer + 1..]
            .iter()
            .position(|&b| b == b'\n')
            .unwrap()
        + 1
}

/// `header ‖ pk ‖ sk ‖ ciphertext` as the guest receives it.
pub fn call_input(keys: &KeyMaterial, ciphertext: &[u8]) -> Vec<u8> {
    let mut raw: Vec<u8> = (0..HEADER_LEN).map(|i| (i * 7) as u8).collect();
    raw.extend_from_slice(&keys.pk);
    raw.extend_from_slice(&keys.sk);
    raw.extend_from_slice(ciphertext);
    raw
}
