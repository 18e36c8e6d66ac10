//! ECDSA/P-256 cryptographic operations for the Brookchain protocol (§4.1).
//!
//! # Fixed-width encoding
//!
//! A public key is stored and transmitted as `X || Y`, the two P-256 field
//! coordinates each left-padded to exactly 32 bytes — never the SEC1
//! compressed or 0x04-prefixed uncompressed form. A signature is `r || s`,
//! also 32 bytes each. Every wire and on-disk representation of a key or
//! signature is therefore a fixed 64 bytes, which is what lets verification
//! reconstruct `X`/`Y` (or `r`/`s`) as two equal halves without a length
//! prefix, as required by §4.1's edge-case note.

use ecdsa::signature::hazmat::{PrehashSigner, PrehashVerifier};
use p256::ecdsa::{Signature, SigningKey, VerifyingKey};
use p256::elliptic_curve::sec1::ToEncodedPoint;
use p256::{EncodedPoint, FieldBytes};
use ripemd::Ripemd160;
use sha2::{Digest, Sha256};

use crate::error::CryptoError;
use crate::types::{Hash, PubKeyHash};

/// Width in bytes of one P-256 coordinate, and of one ECDSA signature component.
pub const COORD_LEN: usize = 32;

/// An ECDSA/P-256 keypair.
pub struct KeyPair {
    signing_key: SigningKey,
}

impl KeyPair {
    /// Generate a random keypair using the OS CSPRNG (§4.1 `newKeyPair`).
    pub fn generate() -> Self {
        Self {
            signing_key: SigningKey::random(&mut rand::rngs::OsRng),
        }
    }

    /// Derive a keypair from 32 bytes of private scalar material.
    pub fn from_secret_bytes(bytes: &[u8; 32]) -> Result<Self, CryptoError> {
        let signing_key = SigningKey::from_bytes(FieldBytes::from_slice(bytes))
            .map_err(|_| CryptoError::InvalidPublicKey)?;
        Ok(Self { signing_key })
    }

    /// The raw 32-byte private scalar. Callers are responsible for zeroing their copy.
    pub fn secret_bytes(&self) -> [u8; 32] {
        self.signing_key.to_bytes().into()
    }

    /// The public key paired with this private key.
    pub fn public_key(&self) -> PublicKey {
        PublicKey {
            verifying_key: *self.signing_key.verifying_key(),
        }
    }

    /// Sign a 32-byte digest, returning `r || s` (64 bytes, §4.1 `sign`).
    pub fn sign(&self, digest: &[u8]) -> Vec<u8> {
        let sig: Signature = self
            .signing_key
            .sign_prehash(digest)
            .expect("P-256 signing over a fixed digest cannot fail");
        sig.to_bytes().to_vec()
    }
}

/// An ECDSA/P-256 public key, stored internally in fixed-width `X || Y` form.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct PublicKey {
    verifying_key: VerifyingKey,
}

impl PublicKey {
    /// Parse a public key from its 64-byte `X || Y` wire encoding.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        if bytes.len() != 2 * COORD_LEN {
            return Err(CryptoError::InvalidPublicKey);
        }
        let point = EncodedPoint::from_affine_coordinates(
            FieldBytes::from_slice(&bytes[..COORD_LEN]),
            FieldBytes::from_slice(&bytes[COORD_LEN..]),
            false,
        );
        let verifying_key =
            VerifyingKey::from_encoded_point(&point).map_err(|_| CryptoError::InvalidPublicKey)?;
        Ok(Self { verifying_key })
    }

    /// Encode as the 64-byte `X || Y` wire form (§3 `TxIn.pubKey`).
    pub fn to_bytes(&self) -> Vec<u8> {
        let encoded = self.verifying_key.to_encoded_point(false);
        // Uncompressed SEC1 is `0x04 || X || Y`; drop the tag byte, per the module doc.
        encoded.as_bytes()[1..].to_vec()
    }

    /// Verify an ECDSA/P-256 signature (`r || s`, §4.1 note) over a 32-byte digest.
    pub fn verify(&self, digest: &[u8], signature: &[u8]) -> Result<(), CryptoError> {
        let sig = Signature::from_slice(signature).map_err(|_| CryptoError::InvalidSignature)?;
        self.verifying_key
            .verify_prehash(digest, &sig)
            .map_err(|_| CryptoError::VerificationFailed)
    }

    /// `ripemd160(sha256(pubkey))` — the hash a [`TxOutput`](crate::types::TxOutput)
    /// locks to (§4.1 `pubKeyHash`).
    pub fn pub_key_hash(&self) -> PubKeyHash {
        pub_key_hash(&self.to_bytes())
    }
}

/// `ripemd160(sha256(pubkey_bytes))` (§4.1).
pub fn pub_key_hash(pubkey_bytes: &[u8]) -> PubKeyHash {
    let sha = Sha256::digest(pubkey_bytes);
    let ripe = Ripemd160::digest(sha);
    let mut out = [0u8; 20];
    out.copy_from_slice(&ripe);
    PubKeyHash(out)
}

/// `sha256(sha256(data))`, used for address checksums.
pub fn double_sha256(data: &[u8]) -> Hash {
    Hash::sha256(Sha256::digest(data).as_slice())
}
