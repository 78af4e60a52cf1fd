//! Cryptographic utilities.
//!
//! The private key is supplied by the caller as an already decoded key
//! object. Decoding key material from PEM or DER containers happens outside
//! this library, for example with the `DecodeRsaPrivateKey` and
//! `DecodePrivateKey` traits re-exported by the `rsa` crate.

mod hash;
mod rsa;

pub use self::{
    hash::{digest, digest_slices},
    rsa::{get_key_size, sign_rsa},
};

use crate::util::CanonicalStr;
use ::rsa::RsaPrivateKey;
use std::{
    error::Error,
    fmt::{self, Display, Formatter},
};

/// A private key used for producing signatures.
#[derive(Debug)]
pub enum SigningKey {
    Rsa(RsaPrivateKey),
}

impl SigningKey {
    /// Returns the key size in bits.
    pub fn key_size(&self) -> usize {
        match self {
            Self::Rsa(k) => get_key_size(k),
        }
    }
}

impl From<RsaPrivateKey> for SigningKey {
    fn from(key: RsaPrivateKey) -> Self {
        Self::Rsa(key)
    }
}

impl AsRef<SigningKey> for SigningKey {
    fn as_ref(&self) -> &SigningKey {
        self
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum HashAlgorithm {
    #[default]
    Sha256,
}

impl CanonicalStr for HashAlgorithm {
    fn canonical_str(&self) -> &'static str {
        match self {
            Self::Sha256 => "sha256",
        }
    }
}

/// An error that occurs when producing a cryptographic signature.
///
/// The error of the underlying primitive is kept as is and is available as
/// the source of this error.
#[derive(Debug, PartialEq, Eq)]
pub enum SigningError {
    Rsa(::rsa::Error),
}

impl Display for SigningError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rsa(_) => write!(f, "RSA signing failed"),
        }
    }
}

impl Error for SigningError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Rsa(e) => Some(e),
        }
    }
}
