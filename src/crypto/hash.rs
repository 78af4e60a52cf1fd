use crate::crypto::HashAlgorithm;
use digest::Digest;
use sha2::Sha256;

/// Computes the message digest of the concatenation of some byte slices.
pub fn digest_slices<I, T>(hash_alg: HashAlgorithm, slices: I) -> Box<[u8]>
where
    I: IntoIterator<Item = T>,
    T: AsRef<[u8]>,
{
    match hash_alg {
        HashAlgorithm::Sha256 => {
            let mut hasher = Sha256::new();
            for bytes in slices {
                hasher.update(bytes.as_ref());
            }
            Box::from(&hasher.finalize()[..])
        }
    }
}

/// Computes the message digest of some bytes.
pub fn digest(hash_alg: HashAlgorithm, bytes: &[u8]) -> Box<[u8]> {
    digest_slices(hash_alg, [bytes])
}
