use crate::{
    crypto::SigningKey,
    signature::DKIM_SIGNATURE_NAME,
    signer::SignerError,
    tag_list::SignatureTags,
};

/// Returns the names of the headers that are signed by default, in signing
/// order.
///
/// The list ends with *DKIM-Signature*: an existing signature header in the
/// message is included in the signed header block, though it is never listed
/// in the *h=* tag.
pub fn default_signed_headers() -> Vec<String> {
    let names = [
        "Cc",
        "Content-Type",
        "Date",
        "From",
        "Reply-To",
        "Subject",
        "To",
        DKIM_SIGNATURE_NAME,
    ];

    names.into_iter().map(Into::into).collect()
}

/// A request for creation of a DKIM signature.
pub struct SignRequest<T> {
    /// The signature tags. The *bh=*, *h=*, and *b=* tags are filled in
    /// during signing, all other tags are used as given.
    pub tags: SignatureTags,
    /// The names of the headers to sign, in signing order. Names not present
    /// in the message are skipped.
    pub signed_headers: Vec<String>,
    /// The key to use for producing the cryptographic signature.
    pub signing_key: Option<T>,
}

impl<T> SignRequest<T> {
    pub fn new(tags: SignatureTags, signing_key: T) -> Self {
        Self {
            tags,
            signed_headers: default_signed_headers(),
            signing_key: Some(signing_key),
        }
    }
}

pub fn validate_request<T: AsRef<SigningKey>>(request: &SignRequest<T>) -> Result<(), SignerError> {
    if !request.tags.is_valid() {
        return Err(SignerError::InvalidTags);
    }

    if request.signing_key.is_none() {
        return Err(SignerError::NoKeyLoaded);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_signed_headers_ok() {
        let names = default_signed_headers();

        assert_eq!(names.len(), 8);
        assert!(names.iter().any(|n| n == "From"));
        assert_eq!(names.last().map(|n| n.as_str()), Some(DKIM_SIGNATURE_NAME));
    }

    #[test]
    fn validate_request_ok() {
        let tags = SignatureTags::new_at("example.com", "sel", 1).unwrap();

        let request = SignRequest::<SigningKey> {
            tags: tags.clone(),
            signed_headers: default_signed_headers(),
            signing_key: None,
        };
        assert_eq!(validate_request(&request), Err(SignerError::NoKeyLoaded));

        let request = SignRequest::<SigningKey> {
            tags: SignatureTags::default(),
            signed_headers: default_signed_headers(),
            signing_key: None,
        };
        assert_eq!(validate_request(&request), Err(SignerError::InvalidTags));
    }
}
