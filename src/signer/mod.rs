// dkimsign – DKIM canonicalization and signing
// Copyright © 2022–2023 David Bürgin <dbuergin@gluet.ch>
//
// This program is free software: you can redistribute it and/or modify it under
// the terms of the GNU General Public License as published by the Free Software
// Foundation, either version 3 of the License, or (at your option) any later
// version.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more
// details.
//
// You should have received a copy of the GNU General Public License along with
// this program. If not, see <https://www.gnu.org/licenses/>.

//! Signer and supporting types.

mod request;
mod sign;

pub use crate::signer::request::{default_signed_headers, SignRequest};

use crate::{
    crypto::{HashAlgorithm, SigningError, SigningKey},
    header::HeaderList,
    tag_list::SignatureTags,
};
use std::{
    error::Error,
    fmt::{self, Display, Formatter},
};

/// An error that occurs when using a [`Signer`].
#[derive(Debug, PartialEq, Eq)]
pub enum SignerError {
    /// The message is empty.
    EmptyMessage,
    /// The signature tags lack a required tag.
    InvalidTags,
    /// No signing key was supplied.
    NoKeyLoaded,
    /// The message has no blank line separating header and body.
    MalformedMessage,
    /// The header block contains no header.
    NoHeaders,
    /// The cryptographic signing operation failed.
    SigningFailure(SigningError),
}

impl Display for SignerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyMessage => write!(f, "empty message"),
            Self::InvalidTags => write!(f, "invalid signature tags"),
            Self::NoKeyLoaded => write!(f, "no key loaded"),
            Self::MalformedMessage => write!(f, "malformed message"),
            Self::NoHeaders => write!(f, "no headers found"),
            Self::SigningFailure(_) => write!(f, "signing failed"),
        }
    }
}

impl Error for SignerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::SigningFailure(e) => Some(e),
            _ => None,
        }
    }
}

/// The result of a successful signing operation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SigningResult {
    /// The final signature tags, including body hash, signed headers, and
    /// signature data.
    pub tags: SignatureTags,
    // Usage: header_name and header_value are meant to be concatenated with
    // only an intervening colon, header_value carries its own leading space
    pub header_name: String,
    pub header_value: String,
    /// The signed message: the original headers followed by the
    /// *DKIM-Signature* header, a blank line, and the original body.
    pub message: String,
}

impl SigningResult {
    /// Returns the formatted *DKIM-Signature* header, without final CRLF.
    pub fn format_header(&self) -> String {
        format!("{}:{}", self.header_name, self.header_value)
    }
}

/// Splits a message into header block and body at the first empty line.
///
/// The header block does not include the CRLF terminating the last header
/// line.
pub fn split_message(message: &str) -> Result<(&str, &str), SignerError> {
    message
        .split_once("\r\n\r\n")
        .ok_or(SignerError::MalformedMessage)
}

/// A signer for an email message.
///
/// # Examples
///
/// ```
/// use dkimsign::{signer::{SignRequest, Signer}, SignatureTags, SigningKey};
/// use rsa::RsaPrivateKey;
///
/// # fn sign(private_key: RsaPrivateKey) -> Result<(), Box<dyn std::error::Error>> {
/// let tags = SignatureTags::new("example.com", "sel1")?;
/// let request = SignRequest::new(tags, SigningKey::from(private_key));
///
/// let message = "From: me@example.com\r\nTo: you@example.org\r\n\r\nHello!\r\n";
///
/// let signer = Signer::prepare_signing(request, message)?;
/// let result = signer.sign()?;
///
/// assert!(result.message.contains("\r\nDKIM-Signature: v=1; a=rsa-sha256;"));
/// # Ok(())
/// # }
/// ```
pub struct Signer<'a, T> {
    tags: SignatureTags,
    signed_headers: Vec<String>,
    signing_key: T,
    hash_alg: HashAlgorithm,
    headers: HeaderList,
    body: &'a str,
}

impl<'a, T> Signer<'a, T>
where
    T: AsRef<SigningKey>,
{
    /// Prepares a message signing process.
    ///
    /// The request and the message are validated here, before any
    /// cryptographic work is done.
    ///
    /// # Panics
    ///
    /// Panics if the *a=* tag names an unsupported signature algorithm.
    pub fn prepare_signing(request: SignRequest<T>, message: &'a str) -> Result<Self, SignerError> {
        if message.is_empty() {
            return Err(SignerError::EmptyMessage);
        }

        request::validate_request(&request)?;

        let SignRequest { tags, signed_headers, signing_key } = request;

        let signing_key = signing_key.ok_or(SignerError::NoKeyLoaded)?;

        let hash_alg = tags.hash_algorithm();

        let (header, body) = split_message(message)?;

        let headers = HeaderList::parse(header).map_err(|_| SignerError::NoHeaders)?;

        Ok(Self {
            tags,
            signed_headers,
            signing_key,
            hash_alg,
            headers,
            body,
        })
    }

    /// The headers of the message, in original order.
    pub fn headers(&self) -> &HeaderList {
        &self.headers
    }

    /// The body of the message.
    pub fn body(&self) -> &str {
        self.body
    }

    /// Signs the message.
    ///
    /// The signer is not modified, signing again produces the same result.
    pub fn sign(&self) -> Result<SigningResult, SignerError> {
        let task = sign::SigningTask {
            tags: &self.tags,
            signed_headers: &self.signed_headers,
            signing_key: self.signing_key.as_ref(),
            hash_alg: self.hash_alg,
            headers: &self.headers,
            body: self.body,
        };

        let (tags, header_name, header_value) = sign::perform_signing(&task)?;

        let message = sign::assemble_message(&self.headers, &header_name, &header_value, self.body);

        Ok(SigningResult {
            tags,
            header_name,
            header_value,
            message,
        })
    }
}
