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

//! A library for signing email messages with *DomainKeys Identified Mail*
//! (DKIM) signatures as described in [RFC 6376].
//!
//! This library implements the signing side of DKIM only. It canonicalizes
//! the header and body of a message, computes the body hash and the
//! cryptographic signature, and inserts the resulting *DKIM-Signature* header
//! into the message.
//!
//! The whole message is processed in memory. Signing is a pure computation:
//! no I/O is done, and no state is shared between signing operations.
//!
//! # Usage
//!
//! The type [`Signer`] provides the entry point to signing. A signing
//! operation is configured with a [`SignRequest`], which carries the
//! signature tags ([`SignatureTags`]), the names of the headers to sign, and
//! the signing key.
//!
//! The signing key must be supplied as an already decoded RSA private key.
//! Decoding keys from PEM or DER is left to the caller.
//!
//! The modules `canonicalize`, `header`, and `message_hash` provide the
//! building blocks used by the signer.
//!
//! [RFC 6376]: https://www.rfc-editor.org/rfc/rfc6376

pub mod canonicalize;
pub mod crypto;
pub mod header;
pub mod message_hash;
mod parse;
pub mod signature;
pub mod signer;
pub mod tag_list;
mod util;

pub use crate::{
    crypto::{HashAlgorithm, SigningKey},
    header::{Header, HeaderError, HeaderList},
    signature::{
        Canonicalization, CanonicalizationAlgorithm, SignatureAlgorithm, DKIM_SIGNATURE_NAME,
    },
    signer::{split_message, SignRequest, Signer, SignerError, SigningResult},
    tag_list::{SignatureTags, SignatureTagsError, TagName},
    util::{encode_base64, CanonicalStr},
};
