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

//! Computation of the message hashes.

use crate::{
    canonicalize,
    crypto::{self, HashAlgorithm},
    header::{Header, HeaderList},
    parse,
    signature::{CanonicalizationAlgorithm, DKIM_SIGNATURE_NAME},
};

/// Computes the *body hash*: the digest of the canonicalized body.
pub fn compute_body_hash(
    hash_alg: HashAlgorithm,
    canon_alg: CanonicalizationAlgorithm,
    body: &str,
) -> Box<[u8]> {
    let cbody = canonicalize::canonicalize_body(canon_alg, body);
    crypto::digest(hash_alg, cbody.as_bytes())
}

/// Produces the canonicalized header block that the signature covers.
///
/// The block consists of the selected headers followed by the
/// *DKIM-Signature* header with the given (not yet signed) tag-list as its
/// value. The block ends without a trailing CRLF.
pub fn signed_header_block(
    canon_alg: CanonicalizationAlgorithm,
    selected_headers: &HeaderList,
    formatted_dkim_sig_header_value: &str,
) -> String {
    let mut headers = selected_headers.clone();
    headers.push(Header::new(DKIM_SIGNATURE_NAME, formatted_dkim_sig_header_value));

    let mut block = headers.canonical(canon_alg);

    // RFC 6376, §3.7: the DKIM-Signature header is hashed without its
    // trailing CRLF
    let len = block.trim_end_matches(parse::is_space).len();
    block.truncate(len);

    block
}

/// Computes the *data hash*: the digest of the signed header block.
pub fn compute_data_hash(hash_alg: HashAlgorithm, header_block: &str) -> Box<[u8]> {
    crypto::digest(hash_alg, header_block.as_bytes())
}
