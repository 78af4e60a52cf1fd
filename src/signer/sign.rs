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

use crate::{
    crypto::{self, HashAlgorithm, SigningKey},
    header::{Header, HeaderList},
    message_hash,
    parse::CRLF,
    signature::{CanonicalizationAlgorithm, DKIM_SIGNATURE_NAME},
    signer::SignerError,
    tag_list::{SignatureTags, TagName},
    util,
};
use tracing::trace;

pub struct SigningTask<'a> {
    pub tags: &'a SignatureTags,
    pub signed_headers: &'a [String],
    pub signing_key: &'a SigningKey,
    pub hash_alg: HashAlgorithm,
    pub headers: &'a HeaderList,
    pub body: &'a str,
}

/// Computes the signature, returning the final tags and the name and value
/// of the *DKIM-Signature* header to insert.
pub fn perform_signing(
    task: &SigningTask<'_>,
) -> Result<(SignatureTags, String, String), SignerError> {
    let (tags, header_block) = prepare_header_block(task);

    let data_hash = message_hash::compute_data_hash(task.hash_alg, &header_block);

    let signature_data = sign_hash(task.signing_key, task.hash_alg, &data_hash)?;

    let tags = tags.with(TagName::SignatureData, util::encode_base64(signature_data));

    // header values are raw values, the tag-list follows a space after the colon
    let header_value = format!(" {tags}");

    Ok((tags, DKIM_SIGNATURE_NAME.into(), header_value))
}

/// Computes body hash and signed headers, and produces the canonicalized
/// header block to be signed together with the unsigned tags it contains.
fn prepare_header_block(task: &SigningTask<'_>) -> (SignatureTags, String) {
    let canonicalization = task.tags.canonicalization();

    // calculate body hash

    let body_hash = message_hash::compute_body_hash(task.hash_alg, canonicalization.body, task.body);
    let body_hash = util::encode_base64(body_hash);

    trace!("computed body hash {body_hash}");

    // select headers

    let selected_headers = select_headers(task.headers, task.signed_headers);

    trace!("selected {} headers for signing", selected_headers.len());

    let tags = task
        .tags
        .clone()
        .with(TagName::BodyHash, body_hash)
        .with(TagName::SignedHeaders, selected_headers.fields())
        .with(TagName::SignatureData, "");

    let header_block = message_hash::signed_header_block(
        canonicalization.header,
        &selected_headers,
        &tags.to_string(),
    );

    (tags, header_block)
}

/// Selects the headers to sign, in the order of the given names.
///
/// For each name the first header with that name is selected; names of
/// headers not present in the message are skipped.
pub fn select_headers(headers: &HeaderList, names: &[String]) -> HeaderList {
    names
        .iter()
        .filter_map(|name| headers.get(name))
        .cloned()
        .collect()
}

fn sign_hash(
    signing_key: &SigningKey,
    hash_alg: HashAlgorithm,
    data_hash: &[u8],
) -> Result<Vec<u8>, SignerError> {
    match signing_key {
        SigningKey::Rsa(k) => {
            let s = crypto::sign_rsa(hash_alg, k, data_hash).map_err(SignerError::SigningFailure)?;
            trace!("RSA signing successful");
            Ok(s)
        }
    }
}

/// Appends the signature header to the original headers, and joins them with
/// the body.
pub fn assemble_message(
    headers: &HeaderList,
    header_name: &str,
    header_value: &str,
    body: &str,
) -> String {
    let mut headers = headers.clone();
    headers.push(Header::new(header_name, header_value));

    // the signature header is inserted with the message's own framing,
    // regardless of the header canonicalization used for signing
    let header = headers.canonical(CanonicalizationAlgorithm::Simple);

    [header.as_str(), body].join(CRLF)
}
