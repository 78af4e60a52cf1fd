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

//! Representation of email header data.

use crate::{
    canonicalize,
    parse::{self, CRLF},
    signature::{CanonicalizationAlgorithm, DKIM_SIGNATURE_NAME},
};
use std::{
    error::Error,
    fmt::{self, Display, Formatter},
    str::FromStr,
};

/// An error that occurs when parsing header data.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum HeaderError {
    /// A header line does not contain a colon.
    Malformed,
    /// A header block does not contain a single header line.
    NoHeaders,
}

impl Display for HeaderError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Malformed => write!(f, "malformed header"),
            Self::NoHeaders => write!(f, "no headers found"),
        }
    }
}

impl Error for HeaderError {}

/// A header field as read from a message.
///
/// The raw key and raw value are the text before and after the first colon,
/// including all surrounding whitespace. For folded headers, the raw value
/// contains the continuation lines with their line breaks.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Header {
    pub raw_key: String,
    pub raw_value: String,
}

impl Header {
    pub fn new(raw_key: impl Into<String>, raw_value: impl Into<String>) -> Self {
        Self {
            raw_key: raw_key.into(),
            raw_value: raw_value.into(),
        }
    }

    /// Parses a single physical header line, splitting it at the first colon.
    pub fn parse(line: &str) -> Result<Self, HeaderError> {
        match line.split_once(':') {
            Some((raw_key, raw_value)) => Ok(Self::new(raw_key, raw_value)),
            None => Err(HeaderError::Malformed),
        }
    }

    pub fn key(&self) -> &str {
        self.raw_key.trim_matches(parse::is_space)
    }

    pub fn value(&self) -> &str {
        self.raw_value.trim_matches(parse::is_space)
    }

    /// The key as used for comparison and relaxed canonicalization.
    pub fn relaxed_key(&self) -> String {
        self.key().to_ascii_lowercase()
    }

    /// The value with all whitespace runs, including line breaks, reduced to
    /// a single space, and without leading and trailing whitespace.
    pub fn relaxed_value(&self) -> String {
        parse::collapse_runs(&self.raw_value, parse::is_space)
            .trim_matches(' ')
            .into()
    }

    /// Renders this header field as a single canonicalized field.
    pub fn canonical(&self, algorithm: CanonicalizationAlgorithm) -> String {
        let mut result = String::new();
        canonicalize::canonicalize_header(&mut result, algorithm, self);
        result
    }

    fn is_signature_header(&self) -> bool {
        self.relaxed_key() == normalize_name(DKIM_SIGNATURE_NAME)
    }
}

// Header names are matched by comparing lower-cased names; the original
// spelling is kept in the `Header` itself.
fn normalize_name(name: &str) -> String {
    name.to_ascii_lowercase()
}

/// An ordered collection of header fields.
///
/// The order is the order of appearance in the header block.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct HeaderList(Vec<Header>);

impl HeaderList {
    pub fn new(headers: impl Into<Vec<Header>>) -> Self {
        Self(headers.into())
    }

    /// Parses a header block consisting of CRLF-separated lines.
    ///
    /// A line starting with a space or tab continues the preceding header,
    /// and is appended to its raw value together with the preceding line
    /// break. Such a line is dropped when no header precedes it.
    ///
    /// Lines that cannot be parsed as a header line are skipped: a malformed
    /// line does not invalidate the rest of the block. Only a block that
    /// yields no header at all is an error.
    pub fn parse(block: &str) -> Result<Self, HeaderError> {
        let mut headers: Vec<Header> = vec![];

        for line in block.split(CRLF) {
            if parse::is_continuation_line(line) {
                if let Some(last) = headers.last_mut() {
                    last.raw_value.push_str(CRLF);
                    last.raw_value.push_str(line);
                }
                continue;
            }

            if let Ok(header) = Header::parse(line) {
                headers.push(header);
            }
        }

        if headers.is_empty() {
            return Err(HeaderError::NoHeaders);
        }

        Ok(Self(headers))
    }

    /// Returns the first header whose key equals `key`, ignoring case.
    pub fn get(&self, key: &str) -> Option<&Header> {
        let key = normalize_name(key);
        self.0.iter().find(|h| h.relaxed_key() == key)
    }

    /// Returns the colon-separated keys of all headers except any
    /// *DKIM-Signature* header, suitable as the value of the *h=* tag.
    pub fn fields(&self) -> String {
        self.0
            .iter()
            .filter(|h| !h.is_signature_header())
            .map(|h| h.key())
            .collect::<Vec<_>>()
            .join(":")
    }

    /// Renders all headers in canonical form, each terminated by CRLF.
    pub fn canonical(&self, algorithm: CanonicalizationAlgorithm) -> String {
        canonicalize::canonicalize_headers(algorithm, &self.0)
    }

    pub fn push(&mut self, header: Header) {
        self.0.push(header);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Header> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<[Header]> for HeaderList {
    fn as_ref(&self) -> &[Header] {
        &self.0
    }
}

impl From<HeaderList> for Vec<Header> {
    fn from(headers: HeaderList) -> Self {
        headers.0
    }
}

impl FromIterator<Header> for HeaderList {
    fn from_iter<I: IntoIterator<Item = Header>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl FromStr for HeaderList {
    type Err = HeaderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
