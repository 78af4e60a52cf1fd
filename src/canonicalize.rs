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

//! Canonicalization utilities.

use crate::{
    header::Header,
    parse::{self, CRLF},
    signature::CanonicalizationAlgorithm,
};

/// Produces the canonical form of a message body.
///
/// Both algorithms remove all trailing spaces and line breaks at the end of
/// the body, and then terminate the body with exactly one CRLF. The relaxed
/// algorithm first reduces runs of spaces and tabs to a single space, and
/// removes a space preceding a CRLF.
///
/// An empty body is special: under the simple algorithm it becomes a single
/// CRLF, under the relaxed algorithm it stays empty.
pub fn canonicalize_body(algorithm: CanonicalizationAlgorithm, body: &str) -> String {
    let mut result = match algorithm {
        CanonicalizationAlgorithm::Simple => {
            if body.is_empty() {
                return CRLF.into();
            }
            body.to_owned()
        }
        CanonicalizationAlgorithm::Relaxed => {
            if body.is_empty() {
                return String::new();
            }
            parse::collapse_runs(body, parse::is_wsp).replace(" \r\n", CRLF)
        }
    };

    // ignore all empty lines at the end of the body
    let len = result.trim_end_matches(|c: char| matches!(c, ' ' | '\r' | '\n')).len();
    result.truncate(len);

    result.push_str(CRLF);
    result
}

/// Produces the header canonicalization result for some header fields.
pub fn canonicalize_headers(algorithm: CanonicalizationAlgorithm, headers: &[Header]) -> String {
    let mut result = String::new();

    for header in headers {
        canonicalize_header(&mut result, algorithm, header);
        result.push_str(CRLF);
    }

    result
}

/// Canonicalizes a header field into some result string.
pub fn canonicalize_header(
    result: &mut String,
    algorithm: CanonicalizationAlgorithm,
    header: &Header,
) {
    match algorithm {
        CanonicalizationAlgorithm::Simple => {
            result.push_str(&header.raw_key);
            result.push(':');
            result.push_str(&header.raw_value);
        }
        CanonicalizationAlgorithm::Relaxed => {
            result.push_str(&header.relaxed_key());
            result.push(':');
            result.push_str(&header.relaxed_value());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use CanonicalizationAlgorithm::*;

    #[test]
    fn canonicalize_body_empty() {
        assert_eq!(canonicalize_body(Simple, ""), "\r\n");
        assert_eq!(canonicalize_body(Relaxed, ""), "");
    }

    #[test]
    fn canonicalize_body_only_line_breaks() {
        assert_eq!(canonicalize_body(Simple, "\r\n\r\n"), "\r\n");
        assert_eq!(canonicalize_body(Relaxed, "\r\n\r\n"), "\r\n");
    }

    #[test]
    fn canonicalize_body_simple_ok() {
        assert_eq!(
            canonicalize_body(Simple, " C \r\nD \t E\r\n\r\n\r\n"),
            " C \r\nD \t E\r\n"
        );
        assert_eq!(
            canonicalize_body(Simple, "Hi.\r\n\r\nWe lost the game.\r\n\r\nJoe.\r\n"),
            "Hi.\r\n\r\nWe lost the game.\r\n\r\nJoe.\r\n"
        );
        assert_eq!(canonicalize_body(Simple, "no final line break"), "no final line break\r\n");
    }

    #[test]
    fn canonicalize_body_relaxed_ok() {
        assert_eq!(
            canonicalize_body(Relaxed, " C \r\nD \t E\r\n\r\n\r\n"),
            " C\r\nD E\r\n"
        );
        assert_eq!(
            canonicalize_body(Relaxed, "well  hello \r\n\r\n what agi \r\n\r\n\r\n"),
            "well hello\r\n\r\n what agi\r\n"
        );
        assert_eq!(
            canonicalize_body(
                Relaxed,
                "This is the body of \t the message.=0D=0AThis is the second line\r\n\r\n"
            ),
            "This is the body of the message.=0D=0AThis is the second line\r\n"
        );
    }

    #[test]
    fn canonicalize_body_relaxed_keeps_line_breaks() {
        assert_eq!(canonicalize_body(Relaxed, "a \t\r\n\t\r\nb"), "a\r\n\r\nb\r\n");
    }

    #[test]
    fn canonicalize_headers_ok() {
        let headers = [
            Header::new("From", " Good \t "),
            Header::new("to", " see   me"),
            Header::new("Date", " Fri 24\r\n\tfoo"),
        ];

        assert_eq!(
            canonicalize_headers(Relaxed, &headers),
            "from:Good\r\nto:see me\r\ndate:Fri 24 foo\r\n"
        );
        assert_eq!(
            canonicalize_headers(Simple, &headers),
            "From: Good \t \r\nto: see   me\r\nDate: Fri 24\r\n\tfoo\r\n"
        );
        assert_eq!(canonicalize_headers(Relaxed, &[]), "");
    }
}
