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

//! Common parsing utilities.

pub const CRLF: &str = "\r\n";

// RFC 5234, appendix B.1

pub fn is_wsp(c: char) -> bool {
    matches!(c, ' ' | '\t')
}

/// Whitespace as understood when trimming and folding header text: WSP and
/// the line break characters.
pub fn is_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n')
}

/// Whether a physical header line is a continuation of the previous one.
pub fn is_continuation_line(line: &str) -> bool {
    line.starts_with(is_wsp)
}

/// Replaces every run of characters matching `pred` with a single space.
pub fn collapse_runs(input: &str, pred: impl Fn(char) -> bool) -> String {
    let mut result = String::with_capacity(input.len());

    let mut compressing = false;
    for c in input.chars() {
        if pred(c) {
            if !compressing {
                result.push(' ');
                compressing = true;
            }
        } else {
            result.push(c);
            compressing = false;
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn is_continuation_line_ok() {
        assert!(is_continuation_line(" x"));
        assert!(is_continuation_line("\tx"));
        assert!(is_continuation_line(" "));

        assert!(!is_continuation_line(""));
        assert!(!is_continuation_line("x "));
        assert!(!is_continuation_line("\r\n x"));
    }

    #[test]
    fn collapse_runs_ok() {
        assert_eq!(collapse_runs("", is_wsp), "");
        assert_eq!(collapse_runs("a \t b", is_wsp), "a b");
        assert_eq!(collapse_runs("\t\ta  ", is_wsp), " a ");
        assert_eq!(collapse_runs("a\r\n\tb", is_wsp), "a\r\n b");
        assert_eq!(collapse_runs("a\r\n\tb", is_space), "a b");
    }
}
