//! DKIM signature algorithms and canonicalization modes.

use crate::{crypto::HashAlgorithm, util::CanonicalStr};
use std::{
    fmt::{self, Display, Formatter},
    str::FromStr,
};

/// The name of the DKIM signature header.
pub const DKIM_SIGNATURE_NAME: &str = "DKIM-Signature";

/// A signature algorithm.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum SignatureAlgorithm {
    /// The *rsa-sha256* signature algorithm.
    #[default]
    RsaSha256,
}

impl SignatureAlgorithm {
    /// Returns this signature algorithm’s hash algorithm.
    pub fn hash_algorithm(self) -> HashAlgorithm {
        match self {
            Self::RsaSha256 => HashAlgorithm::Sha256,
        }
    }
}

impl CanonicalStr for SignatureAlgorithm {
    fn canonical_str(&self) -> &'static str {
        match self {
            Self::RsaSha256 => "rsa-sha256",
        }
    }
}

impl Display for SignatureAlgorithm {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.canonical_str())
    }
}

impl FromStr for SignatureAlgorithm {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("rsa-sha256") {
            Ok(Self::RsaSha256)
        } else {
            Err("unknown signature algorithm")
        }
    }
}

/// A canonicalization algorithm.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum CanonicalizationAlgorithm {
    /// The *simple* canonicalization algorithm.
    #[default]
    Simple,
    /// The *relaxed* canonicalization algorithm.
    Relaxed,
}

impl CanonicalStr for CanonicalizationAlgorithm {
    fn canonical_str(&self) -> &'static str {
        match self {
            Self::Simple => "simple",
            Self::Relaxed => "relaxed",
        }
    }
}

impl Display for CanonicalizationAlgorithm {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.canonical_str())
    }
}

/// A pair of header/body canonicalization algorithms.
#[derive(Clone, Copy, Default, Eq, Hash, PartialEq)]
pub struct Canonicalization {
    /// The header canonicalization.
    pub header: CanonicalizationAlgorithm,
    /// The body canonicalization.
    pub body: CanonicalizationAlgorithm,
}

impl Canonicalization {
    /// Interprets the value of a *c=* tag.
    ///
    /// The parse is lenient and asymmetric: the header algorithm is relaxed if
    /// the value starts with `relaxed`, the body algorithm is relaxed if the
    /// value ends with `/relaxed`, ignoring case. Anything else means simple.
    /// A bare `relaxed` therefore selects relaxed header and simple body
    /// canonicalization.
    pub fn from_tag_value(value: &str) -> Self {
        use CanonicalizationAlgorithm::*;

        let value = value.to_ascii_lowercase();

        let header = if value.starts_with("relaxed") { Relaxed } else { Simple };
        let body = if value.ends_with("/relaxed") { Relaxed } else { Simple };

        Self { header, body }
    }
}

impl CanonicalStr for Canonicalization {
    fn canonical_str(&self) -> &'static str {
        use CanonicalizationAlgorithm::*;

        match (self.header, self.body) {
            (Simple, Simple) => "simple/simple",
            (Simple, Relaxed) => "simple/relaxed",
            (Relaxed, Simple) => "relaxed/simple",
            (Relaxed, Relaxed) => "relaxed/relaxed",
        }
    }
}

impl Display for Canonicalization {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.canonical_str())
    }
}

impl fmt::Debug for Canonicalization {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}/{:?}", &self.header, &self.body)
    }
}

impl From<(CanonicalizationAlgorithm, CanonicalizationAlgorithm)> for Canonicalization {
    fn from((header, body): (CanonicalizationAlgorithm, CanonicalizationAlgorithm)) -> Self {
        Self { header, body }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use CanonicalizationAlgorithm::*;

    #[test]
    fn canonicalization_from_tag_value_ok() {
        let cases = [
            ("", (Simple, Simple)),
            ("simple", (Simple, Simple)),
            ("simple/simple", (Simple, Simple)),
            ("simple/relaxed", (Simple, Relaxed)),
            ("relaxed", (Relaxed, Simple)),
            ("relaxed/simple", (Relaxed, Simple)),
            ("relaxed/relaxed", (Relaxed, Relaxed)),
            ("Relaxed/RELAXED", (Relaxed, Relaxed)),
            ("bogus/relaxed", (Simple, Relaxed)),
        ];

        for (value, expected) in cases {
            assert_eq!(
                Canonicalization::from_tag_value(value),
                Canonicalization::from(expected),
                "c={value}"
            );
        }
    }

    #[test]
    fn canonicalization_display_ok() {
        let c = Canonicalization::from((Relaxed, Simple));
        assert_eq!(c.to_string(), "relaxed/simple");
        assert_eq!(format!("{c:?}"), "Relaxed/Simple");
    }

    #[test]
    fn signature_algorithm_from_str_ok() {
        assert_eq!("rsa-sha256".parse::<SignatureAlgorithm>(), Ok(SignatureAlgorithm::RsaSha256));
        assert_eq!("RSA-SHA256".parse::<SignatureAlgorithm>(), Ok(SignatureAlgorithm::RsaSha256));
        assert!("rsa-sha1".parse::<SignatureAlgorithm>().is_err());
        assert!("ed25519-sha256".parse::<SignatureAlgorithm>().is_err());
    }
}
