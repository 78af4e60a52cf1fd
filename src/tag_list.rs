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

//! The tag-list of a DKIM signature.

use crate::{
    crypto::HashAlgorithm,
    signature::{Canonicalization, CanonicalizationAlgorithm, SignatureAlgorithm},
    util::CanonicalStr,
};
use std::{
    collections::BTreeMap,
    error::Error,
    fmt::{self, Display, Formatter},
    str::FromStr,
    time::SystemTime,
};

/// The name of a tag in a DKIM signature tag-list.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum TagName {
    /// *v=*
    Version,
    /// *a=*
    Algorithm,
    /// *c=*
    Canonicalization,
    /// *d=*
    Domain,
    /// *q=*
    QueryMethod,
    /// *s=*
    Selector,
    /// *t=*
    Timestamp,
    /// *bh=*
    BodyHash,
    /// *h=*
    SignedHeaders,
    /// *z=*
    CopiedHeaders,
    /// *i=*
    Identity,
    /// *l=*
    BodyLength,
    /// *b=*
    SignatureData,
    /// *x=*, recorded but not part of the serialized form.
    Expiration,
}

impl CanonicalStr for TagName {
    fn canonical_str(&self) -> &'static str {
        match self {
            Self::Version => "v",
            Self::Algorithm => "a",
            Self::Canonicalization => "c",
            Self::Domain => "d",
            Self::QueryMethod => "q",
            Self::Selector => "s",
            Self::Timestamp => "t",
            Self::BodyHash => "bh",
            Self::SignedHeaders => "h",
            Self::CopiedHeaders => "z",
            Self::Identity => "i",
            Self::BodyLength => "l",
            Self::SignatureData => "b",
            Self::Expiration => "x",
        }
    }
}

impl Display for TagName {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.canonical_str())
    }
}

impl FromStr for TagName {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ALL_TAGS
            .into_iter()
            .find(|t| t.canonical_str() == s)
            .ok_or("unknown tag name")
    }
}

const ALL_TAGS: [TagName; 14] = [
    TagName::Version,
    TagName::Algorithm,
    TagName::Canonicalization,
    TagName::Domain,
    TagName::QueryMethod,
    TagName::Selector,
    TagName::Timestamp,
    TagName::BodyHash,
    TagName::SignedHeaders,
    TagName::CopiedHeaders,
    TagName::Identity,
    TagName::BodyLength,
    TagName::SignatureData,
    TagName::Expiration,
];

/// The tags written out when serializing, in output order.
pub const OUTPUT_ORDER: [TagName; 13] = [
    TagName::Version,
    TagName::Algorithm,
    TagName::Canonicalization,
    TagName::Domain,
    TagName::QueryMethod,
    TagName::Selector,
    TagName::Timestamp,
    TagName::BodyHash,
    TagName::SignedHeaders,
    TagName::CopiedHeaders,
    TagName::Identity,
    TagName::BodyLength,
    TagName::SignatureData,
];

const REQUIRED_TAGS: [TagName; 7] = [
    TagName::Version,
    TagName::Algorithm,
    TagName::Domain,
    TagName::Selector,
    TagName::Canonicalization,
    TagName::QueryMethod,
    TagName::Timestamp,
];

pub const DEFAULT_CANONICALIZATION: Canonicalization = Canonicalization {
    header: CanonicalizationAlgorithm::Relaxed,
    body: CanonicalizationAlgorithm::Simple,
};

pub const DEFAULT_QUERY_METHOD: &str = "dns/txt";

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SignatureTagsError {
    InvalidDomain,
    InvalidSelector,
}

impl Display for SignatureTagsError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidDomain => write!(f, "invalid domain"),
            Self::InvalidSelector => write!(f, "invalid selector"),
        }
    }
}

impl Error for SignatureTagsError {}

/// The parameters of a DKIM signature, keyed by tag name.
///
/// Values are stored as given, without any escaping. The [`Display`]
/// implementation produces the tag-list as it appears in the signature
/// header: `name=value` pairs in a fixed order, separated by `"; "`.
///
/// A signer never modifies the tags it was given. Instead it derives new
/// snapshots with [`SignatureTags::with`].
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SignatureTags(BTreeMap<TagName, String>);

impl SignatureTags {
    /// Creates the default tags for a signature with the current time as
    /// timestamp.
    pub fn new(domain: &str, selector: &str) -> Result<Self, SignatureTagsError> {
        Self::new_at(domain, selector, now_unix_secs())
    }

    /// Creates the default tags for a signature with the given timestamp.
    ///
    /// Besides domain, selector, and timestamp the defaults are version 1,
    /// algorithm *rsa-sha256*, canonicalization *relaxed/simple*, query
    /// method *dns/txt*, and empty body hash, signed headers, and signature
    /// data.
    pub fn new_at(
        domain: &str,
        selector: &str,
        timestamp: u64,
    ) -> Result<Self, SignatureTagsError> {
        if domain.is_empty() {
            return Err(SignatureTagsError::InvalidDomain);
        }
        if selector.is_empty() {
            return Err(SignatureTagsError::InvalidSelector);
        }

        let tags = Self::default()
            .with(TagName::Version, "1")
            .with(TagName::Algorithm, SignatureAlgorithm::default().canonical_str())
            .with(TagName::Domain, domain)
            .with(TagName::Selector, selector)
            .with(TagName::Canonicalization, DEFAULT_CANONICALIZATION.canonical_str())
            .with(TagName::QueryMethod, DEFAULT_QUERY_METHOD)
            .with(TagName::Timestamp, timestamp.to_string())
            .with(TagName::SignedHeaders, "")
            .with(TagName::BodyHash, "")
            .with(TagName::SignatureData, "");

        Ok(tags)
    }

    /// Whether all tags required for signing are present. The values may be
    /// empty.
    pub fn is_valid(&self) -> bool {
        REQUIRED_TAGS.iter().all(|name| self.0.contains_key(name))
    }

    pub fn get(&self, name: TagName) -> Option<&str> {
        self.0.get(&name).map(|v| v.as_str())
    }

    pub fn insert(&mut self, name: TagName, value: impl Into<String>) -> Option<String> {
        self.0.insert(name, value.into())
    }

    pub fn remove(&mut self, name: TagName) -> Option<String> {
        self.0.remove(&name)
    }

    /// Returns a copy of these tags with the given tag set to `value`.
    #[must_use]
    pub fn with(mut self, name: TagName, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    /// The value of the *a=* tag, or the default algorithm if it is absent or
    /// empty.
    pub fn algorithm(&self) -> &str {
        match self.get(TagName::Algorithm) {
            Some(a) if !a.is_empty() => a,
            _ => SignatureAlgorithm::default().canonical_str(),
        }
    }

    pub fn signature_algorithm(&self) -> Result<SignatureAlgorithm, &'static str> {
        self.algorithm().parse()
    }

    /// The hash algorithm of the configured signature algorithm.
    ///
    /// # Panics
    ///
    /// Panics if the configured signature algorithm is not supported.
    pub fn hash_algorithm(&self) -> HashAlgorithm {
        match self.signature_algorithm() {
            Ok(alg) => alg.hash_algorithm(),
            Err(_) => panic!("unsupported signature algorithm {:?}", self.algorithm()),
        }
    }

    pub fn canonicalization(&self) -> Canonicalization {
        Canonicalization::from_tag_value(self.get(TagName::Canonicalization).unwrap_or_default())
    }

    pub fn header_canonicalization(&self) -> CanonicalizationAlgorithm {
        self.canonicalization().header
    }

    pub fn body_canonicalization(&self) -> CanonicalizationAlgorithm {
        self.canonicalization().body
    }

    pub fn iter(&self) -> impl Iterator<Item = (TagName, &str)> {
        self.0.iter().map(|(&name, value)| (name, value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Display for SignatureTags {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for name in OUTPUT_ORDER {
            if let Some(value) = self.get(name) {
                if !first {
                    f.write_str("; ")?;
                }
                write!(f, "{name}={value}")?;
                first = false;
            }
        }
        Ok(())
    }
}

fn now_unix_secs() -> u64 {
    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map_or(0, |t| t.as_secs())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_ok() {
        assert_eq!(SignatureTags::new("", "selector"), Err(SignatureTagsError::InvalidDomain));
        assert_eq!(SignatureTags::new("domain", ""), Err(SignatureTagsError::InvalidSelector));

        let tags = SignatureTags::new("domain", "selector").unwrap();

        assert!(tags.is_valid());
        assert_eq!(tags.len(), 10);
        assert!(tags.get(TagName::Timestamp).unwrap().parse::<u64>().is_ok());
    }

    #[test]
    fn new_at_defaults() {
        let tags = SignatureTags::new_at("example.com", "sel", 1299753716).unwrap();

        let expected = [
            (TagName::Version, "1"),
            (TagName::Algorithm, "rsa-sha256"),
            (TagName::Canonicalization, "relaxed/simple"),
            (TagName::Domain, "example.com"),
            (TagName::QueryMethod, "dns/txt"),
            (TagName::Selector, "sel"),
            (TagName::Timestamp, "1299753716"),
            (TagName::BodyHash, ""),
            (TagName::SignedHeaders, ""),
            (TagName::SignatureData, ""),
        ];

        assert!(tags.iter().eq(expected));
    }

    #[test]
    fn is_valid_ok() {
        assert!(!SignatureTags::default().is_valid());

        let minimal = REQUIRED_TAGS
            .into_iter()
            .fold(SignatureTags::default(), |tags, name| tags.with(name, ""));
        assert!(minimal.is_valid());

        for name in REQUIRED_TAGS {
            let mut tags = minimal.clone();
            tags.remove(name);
            assert!(!tags.is_valid(), "valid without {name}");
        }
    }

    #[test]
    fn algorithm_ok() {
        assert_eq!(SignatureTags::default().algorithm(), "rsa-sha256");

        let tags = SignatureTags::default().with(TagName::Algorithm, "");
        assert_eq!(tags.algorithm(), "rsa-sha256");

        let tags = SignatureTags::default().with(TagName::Algorithm, "ed25519-sha256");
        assert_eq!(tags.algorithm(), "ed25519-sha256");
        assert!(tags.signature_algorithm().is_err());
    }

    #[test]
    fn hash_algorithm_ok() {
        assert_eq!(SignatureTags::default().hash_algorithm(), HashAlgorithm::Sha256);
    }

    #[test]
    #[should_panic(expected = "unsupported signature algorithm")]
    fn hash_algorithm_unsupported() {
        let tags = SignatureTags::default().with(TagName::Algorithm, "rsa-sha1");
        tags.hash_algorithm();
    }

    #[test]
    fn canonicalization_ok() {
        use CanonicalizationAlgorithm::*;

        let tags = SignatureTags::default();
        assert_eq!(tags.header_canonicalization(), Simple);
        assert_eq!(tags.body_canonicalization(), Simple);

        let tags = tags.with(TagName::Canonicalization, "relaxed");
        assert_eq!(tags.header_canonicalization(), Relaxed);
        assert_eq!(tags.body_canonicalization(), Simple);

        let tags = tags.with(TagName::Canonicalization, "simple/relaxed");
        assert_eq!(tags.header_canonicalization(), Simple);
        assert_eq!(tags.body_canonicalization(), Relaxed);

        let tags = tags.with(TagName::Canonicalization, "relaxed/relaxed");
        assert_eq!(tags.header_canonicalization(), Relaxed);
        assert_eq!(tags.body_canonicalization(), Relaxed);
    }

    #[test]
    fn display_ok() {
        assert_eq!(SignatureTags::default().to_string(), "");

        let tags = SignatureTags::new_at("domain", "selector", 42).unwrap();
        assert_eq!(
            tags.to_string(),
            "v=1; a=rsa-sha256; c=relaxed/simple; d=domain; q=dns/txt; s=selector; t=42; bh=; h=; b="
        );
    }

    #[test]
    fn display_fixed_order() {
        let tags = SignatureTags::default()
            .with(TagName::SignatureData, "sig")
            .with(TagName::Expiration, "100")
            .with(TagName::BodyLength, "12")
            .with(TagName::Identity, "@example.com")
            .with(TagName::CopiedHeaders, "From:me")
            .with(TagName::Version, "1");

        assert_eq!(
            tags.to_string(),
            "v=1; z=From:me; i=@example.com; l=12; b=sig"
        );
    }

    #[test]
    fn with_leaves_original_untouched() {
        let tags = SignatureTags::new_at("domain", "selector", 42).unwrap();
        let signed = tags.clone().with(TagName::SignatureData, "abc");

        assert_eq!(tags.get(TagName::SignatureData), Some(""));
        assert_eq!(signed.get(TagName::SignatureData), Some("abc"));
    }

    #[test]
    fn tag_name_from_str_ok() {
        assert_eq!("bh".parse::<TagName>(), Ok(TagName::BodyHash));
        assert_eq!("x".parse::<TagName>(), Ok(TagName::Expiration));
        assert!("zz".parse::<TagName>().is_err());
        assert!("B".parse::<TagName>().is_err());
    }
}
