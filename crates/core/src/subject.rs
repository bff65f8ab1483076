//! Subject code → origin registry.
//!
//! Every sdamgia subject lives on its own subdomain. The registry is built once
//! per client and never mutated afterwards.

use std::collections::BTreeMap;
use url::Url;

use crate::Error;

/// Domain shared by every subject origin.
pub const BASE_DOMAIN: &str = "sdamgia.ru";

/// Subject codes served by the public site.
pub const SUBJECT_CODES: [&str; 15] = [
    "math", "mathb", "phys", "inf", "rus", "bio", "en", "chem", "geo", "soc", "de", "fr", "lit", "sp", "hist",
];

/// Immutable mapping from short subject code to base origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectRegistry {
    origins: BTreeMap<String, Url>,
}

impl SubjectRegistry {
    /// Build a registry from explicit `(code, origin)` pairs.
    pub fn from_pairs<I, S>(pairs: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = (S, S)>,
        S: AsRef<str>,
    {
        let mut origins = BTreeMap::new();
        for (code, origin) in pairs {
            let url = Url::parse(origin.as_ref())
                .map_err(|e| Error::InvalidArgument(format!("origin for {}: {e}", code.as_ref())))?;
            origins.insert(code.as_ref().to_string(), url);
        }
        Ok(Self { origins })
    }

    /// Origin URL for a subject code.
    ///
    /// An unknown code is a programming error on the caller's side and is
    /// reported as [`Error::UnknownSubject`].
    pub fn resolve(&self, subject: &str) -> Result<&Url, Error> {
        self.origins
            .get(subject)
            .ok_or_else(|| Error::UnknownSubject(subject.to_string()))
    }

    /// Known subject codes in sorted order.
    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.origins.keys().map(String::as_str)
    }
}

impl Default for SubjectRegistry {
    fn default() -> Self {
        let origins = SUBJECT_CODES
            .iter()
            .filter_map(|code| {
                Url::parse(&format!("https://{code}-ege.{BASE_DOMAIN}"))
                    .ok()
                    .map(|url| (code.to_string(), url))
            })
            .collect();
        Self { origins }
    }
}

/// Origin without the trailing slash `Url` adds to bare hosts.
pub fn origin_str(url: &Url) -> &str {
    url.as_str().trim_end_matches('/')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_registry_has_all_subjects() {
        let registry = SubjectRegistry::default();
        assert_eq!(registry.codes().count(), SUBJECT_CODES.len());
        for code in SUBJECT_CODES {
            let origin = registry.resolve(code).unwrap();
            assert_eq!(origin.host_str(), Some(format!("{code}-ege.sdamgia.ru").as_str()));
            assert_eq!(origin.scheme(), "https");
        }
    }

    #[test]
    fn test_resolve_math() {
        let registry = SubjectRegistry::default();
        let origin = registry.resolve("math").unwrap();
        assert_eq!(origin_str(origin), "https://math-ege.sdamgia.ru");
    }

    #[test]
    fn test_resolve_unknown_subject() {
        let registry = SubjectRegistry::default();
        let result = registry.resolve("invalid-subject");
        assert!(matches!(result, Err(Error::UnknownSubject(code)) if code == "invalid-subject"));
    }

    #[test]
    fn test_from_pairs() {
        let registry = SubjectRegistry::from_pairs([("math", "http://127.0.0.1:8080")]).unwrap();
        assert_eq!(origin_str(registry.resolve("math").unwrap()), "http://127.0.0.1:8080");
        assert!(registry.resolve("phys").is_err());
    }

    #[test]
    fn test_from_pairs_invalid_origin() {
        let result = SubjectRegistry::from_pairs([("math", "not a url")]);
        assert!(matches!(result, Err(Error::InvalidArgument(_))));
    }
}
