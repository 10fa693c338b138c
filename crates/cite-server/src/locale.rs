//! Locale data for the citation engine.
//!
//! Only English locale text is available. It comes from the bundled
//! `locales-en-US.xml` unless a file on disk is configured instead.

use std::path::Path;

use rust_embed::Embed;

use crate::engine::UnsupportedLocale;
use crate::error::{Error, Result};

/// Locale tag used when a request doesn't name one.
pub const DEFAULT_LOCALE: &str = "en-US";

/// Name of the bundled English locale file.
const BUNDLED_ENGLISH: &str = "locales-en-US.xml";

const BYTE_ORDER_MARK: char = '\u{feff}';

#[derive(Embed)]
#[folder = "locales/"]
#[include = "*.xml"]
struct BundledLocales;

/// Strip a leading byte-order mark, if present.
pub fn strip_bom(text: &str) -> &str {
    text.strip_prefix(BYTE_ORDER_MARK).unwrap_or(text)
}

/// Whether `tag` names an English-family locale (`en`, `en-US`, `en_GB`, ...).
pub fn is_english(tag: &str) -> bool {
    tag.split(['-', '_'])
        .next()
        .is_some_and(|primary| primary.eq_ignore_ascii_case("en"))
}

/// Resolves locale tags to locale XML.
#[derive(Debug, Clone)]
pub struct LocaleSource {
    english: String,
}

impl LocaleSource {
    /// Use `english` as the text for every English-family tag.
    pub fn new(english: impl Into<String>) -> Self {
        Self {
            english: english.into(),
        }
    }

    /// Load the English locale bundled with the binary.
    pub fn bundled() -> Result<Self> {
        let file = BundledLocales::get(BUNDLED_ENGLISH)
            .ok_or_else(|| Error::BundledLocale(BUNDLED_ENGLISH.to_string()))?;
        let text = std::str::from_utf8(&file.data)
            .map_err(|_| Error::BundledLocale(BUNDLED_ENGLISH.to_string()))?;
        Ok(Self::new(text))
    }

    /// Load the English locale from a file on disk.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| Error::LocaleFile {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::new(text))
    }

    /// Load from `path` when given, otherwise fall back to the bundled file.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Self::bundled(),
        }
    }

    /// Resolve `tag` to locale XML with any leading byte-order mark removed.
    pub fn resolve(&self, tag: &str) -> std::result::Result<&str, UnsupportedLocale> {
        if is_english(tag) {
            Ok(strip_bom(&self.english))
        } else {
            Err(UnsupportedLocale {
                tag: tag.to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_is_english() {
        for tag in ["en", "en-US", "en-GB", "EN-us", "en_AU"] {
            assert!(is_english(tag), "{tag} should be English");
        }
        for tag in ["fr-FR", "de", "eng", "", "-en"] {
            assert!(!is_english(tag), "{tag} should not be English");
        }
    }

    #[test]
    fn test_strip_bom() {
        assert_eq!(strip_bom("\u{feff}<locale/>"), "<locale/>");
        assert_eq!(strip_bom("<locale/>"), "<locale/>");
        // Only one leading mark is removed.
        assert_eq!(strip_bom("\u{feff}\u{feff}x"), "\u{feff}x");
    }

    #[test]
    fn test_resolve_english_strips_bom() {
        let source = LocaleSource::new("\u{feff}<locale xml:lang=\"en-US\"/>");
        assert_eq!(
            source.resolve("en-GB").unwrap(),
            "<locale xml:lang=\"en-US\"/>"
        );
        assert_eq!(
            source.resolve("en-US").unwrap(),
            "<locale xml:lang=\"en-US\"/>"
        );
    }

    #[test]
    fn test_resolve_other_locale_fails() {
        let source = LocaleSource::new("<locale/>");
        assert_eq!(
            source.resolve("fr-FR"),
            Err(UnsupportedLocale {
                tag: "fr-FR".to_string()
            })
        );
    }

    #[test]
    fn test_bundled_locale_is_english() {
        let source = LocaleSource::bundled().unwrap();
        let text = source.resolve(DEFAULT_LOCALE).unwrap();
        assert!(text.contains("<locale"));
        assert!(text.contains("xml:lang=\"en-US\""));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "\u{feff}<locale xml:lang=\"en-GB\"/>").unwrap();

        let source = LocaleSource::load(Some(file.path())).unwrap();
        assert_eq!(source.resolve("en").unwrap(), "<locale xml:lang=\"en-GB\"/>");
    }

    #[test]
    fn test_load_missing_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.xml");

        let err = LocaleSource::load(Some(&path)).unwrap_err();
        assert!(matches!(err, Error::LocaleFile { path: ref p, .. } if p == &path));
    }
}
