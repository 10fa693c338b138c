//! The contract between the service and a citation engine.
//!
//! An engine is handed an [`EngineSys`] at construction and calls back into
//! it whenever it needs an item or locale data. The service never decides
//! when or how often those lookups happen; it only registers the active item
//! identifiers and asks for a bibliography.
//!
//! ```text
//!   request ──► normalize ──► FormatSys ──► CitationEngine::new
//!                                 ▲               │
//!                                 │  retrieve_*   ▼
//!                                 └──────── register_items ──► render_bibliography
//! ```

pub mod html;
pub mod quarto;

use serde_json::Value;

pub use quarto::QuartoEngine;

/// Locale lookup failure: only English-family locales are available.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unsupported locale: {tag}")]
pub struct UnsupportedLocale {
    pub tag: String,
}

/// Failures raised by an engine during construction, registration or
/// rendering.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The style document could not be parsed.
    #[error("{0}")]
    InvalidStyle(String),

    /// The engine asked for a locale that cannot be resolved.
    #[error(transparent)]
    Locale(#[from] UnsupportedLocale),

    #[error("{0}")]
    Processing(String),
}

/// Data sources the engine calls back into.
pub trait EngineSys {
    /// Look up an item by identifier. `None` marks an unresolved citation,
    /// never an error.
    fn retrieve_item(&self, id: &str) -> Option<&Value>;

    /// Return the locale XML for `tag`.
    fn retrieve_locale(&self, tag: &str) -> Result<String, UnsupportedLocale>;
}

/// Construction options passed alongside the style.
#[derive(Debug, Clone)]
pub struct EngineOptions {
    /// Locale tag to render with. When `None` the style's default locale
    /// is used.
    pub locale: Option<String>,

    /// Don't log engine warnings such as unresolved items.
    pub suppress_warnings: bool,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            locale: None,
            suppress_warnings: true,
        }
    }
}

/// Bibliography metadata returned next to the rendered fragments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BibliographyMeta {
    /// Identifiers of the rendered entries, in output order.
    pub entry_ids: Vec<String>,
    /// Opening wrapper for the entry list.
    pub bib_start: String,
    /// Closing wrapper for the entry list.
    pub bib_end: String,
}

/// A citation engine bound to a data source `S`.
///
/// Callers must invoke [`register_items`](CitationEngine::register_items)
/// before [`render_bibliography`](CitationEngine::render_bibliography).
pub trait CitationEngine<S: EngineSys>: Sized {
    /// Build an engine for `style`.
    fn new(sys: S, style: &str, options: &EngineOptions) -> Result<Self, EngineError>;

    /// Declare which item identifiers are active for this rendering pass.
    fn register_items(&mut self, ids: &[String]) -> Result<(), EngineError>;

    /// Render the bibliography of the registered items.
    ///
    /// Returns the metadata and the HTML fragments, one per entry, to be
    /// concatenated in order.
    fn render_bibliography(&mut self) -> Result<(BibliographyMeta, Vec<String>), EngineError>;
}
