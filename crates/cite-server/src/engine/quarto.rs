//! [`CitationEngine`] backed by quarto-citeproc.

use quarto_citeproc::locale_parser::parse_locale_xml;
use quarto_citeproc::{Processor, Reference};
use quarto_csl::parse_csl;
use serde_json::Value;
use tracing::{debug, warn};

use super::html::{BIB_END, BIB_START, render_entry};
use super::{BibliographyMeta, CitationEngine, EngineError, EngineOptions, EngineSys};

/// Locale used when neither the caller nor the style names one.
const FALLBACK_LOCALE: &str = "en-US";

/// Citation engine wrapping a quarto-citeproc [`Processor`].
pub struct QuartoEngine<S> {
    sys: S,
    processor: Processor,
    suppress_warnings: bool,
}

impl<S> QuartoEngine<S> {
    /// The locale the engine renders with.
    pub fn locale(&self) -> &str {
        self.processor.locales.default_locale()
    }
}

impl<S: EngineSys> CitationEngine<S> for QuartoEngine<S> {
    fn new(sys: S, style: &str, options: &EngineOptions) -> Result<Self, EngineError> {
        let mut style =
            parse_csl(style).map_err(|err| EngineError::InvalidStyle(err.to_string()))?;

        let lang = options
            .locale
            .clone()
            .or_else(|| style.default_locale.clone())
            .unwrap_or_else(|| FALLBACK_LOCALE.to_string());
        style.default_locale = Some(lang.clone());

        let locale_xml = sys.retrieve_locale(&lang)?;
        let locale = parse_locale_xml(&locale_xml).map_err(|message| {
            EngineError::Processing(format!("Failed to parse locale '{lang}': {message}"))
        })?;

        let mut processor = Processor::new(style);
        processor.locales.set_locale(lang.clone(), locale);
        debug!(locale = %lang, "Citation engine constructed");

        Ok(Self {
            sys,
            processor,
            suppress_warnings: options.suppress_warnings,
        })
    }

    fn register_items(&mut self, ids: &[String]) -> Result<(), EngineError> {
        for id in ids {
            match self.sys.retrieve_item(id) {
                Some(item) => {
                    let reference = to_reference(id, item)?;
                    self.processor.add_reference(reference);
                }
                None => {
                    if !self.suppress_warnings {
                        warn!(item = %id, "Item not found, citation left unresolved");
                    }
                }
            }
        }
        Ok(())
    }

    fn render_bibliography(&mut self) -> Result<(BibliographyMeta, Vec<String>), EngineError> {
        let entries = self
            .processor
            .generate_bibliography_to_outputs()
            .map_err(|err| EngineError::Processing(err.to_string()))?;

        let mut meta = BibliographyMeta {
            entry_ids: Vec::with_capacity(entries.len()),
            bib_start: BIB_START.to_string(),
            bib_end: BIB_END.to_string(),
        };
        let punctuation_in_quote = self.processor.punctuation_in_quote();
        let mut fragments = Vec::with_capacity(entries.len());
        for (id, output) in entries {
            fragments.push(render_entry(output, punctuation_in_quote));
            meta.entry_ids.push(id);
        }

        Ok((meta, fragments))
    }
}

/// Convert a normalized CSL-JSON item into an engine reference.
///
/// Items keyed only by their map identifier get that identifier as `id`.
fn to_reference(id: &str, item: &Value) -> Result<Reference, EngineError> {
    let mut item = item.clone();
    if let Value::Object(fields) = &mut item {
        fields
            .entry("id")
            .or_insert_with(|| Value::String(id.to_string()));
    }
    serde_json::from_value(item)
        .map_err(|err| EngineError::Processing(format!("Invalid item '{id}': {err}")))
}
