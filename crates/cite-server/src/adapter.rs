//! Drives a citation engine over one request's normalized items.

use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::info;

use crate::engine::{CitationEngine, EngineOptions, EngineSys, UnsupportedLocale};
use crate::error::Result;
use crate::locale::{LocaleSource, strip_bom};

/// Engine callbacks bound to a request's normalized items.
#[derive(Debug)]
pub struct FormatSys {
    items: Map<String, Value>,
    locales: Arc<LocaleSource>,
}

impl FormatSys {
    pub fn new(items: Map<String, Value>, locales: Arc<LocaleSource>) -> Self {
        Self { items, locales }
    }

    /// Every item identifier, in request order.
    pub fn item_ids(&self) -> Vec<String> {
        self.items.keys().cloned().collect()
    }
}

impl EngineSys for FormatSys {
    /// A `null` item is treated the same as a missing one.
    fn retrieve_item(&self, id: &str) -> Option<&Value> {
        self.items.get(id).filter(|item| !item.is_null())
    }

    fn retrieve_locale(&self, tag: &str) -> std::result::Result<String, UnsupportedLocale> {
        self.locales.resolve(tag).map(str::to_string)
    }
}

/// Render the bibliography for `items` with engine `E`.
///
/// Constructs the engine, registers every item identifier, renders, and
/// joins the returned fragments without a separator.
pub fn format_bibliography<E>(
    items: Map<String, Value>,
    style: &str,
    options: &EngineOptions,
    locales: Arc<LocaleSource>,
) -> Result<String>
where
    E: CitationEngine<FormatSys>,
{
    let style = strip_bom(style);
    let sys = FormatSys::new(items, locales);
    let ids = sys.item_ids();

    info!("Instantiating citation engine");
    let mut engine = E::new(sys, style, options)?;

    engine.register_items(&ids)?;
    info!(count = ids.len(), "Items registered with citation engine");

    let (_meta, fragments) = engine.render_bibliography()?;
    info!(entries = fragments.len(), "Bibliography formatted");

    Ok(fragments.concat())
}
