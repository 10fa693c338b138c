//! The `/format` pipeline: validate, normalize, render.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::info;

use crate::adapter::{FormatSys, format_bibliography};
use crate::context::ServiceContext;
use crate::engine::{CitationEngine, EngineOptions};
use crate::error::{Error, Result};
use crate::locale::DEFAULT_LOCALE;
use crate::normalize::{TracingObserver, normalize_items};

const MISSING_FIELDS: &str = "Missing items or style";

/// Body of a `POST /format` request.
///
/// Every field is optional at the parsing stage so that missing fields are
/// reported as bad input instead of a deserialization failure.
#[derive(Debug, Default, Deserialize)]
pub struct FormatRequest {
    pub items: Option<Value>,
    pub style: Option<String>,
    pub locale: Option<String>,
}

/// A request whose required fields are present.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidRequest {
    pub items: Map<String, Value>,
    pub style: String,
    pub locale: String,
}

/// Successful `/format` response.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct FormatResponse {
    pub html: String,
}

impl FormatRequest {
    /// Check required fields. Fails with [`Error::BadInput`].
    ///
    /// Rejections are logged once, when the error is turned into a response.
    pub fn validate(self) -> Result<ValidRequest> {
        let (Some(items), Some(style)) = (self.items, self.style) else {
            return Err(Error::BadInput(MISSING_FIELDS.to_string()));
        };
        if style.is_empty() {
            return Err(Error::BadInput(MISSING_FIELDS.to_string()));
        }
        let Value::Object(items) = items else {
            return Err(Error::BadInput(
                "items must be an object mapping identifiers to CSL-JSON items".to_string(),
            ));
        };

        Ok(ValidRequest {
            items,
            style,
            locale: self.locale.unwrap_or_else(|| DEFAULT_LOCALE.to_string()),
        })
    }
}

/// Normalize the request's items and render them with engine `E`.
pub fn render<E>(request: ValidRequest, ctx: &ServiceContext) -> Result<String>
where
    E: CitationEngine<FormatSys>,
{
    let ValidRequest {
        mut items,
        style,
        locale,
    } = request;

    info!(locale = %locale, "Request locale");
    normalize_items(&mut items, &mut TracingObserver);

    let options = EngineOptions {
        locale: Some(locale),
        suppress_warnings: !ctx.config().engine_warnings,
    };
    format_bibliography::<E>(items, &style, &options, ctx.locales())
}
