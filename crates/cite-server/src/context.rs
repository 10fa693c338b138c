//! Service context - configuration and read-only state shared by handlers

use std::path::PathBuf;
use std::sync::Arc;

use tracing::info;

use crate::error::Result;
use crate::locale::LocaleSource;

/// Default request body limit (1 MiB).
pub const DEFAULT_BODY_LIMIT: usize = 1024 * 1024;

/// Configuration for the service.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Port to listen on
    pub port: u16,

    /// Host to bind to
    pub host: String,

    /// English locale XML to serve instead of the bundled one.
    pub locale_file: Option<PathBuf>,

    /// Maximum accepted request body size in bytes.
    pub body_limit: usize,

    /// Log engine warnings (unresolved items and the like).
    pub engine_warnings: bool,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            host: "127.0.0.1".to_string(),
            locale_file: None,
            body_limit: DEFAULT_BODY_LIMIT,
            engine_warnings: false,
        }
    }
}

/// State shared across all requests.
///
/// Nothing in here is mutated after startup; each request builds its own
/// normalizer and engine.
#[derive(Debug)]
pub struct ServiceContext {
    config: ServiceConfig,
    locales: Arc<LocaleSource>,
}

impl ServiceContext {
    /// Create the context, loading the English locale.
    pub fn new(config: ServiceConfig) -> Result<Self> {
        let locales = LocaleSource::load(config.locale_file.as_deref())?;
        match &config.locale_file {
            Some(path) => info!(path = %path.display(), "Loaded English locale from file"),
            None => info!("Using bundled English locale"),
        }
        Ok(Self::with_locales(config, locales))
    }

    /// Create a context around an already loaded locale source.
    pub fn with_locales(config: ServiceConfig, locales: LocaleSource) -> Self {
        Self {
            config,
            locales: Arc::new(locales),
        }
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    pub fn locales(&self) -> Arc<LocaleSource> {
        Arc::clone(&self.locales)
    }
}

/// Type alias for the shared context used in axum handlers.
pub type SharedContext = Arc<ServiceContext>;
