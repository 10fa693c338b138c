//! cite-server: CSL bibliography formatting over HTTP
//!
//! Clients post CSL-JSON items and a CSL style; the service returns the
//! rendered bibliography as HTML. Citation processing itself is delegated to
//! quarto-citeproc. This crate provides:
//! - Author-list sanitization of incoming items ([`normalize`])
//! - The engine contract and its quarto-citeproc binding ([`engine`])
//! - The adapter that feeds items and locales to the engine ([`adapter`])
//! - An axum server exposing `POST /format` and `GET /health` ([`server`])

pub mod adapter;
pub mod context;
pub mod engine;
pub mod error;
pub mod locale;
pub mod normalize;
pub mod server;
pub mod service;

pub use adapter::{FormatSys, format_bibliography};
pub use context::{ServiceConfig, ServiceContext, SharedContext};
pub use engine::{CitationEngine, EngineSys, QuartoEngine};
pub use error::{Error, Result};
pub use locale::LocaleSource;
