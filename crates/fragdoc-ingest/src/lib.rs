//! Fragdoc Ingestion
//!
//! The boundary between uploaded files and document content.
//!
//! # Flow
//!
//! ```text
//! (filename, bytes, mime)
//!     │
//!     ├─ structured extension (e.g. .docx) ──► DocumentConverter ──► markup
//!     │
//!     └─ otherwise: mime allow-list ──► UTF-8 ──► strip BOM + controls ──► text
//! ```
//!
//! Binary conversion is delegated to [`DocumentConverter`] implementations
//! registered in a [`ConverterRegistry`]; this crate ships none, so hosts
//! plug in the converter of their choice.

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod converter;
mod error;
mod normalizer;
mod sanitize;

pub use converter::{extension_of, ConverterRegistry, DocumentConverter};
pub use error::IngestError;
pub use normalizer::{IngestionNormalizer, NormalizedDocument, SourceKind};
pub use sanitize::{sanitize_text, strip_bom};

/// MIME types accepted for plain-text-family uploads
pub const DEFAULT_ALLOWED_MIME_TYPES: &[&str] = &["text/plain", "text/markdown", "text/html"];

/// Extensions treated as structured documents needing conversion
pub const DEFAULT_STRUCTURED_EXTENSIONS: &[&str] = &["docx"];

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
