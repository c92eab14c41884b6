//! Fragdoc Fragment Catalog
//!
//! Loads predefined text fragments, grouped by display category, and
//! flattens them into one ordered list.
//!
//! # Core Concepts
//!
//! - [`Fragment`]: immutable `{id, content, group}` record
//! - [`FragmentId`]: composite id, `"<group>-<localId>"`
//! - [`FragmentCatalog`]: read-only, ordered catalog with id lookup
//! - [`UsageLookup`]: membership test used for "used"/"unused" affordances
//!
//! # Example
//!
//! ```rust
//! use fragdoc_catalog::FragmentCatalog;
//!
//! let catalog = FragmentCatalog::from_json(r#"{"A": [{"id": 1, "content": "x"}]}"#)?;
//! let fragment = catalog.get("A-1").unwrap();
//! assert_eq!(fragment.content, "x");
//! assert_eq!(fragment.group, "A");
//! # Ok::<(), fragdoc_catalog::CatalogError>(())
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod catalog;
mod error;
mod fragment;

pub use catalog::{group_by, FragmentCatalog, RawFragment, RawGroups, RawId, UsageLookup};
pub use error::CatalogError;
pub use fragment::{Fragment, FragmentId};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
