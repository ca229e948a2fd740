//! Export archive access: validation, message file discovery and parsing.
//!
//! # Error Handling Strategy
//!
//! - **Validation failures** ([`ArchiveError`](crate::error::ArchiveError)) are fatal and
//!   raised before anything is loaded: missing file, non-ZIP file, failed fingerprint
//!   check, or the deprecated HTML format.
//!
//! - **Parse failures** ([`ParseError`](crate::error::ParseError)) concern one
//!   conversation file. The loader decides whether they abort the load.
//!
//! - **Scoped handles**: every read opens the ZIP, reads what it needs and drops the
//!   handle before returning. Only the entry list is cached.

pub mod constants;
pub mod deserializers;
pub mod locator;
pub mod reader;

pub use locator::{
    ArchiveFormat, DEFAULT_CONFIDENCE_THRESHOLD, Fingerprint, Inspection, check_threshold,
    inspect, open, validate, validate_with_threshold,
};
pub use reader::{Archive, JsonArchive, LegacyHtmlArchive, MessageSource};
