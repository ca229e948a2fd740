//! Population of the normalized store from an opened archive.
//!
//! - [`Loader`] - Table creation and the per-conversation load loop
//! - [`UserIdentity`] - Account owner aliases and conversation naming
//! - [`IdGenerator`] - Row identifier source ([`UuidIds`] in production, [`SequentialIds`] in tests)

pub mod database;
pub mod identity;
pub mod ids;

pub use database::{LoadState, LoadSummary, Loader, LoaderOptions, UNKNOWN_ACTOR};
pub use identity::UserIdentity;
pub use ids::{IdGenerator, SequentialIds, UuidIds};
