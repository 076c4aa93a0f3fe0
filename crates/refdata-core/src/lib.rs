//! Refdata Core - Embedded store and versioning logic for reference data.
//!
//! This crate stores versioned catalogs (lookup tables) and their
//! code/value items, and answers which version of a catalog applies on a
//! given date, how a new version inherits items, and whether a submitted
//! batch of items matches a version's contents.

#[cfg(feature = "mimalloc")]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

pub mod error;
pub mod filter;
pub mod model;
pub mod policy;
pub mod resolve;
pub mod service;
pub mod storage;
pub mod validate;

pub use error::Error;
pub use filter::relevant_on;
pub use model::{Catalog, CatalogItem, NewCatalog, NewItem};
pub use policy::CreationPolicy;
pub use resolve::{today, VersionResolver};
pub use service::CatalogService;
pub use storage::{CatalogStore, StorageConfig};
pub use validate::{ValidationEngine, ValidationReport};
