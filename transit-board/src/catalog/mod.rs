//! Reference catalog of rail stations.
//!
//! Maps platform codes to the physical station they belong to. Transfer
//! stations own one code per platform level (e.g. Metro Center is both
//! `A01` and `C01`); these companion codes must be queried together.
//!
//! The catalog is loaded once at startup and is immutable afterwards, so it
//! is shared across pollers behind an `Arc` without locking.

mod error;
mod reference;

pub use error::CatalogError;
pub use reference::{Catalog, StationRef};
