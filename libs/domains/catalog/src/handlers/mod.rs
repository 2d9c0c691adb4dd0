//! HTTP handlers for the catalog endpoints.
//!
//! Each module carries its own router and OpenAPI doc; the app nests
//! them under `/products` and `/categories`.

pub mod categories;
pub mod products;
