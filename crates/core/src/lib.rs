//! Cinedex domain core.
//!
//! Pure logic with no database dependency: identifiers, the domain error
//! type, field validation, list filters, pagination metadata, and movie
//! record rules. The `cinedex-db` crate builds the persistence layer on top.

pub mod error;
pub mod filters;
pub mod movie;
pub mod pagination;
pub mod types;
pub mod validation;
