//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` and an [`OpContext`](crate::OpContext) as their
//! first arguments.

pub mod movie_repo;

pub use movie_repo::MovieRepo;
