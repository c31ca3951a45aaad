//! Core business logic - framework-agnostic product, material, and
//! composition operations.
//!
//! Functions here take a database connection and return plain entity models;
//! the HTTP layer on top only maps them to requests and responses.

/// Product composition operations and capacity aggregates
pub mod composition;
/// Material catalog operations and seeding
pub mod material;
/// Product catalog operations
pub mod product;
/// Pure weight/percentage composition arithmetic
pub mod validation;
