//! Domains module containing business logic organized by bounded contexts.
//!
//! The server has a single domain today: the random value generation tools.

pub mod tools;
