//! # Blogicum Core
//!
//! The domain layer of the Blogicum backend.
//! This crate contains pure business logic with zero infrastructure dependencies:
//! entity types, the publication visibility rules, pagination, and the ports
//! (traits) that infrastructure must implement.

pub mod domain;
pub mod error;
pub mod pagination;
pub mod ports;
pub mod visibility;

pub use error::DomainError;
