//! Entity model for events, todos, goals, notes and their relationships.
//!
//! # Responsibility
//! - Define plain records and their field contracts.
//! - Define the `(kind, id)` reference type used for polymorphic links.
//!
//! # Invariants
//! - Records hold no relationship fields; every relationship is a `Link` or
//!   a `DependentNote` parent reference.
//!
//! # See also
//! - `graph` for traversal and cascade rules.

pub mod entity;
pub mod kind;
pub mod tags;
pub mod timestamp;
