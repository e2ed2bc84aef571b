//! Entity-relationship engine over the in-memory store.
//!
//! # Responsibility
//! - Create, delete and traverse typed directed links between entities.
//! - Own dependent-note lifecycle (validated creation, cascade deletion).
//! - Delete entities together with every record that references them.
//!
//! # Invariants
//! - Links are never symmetrized: "related" queries follow outgoing edges only.
//! - Traversal silently skips links whose endpoint no longer resolves.
//! - Deleting an event/todo/goal removes its links and dependent notes;
//!   deleting a standalone note removes its links only.
//!
//! These are pure in-memory operations. Persisting is the caller's job.

use crate::model::kind::{EntityId, EntityKind, EntityRef};
use crate::store::IdsExhausted;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

mod dependents;
mod links;

/// Error from graph mutations that validate references.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// Dependent-note parent did not resolve.
    ParentNotFound(EntityRef),
    IdsExhausted(IdsExhausted),
}

impl Display for GraphError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ParentNotFound(parent) => {
                write!(f, "{} with id {} not found", parent.kind, parent.id)
            }
            Self::IdsExhausted(err) => write!(f, "{err}"),
        }
    }
}

impl Error for GraphError {}

impl From<IdsExhausted> for GraphError {
    fn from(value: IdsExhausted) -> Self {
        Self::IdsExhausted(value)
    }
}

/// One neighbour of an entity in the link graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkedItem {
    /// Edge label as `"<from kind> -> <to kind>"`.
    pub relationship: String,
    /// Kind of the entity on the other end.
    #[serde(rename = "type")]
    pub kind: EntityKind,
    pub id: EntityId,
    pub title: String,
}

/// Both directions of an entity's links, resolved to titles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkedItems {
    pub item: EntityRef,
    /// Targets of links where `item` is the source.
    pub links_from: Vec<LinkedItem>,
    /// Sources of links where `item` is the target.
    pub links_to: Vec<LinkedItem>,
}
