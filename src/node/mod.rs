//! Global node identification
//!
//! Every entity in the catalog, whatever its type, is addressable by one
//! opaque identifier binding the entity's type tag to its type-local key.
//! The registry maps type tags to the data sources that own them and routes
//! identifier resolution back to the right source.
//!
//! The tag-to-source table is startup configuration: populated while the
//! application wires itself up, read-only afterwards.

mod id;
mod registry;

pub use id::GlobalId;
pub use registry::{NodeRegistry, NodeSource};

use thiserror::Error;

/// Identifier and registry failures.
///
/// "Entity not found" is not in this list: a well-formed identifier whose
/// entity is absent resolves to `Ok(None)`.
#[derive(Debug, Error)]
pub enum NodeError {
    /// The type tag is already registered; tags are immutable once bound.
    #[error("node type `{0}` is already registered")]
    DuplicateType(String),
    /// The type tag is empty or contains the identifier separator.
    #[error("invalid node type tag `{0}`")]
    InvalidTypeTag(String),
    /// No data source is registered for the identifier's type tag.
    #[error("node type `{0}` is not registered")]
    UnknownType(String),
    /// The identifier does not decode to a (type tag, local key) pair.
    #[error("malformed global id `{id}`: {reason}")]
    MalformedId { id: String, reason: &'static str },
    /// A data source failure, propagated unchanged.
    #[error(transparent)]
    Source(#[from] anyhow::Error),
}
