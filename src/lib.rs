//! Object graph core for the Curator media catalog
//!
//! Two pure-logic components sit behind the catalog's query surface:
//!
//! - [`node`]: global identification. Every entity, regardless of type, is
//!   addressable by one opaque identifier, and the registry routes lookups
//!   back to the data source that owns the type.
//! - [`pagination`]: cursor-based connections. An ordered collection plus
//!   forward/backward arguments becomes a page of edges with opaque cursors,
//!   page metadata, and a total count.
//!
//! Transport, schema wiring, and storage live in the surrounding
//! application; this crate only assumes data sources honoring the
//! [`node::NodeSource`] contract.

pub mod node;
pub mod pagination;

pub use node::{GlobalId, NodeError, NodeRegistry, NodeSource};
pub use pagination::{
    Connection, ConnectionArgs, Edge, PageInfo, PaginationError, decode_cursor, encode_cursor,
    paginate, paginate_future,
};
