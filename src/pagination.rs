//! Cursor-based pagination over ordered sequences
//!
//! Implements the Relay Connection pattern: the full ordered sequence plus
//! forward/backward arguments becomes a page of edges with opaque cursors,
//! page metadata, and a total count.
//!
//! A cursor encodes a zero-based offset within one specific sequence
//! instance. Cursors carry no meaning across sequences; re-using one against
//! a different (or since-changed) sequence is only guaranteed to either land
//! on an offset or fail with [`PaginationError::InvalidCursor`].

use std::future::Future;

use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use serde::Serialize;
use thiserror::Error;

/// Pagination failures. All are caller mistakes; none are retried here.
#[derive(Debug, Error)]
pub enum PaginationError {
    /// The supplied cursor is malformed or does not address the sequence.
    #[error("invalid cursor `{cursor}`: {reason}")]
    InvalidCursor {
        cursor: String,
        reason: &'static str,
    },
    /// A count argument is negative.
    #[error("`{arg}` must be non-negative, got {value}")]
    InvalidArgument { arg: &'static str, value: i32 },
}

/// Forward/backward pagination arguments.
///
/// `first` truncates the window from the start, `last` from the end. Both may
/// be supplied; `first` is applied before `last`.
#[derive(Debug, Clone, Default)]
pub struct ConnectionArgs {
    /// Maximum number of items, counted from the start of the window.
    pub first: Option<i32>,
    /// Cursor the window starts after (exclusive).
    pub after: Option<String>,
    /// Maximum number of items, counted from the end of the window.
    pub last: Option<i32>,
    /// Cursor the window ends before (exclusive).
    pub before: Option<String>,
}

impl ConnectionArgs {
    /// Forward page: at most `first` items after the optional cursor.
    pub fn forward(first: i32, after: Option<String>) -> Self {
        Self {
            first: Some(first),
            after,
            ..Self::default()
        }
    }

    /// Backward page: at most `last` items before the optional cursor.
    pub fn backward(last: i32, before: Option<String>) -> Self {
        Self {
            last: Some(last),
            before,
            ..Self::default()
        }
    }
}

/// Information about pagination in a connection
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PageInfo {
    /// When paginating forwards, are there more items?
    pub has_next_page: bool,
    /// When paginating backwards, are there more items?
    pub has_previous_page: bool,
    /// Cursor of the first item in this page
    pub start_cursor: Option<String>,
    /// Cursor of the last item in this page
    pub end_cursor: Option<String>,
}

/// An edge in a connection, containing a node and its cursor
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Edge<T> {
    /// The item at the end of the edge
    pub node: T,
    /// A cursor addressing the item within the full sequence
    pub cursor: String,
}

/// A paginated view of an ordered sequence
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Connection<T> {
    /// The edges in this page
    pub edges: Vec<Edge<T>>,
    /// Pagination information
    pub page_info: PageInfo,
    /// Length of the full sequence, not of this page
    pub total_count: i64,
}

impl<T> Connection<T> {
    /// The zero-item connection.
    pub fn empty() -> Self {
        Self {
            edges: Vec::new(),
            page_info: PageInfo::default(),
            total_count: 0,
        }
    }
}

/// Paginate an already-materialized sequence.
///
/// Window computation: `after`/`before` bound the window (both exclusive),
/// then `first` truncates it from the start and `last` from the end. Edge
/// cursors always address offsets in the full sequence, so any edge cursor
/// can seed a follow-up `after`/`before`.
///
/// A cursor that decodes out of range is an error, never clamped.
pub fn paginate<T>(items: Vec<T>, args: &ConnectionArgs) -> Result<Connection<T>, PaginationError> {
    if let Some(first) = args.first {
        if first < 0 {
            return Err(PaginationError::InvalidArgument {
                arg: "first",
                value: first,
            });
        }
    }
    if let Some(last) = args.last {
        if last < 0 {
            return Err(PaginationError::InvalidArgument {
                arg: "last",
                value: last,
            });
        }
    }

    let total = items.len() as i64;
    let mut start: i64 = 0;
    let mut end: i64 = total;

    if let Some(cursor) = args.after.as_deref() {
        start = bounded_offset(cursor, total)? + 1;
    }
    if let Some(cursor) = args.before.as_deref() {
        end = bounded_offset(cursor, total)?;
    }
    // after/before may cross; that is an empty window, not an error
    if end < start {
        end = start;
    }
    if let Some(first) = args.first {
        end = end.min(start + i64::from(first));
    }
    if let Some(last) = args.last {
        start = start.max(end - i64::from(last));
    }

    let edges: Vec<Edge<T>> = items
        .into_iter()
        .enumerate()
        .skip(start as usize)
        .take((end - start) as usize)
        .map(|(offset, node)| Edge {
            node,
            cursor: encode_cursor(offset as i64),
        })
        .collect();

    let page_info = PageInfo {
        has_next_page: end < total,
        has_previous_page: start > 0,
        start_cursor: edges.first().map(|e| e.cursor.clone()),
        end_cursor: edges.last().map(|e| e.cursor.clone()),
    };

    Ok(Connection {
        edges,
        page_info,
        total_count: total,
    })
}

/// Paginate a sequence that is still being loaded.
///
/// Awaits the producer, then delegates to [`paginate`]. A producer failure
/// propagates unchanged; the caller owns retry and timeout policy.
pub async fn paginate_future<T, F, E>(
    items: F,
    args: &ConnectionArgs,
) -> anyhow::Result<Connection<T>>
where
    F: Future<Output = Result<Vec<T>, E>>,
    E: Into<anyhow::Error>,
{
    let items = items.await.map_err(Into::into)?;
    Ok(paginate(items, args)?)
}

/// Encode an offset as a cursor string
pub fn encode_cursor(offset: i64) -> String {
    BASE64.encode(format!("cursor:{}", offset))
}

/// Decode a cursor string to an offset
pub fn decode_cursor(cursor: &str) -> Result<i64, PaginationError> {
    let invalid = |reason| PaginationError::InvalidCursor {
        cursor: cursor.to_string(),
        reason,
    };

    let decoded = BASE64.decode(cursor).map_err(|_| invalid("not base64"))?;
    let s = String::from_utf8(decoded).map_err(|_| invalid("not utf-8"))?;
    let Some(offset) = s.strip_prefix("cursor:") else {
        return Err(invalid("missing cursor prefix"));
    };
    let offset: i64 = offset.parse().map_err(|_| invalid("not an offset"))?;
    if offset < 0 {
        return Err(invalid("negative offset"));
    }
    Ok(offset)
}

/// Decode a cursor and check that it addresses an offset inside the sequence.
fn bounded_offset(cursor: &str, len: i64) -> Result<i64, PaginationError> {
    let offset = decode_cursor(cursor)?;
    if offset >= len {
        return Err(PaginationError::InvalidCursor {
            cursor: cursor.to_string(),
            reason: "offset past end of sequence",
        });
    }
    Ok(offset)
}
