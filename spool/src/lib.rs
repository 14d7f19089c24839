// SPDX-License-Identifier: Apache-2.0

//! ## How it works
//!
//! A [`PoolStream`] is an in-memory byte stream, like a `Cursor<Vec<u8>>`, that
//! never reallocates one large contiguous buffer. Data is written to a list of
//! fixed-size blocks called *segments*, claimed from a *pool* as the stream grows
//! and returned to it when the stream is closed or dropped. Repeatedly building
//! and reading back large payloads then reuses the same memory instead of
//! allocating afresh.
//!
//! ### Segments
//!
//! The stream starts with one segment, sized by the initial capacity. When a write
//! overflows the last segment, a new one is claimed, sized to the bytes left to
//! write but kept between a minimum (`64KiB`) and maximum (`1MiB`). Once three
//! segments are held, new segments always take the maximum size. Every segment but
//! the last is full, so the length is the sum of all but the last segment's
//! capacity plus the bytes written to the last.
//!
//! ### Cursor
//!
//! Reading and writing share one cursor, a segment index and an offset within the
//! segment. Writing after a rewind overwrites existing data; reading stops at the
//! end of written data with a short read. Only rewinding to the start is supported,
//! arbitrary seeking, setting the position, and setting the length all fail as
//! unsupported.
//!
//! ### Pools
//!
//! Segments come from a [`Pool`](pool::Pool). The default pool is thread-local,
//! retaining returned segments in power-of-two buckets. Segments are zeroed when
//! returned, so written data isn't exposed to the next stream claiming them.

pub mod error;
pub mod pool;
mod segment;
mod std_io;
mod stream;
pub mod streams;

pub use error::{Error, ErrorKind, OperationKind, RangeError, Result};
pub use stream::*;
