// SPDX-License-Identifier: Apache-2.0

mod growth;
mod options;
mod read;
mod write;

pub use growth::Growth;
pub use options::*;

use std::fmt;
use std::fmt::{Debug, Formatter};
use tracing::debug;
use crate::error::{Error, OperationKind, Result, ResultContext};
use crate::error::OperationKind::{Close, Create, Seek, SetLength, SetPosition};
use crate::pool::{DefaultPoolContainer, MutPool, Pool, pool};
use crate::segment::{Cursor, Segments};
use crate::streams::{Seekable, SeekOffset, Stream};

/// A growable byte stream backed by segments claimed from a pool. Reads and writes
/// share one cursor, as on a file: writing then reading without seeking continues
/// from where the write stopped. Only rewinding to the start is supported.
///
/// Segments are returned to the pool when the stream is closed or dropped.
pub struct PoolStream<P: Pool = DefaultPoolContainer> {
	pool: P,
	segments: Segments,
	cursor: Cursor,
	growth: Growth,
	options: StreamOptions,
	closed: bool,
}

impl PoolStream {
	/// Creates a new stream on the thread-local default pool.
	pub fn new() -> Result<Self> {
		Self::with_pool(pool())
	}

	/// Creates a new stream on the default pool, with a first segment sized for
	/// `capacity` bytes.
	pub fn with_capacity(capacity: usize) -> Result<Self> {
		Self::with_options(
			pool(),
			StreamOptions::new().with_initial_capacity(capacity)
		)
	}
}

impl<P: Pool> PoolStream<P> {
	/// Creates a new stream on `pool` with default options.
	pub fn with_pool(pool: P) -> Result<Self> {
		Self::with_options(pool, StreamOptions::default())
	}

	/// Creates a new stream, claiming its first segment from `pool`.
	pub fn with_options(pool: P, options: StreamOptions) -> Result<Self> {
		options.validate()?;

		let growth = Growth::from(&options);
		let size = growth.clamp(options.initial_capacity);
		let first = pool.claim(size).context(Create)?;
		debug!(requested = size, capacity = first.len(), "created stream");

		Ok(Self {
			pool,
			segments: Segments::new(first),
			cursor: Cursor::default(),
			growth,
			options,
			closed: false,
		})
	}

	/// Returns the options used to create the stream.
	pub fn options(&self) -> StreamOptions { self.options }

	/// Returns the pool segments are claimed from.
	pub fn pool(&self) -> &P { &self.pool }

	/// Returns the number of bytes written. Returns `0` once closed.
	pub fn len(&self) -> usize { self.segments.len() }

	/// Returns `true` if no bytes have been written.
	pub fn is_empty(&self) -> bool { self.len() == 0 }

	/// Returns the cursor position, in bytes from the start. Returns `0` once
	/// closed.
	pub fn position(&self) -> usize {
		self.cursor.position(&self.segments)
	}

	/// Always fails; the position can only be moved by reading, writing, or
	/// rewinding.
	pub fn set_position(&mut self, _position: usize) -> Result {
		self.ensure_open(SetPosition)?;
		Err(Error::unsupported(SetPosition))
	}

	/// Always fails; streams can't be truncated or extended without writing.
	pub fn set_len(&mut self, _len: usize) -> Result {
		self.ensure_open(SetLength)?;
		Err(Error::unsupported(SetLength))
	}

	/// Returns the number of segments held.
	pub fn segment_count(&self) -> usize { self.segments.count() }

	/// Returns the capacity of each segment held, in order.
	pub fn segment_capacities(&self) -> impl Iterator<Item = usize> + '_ {
		self.segments.capacities()
	}

	/// Returns the total capacity of all segments.
	pub fn capacity(&self) -> usize { self.segments.capacities().sum() }

	/// Returns `true` while the stream is open.
	pub fn can_read(&self) -> bool { !self.closed }

	/// Returns `true` while the stream is open.
	pub fn can_write(&self) -> bool { !self.closed }

	/// Returns `true` while the stream is open. Note only rewinding is supported.
	pub fn can_seek(&self) -> bool { !self.closed }

	/// Always returns `false`; no operation blocks.
	pub fn can_timeout(&self) -> bool { false }

	/// Seeks to `offset`, returning the new position. Only [`SeekOffset::Reset`]
	/// and `FromStart(0)` are supported, moving the cursor to the start; all other
	/// offsets fail as unsupported.
	pub fn seek(&mut self, offset: SeekOffset) -> Result<usize> {
		self.ensure_open(Seek)?;
		if offset.is_reset() {
			self.cursor.reset();
			Ok(0)
		} else {
			Err(Error::unsupported(Seek))
		}
	}

	/// Moves the cursor to the start. Shorthand for `seek(SeekOffset::Reset)`.
	pub fn rewind(&mut self) -> Result {
		self.seek(SeekOffset::Reset)?;
		Ok(())
	}

	/// Does nothing; written data is immediately readable.
	pub fn flush(&mut self) -> Result {
		self.ensure_open(OperationKind::Flush)
	}

	/// Returns all segments to the pool, zeroing them if set in the options. The
	/// stream can't be used afterward. Closing is idempotent. If the pool can't be
	/// borrowed, the stream is left open with its segments intact, so closing can
	/// be retried.
	pub fn close(&mut self) -> Result {
		if self.closed { return Ok(()) }

		let mut pool = self.pool.try_borrow().context(Close)?;
		self.closed = true;

		let len = self.segments.len();
		let blocks = self.segments.take();
		self.cursor.reset();
		debug!(segments = blocks.len(), len, "closing stream");
		for block in blocks {
			pool.collect(block, self.options.clear_on_close);
		}
		Ok(())
	}

	fn ensure_open(&self, op: OperationKind) -> Result {
		if self.closed {
			Err(Error::closed(op))
		} else {
			Ok(())
		}
	}

	/// Claims a segment sized for `remaining` bytes and appends it.
	fn append_segment(&mut self, remaining: usize, op: OperationKind) -> Result {
		let count = self.segments.count();
		let size = self.growth.next_size(remaining, count);
		let block = self.pool.claim(size).context(op)?;
		debug!(index = count, requested = size, capacity = block.len(), "claimed segment");
		self.segments.push(block);
		Ok(())
	}
}

/// Checks that `count` bytes from `offset` fit in a buffer of length `len`.
fn check_range(op: OperationKind, offset: usize, count: usize, len: usize) -> Result {
	if offset > len || count > len - offset {
		Err(Error::out_of_range(op, offset, count, len))
	} else {
		Ok(())
	}
}

impl<P: Pool> Debug for PoolStream<P> {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_struct("PoolStream")
			.field("len", &self.len())
			.field("position", &self.position())
			.field("segments", &self.segments.count())
			.field("options", &self.options)
			.field("closed", &self.closed)
			.finish_non_exhaustive()
	}
}

impl<P: Pool> Drop for PoolStream<P> {
	fn drop(&mut self) {
		let _ = self.close();
	}
}

impl<P: Pool> Stream for PoolStream<P> {
	fn is_closed(&self) -> bool { self.closed }

	fn close(&mut self) -> Result { PoolStream::close(self) }
}

impl<P: Pool> Seekable for PoolStream<P> {
	fn seek(&mut self, offset: SeekOffset) -> Result<usize> {
		PoolStream::seek(self, offset)
	}

	/// Returns the [`len`](PoolStream::len).
	fn seek_len(&mut self) -> Result<usize> {
		self.ensure_open(Seek)?;
		Ok(self.len())
	}

	/// Returns the [`position`](PoolStream::position).
	fn seek_pos(&mut self) -> Result<usize> {
		self.ensure_open(Seek)?;
		Ok(self.position())
	}
}
