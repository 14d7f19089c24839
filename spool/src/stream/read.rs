// SPDX-License-Identifier: Apache-2.0

use std::cmp::min;
use all_asserts::debug_assert_le;
use crate::error::OperationKind::{Read, ToVec};
use crate::error::{Result, ResultSetContext};
use crate::pool::Pool;
use crate::streams::SeekOffset;
use super::{check_range, PoolStream};

impl<P: Pool> PoolStream<P> {
	/// Reads bytes from the cursor into `buf`, returning the number of bytes read.
	/// Fewer bytes than requested are read at the end of the stream; `0` means
	/// the cursor is at the end.
	pub fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
		self.ensure_open(Read)?;

		let mut total = 0;
		while total < buf.len() {
			let index = self.cursor.index;
			let offset = self.cursor.offset;
			let end = self.segments.end(index);
			debug_assert_le!(offset, end);

			let count = min(end - offset, buf.len() - total);
			buf[total..total + count].copy_from_slice(
				&self.segments.block(index)[offset..offset + count]
			);
			total += count;
			self.cursor.offset += count;

			if total == buf.len() ||
			   (self.segments.is_last(index) && self.cursor.offset >= end) {
				break
			}

			self.cursor.next_segment();
		}
		Ok(total)
	}

	/// Reads up to `count` bytes into `buf` starting at `offset`, returning the
	/// number of bytes read. Fails as out-of-range if `count` bytes don't fit within
	/// `buf`.
	pub fn read_at(&mut self, buf: &mut [u8], offset: usize, count: usize) -> Result<usize> {
		check_range(Read, offset, count, buf.len())?;
		self.read(&mut buf[offset..offset + count])
	}

	/// Reads a single byte at the cursor, returning `None` at the end of the
	/// stream.
	pub fn read_u8(&mut self) -> Result<Option<u8>> {
		self.ensure_open(Read)?;

		loop {
			let index = self.cursor.index;
			let offset = self.cursor.offset;
			if offset < self.segments.end(index) {
				self.cursor.offset += 1;
				return Ok(Some(self.segments.block(index)[offset]))
			}

			if self.segments.is_last(index) {
				return Ok(None)
			}

			self.cursor.next_segment();
		}
	}

	/// Copies the whole stream into a new vector. This rewinds the stream, then
	/// reads to the end, leaving the cursor at the end.
	pub fn to_vec(&mut self) -> Result<Vec<u8>> {
		self.seek(SeekOffset::Reset).set_context(ToVec)?;
		let mut vec = vec![0; self.len()];
		let count = self.read(&mut vec).set_context(ToVec)?;
		debug_assert_eq!(count, vec.len());
		Ok(vec)
	}
}
