// SPDX-License-Identifier: Apache-2.0

use std::cmp::min;
use crate::error::OperationKind::Write;
use crate::error::Result;
use crate::pool::Pool;
use super::{check_range, PoolStream};

impl<P: Pool> PoolStream<P> {
	/// Writes `data` at the cursor, overwriting existing bytes and claiming new
	/// segments past the end as needed. If a segment claim fails, bytes written
	/// before it remain written.
	pub fn write(&mut self, data: &[u8]) -> Result {
		self.write_partial(data).1
	}

	/// Writes `data` at the cursor, returning the number of bytes written alongside
	/// the result. The count is nonzero on failure if some bytes were written before
	/// a segment claim failed.
	pub(crate) fn write_partial(&mut self, data: &[u8]) -> (usize, Result) {
		let mut written = 0;
		let result = self.write_segments(data, &mut written);
		(written, result)
	}

	fn write_segments(&mut self, mut data: &[u8], written: &mut usize) -> Result {
		self.ensure_open(Write)?;

		while !data.is_empty() {
			let index = self.cursor.index;
			let offset = self.cursor.offset;
			let block = self.segments.block_mut(index);
			let count = min(block.len() - offset, data.len());
			block[offset..offset + count].copy_from_slice(&data[..count]);
			data = &data[count..];
			*written += count;
			self.cursor.offset += count;

			let is_last = self.segments.is_last(index);
			if is_last {
				self.segments.mark_used(self.cursor.offset);
			}

			if !data.is_empty() {
				if is_last {
					self.append_segment(data.len(), Write)?;
				}
				self.cursor.next_segment();
			}
		}
		Ok(())
	}

	/// Writes `count` bytes from `buf` starting at `offset`. Fails as out-of-range
	/// if the bytes don't fit within `buf`.
	pub fn write_at(&mut self, buf: &[u8], offset: usize, count: usize) -> Result {
		check_range(Write, offset, count, buf.len())?;
		self.write(&buf[offset..offset + count])
	}

	/// Writes a single byte at the cursor.
	pub fn write_u8(&mut self, value: u8) -> Result {
		self.ensure_open(Write)?;

		if self.cursor.offset == self.segments.capacity(self.cursor.index) {
			if self.segments.is_last(self.cursor.index) {
				self.append_segment(1, Write)?;
			}
			self.cursor.next_segment();
		}

		let index = self.cursor.index;
		self.segments.block_mut(index)[self.cursor.offset] = value;
		self.cursor.offset += 1;
		if self.segments.is_last(index) {
			self.segments.mark_used(self.cursor.offset);
		}
		Ok(())
	}
}
