// SPDX-License-Identifier: Apache-2.0

use std::cmp::max;
use std::mem;
use all_asserts::debug_assert_le;
use crate::pool::Block;

/// An append-only list of pool blocks. Every block but the last is fully used;
/// the number of bytes written to the last block is tracked separately.
#[derive(Debug, Default)]
pub(crate) struct Segments {
	blocks: Vec<Block>,
	used: usize,
}

impl Segments {
	pub fn new(first: Block) -> Self {
		Self {
			blocks: vec![first],
			used: 0,
		}
	}

	/// Returns the number of segments.
	pub fn count(&self) -> usize { self.blocks.len() }

	/// Returns `true` if the segments were taken.
	pub fn is_empty(&self) -> bool { self.blocks.is_empty() }

	/// Returns `true` if `index` is the last segment.
	pub fn is_last(&self, index: usize) -> bool {
		index + 1 == self.blocks.len()
	}

	/// Returns the capacity of the segment at `index`.
	pub fn capacity(&self, index: usize) -> usize { self.blocks[index].len() }

	/// Returns the capacity of each segment, in order.
	pub fn capacities(&self) -> impl Iterator<Item = usize> + '_ {
		self.blocks.iter().map(|block| block.len())
	}

	/// Returns the number of bytes written to the last segment.
	pub fn used(&self) -> usize { self.used }

	/// Returns the end of readable data in the segment at `index`.
	pub fn end(&self, index: usize) -> usize {
		if self.is_last(index) {
			self.used()
		} else {
			self.capacity(index)
		}
	}

	/// Extends the used length of the last segment to at least `offset`.
	pub fn mark_used(&mut self, offset: usize) {
		debug_assert_le!(offset, self.blocks.last().map_or(0, |block| block.len()));
		self.used = max(self.used, offset);
	}

	/// Returns the number of bytes before the segment at `index`.
	pub fn start_of(&self, index: usize) -> usize {
		self.blocks[..index].iter().map(|block| block.len()).sum()
	}

	/// Returns the total number of bytes written.
	pub fn len(&self) -> usize {
		match self.blocks.len() {
			0 => 0,
			n => self.start_of(n - 1) + self.used
		}
	}

	pub fn block(&self, index: usize) -> &[u8] { &self.blocks[index] }

	pub fn block_mut(&mut self, index: usize) -> &mut [u8] { &mut self.blocks[index] }

	/// Appends a segment, which becomes the unused last segment.
	pub fn push(&mut self, block: Block) {
		self.blocks.push(block);
		self.used = 0;
	}

	/// Takes all segments, leaving the list empty.
	pub fn take(&mut self) -> Vec<Block> {
		self.used = 0;
		mem::take(&mut self.blocks)
	}
}

/// The shared read/write position: a segment index and an offset within it.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct Cursor {
	pub index: usize,
	pub offset: usize,
}

impl Cursor {
	/// Moves to the start of the next segment.
	pub fn next_segment(&mut self) {
		self.index += 1;
		self.offset = 0;
	}

	/// Moves to the start of the first segment.
	pub fn reset(&mut self) {
		*self = Self::default();
	}

	/// Returns the position in bytes from the start of `segments`.
	pub fn position(&self, segments: &Segments) -> usize {
		if segments.is_empty() {
			0
		} else {
			segments.start_of(self.index) + self.offset
		}
	}
}
