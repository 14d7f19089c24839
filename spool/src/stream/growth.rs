// SPDX-License-Identifier: Apache-2.0

use super::StreamOptions;

/// Picks the size hint for each segment claimed by a stream.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Growth {
	min: usize,
	max: usize,
	saturate_after: usize,
}

impl Growth {
	pub const fn new(min: usize, max: usize, saturate_after: usize) -> Self {
		Self { min, max, saturate_after }
	}

	/// Clamps `size` into the segment size range.
	pub fn clamp(&self, size: usize) -> usize {
		size.clamp(self.min, self.max)
	}

	/// Returns the size hint for a new segment, given the bytes still `remaining`
	/// to be written and the current `segment_count`.
	pub fn next_size(&self, remaining: usize, segment_count: usize) -> usize {
		if segment_count >= self.saturate_after {
			self.max
		} else {
			self.clamp(remaining)
		}
	}
}

impl From<&StreamOptions> for Growth {
	fn from(options: &StreamOptions) -> Self {
		Self::new(
			options.min_segment_size,
			options.max_segment_size,
			options.saturate_after
		)
	}
}

#[cfg(test)]
mod test {
	use quickcheck_macros::quickcheck;
	use crate::stream::{StreamOptions, MAX_SEGMENT_SIZE, MIN_SEGMENT_SIZE};
	use super::Growth;

	fn growth() -> Growth { (&StreamOptions::default()).into() }

	#[test]
	fn small_remainder_requests_minimum() {
		assert_eq!(growth().next_size(100_000 - 65_536, 1), MIN_SEGMENT_SIZE);
		assert_eq!(growth().next_size(0, 2), MIN_SEGMENT_SIZE);
	}

	#[test]
	fn large_remainder_requests_maximum() {
		assert_eq!(growth().next_size(10 * MAX_SEGMENT_SIZE, 1), MAX_SEGMENT_SIZE);
	}

	#[test]
	fn remainder_in_range_is_requested_as_is() {
		assert_eq!(growth().next_size(300_000, 2), 300_000);
	}

	#[quickcheck]
	fn saturates_after_three_segments(remaining: usize, extra: u8) -> bool {
		growth().next_size(remaining, 3 + extra as usize) == MAX_SEGMENT_SIZE
	}

	#[quickcheck]
	fn hint_stays_in_range(remaining: usize, count: u8) -> bool {
		let size = growth().next_size(remaining, count as usize);
		(MIN_SEGMENT_SIZE..=MAX_SEGMENT_SIZE).contains(&size)
	}
}
