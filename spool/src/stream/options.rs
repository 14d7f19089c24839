// SPDX-License-Identifier: Apache-2.0

use crate::error::{Error, OperationKind, Result};

/// The default size hint for the first segment, `64KiB`.
pub const DEFAULT_INITIAL_CAPACITY: usize = 64 * 1024;
/// The default minimum segment size, `64KiB`.
pub const MIN_SEGMENT_SIZE: usize = 64 * 1024;
/// The default maximum segment size, `1MiB`.
pub const MAX_SEGMENT_SIZE: usize = 1024 * 1024;
/// The default segment count after which new segments are always the maximum size.
pub const SATURATE_AFTER: usize = 3;

/// Options for tuning [`PoolStream`](super::PoolStream)'s segment allocation.
///
/// # Initial capacity
///
/// The size hint for the segment claimed when the stream is created, clamped
/// between the minimum and maximum segment sizes. Defaults to `64KiB`.
///
/// # Segment size
///
/// When a write overflows the last segment, a new segment is claimed, sized to the
/// bytes left to write but never smaller than the minimum (`64KiB`) nor larger than
/// the maximum (`1MiB`). The pool may hand out larger segments than requested.
///
/// # Saturation
///
/// Once the stream holds `saturate_after` segments (`3` by default), every new
/// segment requests the maximum size. Short streams stay cheap while long ones
/// grow in large, evenly sized steps.
///
/// # Clear on close
///
/// Whether segments are zeroed when returned to the pool on close, so written
/// bytes aren't exposed to the next claimant. Defaults to `true`.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub struct StreamOptions {
	pub initial_capacity: usize,
	pub min_segment_size: usize,
	pub max_segment_size: usize,
	pub saturate_after: usize,
	pub clear_on_close: bool,
}

impl Default for StreamOptions {
	fn default() -> Self { Self::new() }
}

impl StreamOptions {
	/// Creates a new set of stream options.
	pub const fn new() -> Self {
		Self {
			initial_capacity: DEFAULT_INITIAL_CAPACITY,
			min_segment_size: MIN_SEGMENT_SIZE,
			max_segment_size: MAX_SEGMENT_SIZE,
			saturate_after: SATURATE_AFTER,
			clear_on_close: true,
		}
	}

	/// Checks that the segment sizes are non-zero and ordered, and that the
	/// saturation count is non-zero.
	pub fn validate(&self) -> Result {
		const OP: OperationKind = OperationKind::Create;
		if self.min_segment_size == 0 {
			return Err(Error::invalid_argument(OP, "minimum segment size must not be zero"))
		}
		if self.min_segment_size > self.max_segment_size {
			return Err(Error::invalid_argument(OP, "minimum segment size exceeds the maximum"))
		}
		if self.saturate_after == 0 {
			return Err(Error::invalid_argument(OP, "saturation segment count must not be zero"))
		}
		Ok(())
	}

	#[inline]
	pub const fn initial_capacity(&self) -> usize { self.initial_capacity }

	#[inline]
	pub const fn min_segment_size(&self) -> usize { self.min_segment_size }

	#[inline]
	pub const fn max_segment_size(&self) -> usize { self.max_segment_size }

	#[inline]
	pub const fn saturate_after(&self) -> usize { self.saturate_after }

	#[inline]
	pub const fn clear_on_close(&self) -> bool { self.clear_on_close }

	#[inline]
	pub fn set_initial_capacity(&mut self, value: usize) {
		self.initial_capacity = value;
	}

	#[inline]
	pub fn set_segment_size(&mut self, min: usize, max: usize) {
		self.min_segment_size = min;
		self.max_segment_size = max;
	}

	#[inline]
	pub fn set_saturate_after(&mut self, value: usize) {
		self.saturate_after = value;
	}

	#[inline]
	pub fn set_clear_on_close(&mut self, value: bool) {
		self.clear_on_close = value;
	}

	#[inline]
	pub const fn with_initial_capacity(mut self, value: usize) -> Self {
		self.initial_capacity = value;
		self
	}

	/// Sets the minimum and maximum segment sizes.
	#[inline]
	pub const fn with_segment_size(mut self, min: usize, max: usize) -> Self {
		self.min_segment_size = min;
		self.max_segment_size = max;
		self
	}

	#[inline]
	pub const fn with_saturate_after(mut self, value: usize) -> Self {
		self.saturate_after = value;
		self
	}

	#[inline]
	pub const fn with_clear_on_close(mut self, value: bool) -> Self {
		self.clear_on_close = value;
		self
	}
}
