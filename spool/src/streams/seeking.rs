// SPDX-License-Identifier: Apache-2.0

use std::io::SeekFrom;
use crate::error::Result;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum SeekOffset {
	/// Reset the stream to the start. Equivalent to `FromStart(0)`.
	Reset,
	/// Move forward by an offset.
	Forward(usize),
	/// Move back by an offset.
	Back(usize),
	/// Seek a position from the start of the stream.
	FromStart(usize),
	/// Seek a position from the end of the stream.
	FromEnd(isize),
}

impl SeekOffset {
	/// Returns `true` if the offset moves to the start of the stream.
	pub fn is_reset(self) -> bool {
		matches!(self, Self::Reset | Self::FromStart(0))
	}
}

impl From<SeekFrom> for SeekOffset {
	/// Converts from [`std::io`]'s [`SeekFrom`], saturating offsets too large for
	/// the platform.
	fn from(value: SeekFrom) -> Self {
		fn conv(off: u64) -> usize {
			off.try_into().unwrap_or(usize::MAX)
		}

		fn conv_signed(off: i64) -> isize {
			off.try_into().unwrap_or(if off < 0 { isize::MIN } else { isize::MAX })
		}

		match value {
			SeekFrom::Start  (pos)       => SeekOffset::FromStart(conv(pos)),
			SeekFrom::End    (pos)       => SeekOffset::FromEnd(conv_signed(pos)),
			SeekFrom::Current(off @ 0..) => SeekOffset::Forward(conv(off as u64)),
			SeekFrom::Current(off      ) => SeekOffset::Back(conv(off.unsigned_abs()))
		}
	}
}

/// A stream that supports seeking. Based on the [`std::io::Seek`] trait.
pub trait Seekable {
	/// Seeks to an `offset`, returning the new position.
	fn seek(&mut self, offset: SeekOffset) -> Result<usize>;

	/// Returns the stream length.
	fn seek_len(&mut self) -> Result<usize>;

	/// Returns the current position.
	fn seek_pos(&mut self) -> Result<usize>;
}

/// A convenience extension for [`Seekable`].
pub trait SeekableExt: Seekable {
	/// Resets to the start of the stream. Shorthand for `seek(SeekOffset::Reset)`.
	fn reset(&mut self) -> Result {
		self.seek(SeekOffset::Reset)?;
		Ok(())
	}
}

impl<S: Seekable> SeekableExt for S { }
