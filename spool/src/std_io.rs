// SPDX-License-Identifier: Apache-2.0

//! [`std::io`] trait implementations, so a [`PoolStream`] can stand in wherever a
//! reader, writer, or seekable stream is expected.

use std::io;
use std::io::{Read, Seek, SeekFrom, Write};
use crate::pool::Pool;
use crate::PoolStream;

impl<P: Pool> Read for PoolStream<P> {
	fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
		Ok(PoolStream::read(self, buf)?)
	}
}

impl<P: Pool> Write for PoolStream<P> {
	/// Writes `buf`, returning a short count rather than an error if a segment
	/// claim fails after some bytes were written.
	fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
		match self.write_partial(buf) {
			(0, Err(error)) => Err(error.into()),
			(written, _) => Ok(written),
		}
	}

	fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
		Ok(PoolStream::write(self, buf)?)
	}

	fn flush(&mut self) -> io::Result<()> {
		Ok(PoolStream::flush(self)?)
	}
}

impl<P: Pool> Seek for PoolStream<P> {
	/// Seeks to the start with `SeekFrom::Start(0)`. `SeekFrom::Current(0)` returns
	/// the position without moving. All other positions fail with
	/// [`io::ErrorKind::Unsupported`].
	fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
		if let SeekFrom::Current(0) = pos {
			return self.stream_position()
		}
		Ok(PoolStream::seek(self, pos.into())? as u64)
	}

	fn rewind(&mut self) -> io::Result<()> {
		Ok(PoolStream::rewind(self)?)
	}

	fn stream_position(&mut self) -> io::Result<u64> {
		use crate::streams::Seekable;
		Ok(self.seek_pos()? as u64)
	}
}
