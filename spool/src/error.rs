// SPDX-License-Identifier: Apache-2.0

use std::{fmt, io, result};
use std::error::Error as StdError;
use std::fmt::Formatter;
use amplify_derive::Display;
use crate::pool::PoolError;

pub type ErrorBox = Box<dyn StdError + Send + Sync>;
pub type Result<T = ()> = result::Result<T, Error>;

/// The stream operation that failed.
#[derive(Copy, Clone, Debug, Default, Display, Eq, PartialEq)]
pub enum OperationKind {
	#[default]
	#[display("unknown operation")]
	Unknown,
	#[display("create stream")]
	Create,
	#[display("read from stream")]
	Read,
	#[display("write to stream")]
	Write,
	#[display("seek")]
	Seek,
	#[display("set stream length")]
	SetLength,
	#[display("set stream position")]
	SetPosition,
	#[display("copy stream to vec")]
	ToVec,
	#[display("flush stream")]
	Flush,
	#[display("close stream")]
	Close,
	#[display("{0}")]
	Other(&'static str),
}

/// Why a stream operation failed.
#[derive(Copy, Clone, Debug, Display, Eq, PartialEq)]
pub enum ErrorKind {
	#[display("invalid argument: {0}")]
	InvalidArgument(&'static str),
	#[display("offset or count out of range")]
	OutOfRange,
	#[display("unsupported operation")]
	Unsupported,
	#[display("segment pool error")]
	Pool,
	#[display("stream closed")]
	Closed,
	#[display("{0}")]
	Other(&'static str),
}

/// The offset and count passed alongside a caller buffer didn't fit inside it.
#[derive(Copy, Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[error("range of {count} bytes from offset {offset} exceeds buffer length {len}")]
pub struct RangeError {
	pub offset: usize,
	pub count: usize,
	pub len: usize,
}

#[derive(Debug)]
pub struct Error {
	op: OperationKind,
	kind: ErrorKind,
	source: Option<ErrorBox>,
}

impl fmt::Display for Error {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		let Self { op, kind, source } = self;
		if let Some(source) = source {
			write!(f, "{op} failed; {kind} ({source})")
		} else {
			write!(f, "{op} failed; {kind}")
		}
	}
}

impl StdError for Error {
	fn source(&self) -> Option<&(dyn StdError + 'static)> {
		if let Some(ref source) = self.source {
			Some(source.as_ref())
		} else {
			None
		}
	}
}

impl Error {
	pub(crate) fn new(
		op: OperationKind,
		kind: ErrorKind,
		source: Option<ErrorBox>
	) -> Self {
		Self { op, kind, source }
	}

	/// Creates a new error with a custom message.
	pub fn other(op: OperationKind, message: &'static str, source: Option<ErrorBox>) -> Self {
		Self::new(op, ErrorKind::Other(message), source)
	}

	/// Creates a new "invalid argument" error.
	pub fn invalid_argument(op: OperationKind, message: &'static str) -> Self {
		Self::new(op, ErrorKind::InvalidArgument(message), None)
	}

	/// Creates a new "out of range" error for `count` bytes at `offset` into a
	/// buffer of length `len`.
	pub fn out_of_range(op: OperationKind, offset: usize, count: usize, len: usize) -> Self {
		Self::new(
			op,
			ErrorKind::OutOfRange,
			Some(RangeError { offset, count, len }.into())
		)
	}

	/// Creates a new "unsupported" error.
	pub fn unsupported(op: OperationKind) -> Self {
		Self::new(op, ErrorKind::Unsupported, None)
	}

	/// Creates a new "closed" error.
	pub fn closed(op: OperationKind) -> Self {
		Self::new(op, ErrorKind::Closed, None)
	}

	/// Creates a new segment pool error.
	pub fn pool(op: OperationKind, error: PoolError) -> Self {
		Self::new(op, ErrorKind::Pool, Some(error.into()))
	}

	/// Returns the operation kind.
	pub fn operation(&self) -> OperationKind { self.op }

	/// Sets the operation kind.
	pub fn with_operation(mut self, op: OperationKind) -> Self {
		self.op = op;
		self
	}

	/// Returns the error kind.
	pub fn kind(&self) -> ErrorKind { self.kind }

	/// Returns the source downcast into a [`PoolError`], if possible.
	pub fn pool_source(&self) -> Option<&PoolError> {
		self.source()?.downcast_ref()
	}

	/// Returns the source downcast into a [`RangeError`], if possible.
	pub fn range_source(&self) -> Option<&RangeError> {
		self.source()?.downcast_ref()
	}
}

impl From<Error> for io::Error {
	fn from(value: Error) -> Self {
		let kind = match value.kind {
			ErrorKind::Unsupported => io::ErrorKind::Unsupported,
			ErrorKind::InvalidArgument(_) |
			ErrorKind::OutOfRange => io::ErrorKind::InvalidInput,
			_ => io::ErrorKind::Other,
		};
		io::Error::new(kind, value)
	}
}

/// Attaches an operation to results from the segment pool.
pub(crate) trait ResultContext<T> {
	fn context(self, op: OperationKind) -> Result<T>;
}

impl<T> ResultContext<T> for result::Result<T, PoolError> {
	fn context(self, op: OperationKind) -> Result<T> {
		self.map_err(|err| Error::pool(op, err))
	}
}

/// Replaces the operation of an existing stream error.
pub(crate) trait ResultSetContext<T> {
	fn set_context(self, op: OperationKind) -> Result<T>;
}

impl<T> ResultSetContext<T> for Result<T> {
	fn set_context(self, op: OperationKind) -> Result<T> {
		self.map_err(|err| err.with_operation(op))
	}
}
