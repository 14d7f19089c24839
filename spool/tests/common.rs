// SPDX-License-Identifier: Apache-2.0

#![allow(dead_code)]

use std::fmt::{Arguments, Debug};
use spool::pool::{Block, MutPool, PoolContainer, PoolError};
use spool::StreamOptions;

macro_rules! qc_assert_eq {
	($left:expr,$right:expr) => {{
		let left = $left;
		let right = $right;
		if left == right {
			TestResult::passed()
		} else {
			TestResult::error(
				common::format_qc_assert_error(&left, &right, None)
			)
		}
	}};
    ($left:expr,$right:expr,$($arg:tt)+) => {{
		let left = $left;
		let right = $right;
		if left == right {
			TestResult::passed()
		} else {
			TestResult::error(
				common::format_qc_assert_error(&left, &right, Some(format_args!($($arg)+)))
			)
		}
	}};
}

pub fn format_qc_assert_error<L: Debug, R: Debug>(left: &L, right: &R, msg: Option<Arguments>) -> String {
	if let Some(msg) = msg {
		format!(
			"assertion failed `(left == right)`: {msg}\n \
			left: `{left:?}`,\nright: `{right:?}`",
		)
	} else {
		format!(
			"assertion failed `(left == right)`:\n \
			left: `{left:?}`,\nright: `{right:?}`",
		)
	}
}

/// A pool handing out blocks of exactly the requested size, recording every claim
/// and collect.
#[derive(Debug, Default)]
pub struct MockPool {
	/// Size hints passed to `claim`.
	pub claims: Vec<usize>,
	/// Lengths and clear flags passed to `collect`.
	pub collects: Vec<(usize, bool)>,
	/// Extra bytes added to every block.
	pub slack: usize,
}

impl MockPool {
	pub fn with_slack(slack: usize) -> Self {
		Self { slack, ..Self::default() }
	}

	pub fn outstanding(&self) -> usize {
		self.claims.len() - self.collects.len()
	}
}

impl MutPool for MockPool {
	fn claim(&mut self, size_hint: usize) -> Result<Block, PoolError> {
		self.claims.push(size_hint);
		Ok(vec![0; size_hint + self.slack].into_boxed_slice())
	}

	fn collect(&mut self, mut block: Block, clear: bool) {
		if clear {
			block.fill(0);
		}
		self.collects.push((block.len(), clear));
	}

	fn shed(&mut self) { }
}

/// A pool that always hands out blocks one byte too short.
#[derive(Debug, Default)]
pub struct ShortPool {
	pub collected: usize,
}

impl MutPool for ShortPool {
	fn claim(&mut self, size_hint: usize) -> Result<Block, PoolError> {
		Ok(vec![0; size_hint.saturating_sub(1)].into_boxed_slice())
	}

	fn collect(&mut self, _: Block, _: bool) {
		self.collected += 1;
	}

	fn shed(&mut self) { }
}

pub type MockContainer = PoolContainer<MockPool>;

/// Options with tiny segments, so short writes span many of them.
pub fn small_options() -> StreamOptions {
	StreamOptions::new()
		.with_initial_capacity(8)
		.with_segment_size(8, 32)
}

/// Generates `len` bytes of a repeating, non-zero pattern.
pub fn pattern(len: usize) -> Vec<u8> {
	(0..len).map(|i| (i % 251) as u8 + 1).collect()
}
