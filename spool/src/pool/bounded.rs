// SPDX-License-Identifier: Apache-2.0

use tracing::debug;
use super::{Block, MutPool, PoolError};

/// A pool limiting the total size of blocks claimed but not yet collected. Claims
/// beyond the limit fail with [`PoolError::Exhausted`].
#[derive(Debug)]
pub struct BoundedPool<P: MutPool> {
	inner: P,
	limit: usize,
	outstanding: usize,
}

impl<P: MutPool> BoundedPool<P> {
	pub fn new(inner: P, limit: usize) -> Self {
		Self { inner, limit, outstanding: 0 }
	}

	/// Returns the byte limit.
	pub fn limit(&self) -> usize { self.limit }

	/// Returns the number of bytes claimed but not yet collected.
	pub fn outstanding(&self) -> usize { self.outstanding }

	/// Returns the wrapped pool.
	pub fn inner(&self) -> &P { &self.inner }

	fn available(&self) -> usize {
		self.limit.saturating_sub(self.outstanding)
	}
}

impl<P: MutPool> MutPool for BoundedPool<P> {
	fn claim(&mut self, size_hint: usize) -> Result<Block, PoolError> {
		let available = self.available();
		if size_hint > available {
			debug!(size_hint, available, "bounded pool exhausted");
			return Err(PoolError::Exhausted { requested: size_hint, available })
		}

		let block = self.inner.claim(size_hint)?;
		if block.len() > available {
			let requested = block.len();
			self.inner.collect(block, false);
			debug!(size_hint, requested, available, "bounded pool exhausted");
			return Err(PoolError::Exhausted { requested, available })
		}

		self.outstanding += block.len();
		Ok(block)
	}

	fn collect(&mut self, block: Block, clear: bool) {
		self.outstanding = self.outstanding.saturating_sub(block.len());
		self.inner.collect(block, clear)
	}

	fn shed(&mut self) { self.inner.shed() }
}
