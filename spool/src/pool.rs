// SPDX-License-Identifier: Apache-2.0

//! Segment pools. A stream never allocates its own memory: it claims blocks from a
//! [`Pool`] as it grows, and collects them back into the pool when closed.

mod bounded;

pub use bounded::BoundedPool;

use std::cell::{BorrowMutError, RefCell, RefMut};
use std::ops::DerefMut;
use std::rc::Rc;
use tracing::trace;

/// A block of pool memory, used as a stream segment. Its capacity is its length.
pub type Block = Box<[u8]>;

/// The smallest block size handed out by [`DefaultPool`].
pub const MIN_BLOCK_SIZE: usize = 16;

#[derive(Copy, Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum PoolError {
	#[error("failed to borrow the pool")]
	Borrow,
	#[error("pool exhausted; {requested} bytes requested with {available} bytes available")]
	Exhausted {
		requested: usize,
		available: usize,
	},
	#[error("pool returned a {len}-byte block for a {requested}-byte request")]
	Undersized {
		requested: usize,
		len: usize,
	},
}

impl From<BorrowMutError> for PoolError {
	fn from(_: BorrowMutError) -> Self { Self::Borrow }
}

/// A shared handle to a segment pool.
pub trait Pool: Clone {
	type Pool: MutPool + ?Sized;
	type Ref<'p>: DerefMut<Target = Self::Pool> where Self: 'p;

	/// Borrows the pool mutably, locking it for the duration of the borrow.
	fn try_borrow(&self) -> Result<Self::Ref<'_>, PoolError>;

	/// Claims a block of at least `size_hint` bytes. A block shorter than requested
	/// is collected back into the pool and reported as [`PoolError::Undersized`].
	fn claim(&self, size_hint: usize) -> Result<Block, PoolError> {
		let mut pool = self.try_borrow()?;
		let block = pool.claim(size_hint)?;
		if block.len() < size_hint {
			let len = block.len();
			pool.collect(block, false);
			return Err(PoolError::Undersized { requested: size_hint, len })
		}
		Ok(block)
	}

	/// Collects a single block back into the pool, zeroing it first if `clear` is
	/// `true`.
	fn collect(&self, block: Block, clear: bool) -> Result<(), PoolError> {
		self.try_borrow()?.collect(block, clear);
		Ok(())
	}

	/// Collects many blocks back into the pool.
	fn collect_all(&self, blocks: impl IntoIterator<Item = Block>, clear: bool) -> Result<(), PoolError> {
		let mut pool = self.try_borrow()?;
		for block in blocks {
			pool.collect(block, clear);
		}
		Ok(())
	}

	/// Clears retained blocks from the pool to free memory.
	fn shed(&self) -> Result<(), PoolError> {
		self.try_borrow()?.shed();
		Ok(())
	}
}

/// A mutably-borrowed pool, usually from a [`RefCell`].
pub trait MutPool {
	/// Claims a block of at least `size_hint` bytes. The block may be larger.
	fn claim(&mut self, size_hint: usize) -> Result<Block, PoolError>;

	/// Collects a block back into the pool, zeroing its contents first if `clear`
	/// is `true`. Each claimed block must be collected at most once.
	fn collect(&mut self, block: Block, clear: bool);

	/// Clears retained blocks from the pool. The actual count cleared is left up
	/// to implementation.
	fn shed(&mut self);
}

/// Options for [`DefaultPool`].
///
/// # Max block size
///
/// The largest block size the pool retains, rounded up to a power of two.
/// Defaults to `4MiB`. Larger requests are allocated on demand and dropped when
/// collected.
///
/// # Max blocks per bucket
///
/// The number of blocks of each size retained for reuse. Defaults to `8`. Blocks
/// collected into a full bucket are dropped.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub struct PoolOptions {
	pub max_block_size: usize,
	pub max_blocks_per_bucket: usize,
}

impl Default for PoolOptions {
	fn default() -> Self { Self::new() }
}

impl PoolOptions {
	pub const fn new() -> Self {
		Self {
			max_block_size: 4 * 1024 * 1024,
			max_blocks_per_bucket: 8,
		}
	}

	#[inline]
	pub const fn max_block_size(&self) -> usize { self.max_block_size }

	#[inline]
	pub const fn max_blocks_per_bucket(&self) -> usize { self.max_blocks_per_bucket }

	#[inline]
	pub const fn with_max_block_size(mut self, value: usize) -> Self {
		self.max_block_size = value;
		self
	}

	#[inline]
	pub const fn with_max_blocks_per_bucket(mut self, value: usize) -> Self {
		self.max_blocks_per_bucket = value;
		self
	}
}

/// Counters kept by [`DefaultPool`].
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct PoolStats {
	/// Blocks handed out.
	pub claimed: usize,
	/// Blocks handed back.
	pub collected: usize,
	/// Claims satisfied by a fresh allocation.
	pub allocated: usize,
	/// Claims satisfied by a retained block.
	pub reused: usize,
}

impl PoolStats {
	/// Returns the number of blocks claimed but not yet collected.
	pub fn outstanding(&self) -> usize {
		self.claimed.saturating_sub(self.collected)
	}
}

/// A pool retaining blocks in power-of-two sized buckets.
#[derive(Debug, Default)]
pub struct DefaultPool {
	buckets: Vec<Vec<Block>>,
	options: PoolOptions,
	stats: PoolStats,
}

impl DefaultPool {
	pub fn new(options: PoolOptions) -> Self {
		Self {
			buckets: Vec::new(),
			options,
			stats: PoolStats::default(),
		}
	}

	pub fn options(&self) -> PoolOptions { self.options }

	pub fn stats(&self) -> PoolStats { self.stats }

	/// Returns the number of blocks retained for reuse.
	pub fn retained(&self) -> usize {
		self.buckets.iter().map(Vec::len).sum()
	}

	fn max_block_size(&self) -> usize {
		self.options
			.max_block_size
			.max(MIN_BLOCK_SIZE)
			.checked_next_power_of_two()
			.unwrap_or(usize::MAX)
	}

	/// Returns the bucketed block size for `size_hint`, or `None` if blocks of
	/// that size aren't retained.
	fn bucket_size(&self, size_hint: usize) -> Option<usize> {
		size_hint
			.max(MIN_BLOCK_SIZE)
			.checked_next_power_of_two()
			.filter(|&size| size <= self.max_block_size())
	}

	fn bucket_index(size: usize) -> usize {
		(size.trailing_zeros() - MIN_BLOCK_SIZE.trailing_zeros()) as usize
	}

	fn alloc(&mut self, size: usize) -> Block {
		self.stats.allocated += 1;
		vec![0; size].into_boxed_slice()
	}
}

impl MutPool for DefaultPool {
	fn claim(&mut self, size_hint: usize) -> Result<Block, PoolError> {
		self.stats.claimed += 1;

		let Some(size) = self.bucket_size(size_hint) else {
			trace!(size_hint, "allocating unpooled block");
			return Ok(self.alloc(size_hint))
		};
		let index = Self::bucket_index(size);
		if let Some(block) = self.buckets.get_mut(index).and_then(Vec::pop) {
			trace!(size_hint, size, "reusing pooled block");
			self.stats.reused += 1;
			Ok(block)
		} else {
			trace!(size_hint, size, "allocating pooled block");
			Ok(self.alloc(size))
		}
	}

	fn collect(&mut self, mut block: Block, clear: bool) {
		self.stats.collected += 1;

		let size = block.len();
		if size < MIN_BLOCK_SIZE ||
		   size > self.max_block_size() ||
		   !size.is_power_of_two() {
			return
		}

		let index = Self::bucket_index(size);
		if self.buckets.len() <= index {
			self.buckets.resize_with(index + 1, Vec::new);
		}

		let bucket = &mut self.buckets[index];
		if bucket.len() < self.options.max_blocks_per_bucket {
			if clear {
				block.fill(0);
			}
			bucket.push(block);
		}
	}

	fn shed(&mut self) { self.buckets.clear() }
}

/// A [`MutPool`] shared through an `Rc<RefCell<...>>`.
pub struct PoolContainer<P: MutPool + ?Sized>(Rc<RefCell<P>>);

impl<P: MutPool + ?Sized> From<Rc<RefCell<P>>> for PoolContainer<P> {
	fn from(pool: Rc<RefCell<P>>) -> Self { Self(pool) }
}

impl<P: MutPool> From<P> for PoolContainer<P> {
	fn from(pool: P) -> Self {
		Rc::new(RefCell::new(pool)).into()
	}
}

impl<P: MutPool + Default> Default for PoolContainer<P> {
	fn default() -> Self { P::default().into() }
}

impl<P: MutPool + ?Sized> Clone for PoolContainer<P> {
	fn clone(&self) -> Self { Self(self.0.clone()) }
}

impl<P: MutPool + ?Sized> Pool for PoolContainer<P> {
	type Pool = P;
	type Ref<'p> = RefMut<'p, P> where Self: 'p;

	fn try_borrow(&self) -> Result<Self::Ref<'_>, PoolError> {
		Ok(self.0.try_borrow_mut()?)
	}
}

pub type DefaultPoolContainer = PoolContainer<DefaultPool>;

thread_local! {
	static POOL: DefaultPoolContainer = DefaultPoolContainer::default();
}

/// Clones a shared reference to the thread-local default pool.
pub fn pool() -> DefaultPoolContainer { POOL.with(Clone::clone) }
