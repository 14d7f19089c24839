// SPDX-License-Identifier: Apache-2.0

use spool::pool::{BoundedPool, DefaultPool, DefaultPoolContainer, MutPool, Pool, PoolContainer, PoolError};
use spool::{ErrorKind, OperationKind, PoolStream, Result};
use common::{pattern, small_options, MockPool, ShortPool};

mod common;

#[test]
fn exhaustion_propagates_from_write() {
	let pool = PoolContainer::from(BoundedPool::new(MockPool::default(), 16));
	let mut stream = PoolStream::with_options(pool.clone(), small_options()).unwrap();

	let err = stream.write(&pattern(20)).unwrap_err();
	assert_eq!(err.kind(), ErrorKind::Pool);
	assert_eq!(err.operation(), OperationKind::Write);
	assert_eq!(err.pool_source(), Some(&PoolError::Exhausted { requested: 12, available: 8 }));

	// Bytes before the failed claim stay written.
	assert_eq!(stream.len(), 8);
	drop(stream);
	assert_eq!(pool.try_borrow().unwrap().outstanding(), 0);
}

#[test]
fn exhaustion_propagates_from_create() {
	let pool = PoolContainer::from(BoundedPool::new(MockPool::default(), 4));
	let err = PoolStream::with_options(pool.clone(), small_options()).unwrap_err();
	assert_eq!(err.kind(), ErrorKind::Pool);
	assert_eq!(err.operation(), OperationKind::Create);
	assert!(pool.try_borrow().unwrap().inner().claims.is_empty());
}

#[test]
fn undersized_block_is_collected() {
	let pool = PoolContainer::from(ShortPool::default());
	let err = PoolStream::with_options(pool.clone(), small_options()).unwrap_err();
	assert_eq!(err.pool_source(), Some(&PoolError::Undersized { requested: 8, len: 7 }));
	assert_eq!(pool.try_borrow().unwrap().collected, 1);
}

#[test]
fn borrowed_pool_fails() {
	let pool = PoolContainer::from(MockPool::default());
	let _guard = pool.try_borrow().unwrap();
	let err = PoolStream::with_options(pool.clone(), small_options()).unwrap_err();
	assert_eq!(err.pool_source(), Some(&PoolError::Borrow));
}

#[test]
fn default_pool_reuses_cleared_segments() -> Result {
	let pool = DefaultPoolContainer::default();
	{
		let mut stream = PoolStream::with_pool(pool.clone())?;
		stream.write(&pattern(100_000))?;
		assert_eq!(stream.segment_capacities().collect::<Vec<_>>(), [65_536, 65_536]);
	}

	{
		let inner = pool.try_borrow().unwrap();
		assert_eq!(inner.stats().claimed, 2);
		assert_eq!(inner.stats().collected, 2);
		assert_eq!(inner.retained(), 2);
	}

	let mut stream = PoolStream::with_pool(pool.clone())?;
	stream.write(&pattern(70_000))?;
	assert_eq!(pool.try_borrow().unwrap().stats().reused, 2);
	assert_eq!(pool.try_borrow().unwrap().stats().allocated, 2);
	stream.close()?;

	let block = pool.claim(65_536).unwrap();
	assert!(block.iter().all(|&b| b == 0));
	pool.collect(block, false).unwrap();
	Ok(())
}

#[test]
fn bounded_pool_tracks_outstanding_bytes() {
	let mut pool = BoundedPool::new(DefaultPool::default(), 100);
	let block = pool.claim(40).unwrap();
	assert_eq!(block.len(), 64);
	assert_eq!(pool.outstanding(), 64);
	assert_eq!(pool.claim(40), Err(PoolError::Exhausted { requested: 40, available: 36 }));
	pool.collect(block, true);
	assert_eq!(pool.outstanding(), 0);
	assert_eq!(pool.inner().stats().outstanding(), 0);
}

#[test]
fn close_retries_after_borrow_failure() {
	let pool = PoolContainer::from(BoundedPool::new(MockPool::default(), 64));
	let mut stream = PoolStream::with_options(pool.clone(), small_options()).unwrap();
	stream.write(&pattern(20)).unwrap();

	let guard = pool.try_borrow().unwrap();
	let err = stream.close().unwrap_err();
	assert_eq!(err.operation(), OperationKind::Close);
	assert_eq!(err.pool_source(), Some(&PoolError::Borrow));
	drop(guard);

	// Still open with its segments held.
	assert!(stream.can_write());
	assert_eq!(stream.len(), 20);
	assert_eq!(stream.segment_count(), 2);

	stream.close().unwrap();
	let inner = pool.try_borrow().unwrap();
	assert_eq!(inner.inner().claims.len(), 2);
	assert_eq!(inner.inner().collects.len(), 2);
	assert_eq!(inner.outstanding(), 0);
}
