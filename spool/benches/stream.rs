// SPDX-License-Identifier: Apache-2.0

use std::io::{Cursor, Read, Seek, SeekFrom, Write};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use spool::pool::{DefaultPool, DefaultPoolContainer, PoolOptions};
use spool::PoolStream;

const WRITE_COUNT: usize = 4000;
const DATA: [u8; 1024] = [0x5A; 1024];

fn write_then_read(stream: &mut (impl Read + Write + Seek), size: usize, target: &mut [u8]) {
	for _ in 0..WRITE_COUNT {
		stream.write_all(&DATA[..size]).unwrap();
	}
	stream.seek(SeekFrom::Start(0)).unwrap();
	stream.read_exact(target).unwrap();
}

fn write_and_read(c: &mut Criterion) {
	let mut group = c.benchmark_group("write_and_read");
	let pool = DefaultPoolContainer::from(
		DefaultPool::new(PoolOptions::new().with_max_blocks_per_bucket(4))
	);

	for size in [128, 1024] {
		let mut target = vec![0; WRITE_COUNT * size];

		group.bench_with_input(BenchmarkId::new("vec_cursor", size), &size, |b, &size| b.iter(|| {
			let mut stream = Cursor::new(Vec::new());
			write_then_read(&mut stream, size, &mut target);
			black_box(stream.into_inner())
		}));

		group.bench_with_input(BenchmarkId::new("pool_stream", size), &size, |b, &size| b.iter(|| {
			let mut stream = PoolStream::with_pool(pool.clone()).unwrap();
			write_then_read(&mut stream, size, &mut target);
			black_box(stream.len())
		}));
	}
	group.finish();
}

fn to_vec(c: &mut Criterion) {
	let mut stream = PoolStream::new().unwrap();
	for _ in 0..WRITE_COUNT {
		stream.write(&DATA).unwrap();
	}
	c.bench_function("to_vec", |b| b.iter(|| black_box(stream.to_vec().unwrap())));
}

fn single_bytes(c: &mut Criterion) {
	c.bench_function("write_u8", |b| b.iter(|| {
		let mut stream = PoolStream::new().unwrap();
		for byte in 0..=u8::MAX {
			stream.write_u8(black_box(byte)).unwrap();
		}
		stream.len()
	}));
}

criterion_group!(benches, write_and_read, to_vec, single_bytes);
criterion_main!(benches);
