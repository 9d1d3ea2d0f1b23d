#[macro_use]
extern crate criterion;

use std::io::Cursor;

use criterion::{BenchmarkId, Criterion};
use grovedb_stream_merkle_tree::{
    Blake3Hasher, CachedStreamMerkleTree, Proof, StreamMerkleTree, reader_root, verify_proof,
};
use rand::{Rng, SeedableRng, rngs::StdRng, seq::IndexedRandom};

/// Segment payload for leaf `i` (for benchmarking).
fn segment(i: u64) -> [u8; 8] {
    i.to_le_bytes()
}

fn prepare_tree(count: u64, index: u64) -> StreamMerkleTree<Blake3Hasher> {
    let mut tree = StreamMerkleTree::new(Blake3Hasher::new());
    tree.set_index(index).expect("set index");
    for i in 0..count {
        tree.append(&segment(i));
    }
    tree
}

fn bench(c: &mut Criterion) {
    {
        let mut group = c.benchmark_group("stream tree append");
        let inputs = [10_000u64, 100_000, 1_000_000];
        for input in inputs.iter() {
            group.bench_with_input(BenchmarkId::new("leaves", input), input, |b, &size| {
                b.iter(|| prepare_tree(size, size / 2));
            });
        }
    }

    c.bench_function("stream tree reader root 4 MiB", |b| {
        let mut rng = StdRng::seed_from_u64(7);
        let mut data = vec![0u8; 4 << 20];
        rng.fill(data.as_mut_slice());
        b.iter(|| reader_root(Cursor::new(&data), Blake3Hasher::new(), 64).expect("root"));
    });

    c.bench_function("cached tree append 2^16 roots", |b| {
        b.iter(|| {
            let mut cached =
                CachedStreamMerkleTree::new(Blake3Hasher::new(), 10).expect("valid height");
            for i in 0..(1u64 << 16) {
                let mut root = [0u8; 32];
                root[..8].copy_from_slice(&segment(i));
                cached.append(&root);
            }
            cached.root()
        });
    });

    c.bench_function("stream tree verify", |b| {
        let mut rng = StdRng::seed_from_u64(11);
        let count = 100_000u64;
        let proofs: Vec<Proof> = (0..64)
            .map(|_| prepare_tree(count, rng.random_range(0..count)).proof())
            .collect();
        let mut hasher = Blake3Hasher::new();
        b.iter(|| {
            let proof = proofs.choose(&mut rng).expect("non-empty");
            assert!(verify_proof(
                &mut hasher,
                proof.root(),
                proof.path(),
                proof.target_index(),
                proof.leaf_count()
            ));
        });
    });
}

criterion_group!(
    name = benches;
    config = Criterion::default().sample_size(20);
    targets = bench
);
criterion_main!(benches);
