use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use rand::rngs::StdRng;
use rand::SeedableRng;
use tinycv_nn::{FeedForwardConfig, FeedForwardNetwork, Matrix};

fn bench_train(c: &mut Criterion) {
    let mut group = c.benchmark_group("FeedForward");

    for hidden in [16, 64, 256].iter() {
        let config = FeedForwardConfig {
            hidden_dim: *hidden,
            hidden_dim2: *hidden,
            ..Default::default()
        };

        let x = Matrix::from_vec(4, 2, vec![0.0, 0.0, 0.0, 1.0, 1.0, 0.0, 1.0, 1.0]).unwrap();
        let t = Matrix::from_vec(4, 1, vec![0.0, 1.0, 1.0, 0.0]).unwrap();

        group.bench_with_input(
            BenchmarkId::new("train_xor", hidden),
            &(&x, &t),
            |b, (x, t)| {
                let mut network =
                    FeedForwardNetwork::new_with_rng(config, &mut StdRng::seed_from_u64(0));
                b.iter(|| black_box(network.train(x, t)))
            },
        );

        group.bench_with_input(BenchmarkId::new("forward_xor", hidden), &x, |b, x| {
            let mut network =
                FeedForwardNetwork::new_with_rng(config, &mut StdRng::seed_from_u64(0));
            b.iter(|| black_box(network.forward(x)))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_train);
criterion_main!(benches);
