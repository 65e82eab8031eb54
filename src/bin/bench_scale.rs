#[cfg(feature = "mimalloc-global")]
#[global_allocator]
static GLOBAL_ALLOCATOR: mimalloc::MiMalloc = mimalloc::MiMalloc;

use cipher_life::{CipherLife, CipherLifeConfig, GENERATIONS, Grid, Seed};
use rand::Rng;
use rand::SeedableRng;
use std::time::Instant;

fn random_seed(rng: &mut impl Rng, len: usize) -> Seed {
    let pattern: String = (0..len)
        .map(|_| ['a', 'b', 'c'][rng.random_range(0..3)])
        .collect();
    Seed::parse(&pattern).expect("generated seed is valid")
}

fn bench_run(dim: usize, workers: usize, seed: &Seed) -> (f64, u64) {
    let config = CipherLifeConfig::default().worker_count(workers);
    let mut engine = CipherLife::with_config(dim, config).expect("build engine");
    let grid = Grid::generate(dim, seed).expect("generate grid");

    let start = Instant::now();
    let done = engine.run(grid).expect("run automaton");
    let duration = start.elapsed();

    let checksum = done
        .column_aggregates()
        .expect("aggregate")
        .iter()
        .map(|&v| v as u64)
        .sum();
    (duration.as_secs_f64() * 1000.0, checksum)
}

fn main() {
    let dims: &[usize] = &[32, 128, 512, 1024];
    let workers: &[usize] = &[1, 2, 4, 8];
    let mut rng = rand::rngs::StdRng::seed_from_u64(0x5EED_1234_ABCD_EF01);

    println!(
        "{:<10} {:>8} {:>12} {:>12} {:>10}",
        "Grid", "Workers", "Total(ms)", "Avg(ms)", "Checksum"
    );
    println!("{}", "-".repeat(56));

    for &dim in dims {
        let seed = random_seed(&mut rng, 7);
        let mut baseline = None;
        for &w in workers {
            let (total_ms, checksum) = bench_run(dim, w, &seed);
            let avg_ms = total_ms / GENERATIONS as f64;
            match baseline {
                None => baseline = Some(checksum),
                Some(expected) => assert_eq!(
                    expected, checksum,
                    "worker count {w} diverged for {dim}x{dim}"
                ),
            }
            println!(
                "{:<10} {:>8} {:>12.1} {:>12.4} {:>10}",
                format!("{}x{}", dim, dim),
                w,
                total_ms,
                avg_ms,
                checksum
            );
        }
    }
}
