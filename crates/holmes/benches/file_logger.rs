//! File logging benchmarks
//!
//! Measures the cost of a formatted record going through the process-wide
//! logger into a rotating log file, from one thread and from many.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use holmes::options::{every_hour, info_level, log_file_path};
use std::thread;
use tempfile::TempDir;

fn bench_single_thread(c: &mut Criterion) {
    let temp_dir = TempDir::new().unwrap();
    let logger = holmes::start([log_file_path(temp_dir.path()), every_hour()]);

    c.bench_function("file_logger_single_thread", |b| {
        b.iter(|| {
            holmes::info!("{}", black_box("Wake up, Neo"));
            holmes::warn!("{}", black_box("The Matrix has you..."));
            holmes::error!("{}", black_box("Follow the white rabbit"));
            holmes::info!("{}", black_box("Knock knock!"));
        })
    });

    c.bench_function("file_logger_direct_handle", |b| {
        b.iter(|| holmes::debug!(logger: logger, "{}", black_box("Knock knock!")))
    });

    logger.stop();
}

fn bench_many_threads(c: &mut Criterion) {
    let temp_dir = TempDir::new().unwrap();
    let logger = holmes::start([log_file_path(temp_dir.path()), every_hour(), info_level()]);

    let mut group = c.benchmark_group("file_logger_threads");
    for threads in [2usize, 8, 32] {
        group.bench_with_input(BenchmarkId::from_parameter(threads), &threads, |b, &threads| {
            b.iter(|| {
                let handles: Vec<_> = (0..threads)
                    .map(|_| {
                        thread::spawn(|| {
                            holmes::info!("{}", "Wake up, Neo");
                            holmes::warn!("{}", "The Matrix has you...");
                            holmes::error!("{}", "Follow the white rabbit");
                            holmes::info!("{}", "Knock knock!");
                        })
                    })
                    .collect();
                for handle in handles {
                    handle.join().unwrap();
                }
            })
        });
    }
    group.finish();

    logger.stop();
}

criterion_group!(benches, bench_single_thread, bench_many_threads);
criterion_main!(benches);
