use criterion::{BatchSize, Criterion, Throughput, criterion_group, criterion_main};
use slippy::core::Window;
use std::hint::black_box;
use std::time::Duration;
use tokio::time::Instant;

fn filled_window(entries: u64, start: Instant) -> Window {
    let mut window = Window::new(Duration::from_secs(30));
    for i in 0..entries {
        window.record(1 + (i % 10) as i64, start + Duration::from_millis(i));
    }
    window
}

fn benchmark_record(c: &mut Criterion) {
    let mut group = c.benchmark_group("window_record");
    group.throughput(Throughput::Elements(1));

    group.bench_function("append", |b| {
        let start = Instant::now();
        let mut window = Window::new(Duration::from_secs(30));
        let mut counter = 0u64;

        b.iter(|| {
            counter += 1;
            let at = start + Duration::from_nanos(counter);
            black_box(window.record(black_box(1), at))
        });
    });

    group.finish();
}

fn benchmark_slip(c: &mut Criterion) {
    let mut group = c.benchmark_group("window_slip");

    for entries in [1_000u64, 10_000, 100_000] {
        group.throughput(Throughput::Elements(entries));

        // Expire the older half of the log
        group.bench_function(format!("half_of_{entries}"), |b| {
            let start = Instant::now();
            b.iter_batched(
                || filled_window(entries, start),
                |mut window| {
                    let cutoff = start + Duration::from_millis(entries / 2);
                    black_box(window.slip(black_box(cutoff)))
                },
                BatchSize::LargeInput,
            );
        });

        // Nothing expired: the scan must stop at the first survivor
        group.bench_function(format!("none_of_{entries}"), |b| {
            let start = Instant::now();
            let mut window = filled_window(entries, start);
            b.iter(|| black_box(window.slip(black_box(start))));
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_record, benchmark_slip);
criterion_main!(benches);
