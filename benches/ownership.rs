use solo::*;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

pub fn single_object(c: &mut Criterion) {
    let mut group = c.benchmark_group("single_object");
    group.bench_function("box", |b| b.iter(|| black_box(Box::new(black_box(42u64)))));
    group.bench_function("make_unique", |b| {
        b.iter(|| black_box(make_unique(black_box(42u64))))
    });
    group.bench_function("try_make_unique", |b| {
        b.iter(|| black_box(try_make_unique(black_box(42u64))))
    });
    group.bench_function("reset", |b| {
        let mut p = make_unique(0u64);
        b.iter(|| {
            let next = Box::into_raw(Box::new(black_box(1u64)));
            // Safety: `next` came from a Box and is handed over once.
            unsafe { p.reset(next) };
        })
    });
    group.finish();
}

pub fn array(c: &mut Criterion) {
    let mut group = c.benchmark_group("array");
    for len in [16usize, 256, 4096] {
        group.bench_with_input(BenchmarkId::new("boxed_slice", len), &len, |b, &len| {
            b.iter(|| {
                let mut a = vec![0u32; len].into_boxed_slice();
                for (i, v) in a.iter_mut().enumerate() {
                    *v = i as u32 * 10;
                }
                black_box(a)
            })
        });
        group.bench_with_input(BenchmarkId::new("make_unique_array", len), &len, |b, &len| {
            b.iter(|| {
                let mut a = make_unique_array::<u32>(len);
                for i in 0..len {
                    a[i] = i as u32 * 10;
                }
                black_box(a)
            })
        });
    }
    group.finish();
}

criterion_group!(benches, single_object, array);
criterion_main!(benches);
