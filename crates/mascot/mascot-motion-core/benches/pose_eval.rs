use criterion::{black_box, criterion_group, criterion_main, Criterion};
use mascot_motion_core::{pose_at, MascotConfig, Point};

fn pose_benchmark(c: &mut Criterion) {
    let cfg = MascotConfig::default();
    let center = Point::new(400.0, 300.0);
    let pointer = Some(Point::new(620.0, 180.0));
    c.bench_function("pose_at", |b| {
        b.iter(|| {
            black_box(pose_at(
                black_box(&cfg),
                black_box(1234.5),
                black_box(pointer),
                black_box(center),
            ))
        })
    });
}

fn css_benchmark(c: &mut Criterion) {
    let cfg = MascotConfig::default();
    let pose = pose_at(&cfg, 1234.5, None, Point::ZERO);
    c.bench_function("pose_css", |b| {
        b.iter(|| {
            let t = black_box(&pose).transform_css();
            let f = black_box(&pose).shadow.to_css();
            black_box((t, f))
        })
    });
}

criterion_group!(benches, pose_benchmark, css_benchmark);
criterion_main!(benches);
