//! Benchmarks for per-frame classification

use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use repsense_core::{bearing, included_angle, FrameTime, Point2D};
use repsense_detect::{PlankDetector, PoseAngles, PushUpDetector};
use repsense_runtime::{BodySide, ExerciseTracker, FrameAdapter, RuntimeConfig};
use repsense_test::{PoseKind, PoseSimulator};
use repsense_time::ManualClock;

fn bench_geometry(c: &mut Criterion) {
    let a = Point2D::new(0.30, 0.40);
    let b = Point2D::new(0.55, 0.42);
    let d = Point2D::new(0.80, 0.44);

    c.bench_function("included_angle", |bench| {
        bench.iter(|| included_angle(black_box(a), black_box(b), black_box(d)))
    });

    c.bench_function("bearing", |bench| {
        bench.iter(|| bearing(black_box(a), black_box(d)))
    });
}

fn bench_push_up_evaluate(c: &mut Criterion) {
    let top = PoseAngles::new(2.0, 5.0, 90.0, 3.0);
    let bottom = PoseAngles::new(2.0, 9.0, 90.0, 88.0);
    let mut detector = PushUpDetector::new();

    c.bench_function("push_up_evaluate_frame", |b| {
        b.iter(|| {
            detector.evaluate_frame(black_box(&top));
            detector.evaluate_frame(black_box(&bottom))
        })
    });
}

fn bench_plank_evaluate(c: &mut Criterion) {
    let plank = PoseAngles::new(1.0, 2.0, 180.0, 90.0);
    let mut detector = PlankDetector::new();
    let mut now = FrameTime::ZERO;

    c.bench_function("plank_evaluate_frame", |b| {
        b.iter(|| {
            now = now.saturating_add(Duration::from_millis(33));
            detector.evaluate_frame(black_box(&plank), now)
        })
    });
}

fn bench_adapt(c: &mut Criterion) {
    let landmarks = PoseSimulator::landmarks_for(PoseKind::Plank, BodySide::Left).unwrap_or_default();

    let mut group = c.benchmark_group("adapt");
    for side in [BodySide::Left, BodySide::Auto] {
        let adapter = FrameAdapter::new(side, 0.0);
        group.bench_with_input(BenchmarkId::from_parameter(format!("{:?}", side)), &landmarks, |b, l| {
            b.iter(|| adapter.adapt(black_box(l)))
        });
    }
    group.finish();
}

fn bench_tracker_stream(c: &mut Criterion) {
    let mut sim = PoseSimulator::noisy();
    let mut frames = sim.push_up_set(10, 3);
    frames.extend(sim.hold(PoseKind::Plank, 60));
    let landmark_sets: Vec<_> = frames.into_iter().filter_map(|f| f.landmarks).collect();

    let mut group = c.benchmark_group("tracker_stream");
    group.throughput(Throughput::Elements(landmark_sets.len() as u64));

    group.bench_function("process_landmarks", |b| {
        b.iter(|| {
            let clock = ManualClock::new();
            let mut tracker = ExerciseTracker::with_clock(RuntimeConfig::default(), clock.clone());
            for landmarks in &landmark_sets {
                clock.advance(Duration::from_millis(33));
                let _ = black_box(tracker.process_landmarks(landmarks));
            }
            tracker.repetition_count()
        })
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_geometry,
    bench_push_up_evaluate,
    bench_plank_evaluate,
    bench_adapt,
    bench_tracker_stream,
);

criterion_main!(benches);
