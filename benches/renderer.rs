use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use resume_timeline_renderer::config::{Config, SpacingMode};
use resume_timeline_renderer::ir::{Event, Side, Timeline};
use resume_timeline_renderer::layout::compute_layout;
use resume_timeline_renderer::measure::{Measurements, SceneMeasurer, render_two_pass};
use resume_timeline_renderer::render::render_svg;
use resume_timeline_renderer::scene::build_scene;
use std::hint::black_box;

fn synthetic_timeline(events: usize, lanes: usize) -> Timeline {
    let mut timeline = Timeline::new();
    for i in 0..events {
        let side = if i % 3 == 0 { Side::Right } else { Side::Left };
        let mut event = Event::new(&format!("e{i}"), &format!("Event {i}"), "2020", side);
        if side == Side::Right {
            event.description = Some(
                "Building scalable, performant web applications with modern frameworks."
                    .to_string(),
            );
            event.stack = vec!["Rust".to_string(), "TypeScript".to_string(), "SQL".to_string()];
        }
        if lanes > 1 {
            event.lane = Some(format!("lane-{}", i % lanes));
        }
        timeline.push(event);
    }
    timeline
}

fn bench_layout(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout");
    let config = Config::default();
    for (events, lanes) in [(5usize, 1usize), (50, 1), (200, 4)] {
        let timeline = synthetic_timeline(events, lanes);
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{events}_{lanes}")),
            &timeline,
            |b, timeline| {
                b.iter(|| {
                    let layout =
                        compute_layout(black_box(timeline), &config.timeline, &Measurements::new());
                    black_box(layout.height);
                });
            },
        );
    }
    group.finish();
}

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render");
    let config = Config::default();
    let mut dynamic = Config::default();
    dynamic.timeline.spacing = SpacingMode::Dynamic;
    for events in [5usize, 50, 200] {
        let timeline = synthetic_timeline(events, 1);
        group.bench_with_input(BenchmarkId::new("fixed", events), &timeline, |b, timeline| {
            b.iter(|| {
                let layout = compute_layout(timeline, &config.timeline, &Measurements::new());
                let scene = build_scene(black_box(timeline), &layout, &config, 1200.0);
                black_box(render_svg(&scene, &config.theme).len());
            });
        });
        group.bench_with_input(BenchmarkId::new("two_pass", events), &timeline, |b, timeline| {
            b.iter(|| {
                let (scene, _) =
                    render_two_pass(black_box(timeline), &dynamic, 1200.0, &mut SceneMeasurer);
                black_box(render_svg(&scene, &dynamic.theme).len());
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_layout, bench_render);
criterion_main!(benches);
