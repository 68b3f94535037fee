use criterion::{Criterion, black_box, criterion_group, criterion_main};
use farsight_kinematics::{CelestialBody, KinematicBody};
use farsight_math::{Point, Spatial, Vector, dec};
use farsight_projector::*;

fn observer() -> KinematicBody {
    let mut observer = KinematicBody::at(Point::new(dec(500_000_000), dec(0), dec(0)));
    observer.set_orientation(Point::from_f64s(0.1, 0.7, 0.0).unwrap());
    observer
}

fn bench_near_star_surface(c: &mut Criterion) {
    let projector = Projector::new(ProjectorSettings::default());
    let observer = black_box(observer());
    let star = black_box(CelestialBody::star(
        "near",
        dec(1_737_400),
        Point::new(dec(-84_400_000), dec(0), dec(0)),
    ));
    c.bench_function("project_near_star_surface", |bencher| {
        bencher.iter(|| black_box(projector.project_body(&observer, &star)))
    });
}

fn bench_far_star_marker(c: &mut Criterion) {
    let projector = Projector::new(ProjectorSettings::default());
    let observer = black_box(observer());
    let star = black_box(CelestialBody::star(
        "far",
        dec(1_737_400),
        Point::new(dec(-4_730_365_236_290_400), dec(12), dec(0)),
    ));
    c.bench_function("project_far_star_marker", |bencher| {
        bencher.iter(|| black_box(projector.project_body(&observer, &star)))
    });
}

fn bench_far_star_streak(c: &mut Criterion) {
    let projector = Projector::new(ProjectorSettings::default());
    let mut observer = observer();
    observer.set_velocity(Vector::new(dec(-51_000_000), dec(0), dec(0)));
    let observer = black_box(observer);
    let star = black_box(CelestialBody::star(
        "far",
        dec(1_737_400),
        Point::new(dec(-4_730_365_236_290_400), dec(12), dec(0)),
    ));
    c.bench_function("project_far_star_streak", |bencher| {
        bencher.iter(|| black_box(projector.project_body(&observer, &star)))
    });
}

fn bench_sphere_points(c: &mut Criterion) {
    c.bench_function("sphere_point_3000", |bencher| {
        bencher.iter(|| {
            for i in 0..3000 {
                black_box(sphere_point(black_box(i), 3000, 4.5));
            }
        })
    });
}

criterion_group!(
    benches,
    bench_near_star_surface,
    bench_far_star_marker,
    bench_far_star_streak,
    bench_sphere_points
);
criterion_main!(benches);
