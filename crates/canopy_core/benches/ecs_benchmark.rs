//! # ECS Performance Benchmark
//!
//! Measures the hot paths of a frame: entity creation, reconciliation,
//! interest-list iteration with component access, and kill/recycle churn.
//!
//! Run with: `cargo bench --package canopy_core`

#![allow(missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use canopy_core::{Component, Entity, Pool, Registry, System, SystemCore};

/// Entity count for the steady-state benchmarks.
const ENTITY_COUNT: usize = 100_000;

#[derive(Clone, Copy)]
struct Position {
    x: f64,
    y: f64,
}
impl Component for Position {}

#[derive(Clone, Copy)]
struct Velocity {
    dx: f64,
    dy: f64,
}
impl Component for Velocity {}

struct Movement {
    core: SystemCore,
}

impl Movement {
    fn new() -> Self {
        Self {
            core: SystemCore::new().require::<Position>().require::<Velocity>(),
        }
    }

    fn update(&mut self, registry: &mut Registry, delta_time: f64) {
        for &entity in self.core.entities() {
            let velocity = *registry.get_component::<Velocity>(entity);
            let position = registry.get_component_mut::<Position>(entity);
            position.x += velocity.dx * delta_time;
            position.y += velocity.dy * delta_time;
        }
    }
}

impl System for Movement {
    fn core(&self) -> &SystemCore {
        &self.core
    }
    fn core_mut(&mut self) -> &mut SystemCore {
        &mut self.core
    }
}

#[allow(clippy::cast_precision_loss)]
fn populate(registry: &mut Registry, count: usize) -> Vec<Entity> {
    (0..count)
        .map(|i| {
            let entity = registry.create_entity();
            registry.add_component(entity, Position { x: i as f64, y: 0.0 });
            registry.add_component(entity, Velocity { dx: 1.0, dy: 0.5 });
            entity
        })
        .collect()
}

/// Benchmark: create entities and reconcile them into a system.
fn bench_spawn_and_reconcile(c: &mut Criterion) {
    let mut group = c.benchmark_group("spawn_and_reconcile");

    for count in [1_000, 10_000, ENTITY_COUNT] {
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            b.iter(|| {
                let mut registry = Registry::new();
                registry.add_system(Movement::new());
                populate(&mut registry, count);
                black_box(registry.update())
            });
        });
    }

    group.finish();
}

/// Benchmark: one movement step over every matching entity.
fn bench_movement_tick(c: &mut Criterion) {
    let mut registry = Registry::new();
    registry.add_system(Movement::new());
    populate(&mut registry, ENTITY_COUNT);
    registry.update();

    c.bench_function("movement_tick_100K", |b| {
        b.iter(|| {
            registry.run_system::<Movement, _>(|movement, registry| movement.update(registry, 0.016));
            black_box(registry.alive_count())
        });
    });
}

/// Benchmark: raw dense pool iteration (lower bound for the tick above).
#[allow(clippy::cast_precision_loss)]
fn bench_pool_iteration(c: &mut Criterion) {
    let mut pool = Pool::with_capacity(ENTITY_COUNT);
    for i in 0..ENTITY_COUNT {
        let id = u32::try_from(i).unwrap_or(u32::MAX - 1);
        pool.set(Entity::from_raw(id), Position { x: i as f64, y: 0.0 });
    }

    c.bench_function("pool_iter_mut_100K", |b| {
        b.iter(|| {
            for position in pool.values_mut() {
                position.x += 0.016;
            }
            black_box(pool.len())
        });
    });
}

/// Benchmark: kill a slice of entities, reconcile, recreate from the free list.
fn bench_kill_recycle_cycle(c: &mut Criterion) {
    let mut registry = Registry::new();
    registry.add_system(Movement::new());
    let entities = populate(&mut registry, ENTITY_COUNT);
    registry.update();

    c.bench_function("kill_recycle_cycle_10K", |b| {
        b.iter(|| {
            for &entity in entities.iter().take(10_000) {
                registry.kill_entity(entity);
            }
            registry.update();
            populate(&mut registry, 10_000);
            black_box(registry.update())
        });
    });
}

criterion_group!(
    benches,
    bench_spawn_and_reconcile,
    bench_movement_tick,
    bench_pool_iteration,
    bench_kill_recycle_cycle,
);
criterion_main!(benches);
