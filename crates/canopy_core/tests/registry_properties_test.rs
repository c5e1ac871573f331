//! # Registry Property Tests
//!
//! End-to-end checks of the registry contract through the public API:
//!
//! 1. **Signature matching**: membership follows signatures after every barrier
//! 2. **Pool density**: pools stay packed under mixed insert/remove traffic
//! 3. **Id reuse**: released ids come back first-in first-out
//! 4. **Same-frame create/kill**: fully evicted at the barrier
//! 5. **Event fan-out**: order and reset behaviour
//!
//! Run with: cargo test --package canopy_core --test registry_properties_test

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use canopy_core::{Component, Entity, Event, EventBus, Registry, System, SystemCore};

// ============================================================================
// FIXTURES
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
struct Position {
    x: f64,
    y: f64,
}
impl Component for Position {}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Velocity {
    dx: f64,
    dy: f64,
}
impl Component for Velocity {}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Armor(u32);
impl Component for Armor {}

macro_rules! plain_system {
    ($name:ident) => {
        struct $name {
            core: SystemCore,
        }

        impl System for $name {
            fn core(&self) -> &SystemCore {
                &self.core
            }
            fn core_mut(&mut self) -> &mut SystemCore {
                &mut self.core
            }
        }
    };
}

plain_system!(MotionSystem);
plain_system!(ArmorSystem);
plain_system!(ArmoredMotionSystem);

impl MotionSystem {
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

fn register_all(registry: &mut Registry) {
    registry.add_system(MotionSystem::new());
    registry.add_system(ArmorSystem {
        core: SystemCore::new().require::<Armor>(),
    });
    registry.add_system(ArmoredMotionSystem {
        core: SystemCore::new()
            .require::<Armor>()
            .require::<Position>()
            .require::<Velocity>(),
    });
}

/// Deterministic xorshift so the traffic pattern is reproducible.
struct Sequence(u64);

impl Sequence {
    fn next(&mut self) -> u64 {
        self.0 ^= self.0 << 13;
        self.0 ^= self.0 >> 7;
        self.0 ^= self.0 << 17;
        self.0
    }
}

/// Every live entity is in exactly the systems its signature covers.
fn assert_membership_matches(registry: &Registry) {
    for system in registry.systems().iter() {
        for entity in registry.iter_entities() {
            let expected = registry.signature(entity).contains(system.signature());
            assert_eq!(
                system.entities().contains(&entity),
                expected,
                "{} membership of {entity:?} is wrong",
                system.name()
            );
        }
        for entity in system.entities() {
            assert!(registry.is_alive(*entity), "{} holds dead {entity:?}", system.name());
        }
    }
}

// ============================================================================
// PROPERTY 1: SIGNATURE MATCHING
// ============================================================================

#[test]
fn verify_signature_matching_under_churn() {
    let mut registry = Registry::new();
    register_all(&mut registry);
    let mut seq = Sequence(0x9E37_79B9_7F4A_7C15);
    let mut live: Vec<Entity> = Vec::new();

    for _frame in 0..50 {
        for _ in 0..20 {
            match seq.next() % 6 {
                0 | 1 => live.push(registry.create_entity()),
                2 if !live.is_empty() => {
                    let entity = live[(seq.next() as usize) % live.len()];
                    registry.add_component(entity, Position { x: 0.0, y: 0.0 });
                }
                3 if !live.is_empty() => {
                    let entity = live[(seq.next() as usize) % live.len()];
                    registry.add_component(entity, Velocity { dx: 1.0, dy: 1.0 });
                }
                4 if !live.is_empty() => {
                    let entity = live[(seq.next() as usize) % live.len()];
                    if registry.has_component::<Armor>(entity) {
                        registry.remove_component::<Armor>(entity);
                    } else {
                        registry.add_component(entity, Armor(1));
                    }
                }
                5 if !live.is_empty() => {
                    let index = (seq.next() as usize) % live.len();
                    registry.kill_entity(live.swap_remove(index));
                }
                _ => {}
            }
        }
        registry.update();
        assert_membership_matches(&registry);
    }
}

#[test]
fn verify_motion_scenario() {
    let mut registry = Registry::new();
    let entity = registry.create_entity();
    registry.add_component(entity, Position { x: 10.0, y: 20.0 });
    registry.add_component(entity, Velocity { dx: 5.0, dy: 0.0 });
    registry.add_system(MotionSystem::new());
    registry.update();

    assert_eq!(registry.get_system::<MotionSystem>().entities(), &[entity]);

    registry.run_system::<MotionSystem, _>(|system, registry| system.update(registry, 1.0));

    let position = registry.get_component::<Position>(entity);
    assert!((position.x - 15.0).abs() < f64::EPSILON);
    assert!((position.y - 20.0).abs() < f64::EPSILON);
}

// ============================================================================
// PROPERTY 2: POOL DENSITY
// ============================================================================

#[test]
fn verify_pool_density() {
    let mut registry = Registry::new();
    let entities: Vec<Entity> = (0..64).map(|_| registry.create_entity()).collect();
    let mut expected: HashMap<Entity, u32> = HashMap::new();
    let mut seq = Sequence(42);

    for round in 0..2_000u32 {
        let entity = entities[(seq.next() as usize) % entities.len()];
        if seq.next() % 3 == 0 {
            let removed = registry.remove_component::<Armor>(entity);
            assert_eq!(removed.map(|armor| armor.0), expected.remove(&entity));
        } else {
            registry.add_component(entity, Armor(round));
            expected.insert(entity, round);
        }

        assert_eq!(registry.components().pool_len::<Armor>(), expected.len());
        if let Some(pool) = registry.components().pool::<Armor>() {
            assert_eq!(pool.entities().len(), pool.values().len());
        }
    }

    for (entity, value) in &expected {
        assert_eq!(registry.get_component::<Armor>(*entity), &Armor(*value));
    }
}

// ============================================================================
// PROPERTY 3: ID REUSE
// ============================================================================

#[test]
fn verify_fifo_id_reuse() {
    let mut registry = Registry::new();
    let entities: Vec<Entity> = (0..10).map(|_| registry.create_entity()).collect();
    registry.update();

    registry.kill_entity(entities[4]);
    registry.update();
    assert_eq!(registry.create_entity(), entities[4]);

    registry.kill_entity(entities[7]);
    registry.kill_entity(entities[1]);
    registry.update();
    // Ids are released in ascending order within one barrier.
    assert_eq!(registry.create_entity(), entities[1]);
    assert_eq!(registry.create_entity(), entities[7]);
    assert_eq!(registry.create_entity().id(), 10);
}

// ============================================================================
// PROPERTY 4: CREATE-THEN-KILL IN ONE FRAME
// ============================================================================

#[test]
fn verify_create_then_kill_same_frame() {
    let mut registry = Registry::new();
    register_all(&mut registry);

    let entity = registry.create_entity();
    registry.add_component(entity, Position { x: 1.0, y: 1.0 });
    registry.add_component(entity, Velocity { dx: 0.0, dy: 0.0 });
    registry.add_component(entity, Armor(3));
    registry.tag(entity, "doomed");
    registry.kill_entity(entity);

    assert_eq!(registry.components().pool_len::<Armor>(), 1);
    registry.update();

    assert!(!registry.is_alive(entity));
    assert_eq!(registry.components().pool_len::<Position>(), 0);
    assert_eq!(registry.components().pool_len::<Velocity>(), 0);
    assert_eq!(registry.components().pool_len::<Armor>(), 0);
    assert!(registry.entity_by_tag("doomed").is_none());
    assert_membership_matches(&registry);
    assert_eq!(registry.create_entity(), entity);
}

// ============================================================================
// PROPERTY 5: EVENTS
// ============================================================================

struct Explosion {
    radius: u32,
}
impl Event for Explosion {}

#[test]
fn verify_event_fan_out_and_reset() {
    let mut registry = Registry::new();
    let mut bus = EventBus::new();
    let log: Rc<RefCell<Vec<(&'static str, u32)>>> = Rc::new(RefCell::new(Vec::new()));

    for name in ["h1", "h2", "h3"] {
        let log = Rc::clone(&log);
        bus.subscribe::<Explosion, _>(move |_, event| log.borrow_mut().push((name, event.radius)));
    }

    bus.emit(&mut registry, Explosion { radius: 4 });
    assert_eq!(*log.borrow(), vec![("h1", 4), ("h2", 4), ("h3", 4)]);

    bus.reset();
    bus.emit(&mut registry, Explosion { radius: 9 });
    assert_eq!(log.borrow().len(), 3);
}

// ============================================================================
// TAGS
// ============================================================================

#[test]
fn verify_player_tag_overwrite() {
    let mut registry = Registry::new();
    let a = registry.create_entity();
    let b = registry.create_entity();

    registry.tag(a, "player");
    assert_eq!(registry.entity_by_tag("player"), Some(a));

    registry.tag(b, "player");
    assert_eq!(registry.entity_by_tag("player"), Some(b));
    assert!(!registry.has_tag(a, "player"));
    assert!(registry.tag_of(a).is_none());
}
