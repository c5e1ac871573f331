//! Event bus: handler lists indexed by event type.

use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;

use super::Event;
use crate::ecs::{Registry, System};

/// Type-erased handler. The payload is downcast back to its event type.
type Handler = Box<dyn FnMut(&mut Registry, &mut dyn Any)>;

/// Frame-scoped event bus.
///
/// Handlers receive the registry alongside the event, so they can read
/// and mutate components, tag lookups and kill entities. Emitting an
/// event nobody subscribed to is a no-op.
#[derive(Default)]
pub struct EventBus {
    /// Handlers per event type, in subscription order.
    handlers: HashMap<TypeId, Vec<Handler>>,
}

impl EventBus {
    /// Creates a bus with no subscriptions.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops every subscription.
    pub fn reset(&mut self) {
        self.handlers.clear();
    }

    /// Subscribes a free-standing handler to `E`.
    ///
    /// Subscribing twice means two invocations per emission.
    pub fn subscribe<E, F>(&mut self, mut handler: F)
    where
        E: Event,
        F: FnMut(&mut Registry, &mut E) + 'static,
    {
        tracing::trace!("handler subscribed to {}", type_name::<E>());
        self.handlers
            .entry(TypeId::of::<E>())
            .or_default()
            .push(Box::new(move |registry: &mut Registry, payload: &mut dyn Any| {
                if let Some(event) = payload.downcast_mut::<E>() {
                    handler(registry, event);
                }
            }));
    }

    /// Subscribes a method of the registry-owned system `S` to `E`.
    ///
    /// The system is looked up by type at emission time and lent out
    /// for the call. If `S` is no longer registered, or is the system
    /// currently running and emitting, the handler is skipped.
    pub fn subscribe_system<E, S>(&mut self, handler: fn(&mut S, &mut Registry, &mut E))
    where
        E: Event,
        S: System,
    {
        tracing::trace!(
            "{} subscribed to {}",
            type_name::<S>(),
            type_name::<E>()
        );
        self.handlers
            .entry(TypeId::of::<E>())
            .or_default()
            .push(Box::new(move |registry: &mut Registry, payload: &mut dyn Any| {
                let Some(event) = payload.downcast_mut::<E>() else {
                    return;
                };
                if registry
                    .try_run_system::<S, _>(|system, registry| handler(system, registry, event))
                    .is_err()
                {
                    tracing::warn!(
                        "{} dropped: subscriber {} is not registered or is running",
                        type_name::<E>(),
                        type_name::<S>()
                    );
                }
            }));
    }

    /// Delivers `event` to every handler of its type, in subscription order.
    ///
    /// Returns the event after all handlers had their chance to mutate it.
    pub fn emit<E: Event>(&mut self, registry: &mut Registry, mut event: E) -> E {
        if let Some(handlers) = self.handlers.get_mut(&TypeId::of::<E>()) {
            tracing::trace!(
                "emitting {} to {} handler(s)",
                type_name::<E>(),
                handlers.len()
            );
            for handler in handlers.iter_mut() {
                handler(registry, &mut event);
            }
        }
        event
    }

    /// Number of handlers subscribed to `E`.
    #[must_use]
    pub fn handler_count<E: Event>(&self) -> usize {
        self.handlers.get(&TypeId::of::<E>()).map_or(0, Vec::len)
    }

    /// Returns `true` if nothing is subscribed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.values().all(Vec::is_empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::{Component, SystemCore};
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Ping(u32);
    impl Event for Ping {}

    struct Pong;
    impl Event for Pong {}

    struct Hits(u32);
    impl Component for Hits {}

    struct Counter {
        core: SystemCore,
        seen: Vec<u32>,
    }

    impl Counter {
        fn on_ping(&mut self, _registry: &mut Registry, event: &mut Ping) {
            self.seen.push(event.0);
        }
    }

    impl System for Counter {
        fn core(&self) -> &SystemCore {
            &self.core
        }
        fn core_mut(&mut self) -> &mut SystemCore {
            &mut self.core
        }
    }

    fn recorder(log: &Rc<RefCell<Vec<(u8, u32)>>>, name: u8) -> impl FnMut(&mut Registry, &mut Ping) {
        let log = Rc::clone(log);
        move |_: &mut Registry, event: &mut Ping| log.borrow_mut().push((name, event.0))
    }

    #[test]
    fn test_fan_out_in_subscription_order() {
        let mut registry = Registry::new();
        let mut bus = EventBus::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        bus.subscribe(recorder(&log, 1));
        bus.subscribe(recorder(&log, 2));
        bus.subscribe(recorder(&log, 3));
        bus.emit(&mut registry, Ping(9));

        assert_eq!(*log.borrow(), vec![(1, 9), (2, 9), (3, 9)]);
    }

    #[test]
    fn test_reset_clears_subscriptions() {
        let mut registry = Registry::new();
        let mut bus = EventBus::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        bus.subscribe(recorder(&log, 1));
        bus.reset();
        assert!(bus.is_empty());
        bus.emit(&mut registry, Ping(1));
        assert!(log.borrow().is_empty());

        bus.subscribe(recorder(&log, 2));
        bus.emit(&mut registry, Ping(2));
        assert_eq!(*log.borrow(), vec![(2, 2)]);
    }

    #[test]
    fn test_double_subscription_runs_twice() {
        let mut registry = Registry::new();
        let mut bus = EventBus::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        bus.subscribe(recorder(&log, 1));
        bus.subscribe(recorder(&log, 1));
        assert_eq!(bus.handler_count::<Ping>(), 2);

        bus.emit(&mut registry, Ping(5));
        assert_eq!(log.borrow().len(), 2);
    }

    #[test]
    fn test_emit_without_subscribers_is_noop() {
        let mut registry = Registry::new();
        let mut bus = EventBus::new();
        bus.subscribe::<Ping, _>(|_, _| panic!("wrong event type"));

        let _ = bus.emit(&mut registry, Pong);
        assert_eq!(bus.handler_count::<Pong>(), 0);
    }

    #[test]
    fn test_handlers_mutate_event_and_registry() {
        let mut registry = Registry::new();
        let target = registry.create_entity();
        registry.add_component(target, Hits(0));

        let mut bus = EventBus::new();
        bus.subscribe::<Ping, _>(move |registry, event| {
            registry.get_component_mut::<Hits>(target).0 += event.0;
            event.0 *= 2;
        });
        bus.subscribe::<Ping, _>(|_, event| event.0 += 1);

        let event = bus.emit(&mut registry, Ping(3));
        assert_eq!(event.0, 7);
        assert_eq!(registry.get_component::<Hits>(target).0, 3);
    }

    #[test]
    fn test_system_handlers() {
        let mut registry = Registry::new();
        registry.add_system(Counter {
            core: SystemCore::new(),
            seen: Vec::new(),
        });

        let mut bus = EventBus::new();
        bus.subscribe_system::<Ping, Counter>(Counter::on_ping);
        bus.emit(&mut registry, Ping(1));
        bus.emit(&mut registry, Ping(2));
        assert_eq!(registry.get_system::<Counter>().seen, vec![1, 2]);

        registry.remove_system::<Counter>();
        bus.emit(&mut registry, Ping(3));
        assert!(!registry.has_system::<Counter>());
    }

    #[test]
    fn test_system_emitting_its_own_event_is_skipped() {
        let mut registry = Registry::new();
        registry.add_system(Counter {
            core: SystemCore::new(),
            seen: Vec::new(),
        });

        let mut bus = EventBus::new();
        bus.subscribe_system::<Ping, Counter>(Counter::on_ping);
        let event = registry.run_system::<Counter, _>(|counter, registry| {
            counter.seen.push(0);
            bus.emit(registry, Ping(1))
        });
        assert_eq!(event.0, 1);
        assert_eq!(registry.get_system::<Counter>().seen, vec![0]);

        bus.emit(&mut registry, Ping(2));
        assert_eq!(registry.get_system::<Counter>().seen, vec![0, 2]);
    }
}
