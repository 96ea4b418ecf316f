//! Synchronous, typed publish/subscribe.
//!
//! Bevy's buffered events are read a frame later by whichever system asks
//! for them. The simulation needs something stricter: a publish call runs
//! every current subscriber to completion before it returns, in the order
//! they subscribed, and one failing subscriber never starves the rest.
//!
//! Handlers get `&mut World`, so they can mutate registries and publish
//! follow-up events. Nested publishes are bounded by [`MAX_PUBLISH_DEPTH`],
//! and a handler that is already running is skipped by any nested publish
//! of its own topic instead of being re-entered.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};

use bevy::prelude::*;

use super::error::SimError;
use super::events::Topic;

/// Deepest allowed chain of publishes issued from inside handlers.
pub const MAX_PUBLISH_DEPTH: u32 = 8;

pub type HandlerResult = Result<(), SimError>;

type Handler<T> = Box<dyn FnMut(&mut World, &T) -> HandlerResult + Send + Sync>;

/// Capability returned by [`EventBus::subscribe`]; hand it back to
/// [`EventBus::unsubscribe`] to stop receiving events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId {
    topic: TypeId,
    serial: u64,
}

struct Slot {
    serial: u64,
    /// `None` while the handler is being invoked.
    handler: Option<Box<dyn Any + Send + Sync>>,
}

/// Process-wide subscriber table.
#[derive(Resource, Default)]
pub struct EventBus {
    next_serial: u64,
    topics: HashMap<TypeId, Vec<Slot>>,
    depth: u32,
}

impl EventBus {
    /// Register `handler` for topic `T`. Subscribers added while an event is
    /// being dispatched do not receive that event.
    pub fn subscribe<T, F>(&mut self, handler: F) -> SubscriptionId
    where
        T: Topic,
        F: FnMut(&mut World, &T) -> HandlerResult + Send + Sync + 'static,
    {
        self.next_serial += 1;
        let serial = self.next_serial;
        let boxed: Handler<T> = Box::new(handler);

        self.topics.entry(TypeId::of::<T>()).or_default().push(Slot {
            serial,
            handler: Some(Box::new(boxed)),
        });
        debug!("Subscribed #{} to {}", serial, T::NAME);

        SubscriptionId {
            topic: TypeId::of::<T>(),
            serial,
        }
    }

    /// Remove a subscription. Safe to call from inside a handler, including
    /// the handler being removed. Returns false if it was already gone.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let Some(slots) = self.topics.get_mut(&id.topic) else {
            return false;
        };
        let before = slots.len();
        slots.retain(|slot| slot.serial != id.serial);
        slots.len() != before
    }

    pub fn subscriber_count<T: Topic>(&self) -> usize {
        self.topics.get(&TypeId::of::<T>()).map_or(0, Vec::len)
    }

    /// Current publish nesting depth (0 outside of any dispatch).
    pub fn depth(&self) -> u32 {
        self.depth
    }

    fn snapshot(&self, topic: TypeId) -> Vec<u64> {
        self.topics
            .get(&topic)
            .map(|slots| slots.iter().map(|slot| slot.serial).collect())
            .unwrap_or_default()
    }

    fn take<T: Topic>(&mut self, serial: u64) -> Option<Handler<T>> {
        let slot = self
            .topics
            .get_mut(&TypeId::of::<T>())?
            .iter_mut()
            .find(|slot| slot.serial == serial)?;
        let handler = slot.handler.take()?;
        handler.downcast::<Handler<T>>().ok().map(|boxed| *boxed)
    }

    fn restore<T: Topic>(&mut self, serial: u64, handler: Handler<T>) {
        let slot = self
            .topics
            .get_mut(&TypeId::of::<T>())
            .and_then(|slots| slots.iter_mut().find(|slot| slot.serial == serial));

        // A missing slot means the handler was unsubscribed while it ran.
        if let Some(slot) = slot {
            slot.handler = Some(Box::new(handler));
        }
    }
}

/// Deliver `event` to every subscriber of `T`. Returns how many handlers
/// completed without error.
pub fn dispatch<T: Topic>(world: &mut World, event: &T) -> usize {
    let serials = {
        let Some(mut bus) = world.get_resource_mut::<EventBus>() else {
            warn!("{} published but no EventBus exists", T::NAME);
            return 0;
        };
        if bus.depth >= MAX_PUBLISH_DEPTH {
            warn!(
                "Dropping {}: publish nesting reached {}",
                T::NAME,
                MAX_PUBLISH_DEPTH
            );
            return 0;
        }
        bus.depth += 1;
        bus.snapshot(TypeId::of::<T>())
    };

    let mut delivered = 0;
    for serial in serials {
        let Some(mut handler) = world
            .get_resource_mut::<EventBus>()
            .and_then(|mut bus| bus.take::<T>(serial))
        else {
            continue;
        };

        match panic::catch_unwind(AssertUnwindSafe(|| handler(world, event))) {
            Ok(Ok(())) => delivered += 1,
            Ok(Err(err)) => warn!("{} subscriber #{} failed: {}", T::NAME, serial, err),
            Err(_) => error!("{} subscriber #{} panicked", T::NAME, serial),
        }

        if let Some(mut bus) = world.get_resource_mut::<EventBus>() {
            bus.restore(serial, handler);
        }
    }

    if let Some(mut bus) = world.get_resource_mut::<EventBus>() {
        bus.depth = bus.depth.saturating_sub(1);
    }
    delivered
}

/// `world.publish(event)` for exclusive contexts (handlers, tests, commands).
pub trait PublishExt {
    fn publish<T: Topic>(&mut self, event: T) -> usize;
}

impl PublishExt for World {
    fn publish<T: Topic>(&mut self, event: T) -> usize {
        dispatch(self, &event)
    }
}

/// `commands.publish(event)` for ordinary systems. Delivery happens when the
/// command queue is applied.
pub trait PublishCommandsExt {
    fn publish<T: Topic>(&mut self, event: T);
}

impl PublishCommandsExt for Commands<'_, '_> {
    fn publish<T: Topic>(&mut self, event: T) {
        self.queue(move |world: &mut World| {
            dispatch(world, &event);
        });
    }
}

/// Subscriptions owned by an entity. Removing the component (or despawning
/// the entity) unsubscribes all of them.
#[derive(Component, Debug, Default)]
pub struct BusSubscription(pub Vec<SubscriptionId>);

/// Observer that releases an entity's subscriptions on teardown.
pub fn release_subscriptions(
    trigger: Trigger<OnRemove, BusSubscription>,
    query: Query<&BusSubscription>,
    bus: Option<ResMut<EventBus>>,
) {
    let (Ok(subscriptions), Some(mut bus)) = (query.get(trigger.entity()), bus) else {
        return;
    };
    for id in &subscriptions.0 {
        bus.unsubscribe(*id);
    }
}
