//! # Event Bus
//!
//! One handler list per event type, keyed by [`TypeId`].
//!
//! Dispatch rules:
//! - Handlers for a type run in subscription order, each receiving the same
//!   event value by `&mut`, so later handlers see earlier handlers' writes
//! - The handler list is snapshotted when `publish` starts: a subscription
//!   made during dispatch is first called on the next `publish`, while an
//!   unsubscription takes effect immediately
//! - Handlers may publish again; nesting depth is bounded only by handler logic

use std::any::{type_name, Any, TypeId};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::rc::{Rc, Weak};

/// Marker trait for event types.
///
/// Events are plain values. Anything a handler needs beyond the payload
/// (registry, assets) arrives through the bus context instead.
pub trait Event: 'static {}

/// Handle returned by a subscription, used to unsubscribe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    /// The raw id.
    #[inline]
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub#{}", self.0)
    }
}

/// Type-erased handler. Returns `false` if its owner has been dropped.
type Handler<C> = Rc<dyn Fn(&mut dyn Any, &EventBus<C>, &mut C) -> bool>;

struct Subscription<C> {
    id: SubscriptionId,
    active: Rc<Cell<bool>>,
    handler: Handler<C>,
}

/// Synchronous event dispatcher.
///
/// `C` is the context passed to every handler alongside the event, for
/// example `galactic_ecs::Registry`. The bus is single-threaded and every
/// method takes `&self`, so handlers can subscribe, unsubscribe and publish
/// through the bus reference they are given.
pub struct EventBus<C> {
    subscribers: RefCell<HashMap<TypeId, Vec<Subscription<C>>>>,
    next_id: Cell<u64>,
}

impl<C: 'static> EventBus<C> {
    /// Creates a bus with no subscribers.
    #[must_use]
    pub fn new() -> Self {
        Self {
            subscribers: RefCell::new(HashMap::new()),
            next_id: Cell::new(0),
        }
    }

    /// Subscribes `method` on `owner` to events of type `E`.
    ///
    /// The bus keeps only a weak reference to `owner`. Once the owner is
    /// dropped its handler is skipped and the subscription removed.
    ///
    /// Handlers take the owner by shared reference, so dispatch may route
    /// back into the same owner while it is still handling an event. Owners
    /// keep mutable state in `Cell`/`RefCell` fields and hold borrows only
    /// around the state update, never across a nested `publish`.
    ///
    /// # Arguments
    ///
    /// * `owner` - Object the handler runs against
    /// * `method` - Handler, usually a method path such as `Hull::on_damage`
    pub fn subscribe<O, E>(
        &self,
        owner: &Rc<O>,
        method: fn(&O, &mut E, &EventBus<C>, &mut C),
    ) -> SubscriptionId
    where
        O: 'static,
        E: Event,
    {
        let owner: Weak<O> = Rc::downgrade(owner);
        let handler: Handler<C> = Rc::new(move |event: &mut dyn Any, bus: &EventBus<C>, ctx: &mut C| {
            let Some(target) = owner.upgrade() else {
                return false;
            };
            method(&target, downcast::<E>(event), bus, ctx);
            true
        });
        self.insert::<E>(handler, type_name::<O>())
    }

    /// Subscribes a free-standing closure to events of type `E`.
    ///
    /// The closure lives as long as the subscription.
    pub fn subscribe_fn<E, F>(&self, handler: F) -> SubscriptionId
    where
        E: Event,
        F: Fn(&mut E, &EventBus<C>, &mut C) + 'static,
    {
        let handler: Handler<C> = Rc::new(move |event: &mut dyn Any, bus: &EventBus<C>, ctx: &mut C| {
            handler(downcast::<E>(event), bus, ctx);
            true
        });
        self.insert::<E>(handler, "closure")
    }

    /// Removes a subscription. Returns `false` if `id` was not subscribed.
    ///
    /// If called from a handler, the removed handler is not invoked for the
    /// rest of the current dispatch either.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscribers = self.subscribers.borrow_mut();
        for list in subscribers.values_mut() {
            if let Some(position) = list.iter().position(|sub| sub.id == id) {
                let sub = list.remove(position);
                sub.active.set(false);
                tracing::debug!(subscription = %id, "unsubscribed");
                return true;
            }
        }
        false
    }

    /// Delivers `event` to every subscriber of `E` and returns it.
    ///
    /// Publishing a type nobody subscribes to does nothing.
    pub fn publish<E: Event>(&self, ctx: &mut C, mut event: E) -> E {
        let snapshot: Vec<(SubscriptionId, Rc<Cell<bool>>, Handler<C>)> =
            match self.subscribers.borrow().get(&TypeId::of::<E>()) {
                Some(list) => list
                    .iter()
                    .map(|sub| (sub.id, Rc::clone(&sub.active), Rc::clone(&sub.handler)))
                    .collect(),
                None => Vec::new(),
            };

        tracing::trace!(
            event = type_name::<E>(),
            subscribers = snapshot.len(),
            "publishing"
        );

        let mut orphaned = Vec::new();
        for (id, active, handler) in &snapshot {
            if !active.get() {
                continue;
            }
            let erased: &mut dyn Any = &mut event;
            if !handler(erased, self, &mut *ctx) {
                orphaned.push(*id);
            }
        }

        for id in orphaned {
            if self.unsubscribe(id) {
                tracing::trace!(subscription = %id, event = type_name::<E>(), "pruned dropped owner");
            }
        }

        event
    }

    /// Number of subscriptions for events of type `E`, including ones whose
    /// owner has been dropped but not yet pruned.
    #[must_use]
    pub fn subscriber_count<E: Event>(&self) -> usize {
        self.subscribers
            .borrow()
            .get(&TypeId::of::<E>())
            .map_or(0, Vec::len)
    }

    /// Removes every subscription.
    pub fn clear(&self) {
        let mut subscribers = self.subscribers.borrow_mut();
        for sub in subscribers.values().flatten() {
            sub.active.set(false);
        }
        subscribers.clear();
        tracing::debug!("event bus cleared");
    }

    fn insert<E: Event>(&self, handler: Handler<C>, owner: &'static str) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.get());
        self.next_id.set(id.0 + 1);

        self.subscribers
            .borrow_mut()
            .entry(TypeId::of::<E>())
            .or_default()
            .push(Subscription {
                id,
                active: Rc::new(Cell::new(true)),
                handler,
            });

        tracing::debug!(subscription = %id, event = type_name::<E>(), owner, "subscribed");
        id
    }
}

impl<C: 'static> Default for EventBus<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> fmt::Debug for EventBus<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let subscribers = self.subscribers.borrow();
        f.debug_struct("EventBus")
            .field("event_types", &subscribers.len())
            .field(
                "subscriptions",
                &subscribers.values().map(Vec::len).sum::<usize>(),
            )
            .finish()
    }
}

fn downcast<E: Event>(event: &mut dyn Any) -> &mut E {
    match event.downcast_mut::<E>() {
        Some(event) => event,
        None => unreachable!("handler for {} received another event type", type_name::<E>()),
    }
}
