//! # Galactic Events
//!
//! Synchronous, type-indexed publish/subscribe.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐  publish(ctx, E)  ┌─────────────┐  handler(&mut E, bus, ctx)  ┌─────────────┐
//! │  Publisher  │──────────────────>│  EventBus   │────────────────────────────>│ Subscriber  │
//! └─────────────┘                   └─────────────┘   (in subscription order)   └─────────────┘
//! ```
//!
//! Handlers run on the caller's stack before `publish` returns. Shared state
//! such as the ECS registry is not stored in events or on the bus; it is
//! threaded through every call as the context `C`.
//!
//! ## Example
//!
//! ```rust
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! use galactic_events::{Event, EventBus};
//!
//! struct Damage {
//!     amount: u32,
//! }
//! impl Event for Damage {}
//!
//! #[derive(Default)]
//! struct Hull {
//!     taken: Cell<u32>,
//! }
//!
//! impl Hull {
//!     fn on_damage(&self, event: &mut Damage, _bus: &EventBus<()>, _ctx: &mut ()) {
//!         self.taken.set(self.taken.get() + event.amount);
//!     }
//! }
//!
//! let bus = EventBus::new();
//! let hull = Rc::new(Hull::default());
//! bus.subscribe(&hull, Hull::on_damage);
//!
//! bus.publish(&mut (), Damage { amount: 50 });
//! bus.publish(&mut (), Damage { amount: 30 });
//! assert_eq!(hull.taken.get(), 80);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod bus;

pub use bus::{Event, EventBus, SubscriptionId};
