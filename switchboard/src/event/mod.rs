//! Events: fire-and-forget messages fanned out to every subscriber.
//!
//! An event type is any `'static` type implementing the [`Event`] marker. Subscribers implement
//! [`HandleEvent<E>`] once per event type they handle and list those types in
//! [`EventSubscriber::Events`], which is what [`EventChannel::subscribe`] registers.
//!
//! # Example
//!
//! ```rust
//! use std::{cell::RefCell, rc::Rc};
//!
//! use switchboard::{Event, EventChannel, HandleEvent, Subscriber};
//!
//! #[derive(Event)]
//! struct Ping;
//!
//! #[derive(Subscriber, Default)]
//! #[events(Ping)]
//! struct Counter {
//!     pings: u32,
//! }
//!
//! impl HandleEvent<Ping> for Counter {
//!     fn handle_event(&mut self, _event: &Ping) {
//!         self.pings += 1;
//!     }
//! }
//!
//! let counter = Rc::new(RefCell::new(Counter::default()));
//! let mut events = EventChannel::new();
//!
//! events.subscribe(&counter);
//! events.dispatch(&Ping);
//!
//! assert_eq!(counter.borrow().pings, 1);
//! ```

mod channel;

use std::{cell::RefCell, rc::Rc};

use crate::{all_tuples, types::RoutingKey};

pub use channel::EventChannel;

/// Marker trait for event types.
///
/// Events carry no required shape. Use `#[derive(Event)]` to implement it.
pub trait Event: 'static {}

/// Handles one event type.
pub trait HandleEvent<E: Event> {
    fn handle_event(&mut self, event: &E);
}

/// Marks `E` as one of the event types `Self` declares.
///
/// Type-scoped subscriptions only accept declared types. `#[derive(Subscriber)]` implements this
/// once per type listed in `#[events(...)]`.
pub trait DeclaresEvent<E: Event> {}

/// A subscriber's declared event types.
///
/// `Events` is a single event type or a tuple of them; every listed type must be handled and
/// declared by `Self`. Use `#[derive(Subscriber)]` with `#[events(...)]` to implement it, which also rejects
/// duplicate types at compile time.
pub trait EventSubscriber: Sized + 'static {
    type Events: EventSet<Self>;
}

/// A set of event types that subscriber `S` handles.
///
/// Implemented for every [`Event`] `S` handles and declares, for `()`, and for tuples of sets.
pub trait EventSet<S: 'static>: 'static {
    /// Appends the routing key of each event type in the set, in declaration order.
    fn push_keys(keys: &mut Vec<RoutingKey>);

    #[doc(hidden)]
    fn attach(channel: &mut EventChannel, subscriber: &Rc<RefCell<S>>);

    #[doc(hidden)]
    fn detach(channel: &mut EventChannel, subscriber: &Rc<RefCell<S>>);

    /// Routing keys of the set, in declaration order.
    fn keys() -> Vec<RoutingKey> {
        let mut keys = Vec::new();
        Self::push_keys(&mut keys);
        keys
    }
}

impl<E: Event, S: HandleEvent<E> + DeclaresEvent<E> + 'static> EventSet<S> for E {
    fn push_keys(keys: &mut Vec<RoutingKey>) {
        keys.push(RoutingKey::of::<E>());
    }

    fn attach(channel: &mut EventChannel, subscriber: &Rc<RefCell<S>>) {
        let handler: Rc<RefCell<dyn HandleEvent<E>>> = subscriber.clone();
        channel.attach(Rc::downgrade(&handler));
    }

    fn detach(channel: &mut EventChannel, subscriber: &Rc<RefCell<S>>) {
        channel.detach::<E, S>(subscriber);
    }
}

impl<S: 'static> EventSet<S> for () {
    fn push_keys(_keys: &mut Vec<RoutingKey>) {}

    fn attach(_channel: &mut EventChannel, _subscriber: &Rc<RefCell<S>>) {}

    fn detach(_channel: &mut EventChannel, _subscriber: &Rc<RefCell<S>>) {}
}

macro_rules! tuple_event_set {
    ($($name: ident),*) => {
        impl<Sub: 'static, $($name: EventSet<Sub>),*> EventSet<Sub> for ($($name,)*) {
            fn push_keys(keys: &mut Vec<RoutingKey>) {
                $(<$name as EventSet<Sub>>::push_keys(keys);)*
            }

            fn attach(channel: &mut EventChannel, subscriber: &Rc<RefCell<Sub>>) {
                $(<$name as EventSet<Sub>>::attach(channel, subscriber);)*
            }

            fn detach(channel: &mut EventChannel, subscriber: &Rc<RefCell<Sub>>) {
                $(<$name as EventSet<Sub>>::detach(channel, subscriber);)*
            }
        }
    }
}

all_tuples!(tuple_event_set);
