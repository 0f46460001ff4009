//! Requests: messages with at most one handler and a normalized reply.
//!
//! A request type implements [`Request`], naming its declared reply type. A subscriber handles
//! it through [`HandleRequest<R>`] and lists it in [`RequestSubscriber::Requests`]. The
//! [`RequestChannel`] lets only one subscriber own each request type and returns the owner's
//! reply normalized through [`Reply`] (see [`crate::reply`]).
//!
//! # Example
//!
//! ```rust
//! use std::{cell::RefCell, rc::Rc};
//!
//! use switchboard::{HandleRequest, Request, RequestChannel, Subscriber};
//!
//! #[derive(Request)]
//! #[reply(i32)]
//! struct Echo {
//!     data: i32,
//! }
//!
//! #[derive(Subscriber)]
//! #[requests(Echo)]
//! struct Parrot;
//!
//! impl HandleRequest<Echo> for Parrot {
//!     fn handle_request(&mut self, request: &Echo) -> i32 {
//!         request.data
//!     }
//! }
//!
//! let parrot = Rc::new(RefCell::new(Parrot));
//! let mut requests = RequestChannel::new();
//!
//! assert_eq!(requests.dispatch(&Echo { data: 42 }), None);
//!
//! requests.subscribe(&parrot).unwrap();
//! assert_eq!(requests.dispatch(&Echo { data: 42 }), Some(42));
//! ```

mod channel;
mod config;

use std::{cell::RefCell, rc::Rc};

use crate::{all_tuples, reply::Reply, types::RoutingKey};

pub use channel::RequestChannel;
pub use config::{ClaimPolicy, ReleasePolicy, RequestConfig};

/// A request type and its declared reply.
///
/// Use `#[derive(Request)]`, with `#[reply(T)]` to declare a reply other than `()`.
pub trait Request: 'static {
    /// What the handler returns, before normalization.
    type Reply: Reply;
}

/// The value [`RequestChannel::dispatch`] returns for request `R`.
pub type Normalized<R> = <<R as Request>::Reply as Reply>::Output;

/// Handles one request type.
pub trait HandleRequest<R: Request> {
    fn handle_request(&mut self, request: &R) -> R::Reply;
}

/// Marks `R` as one of the request types `Self` declares.
///
/// Type-scoped claims only accept declared types. `#[derive(Subscriber)]` implements this once
/// per type listed in `#[requests(...)]`.
pub trait DeclaresRequest<R: Request> {}

/// A subscriber's declared request types.
///
/// `Requests` is a single request type or a tuple of them; every listed type must be handled and
/// declared by `Self`. Use `#[derive(Subscriber)]` with `#[requests(...)]` to implement it.
pub trait RequestSubscriber: Sized + 'static {
    type Requests: RequestSet<Self>;
}

/// A set of request types that subscriber `S` handles.
///
/// Implemented for every [`Request`] `S` handles and declares, for `()`, and for tuples of sets.
pub trait RequestSet<S: 'static>: 'static {
    /// Appends the routing key of each request type in the set, in declaration order.
    fn push_keys(keys: &mut Vec<RoutingKey>);

    /// Claims every type in the set that is free, pushing the keys of those that are not.
    #[doc(hidden)]
    fn claim(
        channel: &mut RequestChannel,
        subscriber: &Rc<RefCell<S>>,
        conflicts: &mut Vec<RoutingKey>,
    );

    #[doc(hidden)]
    fn release(channel: &mut RequestChannel, subscriber: &Rc<RefCell<S>>);

    /// Routing keys of the set, in declaration order.
    fn keys() -> Vec<RoutingKey> {
        let mut keys = Vec::new();
        Self::push_keys(&mut keys);
        keys
    }
}

impl<R: Request, S: HandleRequest<R> + DeclaresRequest<R> + 'static> RequestSet<S> for R {
    fn push_keys(keys: &mut Vec<RoutingKey>) {
        keys.push(RoutingKey::of::<R>());
    }

    fn claim(
        channel: &mut RequestChannel,
        subscriber: &Rc<RefCell<S>>,
        conflicts: &mut Vec<RoutingKey>,
    ) {
        let handler: Rc<RefCell<dyn HandleRequest<R>>> = subscriber.clone();
        if !channel.claim(Rc::downgrade(&handler)) {
            conflicts.push(RoutingKey::of::<R>());
        }
    }

    fn release(channel: &mut RequestChannel, subscriber: &Rc<RefCell<S>>) {
        channel.release_from::<R, S>(subscriber);
    }
}

impl<S: 'static> RequestSet<S> for () {
    fn push_keys(_keys: &mut Vec<RoutingKey>) {}

    fn claim(
        _channel: &mut RequestChannel,
        _subscriber: &Rc<RefCell<S>>,
        _conflicts: &mut Vec<RoutingKey>,
    ) {
    }

    fn release(_channel: &mut RequestChannel, _subscriber: &Rc<RefCell<S>>) {}
}

macro_rules! tuple_request_set {
    ($($name: ident),*) => {
        impl<Sub: 'static, $($name: RequestSet<Sub>),*> RequestSet<Sub> for ($($name,)*) {
            fn push_keys(keys: &mut Vec<RoutingKey>) {
                $(<$name as RequestSet<Sub>>::push_keys(keys);)*
            }

            fn claim(
                channel: &mut RequestChannel,
                subscriber: &Rc<RefCell<Sub>>,
                conflicts: &mut Vec<RoutingKey>,
            ) {
                $(<$name as RequestSet<Sub>>::claim(channel, subscriber, conflicts);)*
            }

            fn release(channel: &mut RequestChannel, subscriber: &Rc<RefCell<Sub>>) {
                $(<$name as RequestSet<Sub>>::release(channel, subscriber);)*
            }
        }
    }
}

all_tuples!(tuple_request_set);
