//! Type-routed events and requests for in-process messaging.
//!
//! `switchboard` lets producers emit typed messages without knowing who, if anyone, consumes
//! them. Consumers declare at compile time which message types they handle, and the channels only
//! ever call a subscriber with a type it declared.
//!
//! # Channels
//!
//! - [`EventChannel`]: fan-out. Any number of subscribers per event type, invoked in registration
//!   order, nothing returned.
//! - [`RequestChannel`]: single owner. At most one subscriber per request type; dispatch returns
//!   the owner's reply normalized through [`Reply`], or the reply's absent form if nobody owns the
//!   type.
//! - [`Mediator`]: both channels behind one front.
//!
//! # Declaring Subscribers
//!
//! A subscriber implements [`HandleEvent<E>`] / [`HandleRequest<R>`] once per type and lists those
//! types with `#[derive(Subscriber)]`. The derive rejects a type listed twice at compile time.
//!
//! ```rust
//! use std::{cell::RefCell, rc::Rc};
//!
//! use switchboard::{Event, HandleEvent, HandleRequest, Mediator, Request, Subscriber};
//!
//! #[derive(Event)]
//! struct Ping;
//!
//! #[derive(Request)]
//! #[reply(i32)]
//! struct Echo {
//!     data: i32,
//! }
//!
//! #[derive(Subscriber, Default)]
//! #[events(Ping)]
//! #[requests(Echo)]
//! struct Service {
//!     pings: u32,
//! }
//!
//! impl HandleEvent<Ping> for Service {
//!     fn handle_event(&mut self, _event: &Ping) {
//!         self.pings += 1;
//!     }
//! }
//!
//! impl HandleRequest<Echo> for Service {
//!     fn handle_request(&mut self, request: &Echo) -> i32 {
//!         request.data
//!     }
//! }
//!
//! let service = Rc::new(RefCell::new(Service::default()));
//! let mut mediator = Mediator::new();
//! mediator.subscribe(&service).unwrap();
//!
//! mediator.publish(&Ping);
//! assert_eq!(service.borrow().pings, 1);
//! assert_eq!(mediator.send(&Echo { data: 42 }), Some(42));
//!
//! mediator.unsubscribe(&service);
//! assert_eq!(mediator.send(&Echo { data: 42 }), None);
//! ```
//!
//! Listing a type twice does not compile:
//!
//! ```compile_fail
//! use switchboard::{Event, HandleEvent, Subscriber};
//!
//! #[derive(Event)]
//! struct Ping;
//!
//! #[derive(Subscriber)]
//! #[events(Ping, Ping)]
//! struct Twice;
//!
//! impl HandleEvent<Ping> for Twice {
//!     fn handle_event(&mut self, _event: &Ping) {}
//! }
//! ```
//!
//! Neither does a declared type without a handler:
//!
//! ```compile_fail
//! use switchboard::{Event, Subscriber};
//!
//! #[derive(Event)]
//! struct Ping;
//!
//! #[derive(Subscriber)]
//! #[events(Ping)]
//! struct Deaf;
//! ```
//!
//! A handler alone is not a declaration. Type-scoped subscriptions only take declared types:
//!
//! ```compile_fail
//! use std::{cell::RefCell, rc::Rc};
//!
//! use switchboard::{Event, EventChannel, HandleEvent, Subscriber};
//!
//! #[derive(Event)]
//! struct Declared;
//!
//! #[derive(Event)]
//! struct NotDeclared;
//!
//! #[derive(Subscriber)]
//! #[events(Declared)]
//! struct Listener;
//!
//! impl HandleEvent<Declared> for Listener {
//!     fn handle_event(&mut self, _event: &Declared) {}
//! }
//!
//! impl HandleEvent<NotDeclared> for Listener {
//!     fn handle_event(&mut self, _event: &NotDeclared) {}
//! }
//!
//! let listener = Rc::new(RefCell::new(Listener));
//! EventChannel::new().subscribe_to::<NotDeclared, _>(&listener);
//! ```
//!
//! ```compile_fail
//! use std::{cell::RefCell, rc::Rc};
//!
//! use switchboard::{HandleRequest, Request, RequestChannel, Subscriber};
//!
//! #[derive(Request)]
//! struct Declared;
//!
//! #[derive(Request)]
//! struct NotDeclared;
//!
//! #[derive(Subscriber)]
//! #[requests(Declared)]
//! struct Owner;
//!
//! impl HandleRequest<Declared> for Owner {
//!     fn handle_request(&mut self, _request: &Declared) {}
//! }
//!
//! impl HandleRequest<NotDeclared> for Owner {
//!     fn handle_request(&mut self, _request: &NotDeclared) {}
//! }
//!
//! let owner = Rc::new(RefCell::new(Owner));
//! let _ = RequestChannel::new().subscribe_to::<NotDeclared, _>(&owner);
//! ```
//!
//! `assert_unique_types!` runs the same duplicate check over any list of types:
//!
//! ```rust
//! switchboard::assert_unique_types!(u8, u16, String);
//! ```
//!
//! ```compile_fail
//! switchboard::assert_unique_types!(u8, String, u8);
//! ```
//!
//! # Ownership
//!
//! Subscribers are owned by the caller as `Rc<RefCell<S>>`. Channels keep `Weak` handles, so they
//! never keep a subscriber alive, and channels are `!Send`: one channel serves one thread.

// The derive macros emit `::switchboard::...` paths; this lets them resolve inside the crate too.
extern crate self as switchboard;

pub mod error;
pub mod event;
pub mod logging;
pub mod mediator;
pub mod reply;
pub mod request;
pub mod types;
pub(crate) mod util;

pub use error::{Error, Result};
pub use event::{DeclaresEvent, Event, EventChannel, EventSet, EventSubscriber, HandleEvent};
pub use logging::{ChannelLogger, LogMessage};
pub use mediator::Mediator;
pub use reply::{NoSubscriber, Reply, ReplyKind};
pub use request::{
    ClaimPolicy, DeclaresRequest, HandleRequest, Normalized, ReleasePolicy, Request,
    RequestChannel, RequestConfig, RequestSet, RequestSubscriber,
};
pub use types::{RoutingKey, SubscriberId, ensure_unique};

pub use switchboard_macros::{Event, NoSubscriber, Reply, Request, Subscriber, assert_unique_types};
