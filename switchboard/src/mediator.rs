//! One object holding both channels.
//!
//! Subscribers frequently handle events and requests at once. [`Mediator`] owns an
//! [`EventChannel`] and a [`RequestChannel`] so such a subscriber is wired up, and torn down, with
//! one call. Either channel stays reachable for type-scoped work.

use std::{cell::RefCell, rc::Rc};

use log::debug;

use crate::{
    error::Result,
    event::{Event, EventChannel, EventSubscriber},
    request::{Normalized, Request, RequestChannel, RequestConfig, RequestSubscriber},
    types::SubscriberId,
};

/// An event channel and a request channel behind one front.
#[derive(Default)]
pub struct Mediator {
    events: EventChannel,
    requests: RequestChannel,
}

impl Mediator {
    pub fn new() -> Self {
        Self::with_config(RequestConfig::default())
    }

    /// Creates a mediator whose request channel uses `config`.
    pub fn with_config(config: RequestConfig) -> Self {
        Self {
            events: EventChannel::new(),
            requests: RequestChannel::with_config(config),
        }
    }

    pub fn events(&self) -> &EventChannel {
        &self.events
    }

    pub fn events_mut(&mut self) -> &mut EventChannel {
        &mut self.events
    }

    pub fn requests(&self) -> &RequestChannel {
        &self.requests
    }

    pub fn requests_mut(&mut self) -> &mut RequestChannel {
        &mut self.requests
    }

    /// Subscribes to every declared event type and claims every declared request type.
    ///
    /// The event subscription always happens; the result reports the request claims only.
    pub fn subscribe<S>(&mut self, subscriber: &Rc<RefCell<S>>) -> Result<()>
    where
        S: EventSubscriber + RequestSubscriber,
    {
        debug!("{:?} joining mediator", SubscriberId::of(subscriber));
        self.events.subscribe(subscriber);
        self.requests.subscribe(subscriber)
    }

    /// Undoes [`subscribe`](Self::subscribe).
    pub fn unsubscribe<S>(&mut self, subscriber: &Rc<RefCell<S>>)
    where
        S: EventSubscriber + RequestSubscriber,
    {
        self.events.unsubscribe(subscriber);
        self.requests.unsubscribe(subscriber);
    }

    /// Fans `event` out to its subscribers.
    pub fn publish<E: Event>(&self, event: &E) {
        self.events.dispatch(event);
    }

    /// Sends `request` to its owner.
    pub fn send<R: Request>(&self, request: &R) -> Normalized<R> {
        self.requests.dispatch(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Error, Event, HandleEvent, HandleRequest, Request, RoutingKey, Subscriber};

    #[derive(Event)]
    struct Ping;

    #[derive(Request)]
    #[reply(i32)]
    struct Echo {
        data: i32,
    }

    #[derive(Default, Subscriber)]
    #[events(Ping)]
    #[requests(Echo)]
    struct Both {
        pings: u32,
        echoes: u32,
    }

    impl HandleEvent<Ping> for Both {
        fn handle_event(&mut self, _event: &Ping) {
            self.pings += 1;
        }
    }

    impl HandleRequest<Echo> for Both {
        fn handle_request(&mut self, request: &Echo) -> i32 {
            self.echoes += 1;
            request.data
        }
    }

    #[test]
    fn ping_and_echo_round_trip() {
        // Given
        let subscriber = Rc::new(RefCell::new(Both::default()));
        let mut mediator = Mediator::new();

        // When
        mediator.subscribe(&subscriber).unwrap();
        mediator.publish(&Ping);
        let echoed = mediator.send(&Echo { data: 42 });

        // Then
        assert_eq!(subscriber.borrow().pings, 1);
        assert_eq!(echoed, Some(42));
    }

    #[test]
    fn unsubscribe_silences_both_channels() {
        // Given
        let subscriber = Rc::new(RefCell::new(Both::default()));
        let mut mediator = Mediator::new();
        mediator.subscribe(&subscriber).unwrap();

        // When
        mediator.unsubscribe(&subscriber);
        mediator.publish(&Ping);
        let echoed = mediator.send(&Echo { data: 42 });

        // Then
        assert_eq!(subscriber.borrow().pings, 0);
        assert_eq!(subscriber.borrow().echoes, 0);
        assert_eq!(echoed, None);
    }

    #[test]
    fn events_subscribe_even_when_claim_fails() {
        // Given
        let first = Rc::new(RefCell::new(Both::default()));
        let second = Rc::new(RefCell::new(Both::default()));
        let mut mediator = Mediator::new();
        mediator.subscribe(&first).unwrap();

        // When
        let result = mediator.subscribe(&second);
        mediator.publish(&Ping);
        mediator.send(&Echo { data: 1 });

        // Then
        assert_eq!(result, Err(Error::AlreadyClaimed(vec![RoutingKey::of::<Echo>()])));
        assert_eq!(second.borrow().pings, 1);
        assert_eq!(second.borrow().echoes, 0);
        assert_eq!(first.borrow().echoes, 1);
    }

    #[test]
    fn channels_are_reachable_for_scoped_work() {
        let subscriber = Rc::new(RefCell::new(Both::default()));
        let mut mediator = Mediator::new();

        mediator.events_mut().subscribe_to::<Ping, _>(&subscriber);

        assert!(mediator.events().is_subscribed::<Ping, _>(&subscriber));
        assert!(!mediator.requests().is_claimed::<Echo>());
        assert!(!mediator.requests_mut().release::<Echo>());
    }
}
