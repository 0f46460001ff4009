//! Fan-out routing for events.
//!
//! [`EventChannel`] maps each event type's [`RoutingKey`] to an ordered list of subscribers.
//! Dispatch walks that list in registration order and hands the event to every live subscriber.
//!
//! # Type Erasure
//!
//! Lists for different event types live in one map as `Box<dyn ErasedListeners>`. The concrete
//! value behind a key is always the `Listeners<E>` of the type the key was derived from, so typed
//! access downcasts the list, never the subscriber.
//!
//! # Ownership
//!
//! The channel keeps `Weak` handles only. A subscriber dropped without unsubscribing is skipped
//! on dispatch and pruned the next time its event type's list is modified.

use std::{
    any::Any,
    cell::RefCell,
    collections::HashMap,
    rc::{Rc, Weak},
};

use log::{debug, trace};

use crate::{
    event::{Event, EventSet, EventSubscriber, HandleEvent},
    types::{RoutingKey, SubscriberId, assert_unique},
};

struct Listener<E: Event> {
    id: SubscriberId,
    handler: Weak<RefCell<dyn HandleEvent<E>>>,
}

/// Subscribers of a single event type, in registration order.
struct Listeners<E: Event> {
    entries: Vec<Listener<E>>,
}

impl<E: Event> Listeners<E> {
    fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

/// Type-erased view of a `Listeners<E>`.
trait ErasedListeners {
    /// Removes every entry for `id`, returning how many were removed.
    fn remove(&mut self, id: SubscriberId) -> usize;

    /// Drops entries whose subscriber no longer exists.
    fn prune(&mut self);

    /// Number of entries for `id` whose subscriber is still alive.
    fn count_of(&self, id: SubscriberId) -> usize;

    /// Number of entries whose subscriber is still alive.
    fn live_len(&self) -> usize;

    fn is_empty(&self) -> bool;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<E: Event> ErasedListeners for Listeners<E> {
    fn remove(&mut self, id: SubscriberId) -> usize {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.id != id);
        before - self.entries.len()
    }

    fn prune(&mut self) {
        self.entries.retain(|entry| entry.handler.strong_count() > 0);
    }

    fn count_of(&self, id: SubscriberId) -> usize {
        self.entries
            .iter()
            .filter(|entry| entry.id == id && entry.handler.strong_count() > 0)
            .count()
    }

    fn live_len(&self) -> usize {
        self.entries
            .iter()
            .filter(|entry| entry.handler.strong_count() > 0)
            .count()
    }

    fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Many-to-many event router.
///
/// Any number of subscribers may handle the same event type, and the same subscriber may be
/// registered more than once; each registration is one invocation on dispatch.
///
/// ```rust,ignore
/// let mut events = EventChannel::new();
///
/// // Every type listed in `Hud::Events`
/// events.subscribe(&hud);
///
/// // Just one type, or a tuple of types, that `Logger` handles
/// events.subscribe_to::<Damage, _>(&logger);
///
/// events.dispatch(&Damage { amount: 50 });
/// ```
#[derive(Default)]
pub struct EventChannel {
    listeners: HashMap<RoutingKey, Box<dyn ErasedListeners>>,
}

impl EventChannel {
    /// Creates a channel with no subscriptions.
    pub fn new() -> Self {
        Self {
            listeners: HashMap::new(),
        }
    }

    /// Subscribes `subscriber` to every event type it declares.
    ///
    /// # Panics
    ///
    /// Panics if the declared set names the same type twice.
    pub fn subscribe<S: EventSubscriber>(&mut self, subscriber: &Rc<RefCell<S>>) {
        self.subscribe_to::<S::Events, S>(subscriber);
    }

    /// Subscribes `subscriber` to the event type `L`, or to each type in the tuple `L`.
    ///
    /// `S` must handle every type in `L`; anything else fails to compile.
    ///
    /// # Panics
    ///
    /// Panics if `L` names the same type twice.
    pub fn subscribe_to<L: EventSet<S>, S: 'static>(&mut self, subscriber: &Rc<RefCell<S>>) {
        let keys = L::keys();
        assert_unique(&keys, "event");
        L::attach(self, subscriber);
        debug!(
            "{:?} subscribed to {} event type(s): {:?}",
            SubscriberId::of(subscriber),
            keys.len(),
            keys
        );
    }

    /// Removes `subscriber` from every event type it declares.
    ///
    /// Types it is not subscribed to are left alone.
    pub fn unsubscribe<S: EventSubscriber>(&mut self, subscriber: &Rc<RefCell<S>>) {
        self.unsubscribe_from::<S::Events, S>(subscriber);
    }

    /// Removes `subscriber` from the event type `L`, or from each type in the tuple `L`.
    pub fn unsubscribe_from<L: EventSet<S>, S: 'static>(&mut self, subscriber: &Rc<RefCell<S>>) {
        L::detach(self, subscriber);
    }

    /// Delivers `event` to every subscriber of `E`, in registration order.
    ///
    /// Does nothing if `E` has no subscribers. Handler panics are not caught.
    pub fn dispatch<E: Event>(&self, event: &E) {
        let key = RoutingKey::of::<E>();
        let Some(listeners) = self
            .listeners
            .get(&key)
            .and_then(|listeners| listeners.as_any().downcast_ref::<Listeners<E>>())
        else {
            trace!("no subscribers for event {key}");
            return;
        };

        for listener in &listeners.entries {
            match listener.handler.upgrade() {
                Some(handler) => handler.borrow_mut().handle_event(event),
                None => trace!("skipping dropped {:?} for event {key}", listener.id),
            }
        }
    }

    /// Number of live registrations for `E`, counting repeated subscriptions.
    pub fn subscriber_count<E: Event>(&self) -> usize {
        self.listeners
            .get(&RoutingKey::of::<E>())
            .map_or(0, |listeners| listeners.live_len())
    }

    /// Returns `true` if `subscriber` is registered for `E`.
    pub fn is_subscribed<E: Event, S: ?Sized>(&self, subscriber: &Rc<RefCell<S>>) -> bool {
        self.listeners
            .get(&RoutingKey::of::<E>())
            .is_some_and(|listeners| listeners.count_of(SubscriberId::of(subscriber)) > 0)
    }

    /// Returns `true` if no event type has a live registration.
    pub fn is_empty(&self) -> bool {
        self.listeners
            .values()
            .all(|listeners| listeners.live_len() == 0)
    }

    /// Drops every registration.
    pub fn clear(&mut self) {
        self.listeners.clear();
    }

    pub(crate) fn attach<E: Event>(&mut self, handler: Weak<RefCell<dyn HandleEvent<E>>>) {
        let key = RoutingKey::of::<E>();
        let listeners = self
            .listeners
            .entry(key)
            .or_insert_with(|| Box::new(Listeners::<E>::new()));
        listeners.prune();

        match listeners.as_any_mut().downcast_mut::<Listeners<E>>() {
            Some(listeners) => listeners.entries.push(Listener {
                id: SubscriberId::of_weak(&handler),
                handler,
            }),
            None => unreachable!("listener list for {key} holds another event type"),
        }
    }

    pub(crate) fn detach<E: Event, S: ?Sized>(&mut self, subscriber: &Rc<RefCell<S>>) {
        let key = RoutingKey::of::<E>();
        let Some(listeners) = self.listeners.get_mut(&key) else {
            return;
        };

        let id = SubscriberId::of(subscriber);
        let removed = listeners.remove(id);
        listeners.prune();
        if listeners.is_empty() {
            self.listeners.remove(&key);
        }
        if removed > 0 {
            debug!("{id:?} unsubscribed from event {key}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Event, Subscriber, event::DeclaresEvent};

    type Journal = Rc<RefCell<Vec<String>>>;

    #[derive(Event)]
    struct SomethingHappened;

    #[derive(Event)]
    struct WithData {
        data: i32,
    }

    #[derive(Event)]
    struct Unrelated;

    /// Writes `<name>:<event>` to a journal shared between subscribers.
    #[derive(Subscriber)]
    #[events(SomethingHappened, WithData)]
    struct Recorder {
        name: &'static str,
        journal: Journal,
    }

    impl Recorder {
        fn shared(name: &'static str, journal: &Journal) -> Rc<RefCell<Self>> {
            Rc::new(RefCell::new(Self {
                name,
                journal: Rc::clone(journal),
            }))
        }
    }

    impl HandleEvent<SomethingHappened> for Recorder {
        fn handle_event(&mut self, _event: &SomethingHappened) {
            self.journal.borrow_mut().push(format!("{}:happened", self.name));
        }
    }

    impl HandleEvent<WithData> for Recorder {
        fn handle_event(&mut self, event: &WithData) {
            self.journal
                .borrow_mut()
                .push(format!("{}:data={}", self.name, event.data));
        }
    }

    /// Declared by hand instead of through the derive.
    struct Quiet {
        handled: bool,
    }

    impl EventSubscriber for Quiet {
        type Events = SomethingHappened;
    }

    impl DeclaresEvent<SomethingHappened> for Quiet {}

    impl HandleEvent<SomethingHappened> for Quiet {
        fn handle_event(&mut self, _event: &SomethingHappened) {
            self.handled = true;
        }
    }

    fn journal() -> Journal {
        Rc::new(RefCell::new(Vec::new()))
    }

    fn entries(journal: &Journal) -> Vec<String> {
        journal.borrow().clone()
    }

    // ==================== Subscribe ====================

    #[test]
    fn new_channel_is_empty() {
        let channel = EventChannel::new();

        assert!(channel.is_empty());
        assert_eq!(channel.subscriber_count::<SomethingHappened>(), 0);
    }

    #[test]
    fn dispatch_before_subscribe_is_a_no_op() {
        // Given
        let log = journal();
        let _recorder = Recorder::shared("a", &log);
        let channel = EventChannel::new();

        // When
        channel.dispatch(&SomethingHappened);

        // Then
        assert!(entries(&log).is_empty());
    }

    #[test]
    fn subscribe_registers_every_declared_type() {
        // Given
        let log = journal();
        let recorder = Recorder::shared("a", &log);
        let mut channel = EventChannel::new();

        // When
        channel.subscribe(&recorder);
        channel.dispatch(&SomethingHappened);
        channel.dispatch(&WithData { data: 12345 });

        // Then
        assert_eq!(entries(&log), vec!["a:happened", "a:data=12345"]);
        assert!(channel.is_subscribed::<SomethingHappened, _>(&recorder));
        assert!(channel.is_subscribed::<WithData, _>(&recorder));
    }

    #[test]
    fn subscribe_ignores_other_event_types() {
        let log = journal();
        let recorder = Recorder::shared("a", &log);
        let mut channel = EventChannel::new();

        channel.subscribe(&recorder);
        channel.dispatch(&Unrelated);

        assert!(entries(&log).is_empty());
        assert!(!channel.is_subscribed::<Unrelated, _>(&recorder));
    }

    #[test]
    fn subscribe_to_single_type() {
        // Given
        let log = journal();
        let recorder = Recorder::shared("a", &log);
        let mut channel = EventChannel::new();

        // When
        channel.subscribe_to::<WithData, _>(&recorder);
        channel.dispatch(&SomethingHappened);
        channel.dispatch(&WithData { data: 7 });

        // Then
        assert_eq!(entries(&log), vec!["a:data=7"]);
    }

    #[test]
    fn subscribe_to_tuple_of_types() {
        let log = journal();
        let recorder = Recorder::shared("a", &log);
        let mut channel = EventChannel::new();

        channel.subscribe_to::<(WithData, SomethingHappened), _>(&recorder);
        channel.dispatch(&SomethingHappened);
        channel.dispatch(&WithData { data: 7 });
        channel.dispatch(&Unrelated);

        assert_eq!(entries(&log), vec!["a:happened", "a:data=7"]);
    }

    #[test]
    fn hand_written_declaration_subscribes() {
        // Given
        let quiet = Rc::new(RefCell::new(Quiet { handled: false }));
        let mut channel = EventChannel::new();

        // When
        channel.subscribe(&quiet);
        channel.dispatch(&SomethingHappened);

        // Then
        assert!(quiet.borrow().handled);
        assert!(channel.is_subscribed::<SomethingHappened, _>(&quiet));
    }

    #[test]
    #[should_panic(expected = "Duplicate type in declared event set")]
    fn subscribe_to_duplicate_tuple_panics() {
        let log = journal();
        let recorder = Recorder::shared("a", &log);
        let mut channel = EventChannel::new();

        channel.subscribe_to::<(WithData, WithData), _>(&recorder);
    }

    // ==================== Fan-out ====================

    #[test]
    fn dispatch_follows_registration_order() {
        // Given
        let log = journal();
        let first = Recorder::shared("first", &log);
        let second = Recorder::shared("second", &log);
        let third = Recorder::shared("third", &log);
        let mut channel = EventChannel::new();

        // When
        channel.subscribe(&second);
        channel.subscribe(&first);
        channel.subscribe(&third);
        channel.dispatch(&SomethingHappened);

        // Then
        assert_eq!(
            entries(&log),
            vec!["second:happened", "first:happened", "third:happened"]
        );
        assert_eq!(channel.subscriber_count::<SomethingHappened>(), 3);
    }

    #[test]
    fn dispatch_only_reaches_subscribers_of_that_type() {
        let log = journal();
        let everything = Recorder::shared("everything", &log);
        let data_only = Recorder::shared("data", &log);
        let mut channel = EventChannel::new();

        channel.subscribe(&everything);
        channel.subscribe_to::<WithData, _>(&data_only);
        channel.dispatch(&SomethingHappened);

        assert_eq!(entries(&log), vec!["everything:happened"]);
    }

    #[test]
    fn duplicate_subscribe_invokes_twice() {
        // Given
        let log = journal();
        let recorder = Recorder::shared("a", &log);
        let mut channel = EventChannel::new();

        // When
        channel.subscribe(&recorder);
        channel.subscribe(&recorder);
        channel.dispatch(&SomethingHappened);

        // Then
        assert_eq!(entries(&log), vec!["a:happened", "a:happened"]);
        assert_eq!(channel.subscriber_count::<SomethingHappened>(), 2);
    }

    // ==================== Unsubscribe ====================

    #[test]
    fn unsubscribe_stops_delivery() {
        // Given
        let log = journal();
        let recorder = Recorder::shared("a", &log);
        let mut channel = EventChannel::new();
        channel.subscribe(&recorder);

        // When
        channel.unsubscribe(&recorder);
        channel.dispatch(&SomethingHappened);
        channel.dispatch(&WithData { data: 1 });

        // Then
        assert!(entries(&log).is_empty());
        assert!(channel.is_empty());
    }

    #[test]
    fn unsubscribe_removes_every_duplicate() {
        let log = journal();
        let recorder = Recorder::shared("a", &log);
        let mut channel = EventChannel::new();
        channel.subscribe(&recorder);
        channel.subscribe(&recorder);

        channel.unsubscribe(&recorder);
        channel.dispatch(&SomethingHappened);

        assert!(entries(&log).is_empty());
    }

    #[test]
    fn unsubscribe_leaves_other_subscribers() {
        let log = journal();
        let first = Recorder::shared("first", &log);
        let second = Recorder::shared("second", &log);
        let mut channel = EventChannel::new();
        channel.subscribe(&first);
        channel.subscribe(&second);

        channel.unsubscribe(&first);
        channel.dispatch(&SomethingHappened);

        assert_eq!(entries(&log), vec!["second:happened"]);
    }

    #[test]
    fn unsubscribe_when_not_subscribed_is_a_no_op() {
        // Given
        let log = journal();
        let subscribed = Recorder::shared("subscribed", &log);
        let stranger = Recorder::shared("stranger", &log);
        let mut channel = EventChannel::new();
        channel.subscribe(&subscribed);

        // When
        channel.unsubscribe(&stranger);
        channel.unsubscribe_from::<WithData, _>(&stranger);
        channel.dispatch(&SomethingHappened);

        // Then
        assert_eq!(entries(&log), vec!["subscribed:happened"]);
    }

    #[test]
    fn unsubscribe_from_single_type() {
        let log = journal();
        let recorder = Recorder::shared("a", &log);
        let mut channel = EventChannel::new();
        channel.subscribe(&recorder);

        channel.unsubscribe_from::<SomethingHappened, _>(&recorder);
        channel.dispatch(&SomethingHappened);
        channel.dispatch(&WithData { data: 3 });

        assert_eq!(entries(&log), vec!["a:data=3"]);
    }

    #[test]
    fn resubscribe_after_unsubscribe() {
        let log = journal();
        let recorder = Recorder::shared("a", &log);
        let mut channel = EventChannel::new();

        channel.subscribe(&recorder);
        channel.unsubscribe(&recorder);
        channel.subscribe(&recorder);
        channel.dispatch(&SomethingHappened);

        assert_eq!(entries(&log), vec!["a:happened"]);
    }

    // ==================== Ownership ====================

    #[test]
    fn channel_does_not_keep_subscribers_alive() {
        let log = journal();
        let recorder = Recorder::shared("a", &log);
        let mut channel = EventChannel::new();

        channel.subscribe(&recorder);

        assert_eq!(Rc::strong_count(&recorder), 1);
    }

    #[test]
    fn dropped_subscriber_is_skipped() {
        // Given
        let log = journal();
        let kept = Recorder::shared("kept", &log);
        let dropped = Recorder::shared("dropped", &log);
        let mut channel = EventChannel::new();
        channel.subscribe(&dropped);
        channel.subscribe(&kept);

        // When
        drop(dropped);
        channel.dispatch(&SomethingHappened);

        // Then
        assert_eq!(entries(&log), vec!["kept:happened"]);
        assert_eq!(channel.subscriber_count::<SomethingHappened>(), 1);
    }

    #[test]
    fn channel_of_dropped_subscribers_reads_empty() {
        // Given
        let log = journal();
        let recorder = Recorder::shared("a", &log);
        let mut channel = EventChannel::new();
        channel.subscribe(&recorder);
        assert!(!channel.is_empty());

        // When
        drop(recorder);

        // Then
        assert!(channel.is_empty());
        assert_eq!(channel.subscriber_count::<SomethingHappened>(), 0);
    }

    #[test]
    fn clear_drops_all_registrations() {
        let log = journal();
        let recorder = Recorder::shared("a", &log);
        let mut channel = EventChannel::new();
        channel.subscribe(&recorder);

        channel.clear();
        channel.dispatch(&SomethingHappened);

        assert!(channel.is_empty());
        assert!(entries(&log).is_empty());
    }
}
