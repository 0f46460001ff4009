use std::{cell::RefCell, marker::PhantomData, rc::Rc};

use switchboard::{
    Error, Event, EventChannel, EventSet, EventSubscriber, HandleEvent, HandleRequest, Mediator,
    NoSubscriber, Request, RequestChannel, RequestSet, RequestSubscriber, RoutingKey, Subscriber,
    assert_unique_types,
};

// ==================== Messages ====================

#[derive(Event)]
struct Ping;

#[derive(Event)]
struct Tick(u32);

#[derive(Request)]
#[reply(i32)]
struct Echo {
    data: i32,
}

#[derive(Request)]
#[reply(Result<i32, LookupError>)]
struct Lookup;

#[derive(Request)]
#[reply(Box<String>)]
struct Describe;

#[derive(Request)]
#[reply((i32, i32))]
struct Bounds;

#[derive(Request)]
#[reply([u8; 4])]
struct Checksum;

#[derive(NoSubscriber, Debug, PartialEq)]
enum LookupError {
    #[allow(dead_code)]
    Missing,
    #[no_subscriber]
    Unrouted,
}

assert_unique_types!(Ping, Tick, Echo, Lookup, Describe, Bounds, Checksum);

// ==================== Subscribers ====================

#[derive(Subscriber, Default)]
#[events(Ping)]
#[requests(Echo)]
struct Service {
    pings: u32,
}

impl HandleEvent<Ping> for Service {
    fn handle_event(&mut self, _event: &Ping) {
        self.pings += 1;
    }
}

impl HandleRequest<Echo> for Service {
    fn handle_request(&mut self, request: &Echo) -> i32 {
        request.data
    }
}

#[derive(Subscriber)]
#[events(Tick)]
struct Journal {
    name: &'static str,
    log: Rc<RefCell<Vec<String>>>,
}

impl HandleEvent<Tick> for Journal {
    fn handle_event(&mut self, event: &Tick) {
        self.log.borrow_mut().push(format!("{}:{}", self.name, event.0));
    }
}

#[derive(Subscriber)]
#[requests(Echo)]
struct Doubler;

impl HandleRequest<Echo> for Doubler {
    fn handle_request(&mut self, request: &Echo) -> i32 {
        request.data * 2
    }
}

#[derive(Subscriber)]
#[events(Ping)]
struct Tagged<T: 'static> {
    hits: u32,
    _marker: PhantomData<T>,
}

impl<T: 'static> HandleEvent<Ping> for Tagged<T> {
    fn handle_event(&mut self, _event: &Ping) {
        self.hits += 1;
    }
}

#[derive(Subscriber)]
#[requests(Bounds, Checksum)]
struct Geometry;

impl HandleRequest<Bounds> for Geometry {
    fn handle_request(&mut self, _request: &Bounds) -> (i32, i32) {
        (640, 480)
    }
}

impl HandleRequest<Checksum> for Geometry {
    fn handle_request(&mut self, _request: &Checksum) -> [u8; 4] {
        [0xde, 0xad, 0xbe, 0xef]
    }
}

fn shared<T>(value: T) -> Rc<RefCell<T>> {
    Rc::new(RefCell::new(value))
}

// ==================== Derived Declarations ====================

#[test]
fn derived_sets_list_declared_types_in_order() {
    // Given / When
    let events = <<Service as EventSubscriber>::Events as EventSet<Service>>::keys();
    let requests = <<Service as RequestSubscriber>::Requests as RequestSet<Service>>::keys();

    // Then
    assert_eq!(events, vec![RoutingKey::of::<Ping>()]);
    assert_eq!(requests, vec![RoutingKey::of::<Echo>()]);
}

#[test]
fn generic_subscriber_derives() {
    // Given
    let tagged = shared(Tagged::<u8> {
        hits: 0,
        _marker: PhantomData,
    });
    let mut events = EventChannel::new();

    // When
    events.subscribe(&tagged);
    events.dispatch(&Ping);

    // Then
    assert_eq!(tagged.borrow().hits, 1);
}

// ==================== Events ====================

#[test]
fn fan_out_follows_registration_order() {
    // Given
    let log = Rc::new(RefCell::new(Vec::new()));
    let first = shared(Journal {
        name: "first",
        log: log.clone(),
    });
    let second = shared(Journal {
        name: "second",
        log: log.clone(),
    });
    let bystander = shared(Service::default());
    let mut events = EventChannel::new();
    events.subscribe(&first);
    events.subscribe(&second);
    events.subscribe(&bystander);

    // When
    events.dispatch(&Tick(1));

    // Then
    assert_eq!(*log.borrow(), vec!["first:1", "second:1"]);
    assert_eq!(bystander.borrow().pings, 0);
}

#[test]
fn unsubscribing_a_stranger_changes_nothing() {
    // Given
    let log = Rc::new(RefCell::new(Vec::new()));
    let member = shared(Journal {
        name: "member",
        log: log.clone(),
    });
    let stranger = shared(Journal {
        name: "stranger",
        log: log.clone(),
    });
    let mut events = EventChannel::new();
    events.subscribe(&member);

    // When
    events.unsubscribe(&stranger);
    events.dispatch(&Tick(2));

    // Then
    assert_eq!(*log.borrow(), vec!["member:2"]);
    assert_eq!(events.subscriber_count::<Tick>(), 1);
}

// ==================== Requests ====================

#[test]
fn second_claim_is_rejected_and_owner_kept() {
    // Given
    let service = shared(Service::default());
    let doubler = shared(Doubler);
    let mut requests = RequestChannel::new();
    requests.subscribe(&service).unwrap();

    // When
    let result = requests.subscribe(&doubler);

    // Then
    assert_eq!(
        result,
        Err(Error::AlreadyClaimed(vec![RoutingKey::of::<Echo>()]))
    );
    assert_eq!(requests.dispatch(&Echo { data: 7 }), Some(7));
}

#[test]
fn value_reply_is_optional() {
    // Given
    let doubler = shared(Doubler);
    let mut requests = RequestChannel::new();

    // When
    let before = requests.dispatch(&Echo { data: 7 });
    requests.subscribe(&doubler).unwrap();
    let after = requests.dispatch(&Echo { data: 7 });

    // Then
    assert_eq!(before, None);
    assert_eq!(after, Some(14));
}

#[test]
fn result_reply_without_owner_is_no_subscriber_error() {
    // Given
    let requests = RequestChannel::new();

    // When
    let reply = requests.dispatch(&Lookup);

    // Then
    assert_eq!(reply, Err(LookupError::Unrouted));
}

#[test]
fn owner_reply_without_owner_is_none() {
    // Given
    let requests = RequestChannel::new();

    // When
    let reply = requests.dispatch(&Describe);

    // Then
    assert_eq!(reply, None);
}

#[test]
fn tuple_and_array_replies_are_optional() {
    // Given
    let geometry = shared(Geometry);
    let mut requests = RequestChannel::new();

    // When
    let before = (requests.dispatch(&Bounds), requests.dispatch(&Checksum));
    requests.subscribe(&geometry).unwrap();
    let after = (requests.dispatch(&Bounds), requests.dispatch(&Checksum));

    // Then
    assert_eq!(before, (None, None));
    assert_eq!(after, (Some((640, 480)), Some([0xde, 0xad, 0xbe, 0xef])));
}

// ==================== Mediator ====================

#[test]
fn ping_and_echo_round_trip() {
    // Given
    let service = shared(Service::default());
    let mut mediator = Mediator::new();
    mediator.subscribe(&service).unwrap();

    // When
    mediator.publish(&Ping);
    let echoed = mediator.send(&Echo { data: 42 });

    // Then
    assert_eq!(service.borrow().pings, 1);
    assert_eq!(echoed, Some(42));

    // When
    mediator.unsubscribe(&service);
    mediator.publish(&Ping);
    let echoed = mediator.send(&Echo { data: 42 });

    // Then
    assert_eq!(service.borrow().pings, 1);
    assert_eq!(echoed, None);
}
