//! Single-owner routing for requests.
//!
//! [`RequestChannel`] maps each request type's [`RoutingKey`] to at most one owner. Per type and
//! per channel the slot is either unclaimed or claimed:
//!
//! ```text
//! Unclaimed --subscribe--> Claimed --unsubscribe / release--> Unclaimed
//! ```
//!
//! The first claimant wins; a later claim for an owned slot fails without touching the owner.
//! What a failed multi-type claim leaves behind, and who may release a slot, are set by
//! [`RequestConfig`].
//!
//! # Ownership
//!
//! Like the event channel, slots hold `Weak` handles. An owner dropped without unsubscribing
//! reads as unclaimed: dispatch returns the absent reply and a new claim replaces it.

use std::{
    any::Any,
    cell::RefCell,
    collections::HashMap,
    rc::{Rc, Weak},
};

use log::{debug, trace, warn};

use crate::{
    error::{Error, Result},
    reply::Reply,
    request::{
        ClaimPolicy, HandleRequest, Normalized, ReleasePolicy, Request, RequestConfig, RequestSet,
        RequestSubscriber,
    },
    types::{RoutingKey, SubscriberId, assert_unique},
};

/// The owner of one request type's slot.
struct Owner<R: Request> {
    id: SubscriberId,
    handler: Weak<RefCell<dyn HandleRequest<R>>>,
}

/// Type-erased view of an `Owner<R>`.
trait ErasedOwner {
    fn id(&self) -> SubscriberId;

    fn is_alive(&self) -> bool;

    fn as_any(&self) -> &dyn Any;
}

impl<R: Request> ErasedOwner for Owner<R> {
    fn id(&self) -> SubscriberId {
        self.id
    }

    fn is_alive(&self) -> bool {
        self.handler.strong_count() > 0
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Many-to-one request router.
///
/// ```rust,ignore
/// let mut requests = RequestChannel::new();
///
/// requests.subscribe(&inventory)?;
/// let count: Option<u32> = requests.dispatch(&CountItems { kind: "potion" });
///
/// // A second subscriber for the same type is turned away.
/// assert!(requests.subscribe(&other_inventory).is_err());
/// ```
#[derive(Default)]
pub struct RequestChannel {
    config: RequestConfig,
    owners: HashMap<RoutingKey, Box<dyn ErasedOwner>>,
}

impl RequestChannel {
    /// Creates a channel with the default [`RequestConfig`].
    pub fn new() -> Self {
        Self::with_config(RequestConfig::default())
    }

    /// Creates a channel with the given configuration.
    pub fn with_config(config: RequestConfig) -> Self {
        Self {
            config,
            owners: HashMap::new(),
        }
    }

    pub fn config(&self) -> &RequestConfig {
        &self.config
    }

    /// Claims every request type `subscriber` declares.
    ///
    /// Succeeds only if every type was free, or already owned by `subscriber`. Otherwise returns
    /// [`Error::AlreadyClaimed`] listing the types owned by someone else; whether the free types
    /// were claimed anyway depends on the [`ClaimPolicy`].
    ///
    /// # Panics
    ///
    /// Panics if the declared set names the same type twice.
    pub fn subscribe<S: RequestSubscriber>(&mut self, subscriber: &Rc<RefCell<S>>) -> Result<()> {
        self.subscribe_to::<S::Requests, S>(subscriber)
    }

    /// Claims the request type `L`, or each type in the tuple `L`.
    ///
    /// `S` must handle every type in `L`; anything else fails to compile. Conflicts are handled
    /// as in [`subscribe`](Self::subscribe).
    ///
    /// # Panics
    ///
    /// Panics if `L` names the same type twice.
    pub fn subscribe_to<L: RequestSet<S>, S: 'static>(
        &mut self,
        subscriber: &Rc<RefCell<S>>,
    ) -> Result<()> {
        let keys = L::keys();
        assert_unique(&keys, "request");
        let id = SubscriberId::of(subscriber);

        if self.config.claim == ClaimPolicy::AllOrNothing {
            let conflicts = self.conflicts(&keys, id);
            if !conflicts.is_empty() {
                warn!("{id:?} claimed nothing; already owned: {conflicts:?}");
                return Err(Error::AlreadyClaimed(conflicts));
            }
        }

        let mut conflicts = Vec::new();
        L::claim(self, subscriber, &mut conflicts);

        if conflicts.is_empty() {
            debug!("{id:?} claimed {} request type(s): {keys:?}", keys.len());
            Ok(())
        } else {
            warn!("{id:?} claimed part of {keys:?}; already owned: {conflicts:?}");
            Err(Error::AlreadyClaimed(conflicts))
        }
    }

    /// Releases every request type `subscriber` declares.
    ///
    /// Under [`ReleasePolicy::OwnerOnly`] slots owned by another subscriber are left alone.
    pub fn unsubscribe<S: RequestSubscriber>(&mut self, subscriber: &Rc<RefCell<S>>) {
        self.unsubscribe_from::<S::Requests, S>(subscriber);
    }

    /// Releases the request type `L`, or each type in the tuple `L`, as
    /// [`unsubscribe`](Self::unsubscribe) does.
    pub fn unsubscribe_from<L: RequestSet<S>, S: 'static>(&mut self, subscriber: &Rc<RefCell<S>>) {
        L::release(self, subscriber);
    }

    /// Releases the slot for `R` whoever owns it. Returns `true` if it was claimed.
    pub fn release<R: Request>(&mut self) -> bool {
        let key = RoutingKey::of::<R>();
        match self.owners.remove(&key) {
            Some(owner) => {
                debug!("forced release of request {key} from {:?}", owner.id());
                owner.is_alive()
            }
            None => false,
        }
    }

    /// Sends `request` to its owner and returns the normalized reply.
    ///
    /// With no live owner the reply's absent form is returned: `None`, a null pointer, or the
    /// error type's no-subscriber value. Handler panics are not caught.
    pub fn dispatch<R: Request>(&self, request: &R) -> Normalized<R> {
        let key = RoutingKey::of::<R>();
        let Some(owner) = self
            .owners
            .get(&key)
            .and_then(|owner| owner.as_any().downcast_ref::<Owner<R>>())
        else {
            trace!("no subscriber for request {key}");
            return R::Reply::absent();
        };

        match owner.handler.upgrade() {
            Some(handler) => {
                let reply = handler.borrow_mut().handle_request(request);
                reply.into_output()
            }
            None => {
                warn!("owner {:?} of request {key} was dropped without unsubscribing", owner.id);
                R::Reply::absent()
            }
        }
    }

    /// Returns `true` if a live subscriber owns `R`.
    pub fn is_claimed<R: Request>(&self) -> bool {
        self.owner_of::<R>().is_some()
    }

    /// The live owner of `R`, if any.
    pub fn owner_of<R: Request>(&self) -> Option<SubscriberId> {
        self.owners
            .get(&RoutingKey::of::<R>())
            .filter(|owner| owner.is_alive())
            .map(|owner| owner.id())
    }

    /// Returns `true` if `subscriber` owns `R`.
    pub fn is_owned_by<R: Request, S: ?Sized>(&self, subscriber: &Rc<RefCell<S>>) -> bool {
        self.owner_of::<R>() == Some(SubscriberId::of(subscriber))
    }

    /// Number of request types with a live owner.
    pub fn claimed_count(&self) -> usize {
        self.owners.values().filter(|owner| owner.is_alive()).count()
    }

    /// Releases every slot.
    pub fn clear(&mut self) {
        self.owners.clear();
    }

    /// Keys in `keys` owned by a live subscriber other than `id`.
    fn conflicts(&self, keys: &[RoutingKey], id: SubscriberId) -> Vec<RoutingKey> {
        keys.iter()
            .filter(|key| {
                self.owners
                    .get(key)
                    .is_some_and(|owner| owner.is_alive() && owner.id() != id)
            })
            .copied()
            .collect()
    }

    /// Takes the slot for `R` unless a different live subscriber holds it.
    pub(crate) fn claim<R: Request>(
        &mut self,
        handler: Weak<RefCell<dyn HandleRequest<R>>>,
    ) -> bool {
        let key = RoutingKey::of::<R>();
        let id = SubscriberId::of_weak(&handler);

        if let Some(owner) = self.owners.get(&key) {
            if owner.is_alive() && owner.id() != id {
                return false;
            }
            if !owner.is_alive() {
                debug!("replacing dropped owner {:?} of request {key}", owner.id());
            }
        }

        self.owners.insert(key, Box::new(Owner { id, handler }));
        true
    }

    pub(crate) fn release_from<R: Request, S: ?Sized>(&mut self, subscriber: &Rc<RefCell<S>>) {
        let key = RoutingKey::of::<R>();
        let id = SubscriberId::of(subscriber);
        let Some(owner) = self.owners.get(&key) else {
            return;
        };

        let releasable = match self.config.release {
            ReleasePolicy::OwnerOnly => owner.id() == id || !owner.is_alive(),
            ReleasePolicy::Force => true,
        };

        if releasable {
            debug!("{id:?} released request {key} (owner {:?})", owner.id());
            self.owners.remove(&key);
        } else {
            debug!("{id:?} does not own request {key}; keeping {:?}", owner.id());
        }
    }
}
