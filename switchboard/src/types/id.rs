use std::{
    cell::RefCell,
    fmt,
    rc::{Rc, Weak},
};

/// Identity of a subscriber object, used to match registrations on unsubscribe.
///
/// The id is the address of the subscriber's shared allocation. Channels hold a `Weak` to that
/// allocation for as long as the id is stored, which keeps the address from being reused.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriberId(usize);

impl SubscriberId {
    /// Returns the id of a caller-owned subscriber.
    #[inline]
    pub fn of<S: ?Sized>(subscriber: &Rc<RefCell<S>>) -> Self {
        Self(Rc::as_ptr(subscriber) as *const () as usize)
    }

    #[inline]
    pub(crate) fn of_weak<S: ?Sized>(subscriber: &Weak<RefCell<S>>) -> Self {
        Self(Weak::as_ptr(subscriber) as *const () as usize)
    }
}

impl fmt::Debug for SubscriberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SubscriberId({:#x})", self.0)
    }
}
