//! Type identity: routing keys, subscriber ids and the uniqueness check over declared type lists.

mod id;
mod key;

pub use id::SubscriberId;
pub(crate) use key::assert_unique;
pub use key::{RoutingKey, ensure_unique};
