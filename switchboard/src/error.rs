use crate::types::RoutingKey;

/// Errors surfaced by the channels.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// No subscriber owns the dispatched request type.
    ///
    /// Channels never return this on their own; it is the value handed back as the `Err` of a
    /// `Result` reply when nobody handles the request.
    #[error("no request subscriber found")]
    NoSubscriber,

    /// One or more request types are already owned by another subscriber.
    #[error("request types already claimed by another subscriber: {}", join_keys(.0))]
    AlreadyClaimed(Vec<RoutingKey>),
}

pub type Result<T> = std::result::Result<T, Error>;

fn join_keys(keys: &[RoutingKey]) -> String {
    keys.iter()
        .map(RoutingKey::type_name)
        .collect::<Vec<_>>()
        .join(", ")
}
