//! Request channel configuration.
//!
//! Two behaviours of the request channel are policy choices rather than fixed rules: what a
//! failed multi-type subscribe leaves behind, and whether an unsubscribe may release a slot the
//! caller does not own. [`RequestConfig`] holds both; the defaults are the strict variants.
//!
//! ```rust
//! use switchboard::{ClaimPolicy, ReleasePolicy, RequestChannel, RequestConfig};
//!
//! let config = RequestConfig::default()
//!     .with_claim_policy(ClaimPolicy::Partial)
//!     .with_release_policy(ReleasePolicy::Force);
//!
//! let requests = RequestChannel::with_config(config);
//! assert_eq!(requests.config().claim, ClaimPolicy::Partial);
//! ```

/// What a subscribe call claims when some of its request types are already owned.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ClaimPolicy {
    /// Claim nothing unless every type is free.
    #[default]
    AllOrNothing,
    /// Claim the free types and report the rest as conflicts.
    Partial,
}

/// Which slots an unsubscribe call may release.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ReleasePolicy {
    /// Only slots owned by the unsubscribing subscriber (or by a dropped one).
    #[default]
    OwnerOnly,
    /// Any slot of the named types, whoever owns it.
    Force,
}

/// Settings for a [`RequestChannel`](super::RequestChannel).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct RequestConfig {
    pub claim: ClaimPolicy,
    pub release: ReleasePolicy,
}

impl RequestConfig {
    /// Sets the claim policy.
    pub fn with_claim_policy(mut self, claim: ClaimPolicy) -> Self {
        self.claim = claim;
        self
    }

    /// Sets the release policy.
    pub fn with_release_policy(mut self, release: ReleasePolicy) -> Self {
        self.release = release;
        self
    }
}
