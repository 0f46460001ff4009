//! Log collection for hosts that want to see routing diagnostics.

mod channel;

pub use channel::{ChannelLogger, LogMessage};
