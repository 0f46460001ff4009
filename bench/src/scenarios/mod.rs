//! Workload scenarios.
//!
//! # Scenarios
//!
//! - **Fan-out**: many listeners, event-heavy frames
//! - **Mixed**: random publish/send traffic with subscribers joining and leaving

pub mod fan_out;
pub mod mixed;

pub use fan_out::{FanOutConfig, FanOutScenario};
pub use mixed::{MixedConfig, MixedScenario};

/// Common trait for benchmark scenarios.
pub trait Scenario {
    /// Human-readable name of the scenario.
    fn name(&self) -> &'static str;

    /// Number of subscribers alive in this scenario.
    fn subscriber_count(&self) -> usize;

    /// Set up the scenario (create subscribers, register them).
    fn setup(&mut self);

    /// Run one "frame" of the scenario.
    fn update(&mut self);

    /// Clean up the scenario.
    fn teardown(&mut self);
}
