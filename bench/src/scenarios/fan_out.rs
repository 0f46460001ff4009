//! Fan-out benchmark scenario.
//!
//! A frame publishes one `Tick` and a burst of `Damaged` events to every listener. This scenario
//! tests the per-listener cost of dispatch: weak upgrade, borrow, and the handler call.

use std::{cell::RefCell, rc::Rc};

use switchboard::EventChannel;

use crate::{
    messages::{Counter, Damaged, Tick},
    scenarios::Scenario,
};

/// Configuration for the fan-out scenario.
#[derive(Clone, Debug)]
pub struct FanOutConfig {
    pub listener_count: usize,
    /// `Damaged` events per frame.
    pub burst: usize,
    pub delta_time: f32,
}

impl Default for FanOutConfig {
    fn default() -> Self {
        Self {
            listener_count: 1_000,
            burst: 16,
            delta_time: 1.0 / 60.0,
        }
    }
}

/// Fan-out benchmark scenario.
pub struct FanOutScenario {
    config: FanOutConfig,
    events: EventChannel,
    listeners: Vec<Rc<RefCell<Counter>>>,
}

impl FanOutScenario {
    pub fn new() -> Self {
        Self::with_config(FanOutConfig::default())
    }

    pub fn with_config(config: FanOutConfig) -> Self {
        Self {
            config,
            events: EventChannel::new(),
            listeners: Vec::new(),
        }
    }

    /// Ticks seen by the first listener.
    pub fn ticks(&self) -> u64 {
        self.listeners
            .first()
            .map(|listener| listener.borrow().ticks)
            .unwrap_or(0)
    }
}

impl Default for FanOutScenario {
    fn default() -> Self {
        Self::new()
    }
}

impl Scenario for FanOutScenario {
    fn name(&self) -> &'static str {
        "fan_out"
    }

    fn subscriber_count(&self) -> usize {
        self.listeners.len()
    }

    fn setup(&mut self) {
        for _ in 0..self.config.listener_count {
            let listener = Rc::new(RefCell::new(Counter::default()));
            self.events.subscribe(&listener);
            self.listeners.push(listener);
        }
    }

    fn update(&mut self) {
        self.events.dispatch(&Tick {
            dt: self.config.delta_time,
        });
        for target in 0..self.config.burst {
            self.events.dispatch(&Damaged {
                target: target as u32,
                amount: 1.0,
            });
        }
    }

    fn teardown(&mut self) {
        self.events.clear();
        self.listeners.clear();
    }
}
