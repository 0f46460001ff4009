//! Mixed traffic benchmark scenario.
//!
//! Simulates an application bus with:
//! - A registry owning every request type
//! - A pool of counters that join and leave between frames
//! - Randomized publish/send traffic, including requests nobody owns
//!
//! This scenario tests:
//! - Dispatch over a channel whose listener lists contain dropped entries
//! - Subscribe/unsubscribe churn
//! - Request normalization on both the handled and the absent path

use std::{cell::RefCell, rc::Rc};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use switchboard::Mediator;

use crate::{
    messages::{Counter, Damaged, HealthOf, OwnerOf, Registry, Roster, Spawned, Tick, Unrouted},
    scenarios::Scenario,
};

/// Configuration for the mixed scenario.
#[derive(Clone, Debug)]
pub struct MixedConfig {
    pub counter_count: usize,
    pub messages_per_frame: usize,
    /// Chance per frame that a counter leaves (dropped, not unsubscribed) and a new one joins.
    pub churn: f64,
    pub seed: u64,
}

impl Default for MixedConfig {
    fn default() -> Self {
        Self {
            counter_count: 256,
            messages_per_frame: 1_000,
            churn: 0.05,
            seed: 54321,
        }
    }
}

/// Mixed traffic benchmark scenario.
pub struct MixedScenario {
    config: MixedConfig,
    mediator: Mediator,
    registry: Rc<RefCell<Registry>>,
    counters: Vec<Rc<RefCell<Counter>>>,
    rng: ChaCha8Rng,
    next_id: u32,
    /// Handled request replies seen so far.
    pub answered: u64,
}

impl MixedScenario {
    pub fn new() -> Self {
        Self::with_config(MixedConfig::default())
    }

    pub fn with_config(config: MixedConfig) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            mediator: Mediator::new(),
            registry: Rc::new(RefCell::new(Registry::default())),
            counters: Vec::new(),
            next_id: 0,
            answered: 0,
            config,
        }
    }

    fn join(&mut self) {
        let counter = Rc::new(RefCell::new(Counter::default()));
        self.mediator.events_mut().subscribe(&counter);
        self.counters.push(counter);
    }

    fn random_id(&mut self) -> u32 {
        self.rng.gen_range(0..self.next_id.max(1))
    }

    fn step(&mut self) {
        match self.rng.gen_range(0..6) {
            0 => self.mediator.publish(&Tick { dt: 1.0 / 60.0 }),
            1 => {
                let target = self.random_id();
                self.mediator.publish(&Damaged {
                    target,
                    amount: self.rng.gen_range(1.0..10.0),
                });
            }
            2 => {
                self.mediator.publish(&Spawned { id: self.next_id });
                self.next_id += 1;
            }
            3 => {
                let id = self.random_id();
                if self.mediator.send(&HealthOf { id }).is_some() {
                    self.answered += 1;
                }
            }
            4 => {
                let id = self.random_id();
                if self.mediator.send(&OwnerOf { id }).is_some() {
                    self.answered += 1;
                }
            }
            _ => {
                if self.rng.gen_bool(0.5) {
                    if self.mediator.send(&Roster).is_some() {
                        self.answered += 1;
                    }
                } else if self.mediator.send(&Unrouted).is_ok() {
                    self.answered += 1;
                }
            }
        }
    }
}

impl Default for MixedScenario {
    fn default() -> Self {
        Self::new()
    }
}

impl Scenario for MixedScenario {
    fn name(&self) -> &'static str {
        "mixed"
    }

    fn subscriber_count(&self) -> usize {
        self.counters.len() + 1
    }

    fn setup(&mut self) {
        // The registry is the only request owner; a failed claim would mean a broken setup.
        if let Err(err) = self.mediator.subscribe(&self.registry) {
            panic!("registry could not claim its requests: {err}");
        }
        for _ in 0..self.config.counter_count {
            self.join();
        }
    }

    fn update(&mut self) {
        if !self.counters.is_empty() && self.rng.gen_bool(self.config.churn) {
            let leaving = self.rng.gen_range(0..self.counters.len());
            self.counters.swap_remove(leaving);
            self.join();
        }

        for _ in 0..self.config.messages_per_frame {
            self.step();
        }
    }

    fn teardown(&mut self) {
        self.mediator.unsubscribe(&self.registry);
        self.mediator.events_mut().clear();
        self.counters.clear();
    }
}
