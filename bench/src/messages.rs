//! Message and subscriber types used across benchmarks.

use std::collections::HashMap;

use switchboard::{Event, HandleEvent, HandleRequest, Request, Subscriber};

// =============================================================================
// Events
// =============================================================================

/// Frame tick, the highest-frequency event.
#[derive(Event, Clone, Copy, Debug)]
pub struct Tick {
    pub dt: f32,
}

#[derive(Event, Clone, Copy, Debug)]
pub struct Damaged {
    pub target: u32,
    pub amount: f32,
}

#[derive(Event, Clone, Copy, Debug)]
pub struct Spawned {
    pub id: u32,
}

// =============================================================================
// Requests
// =============================================================================

#[derive(Request, Clone, Copy, Debug)]
#[reply(f32)]
pub struct HealthOf {
    pub id: u32,
}

#[derive(Request, Clone, Copy, Debug)]
#[reply(Option<u32>)]
pub struct OwnerOf {
    pub id: u32,
}

#[derive(Request, Clone, Copy, Debug)]
#[reply(Box<Vec<u32>>)]
pub struct Roster;

/// Never claimed; measures the absent path.
#[derive(Request, Clone, Copy, Debug)]
#[reply(Result<u32, switchboard::Error>)]
pub struct Unrouted;

// =============================================================================
// Subscribers
// =============================================================================

/// Listens to every event and only counts.
#[derive(Subscriber, Default, Debug)]
#[events(Tick, Damaged, Spawned)]
pub struct Counter {
    pub ticks: u64,
    pub damage: f64,
    pub spawned: u64,
}

impl HandleEvent<Tick> for Counter {
    fn handle_event(&mut self, _event: &Tick) {
        self.ticks += 1;
    }
}

impl HandleEvent<Damaged> for Counter {
    fn handle_event(&mut self, event: &Damaged) {
        self.damage += f64::from(event.amount);
    }
}

impl HandleEvent<Spawned> for Counter {
    fn handle_event(&mut self, _event: &Spawned) {
        self.spawned += 1;
    }
}

/// Owns entity state, updated by events and read through requests.
#[derive(Subscriber, Default, Debug)]
#[events(Damaged, Spawned)]
#[requests(HealthOf, OwnerOf, Roster)]
pub struct Registry {
    health: HashMap<u32, f32>,
    owners: HashMap<u32, u32>,
}

impl HandleEvent<Damaged> for Registry {
    fn handle_event(&mut self, event: &Damaged) {
        if let Some(health) = self.health.get_mut(&event.target) {
            *health -= event.amount;
        }
    }
}

impl HandleEvent<Spawned> for Registry {
    fn handle_event(&mut self, event: &Spawned) {
        self.health.insert(event.id, 100.0);
        self.owners.insert(event.id, event.id % 4);
    }
}

impl HandleRequest<HealthOf> for Registry {
    fn handle_request(&mut self, request: &HealthOf) -> f32 {
        self.health.get(&request.id).copied().unwrap_or(0.0)
    }
}

impl HandleRequest<OwnerOf> for Registry {
    fn handle_request(&mut self, request: &OwnerOf) -> Option<u32> {
        self.owners.get(&request.id).copied()
    }
}

impl HandleRequest<Roster> for Registry {
    fn handle_request(&mut self, _request: &Roster) -> Box<Vec<u32>> {
        Box::new(self.health.keys().copied().collect())
    }
}
