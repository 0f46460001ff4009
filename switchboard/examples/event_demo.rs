//! Fan-out events between loosely coupled parts of a program.
//!
//! This example shows:
//! - Declaring events and subscribers with the derives
//! - Several subscribers receiving the same event in registration order
//! - Subscribing to part of a declared set with `subscribe_to`
//! - Subscribers that are dropped without unsubscribing

use std::{cell::RefCell, rc::Rc};

use log::LevelFilter;
use switchboard::{ChannelLogger, Event, EventChannel, HandleEvent, Subscriber};

// ============================================================================
// Events
// ============================================================================

#[derive(Event, Debug)]
struct PlayerMoved {
    x: i32,
    y: i32,
}

#[derive(Event, Debug)]
struct ScoreChanged {
    score: u32,
}

// ============================================================================
// Subscribers
// ============================================================================

#[derive(Subscriber, Default)]
#[events(PlayerMoved, ScoreChanged)]
struct Hud {
    position: (i32, i32),
    score: u32,
}

impl HandleEvent<PlayerMoved> for Hud {
    fn handle_event(&mut self, event: &PlayerMoved) {
        self.position = (event.x, event.y);
        println!("  hud: player at ({}, {})", event.x, event.y);
    }
}

impl HandleEvent<ScoreChanged> for Hud {
    fn handle_event(&mut self, event: &ScoreChanged) {
        self.score = event.score;
        println!("  hud: score {}", event.score);
    }
}

#[derive(Subscriber, Default)]
#[events(PlayerMoved, ScoreChanged)]
struct Audio {
    cues: Vec<&'static str>,
}

impl HandleEvent<PlayerMoved> for Audio {
    fn handle_event(&mut self, _event: &PlayerMoved) {
        self.cues.push("footstep");
        println!("  audio: footstep");
    }
}

impl HandleEvent<ScoreChanged> for Audio {
    fn handle_event(&mut self, _event: &ScoreChanged) {
        self.cues.push("chime");
        println!("  audio: chime");
    }
}

fn main() {
    let (logger, records) = ChannelLogger::with_receiver();
    if let Err(err) = logger.with_level(LevelFilter::Debug).install() {
        eprintln!("logger not installed: {err}");
    }

    let mut events = EventChannel::new();

    let hud = Rc::new(RefCell::new(Hud::default()));
    let audio = Rc::new(RefCell::new(Audio::default()));

    events.subscribe(&hud);
    // Audio only cares about movement for now.
    events.subscribe_to::<PlayerMoved, _>(&audio);

    println!("PlayerMoved:");
    events.dispatch(&PlayerMoved { x: 3, y: 4 });

    println!("ScoreChanged:");
    events.dispatch(&ScoreChanged { score: 100 });

    events.unsubscribe_from::<PlayerMoved, _>(&audio);
    events.subscribe_to::<ScoreChanged, _>(&audio);

    println!("ScoreChanged after audio switched:");
    events.dispatch(&ScoreChanged { score: 250 });

    println!("audio played {:?}", audio.borrow().cues);
    drop(audio);
    println!("PlayerMoved after audio was dropped:");
    events.dispatch(&PlayerMoved { x: 5, y: 6 });

    println!(
        "hud ended at {:?} with score {}, {} listener(s) for ScoreChanged",
        hud.borrow().position,
        hud.borrow().score,
        events.subscriber_count::<ScoreChanged>()
    );

    println!("log:");
    for record in records.try_iter() {
        println!("  [{}] {}", record.level, record.message);
    }
}
