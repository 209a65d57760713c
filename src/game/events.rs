//! Notifications pushed from the game to the presentation layer

use std::sync::mpsc;

use crate::combat::RoundOutcome;

/// Something the player should be told about
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    /// Narrative line
    Message(String),
    /// A rejected command or failed operation
    Error(String),
    CombatStarted { enemy: String },
    CombatEnded(RoundOutcome),
}

impl GameEvent {
    /// Text form for line-oriented frontends
    pub fn text(&self) -> String {
        match self {
            GameEvent::Message(m) => m.clone(),
            GameEvent::Error(e) => format!("! {}", e),
            GameEvent::CombatStarted { enemy } => format!("-- Combat with {} --", enemy),
            GameEvent::CombatEnded(outcome) => format!("-- Combat over ({:?}) --", outcome),
        }
    }
}

/// Receiver of game events; must not block
pub trait EventSink {
    fn emit(&mut self, event: GameEvent);
}

impl<F: FnMut(GameEvent)> EventSink for F {
    fn emit(&mut self, event: GameEvent) {
        self(event)
    }
}

impl EventSink for mpsc::Sender<GameEvent> {
    fn emit(&mut self, event: GameEvent) {
        // A dropped receiver just means nobody is listening
        let _ = self.send(event);
    }
}

impl EventSink for Vec<GameEvent> {
    fn emit(&mut self, event: GameEvent) {
        self.push(event);
    }
}

/// Sink that discards everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&mut self, _event: GameEvent) {}
}
