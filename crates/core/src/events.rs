use crate::Step;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Event {
    StepChanged {
        from: Step,
        to: Step,
    },
    DeckShuffled {
        spread: String,
        cards: usize,
    },
    CardDrawn {
        card: String,
        position_index: usize,
        position_name: String,
        reversed: bool,
    },
    CardRevealed {
        index: usize,
    },
    RevealSequenceStarted {
        remaining: usize,
    },
    RevealSequenceCancelled,
    InterpretationRequested {
        cards: usize,
    },
    ReadingCompleted {
        id: String,
    },
    ReadingRestored {
        id: String,
    },
    SessionReset,
}

#[derive(Debug, Default)]
pub struct EventBus {
    queue: Vec<Event>,
}

impl EventBus {
    pub fn push(&mut self, event: Event) {
        self.queue.push(event);
    }

    pub fn drain(&mut self) -> impl Iterator<Item = Event> + '_ {
        self.queue.drain(..)
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
