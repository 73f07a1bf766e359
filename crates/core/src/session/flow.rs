use super::*;
use crate::{all_cards_in, find_spread, Event, ReadingResult};

impl<R: RandomSource> Session<R> {
    pub fn start(&mut self, events: &mut EventBus) -> Result<(), SessionError> {
        self.ensure_step(Step::Welcome)?;
        self.set_step(Step::Question, events);
        Ok(())
    }

    /// Accepts the question when it has visible content.
    pub fn submit_question(&mut self, text: &str, events: &mut EventBus) -> Result<(), SessionError> {
        self.ensure_step(Step::Question)?;
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return rejected(SessionError::EmptyQuestion);
        }
        self.question = trimmed.to_string();
        self.set_step(Step::SpreadSelect, events);
        Ok(())
    }

    /// Shuffles a fresh 78-card deck for `spread` and opens the draw step.
    pub fn select_spread(&mut self, spread: Spread, events: &mut EventBus) -> Result<(), SessionError> {
        self.ensure_step(Step::SpreadSelect)?;
        if spread.card_count == 0 {
            return rejected(SessionError::EmptySpread(spread.id));
        }
        self.cancel_advance();
        self.deck = Deck::shuffled(all_cards_in(self.locale), &mut self.rng);
        self.drawn.clear();
        self.revealed = 0;
        self.reading = None;
        events.push(Event::DeckShuffled {
            spread: spread.id.clone(),
            cards: self.deck.len(),
        });
        tracing::debug!(spread = %spread.id, cards = spread.card_count, "deck shuffled");
        self.spread = spread;
        self.set_step(Step::ShuffleAndDraw, events);
        Ok(())
    }

    pub fn select_spread_id(&mut self, id: &str, events: &mut EventBus) -> Result<(), SessionError> {
        let Some(spread) = find_spread(id, self.locale) else {
            return rejected(SessionError::UnknownSpread(id.to_string()));
        };
        self.select_spread(spread, events)
    }

    pub fn go_back(&mut self, events: &mut EventBus) -> Result<(), SessionError> {
        let Some(previous) = self.step.previous() else {
            return rejected(SessionError::NoBackTransition(self.step));
        };
        if self.step == Step::ShuffleAndDraw {
            self.cancel_advance();
        }
        self.set_step(previous, events);
        Ok(())
    }

    /// Abandons everything and returns to the welcome step. Scheduled jobs
    /// and any in-flight interpretation are invalidated.
    pub fn reset(&mut self, events: &mut EventBus) {
        self.cancel_all_scheduled();
        self.epoch = self.epoch.wrapping_add(1);
        self.pending = None;
        self.question.clear();
        self.deck.clear();
        self.drawn.clear();
        self.revealed = 0;
        self.reading = None;
        self.set_step(Step::Welcome, events);
        events.push(Event::SessionReset);
    }

    /// Jumps straight to the reading step with a reading from history.
    pub fn restore(&mut self, reading: ReadingResult, events: &mut EventBus) {
        self.cancel_all_scheduled();
        self.epoch = self.epoch.wrapping_add(1);
        self.pending = None;
        self.spread = find_spread(&reading.spread_id, self.locale)
            .unwrap_or_else(|| spread_from_cards(&reading));
        self.question = reading.question.clone();
        self.tone = reading.tone;
        self.deck.clear();
        self.drawn = reading.cards.clone();
        self.revealed = self.drawn.len();
        events.push(Event::ReadingRestored {
            id: reading.id.clone(),
        });
        self.reading = Some(reading);
        self.set_step(Step::Reading, events);
    }
}

fn spread_from_cards(reading: &ReadingResult) -> Spread {
    Spread {
        id: reading.spread_id.clone(),
        name: reading.spread_id.clone(),
        description: String::new(),
        card_count: reading.cards.len(),
        positions: reading
            .cards
            .iter()
            .map(|card| card.position_name.clone())
            .collect(),
    }
}
