use super::*;
use crate::Event;

impl<R: RandomSource> Session<R> {
    /// Draws the card at `deck_index` into the next open position. Filling the
    /// spread schedules the move to the reveal step.
    pub fn draw_at(&mut self, deck_index: usize, events: &mut EventBus) -> Result<(), SessionError> {
        self.ensure_step(Step::ShuffleAndDraw)?;
        if self.needed() == 0 {
            return rejected(SessionError::SpreadFull(self.drawn.len()));
        }
        if deck_index >= self.deck.len() {
            return rejected(SessionError::DeckIndex {
                index: deck_index,
                len: self.deck.len(),
            });
        }
        self.draw_index(deck_index, events);
        if self.needed() == 0 {
            let delay = self.config.manual_advance_delay();
            self.schedule_advance(delay);
        }
        Ok(())
    }

    /// Draws every card still needed at uniformly random deck positions, then
    /// schedules the move to the reveal step. Stops early if the deck runs
    /// dry.
    pub fn auto_draw_remaining(&mut self, events: &mut EventBus) -> Result<(), SessionError> {
        self.ensure_step(Step::ShuffleAndDraw)?;
        let needed = self.needed();
        if needed == 0 {
            return rejected(SessionError::SpreadFull(self.drawn.len()));
        }
        for _ in 0..needed {
            if self.deck.is_empty() {
                tracing::warn!(
                    drawn = self.drawn.len(),
                    wanted = self.spread.card_count,
                    "deck exhausted during auto draw"
                );
                break;
            }
            let index = self.rng.below(self.deck.len());
            self.draw_index(index, events);
        }
        let delay = self.config.auto_advance_delay();
        self.schedule_advance(delay);
        Ok(())
    }

    fn draw_index(&mut self, deck_index: usize, events: &mut EventBus) {
        let Some((card, _visual)) = self.deck.take(deck_index) else {
            return;
        };
        let is_reversed = self.rng.next_f64() > self.config.reversed_threshold;
        let position_index = self.drawn.len();
        let position_name = self.spread.position_name(position_index, self.locale);
        events.push(Event::CardDrawn {
            card: card.id.clone(),
            position_index,
            position_name: position_name.clone(),
            reversed: is_reversed,
        });
        self.drawn.push(DrawnCard {
            card,
            is_reversed,
            position_index,
            position_name,
        });
    }

    fn schedule_advance(&mut self, delay: Duration) {
        self.cancel_advance();
        let token = self.timeline.token();
        self.timeline.schedule(delay, token, Job::AdvanceToReveal);
        self.advance_token = Some(token);
    }

    pub(super) fn run_advance(&mut self, token: CancelToken, events: &mut EventBus) {
        if self.advance_token != Some(token) {
            return;
        }
        self.advance_token = None;
        let ready = self.needed() == 0 || (self.deck.is_empty() && !self.drawn.is_empty());
        if self.step == Step::ShuffleAndDraw && ready {
            self.set_step(Step::Reveal, events);
        }
    }
}
