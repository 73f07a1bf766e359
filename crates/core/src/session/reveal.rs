use super::*;
use crate::Event;

impl<R: RandomSource> Session<R> {
    /// Flips card `index` face up. Only the leftmost face-down card may be
    /// flipped.
    pub fn reveal_next(&mut self, index: usize, events: &mut EventBus) -> Result<(), SessionError> {
        self.ensure_step(Step::Reveal)?;
        if index != self.revealed || index >= self.drawn.len() {
            return rejected(SessionError::OutOfOrderReveal {
                expected: self.revealed,
                got: index,
            });
        }
        self.reveal_one(events);
        Ok(())
    }

    /// Flips the next card now and the rest one interval apart. Restarting
    /// replaces any sequence already running.
    pub fn reveal_all(&mut self, events: &mut EventBus) -> Result<(), SessionError> {
        self.ensure_step(Step::Reveal)?;
        self.cancel_reveal_sequence(events);
        let remaining = self.drawn.len() - self.revealed;
        if remaining == 0 {
            return Ok(());
        }
        events.push(Event::RevealSequenceStarted { remaining });
        let token = self.timeline.token();
        self.reveal_token = Some(token);
        self.run_reveal_step(token, events);
        Ok(())
    }

    pub(super) fn run_reveal_step(&mut self, token: CancelToken, events: &mut EventBus) {
        if self.reveal_token != Some(token) {
            return;
        }
        if self.step != Step::Reveal || self.revealed >= self.drawn.len() {
            self.reveal_token = None;
            return;
        }
        self.reveal_one(events);
        if self.revealed < self.drawn.len() {
            let interval = self.config.reveal_interval();
            self.timeline.schedule(interval, token, Job::RevealNext);
        } else {
            self.reveal_token = None;
        }
    }

    fn cancel_reveal_sequence(&mut self, events: &mut EventBus) {
        if let Some(token) = self.reveal_token.take() {
            if self.timeline.is_pending(token) {
                events.push(Event::RevealSequenceCancelled);
            }
            self.timeline.cancel(token);
        }
    }

    fn reveal_one(&mut self, events: &mut EventBus) {
        let index = self.revealed;
        self.revealed += 1;
        events.push(Event::CardRevealed { index });
    }
}
