use super::*;
use crate::{Event, Interpretation, InterpretationRequest, ReadingStamp};

impl<R: RandomSource> Session<R> {
    /// Marks the session as loading and hands back what the interpretation
    /// client needs. Every drawn card must be face up.
    pub fn begin_interpretation(
        &mut self,
        events: &mut EventBus,
    ) -> Result<InterpretationRequest, SessionError> {
        self.ensure_step(Step::Reveal)?;
        if self.pending.is_some() {
            return rejected(SessionError::InterpretationPending);
        }
        if !self.all_revealed() {
            return rejected(SessionError::RevealIncomplete {
                revealed: self.revealed,
                drawn: self.drawn.len(),
            });
        }
        let ticket = InterpretationTicket(self.epoch);
        self.pending = Some((ticket, self.tone));
        events.push(Event::InterpretationRequested {
            cards: self.drawn.len(),
        });
        Ok(InterpretationRequest {
            ticket,
            question: self.question.clone(),
            spread: self.spread.clone(),
            cards: self.drawn.clone(),
            tone: self.tone,
            locale: self.locale,
        })
    }

    /// Builds the reading from a finished interpretation and moves to the
    /// reading step. A ticket from before a reset or restore is refused.
    pub fn complete_interpretation(
        &mut self,
        ticket: InterpretationTicket,
        interpretation: Interpretation,
        stamp: ReadingStamp,
        events: &mut EventBus,
    ) -> Result<ReadingResult, SessionError> {
        let tone = match self.pending {
            Some((pending, tone)) if pending == ticket && self.step == Step::Reveal => tone,
            _ => return rejected(SessionError::StaleInterpretation),
        };
        self.pending = None;
        let reading = ReadingResult {
            id: stamp.id,
            timestamp: stamp.timestamp,
            question: self.question.clone(),
            spread_id: self.spread.id.clone(),
            cards: self.drawn.clone(),
            interpretation: Some(interpretation),
            tone,
        };
        events.push(Event::ReadingCompleted {
            id: reading.id.clone(),
        });
        self.reading = Some(reading.clone());
        self.set_step(Step::Reading, events);
        Ok(reading)
    }
}
