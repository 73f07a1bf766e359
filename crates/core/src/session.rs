use crate::{
    default_spread, CancelToken, Deck, DrawMode, DrawnCard, EventBus, InterpretationTicket, Job,
    Locale, RandomSource, ReadingResult, RngState, SessionConfig, Spread, Step, Timeline, Tone,
};
use std::time::Duration;
use thiserror::Error;

mod draw;
mod flow;
mod interpret;
mod reveal;

#[cfg(test)]
mod tests;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("invalid step: {0:?}")]
    InvalidStep(Step),
    #[error("question is empty")]
    EmptyQuestion,
    #[error("unknown spread: {0}")]
    UnknownSpread(String),
    #[error("spread {0} draws no cards")]
    EmptySpread(String),
    #[error("spread already holds {0} cards")]
    SpreadFull(usize),
    #[error("deck index {index} out of range ({len} cards left)")]
    DeckIndex { index: usize, len: usize },
    #[error("card {got} cannot be revealed before card {expected}")]
    OutOfOrderReveal { expected: usize, got: usize },
    #[error("{revealed} of {drawn} cards revealed")]
    RevealIncomplete { revealed: usize, drawn: usize },
    #[error("interpretation already in flight")]
    InterpretationPending,
    #[error("interpretation belongs to an earlier session")]
    StaleInterpretation,
    #[error("no way back from {0:?}")]
    NoBackTransition(Step),
}

/// The single active reading. All mutation goes through its transition
/// methods; the presentation layer only reads it and submits intents.
#[derive(Debug)]
pub struct Session<R = RngState> {
    config: SessionConfig,
    locale: Locale,
    rng: R,
    step: Step,
    question: String,
    spread: Spread,
    draw_mode: DrawMode,
    tone: Tone,
    deck: Deck,
    drawn: Vec<DrawnCard>,
    revealed: usize,
    reading: Option<ReadingResult>,
    /// In-flight request and the tone it went out with.
    pending: Option<(InterpretationTicket, Tone)>,
    epoch: u64,
    timeline: Timeline,
    advance_token: Option<CancelToken>,
    reveal_token: Option<CancelToken>,
}

impl<R: RandomSource> Session<R> {
    pub fn new(config: SessionConfig, locale: Locale, rng: R) -> Self {
        Self {
            config,
            locale,
            rng,
            step: Step::Welcome,
            question: String::new(),
            spread: default_spread(locale),
            draw_mode: DrawMode::default(),
            tone: Tone::default(),
            deck: Deck::default(),
            drawn: Vec::new(),
            revealed: 0,
            reading: None,
            pending: None,
            epoch: 0,
            timeline: Timeline::default(),
            advance_token: None,
            reveal_token: None,
        }
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn spread(&self) -> &Spread {
        &self.spread
    }

    pub fn draw_mode(&self) -> DrawMode {
        self.draw_mode
    }

    pub fn tone(&self) -> Tone {
        self.tone
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn drawn_cards(&self) -> &[DrawnCard] {
        &self.drawn
    }

    pub fn revealed_count(&self) -> usize {
        self.revealed
    }

    pub fn reading(&self) -> Option<&ReadingResult> {
        self.reading.as_ref()
    }

    /// True while an interpretation request is in flight.
    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    /// Cards still to draw for the active spread.
    pub fn needed(&self) -> usize {
        self.spread.card_count.saturating_sub(self.drawn.len())
    }

    pub fn all_revealed(&self) -> bool {
        !self.drawn.is_empty() && self.revealed == self.drawn.len()
    }

    /// True while a post-draw advance or a reveal sequence is scheduled.
    pub fn has_scheduled_work(&self) -> bool {
        !self.timeline.is_idle()
    }

    pub fn clock(&self) -> Duration {
        self.timeline.now()
    }

    pub fn set_tone(&mut self, tone: Tone) {
        self.tone = tone;
    }

    pub fn set_draw_mode(&mut self, mode: DrawMode) {
        self.draw_mode = mode;
    }

    /// Moves the session clock forward, running every scheduled job that
    /// falls due on the way in due order.
    pub fn advance(&mut self, elapsed: Duration, events: &mut EventBus) {
        let target = self.timeline.now() + elapsed;
        while let Some((token, job)) = self.timeline.pop_due(target) {
            match job {
                Job::AdvanceToReveal => self.run_advance(token, events),
                Job::RevealNext => self.run_reveal_step(token, events),
            }
        }
    }

    fn set_step(&mut self, to: Step, events: &mut EventBus) {
        let from = self.step;
        if from == to {
            return;
        }
        self.step = to;
        tracing::debug!(?from, ?to, "step changed");
        events.push(crate::Event::StepChanged { from, to });
    }

    fn ensure_step(&self, expected: Step) -> Result<(), SessionError> {
        if self.step == expected {
            Ok(())
        } else {
            rejected(SessionError::InvalidStep(self.step))
        }
    }

    fn cancel_advance(&mut self) {
        if let Some(token) = self.advance_token.take() {
            self.timeline.cancel(token);
        }
    }

    fn cancel_all_scheduled(&mut self) {
        self.timeline.clear();
        self.advance_token = None;
        self.reveal_token = None;
    }
}

fn rejected<T>(err: SessionError) -> Result<T, SessionError> {
    tracing::debug!(%err, "intent rejected");
    Err(err)
}
