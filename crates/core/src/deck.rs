use crate::{Card, RandomSource};
use serde::{Deserialize, Serialize};

const RADIUS_JITTER: f64 = 15.0;
const ANGLE_JITTER: f64 = 1.0;

/// Display-only jitter for one card on the wheel.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DeckVisual {
    pub offset_r: f32,
    pub angle_offset: f32,
}

impl DeckVisual {
    pub fn random<R: RandomSource>(rng: &mut R) -> Self {
        let offset_r = rng.next_f64() * 2.0 * RADIUS_JITTER - RADIUS_JITTER;
        let angle_offset = rng.next_f64() * 2.0 * ANGLE_JITTER - ANGLE_JITTER;
        Self {
            offset_r: offset_r as f32,
            angle_offset: angle_offset as f32,
        }
    }
}

/// Remaining cards in shuffle order. `visuals[i]` always belongs to `cards[i]`.
#[derive(Debug, Default, Clone)]
pub struct Deck {
    cards: Vec<Card>,
    visuals: Vec<DeckVisual>,
}

impl Deck {
    pub fn shuffled<R: RandomSource>(mut cards: Vec<Card>, rng: &mut R) -> Self {
        rng.shuffle(&mut cards);
        let visuals = cards.iter().map(|_| DeckVisual::random(rng)).collect();
        Self { cards, visuals }
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn visuals(&self) -> &[DeckVisual] {
        &self.visuals
    }

    pub fn get(&self, index: usize) -> Option<&Card> {
        self.cards.get(index)
    }

    /// Removes the card at `index` together with its jitter entry.
    pub fn take(&mut self, index: usize) -> Option<(Card, DeckVisual)> {
        if index >= self.cards.len() {
            return None;
        }
        let card = self.cards.remove(index);
        let visual = self.visuals.remove(index);
        Some((card, visual))
    }

    pub fn clear(&mut self) {
        self.cards.clear();
        self.visuals.clear();
    }
}
