use crate::{Card, Locale, Spread, Tone};
use serde::{Deserialize, Serialize};

/// A card that left the deck, with the orientation and position it landed in.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DrawnCard {
    #[serde(flatten)]
    pub card: Card,
    pub is_reversed: bool,
    pub position_index: usize,
    pub position_name: String,
}

impl DrawnCard {
    pub fn name(&self) -> &str {
        &self.card.name
    }

    pub fn orientation_label(&self, locale: Locale) -> &'static str {
        if self.is_reversed {
            locale.text("reversed", "逆位")
        } else {
            locale.text("upright", "正位")
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CardAnalysis {
    pub card_name: String,
    pub position: String,
    pub meaning: String,
}

/// Interpretation text. `card_analysis[i]` always describes drawn card `i`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Interpretation {
    pub summary: String,
    pub card_analysis: Vec<CardAnalysis>,
    pub advice: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ReadingResult {
    pub id: String,
    pub timestamp: u64,
    pub question: String,
    pub spread_id: String,
    pub cards: Vec<DrawnCard>,
    pub interpretation: Option<Interpretation>,
    pub tone: Tone,
}

/// Identity assigned to a reading at creation time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadingStamp {
    pub id: String,
    pub timestamp: u64,
}

impl ReadingStamp {
    pub fn at(timestamp: u64) -> Self {
        Self {
            id: timestamp.to_string(),
            timestamp,
        }
    }
}

/// Identifies the session epoch an interpretation was requested in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InterpretationTicket(pub(crate) u64);

/// Everything the interpretation client needs, detached from the session.
#[derive(Debug, Clone, PartialEq)]
pub struct InterpretationRequest {
    pub ticket: InterpretationTicket,
    pub question: String,
    pub spread: Spread,
    pub cards: Vec<DrawnCard>,
    pub tone: Tone,
    pub locale: Locale,
}

impl InterpretationRequest {
    /// A request not bound to any session. Completing it on a session is
    /// always refused as stale.
    pub fn standalone(
        question: impl Into<String>,
        spread: Spread,
        cards: Vec<DrawnCard>,
        tone: Tone,
        locale: Locale,
    ) -> Self {
        Self {
            ticket: InterpretationTicket(u64::MAX),
            question: question.into(),
            spread,
            cards,
            tone,
            locale,
        }
    }
}
