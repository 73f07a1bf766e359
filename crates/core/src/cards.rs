use crate::Locale;
use serde::{Deserialize, Serialize};

pub const MAJOR_ARCANA: usize = 22;
pub const RANKS_PER_SUIT: usize = 14;
pub const DECK_SIZE: usize = MAJOR_ARCANA + 4 * RANKS_PER_SUIT;

const MAJOR_SEED_BASE: u32 = 100;
const MINOR_SEED_BASE: u32 = 200;

const MAJOR_NAMES_EN: [&str; MAJOR_ARCANA] = [
    "The Fool",
    "The Magician",
    "The High Priestess",
    "The Empress",
    "The Emperor",
    "The Hierophant",
    "The Lovers",
    "The Chariot",
    "Strength",
    "The Hermit",
    "Wheel of Fortune",
    "Justice",
    "The Hanged Man",
    "Death",
    "Temperance",
    "The Devil",
    "The Tower",
    "The Star",
    "The Moon",
    "The Sun",
    "Judgement",
    "The World",
];

const MAJOR_NAMES_ZH: [&str; MAJOR_ARCANA] = [
    "愚者", "魔术师", "女祭司", "皇后", "皇帝", "教皇", "恋人", "战车", "力量", "隐士",
    "命运之轮", "正义", "倒吊人", "死神", "节制", "恶魔", "高塔", "星星", "月亮", "太阳",
    "审判", "世界",
];

const RANK_NAMES_EN: [&str; RANKS_PER_SUIT] = [
    "Ace", "Two", "Three", "Four", "Five", "Six", "Seven", "Eight", "Nine", "Ten", "Page",
    "Knight", "Queen", "King",
];

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Suit {
    Major,
    Wands,
    Cups,
    Swords,
    Pentacles,
}

impl Suit {
    pub const MINOR: [Suit; 4] = [Suit::Wands, Suit::Cups, Suit::Swords, Suit::Pentacles];

    pub fn is_major(self) -> bool {
        self == Suit::Major
    }

    /// Stable identifier used as the prefix of minor card ids.
    pub fn key(self) -> &'static str {
        match self {
            Suit::Major => "major",
            Suit::Wands => "Wands",
            Suit::Cups => "Cups",
            Suit::Swords => "Swords",
            Suit::Pentacles => "Pentacles",
        }
    }

    pub fn name(self, locale: Locale) -> &'static str {
        match self {
            Suit::Major => locale.text("Major Arcana", "大阿卡纳"),
            Suit::Wands => locale.text("Wands", "权杖"),
            Suit::Cups => locale.text("Cups", "圣杯"),
            Suit::Swords => locale.text("Swords", "宝剑"),
            Suit::Pentacles => locale.text("Pentacles", "星币"),
        }
    }

    fn minor_index(self) -> u32 {
        match self {
            Suit::Major | Suit::Wands => 0,
            Suit::Cups => 1,
            Suit::Swords => 2,
            Suit::Pentacles => 3,
        }
    }
}

/// An immutable catalog entry. Drawn cards copy it; nothing mutates it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: String,
    pub name: String,
    pub suit: Suit,
    pub number: u8,
    pub image_seed: u32,
}

impl Card {
    pub fn major(number: u8, locale: Locale) -> Self {
        let idx = usize::from(number).min(MAJOR_ARCANA - 1);
        Self {
            id: format!("major-{idx}"),
            name: locale
                .text(MAJOR_NAMES_EN[idx], MAJOR_NAMES_ZH[idx])
                .to_string(),
            suit: Suit::Major,
            number: idx as u8,
            image_seed: MAJOR_SEED_BASE + idx as u32,
        }
    }

    /// `rank` is zero-based: 0 is the ace, 13 the king.
    pub fn minor(suit: Suit, rank: u8, locale: Locale) -> Self {
        let rank = usize::from(rank).min(RANKS_PER_SUIT - 1);
        Self {
            id: format!("{}-{rank}", suit.key()),
            name: minor_name(suit, rank, locale),
            suit,
            number: rank as u8 + 1,
            image_seed: MINOR_SEED_BASE + suit.minor_index() * RANKS_PER_SUIT as u32 + rank as u32,
        }
    }

    pub fn is_major(&self) -> bool {
        self.suit.is_major()
    }
}

fn minor_name(suit: Suit, rank: usize, locale: Locale) -> String {
    let suit_name = suit.name(locale);
    match locale {
        Locale::EnUs => format!("{} of {suit_name}", RANK_NAMES_EN[rank]),
        Locale::ZhCn => match rank {
            0 => format!("{suit_name}首牌"),
            10 => format!("{suit_name}侍从"),
            11 => format!("{suit_name}骑士"),
            12 => format!("{suit_name}王后"),
            13 => format!("{suit_name}国王"),
            _ => format!("{suit_name} {}", rank + 1),
        },
    }
}

/// The full 78-card catalog in canonical order: major arcana by number, then
/// wands, cups, swords and pentacles from ace to king.
pub fn all_cards() -> Vec<Card> {
    all_cards_in(Locale::default())
}

pub fn all_cards_in(locale: Locale) -> Vec<Card> {
    let mut cards = Vec::with_capacity(DECK_SIZE);
    for number in 0..MAJOR_ARCANA {
        cards.push(Card::major(number as u8, locale));
    }
    for suit in Suit::MINOR {
        for rank in 0..RANKS_PER_SUIT {
            cards.push(Card::minor(suit, rank as u8, locale));
        }
    }
    cards
}

pub fn find_card(id: &str, locale: Locale) -> Option<Card> {
    all_cards_in(locale).into_iter().find(|card| card.id == id)
}
