use crate::Locale;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Step {
    Welcome,
    Question,
    SpreadSelect,
    ShuffleAndDraw,
    Reveal,
    Reading,
}

impl Step {
    /// Target of the "go back" transition, if this step has one.
    pub fn previous(self) -> Option<Step> {
        match self {
            Step::Question => Some(Step::Welcome),
            Step::SpreadSelect => Some(Step::Question),
            Step::ShuffleAndDraw => Some(Step::SpreadSelect),
            Step::Welcome | Step::Reveal | Step::Reading => None,
        }
    }

    pub fn label(self, locale: Locale) -> &'static str {
        match self {
            Step::Welcome => locale.text("Welcome", "欢迎"),
            Step::Question => locale.text("Question", "提问"),
            Step::SpreadSelect => locale.text("Spread", "牌阵"),
            Step::ShuffleAndDraw => locale.text("Draw", "抽牌"),
            Step::Reveal => locale.text("Reveal", "翻牌"),
            Step::Reading => locale.text("Reading", "解读"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum DrawMode {
    #[default]
    #[serde(rename = "MANUAL", alias = "manual")]
    Manual,
    #[serde(rename = "AUTO", alias = "auto")]
    Auto,
}

impl DrawMode {
    pub fn toggled(self) -> Self {
        match self {
            DrawMode::Manual => DrawMode::Auto,
            DrawMode::Auto => DrawMode::Manual,
        }
    }

    pub fn label(self, locale: Locale) -> &'static str {
        match self {
            DrawMode::Manual => locale.text("Manual", "手动抽牌"),
            DrawMode::Auto => locale.text("Auto", "自动抽牌"),
        }
    }
}

impl FromStr for DrawMode {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "manual" => Ok(DrawMode::Manual),
            "auto" => Ok(DrawMode::Auto),
            other => Err(format!("unknown draw mode: {other}")),
        }
    }
}

/// Voice of the interpretation. Never changes the response shape.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Tone {
    #[default]
    #[serde(rename = "GENTLE", alias = "gentle")]
    Gentle,
    #[serde(rename = "RATIONAL", alias = "rational")]
    Rational,
    #[serde(rename = "SPIRITUAL", alias = "spiritual")]
    Spiritual,
}

impl Tone {
    pub const ALL: [Tone; 3] = [Tone::Gentle, Tone::Rational, Tone::Spiritual];

    pub fn label(self, locale: Locale) -> &'static str {
        match self {
            Tone::Gentle => locale.text("Gentle", "温暖治愈"),
            Tone::Rational => locale.text("Rational", "理性分析"),
            Tone::Spiritual => locale.text("Spiritual", "灵性指引"),
        }
    }

    pub fn next(self) -> Self {
        match self {
            Tone::Gentle => Tone::Rational,
            Tone::Rational => Tone::Spiritual,
            Tone::Spiritual => Tone::Gentle,
        }
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Tone::Gentle => "gentle",
            Tone::Rational => "rational",
            Tone::Spiritual => "spiritual",
        };
        f.write_str(name)
    }
}

impl FromStr for Tone {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "gentle" => Ok(Tone::Gentle),
            "rational" => Ok(Tone::Rational),
            "spiritual" => Ok(Tone::Spiritual),
            other => Err(format!("unknown tone: {other}")),
        }
    }
}
