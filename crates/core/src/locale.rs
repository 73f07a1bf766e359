use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Locale {
    #[default]
    #[serde(rename = "en_US", alias = "en", alias = "en-US")]
    EnUs,
    #[serde(rename = "zh_CN", alias = "zh", alias = "zh-CN")]
    ZhCn,
}

impl Locale {
    pub fn from_opt(value: Option<&str>) -> Self {
        if normalize_locale(value) == "zh_CN" {
            Self::ZhCn
        } else {
            Self::EnUs
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Self::EnUs => "en_US",
            Self::ZhCn => "zh_CN",
        }
    }

    pub fn text<'a>(self, en: &'a str, zh: &'a str) -> &'a str {
        if matches!(self, Self::ZhCn) {
            zh
        } else {
            en
        }
    }
}

/// Maps loose locale spellings (`zh`, `zh-CN`, `zh_CN.UTF-8`) onto the two
/// supported codes. Anything unrecognised is English.
pub fn normalize_locale(value: Option<&str>) -> &'static str {
    let Some(raw) = value else {
        return "en_US";
    };
    let lowered = raw.trim().to_ascii_lowercase();
    if lowered.starts_with("zh") {
        "zh_CN"
    } else {
        "en_US"
    }
}
