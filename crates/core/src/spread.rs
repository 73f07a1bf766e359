use crate::Locale;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Spread {
    pub id: String,
    pub name: String,
    pub description: String,
    pub card_count: usize,
    pub positions: Vec<String>,
}

impl Spread {
    /// Label for the position at `index`, synthesizing `Position N` when the
    /// spread names fewer positions than it draws.
    pub fn position_name(&self, index: usize, locale: Locale) -> String {
        self.positions
            .get(index)
            .cloned()
            .unwrap_or_else(|| fallback_position_name(index, locale))
    }
}

pub fn fallback_position_name(index: usize, locale: Locale) -> String {
    format!("{} {}", locale.text("Position", "位置"), index + 1)
}

struct SpreadDef {
    id: &'static str,
    name: (&'static str, &'static str),
    description: (&'static str, &'static str),
    positions: &'static [(&'static str, &'static str)],
}

const SPREADS: &[SpreadDef] = &[
    SpreadDef {
        id: "single",
        name: ("Daily Guidance (1 card)", "每日指引 (单张)"),
        description: (
            "Quick guidance for a yes/no question or the day ahead.",
            "快速指引，适合简单的是非题或今日运势。",
        ),
        positions: &[("Core Guidance", "核心指引")],
    },
    SpreadDef {
        id: "three-time",
        name: ("Time Flow (3 cards)", "时间流 (三张)"),
        description: (
            "See how the matter moves through past, present and future.",
            "洞察事情的过去、现在与未来走向。",
        ),
        positions: &[("Past", "过去"), ("Present", "现在"), ("Future", "未来")],
    },
    SpreadDef {
        id: "relationship",
        name: ("Relationship (4 cards)", "关系牌阵 (四张)"),
        description: (
            "Examine where two people stand and where the bond is heading.",
            "分析两人之间的关系现状与未来发展。",
        ),
        positions: &[
            ("Your State", "你的状态"),
            ("Their State", "对方状态"),
            ("The Relationship Now", "关系现状"),
            ("Where It Leads", "未来走向"),
        ],
    },
    SpreadDef {
        id: "celtic",
        name: ("Celtic Cross (10 cards)", "凯尔特十字 (十张)"),
        description: (
            "A full, deep reading for complex and weighty questions.",
            "全方位深度分析，适合复杂的重大问题。",
        ),
        positions: &[
            ("Present Situation", "当前状态"),
            ("Obstacle / Challenge", "阻碍/挑战"),
            ("Subconscious / Foundation", "潜意识/基础"),
            ("Past Influence", "过去的影响"),
            ("Conscious Aim", "表意识/目标"),
            ("Near Future", "未来发展"),
            ("Self-Attitude", "自我态度"),
            ("Environment", "环境影响"),
            ("Hopes and Fears", "希望与恐惧"),
            ("Final Outcome", "最终结果"),
        ],
    },
];

const QUESTION_TEMPLATES: &[(&str, &str)] = &[
    (
        "Where is my relationship with them heading?",
        "我和TA的关系接下来会怎样？",
    ),
    (
        "How should I move my career forward?",
        "我应该如何推进当前的事业？",
    ),
    ("How are my finances looking lately?", "最近我的财运如何？"),
    ("What should I watch out for this week?", "我这周需要注意什么？"),
    ("Is there a chance we get back together?", "我们还有复合的可能吗？"),
];

impl SpreadDef {
    fn build(&self, locale: Locale) -> Spread {
        Spread {
            id: self.id.to_string(),
            name: locale.text(self.name.0, self.name.1).to_string(),
            description: locale
                .text(self.description.0, self.description.1)
                .to_string(),
            card_count: self.positions.len(),
            positions: self
                .positions
                .iter()
                .map(|(en, zh)| locale.text(en, zh).to_string())
                .collect(),
        }
    }
}

pub fn all_spreads() -> Vec<Spread> {
    all_spreads_in(Locale::default())
}

pub fn all_spreads_in(locale: Locale) -> Vec<Spread> {
    SPREADS.iter().map(|def| def.build(locale)).collect()
}

pub fn find_spread(id: &str, locale: Locale) -> Option<Spread> {
    SPREADS
        .iter()
        .find(|def| def.id == id)
        .map(|def| def.build(locale))
}

pub fn default_spread(locale: Locale) -> Spread {
    SPREADS[0].build(locale)
}

/// Example questions offered on the question step.
pub fn question_templates(locale: Locale) -> Vec<&'static str> {
    QUESTION_TEMPLATES
        .iter()
        .map(|(en, zh)| locale.text(en, zh))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DECK_SIZE;

    #[test]
    fn every_spread_names_each_position() {
        for locale in [Locale::EnUs, Locale::ZhCn] {
            for spread in all_spreads_in(locale) {
                assert!(spread.card_count > 0, "{}", spread.id);
                assert_eq!(spread.positions.len(), spread.card_count, "{}", spread.id);
                assert!(spread.card_count <= DECK_SIZE);
            }
        }
    }

    #[test]
    fn catalog_ids_and_counts() {
        let spreads = all_spreads();
        let summary: Vec<_> = spreads
            .iter()
            .map(|spread| (spread.id.as_str(), spread.card_count))
            .collect();
        assert_eq!(
            summary,
            vec![("single", 1), ("three-time", 3), ("relationship", 4), ("celtic", 10)]
        );
    }

    #[test]
    fn three_time_positions() {
        let spread = find_spread("three-time", Locale::EnUs).expect("spread");
        assert_eq!(spread.positions, vec!["Past", "Present", "Future"]);
        let zh = find_spread("three-time", Locale::ZhCn).expect("spread");
        assert_eq!(zh.positions, vec!["过去", "现在", "未来"]);
    }

    #[test]
    fn position_name_falls_back_past_the_named_positions() {
        let spread = find_spread("single", Locale::EnUs).expect("spread");
        assert_eq!(spread.position_name(0, Locale::EnUs), "Core Guidance");
        assert_eq!(spread.position_name(3, Locale::EnUs), "Position 4");
        assert_eq!(spread.position_name(1, Locale::ZhCn), "位置 2");
    }

    #[test]
    fn templates_are_localized() {
        assert_eq!(question_templates(Locale::ZhCn)[2], "最近我的财运如何？");
        assert_eq!(question_templates(Locale::EnUs).len(), 5);
    }
}
