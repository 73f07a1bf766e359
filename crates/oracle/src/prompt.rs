use arcana_core::{InterpretationRequest, Locale, Tone};

/// System and user message for one interpretation call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub system: String,
    pub user: String,
}

/// Reader persona for a tone. Only the voice changes; the schema is fixed.
pub fn persona(tone: Tone, locale: Locale) -> &'static str {
    match tone {
        Tone::Gentle => locale.text(
            "You are a warm, empathetic tarot reader. Focus on emotional support and hopeful possibilities, and offer encouragement even when the cards are difficult.",
            "你是一位温暖、富有同理心的塔罗师。专注于情感支持和积极的可能性，即使面对困难的牌面也要给予鼓励。",
        ),
        Tone::Rational => locale.text(
            "You are a direct, rational and pragmatic tarot reader. Focus on actionable advice, realistic analysis and concrete steps. Avoid empty reassurance.",
            "你是一位直接、理性和务实的塔罗师。专注于可行的建议、现实的分析和具体的步骤。避免空洞的安慰。",
        ),
        Tone::Spiritual => locale.text(
            "You are a mystical spiritual guide. Focus on the growth of the soul, karmic lessons and connection with higher consciousness.",
            "你是一位神秘的灵性导师。专注于灵魂成长、业力课题和更高意识的连接。",
        ),
    }
}

const SYSTEM_RULES_EN: &str = "\
**Core rules**:
1. **Output format**: return valid **JSON** and nothing else.
2. **Content**:
   - No mechanical readings: weave together each card's meaning, its orientation and the meaning of its position.
   - Write in English only; do not mix in other languages.
   - Do **not** output reasoning or notes; output only the final reading.
   - The JSON structure must match the requested schema exactly.";

const SYSTEM_RULES_ZH: &str = "\
**核心规则**：
1. **输出格式**：必须且只能返回合法的 **JSON** 格式。
2. **内容要求**：
   - 拒绝机械式解读，请将牌面含义、正逆位与位置含义深度结合。
   - **禁止**使用中英对照（如 \"Success/成功\"），仅使用中文。
   - **禁止**输出任何思考过程或备注，直接输出最终解读结果。
   - JSON 结构必须严格符合要求。";

const SCHEMA_EN: &str = r#"{
  "summary": "One sentence that gets to the heart of the matter",
  "cardAnalysis": [
    {
      "cardName": "card name",
      "position": "position name",
      "meaning": "a detailed reading of this card in this position"
    }
  ],
  "advice": "concrete guidance or next steps"
}"#;

const SCHEMA_ZH: &str = r#"{
  "summary": "一句直击要害的核心总结（纯中文）",
  "cardAnalysis": [
    {
      "cardName": "牌名",
      "position": "位置名",
      "meaning": "针对该牌在该位置的详细深度解读（纯中文）"
    }
  ],
  "advice": "具体的行动建议或指引（纯中文）"
}"#;

pub fn build_prompt(request: &InterpretationRequest) -> Prompt {
    Prompt {
        system: system_prompt(request.tone, request.locale),
        user: user_prompt(request),
    }
}

fn system_prompt(tone: Tone, locale: Locale) -> String {
    let (base, rules) = match locale {
        Locale::EnUs => ("You are a professional tarot reader.", SYSTEM_RULES_EN),
        Locale::ZhCn => ("你是一位专业的塔罗牌占卜师。", SYSTEM_RULES_ZH),
    };
    format!("{base}{}\n\n{rules}\n", persona(tone, locale))
}

fn user_prompt(request: &InterpretationRequest) -> String {
    let locale = request.locale;
    let cards = request
        .cards
        .iter()
        .enumerate()
        .map(|(idx, card)| {
            let orientation = card.orientation_label(locale);
            match locale {
                Locale::EnUs => format!(
                    "Card {} [position: {}]: {} ({orientation})",
                    idx + 1,
                    card.position_name,
                    card.name()
                ),
                Locale::ZhCn => format!(
                    "第{}张 [位置:{}]: {} ({orientation})",
                    idx + 1,
                    card.position_name,
                    card.name()
                ),
            }
        })
        .collect::<Vec<_>>()
        .join("\n");
    match locale {
        Locale::EnUs => format!(
            "[Question]: \"{question}\"\n[Spread]: {spread}\n\n[Cards drawn]:\n{cards}\n\n\
             Interpret the reading from the information above and return data strictly in this JSON format:\n\n\
             {SCHEMA_EN}\n\n\
             Note: the order of the cardAnalysis array must match the order of the cards drawn exactly (element 1 is card 1).",
            question = request.question,
            spread = request.spread.name,
        ),
        Locale::ZhCn => format!(
            "【求问者疑惑】: \"{question}\"\n【使用牌阵】: {spread}\n\n【抽牌结果】:\n{cards}\n\n\
             请根据以上信息进行解读，并严格按照以下 JSON 格式返回数据：\n\n\
             {SCHEMA_ZH}\n\n\
             注意：cardAnalysis 数组中的顺序必须与输入的抽牌顺序严格一致（第1个元素对应第1张牌）。",
            question = request.question,
            spread = request.spread.name,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arcana_core::{find_card, find_spread, DrawnCard, InterpretationRequest};

    fn request(locale: Locale, tone: Tone) -> InterpretationRequest {
        let spread = find_spread("three-time", locale).expect("spread");
        let cards = ["major-0", "Cups-1"]
            .iter()
            .enumerate()
            .map(|(idx, id)| DrawnCard {
                card: find_card(id, locale).expect("card"),
                is_reversed: idx == 1,
                position_index: idx,
                position_name: spread.position_name(idx, locale),
            })
            .collect();
        InterpretationRequest::standalone("Should I move abroad?", spread, cards, tone, locale)
    }

    #[test]
    fn english_prompt_lists_cards_in_order() {
        let prompt = build_prompt(&request(Locale::EnUs, Tone::Gentle));
        assert!(prompt.system.starts_with("You are a professional tarot reader."));
        assert!(prompt.system.contains("warm, empathetic"));
        assert!(prompt.user.contains("[Question]: \"Should I move abroad?\""));
        let first = prompt
            .user
            .find("Card 1 [position: Past]: The Fool (upright)")
            .expect("first card");
        let second = prompt
            .user
            .find("Card 2 [position: Present]: Two of Cups (reversed)")
            .expect("second card");
        assert!(first < second);
        assert!(prompt
            .user
            .contains("(upright)\nCard 2 [position: Present]"));
        assert!(prompt.user.contains("(reversed)\n\nInterpret the reading"));
        assert!(prompt.user.contains("\"cardAnalysis\""));
    }

    #[test]
    fn chinese_prompt_uses_chinese_labels() {
        let prompt = build_prompt(&request(Locale::ZhCn, Tone::Spiritual));
        assert!(prompt.system.contains("灵性导师"));
        assert!(prompt.system.contains("核心规则"));
        assert!(prompt.user.contains("第1张 [位置:过去]: 愚者 (正位)"));
        assert!(prompt.user.contains("第2张 [位置:现在]: 圣杯 2 (逆位)"));
        assert!(prompt.user.contains("【使用牌阵】"));
    }

    #[test]
    fn tone_only_changes_the_persona() {
        let gentle = build_prompt(&request(Locale::EnUs, Tone::Gentle));
        let rational = build_prompt(&request(Locale::EnUs, Tone::Rational));
        assert_ne!(gentle.system, rational.system);
        assert_eq!(gentle.user, rational.user);
        assert!(rational.system.contains(persona(Tone::Rational, Locale::EnUs)));
    }
}
