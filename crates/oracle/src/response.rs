use crate::OracleError;
use arcana_core::{CardAnalysis, DrawnCard, Interpretation, Locale};
use serde_json::Value;

/// Turns raw model output into an interpretation aligned with `cards`.
///
/// Entry `i` of `cardAnalysis` always describes `cards[i]`: card name and
/// position are copied from the draw, and any entry the model left out or
/// left blank is backfilled. Output that is not a JSON object is an error.
pub fn parse_interpretation(
    content: &str,
    cards: &[DrawnCard],
    locale: Locale,
) -> Result<Interpretation, OracleError> {
    let body = strip_code_fence(content);
    if body.is_empty() {
        return Err(OracleError::EmptyContent);
    }
    let value: Value = serde_json::from_str(body)?;
    let Value::Object(object) = value else {
        return Err(OracleError::Malformed("expected a JSON object".to_string()));
    };

    let upstream = object
        .get("cardAnalysis")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();
    let card_analysis = cards
        .iter()
        .enumerate()
        .map(|(idx, card)| {
            let meaning = upstream
                .get(idx)
                .and_then(|entry| non_blank(entry.get("meaning")))
                .map(str::to_string)
                .unwrap_or_else(|| backfill_meaning(card, locale));
            analysis_for(card, meaning)
        })
        .collect::<Vec<_>>();
    if upstream.len() < cards.len() {
        tracing::debug!(
            returned = upstream.len(),
            drawn = cards.len(),
            "backfilled missing card analysis"
        );
    }

    let summary = non_blank(object.get("summary"))
        .map(str::to_string)
        .unwrap_or_else(|| default_summary(locale).to_string());
    let advice = non_blank(object.get("advice"))
        .map(str::to_string)
        .unwrap_or_else(|| default_advice(locale).to_string());

    Ok(Interpretation {
        summary,
        card_analysis,
        advice,
    })
}

/// What the reader sees when no usable interpretation came back.
pub fn fallback_interpretation(cards: &[DrawnCard], locale: Locale) -> Interpretation {
    let meaning = locale.text(
        "A detailed interpretation is not available right now.",
        "暂时无法获取详细解读。",
    );
    Interpretation {
        summary: locale
            .text(
                "The connection to the cosmic energies wavered (network or API error). Please try again later.",
                "连接宇宙能量时遇到波动（网络或API错误），请稍后重试。",
            )
            .to_string(),
        card_analysis: cards
            .iter()
            .map(|card| analysis_for(card, meaning.to_string()))
            .collect(),
        advice: locale
            .text(
                "Check your network connection or API key settings.",
                "请检查您的网络连接或 API Key 设置。",
            )
            .to_string(),
    }
}

pub fn backfill_meaning(card: &DrawnCard, locale: Locale) -> String {
    let orientation = card.orientation_label(locale);
    match locale {
        Locale::EnUs => format!(
            "{} ({orientation}) appears in the {} position. The stars are quiet here; let your intuition read its message.",
            card.name(),
            card.position_name
        ),
        Locale::ZhCn => format!(
            "这张{}（{orientation}）出现在{}。星象显示此时能量静默，请凭借直觉感受它的启示。",
            card.name(),
            card.position_name
        ),
    }
}

pub fn default_summary(locale: Locale) -> &'static str {
    locale.text(
        "The stars shift in mysterious ways; listen to the voice within.",
        "星象变幻莫测，请聆听内心的声音。",
    )
}

pub fn default_advice(locale: Locale) -> &'static str {
    locale.text(
        "Stay calm; the answer is already within you.",
        "保持平静，答案自在心中。",
    )
}

/// Unwraps a Markdown code fence (with or without a language tag).
pub fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let body = match rest.find('\n') {
        Some(newline) => &rest[newline + 1..],
        None => rest,
    };
    body.trim_end().trim_end_matches("```").trim()
}

fn analysis_for(card: &DrawnCard, meaning: String) -> CardAnalysis {
    CardAnalysis {
        card_name: card.name().to_string(),
        position: card.position_name.clone(),
        meaning,
    }
}

fn non_blank(value: Option<&Value>) -> Option<&str> {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|text| !text.is_empty())
}
